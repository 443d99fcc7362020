//! Property tests: arbitrary action sequences never corrupt the session.

use proptest::prelude::*;

use super::GameFlowService;
use crate::domain::state::{Game, GameStatus, PlayerId};

fn started_table(n: usize) -> (GameFlowService, Game, Vec<PlayerId>) {
    let flow = GameFlowService::new();
    let mut game = Game::new();
    let mut ids = Vec::new();
    for i in 0..n {
        let id = PlayerId::new();
        flow.join_game(&mut game, id, format!("p{i}"))
            .expect("join");
        ids.push(id);
    }
    for &id in &ids {
        flow.player_ready(&mut game, id, true).expect("ready");
    }
    flow.start_game(&mut game, ids[0]).expect("start");
    (flow, game, ids)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Whatever a sequence of well-formed (but arbitrarily timed and often
    /// illegal) actions does, the 52-card ledger holds and the turn pointer
    /// never dangles.
    #[test]
    fn random_play_never_corrupts_the_session(
        actions in proptest::collection::vec((0u8..7, 0usize..8), 1..150),
    ) {
        let (flow, mut game, ids) = started_table(3);

        for (code, param) in actions {
            let actor = ids[param % ids.len()];
            // Rejections are expected constantly; only state health matters.
            let _ = match code {
                0 => flow.draw_card(&mut game, actor, param % 2 == 0),
                1 => flow.discard_card(&mut game, actor, param % 5),
                2 => flow.keep_top_card(&mut game, actor),
                3 => flow.burn_top_card(&mut game, actor),
                4 => flow.knock(&mut game, actor),
                5 => flow.ack_round_summary(&mut game, actor),
                _ => flow.leave_game(&mut game, actor),
            };

            if game.status == GameStatus::Playing {
                prop_assert_eq!(game.cards_accounted(), 52);

                if let Some(current) = game.current_player {
                    let player = game.player(current);
                    prop_assert!(
                        player.is_some(),
                        "current player must always be in the roster"
                    );
                    if !game.awaiting_acks {
                        prop_assert!(
                            player.map(|p| p.is_alive()).unwrap_or(false),
                            "current player must be alive"
                        );
                    }
                }

                if !game.awaiting_acks {
                    // Only the player holding the turn may hold a fourth card
                    for player in game.players_in_seat_order() {
                        if player.is_alive() && Some(player.id) != game.current_player {
                            prop_assert_eq!(player.hand.len(), 3);
                        }
                    }
                }
            }
        }
    }

    /// The knock endgame always terminates: once someone knocks, the round
    /// resolves after at most one forced turn per other player.
    #[test]
    fn knock_endgame_terminates(extra_draw_from_deck in any::<bool>()) {
        let (flow, mut game, ids) = started_table(3);
        if game.awaiting_acks {
            // A 31 on the opening deal already resolved the round.
            return Ok(());
        }

        flow.knock(&mut game, ids[0]).expect("opening knock");
        let mut forced_turns = 0;
        while !game.awaiting_acks {
            let current = game.current_player.expect("someone holds the turn");
            let draw_from_deck = extra_draw_from_deck || game.discard_pile.is_empty();
            flow.draw_card(&mut game, current, draw_from_deck)
                .expect("knockee draw");
            if game.awaiting_acks {
                break;
            }
            flow.discard_card(&mut game, current, 3).expect("knockee discard");
            forced_turns += 1;
            prop_assert!(forced_turns <= 2, "round must resolve after eligible-1 turns");
        }
        prop_assert!(game.awaiting_acks);
    }
}
