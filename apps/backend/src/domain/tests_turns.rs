use crate::domain::state::{Game, GameStatus, Phase, Player, PlayerId};
use crate::domain::turns::{advance_turn, after_discard, after_draw, after_knock};

fn seated(n: usize) -> (Game, Vec<PlayerId>) {
    let mut game = Game::new();
    let mut ids = Vec::new();
    for i in 0..n {
        let id = PlayerId::new();
        game.add_player(Player::new(id, format!("p{i}"), false));
        ids.push(id);
    }
    game.host = ids.first().copied();
    game.status = GameStatus::Playing;
    game.phase = Phase::PreKnock;
    game.current_player = ids.first().copied();
    (game, ids)
}

#[test]
fn rotation_returns_to_opener_after_one_full_circuit() {
    let (mut game, ids) = seated(4);
    for step in 1..=4 {
        advance_turn(&mut game);
        let expected = ids[step % 4];
        assert_eq!(game.current_player, Some(expected), "step {step}");
    }
}

#[test]
fn rotation_skips_spectators_and_eliminated_players() {
    let (mut game, ids) = seated(4);
    game.player_mut(ids[1]).expect("seated").is_spectator = true;
    game.player_mut(ids[2]).expect("seated").lives = 0;

    advance_turn(&mut game);
    assert_eq!(game.current_player, Some(ids[3]));
    advance_turn(&mut game);
    assert_eq!(game.current_player, Some(ids[0]));
}

#[test]
fn advance_rewrites_permission_flags() {
    let (mut game, ids) = seated(3);
    advance_turn(&mut game);
    let next = game.player(ids[1]).expect("seated");
    assert!(next.can_draw);
    assert!(!next.can_discard);
    assert!(next.can_knock, "knocking is allowed before anyone knocks");
    assert!(!next.is_knockee);
    assert_eq!(next.turn_count, 1);
    assert!(!game.drawn_this_turn);
}

#[test]
fn knocking_is_not_offered_during_the_endgame() {
    let (mut game, ids) = seated(3);
    after_knock(&mut game, ids[0]);
    advance_turn(&mut game);
    let knockee = game.player(ids[1]).expect("seated");
    assert!(knockee.can_draw);
    assert!(!knockee.can_knock);
    assert!(knockee.is_knockee);
}

#[test]
fn knock_flags_every_other_eligible_player() {
    let (mut game, ids) = seated(4);
    game.player_mut(ids[3]).expect("seated").lives = 0;
    after_knock(&mut game, ids[0]);

    assert_eq!(game.phase, Phase::KnockActive);
    assert_eq!(game.knocker, Some(ids[0]));
    assert!(!game.player(ids[0]).expect("seated").is_knockee);
    assert!(game.player(ids[1]).expect("seated").is_knockee);
    assert!(game.player(ids[2]).expect("seated").is_knockee);
    // Dead seats are not knockees
    assert!(!game.player(ids[3]).expect("seated").is_knockee);
}

#[test]
fn draw_locks_the_turn_into_a_discard() {
    let (mut game, ids) = seated(2);
    advance_turn(&mut game);
    assert_eq!(game.current_player, Some(ids[1]));
    after_draw(&mut game, ids[1]);

    let player = game.player(ids[1]).expect("seated");
    assert!(!player.can_draw);
    assert!(player.can_discard);
    assert!(!player.can_knock);
    assert!(game.drawn_this_turn);

    after_discard(&mut game);
    assert_eq!(game.current_player, Some(ids[0]));
    assert!(!game.player(ids[1]).expect("seated").can_discard);
    assert!(!game.drawn_this_turn);
}

#[test]
fn rotation_restarts_from_the_front_when_current_seat_vanishes() {
    let (mut game, ids) = seated(3);
    game.current_player = Some(ids[2]);
    game.remove_player(ids[2]);
    advance_turn(&mut game);
    assert_eq!(game.current_player, Some(ids[0]));
}
