//! Round resolution, the acknowledgement gate, and round/game rollover.

use tracing::info;

use super::{FlowResult, GameFlowService, Outbound};
use crate::domain::snapshot::{self, FinalStandings, RoundSummary};
use crate::domain::{Game, GameStatus, PlayerId, AUTOMATIC_WIN_SCORE};
use crate::errors::domain::{GameError, PhaseKind, UnauthorizedKind};
use crate::protocol::ServerMsg;

impl GameFlowService {
    /// Open a freshly dealt round: if the deal itself produced a 31 the
    /// round resolves before any turn; otherwise pick the opener and
    /// broadcast the round start. `first` selects the opener for a new game
    /// (front of the seat order) versus the rotated opener between rounds.
    pub(crate) fn launch_round(&self, game: &mut Game, first: bool) -> Vec<Outbound> {
        if let Some(winner) = game.first_auto_winner() {
            return self.settle_automatic_win(game, winner);
        }
        let opener = if first {
            game.eligible_ids().first().copied()
        } else {
            game.next_opener()
        };
        let Some(opener) = opener else {
            return self.end_game(game);
        };
        game.begin_round(opener);
        info!(opener = %opener, first, "round started");

        let make = |viewer| {
            let payload = snapshot::round_start(game, viewer);
            if first {
                ServerMsg::GameStarted(payload)
            } else {
                ServerMsg::RoundStarted(payload)
            }
        };
        // Only the opener's copy carries the peeked top card.
        vec![
            Outbound::one(opener, make(Some(opener))),
            Outbound::except(opener, make(None)),
        ]
    }

    /// Knock resolution: the strictly lowest scorer among the living loses a
    /// life. Ties go against the earliest seat — a documented convention,
    /// not a rule of the game.
    pub(crate) fn resolve_knock_round(&self, game: &mut Game) -> Vec<Outbound> {
        let mut lowest: Option<(PlayerId, f32)> = None;
        for player in game.players_in_seat_order().filter(|p| p.lives > 0) {
            if lowest.map_or(true, |(_, low)| player.score < low) {
                lowest = Some((player.id, player.score));
            }
        }

        let mut loser_id = None;
        let mut loser_name = None;
        let mut lowest_score = 0.0;
        if let Some((id, score)) = lowest {
            lowest_score = score;
            loser_id = Some(id);
            if let Some(player) = game.player_mut(id) {
                player.lives = player.lives.saturating_sub(1);
                if player.lives == 0 {
                    player.is_spectator = true;
                }
                loser_name = Some(player.name.clone());
            }
        }
        info!(loser = ?loser_id, %lowest_score, "knock round resolved");

        self.open_ack_gate(game);
        vec![Outbound::all(ServerMsg::RoundSummary(RoundSummary {
            players: snapshot::summary_players(game),
            loser_id,
            loser_name,
            lowest_score,
            winner_id: None,
            winner_name: None,
            automatic_win: false,
        }))]
    }

    /// A hand of exactly 31 ends the round at once: every other living
    /// player loses a life simultaneously.
    pub(crate) fn settle_automatic_win(&self, game: &mut Game, winner: PlayerId) -> Vec<Outbound> {
        let winner_name = game.player(winner).map(|p| p.name.clone());
        for player in game.roster.values_mut() {
            if player.id != winner && player.lives > 0 {
                player.lives -= 1;
                if player.lives == 0 {
                    player.is_spectator = true;
                }
            }
        }
        info!(winner = %winner, "automatic win");

        self.open_ack_gate(game);
        vec![Outbound::all(ServerMsg::RoundSummary(RoundSummary {
            players: snapshot::summary_players(game),
            loser_id: None,
            loser_name: None,
            lowest_score: AUTOMATIC_WIN_SCORE,
            winner_id: Some(winner),
            winner_name,
            automatic_win: true,
        }))]
    }

    /// Record an acknowledgement of the round summary. Spectators may ack
    /// but only the living gate the round.
    pub fn ack_round_summary(&self, game: &mut Game, actor: PlayerId) -> FlowResult {
        if !game.awaiting_acks {
            return Err(GameError::phase(
                PhaseKind::NoSummaryPending,
                "No round summary to acknowledge",
            ));
        }
        if game.player(actor).is_none() {
            return Err(GameError::unauthorized(
                UnauthorizedKind::UnknownPlayer,
                "Player is not at the table",
            ));
        }
        game.round_acks.insert(actor);
        Ok(self.finish_round_if_acked(game))
    }

    /// Once every alive player has acknowledged: either the game is over
    /// (one or zero players standing) or the next round is dealt.
    pub(crate) fn finish_round_if_acked(&self, game: &mut Game) -> Vec<Outbound> {
        let alive = game.eligible_ids();
        if !alive.iter().all(|id| game.round_acks.contains(id)) {
            return Vec::new();
        }
        if alive.len() <= 1 {
            return self.end_game(game);
        }
        let mut rng = rand::rng();
        game.deal_round(&mut rng);
        self.launch_round(game, false)
    }

    /// Final standings; the host seat passes to the healthiest player so a
    /// new game can be started at the same table.
    pub(crate) fn end_game(&self, game: &mut Game) -> Vec<Outbound> {
        game.status = GameStatus::Ended;
        game.awaiting_acks = false;
        game.round_acks.clear();
        game.current_player = None;
        game.knocker = None;
        game.drawn_this_turn = false;

        let max_lives = game
            .players_in_seat_order()
            .map(|p| p.lives)
            .max()
            .unwrap_or(0);
        let new_host = game
            .players_in_seat_order()
            .find(|p| p.lives == max_lives)
            .map(|p| p.id)
            .or(game.host);
        game.host = new_host;
        let winner = game
            .players_in_seat_order()
            .find(|p| p.is_alive())
            .map(|p| p.name.clone());
        info!(winner = ?winner, "game ended");

        vec![Outbound::all(ServerMsg::GameEnded(FinalStandings {
            winner,
            players: snapshot::summary_players(game),
        }))]
    }

    fn open_ack_gate(&self, game: &mut Game) {
        game.awaiting_acks = true;
        game.round_acks.clear();
    }
}
