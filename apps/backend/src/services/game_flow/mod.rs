//! The session orchestrator.
//!
//! Every inbound action is validated here against the current state and the
//! actor's permissions, then applied through the turn engine, and finally
//! turned into a list of scoped outbound events. All game mutation funnels
//! through these methods; rejected actions are strict no-ops.

mod lobby;
mod player_actions;
mod round_lifecycle;

#[cfg(test)]
mod tests_props;

use crate::domain::snapshot;
use crate::domain::{Game, GameStatus, PlayerId};
use crate::errors::domain::{GameError, PhaseKind, UnauthorizedKind};
use crate::protocol::ServerMsg;

/// Who an outbound event goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    Everyone,
    One(PlayerId),
    Except(PlayerId),
}

/// A message the transport layer must deliver after a mutation.
#[derive(Debug, Clone)]
pub struct Outbound {
    pub audience: Audience,
    pub message: ServerMsg,
}

impl Outbound {
    pub fn all(message: ServerMsg) -> Self {
        Self {
            audience: Audience::Everyone,
            message,
        }
    }

    pub fn one(id: PlayerId, message: ServerMsg) -> Self {
        Self {
            audience: Audience::One(id),
            message,
        }
    }

    pub fn except(id: PlayerId, message: ServerMsg) -> Self {
        Self {
            audience: Audience::Except(id),
            message,
        }
    }
}

pub type FlowResult = Result<Vec<Outbound>, GameError>;

/// Stateless orchestrator over the single `Game`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GameFlowService;

impl GameFlowService {
    pub fn new() -> Self {
        Self
    }

    /// Common preconditions for every in-round action: the game is running,
    /// no summary is pending, and the actor holds the turn.
    fn ensure_turn(&self, game: &Game, actor: PlayerId) -> Result<(), GameError> {
        if game.status != GameStatus::Playing {
            return Err(GameError::phase(
                PhaseKind::GameNotStarted,
                "Game is not in progress",
            ));
        }
        if game.awaiting_acks {
            return Err(GameError::phase(
                PhaseKind::SummaryPending,
                "Round summary must be acknowledged first",
            ));
        }
        if game.player(actor).is_none() {
            return Err(GameError::unauthorized(
                UnauthorizedKind::UnknownPlayer,
                "Player is not at the table",
            ));
        }
        if game.current_player != Some(actor) {
            return Err(GameError::unauthorized(
                UnauthorizedKind::NotYourTurn,
                "Not your turn",
            ));
        }
        Ok(())
    }

    /// Full snapshot for everyone, with the opener's copy carrying the
    /// peeked card while the opening turn is undecided.
    fn broadcast_game_state(&self, game: &Game) -> Vec<Outbound> {
        match game
            .current_player
            .filter(|&id| snapshot::peek_visible_to(game, id))
        {
            Some(opener) => vec![
                Outbound::one(
                    opener,
                    ServerMsg::GameState(snapshot::game_snapshot(game, Some(opener))),
                ),
                Outbound::except(
                    opener,
                    ServerMsg::GameState(snapshot::game_snapshot(game, None)),
                ),
            ],
            None => vec![Outbound::all(ServerMsg::GameState(snapshot::game_snapshot(
                game, None,
            )))],
        }
    }
}
