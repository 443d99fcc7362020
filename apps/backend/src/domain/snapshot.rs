//! Outbound views of the game state.
//!
//! Hands are public on the wire; the single secrecy rule in this game is
//! the peeked top-of-deck card, visible only to the opener while the
//! opening turn is still undecided.

use serde::{Deserialize, Serialize};

use super::cards::Card;
use super::rules::MAX_PLAYERS;
use super::state::{Game, GameStatus, Phase, Player, PlayerId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerPublic {
    pub id: PlayerId,
    pub name: String,
    pub cards: Vec<Card>,
    pub score: f32,
    pub lives: u8,
    pub turn_count: u32,
    pub can_draw: bool,
    pub can_discard: bool,
    pub can_knock: bool,
    pub is_knockee: bool,
    pub is_ready: bool,
    pub is_spectator: bool,
}

impl From<&Player> for PlayerPublic {
    fn from(p: &Player) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            cards: p.hand.clone(),
            score: p.score,
            lives: p.lives,
            turn_count: p.turn_count,
            can_draw: p.can_draw,
            can_discard: p.can_discard,
            can_knock: p.can_knock,
            is_knockee: p.is_knockee,
            is_ready: p.is_ready,
            is_spectator: p.is_spectator,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LobbyPlayer {
    pub id: PlayerId,
    pub name: String,
    pub is_ready: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LobbySnapshot {
    pub players: Vec<LobbyPlayer>,
    pub host_id: Option<PlayerId>,
    pub max_players: usize,
}

/// Recurring full snapshot pushed after every mutating action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub players: Vec<PlayerPublic>,
    pub current_player: Option<PlayerId>,
    pub discard_pile_top: Option<Card>,
    pub status: GameStatus,
    pub phase: Phase,
    /// Derived convenience for clients; the phase is authoritative.
    pub first_turn: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_deck_card: Option<Card>,
}

/// Payload for `game_started` / `round_started`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundStart {
    pub players: Vec<PlayerPublic>,
    pub current_player: Option<PlayerId>,
    pub phase: Phase,
    /// Derived convenience for clients; the phase is authoritative.
    pub first_turn: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_deck_card: Option<Card>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryPlayer {
    pub id: PlayerId,
    pub name: String,
    pub score: f32,
    pub lives: u8,
    pub is_spectator: bool,
}

/// Round outcome broadcast, held open until every alive player acknowledges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub players: Vec<SummaryPlayer>,
    pub loser_id: Option<PlayerId>,
    pub loser_name: Option<String>,
    pub lowest_score: f32,
    pub winner_id: Option<PlayerId>,
    pub winner_name: Option<String>,
    pub automatic_win: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalStandings {
    pub winner: Option<String>,
    pub players: Vec<SummaryPlayer>,
}

/// Whether `viewer` may see the deck's top card right now: only the opener,
/// only during the opening turn, only before they have acted on it.
pub fn peek_visible_to(game: &Game, viewer: PlayerId) -> bool {
    game.status == GameStatus::Playing
        && !game.awaiting_acks
        && game.phase == Phase::FirstTurn
        && !game.drawn_this_turn
        && game.current_player == Some(viewer)
        && game.first_player == Some(viewer)
}

pub fn lobby_snapshot(game: &Game) -> LobbySnapshot {
    LobbySnapshot {
        players: game
            .players_in_seat_order()
            .map(|p| LobbyPlayer {
                id: p.id,
                name: p.name.clone(),
                is_ready: p.is_ready,
            })
            .collect(),
        host_id: game.host,
        max_players: MAX_PLAYERS,
    }
}

pub fn players_public(game: &Game) -> Vec<PlayerPublic> {
    game.players_in_seat_order().map(PlayerPublic::from).collect()
}

pub fn game_snapshot(game: &Game, viewer: Option<PlayerId>) -> GameSnapshot {
    let top_deck_card = viewer
        .filter(|&v| peek_visible_to(game, v))
        .and_then(|_| game.deck.peek_top());
    GameSnapshot {
        players: players_public(game),
        current_player: game.current_player,
        discard_pile_top: game.top_of_discard(),
        status: game.status,
        phase: game.phase,
        first_turn: game.is_first_turn(),
        top_deck_card,
    }
}

pub fn round_start(game: &Game, viewer: Option<PlayerId>) -> RoundStart {
    let top_deck_card = viewer
        .filter(|&v| peek_visible_to(game, v))
        .and_then(|_| game.deck.peek_top());
    RoundStart {
        players: players_public(game),
        current_player: game.current_player,
        phase: game.phase,
        first_turn: game.is_first_turn(),
        top_deck_card,
    }
}

pub fn summary_players(game: &Game) -> Vec<SummaryPlayer> {
    game.players_in_seat_order()
        .map(|p| SummaryPlayer {
            id: p.id,
            name: p.name.clone(),
            score: p.score,
            lives: p.lives,
            is_spectator: p.is_spectator,
        })
        .collect()
}
