//! The single mutable session record: roster, piles, turn pointer, phase.
//!
//! All mutation funnels through the orchestrator in `services::game_flow`;
//! connection-handling code never touches this state directly.

use std::collections::{HashMap, HashSet};
use std::fmt::{Display, Formatter, Result as FmtResult};

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::cards::Card;
use super::deck::Deck;
use super::rules::{HAND_SIZE, STARTING_LIVES};
use super::scoring::{hand_score, is_automatic_win};

/// Opaque per-connection identity, reused as the player identity.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(Uuid);

impl PlayerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for PlayerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        self.0.fmt(f)
    }
}

/// Lobby/game lifecycle: lobby -> playing -> ended -> lobby (new game).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    #[default]
    Lobby,
    Playing,
    Ended,
}

/// Authoritative round phase. Only ever advances FirstTurn -> PreKnock ->
/// KnockActive within a round; reset to FirstTurn at each new deal.
/// Boolean conveniences are derived from this, never stored separately.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    FirstTurn,
    PreKnock,
    KnockActive,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub hand: Vec<Card>,
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

impl Player {
    /// A spectator joins with no lives and never enters the rotation.
    pub fn new(id: PlayerId, name: impl Into<String>, spectator: bool) -> Self {
        Self {
            id,
            name: name.into(),
            hand: Vec::with_capacity(HAND_SIZE + 1),
            score: 0.0,
            lives: if spectator { 0 } else { STARTING_LIVES },
            turn_count: 0,
            can_draw: false,
            can_discard: false,
            can_knock: false,
            is_knockee: false,
            is_ready: false,
            is_spectator: spectator,
        }
    }

    /// Alive players are the ones in the turn rotation and round outcomes.
    pub fn is_alive(&self) -> bool {
        !self.is_spectator && self.lives > 0
    }

    pub fn clear_turn_flags(&mut self) {
        self.can_draw = false;
        self.can_discard = false;
        self.can_knock = false;
    }

    pub fn rescore(&mut self) {
        self.score = hand_score(&self.hand);
    }
}

/// The single global session.
#[derive(Debug, Clone, Default)]
pub struct Game {
    pub roster: HashMap<PlayerId, Player>,
    /// Join order; the authoritative seat order for turn rotation. Kept
    /// explicitly so rotation never depends on map iteration order.
    pub seats: Vec<PlayerId>,
    pub deck: Deck,
    pub discard_pile: Vec<Card>,
    /// Cards removed from play this round: burned cards and the voided hands
    /// of leavers. Keeps the 52-card ledger checkable at all times.
    pub out_of_play: Vec<Card>,
    pub current_player: Option<PlayerId>,
    pub status: GameStatus,
    pub phase: Phase,
    /// Opener of the current round; rotates to the next eligible seat
    /// between rounds.
    pub first_player: Option<PlayerId>,
    pub knocker: Option<PlayerId>,
    pub drawn_this_turn: bool,
    pub host: Option<PlayerId>,
    pub round_acks: HashSet<PlayerId>,
    pub awaiting_acks: bool,
}

impl Game {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.roster.get(&id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.roster.get_mut(&id)
    }

    /// Players in seat order.
    pub fn players_in_seat_order(&self) -> impl Iterator<Item = &Player> {
        self.seats.iter().filter_map(|id| self.roster.get(id))
    }

    /// Identities eligible for the turn rotation, in seat order.
    pub fn eligible_ids(&self) -> Vec<PlayerId> {
        self.players_in_seat_order()
            .filter(|p| p.is_alive())
            .map(|p| p.id)
            .collect()
    }

    pub fn alive_count(&self) -> usize {
        self.players_in_seat_order()
            .filter(|p| p.is_alive())
            .count()
    }

    pub fn is_first_turn(&self) -> bool {
        self.phase == Phase::FirstTurn
    }

    pub fn knock_active(&self) -> bool {
        self.phase == Phase::KnockActive
    }

    pub fn top_of_discard(&self) -> Option<Card> {
        self.discard_pile.last().copied()
    }

    pub fn add_player(&mut self, player: Player) {
        self.seats.push(player.id);
        self.roster.insert(player.id, player);
    }

    pub fn remove_player(&mut self, id: PlayerId) -> Option<Player> {
        self.seats.retain(|&seat| seat != id);
        self.roster.remove(&id)
    }

    /// Fresh shuffled deck, empty piles, three cards to every alive player.
    /// Spectators keep an empty hand.
    pub fn deal_round(&mut self, rng: &mut impl Rng) {
        self.deck = Deck::shuffled(rng);
        self.discard_pile.clear();
        self.out_of_play.clear();
        self.round_acks.clear();
        let ids: Vec<PlayerId> = self.seats.clone();
        for id in ids {
            let Some(player) = self.roster.get_mut(&id) else {
                continue;
            };
            player.hand.clear();
            if player.is_alive() {
                for _ in 0..HAND_SIZE {
                    if let Some(card) = self.deck.draw() {
                        player.hand.push(card);
                    }
                }
            }
            player.rescore();
        }
    }

    /// Reset per-round bookkeeping and hand the opening turn to `opener`.
    pub fn begin_round(&mut self, opener: PlayerId) {
        self.phase = Phase::FirstTurn;
        self.first_player = Some(opener);
        self.current_player = Some(opener);
        self.knocker = None;
        self.drawn_this_turn = false;
        self.awaiting_acks = false;
        self.round_acks.clear();
        for player in self.roster.values_mut() {
            player.clear_turn_flags();
            player.is_knockee = false;
        }
        // The opener's choices are peek/keep/burn/knock, never a plain draw.
        if let Some(player) = self.roster.get_mut(&opener) {
            player.can_knock = true;
        }
    }

    /// First alive player holding an automatic-win hand, in seat order.
    pub fn first_auto_winner(&self) -> Option<PlayerId> {
        self.players_in_seat_order()
            .find(|p| p.is_alive() && is_automatic_win(&p.hand))
            .map(|p| p.id)
    }

    /// Opener for the next round: the next eligible seat after the previous
    /// opener, wrapping circularly.
    pub fn next_opener(&self) -> Option<PlayerId> {
        let eligible = self.eligible_ids();
        if eligible.is_empty() {
            return None;
        }
        match self
            .first_player
            .and_then(|prev| eligible.iter().position(|&id| id == prev))
        {
            Some(i) => Some(eligible[(i + 1) % eligible.len()]),
            None => eligible.first().copied(),
        }
    }

    /// Cards accounted for across deck, discard, hands, and the out-of-play
    /// ledger. Equals 52 at all times within a round.
    pub fn cards_accounted(&self) -> usize {
        let in_hands: usize = self.roster.values().map(|p| p.hand.len()).sum();
        self.deck.len() + self.discard_pile.len() + self.out_of_play.len() + in_hands
    }
}
