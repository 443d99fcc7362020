//! In-round player actions: draw, discard, keep, burn, knock.

use tracing::debug;

use super::{FlowResult, GameFlowService, Outbound};
use crate::domain::snapshot;
use crate::domain::turns::{
    advance_turn, after_burn, after_discard, after_draw, after_keep, after_knock,
};
use crate::domain::{is_automatic_win, Game, Phase, PlayerId};
use crate::errors::domain::{GameError, PhaseKind, StructuralKind, UnauthorizedKind};
use crate::protocol::ServerMsg;

impl GameFlowService {
    /// Draw one card, from the deck top or the discard top. The player then
    /// holds four cards and must discard.
    pub fn draw_card(&self, game: &mut Game, actor: PlayerId, from_deck: bool) -> FlowResult {
        self.ensure_turn(game, actor)?;
        if !game.player(actor).map(|p| p.can_draw).unwrap_or(false) {
            return Err(GameError::phase(
                PhaseKind::CannotDraw,
                "Cannot draw card at this time",
            ));
        }
        if !from_deck && game.discard_pile.is_empty() {
            return Err(GameError::structural(
                StructuralKind::EmptyDiscard,
                "Cannot draw from an empty discard pile",
            ));
        }

        let card = if from_deck {
            game.deck.draw()
        } else {
            game.discard_pile.pop()
        }
        .ok_or_else(|| {
            GameError::structural(StructuralKind::EmptyDeck, "No cards available to draw")
        })?;

        let player = game.player_mut(actor).ok_or_else(|| {
            GameError::unauthorized(UnauthorizedKind::UnknownPlayer, "Player is not at the table")
        })?;
        player.hand.push(card);
        player.rescore();
        let auto_win = is_automatic_win(&player.hand);
        after_draw(game, actor);
        debug!(player_id = %actor, from_deck, "card drawn");

        let mut out = vec![Outbound::all(ServerMsg::CardDrawn {
            player_id: actor,
            card,
            from_deck,
            players: snapshot::players_public(game),
        })];
        if auto_win {
            out.extend(self.settle_automatic_win(game, actor));
        } else {
            out.extend(self.broadcast_game_state(game));
        }
        Ok(out)
    }

    /// Discard exactly one card by hand index, ending the turn. In the
    /// knock endgame, the discard that hands the turn back to the knocker
    /// resolves the round instead.
    pub fn discard_card(&self, game: &mut Game, actor: PlayerId, card_index: usize) -> FlowResult {
        self.ensure_turn(game, actor)?;
        {
            let player = game.player(actor).ok_or_else(|| {
                GameError::unauthorized(
                    UnauthorizedKind::UnknownPlayer,
                    "Player is not at the table",
                )
            })?;
            if !player.can_discard {
                return Err(GameError::phase(
                    PhaseKind::CannotDiscard,
                    "Cannot discard card at this time",
                ));
            }
            if card_index >= player.hand.len() {
                return Err(GameError::structural(
                    StructuralKind::BadCardIndex,
                    format!("No card at index {card_index}"),
                ));
            }
        }

        let card = {
            let player = game.player_mut(actor).ok_or_else(|| {
                GameError::unauthorized(
                    UnauthorizedKind::UnknownPlayer,
                    "Player is not at the table",
                )
            })?;
            let card = player.hand.remove(card_index);
            player.rescore();
            card
        };
        game.discard_pile.push(card);
        debug!(player_id = %actor, %card, "card discarded");

        // A discard down to 31 still wins immediately, mid-turn.
        if game
            .player(actor)
            .map(|p| is_automatic_win(&p.hand))
            .unwrap_or(false)
        {
            return Ok(self.settle_automatic_win(game, actor));
        }

        if game.phase == Phase::FirstTurn {
            game.phase = Phase::PreKnock;
        }
        after_discard(game);

        let mut out = vec![Outbound::all(ServerMsg::CardDiscarded {
            player_id: actor,
            card,
            next_player: game.current_player,
            players: snapshot::players_public(game),
            discard_pile_top: Some(card),
        })];
        if game.knock_active() && game.current_player == game.knocker {
            out.extend(self.resolve_knock_round(game));
        } else {
            out.extend(self.broadcast_game_state(game));
        }
        Ok(out)
    }

    /// Opening turn only: take the peeked top card into hand, then discard.
    pub fn keep_top_card(&self, game: &mut Game, actor: PlayerId) -> FlowResult {
        self.ensure_opening_choice(game, actor)?;
        let card = game.deck.draw().ok_or_else(|| {
            GameError::structural(StructuralKind::EmptyDeck, "No card available to keep")
        })?;
        let player = game.player_mut(actor).ok_or_else(|| {
            GameError::unauthorized(UnauthorizedKind::UnknownPlayer, "Player is not at the table")
        })?;
        player.hand.push(card);
        player.rescore();
        let auto_win = is_automatic_win(&player.hand);
        after_keep(game, actor);
        debug!(player_id = %actor, "top card kept");

        let mut out = vec![Outbound::all(ServerMsg::TopCardKept {
            player_id: actor,
            card,
            players: snapshot::players_public(game),
        })];
        if auto_win {
            out.extend(self.settle_automatic_win(game, actor));
        } else {
            out.extend(self.broadcast_game_state(game));
        }
        Ok(out)
    }

    /// Opening turn only: discard the peeked card out of play sight-unseen,
    /// then immediately draw a replacement from the deck.
    pub fn burn_top_card(&self, game: &mut Game, actor: PlayerId) -> FlowResult {
        self.ensure_opening_choice(game, actor)?;
        if game.deck.len() < 2 {
            return Err(GameError::structural(
                StructuralKind::EmptyDeck,
                "Not enough cards left to burn",
            ));
        }
        let burned = game.deck.draw().ok_or_else(|| {
            GameError::structural(StructuralKind::EmptyDeck, "No card available to burn")
        })?;
        game.out_of_play.push(burned);
        let drawn = game.deck.draw().ok_or_else(|| {
            GameError::structural(StructuralKind::EmptyDeck, "No card available to draw after burn")
        })?;
        let player = game.player_mut(actor).ok_or_else(|| {
            GameError::unauthorized(UnauthorizedKind::UnknownPlayer, "Player is not at the table")
        })?;
        player.hand.push(drawn);
        player.rescore();
        let auto_win = is_automatic_win(&player.hand);
        after_burn(game, actor);
        debug!(player_id = %actor, "top card burned");

        let mut out = vec![Outbound::all(ServerMsg::TopCardBurned {
            player_id: actor,
            players: snapshot::players_public(game),
        })];
        if auto_win {
            out.extend(self.settle_automatic_win(game, actor));
        } else {
            out.extend(self.broadcast_game_state(game));
        }
        Ok(out)
    }

    /// Declare the round over after one more circuit. Legal on the opening
    /// turn (before acting on the peeked card, which is burned) and in the
    /// pre-knock phase before drawing. Knockees can never knock back.
    pub fn knock(&self, game: &mut Game, actor: PlayerId) -> FlowResult {
        self.ensure_turn(game, actor)?;
        if !game.player(actor).map(|p| p.can_knock).unwrap_or(false) {
            return Err(GameError::phase(
                PhaseKind::CannotKnock,
                "Cannot knock at this time",
            ));
        }
        if game.phase == Phase::FirstTurn {
            // The peeked card leaves play with the opening turn.
            let card = game.deck.draw().ok_or_else(|| {
                GameError::structural(StructuralKind::EmptyDeck, "No card left to burn")
            })?;
            game.out_of_play.push(card);
        }
        after_knock(game, actor);
        advance_turn(game);
        debug!(knocker = %actor, "player knocked");

        let mut out = vec![Outbound::all(ServerMsg::PlayerKnocked { knocker_id: actor })];
        out.extend(self.broadcast_game_state(game));
        Ok(out)
    }

    /// Keep/burn preconditions: opening turn, peeked card not yet acted on.
    fn ensure_opening_choice(&self, game: &Game, actor: PlayerId) -> Result<(), GameError> {
        self.ensure_turn(game, actor)?;
        if game.phase != Phase::FirstTurn {
            return Err(GameError::phase(
                PhaseKind::NotFirstTurn,
                "Only the round opener may do that",
            ));
        }
        if game.drawn_this_turn {
            return Err(GameError::phase(
                PhaseKind::NotFirstTurn,
                "The peeked card has already been taken",
            ));
        }
        Ok(())
    }
}
