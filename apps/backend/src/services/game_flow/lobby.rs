//! Lobby lifecycle: join, ready, start, leave, reset.

use tracing::{debug, info};

use super::{FlowResult, GameFlowService, Outbound};
use crate::domain::snapshot;
use crate::domain::turns::advance_turn;
use crate::domain::{rules, Game, GameStatus, Phase, Player, PlayerId};
use crate::errors::domain::{GameError, PhaseKind, UnauthorizedKind};
use crate::protocol::ServerMsg;

impl GameFlowService {
    /// Admit a connection to the table. A join after the game has started
    /// admits the joiner as a permanent spectator rather than rejecting.
    pub fn join_game(&self, game: &mut Game, actor: PlayerId, name: String) -> FlowResult {
        if game.player(actor).is_some() {
            return Err(GameError::phase(
                PhaseKind::AlreadyJoined,
                "Already at the table",
            ));
        }
        if game.roster.len() >= rules::MAX_PLAYERS {
            return Err(GameError::capacity("Lobby is full"));
        }

        let spectator = game.status != GameStatus::Lobby;
        game.add_player(Player::new(actor, name.clone(), spectator));
        if game.host.is_none() {
            game.host = Some(actor);
        }
        info!(player_id = %actor, name = %name, spectator, "player joined");

        let mut out = vec![
            Outbound::all(ServerMsg::LobbyState(snapshot::lobby_snapshot(game))),
            Outbound::all(ServerMsg::PlayerJoined { id: actor, name }),
        ];
        if game.status == GameStatus::Playing {
            // Late joiners spectate; hand them the board right away.
            out.push(Outbound::one(
                actor,
                ServerMsg::GameState(snapshot::game_snapshot(game, None)),
            ));
        }
        Ok(out)
    }

    pub fn player_ready(&self, game: &mut Game, actor: PlayerId, ready: bool) -> FlowResult {
        if game.status != GameStatus::Lobby {
            return Err(GameError::phase(
                PhaseKind::NotInLobby,
                "Readiness only applies in the lobby",
            ));
        }
        let player = game.player_mut(actor).ok_or_else(|| {
            GameError::unauthorized(UnauthorizedKind::UnknownPlayer, "Player is not at the table")
        })?;
        player.is_ready = ready;
        debug!(player_id = %actor, ready, "readiness changed");
        Ok(vec![Outbound::all(ServerMsg::LobbyState(
            snapshot::lobby_snapshot(game),
        ))])
    }

    /// Host-only. Deals the first round; if the deal itself hands someone 31
    /// the round resolves before any turn is taken.
    pub fn start_game(&self, game: &mut Game, actor: PlayerId) -> FlowResult {
        if game.status != GameStatus::Lobby {
            return Err(GameError::phase(
                PhaseKind::NotInLobby,
                "Game already started",
            ));
        }
        if game.host != Some(actor) {
            return Err(GameError::unauthorized(
                UnauthorizedKind::NotHost,
                "Only the host can start the game",
            ));
        }
        if game.roster.len() < rules::MIN_PLAYERS {
            return Err(GameError::capacity("Need at least 2 players to start"));
        }
        if game
            .players_in_seat_order()
            .any(|p| !p.is_spectator && !p.is_ready)
        {
            return Err(GameError::phase(
                PhaseKind::NotReady,
                "All players must be ready to start",
            ));
        }

        game.status = GameStatus::Playing;
        game.first_player = None;
        for player in game.roster.values_mut() {
            // Readiness is lobby-only state.
            player.is_ready = false;
            player.turn_count = 0;
        }
        let mut rng = rand::rng();
        game.deal_round(&mut rng);
        info!(players = game.roster.len(), "game started");
        Ok(self.launch_round(game, true))
    }

    /// Remove a player, whether by explicit leave or disconnect. Their hand
    /// goes out of play; host and current player are re-derived so no
    /// pointer is left dangling.
    pub fn leave_game(&self, game: &mut Game, actor: PlayerId) -> FlowResult {
        if game.player(actor).is_none() {
            return Err(GameError::unauthorized(
                UnauthorizedKind::UnknownPlayer,
                "Player is not at the table",
            ));
        }
        let was_playing = game.status == GameStatus::Playing;

        // The knocker walking away voids the knock; play continues as if
        // nobody had knocked.
        if game.knock_active() && game.knocker == Some(actor) {
            game.knocker = None;
            game.phase = Phase::PreKnock;
            for player in game.roster.values_mut() {
                player.is_knockee = false;
            }
        }

        // The opening privilege leaves with the opener.
        if was_playing && game.phase == Phase::FirstTurn && game.first_player == Some(actor) {
            game.phase = Phase::PreKnock;
        }

        // Hand the turn on while the seat still exists so rotation continues
        // from the departing seat.
        if was_playing && !game.awaiting_acks && game.current_player == Some(actor) {
            advance_turn(game);
            if game.current_player == Some(actor) {
                game.current_player = None;
            }
        }

        if let Some(mut departed) = game.remove_player(actor) {
            game.out_of_play.append(&mut departed.hand);
        }
        game.round_acks.remove(&actor);

        if game.host == Some(actor) {
            game.host = game
                .eligible_ids()
                .first()
                .copied()
                .or_else(|| game.seats.first().copied());
        }
        info!(player_id = %actor, "player left");

        let mut out = vec![Outbound::all(ServerMsg::PlayerLeft { id: actor })];

        if game.roster.is_empty() {
            // Empty table: back to a fresh lobby.
            *game = Game::new();
            return Ok(out);
        }
        out.push(Outbound::all(ServerMsg::LobbyState(
            snapshot::lobby_snapshot(game),
        )));

        if was_playing {
            if game.alive_count() <= 1 {
                // Nobody left to play against; the ack gate would never fire.
                out.extend(self.end_game(game));
            } else if game.awaiting_acks {
                // The departed player no longer gates the round.
                out.extend(self.finish_round_if_acked(game));
            } else if game.knock_active() && game.current_player == game.knocker {
                // Rotation has come back around to the knocker.
                out.extend(self.resolve_knock_round(game));
            } else {
                out.extend(self.broadcast_game_state(game));
            }
        }
        Ok(out)
    }

    /// Host-only, once a game has ended: reset every player for a fresh
    /// lobby at the same table.
    pub fn start_new_game(&self, game: &mut Game, actor: PlayerId) -> FlowResult {
        if game.status != GameStatus::Ended {
            return Err(GameError::phase(
                PhaseKind::GameNotOver,
                "No finished game to reset",
            ));
        }
        if game.host != Some(actor) {
            return Err(GameError::unauthorized(
                UnauthorizedKind::NotHost,
                "Only the host can start a new game",
            ));
        }

        for player in game.roster.values_mut() {
            player.lives = rules::STARTING_LIVES;
            player.score = 0.0;
            player.hand.clear();
            player.turn_count = 0;
            player.clear_turn_flags();
            player.is_knockee = false;
            player.is_ready = false;
            player.is_spectator = false;
        }
        game.status = GameStatus::Lobby;
        game.phase = Phase::FirstTurn;
        game.deck = Default::default();
        game.discard_pile.clear();
        game.out_of_play.clear();
        game.current_player = None;
        game.first_player = None;
        game.knocker = None;
        game.drawn_this_turn = false;
        game.awaiting_acks = false;
        game.round_acks.clear();
        info!(host = %actor, "table reset for a new game");

        Ok(vec![Outbound::all(ServerMsg::LobbyState(
            snapshot::lobby_snapshot(game),
        ))])
    }
}
