//! Wire protocol: one JSON message per event, tagged by `type`.
//!
//! Each inbound action and outbound event is a variant with a fixed schema;
//! anything that fails to deserialize is rejected at the boundary and never
//! reaches the game state.

use serde::{Deserialize, Serialize};

use crate::domain::snapshot::{
    FinalStandings, GameSnapshot, LobbySnapshot, PlayerPublic, RoundStart, RoundSummary,
};
use crate::domain::{Card, PlayerId};

/// Client -> server actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    JoinGame { name: String },
    PlayerReady { ready: bool },
    StartGame,
    DrawCard { from_deck: bool },
    DiscardCard { card_index: usize },
    KeepTopCard,
    BurnTopCard,
    Knock,
    LeaveGame,
    AckRoundSummary,
    StartNewGame,
}

/// Server -> client events.
#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    LobbyState(LobbySnapshot),
    PlayerJoined {
        id: PlayerId,
        name: String,
    },
    PlayerLeft {
        id: PlayerId,
    },
    GameStarted(RoundStart),
    RoundStarted(RoundStart),
    GameState(GameSnapshot),
    CardDrawn {
        player_id: PlayerId,
        card: Card,
        from_deck: bool,
        players: Vec<PlayerPublic>,
    },
    CardDiscarded {
        player_id: PlayerId,
        card: Card,
        next_player: Option<PlayerId>,
        players: Vec<PlayerPublic>,
        discard_pile_top: Option<Card>,
    },
    TopCardKept {
        player_id: PlayerId,
        card: Card,
        players: Vec<PlayerPublic>,
    },
    TopCardBurned {
        player_id: PlayerId,
        players: Vec<PlayerPublic>,
    },
    PlayerKnocked {
        knocker_id: PlayerId,
    },
    RoundSummary(RoundSummary),
    GameEnded(FinalStandings),
    Error {
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_actions_parse_by_tag() {
        let msg: ClientMsg =
            serde_json::from_str(r#"{"type":"join_game","name":"alice"}"#).expect("parse join");
        assert_eq!(
            msg,
            ClientMsg::JoinGame {
                name: "alice".to_string()
            }
        );

        let msg: ClientMsg =
            serde_json::from_str(r#"{"type":"draw_card","from_deck":false}"#).expect("parse draw");
        assert_eq!(msg, ClientMsg::DrawCard { from_deck: false });

        let msg: ClientMsg = serde_json::from_str(r#"{"type":"knock"}"#).expect("parse knock");
        assert_eq!(msg, ClientMsg::Knock);
    }

    #[test]
    fn malformed_payloads_are_rejected() {
        // Unknown tag
        assert!(serde_json::from_str::<ClientMsg>(r#"{"type":"cheat"}"#).is_err());
        // Missing required field
        assert!(serde_json::from_str::<ClientMsg>(r#"{"type":"join_game"}"#).is_err());
        // Wrong field type
        assert!(
            serde_json::from_str::<ClientMsg>(r#"{"type":"discard_card","card_index":"first"}"#)
                .is_err()
        );
    }

    #[test]
    fn server_events_carry_snake_case_tags() {
        let id = PlayerId::new();
        let json = serde_json::to_value(ServerMsg::PlayerLeft { id }).expect("serialize");
        assert_eq!(json["type"], "player_left");

        let json = serde_json::to_value(ServerMsg::PlayerKnocked { knocker_id: id })
            .expect("serialize");
        assert_eq!(json["type"], "player_knocked");
        assert_eq!(json["knocker_id"], serde_json::to_value(id).expect("id"));
    }
}
