//! Per-connection WebSocket actor.
//!
//! The connection id doubles as the player identity. Every text frame is one
//! tagged action; every rules violation comes back as an `error` event on
//! this socket only. Disconnect is treated exactly like an explicit leave.

use std::time::{Duration, Instant};

use actix::{Actor, ActorContext, AsyncContext, Handler, StreamHandler};
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use tracing::{info, warn};

use crate::domain::PlayerId;
use crate::protocol::{ClientMsg, ServerMsg};
use crate::state::app_state::AppState;
use crate::ws::hub::Frame;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let session = WsSession::new(PlayerId::new(), app_state);
    ws::start(session, &req, stream)
}

pub struct WsSession {
    player_id: PlayerId,
    app_state: web::Data<AppState>,
    last_heartbeat: Instant,
}

impl WsSession {
    fn new(player_id: PlayerId, app_state: web::Data<AppState>) -> Self {
        Self {
            player_id,
            app_state,
            last_heartbeat: Instant::now(),
        }
    }

    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMsg) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "failed to serialize outbound message"),
        }
    }

    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(player_id = %actor.player_id, "heartbeat timed out");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
    }

    /// Run one action against the game under the single state lock, then
    /// deliver the resulting events with the lock released.
    fn dispatch(&self, cmd: ClientMsg, ctx: &mut ws::WebsocketContext<Self>) {
        let state = self.app_state.clone();
        let flow = state.flow;
        let actor = self.player_id;

        let result = {
            let mut game = state.game.lock();
            match cmd {
                ClientMsg::JoinGame { name } => flow.join_game(&mut game, actor, name),
                ClientMsg::PlayerReady { ready } => flow.player_ready(&mut game, actor, ready),
                ClientMsg::StartGame => flow.start_game(&mut game, actor),
                ClientMsg::DrawCard { from_deck } => flow.draw_card(&mut game, actor, from_deck),
                ClientMsg::DiscardCard { card_index } => {
                    flow.discard_card(&mut game, actor, card_index)
                }
                ClientMsg::KeepTopCard => flow.keep_top_card(&mut game, actor),
                ClientMsg::BurnTopCard => flow.burn_top_card(&mut game, actor),
                ClientMsg::Knock => flow.knock(&mut game, actor),
                ClientMsg::LeaveGame => flow.leave_game(&mut game, actor),
                ClientMsg::AckRoundSummary => flow.ack_round_summary(&mut game, actor),
                ClientMsg::StartNewGame => flow.start_new_game(&mut game, actor),
            }
        };

        match result {
            Ok(events) => state.registry.deliver(&events),
            Err(err) => {
                Self::send_json(
                    ctx,
                    &ServerMsg::Error {
                        message: err.detail().to_string(),
                    },
                );
            }
        }
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(player_id = %self.player_id, "session started");
        self.app_state
            .registry
            .register(self.player_id, ctx.address().recipient::<Frame>());
        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.app_state.registry.unregister(self.player_id);

        // Disconnect is an implicit leave. A connection that never joined
        // has no seat; that error is expected and dropped.
        let result = {
            let mut game = self.app_state.game.lock();
            self.app_state.flow.leave_game(&mut game, self.player_id)
        };
        if let Ok(events) = result {
            self.app_state.registry.deliver(&events);
        }
        info!(player_id = %self.player_id, "session stopped");
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();
                match serde_json::from_str::<ClientMsg>(&text) {
                    Ok(cmd) => self.dispatch(cmd, ctx),
                    Err(err) => {
                        warn!(player_id = %self.player_id, error = %err, "malformed message");
                        Self::send_json(
                            ctx,
                            &ServerMsg::Error {
                                message: "Malformed message".to_string(),
                            },
                        );
                    }
                }
            }
            Ok(ws::Message::Binary(_)) => {
                self.last_heartbeat = Instant::now();
                Self::send_json(
                    ctx,
                    &ServerMsg::Error {
                        message: "Binary frames are not supported".to_string(),
                    },
                );
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(player_id = %self.player_id, error = %err, "protocol error");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}

impl Handler<Frame> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: Frame, ctx: &mut Self::Context) -> Self::Result {
        ctx.text(msg.0);
    }
}
