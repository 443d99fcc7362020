//! Connection registry: routes orchestrator output to live sessions.

use actix::{Message, Recipient};
use dashmap::DashMap;
use tracing::warn;

use crate::domain::PlayerId;
use crate::services::game_flow::{Audience, Outbound};

/// Serialized frame pushed to a session actor for delivery.
#[derive(Message, Clone)]
#[rtype(result = "()")]
pub struct Frame(pub String);

#[derive(Default)]
pub struct ConnectionRegistry {
    sessions: DashMap<PlayerId, Recipient<Frame>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    pub fn register(&self, id: PlayerId, recipient: Recipient<Frame>) {
        self.sessions.insert(id, recipient);
    }

    pub fn unregister(&self, id: PlayerId) {
        self.sessions.remove(&id);
    }

    /// Deliver a batch of scoped events. Serialization happens once per
    /// event; delivery is fire-and-forget into each session's mailbox.
    pub fn deliver(&self, outbound: &[Outbound]) {
        for event in outbound {
            let text = match serde_json::to_string(&event.message) {
                Ok(text) => text,
                Err(err) => {
                    warn!(error = %err, "failed to serialize outbound event");
                    continue;
                }
            };
            match event.audience {
                Audience::Everyone => {
                    for entry in self.sessions.iter() {
                        entry.value().do_send(Frame(text.clone()));
                    }
                }
                Audience::One(id) => {
                    if let Some(recipient) = self.sessions.get(&id) {
                        recipient.do_send(Frame(text.clone()));
                    }
                }
                Audience::Except(id) => {
                    for entry in self.sessions.iter() {
                        if *entry.key() != id {
                            entry.value().do_send(Frame(text.clone()));
                        }
                    }
                }
            }
        }
    }
}
