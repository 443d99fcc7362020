use std::sync::Arc;

use parking_lot::Mutex;

use crate::domain::Game;
use crate::services::game_flow::GameFlowService;
use crate::ws::hub::ConnectionRegistry;

/// Application state containing shared resources: the single game table and
/// the connection registry.
///
/// The mutex is the one mutual-exclusion domain for game truth. Handlers
/// lock, validate-and-mutate, collect the outbound events, and release
/// before any delivery; nothing performs I/O while holding it.
#[derive(Clone)]
pub struct AppState {
    pub game: Arc<Mutex<Game>>,
    pub registry: Arc<ConnectionRegistry>,
    pub flow: GameFlowService,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            game: Arc::new(Mutex::new(Game::new())),
            registry: Arc::new(ConnectionRegistry::new()),
            flow: GameFlowService::new(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
