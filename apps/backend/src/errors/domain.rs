//! Rules-level error type shared by the orchestrator and transport layers.
//!
//! Every variant is user-facing and non-fatal: the session reports it back
//! over the `error` event and the game state is left untouched. Validation
//! always happens before any write.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Authorization error kinds: the actor lacks the right to act.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum UnauthorizedKind {
    NotHost,
    NotYourTurn,
    UnknownPlayer,
}

/// Phase/permission violation kinds: the action exists but is not legal in
/// the current phase or without the required flag.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PhaseKind {
    CannotDraw,
    CannotDiscard,
    CannotKnock,
    NotFirstTurn,
    NotInLobby,
    NotReady,
    GameNotStarted,
    GameNotOver,
    AlreadyJoined,
    SummaryPending,
    NoSummaryPending,
}

/// Structurally impossible requests: bad index, exhausted pile.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StructuralKind {
    EmptyDeck,
    EmptyDiscard,
    BadCardIndex,
    MalformedPayload,
}

/// Central rules error type.
#[derive(Debug, Clone, PartialEq)]
pub enum GameError {
    /// Table capacity constraint violated (lobby full, too few to start)
    Capacity(String),
    /// Actor lacks the right to perform the action
    Unauthorized(UnauthorizedKind, String),
    /// Action not legal in the current phase
    Phase(PhaseKind, String),
    /// Structurally impossible request
    Structural(StructuralKind, String),
}

impl Display for GameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            GameError::Capacity(d) => write!(f, "capacity error: {d}"),
            GameError::Unauthorized(kind, d) => write!(f, "unauthorized {kind:?}: {d}"),
            GameError::Phase(kind, d) => write!(f, "phase error {kind:?}: {d}"),
            GameError::Structural(kind, d) => write!(f, "structural error {kind:?}: {d}"),
        }
    }
}

impl Error for GameError {}

impl GameError {
    pub fn capacity(detail: impl Into<String>) -> Self {
        Self::Capacity(detail.into())
    }
    pub fn unauthorized(kind: UnauthorizedKind, detail: impl Into<String>) -> Self {
        Self::Unauthorized(kind, detail.into())
    }
    pub fn phase(kind: PhaseKind, detail: impl Into<String>) -> Self {
        Self::Phase(kind, detail.into())
    }
    pub fn structural(kind: StructuralKind, detail: impl Into<String>) -> Self {
        Self::Structural(kind, detail.into())
    }

    /// Human-readable message carried by the `error` event.
    pub fn detail(&self) -> &str {
        match self {
            GameError::Capacity(d)
            | GameError::Unauthorized(_, d)
            | GameError::Phase(_, d)
            | GameError::Structural(_, d) => d,
        }
    }
}
