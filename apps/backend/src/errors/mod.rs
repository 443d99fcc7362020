//! Error handling for the game backend.

pub mod domain;

pub use domain::{GameError, PhaseKind, StructuralKind, UnauthorizedKind};
