//! Engine error type

use thiserror::Error;

use crate::synergy::module::ModuleId;

/// Errors surfaced by the synergy engine.
///
/// Registration and build errors are hard failures. Condition and effect
/// errors are soft: the dispatcher logs them and keeps going so one broken
/// rule cannot take down its siblings.
#[derive(Error, Debug)]
pub enum SynergyError {
    #[error("synergy `{0}` is already registered")]
    DuplicateId(String),

    #[error("synergy `{0}` requires no modules")]
    EmptyRequirements(String),

    #[error("synergy `{0}` has no effects")]
    NoEffects(String),

    #[error("synergy `{id}` links module `{module}` that is not in its requirement set")]
    DanglingLink { id: String, module: ModuleId },

    #[error("entity no longer exists")]
    MissingEntity(#[from] hecs::NoSuchEntity),

    #[error("entity is missing a component: {0}")]
    MissingComponent(#[from] hecs::ComponentError),

    #[error("condition error: {0}")]
    Condition(String),

    #[error("effect error: {0}")]
    Effect(String),

    #[error("unknown player {0}")]
    UnknownPlayer(uuid::Uuid),
}

pub type Result<T> = std::result::Result<T, SynergyError>;
