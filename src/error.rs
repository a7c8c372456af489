use thiserror::Error;

use crate::draft::ActionKind;
use crate::stats::HeroId;

/// Protocol violations raised by the draft state machine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("Draft is already completed")]
    AlreadyCompleted,

    #[error("Not a {requested} phase (current turn expects a {expected})")]
    WrongPhase {
        expected: ActionKind,
        requested: ActionKind,
    },

    #[error("Hero {0} is already picked or banned")]
    HeroAlreadyUsed(HeroId),
}

/// Failures of the statistics service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("Statistics service unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed statistics payload: {0}")]
    Malformed(String),

    #[error("Statistics service is not configured (set MLBB_API_URL)")]
    NotConfigured,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Action(#[from] ActionError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Draft state lock poisoned")]
    LockPoisoned,

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("JSON parsing error: {0}")]
    JsonError(String),
}
