//! Error types for the Critical engine

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Not your turn")]
    NotYourTurn,

    #[error("The game is over")]
    GameOver,

    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    /// A pending defuse, alter or favor blocks the action
    #[error("Action blocked: {0}")]
    Gated(String),

    #[error("Card not held: {0}")]
    MissingCard(String),

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Invalid game action: {0}")]
    InvalidAction(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
