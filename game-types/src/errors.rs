use thiserror::Error;

/// Error taxonomy for the game state service. Handlers translate each
/// variant to a transport status; business rules live behind these errors
/// in the service layer, not in the handlers.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0} already exists")]
    Conflict(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for GameError {
    fn from(err: sea_orm::DbErr) -> Self {
        GameError::Internal(err.to_string())
    }
}

impl GameError {
    pub fn invalid(message: impl Into<String>) -> Self {
        GameError::InvalidInput(message.into())
    }
}
