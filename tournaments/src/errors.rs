//! Registry error types.

use crate::db::timeouts::TimeoutError;
use crate::player::PlayerId;
use crate::tournament::{TournamentId, TournamentStatus};
use std::time::Duration;
use thiserror::Error;

/// Coarse classification of a [`RegistryError`], used by callers to pick a
/// transport-level response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Referenced entity is absent
    NotFound,
    /// Malformed or out-of-range input, including uniqueness violations
    Validation,
    /// Current state disallows the requested operation
    Conflict,
    /// The store failed or timed out
    Storage,
}

/// Registry errors
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("The tournament does not exist")]
    TournamentNotFound(TournamentId),

    #[error("The player does not exist")]
    PlayerNotFound(PlayerId),

    #[error("The tournament name already exists")]
    DuplicateName(String),

    #[error("The nickname is already taken in this tournament")]
    DuplicateNickname(String),

    #[error("The minimum number of players is 2")]
    InvalidCapacity(i32),

    #[error("The start date is required")]
    MissingStartDate,

    #[error("The start date can not be in the past")]
    PastStartDate,

    #[error("The registration date can not be after the tournament start date")]
    RegistrationAfterStart,

    #[error("The Tournament has started")]
    IllegalTransition,

    #[error("The tournament is already started")]
    AlreadyStarted,

    #[error("The tournament is not open for registration")]
    TournamentNotOpen(TournamentStatus),

    #[error("The tournament is full")]
    CapacityReached { max_players: i32 },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database operation timed out after {0:?}")]
    Timeout(Duration),
}

impl RegistryError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::TournamentNotFound(_) | RegistryError::PlayerNotFound(_) => {
                ErrorKind::NotFound
            }
            RegistryError::DuplicateName(_)
            | RegistryError::DuplicateNickname(_)
            | RegistryError::InvalidCapacity(_)
            | RegistryError::MissingStartDate
            | RegistryError::PastStartDate
            | RegistryError::RegistrationAfterStart => ErrorKind::Validation,
            RegistryError::IllegalTransition
            | RegistryError::AlreadyStarted
            | RegistryError::TournamentNotOpen(_)
            | RegistryError::CapacityReached { .. } => ErrorKind::Conflict,
            RegistryError::Database(_) | RegistryError::Timeout(_) => ErrorKind::Storage,
        }
    }

    /// Whether this error reports a name or nickname collision
    pub fn is_uniqueness_violation(&self) -> bool {
        matches!(
            self,
            RegistryError::DuplicateName(_) | RegistryError::DuplicateNickname(_)
        )
    }

    /// Get a client-safe error message that doesn't leak sensitive information
    ///
    /// Storage errors are sanitized so SQL details never reach the caller.
    pub fn client_message(&self) -> String {
        match self {
            RegistryError::Database(_) => "Internal server error".to_string(),
            RegistryError::Timeout(_) => "Storage temporarily unavailable".to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<TimeoutError> for RegistryError {
    fn from(err: TimeoutError) -> Self {
        match err {
            TimeoutError::Timeout(duration) => RegistryError::Timeout(duration),
            TimeoutError::Database(e) => RegistryError::Database(e),
        }
    }
}

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(RegistryError::TournamentNotFound(1).kind(), ErrorKind::NotFound);
        assert_eq!(RegistryError::PlayerNotFound(1).kind(), ErrorKind::NotFound);
        assert_eq!(RegistryError::InvalidCapacity(1).kind(), ErrorKind::Validation);
        assert_eq!(
            RegistryError::DuplicateNickname("ace".into()).kind(),
            ErrorKind::Validation
        );
        assert_eq!(RegistryError::IllegalTransition.kind(), ErrorKind::Conflict);
        assert_eq!(
            RegistryError::CapacityReached { max_players: 2 }.kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            RegistryError::Timeout(Duration::from_secs(5)).kind(),
            ErrorKind::Storage
        );
    }

    #[test]
    fn test_uniqueness_violation() {
        assert!(RegistryError::DuplicateName("Cup".into()).is_uniqueness_violation());
        assert!(RegistryError::DuplicateNickname("ace".into()).is_uniqueness_violation());
        assert!(!RegistryError::PastStartDate.is_uniqueness_violation());
    }

    #[test]
    fn test_user_facing_messages() {
        assert_eq!(
            RegistryError::IllegalTransition.to_string(),
            "The Tournament has started"
        );
        assert_eq!(
            RegistryError::InvalidCapacity(1).to_string(),
            "The minimum number of players is 2"
        );
        assert_eq!(
            RegistryError::MissingStartDate.to_string(),
            "The start date is required"
        );
        assert_eq!(
            RegistryError::PastStartDate.to_string(),
            "The start date can not be in the past"
        );
        assert_eq!(
            RegistryError::TournamentNotOpen(TournamentStatus::Finished).to_string(),
            "The tournament is not open for registration"
        );
        assert_eq!(
            RegistryError::CapacityReached { max_players: 4 }.to_string(),
            "The tournament is full"
        );
    }

    #[test]
    fn test_client_message_sanitizes_storage_errors() {
        let err = RegistryError::Database(sqlx::Error::RowNotFound);
        assert_eq!(err.client_message(), "Internal server error");

        let err = RegistryError::Timeout(Duration::from_secs(5));
        assert_eq!(err.client_message(), "Storage temporarily unavailable");

        let err = RegistryError::AlreadyStarted;
        assert_eq!(err.client_message(), "The tournament is already started");
    }

    #[test]
    fn test_from_timeout_error() {
        let err: RegistryError = TimeoutError::Timeout(Duration::from_secs(1)).into();
        assert!(matches!(err, RegistryError::Timeout(_)));
    }
}
