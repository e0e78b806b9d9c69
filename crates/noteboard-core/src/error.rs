//! Error types for noteboard.

use thiserror::Error;

/// Result type alias using noteboard's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for noteboard operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Storage operation failed. Carries a stable, user-safe message; the
    /// underlying cause is logged where it happened and not propagated.
    #[error("{0}")]
    Persistence(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input (rejected before any storage call)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No authenticated identity was supplied
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Forbidden (authenticated but not the owner)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection pool or migration failure (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Error {
    /// Message suitable for showing to an end user.
    ///
    /// Persistence and database failures never leak driver details.
    pub fn user_message(&self) -> String {
        match self {
            Error::Persistence(msg)
            | Error::NotFound(msg)
            | Error::InvalidInput(msg)
            | Error::Unauthorized(msg)
            | Error::Forbidden(msg) => msg.clone(),
            Error::Config(_) | Error::Database(_) => {
                crate::messages::UNEXPECTED_ERROR.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_persistence_is_the_bare_message() {
        let err = Error::Persistence("Failed to create note. Please try again.".to_string());
        assert_eq!(err.to_string(), "Failed to create note. Please try again.");
    }

    #[test]
    fn test_error_display_not_found() {
        let err = Error::NotFound("Note not found".to_string());
        assert_eq!(err.to_string(), "Not found: Note not found");
    }

    #[test]
    fn test_error_display_invalid_input() {
        let err = Error::InvalidInput("Title cannot be empty".to_string());
        assert_eq!(err.to_string(), "Invalid input: Title cannot be empty");
    }

    #[test]
    fn test_error_display_forbidden() {
        let err = Error::Forbidden("not yours".to_string());
        assert_eq!(err.to_string(), "Forbidden: not yours");
    }

    #[test]
    fn test_user_message_strips_prefix() {
        let err = Error::InvalidInput("Title cannot be empty".to_string());
        assert_eq!(err.user_message(), "Title cannot be empty");
    }

    #[test]
    fn test_user_message_hides_database_details() {
        let err = Error::Database(sqlx::Error::PoolTimedOut);
        assert_eq!(err.user_message(), crate::messages::UNEXPECTED_ERROR);
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
