//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Errors raised while starting up.
///
/// Domain crates keep their own precise error enums; this type only covers
/// loading configuration and reaching the database.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
