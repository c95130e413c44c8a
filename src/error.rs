// src/error.rs
// =============================================================================
// Error types for the navigation engine.
//
// Every fetch the explorer makes ends in one of these variants. The state
// machine catches them at the operation boundary (listing load, file open)
// and turns them into the single error message shown to the user.
//
// The application layer (main.rs, cli commands, preferences I/O) keeps using
// anyhow::Result like the rest of the binary; this enum is for the engine.
// =============================================================================

use thiserror::Error;

/// Everything that can go wrong while locating a repository or fetching
/// its contents.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExplorerError {
    /// The input could not be parsed as a GitHub repository URL.
    #[error("invalid repository URL '{0}': enter a URL like https://github.com/owner/repo")]
    InvalidUrl(String),

    /// Non-2xx response or transport failure (including timeouts).
    /// `code` is `None` when no HTTP response was received at all.
    #[error("{}", network_message(.code, .message))]
    NetworkFailure { code: Option<u16>, message: String },

    /// The path does not exist in the repository (HTTP 404).
    #[error("not found: {0}")]
    NotFound(String),

    /// The API refused the request (HTTP 401/403, usually rate limiting).
    #[error("access denied by the hosting service (HTTP {0})")]
    Unauthorized(u16),

    /// The contents API answered with an encoding we do not decode.
    #[error("unsupported file content response (encoding: {})", .0.as_deref().unwrap_or("none"))]
    UnsupportedEncoding(Option<String>),

    /// The request was superseded by a newer one. Never shown to the user.
    #[error("request cancelled")]
    Cancelled,
}

fn network_message(code: &Option<u16>, message: &str) -> String {
    match code {
        Some(code) => format!("request failed (HTTP {code}): {message}"),
        None => format!("request failed: {message}"),
    }
}

impl ExplorerError {
    /// Shorthand for a transport-level failure without a status code.
    pub fn transport(message: impl Into<String>) -> Self {
        ExplorerError::NetworkFailure {
            code: None,
            message: message.into(),
        }
    }

    /// Whether re-navigating to the same location may succeed.
    ///
    /// A 403 is usually the rate limit and clears once the window resets;
    /// a 401 does not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ExplorerError::NetworkFailure { .. } | ExplorerError::Unauthorized(403)
        )
    }
}

/// Convenience alias used by the engine modules.
pub type ExplorerResult<T> = Result<T, ExplorerError>;
