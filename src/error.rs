//! Error types for the SMS bridge.

/// Top-level error type for the bridge.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Relay error: {0}")]
    Relay(#[from] RelayError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors raised while bridging a single inbound event.
///
/// Only `Transport` is an operational incident — everything else is an
/// expected outcome that the webhook layer logs and drops without failing
/// the HTTP response.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Malformed or incomplete inbound payload. Drop the event.
    #[error("invalid payload: {0}")]
    Validation(String),

    /// A referenced user or conversation does not exist. Drop the event.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The platform user has no phone on file. Terminal for this event.
    #[error("user {user_id} has no phone on file")]
    MissingPhone { user_id: String },

    /// A non-empty phone string could not be parsed. Terminal for this event.
    #[error("unparseable phone number {raw:?}: {reason}")]
    Parse { raw: String, reason: String },

    /// Collaborator API network or 5xx failure. Propagates to the caller.
    #[error("transport error: {0}")]
    Transport(String),
}

impl RelayError {
    /// Whether this error should be logged as a genuine operational
    /// incident rather than a routine dropped event.
    pub fn is_transport(&self) -> bool {
        matches!(self, RelayError::Transport(_))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        RelayError::Validation(message.into())
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        RelayError::Transport(err.to_string())
    }
}

/// Result type alias for the bridge.
pub type Result<T> = std::result::Result<T, Error>;
