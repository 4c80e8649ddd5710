use std::error::Error as StdError;

/// Crate-wide result type for message and session operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed errors shared by the message sink and session handle.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The underlying transport connection is gone.
    #[error("transport is disconnected")]
    Disconnected,

    /// Input payload or parameter is invalid.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// Wrapped source error from the transport layer.
    #[error("transport write failed: {context}: {source}")]
    Transport {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    #[must_use]
    pub fn invalid_input(message: impl std::fmt::Display) -> Self {
        Self::InvalidInput {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn transport(
        context: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::Transport {
            context: context.into(),
            source: Box::new(source),
        }
    }
}
