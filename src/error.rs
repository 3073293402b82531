//! Error types surfaced by the client.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed credentials / configuration, raised before any request is sent.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The service answered with `success: false`. Displays the server message verbatim.
    #[error("{0}")]
    Remote(String),

    /// Anything below the envelope layer.
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("transaction monitoring requires a running tokio runtime")]
    NoRuntime,
}

impl Error {
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API request failed: {status} {body}")]
    Status { status: u16, body: String },

    #[error("failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_displays_message_verbatim() {
        let err = Error::Remote("NOPE".to_string());
        assert_eq!(err.to_string(), "NOPE");
        assert!(err.is_remote());
        assert!(!err.is_transport());
    }

    #[test]
    fn test_transport_error_is_transparent() {
        let err: Error = TransportError::Status {
            status: 502,
            body: "bad gateway".to_string(),
        }
        .into();
        assert!(err.is_transport());
        assert_eq!(err.to_string(), "API request failed: 502 bad gateway");
    }
}
