//! Error types for navigation client operations

use naviapi_protocol::Verb;
use thiserror::Error;

/// Result type for navigation client operations
pub type NaviClientResult<T> = Result<T, NaviClientError>;

/// Error type for navigation client operations
#[derive(Error, Debug)]
pub enum NaviClientError {
    /// Transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// No reply arrived within the request timeout
    #[error("{verb} timed out")]
    Timeout { verb: Verb },

    /// The pending-call table is full
    #[error("too many pending calls (limit {limit})")]
    TooManyPending { limit: usize },

    /// The pending entry was discarded before a reply was delivered
    #[error("reply for {verb} was dropped")]
    ReplyDropped { verb: Verb },

    /// A reply decoded into a shape that does not belong to the verb
    #[error("unexpected reply for {verb}")]
    UnexpectedReply { verb: Verb },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Transport-specific errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("not connected to the navigation service")]
    NotConnected,

    #[error("Transport closed unexpectedly")]
    Closed,

    #[error("send failed: {0}")]
    SendFailed(String),
}

impl NaviClientError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Errors after which the caller should proceed as if the service
    /// answered with nothing.
    pub fn is_no_result(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Timeout { .. } | Self::ReplyDropped { .. }
        )
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_result_classification() {
        assert!(NaviClientError::from(TransportError::NotConnected).is_no_result());
        assert!(NaviClientError::from(TransportError::SendFailed("boom".into())).is_no_result());
        assert!(
            NaviClientError::Timeout {
                verb: Verb::GetPosition
            }
            .is_no_result()
        );
        assert!(!NaviClientError::TooManyPending { limit: 1 }.is_no_result());
        assert!(!NaviClientError::config("bad").is_no_result());
    }

    #[test]
    fn test_messages() {
        let err = NaviClientError::Timeout {
            verb: Verb::CreateRoute,
        };
        assert_eq!(err.to_string(), "navicore_createroute timed out");
        assert!(err.is_timeout());
    }
}
