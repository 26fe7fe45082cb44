//! Error types for the zone pipeline.
//!
//! `InvalidArgument`, `IndexOutOfRange`, `DegenerateHull` and
//! `InvalidTransition` are contract violations: the triggering operation is
//! aborted. `Network` and `Parse` are operational and leave the session in
//! its pre-operation state so the caller can retry.

use shared::ParseError;
use thiserror::Error;

use crate::state::sync::SyncState;

/// Errors raised by the zone pipeline
#[derive(Debug, Error)]
pub enum ZoneError {
    /// Wrong number of points handed to the hull engine
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Read beyond the populated part of the point store
    #[error("index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Fewer than four distinct hull vertices
    #[error("degenerate hull: only {vertices} distinct vertices")]
    DegenerateHull { vertices: usize },

    /// Event not allowed in the current sync state
    #[error("cannot {event} while {state}")]
    InvalidTransition { state: SyncState, event: &'static str },

    /// Publish/download transport failure
    #[error("network error: {0}")]
    Network(String),

    /// Malformed downloaded payload
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

impl ZoneError {
    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Operational failures are reported to the user and may be retried.
    pub fn is_operational(&self) -> bool {
        matches!(self, ZoneError::Network(_) | ZoneError::Parse(_))
    }
}

impl From<reqwest::Error> for ZoneError {
    fn from(err: reqwest::Error) -> Self {
        ZoneError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operational_classification() {
        assert!(ZoneError::network("timeout").is_operational());
        assert!(ZoneError::from(ParseError::TooFewLines {
            expected: 4,
            found: 1
        })
        .is_operational());
        assert!(!ZoneError::invalid_argument("3 points").is_operational());
        assert!(!ZoneError::IndexOutOfRange { index: 4, len: 4 }.is_operational());
    }

    #[test]
    fn test_messages() {
        let err = ZoneError::InvalidTransition {
            state: SyncState::WallBuilt,
            event: "place a point",
        };
        assert_eq!(err.to_string(), "cannot place a point while wall built");
        assert_eq!(
            ZoneError::IndexOutOfRange { index: 2, len: 1 }.to_string(),
            "index 2 out of range (len 1)"
        );
    }
}
