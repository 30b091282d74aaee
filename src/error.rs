//! ==============================================================================
//! error.rs - error types for the feeder
//! ==============================================================================
//!
//! purpose:
//!     typed errors for the three places the feeder can fail:
//!     - ScheduleError: the time axis cannot be built (fatal, before dispatch)
//!     - TransportError: one submission failed (counted, never fatal)
//!     - ConfigError: the config file or an override is unusable (fatal)
//!
//!     model edge cases (unknown month, unknown crop) never raise. they resolve
//!     to fallback values inside the models.
//!
//! ==============================================================================

use chrono::NaiveDateTime;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ScheduleError {
    /// the configured start lies after the last completed local hour
    #[error("start {start} is after the end of the schedule {end}")]
    StartAfterEnd {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("utc offset of {0} minutes is not a valid fixed offset")]
    InvalidOffset(i32),
}

#[derive(Error, Debug)]
pub enum TransportError {
    /// the collector answered with a non-success status
    #[error("HTTP {0}")]
    Status(u16),

    /// the request never produced a response (connect, timeout, ...)
    #[error("{0}")]
    Request(String),

    #[error("failed to encode reading: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => TransportError::Status(status.as_u16()),
            None => TransportError::Request(e.to_string()),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {key}: {message}")]
    Invalid { key: String, message: String },
}

impl ConfigError {
    pub(crate) fn invalid(key: &str, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_failure_converts() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = TransportError::from(json_err);
        assert!(matches!(err, TransportError::Encode(_)));
        assert!(err.to_string().starts_with("failed to encode reading:"));
    }

    #[test]
    fn test_transport_descriptor_prefers_status() {
        assert_eq!(TransportError::Status(503).to_string(), "HTTP 503");
        assert_eq!(
            TransportError::Request("connection refused".into()).to_string(),
            "connection refused"
        );
    }
}
