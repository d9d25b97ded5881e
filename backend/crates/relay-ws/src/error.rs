use crate::ConnectionId;

use relay_core::CoreError;

use std::panic::Location;
use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WsError {
    #[error("Validation failed: {message} {location}")]
    Validation {
        message: String,
        field: Option<String>,
        location: ErrorLocation,
    },

    #[error("History file {path} is corrupt: {source} {location}")]
    CorruptLog {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },

    #[error("History file {path} could not be read: {source} {location}")]
    LogRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Failed to persist history to {path}: {source} {location}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Delivery to connection {connection_id} failed: {reason} {location}")]
    Delivery {
        connection_id: ConnectionId,
        reason: String,
        location: ErrorLocation,
    },

    #[error("Handshake rejected: {reason} {location}")]
    Handshake {
        reason: String,
        location: ErrorLocation,
    },

    #[error("Connection closed: {reason} {location}")]
    ConnectionClosed {
        reason: String,
        location: ErrorLocation,
    },

    #[error("Send timed out after {timeout_secs}s, client too slow {location}")]
    SendTimeout {
        timeout_secs: u64,
        location: ErrorLocation,
    },

    #[error("Heartbeat timeout after {timeout_secs}s {location}")]
    HeartbeatTimeout {
        timeout_secs: u64,
        location: ErrorLocation,
    },

    #[error("Connection limit exceeded: {current} connections (max: {max}) {location}")]
    ConnectionLimitExceeded {
        current: usize,
        max: usize,
        location: ErrorLocation,
    },

    #[error("JSON encode failed: {source} {location}")]
    Encode {
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },
}

impl WsError {
    /// Machine-readable code surfaced to HTTP clients
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::CorruptLog { .. } => "CORRUPT_LOG",
            Self::LogRead { .. } => "LOG_READ",
            Self::Persist { .. } => "PERSIST_ERROR",
            Self::Delivery { .. } => "DELIVERY_ERROR",
            Self::Handshake { .. } => "HANDSHAKE_ERROR",
            Self::ConnectionClosed { .. } => "CONNECTION_CLOSED",
            Self::SendTimeout { .. } => "SLOW_CLIENT",
            Self::HeartbeatTimeout { .. } => "HEARTBEAT_TIMEOUT",
            Self::ConnectionLimitExceeded { .. } => "CONNECTION_LIMIT",
            Self::Encode { .. } => "ENCODE_ERROR",
        }
    }
}

impl From<CoreError> for WsError {
    #[track_caller]
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::Validation { message, field, .. } => Self::Validation {
                message,
                field,
                location: ErrorLocation::from(Location::caller()),
            },
        }
    }
}

impl From<serde_json::Error> for WsError {
    #[track_caller]
    fn from(source: serde_json::Error) -> Self {
        Self::Encode {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, WsError>;
