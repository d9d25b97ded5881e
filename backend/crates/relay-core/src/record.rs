use crate::{CoreError, ErrorLocation, Result as CoreResult};

use std::panic::Location;

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

/// Wall-clock precision stored with every accepted record ("HH:MM")
pub const TIMESTAMP_FORMAT: &str = "%H:%M";

/// An accepted submission and the local time it was accepted at.
///
/// Serialized as `{"digits": ..., "time": ...}`, the layout existing
/// history files and browser clients already use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "digits", alias = "payload")]
    pub payload: String,
    #[serde(rename = "time", alias = "timestamp")]
    pub timestamp: String,
}

impl Record {
    /// Validate a raw submission and stamp it with the current local time.
    #[track_caller]
    pub fn accept(raw: &str) -> CoreResult<Self> {
        Self::accept_at(raw, &Local::now())
    }

    /// Same as [`Record::accept`] with an explicit acceptance time.
    #[track_caller]
    pub fn accept_at<Tz: TimeZone>(raw: &str, accepted_at: &DateTime<Tz>) -> CoreResult<Self>
    where
        Tz::Offset: std::fmt::Display,
    {
        let payload = raw.trim();
        if payload.is_empty() {
            return Err(CoreError::Validation {
                message: "`digits` is required".into(),
                field: Some("digits".into()),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(Self {
            payload: payload.to_string(),
            timestamp: accepted_at.format(TIMESTAMP_FORMAT).to_string(),
        })
    }
}
