//! Second-resolution timestamps used as the reference time for activation checks.
//!
//! Timestamps are stored as unsigned 32-bit seconds since the Unix epoch and are
//! rendered as `YYYY-MM-DDTHH:MM:SS` in UTC, the same form block headers and
//! network configuration files use.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ProtocolError, ProtocolResult};

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A point in time with one-second resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimePointSec(u32);

impl TimePointSec {
    /// The Unix epoch.
    pub const MIN: Self = Self(0);
    /// The latest representable time, used for hardforks that are not scheduled.
    pub const MAXIMUM: Self = Self(u32::MAX);

    #[must_use]
    pub const fn from_secs(secs: u32) -> Self {
        Self(secs)
    }

    #[must_use]
    pub const fn secs(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn saturating_add(self, secs: u32) -> Self {
        Self(self.0.saturating_add(secs))
    }

    #[must_use]
    pub const fn saturating_sub(self, secs: u32) -> Self {
        Self(self.0.saturating_sub(secs))
    }

    /// Parses `YYYY-MM-DDTHH:MM:SS`, with or without a trailing `Z`.
    pub fn parse(value: &str) -> ProtocolResult<Self> {
        let invalid = |reason: String| ProtocolError::InvalidTimestamp {
            value: value.to_string(),
            reason,
        };

        let trimmed = value.trim();
        let trimmed = trimmed.strip_suffix('Z').unwrap_or(trimmed);
        let naive = NaiveDateTime::parse_from_str(trimmed, ISO_FORMAT)
            .map_err(|err| invalid(err.to_string()))?;
        let secs = naive.and_utc().timestamp();
        u32::try_from(secs)
            .map(Self)
            .map_err(|_| invalid("outside the 32-bit seconds range".to_string()))
    }

    /// Formats the timestamp as `YYYY-MM-DDTHH:MM:SS`.
    #[must_use]
    pub fn to_iso_string(self) -> String {
        match DateTime::from_timestamp(i64::from(self.0), 0) {
            Some(datetime) => datetime.format(ISO_FORMAT).to_string(),
            None => self.0.to_string(),
        }
    }
}

impl From<u32> for TimePointSec {
    fn from(secs: u32) -> Self {
        Self(secs)
    }
}

impl fmt::Display for TimePointSec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso_string())
    }
}

impl FromStr for TimePointSec {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for TimePointSec {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_iso_string())
    }
}

struct TimePointSecVisitor;

impl<'de> Visitor<'de> for TimePointSecVisitor {
    type Value = TimePointSec;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an ISO-8601 timestamp or seconds since the Unix epoch")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        TimePointSec::parse(value).map_err(E::custom)
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        u32::try_from(value)
            .map(TimePointSec)
            .map_err(|_| E::custom(format!("timestamp {value} exceeds 32-bit seconds")))
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        u32::try_from(value)
            .map(TimePointSec)
            .map_err(|_| E::custom(format!("timestamp {value} is outside 32-bit seconds")))
    }
}

impl<'de> Deserialize<'de> for TimePointSec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(TimePointSecVisitor)
    }
}
