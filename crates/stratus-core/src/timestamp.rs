//! RFC 3339 timestamps that re-encode exactly as received.

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::Error;

/// A point in time carried on the wire as an RFC 3339 string.
///
/// The original text is kept next to the parsed value, so a decoded model
/// encodes back to the same offset and fractional digits the service sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Timestamp {
    raw: String,
    parsed: DateTime<FixedOffset>,
}

impl Timestamp {
    pub fn parse(value: impl Into<String>) -> Result<Self, Error> {
        let raw = value.into();
        let parsed = DateTime::parse_from_rfc3339(&raw)
            .map_err(|e| Error::InvalidInput(format!("invalid timestamp {:?}: {}", raw, e)))?;
        Ok(Self { raw, parsed })
    }

    /// The text as received.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn as_datetime(&self) -> DateTime<FixedOffset> {
        self.parsed
    }

    pub fn to_utc(&self) -> DateTime<Utc> {
        self.parsed.with_timezone(&Utc)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self {
            raw: value.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            parsed: value.fixed_offset(),
        }
    }
}

impl std::str::FromStr for Timestamp {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(raw).map_err(serde::de::Error::custom)
    }
}
