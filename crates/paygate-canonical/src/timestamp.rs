//! Structured instant carried by request records.
//!
//! Mirrors the protobuf well-known `Timestamp`: whole seconds since the Unix
//! epoch plus non-negative sub-second nanos. The text form is RFC 3339 in UTC
//! with the fraction trimmed of trailing zeros, e.g.
//! `2020-12-14T05:03:35.025484056Z` or `2020-12-14T05:03:35Z`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::CoercionError;

/// `0001-01-01T00:00:00Z`.
const MIN_SECONDS: i64 = -62_135_596_800;
/// `9999-12-31T23:59:59Z`.
const MAX_SECONDS: i64 = 253_402_300_799;
const NANOS_PER_SECOND: i32 = 1_000_000_000;

/// Seconds + nanos instant, always interpreted as UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Timestamp {
    /// Seconds since `1970-01-01T00:00:00Z`.
    pub seconds: i64,
    /// Sub-second nanoseconds, `0..1_000_000_000`.
    pub nanos: i32,
}

impl Timestamp {
    /// Creates a timestamp without range checks; rendering validates.
    pub fn new(seconds: i64, nanos: i32) -> Self {
        Self { seconds, nanos }
    }

    /// Current wall-clock time.
    pub fn now() -> Self {
        Self::from_datetime(&Utc::now())
    }

    /// Converts any zoned chrono instant.
    pub fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        Self {
            seconds: dt.timestamp(),
            nanos: dt.timestamp_subsec_nanos() as i32,
        }
    }

    /// Parses RFC 3339 text with any offset; the offset is folded into UTC.
    pub fn parse(input: &str) -> Result<Self, CoercionError> {
        let dt = DateTime::parse_from_rfc3339(input).map_err(|err| {
            CoercionError::MalformedTimestamp {
                input: input.to_string(),
                reason: err.to_string(),
            }
        })?;
        // chrono encodes a leap second as a nanosecond overflow.
        if dt.timestamp_subsec_nanos() >= NANOS_PER_SECOND as u32 {
            return Err(CoercionError::MalformedTimestamp {
                input: input.to_string(),
                reason: "leap seconds are not supported".into(),
            });
        }
        Ok(Self::from_datetime(&dt))
    }

    /// Converts to a UTC chrono instant, rejecting out-of-range values.
    pub fn to_datetime(&self) -> Result<DateTime<Utc>, CoercionError> {
        let invalid = CoercionError::InvalidTimestamp {
            seconds: self.seconds,
            nanos: self.nanos,
        };
        if !(0..NANOS_PER_SECOND).contains(&self.nanos)
            || !(MIN_SECONDS..=MAX_SECONDS).contains(&self.seconds)
        {
            return Err(invalid);
        }
        DateTime::from_timestamp(self.seconds, self.nanos as u32).ok_or(invalid)
    }

    /// Renders RFC 3339 UTC text with a trimmed nanosecond fraction.
    pub fn to_rfc3339(&self) -> Result<String, CoercionError> {
        let dt = self.to_datetime()?;
        let mut out = dt.format("%Y-%m-%dT%H:%M:%S").to_string();
        if self.nanos != 0 {
            let fraction = format!("{:09}", self.nanos);
            out.push('.');
            out.push_str(fraction.trim_end_matches('0'));
        }
        out.push('Z');
        Ok(out)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Timestamp {
    fn from(dt: DateTime<Tz>) -> Self {
        Self::from_datetime(&dt)
    }
}

impl FromStr for Timestamp {
    type Err = CoercionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_rfc3339() {
            Ok(text) => f.write_str(&text),
            Err(_) => write!(f, "seconds:{} nanos:{}", self.seconds, self.nanos),
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let text = self.to_rfc3339().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}
