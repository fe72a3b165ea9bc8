//! Typed identifier newtypes.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a [`Schedule`](crate::schedule::Schedule), assigned by the hub.
///
/// Opaque to the dashboard: it is only compared, shown in URLs and sent back
/// in request paths. Decodes from a JSON string or number; always encodes as
/// a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ScheduleId(String);

impl ScheduleId {
    /// Wrap a raw identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for ScheduleId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ScheduleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ScheduleId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Unsigned(u64),
            Signed(i64),
            Text(String),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Unsigned(value) => Self::from(value),
            Repr::Signed(value) => Self(value.to_string()),
            Repr::Text(text) => Self(text),
        })
    }
}

/// Tag of an in-flight REST call, used to discard stale responses.
///
/// Issued in increasing order by a single owner; a larger id is a newer request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct RequestId(u64);

impl RequestId {
    /// Return the id following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}
