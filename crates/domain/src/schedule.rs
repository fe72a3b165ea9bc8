//! Schedule — a weekday set and time of day mapped to a relay action.
//!
//! Schedules are evaluated by the hub; the dashboard only lists, creates,
//! edits and deletes them through the REST API.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::device::{RelayState, Target};
use crate::error::ValidationError;
use crate::id::ScheduleId;

/// Day of the week, encoded as its three-letter lowercase symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    /// The fixed 7-symbol week, Monday first.
    pub const ALL: [Self; 7] = [
        Self::Mon,
        Self::Tue,
        Self::Wed,
        Self::Thu,
        Self::Fri,
        Self::Sat,
        Self::Sun,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mon => "mon",
            Self::Tue => "tue",
            Self::Wed => "wed",
            Self::Thu => "thu",
            Self::Fri => "fri",
            Self::Sat => "sat",
            Self::Sun => "sun",
        }
    }

    /// Short label shown next to the form checkbox.
    #[must_use]
    pub const fn short_label(self) -> &'static str {
        match self {
            Self::Mon => "Seg",
            Self::Tue => "Ter",
            Self::Wed => "Qua",
            Self::Thu => "Qui",
            Self::Fri => "Sex",
            Self::Sat => "Sáb",
            Self::Sun => "Dom",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weekday {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|day| day.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownWeekday(s.to_string()))
    }
}

/// Set of weekdays a schedule repeats on. Iterates Monday first.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeekdaySet(BTreeSet<Weekday>);

impl WeekdaySet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, day: Weekday) -> bool {
        self.0.insert(day)
    }

    #[must_use]
    pub fn contains(&self, day: Weekday) -> bool {
        self.0.contains(&day)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for WeekdaySet {
    /// Comma-separated upper-case symbols, e.g. `MON, WED`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, day) in self.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            f.write_str(&day.as_str().to_uppercase())?;
        }
        Ok(())
    }
}

/// A schedule as stored by the hub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: ScheduleId,
    pub device_name: String,
    pub target: Target,
    pub state: RelayState,
    /// Time of day as typed in the form (`HH:MM`); interpreted by the hub.
    pub time: String,
    pub days: WeekdaySet,
}

/// A schedule without its id — the body of `POST` and `PUT` requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDraft {
    pub device_name: String,
    pub target: Target,
    pub state: RelayState,
    pub time: String,
    pub days: WeekdaySet,
}

impl ScheduleDraft {
    /// Check client-side invariants.
    ///
    /// Only the weekday set is checked here; everything else is the hub's call.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NoDaySelected`] when `days` is empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.days.is_empty() {
            return Err(ValidationError::NoDaySelected);
        }
        Ok(())
    }
}
