//! Device — a named microcontroller exposing a lamp relay and a cooler relay.
//!
//! The hub broadcasts the full [`DeviceSet`] on every change; the client
//! never edits it in place, it only replaces it.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Which relay of a device a command or schedule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Lamp,
    Cooler,
}

impl Target {
    /// Every target, in the order the dashboard renders them.
    pub const ALL: [Self; 2] = [Self::Lamp, Self::Cooler];

    /// Wire representation (`lamp` / `cooler`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lamp => "lamp",
            Self::Cooler => "cooler",
        }
    }

    /// Physical relay number on the board.
    #[must_use]
    pub const fn relay_number(self) -> u8 {
        match self {
            Self::Lamp => 1,
            Self::Cooler => 2,
        }
    }

    /// Human-readable title shown on the dashboard.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Lamp => "Lâmpada",
            Self::Cooler => "Cooler",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Target {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lamp" => Ok(Self::Lamp),
            "cooler" => Ok(Self::Cooler),
            other => Err(ValidationError::UnknownTarget(other.to_string())),
        }
    }
}

/// On/off state of a single relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelayState {
    On,
    #[default]
    Off,
}

impl RelayState {
    /// The opposite state.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::On => Self::Off,
            Self::Off => Self::On,
        }
    }

    #[must_use]
    pub const fn is_on(self) -> bool {
        matches!(self, Self::On)
    }

    /// Wire representation (`on` / `off`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }
}

impl fmt::Display for RelayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelayState {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on" => Ok(Self::On),
            "off" => Ok(Self::Off),
            other => Err(ValidationError::UnknownRelayState(other.to_string())),
        }
    }
}

/// Last known state of one device, as broadcast by the hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeviceState {
    #[serde(default)]
    pub lamp: RelayState,
    #[serde(default)]
    pub cooler: RelayState,
    #[serde(default)]
    pub connected: bool,
}

impl DeviceState {
    /// State of the relay addressed by `target`.
    #[must_use]
    pub const fn relay(&self, target: Target) -> RelayState {
        match target {
            Target::Lamp => self.lamp,
            Target::Cooler => self.cooler,
        }
    }
}

/// Every device known to the hub, keyed by its unique name.
///
/// Iterates in name order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceSet(BTreeMap<String, DeviceState>);

impl DeviceSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DeviceState> {
        self.0.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over `(name, state)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DeviceState)> {
        self.0.iter().map(|(name, state)| (name.as_str(), state))
    }

    /// All device names, in name order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.0.keys().cloned().collect()
    }
}

impl<N: Into<String>> FromIterator<(N, DeviceState)> for DeviceSet {
    fn from_iter<I: IntoIterator<Item = (N, DeviceState)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, state)| (name.into(), state))
                .collect(),
        )
    }
}
