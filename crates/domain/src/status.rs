//! Hub status — the tri-state indicator shown at the top of the dashboard.

use std::fmt;

/// Status reported for the microcontroller side of the hub.
///
/// Anything other than `Online` / `Offline` is a transitional state and is
/// displayed verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HubStatus {
    Online,
    Offline,
    Pending(String),
}

impl HubStatus {
    /// Label shown before the hub reports anything.
    pub const WAITING: &'static str = "Aguardando";
    /// Label shown while the real-time channel is down.
    pub const DISCONNECTED: &'static str = "Desconectado";

    /// Map a status string from the hub.
    #[must_use]
    pub fn parse(status: &str) -> Self {
        match status {
            "Online" => Self::Online,
            "Offline" => Self::Offline,
            other => Self::Pending(other.to_string()),
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Online => "Online",
            Self::Offline => "Offline",
            Self::Pending(label) => label,
        }
    }

    /// Colors and label for the status badge and its card.
    #[must_use]
    pub fn indicator(&self) -> StatusIndicator {
        let (badge_class, card_class) = match self {
            Self::Online => ("bg-green-600", "bg-green-50"),
            Self::Offline => ("bg-red-600", "bg-red-50"),
            Self::Pending(_) => ("bg-yellow-600", "bg-yellow-50"),
        };
        StatusIndicator {
            label: self.label().to_string(),
            badge_class,
            card_class,
        }
    }
}

impl Default for HubStatus {
    fn default() -> Self {
        Self::Pending(Self::WAITING.to_string())
    }
}

impl fmt::Display for HubStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rendered form of a [`HubStatus`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusIndicator {
    pub label: String,
    pub badge_class: &'static str,
    pub card_class: &'static str,
}
