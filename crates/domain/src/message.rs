//! Messages exchanged with the hub over the real-time channel.
//!
//! Inbound messages arrive as `(event name, JSON payload)` pairs; outbound
//! commands are turned back into such pairs by [`OutboundMessage::event_name`]
//! and [`OutboundMessage::payload`].

use serde::{Deserialize, Serialize};

use crate::device::{DeviceSet, RelayState, Target};

/// Event carrying the microcontroller online status.
pub const ESP_STATUS_UPDATE: &str = "esp_status_update";
/// Event carrying a free-form hub log line.
pub const STATUS_UPDATE: &str = "status_update";
/// Event carrying the full device set.
pub const FULL_DEVICE_UPDATE: &str = "full_device_update";
/// Older name of [`FULL_DEVICE_UPDATE`].
pub const UPDATE_DASHBOARD: &str = "update_dashboard";
/// Outbound toggle command.
pub const WEB_COMMAND: &str = "web_command";
/// Outbound toggle command, alternate naming.
pub const USER_COMMAND: &str = "user_command";

/// Payload of [`ESP_STATUS_UPDATE`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EspStatus {
    #[serde(default)]
    pub name: Option<String>,
    pub status: String,
}

/// Payload of [`STATUS_UPDATE`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubLog {
    pub message: String,
}

/// A message pushed by the hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    EspStatus(EspStatus),
    Log(HubLog),
    Devices(DeviceSet),
}

impl InboundMessage {
    /// Decode a named event.
    ///
    /// Returns `Ok(None)` for events the dashboard does not listen to.
    ///
    /// # Errors
    ///
    /// Returns the decoding error when a known event carries a malformed payload.
    pub fn from_event(
        name: &str,
        payload: serde_json::Value,
    ) -> Result<Option<Self>, serde_json::Error> {
        let message = match name {
            ESP_STATUS_UPDATE => Self::EspStatus(serde_json::from_value(payload)?),
            STATUS_UPDATE => Self::Log(serde_json::from_value(payload)?),
            FULL_DEVICE_UPDATE | UPDATE_DASHBOARD => Self::Devices(serde_json::from_value(payload)?),
            _ => return Ok(None),
        };
        Ok(Some(message))
    }
}

/// Shape of the outbound toggle command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandStyle {
    /// `web_command` with `{device_name, target, state}`.
    #[default]
    WebCommand,
    /// `user_command` with `{device, target, state}`.
    UserCommand,
    /// `web_command` with `{target, state}` for hubs serving a single board.
    SingleDevice,
}

impl CommandStyle {
    /// Build the command asking `device` to switch `target` to `state`.
    #[must_use]
    pub fn command(self, device: &str, target: Target, state: RelayState) -> OutboundMessage {
        match self {
            Self::WebCommand => OutboundMessage::WebCommand {
                device_name: Some(device.to_string()),
                target,
                state,
            },
            Self::SingleDevice => OutboundMessage::WebCommand {
                device_name: None,
                target,
                state,
            },
            Self::UserCommand => OutboundMessage::UserCommand {
                device: device.to_string(),
                target,
                state,
            },
        }
    }
}

/// A command sent to the hub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OutboundMessage {
    WebCommand {
        #[serde(skip_serializing_if = "Option::is_none")]
        device_name: Option<String>,
        target: Target,
        state: RelayState,
    },
    UserCommand {
        device: String,
        target: Target,
        state: RelayState,
    },
}

impl OutboundMessage {
    #[must_use]
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::WebCommand { .. } => WEB_COMMAND,
            Self::UserCommand { .. } => USER_COMMAND,
        }
    }

    /// JSON payload of the event.
    #[must_use]
    pub fn payload(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    #[must_use]
    pub fn target(&self) -> Target {
        match self {
            Self::WebCommand { target, .. } | Self::UserCommand { target, .. } => *target,
        }
    }

    #[must_use]
    pub fn state(&self) -> RelayState {
        match self {
            Self::WebCommand { state, .. } | Self::UserCommand { state, .. } => *state,
        }
    }
}
