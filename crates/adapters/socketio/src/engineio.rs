//! Engine.IO v4 packets over HTTP long-polling.
//!
//! A polling payload carries one or more text packets separated by the
//! record separator (`0x1e`). Each packet is a single digit type followed by
//! its data.

use std::time::Duration;

use serde::Deserialize;

use crate::error::SocketIoError;

/// Separator between packets of one polling payload.
pub const RECORD_SEPARATOR: char = '\u{1e}';

/// Engine.IO protocol revision spoken by this client.
pub const PROTOCOL_VERSION: u8 = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnginePacket {
    /// Handshake, carrying the JSON session parameters.
    Open(String),
    Close,
    Ping(String),
    Pong(String),
    Message(String),
    Upgrade,
    Noop,
}

impl EnginePacket {
    /// Decode one packet.
    ///
    /// # Errors
    ///
    /// Returns [`SocketIoError::Decode`] for an empty packet or an unknown type,
    /// and [`SocketIoError::BinaryUnsupported`] for base64 binary packets.
    pub fn decode(raw: &str) -> Result<Self, SocketIoError> {
        let mut chars = raw.chars();
        let kind = chars
            .next()
            .ok_or_else(|| SocketIoError::Decode("empty engine.io packet".to_string()))?;
        let data = chars.as_str().to_string();
        Ok(match kind {
            '0' => Self::Open(data),
            '1' => Self::Close,
            '2' => Self::Ping(data),
            '3' => Self::Pong(data),
            '4' => Self::Message(data),
            '5' => Self::Upgrade,
            '6' => Self::Noop,
            'b' => return Err(SocketIoError::BinaryUnsupported),
            other => {
                return Err(SocketIoError::Decode(format!(
                    "unknown engine.io packet type `{other}`"
                )));
            }
        })
    }

    #[must_use]
    pub fn encode(&self) -> String {
        match self {
            Self::Open(data) => format!("0{data}"),
            Self::Close => "1".to_string(),
            Self::Ping(data) => format!("2{data}"),
            Self::Pong(data) => format!("3{data}"),
            Self::Message(data) => format!("4{data}"),
            Self::Upgrade => "5".to_string(),
            Self::Noop => "6".to_string(),
        }
    }
}

/// Split a polling payload into packets.
///
/// # Errors
///
/// Fails on the first packet that does not decode.
pub fn decode_payload(body: &str) -> Result<Vec<EnginePacket>, SocketIoError> {
    body.split(RECORD_SEPARATOR)
        .filter(|raw| !raw.is_empty())
        .map(EnginePacket::decode)
        .collect()
}

/// Join packets into one polling payload.
#[must_use]
pub fn encode_payload(packets: &[EnginePacket]) -> String {
    packets
        .iter()
        .map(EnginePacket::encode)
        .collect::<Vec<_>>()
        .join(&RECORD_SEPARATOR.to_string())
}

/// Session parameters sent by the server in the open packet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    pub sid: String,
    #[serde(default)]
    pub upgrades: Vec<String>,
    pub ping_interval: u64,
    pub ping_timeout: u64,
    #[serde(default)]
    pub max_payload: u64,
}

impl Handshake {
    /// Parse the data of an [`EnginePacket::Open`].
    ///
    /// # Errors
    ///
    /// Returns [`SocketIoError::Json`] when the data is not a handshake object.
    pub fn parse(data: &str) -> Result<Self, SocketIoError> {
        serde_json::from_str(data).map_err(SocketIoError::Json)
    }

    /// Longest a long-poll may stay silent before the session is considered dead.
    #[must_use]
    pub fn poll_deadline(&self) -> Duration {
        Duration::from_millis(self.ping_interval + self.ping_timeout)
    }
}
