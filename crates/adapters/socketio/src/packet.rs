//! Socket.IO v5 packets, carried inside Engine.IO message packets.
//!
//! Text form: `<type>[<namespace>,][<ack id>][<json>]`. The default
//! namespace `/` is implicit.

use serde_json::Value;

use crate::error::SocketIoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketKind {
    Connect,
    Disconnect,
    Event,
    Ack,
    ConnectError,
}

impl PacketKind {
    const fn digit(self) -> char {
        match self {
            Self::Connect => '0',
            Self::Disconnect => '1',
            Self::Event => '2',
            Self::Ack => '3',
            Self::ConnectError => '4',
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SocketPacket {
    pub kind: PacketKind,
    pub namespace: String,
    pub ack: Option<u64>,
    pub data: Option<Value>,
}

impl SocketPacket {
    /// Join the default namespace.
    #[must_use]
    pub fn connect() -> Self {
        Self {
            kind: PacketKind::Connect,
            namespace: "/".to_string(),
            ack: None,
            data: None,
        }
    }

    /// An event on the default namespace, without acknowledgement.
    #[must_use]
    pub fn event(name: &str, payload: Value) -> Self {
        Self {
            kind: PacketKind::Event,
            namespace: "/".to_string(),
            ack: None,
            data: Some(Value::Array(vec![Value::String(name.to_string()), payload])),
        }
    }

    /// Decode the text of an Engine.IO message packet.
    ///
    /// # Errors
    ///
    /// - [`SocketIoError::BinaryUnsupported`] for binary event / ack packets
    /// - [`SocketIoError::Decode`] for an empty packet or an unknown type
    /// - [`SocketIoError::Json`] when the data is not valid JSON
    pub fn decode(raw: &str) -> Result<Self, SocketIoError> {
        let mut chars = raw.chars();
        let kind = match chars.next() {
            Some('0') => PacketKind::Connect,
            Some('1') => PacketKind::Disconnect,
            Some('2') => PacketKind::Event,
            Some('3') => PacketKind::Ack,
            Some('4') => PacketKind::ConnectError,
            Some('5' | '6') => return Err(SocketIoError::BinaryUnsupported),
            Some(other) => {
                return Err(SocketIoError::Decode(format!(
                    "unknown socket.io packet type `{other}`"
                )));
            }
            None => return Err(SocketIoError::Decode("empty socket.io packet".to_string())),
        };
        let mut rest = chars.as_str();

        let namespace = if rest.starts_with('/') {
            let (namespace, tail) = rest.split_once(',').unwrap_or((rest, ""));
            rest = tail;
            namespace.to_string()
        } else {
            "/".to_string()
        };

        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        let ack = if digits > 0 {
            let id = rest[..digits]
                .parse()
                .map_err(|_| SocketIoError::Decode(format!("invalid ack id `{}`", &rest[..digits])))?;
            rest = &rest[digits..];
            Some(id)
        } else {
            None
        };

        let data = if rest.is_empty() {
            None
        } else {
            Some(serde_json::from_str(rest).map_err(SocketIoError::Json)?)
        };

        Ok(Self {
            kind,
            namespace,
            ack,
            data,
        })
    }

    #[must_use]
    pub fn encode(&self) -> String {
        let mut out = String::new();
        out.push(self.kind.digit());
        if self.namespace != "/" {
            out.push_str(&self.namespace);
            out.push(',');
        }
        if let Some(ack) = self.ack {
            out.push_str(&ack.to_string());
        }
        if let Some(data) = &self.data {
            out.push_str(&data.to_string());
        }
        out
    }

    /// `(name, payload)` of an event packet; `None` for other packet kinds.
    ///
    /// A missing payload decodes as `null`.
    ///
    /// # Errors
    ///
    /// Returns [`SocketIoError::Decode`] when the event data is not `[name, payload?]`.
    pub fn into_event(self) -> Result<Option<(String, Value)>, SocketIoError> {
        if self.kind != PacketKind::Event {
            return Ok(None);
        }
        let Some(Value::Array(items)) = self.data else {
            return Err(SocketIoError::Decode("event data is not an array".to_string()));
        };
        let mut items = items.into_iter();
        let Some(Value::String(name)) = items.next() else {
            return Err(SocketIoError::Decode("event name is not a string".to_string()));
        };
        Ok(Some((name, items.next().unwrap_or(Value::Null))))
    }

    /// Session id announced in a connect packet.
    #[must_use]
    pub fn sid(&self) -> Option<&str> {
        self.data.as_ref()?.get("sid")?.as_str()
    }
}
