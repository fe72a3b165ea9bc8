//! Socket.IO connection configuration.

use std::time::Duration;

use serde::Deserialize;

use crate::engineio::PROTOCOL_VERSION;

/// Configuration for the hub's real-time channel.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SocketIoConfig {
    /// Base URL of the hub, e.g. `http://127.0.0.1:5000`.
    pub url: String,
    /// Path the Socket.IO server is mounted on.
    pub socketio_path: String,
    /// Pause between two connection attempts, in milliseconds.
    pub reconnect_delay_ms: u64,
}

impl Default for SocketIoConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:5000".to_string(),
            socketio_path: "/socket.io/".to_string(),
            reconnect_delay_ms: 2000,
        }
    }
}

impl SocketIoConfig {
    /// URL of the polling transport, without session.
    #[must_use]
    pub fn polling_url(&self) -> String {
        let path = self.socketio_path.trim_start_matches('/');
        format!(
            "{}/{path}?EIO={PROTOCOL_VERSION}&transport=polling",
            self.url.trim_end_matches('/')
        )
    }

    /// URL of the polling transport for session `sid`.
    #[must_use]
    pub fn session_url(&self, sid: &str) -> String {
        format!("{}&sid={sid}", self.polling_url())
    }

    #[must_use]
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }
}
