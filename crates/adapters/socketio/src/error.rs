//! Socket.IO adapter error types.

use relaydash_domain::error::DashboardError;

/// Errors specific to the Socket.IO adapter.
#[derive(Debug, thiserror::Error)]
pub enum SocketIoError {
    /// The HTTP request itself failed (connect, timeout, body).
    #[error("socket.io http request failed")]
    Http(#[source] reqwest::Error),

    /// The server answered a polling request with a non-success status.
    #[error("socket.io server answered with status {0}")]
    Status(u16),

    /// The first polling payload was not an open packet.
    #[error("socket.io handshake failed: {0}")]
    Handshake(String),

    /// A packet did not follow the wire format.
    #[error("malformed socket.io packet: {0}")]
    Decode(String),

    /// Packet data was not valid JSON.
    #[error("malformed socket.io json data")]
    Json(#[source] serde_json::Error),

    /// Binary packets are not supported.
    #[error("binary socket.io packets are not supported")]
    BinaryUnsupported,

    /// The server refused to join the namespace.
    #[error("socket.io namespace connection refused: {0}")]
    ConnectRefused(String),

    /// The connection task is gone; commands can no longer be sent.
    #[error("socket.io connection closed")]
    Closed,
}

impl From<SocketIoError> for DashboardError {
    fn from(err: SocketIoError) -> Self {
        Self::transport(err)
    }
}
