//! # relaydash-adapter-socketio
//!
//! Socket.IO adapter — the hub's real-time channel.
//!
//! ## Responsibilities
//! - Speak Engine.IO v4 over HTTP long-polling (handshake, ping/pong, close)
//! - Join the default Socket.IO namespace and decode event packets
//! - Implement the `HubChannel` port for outgoing toggle commands
//! - Feed connection changes and hub messages to a `HubListener`
//! - Reconnect forever with a fixed delay
//!
//! ## Dependency rule
//! Same as other adapters: depends on `relaydash-app` and `relaydash-domain`.

pub mod client;
pub mod config;
pub mod engineio;
pub mod error;
pub mod packet;

pub use client::{SocketIoConnection, SocketIoEmitter, channel};
pub use config::SocketIoConfig;
pub use error::SocketIoError;
