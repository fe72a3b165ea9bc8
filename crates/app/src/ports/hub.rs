//! Hub ports — the real-time channel in both directions.

use std::future::Future;

use relaydash_domain::error::DashboardError;
use relaydash_domain::message::{InboundMessage, OutboundMessage};

/// Sends commands to the hub.
///
/// Fire-and-forget: a successful return means the message was handed to the
/// transport, not that the hub acted on it.
pub trait HubChannel {
    /// Emit a command event.
    fn emit(
        &self,
        message: OutboundMessage,
    ) -> impl Future<Output = Result<(), DashboardError>> + Send;
}

impl<T: HubChannel + Send + Sync> HubChannel for std::sync::Arc<T> {
    fn emit(
        &self,
        message: OutboundMessage,
    ) -> impl Future<Output = Result<(), DashboardError>> + Send {
        (**self).emit(message)
    }
}

/// Something that happened on the real-time channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HubEvent {
    /// The channel joined the hub's namespace.
    Connected { sid: Option<String> },
    /// An established channel went away. The transport keeps retrying.
    Disconnected,
    /// A connection attempt failed before the channel was established.
    ConnectFailed { reason: String },
    /// The hub pushed a message.
    Message(InboundMessage),
}

/// Receives [`HubEvent`]s from the transport adapter.
///
/// Called from the transport's own task; implementations must not block.
pub trait HubListener: Send + Sync {
    fn on_event(&self, event: HubEvent);
}

impl<T: HubListener> HubListener for std::sync::Arc<T> {
    fn on_event(&self, event: HubEvent) {
        (**self).on_event(event);
    }
}
