//! Long-polling client — keeps one Socket.IO session with the hub alive.
//!
//! [`channel`] splits the client in two halves:
//! - [`SocketIoEmitter`] implements the `HubChannel` port and only queues
//!   commands;
//! - [`SocketIoConnection`] owns the HTTP session, forwards hub events to a
//!   `HubListener`, flushes queued commands and reconnects forever after a
//!   fixed delay.

use std::future::Future;
use std::time::Duration;

use relaydash_app::ports::{HubChannel, HubEvent, HubListener};
use relaydash_domain::error::DashboardError;
use relaydash_domain::message::{InboundMessage, OutboundMessage};
use reqwest::header::CONTENT_TYPE;
use tokio::sync::mpsc;

use crate::config::SocketIoConfig;
use crate::engineio::{self, EnginePacket, Handshake};
use crate::error::SocketIoError;
use crate::packet::{PacketKind, SocketPacket};

const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Build both halves of a hub client.
///
/// # Errors
///
/// Returns [`SocketIoError::Http`] if the HTTP client cannot be initialised.
pub fn channel(config: SocketIoConfig) -> Result<(SocketIoEmitter, SocketIoConnection), SocketIoError> {
    let http = reqwest::Client::builder()
        .build()
        .map_err(SocketIoError::Http)?;
    let (tx, rx) = mpsc::unbounded_channel();
    Ok((
        SocketIoEmitter { outgoing: tx },
        SocketIoConnection {
            config,
            http,
            outgoing: rx,
        },
    ))
}

/// Sending half: queues commands for the connection task.
#[derive(Debug, Clone)]
pub struct SocketIoEmitter {
    outgoing: mpsc::UnboundedSender<OutboundMessage>,
}

impl HubChannel for SocketIoEmitter {
    fn emit(
        &self,
        message: OutboundMessage,
    ) -> impl Future<Output = Result<(), DashboardError>> + Send {
        let result = self
            .outgoing
            .send(message)
            .map_err(|_| DashboardError::from(SocketIoError::Closed));
        async { result }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionEnd {
    /// The server closed the session or left the namespace.
    ServerClosed,
    /// Every [`SocketIoEmitter`] was dropped; nothing left to serve.
    EmittersGone,
}

/// Receiving half: owns the HTTP session.
pub struct SocketIoConnection {
    config: SocketIoConfig,
    http: reqwest::Client,
    outgoing: mpsc::UnboundedReceiver<OutboundMessage>,
}

impl SocketIoConnection {
    /// Connect, serve the session, reconnect after each loss.
    ///
    /// Returns once every [`SocketIoEmitter`] has been dropped.
    pub async fn run<L: HubListener>(mut self, listener: L) {
        tracing::info!(url = %self.config.url, "connecting to hub");
        loop {
            let mut joined = false;
            let end = self.session(&listener, &mut joined).await;
            match end {
                Ok(SessionEnd::EmittersGone) => {
                    tracing::info!("hub connection stopped");
                    return;
                }
                Ok(SessionEnd::ServerClosed) if joined => {
                    tracing::warn!("hub closed the session");
                    listener.on_event(HubEvent::Disconnected);
                }
                Err(err) if joined => {
                    tracing::warn!(error = %err, "hub session lost");
                    listener.on_event(HubEvent::Disconnected);
                }
                Ok(SessionEnd::ServerClosed) => {
                    listener.on_event(HubEvent::ConnectFailed {
                        reason: "session closed before joining".to_string(),
                    });
                }
                Err(err) => {
                    tracing::warn!(error = %err, "hub connection attempt failed");
                    listener.on_event(HubEvent::ConnectFailed {
                        reason: err.to_string(),
                    });
                }
            }
            tokio::time::sleep(self.config.reconnect_delay()).await;
        }
    }

    async fn session<L: HubListener>(
        &mut self,
        listener: &L,
        joined: &mut bool,
    ) -> Result<SessionEnd, SocketIoError> {
        let handshake = self.handshake().await?;
        let url = self.config.session_url(&handshake.sid);
        let deadline = handshake.poll_deadline();
        tracing::debug!(sid = %handshake.sid, "engine.io session opened");

        let join = EnginePacket::Message(SocketPacket::connect().encode());
        send(&self.http, &url, &[join]).await?;

        let mut poll = Box::pin(long_poll(self.http.clone(), url.clone(), deadline));
        loop {
            tokio::select! {
                body = &mut poll => {
                    let mut replies = Vec::new();
                    for packet in engineio::decode_payload(&body?)? {
                        match packet {
                            EnginePacket::Ping(data) => replies.push(EnginePacket::Pong(data)),
                            EnginePacket::Close => return Ok(SessionEnd::ServerClosed),
                            EnginePacket::Message(text) => {
                                if let Some(end) = dispatch(&text, listener, joined)? {
                                    return Ok(end);
                                }
                            }
                            EnginePacket::Open(_)
                            | EnginePacket::Pong(_)
                            | EnginePacket::Upgrade
                            | EnginePacket::Noop => {}
                        }
                    }
                    if !replies.is_empty() {
                        send(&self.http, &url, &replies).await?;
                    }
                    poll.set(long_poll(self.http.clone(), url.clone(), deadline));
                }
                message = self.outgoing.recv() => {
                    let Some(message) = message else {
                        return Ok(SessionEnd::EmittersGone);
                    };
                    tracing::debug!(event = message.event_name(), "emitting command");
                    let packet = SocketPacket::event(message.event_name(), message.payload());
                    send(&self.http, &url, &[EnginePacket::Message(packet.encode())]).await?;
                }
            }
        }
    }

    async fn handshake(&self) -> Result<Handshake, SocketIoError> {
        let body = fetch(self.http.get(self.config.polling_url()).timeout(HANDSHAKE_TIMEOUT)).await?;
        match engineio::decode_payload(&body)?.into_iter().next() {
            Some(EnginePacket::Open(data)) => Handshake::parse(&data),
            other => Err(SocketIoError::Handshake(format!(
                "expected open packet, got {other:?}"
            ))),
        }
    }
}

/// Route one Socket.IO packet. Returns `Some` when the session must end.
fn dispatch<L: HubListener>(
    text: &str,
    listener: &L,
    joined: &mut bool,
) -> Result<Option<SessionEnd>, SocketIoError> {
    let packet = match SocketPacket::decode(text) {
        Ok(packet) => packet,
        Err(err) => {
            tracing::warn!(error = %err, "dropping undecodable socket.io packet");
            return Ok(None);
        }
    };
    if packet.namespace != "/" {
        tracing::debug!(namespace = %packet.namespace, "ignoring packet for other namespace");
        return Ok(None);
    }
    match packet.kind {
        PacketKind::Connect => {
            *joined = true;
            listener.on_event(HubEvent::Connected {
                sid: packet.sid().map(str::to_string),
            });
        }
        PacketKind::ConnectError => {
            let reason = packet.data.map(|data| data.to_string()).unwrap_or_default();
            return Err(SocketIoError::ConnectRefused(reason));
        }
        PacketKind::Disconnect => return Ok(Some(SessionEnd::ServerClosed)),
        PacketKind::Event => match packet.into_event() {
            Ok(Some((name, payload))) => match InboundMessage::from_event(&name, payload) {
                Ok(Some(message)) => listener.on_event(HubEvent::Message(message)),
                Ok(None) => tracing::debug!(event = %name, "ignoring unknown event"),
                Err(err) => tracing::warn!(event = %name, error = %err, "dropping malformed payload"),
            },
            Ok(None) => {}
            Err(err) => tracing::warn!(error = %err, "dropping malformed event"),
        },
        PacketKind::Ack => {}
    }
    Ok(None)
}

async fn long_poll(
    http: reqwest::Client,
    url: String,
    deadline: Duration,
) -> Result<String, SocketIoError> {
    fetch(http.get(url).timeout(deadline)).await
}

async fn send(
    http: &reqwest::Client,
    url: &str,
    packets: &[EnginePacket],
) -> Result<(), SocketIoError> {
    let request = http
        .post(url)
        .header(CONTENT_TYPE, "text/plain;charset=UTF-8")
        .body(engineio::encode_payload(packets));
    fetch(request).await.map(drop)
}

async fn fetch(request: reqwest::RequestBuilder) -> Result<String, SocketIoError> {
    let response = request.send().await.map_err(SocketIoError::Http)?;
    let status = response.status();
    if !status.is_success() {
        return Err(SocketIoError::Status(status.as_u16()));
    }
    response.text().await.map_err(SocketIoError::Http)
}
