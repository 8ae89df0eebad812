//! `ConnectionManager`: owns the single live connection to the server.
//!
//! ```text
//!            connect(token, code)                       disconnect()
//!   Idle ──────────────────────→ Connecting ──→ Open ──────────────→ Closed
//!                                     │           │
//!                                     └───────────┴──→ Closed (failure / server close)
//! ```
//!
//! Each connection runs in its own Tokio task that both writes queued
//! outbound frames and reads inbound ones. Inbound frames are decoded and
//! pushed, in receive order, into one inbox owned by the manager and
//! drained with [`ConnectionManager::recv`]. Every inbound message is
//! tagged with the [`ConnectionId`] it arrived on; anything from a
//! connection that has since been replaced or closed is discarded.

use std::fmt;
use std::sync::Arc;

use drawl_protocol::{ClientMessage, Codec, Envelope, JsonCodec, ServerMessage};
use drawl_transport::{Connection, ConnectionId, WebSocketConnection};
use tokio::sync::{mpsc, watch};

use crate::ClientConfig;

// ---------------------------------------------------------------------------
// Link status
// ---------------------------------------------------------------------------

/// Lifecycle of the managed connection, for a "disconnected" indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkStatus {
    /// No connection has been requested yet.
    Idle,
    /// Opening; outbound messages are still dropped.
    Connecting,
    /// Open; outbound messages are delivered.
    Open,
    /// Closed locally, by the server, or by a failure. Never reopened
    /// automatically.
    Closed,
}

impl LinkStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Connecting => write!(f, "Connecting"),
            Self::Open => write!(f, "Open"),
            Self::Closed => write!(f, "Closed"),
        }
    }
}

/// Which connection is current and what state it is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkState {
    /// `None` before the first connect and after `disconnect()`.
    pub connection: Option<ConnectionId>,
    pub status: LinkStatus,
}

impl LinkState {
    fn is_current(&self, id: ConnectionId) -> bool {
        self.connection == Some(id)
    }
}

/// Moves `id` to `status`, but only while `id` is still the current
/// connection. Returns whether anything changed.
fn mark(link: &watch::Sender<LinkState>, id: ConnectionId, status: LinkStatus) -> bool {
    link.send_if_modified(|state| {
        if !state.is_current(id) || state.status == status {
            return false;
        }
        state.status = status;
        true
    })
}

// ---------------------------------------------------------------------------
// ConnectionManager
// ---------------------------------------------------------------------------

/// A live connection's handle: the outbound queue its task drains.
struct Active {
    id: ConnectionId,
    outbound: mpsc::UnboundedSender<String>,
}

/// One decoded inbound message and the connection it came from.
type Inbound = (ConnectionId, ServerMessage);

/// Owns at most one live connection and the inbox it feeds.
///
/// Opening a new connection always closes the previous one first.
/// Nothing here retries or reconnects.
pub struct ConnectionManager<C: Codec = JsonCodec> {
    config: ClientConfig,
    codec: Arc<C>,
    link: Arc<watch::Sender<LinkState>>,
    inbox_tx: mpsc::UnboundedSender<Inbound>,
    inbox_rx: mpsc::UnboundedReceiver<Inbound>,
    active: Option<Active>,
}

impl ConnectionManager<JsonCodec> {
    /// Creates a manager speaking JSON.
    pub fn new(config: ClientConfig) -> Self {
        Self::with_codec(config, JsonCodec)
    }
}

impl<C: Codec> ConnectionManager<C> {
    /// Creates a manager with a custom codec.
    pub fn with_codec(config: ClientConfig, codec: C) -> Self {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        let (link, _) = watch::channel(LinkState {
            connection: None,
            status: LinkStatus::Idle,
        });
        Self {
            config,
            codec: Arc::new(codec),
            link: Arc::new(link),
            inbox_tx,
            inbox_rx,
            active: None,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Opens the connection for `token` in game `code`, closing any
    /// existing one first.
    ///
    /// Returns immediately. Whether it worked shows up only through
    /// received messages and [`status`](Self::status).
    ///
    /// # Panics
    /// Panics when called outside a Tokio runtime, since the connection
    /// task is spawned onto the current one.
    pub fn connect(&mut self, token: &str, code: &str) {
        self.disconnect();

        let id = ConnectionId::next();
        self.link.send_modify(|state| {
            state.connection = Some(id);
            state.status = LinkStatus::Connecting;
        });

        let url = match self.config.ws_url(token, code) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(conn_id = %id, error = %e, "cannot build connection url");
                mark(&self.link, id, LinkStatus::Closed);
                return;
            }
        };

        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        self.active = Some(Active { id, outbound });

        tracing::info!(conn_id = %id, game = code, "connecting");
        tokio::spawn(run_connection(
            url.to_string(),
            id,
            Arc::clone(&self.codec),
            Arc::clone(&self.link),
            self.inbox_tx.clone(),
            outbound_rx,
        ));
    }

    /// Queues `msg` for the server.
    ///
    /// Only delivered while the link is [`LinkStatus::Open`]; otherwise
    /// the message is dropped without error. Never blocks. Returns
    /// whether the message was queued.
    pub fn send(&self, msg: &ClientMessage) -> bool {
        let Some(active) = &self.active else {
            tracing::debug!(kind = msg.kind(), "no connection; message dropped");
            return false;
        };
        if !self.status().is_open() {
            tracing::debug!(
                conn_id = %active.id,
                kind = msg.kind(),
                "link not open; message dropped"
            );
            return false;
        }

        let frame = match encode_frame(&*self.codec, &msg.to_envelope()) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!(kind = msg.kind(), error = %e, "failed to encode message");
                return false;
            }
        };
        tracing::debug!(conn_id = %active.id, kind = msg.kind(), "sending");
        active.outbound.send(frame).is_ok()
    }

    /// Closes the current connection, if any. Idempotent.
    pub fn disconnect(&mut self) {
        // Dropping the outbound sender tells the task to close.
        if let Some(active) = self.active.take() {
            tracing::info!(conn_id = %active.id, "disconnecting");
        }
        self.link.send_if_modified(|state| {
            if state.connection.is_none() {
                return false;
            }
            state.connection = None;
            state.status = LinkStatus::Closed;
            true
        });
    }

    /// Waits for the next message from the current connection.
    ///
    /// Stays pending while no connection is delivering anything.
    pub async fn recv(&mut self) -> ServerMessage {
        loop {
            // The manager holds a sender itself, so the channel never ends.
            let Some((id, msg)) = self.inbox_rx.recv().await else {
                return std::future::pending().await;
            };
            if self.link.borrow().is_current(id) {
                return msg;
            }
            tracing::debug!(
                conn_id = %id,
                kind = msg.kind(),
                "dropping message from replaced connection"
            );
        }
    }

    /// Current link status.
    pub fn status(&self) -> LinkStatus {
        self.link.borrow().status
    }

    /// The current connection's id, if one has been requested.
    pub fn connection_id(&self) -> Option<ConnectionId> {
        self.link.borrow().connection
    }

    /// Subscribes to link changes.
    pub fn watch_status(&self) -> watch::Receiver<LinkState> {
        self.link.subscribe()
    }
}

impl<C: Codec> Drop for ConnectionManager<C> {
    fn drop(&mut self) {
        self.disconnect();
    }
}

// ---------------------------------------------------------------------------
// Connection task
// ---------------------------------------------------------------------------

fn encode_frame<C: Codec>(codec: &C, envelope: &Envelope) -> Result<String, crate::DrawlError> {
    let bytes = codec.encode(envelope)?;
    String::from_utf8(bytes).map_err(|e| {
        drawl_protocol::ProtocolError::InvalidMessage(format!("frame is not utf-8: {e}")).into()
    })
}

fn decode_frame<C: Codec>(codec: &C, bytes: &[u8]) -> Result<ServerMessage, crate::DrawlError> {
    let envelope: Envelope = codec.decode(bytes)?;
    Ok(ServerMessage::try_from(envelope)?)
}

/// Drives one connection from open to close.
async fn run_connection<C: Codec>(
    url: String,
    id: ConnectionId,
    codec: Arc<C>,
    link: Arc<watch::Sender<LinkState>>,
    inbox: mpsc::UnboundedSender<Inbound>,
    mut outbound: mpsc::UnboundedReceiver<String>,
) {
    let conn = match WebSocketConnection::connect(&url, id).await {
        Ok(conn) => conn,
        Err(e) => {
            tracing::warn!(conn_id = %id, error = %e, "connection failed");
            mark(&link, id, LinkStatus::Closed);
            return;
        }
    };

    if !mark(&link, id, LinkStatus::Open) {
        tracing::debug!(conn_id = %id, "connection replaced while opening");
        let _ = conn.close().await;
        return;
    }
    tracing::info!(conn_id = %id, "connected");

    loop {
        tokio::select! {
            frame = outbound.recv() => match frame {
                Some(frame) => {
                    if let Err(e) = conn.send(&frame).await {
                        tracing::warn!(conn_id = %id, error = %e, "send failed");
                        break;
                    }
                }
                None => {
                    let _ = conn.close().await;
                    tracing::info!(conn_id = %id, "connection closed locally");
                    return;
                }
            },
            received = conn.recv() => match received {
                Ok(Some(bytes)) => {
                    if !link.borrow().is_current(id) {
                        break;
                    }
                    match decode_frame(&*codec, &bytes) {
                        Ok(msg) => {
                            tracing::debug!(conn_id = %id, kind = msg.kind(), "received");
                            if inbox.send((id, msg)).is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            tracing::debug!(conn_id = %id, error = %e, "dropping malformed frame");
                        }
                    }
                }
                Ok(None) => {
                    tracing::info!(conn_id = %id, "connection closed by server");
                    break;
                }
                Err(e) => {
                    tracing::warn!(conn_id = %id, error = %e, "receive failed");
                    break;
                }
            },
        }
    }

    mark(&link, id, LinkStatus::Closed);
}
