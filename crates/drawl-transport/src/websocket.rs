//! WebSocket client connection using `tokio-tungstenite`.

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::error::ProtocolError;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};

use crate::{Connection, ConnectionId, TransportError};

type WsStream = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// A single outbound WebSocket connection.
///
/// The stream is split so that a reader blocked in [`recv`](Connection::recv)
/// never holds up a concurrent [`send`](Connection::send).
pub struct WebSocketConnection {
    id: ConnectionId,
    sink: Mutex<SplitSink<WsStream, Message>>,
    stream: Mutex<SplitStream<WsStream>>,
}

impl WebSocketConnection {
    /// Opens a WebSocket connection to `url` (`ws://` or `wss://`).
    pub async fn connect(
        url: &str,
        id: ConnectionId,
    ) -> Result<Self, TransportError> {
        let (ws, _response) =
            tokio_tungstenite::connect_async(url).await.map_err(|e| {
                TransportError::ConnectFailed(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    e,
                ))
            })?;

        tracing::debug!(%id, "WebSocket connection established");

        let (sink, stream) = ws.split();
        Ok(Self {
            id,
            sink: Mutex::new(sink),
            stream: Mutex::new(stream),
        })
    }
}

impl Connection for WebSocketConnection {
    type Error = TransportError;

    async fn send(&self, frame: &str) -> Result<(), Self::Error> {
        self.sink
            .lock()
            .await
            .send(Message::text(frame.to_owned()))
            .await
            .map_err(send_error)
    }

    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error> {
        loop {
            let msg = self.stream.lock().await.next().await;
            match msg {
                Some(Ok(Message::Text(text))) => {
                    return Ok(Some(text.as_bytes().to_vec()));
                }
                Some(Ok(Message::Binary(data))) => {
                    return Ok(Some(data.into()));
                }
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                Some(Ok(_)) => continue, // skip ping/pong/frame
                Some(Err(e)) => {
                    return Err(TransportError::ReceiveFailed(
                        std::io::Error::new(
                            std::io::ErrorKind::ConnectionReset,
                            e,
                        ),
                    ));
                }
            }
        }
    }

    async fn close(&self) -> Result<(), Self::Error> {
        self.sink.lock().await.close().await.map_err(send_error)
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}

/// Maps a write-side tungstenite error, separating "already closed" from
/// genuine I/O failures.
fn send_error(e: WsError) -> TransportError {
    match e {
        WsError::ConnectionClosed
        | WsError::AlreadyClosed
        | WsError::Protocol(ProtocolError::SendAfterClosing) => {
            TransportError::ConnectionClosed(e.to_string())
        }
        e => TransportError::SendFailed(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            e,
        )),
    }
}
