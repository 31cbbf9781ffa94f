//! WebSocket peer link using `tokio-tungstenite`.

use std::sync::Arc;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::StreamExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::MaybeTlsStream;

use crate::PeerError;

type WsStream = tokio_tungstenite::WebSocketStream<MaybeTlsStream<TcpStream>>;

/// The host side of connection establishment.
///
/// Binds a local socket and waits for exactly one inbound peer; the
/// [`identity`](Self::identity) is what the guest needs to connect.
pub struct PeerListener {
    listener: TcpListener,
    identity: String,
}

impl PeerListener {
    /// Binds a listener. Use an `:0` port to let the OS pick one.
    pub async fn bind(addr: &str) -> Result<Self, PeerError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(PeerError::ListenFailed)?;
        let identity = listener
            .local_addr()
            .map_err(PeerError::ListenFailed)?
            .to_string();
        tracing::info!(%identity, "peer listener open");
        Ok(Self { listener, identity })
    }

    /// The shareable identity of this listener (`host:port`).
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Waits for the next inbound peer and completes the WebSocket
    /// handshake.
    pub async fn accept(&mut self) -> Result<PeerLink, PeerError> {
        let (stream, addr) = self
            .listener
            .accept()
            .await
            .map_err(PeerError::AcceptFailed)?;
        let ws = tokio_tungstenite::accept_async(MaybeTlsStream::Plain(stream))
            .await
            .map_err(|e| {
                PeerError::AcceptFailed(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    e,
                ))
            })?;
        tracing::info!(%addr, "peer connected");
        Ok(PeerLink::new(ws))
    }
}

/// Connects to a host identity obtained out-of-band.
pub async fn connect(identity: &str) -> Result<PeerLink, PeerError> {
    let url = format!("ws://{identity}");
    let (ws, _) = tokio_tungstenite::connect_async(url)
        .await
        .map_err(|e| PeerError::ConnectFailed(e.to_string()))?;
    tracing::info!(%identity, "connected to host");
    Ok(PeerLink::new(ws))
}

/// A reliable ordered byte channel to the remote peer.
///
/// Cheap to clone; all clones share the underlying socket. The sink
/// and stream halves are locked independently, so one task can sit in
/// [`recv`](Self::recv) while another sends.
#[derive(Clone)]
pub struct PeerLink {
    sink: Arc<Mutex<SplitSink<WsStream, Message>>>,
    stream: Arc<Mutex<SplitStream<WsStream>>>,
}

impl PeerLink {
    fn new(ws: WsStream) -> Self {
        let (sink, stream) = ws.split();
        Self {
            sink: Arc::new(Mutex::new(sink)),
            stream: Arc::new(Mutex::new(stream)),
        }
    }

    /// Sends one message to the remote peer.
    pub async fn send(&self, data: &[u8]) -> Result<(), PeerError> {
        use futures_util::SinkExt;
        let msg = Message::Binary(data.to_vec().into());
        self.sink
            .lock()
            .await
            .send(msg)
            .await
            .map_err(|e| PeerError::SendFailed(e.to_string()))
    }

    /// Receives the next message.
    ///
    /// Returns `Ok(None)` when the remote peer closed the channel.
    pub async fn recv(&self) -> Result<Option<Vec<u8>>, PeerError> {
        loop {
            let msg = self.stream.lock().await.next().await;
            match msg {
                Some(Ok(Message::Binary(data))) => return Ok(Some(data.into())),
                Some(Ok(Message::Text(text))) => {
                    return Ok(Some(text.as_bytes().to_vec()));
                }
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                Some(Ok(_)) => continue, // ping/pong/frame
                Some(Err(e)) => {
                    return Err(PeerError::ReceiveFailed(e.to_string()));
                }
            }
        }
    }

    /// Closes the channel.
    pub async fn close(&self) -> Result<(), PeerError> {
        use futures_util::SinkExt;
        self.sink
            .lock()
            .await
            .close()
            .await
            .map_err(|e| PeerError::SendFailed(e.to_string()))
    }
}
