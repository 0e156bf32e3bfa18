use crate::core::errors::{ExchangeError, ReadError};
use crate::core::kernel::codec::WsCodec;
use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio_tungstenite::tungstenite::{self, protocol::Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, instrument, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket connection settings
#[derive(Debug, Clone)]
pub struct WsConfig {
    /// Connection timeout in milliseconds
    pub connect_timeout_ms: u64,
}

impl Default for WsConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 10_000,
        }
    }
}

impl WsConfig {
    pub fn with_connect_timeout(mut self, connect_timeout_ms: u64) -> Self {
        self.connect_timeout_ms = connect_timeout_ms;
        self
    }
}

/// Cloneable trigger that closes a connection from any task
///
/// Closing is one-way: once triggered, every pending and future read on the
/// connection fails with [`ReadError::Closed`].
#[derive(Debug, Clone)]
pub struct CloseHandle {
    signal: Arc<watch::Sender<bool>>,
}

impl Default for CloseHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl CloseHandle {
    pub fn new() -> Self {
        let (signal, _) = watch::channel(false);
        Self {
            signal: Arc::new(signal),
        }
    }

    pub fn close(&self) {
        self.signal.send_replace(true);
    }

    pub fn is_closed(&self) -> bool {
        *self.signal.borrow()
    }

    /// Resolves once the handle has been triggered
    pub async fn closed(&self) {
        let mut receiver = self.signal.subscribe();
        let _ = receiver.wait_for(|closed| *closed).await;
    }
}

/// WebSocket session trait - pure transport layer
#[async_trait]
pub trait WsSession: Send {
    /// Receive the next data frame; control frames are handled internally
    async fn next_raw(&mut self) -> Result<Message, ExchangeError>;

    /// Close the connection; calling it again is a no-op
    async fn close(&mut self) -> Result<(), ExchangeError>;

    /// Check if the connection is alive
    fn is_connected(&self) -> bool;

    /// Handle that closes this session from another task
    fn close_handle(&self) -> CloseHandle;
}

/// Tungstenite-based WebSocket session bound to a single stream address
pub struct TungsteniteWs {
    url: String,
    exchange_name: String,
    write: Option<SplitSink<WsStream, Message>>,
    read: Option<SplitStream<WsStream>>,
    shutdown: CloseHandle,
}

impl std::fmt::Debug for TungsteniteWs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TungsteniteWs")
            .field("url", &self.url)
            .field("exchange_name", &self.exchange_name)
            .field("connected", &self.is_connected())
            .finish_non_exhaustive()
    }
}

impl TungsteniteWs {
    /// Open a connection
    ///
    /// # Arguments
    /// * `url` - The full stream address, topic included
    /// * `exchange_name` - Name of the exchange for logging/tracing
    /// * `config` - Connection settings
    #[instrument(skip_all, fields(exchange = %exchange_name, url = %url))]
    pub async fn connect(
        url: String,
        exchange_name: String,
        config: &WsConfig,
    ) -> Result<Self, ExchangeError> {
        let connect_timeout = Duration::from_millis(config.connect_timeout_ms);

        let (ws_stream, _) = tokio::time::timeout(connect_timeout, connect_async(url.as_str()))
            .await
            .map_err(|_| {
                ExchangeError::ConnectionTimeout(format!(
                    "WebSocket connection to {} timed out",
                    url
                ))
            })??;

        let (write, read) = ws_stream.split();
        debug!("WebSocket connected");

        Ok(Self {
            url,
            exchange_name,
            write: Some(write),
            read: Some(read),
            shutdown: CloseHandle::new(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn release(&mut self) {
        self.shutdown.close();
        self.write = None;
        self.read = None;
    }
}

#[async_trait]
impl WsSession for TungsteniteWs {
    async fn next_raw(&mut self) -> Result<Message, ExchangeError> {
        loop {
            if self.shutdown.is_closed() {
                self.release();
                return Err(ReadError::Closed.into());
            }

            let shutdown = self.shutdown.clone();
            let Some(read) = self.read.as_mut() else {
                return Err(ReadError::Closed.into());
            };

            let frame = tokio::select! {
                biased;
                () = shutdown.closed() => None,
                frame = read.next() => Some(frame),
            };

            match frame {
                None | Some(None) => {
                    debug!(exchange = %self.exchange_name, "WebSocket stream ended");
                    self.release();
                    return Err(ReadError::Closed.into());
                }
                Some(Some(Ok(Message::Ping(data)))) => {
                    // Auto-respond to pings at transport level
                    if let Some(write) = self.write.as_mut() {
                        if let Err(e) = write.send(Message::Pong(data)).await {
                            warn!(
                                exchange = %self.exchange_name,
                                "Failed to send pong response: {}", e
                            );
                        }
                    }
                }
                Some(Some(Ok(Message::Pong(_)))) => {}
                Some(Some(Ok(Message::Close(frame)))) => {
                    debug!(exchange = %self.exchange_name, ?frame, "WebSocket closed by peer");
                    self.release();
                    return Err(ReadError::Closed.into());
                }
                Some(Some(Ok(message))) => return Ok(message),
                Some(Some(Err(
                    tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed,
                ))) => {
                    self.release();
                    return Err(ReadError::Closed.into());
                }
                Some(Some(Err(e))) => {
                    self.release();
                    return Err(ReadError::Socket(e).into());
                }
            }
        }
    }

    #[instrument(skip(self), fields(exchange = %self.exchange_name, url = %self.url))]
    async fn close(&mut self) -> Result<(), ExchangeError> {
        self.shutdown.close();
        if let Some(mut write) = self.write.take() {
            if let Err(e) = write.send(Message::Close(None)).await {
                debug!("Close frame not delivered: {}", e);
            }
        }
        self.read = None;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        !self.shutdown.is_closed() && self.read.is_some()
    }

    fn close_handle(&self) -> CloseHandle {
        self.shutdown.clone()
    }
}

/// Reader yielding one decoded update per data frame
///
/// The reader owns its session exclusively; only one task reads a given
/// connection. Use [`WsReader::close_handle`] to abort a pending read from
/// elsewhere.
#[derive(Debug)]
pub struct WsReader<C, S = TungsteniteWs> {
    session: S,
    codec: C,
}

impl<C: WsCodec, S: WsSession> WsReader<C, S> {
    pub fn new(session: S, codec: C) -> Self {
        Self { session, codec }
    }

    /// Wait for the next frame and decode it
    pub async fn read(&mut self) -> Result<C::Message, ExchangeError> {
        loop {
            let frame = self.session.next_raw().await?;
            if let Some(decoded) = self.codec.decode_message(frame)? {
                return Ok(decoded);
            }
        }
    }

    pub async fn close(&mut self) -> Result<(), ExchangeError> {
        self.session.close().await
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_connected()
    }

    pub fn close_handle(&self) -> CloseHandle {
        self.session.close_handle()
    }

    pub fn session(&self) -> &S {
        &self.session
    }
}
