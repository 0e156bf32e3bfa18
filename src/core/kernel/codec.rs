use crate::core::errors::ExchangeError;
use tokio_tungstenite::tungstenite::Message;

/// Codec trait for turning raw WebSocket frames into typed updates
///
/// Each connection is bound to exactly one codec, so the update type of a
/// stream is fixed when the stream is opened.
pub trait WsCodec: Send + Sync + 'static {
    /// The type representing parsed messages from this stream
    type Message: Send + Sync;

    /// Decode a raw WebSocket message into a typed message
    ///
    /// This method should only handle data messages. Control messages (ping, pong, close)
    /// are handled at the transport level.
    ///
    /// # Returns
    /// - `Ok(Some(message))` - Successfully decoded message
    /// - `Ok(None)` - Frame carried no data for this codec
    /// - `Err(error)` - Failed to decode message
    fn decode_message(&self, message: Message) -> Result<Option<Self::Message>, ExchangeError>;
}
