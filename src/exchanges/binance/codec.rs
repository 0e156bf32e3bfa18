use crate::core::errors::{ExchangeError, ReadError};
use crate::core::kernel::WsCodec;
use crate::exchanges::binance::types::{
    AccountUpdate, DepthUpdate, EventEnvelope, KlineInterval, KlineUpdate, OrderUpdate,
    TradeUpdate, UpdateType, UserDataEvent,
};
use serde::de::DeserializeOwned;
use std::fmt;
use std::marker::PhantomData;
use tokio_tungstenite::tungstenite::Message;

/// Decodes every data frame of a connection into one fixed update type
pub struct JsonCodec<T> {
    _update: PhantomData<fn() -> T>,
}

impl<T> JsonCodec<T> {
    pub const fn new() -> Self {
        Self {
            _update: PhantomData,
        }
    }
}

impl<T> Default for JsonCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for JsonCodec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JsonCodec<{}>", std::any::type_name::<T>())
    }
}

impl<T> WsCodec for JsonCodec<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    type Message = T;

    fn decode_message(&self, message: Message) -> Result<Option<T>, ExchangeError> {
        let update = match message {
            Message::Text(text) => serde_json::from_str(&text),
            Message::Binary(data) => serde_json::from_slice(&data),
            _ => return Ok(None),
        };
        update.map(Some).map_err(|e| ReadError::Decode(e).into())
    }
}

/// Decodes the user data stream, which carries account and order updates on one socket
///
/// Each frame is probed for its event tag first, then decoded in full as
/// the shape the tag names.
#[derive(Debug, Default, Clone, Copy)]
pub struct UserDataCodec;

impl UserDataCodec {
    fn decode_bytes(bytes: &[u8]) -> Result<UserDataEvent, ExchangeError> {
        let envelope: EventEnvelope = serde_json::from_slice(bytes).map_err(ReadError::Decode)?;

        if envelope.event_type == UpdateType::OutboundAccountInfo.as_str() {
            let update: AccountUpdate = serde_json::from_slice(bytes).map_err(ReadError::Decode)?;
            Ok(UserDataEvent::Account(update))
        } else if envelope.event_type == UpdateType::ExecutionReport.as_str() {
            let update: OrderUpdate = serde_json::from_slice(bytes).map_err(ReadError::Decode)?;
            Ok(UserDataEvent::Order(Box::new(update)))
        } else {
            Err(ExchangeError::ProtocolError {
                event_type: envelope.event_type,
            })
        }
    }
}

impl WsCodec for UserDataCodec {
    type Message = UserDataEvent;

    fn decode_message(&self, message: Message) -> Result<Option<UserDataEvent>, ExchangeError> {
        match message {
            Message::Text(text) => Self::decode_bytes(text.as_bytes()).map(Some),
            Message::Binary(data) => Self::decode_bytes(&data).map(Some),
            _ => Ok(None),
        }
    }
}

pub type DepthStream = JsonCodec<DepthUpdate>;
pub type KlineStream = JsonCodec<KlineUpdate>;
pub type TradeStream = JsonCodec<TradeUpdate>;
pub type UserDataStream = UserDataCodec;

// Stream topics

pub fn depth_topic(symbol: &str) -> String {
    format!("{}@depth", symbol.to_lowercase())
}

pub fn kline_topic(symbol: &str, interval: KlineInterval) -> String {
    format!("{}@kline_{}", symbol.to_lowercase(), interval.as_str())
}

pub fn trade_topic(symbol: &str) -> String {
    format!("{}@aggTrade", symbol.to_lowercase())
}

/// Full stream address for a topic
pub fn stream_url(ws_base: &str, topic: &str) -> String {
    format!("{}/{}", ws_base.trim_end_matches('/'), topic)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCOUNT_FRAME: &str = r#"{"e":"outboundAccountInfo","E":1499405658849,"m":0,"t":0,"b":0,"s":0,"T":true,"W":true,"D":true,"B":[{"a":"LTC","f":"17366.18538083","l":"0.00000000"},{"a":"BTC","f":"10537.85314051","l":"2.19464093"}]}"#;
    const ORDER_FRAME: &str = r#"{"e":"executionReport","E":1499405658658,"s":"ETHBTC","c":"mUvoqJxFIILMdfAW5iGSOW","S":"BUY","o":"LIMIT","f":"GTC","q":"1.00000000","p":"0.10264410","x":"TRADE","X":"FILLED","r":"NONE","i":4293153,"l":"1.00000000","z":"1.00000000","L":"0.10264410","n":"0.00100000","N":"BNB","T":1499405658657,"t":77,"m":true}"#;

    #[test]
    fn test_depth_stream_decodes_positional_levels() {
        let frame = Message::Text(
            r#"{"e":"depthUpdate","E":123456789,"s":"BNBBTC","U":157,"u":160,"b":[["0.0024","10"]],"a":[["0.0026","100"]]}"#
                .to_string(),
        );
        let update = DepthStream::new().decode_message(frame).unwrap().unwrap();

        assert_eq!(update.event_type, UpdateType::DepthUpdate);
        assert_eq!(update.final_update_id, 160);
        assert_eq!(update.bids[0].price, "0.0024");
        assert_eq!(update.asks[0].quantity, "100");
    }

    #[test]
    fn test_binary_frames_are_decoded() {
        let frame = Message::Binary(
            br#"{"e":"aggTrade","E":1,"s":"BNBBTC","a":12345,"p":"0.001","q":"100","f":100,"l":105,"T":123456785,"m":true}"#
                .to_vec(),
        );
        let trade = TradeStream::new().decode_message(frame).unwrap().unwrap();
        assert_eq!(trade.trade_id, 12345);
        assert!(trade.is_buyer_maker);
    }

    #[test]
    fn test_control_frames_yield_nothing() {
        assert!(KlineStream::new()
            .decode_message(Message::Ping(vec![1]))
            .unwrap()
            .is_none());
        assert!(UserDataCodec
            .decode_message(Message::Pong(vec![]))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_malformed_frame_is_decode_error() {
        let result = DepthStream::new().decode_message(Message::Text("{\"e\":".to_string()));
        assert!(matches!(
            result,
            Err(ExchangeError::ReadError(ReadError::Decode(_)))
        ));
    }

    #[test]
    fn test_user_data_account_frame() {
        let event = UserDataCodec
            .decode_message(Message::Text(ACCOUNT_FRAME.to_string()))
            .unwrap()
            .unwrap();

        let account = event.account().unwrap();
        assert!(event.order().is_none());
        assert_eq!(account.balances.len(), 2);
        assert_eq!(account.balances[1].locked, "2.19464093");
    }

    #[test]
    fn test_user_data_order_frame() {
        let event = UserDataCodec
            .decode_message(Message::Text(ORDER_FRAME.to_string()))
            .unwrap()
            .unwrap();

        assert!(event.account().is_none());
        let order = event.order().unwrap();
        assert_eq!(order.order_id, 4_293_153);
        assert_eq!(order.trade_id, 77);
        assert_eq!(order.commission_asset.as_deref(), Some("BNB"));
    }

    #[test]
    fn test_user_data_unknown_tag_is_protocol_error() {
        let result = UserDataCodec.decode_message(Message::Text(
            r#"{"e":"balanceUpdate","E":1573200697110,"a":"BTC","d":"100.00000000"}"#.to_string(),
        ));
        match result {
            Err(ExchangeError::ProtocolError { event_type }) => {
                assert_eq!(event_type, "balanceUpdate");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_user_data_frame_without_envelope() {
        let result = UserDataCodec.decode_message(Message::Text(r#"{"result":null}"#.to_string()));
        assert!(matches!(
            result,
            Err(ExchangeError::ReadError(ReadError::Decode(_)))
        ));
    }

    #[test]
    fn test_topics() {
        assert_eq!(depth_topic("BNBBTC"), "bnbbtc@depth");
        assert_eq!(kline_topic("ETHBTC", KlineInterval::Hours1), "ethbtc@kline_1h");
        assert_eq!(trade_topic("LtcBtc"), "ltcbtc@aggTrade");
        assert_eq!(
            stream_url("wss://stream.binance.com:9443/ws/", "bnbbtc@depth"),
            "wss://stream.binance.com:9443/ws/bnbbtc@depth"
        );
    }
}
