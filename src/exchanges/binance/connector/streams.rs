use crate::core::errors::ExchangeError;
use crate::core::kernel::{RestClient, TungsteniteWs, WsCodec, WsReader};
use crate::exchanges::binance::codec::{
    depth_topic, kline_topic, stream_url, trade_topic, DepthStream, KlineStream, TradeStream,
    UserDataStream,
};
use crate::exchanges::binance::connector::BinanceConnector;
use crate::exchanges::binance::types::{KlineInterval, ListenKey};
use tracing::instrument;

impl<R: RestClient> BinanceConnector<R> {
    /// Open one connection bound to `topic` and decoding with `codec`
    pub async fn open_stream<C: WsCodec>(
        &self,
        topic: &str,
        codec: C,
    ) -> Result<WsReader<C>, ExchangeError> {
        let url = stream_url(&self.ws_url, topic);
        let session = TungsteniteWs::connect(url, "binance".to_string(), &self.ws_config).await?;
        Ok(WsReader::new(session, codec))
    }

    /// Order book diffs for one symbol
    #[instrument(skip(self), fields(exchange = "binance"))]
    pub async fn depth_stream(&self, symbol: &str) -> Result<WsReader<DepthStream>, ExchangeError> {
        self.open_stream(&depth_topic(symbol), DepthStream::new())
            .await
    }

    #[instrument(skip(self), fields(exchange = "binance"))]
    pub async fn kline_stream(
        &self,
        symbol: &str,
        interval: KlineInterval,
    ) -> Result<WsReader<KlineStream>, ExchangeError> {
        self.open_stream(&kline_topic(symbol, interval), KlineStream::new())
            .await
    }

    /// Aggregated trades for one symbol
    #[instrument(skip(self), fields(exchange = "binance"))]
    pub async fn trade_stream(&self, symbol: &str) -> Result<WsReader<TradeStream>, ExchangeError> {
        self.open_stream(&trade_topic(symbol), TradeStream::new())
            .await
    }

    /// Account and order updates for the session named by `listen_key`
    #[instrument(skip_all, fields(exchange = "binance"))]
    pub async fn user_data_stream(
        &self,
        listen_key: &ListenKey,
    ) -> Result<WsReader<UserDataStream>, ExchangeError> {
        if listen_key.listen_key.is_empty() {
            return Err(ExchangeError::InvalidParameters(
                "listen key is required".to_string(),
            ));
        }
        self.open_stream(&listen_key.listen_key, UserDataStream::default())
            .await
    }
}
