use crate::core::errors::ExchangeError;
use crate::core::kernel::{positional, RequestAuth, RequestParams, RestClient};
use crate::exchanges::binance::connector::BinanceConnector;
use crate::exchanges::binance::query::{
    clamp_limit, require_symbol, AggTradesOpts, DepthOpts, KlinesOpts, TickerOpts,
    MAX_AGG_TRADES_WINDOW_MS, MAX_DEPTH_LIMIT, MAX_TRADES_LIMIT,
};
use crate::exchanges::binance::types::{
    AggregatedTrade, BookTicker, Depth, ExchangeInfo, Kline, ServerTime, SymbolPrice,
    TickerStats,
};
use reqwest::Method;
use tracing::instrument;

impl<R: RestClient> BinanceConnector<R> {
    /// Test connectivity to the REST API
    #[instrument(skip(self), fields(exchange = "binance"))]
    pub async fn ping(&self) -> Result<(), ExchangeError> {
        self.send(
            Method::GET,
            "/api/v3/ping",
            &RequestParams::empty(),
            RequestAuth::Public,
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self), fields(exchange = "binance"))]
    pub async fn server_time(&self) -> Result<ServerTime, ExchangeError> {
        self.send_json(
            Method::GET,
            "/api/v3/time",
            &RequestParams::empty(),
            RequestAuth::Public,
        )
        .await
    }

    /// Trading rules and symbol information
    #[instrument(skip(self), fields(exchange = "binance"))]
    pub async fn exchange_info(&self) -> Result<ExchangeInfo, ExchangeError> {
        self.send_json(
            Method::GET,
            "/api/v3/exchangeInfo",
            &RequestParams::empty(),
            RequestAuth::Public,
        )
        .await
    }

    /// Order book snapshot; the limit is clamped to 100 levels
    #[instrument(skip(self), fields(exchange = "binance"))]
    pub async fn depth(&self, opts: &DepthOpts) -> Result<Depth, ExchangeError> {
        require_symbol(&opts.symbol)?;
        let opts = DepthOpts {
            symbol: opts.symbol.clone(),
            limit: Some(clamp_limit(opts.limit, MAX_DEPTH_LIMIT)),
        };
        let params = RequestParams::encode(&opts)?;
        self.send_json(Method::GET, "/api/v3/depth", &params, RequestAuth::Public)
            .await
    }

    /// Compressed trades
    ///
    /// When both `start_time` and `end_time` are given the limit is not sent
    /// and the range must be shorter than 24 hours.
    #[instrument(skip(self), fields(exchange = "binance"))]
    pub async fn aggregated_trades(
        &self,
        opts: &AggTradesOpts,
    ) -> Result<Vec<AggregatedTrade>, ExchangeError> {
        require_symbol(&opts.symbol)?;
        let mut opts = opts.clone();
        match (opts.start_time, opts.end_time) {
            (Some(start), Some(end)) => {
                if end < start || end - start >= MAX_AGG_TRADES_WINDOW_MS {
                    return Err(ExchangeError::InvalidParameters(format!(
                        "aggregated trades range must be under 24h, got {}..{}",
                        start, end
                    )));
                }
                opts.limit = None;
            }
            _ => opts.limit = Some(clamp_limit(opts.limit, MAX_TRADES_LIMIT)),
        }
        let params = RequestParams::encode(&opts)?;
        self.send_json(Method::GET, "/api/v3/aggTrades", &params, RequestAuth::Public)
            .await
    }

    /// Candlestick bars, decoded from their positional wire form
    #[instrument(skip(self), fields(exchange = "binance"))]
    pub async fn klines(&self, opts: &KlinesOpts) -> Result<Vec<Kline>, ExchangeError> {
        require_symbol(&opts.symbol)?;
        let mut opts = opts.clone();
        opts.limit = Some(clamp_limit(opts.limit, MAX_TRADES_LIMIT));
        let params = RequestParams::encode(&opts)?;
        let body = self
            .send(Method::GET, "/api/v3/klines", &params, RequestAuth::Public)
            .await?;
        Ok(positional::decode_list(&body)?)
    }

    /// 24 hour rolling price change statistics
    #[instrument(skip(self), fields(exchange = "binance"))]
    pub async fn ticker_24hr(&self, opts: &TickerOpts) -> Result<TickerStats, ExchangeError> {
        require_symbol(&opts.symbol)?;
        let params = RequestParams::encode(opts)?;
        self.send_json(Method::GET, "/api/v3/ticker/24hr", &params, RequestAuth::Public)
            .await
    }

    /// Latest price of every symbol
    #[instrument(skip(self), fields(exchange = "binance"))]
    pub async fn prices(&self) -> Result<Vec<SymbolPrice>, ExchangeError> {
        self.send_json(
            Method::GET,
            "/api/v3/ticker/price",
            &RequestParams::empty(),
            RequestAuth::Public,
        )
        .await
    }

    /// Best bid and ask of every symbol
    #[instrument(skip(self), fields(exchange = "binance"))]
    pub async fn book_tickers(&self) -> Result<Vec<BookTicker>, ExchangeError> {
        self.send_json(
            Method::GET,
            "/api/v3/ticker/bookTicker",
            &RequestParams::empty(),
            RequestAuth::Public,
        )
        .await
    }
}
