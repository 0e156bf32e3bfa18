use crate::core::errors::ExchangeError;
use crate::core::kernel::{RequestAuth, RequestParams, RestClient};
use crate::exchanges::binance::connector::BinanceConnector;
use crate::exchanges::binance::query::{clamp_limit, require_symbol, MyTradesOpts, MAX_TRADES_LIMIT};
use crate::exchanges::binance::types::{AccountInfo, AccountTrade, ListenKey};
use reqwest::Method;
use tracing::instrument;

const USER_DATA_STREAM: &str = "/api/v3/userDataStream";

impl<R: RestClient> BinanceConnector<R> {
    /// Commissions, permissions and balances
    #[instrument(skip(self), fields(exchange = "binance"))]
    pub async fn account(&self) -> Result<AccountInfo, ExchangeError> {
        self.send_json(
            Method::GET,
            "/api/v3/account",
            &RequestParams::empty(),
            RequestAuth::Signed,
        )
        .await
    }

    /// The account's fills on one symbol
    #[instrument(skip(self), fields(exchange = "binance", symbol = %opts.symbol))]
    pub async fn my_trades(&self, opts: &MyTradesOpts) -> Result<Vec<AccountTrade>, ExchangeError> {
        require_symbol(&opts.symbol)?;
        let mut opts = opts.clone();
        opts.limit = Some(clamp_limit(opts.limit, MAX_TRADES_LIMIT));
        let params = RequestParams::encode(&opts)?;
        self.send_json(Method::GET, "/api/v3/myTrades", &params, RequestAuth::Signed)
            .await
    }

    /// Open a user data stream session and return its listen key
    #[instrument(skip(self), fields(exchange = "binance"))]
    pub async fn start_user_data_stream(&self) -> Result<ListenKey, ExchangeError> {
        self.send_json(
            Method::POST,
            USER_DATA_STREAM,
            &RequestParams::empty(),
            RequestAuth::ApiKey,
        )
        .await
    }

    /// Extend a session; the exchange expires idle keys after 60 minutes
    #[instrument(skip_all, fields(exchange = "binance"))]
    pub async fn keepalive_user_data_stream(
        &self,
        listen_key: &ListenKey,
    ) -> Result<(), ExchangeError> {
        let params = listen_key_params(listen_key)?;
        self.send(Method::PUT, USER_DATA_STREAM, &params, RequestAuth::ApiKey)
            .await?;
        Ok(())
    }

    #[instrument(skip_all, fields(exchange = "binance"))]
    pub async fn close_user_data_stream(
        &self,
        listen_key: &ListenKey,
    ) -> Result<(), ExchangeError> {
        let params = listen_key_params(listen_key)?;
        self.send(Method::DELETE, USER_DATA_STREAM, &params, RequestAuth::ApiKey)
            .await?;
        Ok(())
    }
}

fn listen_key_params(listen_key: &ListenKey) -> Result<RequestParams, ExchangeError> {
    if listen_key.listen_key.is_empty() {
        return Err(ExchangeError::InvalidParameters(
            "listen key is required".to_string(),
        ));
    }
    RequestParams::encode(listen_key)
}
