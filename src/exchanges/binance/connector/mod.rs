pub mod account;
pub mod market_data;
pub mod streams;
pub mod trading;

use crate::core::errors::{ExchangeError, ParseError};
use crate::core::kernel::{RequestAuth, RequestParams, ReqwestRest, RestClient, WsConfig};
use reqwest::Method;
use serde::de::DeserializeOwned;

/// Binance spot connector
///
/// Endpoint methods live in `market_data`, `trading` and `account`; stream
/// openers in `streams`. The connector holds no per-call state and can be
/// shared across tasks behind an `Arc`.
#[derive(Debug, Clone)]
pub struct BinanceConnector<R: RestClient = ReqwestRest> {
    rest: R,
    ws_url: String,
    ws_config: WsConfig,
}

impl<R: RestClient> BinanceConnector<R> {
    pub fn new(rest: R, ws_url: String) -> Self {
        Self {
            rest,
            ws_url,
            ws_config: WsConfig::default(),
        }
    }

    pub fn with_ws_config(mut self, ws_config: WsConfig) -> Self {
        self.ws_config = ws_config;
        self
    }

    /// Underlying transport
    pub fn rest(&self) -> &R {
        &self.rest
    }

    /// Stream base address; topics are appended to it
    pub fn ws_url(&self) -> &str {
        &self.ws_url
    }

    pub(crate) async fn send(
        &self,
        method: Method,
        endpoint: &str,
        params: &RequestParams,
        auth: RequestAuth,
    ) -> Result<Vec<u8>, ExchangeError> {
        self.rest.execute(method, endpoint, params, auth).await
    }

    /// Execute and decode a field-tagged JSON response
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        params: &RequestParams,
        auth: RequestAuth,
    ) -> Result<T, ExchangeError> {
        let body = self.send(method, endpoint, params, auth).await?;
        Ok(serde_json::from_slice(&body).map_err(ParseError::Json)?)
    }
}
