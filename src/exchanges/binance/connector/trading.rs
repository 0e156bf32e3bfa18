use crate::core::errors::ExchangeError;
use crate::core::kernel::{RequestAuth, RequestParams, RestClient};
use crate::exchanges::binance::connector::BinanceConnector;
use crate::exchanges::binance::query::{
    require_symbol, AllOrdersOpts, CancelOrderOpts, NewOrderOpts, OpenOrdersOpts,
    QueryOrderOpts, DEFAULT_ORDERS_LIMIT,
};
use crate::exchanges::binance::types::{CancelOrderResponse, NewOrderAck, OrderInfo};
use reqwest::Method;
use tracing::instrument;

impl<R: RestClient> BinanceConnector<R> {
    /// Place an order
    #[instrument(skip(self), fields(exchange = "binance", symbol = %opts.symbol))]
    pub async fn new_order(&self, opts: &NewOrderOpts) -> Result<NewOrderAck, ExchangeError> {
        opts.validate()?;
        let params = RequestParams::encode(opts)?;
        self.send_json(Method::POST, "/api/v3/order", &params, RequestAuth::Signed)
            .await
    }

    /// Validate an order against the matching engine without placing it
    #[instrument(skip(self), fields(exchange = "binance", symbol = %opts.symbol))]
    pub async fn new_order_test(&self, opts: &NewOrderOpts) -> Result<(), ExchangeError> {
        opts.validate()?;
        let params = RequestParams::encode(opts)?;
        self.send(Method::POST, "/api/v3/order/test", &params, RequestAuth::Signed)
            .await?;
        Ok(())
    }

    #[instrument(skip(self), fields(exchange = "binance", symbol = %opts.symbol))]
    pub async fn query_order(&self, opts: &QueryOrderOpts) -> Result<OrderInfo, ExchangeError> {
        opts.validate()?;
        let params = RequestParams::encode(opts)?;
        self.send_json(Method::GET, "/api/v3/order", &params, RequestAuth::Signed)
            .await
    }

    #[instrument(skip(self), fields(exchange = "binance", symbol = %opts.symbol))]
    pub async fn cancel_order(
        &self,
        opts: &CancelOrderOpts,
    ) -> Result<CancelOrderResponse, ExchangeError> {
        opts.validate()?;
        let params = RequestParams::encode(opts)?;
        self.send_json(Method::DELETE, "/api/v3/order", &params, RequestAuth::Signed)
            .await
    }

    #[instrument(skip(self), fields(exchange = "binance"))]
    pub async fn open_orders(
        &self,
        opts: &OpenOrdersOpts,
    ) -> Result<Vec<OrderInfo>, ExchangeError> {
        let params = RequestParams::encode(opts)?;
        self.send_json(Method::GET, "/api/v3/openOrders", &params, RequestAuth::Signed)
            .await
    }

    /// Every order of a symbol, 500 most recent unless a limit is given
    #[instrument(skip(self), fields(exchange = "binance", symbol = %opts.symbol))]
    pub async fn all_orders(&self, opts: &AllOrdersOpts) -> Result<Vec<OrderInfo>, ExchangeError> {
        require_symbol(&opts.symbol)?;
        let mut opts = opts.clone();
        if opts.limit.map_or(true, |limit| limit == 0) {
            opts.limit = Some(DEFAULT_ORDERS_LIMIT);
        }
        let params = RequestParams::encode(&opts)?;
        self.send_json(Method::GET, "/api/v3/allOrders", &params, RequestAuth::Signed)
            .await
    }
}
