//! Typed request options for the REST endpoints.
//!
//! Field order is wire order. `None` fields are left out of the query
//! entirely; an empty string is still sent.

use crate::core::errors::ExchangeError;
use crate::exchanges::binance::types::{KlineInterval, OrderSide, OrderType, TimeInForce};
use serde::Serialize;

pub const MAX_DEPTH_LIMIT: u32 = 100;
pub const MAX_TRADES_LIMIT: u32 = 500;
pub const DEFAULT_ORDERS_LIMIT: u32 = 500;

/// Longest `startTime`..`endTime` span accepted by the aggregated trades endpoint
pub const MAX_AGG_TRADES_WINDOW_MS: u64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, Default, Serialize)]
pub struct DepthOpts {
    pub symbol: String,
    /// Levels per side, at most 100
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl DepthOpts {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggTradesOpts {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl AggTradesOpts {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Self::default()
        }
    }

    pub fn with_time_range(mut self, start_time: u64, end_time: u64) -> Self {
        self.start_time = Some(start_time);
        self.end_time = Some(end_time);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KlinesOpts {
    pub symbol: String,
    pub interval: KlineInterval,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<u64>,
}

impl KlinesOpts {
    pub fn new(symbol: impl Into<String>, interval: KlineInterval) -> Self {
        Self {
            symbol: symbol.into(),
            interval,
            limit: None,
            start_time: None,
            end_time: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TickerOpts {
    pub symbol: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderOpts {
    pub symbol: String,
    pub side: OrderSide,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<TimeInForce>,
    pub quantity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_client_order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iceberg_qty: Option<String>,
}

impl NewOrderOpts {
    /// Good-till-cancel limit order
    pub fn limit(
        symbol: impl Into<String>,
        side: OrderSide,
        quantity: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type: OrderType::Limit,
            time_in_force: Some(TimeInForce::Gtc),
            quantity: quantity.into(),
            price: Some(price.into()),
            new_client_order_id: None,
            stop_price: None,
            iceberg_qty: None,
        }
    }

    pub fn market(symbol: impl Into<String>, side: OrderSide, quantity: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type: OrderType::Market,
            time_in_force: None,
            quantity: quantity.into(),
            price: None,
            new_client_order_id: None,
            stop_price: None,
            iceberg_qty: None,
        }
    }

    pub fn with_client_order_id(mut self, client_order_id: impl Into<String>) -> Self {
        self.new_client_order_id = Some(client_order_id.into());
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ExchangeError> {
        require_symbol(&self.symbol)?;
        if self.quantity.is_empty() {
            return Err(ExchangeError::InvalidParameters(
                "order quantity is required".to_string(),
            ));
        }
        if self.order_type.requires_price() && self.price.as_deref().map_or(true, str::is_empty) {
            return Err(ExchangeError::InvalidParameters(format!(
                "{:?} orders require a price",
                self.order_type
            )));
        }
        Ok(())
    }
}

/// Identifies one order; at least one id must be set
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryOrderOpts {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orig_client_order_id: Option<String>,
}

impl QueryOrderOpts {
    pub fn by_order_id(symbol: impl Into<String>, order_id: u64) -> Self {
        Self {
            symbol: symbol.into(),
            order_id: Some(order_id),
            orig_client_order_id: None,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ExchangeError> {
        require_symbol(&self.symbol)?;
        require_order_ref(self.order_id, self.orig_client_order_id.as_deref())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderOpts {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orig_client_order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_client_order_id: Option<String>,
}

impl CancelOrderOpts {
    pub fn by_order_id(symbol: impl Into<String>, order_id: u64) -> Self {
        Self {
            symbol: symbol.into(),
            order_id: Some(order_id),
            ..Self::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ExchangeError> {
        require_symbol(&self.symbol)?;
        require_order_ref(self.order_id, self.orig_client_order_id.as_deref())
    }
}

/// Open orders of one symbol, or of every symbol when unset
#[derive(Debug, Clone, Default, Serialize)]
pub struct OpenOrdersOpts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllOrdersOpts {
    pub symbol: String,
    /// Return orders with an id at or above this one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MyTradesOpts {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_id: Option<u64>,
}

/// `None`, zero and anything above `max` all become `max`
pub(crate) fn clamp_limit(limit: Option<u32>, max: u32) -> u32 {
    match limit {
        Some(limit) if limit > 0 && limit <= max => limit,
        _ => max,
    }
}

pub(crate) fn require_symbol(symbol: &str) -> Result<(), ExchangeError> {
    if symbol.is_empty() {
        return Err(ExchangeError::InvalidParameters(
            "symbol is required".to_string(),
        ));
    }
    Ok(())
}

fn require_order_ref(
    order_id: Option<u64>,
    orig_client_order_id: Option<&str>,
) -> Result<(), ExchangeError> {
    let has_client_id = orig_client_order_id.is_some_and(|id| !id.is_empty());
    if order_id.is_none() && !has_client_id {
        return Err(ExchangeError::InvalidParameters(
            "either orderId or origClientOrderId must be set".to_string(),
        ));
    }
    Ok(())
}
