pub mod core;
pub mod exchanges;

pub use crate::core::{
    config::ExchangeConfig,
    errors::{ExchangeError, ParseError, ReadError},
};
pub use crate::exchanges::binance::{build_connector, BinanceConnector};
