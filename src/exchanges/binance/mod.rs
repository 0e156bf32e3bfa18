pub mod builder;
pub mod codec;
pub mod connector;
pub mod layouts;
pub mod query;
pub mod types;

// Re-export main types for easier importing
pub use builder::{build_connector, build_connector_with_ws_config};
pub use codec::{
    DepthStream, JsonCodec, KlineStream, TradeStream, UserDataCodec, UserDataStream,
};
pub use connector::BinanceConnector;
pub use query::{
    AggTradesOpts, AllOrdersOpts, CancelOrderOpts, DepthOpts, KlinesOpts, MyTradesOpts,
    NewOrderOpts, OpenOrdersOpts, QueryOrderOpts, TickerOpts,
};
pub use types::{
    AccountInfo, AccountUpdate, Depth, DepthLevel, DepthUpdate, Kline, KlineInterval,
    KlineUpdate, ListenKey, OrderSide, OrderStatus, OrderType, OrderUpdate, TimeInForce,
    TradeUpdate, UserDataEvent,
};
