use crate::core::kernel::positional;
use serde::{Deserialize, Serialize};

// Enumerations

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    Limit,
    Market,
    StopLoss,
    StopLossLimit,
    TakeProfit,
    TakeProfitLimit,
    LimitMaker,
}

impl OrderType {
    /// Order types whose request must carry a limit price
    pub const fn requires_price(self) -> bool {
        matches!(
            self,
            Self::Limit | Self::StopLossLimit | Self::TakeProfitLimit | Self::LimitMaker
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeInForce {
    /// Good till cancel
    Gtc,
    /// Immediate or cancel
    Ioc,
    /// Fill or kill
    Fok,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    New,
    PartiallyFilled,
    Filled,
    Canceled,
    PendingCancel,
    Rejected,
    Expired,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionType {
    New,
    Canceled,
    Replaced,
    Rejected,
    Trade,
    Expired,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderRejectReason {
    None,
    UnknownInstrument,
    MarketClosed,
    PriceQtyExceedHardLimits,
    UnknownOrder,
    DuplicateOrder,
    UnknownAccount,
    InsufficientBalance,
    AccountInactive,
    AccountCannotSettle,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KlineInterval {
    #[serde(rename = "1m")]
    Minutes1,
    #[serde(rename = "3m")]
    Minutes3,
    #[serde(rename = "5m")]
    Minutes5,
    #[serde(rename = "15m")]
    Minutes15,
    #[serde(rename = "30m")]
    Minutes30,
    #[serde(rename = "1h")]
    Hours1,
    #[serde(rename = "2h")]
    Hours2,
    #[serde(rename = "4h")]
    Hours4,
    #[serde(rename = "6h")]
    Hours6,
    #[serde(rename = "8h")]
    Hours8,
    #[serde(rename = "12h")]
    Hours12,
    #[serde(rename = "1d")]
    Days1,
    #[serde(rename = "3d")]
    Days3,
    #[serde(rename = "1w")]
    Weeks1,
    #[serde(rename = "1M")]
    Months1,
}

impl KlineInterval {
    /// Wire form, as used in query strings and stream topics
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Minutes1 => "1m",
            Self::Minutes3 => "3m",
            Self::Minutes5 => "5m",
            Self::Minutes15 => "15m",
            Self::Minutes30 => "30m",
            Self::Hours1 => "1h",
            Self::Hours2 => "2h",
            Self::Hours4 => "4h",
            Self::Hours6 => "6h",
            Self::Hours8 => "8h",
            Self::Hours12 => "12h",
            Self::Days1 => "1d",
            Self::Days3 => "3d",
            Self::Weeks1 => "1w",
            Self::Months1 => "1M",
        }
    }
}

impl std::fmt::Display for KlineInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SymbolStatus {
    PreTrading,
    Trading,
    PostTrading,
    EndOfDay,
    Halt,
    AuctionMatch,
    Break,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterType {
    PriceFilter,
    LotSize,
    MinNotional,
    #[serde(other)]
    Other,
}

/// Event tag carried in the `e` field of stream frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UpdateType {
    DepthUpdate,
    Kline,
    AggTrade,
    OutboundAccountInfo,
    ExecutionReport,
}

impl UpdateType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DepthUpdate => "depthUpdate",
            Self::Kline => "kline",
            Self::AggTrade => "aggTrade",
            Self::OutboundAccountInfo => "outboundAccountInfo",
            Self::ExecutionReport => "executionReport",
        }
    }
}

// REST records

#[derive(Debug, Clone, Deserialize)]
pub struct ServerTime {
    #[serde(rename = "serverTime")]
    pub server_time: u64,
}

/// One order book level, wire form `["price","quantity"]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepthLevel {
    pub price: String,
    pub quantity: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Depth {
    #[serde(rename = "lastUpdateId")]
    pub last_update_id: u64,
    #[serde(deserialize_with = "positional::records")]
    pub bids: Vec<DepthLevel>,
    #[serde(deserialize_with = "positional::records")]
    pub asks: Vec<DepthLevel>,
}

/// Candlestick bar, wire form is an 11-element array
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Kline {
    pub open_time: u64,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: String,
    pub close_time: u64,
    pub quote_asset_volume: String,
    pub trades: u32,
    pub taker_buy_base_volume: String,
    pub taker_buy_quote_volume: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AggregatedTrade {
    #[serde(rename = "a")]
    pub trade_id: u64,
    #[serde(rename = "p")]
    pub price: String,
    #[serde(rename = "q")]
    pub quantity: String,
    #[serde(rename = "f")]
    pub first_trade_id: u64,
    #[serde(rename = "l")]
    pub last_trade_id: u64,
    #[serde(rename = "T")]
    pub time: u64,
    #[serde(rename = "m")]
    pub is_buyer_maker: bool,
    #[serde(rename = "M")]
    pub is_best_match: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookTicker {
    pub symbol: String,
    #[serde(rename = "bidPrice")]
    pub bid_price: String,
    #[serde(rename = "bidQty")]
    pub bid_qty: String,
    #[serde(rename = "askPrice")]
    pub ask_price: String,
    #[serde(rename = "askQty")]
    pub ask_qty: String,
}

/// Rolling 24 hour statistics for one symbol
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerStats {
    #[serde(default)]
    pub symbol: String,
    pub price_change: String,
    pub price_change_percent: String,
    pub weighted_avg_price: String,
    pub prev_close_price: String,
    pub last_price: String,
    pub bid_price: String,
    pub ask_price: String,
    pub open_price: String,
    pub high_price: String,
    pub low_price: String,
    pub volume: String,
    pub open_time: u64,
    pub close_time: u64,
    /// `-1` when no trade happened in the window
    pub first_id: i64,
    pub last_id: i64,
    pub count: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SymbolPrice {
    pub symbol: String,
    pub price: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderAck {
    pub symbol: String,
    pub order_id: u64,
    #[serde(alias = "origClientOrderId")]
    pub client_order_id: String,
    pub transact_time: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderInfo {
    pub symbol: String,
    pub order_id: u64,
    pub client_order_id: String,
    pub price: String,
    pub orig_qty: String,
    pub executed_qty: String,
    pub status: OrderStatus,
    pub time_in_force: TimeInForce,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub side: OrderSide,
    #[serde(default)]
    pub stop_price: String,
    #[serde(default)]
    pub iceberg_qty: String,
    pub time: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderResponse {
    pub symbol: String,
    pub order_id: u64,
    pub orig_client_order_id: String,
    pub client_order_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Balance {
    pub asset: String,
    pub free: String,
    pub locked: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    pub maker_commission: i64,
    pub taker_commission: i64,
    pub buyer_commission: i64,
    pub seller_commission: i64,
    pub can_trade: bool,
    pub can_withdraw: bool,
    pub can_deposit: bool,
    pub balances: Vec<Balance>,
}

/// One fill of the account's own orders
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountTrade {
    pub id: u64,
    #[serde(default)]
    pub order_id: u64,
    pub price: String,
    pub qty: String,
    pub commission: String,
    pub commission_asset: String,
    pub time: u64,
    pub is_buyer: bool,
    pub is_maker: bool,
    pub is_best_match: bool,
}

/// User data stream session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListenKey {
    #[serde(rename = "listenKey")]
    pub listen_key: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeInfo {
    #[serde(default)]
    pub timezone: String,
    #[serde(default)]
    pub server_time: u64,
    pub symbols: Vec<SymbolInfo>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolInfo {
    pub symbol: String,
    pub status: SymbolStatus,
    pub base_asset: String,
    pub base_asset_precision: u32,
    pub quote_asset: String,
    #[serde(alias = "quotePrecision")]
    pub quote_asset_precision: u32,
    pub order_types: Vec<OrderType>,
    #[serde(rename = "icebergAllowed")]
    pub iceberg: bool,
    pub filters: Vec<SymbolFilter>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolFilter {
    pub filter_type: FilterType,
    // PRICE_FILTER
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub tick_size: Option<String>,
    // LOT_SIZE
    pub min_qty: Option<String>,
    pub max_qty: Option<String>,
    pub step_size: Option<String>,
    // MIN_NOTIONAL
    pub min_notional: Option<String>,
}

// Stream records

#[derive(Debug, Clone, Deserialize)]
pub struct DepthUpdate {
    #[serde(rename = "e")]
    pub event_type: UpdateType,
    #[serde(rename = "E")]
    pub event_time: u64,
    #[serde(rename = "s")]
    pub symbol: String,
    #[serde(rename = "U", default)]
    pub first_update_id: u64,
    /// Matches `lastUpdateId` of the REST depth snapshot
    #[serde(rename = "u")]
    pub final_update_id: u64,
    #[serde(rename = "b", deserialize_with = "positional::records")]
    pub bids: Vec<DepthLevel>,
    #[serde(rename = "a", deserialize_with = "positional::records")]
    pub asks: Vec<DepthLevel>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KlineUpdate {
    #[serde(rename = "e")]
    pub event_type: UpdateType,
    #[serde(rename = "E")]
    pub event_time: u64,
    #[serde(rename = "s")]
    pub symbol: String,
    #[serde(rename = "k")]
    pub kline: KlineBar,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KlineBar {
    #[serde(rename = "t")]
    pub start_time: u64,
    #[serde(rename = "T")]
    pub end_time: u64,
    #[serde(rename = "s")]
    pub symbol: String,
    #[serde(rename = "i")]
    pub interval: KlineInterval,
    #[serde(rename = "f")]
    pub first_trade_id: i64,
    #[serde(rename = "L")]
    pub last_trade_id: i64,
    #[serde(rename = "o")]
    pub open: String,
    #[serde(rename = "c")]
    pub close: String,
    #[serde(rename = "h")]
    pub high: String,
    #[serde(rename = "l")]
    pub low: String,
    #[serde(rename = "v")]
    pub volume: String,
    #[serde(rename = "n")]
    pub trades: u64,
    /// Bar is closed and will receive no further updates
    #[serde(rename = "x")]
    pub is_final: bool,
    #[serde(rename = "q")]
    pub quote_volume: String,
    #[serde(rename = "V")]
    pub taker_buy_base_volume: String,
    #[serde(rename = "Q")]
    pub taker_buy_quote_volume: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TradeUpdate {
    #[serde(rename = "e")]
    pub event_type: UpdateType,
    #[serde(rename = "E")]
    pub event_time: u64,
    #[serde(rename = "s")]
    pub symbol: String,
    #[serde(rename = "a")]
    pub trade_id: u64,
    #[serde(rename = "p")]
    pub price: String,
    #[serde(rename = "q")]
    pub quantity: String,
    #[serde(rename = "f")]
    pub first_trade_id: u64,
    #[serde(rename = "l")]
    pub last_trade_id: u64,
    #[serde(rename = "T")]
    pub trade_time: u64,
    #[serde(rename = "m")]
    pub is_buyer_maker: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StreamBalance {
    #[serde(rename = "a")]
    pub asset: String,
    #[serde(rename = "f")]
    pub free: String,
    #[serde(rename = "l")]
    pub locked: String,
}

/// Account snapshot pushed on the user data stream
#[derive(Debug, Clone, Deserialize)]
pub struct AccountUpdate {
    #[serde(rename = "e")]
    pub event_type: UpdateType,
    #[serde(rename = "E")]
    pub event_time: u64,
    #[serde(rename = "m")]
    pub maker_commission: i64,
    #[serde(rename = "t")]
    pub taker_commission: i64,
    #[serde(rename = "b")]
    pub buyer_commission: i64,
    #[serde(rename = "s")]
    pub seller_commission: i64,
    #[serde(rename = "T")]
    pub can_trade: bool,
    #[serde(rename = "W")]
    pub can_withdraw: bool,
    #[serde(rename = "D")]
    pub can_deposit: bool,
    #[serde(rename = "B")]
    pub balances: Vec<StreamBalance>,
}

/// Per-order execution report pushed on the user data stream
#[derive(Debug, Clone, Deserialize)]
pub struct OrderUpdate {
    #[serde(rename = "e")]
    pub event_type: UpdateType,
    #[serde(rename = "E")]
    pub event_time: u64,
    #[serde(rename = "s")]
    pub symbol: String,
    #[serde(rename = "c")]
    pub client_order_id: String,
    #[serde(rename = "S")]
    pub side: OrderSide,
    #[serde(rename = "o")]
    pub order_type: OrderType,
    #[serde(rename = "f")]
    pub time_in_force: TimeInForce,
    #[serde(rename = "q")]
    pub orig_qty: String,
    #[serde(rename = "p")]
    pub price: String,
    #[serde(rename = "x")]
    pub execution_type: ExecutionType,
    #[serde(rename = "X")]
    pub status: OrderStatus,
    #[serde(rename = "r")]
    pub reject_reason: OrderRejectReason,
    #[serde(rename = "i")]
    pub order_id: u64,
    #[serde(rename = "l")]
    pub last_filled_qty: String,
    #[serde(rename = "L")]
    pub last_filled_price: String,
    #[serde(rename = "z")]
    pub cumulative_filled_qty: String,
    #[serde(rename = "n")]
    pub commission: String,
    /// Null until the order has a fill
    #[serde(rename = "N")]
    pub commission_asset: Option<String>,
    /// Order time for new orders, trade time for fills; one wire field
    #[serde(rename = "T")]
    pub transaction_time: u64,
    /// `-1` when the report is not a fill
    #[serde(rename = "t")]
    pub trade_id: i64,
    #[serde(rename = "m")]
    pub is_maker: bool,
}

/// Minimal probe present on every user data stream frame
#[derive(Debug, Clone, Deserialize)]
pub struct EventEnvelope {
    #[serde(rename = "e")]
    pub event_type: String,
    #[serde(rename = "E")]
    pub event_time: u64,
}

/// One update from the user data stream
#[derive(Debug, Clone)]
pub enum UserDataEvent {
    Account(AccountUpdate),
    Order(Box<OrderUpdate>),
}

impl UserDataEvent {
    pub fn account(&self) -> Option<&AccountUpdate> {
        match self {
            Self::Account(update) => Some(update),
            Self::Order(_) => None,
        }
    }

    pub fn order(&self) -> Option<&OrderUpdate> {
        match self {
            Self::Order(update) => Some(update),
            Self::Account(_) => None,
        }
    }

    pub fn event_time(&self) -> u64 {
        match self {
            Self::Account(update) => update.event_time,
            Self::Order(update) => update.event_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_snapshot_levels_stay_verbatim() {
        let depth: Depth = serde_json::from_str(
            r#"{"lastUpdateId":1027024,"bids":[["4.00000000","431.00000000",[]]],"asks":[["4.00000200","12.00000000",[]]]}"#,
        )
        .unwrap();

        assert_eq!(depth.last_update_id, 1_027_024);
        assert_eq!(depth.bids[0].price, "4.00000000");
        assert_eq!(depth.bids[0].quantity, "431.00000000");
        assert_eq!(depth.asks[0].price, "4.00000200");
    }

    #[test]
    fn test_order_update_single_transaction_time() {
        let update: OrderUpdate = serde_json::from_str(
            r#"{"e":"executionReport","E":1499405658658,"s":"ETHBTC","c":"mUvoqJxFIILMdfAW5iGSOW",
                "S":"BUY","o":"LIMIT","f":"GTC","q":"1.00000000","p":"0.10264410","P":"0.00000000",
                "F":"0.00000000","g":-1,"C":"","x":"NEW","X":"NEW","r":"NONE","i":4293153,
                "l":"0.00000000","z":"0.00000000","L":"0.00000000","n":"0","N":null,
                "T":1499405658657,"t":-1,"I":8641984,"w":true,"m":false,"M":false}"#,
        )
        .unwrap();

        assert_eq!(update.event_type, UpdateType::ExecutionReport);
        assert_eq!(update.transaction_time, 1_499_405_658_657);
        assert_eq!(update.trade_id, -1);
        assert_eq!(update.commission_asset, None);
        assert_eq!(update.execution_type, ExecutionType::New);
        assert_eq!(update.reject_reason, OrderRejectReason::None);
    }

    #[test]
    fn test_unknown_status_does_not_fail_decode() {
        let status: OrderStatus = serde_json::from_str(r#""EXPIRED_IN_MATCH""#).unwrap();
        assert_eq!(status, OrderStatus::Unknown);
    }

    #[test]
    fn test_kline_interval_wire_form() {
        assert_eq!(
            serde_json::to_string(&KlineInterval::Months1).unwrap(),
            r#""1M""#
        );
        assert_eq!(KlineInterval::Minutes15.as_str(), "15m");
        assert_eq!(KlineInterval::Hours1.to_string(), "1h");
    }

    #[test]
    fn test_price_requirement_by_order_type() {
        assert!(OrderType::Limit.requires_price());
        assert!(OrderType::LimitMaker.requires_price());
        assert!(!OrderType::Market.requires_price());
        assert!(!OrderType::StopLoss.requires_price());
    }

    #[test]
    fn test_user_data_event_slots() {
        let account: AccountUpdate = serde_json::from_str(
            r#"{"e":"outboundAccountInfo","E":1499405658849,"m":0,"t":0,"b":0,"s":0,
                "T":true,"W":true,"D":true,"B":[{"a":"LTC","f":"17366.18538083","l":"0.00000000"}]}"#,
        )
        .unwrap();
        let event = UserDataEvent::Account(account);

        assert!(event.account().is_some());
        assert!(event.order().is_none());
        assert_eq!(event.event_time(), 1_499_405_658_849);
    }
}
