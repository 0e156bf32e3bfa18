use crate::core::errors::ParseError;
use crate::core::kernel::positional::{PositionalRecord, Tokens};
use crate::exchanges::binance::types::{DepthLevel, Kline};

impl PositionalRecord for DepthLevel {
    const NAME: &'static str = "depth level";
    const ARITY: usize = 2;

    fn from_tokens(tokens: &Tokens<'_>) -> Result<Self, ParseError> {
        Ok(Self {
            price: tokens.text(0),
            quantity: tokens.text(1),
        })
    }
}

impl PositionalRecord for Kline {
    const NAME: &'static str = "kline";
    const ARITY: usize = 11;

    fn from_tokens(tokens: &Tokens<'_>) -> Result<Self, ParseError> {
        Ok(Self {
            open_time: tokens.integer(0)?,
            open: tokens.text(1),
            high: tokens.text(2),
            low: tokens.text(3),
            close: tokens.text(4),
            volume: tokens.text(5),
            close_time: tokens.integer(6)?,
            quote_asset_volume: tokens.text(7),
            trades: tokens.integer(8)?,
            taker_buy_base_volume: tokens.text(9),
            taker_buy_quote_volume: tokens.text(10),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::kernel::positional::{decode, decode_list};

    const KLINE: &[u8] = br#"[1499040000000,"0.01634790","0.80000000","0.01575800","0.01577100","148976.11427815",1499644799999,"2434.19055334",308,"1756.87402397","28.46694368","17928899.62484339"]"#;

    #[test]
    fn test_depth_level_keeps_decimal_strings() {
        let level: DepthLevel = decode(br#"["100.00","1.5"]"#).unwrap();
        assert_eq!(level.price, "100.00");
        assert_eq!(level.quantity, "1.5");
    }

    #[test]
    fn test_depth_level_short_payload() {
        assert!(matches!(
            decode::<DepthLevel>(br#"["100.00"]"#),
            Err(ParseError::FieldCount {
                record: "depth level",
                expected: 2,
                actual: 1
            })
        ));
        assert!(matches!(
            decode::<DepthLevel>(b"[]"),
            Err(ParseError::FieldCount { actual: 0, .. })
        ));
    }

    #[test]
    fn test_kline_layout() {
        let kline: Kline = decode(KLINE).unwrap();

        assert_eq!(kline.open_time, 1_499_040_000_000);
        assert_eq!(kline.open, "0.01634790");
        assert_eq!(kline.high, "0.80000000");
        assert_eq!(kline.low, "0.01575800");
        assert_eq!(kline.close, "0.01577100");
        assert_eq!(kline.volume, "148976.11427815");
        assert_eq!(kline.close_time, 1_499_644_799_999);
        assert_eq!(kline.quote_asset_volume, "2434.19055334");
        assert_eq!(kline.trades, 308);
        assert_eq!(kline.taker_buy_base_volume, "1756.87402397");
        assert_eq!(kline.taker_buy_quote_volume, "28.46694368");
    }

    #[test]
    fn test_kline_shortfall_is_reported() {
        let short = br#"[1499040000000,"0.1","0.2","0.3","0.4","5",1499644799999,"6",7,"8"]"#;
        let err = decode::<Kline>(short).unwrap_err();
        match err {
            ParseError::FieldCount {
                expected, actual, ..
            } => {
                assert_eq!(expected, 11);
                assert_eq!(actual, 10);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_kline_bad_close_time() {
        let err = decode::<Kline>(br#"[1,"a","b","c","d","e","soon","f",3,"g","h"]"#).unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidInteger { record: "kline", index: 6, ref token } if token == "soon"
        ));
    }

    #[test]
    fn test_kline_empty_payload_is_zero_state() {
        assert_eq!(decode::<Kline>(b"").unwrap(), Kline::default());
    }

    #[test]
    fn test_kline_list() {
        let one = std::str::from_utf8(KLINE).unwrap();
        let raw = format!("[{},{}]", one, one);
        let klines: Vec<Kline> = decode_list(raw.as_bytes()).unwrap();
        assert_eq!(klines.len(), 2);
        assert_eq!(klines[1].trades, 308);
    }
}
