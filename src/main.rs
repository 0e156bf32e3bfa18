use spotwire::exchanges::binance::{DepthOpts, KlineInterval, KlinesOpts};
use spotwire::{build_connector, ExchangeConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    // Public endpoints only; set BINANCE_API_KEY/BINANCE_SECRET_KEY for the account call
    let config =
        ExchangeConfig::from_env("BINANCE").unwrap_or_else(|_| ExchangeConfig::read_only());
    let has_credentials = config.has_credentials();
    let binance = build_connector(config)?;

    binance.ping().await?;
    let time = binance.server_time().await?;
    println!("Server time: {}", time.server_time);

    let depth = binance.depth(&DepthOpts::new("BTCUSDT").with_limit(5)).await?;
    println!("Depth snapshot {}", depth.last_update_id);
    for level in &depth.bids {
        println!("  bid {} x {}", level.price, level.quantity);
    }

    let klines = binance
        .klines(&KlinesOpts::new("BTCUSDT", KlineInterval::Hours1))
        .await?;
    if let Some(last) = klines.last() {
        println!("Last 1h bar: open {} close {} ({} trades)", last.open, last.close, last.trades);
    }

    if has_credentials {
        match binance.account().await {
            Ok(account) => {
                let funded = account
                    .balances
                    .iter()
                    .filter(|b| b.free != "0.00000000" || b.locked != "0.00000000");
                for balance in funded {
                    println!("{}: free {} locked {}", balance.asset, balance.free, balance.locked);
                }
            }
            Err(e) => println!("Error fetching account: {}", e),
        }
    }

    let mut trades = binance.trade_stream("BTCUSDT").await?;
    for _ in 0..3 {
        let trade = trades.read().await?;
        println!("Trade {} @ {} x {}", trade.trade_id, trade.price, trade.quantity);
    }
    trades.close().await?;

    Ok(())
}
