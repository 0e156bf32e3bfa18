use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{
    HmacSigner, ReqwestRest, RestClientBuilder, RestClientConfig, WsConfig,
};
use crate::exchanges::binance::connector::BinanceConnector;
use std::sync::Arc;
use tracing::debug;

pub const REST_URL: &str = "https://api.binance.com";
pub const TESTNET_REST_URL: &str = "https://testnet.binance.vision";
pub const WS_URL: &str = "wss://stream.binance.com:9443/ws";
pub const TESTNET_WS_URL: &str = "wss://testnet.binance.vision/ws";

/// Create a Binance connector
///
/// The configuration is validated before anything else, so a bad receive
/// window fails here without touching the network. Explicit URL overrides
/// win over the testnet flag.
pub fn build_connector(
    config: ExchangeConfig,
) -> Result<BinanceConnector<ReqwestRest>, ExchangeError> {
    build_connector_with_ws_config(config, WsConfig::default())
}

pub fn build_connector_with_ws_config(
    config: ExchangeConfig,
    ws_config: WsConfig,
) -> Result<BinanceConnector<ReqwestRest>, ExchangeError> {
    config.validate()?;

    let base_url = config.base_url.clone().unwrap_or_else(|| {
        if config.testnet {
            TESTNET_REST_URL.to_string()
        } else {
            REST_URL.to_string()
        }
    });
    let ws_url = config.ws_url.clone().unwrap_or_else(|| {
        if config.testnet {
            TESTNET_WS_URL.to_string()
        } else {
            WS_URL.to_string()
        }
    });

    let rest_config = RestClientConfig::new(base_url, "binance".to_string())
        .with_timeout(config.timeout_seconds);
    let mut rest_builder = RestClientBuilder::new(rest_config);

    // A key without a secret still serves the user data stream endpoints
    if !config.api_key().is_empty() {
        let signer = Arc::new(HmacSigner::new(
            config.api_key().to_string(),
            config.secret_key().to_string(),
            config.recv_window.unsigned_abs(),
        )?);
        rest_builder = rest_builder.with_signer(signer);
    }

    let rest = rest_builder.build()?;
    debug!(base_url = %rest.config().base_url, ws_url = %ws_url, "Binance connector ready");

    Ok(BinanceConnector::new(rest, ws_url).with_ws_config(ws_config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ConfigError;

    #[test]
    fn test_non_positive_window_rejected_at_build() {
        for window in [0, -1, -5000] {
            let config =
                ExchangeConfig::new("key".to_string(), "secret".to_string()).recv_window(window);
            assert!(matches!(
                build_connector(config),
                Err(ExchangeError::ConfigError(ConfigError::InvalidConfiguration(_)))
            ));
        }
    }

    #[test]
    fn test_default_urls() {
        let connector = build_connector(ExchangeConfig::read_only()).unwrap();
        assert_eq!(connector.rest().config().base_url, REST_URL);
        assert_eq!(connector.ws_url(), WS_URL);
    }

    #[test]
    fn test_testnet_urls_and_overrides() {
        let connector = build_connector(ExchangeConfig::read_only().testnet(true)).unwrap();
        assert_eq!(connector.rest().config().base_url, TESTNET_REST_URL);
        assert_eq!(connector.ws_url(), TESTNET_WS_URL);

        let connector = build_connector(
            ExchangeConfig::read_only()
                .testnet(true)
                .base_url("http://127.0.0.1:9000".to_string())
                .ws_url("ws://127.0.0.1:9001/ws".to_string()),
        )
        .unwrap();
        assert_eq!(connector.rest().config().base_url, "http://127.0.0.1:9000");
        assert_eq!(connector.ws_url(), "ws://127.0.0.1:9001/ws");
    }

    #[test]
    fn test_timeout_is_carried_to_transport() {
        let connector = build_connector(ExchangeConfig::read_only().timeout_seconds(5)).unwrap();
        assert_eq!(connector.rest().config().timeout_seconds, 5);
    }
}
