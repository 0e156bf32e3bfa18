use crate::core::config::ConfigError;
use crate::core::errors::ExchangeError;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, Secret};
use sha2::Sha256;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

type HmacSha256 = Hmac<Sha256>;

/// Signer trait for request authentication
///
/// Implementations own the credentials. The transport only ever sees the
/// API key (for the header) and the finished signed payload.
pub trait Signer: Send + Sync {
    /// API key sent in the `X-MBX-APIKEY` header
    fn api_key(&self) -> &str;

    /// Append `timestamp`, `recvWindow` and `signature` to an urlencoded payload
    ///
    /// # Arguments
    /// * `payload` - Urlencoded request parameters, possibly empty
    /// * `timestamp` - Request timestamp in milliseconds
    fn sign_payload(&self, payload: &str, timestamp: u64) -> Result<String, ExchangeError>;
}

/// HMAC-SHA256 signer with a fixed receive window
pub struct HmacSigner {
    api_key: String,
    secret_key: Secret<String>,
    recv_window: u64,
}

impl fmt::Debug for HmacSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HmacSigner")
            .field("api_key", &self.api_key)
            .field("secret_key", &"[REDACTED]")
            .field("recv_window", &self.recv_window)
            .finish()
    }
}

impl HmacSigner {
    /// Create a new HMAC signer
    ///
    /// # Arguments
    /// * `api_key` - API key from the exchange
    /// * `secret_key` - Secret key for signing
    /// * `recv_window` - Receive window in milliseconds, must be positive
    pub fn new(
        api_key: String,
        secret_key: String,
        recv_window: u64,
    ) -> Result<Self, ConfigError> {
        if recv_window == 0 {
            return Err(ConfigError::InvalidConfiguration(
                "recv_window must be positive".to_string(),
            ));
        }

        Ok(Self {
            api_key,
            secret_key: Secret::new(secret_key),
            recv_window,
        })
    }

    pub fn recv_window(&self) -> u64 {
        self.recv_window
    }

    /// Hex-encoded HMAC-SHA256 of `message`
    pub fn signature(&self, message: &str) -> Result<String, ExchangeError> {
        let secret = self.secret_key.expose_secret();
        if secret.is_empty() {
            return Err(ExchangeError::AuthError(
                "cannot sign request without a secret key".to_string(),
            ));
        }

        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| ExchangeError::AuthError(format!("Invalid secret key: {}", e)))?;
        mac.update(message.as_bytes());

        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

impl Signer for HmacSigner {
    fn api_key(&self) -> &str {
        &self.api_key
    }

    fn sign_payload(&self, payload: &str, timestamp: u64) -> Result<String, ExchangeError> {
        // The signature covers the parameters followed by timestamp and window, in this order
        let mut signed = String::with_capacity(payload.len() + 128);
        signed.push_str(payload);
        if !signed.is_empty() {
            signed.push('&');
        }
        signed.push_str(&format!(
            "timestamp={}&recvWindow={}",
            timestamp, self.recv_window
        ));

        let signature = self.signature(&signed)?;
        signed.push_str("&signature=");
        signed.push_str(&signature);

        Ok(signed)
    }
}

/// Current Unix time in milliseconds
pub fn timestamp_ms() -> Result<u64, ExchangeError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .map_err(|e| {
            ExchangeError::ConfigError(ConfigError::InvalidConfiguration(format!(
                "System clock is before Unix epoch: {}",
                e
            )))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "NhqPtmdSJYdKjVHjA7PZj4Mge3R5YNiP1e3UZjInClVN65XAbvqqM6A7H5fATj0j";
    const TEST_TIMESTAMP: u64 = 1_499_827_319_559;
    const ORDER_PARAMS: &str =
        "symbol=LTCBTC&side=BUY&type=LIMIT&timeInForce=GTC&quantity=1&price=0.1";

    fn signer(window: u64) -> HmacSigner {
        HmacSigner::new("test_key".to_string(), TEST_SECRET.to_string(), window).unwrap()
    }

    #[test]
    fn test_signature_matches_published_vector() {
        let message = "symbol=LTCBTC&side=BUY&type=LIMIT&timeInForce=GTC&quantity=1&price=0.1&recvWindow=5000&timestamp=1499827319559";
        assert_eq!(
            signer(5000).signature(message).unwrap(),
            "c8db56825ae71d6d79447849e617115f4a920fa2acdcab2b053c4b2838bd6b71"
        );
    }

    #[test]
    fn test_sign_payload_appends_timestamp_then_window() {
        let signed = signer(5000)
            .sign_payload(ORDER_PARAMS, TEST_TIMESTAMP)
            .unwrap();
        assert_eq!(
            signed,
            "symbol=LTCBTC&side=BUY&type=LIMIT&timeInForce=GTC&quantity=1&price=0.1\
             &timestamp=1499827319559&recvWindow=5000\
             &signature=a4812bee4b64a0bd9aeab0d03c2d0af51c1e9b9f628b17703c6eae9d1fc7e6e7"
        );
    }

    #[test]
    fn test_sign_empty_payload_has_no_leading_separator() {
        let signed = signer(5000).sign_payload("", TEST_TIMESTAMP).unwrap();
        assert_eq!(
            signed,
            "timestamp=1499827319559&recvWindow=5000\
             &signature=6cd35332399b004466463b9ad65a112a14f31fb9ddfd5e19bd7298fbd491dbc7"
        );
    }

    #[test]
    fn test_window_is_covered_by_signature() {
        let default_window = signer(5000).sign_payload("symbol=LTCBTC", TEST_TIMESTAMP).unwrap();
        let wide_window = signer(10_000).sign_payload("symbol=LTCBTC", TEST_TIMESTAMP).unwrap();

        let narrow_sig = "a67d1911b36c87317ce00b07654edc22e385911a35291b159b34a09df0e9d5b9";
        let wide_sig = "b4de214f087b8656b8745b2b81c76f7aa18568473a7e7faa1911006807c8f28e";
        assert!(default_window.ends_with(&format!("signature={}", narrow_sig)));
        assert!(wide_window.ends_with(&format!("signature={}", wide_sig)));
    }

    #[test]
    fn test_signing_is_deterministic() {
        let signer = signer(5000);
        let first = signer.sign_payload(ORDER_PARAMS, TEST_TIMESTAMP).unwrap();
        let second = signer.sign_payload(ORDER_PARAMS, TEST_TIMESTAMP).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_single_byte_change_alters_signature() {
        let signer = signer(5000);
        let original = signer.signature(ORDER_PARAMS).unwrap();
        let tampered = signer
            .signature(&ORDER_PARAMS.replace("price=0.1", "price=0.2"))
            .unwrap();
        let later = signer
            .sign_payload(ORDER_PARAMS, TEST_TIMESTAMP + 1)
            .unwrap();

        assert_ne!(original, tampered);
        assert!(!later.ends_with(&original));
        assert_eq!(original.len(), 64);
    }

    #[test]
    fn test_empty_secret_rejected() {
        let signer = HmacSigner::new("key".to_string(), String::new(), 5000).unwrap();
        assert!(matches!(
            signer.sign_payload("symbol=LTCBTC", TEST_TIMESTAMP),
            Err(ExchangeError::AuthError(_))
        ));
    }

    #[test]
    fn test_zero_window_rejected_at_construction() {
        let result = HmacSigner::new("k".to_string(), "s".to_string(), 0);
        assert!(matches!(result, Err(ConfigError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_timestamp_is_after_epoch() {
        let now = timestamp_ms().unwrap();
        assert!(now > TEST_TIMESTAMP);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let rendered = format!("{:?}", signer(5000));
        assert!(!rendered.contains(TEST_SECRET));
        assert!(rendered.contains("test_key"));
    }
}
