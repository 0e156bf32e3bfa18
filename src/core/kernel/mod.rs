//! Spotwire kernel - transport layer shared by every endpoint and stream
//!
//! The kernel knows how to move bytes and nothing about what they mean:
//!
//! ## Transport Layer
//! - `RestClient`: HTTP request execution with optional key header and signing
//! - `WsSession`: one WebSocket connection, control frames handled internally
//! - `WsReader`: a session paired with a codec, yielding typed updates
//!
//! ## Authentication
//! - `Signer`: pluggable payload signing
//! - `HmacSigner`: HMAC-SHA256 over the urlencoded payload
//!
//! ## Message Handling
//! - `WsCodec`: frame to update decoding, one codec per connection
//! - `positional`: records the exchange encodes as bare JSON arrays
//!
//! # Usage
//!
//! ```rust,no_run
//! use spotwire::core::kernel::*;
//! use reqwest::Method;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let rest_config = RestClientConfig::new(
//!     "https://api.binance.com".to_string(),
//!     "binance".to_string(),
//! );
//! let signer = Arc::new(HmacSigner::new(
//!     "api_key".to_string(),
//!     "secret_key".to_string(),
//!     5000,
//! )?);
//! let rest = RestClientBuilder::new(rest_config)
//!     .with_signer(signer)
//!     .build()?;
//!
//! let body = rest
//!     .execute(Method::GET, "/api/v3/account", &RequestParams::empty(), RequestAuth::Signed)
//!     .await?;
//! println!("{}", String::from_utf8_lossy(&body));
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod positional;
pub mod rest;
pub mod signer;
pub mod ws;

pub use codec::WsCodec;
pub use positional::{PositionalRecord, Tokens};
pub use rest::{
    RequestAuth, RequestParams, ReqwestRest, RestClient, RestClientBuilder, RestClientConfig,
    API_KEY_HEADER,
};
pub use signer::{timestamp_ms, HmacSigner, Signer};
pub use ws::{CloseHandle, TungsteniteWs, WsConfig, WsReader, WsSession};
