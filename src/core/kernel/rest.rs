use crate::core::errors::ExchangeError;
use crate::core::kernel::signer::{timestamp_ms, Signer};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{instrument, trace};

/// Header carrying the API key on authenticated and user-stream requests
pub const API_KEY_HEADER: &str = "X-MBX-APIKEY";

/// How a request authenticates itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestAuth {
    /// No key, no signature
    Public,
    /// API key header only (user data stream session endpoints)
    ApiKey,
    /// API key header plus timestamp, receive window and signature
    Signed,
}

impl RequestAuth {
    pub const fn attaches_key(self) -> bool {
        matches!(self, Self::ApiKey | Self::Signed)
    }

    pub const fn is_signed(self) -> bool {
        matches!(self, Self::Signed)
    }
}

impl fmt::Display for RequestAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Public => "public",
            Self::ApiKey => "api_key",
            Self::Signed => "signed",
        };
        f.write_str(label)
    }
}

/// Urlencoded request parameters in wire order
///
/// Built from a typed options struct; the struct's field order is the
/// order the exchange sees and the order the signature covers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams(String);

impl RequestParams {
    /// No parameters
    pub fn empty() -> Self {
        Self::default()
    }

    /// Encode a serializable options struct
    pub fn encode<T: Serialize + ?Sized>(query: &T) -> Result<Self, ExchangeError> {
        serde_urlencoded::to_string(query)
            .map(Self)
            .map_err(|e| {
                ExchangeError::InvalidParameters(format!("cannot encode parameters: {}", e))
            })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// REST client trait for making HTTP requests
///
/// Implementations hold no per-call mutable state, so one instance can serve
/// concurrent calls from independent tasks.
#[async_trait]
pub trait RestClient: Send + Sync {
    /// Execute a request and return the raw 2xx response body
    ///
    /// # Arguments
    /// * `method` - HTTP method; GET carries the payload in the query string,
    ///   every other method in a form-encoded body
    /// * `endpoint` - The API endpoint path
    /// * `params` - Encoded request parameters
    /// * `auth` - Whether to attach the API key and/or sign the payload
    async fn execute(
        &self,
        method: Method,
        endpoint: &str,
        params: &RequestParams,
        auth: RequestAuth,
    ) -> Result<Vec<u8>, ExchangeError>;
}

/// Configuration for the REST client
#[derive(Clone, Debug)]
pub struct RestClientConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Exchange name for logging and tracing
    pub exchange_name: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string to include in requests
    pub user_agent: String,
}

impl RestClientConfig {
    /// Create a new configuration
    ///
    /// # Arguments
    /// * `base_url` - Base URL for the API
    /// * `exchange_name` - Name of the exchange
    pub fn new(base_url: String, exchange_name: String) -> Self {
        Self {
            base_url,
            exchange_name,
            timeout_seconds: 30,
            user_agent: concat!("spotwire/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Set the user agent string
    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }
}

/// Builder for creating REST client instances
pub struct RestClientBuilder {
    config: RestClientConfig,
    signer: Option<Arc<dyn Signer>>,
}

impl RestClientBuilder {
    /// Create a new builder with the given configuration
    pub fn new(config: RestClientConfig) -> Self {
        Self {
            config,
            signer: None,
        }
    }

    /// Set the signer for authenticated requests
    pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Build the REST client
    pub fn build(self) -> Result<ReqwestRest, ExchangeError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(self.config.timeout_seconds))
            .user_agent(&self.config.user_agent)
            .build()?;

        Ok(ReqwestRest {
            client,
            config: self.config,
            signer: self.signer,
        })
    }
}

/// Implementation of `RestClient` using reqwest
#[derive(Clone)]
pub struct ReqwestRest {
    client: Client,
    config: RestClientConfig,
    signer: Option<Arc<dyn Signer>>,
}

impl fmt::Debug for ReqwestRest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqwestRest")
            .field("config", &self.config)
            .field("has_signer", &self.signer.is_some())
            .finish_non_exhaustive()
    }
}

impl ReqwestRest {
    pub fn config(&self) -> &RestClientConfig {
        &self.config
    }

    /// Build the full URL for an endpoint
    fn build_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    fn signer(&self) -> Result<&dyn Signer, ExchangeError> {
        self.signer.as_deref().ok_or_else(|| {
            ExchangeError::AuthError(
                "Authentication required but no credentials configured".to_string(),
            )
        })
    }

    /// Produce the final payload, signing it when required
    fn payload(&self, params: &RequestParams, auth: RequestAuth) -> Result<String, ExchangeError> {
        if auth.is_signed() {
            self.signer()?.sign_payload(params.as_str(), timestamp_ms()?)
        } else {
            Ok(params.as_str().to_owned())
        }
    }
}

#[async_trait]
impl RestClient for ReqwestRest {
    #[instrument(
        skip(self, params),
        fields(
            exchange = %self.config.exchange_name,
            method = %method,
            endpoint = %endpoint,
            auth = %auth
        )
    )]
    async fn execute(
        &self,
        method: Method,
        endpoint: &str,
        params: &RequestParams,
        auth: RequestAuth,
    ) -> Result<Vec<u8>, ExchangeError> {
        let api_key = if auth.attaches_key() {
            Some(self.signer()?.api_key().to_owned())
        } else {
            None
        };
        let payload = self.payload(params, auth)?;
        let url = self.build_url(endpoint);

        let mut request = if method == Method::GET {
            let url = if payload.is_empty() {
                url
            } else {
                format!("{}?{}", url, payload)
            };
            self.client.request(method, url)
        } else {
            self.client
                .request(method, url)
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(payload)
        };

        if let Some(api_key) = api_key {
            request = request.header(API_KEY_HEADER, api_key);
        }
        request = request.header(ACCEPT, "application/json");

        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        trace!(status = %status, "Response body: {}", String::from_utf8_lossy(&body));

        if status.is_success() {
            Ok(body.to_vec())
        } else {
            Err(ExchangeError::ApiError {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            })
        }
    }
}
