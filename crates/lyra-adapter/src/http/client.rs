/*
[INPUT]:  HTTP configuration (base URL, timeouts) and auth headers
[OUTPUT]: Configured reqwest client and JSON-RPC envelope handling
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::auth::AuthHeader;
use crate::config::EndpointConfig;
use crate::http::{LyraError, Result};
use crate::types::RpcResponse;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl From<&EndpointConfig> for ClientConfig {
    fn from(endpoints: &EndpointConfig) -> Self {
        Self {
            timeout: endpoints.request_timeout(),
            connect_timeout: endpoints.connect_timeout(),
        }
    }
}

/// Main HTTP client for the Lyra v2 API
///
/// Every method is a POST of a JSON params object to `/{method}`.
#[derive(Debug, Clone)]
pub struct LyraClient {
    http_client: Client,
    base_url: Url,
}

impl LyraClient {
    /// Client for the endpoints of a `LyraConfig`
    pub fn new(endpoints: &EndpointConfig) -> Result<Self> {
        Self::with_config_and_base_url(ClientConfig::from(endpoints), &endpoints.http_base_url)
    }

    /// Create a client with custom configuration and base URL
    pub fn with_config_and_base_url(config: ClientConfig, base_url: &str) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        // join() replaces the last path segment unless the base ends with '/'
        let base_url = if base_url.ends_with('/') {
            Url::parse(base_url)?
        } else {
            Url::parse(&format!("{base_url}/"))?
        };

        Ok(Self {
            http_client,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn method_url(&self, method: &str) -> Result<Url> {
        Ok(self.base_url.join(method.trim_start_matches('/'))?)
    }

    /// POST builder for `public/*` methods
    pub(crate) fn public_request<P: Serialize + ?Sized>(
        &self,
        method: &str,
        params: &P,
    ) -> Result<RequestBuilder> {
        let url = self.method_url(method)?;
        Ok(self.http_client.post(url).json(params))
    }

    /// POST builder for `private/*` methods, carrying the wallet auth headers
    pub(crate) fn private_request<P: Serialize + ?Sized>(
        &self,
        method: &str,
        params: &P,
        auth: &AuthHeader,
    ) -> Result<RequestBuilder> {
        Ok(self
            .public_request(method, params)?
            .headers(auth.to_header_map()?))
    }

    /// Send the request and unwrap the `result` of the response envelope
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        method: &str,
        builder: RequestBuilder,
    ) -> Result<T> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(method, status = status.as_u16(), "lyra http response");

        match serde_json::from_str::<RpcResponse<T>>(&body) {
            Ok(envelope) if envelope.error.is_none() && !status.is_success() => {
                warn!(method, status = status.as_u16(), "lyra http error without envelope");
                Err(LyraError::api_error(status, body))
            }
            Ok(envelope) => {
                let result = envelope.into_result();
                if let Err(LyraError::Api { code, message }) = &result {
                    warn!(method, code, %message, "lyra api error");
                }
                result
            }
            Err(_) if !status.is_success() => Err(LyraError::api_error(status, body)),
            Err(e) => Err(LyraError::InvalidResponse(format!(
                "Failed to decode {method} response: {e}"
            ))),
        }
    }
}
