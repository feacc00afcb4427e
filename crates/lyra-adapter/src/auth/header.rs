/*
[INPUT]:  Signer and current time in milliseconds
[OUTPUT]: {wallet, timestamp, signature} proof of address ownership
[POS]:    Auth layer - session login (WS) and per-request headers (HTTP)
[UPDATE]: When header names or login params change
*/

use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::auth::{ActionSigner, signature_hex};
use crate::http::{LyraError, Result};

pub const WALLET_HEADER: &str = "X-LyraWallet";
pub const TIMESTAMP_HEADER: &str = "X-LyraTimestamp";
pub const SIGNATURE_HEADER: &str = "X-LyraSignature";

/// Short-lived signature over the current millisecond timestamp
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthHeader {
    pub wallet: String,
    pub timestamp: String,
    pub signature: String,
}

impl AuthHeader {
    /// Sign `timestamp_ms` rendered as a decimal string
    pub async fn sign(signer: &dyn ActionSigner, timestamp_ms: i64) -> Result<Self> {
        let timestamp = timestamp_ms.to_string();
        let signature = signer.sign_message(timestamp.as_bytes()).await?;
        Ok(Self {
            wallet: signer.address().to_checksum(None),
            timestamp,
            signature: signature_hex(&signature),
        })
    }

    pub async fn now(signer: &dyn ActionSigner) -> Result<Self> {
        Self::sign(signer, Utc::now().timestamp_millis()).await
    }

    /// HTTP headers for private endpoints
    pub fn to_header_map(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        for (name, value) in [
            (WALLET_HEADER, &self.wallet),
            (TIMESTAMP_HEADER, &self.timestamp),
            (SIGNATURE_HEADER, &self.signature),
        ] {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| LyraError::Config(format!("Invalid header name {name}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| LyraError::Config(format!("Invalid {name} header: {e}")))?;
            headers.insert(header_name, value);
        }
        Ok(headers)
    }

    /// Params for the `public/login` WebSocket method
    pub fn login_params(&self) -> serde_json::Value {
        serde_json::json!({
            "wallet": self.wallet,
            "timestamp": self.timestamp,
            "signature": self.signature,
        })
    }
}
