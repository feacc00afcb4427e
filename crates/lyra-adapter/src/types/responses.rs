/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust response structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};

use super::models::{Order, Trade};
use crate::http::{LyraError, Result};

/// `error` member of a JSON-RPC response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl From<RpcError> for LyraError {
    fn from(error: RpcError) -> Self {
        let message = match error.data {
            Some(serde_json::Value::String(detail)) => format!("{} ({detail})", error.message),
            None | Some(serde_json::Value::Null) => error.message,
            Some(detail) => format!("{} ({detail})", error.message),
        };
        LyraError::Api {
            code: error.code,
            message,
        }
    }
}

/// Envelope shared by HTTP and WebSocket responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl<T> RpcResponse<T> {
    /// `result` on success, the venue's error otherwise
    pub fn into_result(self) -> Result<T> {
        if let Some(error) = self.error {
            return Err(error.into());
        }
        self.result.ok_or_else(|| {
            LyraError::InvalidResponse("response has neither result nor error".to_string())
        })
    }
}

/// Result of `private/order`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderResponse {
    pub order: Order,
    #[serde(default)]
    pub trades: Vec<Trade>,
}

/// Result of `private/create_subaccount`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSubaccountResponse {
    pub status: String,
    pub transaction_id: String,
}

/// Result of `private/get_subaccounts`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubaccountsResponse {
    pub subaccount_ids: Vec<u64>,
    pub wallet: String,
}

/// Result of `public/create_account`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAccountResponse {
    pub status: String,
    pub wallet: String,
}

/// Result of `public/order_debug`: the venue's view of each signing step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDebugResponse {
    pub action_hash: String,
    pub encoded_data: String,
    pub encoded_data_hashed: String,
    pub typed_data_hash: String,
    #[serde(default)]
    pub raw_data: Option<serde_json::Value>,
}
