/*
[INPUT]:  Raw WebSocket text frames and outbound method calls
[OUTPUT]: JSON-RPC requests, correlated responses, subscription notifications
[POS]:    WebSocket layer - message framing and classification
[UPDATE]: When adding new message types or changing format
*/

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::RpcResponse;

/// Outbound `{method, params, id}` frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub method: String,
    pub params: Value,
    pub id: u64,
}

/// Subscription update pushed by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub channel: String,
    pub data: Value,
}

/// Classified inbound frame
#[derive(Debug, Clone, PartialEq)]
pub enum IncomingMessage {
    Response {
        id: u64,
        response: RpcResponse<Value>,
    },
    Notification(Notification),
    Unrecognized(Value),
}

#[derive(Debug, Deserialize)]
struct SubscriptionFrame {
    params: Notification,
}

impl IncomingMessage {
    /// Classify a text frame; ids may be echoed as numbers or numeric strings
    pub fn parse(text: &str) -> serde_json::Result<Self> {
        let value: Value = serde_json::from_str(text)?;

        if value.get("method").and_then(Value::as_str) == Some("subscription") {
            let frame: SubscriptionFrame = serde_json::from_value(value)?;
            return Ok(Self::Notification(frame.params));
        }

        let id = value.get("id").and_then(|id| match id {
            Value::Number(number) => number.as_u64(),
            Value::String(text) => text.parse().ok(),
            _ => None,
        });
        match id {
            Some(id) if value.get("result").is_some() || value.get("error").is_some() => {
                let mut response: RpcResponse<Value> = serde_json::from_value(value)?;
                if response.error.is_none() {
                    response.result = Some(response.result.unwrap_or(Value::Null));
                }
                Ok(Self::Response { id, response })
            }
            _ => Ok(Self::Unrecognized(value)),
        }
    }
}
