/*
[INPUT]:  WebSocket configuration, signer, and signed requests
[OUTPUT]: JSON-RPC results and subscription notifications
[POS]:    WebSocket layer - persistent exchange session
[UPDATE]: When adding new channels or changing connection logic
*/

pub mod client;
pub mod message;

pub use client::{DEFAULT_REQUEST_TIMEOUT, LyraWebSocket};
pub use message::{IncomingMessage, Notification, RpcRequest};
