/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public Lyra adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod chain;
pub mod config;
pub mod http;
pub mod orders;
pub mod signing;
pub mod types;
pub mod ws;

// Re-export commonly used types from auth
pub use auth::{
    ActionSigner,
    AuthHeader,
    LocalKeySigner,
    MockActionSigner,
    OWNER_PRIVATE_KEY_ENV,
    PrivateKeyCredential,
};

pub use chain::{ApprovalReceipt, approve_deposit};

pub use config::{DepositContracts, EndpointConfig, Environment, LyraConfig, ProtocolConfig};

// Re-export commonly used types from http
pub use http::{ClientConfig, LyraClient, LyraError, Result};

pub use orders::{DepositParams, OrderParams, Signed};

pub use signing::{
    Action,
    DepositModuleData,
    ModuleData,
    NonceGenerator,
    TradeModuleData,
};

// Re-export all types
pub use types::*;

// Re-export commonly used types from ws
pub use ws::{LyraWebSocket, Notification};
