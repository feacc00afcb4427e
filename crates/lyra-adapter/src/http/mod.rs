/*
[INPUT]:  HTTP client configuration and API endpoints
[OUTPUT]: HTTP responses and typed API results
[POS]:    HTTP layer - JSON-RPC over HTTP POST
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod client;
pub mod error;
pub mod private;
pub mod public;

pub use error::{LyraError, Result};

pub use client::{ClientConfig, LyraClient};
