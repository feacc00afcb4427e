/*
[INPUT]:  Private key material and messages/digests to sign
[OUTPUT]: Signers, recoverable signatures, and login auth headers
[POS]:    Auth layer - handles Lyra API authentication and action signing keys
[UPDATE]: When auth flow or signature methods change
*/

pub mod credential;
pub mod header;
pub mod signer;

pub use credential::{OWNER_PRIVATE_KEY_ENV, PrivateKeyCredential};
pub use header::AuthHeader;
pub use signer::{
    ActionSigner, LocalKeySigner, MockActionSigner, parse_signature_hex, signature_hex,
};
