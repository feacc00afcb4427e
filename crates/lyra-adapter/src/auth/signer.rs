/*
[INPUT]:  32-byte digests and the signer's key (local, mock, or external)
[OUTPUT]: Recoverable secp256k1 signatures and the signer address
[POS]:    Auth layer - signing capability shared by actions and auth headers
[UPDATE]: When adding new signer backends or changing signature format
*/

use std::str::FromStr;
use std::sync::Mutex;

use alloy::primitives::{Address, B256, Signature, eip191_hash_message};
use alloy::signers::SignerSync;
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;

use crate::http::{LyraError, Result};

/// Signing capability
///
/// Only `sign_hash` is required; message signing is derived from it so a
/// hardware wallet or remote signer only has to sign raw digests.
#[async_trait]
pub trait ActionSigner: Send + Sync {
    /// Address recovered from this signer's signatures
    fn address(&self) -> Address;

    /// Sign a 32-byte digest
    async fn sign_hash(&self, digest: &B256) -> Result<Signature>;

    /// Sign an EIP-191 personal message
    async fn sign_message(&self, message: &[u8]) -> Result<Signature> {
        self.sign_hash(&eip191_hash_message(message)).await
    }
}

/// Wire format: `0x` + hex(r || s || v), v in {27, 28}
pub fn signature_hex(signature: &Signature) -> String {
    format!("0x{}", hex::encode(signature.as_bytes()))
}

/// Parse a 65-byte hex signature
pub fn parse_signature_hex(value: &str) -> Result<Signature> {
    let raw = value.strip_prefix("0x").unwrap_or(value);
    let bytes = hex::decode(raw)
        .map_err(|e| LyraError::InvalidResponse(format!("Invalid signature hex: {e}")))?;
    Signature::from_raw(&bytes)
        .map_err(|e| LyraError::InvalidResponse(format!("Invalid signature: {e}")))
}

/// Signer backed by an in-memory secp256k1 key
#[derive(Debug, Clone)]
pub struct LocalKeySigner {
    signer: PrivateKeySigner,
}

impl LocalKeySigner {
    /// Create a signer from a hex-encoded private key
    ///
    /// Supports both "0x"-prefixed and non-prefixed hex strings.
    pub fn new(private_key_hex: &str) -> Result<Self> {
        let private_key_hex = private_key_hex
            .strip_prefix("0x")
            .unwrap_or(private_key_hex);
        let signer = PrivateKeySigner::from_str(private_key_hex)
            .map_err(|e| LyraError::signing(format!("Invalid private key: {e}")))?;
        Ok(Self { signer })
    }

    /// Key handle for on-chain transactions
    pub(crate) fn key(&self) -> &PrivateKeySigner {
        &self.signer
    }
}

#[async_trait]
impl ActionSigner for LocalKeySigner {
    fn address(&self) -> Address {
        self.signer.address()
    }

    async fn sign_hash(&self, digest: &B256) -> Result<Signature> {
        self.signer
            .sign_hash_sync(digest)
            .map_err(|e| LyraError::signing(format!("Failed to sign digest: {e}")))
    }
}

/// Signer returning a fixed signature and recording every digest it was asked to sign
#[derive(Debug)]
pub struct MockActionSigner {
    address: Address,
    signature: Signature,
    digests: Mutex<Vec<B256>>,
}

impl MockActionSigner {
    pub fn new(address: Address, signature: Signature) -> Self {
        Self {
            address,
            signature,
            digests: Mutex::new(Vec::new()),
        }
    }

    /// Digests passed to `sign_hash`, oldest first
    pub fn signed_digests(&self) -> Vec<B256> {
        self.digests
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ActionSigner for MockActionSigner {
    fn address(&self) -> Address {
        self.address
    }

    async fn sign_hash(&self, digest: &B256) -> Result<Signature> {
        if let Ok(mut guard) = self.digests.lock() {
            guard.push(*digest);
        }
        Ok(self.signature)
    }
}
