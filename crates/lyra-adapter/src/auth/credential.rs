/*
[INPUT]:  Private key hex from the environment or caller
[OUTPUT]: Scoped access to key material for building signers
[POS]:    Auth layer - the only place raw key material is held
[UPDATE]: When adding new key sources (keystore files, KMS)
*/

use secrecy::{ExposeSecret, SecretString};

use crate::auth::LocalKeySigner;
use crate::http::{LyraError, Result};

/// Environment variable holding the owner wallet private key
pub const OWNER_PRIVATE_KEY_ENV: &str = "OWNER_PRIVATE_KEY";

/// Owner private key, redacted in `Debug` output
#[derive(Debug, Clone)]
pub struct PrivateKeyCredential {
    key: SecretString,
}

impl PrivateKeyCredential {
    pub fn new(private_key_hex: impl Into<String>) -> Self {
        Self {
            key: SecretString::from(private_key_hex.into()),
        }
    }

    /// Read the key from `OWNER_PRIVATE_KEY`
    pub fn from_env() -> Result<Self> {
        Self::from_env_var(OWNER_PRIVATE_KEY_ENV)
    }

    /// Read the key from an arbitrary environment variable
    pub fn from_env_var(name: &str) -> Result<Self> {
        match std::env::var(name) {
            Ok(value) if !value.trim().is_empty() => Ok(Self::new(value.trim())),
            Ok(_) => Err(LyraError::signing(format!("{name} is empty"))),
            Err(_) => Err(LyraError::signing(format!("{name} is not set"))),
        }
    }

    /// Run `f` with the raw key; the borrow cannot outlive the call
    pub(crate) fn with_exposed<T>(&self, f: impl FnOnce(&str) -> T) -> T {
        f(self.key.expose_secret())
    }

    /// Build a local signer from this credential
    pub fn signer(&self) -> Result<LocalKeySigner> {
        self.with_exposed(LocalKeySigner::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::auth::ActionSigner;

    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_debug_redacts_key() {
        let credential = PrivateKeyCredential::new(TEST_KEY);
        let rendered = format!("{credential:?}");
        assert!(!rendered.contains("ac0974bec39a17e3"));
    }

    #[test]
    fn test_signer_from_credential() {
        let credential = PrivateKeyCredential::new(TEST_KEY);
        let signer = credential.signer().unwrap();
        assert_eq!(
            signer.address().to_checksum(None),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
    }

    #[test]
    fn test_missing_env_var_is_signing_error() {
        let err = PrivateKeyCredential::from_env_var("LYRA_ADAPTER_TEST_UNSET_KEY").unwrap_err();
        assert!(err.is_signing_error());
    }

    #[test]
    fn test_malformed_key_is_signing_error() {
        let credential = PrivateKeyCredential::new("0xnot-a-key");
        assert!(credential.signer().unwrap_err().is_signing_error());
    }
}
