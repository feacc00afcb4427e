/*
[INPUT]:  Action scalar fields, module data hash, typehash and domain separator
[OUTPUT]: action_hash, EIP-712 signing hash, and the signed action
[POS]:    Signing layer - digest & signature builder shared by all actions
[UPDATE]: When the Action struct layout or domain scheme changes on-chain
*/

use alloy::primitives::{Address, B256, Signature, U256, keccak256};
use alloy::sol_types::SolValue;
use tracing::debug;

use crate::auth::{ActionSigner, signature_hex};
use crate::config::ProtocolConfig;
use crate::http::{LyraError, Result};

use super::module_data::ModuleData;

/// Authorized instruction executed by an on-chain module on behalf of `owner`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// 0 when the action creates a new subaccount
    pub subaccount_id: u64,
    pub nonce: u64,
    pub module_address: Address,
    pub module_data_hash: B256,
    /// Unix seconds
    pub expiry: u64,
    pub owner: Address,
    pub signer: Address,
    pub signature: Option<Signature>,
}

impl Action {
    /// Unsigned action over `module_data`
    pub fn new(
        subaccount_id: u64,
        nonce: u64,
        module_address: Address,
        module_data: &dyn ModuleData,
        expiry: u64,
        owner: Address,
        signer: Address,
    ) -> Result<Self> {
        Ok(Self {
            subaccount_id,
            nonce,
            module_address,
            module_data_hash: module_data.hash()?,
            expiry,
            owner,
            signer,
            signature: None,
        })
    }

    /// keccak256 of the ABI-encoded struct (the `signature` field is not part of it)
    pub fn action_hash(&self, action_typehash: B256) -> B256 {
        let encoded = (
            action_typehash,
            U256::from(self.subaccount_id),
            U256::from(self.nonce),
            self.module_address,
            self.module_data_hash,
            U256::from(self.expiry),
            self.owner,
            self.signer,
        )
            .abi_encode_params();
        keccak256(encoded)
    }

    /// Digest the on-chain verifier reconstructs: keccak256(0x1901 || domain || action_hash)
    pub fn signing_hash(&self, protocol: &ProtocolConfig) -> B256 {
        typed_data_hash(
            protocol.domain_separator,
            self.action_hash(protocol.action_typehash),
        )
    }

    /// Sign the action in place
    pub async fn sign(
        &mut self,
        signer: &dyn ActionSigner,
        protocol: &ProtocolConfig,
    ) -> Result<()> {
        if signer.address() != self.signer {
            return Err(LyraError::signing(format!(
                "action signer {} does not match key {}",
                self.signer,
                signer.address()
            )));
        }

        let digest = self.signing_hash(protocol);
        let signature = signer.sign_hash(&digest).await?;
        debug!(
            subaccount_id = self.subaccount_id,
            nonce = self.nonce,
            module = %self.module_address,
            signing_hash = %digest,
            "action signed"
        );
        self.signature = Some(signature);
        Ok(())
    }

    /// Wire-format signature, or a signing error when the action is unsigned
    pub fn signature_hex(&self) -> Result<String> {
        self.signature
            .as_ref()
            .map(signature_hex)
            .ok_or_else(|| LyraError::signing("action has not been signed"))
    }

    /// Address recovered from the stored signature over the current fields
    pub fn recover_signer(&self, protocol: &ProtocolConfig) -> Result<Address> {
        let signature = self
            .signature
            .as_ref()
            .ok_or_else(|| LyraError::signing("action has not been signed"))?;
        signature
            .recover_address_from_prehash(&self.signing_hash(protocol))
            .map_err(|e| LyraError::signing(format!("signature recovery failed: {e}")))
    }

    /// True when the stored signature was produced by `signer` over these exact fields
    pub fn verify(&self, protocol: &ProtocolConfig) -> bool {
        self.recover_signer(protocol)
            .map(|recovered| recovered == self.signer)
            .unwrap_or(false)
    }

    /// Fails when `expiry` is not strictly after `now_secs`
    pub fn ensure_not_expired(&self, now_secs: i64) -> Result<()> {
        let now = u64::try_from(now_secs).unwrap_or_default();
        if self.expiry <= now {
            return Err(LyraError::signing(format!(
                "action expired at {} (now {now})",
                self.expiry
            )));
        }
        Ok(())
    }
}

/// keccak256(0x19 0x01 || domain_separator || struct_hash)
pub fn typed_data_hash(domain_separator: B256, struct_hash: B256) -> B256 {
    let mut data = Vec::with_capacity(66);
    data.push(0x19);
    data.push(0x01);
    data.extend_from_slice(domain_separator.as_slice());
    data.extend_from_slice(struct_hash.as_slice());
    keccak256(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::str::FromStr;

    use alloy::primitives::{address, b256};
    use rust_decimal::Decimal;

    use crate::auth::LocalKeySigner;
    use crate::config::{Environment, LyraConfig};
    use crate::signing::TradeModuleData;

    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const OWNER: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

    fn protocol_for(environment: Environment) -> ProtocolConfig {
        LyraConfig::preset(environment).protocol
    }

    fn sample_action() -> Action {
        let trade = TradeModuleData {
            asset_address: address!("0x62CF2Cc6450Dc3FbD0662Bfd69af0a4D7485Fe4E"),
            sub_id: U256::ZERO,
            limit_price: Decimal::from(1310),
            amount: Decimal::from(100),
            max_fee: Decimal::from_str("0.01").unwrap(),
            subaccount_id: 550,
            is_bid: true,
            decimals: 18,
        };
        Action::new(
            550,
            1_700_000_000_000_123,
            address!("0x87F2863866D85E3192a35A73b388BD625D83f2be"),
            &trade,
            1_700_000_300,
            OWNER,
            OWNER,
        )
        .unwrap()
    }

    #[test]
    fn test_golden_action_and_signing_hash() {
        let action = sample_action();
        let protocol = protocol_for(Environment::Test);

        assert_eq!(
            action.action_hash(protocol.action_typehash),
            b256!("0xd0c3425647c1aa7c362f4737c9c6d7f92dec61aae0ab81130d7993394c5aafae")
        );
        assert_eq!(
            action.signing_hash(&protocol),
            b256!("0x0202785fa03946f523b4ae0af589a064b41615022d6199964128872383290daf")
        );
    }

    #[test]
    fn test_domain_separator_changes_signing_hash() {
        let action = sample_action();
        let test = protocol_for(Environment::Test);
        let prod = protocol_for(Environment::Prod);

        assert_eq!(
            action.action_hash(test.action_typehash),
            action.action_hash(prod.action_typehash)
        );
        assert_eq!(
            action.signing_hash(&prod),
            b256!("0xafa8ca92bf016d25b157e6211882677c4c32b0c621494519093392f18d1207fa")
        );
    }

    #[tokio::test]
    async fn test_action_hash_ignores_signature() {
        let signer = LocalKeySigner::new(TEST_KEY).unwrap();
        let protocol = protocol_for(Environment::Test);
        let unsigned = sample_action();
        let mut signed = sample_action();
        signed.sign(&signer, &protocol).await.unwrap();

        assert_eq!(
            unsigned.action_hash(protocol.action_typehash),
            signed.action_hash(protocol.action_typehash)
        );
    }

    #[tokio::test]
    async fn test_signature_verifies_only_for_exact_fields() {
        let signer = LocalKeySigner::new(TEST_KEY).unwrap();
        let protocol = protocol_for(Environment::Test);
        let mut action = sample_action();
        action.sign(&signer, &protocol).await.unwrap();
        assert!(action.verify(&protocol));

        let mut mutated = action.clone();
        mutated.nonce += 1;
        assert!(!mutated.verify(&protocol));

        assert!(!action.verify(&protocol_for(Environment::Prod)));
    }

    #[tokio::test]
    async fn test_single_byte_perturbation_breaks_recovery() {
        let signer = LocalKeySigner::new(TEST_KEY).unwrap();
        let protocol = protocol_for(Environment::Test);
        let mut action = sample_action();
        action.sign(&signer, &protocol).await.unwrap();
        let signature = action.signature.unwrap();
        let digest = action.signing_hash(&protocol);

        assert_eq!(
            signature.recover_address_from_prehash(&digest).unwrap(),
            OWNER
        );
        for index in [0usize, 15, 31] {
            let mut perturbed = digest;
            perturbed.0[index] ^= 0x01;
            let recovered = signature.recover_address_from_prehash(&perturbed);
            assert!(recovered.map(|address| address != OWNER).unwrap_or(true));
        }
    }

    #[tokio::test]
    async fn test_sign_rejects_mismatched_signer() {
        let signer = LocalKeySigner::new(TEST_KEY).unwrap();
        let mut action = sample_action();
        action.signer = Address::ZERO;
        let err = action
            .sign(&signer, &protocol_for(Environment::Test))
            .await
            .unwrap_err();
        assert!(err.is_signing_error());
        assert!(action.signature.is_none());
    }

    #[test]
    fn test_unsigned_action_has_no_signature_hex() {
        assert!(sample_action().signature_hex().unwrap_err().is_signing_error());
        assert!(!sample_action().verify(&protocol_for(Environment::Test)));
    }

    #[test]
    fn test_expiry_check() {
        let action = sample_action();
        assert!(action.ensure_not_expired(1_700_000_299).is_ok());
        assert!(action.ensure_not_expired(1_700_000_300).is_err());
    }
}
