/*
[INPUT]:  Order or deposit intent, signer, protocol config, nonce generator
[OUTPUT]: Signed actions and the request bodies carrying them
[POS]:    Flow layer - joins signing engine output with API request types
[UPDATE]: When request params of private/order or private/create_subaccount change
*/

use alloy::primitives::{Address, U256};
use rust_decimal::Decimal;
use tracing::info;

use crate::auth::ActionSigner;
use crate::config::ProtocolConfig;
use crate::http::Result;
use crate::signing::{
    Action, DepositModuleData, NonceGenerator, TradeModuleData, expiry_from_now,
};
use crate::types::{
    CreateSubaccountRequest, Direction, Instrument, MarginType, OrderRequest, OrderType,
    TimeInForce,
};

/// Signed action together with the request body that carries it
#[derive(Debug, Clone, PartialEq)]
pub struct Signed<T> {
    pub action: Action,
    pub request: T,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderParams {
    pub instrument_name: String,
    pub asset_address: Address,
    pub sub_id: U256,
    pub subaccount_id: u64,
    pub direction: Direction,
    pub limit_price: Decimal,
    pub amount: Decimal,
    pub max_fee: Decimal,
    pub order_type: OrderType,
    pub time_in_force: TimeInForce,
    pub reduce_only: bool,
    pub mmp: bool,
    pub label: Option<String>,
}

impl OrderParams {
    /// Good-til-cancelled limit order on `instrument`
    pub fn limit(
        instrument: &Instrument,
        subaccount_id: u64,
        direction: Direction,
        limit_price: Decimal,
        amount: Decimal,
        max_fee: Decimal,
    ) -> Result<Self> {
        Ok(Self {
            instrument_name: instrument.instrument_name.clone(),
            asset_address: instrument.asset_address()?,
            sub_id: instrument.sub_id()?,
            subaccount_id,
            direction,
            limit_price,
            amount,
            max_fee,
            order_type: OrderType::Limit,
            time_in_force: TimeInForce::Gtc,
            reduce_only: false,
            mmp: false,
            label: None,
        })
    }

    pub fn module_data(&self, protocol: &ProtocolConfig) -> TradeModuleData {
        TradeModuleData {
            asset_address: self.asset_address,
            sub_id: self.sub_id,
            limit_price: self.limit_price,
            amount: self.amount,
            max_fee: self.max_fee,
            subaccount_id: self.subaccount_id,
            is_bid: self.direction.is_bid(),
            decimals: protocol.trade_decimals,
        }
    }

    /// Unsigned trade action with explicit nonce and expiry
    pub fn build_action(
        &self,
        owner: Address,
        signer: Address,
        protocol: &ProtocolConfig,
        nonce: u64,
        expiry: u64,
    ) -> Result<Action> {
        Action::new(
            self.subaccount_id,
            nonce,
            protocol.trade_module,
            &self.module_data(protocol),
            expiry,
            owner,
            signer,
        )
    }

    /// Build, sign, and wrap the order as `private/order` params
    pub async fn sign(
        &self,
        signer: &dyn ActionSigner,
        owner: Address,
        protocol: &ProtocolConfig,
        nonces: &NonceGenerator,
    ) -> Result<Signed<OrderRequest>> {
        let mut action = self.build_action(
            owner,
            signer.address(),
            protocol,
            nonces.next(),
            expiry_from_now(protocol.signature_validity_secs),
        )?;
        action.sign(signer, protocol).await?;

        info!(
            instrument = %self.instrument_name,
            subaccount_id = self.subaccount_id,
            nonce = action.nonce,
            action_hash = %action.action_hash(protocol.action_typehash),
            "order signed"
        );

        let request = OrderRequest {
            instrument_name: self.instrument_name.clone(),
            subaccount_id: self.subaccount_id,
            direction: self.direction,
            limit_price: self.limit_price,
            amount: self.amount,
            max_fee: self.max_fee,
            signature_expiry_sec: action.expiry,
            nonce: action.nonce,
            signer: action.signer.to_checksum(None),
            order_type: self.order_type,
            time_in_force: self.time_in_force,
            mmp: self.mmp,
            reduce_only: self.reduce_only,
            label: self.label.clone(),
            signature: action.signature_hex()?,
        };
        Ok(Signed { action, request })
    }
}

/// Collateral deposited into a newly created subaccount
#[derive(Debug, Clone, PartialEq)]
pub struct DepositParams {
    pub amount: Decimal,
    pub margin_type: MarginType,
    pub asset_name: String,
}

impl DepositParams {
    /// USDC deposit into a standard margin subaccount
    pub fn usdc(amount: Decimal) -> Self {
        Self {
            amount,
            margin_type: MarginType::Standard,
            asset_name: "USDC".to_string(),
        }
    }

    pub fn module_data(&self, protocol: &ProtocolConfig) -> Result<DepositModuleData> {
        let contracts = protocol.deposit_contracts()?;
        Ok(DepositModuleData {
            amount: self.amount,
            asset: contracts.cash_asset,
            manager: contracts.standard_risk_manager,
            decimals: contracts.deposit_decimals,
        })
    }

    /// Unsigned deposit action; subaccount 0 requests a new subaccount
    pub fn build_action(
        &self,
        wallet: Address,
        protocol: &ProtocolConfig,
        nonce: u64,
        expiry: u64,
    ) -> Result<Action> {
        let contracts = protocol.deposit_contracts()?;
        Action::new(
            0,
            nonce,
            contracts.deposit_module,
            &self.module_data(protocol)?,
            expiry,
            wallet,
            wallet,
        )
    }

    /// Build, sign, and wrap the deposit as `private/create_subaccount` params
    pub async fn sign(
        &self,
        signer: &dyn ActionSigner,
        protocol: &ProtocolConfig,
        nonces: &NonceGenerator,
    ) -> Result<Signed<CreateSubaccountRequest>> {
        let wallet = signer.address();
        let mut action = self.build_action(
            wallet,
            protocol,
            nonces.next(),
            expiry_from_now(protocol.signature_validity_secs),
        )?;
        action.sign(signer, protocol).await?;

        info!(
            amount = %self.amount,
            nonce = action.nonce,
            action_hash = %action.action_hash(protocol.action_typehash),
            "deposit signed"
        );

        let wallet = wallet.to_checksum(None);
        let request = CreateSubaccountRequest {
            margin_type: self.margin_type,
            signer: wallet.clone(),
            wallet,
            nonce: action.nonce,
            amount: self.amount,
            signature: action.signature_hex()?,
            signature_expiry_sec: action.expiry,
            asset_name: self.asset_name.clone(),
        };
        Ok(Signed { action, request })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::str::FromStr;

    use alloy::primitives::{B256, address, b256};
    use chrono::Utc;

    use crate::auth::{LocalKeySigner, MockActionSigner, parse_signature_hex};
    use crate::config::{Environment, LyraConfig};

    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    fn eth_perp_order() -> OrderParams {
        OrderParams {
            instrument_name: "ETH-PERP".to_string(),
            asset_address: address!("0x62CF2Cc6450Dc3FbD0662Bfd69af0a4D7485Fe4E"),
            sub_id: U256::ZERO,
            subaccount_id: 550,
            direction: Direction::Buy,
            limit_price: dec("1310"),
            amount: dec("100"),
            max_fee: dec("0.01"),
            order_type: OrderType::Limit,
            time_in_force: TimeInForce::Gtc,
            reduce_only: false,
            mmp: false,
            label: None,
        }
    }

    #[tokio::test]
    async fn test_order_signs_the_action_signing_hash() {
        let protocol = LyraConfig::preset(Environment::Test).protocol;
        let local = LocalKeySigner::new(TEST_KEY).unwrap();
        let fixed = local.sign_hash(&B256::ZERO).await.unwrap();
        let mock = MockActionSigner::new(local.address(), fixed);

        let signed = eth_perp_order()
            .sign(&mock, mock.address(), &protocol, &NonceGenerator::new())
            .await
            .unwrap();

        assert_eq!(
            mock.signed_digests(),
            vec![signed.action.signing_hash(&protocol)]
        );
        assert_eq!(signed.action.module_address, protocol.trade_module);
        assert_eq!(signed.request.nonce, signed.action.nonce);
        assert_eq!(signed.request.signature_expiry_sec, signed.action.expiry);
        assert_eq!(signed.request.signer, "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
    }

    #[tokio::test]
    async fn test_order_request_signature_recovers_signer() {
        let protocol = LyraConfig::preset(Environment::Test).protocol;
        let signer = LocalKeySigner::new(TEST_KEY).unwrap();

        let signed = eth_perp_order()
            .sign(&signer, signer.address(), &protocol, &NonceGenerator::new())
            .await
            .unwrap();

        assert!(signed.action.verify(&protocol));
        let signature = parse_signature_hex(&signed.request.signature).unwrap();
        assert_eq!(
            signature
                .recover_address_from_prehash(&signed.action.signing_hash(&protocol))
                .unwrap(),
            signer.address()
        );

        let now = Utc::now().timestamp();
        assert!(signed.action.ensure_not_expired(now).is_ok());
        assert!(signed.request.signature_expiry_sec as i64 - now <= 300);
    }

    #[test]
    fn test_build_action_matches_golden_vector() {
        let protocol = LyraConfig::preset(Environment::Test).protocol;
        let owner = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

        let action = eth_perp_order()
            .build_action(owner, owner, &protocol, 1_700_000_000_000_123, 1_700_000_300)
            .unwrap();

        assert_eq!(
            action.signing_hash(&protocol),
            b256!("0x0202785fa03946f523b4ae0af589a064b41615022d6199964128872383290daf")
        );
    }

    #[test]
    fn test_deposit_action_matches_golden_vector() {
        let protocol = LyraConfig::preset(Environment::Test).protocol;
        let wallet = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

        let action = DepositParams::usdc(dec("10000"))
            .build_action(wallet, &protocol, 1_700_000_000_000_123, 1_700_000_300)
            .unwrap();

        assert_eq!(action.subaccount_id, 0);
        assert_eq!(
            action.action_hash(protocol.action_typehash),
            b256!("0xf38bb9f042a97868c7c6f9137d5d74d9d6a486f49547d0845b03b00ae2bead22")
        );
        assert_eq!(
            action.signing_hash(&protocol),
            b256!("0x1d41e7b5dd921f53480f1484bf6555c3f2f6f40fbe8ef375e41ec5820f58d16e")
        );
    }

    #[tokio::test]
    async fn test_deposit_request_fields() {
        let protocol = LyraConfig::preset(Environment::Test).protocol;
        let signer = LocalKeySigner::new(TEST_KEY).unwrap();

        let signed = DepositParams::usdc(dec("10000"))
            .sign(&signer, &protocol, &NonceGenerator::new())
            .await
            .unwrap();

        assert!(signed.action.verify(&protocol));
        assert_eq!(signed.request.wallet, signed.request.signer);
        assert_eq!(signed.request.margin_type, MarginType::Standard);
        assert_eq!(signed.request.asset_name, "USDC");
        assert_eq!(signed.request.amount, dec("10000"));
    }

    #[tokio::test]
    async fn test_deposit_without_contracts_is_config_error() {
        let protocol = LyraConfig::preset(Environment::Prod).protocol;
        let signer = LocalKeySigner::new(TEST_KEY).unwrap();

        let err = DepositParams::usdc(dec("10000"))
            .sign(&signer, &protocol, &NonceGenerator::new())
            .await
            .unwrap_err();
        assert!(matches!(err, crate::http::LyraError::Config(_)));
    }

    #[tokio::test]
    async fn test_excess_price_precision_is_signing_error() {
        let protocol = LyraConfig::preset(Environment::Test).protocol;
        let signer = LocalKeySigner::new(TEST_KEY).unwrap();
        let order = OrderParams {
            limit_price: dec("0.0000000000000000001"),
            ..eth_perp_order()
        };

        let err = order
            .sign(&signer, signer.address(), &protocol, &NonceGenerator::new())
            .await
            .unwrap_err();
        assert!(err.is_signing_error());
    }
}
