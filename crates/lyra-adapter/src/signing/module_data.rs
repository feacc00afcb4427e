/*
[INPUT]:  Trade or deposit fields as decimals and addresses
[OUTPUT]: ABI-encoded module payload and its keccak-256 digest
[POS]:    Signing layer - action payload encoder (module_data_hash)
[UPDATE]: When a module's calldata layout changes on-chain
*/

use alloy::primitives::{Address, B256, I256, U256, keccak256};
use alloy::sol_types::SolValue;
use rust_decimal::Decimal;

use crate::http::{LyraError, Result};

use super::fixed_point::{
    from_fixed_point_signed, from_fixed_point_unsigned, to_fixed_point_signed,
    to_fixed_point_unsigned,
};

/// Kind-specific payload executed by an on-chain module
pub trait ModuleData {
    /// Canonical fixed-width ABI encoding
    fn encode(&self) -> Result<Vec<u8>>;

    /// `module_data_hash` of the action
    fn hash(&self) -> Result<B256> {
        Ok(keccak256(self.encode()?))
    }
}

type TradeTuple = (Address, U256, I256, I256, U256, U256, bool);
type DepositTuple = (U256, Address, Address);

/// Trade module payload
///
/// Layout: `(address asset, uint256 subId, int256 limitPrice, int256 amount,
/// uint256 maxFee, uint256 subaccountId, bool isBid)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeModuleData {
    pub asset_address: Address,
    pub sub_id: U256,
    pub limit_price: Decimal,
    pub amount: Decimal,
    pub max_fee: Decimal,
    pub subaccount_id: u64,
    pub is_bid: bool,
    /// Fixed-point scale for price, amount and fee
    pub decimals: u32,
}

impl TradeModuleData {
    pub fn decode(data: &[u8], decimals: u32) -> Result<Self> {
        let (asset_address, sub_id, limit_price, amount, max_fee, subaccount_id, is_bid) =
            TradeTuple::abi_decode_params(data)
                .map_err(|e| LyraError::InvalidResponse(format!("Invalid trade data: {e}")))?;
        let subaccount_id = u64::try_from(subaccount_id).map_err(|_| {
            LyraError::InvalidResponse(format!("subaccount id {subaccount_id} overflows u64"))
        })?;

        Ok(Self {
            asset_address,
            sub_id,
            limit_price: from_fixed_point_signed(limit_price, decimals)?,
            amount: from_fixed_point_signed(amount, decimals)?,
            max_fee: from_fixed_point_unsigned(max_fee, decimals)?,
            subaccount_id,
            is_bid,
            decimals,
        })
    }
}

impl ModuleData for TradeModuleData {
    fn encode(&self) -> Result<Vec<u8>> {
        let tuple: TradeTuple = (
            self.asset_address,
            self.sub_id,
            to_fixed_point_signed(self.limit_price, self.decimals)?,
            to_fixed_point_signed(self.amount, self.decimals)?,
            to_fixed_point_unsigned(self.max_fee, self.decimals)?,
            U256::from(self.subaccount_id),
            self.is_bid,
        );
        Ok(tuple.abi_encode_params())
    }
}

/// Deposit module payload
///
/// Layout: `(uint256 amount, address asset, address manager)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositModuleData {
    pub amount: Decimal,
    /// Cash asset credited to the subaccount
    pub asset: Address,
    /// Risk manager the new subaccount is attached to
    pub manager: Address,
    pub decimals: u32,
}

impl DepositModuleData {
    pub fn decode(data: &[u8], decimals: u32) -> Result<Self> {
        let (amount, asset, manager) = DepositTuple::abi_decode_params(data)
            .map_err(|e| LyraError::InvalidResponse(format!("Invalid deposit data: {e}")))?;
        Ok(Self {
            amount: from_fixed_point_unsigned(amount, decimals)?,
            asset,
            manager,
            decimals,
        })
    }
}

impl ModuleData for DepositModuleData {
    fn encode(&self) -> Result<Vec<u8>> {
        let tuple: DepositTuple = (
            to_fixed_point_unsigned(self.amount, self.decimals)?,
            self.asset,
            self.manager,
        );
        Ok(tuple.abi_encode_params())
    }
}
