/*
[INPUT]:  Local key, RPC endpoint, deposit contracts, deposit amount
[OUTPUT]: Mined ERC-20 approval letting the deposit module pull collateral
[POS]:    Chain layer - the only on-chain transaction the adapter sends
[UPDATE]: When deposit contracts or approval policy change
*/

use alloy::network::{EthereumWallet, ReceiptResponse};
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::ProviderBuilder;
use alloy::sol;
use reqwest::Url;
use rust_decimal::Decimal;
use tracing::info;

use crate::auth::{ActionSigner, LocalKeySigner};
use crate::config::LyraConfig;
use crate::http::{LyraError, Result};
use crate::signing::to_fixed_point_unsigned;

sol! {
    #[sol(rpc)]
    interface IERC20 {
        function approve(address spender, uint256 value) external returns (bool);
    }
}

/// Fixed gas limit for the approval transaction
pub const APPROVE_GAS_LIMIT: u64 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalReceipt {
    pub tx_hash: TxHash,
    pub token: Address,
    pub spender: Address,
    pub value: U256,
    pub block_number: Option<u64>,
    pub success: bool,
}

/// Approve the deposit module to spend `amount` of the configured collateral token
///
/// Waits until the transaction is mined.
pub async fn approve_deposit(
    signer: &LocalKeySigner,
    config: &LyraConfig,
    amount: Decimal,
) -> Result<ApprovalReceipt> {
    let contracts = config.protocol.deposit_contracts()?;
    let value = to_fixed_point_unsigned(amount, contracts.deposit_decimals)?;
    let rpc_url = Url::parse(&config.endpoints.rpc_url)?;

    let provider = ProviderBuilder::new()
        .wallet(EthereumWallet::from(signer.key().clone()))
        .connect_http(rpc_url);
    let token = IERC20::new(contracts.usdc, provider);

    let pending = token
        .approve(contracts.deposit_module, value)
        .gas(APPROVE_GAS_LIMIT)
        .send()
        .await
        .map_err(|e| LyraError::Chain(format!("approve failed to send: {e}")))?;
    let tx_hash = *pending.tx_hash();
    info!(
        owner = %signer.address(),
        token = %contracts.usdc,
        spender = %contracts.deposit_module,
        %value,
        %tx_hash,
        "approval sent"
    );

    let receipt = pending
        .get_receipt()
        .await
        .map_err(|e| LyraError::Chain(format!("approve {tx_hash} not confirmed: {e}")))?;
    let success = ReceiptResponse::status(&receipt);
    let block_number = ReceiptResponse::block_number(&receipt);
    if !success {
        return Err(LyraError::Chain(format!("approve {tx_hash} reverted")));
    }
    info!(%tx_hash, block_number, "approval mined");

    Ok(ApprovalReceipt {
        tx_hash,
        token: contracts.usdc,
        spender: contracts.deposit_module,
        value,
        block_number,
        success,
    })
}
