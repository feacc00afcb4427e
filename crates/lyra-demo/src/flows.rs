/*
[INPUT]:  Loaded configuration, owner signer, parsed subcommand flags
[OUTPUT]: Submitted order or created subaccount, printed as JSON
[POS]:    Binary flows - one network round trip per subcommand
[UPDATE]: When the order or subaccount flow changes
*/

use anyhow::{Context, Result, anyhow, bail};
use chrono::Utc;
use lyra_adapter::{
    Action, ActionSigner, AuthHeader, DepositParams, Instrument, LocalKeySigner, LyraClient,
    LyraConfig, LyraWebSocket, NonceGenerator, OrderDebugResponse, OrderParams, OrderType,
    ProtocolConfig, TimeInForce, approve_deposit,
};
use tracing::{info, warn};

use crate::cli::{CreateSubaccountArgs, SubmitOrderArgs};

pub async fn submit_order(
    config: &LyraConfig,
    signer: &LocalKeySigner,
    args: SubmitOrderArgs,
) -> Result<()> {
    let client = LyraClient::new(&config.endpoints).context("build http client")?;
    let order = resolve_order(&client, config, &args).await?;

    let signed = order
        .sign(signer, signer.address(), &config.protocol, &NonceGenerator::new())
        .await
        .context("sign order")?;

    if args.verify_remote {
        let debug_resp = client
            .order_debug(&signed.request)
            .await
            .context("public/order_debug")?;
        check_remote_hashes(&debug_resp, &signed.action, &config.protocol)?;
        info!(
            typed_data_hash = %debug_resp.typed_data_hash,
            "exchange agrees with local signing hash"
        );
    }

    let ws = LyraWebSocket::connect_with_config(&config.endpoints)
        .await
        .context("connect websocket")?;
    ws.login(signer).await.context("public/login")?;

    signed
        .action
        .ensure_not_expired(Utc::now().timestamp())
        .context("order expired before submission")?;
    let response = ws
        .submit_order(&signed.request)
        .await
        .context("private/order")?;
    println!("{}", serde_json::to_string_pretty(&response)?);

    ws.close().await.context("close websocket")?;
    Ok(())
}

/// Order params from the live instrument, or the configured perp asset when lookup fails
async fn resolve_order(
    client: &LyraClient,
    config: &LyraConfig,
    args: &SubmitOrderArgs,
) -> Result<OrderParams> {
    let lookup = client.get_instrument(&args.instrument).await;
    order_params(lookup, config, args)
}

fn order_params(
    lookup: lyra_adapter::Result<Instrument>,
    config: &LyraConfig,
    args: &SubmitOrderArgs,
) -> Result<OrderParams> {
    let mut order = match lookup {
        Ok(instrument) => OrderParams::limit(
            &instrument,
            args.subaccount_id,
            args.side.into(),
            args.price,
            args.amount,
            args.max_fee,
        )
        .context("instrument asset fields")?,
        Err(err) => {
            let asset_address = config
                .protocol
                .perp_asset(&args.instrument)
                .ok_or_else(|| anyhow!("unknown instrument {}: {err}", args.instrument))?;
            warn!(
                instrument = %args.instrument,
                error = %err,
                "instrument lookup failed, using configured perp asset"
            );
            OrderParams {
                instrument_name: args.instrument.clone(),
                asset_address,
                sub_id: Default::default(),
                subaccount_id: args.subaccount_id,
                direction: args.side.into(),
                limit_price: args.price,
                amount: args.amount,
                max_fee: args.max_fee,
                order_type: OrderType::Limit,
                time_in_force: TimeInForce::Gtc,
                reduce_only: false,
                mmp: false,
                label: None,
            }
        }
    };
    order.label = args.label.clone();
    Ok(order)
}

/// Fails unless the exchange hashed the order exactly as we did (hex case ignored)
fn check_remote_hashes(
    debug: &OrderDebugResponse,
    action: &Action,
    protocol: &ProtocolConfig,
) -> Result<()> {
    let checks = [
        (
            "module data hash",
            action.module_data_hash.to_string(),
            &debug.encoded_data_hashed,
        ),
        (
            "action hash",
            action.action_hash(protocol.action_typehash).to_string(),
            &debug.action_hash,
        ),
        (
            "signing hash",
            action.signing_hash(protocol).to_string(),
            &debug.typed_data_hash,
        ),
    ];
    for (name, local, remote) in checks {
        if !remote.eq_ignore_ascii_case(&local) {
            bail!("{name} mismatch: local {local}, exchange {remote}");
        }
    }
    Ok(())
}

pub async fn create_subaccount(
    config: &LyraConfig,
    signer: &LocalKeySigner,
    args: CreateSubaccountArgs,
) -> Result<()> {
    if args.skip_approve {
        info!("skipping collateral approval");
    } else {
        let receipt = approve_deposit(signer, config, args.amount)
            .await
            .context("approve deposit")?;
        info!(
            tx_hash = %receipt.tx_hash,
            block_number = receipt.block_number,
            "collateral approved"
        );
    }

    let signed = DepositParams::usdc(args.amount)
        .sign(signer, &config.protocol, &NonceGenerator::new())
        .await
        .context("sign deposit")?;

    let client = LyraClient::new(&config.endpoints).context("build http client")?;
    let auth = AuthHeader::now(signer).await.context("sign auth header")?;
    signed
        .action
        .ensure_not_expired(Utc::now().timestamp())
        .context("deposit expired before submission")?;
    let response = client
        .create_subaccount(&auth, &signed.request)
        .await
        .context("private/create_subaccount")?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
