/*
[INPUT]:  CLI arguments, .env / OWNER_PRIVATE_KEY, optional YAML configuration
[OUTPUT]: One signed request sent to the exchange, result printed as JSON
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags or startup flow
*/

mod cli;
mod flows;

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use lyra_adapter::{ActionSigner, Environment, LyraConfig, PrivateKeyCredential};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    let result = run(args).await;
    if let Err(err) = &result {
        error!(error = %format!("{err:#}"), "lyra-demo failed");
    }
    result
}

async fn run(args: Cli) -> Result<()> {
    let config = load_config(args.environment, args.config_path.as_deref())?;
    let signer = PrivateKeyCredential::from_env()
        .context("load owner key")?
        .signer()
        .context("build signer")?;

    info!(
        environment = ?args.environment,
        wallet = %signer.address(),
        http = %config.endpoints.http_base_url,
        "starting lyra-demo"
    );

    match args.command {
        Command::SubmitOrder(order) => flows::submit_order(&config, &signer, order).await,
        Command::CreateSubaccount(deposit) => {
            flows::create_subaccount(&config, &signer, deposit).await
        }
    }
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

fn load_config(environment: Environment, path: Option<&Path>) -> Result<LyraConfig> {
    match path {
        Some(path) => LyraConfig::from_yaml_file(path)
            .with_context(|| format!("load config {}", path.display())),
        None => Ok(LyraConfig::preset(environment)),
    }
}
