/*
[INPUT]:  Command-line arguments
[OUTPUT]: Parsed demo commands and their flags
[POS]:    Binary CLI surface
[UPDATE]: When adding subcommands or flags
*/

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use lyra_adapter::{Direction, Environment};
use rust_decimal::Decimal;

#[derive(Parser, Debug)]
#[command(name = "lyra-demo", version, about = "Sign and submit Lyra v2 orders and deposits")]
pub struct Cli {
    /// Deployment preset: test or prod
    #[arg(long = "env", value_name = "ENV", default_value = "test")]
    pub environment: Environment,
    /// YAML file replacing the preset configuration
    #[arg(long = "config", value_name = "PATH")]
    pub config_path: Option<PathBuf>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign a limit order and submit it over WebSocket
    SubmitOrder(SubmitOrderArgs),
    /// Approve collateral and open a funded subaccount over HTTP
    CreateSubaccount(CreateSubaccountArgs),
}

#[derive(Args, Debug)]
pub struct SubmitOrderArgs {
    #[arg(long, default_value = "ETH-PERP")]
    pub instrument: String,
    #[arg(long = "subaccount-id")]
    pub subaccount_id: u64,
    #[arg(long, value_enum, default_value_t = Side::Buy)]
    pub side: Side,
    #[arg(long)]
    pub price: Decimal,
    #[arg(long)]
    pub amount: Decimal,
    #[arg(long = "max-fee", default_value = "0.01")]
    pub max_fee: Decimal,
    #[arg(long)]
    pub label: Option<String>,
    /// Compare local hashes with public/order_debug before submitting
    #[arg(long = "verify-remote")]
    pub verify_remote: bool,
}

#[derive(Args, Debug)]
pub struct CreateSubaccountArgs {
    /// Collateral amount in USDC
    #[arg(long, default_value = "10000")]
    pub amount: Decimal,
    /// Skip the ERC-20 approval (allowance already granted)
    #[arg(long = "skip-approve")]
    pub skip_approve: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl From<Side> for Direction {
    fn from(side: Side) -> Self {
        match side {
            Side::Buy => Direction::Buy,
            Side::Sell => Direction::Sell,
        }
    }
}
