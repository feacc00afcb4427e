/*
[INPUT]:  Environment selection and optional YAML overrides
[OUTPUT]: Endpoint URLs, contract addresses and signing constants
[POS]:    Configuration layer - everything deployment-specific lives here
[UPDATE]: When contracts are redeployed or new endpoints are added
*/

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use alloy::primitives::{Address, B256, address, b256};
use serde::{Deserialize, Serialize};

use crate::http::{LyraError, Result};

/// `keccak256("Action(uint256 subaccountId,uint256 nonce,address module,bytes data,uint256 expiry,address owner,address signer)")`
pub const ACTION_TYPEHASH: B256 =
    b256!("0x4d7a9f27c403ff9c0f19bce61d76d82f9aa29f8d6d4b0c5474607d9770d1af17");

pub const DEFAULT_SIGNATURE_VALIDITY_SECS: u64 = 300;
pub const TRADE_DECIMALS: u32 = 18;
pub const DEPOSIT_DECIMALS: u32 = 6;

/// Deployment presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Test,
    Prod,
}

impl std::str::FromStr for Environment {
    type Err = LyraError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "test" | "testnet" | "demo" => Ok(Environment::Test),
            "prod" | "mainnet" => Ok(Environment::Prod),
            other => Err(LyraError::Config(format!("Unknown environment: {other}"))),
        }
    }
}

/// Network endpoints and transport timeouts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub http_base_url: String,
    pub ws_url: String,
    pub rpc_url: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl EndpointConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        LyraConfig::preset(Environment::Test).endpoints
    }
}

/// Contracts involved in funding a subaccount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositContracts {
    pub deposit_module: Address,
    /// Cash asset credited to the subaccount
    pub cash_asset: Address,
    pub standard_risk_manager: Address,
    /// ERC-20 token approved for the deposit module
    pub usdc: Address,
    #[serde(default = "default_deposit_decimals")]
    pub deposit_decimals: u32,
}

/// Signing constants for one deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    pub action_typehash: B256,
    pub domain_separator: B256,
    pub trade_module: Address,
    pub trade_decimals: u32,
    pub deposit: Option<DepositContracts>,
    /// Perp asset contracts keyed by instrument name (e.g. `ETH-PERP`)
    pub perp_assets: BTreeMap<String, Address>,
    pub signature_validity_secs: u64,
}

impl ProtocolConfig {
    /// Deposit contracts, or a configuration error when the deployment has none
    pub fn deposit_contracts(&self) -> Result<&DepositContracts> {
        self.deposit.as_ref().ok_or_else(|| {
            LyraError::Config("deposit contracts are not configured for this deployment".into())
        })
    }

    /// Asset address of a perpetual instrument; perps always use sub id 0
    pub fn perp_asset(&self, instrument_name: &str) -> Option<Address> {
        self.perp_assets
            .get(&instrument_name.to_ascii_uppercase())
            .copied()
    }
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        LyraConfig::preset(Environment::Test).protocol
    }
}

/// Complete adapter configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LyraConfig {
    pub endpoints: EndpointConfig,
    pub protocol: ProtocolConfig,
}

impl Default for LyraConfig {
    fn default() -> Self {
        Self::preset(Environment::Test)
    }
}

impl LyraConfig {
    /// Built-in configuration for a deployment
    pub fn preset(environment: Environment) -> Self {
        match environment {
            Environment::Test => Self {
                endpoints: EndpointConfig {
                    http_base_url: "https://api-demo.lyra.finance".to_string(),
                    ws_url: "wss://api-demo.lyra.finance/ws".to_string(),
                    rpc_url: "https://l2-prod-testnet-0eakp60405.t.conduit.xyz".to_string(),
                    request_timeout_secs: 10,
                    connect_timeout_secs: 10,
                },
                protocol: ProtocolConfig {
                    action_typehash: ACTION_TYPEHASH,
                    domain_separator: b256!(
                        "0x9bcf4dc06df5d8bf23af818d5716491b995020f377d3b7b64c29ed14e3dd1105"
                    ),
                    trade_module: address!("0x87F2863866D85E3192a35A73b388BD625D83f2be"),
                    trade_decimals: TRADE_DECIMALS,
                    deposit: Some(DepositContracts {
                        deposit_module: address!("0x43223Db33AdA0575D2E100829543f8B04A37a1ec"),
                        cash_asset: address!("0x6caf294DaC985ff653d5aE75b4FF8E0A66025928"),
                        standard_risk_manager: address!(
                            "0x28bE681F7bEa6f465cbcA1D25A2125fe7533391C"
                        ),
                        usdc: address!("0xe80F2a02398BBf1ab2C9cc52caD1978159c215BD"),
                        deposit_decimals: DEPOSIT_DECIMALS,
                    }),
                    perp_assets: BTreeMap::from([
                        (
                            "ETH-PERP".to_string(),
                            address!("0x010e26422790C6Cb3872330980FAa7628FD20294"),
                        ),
                        (
                            "BTC-PERP".to_string(),
                            address!("0xAFB6Bb95cd70D5367e2C39e9dbEb422B9815339D"),
                        ),
                    ]),
                    signature_validity_secs: DEFAULT_SIGNATURE_VALIDITY_SECS,
                },
            },
            Environment::Prod => Self {
                endpoints: EndpointConfig {
                    http_base_url: "https://api.lyra.finance".to_string(),
                    ws_url: "wss://api.lyra.finance/ws".to_string(),
                    rpc_url: "https://rpc.lyra.finance".to_string(),
                    request_timeout_secs: 10,
                    connect_timeout_secs: 10,
                },
                protocol: ProtocolConfig {
                    action_typehash: ACTION_TYPEHASH,
                    domain_separator: b256!(
                        "0xd96e5f90797da7ec8dc4e276260c7f3f87fedf68775fbe1ef116e996fc60441b"
                    ),
                    trade_module: address!("0xB8D20c2B7a1Ad2EE33Bc50eF10876eD3035b5e7b"),
                    trade_decimals: TRADE_DECIMALS,
                    deposit: None,
                    perp_assets: BTreeMap::from([
                        (
                            "ETH-PERP".to_string(),
                            address!("0xAf65752C4643E25C02F693f9D4FE19cF23a095E3"),
                        ),
                        (
                            "BTC-PERP".to_string(),
                            address!("0xDBa83C0C654DB1cd914FA2710bA743e925B53086"),
                        ),
                    ]),
                    signature_validity_secs: DEFAULT_SIGNATURE_VALIDITY_SECS,
                },
            },
        }
    }

    /// Parse a YAML document; missing fields fall back to the test preset
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| LyraError::Config(format!("Invalid configuration: {e}")))
    }

    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            LyraError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&content)
    }
}

fn default_deposit_decimals() -> u32 {
    DEPOSIT_DECIMALS
}

#[cfg(test)]
mod tests {
    use super::*;

    use alloy::primitives::keccak256;

    #[test]
    fn test_action_typehash_preimage() {
        let typehash = keccak256(
            "Action(uint256 subaccountId,uint256 nonce,address module,bytes data,uint256 expiry,address owner,address signer)",
        );
        assert_eq!(typehash, ACTION_TYPEHASH);
    }

    #[test]
    fn test_presets_use_distinct_domains() {
        let test = LyraConfig::preset(Environment::Test);
        let prod = LyraConfig::preset(Environment::Prod);
        assert_ne!(
            test.protocol.domain_separator,
            prod.protocol.domain_separator
        );
        assert_eq!(test.protocol.action_typehash, prod.protocol.action_typehash);
        assert!(test.protocol.deposit_contracts().is_ok());
        assert!(matches!(
            prod.protocol.deposit_contracts(),
            Err(LyraError::Config(_))
        ));
    }

    #[test]
    fn test_environment_from_str() {
        assert_eq!("TEST".parse::<Environment>().unwrap(), Environment::Test);
        assert_eq!("mainnet".parse::<Environment>().unwrap(), Environment::Prod);
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn test_perp_asset_lookup_is_case_insensitive() {
        let config = LyraConfig::preset(Environment::Test);
        assert_eq!(
            config.protocol.perp_asset("eth-perp"),
            Some(address!("0x010e26422790C6Cb3872330980FAa7628FD20294"))
        );
        assert!(config.protocol.perp_asset("SOL-PERP").is_none());
    }

    #[test]
    fn test_yaml_overrides_fall_back_to_test_preset() {
        let yaml = r#"
endpoints:
  ws_url: "ws://localhost:3000/ws"
protocol:
  signature_validity_secs: 600
"#;
        let config = LyraConfig::from_yaml_str(yaml).unwrap();
        let preset = LyraConfig::preset(Environment::Test);

        assert_eq!(config.endpoints.ws_url, "ws://localhost:3000/ws");
        assert_eq!(config.endpoints.http_base_url, preset.endpoints.http_base_url);
        assert_eq!(config.protocol.signature_validity_secs, 600);
        assert_eq!(
            config.protocol.domain_separator,
            preset.protocol.domain_separator
        );
    }

    #[test]
    fn test_yaml_rejects_malformed_address() {
        let yaml = r#"
protocol:
  trade_module: "0x1234"
"#;
        assert!(matches!(
            LyraConfig::from_yaml_str(yaml),
            Err(LyraError::Config(_))
        ));
    }
}
