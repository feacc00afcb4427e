/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use std::str::FromStr;

use alloy::primitives::{Address, U256};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::{Direction, InstrumentType, OrderStatus, OrderType, TimeInForce};
use crate::http::{LyraError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub instrument_name: String,
    pub instrument_type: InstrumentType,
    #[serde(default)]
    pub is_active: bool,
    pub base_currency: String,
    pub quote_currency: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub tick_size: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub minimum_amount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub maximum_amount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount_step: Decimal,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub maker_fee_rate: Decimal,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub taker_fee_rate: Decimal,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub base_fee: Decimal,
    pub base_asset_address: String,
    /// Decimal string; option sub ids exceed 64 bits
    pub base_asset_sub_id: String,
}

impl Instrument {
    /// Asset contract that the trade module settles against
    pub fn asset_address(&self) -> Result<Address> {
        Address::from_str(&self.base_asset_address).map_err(|e| {
            LyraError::InvalidResponse(format!(
                "Invalid base_asset_address {}: {e}",
                self.base_asset_address
            ))
        })
    }

    pub fn sub_id(&self) -> Result<U256> {
        U256::from_str_radix(&self.base_asset_sub_id, 10).map_err(|e| {
            LyraError::InvalidResponse(format!(
                "Invalid base_asset_sub_id {}: {e}",
                self.base_asset_sub_id
            ))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    pub instrument_name: String,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub best_bid_price: Decimal,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub best_bid_amount: Decimal,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub best_ask_price: Decimal,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub best_ask_amount: Decimal,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub mark_price: Decimal,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub index_price: Decimal,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub min_price: Decimal,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub max_price: Decimal,
    #[serde(default)]
    pub timestamp: i64,
    /// Instrument fields echoed by the ticker endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_asset_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_asset_sub_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub subaccount_id: u64,
    pub instrument_name: String,
    pub direction: Direction,
    pub order_type: OrderType,
    pub time_in_force: TimeInForce,
    pub order_status: OrderStatus,
    #[serde(with = "rust_decimal::serde::str")]
    pub limit_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub filled_amount: Decimal,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub average_price: Decimal,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub order_fee: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub max_fee: Decimal,
    pub nonce: u64,
    pub signer: String,
    pub signature: String,
    pub signature_expiry_sec: u64,
    #[serde(default)]
    pub mmp: bool,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<String>,
    #[serde(default)]
    pub creation_timestamp: i64,
    #[serde(default)]
    pub last_update_timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: String,
    pub order_id: String,
    pub instrument_name: String,
    pub direction: Direction,
    #[serde(with = "rust_decimal::serde::str")]
    pub trade_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub trade_amount: Decimal,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal"
    )]
    pub trade_fee: Decimal,
    #[serde(default)]
    pub liquidity_role: String,
    #[serde(default)]
    pub tx_status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    #[serde(default)]
    pub timestamp: i64,
}

mod serde_helpers {
    use super::Decimal;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;
    use std::str::FromStr;

    pub fn deserialize_decimal_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        if value.is_null() {
            return Ok(Decimal::ZERO);
        }

        if let Some(raw) = value.as_str() {
            if raw.trim().is_empty() {
                return Ok(Decimal::ZERO);
            }
            return Decimal::from_str(raw).map_err(serde::de::Error::custom);
        }

        if value.is_number() {
            return Decimal::from_str(&value.to_string()).map_err(serde::de::Error::custom);
        }

        Err(serde::de::Error::custom("invalid decimal value"))
    }

    pub fn serialize_decimal<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn instrument_json() -> serde_json::Value {
        json!({
            "instrument_name": "ETH-PERP",
            "instrument_type": "perp",
            "is_active": true,
            "base_currency": "ETH",
            "quote_currency": "USD",
            "tick_size": "0.01",
            "minimum_amount": "0.1",
            "maximum_amount": "1000",
            "amount_step": "0.01",
            "maker_fee_rate": "0.0001",
            "taker_fee_rate": "0.0003",
            "base_fee": "0.1",
            "base_asset_address": "0x010e26422790C6Cb3872330980FAa7628FD20294",
            "base_asset_sub_id": "0",
            "scheduled_activation": 1699035945
        })
    }

    #[test]
    fn instrument_exposes_asset_fields() {
        let instrument: Instrument = serde_json::from_value(instrument_json()).unwrap();

        assert_eq!(instrument.instrument_type, InstrumentType::Perp);
        assert_eq!(instrument.tick_size, Decimal::from_str("0.01").unwrap());
        assert_eq!(
            instrument.asset_address().unwrap().to_checksum(None),
            "0x010e26422790C6Cb3872330980FAa7628FD20294"
        );
        assert_eq!(instrument.sub_id().unwrap(), U256::ZERO);
    }

    #[test]
    fn instrument_sub_id_beyond_u64() {
        let mut value = instrument_json();
        value["base_asset_sub_id"] = json!("39614081294025656978550816768");
        let instrument: Instrument = serde_json::from_value(value).unwrap();
        assert_eq!(
            instrument.sub_id().unwrap().to_string(),
            "39614081294025656978550816768"
        );
    }

    #[test]
    fn instrument_rejects_bad_asset_address() {
        let mut value = instrument_json();
        value["base_asset_address"] = json!("0x1234");
        let instrument: Instrument = serde_json::from_value(value).unwrap();
        assert!(instrument.asset_address().is_err());
    }

    #[test]
    fn ticker_tolerates_null_prices() {
        let ticker: Ticker = serde_json::from_value(json!({
            "instrument_name": "ETH-PERP",
            "best_bid_price": "1309.5",
            "best_ask_price": null,
            "mark_price": 1310,
            "timestamp": 1700000000000i64
        }))
        .unwrap();

        assert_eq!(ticker.best_bid_price, Decimal::from_str("1309.5").unwrap());
        assert_eq!(ticker.best_ask_price, Decimal::ZERO);
        assert_eq!(ticker.mark_price, Decimal::from(1310));
    }

    #[test]
    fn order_status_accepts_american_spelling() {
        let status: OrderStatus = serde_json::from_value(json!("canceled")).unwrap();
        assert_eq!(status, OrderStatus::Cancelled);
    }
}
