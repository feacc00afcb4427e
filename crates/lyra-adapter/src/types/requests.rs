/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust request structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::{Currency, Direction, InstrumentType, MarginType, OrderType, TimeInForce};

/// Params of `private/order`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub instrument_name: String,
    pub subaccount_id: u64,
    pub direction: Direction,
    #[serde(with = "rust_decimal::serde::str")]
    pub limit_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub max_fee: Decimal,
    pub signature_expiry_sec: u64,
    pub nonce: u64,
    pub signer: String,
    pub order_type: OrderType,
    pub time_in_force: TimeInForce,
    pub mmp: bool,
    #[serde(default)]
    pub reduce_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub signature: String,
}

/// Params of `private/create_subaccount`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSubaccountRequest {
    pub margin_type: MarginType,
    pub wallet: String,
    pub signer: String,
    pub nonce: u64,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub signature: String,
    pub signature_expiry_sec: u64,
    pub asset_name: String,
}

/// Params of `public/get_instruments`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetInstrumentsRequest {
    pub currency: Currency,
    pub expired: bool,
    pub instrument_type: InstrumentType,
}

/// Params of `private/cancel_all`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancelAllRequest {
    pub subaccount_id: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::str::FromStr;

    #[test]
    fn test_order_request_wire_shape() {
        let request = OrderRequest {
            instrument_name: "ETH-PERP".to_string(),
            subaccount_id: 550,
            direction: Direction::Buy,
            limit_price: Decimal::from(1310),
            amount: Decimal::from(100),
            max_fee: Decimal::from_str("0.01").unwrap(),
            signature_expiry_sec: 1_700_000_300,
            nonce: 1_700_000_000_000_123,
            signer: "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".to_string(),
            order_type: OrderType::Limit,
            time_in_force: TimeInForce::Gtc,
            mmp: false,
            reduce_only: false,
            label: None,
            signature: "0xsig".to_string(),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["direction"], "buy");
        assert_eq!(value["limit_price"], "1310");
        assert_eq!(value["max_fee"], "0.01");
        assert_eq!(value["nonce"], 1_700_000_000_000_123u64);
        assert_eq!(value["order_type"], "limit");
        assert_eq!(value["time_in_force"], "gtc");
        assert!(value.get("label").is_none());
    }

    #[test]
    fn test_create_subaccount_wire_shape() {
        let request = CreateSubaccountRequest {
            margin_type: MarginType::Standard,
            wallet: "0xabc".to_string(),
            signer: "0xabc".to_string(),
            nonce: 1,
            amount: Decimal::from(10_000),
            signature: "0xsig".to_string(),
            signature_expiry_sec: 2,
            asset_name: "USDC".to_string(),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["margin_type"], "SM");
        assert_eq!(value["amount"], "10000");
        assert_eq!(value["asset_name"], "USDC");
    }
}
