/*
[INPUT]:  Decimal amounts and a decimal scale (18 for trades, 6 for deposits)
[OUTPUT]: On-chain fixed-point integers (int256 / uint256) and back
[POS]:    Signing layer - exact decimal scaling for module payloads
[UPDATE]: When a new scale or integer width is needed
*/

use std::str::FromStr;

use alloy::primitives::{I256, U256};
use rust_decimal::Decimal;

use crate::http::{LyraError, Result};

/// Largest scale whose power of ten fits the intermediate `u128`
const MAX_DECIMALS: u32 = 38;

/// `value * 10^decimals` as an unsigned integer
///
/// Fails when `value` is negative or carries more fractional digits than `decimals`.
pub fn to_fixed_point_unsigned(value: Decimal, decimals: u32) -> Result<U256> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(LyraError::signing(format!(
            "{value} must not be negative"
        )));
    }
    scaled_magnitude(value, decimals)
}

/// `value * 10^decimals` as a signed integer
pub fn to_fixed_point_signed(value: Decimal, decimals: u32) -> Result<I256> {
    let magnitude = scaled_magnitude(value, decimals)?;
    let signed = I256::try_from(magnitude)
        .map_err(|_| LyraError::signing(format!("{value} overflows int256")))?;
    if value.is_sign_negative() {
        Ok(-signed)
    } else {
        Ok(signed)
    }
}

/// Inverse of [`to_fixed_point_signed`], normalized (no trailing zeros)
pub fn from_fixed_point_signed(raw: I256, decimals: u32) -> Result<Decimal> {
    decimal_from_parts(raw.unsigned_abs(), raw.is_negative(), decimals)
}

/// Inverse of [`to_fixed_point_unsigned`], normalized (no trailing zeros)
pub fn from_fixed_point_unsigned(raw: U256, decimals: u32) -> Result<Decimal> {
    decimal_from_parts(raw, false, decimals)
}

fn scaled_magnitude(value: Decimal, decimals: u32) -> Result<U256> {
    if decimals > MAX_DECIMALS {
        return Err(LyraError::signing(format!(
            "scale {decimals} exceeds {MAX_DECIMALS} decimals"
        )));
    }

    let value = value.normalize();
    let scale = value.scale();
    if scale > decimals {
        return Err(LyraError::signing(format!(
            "{value} has more than {decimals} decimal places"
        )));
    }

    let factor = U256::from(10u128.pow(decimals - scale));
    U256::from(value.mantissa().unsigned_abs())
        .checked_mul(factor)
        .ok_or_else(|| LyraError::signing(format!("{value} overflows uint256")))
}

fn decimal_from_parts(magnitude: U256, negative: bool, decimals: u32) -> Result<Decimal> {
    // Decimal mantissas are limited to 96 bits; strip trailing zeros before converting.
    let ten = U256::from(10u8);
    let mut magnitude = magnitude;
    let mut scale = decimals;
    while scale > 0 && !magnitude.is_zero() && (magnitude % ten).is_zero() {
        magnitude /= ten;
        scale -= 1;
    }

    let mantissa = i128::from_str(&magnitude.to_string()).map_err(|_| {
        LyraError::InvalidResponse(format!("{magnitude} does not fit a decimal"))
    })?;
    let mantissa = if negative { -mantissa } else { mantissa };
    Decimal::try_from_i128_with_scale(mantissa, scale)
        .map(|value| value.normalize())
        .map_err(|e| LyraError::InvalidResponse(format!("Invalid fixed-point value: {e}")))
}
