//! Conversion between raw fixed-point token integers and decimals.
//!
//! A raw amount `r` with `d` decimal places represents `r / 10^d`. The
//! decimal is built from the full 256-bit integer and a scale of `d`, so the
//! conversion is exact for every raw value: no division, no rounding and no
//! binary floating point.

use crate::error::ConversionError;
use bigdecimal::BigDecimal;
use bigdecimal::num_bigint::{BigInt, Sign};
use primitive_types::U256;

/// Converts a raw fixed-point integer into a human-scale decimal.
///
/// # Arguments
///
/// * `raw` - The raw on-chain integer
/// * `decimals` - The token's decimal places (e.g. 6 for a stable quote, 18 for the royalty token)
#[must_use]
pub fn to_decimal(raw: U256, decimals: u8) -> BigDecimal {
    // U256 stores little-endian 64-bit limbs.
    let bytes: Vec<u8> = raw.0.iter().flat_map(|limb| limb.to_le_bytes()).collect();
    let mantissa = BigInt::from_bytes_le(Sign::Plus, &bytes);
    BigDecimal::new(mantissa, i64::from(decimals))
}

/// Parses a base-10 raw integer string as delivered by the event decoder.
///
/// # Errors
///
/// Returns [`ConversionError::InvalidRaw`] for empty, signed, fractional or
/// otherwise malformed input, and [`ConversionError::TooLarge`] for values
/// above 2^256 - 1.
pub fn parse_raw(input: &str) -> Result<U256, ConversionError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ConversionError::InvalidRaw(input.to_string()));
    }
    U256::from_dec_str(trimmed).map_err(|_| ConversionError::TooLarge(input.to_string()))
}
