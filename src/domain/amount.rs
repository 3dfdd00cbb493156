//! Conversion between display-unit decimal strings and raw fixed-point token units.
//!
//! Raw amounts are unsigned arbitrary-precision integers in the token's
//! smallest denomination. All conversion arithmetic is a pure digit shift by
//! the token's decimal precision; native floats never touch these values.

use num_bigint::BigUint;
use rust_decimal::Decimal;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error for malformed or out-of-domain amount input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),
}

/// Token amount in raw units (smallest denomination), arbitrary precision.
///
/// Serializes as a decimal string to survive JSON without precision loss.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RawAmount(BigUint);

impl RawAmount {
    /// The additive identity (0).
    pub fn zero() -> Self {
        RawAmount(BigUint::default())
    }

    /// Parse a raw-unit amount from a plain decimal-digit string.
    ///
    /// # Errors
    /// Returns `InvalidAmount` if the string is empty or contains anything
    /// other than ASCII digits.
    pub fn from_raw_str(s: &str) -> Result<Self, AmountError> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AmountError::InvalidAmount(s.to_string()));
        }
        let value = BigUint::parse_bytes(s.as_bytes(), 10)
            .ok_or_else(|| AmountError::InvalidAmount(s.to_string()))?;
        Ok(RawAmount(value))
    }

    /// Sum of two raw amounts. BigUint addition cannot overflow.
    pub fn checked_add(&self, other: &RawAmount) -> RawAmount {
        RawAmount(&self.0 + &other.0)
    }

    /// Returns true if the amount is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.0 == BigUint::default()
    }

    /// Borrow the underlying big integer.
    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }
}

impl fmt::Display for RawAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RawAmount {
    fn from(value: u64) -> Self {
        RawAmount(BigUint::from(value))
    }
}

impl Serialize for RawAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for RawAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        RawAmount::from_raw_str(&s).map_err(D::Error::custom)
    }
}

/// Convert a display-unit decimal string to raw units at the given precision.
///
/// The value is shifted by `10^decimals`; fractional digits beyond the
/// token's precision are truncated, not rounded.
///
/// # Errors
/// Returns `InvalidAmount` for empty input, signs, or any non-digit character
/// outside a single decimal point.
pub fn to_raw_units(amount: &str, decimals: u32) -> Result<RawAmount, AmountError> {
    let trimmed = amount.trim();
    if trimmed.is_empty() {
        return Err(AmountError::InvalidAmount(amount.to_string()));
    }

    let (int_part, frac_part) = match trimmed.split_once('.') {
        Some((i, f)) => (i, f),
        None => (trimmed, ""),
    };

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int_part) || !all_digits(frac_part) {
        return Err(AmountError::InvalidAmount(amount.to_string()));
    }
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(AmountError::InvalidAmount(amount.to_string()));
    }

    // Digit shift: keep at most `decimals` fractional digits, pad the rest.
    let kept_frac: String = frac_part.chars().take(decimals as usize).collect();
    let mut digits = String::with_capacity(int_part.len() + decimals as usize);
    digits.push_str(int_part);
    digits.push_str(&kept_frac);
    for _ in 0..(decimals as usize - kept_frac.len()) {
        digits.push('0');
    }

    if digits.is_empty() {
        return Ok(RawAmount::zero());
    }
    let value = BigUint::parse_bytes(digits.as_bytes(), 10)
        .ok_or_else(|| AmountError::InvalidAmount(amount.to_string()))?;
    Ok(RawAmount(value))
}

/// Convert a raw-unit amount back to a display-unit decimal string.
///
/// Lossless up to the token's own precision; trailing fractional zeros are
/// trimmed so the output is canonical.
pub fn to_display_units(raw: &RawAmount, decimals: u32) -> String {
    let digits = raw.to_string();
    if decimals == 0 {
        return digits;
    }

    let decimals = decimals as usize;
    let padded = if digits.len() <= decimals {
        format!("{}{}", "0".repeat(decimals + 1 - digits.len()), digits)
    } else {
        digits
    };

    let split = padded.len() - decimals;
    let int_part = &padded[..split];
    let frac_part = padded[split..].trim_end_matches('0');

    if frac_part.is_empty() {
        int_part.to_string()
    } else {
        format!("{}.{}", int_part, frac_part)
    }
}

/// Round a display-unit amount for presentation.
///
/// Presentation only: the result must never be fed back into conversion.
///
/// # Errors
/// Returns `InvalidAmount` if the input is not a parseable decimal number.
pub fn format_for_display(amount: &str, max_fraction_digits: u32) -> Result<String, AmountError> {
    let value = Decimal::from_str(amount.trim())
        .map_err(|_| AmountError::InvalidAmount(amount.to_string()))?;
    Ok(value.round_dp(max_fraction_digits).normalize().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_raw_units_whole_number() {
        let raw = to_raw_units("2", 18).unwrap();
        assert_eq!(raw.to_string(), "2000000000000000000");
    }

    #[test]
    fn test_to_raw_units_fractional() {
        let raw = to_raw_units("1.5", 6).unwrap();
        assert_eq!(raw.to_string(), "1500000");
    }

    #[test]
    fn test_to_raw_units_truncates_excess_precision() {
        let raw = to_raw_units("0.123456789", 4).unwrap();
        assert_eq!(raw.to_string(), "1234");
    }

    #[test]
    fn test_to_raw_units_zero_decimals() {
        let raw = to_raw_units("42.9", 0).unwrap();
        assert_eq!(raw.to_string(), "42");
    }

    #[test]
    fn test_to_raw_units_bare_fraction() {
        let raw = to_raw_units(".5", 2).unwrap();
        assert_eq!(raw.to_string(), "50");
    }

    #[test]
    fn test_to_raw_units_rejects_bad_input() {
        for input in ["", "  ", "-1", "+1", "1.2.3", "abc", "1e18", "1,000"] {
            assert!(
                matches!(to_raw_units(input, 18), Err(AmountError::InvalidAmount(_))),
                "expected rejection for {:?}",
                input
            );
        }
    }

    #[test]
    fn test_to_raw_units_beyond_u128() {
        // 40 integer digits, comfortably past any machine-word width.
        let raw = to_raw_units("1234567890123456789012345678901234567890", 18).unwrap();
        assert_eq!(
            raw.to_string(),
            format!("1234567890123456789012345678901234567890{}", "0".repeat(18))
        );
    }

    #[test]
    fn test_to_display_units_trims_trailing_zeros() {
        let raw = RawAmount::from_raw_str("1500000").unwrap();
        assert_eq!(to_display_units(&raw, 6), "1.5");
    }

    #[test]
    fn test_to_display_units_small_value_pads() {
        let raw = RawAmount::from_raw_str("5").unwrap();
        assert_eq!(to_display_units(&raw, 6), "0.000005");
    }

    #[test]
    fn test_to_display_units_zero_decimals() {
        let raw = RawAmount::from_raw_str("42").unwrap();
        assert_eq!(to_display_units(&raw, 0), "42");
    }

    #[test]
    fn test_round_trip_law() {
        for (raw_str, decimals) in [
            ("1000000000000000000", 18u32),
            ("1", 18),
            ("123456", 6),
            ("0", 8),
            ("999999999999999999999999999999", 18),
        ] {
            let raw = RawAmount::from_raw_str(raw_str).unwrap();
            let display = to_display_units(&raw, decimals);
            let back = to_raw_units(&display, decimals).unwrap();
            assert_eq!(back, raw, "round trip failed for {} @ {}", raw_str, decimals);
        }
    }

    #[test]
    fn test_checked_add() {
        let a = RawAmount::from_raw_str("1000000000000000000").unwrap();
        let b = to_raw_units("2", 18).unwrap();
        assert_eq!(a.checked_add(&b).to_string(), "3000000000000000000");
    }

    #[test]
    fn test_raw_amount_rejects_non_digits() {
        assert!(RawAmount::from_raw_str("").is_err());
        assert!(RawAmount::from_raw_str("-5").is_err());
        assert!(RawAmount::from_raw_str("1.5").is_err());
    }

    #[test]
    fn test_raw_amount_serde_string() {
        let raw = RawAmount::from_raw_str("1000000000000000000").unwrap();
        let json = serde_json::to_string(&raw).unwrap();
        assert_eq!(json, "\"1000000000000000000\"");
        let back: RawAmount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, raw);
    }

    #[test]
    fn test_format_for_display_rounds() {
        assert_eq!(format_for_display("123.456789", 4).unwrap(), "123.4568");
        assert_eq!(format_for_display("1.0000", 4).unwrap(), "1");
        assert!(format_for_display("nope", 4).is_err());
    }
}
