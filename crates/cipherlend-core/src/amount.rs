//! # Decimal Amounts
//!
//! User-entered amounts arrive as `f64`. Two places need an exact textual
//! form instead of the float itself:
//!
//! - digest input, where `CanonicalBytes` rejects floats, and
//! - the `value` of a payable contract call, which is an integer in wei.
//!
//! Both go through [`canonical_decimal`], which renders the shortest decimal
//! string that round-trips to the same `f64`. Wei conversion then works on
//! the decimal digits, never on `amount * 1e18`.

use crate::error::CoreError;

/// Number of decimal places between the native unit and wei.
pub const WEI_DECIMALS: u32 = 18;

/// Render a finite `f64` as its shortest round-tripping decimal string.
///
/// Never uses exponent notation. Negative zero renders as `"0"`.
pub fn canonical_decimal(value: f64) -> Result<String, CoreError> {
    if !value.is_finite() {
        return Err(CoreError::InvalidAmount(format!("value must be finite, got {value}")));
    }
    if value == 0.0 {
        return Ok("0".to_string());
    }
    Ok(format!("{value}"))
}

/// Convert a non-negative native-unit amount into wei.
///
/// Digits beyond the 18th decimal place are truncated.
pub fn to_wei(amount: f64) -> Result<u128, CoreError> {
    if amount < 0.0 {
        return Err(CoreError::InvalidAmount(format!(
            "amount must not be negative, got {amount}"
        )));
    }
    let decimal = canonical_decimal(amount)?;
    let (whole, fraction) = match decimal.split_once('.') {
        Some((w, f)) => (w, f),
        None => (decimal.as_str(), ""),
    };

    let overflow = || CoreError::InvalidAmount(format!("amount {decimal} overflows wei range"));

    let whole: u128 = whole.parse().map_err(|_| overflow())?;
    let mut fraction_digits: String = fraction.chars().take(WEI_DECIMALS as usize).collect();
    while fraction_digits.len() < WEI_DECIMALS as usize {
        fraction_digits.push('0');
    }
    let fraction: u128 = fraction_digits.parse().map_err(|_| overflow())?;

    whole
        .checked_mul(10u128.pow(WEI_DECIMALS))
        .and_then(|w| w.checked_add(fraction))
        .ok_or_else(overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_rendering() {
        assert_eq!(canonical_decimal(1.5).unwrap(), "1.5");
        assert_eq!(canonical_decimal(10.0).unwrap(), "10");
        assert_eq!(canonical_decimal(750.0).unwrap(), "750");
        assert_eq!(canonical_decimal(-0.0).unwrap(), "0");
        assert_eq!(canonical_decimal(0.1).unwrap(), "0.1");
    }

    #[test]
    fn non_finite_rejected() {
        assert!(canonical_decimal(f64::NAN).is_err());
        assert!(canonical_decimal(f64::INFINITY).is_err());
        assert!(to_wei(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn wei_is_exact() {
        assert_eq!(to_wei(10.0).unwrap(), 10_000_000_000_000_000_000);
        assert_eq!(to_wei(1.5).unwrap(), 1_500_000_000_000_000_000);
        // 0.1 * 1e18 in float arithmetic is 100000000000000016; the decimal path is exact.
        assert_eq!(to_wei(0.1).unwrap(), 100_000_000_000_000_000);
    }

    #[test]
    fn wei_rejects_negative() {
        assert!(to_wei(-1.0).is_err());
    }

    #[test]
    fn wei_truncates_beyond_eighteen_places() {
        assert_eq!(to_wei(0.000_000_000_000_000_000_1).unwrap(), 0);
    }
}
