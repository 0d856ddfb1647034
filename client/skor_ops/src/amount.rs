//! Token amount arithmetic.
//!
//! Amounts stay integer base units end to end; conversion to a decimal string
//! happens only when formatting, using the mint's actual decimals.

use crate::error::OpsError;

/// `10^decimals` as a `u128`.
pub fn base_unit_divisor(decimals: u8) -> Result<u128, OpsError> {
    10u128
        .checked_pow(decimals as u32)
        .ok_or(OpsError::DecimalsOutOfRange(decimals))
}

/// Formats base units as a fixed-point decimal string, e.g. `6000` at 2
/// decimals is `"60.00"`.
pub fn format_amount(amount: u128, decimals: u8) -> Result<String, OpsError> {
    let divisor = base_unit_divisor(decimals)?;
    let whole = amount / divisor;
    if decimals == 0 {
        return Ok(whole.to_string());
    }
    let fraction = amount % divisor;
    Ok(format!(
        "{}.{:0width$}",
        whole,
        fraction,
        width = decimals as usize
    ))
}

/// Converts a whole-token amount into base units.
pub fn to_base_units(whole: u64, decimals: u8) -> Result<u64, OpsError> {
    let amount = (whole as u128)
        .checked_mul(base_unit_divisor(decimals)?)
        .ok_or(OpsError::MathOverflow)?;
    u64::try_from(amount).map_err(|_| OpsError::MathOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(6_000, 2).unwrap(), "60.00");
        assert_eq!(format_amount(1_234_567, 6).unwrap(), "1.234567");
        assert_eq!(format_amount(5, 6).unwrap(), "0.000005");
        assert_eq!(format_amount(42, 0).unwrap(), "42");
        assert_eq!(
            format_amount(u64::MAX as u128 * 3, 9).unwrap(),
            "55340232221.128654845"
        );
    }

    #[test]
    fn test_decimals_out_of_range() {
        assert!(base_unit_divisor(38).is_ok());
        assert_eq!(format_amount(1, 39), Err(OpsError::DecimalsOutOfRange(39)));
    }

    #[test]
    fn test_to_base_units() {
        assert_eq!(to_base_units(1_000, 6).unwrap(), 1_000_000_000);
        assert_eq!(to_base_units(300_000, 9).unwrap(), 300_000_000_000_000);
        assert_eq!(to_base_units(u64::MAX, 1), Err(OpsError::MathOverflow));
    }
}
