/*
[INPUT]:  Raw addresses, token amounts, points and ratios from the API
[OUTPUT]: Display strings for terminal output
[POS]:    Presentation layer - number and address formatting
[UPDATE]: When display rules for amounts or addresses change
*/

use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::warn;

/// Shorten an address to the first 7 and last 4 characters
///
/// Anything shorter than 11 characters is returned unchanged.
pub fn format_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() < 11 {
        return address.to_string();
    }
    let head: String = chars[..7].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

/// Convert a raw integer amount in the token's smallest unit for display
///
/// `format_token_amount("1500000", 6, 2)` -> `"1.5"`. Unparseable or zero
/// input, or more than 28 decimals, renders as `"0"`.
pub fn format_token_amount(amount: &str, decimals: u32, display_decimals: u32) -> String {
    let Ok(raw) = Decimal::from_str(amount.trim()) else {
        return "0".to_string();
    };
    if raw.is_zero() {
        return "0".to_string();
    }
    if decimals > Decimal::MAX_SCALE {
        warn!(decimals, "token decimals exceed supported scale");
        return "0".to_string();
    }
    let Ok(unit) = Decimal::try_new(1, decimals) else {
        return "0".to_string();
    };
    match raw.checked_mul(unit) {
        Some(value) => group_thousands(&trimmed(value, display_decimals)),
        None => "0".to_string(),
    }
}

/// Points with up to `decimals` fraction digits and thousands separators
pub fn format_points(points: f64, decimals: u32) -> String {
    match to_decimal(points) {
        Some(value) if !value.is_zero() => group_thousands(&trimmed(value, decimals)),
        _ => "0".to_string(),
    }
}

/// `$1,234.50`
pub fn format_usd(amount: f64) -> String {
    let Some(mut value) = to_decimal(amount).filter(|v| !v.is_zero()) else {
        return "$0.00".to_string();
    };
    value = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    value.rescale(2);
    format!("${}", group_thousands(&value.to_string()))
}

pub fn format_percent(value: f64, decimals: usize) -> String {
    if value == 0.0 || !value.is_finite() {
        return "0%".to_string();
    }
    format!("{value:.decimals$}%")
}

/// Compact form with K/M/B suffixes and one decimal
pub fn format_large_number(num: f64) -> String {
    if !num.is_finite() {
        return "0".to_string();
    }
    if num >= 1_000_000_000.0 {
        format!("{:.1}B", num / 1_000_000_000.0)
    } else if num >= 1_000_000.0 {
        format!("{:.1}M", num / 1_000_000.0)
    } else if num >= 1_000.0 {
        format!("{:.1}K", num / 1_000.0)
    } else {
        num.to_string()
    }
}

fn to_decimal(value: f64) -> Option<Decimal> {
    if value.is_finite() {
        Decimal::from_f64(value)
    } else {
        None
    }
}

/// Round half away from zero and drop trailing zeros
fn trimmed(value: Decimal, dp: u32) -> String {
    value
        .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
        .to_string()
}

fn group_thousands(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_address() {
        assert_eq!(
            format_address("0x1234567890abcdef1234567890abcdef12345678"),
            "0x12345...5678"
        );
        assert_eq!(format_address("0x12345678"), "0x12345678");
        assert_eq!(format_address(""), "");
        // Exactly 11 characters is shortened
        assert_eq!(format_address("0x123456789"), "0x12345...6789");
    }

    #[test]
    fn test_format_token_amount() {
        assert_eq!(format_token_amount("1500000", 6, 2), "1.5");
        assert_eq!(format_token_amount("1234567890000", 6, 2), "1,234,567.89");
        assert_eq!(format_token_amount("1000000000000000000", 18, 2), "1");
        assert_eq!(format_token_amount("1005", 3, 2), "1.01");
        assert_eq!(format_token_amount("0", 6, 2), "0");
        assert_eq!(format_token_amount("abc", 6, 2), "0");
        assert_eq!(format_token_amount("", 6, 2), "0");
        assert_eq!(format_token_amount("1", 28, 2), "0");
        assert_eq!(
            format_token_amount("10000000000000000000000000000", 29, 2),
            "0"
        );
    }

    #[test]
    fn test_format_points() {
        assert_eq!(format_points(1250.5, 2), "1,250.5");
        assert_eq!(format_points(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_points(42.0, 2), "42");
        assert_eq!(format_points(0.0, 2), "0");
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(1234.5), "$1,234.50");
        assert_eq!(format_usd(0.0), "$0.00");
        assert_eq!(format_usd(999999.999), "$1,000,000.00");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(12.3456, 2), "12.35%");
        assert_eq!(format_percent(0.0, 2), "0%");
        assert_eq!(format_percent(5.0, 0), "5%");
    }

    #[test]
    fn test_format_large_number() {
        assert_eq!(format_large_number(999.0), "999");
        assert_eq!(format_large_number(1500.0), "1.5K");
        assert_eq!(format_large_number(2_340_000.0), "2.3M");
        assert_eq!(format_large_number(7_000_000_000.0), "7.0B");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1234567"), "1,234,567");
        assert_eq!(group_thousands("-1234.5"), "-1,234.5");
        assert_eq!(group_thousands("123"), "123");
    }
}
