//! Display formatting for snapshot values
//!
//! Pure functions, no state. Sub-unit prices are always padded to a fixed
//! eight fractional digits; trailing-zero trimming only applies at or above
//! one dollar.

use crate::constants::EXPONENTIAL_PRICE_THRESHOLD;

const ZERO_USD: &str = "$0.00";

/// Formats a unit price in USD
///
/// - non-finite: `$0.00`
/// - below `0.00001`: exponential with six mantissa decimals (`$1.234500e-6`)
/// - below `1`: exactly eight fractional digits (`$0.00032100`)
/// - otherwise: grouped thousands and two to six fractional digits (`$1,234.5678`)
pub fn format_price(price: f64) -> String {
    if !price.is_finite() {
        return ZERO_USD.to_string();
    }

    if price < EXPONENTIAL_PRICE_THRESHOLD {
        return format!("${}", exponential(price, 6));
    }

    if price < 1.0 {
        return format!("${:.8}", round_half_away(price, 8));
    }

    let fixed = format!("{:.6}", round_half_away(price, 6));
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let trimmed = frac_part.trim_end_matches('0');
    let frac = if trimmed.len() < 2 {
        &frac_part[..2.min(frac_part.len())]
    } else {
        trimmed
    };

    format!("${}.{}", group_thousands(int_part), frac)
}

/// Formats a market cap or volume with a `K`, `M` or `B` suffix
pub fn format_large_number(num: f64) -> String {
    if !num.is_finite() {
        return ZERO_USD.to_string();
    }

    if num >= 1_000_000_000.0 {
        format!("${:.2}B", round_half_away(num / 1_000_000_000.0, 2))
    } else if num >= 1_000_000.0 {
        format!("${:.2}M", round_half_away(num / 1_000_000.0, 2))
    } else if num >= 1_000.0 {
        format!("${:.2}K", round_half_away(num / 1_000.0, 2))
    } else {
        format!("${:.2}", round_half_away(num, 2))
    }
}

/// Formats a percentage change, e.g. `-3.20%`
pub fn format_change_percent(change: f64) -> String {
    if !change.is_finite() {
        return "0.00%".to_string();
    }
    format!("{:.2}%", round_half_away(change, 2))
}

/// Rounds to `decimals` places with ties going away from zero
///
/// `{:.N}` alone rounds exact binary ties to even (`0.125` -> `0.12`).
fn round_half_away(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

/// Exponential notation with an explicitly signed exponent (`1.5e+0`, `2.0e-7`)
fn exponential(value: f64, decimals: usize) -> String {
    let raw = format!("{:.*e}", decimals, value);
    match raw.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
        _ => raw,
    }
}

/// Inserts `,` separators into a run of integer digits, keeping any sign
fn group_thousands(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}{}", sign, grouped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fraction_digits(s: &str) -> usize {
        s.split_once('.').map(|(_, frac)| frac.len()).unwrap_or(0)
    }

    #[test]
    fn test_non_finite_price() {
        assert_eq!(format_price(f64::NAN), "$0.00");
        assert_eq!(format_price(f64::INFINITY), "$0.00");
        assert_eq!(format_price(f64::NEG_INFINITY), "$0.00");
    }

    #[test]
    fn test_tiny_price_uses_exponential() {
        assert_eq!(format_price(0.0000012345), "$1.234500e-6");
        assert_eq!(format_price(0.0), "$0.000000e+0");
        assert_eq!(format_price(0.000009), "$9.000000e-6");
    }

    #[test]
    fn test_sub_unit_price_has_eight_digits() {
        assert_eq!(format_price(0.000321), "$0.00032100");
        assert_eq!(format_price(0.00001), "$0.00001000");
        assert_eq!(format_price(0.5), "$0.50000000");

        for price in [0.00001, 0.0000456, 0.0031, 0.12345678, 0.75, 0.99] {
            let formatted = format_price(price);
            assert!(formatted.starts_with("$0."), "{}", formatted);
            assert_eq!(fraction_digits(&formatted), 8, "{}", formatted);
        }
    }

    #[test]
    fn test_unit_price_trims_to_between_two_and_six_digits() {
        assert_eq!(format_price(1.0), "$1.00");
        assert_eq!(format_price(2.5), "$2.50");
        assert_eq!(format_price(1.23456789), "$1.234568");
        assert_eq!(format_price(1234.5678), "$1,234.5678");
        assert_eq!(format_price(1_000_000.0), "$1,000,000.00");

        for price in [1.0, 1.1, 3.14159, 42.000001, 999.999, 65_432.1, 1.0e12] {
            let formatted = format_price(price);
            assert!(formatted.starts_with('$'), "{}", formatted);
            let digits = fraction_digits(&formatted);
            assert!((2..=6).contains(&digits), "{} has {} digits", formatted, digits);
        }
    }

    #[test]
    fn test_large_number_suffixes() {
        assert_eq!(format_large_number(1_500_000_000.0), "$1.50B");
        assert_eq!(format_large_number(42_100_000.0), "$42.10M");
        assert_eq!(format_large_number(2_300.0), "$2.30K");
        assert_eq!(format_large_number(999.0), "$999.00");
        assert_eq!(format_large_number(0.0), "$0.00");
        assert_eq!(format_large_number(f64::NAN), "$0.00");
    }

    #[test]
    fn test_ties_round_away_from_zero() {
        assert_eq!(format_large_number(1125.0), "$1.13K");
        assert_eq!(format_large_number(2125.0), "$2.13K");
        assert_eq!(format_large_number(0.125), "$0.13");
        assert_eq!(format_large_number(3_375_000_000.0), "$3.38B");
        assert_eq!(format_price(1.0078125), "$1.007813");
        assert_eq!(format_price(0.001953125), "$0.00195313");
        assert_eq!(format_change_percent(-0.125), "-0.13%");
    }

    #[test]
    fn test_change_percent() {
        assert_eq!(format_change_percent(12.0), "12.00%");
        assert_eq!(format_change_percent(-3.2), "-3.20%");
        assert_eq!(format_change_percent(f64::NAN), "0.00%");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("123"), "123");
        assert_eq!(group_thousands("1234"), "1,234");
        assert_eq!(group_thousands("1234567"), "1,234,567");
        assert_eq!(group_thousands("-9876"), "-9,876");
    }
}
