//! Number handling for values typed into form fields.
//!
//! Field values always arrive as text. Two readings are used: the lenient
//! prefix parse applied when checking a numeric field ("45kg" reads as 45),
//! and the strict whole-string coercion applied when deriving summary
//! values, where blank text counts as zero.

use regex::Regex;
use std::sync::LazyLock;

static FLOAT_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)")
        .expect("float prefix pattern is valid")
});

static DECIMAL_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?$")
        .expect("decimal literal pattern is valid")
});

/// Parses the longest numeric prefix of `raw`, ignoring leading whitespace.
/// Returns `None` when no digits lead the value.
pub fn parse_float_prefix(raw: &str) -> Option<f64> {
    let trimmed = raw.trim_start();
    let matched = FLOAT_PREFIX.find(trimmed)?.as_str();
    parse_literal(matched)
}

/// Converts a whole field value to a number. Blank text is zero, anything
/// that is not entirely a number is NaN.
pub fn coerce_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    let (negative, unsigned) = match trimmed.as_bytes()[0] {
        b'-' => (true, &trimmed[1..]),
        b'+' => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    if unsigned == "Infinity" {
        return if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return f64::NAN;
        }
        return hex
            .chars()
            .filter_map(|c| c.to_digit(16))
            .fold(0.0, |acc, digit| acc * 16.0 + f64::from(digit));
    }

    if !DECIMAL_LITERAL.is_match(trimmed) {
        return f64::NAN;
    }
    parse_literal(trimmed).unwrap_or(f64::NAN)
}

/// Formats `value` with a fixed number of decimals. Non-finite values are
/// written out as `Infinity`, `-Infinity` or `NaN`. A value exactly halfway
/// between two results takes the one further from zero (`5.625` gives
/// `5.63`).
pub fn format_fixed(value: f64, decimals: usize) -> String {
    if let Some(text) = non_finite_text(value) {
        return text.to_string();
    }

    // Every finite f64 has an exact expansion within this many fraction
    // digits, so the digit string below carries no rounding of its own.
    let exact = format!("{:.*}", EXACT_FRACTION_DIGITS, value.abs());
    let (whole, fraction) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let kept = decimals.min(fraction.len());

    let mut digits: Vec<u8> = whole.bytes().chain(fraction.bytes().take(kept)).collect();
    digits.extend(std::iter::repeat_n(b'0', decimals - kept));
    if fraction.as_bytes().get(decimals).is_some_and(|digit| *digit >= b'5') {
        round_up(&mut digits);
    }

    let split = digits.len() - decimals;
    let mut text = String::with_capacity(digits.len() + 2);
    // Negative zero prints as plain zero.
    if value < 0.0 {
        text.push('-');
    }
    text.extend(digits[..split].iter().map(|digit| char::from(*digit)));
    if decimals > 0 {
        text.push('.');
        text.extend(digits[split..].iter().map(|digit| char::from(*digit)));
    }
    text
}

const EXACT_FRACTION_DIGITS: usize = 1100;

fn round_up(digits: &mut Vec<u8>) {
    for digit in digits.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}

/// Shortest display form of a bound or value: `18`, `0.5`, `NaN`.
pub fn format_number(value: f64) -> String {
    if let Some(text) = non_finite_text(value) {
        return text.to_string();
    }
    let value = if value == 0.0 { 0.0 } else { value };
    value.to_string()
}

fn non_finite_text(value: f64) -> Option<&'static str> {
    if value.is_nan() {
        Some("NaN")
    } else if value == f64::INFINITY {
        Some("Infinity")
    } else if value == f64::NEG_INFINITY {
        Some("-Infinity")
    } else {
        None
    }
}

fn parse_literal(literal: &str) -> Option<f64> {
    let (negative, unsigned) = match literal.as_bytes().first()? {
        b'-' => (true, &literal[1..]),
        b'+' => (false, &literal[1..]),
        _ => (false, literal),
    };
    let magnitude = if unsigned == "Infinity" {
        f64::INFINITY
    } else {
        // "5." and "5.e3" are valid here but not for str::parse.
        let normalized = unsigned.replacen(".e", "e", 1).replacen(".E", "E", 1);
        let normalized = normalized.strip_suffix('.').unwrap_or(&normalized);
        normalized.parse::<f64>().ok()?
    };
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::{coerce_number, format_fixed, format_number, parse_float_prefix};

    #[test]
    fn prefix_parse_reads_leading_number() {
        assert_eq!(parse_float_prefix("45"), Some(45.0));
        assert_eq!(parse_float_prefix("  45kg"), Some(45.0));
        assert_eq!(parse_float_prefix("-2.5e1x"), Some(-25.0));
        assert_eq!(parse_float_prefix(".5"), Some(0.5));
        assert_eq!(parse_float_prefix("7."), Some(7.0));
        assert_eq!(parse_float_prefix("Infinity"), Some(f64::INFINITY));
    }

    #[test]
    fn prefix_parse_rejects_non_numbers() {
        assert_eq!(parse_float_prefix(""), None);
        assert_eq!(parse_float_prefix("abc"), None);
        assert_eq!(parse_float_prefix("-"), None);
        assert_eq!(parse_float_prefix("kg45"), None);
    }

    #[test]
    fn coercion_is_strict_and_blank_is_zero() {
        assert_eq!(coerce_number(""), 0.0);
        assert_eq!(coerce_number("  "), 0.0);
        assert_eq!(coerce_number(" 200 "), 200.0);
        assert_eq!(coerce_number("0x10"), 16.0);
        assert_eq!(coerce_number("-Infinity"), f64::NEG_INFINITY);
        assert!(coerce_number("45kg").is_nan());
        assert!(coerce_number("inf").is_nan());
    }

    #[test]
    fn hex_coercion_rejects_signs_and_empty_digits() {
        assert_eq!(coerce_number("0XfF"), 255.0);
        assert!(coerce_number("0x+10").is_nan());
        assert!(coerce_number("0x-10").is_nan());
        assert!(coerce_number("0x").is_nan());
        assert!(coerce_number("-0x10").is_nan());
    }

    #[test]
    fn fixed_formatting_matches_browser_text() {
        assert_eq!(format_fixed(4.0, 2), "4.00");
        assert_eq!(format_fixed(200.0 / 3.0, 2), "66.67");
        assert_eq!(format_fixed(-0.0, 2), "0.00");
        assert_eq!(format_fixed(f64::INFINITY, 2), "Infinity");
        assert_eq!(format_fixed(f64::NAN, 2), "NaN");
    }

    #[test]
    fn fixed_formatting_rounds_ties_away_from_zero() {
        assert_eq!(format_fixed(225.0 / 40.0, 2), "5.63");
        assert_eq!(format_fixed(0.125, 2), "0.13");
        assert_eq!(format_fixed(9.995, 2), "9.99");
        assert_eq!(format_fixed(99.999, 2), "100.00");
        assert_eq!(format_fixed(2.5, 0), "3");
        assert_eq!(format_fixed(-1.005, 2), "-1.00");
        assert_eq!(format_fixed(-0.125, 2), "-0.13");
    }

    #[test]
    fn number_formatting_drops_trailing_zero_fraction() {
        assert_eq!(format_number(18.0), "18");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }
}
