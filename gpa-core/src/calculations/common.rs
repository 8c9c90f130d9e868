//! Common utility functions for grade calculations.
//!
//! This module provides shared functionality used across the module, semester
//! and annual calculators: rounding, the pass/excellence thresholds and the
//! lenient number reading applied to free-text grade fields.

use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

/// Grade at or above which a module, semester or year is passed.
pub const PASSING_GRADE: Decimal = Decimal::TEN;

/// Grade at or above which a semester earns the excellent remark.
pub const EXCELLENT_GRADE: Decimal = Decimal::from_parts(18, 0, 0, false, 0);

/// A sum or product left the range a [`Decimal`] can hold.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("value out of range")]
pub struct OutOfRange;

/// Adds `values`, failing instead of overflowing.
pub fn checked_sum(values: impl IntoIterator<Item = Decimal>) -> Result<Decimal, OutOfRange> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |total, value| total.checked_add(value).ok_or(OutOfRange))
}

/// Multiplies a mark by its weight, failing instead of overflowing.
pub fn checked_product(
    value: Decimal,
    weight: Decimal,
) -> Result<Decimal, OutOfRange> {
    value.checked_mul(weight).ok_or(OutOfRange)
}

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded up to 0.01 (away from zero), which
/// matches how grades are displayed with two fixed decimals.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use gpa_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(14.404)), dec!(14.40));
/// assert_eq!(round_half_up(dec!(14.405)), dec!(14.41));
/// assert_eq!(round_half_up(dec!(-0.005)), dec!(-0.01)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Reads the longest numeric prefix of a free-text field.
///
/// Leading whitespace is skipped and trailing garbage ignored, so `"12abc"`
/// reads as 12 and `"12,5"` as 12. An optional exponent (`"1e1"`) is honoured.
/// Returns `None` when the text does not start with a number, or when the
/// exponent makes it too large to hold. Exponents too small to hold read as zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use gpa_core::calculations::common::parse_leading_decimal;
///
/// assert_eq!(parse_leading_decimal(" 15.5 "), Some(dec!(15.5)));
/// assert_eq!(parse_leading_decimal(".5"), Some(dec!(0.5)));
/// assert_eq!(parse_leading_decimal("12abc"), Some(dec!(12)));
/// assert_eq!(parse_leading_decimal("abc"), None);
/// ```
pub fn parse_leading_decimal(input: &str) -> Option<Decimal> {
    let text = input.trim_start();
    let bytes = text.as_bytes();
    let mut pos = 0;

    let negative = match bytes.first() {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };

    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let int_digits = &text[int_start..pos];

    let mut frac_digits = "";
    if pos < bytes.len() && bytes[pos] == b'.' {
        let frac_start = pos + 1;
        let mut end = frac_start;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        frac_digits = &text[frac_start..end];
        pos = end;
    }

    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }

    let mantissa = format!(
        "{}{}{}{}",
        if negative { "-" } else { "" },
        if int_digits.is_empty() { "0" } else { int_digits },
        if frac_digits.is_empty() { "" } else { "." },
        frac_digits
    );
    let value = Decimal::from_str(&mantissa).ok()?;

    match read_exponent(&bytes[pos..]) {
        Some(_) if value.is_zero() => Some(value),
        Some(exponent) => match Decimal::from_scientific(&format!("{mantissa}e{exponent}")) {
            Ok(scaled) => Some(scaled),
            Err(_) if exponent < 0 => Some(Decimal::ZERO),
            Err(_) => None,
        },
        None => Some(value),
    }
}

/// Reads the `e[+-]digits` suffix of a number, if one is present.
fn read_exponent(bytes: &[u8]) -> Option<i64> {
    let (first, rest) = bytes.split_first()?;
    if !matches!(first, b'e' | b'E') {
        return None;
    }

    let (negative, digits) = match rest.split_first() {
        Some((b'-', digits)) => (true, digits),
        Some((b'+', digits)) => (false, digits),
        _ => (false, rest),
    };
    let len = digits.iter().take_while(|b| b.is_ascii_digit()).count();
    if len == 0 {
        return None;
    }

    // Only an overflowing run of digits fails to parse here.
    let magnitude = std::str::from_utf8(&digits[..len])
        .ok()?
        .parse::<i64>()
        .unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Like [`parse_leading_decimal`], but unreadable text counts as zero.
pub fn parse_or_zero(input: &str) -> Decimal {
    parse_leading_decimal(input).unwrap_or(Decimal::ZERO)
}

/// Like [`parse_leading_decimal`], but unreadable text and zero count as one.
///
/// Used for coefficients and credits, where a blank field means "one".
pub fn parse_or_one(input: &str) -> Decimal {
    match parse_leading_decimal(input) {
        Some(value) if !value.is_zero() => value,
        _ => Decimal::ONE,
    }
}
