//! Annual average calculation.
//!
//! Combines the two semester averages and credit counts typed into the annual
//! calculator.
//!
//! | Output  | Rule |
//! |---------|------|
//! | average | (S1 average + S2 average) / 2 |
//! | credits | 60 when the average is 10 or more, S1 credits + S2 credits otherwise |
//! | status  | pass when the average is 10 or more, debt when credits reach the required amount, fail otherwise |
//!
//! Both averages must be readable numbers; credits default to zero when blank.
//! Values large enough to overflow a sum are rejected.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use gpa_core::calculations::{AnnualInput, AnnualStatus, compute_annual_result};
//!
//! let input = AnnualInput {
//!     s1_average: "8",
//!     s1_credits: "20",
//!     s2_average: "6",
//!     s2_credits: "10",
//!     required_credits_for_debt: 30,
//! };
//!
//! let result = compute_annual_result(&input).unwrap();
//!
//! assert_eq!(result.average, dec!(7));
//! assert_eq!(result.credits, dec!(30));
//! assert_eq!(result.status, AnnualStatus::Debt);
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::common::{
    OutOfRange, PASSING_GRADE, checked_sum, parse_leading_decimal, parse_or_zero,
};

/// Credits granted by a passed year.
pub const ANNUAL_CREDITS: Decimal = Decimal::from_parts(60, 0, 0, false, 0);

/// Errors that can occur during the annual calculation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnnualInputError {
    /// A semester average was blank or did not start with a number.
    #[error("semester {semester} average '{input}' is not a number")]
    InvalidAverage { semester: u8, input: String },

    /// The averages or credits are too large to add up.
    #[error("annual values are out of range")]
    OutOfRange(#[from] OutOfRange),
}

/// Raw annual calculator fields, as typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnualInput<'a> {
    pub s1_average: &'a str,
    pub s1_credits: &'a str,
    pub s2_average: &'a str,
    pub s2_credits: &'a str,

    /// Minimum credits to carry debt into the next year instead of failing.
    pub required_credits_for_debt: u32,
}

/// Outcome of the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnualStatus {
    Pass,
    Debt,
    Fail,
}

impl AnnualStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Debt => "debt",
            Self::Fail => "fail",
        }
    }

    /// Translation key for the status text.
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::Pass => "status_pass",
            Self::Debt => "status_debt",
            Self::Fail => "status_fail",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualResult {
    pub average: Decimal,
    pub credits: Decimal,
    pub status: AnnualStatus,
}

/// Computes the annual result from the raw calculator fields.
///
/// # Errors
///
/// Returns [`AnnualInputError::InvalidAverage`] if either average is not a
/// readable number, and [`AnnualInputError::OutOfRange`] if the averages or
/// credits overflow when added.
pub fn compute_annual_result(input: &AnnualInput<'_>) -> Result<AnnualResult, AnnualInputError> {
    let s1 = read_average(1, input.s1_average)?;
    let s2 = read_average(2, input.s2_average)?;
    let average = checked_sum([s1, s2])? / Decimal::TWO;

    let credits = if average >= PASSING_GRADE {
        ANNUAL_CREDITS
    } else {
        checked_sum([parse_or_zero(input.s1_credits), parse_or_zero(input.s2_credits)])?
    };

    let status = if average >= PASSING_GRADE {
        AnnualStatus::Pass
    } else if credits >= Decimal::from(input.required_credits_for_debt) {
        AnnualStatus::Debt
    } else {
        AnnualStatus::Fail
    };

    Ok(AnnualResult {
        average,
        credits,
        status,
    })
}

fn read_average(
    semester: u8,
    text: &str,
) -> Result<Decimal, AnnualInputError> {
    parse_leading_decimal(text).ok_or_else(|| AnnualInputError::InvalidAverage {
        semester,
        input: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn input<'a>(
        s1_average: &'a str,
        s1_credits: &'a str,
        s2_average: &'a str,
        s2_credits: &'a str,
    ) -> AnnualInput<'a> {
        AnnualInput {
            s1_average,
            s1_credits,
            s2_average,
            s2_credits,
            required_credits_for_debt: 30,
        }
    }

    // =========================================================================
    // status tests
    // =========================================================================

    #[test]
    fn passing_year_grants_full_credits() {
        let result = compute_annual_result(&input("16", "30", "8", "20")).unwrap();

        assert_eq!(result.average, dec!(12));
        assert_eq!(result.credits, dec!(60));
        assert_eq!(result.status, AnnualStatus::Pass);
    }

    #[test]
    fn enough_credits_carries_debt() {
        let result = compute_annual_result(&input("8", "20", "6", "10")).unwrap();

        assert_eq!(result.average, dec!(7));
        assert_eq!(result.credits, dec!(30));
        assert_eq!(result.status, AnnualStatus::Debt);
    }

    #[test]
    fn too_few_credits_fails() {
        let result = compute_annual_result(&input("5", "10", "6", "10")).unwrap();

        assert_eq!(result.average, dec!(5.5));
        assert_eq!(result.credits, dec!(20));
        assert_eq!(result.status, AnnualStatus::Fail);
    }

    #[test]
    fn higher_debt_threshold_turns_debt_into_fail() {
        let mut raw = input("8", "20", "6", "10");
        raw.required_credits_for_debt = 45;

        let result = compute_annual_result(&raw).unwrap();

        assert_eq!(result.status, AnnualStatus::Fail);
    }

    #[test]
    fn average_of_exactly_ten_passes() {
        let result = compute_annual_result(&input("9", "", "11", "")).unwrap();

        assert_eq!(result.status, AnnualStatus::Pass);
        assert_eq!(result.credits, dec!(60));
    }

    // =========================================================================
    // input tests
    // =========================================================================

    #[test]
    fn blank_credits_count_as_zero() {
        let result = compute_annual_result(&input("4", "", "6", "abc")).unwrap();

        assert_eq!(result.credits, dec!(0));
        assert_eq!(result.status, AnnualStatus::Fail);
    }

    #[test]
    fn unreadable_first_average_is_rejected() {
        let result = compute_annual_result(&input("", "30", "12", "30"));

        assert_eq!(
            result,
            Err(AnnualInputError::InvalidAverage {
                semester: 1,
                input: String::new(),
            })
        );
    }

    #[test]
    fn unreadable_second_average_is_rejected() {
        let result = compute_annual_result(&input("12", "30", "n/a", "30"));

        assert!(matches!(
            result,
            Err(AnnualInputError::InvalidAverage { semester: 2, .. })
        ));
    }

    #[test]
    fn averages_overflowing_their_sum_are_rejected() {
        let result = compute_annual_result(&input("5e28", "30", "5e28", "30"));

        assert_eq!(result, Err(AnnualInputError::OutOfRange(OutOfRange)));
    }

    #[test]
    fn credits_overflowing_their_sum_are_rejected() {
        let result = compute_annual_result(&input("4", "5e28", "6", "5e28"));

        assert_eq!(result, Err(AnnualInputError::OutOfRange(OutOfRange)));
    }

    #[test]
    fn huge_average_that_fits_still_passes() {
        let result = compute_annual_result(&input("5e28", "", "0", "")).unwrap();

        assert_eq!(result.status, AnnualStatus::Pass);
        assert_eq!(result.credits, dec!(60));
    }

    #[test]
    fn status_message_keys() {
        assert_eq!(AnnualStatus::Pass.message_key(), "status_pass");
        assert_eq!(AnnualStatus::Debt.message_key(), "status_debt");
        assert_eq!(AnnualStatus::Fail.message_key(), "status_fail");
    }
}
