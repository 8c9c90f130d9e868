//! Semester average calculation.
//!
//! | Output          | Rule |
//! |-----------------|------|
//! | average         | Σ(grade × coeff) / Σ(coeff), 0 when there is no coefficient |
//! | earned credits  | Σ credits of modules graded 10 or more |
//! | credits         | 30 when the average is 10 or more, earned credits otherwise |
//! | remark          | excellent ≥ 18, pass ≥ 10, poor below |
//!
//! Coefficients or credits large enough to overflow a sum are reported as
//! [`OutOfRange`].
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use gpa_core::calculations::{Remark, compute_semester_result};
//! use gpa_core::Module;
//!
//! let module = |grade, coeff| Module {
//!     id: String::new(),
//!     name: String::new(),
//!     coeff,
//!     credits: dec!(5),
//!     grade,
//!     components: None,
//! };
//!
//! let result =
//!     compute_semester_result(&[module(dec!(14), dec!(2)), module(dec!(8), dec!(1))]).unwrap();
//!
//! assert_eq!(result.average, dec!(12));
//! assert_eq!(result.earned_credits, dec!(5));
//! assert_eq!(result.credits, dec!(30));
//! assert_eq!(result.remark, Remark::Pass);
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::Module;
use crate::calculations::common::{
    EXCELLENT_GRADE, OutOfRange, PASSING_GRADE, checked_product, checked_sum,
};

/// Credits granted by a passed semester.
pub const SEMESTER_CREDITS: Decimal = Decimal::from_parts(30, 0, 0, false, 0);

/// Academic remark attached to a semester average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Remark {
    Excellent,
    Pass,
    Poor,
}

impl Remark {
    pub fn for_average(average: Decimal) -> Self {
        if average >= EXCELLENT_GRADE {
            Self::Excellent
        } else if average >= PASSING_GRADE {
            Self::Pass
        } else {
            Self::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Pass => "pass",
            Self::Poor => "poor",
        }
    }

    /// Translation key for the remark text.
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::Excellent => "remark_excellent",
            Self::Pass => "remark_pass",
            Self::Poor => "remark_poor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemesterResult {
    /// Coefficient-weighted mean of module grades, unrounded.
    pub average: Decimal,

    /// Credits of the individually passed modules.
    pub earned_credits: Decimal,

    /// Credits to report for the semester.
    pub credits: Decimal,

    pub remark: Remark,
}

/// Aggregates saved modules into a semester result.
///
/// # Errors
///
/// Returns [`OutOfRange`] when a weighted grade or one of the sums overflows.
pub fn compute_semester_result(modules: &[Module]) -> Result<SemesterResult, OutOfRange> {
    let average = weighted_average(modules)?;
    let earned_credits = earned_credits(modules)?;
    let credits = if average >= PASSING_GRADE {
        SEMESTER_CREDITS
    } else {
        earned_credits
    };

    Ok(SemesterResult {
        average,
        earned_credits,
        credits,
        remark: Remark::for_average(average),
    })
}

fn weighted_average(modules: &[Module]) -> Result<Decimal, OutOfRange> {
    let total_coeff = checked_sum(modules.iter().map(|m| m.coeff))?;
    if total_coeff.is_zero() {
        return Ok(Decimal::ZERO);
    }

    let weighted = modules
        .iter()
        .map(|m| checked_product(m.grade, m.coeff))
        .collect::<Result<Vec<_>, _>>()?;
    checked_sum(weighted)?.checked_div(total_coeff).ok_or(OutOfRange)
}

fn earned_credits(modules: &[Module]) -> Result<Decimal, OutOfRange> {
    checked_sum(
        modules
            .iter()
            .filter(|m| m.grade >= PASSING_GRADE)
            .map(|m| m.credits),
    )
}
