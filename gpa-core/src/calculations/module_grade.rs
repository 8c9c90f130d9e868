//! Module grade calculation.
//!
//! A module grade is a weighted blend of up to three raw marks: TD (tutorial
//! work), TP (practical work) and the final exam. Each mark can be switched
//! off; a disabled or unreadable mark contributes zero.
//!
//! | Weighting | Formula |
//! |-----------|---------|
//! | Simple    | exam × exam weight + continuous × continuous weight |
//! | Complex   | td × td weight + tp × tp weight + exam × exam weight |
//!
//! For simple weightings the continuous mark is TD when TD is enabled,
//! otherwise TP when TP is enabled, otherwise zero. Marks so large that the
//! blend overflows are reported as [`OutOfRange`].
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use gpa_core::calculations::ModuleGradeCalculator;
//! use gpa_core::{GradeComponents, WeightingMethod};
//!
//! let method = WeightingMethod::Simple {
//!     exam_weight: dec!(0.6),
//!     continuous_weight: dec!(0.4),
//! };
//! let components = GradeComponents {
//!     exam_grade: "16".into(),
//!     td_grade: "12".into(),
//!     exam_enabled: true,
//!     td_enabled: true,
//!     ..GradeComponents::default()
//! };
//!
//! let grade = ModuleGradeCalculator::new(&method).calculate(&components);
//!
//! assert_eq!(grade, Ok(dec!(14.40)));
//! ```

use rust_decimal::Decimal;

use crate::calculations::common::{
    OutOfRange, checked_product, checked_sum, parse_or_zero, round_half_up,
};
use crate::{GradeComponent, GradeComponents, WeightingMethod};

/// Calculator turning raw component marks into a module grade.
#[derive(Debug, Clone)]
pub struct ModuleGradeCalculator<'a> {
    method: &'a WeightingMethod,
}

impl<'a> ModuleGradeCalculator<'a> {
    pub fn new(method: &'a WeightingMethod) -> Self {
        Self { method }
    }

    /// Calculates the module grade, rounded half-up to two decimals.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRange`] when a weighted mark or their sum overflows.
    pub fn calculate(
        &self,
        components: &GradeComponents,
    ) -> Result<Decimal, OutOfRange> {
        let raw = match *self.method {
            WeightingMethod::Simple {
                exam_weight,
                continuous_weight,
            } => {
                let exam = self.mark(components, GradeComponent::Exam);
                let continuous = self.continuous_mark(components);
                checked_sum([
                    checked_product(exam, exam_weight)?,
                    checked_product(continuous, continuous_weight)?,
                ])?
            }
            WeightingMethod::Complex {
                td_weight,
                tp_weight,
                exam_weight,
            } => checked_sum([
                checked_product(self.mark(components, GradeComponent::Td), td_weight)?,
                checked_product(self.mark(components, GradeComponent::Tp), tp_weight)?,
                checked_product(self.mark(components, GradeComponent::Exam), exam_weight)?,
            ])?,
        };

        Ok(round_half_up(raw))
    }

    /// Reads one mark, zero when disabled or unreadable.
    fn mark(
        &self,
        components: &GradeComponents,
        component: GradeComponent,
    ) -> Decimal {
        if components.is_enabled(component) {
            parse_or_zero(components.text(component))
        } else {
            Decimal::ZERO
        }
    }

    /// Picks the continuous-assessment mark for simple weightings.
    fn continuous_mark(
        &self,
        components: &GradeComponents,
    ) -> Decimal {
        if components.td_enabled {
            self.mark(components, GradeComponent::Td)
        } else {
            self.mark(components, GradeComponent::Tp)
        }
    }
}

/// Shorthand for [`ModuleGradeCalculator::calculate`].
///
/// # Errors
///
/// Returns [`OutOfRange`] when the weighted marks overflow.
pub fn compute_module_grade(
    components: &GradeComponents,
    method: &WeightingMethod,
) -> Result<Decimal, OutOfRange> {
    ModuleGradeCalculator::new(method).calculate(components)
}
