//! Grade calculation modules.
//!
//! This module provides the arithmetic behind the calculator: weighting raw
//! marks into a module grade, aggregating modules into a semester result and
//! combining two semesters into an annual result.

pub mod annual;
pub mod common;
pub mod module_grade;
pub mod semester;

pub use common::OutOfRange;
pub use annual::{AnnualInput, AnnualInputError, AnnualResult, AnnualStatus, compute_annual_result};
pub use module_grade::{ModuleGradeCalculator, compute_module_grade};
pub use semester::{Remark, SemesterResult, compute_semester_result};
