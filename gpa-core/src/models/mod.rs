mod app_state;
mod method;
mod module;
mod settings;

pub use app_state::{AnnualField, AppState, DEFAULT_REQUIRED_CREDITS};
pub use method::{
    CalculationMethod, DEFAULT_METHOD_ID, WeightingMethod, predefined_methods, resolve_method,
};
pub use module::{GradeComponent, GradeComponents, Module};
pub use settings::{Language, Theme};
