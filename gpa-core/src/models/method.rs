use std::sync::LazyLock;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const DEFAULT_METHOD_ID: &str = "simple-0.6";

/// How a module grade is weighted from its component marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum WeightingMethod {
    /// Exam plus one continuous-assessment mark (TD or TP).
    Simple {
        exam_weight: Decimal,
        continuous_weight: Decimal,
    },
    /// TD, TP and exam each weighted separately.
    Complex {
        td_weight: Decimal,
        tp_weight: Decimal,
        exam_weight: Decimal,
    },
}

impl WeightingMethod {
    pub fn is_complex(&self) -> bool {
        matches!(self, Self::Complex { .. })
    }

    /// Human label in the `exam / continuous` or `td|tp / exam` shape.
    pub fn label(&self) -> String {
        match self {
            Self::Simple {
                exam_weight,
                continuous_weight,
            } => format!("{}% / {}%", percent(*exam_weight), percent(*continuous_weight)),
            Self::Complex {
                td_weight,
                tp_weight,
                exam_weight,
            } => format!(
                "{}%|{}% / {}%",
                percent(*td_weight),
                percent(*tp_weight),
                percent(*exam_weight)
            ),
        }
    }
}

fn percent(weight: Decimal) -> Decimal {
    (weight * Decimal::ONE_HUNDRED).normalize()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationMethod {
    pub id: String,
    pub label: String,
    pub weighting: WeightingMethod,
}

impl CalculationMethod {
    pub fn new(
        id: impl Into<String>,
        weighting: WeightingMethod,
    ) -> Self {
        Self {
            id: id.into(),
            label: weighting.label(),
            weighting,
        }
    }
}

static PREDEFINED: LazyLock<Vec<CalculationMethod>> = LazyLock::new(|| {
    vec![
        CalculationMethod::new(
            DEFAULT_METHOD_ID,
            WeightingMethod::Simple {
                exam_weight: Decimal::new(6, 1),
                continuous_weight: Decimal::new(4, 1),
            },
        ),
        CalculationMethod::new(
            "simple-0.5",
            WeightingMethod::Simple {
                exam_weight: Decimal::new(5, 1),
                continuous_weight: Decimal::new(5, 1),
            },
        ),
        CalculationMethod::new(
            "complex-25-25-50",
            WeightingMethod::Complex {
                td_weight: Decimal::new(25, 2),
                tp_weight: Decimal::new(25, 2),
                exam_weight: Decimal::new(5, 1),
            },
        ),
    ]
});

/// The built-in weightings, in display order. Never empty.
pub fn predefined_methods() -> &'static [CalculationMethod] {
    &PREDEFINED
}

/// Looks a method up among the predefined ones first, then the custom ones,
/// falling back to the first predefined method for unknown ids.
pub fn resolve_method<'a>(
    id: &str,
    custom: &'a [CalculationMethod],
) -> &'a CalculationMethod {
    predefined_methods()
        .iter()
        .chain(custom.iter())
        .find(|method| method.id == id)
        .unwrap_or(&PREDEFINED[0])
}
