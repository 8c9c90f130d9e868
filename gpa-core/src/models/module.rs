use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One of the three raw marks a module grade can be built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradeComponent {
    Td,
    Tp,
    Exam,
}

impl GradeComponent {
    pub const ALL: [GradeComponent; 3] = [GradeComponent::Td, GradeComponent::Tp, GradeComponent::Exam];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Td => "td",
            Self::Tp => "tp",
            Self::Exam => "exam",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "td" => Some(Self::Td),
            "tp" => Some(Self::Tp),
            "exam" => Some(Self::Exam),
            _ => None,
        }
    }
}

/// Raw component marks and their enabled flags, kept as typed text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GradeComponents {
    pub td_grade: String,
    pub tp_grade: String,
    pub exam_grade: String,
    pub td_enabled: bool,
    pub tp_enabled: bool,
    pub exam_enabled: bool,
}

impl GradeComponents {
    /// Exam enabled; TD and TP enabled only for three-part weightings.
    pub fn for_new_module(complex: bool) -> Self {
        Self {
            td_enabled: complex,
            tp_enabled: complex,
            exam_enabled: true,
            ..Self::default()
        }
    }

    pub fn text(
        &self,
        component: GradeComponent,
    ) -> &str {
        match component {
            GradeComponent::Td => &self.td_grade,
            GradeComponent::Tp => &self.tp_grade,
            GradeComponent::Exam => &self.exam_grade,
        }
    }

    pub fn set_text(
        &mut self,
        component: GradeComponent,
        value: impl Into<String>,
    ) {
        let slot = match component {
            GradeComponent::Td => &mut self.td_grade,
            GradeComponent::Tp => &mut self.tp_grade,
            GradeComponent::Exam => &mut self.exam_grade,
        };
        *slot = value.into();
    }

    pub fn is_enabled(
        &self,
        component: GradeComponent,
    ) -> bool {
        match component {
            GradeComponent::Td => self.td_enabled,
            GradeComponent::Tp => self.tp_enabled,
            GradeComponent::Exam => self.exam_enabled,
        }
    }

    pub fn toggle(
        &mut self,
        component: GradeComponent,
    ) {
        let flag = match component {
            GradeComponent::Td => &mut self.td_enabled,
            GradeComponent::Tp => &mut self.tp_enabled,
            GradeComponent::Exam => &mut self.exam_enabled,
        };
        *flag = !*flag;
    }
}

/// A saved course unit.
///
/// `components` was added after the first storage format; older snapshots
/// omit it and load as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: String,
    pub name: String,
    pub coeff: Decimal,
    pub credits: Decimal,
    pub grade: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<GradeComponents>,
}

impl Module {
    /// Components to pre-fill an edit form with. Legacy modules carry none,
    /// so the stored grade is offered as the exam mark.
    pub fn editable_components(&self) -> GradeComponents {
        match &self.components {
            Some(components) => components.clone(),
            None => GradeComponents {
                exam_grade: self.grade.normalize().to_string(),
                exam_enabled: true,
                ..GradeComponents::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn legacy_module() -> Module {
        Module {
            id: "1700000000000".into(),
            name: "Algebra".into(),
            coeff: dec!(2),
            credits: dec!(4),
            grade: dec!(12.50),
            components: None,
        }
    }

    #[test]
    fn new_simple_module_enables_exam_only() {
        let components = GradeComponents::for_new_module(false);

        assert!(components.exam_enabled);
        assert!(!components.td_enabled);
        assert!(!components.tp_enabled);
    }

    #[test]
    fn new_complex_module_enables_every_component() {
        let components = GradeComponents::for_new_module(true);

        assert!(components.exam_enabled && components.td_enabled && components.tp_enabled);
    }

    #[test]
    fn toggle_flips_only_the_named_component() {
        let mut components = GradeComponents::for_new_module(false);

        components.toggle(GradeComponent::Td);

        assert!(components.td_enabled);
        assert!(!components.tp_enabled);
        assert!(components.exam_enabled);
    }

    // =========================================================================
    // legacy module tests
    // =========================================================================

    #[test]
    fn legacy_module_offers_grade_as_exam_mark() {
        let components = legacy_module().editable_components();

        assert_eq!(components.exam_grade, "12.5");
        assert!(components.exam_enabled);
    }

    #[test]
    fn legacy_snapshot_without_components_deserializes() {
        let json = r#"{"id":"1","name":"Algebra","coeff":2,"credits":4,"grade":12.5}"#;

        let module: Module = serde_json::from_str(json).unwrap();

        assert_eq!(module.grade, dec!(12.5));
        assert_eq!(module.components, None);
    }

    #[test]
    fn missing_components_are_not_serialized() {
        let json = serde_json::to_string(&legacy_module()).unwrap();

        assert!(!json.contains("components"));
    }

    // =========================================================================
    // switched-off module tests
    // =========================================================================

    fn switched_off_module() -> Module {
        Module {
            components: Some(GradeComponents::default()),
            grade: dec!(0),
            ..legacy_module()
        }
    }

    #[test]
    fn switched_off_components_are_edited_as_saved() {
        let components = switched_off_module().editable_components();

        assert_eq!(components, GradeComponents::default());
    }

    #[test]
    fn switched_off_components_survive_a_round_trip() {
        let json = serde_json::to_string(&switched_off_module()).unwrap();

        let module: Module = serde_json::from_str(&json).unwrap();

        assert!(json.contains("components"));
        assert_eq!(module.components, Some(GradeComponents::default()));
        assert!(!module.editable_components().exam_enabled);
    }
}
