//! Transient UI state for the GPA calculator.
//!
//! Everything here lives only for the session: the current page, the open
//! modal and the drafts edited inside it. Nothing in this module is persisted.

use gpa_core::calculations::common::parse_leading_decimal;
use gpa_core::calculations::{AnnualStatus, Remark};
use gpa_core::{CalculationMethod, GradeComponent, GradeComponents, Module, WeightingMethod};
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Page {
    #[default]
    Main,
    SemesterCalculator,
    AnnualCalculator,
    Settings,
}

impl Page {
    pub const ALL: [Page; 4] = [
        Page::Main,
        Page::SemesterCalculator,
        Page::AnnualCalculator,
        Page::Settings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::SemesterCalculator => "semester-calculator",
            Self::AnnualCalculator => "annual-calculator",
            Self::Settings => "settings",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|page| page.as_str() == s)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    pub current_page: Page,
}

/// A free-text field of the module form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleField {
    Name,
    Coeff,
    Credits,
    Grade(GradeComponent),
}

impl ModuleField {
    pub const ALL: [ModuleField; 6] = [
        ModuleField::Name,
        ModuleField::Coeff,
        ModuleField::Credits,
        ModuleField::Grade(GradeComponent::Td),
        ModuleField::Grade(GradeComponent::Tp),
        ModuleField::Grade(GradeComponent::Exam),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Coeff => "coeff",
            Self::Credits => "credits",
            Self::Grade(GradeComponent::Td) => "tdGrade",
            Self::Grade(GradeComponent::Tp) => "tpGrade",
            Self::Grade(GradeComponent::Exam) => "examGrade",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == s)
    }
}

/// Draft of a module being added or edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleForm {
    /// `None` while adding a new module.
    pub id: Option<String>,
    pub name: String,
    pub coeff: String,
    pub credits: String,
    pub components: GradeComponents,
}

impl ModuleForm {
    pub fn blank(method: &WeightingMethod) -> Self {
        Self {
            components: GradeComponents::for_new_module(method.is_complex()),
            ..Self::default()
        }
    }

    pub fn from_module(module: &Module) -> Self {
        Self {
            id: Some(module.id.clone()),
            name: module.name.clone(),
            coeff: module.coeff.normalize().to_string(),
            credits: module.credits.normalize().to_string(),
            components: module.editable_components(),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.id.is_some()
    }

    pub fn text(
        &self,
        field: ModuleField,
    ) -> &str {
        match field {
            ModuleField::Name => &self.name,
            ModuleField::Coeff => &self.coeff,
            ModuleField::Credits => &self.credits,
            ModuleField::Grade(component) => self.components.text(component),
        }
    }

    pub fn set(
        &mut self,
        field: ModuleField,
        value: impl Into<String>,
    ) {
        match field {
            ModuleField::Name => self.name = value.into(),
            ModuleField::Coeff => self.coeff = value.into(),
            ModuleField::Credits => self.credits = value.into(),
            ModuleField::Grade(component) => self.components.set_text(component, value),
        }
    }
}

/// Draft of a user-defined weighting, in percent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomMethodForm {
    pub td: String,
    pub tp: String,
    pub exam: String,
    pub td_enabled: bool,
    pub tp_enabled: bool,
}

impl Default for CustomMethodForm {
    fn default() -> Self {
        Self {
            td: String::new(),
            tp: String::new(),
            exam: "100".to_string(),
            td_enabled: false,
            tp_enabled: false,
        }
    }
}

impl CustomMethodForm {
    pub fn text(
        &self,
        component: GradeComponent,
    ) -> &str {
        match component {
            GradeComponent::Td => &self.td,
            GradeComponent::Tp => &self.tp,
            GradeComponent::Exam => &self.exam,
        }
    }

    pub fn set(
        &mut self,
        component: GradeComponent,
        value: impl Into<String>,
    ) {
        let slot = match component {
            GradeComponent::Td => &mut self.td,
            GradeComponent::Tp => &mut self.tp,
            GradeComponent::Exam => &mut self.exam,
        };
        *slot = value.into();
    }

    /// The exam share is always part of the weighting.
    pub fn is_enabled(
        &self,
        component: GradeComponent,
    ) -> bool {
        match component {
            GradeComponent::Td => self.td_enabled,
            GradeComponent::Tp => self.tp_enabled,
            GradeComponent::Exam => true,
        }
    }

    /// Flips TD or TP. Returns `false` for the exam, which cannot be disabled.
    pub fn toggle(
        &mut self,
        component: GradeComponent,
    ) -> bool {
        match component {
            GradeComponent::Td => self.td_enabled = !self.td_enabled,
            GradeComponent::Tp => self.tp_enabled = !self.tp_enabled,
            GradeComponent::Exam => return false,
        }
        true
    }

    /// Builds the weighting, or `None` when an enabled share is unreadable,
    /// negative, or the enabled shares do not add up to 100.
    ///
    /// Both TD and TP enabled gives a three-part weighting; exactly one gives
    /// a simple weighting with that share as the continuous mark.
    pub fn to_method(&self) -> Option<CalculationMethod> {
        let share = |component: GradeComponent| -> Option<Decimal> {
            if !self.is_enabled(component) {
                return Some(Decimal::ZERO);
            }
            parse_leading_decimal(self.text(component)).filter(|v| !v.is_sign_negative())
        };
        let td = share(GradeComponent::Td)?;
        let tp = share(GradeComponent::Tp)?;
        let exam = share(GradeComponent::Exam)?;

        let continuous = td.checked_add(tp)?;
        if continuous.checked_add(exam)? != Decimal::ONE_HUNDRED {
            return None;
        }

        let weight = |percent: Decimal| percent / Decimal::ONE_HUNDRED;
        let weighting = if self.td_enabled && self.tp_enabled {
            WeightingMethod::Complex {
                td_weight: weight(td),
                tp_weight: weight(tp),
                exam_weight: weight(exam),
            }
        } else {
            WeightingMethod::Simple {
                exam_weight: weight(exam),
                continuous_weight: weight(continuous),
            }
        };

        let id = format!(
            "custom-{}-{}-{}",
            td.normalize(),
            tp.normalize(),
            exam.normalize()
        );
        Some(CalculationMethod::new(id, weighting))
    }
}

/// Semester remark or annual status shown under a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultVerdict {
    Remark(Remark),
    Status(AnnualStatus),
}

impl ResultVerdict {
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::Remark(remark) => remark.message_key(),
            Self::Status(status) => status.message_key(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultPayload {
    pub title_key: &'static str,
    pub average: Decimal,
    pub credits: Decimal,
    pub total_possible_credits: Decimal,
    pub verdict: ResultVerdict,
}

impl ResultPayload {
    pub fn is_annual(&self) -> bool {
        matches!(self.verdict, ResultVerdict::Status(_))
    }
}

/// What confirming a confirmation modal does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    ClearAllModules,
    SwitchMethod(String),
    ClearAllData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    Module(ModuleForm),
    CustomMethod(CustomMethodForm),
    Result(ResultPayload),
    Info,
    Privacy,
    Confirm {
        message_key: &'static str,
        action: ConfirmAction,
    },
}

impl Modal {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Module(_) => "module",
            Self::CustomMethod(_) => "custom-method",
            Self::Result(_) => "result",
            Self::Info => "info",
            Self::Privacy => "privacy",
            Self::Confirm { .. } => "confirm",
        }
    }
}

/// Session-only UI trees: the page plus at most one modal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    pub navigation: NavigationState,
    pub modal: Option<Modal>,
}

impl UiState {
    pub fn has_modal(&self) -> bool {
        self.modal.is_some()
    }

    pub fn module_form_mut(&mut self) -> Option<&mut ModuleForm> {
        match self.modal.as_mut() {
            Some(Modal::Module(form)) => Some(form),
            _ => None,
        }
    }

    pub fn custom_method_form_mut(&mut self) -> Option<&mut CustomMethodForm> {
        match self.modal.as_mut() {
            Some(Modal::CustomMethod(form)) => Some(form),
            _ => None,
        }
    }
}
