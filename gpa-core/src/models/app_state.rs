use serde::{Deserialize, Serialize};

use super::method::{CalculationMethod, DEFAULT_METHOD_ID, resolve_method};
use super::module::Module;
use super::settings::{Language, Theme};
use crate::calculations::common::{PASSING_GRADE, parse_leading_decimal};

pub const DEFAULT_REQUIRED_CREDITS: u32 = 30;

/// One of the four free-text fields of the annual calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnualField {
    S1Avg,
    S1Credits,
    S2Avg,
    S2Credits,
}

impl AnnualField {
    pub const ALL: [AnnualField; 4] = [
        AnnualField::S1Avg,
        AnnualField::S1Credits,
        AnnualField::S2Avg,
        AnnualField::S2Credits,
    ];

    /// Field name as it appears in the persisted snapshot.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::S1Avg => "s1AvgText",
            Self::S1Credits => "s1CreditsText",
            Self::S2Avg => "s2AvgText",
            Self::S2Credits => "s2CreditsText",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == s)
    }

    pub fn is_average(&self) -> bool {
        matches!(self, Self::S1Avg | Self::S2Avg)
    }

    /// The credits field belonging to the same semester as an average field.
    pub fn paired_credits(&self) -> Option<AnnualField> {
        match self {
            Self::S1Avg => Some(Self::S1Credits),
            Self::S2Avg => Some(Self::S2Credits),
            Self::S1Credits | Self::S2Credits => None,
        }
    }

    /// The average field that governs a credits field.
    pub fn paired_average(&self) -> Option<AnnualField> {
        match self {
            Self::S1Credits => Some(Self::S1Avg),
            Self::S2Credits => Some(Self::S2Avg),
            Self::S1Avg | Self::S2Avg => None,
        }
    }
}

/// Everything that survives a restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub language: Language,
    pub theme: Theme,
    pub calculation_method_id: String,
    pub custom_calculation_methods: Vec<CalculationMethod>,
    pub required_credits_for_debt: u32,
    pub save_settings_enabled: bool,
    pub modules: Vec<Module>,
    pub s1_avg_text: String,
    pub s1_credits_text: String,
    pub s2_avg_text: String,
    pub s2_credits_text: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            language: Language::default(),
            theme: Theme::default(),
            calculation_method_id: DEFAULT_METHOD_ID.to_string(),
            custom_calculation_methods: Vec::new(),
            required_credits_for_debt: DEFAULT_REQUIRED_CREDITS,
            save_settings_enabled: true,
            modules: Vec::new(),
            s1_avg_text: String::new(),
            s1_credits_text: String::new(),
            s2_avg_text: String::new(),
            s2_credits_text: String::new(),
        }
    }
}

impl AppState {
    pub fn current_method(&self) -> &CalculationMethod {
        resolve_method(&self.calculation_method_id, &self.custom_calculation_methods)
    }

    pub fn has_modules(&self) -> bool {
        !self.modules.is_empty()
    }

    pub fn find_module(
        &self,
        id: &str,
    ) -> Option<&Module> {
        self.modules.iter().find(|module| module.id == id)
    }

    pub fn annual_text(
        &self,
        field: AnnualField,
    ) -> &str {
        match field {
            AnnualField::S1Avg => &self.s1_avg_text,
            AnnualField::S1Credits => &self.s1_credits_text,
            AnnualField::S2Avg => &self.s2_avg_text,
            AnnualField::S2Credits => &self.s2_credits_text,
        }
    }

    pub fn set_annual_text(
        &mut self,
        field: AnnualField,
        value: impl Into<String>,
    ) {
        let slot = match field {
            AnnualField::S1Avg => &mut self.s1_avg_text,
            AnnualField::S1Credits => &mut self.s1_credits_text,
            AnnualField::S2Avg => &mut self.s2_avg_text,
            AnnualField::S2Credits => &mut self.s2_credits_text,
        };
        *slot = value.into();
    }

    pub fn clear_annual(&mut self) {
        for field in AnnualField::ALL {
            self.set_annual_text(field, "");
        }
    }

    /// A passed semester grants its full credits, so the credits field is
    /// read-only while the paired average reads 10 or more.
    pub fn is_credits_locked(
        &self,
        credits_field: AnnualField,
    ) -> bool {
        credits_field
            .paired_average()
            .and_then(|average| parse_leading_decimal(self.annual_text(average)))
            .is_some_and(|average| average >= PASSING_GRADE)
    }
}
