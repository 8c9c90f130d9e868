//! The application controller.
//!
//! [`GpaApp`] owns the persisted [`AppState`], the session-only [`UiState`]
//! and the storage adapter. Every user action arrives as a [`Command`] and is
//! run to completion by [`GpaApp::dispatch`], which reports back how the
//! display has to catch up.

use chrono::Utc;
use gpa_core::calculations::annual::ANNUAL_CREDITS;
use gpa_core::calculations::common::parse_or_one;
use gpa_core::calculations::semester::SEMESTER_CREDITS;
use gpa_core::calculations::{
    AnnualInput, AnnualInputError, compute_annual_result, compute_module_grade,
    compute_semester_result,
};
use gpa_core::store::Persistence;
use gpa_core::{AnnualField, AppState, DEFAULT_METHOD_ID, GradeComponent, Module, resolve_method};

use crate::commands::{Command, UpdateChannel};
use crate::components::Screen;
use crate::state::{
    ConfirmAction, CustomMethodForm, Modal, ModuleField, ModuleForm, Page, ResultPayload,
    ResultVerdict, UiState,
};
use crate::views::{self, RenderContext};

/// A targeted update of one annual-calculator field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPatch {
    pub field: AnnualField,
    pub value: String,
    pub locked: bool,
}

/// What the host has to do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Rebuild and show the whole screen.
    Render,
    /// Apply these field updates in place; nothing else changed visibly.
    Patch(Vec<FieldPatch>),
    /// Show a blocking message. State is unchanged.
    Alert { message_key: &'static str },
    /// Nothing to show.
    Quiet,
}

impl Outcome {
    pub fn channel(&self) -> UpdateChannel {
        match self {
            Self::Render | Self::Alert { .. } => UpdateChannel::FullRender,
            Self::Patch(_) => UpdateChannel::FieldPatch,
            Self::Quiet => UpdateChannel::Silent,
        }
    }
}

/// Module ids: millisecond timestamps, bumped when two saves share a tick.
#[derive(Debug, Default)]
struct IdSource {
    last: i64,
}

impl IdSource {
    fn next(&mut self) -> String {
        let id = Utc::now().timestamp_millis().max(self.last + 1);
        self.last = id;
        id.to_string()
    }
}

pub struct GpaApp {
    state: AppState,
    ui: UiState,
    persistence: Persistence,
    ids: IdSource,
}

impl GpaApp {
    /// Loads the saved state and starts on the main page with no modal.
    pub fn new(persistence: Persistence) -> Self {
        let state = persistence.load();
        tracing::info!(
            modules = state.modules.len(),
            persisted = state.save_settings_enabled,
            "application state loaded"
        );

        Self {
            state,
            ui: UiState::default(),
            persistence,
            ids: IdSource::default(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn page(&self) -> Page {
        self.ui.navigation.current_page
    }

    pub fn modal(&self) -> Option<&Modal> {
        self.ui.modal.as_ref()
    }

    /// Builds the current screen.
    pub fn render(
        &self,
        ctx: &RenderContext<'_>,
    ) -> Screen {
        views::render(&self.state, &self.ui.navigation, self.ui.modal.as_ref(), ctx)
    }

    /// Runs one command to completion.
    pub fn dispatch(
        &mut self,
        command: Command,
    ) -> Outcome {
        let verb = command.verb();
        let declared = command.channel();

        let outcome = match command {
            Command::Navigate(page) => self.navigate(page),
            Command::SetTheme(theme) => {
                tracing::info!(theme = theme.as_str(), "theme changed");
                self.state.theme = theme;
                self.save_and_render()
            }
            Command::SetLang(language) => {
                tracing::info!(language = language.as_str(), "language changed");
                self.state.language = language;
                self.save_and_render()
            }
            Command::SetMethod(id) => self.set_method(&id),
            Command::SetCredits(credits) => {
                tracing::info!(credits, "required credits for debt changed");
                self.state.required_credits_for_debt = credits;
                self.save_and_render()
            }
            Command::OpenModuleModal(id) => self.open_module_modal(id.as_deref()),
            Command::UpdateModuleForm(field, value) => self.update_module_form(field, value),
            Command::ToggleGrade(component) => self.toggle_grade(component),
            Command::SaveModule => self.save_module(),
            Command::DeleteModule(id) => self.delete_module(&id),
            Command::DeleteAllModules => self.open_confirm(
                "confirm_delete_all_modules",
                ConfirmAction::ClearAllModules,
            ),
            Command::CalculateSemester => self.calculate_semester(),
            Command::HandleAnnualInput(field, value) => self.handle_annual_input(field, value),
            Command::CalculateAnnual => self.calculate_annual(),
            Command::ClearAnnual => {
                self.state.clear_annual();
                self.save_and_render()
            }
            Command::OpenInfoModal => self.open_modal(Modal::Info),
            Command::OpenPrivacyModal => self.open_modal(Modal::Privacy),
            Command::OpenDataModal => {
                self.open_confirm("confirm_clear_all_data", ConfirmAction::ClearAllData)
            }
            Command::CloseModal => self.close_modal(),
            Command::ConfirmAction => self.confirm_action(),
            Command::OpenCustomMethodModal => {
                self.open_modal(Modal::CustomMethod(CustomMethodForm::default()))
            }
            Command::UpdateCustomMethodForm(component, value) => {
                if let Some(form) = self.ui.custom_method_form_mut() {
                    form.set(component, value);
                }
                Outcome::Quiet
            }
            Command::ToggleCustomComponent(component) => match self.ui.custom_method_form_mut() {
                Some(form) => {
                    if form.toggle(component) { Outcome::Render } else { Outcome::Quiet }
                }
                None => Outcome::Quiet,
            },
            Command::SaveCustomMethod => self.save_custom_method(),
            Command::DeleteCustomMethod(id) => self.delete_custom_method(&id),
            Command::ToggleSaveSettings => {
                self.state.save_settings_enabled = !self.state.save_settings_enabled;
                tracing::info!(enabled = self.state.save_settings_enabled, "persistence toggled");
                self.save_and_render()
            }
        };

        debug_assert!(
            declared != UpdateChannel::Silent || outcome == Outcome::Quiet,
            "silent command '{verb}' asked for {outcome:?}"
        );
        tracing::debug!(command = verb, outcome = ?outcome.channel(), "command dispatched");
        outcome
    }

    // ─── persistence ────────────────────────────────────────────────────────

    fn save(&mut self) {
        self.persistence.save_state(&self.state);
    }

    fn save_and_render(&mut self) -> Outcome {
        self.save();
        Outcome::Render
    }

    // ─── navigation and modals ──────────────────────────────────────────────

    fn navigate(
        &mut self,
        page: Page,
    ) -> Outcome {
        tracing::info!(page = page.as_str(), "navigate");
        self.ui.navigation.current_page = page;
        Outcome::Render
    }

    fn open_modal(
        &mut self,
        modal: Modal,
    ) -> Outcome {
        self.ui.modal = Some(modal);
        Outcome::Render
    }

    fn open_confirm(
        &mut self,
        message_key: &'static str,
        action: ConfirmAction,
    ) -> Outcome {
        self.open_modal(Modal::Confirm {
            message_key,
            action,
        })
    }

    fn close_modal(&mut self) -> Outcome {
        match self.ui.modal.take() {
            Some(_) => Outcome::Render,
            None => Outcome::Quiet,
        }
    }

    /// Runs the pending confirmation, if any, then closes the modal.
    fn confirm_action(&mut self) -> Outcome {
        let Some(modal) = self.ui.modal.take() else {
            return Outcome::Quiet;
        };
        let Modal::Confirm { action, .. } = modal else {
            return Outcome::Render;
        };

        match action {
            ConfirmAction::ClearAllModules => {
                tracing::info!(count = self.state.modules.len(), "clearing all modules");
                self.state.modules.clear();
                self.save();
            }
            ConfirmAction::SwitchMethod(id) => {
                tracing::info!(method = %id, "calculation method switched; modules discarded");
                self.state.modules.clear();
                self.state.calculation_method_id = id;
                self.save();
            }
            ConfirmAction::ClearAllData => {
                tracing::info!("clearing all stored data");
                self.persistence.clear_all();
                self.state = self.persistence.load();
                self.ui = UiState::default();
            }
        }
        Outcome::Render
    }

    // ─── settings ───────────────────────────────────────────────────────────

    /// Switching methods invalidates stored grades, so with modules present
    /// the switch waits for confirmation.
    fn set_method(
        &mut self,
        id: &str,
    ) -> Outcome {
        let resolved = resolve_method(id, &self.state.custom_calculation_methods);
        if resolved.id != id {
            tracing::warn!(requested = id, fallback = %resolved.id, "unknown calculation method");
        }
        let resolved = resolved.id.clone();

        if resolved == self.state.calculation_method_id {
            return Outcome::Quiet;
        }
        if self.state.has_modules() {
            return self.open_confirm(
                "confirm_change_calc_method",
                ConfirmAction::SwitchMethod(resolved),
            );
        }

        tracing::info!(method = %resolved, "calculation method changed");
        self.state.calculation_method_id = resolved;
        self.save_and_render()
    }

    fn save_custom_method(&mut self) -> Outcome {
        let Some(form) = self.ui.custom_method_form_mut() else {
            return Outcome::Quiet;
        };
        let Some(method) = form.to_method() else {
            return Outcome::Alert {
                message_key: "error_weights_sum",
            };
        };

        self.ui.modal = None;
        let exists = self
            .state
            .custom_calculation_methods
            .iter()
            .any(|existing| existing.id == method.id);
        if exists {
            tracing::debug!(method = %method.id, "custom method already defined");
            return Outcome::Render;
        }

        tracing::info!(method = %method.id, label = %method.label, "custom method added");
        self.state.custom_calculation_methods.push(method);
        self.save_and_render()
    }

    fn delete_custom_method(
        &mut self,
        id: &str,
    ) -> Outcome {
        let before = self.state.custom_calculation_methods.len();
        self.state.custom_calculation_methods.retain(|method| method.id != id);
        if self.state.custom_calculation_methods.len() == before {
            tracing::debug!(method = id, "no custom method to delete");
            return Outcome::Quiet;
        }

        if self.state.calculation_method_id == id {
            self.state.calculation_method_id = DEFAULT_METHOD_ID.to_string();
        }
        tracing::info!(method = id, "custom method deleted");
        self.save_and_render()
    }

    // ─── modules ────────────────────────────────────────────────────────────

    fn open_module_modal(
        &mut self,
        id: Option<&str>,
    ) -> Outcome {
        let form = match id.and_then(|id| self.state.find_module(id)) {
            Some(module) => ModuleForm::from_module(module),
            None => ModuleForm::blank(&self.state.current_method().weighting),
        };
        self.open_modal(Modal::Module(form))
    }

    fn update_module_form(
        &mut self,
        field: ModuleField,
        value: String,
    ) -> Outcome {
        if let Some(form) = self.ui.module_form_mut() {
            form.set(field, value);
        }
        Outcome::Quiet
    }

    fn toggle_grade(
        &mut self,
        component: GradeComponent,
    ) -> Outcome {
        match self.ui.module_form_mut() {
            Some(form) => {
                form.components.toggle(component);
                Outcome::Render
            }
            None => Outcome::Quiet,
        }
    }

    fn save_module(&mut self) -> Outcome {
        let Some(Modal::Module(form)) = self.ui.modal.as_ref() else {
            return Outcome::Quiet;
        };
        let name = form.name.trim();
        if name.is_empty() {
            return Outcome::Alert {
                message_key: "error_module_name_required",
            };
        }

        let weighting = &self.state.current_method().weighting;
        let grade = match compute_module_grade(&form.components, weighting) {
            Ok(grade) => grade,
            Err(e) => {
                tracing::debug!(error = %e, "module grade rejected");
                return Outcome::Alert {
                    message_key: "error_value_out_of_range",
                };
            }
        };
        let mut module = Module {
            id: String::new(),
            name: name.to_string(),
            coeff: parse_or_one(&form.coeff),
            credits: parse_or_one(&form.credits),
            grade,
            components: Some(form.components.clone()),
        };

        match form.id.clone() {
            Some(id) => {
                module.id = id;
                match self.state.modules.iter_mut().find(|m| m.id == module.id) {
                    Some(slot) => *slot = module,
                    None => self.state.modules.push(module),
                }
            }
            None => {
                module.id = self.fresh_module_id();
                tracing::info!(id = %module.id, name = %module.name, grade = %module.grade, "module added");
                self.state.modules.push(module);
            }
        }

        self.ui.modal = None;
        self.save_and_render()
    }

    fn fresh_module_id(&mut self) -> String {
        loop {
            let id = self.ids.next();
            if self.state.find_module(&id).is_none() {
                return id;
            }
        }
    }

    fn delete_module(
        &mut self,
        id: &str,
    ) -> Outcome {
        self.state.modules.retain(|module| module.id != id);
        self.save_and_render()
    }

    fn calculate_semester(&mut self) -> Outcome {
        if !self.state.has_modules() {
            return Outcome::Alert {
                message_key: "error_no_modules",
            };
        }

        let result = match compute_semester_result(&self.state.modules) {
            Ok(result) => result,
            Err(e) => {
                tracing::debug!(error = %e, "semester calculation rejected");
                return Outcome::Alert {
                    message_key: "error_value_out_of_range",
                };
            }
        };
        self.open_modal(Modal::Result(ResultPayload {
            title_key: "semester_result_title",
            average: result.average,
            credits: result.credits,
            total_possible_credits: SEMESTER_CREDITS,
            verdict: ResultVerdict::Remark(result.remark),
        }))
    }

    // ─── annual calculator ──────────────────────────────────────────────────

    /// Stores the typed text and reports which fields need an in-place update.
    ///
    /// An average of 10 or more pins its credits field at 30 and locks it;
    /// dropping back below 10 unlocks it. Edits to a locked credits field are
    /// refused and the field is restored.
    fn handle_annual_input(
        &mut self,
        field: AnnualField,
        value: String,
    ) -> Outcome {
        if self.state.is_credits_locked(field) {
            return Outcome::Patch(vec![self.patch_for(field)]);
        }

        self.state.set_annual_text(field, value);

        let mut patches = Vec::new();
        if let Some(credits) = field.paired_credits() {
            if self.state.is_credits_locked(credits) {
                self.state.set_annual_text(credits, SEMESTER_CREDITS.to_string());
            }
            patches.push(self.patch_for(credits));
        }

        self.save();
        Outcome::Patch(patches)
    }

    fn patch_for(
        &self,
        field: AnnualField,
    ) -> FieldPatch {
        FieldPatch {
            field,
            value: self.state.annual_text(field).to_string(),
            locked: self.state.is_credits_locked(field),
        }
    }

    fn calculate_annual(&mut self) -> Outcome {
        let input = AnnualInput {
            s1_average: &self.state.s1_avg_text,
            s1_credits: &self.state.s1_credits_text,
            s2_average: &self.state.s2_avg_text,
            s2_credits: &self.state.s2_credits_text,
            required_credits_for_debt: self.state.required_credits_for_debt,
        };

        match compute_annual_result(&input) {
            Ok(result) => self.open_modal(Modal::Result(ResultPayload {
                title_key: "annual_result_title",
                average: result.average,
                credits: result.credits,
                total_possible_credits: ANNUAL_CREDITS,
                verdict: ResultVerdict::Status(result.status),
            })),
            Err(e) => {
                tracing::debug!(error = %e, "annual calculation rejected");
                let message_key = match e {
                    AnnualInputError::InvalidAverage { .. } => "error_invalid_annual_values",
                    AnnualInputError::OutOfRange(_) => "error_value_out_of_range",
                };
                Outcome::Alert { message_key }
            }
        }
    }
}
