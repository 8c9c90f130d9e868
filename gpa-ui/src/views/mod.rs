//! The render engine.
//!
//! [`render`] is a pure function of the persisted state, the navigation state
//! and the open modal. Each page lives in its own module:
//! - `main_menu` - entry cards for both calculators and settings
//! - `semester` - module list and semester actions
//! - `annual` - the four annual text fields
//! - `settings` - method, credits, theme, language and data options
//!
//! `status_bar` holds the key hints of the interactive host.

mod annual;
mod main_menu;
mod semester;
mod settings;
pub mod status_bar;

use gpa_core::AppState;
use gpa_core::calculations::common::round_half_up;
use rust_decimal::Decimal;

use crate::commands::Command;
use crate::components::dialogs;
use crate::components::{Direction, Screen, ViewNode};
use crate::i18n::{Localizer, Translate};
use crate::state::{Modal, NavigationState, Page};
use crate::themes;

/// Collaborators the render engine reads from.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub translator: &'a dyn Translate,
    /// Consulted only for the automatic theme.
    pub system_prefers_dark: bool,
}

/// Title and content of one page.
pub(crate) struct PageView {
    pub title: String,
    pub body: Vec<ViewNode>,
}

/// Builds the full screen for the given inputs.
pub fn render(
    state: &AppState,
    navigation: &NavigationState,
    modal: Option<&Modal>,
    ctx: &RenderContext<'_>,
) -> Screen {
    let tr = Localizer::new(ctx.translator, state.language);
    let page = navigation.current_page;

    let PageView { title, body } = match page {
        Page::Main => main_menu::build(&tr),
        Page::SemesterCalculator => semester::build(state, &tr),
        Page::AnnualCalculator => annual::build(state, &tr),
        Page::Settings => settings::build(state, &tr),
    };

    Screen {
        language: state.language,
        direction: Direction::for_language(state.language),
        dark: themes::is_dark(state.theme, ctx.system_prefers_dark),
        page,
        title,
        body,
        modal: modal.map(|modal| dialogs::build(modal, state, &tr)),
    }
}

/// Top bar of a sub-page: optional extra actions, then the way back.
pub(crate) fn toolbar(
    tr: &Localizer<'_>,
    mut actions: Vec<ViewNode>,
) -> ViewNode {
    actions.push(ViewNode::button(tr.t("back"), Command::Navigate(Page::Main)));
    ViewNode::Row(actions)
}

/// Averages and grades are shown rounded to two places.
pub(crate) fn two_decimals(value: Decimal) -> String {
    format!("{:.2}", round_half_up(value))
}
