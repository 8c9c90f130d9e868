//! Settings: calculation method, debt credits, theme, language and data.

use gpa_core::{AppState, CalculationMethod, Language, Theme, predefined_methods};

use super::{PageView, toolbar};
use crate::commands::{Command, DEBT_CREDIT_OPTIONS};
use crate::components::ViewNode;
use crate::i18n::Localizer;

pub(super) fn build(
    state: &AppState,
    tr: &Localizer<'_>,
) -> PageView {
    PageView {
        title: tr.t("settings"),
        body: vec![
            toolbar(tr, Vec::new()),
            method_section(state, tr),
            credits_section(state, tr),
            theme_section(state, tr),
            language_section(state, tr),
            data_section(state, tr),
            ViewNode::button(tr.t("privacy_policy"), Command::OpenPrivacyModal),
        ],
    }
}

fn method_section(
    state: &AppState,
    tr: &Localizer<'_>,
) -> ViewNode {
    let current = &state.current_method().id;
    let choice = |method: &CalculationMethod| {
        ViewNode::choice(
            method.label.clone(),
            Command::SetMethod(method.id.clone()),
            method.id == *current,
        )
    };

    let mut children: Vec<ViewNode> = predefined_methods().iter().map(choice).collect();
    if !state.custom_calculation_methods.is_empty() {
        let custom = state
            .custom_calculation_methods
            .iter()
            .map(|method| {
                ViewNode::Row(vec![
                    choice(method),
                    ViewNode::button(tr.t("delete"), Command::DeleteCustomMethod(method.id.clone())),
                ])
            })
            .collect();
        children.push(ViewNode::section(tr.t("custom_methods"), custom));
    }
    children.push(ViewNode::button(tr.t("add_new_weighting"), Command::OpenCustomMethodModal));

    ViewNode::section(tr.t("calculation_method"), children)
}

fn credits_section(
    state: &AppState,
    tr: &Localizer<'_>,
) -> ViewNode {
    let children = DEBT_CREDIT_OPTIONS
        .iter()
        .map(|&credits| {
            ViewNode::choice(
                tr.t(&format!("set_credits_option_{credits}")),
                Command::SetCredits(credits),
                state.required_credits_for_debt == credits,
            )
        })
        .collect();

    ViewNode::section(tr.t("set_credits"), children)
}

fn theme_section(
    state: &AppState,
    tr: &Localizer<'_>,
) -> ViewNode {
    let label_key = |theme: Theme| match theme {
        Theme::Light => "light_theme",
        Theme::Dark => "dark_theme",
        Theme::Automatic => "theme_auto",
    };
    let choices = Theme::ALL
        .into_iter()
        .map(|theme| {
            ViewNode::choice(tr.t(label_key(theme)), Command::SetTheme(theme), state.theme == theme)
        })
        .collect();

    ViewNode::section(tr.t("theme"), vec![ViewNode::Row(choices)])
}

/// Language names are always shown in their own script.
fn language_section(
    state: &AppState,
    tr: &Localizer<'_>,
) -> ViewNode {
    let choices = Language::ALL
        .into_iter()
        .map(|language| {
            ViewNode::choice(
                language.native_name(),
                Command::SetLang(language),
                state.language == language,
            )
        })
        .collect();

    ViewNode::section(tr.t("language"), vec![ViewNode::Row(choices)])
}

fn data_section(
    state: &AppState,
    tr: &Localizer<'_>,
) -> ViewNode {
    ViewNode::section(
        tr.t("save_changes"),
        vec![
            ViewNode::Checkbox {
                label: tr.t("save_settings"),
                checked: state.save_settings_enabled,
                command: Command::ToggleSaveSettings,
            },
            ViewNode::button(tr.t("save_changes_subtitle"), Command::OpenDataModal),
        ],
    )
}
