//! Modal rendering.
//!
//! Each [`Modal`] variant becomes a [`ModalView`]: a title, a body and a row
//! of actions. Every modal offers a way to close it.

use gpa_core::{AppState, GradeComponent};

use super::{InputTarget, ModalView, ViewNode};
use crate::commands::Command;
use crate::i18n::Localizer;
use crate::state::{CustomMethodForm, Modal, ModuleField, ModuleForm, ResultPayload};
use crate::views::two_decimals;

pub fn build(
    modal: &Modal,
    state: &AppState,
    tr: &Localizer<'_>,
) -> ModalView {
    let (title, body, actions) = match modal {
        Modal::Module(form) => (
            tr.t(if form.is_editing() {
                "edit_module_title"
            } else {
                "add_module_title"
            }),
            module_body(form, state, tr),
            save_or_cancel(tr, Command::SaveModule),
        ),
        Modal::CustomMethod(form) => (
            tr.t("custom_method_title"),
            custom_method_body(form, tr),
            save_or_cancel(tr, Command::SaveCustomMethod),
        ),
        Modal::Result(payload) => (
            tr.t(payload.title_key),
            result_body(payload, tr),
            vec![ViewNode::button(tr.t("close"), Command::CloseModal)],
        ),
        Modal::Info => (
            tr.t("annual_info_modal_title"),
            vec![ViewNode::text(tr.t("annual_info_modal_p1"))],
            vec![ViewNode::button(tr.t("ok"), Command::CloseModal)],
        ),
        Modal::Privacy => (
            tr.t("privacy_policy_title"),
            vec![
                ViewNode::text(tr.t("privacy_policy_intro")),
                ViewNode::heading(tr.t("privacy_policy_h1")),
                ViewNode::text(tr.t("privacy_policy_p1")),
            ],
            vec![ViewNode::button(tr.t("close"), Command::CloseModal)],
        ),
        Modal::Confirm { message_key, .. } => (
            tr.t("alert_title"),
            vec![ViewNode::text(tr.t(message_key))],
            vec![
                ViewNode::button(tr.t("confirm"), Command::ConfirmAction),
                ViewNode::button(tr.t("cancel"), Command::CloseModal),
            ],
        ),
    };

    ModalView {
        kind: modal.kind(),
        title,
        body,
        actions,
    }
}

fn save_or_cancel(
    tr: &Localizer<'_>,
    save: Command,
) -> Vec<ViewNode> {
    vec![
        ViewNode::button(tr.t("save"), save),
        ViewNode::button(tr.t("cancel"), Command::CloseModal),
    ]
}

fn text_input(
    target: InputTarget,
    label: String,
    value: &str,
    placeholder: String,
    locked: bool,
) -> ViewNode {
    ViewNode::Input {
        target,
        label,
        value: value.to_string(),
        placeholder,
        locked,
    }
}

fn grade_label_key(component: GradeComponent) -> String {
    format!("grade_{}_label", component.as_str())
}

fn module_body(
    form: &ModuleForm,
    state: &AppState,
    tr: &Localizer<'_>,
) -> Vec<ViewNode> {
    let field = |field: ModuleField, label_key: &str| {
        text_input(
            InputTarget::Module(field),
            tr.t(label_key),
            form.text(field),
            String::new(),
            false,
        )
    };

    let grades = GradeComponent::ALL
        .into_iter()
        .map(|component| {
            let enabled = form.components.is_enabled(component);
            let label = tr.t(&grade_label_key(component));
            ViewNode::Row(vec![
                ViewNode::Checkbox {
                    label: label.clone(),
                    checked: enabled,
                    command: Command::ToggleGrade(component),
                },
                text_input(
                    InputTarget::Module(ModuleField::Grade(component)),
                    label,
                    form.components.text(component),
                    tr.t("grade_placeholder"),
                    !enabled,
                ),
            ])
        })
        .collect();

    vec![
        field(ModuleField::Name, "module_name_label"),
        ViewNode::Row(vec![
            field(ModuleField::Coeff, "coeff_label"),
            field(ModuleField::Credits, "credits_label"),
        ]),
        ViewNode::field(tr.t("calculation_method"), state.current_method().label.clone()),
        ViewNode::section(tr.t("calc_module_gpa"), grades),
    ]
}

/// The exam share is always on, so it has no checkbox.
fn custom_method_body(
    form: &CustomMethodForm,
    tr: &Localizer<'_>,
) -> Vec<ViewNode> {
    let mut body = vec![ViewNode::text(tr.t("custom_method_hint"))];

    for component in GradeComponent::ALL {
        let label = tr.t(&grade_label_key(component));
        let enabled = form.is_enabled(component);
        let mut row = Vec::new();
        if component != GradeComponent::Exam {
            row.push(ViewNode::Checkbox {
                label: label.clone(),
                checked: enabled,
                command: Command::ToggleCustomComponent(component),
            });
        }
        row.push(text_input(
            InputTarget::CustomMethod(component),
            label,
            form.text(component),
            tr.t("weight_placeholder"),
            !enabled,
        ));
        body.push(ViewNode::Row(row));
    }

    body
}

fn result_body(
    payload: &ResultPayload,
    tr: &Localizer<'_>,
) -> Vec<ViewNode> {
    let (average_key, verdict_key) = if payload.is_annual() {
        ("annual_gpa_card_title", "status_label")
    } else {
        ("result_label", "remark_label")
    };

    vec![
        ViewNode::field(tr.t(average_key), two_decimals(payload.average)),
        ViewNode::field(
            tr.t("credits_label_result"),
            format!(
                "{} / {}",
                payload.credits.normalize(),
                payload.total_possible_credits.normalize()
            ),
        ),
        ViewNode::field(tr.t(verdict_key), tr.t(payload.verdict.message_key())),
    ]
}
