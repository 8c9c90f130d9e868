//! Semester calculator: the saved modules and the semester actions.

use gpa_core::{AppState, Module};

use super::{PageView, toolbar, two_decimals};
use crate::commands::Command;
use crate::components::ViewNode;
use crate::i18n::Localizer;

pub(super) fn build(
    state: &AppState,
    tr: &Localizer<'_>,
) -> PageView {
    let mut body = vec![
        toolbar(tr, Vec::new()),
        ViewNode::field(tr.t("calculation_method"), state.current_method().label.clone()),
    ];

    if state.modules.is_empty() {
        body.push(ViewNode::text(tr.t("no_modules_yet")));
    } else {
        body.extend(state.modules.iter().map(|module| module_card(module, tr)));
    }

    body.push(ViewNode::Row(vec![
        ViewNode::button(tr.t("add_new_module"), Command::OpenModuleModal(None)),
        ViewNode::button(tr.t("delete_all_modules"), Command::DeleteAllModules),
    ]));
    body.push(ViewNode::button(tr.t("show_result"), Command::CalculateSemester));

    PageView {
        title: tr.t("semester_gpa_title"),
        body,
    }
}

fn module_card(
    module: &Module,
    tr: &Localizer<'_>,
) -> ViewNode {
    ViewNode::section(
        module.name.clone(),
        vec![
            ViewNode::Row(vec![
                ViewNode::field(tr.t("grade_th"), two_decimals(module.grade)),
                ViewNode::field(tr.t("coeff_th"), module.coeff.normalize().to_string()),
                ViewNode::field(tr.t("credits_th"), module.credits.normalize().to_string()),
            ]),
            ViewNode::Row(vec![
                ViewNode::button(tr.t("edit"), Command::OpenModuleModal(Some(module.id.clone()))),
                ViewNode::button(tr.t("delete"), Command::DeleteModule(module.id.clone())),
            ]),
        ],
    )
}
