//! Annual calculator: two semesters, each an average and a credits field.

use gpa_core::{AnnualField, AppState};

use super::{PageView, toolbar};
use crate::commands::Command;
use crate::components::{InputTarget, ViewNode};
use crate::i18n::Localizer;
use crate::state::Page;

const SEMESTERS: [(&str, AnnualField, AnnualField); 2] = [
    ("s1_title", AnnualField::S1Avg, AnnualField::S1Credits),
    ("s2_title", AnnualField::S2Avg, AnnualField::S2Credits),
];

pub(super) fn build(
    state: &AppState,
    tr: &Localizer<'_>,
) -> PageView {
    let mut body = vec![toolbar(
        tr,
        vec![ViewNode::button(tr.t("info"), Command::OpenInfoModal)],
    )];

    for (title_key, average, credits) in SEMESTERS {
        body.push(ViewNode::section(
            tr.t(title_key),
            vec![ViewNode::Row(vec![
                annual_input(state, tr, average, "gpa_placeholder"),
                annual_input(state, tr, credits, "credits_placeholder"),
            ])],
        ));
    }

    body.push(ViewNode::button(tr.t("set_credits_prompt"), Command::Navigate(Page::Settings)));
    body.push(ViewNode::Row(vec![
        ViewNode::button(tr.t("show_result"), Command::CalculateAnnual),
        ViewNode::button(tr.t("clear"), Command::ClearAnnual),
    ]));

    PageView {
        title: tr.t("annual_gpa_title"),
        body,
    }
}

fn annual_input(
    state: &AppState,
    tr: &Localizer<'_>,
    field: AnnualField,
    placeholder_key: &str,
) -> ViewNode {
    ViewNode::Input {
        target: InputTarget::Annual(field),
        label: tr.t(placeholder_key),
        value: state.annual_text(field).to_string(),
        placeholder: tr.t(placeholder_key),
        locked: state.is_credits_locked(field),
    }
}
