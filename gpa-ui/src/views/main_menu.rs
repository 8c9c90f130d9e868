//! Main menu: one card per calculator plus settings.

use super::PageView;
use crate::commands::Command;
use crate::components::ViewNode;
use crate::i18n::Localizer;
use crate::state::Page;

pub(super) fn build(tr: &Localizer<'_>) -> PageView {
    let card = |title_key: &str, desc_key: &str, page: Page| {
        ViewNode::section(
            tr.t(title_key),
            vec![
                ViewNode::text(tr.t(desc_key)),
                ViewNode::button(tr.t(title_key), Command::Navigate(page)),
            ],
        )
    };

    PageView {
        title: tr.t("app_title"),
        body: vec![
            card("semester_gpa_card_title", "semester_gpa_card_desc", Page::SemesterCalculator),
            card("annual_gpa_card_title", "annual_gpa_card_desc", Page::AnnualCalculator),
            ViewNode::button(tr.t("settings"), Command::Navigate(Page::Settings)),
        ],
    }
}
