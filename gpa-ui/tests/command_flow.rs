use std::path::Path;

use gpa_core::calculations::{AnnualStatus, Remark};
use gpa_core::store::Persistence;
use gpa_core::{AnnualField, AppState, Language, Theme};
use gpa_store::{JsonFileStore, MemoryStore};
use gpa_ui::components::{Direction, InputTarget};
use gpa_ui::i18n::Catalog;
use gpa_ui::state::{Modal, Page, ResultVerdict};
use gpa_ui::{Command, FieldPatch, GpaApp, Outcome, RenderContext, Screen, ViewNode};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use tempfile::tempdir;

fn memory_app() -> GpaApp {
    GpaApp::new(Persistence::new(Box::new(MemoryStore::new())))
}

fn file_app(path: &Path) -> GpaApp {
    GpaApp::new(Persistence::new(Box::new(JsonFileStore::open(path).unwrap())))
}

fn run(
    app: &mut GpaApp,
    line: &str,
) -> Outcome {
    let command: Command = line.parse().unwrap();
    app.dispatch(command)
}

fn run_all(
    app: &mut GpaApp,
    lines: &[&str],
) {
    for line in lines {
        run(app, line);
    }
}

fn screen(app: &GpaApp) -> Screen {
    let catalog = Catalog::builtin();
    let ctx = RenderContext {
        translator: &catalog,
        system_prefers_dark: false,
    };
    app.render(&ctx)
}

/// Adds a module with a TD mark under the default 60/40 weighting.
fn add_module(
    app: &mut GpaApp,
    name: &str,
    exam: &str,
    td: &str,
    coeff: &str,
) {
    run_all(
        app,
        &[
            "open-module-modal",
            &format!("update-module-form name {name}"),
            &format!("update-module-form examGrade {exam}"),
            "toggle-grade td",
            &format!("update-module-form tdGrade {td}"),
            &format!("update-module-form coeff {coeff}"),
        ],
    );
    assert_eq!(run(app, "save-module"), Outcome::Render);
}

// =============================================================================
// semester flow
// =============================================================================

#[test]
fn semester_modules_can_be_added_edited_and_deleted() {
    let mut app = memory_app();
    run_all(&mut app, &["set-lang en", "navigate semester-calculator"]);

    add_module(&mut app, "Algebra", "16", "12", "2");
    add_module(&mut app, "Physics", "5", "5", "1");

    let grades: Vec<_> = app.state().modules.iter().map(|m| m.grade).collect();
    assert_eq!(grades, vec![dec!(14.40), dec!(5.00)]);

    let physics = app.state().modules[1].id.clone();
    run_all(
        &mut app,
        &[
            &format!("open-module-modal {physics}"),
            "update-module-form examGrade 10",
            "save-module",
        ],
    );

    assert_eq!(app.state().modules.len(), 2);
    assert_eq!(app.state().modules[1].id, physics);
    assert_eq!(app.state().modules[1].grade, dec!(8.00));

    let algebra = app.state().modules[0].id.clone();
    run(&mut app, &format!("delete-module {algebra}"));

    let names: Vec<_> = app.state().modules.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Physics"]);
}

#[test]
fn semester_result_opens_with_rounded_average() {
    let mut app = memory_app();
    run(&mut app, "set-lang en");
    add_module(&mut app, "Algebra", "16", "12", "2");
    add_module(&mut app, "Physics", "5", "5", "1");

    assert_eq!(run(&mut app, "calculate-semester"), Outcome::Render);

    let Some(Modal::Result(payload)) = app.modal() else {
        panic!("expected a result modal, got {:?}", app.modal());
    };
    assert_eq!(payload.verdict, ResultVerdict::Remark(Remark::Pass));
    assert_eq!(payload.credits, dec!(30));

    let screen = screen(&app);
    assert!(screen.nodes().contains(&&ViewNode::field("Average", "11.27")));
    assert!(screen.nodes().contains(&&ViewNode::field("Remark", "Pass")));
}

#[test]
fn semester_result_without_modules_alerts() {
    let mut app = memory_app();

    assert_eq!(
        run(&mut app, "calculate-semester"),
        Outcome::Alert {
            message_key: "error_no_modules"
        }
    );
    assert_eq!(app.modal(), None);
}

#[test]
fn delete_all_modules_waits_for_confirmation() {
    let mut app = memory_app();
    add_module(&mut app, "Algebra", "16", "12", "2");

    run(&mut app, "delete-all-modules");
    assert_eq!(app.modal().map(Modal::kind), Some("confirm"));
    assert_eq!(app.state().modules.len(), 1);

    run(&mut app, "confirm-action");
    assert!(app.state().modules.is_empty());
    assert_eq!(app.modal(), None);
}

// =============================================================================
// calculation method flow
// =============================================================================

#[test]
fn method_switch_with_modules_can_be_cancelled() {
    let mut app = memory_app();
    add_module(&mut app, "Algebra", "16", "12", "2");

    run(&mut app, "set-method simple-0.5");
    run(&mut app, "close-modal");

    assert_eq!(app.state().calculation_method_id, "simple-0.6");
    assert_eq!(app.state().modules.len(), 1);
}

#[test]
fn confirmed_method_switch_discards_modules() {
    let mut app = memory_app();
    add_module(&mut app, "Algebra", "16", "12", "2");

    run(&mut app, "set-method complex-25-25-50");
    assert_eq!(app.modal().map(Modal::kind), Some("confirm"));

    run(&mut app, "confirm-action");

    assert_eq!(app.state().calculation_method_id, "complex-25-25-50");
    assert!(app.state().modules.is_empty());
}

#[test]
fn custom_method_is_added_without_being_selected() {
    let mut app = memory_app();
    run_all(
        &mut app,
        &[
            "open-custom-method-modal",
            "toggle-custom-component td",
            "update-custom-method-form td 30",
            "update-custom-method-form exam 70",
        ],
    );

    assert_eq!(run(&mut app, "save-custom-method"), Outcome::Render);

    let ids: Vec<_> = app
        .state()
        .custom_calculation_methods
        .iter()
        .map(|m| m.id.as_str())
        .collect();
    assert_eq!(ids, vec!["custom-30-0-70"]);
    assert_eq!(app.state().calculation_method_id, "simple-0.6");
    assert_eq!(app.modal(), None);
}

#[test]
fn custom_method_with_bad_sum_keeps_the_form_open() {
    let mut app = memory_app();
    run_all(
        &mut app,
        &[
            "open-custom-method-modal",
            "toggle-custom-component tp",
            "update-custom-method-form tp 30",
        ],
    );

    assert_eq!(
        run(&mut app, "save-custom-method"),
        Outcome::Alert {
            message_key: "error_weights_sum"
        }
    );
    assert_eq!(app.modal().map(Modal::kind), Some("custom-method"));
    assert!(app.state().custom_calculation_methods.is_empty());
}

#[test]
fn deleting_selected_custom_method_falls_back_to_default() {
    let mut app = memory_app();
    run_all(
        &mut app,
        &[
            "open-custom-method-modal",
            "toggle-custom-component td",
            "update-custom-method-form td 20",
            "update-custom-method-form exam 80",
            "save-custom-method",
            "set-method custom-20-0-80",
        ],
    );
    assert_eq!(app.state().calculation_method_id, "custom-20-0-80");

    run(&mut app, "delete-custom-method custom-20-0-80");

    assert_eq!(app.state().calculation_method_id, "simple-0.6");
    assert!(app.state().custom_calculation_methods.is_empty());
}

// =============================================================================
// annual flow
// =============================================================================

#[test]
fn annual_debt_then_fail_after_raising_required_credits() {
    let mut app = memory_app();
    run_all(
        &mut app,
        &[
            "set-lang en",
            "navigate annual-calculator",
            "handle-annual-input s1AvgText 9",
            "handle-annual-input s1CreditsText 20",
            "handle-annual-input s2AvgText 8",
            "handle-annual-input s2CreditsText 10",
        ],
    );

    run(&mut app, "calculate-annual");
    let Some(Modal::Result(payload)) = app.modal() else {
        panic!("expected a result modal, got {:?}", app.modal());
    };
    assert_eq!(payload.average, dec!(8.5));
    assert_eq!(payload.verdict, ResultVerdict::Status(AnnualStatus::Debt));
    assert!(screen(&app).nodes().contains(&&ViewNode::field("Status", "Passed with debt")));

    run_all(&mut app, &["close-modal", "set-credits 45", "calculate-annual"]);
    let Some(Modal::Result(payload)) = app.modal() else {
        panic!("expected a result modal, got {:?}", app.modal());
    };
    assert_eq!(payload.verdict, ResultVerdict::Status(AnnualStatus::Fail));
}

#[test]
fn annual_lock_is_visible_on_screen() {
    let mut app = memory_app();
    run(&mut app, "navigate annual-calculator");

    let outcome = run(&mut app, "handle-annual-input s2AvgText 13.5");

    assert_eq!(
        outcome,
        Outcome::Patch(vec![FieldPatch {
            field: AnnualField::S2Credits,
            value: "30".into(),
            locked: true,
        }])
    );
    let screen = screen(&app);
    assert!(matches!(
        screen.input(InputTarget::Annual(AnnualField::S2Credits)),
        Some(ViewNode::Input { locked: true, value, .. }) if value == "30"
    ));
    assert!(matches!(
        screen.input(InputTarget::Annual(AnnualField::S1Credits)),
        Some(ViewNode::Input { locked: false, .. })
    ));
}

#[test]
fn annual_without_averages_alerts() {
    let mut app = memory_app();
    run(&mut app, "handle-annual-input s1AvgText 12");

    assert_eq!(
        run(&mut app, "calculate-annual"),
        Outcome::Alert {
            message_key: "error_invalid_annual_values"
        }
    );
}

#[test]
fn clear_annual_empties_every_field() {
    let mut app = memory_app();
    run_all(
        &mut app,
        &[
            "handle-annual-input s1AvgText 12",
            "handle-annual-input s2AvgText 7",
            "clear-annual",
        ],
    );

    for field in AnnualField::ALL {
        assert_eq!(app.state().annual_text(field), "", "{}", field.as_str());
    }
}

// =============================================================================
// out-of-range input
// =============================================================================

#[test]
fn huge_annual_averages_alert_and_keep_the_session() {
    let mut app = memory_app();
    run_all(
        &mut app,
        &[
            "navigate annual-calculator",
            "handle-annual-input s1AvgText 5e28",
            "handle-annual-input s2AvgText 5e28",
        ],
    );

    assert_eq!(
        run(&mut app, "calculate-annual"),
        Outcome::Alert {
            message_key: "error_value_out_of_range"
        }
    );
    assert_eq!(app.modal(), None);

    run_all(&mut app, &["handle-annual-input s2AvgText 12", "handle-annual-input s1AvgText 14"]);
    assert_eq!(run(&mut app, "calculate-annual"), Outcome::Render);
    assert_eq!(app.modal().map(Modal::kind), Some("result"));
}

#[test]
fn huge_coefficient_alerts_on_semester_result() {
    let mut app = memory_app();
    add_module(&mut app, "Algebra", "20", "20", "1e28");
    add_module(&mut app, "Physics", "12", "12", "2");

    assert_eq!(
        run(&mut app, "calculate-semester"),
        Outcome::Alert {
            message_key: "error_value_out_of_range"
        }
    );
    assert_eq!(app.modal(), None);
    assert_eq!(app.state().modules.len(), 2);
}

#[test]
fn huge_custom_shares_are_refused() {
    let mut app = memory_app();
    run_all(
        &mut app,
        &[
            "open-custom-method-modal",
            "toggle-custom-component td",
            "toggle-custom-component tp",
            "update-custom-method-form td 5e28",
            "update-custom-method-form tp 5e28",
        ],
    );

    assert_eq!(
        run(&mut app, "save-custom-method"),
        Outcome::Alert {
            message_key: "error_weights_sum"
        }
    );
    assert_eq!(app.modal().map(Modal::kind), Some("custom-method"));
    assert!(app.state().custom_calculation_methods.is_empty());
}

// =============================================================================
// silent updates
// =============================================================================

#[test]
fn form_edits_change_neither_page_nor_modal() {
    let mut app = memory_app();
    run_all(&mut app, &["navigate semester-calculator", "open-module-modal"]);
    let before = app.modal().cloned();

    assert_eq!(run(&mut app, "update-module-form name Chemistry"), Outcome::Quiet);

    assert_eq!(app.page(), Page::SemesterCalculator);
    assert_eq!(app.modal().map(Modal::kind), before.as_ref().map(Modal::kind));
    let Some(Modal::Module(form)) = app.modal() else {
        panic!("module form closed");
    };
    assert_eq!(form.name, "Chemistry");
}

#[test]
fn form_edits_without_a_form_are_ignored() {
    let mut app = memory_app();

    assert_eq!(run(&mut app, "update-custom-method-form td 40"), Outcome::Quiet);
    assert_eq!(run(&mut app, "update-module-form name Ghost"), Outcome::Quiet);
    assert_eq!(app.modal(), None);
    assert_eq!(app.state(), &AppState::default());
}

// =============================================================================
// data and persistence
// =============================================================================

#[test]
fn clearing_all_data_resets_state_and_session() {
    let mut app = memory_app();
    run_all(&mut app, &["set-lang en", "set-theme dark", "navigate settings"]);
    add_module(&mut app, "Algebra", "16", "12", "2");

    run_all(&mut app, &["open-data-modal", "confirm-action"]);

    assert_eq!(app.state(), &AppState::default());
    assert_eq!(app.page(), Page::Main);
    assert_eq!(app.modal(), None);
}

#[test]
fn state_survives_a_restart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("gpa-state.json");

    {
        let mut app = file_app(&path);
        run_all(&mut app, &["set-lang fr", "set-theme light", "set-credits 45"]);
        add_module(&mut app, "Algebra", "16", "12", "2");
        run(&mut app, "handle-annual-input s1AvgText 11");
    }

    let app = file_app(&path);
    let state = app.state();
    assert_eq!(state.language, Language::Fr);
    assert_eq!(state.theme, Theme::Light);
    assert_eq!(state.required_credits_for_debt, 45);
    assert_eq!(state.modules.len(), 1);
    assert_eq!(state.modules[0].grade, dec!(14.40));
    assert_eq!(state.s1_credits_text, "30");
    assert_eq!(app.page(), Page::Main);
}

#[test]
fn module_with_every_mark_switched_off_reopens_switched_off() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("gpa-state.json");

    {
        let mut app = file_app(&path);
        run_all(
            &mut app,
            &["open-module-modal", "update-module-form name Seminar", "toggle-grade exam"],
        );
        assert_eq!(run(&mut app, "save-module"), Outcome::Render);
    }

    let mut app = file_app(&path);
    assert_eq!(app.state().modules[0].grade, dec!(0));
    let id = app.state().modules[0].id.clone();
    run(&mut app, &format!("open-module-modal {id}"));

    let Some(Modal::Module(form)) = app.modal() else {
        panic!("expected the module form, got {:?}", app.modal());
    };
    assert!(!form.components.exam_enabled);
    assert_eq!(form.components.exam_grade, "");
}

#[test]
fn disabled_saving_forgets_state_on_restart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("gpa-state.json");

    {
        let mut app = file_app(&path);
        run_all(&mut app, &["set-lang en", "toggle-save-settings"]);
    }

    let app = file_app(&path);
    assert_eq!(app.state().language, Language::default());
    assert!(!app.state().save_settings_enabled);
}

// =============================================================================
// rendering
// =============================================================================

#[test]
fn arabic_screens_are_right_to_left() {
    let mut app = memory_app();
    run(&mut app, "set-lang ar");

    assert_eq!(screen(&app).direction, Direction::Rtl);

    run(&mut app, "set-lang fr");
    assert_eq!(screen(&app).direction, Direction::Ltr);
}

#[test]
fn every_rendered_command_parses_back() {
    let mut app = memory_app();
    run(&mut app, "set-lang en");
    add_module(&mut app, "Linear Algebra", "16", "12", "2");

    for page in ["main", "semester-calculator", "annual-calculator", "settings"] {
        run(&mut app, &format!("navigate {page}"));
        for command in screen(&app).commands() {
            let text = command.to_string();
            assert_eq!(&text.parse::<Command>().unwrap(), command, "{text}");
        }
    }
}

#[test]
fn semester_screen_lists_module_actions() {
    let mut app = memory_app();
    run_all(&mut app, &["set-lang en", "navigate semester-calculator"]);
    add_module(&mut app, "Algebra", "16", "12", "2");
    let id = app.state().modules[0].id.clone();

    let screen = screen(&app);
    let commands = screen.commands();

    assert!(commands.contains(&&Command::OpenModuleModal(Some(id.clone()))));
    assert!(commands.contains(&&Command::DeleteModule(id)));
    assert!(screen.to_string().starts_with("== Semester GPA ==  [en ltr light]\n"));
}
