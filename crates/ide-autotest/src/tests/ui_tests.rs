//! Widget helpers against the simulated IDE

use std::sync::Arc;

use crate::names;
use crate::report::Outcome;
use crate::sim::{SimSetup, SimulatedIde};
use crate::types::{Kit, ProjectSettings, View};
use crate::{DriverConfig, Ide};

fn ide() -> (Arc<SimulatedIde>, Ide) {
    let sim = Arc::new(SimulatedIde::new(SimSetup::default()));
    let ide = Ide::new(sim.clone(), DriverConfig::default());
    (sim, ide)
}

#[tokio::test(start_paused = true)]
async fn switching_views_clicks_the_mode_tab() {
    let (sim, ide) = ide();
    ide.switch_view_to(View::Debug).await.expect("Should switch");
    assert_eq!(sim.current_view(), "Debug");
    ide.switch_view_to(View::Edit).await.expect("Should switch");
    assert_eq!(sim.current_view(), "Edit");
}

#[tokio::test(start_paused = true)]
async fn ensure_checked_only_clicks_when_needed() {
    let (_sim, ide) = ide();
    let toggle = ide
        .ensure_checked(names::APP_OUTPUT_TOGGLE, true)
        .await
        .expect("Should check");
    assert_eq!(toggle.checked().await, Ok(true));

    ide.ensure_checked(names::APP_OUTPUT_TOGGLE, true)
        .await
        .expect("Should stay checked");
    assert_eq!(toggle.checked().await, Ok(true));

    ide.ensure_checked(names::APP_OUTPUT_TOGGLE, false)
        .await
        .expect("Should uncheck");
    assert_eq!(toggle.checked().await, Ok(false));

    assert_eq!(ide.report().find(Outcome::Pass, "Checked state").len(), 3);
    assert_eq!(
        ide.report()
            .find(Outcome::Log, &format!("New state for {}: unchecked", names::APP_OUTPUT_TOGGLE))
            .len(),
        1
    );
}

#[tokio::test(start_paused = true)]
async fn combo_selection_reports_whether_it_changed() {
    let (sim, ide) = ide();
    ide.switch_to_build_or_run_settings_for(&Kit::new("Desktop"), ProjectSettings::Run)
        .await
        .expect("Should open run settings");

    let changed = ide
        .select_from_combo(names::ENABLE_QML_DEBUGGER_COMBO, "Disable")
        .await
        .expect("Should select");
    assert!(changed);
    assert_eq!(sim.qml_debugging(), "Disable");

    let changed = ide
        .select_from_combo(names::ENABLE_QML_DEBUGGER_COMBO, "Disable")
        .await
        .expect("Should select");
    assert!(!changed);
    assert!(ide.report().summary().succeeded());
}

#[tokio::test(start_paused = true)]
async fn unknown_kits_are_lookup_failures() {
    let (_sim, ide) = ide();
    let err = ide
        .switch_to_build_or_run_settings_for(&Kit::new("Android"), ProjectSettings::Build)
        .await
        .expect_err("kit is not configured");
    assert!(err.is_lookup_failure());
}

#[tokio::test(start_paused = true)]
async fn application_output_is_logged() {
    let (_sim, ide) = ide();
    let output = ide
        .log_application_output()
        .await
        .expect("Should read output");
    assert_eq!(output.as_deref(), Some(""));
    assert_eq!(ide.report().find(Outcome::Log, "Application Output:").len(), 1);
}

#[tokio::test(start_paused = true)]
async fn locator_opens_documents() {
    let (_sim, ide) = ide();
    ide.select_from_locator("main.cpp")
        .await
        .expect("Should type into locator");
    let title = ide
        .wait_for_object(names::MAIN_WINDOW, None)
        .await
        .expect("main window")
        .window_title()
        .await
        .expect("Should read title");
    assert!(title.starts_with("main.cpp "));
}
