//! Full debug sessions against the simulated IDE

use std::collections::BTreeMap;
use std::sync::Arc;

use ide_autotest::debugger::SYMBOL_SERVER_NOT_CONFIGURED;
use ide_autotest::names;
use ide_autotest::results::write_results;
use ide_autotest::sim::{SimKit, SimSetup, SimulatedIde};
use ide_autotest::{
    do_simple_debugging, set_breakpoints_for_current_project, Breakpoint, DriverConfig, Harness,
    HarnessError, HostOs, Ide, Kit, ObjectName, Outcome, Property, UI_CHANGED,
};

const COMPARE_LINE: &str = "Compare hit breakpoint to expected line number";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("ide_autotest=debug")
        .with_test_writer()
        .try_init();
}

fn setup() -> SimSetup {
    SimSetup {
        project: "untitled".to_string(),
        project_dir: "/work/untitled".to_string(),
        files: BTreeMap::from([("main.cpp".to_string(), 40)]),
        trace: vec![
            Breakpoint::new("main.cpp", 8),
            Breakpoint::new("main.cpp", 10),
            Breakpoint::new("main.cpp", 12),
            Breakpoint::new("main.cpp", 15),
            Breakpoint::new("main.cpp", 20),
        ],
        ..SimSetup::default()
    }
}

fn start(setup: SimSetup, host_os: HostOs) -> (Arc<SimulatedIde>, Ide) {
    init_tracing();
    let sim = Arc::new(SimulatedIde::new(setup));
    let ide = Ide::new(sim.clone(), config(host_os));
    (sim, ide)
}

fn config(host_os: HostOs) -> DriverConfig {
    DriverConfig {
        host_os,
        ..DriverConfig::default()
    }
}

/// Simulated IDE whose reads of one widget property fail with a fixed error.
struct FailingProperty {
    inner: Arc<SimulatedIde>,
    object: ObjectName,
    property: Property,
    error: HarnessError,
}

#[async_trait::async_trait]
impl Harness for FailingProperty {
    async fn exists(&self, object: &ObjectName) -> Result<bool, HarnessError> {
        self.inner.exists(object).await
    }

    async fn property(&self, object: &ObjectName, property: Property) -> Result<String, HarnessError> {
        if *object == self.object && property == self.property {
            return Err(self.error.clone());
        }
        self.inner.property(object, property).await
    }

    async fn row_count(&self, object: &ObjectName) -> Result<usize, HarnessError> {
        self.inner.row_count(object).await
    }

    async fn click(&self, object: &ObjectName) -> Result<(), HarnessError> {
        self.inner.click(object).await
    }

    async fn click_row(&self, object: &ObjectName, row: usize) -> Result<(), HarnessError> {
        self.inner.click_row(object, row).await
    }

    async fn type_keys(&self, object: &ObjectName, keys: &str) -> Result<(), HarnessError> {
        self.inner.type_keys(object, keys).await
    }

    async fn activate_menu_item(&self, path: &[String]) -> Result<(), HarnessError> {
        self.inner.activate_menu_item(path).await
    }

    async fn invoke_context_menu_item(
        &self,
        object: &ObjectName,
        item: &str,
    ) -> Result<(), HarnessError> {
        self.inner.invoke_context_menu_item(object, item).await
    }
}

fn start_failing(
    setup: SimSetup,
    object: &str,
    property: Property,
    error: HarnessError,
) -> (Arc<SimulatedIde>, Ide) {
    init_tracing();
    let sim = Arc::new(SimulatedIde::new(setup));
    let harness = Arc::new(FailingProperty {
        inner: sim.clone(),
        object: ObjectName::from(object),
        property,
        error,
    });
    (sim, Ide::new(harness, config(HostOs::Linux)))
}

async fn set(ide: &Ide, lines: &[u32]) -> Vec<Breakpoint> {
    let requested: Vec<Breakpoint> = lines
        .iter()
        .map(|&line| Breakpoint::new("main.cpp", line))
        .collect();
    set_breakpoints_for_current_project(ide, &requested)
        .await
        .expect("harness should stay connected")
        .expect("breakpoints should be set")
}

#[tokio::test(start_paused = true)]
async fn stops_at_each_breakpoint_in_order() {
    let (sim, ide) = start(setup(), HostOs::Linux);
    let expected = set(&ide, &[10, 15]).await;

    let back_to_normal = do_simple_debugging(&ide, &Kit::new("Desktop"), "Debug", &expected, true)
        .await
        .expect("harness should stay connected");

    assert!(back_to_normal);
    assert_eq!(sim.continues(), 2);
    assert_eq!(sim.qml_debugging(), "Enable");
    assert!(sim.is_idle());
    assert_eq!(ide.report().find(Outcome::Pass, COMPARE_LINE).len(), 2);
    assert_eq!(
        ide.report()
            .find(Outcome::Pass, "Verify that the right file is opened")
            .len(),
        2
    );
    assert_eq!(ide.report().find(Outcome::Log, "Debugger has finished.").len(), 1);
    let summary = ide.report().summary();
    assert!(summary.succeeded(), "unexpected failures: {:?}", ide.report().entries());
}

#[tokio::test(start_paused = true)]
async fn wrong_stop_is_a_failure_but_the_loop_goes_on() {
    let (sim, ide) = start(setup(), HostOs::Linux);
    let mut expected = set(&ide, &[10, 15]).await;
    expected[0].line = 11;

    do_simple_debugging(&ide, &Kit::new("Desktop"), "Debug", &expected, false)
        .await
        .expect("harness should stay connected");

    assert_eq!(sim.continues(), 2);
    assert_eq!(sim.qml_debugging(), "Disable");
    let fails = ide.report().find(Outcome::Fail, COMPARE_LINE);
    assert_eq!(fails.len(), 1);
    let detail = fails[0].detail.clone().unwrap_or_default();
    assert!(detail.contains("10") && detail.contains("11"), "{detail}");
    assert_eq!(ide.report().find(Outcome::Pass, COMPARE_LINE).len(), 1);
    assert_eq!(ide.report().summary().fails, 1);
}

#[tokio::test(start_paused = true)]
async fn no_expected_stops_means_no_continues() {
    let (sim, ide) = start(setup(), HostOs::Linux);

    let back_to_normal = do_simple_debugging(&ide, &Kit::new("Desktop"), "Debug", &[], true)
        .await
        .expect("harness should stay connected");

    assert!(back_to_normal);
    assert_eq!(sim.continues(), 0);
    assert_eq!(
        ide.report().find(Outcome::Log, "Continuing debugging 0 times...").len(),
        1
    );
}

#[tokio::test(start_paused = true)]
async fn missed_stop_does_not_continue_more_than_expected() {
    let (sim, ide) = start(setup(), HostOs::Linux);
    let mut expected = set(&ide, &[10]).await;
    // only one breakpoint exists, the second expected stop never happens
    expected.push(Breakpoint::new("/work/untitled/main.cpp", 30));

    do_simple_debugging(&ide, &Kit::new("Desktop"), "Debug", &expected, true)
        .await
        .expect("harness should stay connected");

    assert_eq!(sim.continues(), 1);
    assert_eq!(
        ide.report()
            .find(Outcome::Fail, "Debugger did not stop at breakpoint")
            .len(),
        1
    );
    assert!(sim.is_idle());
}

#[tokio::test(start_paused = true)]
async fn still_running_debuggee_is_stopped() {
    let (sim, ide) = start(
        SimSetup {
            finishes: false,
            ..setup()
        },
        HostOs::Linux,
    );
    let expected = set(&ide, &[12]).await;

    let back_to_normal = do_simple_debugging(&ide, &Kit::new("Desktop"), "Debug", &expected, true)
        .await
        .expect("harness should stay connected");

    assert!(back_to_normal);
    assert_eq!(sim.continues(), 1);
    assert_eq!(
        ide.report()
            .find(Outcome::Log, "Debugger is still running... Will be stopped.")
            .len(),
        1
    );
    assert!(sim.application_output().contains("Debugging has finished"));
    assert!(ide.report().summary().succeeded());
}

#[tokio::test(start_paused = true)]
async fn unreadable_stop_location_still_continues_and_stops() {
    let (sim, ide) = start_failing(
        setup(),
        names::DEBUG_MODE_COMBO,
        Property::ToolTip,
        HarnessError::PropertyUnavailable {
            object: names::DEBUG_MODE_COMBO.to_string(),
            property: "toolTip".to_string(),
        },
    );
    let expected = set(&ide, &[10, 15]).await;

    let back_to_normal = do_simple_debugging(&ide, &Kit::new("Desktop"), "Debug", &expected, true)
        .await
        .expect("lookup failures are reported, not returned");

    assert!(back_to_normal);
    assert_eq!(sim.continues(), 2);
    assert!(sim.is_idle());
    let fatals = ide.report().find(Outcome::Fatal, UI_CHANGED);
    assert_eq!(fatals.len(), 2);
    assert!(fatals[0].message.contains("toolTip"), "{}", fatals[0].message);
    assert_eq!(ide.report().find(Outcome::Log, "Debugger has finished.").len(), 1);
}

#[tokio::test(start_paused = true)]
async fn broken_harness_on_final_status_read_is_an_error() {
    let (_sim, ide) = start_failing(
        setup(),
        names::STATUS_LABEL,
        Property::Text,
        HarnessError::Disconnected("connection reset".to_string()),
    );

    let result = do_simple_debugging(&ide, &Kit::new("Desktop"), "Debug", &[], true).await;

    assert!(matches!(result, Err(HarnessError::Disconnected(_))), "{result:?}");
}

#[tokio::test(start_paused = true)]
async fn unexpected_extra_stop_times_out_and_is_stopped() {
    let (sim, ide) = start(setup(), HostOs::Linux);
    let set = set(&ide, &[10, 15]).await;

    let back_to_normal = do_simple_debugging(&ide, &Kit::new("Desktop"), "Debug", &set[..1], true)
        .await
        .expect("harness should stay connected");

    assert!(back_to_normal);
    assert_eq!(sim.continues(), 1);
    assert!(sim.is_idle());
    let timed_out = ide.report().find(Outcome::Log, "timed out");
    assert_eq!(timed_out.len(), 1);
    let detail = timed_out[0].detail.clone().unwrap_or_default();
    assert!(
        detail.starts_with("Debugger is in state: 'Stopped at breakpoint 2 in thread 1."),
        "{detail}"
    );
    assert_eq!(ide.report().find(Outcome::Log, "Trying to stop debugger...").len(), 1);
    assert!(ide.report().summary().succeeded());
}

#[tokio::test(start_paused = true)]
async fn start_failure_box_ends_the_session() {
    let (sim, ide) = start(
        SimSetup {
            fails_to_start: true,
            ..setup()
        },
        HostOs::Linux,
    );
    let expected = set(&ide, &[10]).await;

    let back_to_normal = do_simple_debugging(&ide, &Kit::new("Desktop"), "Debug", &expected, true)
        .await
        .expect("harness should stay connected");

    assert!(!back_to_normal);
    assert_eq!(sim.continues(), 0);
    assert_eq!(
        ide.report()
            .find(Outcome::Fail, "Debugger hasn't started... QMessageBox appeared!")
            .len(),
        1
    );
    assert_eq!(ide.report().find(Outcome::Log, "QMessageBox content").len(), 1);
}

#[tokio::test(start_paused = true)]
async fn release_build_warning_is_checked_on_linux() {
    let (_sim, ide) = start(
        SimSetup {
            release_warning: true,
            ..setup()
        },
        HostOs::Linux,
    );
    let expected = set(&ide, &[10]).await;

    let back_to_normal = do_simple_debugging(&ide, &Kit::new("Desktop"), "Release", &expected, true)
        .await
        .expect("harness should stay connected");

    assert!(back_to_normal);
    assert_eq!(ide.report().find(Outcome::Pass, "Got warning:").len(), 1);
    assert!(ide.report().summary().succeeded());
}

#[tokio::test(start_paused = true)]
async fn msvc_kits_get_the_symbol_server_dialog() {
    let (_sim, ide) = start(
        SimSetup {
            kits: vec![SimKit {
                name: "Desktop MSVC2019 64bit".to_string(),
                compiler: "Microsoft Visual C++ Compiler 16.11 (amd64)".to_string(),
                enabled: true,
            }],
            symbol_server_dialog: Some(SYMBOL_SERVER_NOT_CONFIGURED.to_string()),
            ..setup()
        },
        HostOs::Windows,
    );
    let expected = set(&ide, &[10]).await;

    let back_to_normal = do_simple_debugging(
        &ide,
        &Kit::new("Desktop MSVC2019 64bit"),
        "Debug",
        &expected,
        true,
    )
    .await
    .expect("harness should stay connected");

    assert!(back_to_normal);
    assert_eq!(
        ide.report()
            .find(Outcome::Log, "public Microsoft Symbol Server")
            .len(),
        1
    );
    assert!(ide.report().summary().succeeded());
}

#[tokio::test(start_paused = true)]
async fn deactivated_kit_is_an_error() {
    let (_sim, ide) = start(
        SimSetup {
            kits: vec![SimKit {
                enabled: false,
                ..SimKit::new("Desktop")
            }],
            ..setup()
        },
        HostOs::Windows,
    );

    let result = do_simple_debugging(&ide, &Kit::new("Desktop"), "Debug", &[], true).await;
    assert!(matches!(result, Err(HarnessError::InvalidArgument(_))));
}

#[tokio::test(start_paused = true)]
async fn missing_cdb_extension_is_fatal() {
    let (sim, ide) = start(
        SimSetup {
            hangs_on_start: true,
            debugger_log: r"dNOTE: lib\qtcreatorcdbext64\qtcreatorcdbext.dll cannot be found.".to_string(),
            ..setup()
        },
        HostOs::Linux,
    );

    let back_to_normal =
        do_simple_debugging(&ide, &Kit::new("Desktop"), "Debug MSVC2019", &[], true)
            .await
            .expect("harness should stay connected");

    assert!(!back_to_normal);
    assert_eq!(
        ide.report()
            .find(Outcome::Fail, "Verify start of debugger")
            .len(),
        1
    );
    assert_eq!(
        ide.report()
            .find(Outcome::Fatal, "qtcreatorcdbext.dll is missing")
            .len(),
        1
    );
    assert!(sim.debugger_log().is_empty(), "log should have been cleared");
}

#[tokio::test(start_paused = true)]
async fn unknown_kit_is_reported_as_ui_change() {
    let (_sim, ide) = start(setup(), HostOs::Linux);
    let back_to_normal = do_simple_debugging(&ide, &Kit::new("Android"), "Debug", &[], true)
        .await
        .expect("lookup failures are reported, not returned");
    assert!(!back_to_normal);
    assert_eq!(ide.report().find(Outcome::Fatal, UI_CHANGED).len(), 1);
}

#[tokio::test(start_paused = true)]
async fn session_results_are_written() {
    let (_sim, ide) = start(setup(), HostOs::Linux);
    let expected = set(&ide, &[8, 20]).await;
    do_simple_debugging(&ide, &Kit::new("Desktop"), "Debug", &expected, true)
        .await
        .expect("harness should stay connected");

    let dir = tempfile::tempdir().expect("temp dir");
    let written = write_results(ide.report(), dir.path(), "suite_debugger", "tst_simple_debug")
        .expect("Should write")
        .expect("folder exists");
    let srf = std::fs::read_to_string(written).expect("Should read summary");
    assert!(srf.starts_with("suite:suite_debugger\n"));
    assert!(srf.contains("fails:0\n"));
    assert!(srf.contains("fatals:0\n"));
    assert!(dir.path().join("tst_simple_debug.json").is_file());
}
