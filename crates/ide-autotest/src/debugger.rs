//! Driving a debug run from breakpoint to breakpoint.
//!
//! The IDE exposes its debugger state only through the toolbar's status label,
//! so the session is followed by polling that label: wait for a stop, check
//! where we are, press Continue, wait for "Running.", repeat.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::breakpoints::Breakpoint;
use crate::editor::{get_editor_for_file_suffix, line_number_with_cursor};
use crate::errors::HarnessError;
use crate::names;
use crate::status::{DebuggerStatus, FINISHED_TEXT, RUNNING_TEXT};
use crate::types::{HostOs, Kit, ProjectSettings, Property, View};
use crate::utils::{basename, normalize};
use crate::{Element, Ide, UI_CHANGED};

pub const SYMBOL_SERVER_NOT_CONFIGURED: &str = "<html><head/><body><p>The debugger is not configured to use the public \
Microsoft Symbol Server.<br/>This is recommended for retrieval of the symbols of the operating system libraries.</p>\
<p><span style=\" font-style:italic;\">Note:</span> It is recommended, that if you use the Microsoft Symbol Server, \
to also use a local symbol cache.<br/>A fast internet connection is required for this to work smoothly,<br/>\
and a delay might occur when connecting for the first time and caching the symbols.</p>\
<p>What would you like to set up?</p></body></html>";

pub const NOT_A_DEBUG_BUILD: &str = "This does not seem to be a \"Debug\" build.\n\
Setting breakpoints by file name and line number may fail.";

pub const DEBUGGING_FINISHED: &str = "Debugging has finished";

const CDB_EXTENSION_MISSING: &str =
    r"lib\qtcreatorcdbext64\qtcreatorcdbext.dll cannot be found.";

static KIT_COMPILER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"<dt style="font-weight:bold">Compiler:</dt><dd>(?P<compiler>.+)</dd><dt style="font-weight:bold">Debugger:"#,
    )
    .expect("valid regex")
});

/// Run the configured project under the debugger and follow it through
/// `expected_stops`.
///
/// `expected_stops` lists the locations the debuggee should stop at, in
/// order; the output of [`crate::set_breakpoints_for_current_project`] fits
/// here when the breakpoints were passed in hit order. Each expected stop
/// costs exactly one Continue. Mismatches are recorded in the report and the
/// loop goes on.
///
/// Returns whether the IDE ended up back in its normal (not debugging) state.
#[instrument(skip(ide, kit, expected_stops), fields(kit = %kit, stops = expected_stops.len()))]
pub async fn do_simple_debugging(
    ide: &Ide,
    kit: &Kit,
    config_name: &str,
    expected_stops: &[Breakpoint],
    enable_qml: bool,
) -> Result<bool, HarnessError> {
    match run_session(ide, kit, config_name, expected_stops, enable_qml).await {
        Err(e) if e.is_lookup_failure() => {
            ide.report().fatal(&format!("{UI_CHANGED} ({e})"));
            Ok(false)
        }
        other => other,
    }
}

async fn run_session(
    ide: &Ide,
    kit: &Kit,
    config_name: &str,
    expected_stops: &[Breakpoint],
    enable_qml: bool,
) -> Result<bool, HarnessError> {
    let timeouts = &ide.config().timeouts;

    ide.switch_view_to(View::Projects).await?;
    ide.switch_to_build_or_run_settings_for(kit, ProjectSettings::Run)
        .await?;
    ide.select_from_combo(
        names::ENABLE_QML_DEBUGGER_COMBO,
        if enable_qml { "Enable" } else { "Disable" },
    )
    .await?;
    ide.switch_view_to(View::Edit).await?;

    if !start_debugger(ide, kit, config_name).await? {
        return Ok(false);
    }

    let status_label = ide.locator(names::STATUS_LABEL).element();
    ide.report().log(&format!(
        "Continuing debugging {} times...",
        expected_stops.len()
    ));
    for expected in expected_stops {
        let stop = ide
            .wait_for_property(
                &status_label,
                Property::Text,
                ide.timeout(timeouts.stop_ms),
                |text| DebuggerStatus::parse(&normalize(text)).is_stopped(),
            )
            .await;
        if stop.is_satisfied() {
            match verify_breakpoint(ide, expected).await {
                Ok(_) => {}
                Err(e) if e.is_lookup_failure() => {
                    ide.report().fatal(&format!("{UI_CHANGED} ({e})"));
                }
                Err(e) => return Err(e),
            }
        } else {
            ide.report()
                .fail(&stop.into_last().unwrap_or_default());
        }

        match ide
            .try_wait_for_object(
                names::CONTINUE_BUTTON,
                Some(ide.timeout(timeouts.continue_button_ms)),
            )
            .await?
        {
            Some(continue_button) => {
                ide.report().log("Continuing...");
                continue_button.click().await?;
            }
            None => ide.report().fail("Debugger did not stop at breakpoint"),
        }
        ide.wait_for_property(
            &status_label,
            Property::Text,
            ide.timeout(timeouts.running_ms),
            |text| DebuggerStatus::parse(&normalize(text)) == DebuggerStatus::Running,
        )
        .await;
    }

    let terminal = ide
        .wait_for_property(
            &status_label,
            Property::Text,
            ide.timeout(timeouts.terminal_ms),
            |text| DebuggerStatus::parse(&normalize(text)).is_terminal(),
        )
        .await;
    if !terminal.is_satisfied() {
        ide.report().log_detail(
            &format!("Waiting for '{RUNNING_TEXT}' / '{FINISHED_TEXT}' timed out."),
            &format!(
                "Debugger is in state: '{}'...",
                terminal.into_last().unwrap_or_default()
            ),
        );
    }

    let current = match status_label.text().await {
        Ok(text) => DebuggerStatus::parse(&normalize(&text)),
        Err(e) if e.is_lookup_failure() => DebuggerStatus::Other(String::new()),
        Err(e) => return Err(e),
    };
    match current {
        DebuggerStatus::Running => {
            ide.report()
                .log("Debugger is still running... Will be stopped.");
            stop_debugger(ide).await
        }
        DebuggerStatus::Finished => {
            ide.report().log("Debugger has finished.");
            log_debug_result(ide).await
        }
        _ => {
            ide.report().log("Trying to stop debugger...");
            match stop_debugger(ide).await {
                Ok(result) => Ok(result),
                Err(e) if e.is_lookup_failure() => {
                    // debugger had already stopped
                    info!("Stopping the debugger failed: {}", e);
                    Ok(true)
                }
                Err(e) => Err(e),
            }
        }
    }
}

/// Click Start Debugging, deal with start-up dialogs and wait for the debugger.
///
/// Returns false (after reporting why) when the debugger did not come up.
#[instrument(skip(ide))]
pub async fn start_debugger(ide: &Ide, kit: &Kit, config_name: &str) -> Result<bool, HarnessError> {
    let timeouts = &ide.config().timeouts;
    let is_msvc_build = is_msvc_config(ide, kit).await?;
    ide.click_button(names::START_DEBUGGING_BUTTON).await?;
    handle_debugger_warnings(ide, config_name, is_msvc_build).await?;

    if let Some(message_box) = ide
        .try_wait_for_object(
            names::FAILED_TO_START_BOX,
            Some(ide.timeout(timeouts.start_failure_box_ms)),
        )
        .await?
    {
        let text = message_box.text().await.unwrap_or_default();
        let informative = message_box.informative_text().await.unwrap_or_default();
        ide.click_button(names::DEBUG_MODE_OK).await?;
        ide.report()
            .fail("Debugger hasn't started... QMessageBox appeared!");
        ide.report().log_detail(
            &format!("QMessageBox content: '{text}'"),
            &format!("'{informative}'"),
        );
        return Ok(false);
    }

    let started = ide
        .check_if_object_exists(
            names::TOOLBAR_CONTINUE,
            true,
            ide.timeout(timeouts.debugger_start_ms),
        )
        .await;
    if !ide.report().verify(started, "Verify start of debugger") {
        if config_name.contains("MSVC") {
            let debugger_log = take_debugger_log(ide).await?;
            if debugger_log.contains(CDB_EXTENSION_MISSING) {
                ide.report()
                    .fatal(r"qtcreatorcdbext.dll is missing in lib\qtcreatorcdbext64");
            } else {
                ide.report()
                    .fatal("Debugger log did not behave as expected. Please check manually.");
            }
        }
        ide.log_application_output().await?;
        return Ok(false);
    }

    let button_wait = Some(ide.timeout(timeouts.continue_button_ms));
    if ide
        .try_wait_for_object(names::INTERRUPT_BUTTON, button_wait)
        .await?
        .is_some()
    {
        ide.report().passes("'Interrupt' (debugger) button visible.");
    } else if ide
        .try_wait_for_object(names::CONTINUE_BUTTON, button_wait)
        .await?
        .is_some()
    {
        ide.report().passes("'Continue' (debugger) button visible.");
    } else {
        ide.report()
            .fatal("Neither 'Interrupt' nor 'Continue' button visible (Debugger).");
    }
    Ok(true)
}

/// Exit the debugger and wait for the application output to confirm it.
pub async fn stop_debugger(ide: &Ide) -> Result<bool, HarnessError> {
    ide.click_button(names::EXIT_DEBUGGER).await?;
    ide.ensure_checked(names::APP_OUTPUT_TOGGLE, true).await?;
    let output = ide
        .wait_for_object(names::APP_OUTPUT_WINDOW, None)
        .await?;
    ide.wait_for_property(
        &output,
        Property::PlainText,
        ide.timeout(ide.config().timeouts.finish_output_ms),
        |text| text.contains(DEBUGGING_FINISHED),
    )
    .await;
    log_debug_result(ide).await
}

/// Check that the IDE is back in its normal state, i.e. Start Debugging is offered again.
pub async fn log_debug_result(ide: &Ide) -> Result<bool, HarnessError> {
    let visible = ide
        .try_wait_for_object(names::START_DEBUGGING_BUTTON, None)
        .await?
        .is_some();
    if visible {
        ide.report().passes("'Start Debugging' button visible.");
        ide.report()
            .passes("Debugger stopped.. IDE is back at normal state.");
    } else {
        ide.report().fail("'Start Debugging' button is not visible.");
        ide.report().fail("Debugger seems to have not stopped...");
        ide.log_application_output().await?;
    }
    Ok(visible)
}

/// Compare the location the debugger stopped at with `expected`.
pub async fn verify_breakpoint(ide: &Ide, expected: &Breakpoint) -> Result<bool, HarnessError> {
    let Some(editor) = get_editor_for_file_suffix(ide, &expected.file).await? else {
        ide.report()
            .fail(&format!("No editor for {} is visible", expected.file));
        return Ok(false);
    };
    let opened = ide
        .wait_for_object(names::DEBUG_MODE_COMBO, None)
        .await?
        .tool_tip()
        .await?;
    ide.report().compare(
        opened.as_str(),
        expected.file.as_str(),
        "Verify that the right file is opened",
    );
    let line = line_number_with_cursor(&editor).await?;
    let window_title = ide
        .wait_for_object(names::MAIN_WINDOW, None)
        .await?
        .window_title()
        .await?;
    ide.report().verify(
        window_title.starts_with(&format!("{} ", basename(&expected.file))),
        "Verify that the window title changed according to current file",
    );
    Ok(ide.report().compare(
        line,
        expected.line,
        &format!(
            "Compare hit breakpoint to expected line number in {}",
            expected.file
        ),
    ))
}

/// Dismiss the dialogs the IDE may show while the debugger starts.
///
/// On MSVC kits a dialog proposes configuring the Microsoft Symbol Server; for
/// release configurations (without debug information) on MSVC or Linux a
/// warning says breakpoints may not bind.
pub async fn handle_debugger_warnings(
    ide: &Ide,
    config_name: &str,
    is_msvc_build: bool,
) -> Result<(), HarnessError> {
    let dialog_wait = Some(ide.timeout(ide.config().timeouts.warning_dialog_ms));
    if is_msvc_build {
        if let Some(popup) = ide
            .try_wait_for_object(names::SYMBOL_PATHS_LABEL, dialog_wait)
            .await?
        {
            let text = popup.text().await?;
            if text == SYMBOL_SERVER_NOT_CONFIGURED {
                ide.report().log(
                    "IDE warned about the debugger not being configured to use the public Microsoft Symbol Server.",
                );
            } else {
                ide.report()
                    .warning(&format!("IDE showed an unexpected warning: {text}"));
            }
            ide.click_button(names::SYMBOL_PATHS_CANCEL).await?;
        }
    }

    let is_release_config =
        config_name.contains("Release") && !config_name.contains("with Debug Information");
    if is_release_config && (is_msvc_build || ide.config().host_os == HostOs::Linux) {
        let Some(message) = ide
            .try_wait_for_object(names::warning_label(), None)
            .await?
        else {
            ide.report()
                .fatal("Expected a warning about debugging a release build.");
            return Ok(());
        };
        let message_text = message.text().await?;
        ide.report().verify(
            message_text.starts_with(NOT_A_DEBUG_BUILD),
            &format!("Got warning: {message_text}"),
        );
        ide.click_button(names::warning_ok()).await?;
    }
    Ok(())
}

/// Read the global debugger log, then clear and close it.
pub async fn take_debugger_log(ide: &Ide) -> Result<String, HarnessError> {
    ide.invoke_menu_item(&["View", "Views", "Global Debugger Log"])
        .await?;
    let log_window = ide.wait_for_object(names::DEBUGGER_LOG, None).await?;
    let debugger_log = log_window.plain_text().await?;
    log_window.click().await?;
    log_window.invoke_context_menu_item("Clear Contents").await?;
    ide.wait_for_property(
        &log_window,
        Property::PlainText,
        ide.timeout(ide.config().timeouts.log_clear_ms),
        str::is_empty,
    )
    .await;
    ide.invoke_menu_item(&["View", "Views", "Global Debugger Log"])
        .await?;
    Ok(debugger_log)
}

/// Whether `kit` builds with the MSVC toolchain. Always false off Windows.
///
/// Fails with [`HarnessError::InvalidArgument`] when the kit is not activated
/// for the project.
pub async fn is_msvc_config(ide: &Ide, kit: &Kit) -> Result<bool, HarnessError> {
    if ide.config().host_os != HostOs::Windows {
        return Ok(false);
    }
    ide.switch_to_build_or_run_settings_for(kit, ProjectSettings::Build)
        .await?;

    let kit_index: Element = ide
        .locator(names::PROJECT_NAVIGATION_TREE)
        .item(&kit.name)
        .wait(None)
        .await?;
    let activated = kit_index.enabled().await?;
    if !ide
        .report()
        .verify(activated, &format!("Verifying target '{kit}' is enabled."))
    {
        return Err(HarnessError::InvalidArgument(format!(
            "Kit '{kit}' is not activated in the project."
        )));
    }

    let tool_tip = kit_index.tool_tip().await?;
    let Some(caps) = KIT_COMPILER.captures(&tool_tip) else {
        warn!("No compiler in kit tool tip: {}", tool_tip);
        ide.report()
            .warning("UI seems to have changed - failed to check for compiler.");
        return Ok(false);
    };
    let compiler = &caps["compiler"];
    let is_msvc = compiler.starts_with("MSVC") || compiler.starts_with("Microsoft Visual C");
    ide.switch_view_to(View::Edit).await?;
    Ok(is_msvc)
}
