//! In-memory IDE that answers to the same object names as the real one.
//!
//! Used by the tests and by the CLI's rehearsal runs. The model covers what
//! the breakpoint and debugger helpers touch: a project with a few files, the
//! locator, the editor cursor, the Breakpoints view, the Projects mode with its
//! kits, and a debugger that walks an execution trace and stops wherever a
//! breakpoint is set.
//!
//! The debugger only moves when the status label is read. Every resume shows
//! `Running.` for one read before the next stop is reported, so a driver that
//! polls the label always observes the intermediate state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use crate::breakpoints::Breakpoint;
use crate::debugger::{DEBUGGING_FINISHED, NOT_A_DEBUG_BUILD};
use crate::editor::editor_for_file_suffix;
use crate::errors::HarnessError;
use crate::harness::Harness;
use crate::names;
use crate::object_name::ObjectName;
use crate::status::{FINISHED_TEXT, RUNNING_TEXT};
use crate::types::Property;
use crate::utils::basename;

/// A kit configured for the simulated project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimKit {
    pub name: String,
    #[serde(default = "default_compiler")]
    pub compiler: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl SimKit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            compiler: default_compiler(),
            enabled: true,
        }
    }

    /// Tool tip of the kit's entry in the project tree.
    pub fn tool_tip(&self) -> String {
        format!(
            "<html><body><h3>{}</h3><dl>\
             <dt style=\"font-weight:bold\">Compiler:</dt><dd>{}</dd>\
             <dt style=\"font-weight:bold\">Debugger:</dt><dd>System GDB</dd>\
             </dl></body></html>",
            self.name, self.compiler
        )
    }
}

fn default_compiler() -> String {
    "GCC (C++, x86 64bit in /usr/bin)".to_string()
}

fn default_true() -> bool {
    true
}

/// Everything the simulated IDE knows about the project and the debuggee.
///
/// File names in `files`, `trace` and `breakpoints` are relative to
/// `project_dir`; the IDE reports them back as absolute paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimSetup {
    pub project: String,
    pub project_dir: String,
    /// File name to number of lines
    pub files: BTreeMap<String, u32>,
    pub kits: Vec<SimKit>,
    /// Source locations the debuggee passes, in execution order
    pub trace: Vec<Breakpoint>,
    /// Whether the debuggee exits after the end of the trace; otherwise it keeps running
    pub finishes: bool,
    /// Show the "Failed to start application" box instead of starting
    pub fails_to_start: bool,
    /// The debugger never reaches a debuggable state
    pub hangs_on_start: bool,
    /// Warn about debugging a release build when the debugger starts
    pub release_warning: bool,
    /// Text of the symbol server dialog shown when the debugger starts, if any
    pub symbol_server_dialog: Option<String>,
    pub debugger_log: String,
    /// Breakpoints left over from an earlier session
    pub breakpoints: Vec<Breakpoint>,
}

impl Default for SimSetup {
    fn default() -> Self {
        Self {
            project: "untitled".to_string(),
            project_dir: "/home/tester/untitled".to_string(),
            files: BTreeMap::from([("main.cpp".to_string(), 40)]),
            kits: vec![SimKit::new("Desktop")],
            trace: Vec::new(),
            finishes: true,
            fails_to_start: false,
            hangs_on_start: false,
            release_warning: false,
            symbol_server_dialog: None,
            debugger_log: String::new(),
            breakpoints: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Starting,
    /// Resumed; `settle` reads of the status label still show `Running.`
    Running { next: usize, settle: u32 },
    Stopped { at: usize, breakpoint: usize },
    Finished,
}

/// Widgets the simulator knows, resolved from an [`ObjectName`].
#[derive(Debug, Clone, PartialEq, Eq)]
enum Widget {
    MainWindow,
    NavigationTree,
    FilenameCombo,
    LocatorFilter,
    Editor(&'static str),
    BreakpointView,
    StatusLabel,
    DebugModeCombo,
    DebugModeOk,
    StartDebugging,
    Continue,
    Interrupt,
    ToolbarContinue,
    ExitDebugger,
    FailedToStart,
    DebuggerLog,
    SymbolPathsLabel,
    SymbolPathsCancel,
    WarningLabel,
    WarningOk,
    AppOutputToggle,
    AppOutput,
    ProjectTree,
    KitItem(String),
    SettingsPage { kit: String, page: String },
    QmlDebuggerCombo,
    QmlDebuggerItem(String),
    ModeTab(String),
}

const EDITORS: [&str; 4] = [
    names::CPP_EDITOR,
    names::QML_EDITOR,
    names::PRO_EDITOR,
    names::PLAIN_TEXT_EDITOR,
];

const QML_DEBUGGER_ITEMS: [&str; 3] = ["Automatic", "Enable", "Disable"];

fn is(name: &ObjectName, raw: &str) -> bool {
    *name == ObjectName::from(raw)
}

fn resolve(name: &ObjectName) -> Option<Widget> {
    if let Some(editor) = EDITORS.iter().find(|e| is(name, e)) {
        return Some(Widget::Editor(*editor));
    }
    let simple = [
        (names::MAIN_WINDOW, Widget::MainWindow),
        (names::NAVIGATION_TREE, Widget::NavigationTree),
        (names::FILENAME_COMBO, Widget::FilenameCombo),
        (names::LOCATOR_FILTER, Widget::LocatorFilter),
        (names::BREAKPOINT_VIEW, Widget::BreakpointView),
        (names::STATUS_LABEL, Widget::StatusLabel),
        (names::DEBUG_MODE_COMBO, Widget::DebugModeCombo),
        (names::DEBUG_MODE_OK, Widget::DebugModeOk),
        (names::START_DEBUGGING_BUTTON, Widget::StartDebugging),
        (names::CONTINUE_BUTTON, Widget::Continue),
        (names::INTERRUPT_BUTTON, Widget::Interrupt),
        (names::TOOLBAR_CONTINUE, Widget::ToolbarContinue),
        (names::EXIT_DEBUGGER, Widget::ExitDebugger),
        (names::FAILED_TO_START_BOX, Widget::FailedToStart),
        (names::DEBUGGER_LOG, Widget::DebuggerLog),
        (names::SYMBOL_PATHS_LABEL, Widget::SymbolPathsLabel),
        (names::SYMBOL_PATHS_CANCEL, Widget::SymbolPathsCancel),
        (names::APP_OUTPUT_TOGGLE, Widget::AppOutputToggle),
        (names::APP_OUTPUT_WINDOW, Widget::AppOutput),
        (names::PROJECT_NAVIGATION_TREE, Widget::ProjectTree),
        (names::ENABLE_QML_DEBUGGER_COMBO, Widget::QmlDebuggerCombo),
    ];
    if let Some((_, widget)) = simple.into_iter().find(|(raw, _)| is(name, raw)) {
        return Some(widget);
    }
    if *name == names::warning_label() {
        return Some(Widget::WarningLabel);
    }
    if *name == names::warning_ok() {
        return Some(Widget::WarningOk);
    }

    let kind = name.property("type")?.value.as_str();
    let text = name.property("text")?.value.clone();
    match kind {
        "Core::Internal::FancyTab" => Some(Widget::ModeTab(text)),
        "QModelIndex" => match resolve(&name.container()?)? {
            Widget::ProjectTree => Some(Widget::KitItem(text)),
            Widget::KitItem(kit) => Some(Widget::SettingsPage { kit, page: text }),
            Widget::QmlDebuggerCombo => Some(Widget::QmlDebuggerItem(text)),
            _ => None,
        },
        _ => None,
    }
}

#[derive(Debug)]
struct SimState {
    setup: SimSetup,
    view: String,
    document: Option<String>,
    cursor_line: u32,
    locator_text: String,
    /// Absolute file and line, in creation order
    breakpoints: Vec<Breakpoint>,
    selected_row: Option<usize>,
    phase: Phase,
    continues: usize,
    failed_to_start_shown: bool,
    symbol_dialog_shown: bool,
    release_warning_shown: bool,
    debugger_log_open: bool,
    debugger_log: String,
    output_pane_checked: bool,
    output: String,
    selected_kit: Option<String>,
    settings_page: Option<String>,
    qml_debugger: String,
    qml_popup_open: bool,
}

impl SimState {
    fn new(setup: SimSetup) -> Self {
        let mut state = Self {
            view: "Welcome".to_string(),
            document: None,
            cursor_line: 1,
            locator_text: String::new(),
            breakpoints: Vec::new(),
            selected_row: None,
            phase: Phase::Idle,
            continues: 0,
            failed_to_start_shown: false,
            symbol_dialog_shown: false,
            release_warning_shown: false,
            debugger_log_open: false,
            debugger_log: setup.debugger_log.clone(),
            output_pane_checked: false,
            output: String::new(),
            selected_kit: None,
            settings_page: None,
            qml_debugger: "Automatic".to_string(),
            qml_popup_open: false,
            setup,
        };
        state.breakpoints = state
            .setup
            .breakpoints
            .iter()
            .map(|bp| Breakpoint::new(state.absolute(&bp.file), bp.line))
            .collect();
        state
    }

    fn absolute(&self, file: &str) -> String {
        format!("{}/{}", self.setup.project_dir.trim_end_matches('/'), file)
    }

    fn debugging(&self) -> bool {
        matches!(self.phase, Phase::Running { .. } | Phase::Stopped { .. })
    }

    fn exists(&self, widget: &Widget) -> bool {
        let in_projects = self.view == "Projects";
        match widget {
            Widget::MainWindow
            | Widget::NavigationTree
            | Widget::LocatorFilter
            | Widget::AppOutputToggle
            | Widget::ModeTab(_) => true,
            Widget::FilenameCombo | Widget::DebugModeCombo => self.document.is_some(),
            Widget::Editor(editor) => self
                .document
                .as_deref()
                .is_some_and(|doc| editor_for_file_suffix(doc) == ObjectName::from(*editor)),
            Widget::BreakpointView => self.view == "Debug",
            Widget::StatusLabel => self.phase != Phase::Idle,
            Widget::StartDebugging => {
                matches!(self.phase, Phase::Idle | Phase::Finished) && !self.failed_to_start_shown
            }
            Widget::Continue => matches!(self.phase, Phase::Stopped { .. }),
            Widget::Interrupt => matches!(self.phase, Phase::Running { .. }),
            Widget::ToolbarContinue | Widget::ExitDebugger => self.debugging(),
            Widget::FailedToStart | Widget::DebugModeOk => self.failed_to_start_shown,
            Widget::DebuggerLog => self.debugger_log_open,
            Widget::SymbolPathsLabel | Widget::SymbolPathsCancel => self.symbol_dialog_shown,
            Widget::WarningLabel | Widget::WarningOk => self.release_warning_shown,
            Widget::AppOutput => self.output_pane_checked,
            Widget::ProjectTree => in_projects,
            Widget::KitItem(kit) => in_projects && self.setup.kits.iter().any(|k| &k.name == kit),
            Widget::SettingsPage { kit, .. } => {
                in_projects && self.selected_kit.as_deref() == Some(kit.as_str())
            }
            Widget::QmlDebuggerCombo => {
                in_projects && self.settings_page.as_deref() == Some("Run")
            }
            Widget::QmlDebuggerItem(item) => {
                self.qml_popup_open && QML_DEBUGGER_ITEMS.contains(&item.as_str())
            }
        }
    }

    fn window_title(&self) -> String {
        match &self.document {
            Some(doc) => format!("{} @ {} - Qt Creator", basename(doc), self.setup.project),
            None => format!("{} - Qt Creator", self.setup.project),
        }
    }

    fn open(&mut self, typed: &str) {
        let suffix = format!("/{typed}");
        let found = self
            .setup
            .files
            .keys()
            .find(|f| f.as_str() == typed || f.ends_with(&suffix))
            .cloned();
        match found {
            Some(file) => {
                debug!("Simulated IDE opens {}", file);
                self.document = Some(self.absolute(&file));
                self.cursor_line = 1;
            }
            None => debug!("Locator found nothing for '{}'", typed),
        }
    }

    fn line_count(&self, document: &str) -> u32 {
        self.setup
            .files
            .iter()
            .find(|(f, _)| self.absolute(f) == document)
            .map(|(_, lines)| *lines)
            .unwrap_or(0)
    }

    fn trigger_locator(&mut self) {
        let typed = std::mem::take(&mut self.locator_text);
        let typed = typed.trim();
        if let Some(line) = typed.strip_prefix("l ") {
            let (Ok(line), Some(doc)) = (line.trim().parse::<u32>(), self.document.clone()) else {
                return;
            };
            if (1..=self.line_count(&doc)).contains(&line) {
                self.cursor_line = line;
            }
        } else if !typed.is_empty() {
            self.open(typed);
        }
    }

    fn toggle_breakpoint(&mut self) -> Result<(), HarnessError> {
        let file = self
            .document
            .clone()
            .ok_or_else(|| HarnessError::ActionFailed("No document is open".to_string()))?;
        let here = Breakpoint::new(file, self.cursor_line);
        match self.breakpoints.iter().position(|bp| *bp == here) {
            Some(i) => {
                self.breakpoints.remove(i);
            }
            None => self.breakpoints.push(here),
        }
        Ok(())
    }

    fn start_debugger(&mut self) {
        info!("Simulated IDE starts debugging {}", self.setup.project);
        self.output.push_str(&format!(
            "Debugging starts\n{}/{} starting...\n",
            self.setup.project_dir, self.setup.project
        ));
        if self.setup.fails_to_start {
            self.failed_to_start_shown = true;
            return;
        }
        self.symbol_dialog_shown = self.setup.symbol_server_dialog.is_some();
        self.release_warning_shown = self.setup.release_warning;
        self.phase = if self.setup.hangs_on_start {
            Phase::Starting
        } else {
            Phase::Running { next: 0, settle: 1 }
        };
    }

    fn resume(&mut self) -> Result<(), HarnessError> {
        let Phase::Stopped { at, .. } = self.phase else {
            return Err(HarnessError::ActionFailed(
                "Debugger is not stopped".to_string(),
            ));
        };
        self.continues += 1;
        self.phase = Phase::Running {
            next: at + 1,
            settle: 1,
        };
        Ok(())
    }

    fn finish(&mut self) {
        self.output.push_str(&format!("{DEBUGGING_FINISHED}\n"));
    }

    /// Advance the debugger by one observation and return the label text.
    fn status_text(&mut self) -> String {
        match self.phase {
            Phase::Idle | Phase::Starting => String::new(),
            Phase::Running { next, settle } if settle > 0 => {
                self.phase = Phase::Running {
                    next,
                    settle: settle - 1,
                };
                RUNNING_TEXT.to_string()
            }
            Phase::Running { next, .. } => {
                let hit = self.setup.trace.iter().enumerate().skip(next).find_map(|(i, loc)| {
                    let abs = Breakpoint::new(self.absolute(&loc.file), loc.line);
                    self.breakpoints
                        .iter()
                        .position(|bp| *bp == abs)
                        .map(|breakpoint| (i, breakpoint, abs))
                });
                match hit {
                    Some((at, breakpoint, location)) => {
                        debug!("Simulated debugger stops at {}", location);
                        self.document = Some(location.file);
                        self.cursor_line = location.line;
                        self.phase = Phase::Stopped { at, breakpoint };
                        self.status_text()
                    }
                    None if self.setup.finishes => {
                        self.phase = Phase::Finished;
                        self.finish();
                        FINISHED_TEXT.to_string()
                    }
                    None => {
                        self.phase = Phase::Running {
                            next: self.setup.trace.len(),
                            settle: 0,
                        };
                        RUNNING_TEXT.to_string()
                    }
                }
            }
            Phase::Stopped { breakpoint, .. } => {
                format!("Stopped at breakpoint {} in thread 1.", breakpoint + 1)
            }
            Phase::Finished => FINISHED_TEXT.to_string(),
        }
    }

    fn property(&mut self, widget: &Widget, property: Property) -> Option<String> {
        let value = match (widget, property) {
            (Widget::MainWindow, Property::WindowTitle) => self.window_title(),
            (Widget::FilenameCombo | Widget::DebugModeCombo, Property::ToolTip) => {
                self.document.clone()?
            }
            (Widget::FilenameCombo | Widget::DebugModeCombo, Property::CurrentText) => {
                basename(self.document.as_deref()?).to_string()
            }
            (Widget::Editor(_), Property::CursorLine) => self.cursor_line.to_string(),
            (Widget::Editor(_), Property::PlainText) => String::new(),
            (Widget::LocatorFilter, Property::Text) => self.locator_text.clone(),
            (Widget::StatusLabel, Property::Text) => self.status_text(),
            (Widget::FailedToStart, Property::Text) => {
                "Failed to start application".to_string()
            }
            (Widget::FailedToStart, Property::InformativeText) => format!(
                "The process \"{}/{}\" could not be started.",
                self.setup.project_dir, self.setup.project
            ),
            (Widget::DebuggerLog, Property::PlainText) => self.debugger_log.clone(),
            (Widget::SymbolPathsLabel, Property::Text) => {
                self.setup.symbol_server_dialog.clone().unwrap_or_default()
            }
            (Widget::WarningLabel, Property::Text) => format!(
                "{NOT_A_DEBUG_BUILD}\n\nYou can continue debugging, but breakpoints may not be hit."
            ),
            (Widget::AppOutputToggle, Property::Checked) => self.output_pane_checked.to_string(),
            (Widget::AppOutput, Property::PlainText) => self.output.clone(),
            (Widget::KitItem(kit), Property::ToolTip) => {
                self.setup.kits.iter().find(|k| &k.name == kit)?.tool_tip()
            }
            (Widget::KitItem(kit), Property::Enabled) => self
                .setup
                .kits
                .iter()
                .find(|k| &k.name == kit)?
                .enabled
                .to_string(),
            (Widget::QmlDebuggerCombo, Property::CurrentText) => self.qml_debugger.clone(),
            (Widget::KitItem(text) | Widget::ModeTab(text) | Widget::QmlDebuggerItem(text), Property::Text) => {
                text.clone()
            }
            (_, Property::Enabled) => "true".to_string(),
            _ => return None,
        };
        Some(value)
    }

    fn click(&mut self, widget: &Widget) -> Result<(), HarnessError> {
        match widget {
            Widget::ModeTab(view) => self.view = view.clone(),
            Widget::KitItem(kit) => {
                self.selected_kit = Some(kit.clone());
                self.settings_page = None;
            }
            Widget::SettingsPage { page, .. } => self.settings_page = Some(page.clone()),
            Widget::QmlDebuggerCombo => self.qml_popup_open = true,
            Widget::QmlDebuggerItem(item) => {
                self.qml_debugger = item.clone();
                self.qml_popup_open = false;
            }
            Widget::StartDebugging => self.start_debugger(),
            Widget::Continue | Widget::ToolbarContinue => self.resume()?,
            Widget::ExitDebugger => {
                info!("Simulated IDE exits the debugger");
                self.phase = Phase::Idle;
                self.finish();
            }
            Widget::DebugModeOk => self.failed_to_start_shown = false,
            Widget::SymbolPathsCancel => self.symbol_dialog_shown = false,
            Widget::WarningOk => self.release_warning_shown = false,
            Widget::AppOutputToggle => self.output_pane_checked = !self.output_pane_checked,
            _ => {}
        }
        Ok(())
    }

    fn type_keys(&mut self, widget: &Widget, keys: &str) -> Result<(), HarnessError> {
        match (widget, keys) {
            (Widget::LocatorFilter, "<Ctrl+A>" | "<Delete>") => self.locator_text.clear(),
            (Widget::LocatorFilter, "<Return>") => self.trigger_locator(),
            (Widget::LocatorFilter, text) => self.locator_text.push_str(text),
            (Widget::BreakpointView, "<Delete>") => {
                if let Some(row) = self.selected_row.take() {
                    if row < self.breakpoints.len() {
                        self.breakpoints.remove(row);
                    }
                }
            }
            (Widget::Editor(_) | Widget::BreakpointView, _) => {}
            _ => {
                return Err(HarnessError::ActionFailed(format!(
                    "Cannot type '{keys}' into {widget:?}"
                )))
            }
        }
        Ok(())
    }
}

/// A [`Harness`] backed by an in-memory IDE model.
#[derive(Debug)]
pub struct SimulatedIde {
    state: Mutex<SimState>,
}

impl SimulatedIde {
    pub fn new(setup: SimSetup) -> Self {
        Self {
            state: Mutex::new(SimState::new(setup)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, SimState>, HarnessError> {
        self.state
            .lock()
            .map_err(|_| HarnessError::Disconnected("simulated IDE state is poisoned".to_string()))
    }

    /// Resolve `object` to a widget that is currently shown.
    fn visible(state: &SimState, object: &ObjectName) -> Result<Widget, HarnessError> {
        if let ObjectName::Invalid(reason) = object {
            return Err(HarnessError::InvalidObjectName(reason.clone()));
        }
        resolve(object)
            .filter(|w| state.exists(w))
            .ok_or_else(|| HarnessError::ObjectNotFound(object.to_string()))
    }

    /// Breakpoints currently listed in the Breakpoints view.
    pub fn breakpoints(&self) -> Vec<Breakpoint> {
        self.lock().map(|s| s.breakpoints.clone()).unwrap_or_default()
    }

    /// Number of times the debuggee was resumed.
    pub fn continues(&self) -> usize {
        self.lock().map(|s| s.continues).unwrap_or(0)
    }

    pub fn current_view(&self) -> String {
        self.lock().map(|s| s.view.clone()).unwrap_or_default()
    }

    /// Current selection of the QML debugger combo box.
    pub fn qml_debugging(&self) -> String {
        self.lock().map(|s| s.qml_debugger.clone()).unwrap_or_default()
    }

    pub fn application_output(&self) -> String {
        self.lock().map(|s| s.output.clone()).unwrap_or_default()
    }

    pub fn debugger_log(&self) -> String {
        self.lock().map(|s| s.debugger_log.clone()).unwrap_or_default()
    }

    /// Whether the IDE is out of debug mode (nothing started, or the session ended).
    pub fn is_idle(&self) -> bool {
        self.lock()
            .map(|s| matches!(s.phase, Phase::Idle | Phase::Finished))
            .unwrap_or(false)
    }
}

#[async_trait::async_trait]
impl Harness for SimulatedIde {
    async fn exists(&self, object: &ObjectName) -> Result<bool, HarnessError> {
        if let ObjectName::Invalid(reason) = object {
            return Err(HarnessError::InvalidObjectName(reason.clone()));
        }
        let state = self.lock()?;
        Ok(resolve(object).is_some_and(|w| state.exists(&w)))
    }

    async fn property(
        &self,
        object: &ObjectName,
        property: Property,
    ) -> Result<String, HarnessError> {
        let mut state = self.lock()?;
        let widget = Self::visible(&state, object)?;
        state
            .property(&widget, property)
            .ok_or_else(|| HarnessError::PropertyUnavailable {
                object: object.to_string(),
                property: property.to_string(),
            })
    }

    async fn row_count(&self, object: &ObjectName) -> Result<usize, HarnessError> {
        let state = self.lock()?;
        match Self::visible(&state, object)? {
            Widget::BreakpointView => Ok(state.breakpoints.len()),
            Widget::ProjectTree => Ok(state.setup.kits.len()),
            other => Err(HarnessError::ActionFailed(format!(
                "{other:?} is not a view"
            ))),
        }
    }

    async fn click(&self, object: &ObjectName) -> Result<(), HarnessError> {
        let mut state = self.lock()?;
        let widget = Self::visible(&state, object)?;
        debug!("Simulated click on {:?}", widget);
        state.click(&widget)
    }

    async fn click_row(&self, object: &ObjectName, row: usize) -> Result<(), HarnessError> {
        let mut state = self.lock()?;
        match Self::visible(&state, object)? {
            Widget::BreakpointView if row < state.breakpoints.len() => {
                state.selected_row = Some(row);
                Ok(())
            }
            Widget::BreakpointView => Err(HarnessError::ObjectNotFound(format!(
                "row {row} of {object}"
            ))),
            other => Err(HarnessError::ActionFailed(format!(
                "{other:?} has no rows"
            ))),
        }
    }

    async fn type_keys(&self, object: &ObjectName, keys: &str) -> Result<(), HarnessError> {
        let mut state = self.lock()?;
        let widget = Self::visible(&state, object)?;
        state.type_keys(&widget, keys)
    }

    async fn activate_menu_item(&self, path: &[String]) -> Result<(), HarnessError> {
        let mut state = self.lock()?;
        let path: Vec<&str> = path.iter().map(String::as_str).collect();
        match path.as_slice() {
            ["Debug", "Enable or Disable Breakpoint"] => state.toggle_breakpoint(),
            ["View", "Views", "Global Debugger Log"] => {
                state.debugger_log_open = !state.debugger_log_open;
                Ok(())
            }
            other => Err(HarnessError::ObjectNotFound(format!(
                "menu item {}",
                other.join(" > ")
            ))),
        }
    }

    async fn invoke_context_menu_item(
        &self,
        object: &ObjectName,
        item: &str,
    ) -> Result<(), HarnessError> {
        let mut state = self.lock()?;
        match (Self::visible(&state, object)?, item) {
            (Widget::DebuggerLog, "Clear Contents") => {
                state.debugger_log.clear();
                Ok(())
            }
            (other, _) => Err(HarnessError::ObjectNotFound(format!(
                "context menu item '{item}' of {other:?}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> SimSetup {
        SimSetup {
            files: BTreeMap::from([("main.cpp".to_string(), 30), ("src/util.cpp".to_string(), 12)]),
            trace: vec![Breakpoint::new("main.cpp", 5), Breakpoint::new("src/util.cpp", 3)],
            ..SimSetup::default()
        }
    }

    async fn type_into_locator(ide: &SimulatedIde, text: &str) {
        let locator = ObjectName::from(names::LOCATOR_FILTER);
        for keys in ["<Ctrl+A>", text, "<Return>"] {
            ide.type_keys(&locator, keys).await.expect("Should type");
        }
    }

    #[tokio::test]
    async fn locator_opens_files_and_moves_cursor() {
        let ide = SimulatedIde::new(setup());
        type_into_locator(&ide, "util.cpp").await;
        let title = ide
            .property(&ObjectName::from(names::MAIN_WINDOW), Property::WindowTitle)
            .await
            .expect("Should read title");
        assert_eq!(title, "util.cpp @ untitled - Qt Creator");

        type_into_locator(&ide, "l 7").await;
        let editor = ObjectName::from(names::CPP_EDITOR);
        assert_eq!(
            ide.property(&editor, Property::CursorLine).await.as_deref(),
            Ok("7")
        );

        // past the end of the file
        type_into_locator(&ide, "l 99").await;
        assert_eq!(
            ide.property(&editor, Property::CursorLine).await.as_deref(),
            Ok("7")
        );
    }

    #[tokio::test]
    async fn hidden_widgets_are_not_found() {
        let ide = SimulatedIde::new(setup());
        let view = ObjectName::from(names::BREAKPOINT_VIEW);
        assert_eq!(ide.exists(&view).await, Ok(false));
        assert!(matches!(
            ide.row_count(&view).await,
            Err(HarnessError::ObjectNotFound(_))
        ));
        assert!(matches!(
            ide.exists(&ObjectName::from("no name")).await,
            Err(HarnessError::InvalidObjectName(_))
        ));
    }

    #[tokio::test]
    async fn status_label_walks_the_trace() {
        let ide = SimulatedIde::new(SimSetup {
            breakpoints: vec![Breakpoint::new("src/util.cpp", 3)],
            ..setup()
        });
        ide.click(&names::mode_tab(crate::View::Debug)).await.expect("Should switch");
        ide.click(&ObjectName::from(names::START_DEBUGGING_BUTTON))
            .await
            .expect("Should start");

        let label = ObjectName::from(names::STATUS_LABEL);
        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(ide.property(&label, Property::Text).await.expect("Should read"));
        }
        assert_eq!(
            seen,
            vec![
                "Running.",
                "Stopped at breakpoint 1 in thread 1.",
                "Stopped at breakpoint 1 in thread 1."
            ]
        );

        ide.click(&ObjectName::from(names::CONTINUE_BUTTON))
            .await
            .expect("Should continue");
        assert_eq!(ide.continues(), 1);
        assert_eq!(
            ide.property(&label, Property::Text).await.as_deref(),
            Ok("Running.")
        );
        assert_eq!(
            ide.property(&label, Property::Text).await.as_deref(),
            Ok("Debugger finished.")
        );
        assert!(ide.application_output().contains(DEBUGGING_FINISHED));
    }

    #[test]
    fn items_resolve_through_their_containers() {
        let tree = ObjectName::from(names::PROJECT_NAVIGATION_TREE);
        let kit = ObjectName::item(&tree, "Desktop");
        let run = ObjectName::item(&kit, "Run");
        assert_eq!(resolve(&kit), Some(Widget::KitItem("Desktop".to_string())));
        assert_eq!(
            resolve(&run),
            Some(Widget::SettingsPage {
                kit: "Desktop".to_string(),
                page: "Run".to_string()
            })
        );
        assert_eq!(resolve(&names::warning_ok()), Some(Widget::WarningOk));
    }

    #[test]
    fn setup_deserializes_with_defaults() {
        let setup: SimSetup = serde_yaml::from_str(
            "project: demo\nfiles:\n  main.cpp: 20\ntrace:\n  - main.cpp: 8\nkits:\n  - name: MSVC2019\n    compiler: Microsoft Visual C++ Compiler 16\n",
        )
        .expect("Should parse");
        assert_eq!(setup.project, "demo");
        assert!(setup.finishes);
        assert_eq!(setup.trace, vec![Breakpoint::new("main.cpp", 8)]);
        assert!(setup.kits[0].enabled);
        assert!(setup.kits[0].tool_tip().contains("<dd>Microsoft Visual C++"));
    }
}
