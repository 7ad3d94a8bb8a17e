//! Object names of the IDE widgets the debugger tests touch.
//!
//! Symbolic names refer to the harness' object map; the inline real names are
//! for widgets the object map does not carry.

use crate::object_name::ObjectName;
use crate::types::View;

pub const MAIN_WINDOW: &str = ":Qt Creator_Core::Internal::MainWindow";
pub const NAVIGATION_TREE: &str = ":Qt Creator_Utils::NavigationTreeView";
pub const FILENAME_COMBO: &str = ":Qt Creator_FilenameQComboBox";
pub const LOCATOR_FILTER: &str = ":*Qt Creator_Utils::FilterLineEdit";

// Editors
pub const CPP_EDITOR: &str = ":Qt Creator_CppEditor::Internal::CPPEditorWidget";
pub const QML_EDITOR: &str = ":Qt Creator_QmlJSEditor::QmlJSTextEditorWidget";
pub const PRO_EDITOR: &str = ":Qt Creator_ProFileEditorWidget";
pub const PLAIN_TEXT_EDITOR: &str = ":Qt Creator_TextEditor::TextEditorWidget";

// Debug mode
pub const BREAKPOINT_VIEW: &str = ":Breakpoints_Debugger::Internal::BreakTreeView";
pub const STATUS_LABEL: &str = ":Debugger Toolbar.StatusText_Utils::StatusLabel";
pub const DEBUG_MODE_COMBO: &str = ":DebugModeWidget_QComboBox";
pub const DEBUG_MODE_OK: &str = ":DebugModeWidget.OK_QPushButton";
pub const START_DEBUGGING_BUTTON: &str =
    ":*Qt Creator.Start Debugging_Core::Internal::FancyToolButton";
pub const CONTINUE_BUTTON: &str = ":*Qt Creator.Continue_Core::Internal::FancyToolButton";
pub const INTERRUPT_BUTTON: &str = ":*Qt Creator.Interrupt_Core::Internal::FancyToolButton";
pub const TOOLBAR_CONTINUE: &str = ":Debugger Toolbar.Continue_QToolButton";
pub const EXIT_DEBUGGER: &str = ":Debugger Toolbar.Exit Debugger_QToolButton";
pub const FAILED_TO_START_BOX: &str = ":Failed to start application_QMessageBox";
pub const DEBUGGER_LOG: &str = "{container=':DebugModeWidget.Debugger Log_QDockWidget' \
     type='QPlainTextEdit' unnamed='1' visible='1'}";

// Dialogs popping up while the debugger starts
pub const SYMBOL_PATHS_LABEL: &str = "{name='msgLabel' text?='<html><head/><body>*' type='QLabel' \
     visible='1' window=':Dialog_Debugger::Internal::SymbolPathsDialog'}";
pub const SYMBOL_PATHS_CANCEL: &str = "{text='Cancel' type='QPushButton' unnamed='1' visible='1' \
     window=':Dialog_Debugger::Internal::SymbolPathsDialog'}";
pub const WARNING_BOX: &str = "{type='QMessageBox' unnamed='1' visible='1' windowTitle='Warning'}";

// Output panes
pub const APP_OUTPUT_TOGGLE: &str =
    ":Qt Creator_AppOutput_Core::Internal::OutputPaneToggleButton";
pub const APP_OUTPUT_WINDOW: &str =
    "{type='Core::OutputWindow' visible='1' windowTitle='Application Output Window'}";

// Projects mode
pub const PROJECT_NAVIGATION_TREE: &str = ":Projects.ProjectNavigationTreeView";
pub const ENABLE_QML_DEBUGGER_COMBO: &str = ":EnableQMLDebugger_ComboBox";

/// Tab of the mode selector switching to `view`.
pub fn mode_tab(view: View) -> ObjectName {
    ObjectName::real([("type", "Core::Internal::FancyTab"), ("text", view.label())])
}

/// Label of the warning message box.
pub fn warning_label() -> ObjectName {
    ObjectName::real([
        ("name", "qt_msgbox_label"),
        ("type", "QLabel"),
        ("visible", "1"),
        ("window", WARNING_BOX),
    ])
}

/// OK button of the warning message box.
pub fn warning_ok() -> ObjectName {
    ObjectName::real([
        ("text", "OK"),
        ("type", "QPushButton"),
        ("unnamed", "1"),
        ("visible", "1"),
        ("window", WARNING_BOX),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_inline_names_parse() {
        for raw in [
            DEBUGGER_LOG,
            SYMBOL_PATHS_LABEL,
            SYMBOL_PATHS_CANCEL,
            WARNING_BOX,
            APP_OUTPUT_WINDOW,
        ] {
            assert!(ObjectName::from(raw).is_valid(), "{raw} should parse");
        }
        assert!(warning_label().is_valid());
        assert_eq!(
            ObjectName::from(warning_ok().to_string()),
            warning_ok(),
            "nested window survives a round trip"
        );
    }
}
