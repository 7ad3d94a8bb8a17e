//! Common types shared by the harness seam, the driver and the simulator

use serde::{Deserialize, Serialize};

/// Widget properties the driver reads through the harness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Property {
    Text,
    ToolTip,
    WindowTitle,
    PlainText,
    Checked,
    Enabled,
    CurrentText,
    InformativeText,
    /// 1-based line of the text cursor in an editor widget
    CursorLine,
}

impl Property {
    pub fn as_str(&self) -> &'static str {
        match self {
            Property::Text => "text",
            Property::ToolTip => "toolTip",
            Property::WindowTitle => "windowTitle",
            Property::PlainText => "plainText",
            Property::Checked => "checked",
            Property::Enabled => "enabled",
            Property::CurrentText => "currentText",
            Property::InformativeText => "informativeText",
            Property::CursorLine => "cursorLine",
        }
    }
}

impl std::fmt::Display for Property {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Modes of the IDE's mode selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum View {
    Welcome,
    Edit,
    Design,
    Debug,
    Projects,
    Help,
}

impl View {
    /// Label of the mode tab
    pub fn label(&self) -> &'static str {
        match self {
            View::Welcome => "Welcome",
            View::Edit => "Edit",
            View::Design => "Design",
            View::Debug => "Debug",
            View::Projects => "Projects",
            View::Help => "Help",
        }
    }
}

/// Which settings page of a kit to open in the Projects mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectSettings {
    Build,
    Run,
}

impl ProjectSettings {
    pub fn label(&self) -> &'static str {
        match self {
            ProjectSettings::Build => "Build",
            ProjectSettings::Run => "Run",
        }
    }
}

/// Operating system of the machine the IDE runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostOs {
    Windows,
    Linux,
    Macos,
    Other,
}

impl HostOs {
    pub fn current() -> Self {
        Self::parse(std::env::consts::OS)
    }

    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "windows" => HostOs::Windows,
            "linux" => HostOs::Linux,
            "macos" | "darwin" => HostOs::Macos,
            _ => HostOs::Other,
        }
    }
}

impl Default for HostOs {
    fn default() -> Self {
        Self::current()
    }
}

/// Build/run kit, addressed by its display name in the project tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kit {
    pub name: String,
}

impl Kit {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl std::fmt::Display for Kit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
