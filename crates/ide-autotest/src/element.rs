use std::sync::Arc;

use crate::errors::HarnessError;
use crate::harness::Harness;
use crate::object_name::ObjectName;
use crate::types::Property;

/// A widget that was found by a [`crate::Locator`].
///
/// The handle stays addressable by name only; if the widget disappears later,
/// reads and actions fail with the harness' lookup error.
#[derive(Clone)]
pub struct Element {
    harness: Arc<dyn Harness>,
    name: ObjectName,
}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Element").field("name", &self.name).finish()
    }
}

impl Element {
    pub(crate) fn new(harness: Arc<dyn Harness>, name: ObjectName) -> Self {
        Self { harness, name }
    }

    pub fn name(&self) -> &ObjectName {
        &self.name
    }

    pub async fn property(&self, property: Property) -> Result<String, HarnessError> {
        self.harness.property(&self.name, property).await
    }

    pub async fn text(&self) -> Result<String, HarnessError> {
        self.property(Property::Text).await
    }

    pub async fn tool_tip(&self) -> Result<String, HarnessError> {
        self.property(Property::ToolTip).await
    }

    pub async fn window_title(&self) -> Result<String, HarnessError> {
        self.property(Property::WindowTitle).await
    }

    pub async fn plain_text(&self) -> Result<String, HarnessError> {
        self.property(Property::PlainText).await
    }

    pub async fn current_text(&self) -> Result<String, HarnessError> {
        self.property(Property::CurrentText).await
    }

    pub async fn informative_text(&self) -> Result<String, HarnessError> {
        self.property(Property::InformativeText).await
    }

    pub async fn checked(&self) -> Result<bool, HarnessError> {
        self.bool_property(Property::Checked).await
    }

    pub async fn enabled(&self) -> Result<bool, HarnessError> {
        self.bool_property(Property::Enabled).await
    }

    /// 1-based line of the text cursor (editor widgets only)
    pub async fn cursor_line(&self) -> Result<u32, HarnessError> {
        let raw = self.property(Property::CursorLine).await?;
        raw.trim().parse().map_err(|_| {
            HarnessError::InvalidArgument(format!(
                "cursor line of {} is not a number: '{raw}'",
                self.name
            ))
        })
    }

    pub async fn row_count(&self) -> Result<usize, HarnessError> {
        self.harness.row_count(&self.name).await
    }

    pub async fn click(&self) -> Result<(), HarnessError> {
        self.harness.click(&self.name).await
    }

    pub async fn click_row(&self, row: usize) -> Result<(), HarnessError> {
        self.harness.click_row(&self.name, row).await
    }

    pub async fn type_keys(&self, keys: &str) -> Result<(), HarnessError> {
        self.harness.type_keys(&self.name, keys).await
    }

    pub async fn invoke_context_menu_item(&self, item: &str) -> Result<(), HarnessError> {
        self.harness.invoke_context_menu_item(&self.name, item).await
    }

    async fn bool_property(&self, property: Property) -> Result<bool, HarnessError> {
        let raw = self.property(property).await?;
        match raw.trim() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(HarnessError::InvalidArgument(format!(
                "{property} of {} is not a boolean: '{other}'",
                self.name
            ))),
        }
    }
}
