use crate::errors::HarnessError;
use crate::object_name::ObjectName;
use crate::types::Property;

/// Primitive capabilities of a GUI automation harness.
///
/// Every method acts immediately and never waits: waiting is layered on top
/// by [`crate::Locator`] and [`crate::poll`]. Implementations return
/// [`HarnessError::ObjectNotFound`] when `object` does not currently resolve.
///
/// Key sequences passed to [`Harness::type_keys`] use the usual harness
/// notation: plain text is typed as-is, special keys are written in angle
/// brackets (`<Return>`, `<Delete>`, `<Ctrl+A>`).
#[async_trait::async_trait]
pub trait Harness: Send + Sync {
    /// Whether `object` currently resolves to a visible widget.
    async fn exists(&self, object: &ObjectName) -> Result<bool, HarnessError>;

    /// Read a property as its display string.
    async fn property(&self, object: &ObjectName, property: Property)
        -> Result<String, HarnessError>;

    /// Row count of the model behind a view widget.
    async fn row_count(&self, object: &ObjectName) -> Result<usize, HarnessError>;

    async fn click(&self, object: &ObjectName) -> Result<(), HarnessError>;

    /// Click the visual rectangle of `row` in a view widget.
    async fn click_row(&self, object: &ObjectName, row: usize) -> Result<(), HarnessError>;

    async fn type_keys(&self, object: &ObjectName, keys: &str) -> Result<(), HarnessError>;

    /// Trigger an entry of the main menu bar, e.g. `["Debug", "Enable or Disable Breakpoint"]`.
    async fn activate_menu_item(&self, path: &[String]) -> Result<(), HarnessError>;

    async fn invoke_context_menu_item(
        &self,
        object: &ObjectName,
        item: &str,
    ) -> Result<(), HarnessError>;
}
