//! Generic widget helpers shared by the editor, breakpoint and debugger code.

use tracing::{debug, instrument};

use crate::errors::HarnessError;
use crate::names;
use crate::object_name::ObjectName;
use crate::types::{Kit, ProjectSettings, Property, View};
use crate::{Element, Ide};

impl Ide {
    /// Activate a mode of the IDE (Edit, Debug, Projects, ...).
    pub async fn switch_view_to(&self, view: View) -> Result<(), HarnessError> {
        debug!("Switching to {:?} mode", view);
        self.click_button(names::mode_tab(view)).await
    }

    /// Open the build or run settings of `kit` in the Projects mode.
    #[instrument(level = "debug", skip(self))]
    pub async fn switch_to_build_or_run_settings_for(
        &self,
        kit: &Kit,
        settings: ProjectSettings,
    ) -> Result<(), HarnessError> {
        self.switch_view_to(View::Projects).await?;
        let tree = self.locator(names::PROJECT_NAVIGATION_TREE);
        tree.wait(None).await?;
        let kit_item = tree.item(&kit.name);
        kit_item.wait(None).await?.click().await?;
        let page = kit_item.item(settings.label());
        page.wait(None).await?.click().await
    }

    /// Compare the enabled state of an object, returning the object.
    pub async fn verify_enabled(
        &self,
        name: impl Into<ObjectName>,
        expected: bool,
    ) -> Result<Element, HarnessError> {
        let name = name.into();
        let element = self
            .wait_for_object(name.clone(), Some(self.timeout(20_000)))
            .await?;
        let enabled = element.enabled().await?;
        self.report()
            .compare(enabled, expected, &format!("Enabled state of {name}"));
        Ok(element)
    }

    /// Select `item` in a combo box.
    ///
    /// Returns true if the selection was changed, false if `item` was already selected.
    pub async fn select_from_combo(
        &self,
        name: impl Into<ObjectName>,
        item: &str,
    ) -> Result<bool, HarnessError> {
        let name = name.into();
        let combo = self.verify_enabled(name.clone(), true).await?;
        if combo.current_text().await? == item {
            return Ok(false);
        }
        combo.click().await?;
        self.locator(name)
            .item(item)
            .wait(None)
            .await?
            .click()
            .await?;
        let switched = self
            .wait_for_property(
                &combo,
                Property::CurrentText,
                self.timeout(self.config().timeouts.combo_switch_ms),
                |text| text == item,
            )
            .await
            .is_satisfied();
        self.report()
            .verify(switched, &format!("Switched combo item to '{item}'"));
        Ok(true)
    }

    /// Make sure a checkable widget ends up in the wanted state.
    pub async fn ensure_checked(
        &self,
        name: impl Into<ObjectName>,
        should_be_checked: bool,
    ) -> Result<Element, HarnessError> {
        let name = name.into();
        let widget = self.wait_for_object(name.clone(), None).await?;
        let in_state = || {
            let widget = widget.clone();
            async move {
                widget
                    .checked()
                    .await
                    .map(|c| c == should_be_checked)
                    .unwrap_or(false)
            }
        };

        // tri-state buttons may need a second click
        let mut clicked = 0;
        while clicked < 2 && !self.wait_for(self.timeout(1_500), in_state).await {
            widget.click().await?;
            clicked += 1;
        }
        self.report()
            .verify(self.wait_for(self.timeout(1_000), in_state).await, "Checked state");
        let state = if should_be_checked {
            "checked"
        } else {
            "unchecked"
        };
        self.report().log(&format!("New state for {name}: {state}"));
        Ok(widget)
    }

    /// Dump the application output pane into the report.
    pub async fn log_application_output(&self) -> Result<Option<String>, HarnessError> {
        self.ensure_checked(names::APP_OUTPUT_TOGGLE, true).await?;
        match self
            .try_wait_for_object(names::APP_OUTPUT_WINDOW, None)
            .await?
        {
            Some(output) => {
                let text = output.plain_text().await?;
                self.report()
                    .log_detail("Application Output:", &format!("\n{text}"));
                Ok(Some(text))
            }
            None => {
                self.report()
                    .fail("Could not find any Application Output - did the project run?");
                Ok(None)
            }
        }
    }

    /// Type `filter` into the locator and trigger the first match.
    pub async fn select_from_locator(&self, filter: &str) -> Result<(), HarnessError> {
        let locator = self.wait_for_object(names::LOCATOR_FILTER, None).await?;
        locator.click().await?;
        locator.type_keys("<Ctrl+A>").await?;
        locator.type_keys(filter).await?;
        locator.type_keys("<Return>").await
    }
}
