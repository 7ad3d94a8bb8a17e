//! Debugger system-test driver for a desktop IDE
//!
//! This crate drives an IDE through a GUI automation harness: it sets
//! breakpoints, starts a debug run, follows the debugger from stop to stop and
//! checks every hit location against an expected order. The harness itself is
//! a trait ([`Harness`]) so the same scenarios run against a real automation
//! backend or the in-memory [`sim::SimulatedIde`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub mod breakpoints;
pub mod config;
pub mod debugger;
pub mod editor;
pub mod element;
pub mod errors;
pub mod harness;
pub mod locator;
pub mod names;
pub mod object_name;
pub mod poll;
pub mod report;
pub mod results;
pub mod sim;
pub mod status;
#[cfg(test)]
mod tests;
pub mod types;
mod ui;
pub mod utils;

pub use breakpoints::{remove_old_breakpoints, set_breakpoints_for_current_project, Breakpoint};
pub use config::{DriverConfig, Timeouts};
pub use debugger::do_simple_debugging;
pub use element::Element;
pub use errors::HarnessError;
pub use harness::Harness;
pub use locator::Locator;
pub use object_name::{ObjectName, PropertyMatch};
pub use poll::WaitOutcome;
pub use report::{Outcome, ReportEntry, Reporter, Summary};
pub use status::DebuggerStatus;
pub use types::{HostOs, Kit, ProjectSettings, Property, View};

/// Message recorded whenever an expected widget cannot be found.
pub const UI_CHANGED: &str = "UI seems to have changed - check manually and fix this script.";

/// The application under test, seen through a harness.
///
/// Bundles the harness with the report sink and the driver configuration so
/// that helpers only need one handle.
#[derive(Clone)]
pub struct Ide {
    harness: Arc<dyn Harness>,
    reporter: Arc<Reporter>,
    config: DriverConfig,
}

impl Ide {
    pub fn new(harness: Arc<dyn Harness>, config: DriverConfig) -> Self {
        Self::with_reporter(harness, config, Arc::new(Reporter::new()))
    }

    pub fn with_reporter(
        harness: Arc<dyn Harness>,
        config: DriverConfig,
        reporter: Arc<Reporter>,
    ) -> Self {
        info!(
            "Driving IDE (timeout scale {}, poll every {}ms)",
            config.timeout_scale, config.poll_interval_ms
        );
        Self {
            harness,
            reporter,
            config,
        }
    }

    pub fn harness(&self) -> Arc<dyn Harness> {
        self.harness.clone()
    }

    pub fn report(&self) -> &Reporter {
        &self.reporter
    }

    pub fn reporter(&self) -> Arc<Reporter> {
        self.reporter.clone()
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// A timeout in milliseconds, scaled by the configuration.
    pub fn timeout(&self, ms: u64) -> Duration {
        self.config.timeout(ms)
    }

    pub fn locator(&self, name: impl Into<ObjectName>) -> Locator {
        Locator::new(self.harness.clone(), name.into())
            .set_default_timeout(self.timeout(self.config.timeouts.object_ms))
            .set_poll_interval(self.config.poll_interval())
    }

    /// Wait for an object, failing with [`HarnessError::Timeout`] when it does not show up.
    pub async fn wait_for_object(
        &self,
        name: impl Into<ObjectName>,
        timeout: Option<Duration>,
    ) -> Result<Element, HarnessError> {
        self.locator(name).wait(timeout).await
    }

    /// Like [`Ide::wait_for_object`] but a missing object is `Ok(None)`.
    pub async fn try_wait_for_object(
        &self,
        name: impl Into<ObjectName>,
        timeout: Option<Duration>,
    ) -> Result<Option<Element>, HarnessError> {
        match self.wait_for_object(name, timeout).await {
            Ok(element) => Ok(Some(element)),
            Err(e) if e.is_lookup_failure() => {
                debug!("Object lookup failed: {}", e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn object_exists(&self, name: impl Into<ObjectName>) -> Result<bool, HarnessError> {
        self.locator(name).exists().await
    }

    /// Wait until the object's existence equals `should_exist`.
    pub async fn check_if_object_exists(
        &self,
        name: impl Into<ObjectName>,
        should_exist: bool,
        timeout: Duration,
    ) -> bool {
        let locator = self.locator(name);
        self.wait_for(timeout, || {
            let locator = locator.clone();
            async move { locator.exists().await.map(|e| e == should_exist).unwrap_or(false) }
        })
        .await
    }

    /// Poll `predicate` with the configured interval.
    pub async fn wait_for<F, Fut>(&self, timeout: Duration, predicate: F) -> bool
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = bool>,
    {
        poll::wait_for(timeout, self.config.poll_interval(), predicate).await
    }

    /// Poll a property of `element` until `accept` holds; unreadable values count as "not yet".
    pub async fn wait_for_property<A>(
        &self,
        element: &Element,
        property: Property,
        timeout: Duration,
        accept: A,
    ) -> WaitOutcome<String>
    where
        A: Fn(&str) -> bool,
    {
        poll::wait_for_value(
            timeout,
            self.config.poll_interval(),
            || {
                let element = element.clone();
                async move { element.property(property).await.ok() }
            },
            |value: &String| accept(value.as_str()),
        )
        .await
    }

    /// Wait for a button and click it.
    pub async fn click_button(&self, name: impl Into<ObjectName>) -> Result<(), HarnessError> {
        let button = self.wait_for_object(name, None).await?;
        debug!("Clicking {}", button.name());
        button.click().await
    }

    pub async fn invoke_menu_item(&self, path: &[&str]) -> Result<(), HarnessError> {
        debug!("Invoking menu item {}", path.join(" > "));
        let path: Vec<String> = path.iter().map(|s| s.to_string()).collect();
        self.harness.activate_menu_item(&path).await
    }
}
