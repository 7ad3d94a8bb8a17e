use tracing::{debug, instrument};

use crate::element::Element;
use crate::errors::HarnessError;
use crate::harness::Harness;
use crate::object_name::ObjectName;
use crate::poll::DEFAULT_POLL_INTERVAL;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};

// Default timeout if none is specified on the locator itself
pub const DEFAULT_LOCATOR_TIMEOUT: Duration = Duration::from_secs(20);

/// Finds a widget by name, waiting for it to appear.
#[derive(Clone)]
pub struct Locator {
    harness: Arc<dyn Harness>,
    name: ObjectName,
    timeout: Duration, // Default timeout for this locator instance
    interval: Duration,
}

impl Locator {
    pub(crate) fn new(harness: Arc<dyn Harness>, name: ObjectName) -> Self {
        Self {
            harness,
            name,
            timeout: DEFAULT_LOCATOR_TIMEOUT,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Set a default timeout for waiting operations on this locator instance.
    /// This timeout is used if no specific timeout is passed to `wait`.
    pub fn set_default_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn set_poll_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn name(&self) -> &ObjectName {
        &self.name
    }

    /// Single check without waiting. Lookup errors count as "not there".
    pub async fn exists(&self) -> Result<bool, HarnessError> {
        match self.harness.exists(&self.name).await {
            Ok(found) => Ok(found),
            Err(e) if e.is_lookup_failure() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Handle for the widget without checking that it exists.
    pub fn element(&self) -> Element {
        Element::new(self.harness.clone(), self.name.clone())
    }

    /// Wait for the widget to appear, up to the specified timeout.
    /// If no timeout is provided, uses the locator's default timeout.
    #[instrument(level = "debug", skip(self, timeout), fields(name = %self.name))]
    pub async fn wait(&self, timeout: Option<Duration>) -> Result<Element, HarnessError> {
        if let ObjectName::Invalid(reason) = &self.name {
            return Err(HarnessError::InvalidObjectName(reason.clone()));
        }

        let effective_timeout = timeout.unwrap_or(self.timeout);
        debug!("Waiting up to {:?} for {}", effective_timeout, self.name);

        // Harness failures other than lookups abort the wait instead of being retried.
        let deadline = Instant::now() + effective_timeout;
        loop {
            match self.harness.exists(&self.name).await {
                Ok(true) => return Ok(self.element()),
                Ok(false) => {}
                Err(e) if e.is_lookup_failure() => {}
                Err(e) => return Err(e),
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(HarnessError::Timeout(format!(
                    "Timed out after {effective_timeout:?} waiting for object {}",
                    self.name
                )));
            }
            sleep(self.interval.min(deadline - now)).await;
        }
    }

    /// Locator for an item (model index, combo entry) inside this widget.
    pub fn item(&self, text: &str) -> Locator {
        Locator {
            harness: self.harness.clone(),
            name: ObjectName::item(&self.name, text),
            timeout: self.timeout,
            interval: self.interval,
        }
    }
}
