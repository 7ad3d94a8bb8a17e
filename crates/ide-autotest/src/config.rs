//! Driver configuration: timeouts, polling and host information.
//!
//! Defaults reproduce the timings the debugger tests were tuned with. Slow
//! machines (VMs, loaded CI agents) can stretch every timeout at once through
//! `IDE_AUTOTEST_TIMEOUT_SCALE`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

use crate::types::HostOs;

pub const ENV_TIMEOUT_SCALE: &str = "IDE_AUTOTEST_TIMEOUT_SCALE";
pub const ENV_HOST_OS: &str = "IDE_AUTOTEST_HOST_OS";
pub const ENV_RESULTS_DIR: &str = "IDE_AUTOTEST_RESULTS_DIR";
pub const ENV_POLL_INTERVAL_MS: &str = "IDE_AUTOTEST_POLL_INTERVAL_MS";

/// All waits of the driver, in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// Default wait for an object to appear
    pub object_ms: u64,
    /// Debugger toolbar must show up after starting
    pub debugger_start_ms: u64,
    /// "Failed to start application" message box
    pub start_failure_box_ms: u64,
    /// Each expected stop
    pub stop_ms: u64,
    /// Continue / Interrupt buttons
    pub continue_button_ms: u64,
    /// "Running." after a continue
    pub running_ms: u64,
    /// "Running." or "Debugger finished." after the last stop
    pub terminal_ms: u64,
    /// "Debugging has finished" in the application output
    pub finish_output_ms: u64,
    /// Dialogs shown while the debugger starts
    pub warning_dialog_ms: u64,
    /// Breakpoint view reaching the expected row count
    pub breakpoint_rows_ms: u64,
    /// Breakpoint view becoming empty
    pub breakpoint_removal_ms: u64,
    /// Clearing the debugger log
    pub log_clear_ms: u64,
    /// Combo box switching to the selected entry
    pub combo_switch_ms: u64,
    /// Editor reacting to open/goto-line requests
    pub editor_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            object_ms: 20_000,
            debugger_start_ms: 60_000,
            start_failure_box_ms: 5_000,
            stop_ms: 20_000,
            continue_button_ms: 3_000,
            running_ms: 5_000,
            terminal_ms: 30_000,
            finish_output_ms: 20_000,
            warning_dialog_ms: 10_000,
            breakpoint_rows_ms: 2_000,
            breakpoint_removal_ms: 1_000,
            log_clear_ms: 5_000,
            combo_switch_ms: 5_000,
            editor_ms: 5_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    pub timeouts: Timeouts,
    /// Multiplier applied to every timeout
    pub timeout_scale: f64,
    pub poll_interval_ms: u64,
    pub host_os: HostOs,
    /// Where `write_results` puts its files; `None` skips writing
    pub results_dir: Option<PathBuf>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            timeouts: Timeouts::default(),
            timeout_scale: 1.0,
            poll_interval_ms: 100,
            host_os: HostOs::current(),
            results_dir: None,
        }
    }
}

impl DriverConfig {
    /// Defaults overridden by `IDE_AUTOTEST_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup (the environment in production,
    /// a map in tests). Unparseable values are ignored with a warning.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_TIMEOUT_SCALE) {
            match raw.trim().parse::<f64>() {
                Ok(scale) if scale > 0.0 && scale.is_finite() => self.timeout_scale = scale,
                _ => warn!("Ignoring invalid {}='{}'", ENV_TIMEOUT_SCALE, raw),
            }
        }
        if let Some(raw) = lookup(ENV_HOST_OS) {
            self.host_os = HostOs::parse(&raw);
        }
        if let Some(raw) = lookup(ENV_RESULTS_DIR) {
            if !raw.trim().is_empty() {
                self.results_dir = Some(PathBuf::from(raw.trim()));
            }
        }
        if let Some(raw) = lookup(ENV_POLL_INTERVAL_MS) {
            match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => self.poll_interval_ms = ms,
                _ => warn!("Ignoring invalid {}='{}'", ENV_POLL_INTERVAL_MS, raw),
            }
        }
        debug!("Driver config: {:?}", self);
        self
    }

    /// A configured timeout, scaled.
    pub fn timeout(&self, ms: u64) -> Duration {
        Duration::from_millis((ms as f64 * self.timeout_scale).round() as u64)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
