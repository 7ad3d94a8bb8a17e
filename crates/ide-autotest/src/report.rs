//! Pass/fail/warning/fatal sink shared by every helper.
//!
//! Nothing in the driver aborts a scenario because an expectation did not
//! hold; it records the outcome here and carries on with best-effort cleanup.

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
    Warning,
    /// The UI did not look like the script expects (tooling drift)
    Fatal,
    Log,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub timestamp: String,
    pub outcome: Outcome,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Counts per outcome category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub passes: usize,
    pub fails: usize,
    pub fatals: usize,
    pub warnings: usize,
    /// Number of `verify`/`compare` checks performed
    pub tests: usize,
}

impl Summary {
    pub fn succeeded(&self) -> bool {
        self.fails == 0 && self.fatals == 0
    }
}

#[derive(Debug, Default)]
pub struct Reporter {
    entries: Mutex<Vec<ReportEntry>>,
    tests: AtomicUsize,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, outcome: Outcome, message: &str, detail: Option<&str>) {
        match (outcome, detail) {
            (Outcome::Pass, _) => info!("PASS: {}", message),
            (Outcome::Log, None) => info!("{}", message),
            (Outcome::Log, Some(d)) => info!("{} {}", message, d),
            (Outcome::Warning, _) => warn!("WARNING: {} {}", message, detail.unwrap_or("")),
            (Outcome::Fail, _) => error!("FAIL: {} {}", message, detail.unwrap_or("")),
            (Outcome::Fatal, _) => error!("FATAL: {} {}", message, detail.unwrap_or("")),
        }
        let entry = ReportEntry {
            timestamp: Local::now().to_rfc3339(),
            outcome,
            message: message.to_string(),
            detail: detail.map(str::to_string),
        };
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry);
        }
    }

    fn count_test(&self) {
        self.tests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn log(&self, message: &str) {
        self.record(Outcome::Log, message, None);
    }

    pub fn log_detail(&self, message: &str, detail: &str) {
        self.record(Outcome::Log, message, Some(detail));
    }

    pub fn passes(&self, message: &str) {
        self.record(Outcome::Pass, message, None);
    }

    pub fn fail(&self, message: &str) {
        self.record(Outcome::Fail, message, None);
    }

    pub fn fail_detail(&self, message: &str, detail: &str) {
        self.record(Outcome::Fail, message, Some(detail));
    }

    pub fn warning(&self, message: &str) {
        self.record(Outcome::Warning, message, None);
    }

    pub fn fatal(&self, message: &str) {
        self.record(Outcome::Fatal, message, None);
    }

    /// Record a pass or fail depending on `condition` and return it.
    pub fn verify(&self, condition: bool, message: &str) -> bool {
        self.count_test();
        if condition {
            self.passes(message);
        } else {
            self.fail(message);
        }
        condition
    }

    /// Compare two values, recording the mismatch as a failure.
    pub fn compare<A, E>(&self, actual: A, expected: E, message: &str) -> bool
    where
        A: PartialEq<E> + Debug,
        E: Debug,
    {
        self.count_test();
        if actual == expected {
            self.passes(message);
            true
        } else {
            self.fail_detail(
                message,
                &format!("'{actual:?}' != '{expected:?}' (actual != expected)"),
            );
            false
        }
    }

    pub fn entries(&self) -> Vec<ReportEntry> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.entries
            .lock()
            .map(|e| e.iter().filter(|entry| entry.outcome == outcome).count())
            .unwrap_or(0)
    }

    /// Entries of one outcome whose message contains `needle`.
    pub fn find(&self, outcome: Outcome, needle: &str) -> Vec<ReportEntry> {
        self.entries()
            .into_iter()
            .filter(|e| e.outcome == outcome && e.message.contains(needle))
            .collect()
    }

    pub fn summary(&self) -> Summary {
        Summary {
            passes: self.count(Outcome::Pass),
            fails: self.count(Outcome::Fail),
            fatals: self.count(Outcome::Fatal),
            warnings: self.count(Outcome::Warning),
            tests: self.tests.load(Ordering::Relaxed),
        }
    }
}
