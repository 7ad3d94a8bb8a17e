//! Result files for CI collection
//!
//! Writes `<case>.srf` (one `category:count` line per outcome category) and
//! `<case>.json` (every report entry) into a results folder. The folder is
//! `IDE_AUTOTEST_RESULTS_DIR` when set, otherwise the platform data dir
//! (`~/.local/share/ide-autotest/results` on Linux).

use chrono::Local;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::report::Reporter;

/// Get the default results directory path
pub fn default_results_dir() -> PathBuf {
    match std::env::var(crate::config::ENV_RESULTS_DIR) {
        Ok(dir) if !dir.trim().is_empty() => {
            debug!("[results] Using results folder from environment: {}", dir);
            PathBuf::from(dir.trim())
        }
        _ => dirs::data_local_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("ide-autotest")
            .join("results"),
    }
}

/// Generate a timestamp-based case name
/// Format: YYYYMMDD_HHMMSS_operation
pub fn generate_case_name(operation: &str) -> String {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let clean_op = operation
        .replace("::", "_")
        .replace(' ', "_")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect::<String>();
    format!("{timestamp}_{clean_op}")
}

/// Render the `.srf` summary.
pub fn render_summary(report: &Reporter, suite: &str) -> String {
    let summary = report.summary();
    let mut out = format!("suite:{suite}\n");
    for (category, count) in [
        ("passes", summary.passes),
        ("fails", summary.fails),
        ("fatals", summary.fatals),
        ("errors", 0),
        ("tests", summary.tests),
        ("warnings", summary.warnings),
        ("xfails", 0),
        ("xpasses", 0),
    ] {
        out.push_str(&format!("{category}:{count}\n"));
    }
    out
}

/// Write the summary and the entry log for one test case.
///
/// Returns `Ok(None)` without writing anything when `folder` does not exist.
pub fn write_results(
    report: &Reporter,
    folder: &Path,
    suite: &str,
    case: &str,
) -> io::Result<Option<PathBuf>> {
    if !folder.is_dir() {
        info!(
            "Skipping writing test results (folder '{}' does not exist).",
            folder.display()
        );
        return Ok(None);
    }

    let summary_path = folder.join(format!("{case}.srf"));
    fs::write(&summary_path, render_summary(report, suite))?;

    let json = serde_json::to_string_pretty(&report.entries())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(folder.join(format!("{case}.json")), json)?;

    info!("[results] Wrote {}", summary_path.display());
    Ok(Some(summary_path))
}
