use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use ide_autotest::results::{generate_case_name, write_results};
use ide_autotest::sim::SimulatedIde;
use ide_autotest::{
    do_simple_debugging, set_breakpoints_for_current_project, Ide, Outcome, ReportEntry, Summary,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::cli::OutputFormat;
use crate::scenario::Scenario;

#[derive(Debug, Args)]
pub struct RunCommand {
    /// Scenario file (YAML)
    scenario: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    output: OutputFormat,

    /// Write <case>.srf and <case>.json here (created if missing)
    #[arg(long, env = "IDE_AUTOTEST_RESULTS_DIR")]
    results_dir: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct RunReport {
    scenario: String,
    suite: String,
    /// Whether the IDE was back out of debug mode at the end
    back_to_normal: bool,
    summary: Summary,
    entries: Vec<ReportEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    results_file: Option<PathBuf>,
}

impl RunCommand {
    /// Run the scenario; `Ok(false)` when it recorded failures.
    pub async fn execute(&self) -> Result<bool> {
        let scenario = Scenario::load(&self.scenario)?;
        let config = scenario.driver_config();
        let results_dir = self.results_dir.clone().or_else(|| config.results_dir.clone());

        info!("Running scenario '{}' with kit '{}'", scenario.name, scenario.kit);
        let harness = Arc::new(SimulatedIde::new(scenario.ide.clone()));
        let ide = Ide::new(harness, config);

        let back_to_normal =
            match set_breakpoints_for_current_project(&ide, &scenario.breakpoints).await? {
                Some(set) => {
                    let expected = scenario.expected_stops(&set);
                    do_simple_debugging(
                        &ide,
                        &scenario.kit(),
                        &scenario.config,
                        &expected,
                        scenario.enable_qml,
                    )
                    .await
                    .context("Debug session aborted")?
                }
                None => {
                    warn!("Breakpoints could not be set, skipping the debug session");
                    false
                }
            };

        let results_file = match results_dir {
            Some(dir) => {
                std::fs::create_dir_all(&dir)
                    .with_context(|| format!("Failed to create {}", dir.display()))?;
                write_results(
                    ide.report(),
                    &dir,
                    &scenario.suite,
                    &generate_case_name(&scenario.name),
                )
                .context("Failed to write test results")?
            }
            None => None,
        };

        let report = RunReport {
            scenario: scenario.name.clone(),
            suite: scenario.suite.clone(),
            back_to_normal,
            summary: ide.report().summary(),
            entries: ide.report().entries(),
            results_file,
        };
        match self.output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            OutputFormat::Human => print_human(&report),
        }
        Ok(report.summary.succeeded())
    }
}

fn print_human(report: &RunReport) {
    println!(
        "{} {}",
        "Scenario".bold(),
        format!("{} ({})", report.scenario, report.suite).cyan()
    );
    println!();
    for entry in &report.entries {
        let label = match entry.outcome {
            Outcome::Pass => "PASS   ".green(),
            Outcome::Fail => "FAIL   ".red(),
            Outcome::Fatal => "FATAL  ".red().bold(),
            Outcome::Warning => "WARNING".yellow(),
            Outcome::Log => "LOG    ".dimmed(),
        };
        match &entry.detail {
            Some(detail) => println!("  {label} {} {}", entry.message, detail.dimmed()),
            None => println!("  {label} {}", entry.message),
        }
    }
    println!();

    let s = &report.summary;
    let counts = format!(
        "{} passed, {} failed, {} fatal, {} warnings ({} checks)",
        s.passes, s.fails, s.fatals, s.warnings, s.tests
    );
    if s.succeeded() {
        println!("  {} {}", "✓".green(), counts);
    } else {
        println!("  {} {}", "✗".red(), counts);
    }
    if !report.back_to_normal {
        println!("  {} IDE did not return to its normal state", "!".yellow());
    }
    if let Some(path) = &report.results_file {
        println!("  Results written to {}", path.display().to_string().cyan());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"
name: tst_cli_debug
kit: Desktop
breakpoints:
  - main.cpp: 10
  - main.cpp: 15
ide:
  files:
    main.cpp: 40
  trace:
    - main.cpp: 10
    - main.cpp: 15
driver:
  host_os: linux
"#;

    fn command(dir: &std::path::Path, scenario: &str) -> RunCommand {
        let path = dir.join("scenario.yaml");
        std::fs::write(&path, scenario).expect("Should write scenario");
        RunCommand {
            scenario: path,
            output: OutputFormat::Json,
            results_dir: Some(dir.join("results")),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn passing_scenario_writes_results() {
        let dir = tempfile::tempdir().expect("temp dir");
        let succeeded = command(dir.path(), SCENARIO)
            .execute()
            .await
            .expect("Should run");
        assert!(succeeded);

        let srf: Vec<_> = std::fs::read_dir(dir.path().join("results"))
            .expect("results dir")
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|x| x == "srf"))
            .collect();
        assert_eq!(srf.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn wrong_stop_order_fails() {
        let dir = tempfile::tempdir().expect("temp dir");
        let scenario = SCENARIO.replace("breakpoints:", "stops: [1, 0]\nbreakpoints:");
        let succeeded = command(dir.path(), &scenario)
            .execute()
            .await
            .expect("Should run");
        assert!(!succeeded);
    }

    #[tokio::test]
    async fn missing_scenario_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let cmd = RunCommand {
            scenario: dir.path().join("nope.yaml"),
            output: OutputFormat::Human,
            results_dir: None,
        };
        let err = cmd.execute().await.expect_err("file does not exist");
        assert!(format!("{err:#}").contains("Failed to read scenario"));
    }
}
