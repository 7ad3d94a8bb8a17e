//! Scenario files: what to debug and what the simulated IDE looks like.

use anyhow::{bail, Context, Result};
use ide_autotest::sim::SimSetup;
use ide_autotest::{Breakpoint, DriverConfig, Kit};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Test case name, used for the result files
    pub name: String,
    #[serde(default = "default_suite")]
    pub suite: String,
    pub kit: String,
    /// Build configuration, e.g. "Debug" or "Release with Debug Information"
    #[serde(default = "default_config")]
    pub config: String,
    #[serde(default = "default_true")]
    pub enable_qml: bool,
    pub breakpoints: Vec<Breakpoint>,
    /// Expected stops as indexes into `breakpoints`; defaults to every breakpoint once, in order
    #[serde(default)]
    pub stops: Option<Vec<usize>>,
    #[serde(default)]
    pub ide: SimSetup,
    /// Driver settings; `IDE_AUTOTEST_*` environment variables still win
    #[serde(default)]
    pub driver: Option<DriverConfig>,
}

fn default_suite() -> String {
    "suite_debugger".to_string()
}

fn default_config() -> String {
    "Debug".to_string()
}

fn default_true() -> bool {
    true
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("Invalid scenario {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let scenario: Scenario = serde_yaml::from_str(raw)?;
        if let Some(stops) = &scenario.stops {
            if let Some(bad) = stops.iter().find(|&&i| i >= scenario.breakpoints.len()) {
                bail!(
                    "stop {bad} does not refer to one of the {} breakpoints",
                    scenario.breakpoints.len()
                );
            }
        }
        Ok(scenario)
    }

    pub fn kit(&self) -> Kit {
        Kit::new(&self.kit)
    }

    pub fn driver_config(&self) -> DriverConfig {
        self.driver
            .clone()
            .unwrap_or_default()
            .with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Expected stop order given the breakpoints as the IDE reported them.
    pub fn expected_stops(&self, set: &[Breakpoint]) -> Vec<Breakpoint> {
        match &self.stops {
            Some(order) => order.iter().filter_map(|&i| set.get(i).cloned()).collect(),
            None => set.to_vec(),
        }
    }
}
