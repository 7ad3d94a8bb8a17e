use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use std::fs;
use std::path::Path;

const TEMPLATE: &str = r#"# Debugger scenario for ide-autotest
name: tst_simple_debug
suite: suite_debugger
kit: Desktop
# "Release" builds without debug information trigger the IDE's warning dialog
config: Debug
enable_qml: true

# One {file: line} entry per breakpoint, set in this order
breakpoints:
  - main.cpp: 10
  - main.cpp: 15

# Expected stops as indexes into `breakpoints` (default: each breakpoint once, in order)
# stops: [0, 1]

# The simulated IDE the scenario runs against
ide:
  project: untitled
  project_dir: /home/tester/untitled
  files:
    main.cpp: 40
  kits:
    - name: Desktop
  # Source locations the debuggee passes through, in execution order
  trace:
    - main.cpp: 8
    - main.cpp: 10
    - main.cpp: 15
  finishes: true

# Driver overrides (milliseconds); IDE_AUTOTEST_* environment variables win
# driver:
#   timeout_scale: 2.0
#   timeouts:
#     stop_ms: 20000
"#;

#[derive(Debug, Args)]
pub struct InitCommand {
    /// Where to write the scenario
    #[arg(default_value = "scenario.yaml")]
    path: String,

    /// Overwrite an existing file
    #[arg(long)]
    force: bool,
}

impl InitCommand {
    pub fn execute(&self) -> Result<()> {
        let path = Path::new(&self.path);

        if path.exists() && !self.force {
            return Err(anyhow::anyhow!(
                "'{}' already exists. Pass --force to overwrite it.",
                self.path
            ));
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(path, TEMPLATE).with_context(|| format!("Failed to create {}", self.path))?;

        println!("  {} Created {}", "✓".green(), self.path.cyan());
        self.print_success_message();
        Ok(())
    }

    fn print_success_message(&self) {
        println!();
        println!("{}", "Next steps:".bold());
        println!("  1. Adjust breakpoints and the trace to your project");
        println!("  2. {}", format!("ide-autotest run {}", self.path).cyan());
        println!();
    }
}
