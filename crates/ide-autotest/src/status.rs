//! Debugger state as shown by the debugger toolbar's status label.

use once_cell::sync::Lazy;
use regex::Regex;

pub const RUNNING_TEXT: &str = "Running.";
pub const FINISHED_TEXT: &str = "Debugger finished.";

static STOPPED_AT_BREAKPOINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Stopped at breakpoint (\d+) in thread (\d+)\.").expect("valid regex")
});
static STOPPED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Stopped\.").expect("valid regex"));

/// Status label text, parsed once per poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebuggerStatus {
    /// `Stopped.`
    Stopped,
    /// `Stopped at breakpoint N in thread M.`
    StoppedAtBreakpoint { breakpoint: u32, thread: u32 },
    /// `Running.`
    Running,
    /// `Debugger finished.`
    Finished,
    /// Anything else, kept verbatim for reporting
    Other(String),
}

impl DebuggerStatus {
    pub fn parse(text: &str) -> Self {
        if text == RUNNING_TEXT {
            return DebuggerStatus::Running;
        }
        if text == FINISHED_TEXT {
            return DebuggerStatus::Finished;
        }
        if let Some(caps) = STOPPED_AT_BREAKPOINT.captures(text) {
            let breakpoint = caps[1].parse().ok();
            let thread = caps[2].parse().ok();
            if let (Some(breakpoint), Some(thread)) = (breakpoint, thread) {
                return DebuggerStatus::StoppedAtBreakpoint { breakpoint, thread };
            }
        }
        if STOPPED.is_match(text) {
            return DebuggerStatus::Stopped;
        }
        DebuggerStatus::Other(text.to_string())
    }

    pub fn is_stopped(&self) -> bool {
        matches!(
            self,
            DebuggerStatus::Stopped | DebuggerStatus::StoppedAtBreakpoint { .. }
        )
    }

    /// `Running.` or `Debugger finished.`
    pub fn is_terminal(&self) -> bool {
        matches!(self, DebuggerStatus::Running | DebuggerStatus::Finished)
    }
}

impl std::fmt::Display for DebuggerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DebuggerStatus::Stopped => write!(f, "Stopped."),
            DebuggerStatus::StoppedAtBreakpoint { breakpoint, thread } => {
                write!(f, "Stopped at breakpoint {breakpoint} in thread {thread}.")
            }
            DebuggerStatus::Running => write!(f, "{RUNNING_TEXT}"),
            DebuggerStatus::Finished => write!(f, "{FINISHED_TEXT}"),
            DebuggerStatus::Other(text) => write!(f, "{text}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_phrases() {
        assert_eq!(DebuggerStatus::parse("Stopped."), DebuggerStatus::Stopped);
        assert_eq!(
            DebuggerStatus::parse("Stopped at breakpoint 3 in thread 1."),
            DebuggerStatus::StoppedAtBreakpoint {
                breakpoint: 3,
                thread: 1
            }
        );
        assert_eq!(DebuggerStatus::parse("Running."), DebuggerStatus::Running);
        assert_eq!(
            DebuggerStatus::parse("Debugger finished."),
            DebuggerStatus::Finished
        );
    }

    #[test]
    fn stop_phrases_match_as_prefix() {
        assert!(DebuggerStatus::parse("Stopped. (SIGINT)").is_stopped());
        assert!(DebuggerStatus::parse("Stopped at breakpoint 12 in thread 7. extra").is_stopped());
    }

    #[test]
    fn running_and_finished_are_exact() {
        assert_eq!(
            DebuggerStatus::parse("Running..."),
            DebuggerStatus::Other("Running...".to_string())
        );
        assert!(!DebuggerStatus::parse(" Debugger finished.").is_terminal());
        assert!(!DebuggerStatus::parse("Stopped at breakpoint x in thread 1.").is_terminal());
    }

    #[test]
    fn display_reproduces_label_text() {
        for text in [
            "Stopped.",
            "Stopped at breakpoint 2 in thread 5.",
            "Running.",
            "Debugger finished.",
            "Setting breakpoints...",
        ] {
            assert_eq!(DebuggerStatus::parse(text).to_string(), text);
        }
    }
}
