//! Bounded polling over state owned by the application under test.
//!
//! Nothing in the IDE notifies us about changes, so every wait is a loop that
//! re-evaluates a probe until it holds or a deadline passes.

use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::debug;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Result of [`wait_for_value`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitOutcome<T> {
    /// The accepted value
    Satisfied(T),
    /// Deadline passed; carries the last value the probe produced, if any
    TimedOut(Option<T>),
}

impl<T> WaitOutcome<T> {
    pub fn is_satisfied(&self) -> bool {
        matches!(self, WaitOutcome::Satisfied(_))
    }

    /// The accepted value, or the last observed one on timeout.
    pub fn into_last(self) -> Option<T> {
        match self {
            WaitOutcome::Satisfied(v) => Some(v),
            WaitOutcome::TimedOut(v) => v,
        }
    }
}

/// Wait until `predicate` returns true or `timeout` elapses.
///
/// The predicate is always evaluated at least once, so a zero timeout is a
/// plain check.
pub async fn wait_for<F, Fut>(timeout: Duration, interval: Duration, mut predicate: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = Instant::now() + timeout;
    loop {
        if predicate().await {
            return true;
        }
        let now = Instant::now();
        if now >= deadline {
            debug!("wait_for gave up after {:?}", timeout);
            return false;
        }
        sleep(interval.min(deadline - now)).await;
    }
}

/// Poll `probe` until it yields a value `accept` agrees with.
///
/// A probe returning `None` (e.g. the widget is not there yet) counts as "not
/// yet" and does not replace the last observed value.
pub async fn wait_for_value<T, F, Fut, A>(
    timeout: Duration,
    interval: Duration,
    mut probe: F,
    accept: A,
) -> WaitOutcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
    A: Fn(&T) -> bool,
{
    let deadline = Instant::now() + timeout;
    let mut last = None;
    loop {
        if let Some(value) = probe().await {
            if accept(&value) {
                return WaitOutcome::Satisfied(value);
            }
            last = Some(value);
        }
        let now = Instant::now();
        if now >= deadline {
            debug!("wait_for_value gave up after {:?}", timeout);
            return WaitOutcome::TimedOut(last);
        }
        sleep(interval.min(deadline - now)).await;
    }
}
