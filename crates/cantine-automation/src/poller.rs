//! Bounded waiting primitives.
//!
//! [`RetryPoller`] answers "is this element interactive yet" at a fixed
//! short interval. [`RetrySession`] tracks whole-step retries with
//! exponential backoff and a hard attempt ceiling. Neither ever raises:
//! absence and exhaustion are ordinary return values.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, trace};

use cantine_protocols::{BrowsingSurface, ElementHandle};

/// Default poll interval for element waits.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Polls the surface until an element exists and is visually ready.
#[derive(Debug, Clone)]
pub struct RetryPoller {
    poll_interval: Duration,
}

impl Default for RetryPoller {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl RetryPoller {
    pub fn new(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }

    /// Wait until `selector` matches a visible element, up to `timeout`.
    ///
    /// Returns the handle or `None`; never errors. Surface failures during
    /// a poll are treated as "not present yet": a page mid-navigation
    /// looks exactly like a page that has not rendered the element.
    pub async fn wait_for(
        &self,
        surface: &dyn BrowsingSurface,
        selector: &str,
        timeout: Duration,
    ) -> Option<Arc<dyn ElementHandle>> {
        let deadline = Instant::now() + timeout;
        loop {
            match surface.locate(selector).await {
                Ok(Some(element)) => match element.is_visible().await {
                    Ok(true) => {
                        trace!(selector, "element ready");
                        return Some(element);
                    }
                    Ok(false) => trace!(selector, "element present but not visible"),
                    Err(e) => debug!(selector, error = %e, "visibility check failed"),
                },
                Ok(None) => {}
                Err(e) => debug!(selector, error = %e, "locate failed"),
            }

            if Instant::now() >= deadline {
                debug!(selector, ?timeout, "element wait timed out");
                return None;
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

/// Explicit retry state for one automation attempt series.
///
/// Created per page load, destroyed on success, exhaustion or navigation.
/// Replaces the ambient "already attempted" flags of a naive
/// implementation: every decision the driver makes about retrying reads
/// from here.
#[derive(Debug, Clone)]
pub struct RetrySession {
    attempt: u32,
    max_attempts: u32,
    initial_delay: Duration,
    growth_factor: f64,
    max_delay: Duration,
    started_at: Instant,
    terminal: bool,
}

impl RetrySession {
    pub fn new(
        max_attempts: u32,
        initial_delay: Duration,
        growth_factor: f64,
        max_delay: Duration,
    ) -> Self {
        Self {
            attempt: 0,
            max_attempts,
            initial_delay,
            growth_factor,
            max_delay,
            started_at: Instant::now(),
            terminal: false,
        }
    }

    /// Attempts recorded so far.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Backoff delay before the next attempt:
    /// `min(initial × growth^attempt, max)`. Non-decreasing for
    /// `growth >= 1`, always capped.
    pub fn current_delay(&self) -> Duration {
        let grown =
            self.initial_delay.as_millis() as f64 * self.growth_factor.powi(self.attempt as i32);
        let capped = grown.min(self.max_delay.as_millis() as f64);
        Duration::from_millis(capped as u64)
    }

    /// Record the start of an attempt. Marks the session terminal once the
    /// ceiling is reached.
    pub fn record_attempt(&mut self) {
        self.attempt += 1;
        if self.attempt >= self.max_attempts {
            self.terminal = true;
        }
    }

    /// Whether the ceiling has been reached.
    pub fn exhausted(&self) -> bool {
        self.terminal && self.attempt >= self.max_attempts
    }

    /// Mark the session finished (success path).
    pub fn finish(&mut self) {
        self.terminal = true;
    }

    /// Time since the session was created.
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

#[cfg(test)]
#[path = "poller_tests.rs"]
mod tests;
