//! Time-of-day mocking for the remote context.
//!
//! The portal opens and closes reservation windows based on the page's own
//! clock. For test and simulation runs the host can inject this preload
//! script, which proxies the context's `Date` so that parameterless
//! constructions, `Date()` calls and `Date.now()` all report a fixed mock
//! instant. Explicit-argument constructions pass through untouched.
//!
//! The script must run before any page code does, so it belongs in the
//! surface's pre-content injection stage.

/// Generator for the `Date`-mocking preload script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimewarpScript {
    /// Days to step back from the real "today".
    pub offset_days: u32,
    /// Mocked hour of day (minutes/seconds zeroed).
    pub hour: u32,
}

impl Default for TimewarpScript {
    /// Yesterday at 10:00, the portal's most useful simulation point: the
    /// previous day's reservation window is still open then.
    fn default() -> Self {
        Self {
            offset_days: 1,
            hour: 10,
        }
    }
}

impl TimewarpScript {
    pub fn new(offset_days: u32, hour: u32) -> Self {
        Self { offset_days, hour }
    }

    /// Render the preload script.
    pub fn render(&self) -> String {
        include_str!("timewarp.js")
            .replace("__OFFSET_DAYS__", &self.offset_days.to_string())
            .replace("__HOUR__", &self.hour.to_string())
    }
}
