//! Daily cache invalidation.
//!
//! The portal publishes the next day's menu in the early afternoon, but
//! the surface's HTTP cache happily serves yesterday's content. A periodic
//! host-side check forces one full reload per day, the first time "now"
//! crosses the boundary hour after the previous clear.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use tracing::{info, warn};

use cantine_config::{CacheConfig, ClearMarkerStore, StoreError};
use cantine_protocols::{BrowsingSurface, Clock};

/// Whether a clear is due.
///
/// Due when no clear was ever recorded, or when `now` is at/after today's
/// boundary while the last clear happened before it. Idempotent within a
/// day: once a clear is recorded after the boundary, later checks the same
/// day are not due.
pub fn should_clear(
    now: DateTime<Local>,
    boundary_hour: u32,
    last_clear: Option<DateTime<Local>>,
) -> bool {
    let Some(last) = last_clear else {
        // First run: no marker yet.
        return true;
    };
    let Some(boundary) = now.date_naive().and_hms_opt(boundary_hour, 0, 0) else {
        return false;
    };
    now.naive_local() >= boundary && last.naive_local() < boundary
}

/// Periodic trigger that reloads the surface once per day.
pub struct CacheInvalidationScheduler {
    surface: Arc<dyn BrowsingSurface>,
    store: Arc<dyn ClearMarkerStore>,
    clock: Arc<dyn Clock>,
    config: CacheConfig,
}

impl CacheInvalidationScheduler {
    pub fn new(
        surface: Arc<dyn BrowsingSurface>,
        store: Arc<dyn ClearMarkerStore>,
        clock: Arc<dyn Clock>,
        config: CacheConfig,
    ) -> Self {
        Self {
            surface,
            store,
            clock,
            config,
        }
    }

    /// Run one check. Returns whether a clear was triggered.
    ///
    /// The marker is only recorded after a successful reload, so a failed
    /// reload is retried on the next tick.
    pub async fn tick(&self) -> Result<bool, StoreError> {
        let now = self.clock.now();
        let last = self.store.last_clear().await?;

        if !should_clear(now, self.config.boundary_hour, last) {
            return Ok(false);
        }

        if let Err(e) = self.surface.reload().await {
            warn!(error = %e, "cache clear reload failed; will retry next tick");
            return Ok(false);
        }

        self.store.record_clear(now).await?;
        info!(%now, "daily cache clear triggered");
        Ok(true)
    }

    /// Check forever at the configured interval. Runs independently of
    /// page content; store failures are logged and the loop keeps going.
    pub async fn run(&self) {
        let mut interval =
            tokio::time::interval(Duration::from_secs(self.config.check_interval_secs));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            if let Err(e) = self.tick().await {
                warn!(error = %e, "cache clear check failed");
            }
        }
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
