//! Scripted multi-day booking.
//!
//! One invocation books the five weekdays of a target week, strictly
//! sequentially and in date order. The gateway is assumed not to tolerate
//! bursts, so a fixed pacing delay separates consecutive requests.
//!
//! Failure semantics are two-tiered: identity resolution failing kills the
//! whole batch with a single `weekly_booking_error`; a per-date failure is
//! recorded as an unsuccessful outcome and the batch carries on. Either
//! way, exactly one terminal message reaches the host per invocation.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, Days, NaiveDate};
use tracing::{debug, info, warn};

use cantine_config::BookingConfig;
use cantine_protocols::{
    BookingBatch, BookingOutcome, BookingRequest, BookingTarget, Clock, HostMessage,
    ReservationApi,
};

use crate::bridge::HostBridge;

/// Number of days booked per batch: Monday through Friday.
const WEEKDAYS_PER_BATCH: u64 = 5;

/// Monday of the week `week_offset` weeks after the week containing
/// `today`. Deterministic and idempotent for a fixed reference date;
/// Sunday counts as six days after its week's Monday.
pub fn compute_week_monday(today: NaiveDate, week_offset: u8) -> NaiveDate {
    let shifted = today + Days::new(7 * week_offset as u64);
    shifted - Days::new(shifted.weekday().num_days_from_monday() as u64)
}

/// The five weekday targets of the week starting at `monday`, in date
/// order, with the fixed service configuration applied.
pub fn weekday_targets(monday: NaiveDate, config: &BookingConfig) -> Vec<BookingTarget> {
    (0..WEEKDAYS_PER_BATCH)
        .map(|offset| BookingTarget {
            date: monday + Days::new(offset),
            time: config.time.clone(),
            organization_id: config.organization_id,
            service_id: config.service_id,
        })
        .collect()
}

/// Books a week of meals and reports the outcome through the host bridge.
pub struct BookingBatchOrchestrator {
    api: Arc<dyn ReservationApi>,
    bridge: HostBridge,
    clock: Arc<dyn Clock>,
    config: BookingConfig,
}

impl BookingBatchOrchestrator {
    pub fn new(
        api: Arc<dyn ReservationApi>,
        bridge: HostBridge,
        clock: Arc<dyn Clock>,
        config: BookingConfig,
    ) -> Self {
        Self {
            api,
            bridge,
            clock,
            config,
        }
    }

    /// Run one batch for the week `week_offset` weeks ahead.
    ///
    /// The result is delivered asynchronously through the bridge; this
    /// method itself never fails. Exactly one terminal message is emitted:
    /// `weekly_booking_complete` xor `weekly_booking_error`.
    pub async fn run_batch(&self, week_offset: u8) {
        let monday = compute_week_monday(self.clock.today(), week_offset);
        let targets = weekday_targets(monday, &self.config);
        let mut batch = BookingBatch::new(targets.clone());
        info!(%monday, week_offset, "starting weekly booking batch");

        let identity = match self.api.resolve_identity().await {
            Ok(identity) => identity,
            Err(e) => {
                warn!(error = %e, "identity resolution failed; aborting batch");
                self.bridge.emit(&HostMessage::WeeklyBookingError {
                    message: format!("identity resolution failed: {e}"),
                });
                return;
            }
        };
        debug!(user_id = %identity.user_id, "identity resolved");

        let total = targets.len();
        for (index, target) in targets.iter().enumerate() {
            let request = BookingRequest {
                date: target.date,
                time: target.time.clone(),
                user_id: identity.user_id.clone(),
                organization_id: target.organization_id,
                service_id: target.service_id,
                origin: "WEB".to_string(),
            };

            let outcome = match self.api.create_booking(&request).await {
                Ok(data) => {
                    debug!(date = %target.date, "booking accepted");
                    BookingOutcome::succeeded(target.date, data)
                }
                Err(e) => {
                    // Partial failure: record and keep going.
                    warn!(date = %target.date, error = %e, "booking failed");
                    BookingOutcome::failed(target.date)
                }
            };
            batch.record(outcome);

            if index + 1 < total {
                tokio::time::sleep(Duration::from_millis(self.config.pacing_delay_ms)).await;
            }
        }

        debug_assert!(batch.is_complete());
        let results = batch.into_outcomes();
        info!(
            succeeded = results.iter().filter(|o| o.success).count(),
            total,
            "weekly booking batch finished"
        );
        self.bridge
            .emit(&HostMessage::WeeklyBookingComplete { results });
    }
}

#[cfg(test)]
#[path = "booking_tests.rs"]
mod tests;
