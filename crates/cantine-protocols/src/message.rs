//! Host-bound messages.
//!
//! The automation context reports results to the host shell through a
//! one-directional, best-effort channel. Every message is a discriminated
//! payload tagged on `type`; the host must tolerate junk (treated as a
//! silent timeout), so parsing never raises.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Outcome of one per-date reservation attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingOutcome {
    /// The calendar day this outcome belongs to.
    pub date: NaiveDate,
    /// Whether the gateway accepted the reservation.
    pub success: bool,
    /// The gateway's success payload, `null` on failure.
    pub data: Option<serde_json::Value>,
}

impl BookingOutcome {
    /// A successful outcome with the gateway's payload.
    pub fn succeeded(date: NaiveDate, data: serde_json::Value) -> Self {
        Self {
            date,
            success: true,
            data: Some(data),
        }
    }

    /// A failed outcome. Failures never carry a payload.
    pub fn failed(date: NaiveDate) -> Self {
        Self {
            date,
            success: false,
            data: None,
        }
    }
}

/// Message from the automation context to the host shell.
///
/// Exactly one terminal message is emitted per batch invocation:
/// `weekly_booking_complete` xor `weekly_booking_error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostMessage {
    /// The batch ran to completion. Per-date failures are recorded in
    /// `results`; callers must inspect them to know the true outcome.
    WeeklyBookingComplete { results: Vec<BookingOutcome> },
    /// The batch died before the per-date loop started.
    WeeklyBookingError { message: String },
}

impl HostMessage {
    /// Parse a raw payload from the channel. Malformed or unrecognized
    /// payloads yield `None`; the channel has no delivery guarantee beyond
    /// best-effort, so the host treats them like a dropped message.
    pub fn parse(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
