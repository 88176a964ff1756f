//! Shared data types.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::message::BookingOutcome;

/// Stored login credentials. At most one set exists at a time (enforced by
/// the credential store); they leave the host only as typed parameters to
/// the login driver, never as interpolated script text.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Login identifier (mail address or account name).
    pub identifier: String,
    /// Login secret.
    pub secret: String,
}

impl Credentials {
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }
}

// Manual Debug: the secret must never reach logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// One reservation target: a calendar day plus the fixed service
/// configuration. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingTarget {
    pub date: NaiveDate,
    /// Time of day, `"HH:MM"`.
    pub time: String,
    pub organization_id: u32,
    pub service_id: u32,
}

/// An ordered batch of reservation targets with accumulated outcomes.
///
/// The orchestrator records one outcome per target, in date order, and
/// finalizes the batch exactly once.
#[derive(Debug, Clone)]
pub struct BookingBatch {
    targets: Vec<BookingTarget>,
    outcomes: Vec<BookingOutcome>,
}

impl BookingBatch {
    pub fn new(targets: Vec<BookingTarget>) -> Self {
        let capacity = targets.len();
        Self {
            targets,
            outcomes: Vec::with_capacity(capacity),
        }
    }

    pub fn targets(&self) -> &[BookingTarget] {
        &self.targets
    }

    pub fn record(&mut self, outcome: BookingOutcome) {
        self.outcomes.push(outcome);
    }

    /// Whether every target has an outcome.
    pub fn is_complete(&self) -> bool {
        self.outcomes.len() == self.targets.len()
    }

    /// Consume the batch, yielding the per-date outcomes in request order.
    pub fn into_outcomes(self) -> Vec<BookingOutcome> {
        self.outcomes
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
