//! Reservation gateway contract.
//!
//! The remote API is an external collaborator with a fixed contract: one
//! identity-resolution endpoint and one reservation endpoint. The wire shape
//! of [`BookingRequest`] (camelCase keys, ISO-8601 date, `"HH:MM"` time,
//! `origin: "WEB"`) is the gateway's, not ours.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// The resolved identity of the session's user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Gateway-side user identifier.
    pub user_id: String,
}

/// One reservation request, as the gateway expects it on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    /// Calendar day of the meal (serialized ISO-8601).
    pub date: NaiveDate,
    /// Time of day, `"HH:MM"`.
    pub time: String,
    pub user_id: String,
    pub organization_id: u32,
    pub service_id: u32,
    /// Fixed to `"WEB"`; the gateway rejects other origins.
    pub origin: String,
}

/// Authenticated access to the reservation gateway.
///
/// Implementations ride on the browsing surface's session cookies; requests
/// are not isolated from concurrent page-driven navigation (accepted risk).
#[async_trait]
pub trait ReservationApi: Send + Sync {
    /// Resolve the caller's identity. Failure here is fatal for a whole
    /// batch; the orchestrator never retries it.
    async fn resolve_identity(&self) -> Result<Identity, ApiError>;

    /// Issue one reservation request. Returns the gateway's JSON success
    /// payload; any non-2xx status is an error.
    async fn create_booking(&self, request: &BookingRequest) -> Result<serde_json::Value, ApiError>;
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
