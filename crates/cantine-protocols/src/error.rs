//! Error taxonomy for the automation core.
//!
//! Two deliberate absences, both part of the contract:
//!
//! - There is no `ElementNotFound` variant. `BrowsingSurface::locate`
//!   returns `Ok(None)` for a missing element; the retry layer polls until
//!   its ceiling and then abandons the attempt silently (logged only).
//! - There is no `MessageChannelUnavailable` variant. The host bridge is
//!   best-effort; a closed channel is swallowed and the host falls back to
//!   its own timeout-based reset.

use thiserror::Error;

/// Errors raised by the browsing surface capability.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The surface (or the page it hosted) is gone.
    #[error("browsing surface detached")]
    Detached,

    /// Script evaluation inside the remote context failed.
    #[error("script evaluation failed: {0}")]
    Evaluation(String),

    /// Transport-level failure talking to the surface.
    #[error("surface I/O error: {0}")]
    Io(String),
}

/// Errors raised by the reservation gateway.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The gateway answered with a non-success status.
    #[error("request failed with HTTP status {status}")]
    Http { status: u16 },

    /// The request never completed.
    #[error("network error: {0}")]
    Network(String),

    /// The gateway answered, but not with the expected JSON shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The identity response carried no usable user id. Fatal for a batch.
    #[error("identity response carried no user id")]
    MissingIdentity,
}
