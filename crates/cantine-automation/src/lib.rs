//! DOM automation core for the cantine shell.
//!
//! The reservation portal publishes no stable DOM contract and re-renders
//! at unpredictable times, so everything here is built around bounded
//! waiting and explicit state:
//!
//! - [`RetryPoller`] / [`RetrySession`]: poll for visually-ready elements;
//!   cap whole-step retries with exponential backoff.
//! - [`AutoLoginDriver`]: detect the login form, fill it, submit, verify
//!   the redirect, or give up silently after the attempt ceiling.
//! - [`BookingBatchOrchestrator`]: book the five weekdays of a target week,
//!   strictly sequentially, and report exactly one terminal message.
//! - [`GatewayClient`]: the reqwest-backed gateway implementation riding on
//!   the surface's session cookies.
//! - [`TimewarpScript`]: preload script that mocks the remote context's
//!   time of day.
//! - [`HostBridge`]: best-effort message channel back to the host shell.
//!
//! All waits are cooperative (`tokio::time`); nothing here blocks a thread
//! or runs concurrently with itself.

pub mod booking;
pub mod bridge;
pub mod gateway;
pub mod login;
pub mod poller;
pub mod timewarp;

pub use booking::{compute_week_monday, weekday_targets, BookingBatchOrchestrator};
pub use bridge::HostBridge;
pub use gateway::GatewayClient;
pub use login::{AutoLoginDriver, LoginState};
pub use poller::{RetryPoller, RetrySession};
pub use timewarp::TimewarpScript;
