//! Host-shell side of the cantine automation core.
//!
//! The host owns the browsing surface, the persisted credential pair and
//! the cache-clear marker. This crate provides the pieces that sit between
//! the UI and the automation context:
//!
//! - [`HostShell`]: dispatches user commands, hooks page loads, tracks
//!   batch status.
//! - [`BridgeReceiver`]: drains the automation's message channel with
//!   tolerant parsing and a timeout fallback.
//! - [`CacheInvalidationScheduler`]: forces one full content reload per
//!   day after the boundary hour.

pub mod bridge_rx;
pub mod cache;
pub mod shell;

pub use bridge_rx::BridgeReceiver;
pub use cache::{should_clear, CacheInvalidationScheduler};
pub use shell::{BatchStatus, HostShell, ShellError};
