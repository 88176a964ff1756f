//! Host bridge, automation side.
//!
//! A one-directional, best-effort channel from the automation context to
//! the host shell. Delivery is not guaranteed: a closed channel is logged
//! and swallowed, because the host protects itself with its own timeout.

use tokio::sync::mpsc;
use tracing::{debug, error};

use cantine_protocols::HostMessage;

/// Sender half of the host bridge. Cheap to clone.
#[derive(Clone)]
pub struct HostBridge {
    tx: mpsc::UnboundedSender<String>,
}

impl HostBridge {
    /// Create a bridge and the raw receiver the host will drain.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Emit a message. Never fails from the caller's point of view.
    pub fn emit(&self, message: &HostMessage) {
        let raw = match serde_json::to_string(message) {
            Ok(raw) => raw,
            Err(e) => {
                error!(error = %e, "failed to serialize host message");
                return;
            }
        };
        if self.tx.send(raw).is_err() {
            debug!("host bridge closed; message dropped");
        }
    }
}
