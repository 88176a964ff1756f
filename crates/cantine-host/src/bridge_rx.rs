//! Host bridge, receiving side.
//!
//! The channel from the automation context is best-effort: payloads may be
//! malformed, duplicated by a re-injected script, or never arrive at all.
//! Malformed payloads are skipped silently; absence is handled by the
//! caller's timeout, after which the host resets its UI on its own.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::debug;

use cantine_protocols::HostMessage;

/// Drains raw bridge payloads into parsed [`HostMessage`]s.
pub struct BridgeReceiver {
    rx: mpsc::UnboundedReceiver<String>,
}

impl BridgeReceiver {
    pub fn new(rx: mpsc::UnboundedReceiver<String>) -> Self {
        Self { rx }
    }

    /// Receive the next well-formed message; `None` once the channel is
    /// closed and drained.
    pub async fn recv(&mut self) -> Option<HostMessage> {
        while let Some(raw) = self.rx.recv().await {
            match HostMessage::parse(&raw) {
                Some(message) => return Some(message),
                None => debug!(payload_len = raw.len(), "discarding malformed bridge payload"),
            }
        }
        None
    }

    /// Receive the next well-formed message, waiting at most `wait`.
    pub async fn recv_with_timeout(&mut self, wait: Duration) -> Option<HostMessage> {
        tokio::time::timeout(wait, self.recv()).await.ok().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cantine_protocols::BookingOutcome;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_skips_malformed_payloads() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut receiver = BridgeReceiver::new(rx);

        tx.send("garbage".to_string()).unwrap();
        tx.send(r#"{"type":"unknown"}"#.to_string()).unwrap();
        let message = HostMessage::WeeklyBookingComplete {
            results: vec![BookingOutcome::failed(
                NaiveDate::from_ymd_opt(2026, 9, 7).unwrap(),
            )],
        };
        tx.send(serde_json::to_string(&message).unwrap()).unwrap();

        assert_eq!(receiver.recv().await, Some(message));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_when_nothing_arrives() {
        let (_tx, rx) = mpsc::unbounded_channel::<String>();
        let mut receiver = BridgeReceiver::new(rx);

        let result = receiver.recv_with_timeout(Duration::from_secs(5)).await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_closed_channel_yields_none() {
        let (tx, rx) = mpsc::unbounded_channel::<String>();
        drop(tx);
        let mut receiver = BridgeReceiver::new(rx);
        assert!(receiver.recv().await.is_none());
    }
}
