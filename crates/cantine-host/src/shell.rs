//! Command dispatch for the host shell.
//!
//! [`HostShell`] is the seam between the UI and the automation context. It
//! owns the surface handle, the persisted credentials and the batch status
//! the UI renders. Commands are validated here; the actual work runs in
//! spawned tasks and reports back through the bridge, which the shell
//! drains with a timeout so a lost message degrades into an idle UI rather
//! than a stuck spinner.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, info};

use cantine_automation::{AutoLoginDriver, BookingBatchOrchestrator, HostBridge, TimewarpScript};
use cantine_config::{Config, CredentialStore, StoreError};
use cantine_protocols::{
    BookingOutcome, BrowsingSurface, Clock, Credentials, HostCommand, HostMessage, ReservationApi,
    SurfaceError, MAX_WEEK_OFFSET,
};

use crate::bridge_rx::BridgeReceiver;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("week offset {offset} exceeds the maximum of {MAX_WEEK_OFFSET}")]
    InvalidWeekOffset { offset: u8 },

    #[error("a booking batch is already running")]
    BatchRunning,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// What the UI shows about the weekly batch.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchStatus {
    Idle,
    Running,
    Complete(Vec<BookingOutcome>),
    Failed(String),
}

/// Dispatches UI commands and tracks batch status.
pub struct HostShell {
    surface: Arc<dyn BrowsingSurface>,
    config: Config,
    credentials: Arc<dyn CredentialStore>,
    api: Arc<dyn ReservationApi>,
    clock: Arc<dyn Clock>,
    bridge: HostBridge,
    receiver: tokio::sync::Mutex<BridgeReceiver>,
    status: Mutex<BatchStatus>,
    time_travel: AtomicBool,
}

impl HostShell {
    pub fn new(
        surface: Arc<dyn BrowsingSurface>,
        config: Config,
        credentials: Arc<dyn CredentialStore>,
        api: Arc<dyn ReservationApi>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (bridge, rx) = HostBridge::channel();
        Self {
            surface,
            config,
            credentials,
            api,
            clock,
            bridge,
            receiver: tokio::sync::Mutex::new(BridgeReceiver::new(rx)),
            status: Mutex::new(BatchStatus::Idle),
            time_travel: AtomicBool::new(false),
        }
    }

    pub fn status(&self) -> BatchStatus {
        self.status.lock().clone()
    }

    pub fn time_travel_active(&self) -> bool {
        self.time_travel.load(Ordering::SeqCst)
    }

    /// Validate and dispatch one UI command.
    ///
    /// `RunBatch` returns as soon as the batch task is spawned; its outcome
    /// arrives later via [`HostShell::await_batch_result`].
    pub async fn handle_command(&self, command: HostCommand) -> Result<(), ShellError> {
        match command {
            HostCommand::RunBatch { week_offset } => {
                if week_offset > MAX_WEEK_OFFSET {
                    return Err(ShellError::InvalidWeekOffset {
                        offset: week_offset,
                    });
                }
                {
                    let mut status = self.status.lock();
                    if matches!(*status, BatchStatus::Running) {
                        return Err(ShellError::BatchRunning);
                    }
                    *status = BatchStatus::Running;
                }
                info!(week_offset, "dispatching weekly booking batch");
                let orchestrator = BookingBatchOrchestrator::new(
                    self.api.clone(),
                    self.bridge.clone(),
                    self.clock.clone(),
                    self.config.booking.clone(),
                );
                tokio::spawn(async move {
                    orchestrator.run_batch(week_offset).await;
                });
                Ok(())
            }
            HostCommand::ToggleTimeTravel { active } => {
                self.time_travel.store(active, Ordering::SeqCst);
                info!(active, "time travel toggled; reloading");
                // The preload script only takes effect on a fresh load.
                self.surface.reload().await?;
                Ok(())
            }
            HostCommand::Reload => {
                self.surface.reload().await?;
                Ok(())
            }
        }
    }

    /// Wait for the running batch's terminal message, at most `wait`.
    ///
    /// Updates and returns the batch status. The bridge is best-effort, so
    /// a timeout resets to `Idle` instead of reporting an error the user
    /// never caused.
    pub async fn await_batch_result(&self, wait: Duration) -> BatchStatus {
        let message = self.receiver.lock().await.recv_with_timeout(wait).await;
        let status = match message {
            Some(HostMessage::WeeklyBookingComplete { results }) => BatchStatus::Complete(results),
            Some(HostMessage::WeeklyBookingError { message }) => BatchStatus::Failed(message),
            None => {
                debug!("no terminal batch message arrived; resetting to idle");
                BatchStatus::Idle
            }
        };
        *self.status.lock() = status.clone();
        status
    }

    /// Hook for every fresh page load of the surface.
    ///
    /// Installs the time-mocking preload when active, then starts a fresh
    /// login driver if credentials are on file. The previous page's driver
    /// died with its page; retry state never survives a load.
    pub async fn on_page_loaded(&self) -> Result<(), ShellError> {
        if self.time_travel_active() {
            self.surface
                .inject_preload_script(&TimewarpScript::default().render())
                .await?;
        }

        if let Some(credentials) = self.credentials.load().await? {
            let driver =
                AutoLoginDriver::new(self.config.login.clone(), self.config.portal.clone());
            let surface = self.surface.clone();
            tokio::spawn(async move {
                let state = driver.run(surface.as_ref(), &credentials).await;
                debug!(?state, "login driver finished");
            });
        }
        Ok(())
    }

    pub async fn save_credentials(&self, credentials: &Credentials) -> Result<(), ShellError> {
        self.credentials.save(credentials).await?;
        Ok(())
    }

    pub async fn clear_credentials(&self) -> Result<(), ShellError> {
        self.credentials.clear().await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "shell_tests.rs"]
mod tests;
