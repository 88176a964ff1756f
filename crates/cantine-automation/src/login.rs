//! Disguised auto-login.
//!
//! The portal renders its login form at an unpredictable point after load
//! (sometimes only after a role-selection click), clears the form on
//! validation failure, and signals success only by redirecting to the
//! landing path. The driver is an explicit state machine:
//!
//! ```text
//! Idle → ProfileSelect → AwaitingFields → Filling → Submitted
//!                                    → Verified | GivenUp
//! ```
//!
//! Re-entry is mutation-driven: every structural change of the document may
//! re-invoke an attempt, but attempts are mutually exclusive (try-lock
//! guard) and capped by the [`RetrySession`] ceiling. Exhausting the
//! ceiling ends in `GivenUp` with a warning log and no error: an
//! already-authenticated page legitimately never shows a form, and a hard
//! failure here would be a false alarm. If observability requirements ever
//! tighten, this is the place to add a host-visible signal.
//!
//! Credentials arrive as typed parameters; no script text ever contains
//! them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use cantine_config::{LoginConfig, PortalConfig};
use cantine_protocols::{
    BrowsingSurface, Credentials, ElementHandle, SurfaceError, SyntheticEvent,
};

use crate::poller::{RetryPoller, RetrySession};

/// Login driver states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    Idle,
    /// Clicking the role-selection control, if the page shows one.
    ProfileSelect,
    /// Waiting for the three form controls to become interactive.
    AwaitingFields,
    Filling,
    Submitted,
    /// The landing path was reached.
    Verified,
    /// The attempt ceiling was exhausted without a verifiable login.
    GivenUp,
}

impl LoginState {
    /// States during which mutation-driven re-entry is suppressed.
    fn blocks_reentry(self) -> bool {
        matches!(
            self,
            LoginState::Filling | LoginState::Submitted | LoginState::Verified | LoginState::GivenUp
        )
    }
}

/// State machine that fills and submits the portal's login form.
///
/// One driver instance lives per page load; navigation or re-injection
/// discards it together with its retry state.
pub struct AutoLoginDriver {
    login: LoginConfig,
    portal: PortalConfig,
    poller: RetryPoller,
    state: Mutex<LoginState>,
    session: Mutex<RetrySession>,
    /// Serializes attempts: mutation events during an in-flight attempt
    /// must not start an overlapping one.
    attempt_guard: tokio::sync::Mutex<()>,
    profile_clicked: AtomicBool,
    fallback_issued: AtomicBool,
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

impl AutoLoginDriver {
    pub fn new(login: LoginConfig, portal: PortalConfig) -> Self {
        let session = RetrySession::new(
            login.max_attempts,
            ms(login.initial_delay_ms),
            login.growth_factor,
            ms(login.max_delay_ms),
        );
        Self {
            login,
            portal,
            poller: RetryPoller::default(),
            state: Mutex::new(LoginState::Idle),
            session: Mutex::new(session),
            attempt_guard: tokio::sync::Mutex::new(()),
            profile_clicked: AtomicBool::new(false),
            fallback_issued: AtomicBool::new(false),
        }
    }

    /// Current state.
    pub fn state(&self) -> LoginState {
        *self.state.lock()
    }

    fn set_state(&self, state: LoginState) {
        *self.state.lock() = state;
    }

    /// Drive the state machine until `Verified` or `GivenUp`.
    ///
    /// Runs one attempt immediately, then re-attempts on every document
    /// mutation or after the current backoff delay, whichever comes first.
    pub async fn run(&self, surface: &dyn BrowsingSurface, credentials: &Credentials) -> LoginState {
        let mut mutations = surface.mutations();
        loop {
            let state = self.attempt_once(surface, credentials).await;
            if matches!(state, LoginState::Verified | LoginState::GivenUp) {
                return state;
            }

            let backoff = self.session.lock().current_delay();
            tokio::select! {
                _ = tokio::time::sleep(backoff) => {}
                event = mutations.recv() => {
                    match event {
                        Ok(_) | Err(RecvError::Lagged(_)) => {}
                        // Mutation feed gone means the page itself is gone.
                        Err(RecvError::Closed) => return self.state(),
                    }
                }
            }
        }
    }

    /// Run a single guarded attempt.
    ///
    /// Safe to call from mutation callbacks: overlapping invocations return
    /// immediately with the current state, as do invocations while the
    /// machine is in a state that blocks re-entry.
    pub async fn attempt_once(
        &self,
        surface: &dyn BrowsingSurface,
        credentials: &Credentials,
    ) -> LoginState {
        let _guard = match self.attempt_guard.try_lock() {
            Ok(guard) => guard,
            Err(_) => return self.state(),
        };

        if self.state().blocks_reentry() {
            return self.state();
        }

        {
            let mut session = self.session.lock();
            if session.exhausted() {
                warn!(
                    attempts = session.attempt(),
                    "login attempt ceiling reached; giving up"
                );
                drop(session);
                self.set_state(LoginState::GivenUp);
                return LoginState::GivenUp;
            }
            session.record_attempt();
        }

        // A page already past login never shows the form.
        if self.landed(surface).await {
            self.session.lock().finish();
            self.set_state(LoginState::Verified);
            info!("already on the landing path; nothing to do");
            return LoginState::Verified;
        }

        self.select_profile(surface).await;

        self.set_state(LoginState::AwaitingFields);
        let timeout = ms(self.login.element_timeout_ms);
        let (username, password, submit) = tokio::join!(
            self.poller
                .wait_for(surface, &self.login.username_selector, timeout),
            self.poller
                .wait_for(surface, &self.login.password_selector, timeout),
            self.poller
                .wait_for(surface, &self.login.submit_selector, timeout),
        );
        let (Some(username), Some(password), Some(submit)) = (username, password, submit) else {
            debug!(
                attempt = self.session.lock().attempt(),
                "login form not interactive yet"
            );
            return LoginState::AwaitingFields;
        };

        self.set_state(LoginState::Filling);
        if let Err(e) = self.fill(&username, &password, credentials).await {
            warn!(error = %e, "filling login form failed");
            self.set_state(LoginState::AwaitingFields);
            return LoginState::AwaitingFields;
        }

        self.set_state(LoginState::Submitted);
        tokio::time::sleep(ms(self.login.settle_delay_ms)).await;

        // A validation failure clears the form under us; submitting empty
        // fields would only trip the portal's rate limiting.
        if !self.fields_still_hold(&username, &password, credentials).await {
            warn!("login form was cleared before submit; retrying");
            self.set_state(LoginState::AwaitingFields);
            return LoginState::AwaitingFields;
        }

        if let Err(e) = submit.click().await {
            warn!(error = %e, "submit click failed");
            self.set_state(LoginState::AwaitingFields);
            return LoginState::AwaitingFields;
        }
        debug!("login form submitted");

        self.verify(surface).await
    }

    /// Click the role-selection control once per page load, then let the
    /// page re-render the form.
    async fn select_profile(&self, surface: &dyn BrowsingSurface) {
        if self.profile_clicked.load(Ordering::SeqCst) {
            return;
        }
        let Ok(Some(control)) = surface.locate(&self.login.profile_selector).await else {
            return;
        };
        if !matches!(control.is_visible().await, Ok(true)) {
            return;
        }

        self.set_state(LoginState::ProfileSelect);
        if let Err(e) = control.click().await {
            debug!(error = %e, "profile selection click failed");
            return;
        }
        self.profile_clicked.store(true, Ordering::SeqCst);
        debug!("profile selected; waiting for the form to re-render");
        tokio::time::sleep(ms(self.login.settle_delay_ms)).await;
    }

    async fn fill(
        &self,
        username: &Arc<dyn ElementHandle>,
        password: &Arc<dyn ElementHandle>,
        credentials: &Credentials,
    ) -> Result<(), SurfaceError> {
        fill_field(username, &credentials.identifier).await?;
        fill_field(password, &credentials.secret).await?;
        Ok(())
    }

    async fn fields_still_hold(
        &self,
        username: &Arc<dyn ElementHandle>,
        password: &Arc<dyn ElementHandle>,
        credentials: &Credentials,
    ) -> bool {
        let username_ok = matches!(username.value().await, Ok(v) if v == credentials.identifier);
        let password_ok = matches!(password.value().await, Ok(v) if v == credentials.secret);
        username_ok && password_ok
    }

    /// Watch the location until the landing path is reached or the absolute
    /// timeout fires; on timeout, issue the fallback navigation once.
    async fn verify(&self, surface: &dyn BrowsingSurface) -> LoginState {
        let deadline = Instant::now() + ms(self.login.verify_timeout_ms);
        loop {
            if self.landed(surface).await {
                self.session.lock().finish();
                self.set_state(LoginState::Verified);
                info!("login verified by redirect");
                return LoginState::Verified;
            }

            if Instant::now() >= deadline {
                if !self.fallback_issued.swap(true, Ordering::SeqCst) {
                    let target = self.portal.landing_url();
                    warn!(%target, "redirect watch timed out; issuing fallback navigation");
                    if let Err(e) = surface.navigate(&target).await {
                        debug!(error = %e, "fallback navigation failed");
                    }
                }
                self.set_state(LoginState::AwaitingFields);
                return LoginState::AwaitingFields;
            }

            tokio::time::sleep(ms(self.login.verify_poll_ms)).await;
        }
    }

    async fn landed(&self, surface: &dyn BrowsingSurface) -> bool {
        let Ok(url) = surface.current_url().await else {
            return false;
        };
        let landing = self.portal.landing_url();
        match url.strip_prefix(&landing) {
            Some(rest) => rest.is_empty() || rest.starts_with('?') || rest.starts_with('#'),
            None => false,
        }
    }
}

/// Assign a value and dispatch the notification events the page's reactive
/// bindings listen for; a bare assignment is invisible to them.
async fn fill_field(element: &Arc<dyn ElementHandle>, value: &str) -> Result<(), SurfaceError> {
    element.set_value(value).await?;
    element.dispatch(SyntheticEvent::Input).await?;
    element.dispatch(SyntheticEvent::Change).await?;
    Ok(())
}

#[cfg(test)]
#[path = "login_tests.rs"]
mod tests;
