//! Browsing surface capability.
//!
//! The embedded rendering engine is an external collaborator. The automation
//! core only assumes it can locate elements, inject a pre-content script,
//! share the session's cookies, and report structural changes of the
//! document. Any embedder that can do that (a webview bridge, a DevTools
//! connection, a mock document in tests) can drive the same state machines.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::error::SurfaceError;

/// A structural change of the remote document.
///
/// Carries no detail about *what* changed: the login driver only uses
/// mutations as a re-entry signal and re-inspects the document itself.
#[derive(Debug, Clone, Copy)]
pub struct MutationEvent {
    /// When the change was observed.
    pub observed_at: DateTime<Utc>,
}

impl MutationEvent {
    /// A mutation event stamped with the current time.
    pub fn now() -> Self {
        Self {
            observed_at: Utc::now(),
        }
    }
}

impl Default for MutationEvent {
    fn default() -> Self {
        Self::now()
    }
}

/// Notification events dispatched after programmatic value assignment.
///
/// Direct value assignment bypasses framework-level change detection on the
/// remote page, so the driver dispatches both of these after every fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyntheticEvent {
    Input,
    Change,
}

/// Handle to a located element inside the remote document.
#[async_trait]
pub trait ElementHandle: Send + Sync {
    /// Whether the element is visually ready: non-zero rendered size and not
    /// hidden via `display`, `visibility` or `opacity`.
    async fn is_visible(&self) -> Result<bool, SurfaceError>;

    /// Current value of the element (input fields).
    async fn value(&self) -> Result<String, SurfaceError>;

    /// Assign a value to the element.
    async fn set_value(&self, value: &str) -> Result<(), SurfaceError>;

    /// Dispatch a synthetic notification event on the element.
    async fn dispatch(&self, event: SyntheticEvent) -> Result<(), SurfaceError>;

    /// Click the element.
    async fn click(&self) -> Result<(), SurfaceError>;
}

/// The embedded browsing surface, reduced to what the automation needs.
#[async_trait]
pub trait BrowsingSurface: Send + Sync {
    /// Locate a single element by CSS selector. A missing element is
    /// `Ok(None)`, not an error: absence is an expected state the retry
    /// layer polls through.
    async fn locate(&self, selector: &str) -> Result<Option<Arc<dyn ElementHandle>>, SurfaceError>;

    /// The URL currently displayed.
    async fn current_url(&self) -> Result<String, SurfaceError>;

    /// Navigate to a URL.
    async fn navigate(&self, url: &str) -> Result<(), SurfaceError>;

    /// Force a full reload of the current content, bypassing caches.
    async fn reload(&self) -> Result<(), SurfaceError>;

    /// Inject a script that runs before the remote content loads.
    async fn inject_preload_script(&self, source: &str) -> Result<(), SurfaceError>;

    /// The session's cookies as a single `Cookie` header value. Shared
    /// between the page and every request the orchestrator issues.
    async fn cookie_header(&self) -> Result<String, SurfaceError>;

    /// Subscribe to document mutation events.
    fn mutations(&self) -> broadcast::Receiver<MutationEvent>;
}
