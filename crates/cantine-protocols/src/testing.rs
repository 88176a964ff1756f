//! In-memory test doubles for the capability traits.
//!
//! [`MockSurface`] is a scriptable document model: tests add elements,
//! flip visibility, rewrite the URL and emit mutation events, then assert
//! on recorded clicks, fills, navigations and preload injections.
//! [`ScriptedApi`] plays the reservation gateway with canned outcomes.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::api::{BookingRequest, Identity, ReservationApi};
use crate::error::{ApiError, SurfaceError};
use crate::surface::{BrowsingSurface, ElementHandle, MutationEvent, SyntheticEvent};

type ClickHook = Box<dyn Fn() + Send + Sync>;

/// A scriptable element.
#[derive(Default)]
pub struct MockElement {
    visible: Mutex<bool>,
    value: Mutex<String>,
    /// When set, `value()` always reads empty: models a page that clears
    /// the form on validation failure.
    wiped: Mutex<bool>,
    clicks: AtomicUsize,
    events: Mutex<Vec<SyntheticEvent>>,
    click_hook: Mutex<Option<ClickHook>>,
}

impl MockElement {
    pub fn visible() -> Arc<Self> {
        let element = Self::default();
        *element.visible.lock() = true;
        Arc::new(element)
    }

    pub fn hidden() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_visible(&self, visible: bool) {
        *self.visible.lock() = visible;
    }

    /// Make every subsequent `value()` read empty.
    pub fn wipe(&self) {
        *self.wiped.lock() = true;
    }

    /// Run `hook` whenever the element is clicked.
    pub fn on_click(&self, hook: impl Fn() + Send + Sync + 'static) {
        *self.click_hook.lock() = Some(Box::new(hook));
    }

    pub fn click_count(&self) -> usize {
        self.clicks.load(Ordering::SeqCst)
    }

    pub fn dispatched_events(&self) -> Vec<SyntheticEvent> {
        self.events.lock().clone()
    }

    pub fn current_value(&self) -> String {
        self.value.lock().clone()
    }
}

#[async_trait]
impl ElementHandle for MockElement {
    async fn is_visible(&self) -> Result<bool, SurfaceError> {
        Ok(*self.visible.lock())
    }

    async fn value(&self) -> Result<String, SurfaceError> {
        if *self.wiped.lock() {
            return Ok(String::new());
        }
        Ok(self.value.lock().clone())
    }

    async fn set_value(&self, value: &str) -> Result<(), SurfaceError> {
        *self.value.lock() = value.to_string();
        Ok(())
    }

    async fn dispatch(&self, event: SyntheticEvent) -> Result<(), SurfaceError> {
        self.events.lock().push(event);
        Ok(())
    }

    async fn click(&self) -> Result<(), SurfaceError> {
        self.clicks.fetch_add(1, Ordering::SeqCst);
        if let Some(hook) = self.click_hook.lock().as_ref() {
            hook();
        }
        Ok(())
    }
}

/// A scriptable browsing surface.
pub struct MockSurface {
    elements: Mutex<HashMap<String, Arc<MockElement>>>,
    url: Arc<Mutex<String>>,
    navigations: Mutex<Vec<String>>,
    reloads: AtomicUsize,
    preload_scripts: Mutex<Vec<String>>,
    cookie: Mutex<String>,
    mutation_tx: broadcast::Sender<MutationEvent>,
}

impl MockSurface {
    pub fn new(url: impl Into<String>) -> Self {
        let (mutation_tx, _) = broadcast::channel(32);
        Self {
            elements: Mutex::new(HashMap::new()),
            url: Arc::new(Mutex::new(url.into())),
            navigations: Mutex::new(Vec::new()),
            reloads: AtomicUsize::new(0),
            preload_scripts: Mutex::new(Vec::new()),
            cookie: Mutex::new(String::new()),
            mutation_tx,
        }
    }

    /// Register an element for a selector.
    pub fn add_element(&self, selector: impl Into<String>, element: Arc<MockElement>) {
        self.elements.lock().insert(selector.into(), element);
    }

    /// Handle to the URL cell, for click hooks that simulate a redirect.
    pub fn url_slot(&self) -> Arc<Mutex<String>> {
        self.url.clone()
    }

    pub fn set_url(&self, url: impl Into<String>) {
        *self.url.lock() = url.into();
    }

    pub fn set_cookie_header(&self, cookie: impl Into<String>) {
        *self.cookie.lock() = cookie.into();
    }

    /// Emit a document mutation event.
    pub fn emit_mutation(&self) {
        let _ = self.mutation_tx.send(MutationEvent::now());
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().clone()
    }

    pub fn reload_count(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }

    pub fn preload_scripts(&self) -> Vec<String> {
        self.preload_scripts.lock().clone()
    }
}

impl Default for MockSurface {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

#[async_trait]
impl BrowsingSurface for MockSurface {
    async fn locate(&self, selector: &str) -> Result<Option<Arc<dyn ElementHandle>>, SurfaceError> {
        Ok(self
            .elements
            .lock()
            .get(selector)
            .cloned()
            .map(|element| element as Arc<dyn ElementHandle>))
    }

    async fn current_url(&self) -> Result<String, SurfaceError> {
        Ok(self.url.lock().clone())
    }

    async fn navigate(&self, url: &str) -> Result<(), SurfaceError> {
        self.navigations.lock().push(url.to_string());
        *self.url.lock() = url.to_string();
        Ok(())
    }

    async fn reload(&self) -> Result<(), SurfaceError> {
        self.reloads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn inject_preload_script(&self, source: &str) -> Result<(), SurfaceError> {
        self.preload_scripts.lock().push(source.to_string());
        Ok(())
    }

    async fn cookie_header(&self) -> Result<String, SurfaceError> {
        Ok(self.cookie.lock().clone())
    }

    fn mutations(&self) -> broadcast::Receiver<MutationEvent> {
        self.mutation_tx.subscribe()
    }
}

/// A reservation gateway with canned outcomes.
#[derive(Default)]
pub struct ScriptedApi {
    identity: Mutex<Option<Identity>>,
    failing_dates: Mutex<HashSet<NaiveDate>>,
    requests: Mutex<Vec<BookingRequest>>,
}

impl ScriptedApi {
    /// A gateway that resolves the given user id and accepts every booking.
    pub fn with_user(user_id: impl Into<String>) -> Self {
        let api = Self::default();
        *api.identity.lock() = Some(Identity {
            user_id: user_id.into(),
        });
        api
    }

    /// A gateway whose identity resolution fails.
    pub fn without_identity() -> Self {
        Self::default()
    }

    /// Make bookings for `date` answer HTTP 500.
    pub fn fail_date(&self, date: NaiveDate) {
        self.failing_dates.lock().insert(date);
    }

    /// Requests received, in arrival order.
    pub fn requests(&self) -> Vec<BookingRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl ReservationApi for ScriptedApi {
    async fn resolve_identity(&self) -> Result<Identity, ApiError> {
        self.identity.lock().clone().ok_or(ApiError::MissingIdentity)
    }

    async fn create_booking(&self, request: &BookingRequest) -> Result<serde_json::Value, ApiError> {
        self.requests.lock().push(request.clone());
        if self.failing_dates.lock().contains(&request.date) {
            return Err(ApiError::Http { status: 500 });
        }
        Ok(serde_json::json!({ "date": request.date, "status": "confirmed" }))
    }
}
