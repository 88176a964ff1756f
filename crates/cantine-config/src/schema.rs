//! Configuration schema definitions.
//!
//! Every field carries a default matching the production portal, so an
//! empty TOML file yields a working configuration.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub portal: PortalConfig,

    #[serde(default)]
    pub login: LoginConfig,

    #[serde(default)]
    pub booking: BookingConfig,

    #[serde(default)]
    pub cache: CacheConfig,
}

/// The reservation portal: base URL and endpoint paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path the portal redirects to after a successful login; reaching it
    /// is the login driver's success criterion.
    #[serde(default = "default_landing_path")]
    pub landing_path: String,

    #[serde(default = "default_identity_path")]
    pub identity_path: String,

    #[serde(default = "default_bookings_path")]
    pub bookings_path: String,
}

impl PortalConfig {
    /// Absolute URL of the post-login landing page.
    pub fn landing_url(&self) -> String {
        format!("{}{}", self.base_url, self.landing_path)
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            landing_path: default_landing_path(),
            identity_path: default_identity_path(),
            bookings_path: default_bookings_path(),
        }
    }
}

fn default_base_url() -> String {
    "https://monrestoco.centre-valdeloire.fr".to_string()
}

fn default_landing_path() -> String {
    "/reservation/".to_string()
}

fn default_identity_path() -> String {
    "/api/v1/gateway/users/me".to_string()
}

fn default_bookings_path() -> String {
    "/api/v1/gateway/bookings".to_string()
}

/// Login form selectors and retry tuning.
///
/// The portal publishes no stable DOM contract; the selectors are the best
/// known ones and deliberately configurable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginConfig {
    #[serde(default = "default_username_selector")]
    pub username_selector: String,

    #[serde(default = "default_password_selector")]
    pub password_selector: String,

    #[serde(default = "default_submit_selector")]
    pub submit_selector: String,

    /// Role-selection control shown before the form on some sessions.
    #[serde(default = "default_profile_selector")]
    pub profile_selector: String,

    /// Attempt ceiling for the whole-step retry driver.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// First backoff delay, milliseconds.
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Exponential backoff growth factor.
    #[serde(default = "default_growth_factor")]
    pub growth_factor: f64,

    /// Backoff cap, milliseconds.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Pause after interactions that make the page re-render.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Per-element wait budget inside one attempt.
    #[serde(default = "default_element_timeout_ms")]
    pub element_timeout_ms: u64,

    /// Absolute budget for the post-submit redirect watch.
    #[serde(default = "default_verify_timeout_ms")]
    pub verify_timeout_ms: u64,

    /// Poll interval of the redirect watch.
    #[serde(default = "default_verify_poll_ms")]
    pub verify_poll_ms: u64,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            username_selector: default_username_selector(),
            password_selector: default_password_selector(),
            submit_selector: default_submit_selector(),
            profile_selector: default_profile_selector(),
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            growth_factor: default_growth_factor(),
            max_delay_ms: default_max_delay_ms(),
            settle_delay_ms: default_settle_delay_ms(),
            element_timeout_ms: default_element_timeout_ms(),
            verify_timeout_ms: default_verify_timeout_ms(),
            verify_poll_ms: default_verify_poll_ms(),
        }
    }
}

fn default_username_selector() -> String {
    "input[type=\"email\"], input[name=\"username\"]".to_string()
}

fn default_password_selector() -> String {
    "input[type=\"password\"]".to_string()
}

fn default_submit_selector() -> String {
    "button[type=\"submit\"]".to_string()
}

fn default_profile_selector() -> String {
    "[data-profile=\"guardian\"]".to_string()
}

fn default_max_attempts() -> u32 {
    5
}

fn default_initial_delay_ms() -> u64 {
    500
}

fn default_growth_factor() -> f64 {
    2.0
}

fn default_max_delay_ms() -> u64 {
    8000
}

fn default_settle_delay_ms() -> u64 {
    600
}

fn default_element_timeout_ms() -> u64 {
    5000
}

fn default_verify_timeout_ms() -> u64 {
    8000
}

fn default_verify_poll_ms() -> u64 {
    250
}

/// Fixed reservation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfig {
    #[serde(default = "default_organization_id")]
    pub organization_id: u32,

    #[serde(default = "default_service_id")]
    pub service_id: u32,

    /// Meal time, `"HH:MM"`.
    #[serde(default = "default_booking_time")]
    pub time: String,

    /// Pause between consecutive reservation requests; the gateway is
    /// assumed not to tolerate bursts.
    #[serde(default = "default_pacing_delay_ms")]
    pub pacing_delay_ms: u64,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            organization_id: default_organization_id(),
            service_id: default_service_id(),
            time: default_booking_time(),
            pacing_delay_ms: default_pacing_delay_ms(),
        }
    }
}

fn default_organization_id() -> u32 {
    1
}

fn default_service_id() -> u32 {
    2
}

fn default_booking_time() -> String {
    "11:30".to_string()
}

fn default_pacing_delay_ms() -> u64 {
    500
}

/// Daily cache invalidation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Local hour after which the day's first check forces a reload.
    #[serde(default = "default_boundary_hour")]
    pub boundary_hour: u32,

    #[serde(default = "default_check_interval_secs")]
    pub check_interval_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            boundary_hour: default_boundary_hour(),
            check_interval_secs: default_check_interval_secs(),
        }
    }
}

fn default_boundary_hour() -> u32 {
    14
}

fn default_check_interval_secs() -> u64 {
    300
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
