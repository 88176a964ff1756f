//! Reservation gateway client.
//!
//! Rides on the browsing surface's session cookies: every request forwards
//! the surface's current `Cookie` header, so the gateway sees the same
//! authenticated session as the page itself. Requests are not isolated
//! from page-driven navigation; a navigation mid-batch can invalidate the
//! session, which surfaces as per-date HTTP failures.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, COOKIE};
use tracing::debug;

use cantine_config::PortalConfig;
use cantine_protocols::{ApiError, BookingRequest, BrowsingSurface, Identity, ReservationApi};

/// HTTP implementation of [`ReservationApi`].
pub struct GatewayClient {
    http: reqwest::Client,
    portal: PortalConfig,
    surface: Arc<dyn BrowsingSurface>,
}

impl GatewayClient {
    pub fn new(portal: PortalConfig, surface: Arc<dyn BrowsingSurface>) -> Self {
        Self {
            http: reqwest::Client::new(),
            portal,
            surface,
        }
    }

    /// Current session cookies. A surface failure degrades to an empty
    /// header; the gateway then answers 401 and the caller records the
    /// failure through the normal path.
    async fn cookies(&self) -> String {
        match self.surface.cookie_header().await {
            Ok(header) => header,
            Err(e) => {
                debug!(error = %e, "cookie read failed; sending unauthenticated request");
                String::new()
            }
        }
    }
}

#[async_trait]
impl ReservationApi for GatewayClient {
    async fn resolve_identity(&self) -> Result<Identity, ApiError> {
        let url = format!("{}{}", self.portal.base_url, self.portal.identity_path);
        let response = self
            .http
            .get(&url)
            .header(ACCEPT, "application/json, text/plain, */*")
            .header(COOKIE, self.cookies().await)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Http {
                status: status.as_u16(),
            });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ApiError::MalformedResponse(e.to_string()))?;

        let user_id = ["id", "userId"]
            .iter()
            .find_map(|key| id_as_string(body.get(*key)))
            .ok_or(ApiError::MissingIdentity)?;

        Ok(Identity { user_id })
    }

    async fn create_booking(&self, request: &BookingRequest) -> Result<serde_json::Value, ApiError> {
        let url = format!(
            "{}{}?organizationId={}",
            self.portal.base_url, self.portal.bookings_path, request.organization_id
        );
        let response = self
            .http
            .post(&url)
            .header(ACCEPT, "application/json, text/plain, */*")
            .header(COOKIE, self.cookies().await)
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Http {
                status: status.as_u16(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::MalformedResponse(e.to_string()))
    }
}

/// The gateway is inconsistent about id types; accept both.
fn id_as_string(value: Option<&serde_json::Value>) -> Option<String> {
    match value? {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
#[path = "gateway_tests.rs"]
mod tests;
