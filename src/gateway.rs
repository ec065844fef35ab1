//! Authorized request gateway.
//!
//! Wraps outbound HTTP calls to the back-office API: attaches the current
//! access token as a bearer header and recovers transparently from token
//! expiry. A 401 triggers exactly one refresh-and-retry cycle per logical
//! request; every other failure (timeouts, 5xx, non-401 4xx) passes through
//! to the caller untouched.

use crate::error::{BackofficeLinkError, Result};
use crate::models::ErrorDetail;
use crate::session::SessionStore;
use crate::timeouts::BackofficeTimeouts;
use log::{debug, warn};
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Centralizes credential attachment and 401 recovery for API calls.
///
/// Constructed by [`crate::BackofficeClient`] with the session store injected
/// explicitly, so the interception logic needs no ambient global state.
#[derive(Clone)]
pub struct Gateway {
    base_url: String,
    http: reqwest::Client,
    session: Arc<SessionStore>,
    timeouts: BackofficeTimeouts,
}

impl Gateway {
    pub(crate) fn new(
        base_url: String,
        http: reqwest::Client,
        session: Arc<SessionStore>,
        timeouts: BackofficeTimeouts,
    ) -> Self {
        Self {
            base_url,
            http,
            session,
            timeouts,
        }
    }

    /// Base URL the gateway targets.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Session store backing this gateway.
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Send an authorized request, recovering once from an expired token.
    ///
    /// The request body is rebuilt per attempt (bodied requests cannot be
    /// cloned), with an explicit retried flag bounding recovery to a single
    /// cycle. The returned response may carry any status; use the typed
    /// helpers to convert non-success statuses into errors.
    pub async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url, path);
        let mut token = self.session.access_token();
        let mut retried = false;

        loop {
            let mut request = self.http.request(method.clone(), &url);
            if let Some(token) = &token {
                request = request.bearer_auth(token);
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            debug!(
                "[GATEWAY] {} {}{}",
                method,
                url,
                if retried { " (retry)" } else { "" }
            );
            let response = request.send().await?;

            if response.status() != StatusCode::UNAUTHORIZED || retried {
                return Ok(response);
            }
            retried = true;
            debug!("[GATEWAY] 401 on {} {}, attempting token refresh", method, url);

            if self.session.refresh_token().is_none() {
                // Nothing to recover with; drop the session and surface the 401.
                warn!("[GATEWAY] Unauthorized with no refresh token, logging out");
                self.session.logout().await;
                return Ok(response);
            }

            match self.session.refresh_access_token().await {
                Ok(Some(fresh)) => {
                    token = Some(fresh);
                    continue;
                }
                // The session was cleared while we waited on the refresh.
                Ok(None) => return Ok(response),
                // Refresh failure is terminal; the store has already logged
                // out. The caller learns recovery failed, not the stale 401.
                Err(e) => return Err(e),
            }
        }
    }

    // ── Typed helpers ───────────────────────────────────────────────────

    /// GET a JSON resource.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send::<()>(Method::GET, path, None).await?;
        Self::expect_json(response).await
    }

    /// POST a JSON body, decoding a JSON response.
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.send(Method::POST, path, Some(body)).await?;
        Self::expect_json(response).await
    }

    /// PATCH a JSON body, decoding a JSON response.
    pub async fn patch_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.send(Method::PATCH, path, Some(body)).await?;
        Self::expect_json(response).await
    }

    /// PATCH a JSON body, discarding the response body.
    pub async fn patch_empty<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        let response = self.send(Method::PATCH, path, Some(body)).await?;
        Self::expect_success(response).await
    }

    /// DELETE a resource, discarding the response body.
    pub async fn delete(&self, path: &str) -> Result<()> {
        let response = self.send::<()>(Method::DELETE, path, None).await?;
        Self::expect_success(response).await
    }

    /// Send a multipart form through the authorized pipeline.
    ///
    /// Multipart bodies cannot be rebuilt from borrowed data the way JSON
    /// bodies can, so the caller supplies a factory invoked once per attempt.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: impl Fn() -> Result<reqwest::multipart::Form>,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let mut token = self.session.access_token();
        let mut retried = false;

        loop {
            // Uploads get a longer timeout than business-data calls.
            let mut request = self
                .http
                .post(&url)
                .timeout(self.timeouts.upload_timeout)
                .multipart(form()?);
            if let Some(token) = &token {
                request = request.bearer_auth(token);
            }

            debug!("[GATEWAY] POST {} (multipart)", url);
            let response = request.send().await?;

            if response.status() != StatusCode::UNAUTHORIZED || retried {
                return Self::expect_json(response).await;
            }
            retried = true;

            if self.session.refresh_token().is_none() {
                warn!("[GATEWAY] Unauthorized with no refresh token, logging out");
                self.session.logout().await;
                return Self::expect_json(response).await;
            }
            match self.session.refresh_access_token().await {
                Ok(Some(fresh)) => {
                    token = Some(fresh);
                    continue;
                }
                Ok(None) => return Self::expect_json(response).await,
                Err(e) => return Err(e),
            }
        }
    }

    async fn expect_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json::<T>().await?)
        } else {
            Err(Self::error_from(status, response).await)
        }
    }

    async fn expect_success(response: Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::error_from(status, response).await)
        }
    }

    async fn error_from(status: StatusCode, response: Response) -> BackofficeLinkError {
        let text = response.text().await.unwrap_or_default();
        BackofficeLinkError::ServerError {
            status_code: status.as_u16(),
            message: ErrorDetail::extract(&text),
        }
    }
}
