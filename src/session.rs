//! Session state and the credential store.
//!
//! `SessionStore` is the single authoritative holder of the authenticated
//! session: the identity record, the bearer token pair, and the transient
//! request state. It owns the auth endpoints (`/auth/login`, `/auth/refresh`,
//! `/auth/logout`) and calls them directly with a plain HTTP client, so the
//! gateway's 401 interception never recurses into these calls.
//!
//! The durable subset of the session (`SessionSnapshot`) is written to the
//! configured [`SessionStorage`] backend on every mutation and rehydrated at
//! construction, so an application restart does not force re-login. The
//! transient subset (`SessionRuntime`) is never persisted.

use crate::error::{BackofficeLinkError, Result};
use crate::models::{ErrorDetail, LoginRequest, LoginResponse, RefreshResponse, User};
use crate::storage::SessionStorage;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::sync::{PoisonError, RwLock};
use tokio::sync::Mutex as AsyncMutex;

/// Durable subset of the session, serialized to storage on every mutation.
///
/// Invariant: `is_authenticated` implies both `user` and `access_token` are
/// present (the token may be stale; staleness is discovered through a 401 and
/// recovered by the gateway). `user` and the tokens are cleared together on
/// logout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    /// Authenticated identity, absent while anonymous
    pub user: Option<User>,
    /// Short-lived bearer credential (~1 hour server-side)
    pub access_token: Option<String>,
    /// Longer-lived refresh credential (~7 days server-side)
    pub refresh_token: Option<String>,
    /// True iff a login or refresh succeeded and no logout happened since
    pub is_authenticated: bool,
}

/// Transient per-session fields, never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionRuntime {
    /// A login or profile operation is in flight
    pub is_loading: bool,
    /// Message of the last failed operation, for the UI to display
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct SessionState {
    snapshot: SessionSnapshot,
    runtime: SessionRuntime,
}

/// Authoritative, durable holder of the session.
///
/// Constructed once at application bootstrap and shared as an
/// `Arc<SessionStore>` between the UI layer and the request gateway.
/// All reads are synchronous snapshots; all mutations go through the
/// store's own methods.
pub struct SessionStore {
    base_url: String,
    http: reqwest::Client,
    state: RwLock<SessionState>,
    storage: Box<dyn SessionStorage>,
    /// Serializes token refreshes so concurrent 401 handlers share one
    /// in-flight refresh instead of racing token rotation.
    refresh_lock: AsyncMutex<()>,
}

impl SessionStore {
    /// Create a store, rehydrating any persisted session.
    ///
    /// A persisted snapshot that violates the session invariant (flagged
    /// authenticated without an access token or without an identity record)
    /// is discarded rather than trusted.
    pub fn new(
        base_url: impl Into<String>,
        http: reqwest::Client,
        storage: Box<dyn SessionStorage>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        let snapshot = match storage.load() {
            Ok(Some(snapshot)) => {
                if snapshot.is_authenticated
                    && (snapshot.access_token.is_none() || snapshot.user.is_none())
                {
                    warn!("[SESSION] Persisted session is inconsistent, starting anonymous");
                    SessionSnapshot::default()
                } else {
                    if snapshot.is_authenticated {
                        debug!("[SESSION] Rehydrated authenticated session");
                    }
                    snapshot
                }
            }
            Ok(None) => SessionSnapshot::default(),
            Err(e) => {
                warn!("[SESSION] Failed to load persisted session: {}", e);
                SessionSnapshot::default()
            }
        };

        Self {
            base_url,
            http,
            state: RwLock::new(SessionState {
                snapshot,
                runtime: SessionRuntime::default(),
            }),
            storage,
            refresh_lock: AsyncMutex::new(()),
        }
    }

    // ── Synchronous reads ───────────────────────────────────────────────

    /// Current durable session state.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.read(|state| state.snapshot.clone())
    }

    /// Current transient session state.
    pub fn runtime(&self) -> SessionRuntime {
        self.read(|state| state.runtime.clone())
    }

    /// Whether a user is logged in.
    pub fn is_authenticated(&self) -> bool {
        self.read(|state| state.snapshot.is_authenticated)
    }

    /// Current access token, if any.
    pub fn access_token(&self) -> Option<String> {
        self.read(|state| state.snapshot.access_token.clone())
    }

    /// Current refresh token, if any.
    pub fn refresh_token(&self) -> Option<String> {
        self.read(|state| state.snapshot.refresh_token.clone())
    }

    /// Current identity record, if any.
    pub fn user(&self) -> Option<User> {
        self.read(|state| state.snapshot.user.clone())
    }

    /// Message of the last failed operation, if any.
    pub fn error(&self) -> Option<String> {
        self.read(|state| state.runtime.error.clone())
    }

    /// Whether a login or profile operation is in flight.
    pub fn is_loading(&self) -> bool {
        self.read(|state| state.runtime.is_loading)
    }

    // ── Mutating operations ─────────────────────────────────────────────

    /// Exchange credentials for a session.
    ///
    /// On success the full session is populated, persisted, and the user
    /// record returned. On failure the session stays anonymous, the server
    /// message lands in [`SessionStore::error`], and the error is returned
    /// so the caller can react (for example keep the login form open).
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        self.write(|state| {
            state.runtime.is_loading = true;
            state.runtime.error = None;
        });

        let url = format!("{}/auth/login", self.base_url);
        debug!("[SESSION] Logging in '{}'", email);

        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let outcome: Result<LoginResponse> = async {
            let response = self.http.post(&url).json(&body).send().await?;
            let status = response.status();
            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                let message = ErrorDetail::extract(&text);
                debug!("[SESSION] Login rejected ({}): {}", status, message);
                return Err(BackofficeLinkError::AuthenticationError(message));
            }
            Ok(response.json::<LoginResponse>().await?)
        }
        .await;

        match outcome {
            Ok(login) => {
                self.write(|state| {
                    state.snapshot = SessionSnapshot {
                        user: Some(login.user.clone()),
                        access_token: Some(login.access_token),
                        refresh_token: Some(login.refresh_token),
                        is_authenticated: true,
                    };
                    state.runtime.is_loading = false;
                });
                self.persist();
                debug!("[SESSION] Logged in '{}'", login.user.email);
                Ok(login.user)
            }
            Err(e) => {
                let message = match &e {
                    BackofficeLinkError::AuthenticationError(m) => m.clone(),
                    other => other.to_string(),
                };
                self.write(|state| {
                    state.runtime.is_loading = false;
                    state.runtime.error = Some(message);
                });
                Err(e)
            }
        }
    }

    /// End the session.
    ///
    /// The server is notified best-effort with the current access token; a
    /// failed notification is logged and ignored. The local session is
    /// cleared unconditionally before this returns, so logout never fails
    /// from the caller's perspective.
    pub async fn logout(&self) {
        if let Some(token) = self.access_token() {
            let url = format!("{}/auth/logout", self.base_url);
            match self.http.post(&url).bearer_auth(&token).send().await {
                Ok(response) if !response.status().is_success() => {
                    warn!("[SESSION] Server logout returned {}", response.status());
                }
                Err(e) => warn!("[SESSION] Server logout failed: {}", e),
                Ok(_) => {}
            }
        }
        self.clear_session();
    }

    /// Obtain a fresh access token using the refresh token.
    ///
    /// Returns `Ok(None)` immediately, without a network call, when no
    /// refresh token is held. A rejected refresh is terminal: the session is
    /// fully cleared (logout) and the error propagates. Refreshes are never
    /// retried.
    ///
    /// Concurrent callers coalesce: whoever queues behind an in-flight
    /// refresh reuses its rotated token (or observes the cleared session
    /// when it failed) instead of issuing a second refresh.
    pub async fn refresh_access_token(&self) -> Result<Option<String>> {
        if self.refresh_token().is_none() {
            debug!("[SESSION] No refresh token held, skipping refresh");
            return Ok(None);
        }
        let stale_access = self.access_token();

        let _guard = self.refresh_lock.lock().await;

        let current = self.snapshot();
        let refresh_token = match current.refresh_token {
            Some(token) => token,
            // A refresh ahead of us failed and cleared the session.
            None => return Ok(None),
        };
        if current.access_token != stale_access {
            debug!("[SESSION] Reusing token from a refresh that completed while waiting");
            return Ok(current.access_token);
        }

        let url = format!("{}/auth/refresh", self.base_url);
        debug!("[SESSION] Refreshing access token");

        // The refresh token, not the access token, is the bearer credential here.
        let outcome: Result<RefreshResponse> = async {
            let response = self.http.post(&url).bearer_auth(&refresh_token).send().await?;
            let status = response.status();
            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                return Err(BackofficeLinkError::AuthenticationError(ErrorDetail::extract(
                    &text,
                )));
            }
            Ok(response.json::<RefreshResponse>().await?)
        }
        .await;

        match outcome {
            Ok(refresh) => {
                let access_token = refresh.access_token.clone();
                self.write(|state| {
                    state.snapshot.access_token = Some(refresh.access_token.clone());
                    if let Some(rotated) = refresh.refresh_token.clone() {
                        state.snapshot.refresh_token = Some(rotated);
                    }
                });
                self.persist();
                debug!("[SESSION] Access token refreshed");
                Ok(Some(access_token))
            }
            Err(e) => {
                warn!("[SESSION] Token refresh failed: {}", e);
                self.logout().await;
                Err(e)
            }
        }
    }

    /// Clear only the transient error message.
    pub fn clear_error(&self) {
        self.write(|state| state.runtime.error = None);
    }

    /// Replace the stored identity record after a profile update.
    pub(crate) fn update_user(&self, user: User) {
        self.write(|state| state.snapshot.user = Some(user));
        self.persist();
    }

    /// Surface an operation failure to the UI.
    pub(crate) fn set_error(&self, message: impl Into<String>) {
        self.write(|state| state.runtime.error = Some(message.into()));
    }

    /// Toggle the loading indicator around a profile operation.
    pub(crate) fn set_loading(&self, is_loading: bool) {
        self.write(|state| state.runtime.is_loading = is_loading);
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn clear_session(&self) {
        self.write(|state| {
            state.snapshot = SessionSnapshot::default();
            state.runtime = SessionRuntime::default();
        });
        if let Err(e) = self.storage.clear() {
            warn!("[SESSION] Failed to clear persisted session: {}", e);
        }
        debug!("[SESSION] Session cleared");
    }

    /// Write the durable snapshot through to storage.
    ///
    /// A failed save keeps the in-memory session usable for the lifetime of
    /// the process; the user logs in again after a restart.
    fn persist(&self) {
        let snapshot = self.snapshot();
        if let Err(e) = self.storage.save(&snapshot) {
            warn!("[SESSION] Failed to persist session: {}", e);
        }
    }

    fn read<T>(&self, f: impl FnOnce(&SessionState) -> T) -> T {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    fn write<T>(&self, f: impl FnOnce(&mut SessionState) -> T) -> T {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }
}
