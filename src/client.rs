//! Main back-office client with builder pattern.
//!
//! Wires the session store, the authorized gateway, and the route guard
//! together at application bootstrap. The session store is constructed
//! here and injected into the gateway explicitly; UI layers share it
//! through [`BackofficeClient::session`].

use crate::error::{BackofficeLinkError, Result};
use crate::gateway::Gateway;
use crate::guard::RouteGuard;
use crate::models::{ChangePasswordRequest, ProfileResponse, UpdateProfileRequest, User};
use crate::resources::Resources;
use crate::session::SessionStore;
use crate::storage::{MemorySessionStorage, SessionStorage};
use crate::timeouts::BackofficeTimeouts;
use std::sync::Arc;

/// Main back-office API client.
///
/// Use [`BackofficeClient::builder`] to construct instances.
///
/// # Examples
///
/// ```rust,no_run
/// use backoffice_link::{BackofficeClient, FileSessionStorage};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = BackofficeClient::builder()
///     .base_url("https://api.example.com")
///     .session_storage(FileSessionStorage::new())
///     .build()?;
///
/// if !client.session().is_authenticated() {
///     client.login("admin@example.com", "secret").await?;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct BackofficeClient {
    session: Arc<SessionStore>,
    gateway: Gateway,
}

impl BackofficeClient {
    /// Create a new builder for configuring the client
    pub fn builder() -> BackofficeClientBuilder {
        BackofficeClientBuilder::new()
    }

    /// Shared session store, the single source of truth for "is a user
    /// logged in". Hand this to UI state layers at bootstrap.
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Authorized request gateway for custom endpoints.
    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Route guard bound to this client's session.
    pub fn guard(&self) -> RouteGuard {
        RouteGuard::new(Arc::clone(&self.session))
    }

    /// Generic CRUD handle over the business collections.
    pub fn resources(&self) -> Resources {
        Resources::new(self.gateway.clone())
    }

    /// Exchange credentials for a session. See [`SessionStore::login`].
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        self.session.login(email, password).await
    }

    /// End the session. See [`SessionStore::logout`].
    pub async fn logout(&self) {
        self.session.logout().await
    }

    /// Update the authenticated user's profile.
    ///
    /// Success replaces the stored identity record only; tokens are
    /// untouched. Failure surfaces the server message on the session store
    /// and returns the error.
    pub async fn update_profile(&self, request: &UpdateProfileRequest) -> Result<User> {
        self.session.set_loading(true);
        let outcome: Result<ProfileResponse> =
            self.gateway.patch_json("/auth/profile", request).await;
        self.session.set_loading(false);

        match outcome {
            Ok(profile) => {
                self.session.update_user(profile.user.clone());
                Ok(profile.user)
            }
            Err(e) => {
                self.session.set_error(Self::displayable(&e));
                Err(e)
            }
        }
    }

    /// Change the authenticated user's password.
    ///
    /// Success is a no-op on session state. Failure surfaces the server
    /// message on the session store and returns the error.
    pub async fn change_password(&self, request: &ChangePasswordRequest) -> Result<()> {
        self.session.set_loading(true);
        let outcome = self.gateway.patch_empty("/auth/change-password", request).await;
        self.session.set_loading(false);

        if let Err(e) = &outcome {
            self.session.set_error(Self::displayable(e));
        }
        outcome
    }

    fn displayable(error: &BackofficeLinkError) -> String {
        match error {
            BackofficeLinkError::ServerError { message, .. } => message.clone(),
            BackofficeLinkError::AuthenticationError(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Builder for configuring [`BackofficeClient`] instances.
pub struct BackofficeClientBuilder {
    base_url: Option<String>,
    timeouts: BackofficeTimeouts,
    storage: Option<Box<dyn SessionStorage>>,
}

impl BackofficeClientBuilder {
    fn new() -> Self {
        Self {
            base_url: None,
            timeouts: BackofficeTimeouts::default(),
            storage: None,
        }
    }

    /// Set the base URL of the back-office API (required).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the timeout configuration.
    pub fn timeouts(mut self, timeouts: BackofficeTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Set the durable session storage backend.
    ///
    /// Defaults to [`MemorySessionStorage`], which does not survive a
    /// restart; desktop and CLI shells should pass
    /// [`crate::FileSessionStorage`].
    pub fn session_storage(mut self, storage: impl SessionStorage + 'static) -> Self {
        self.storage = Some(Box::new(storage));
        self
    }

    /// Build the client, rehydrating any persisted session.
    pub fn build(self) -> Result<BackofficeClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| BackofficeLinkError::ConfigurationError("base_url is required".into()))?
            .trim_end_matches('/')
            .to_string();

        // Keep-alive pooling: the admin UI issues bursts of small calls.
        let http = reqwest::Client::builder()
            .timeout(self.timeouts.request_timeout)
            .connect_timeout(self.timeouts.connection_timeout)
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            .build()
            .map_err(|e| BackofficeLinkError::ConfigurationError(e.to_string()))?;

        let storage = self
            .storage
            .unwrap_or_else(|| Box::new(MemorySessionStorage::new()));

        let session = Arc::new(SessionStore::new(base_url.clone(), http.clone(), storage));
        let gateway = Gateway::new(base_url, http, Arc::clone(&session), self.timeouts);

        Ok(BackofficeClient { session, gateway })
    }
}
