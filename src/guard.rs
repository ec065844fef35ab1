//! Declarative access check for protected routes.
//!
//! The guard is a pure, synchronous read of the session snapshot: it decides
//! whether a protected subtree may render or the router must redirect to the
//! login route. It never triggers a token refresh; expiry recovery belongs to
//! the gateway and happens lazily on the next authorized request.

use crate::session::SessionStore;
use std::sync::Arc;

/// Route the guard redirects anonymous users to.
pub const DEFAULT_LOGIN_ROUTE: &str = "/login";

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Render the protected content unchanged.
    Allow,
    /// Redirect to `target`. Consumers must replace the current history
    /// entry rather than push, so back-navigation does not return to the
    /// protected page.
    Redirect { target: String },
}

/// Gates rendering of a protected subtree on the session state.
#[derive(Clone)]
pub struct RouteGuard {
    session: Arc<SessionStore>,
    login_route: String,
}

impl RouteGuard {
    /// Create a guard redirecting to [`DEFAULT_LOGIN_ROUTE`].
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self::with_login_route(session, DEFAULT_LOGIN_ROUTE)
    }

    /// Create a guard with a custom login route.
    pub fn with_login_route(session: Arc<SessionStore>, login_route: impl Into<String>) -> Self {
        Self {
            session,
            login_route: login_route.into(),
        }
    }

    /// Decide whether the protected content may render right now.
    pub fn check(&self) -> RouteDecision {
        if self.session.is_authenticated() {
            RouteDecision::Allow
        } else {
            RouteDecision::Redirect {
                target: self.login_route.clone(),
            }
        }
    }
}
