//! # backoffice-link: Back-Office API Client Library
//!
//! Client SDK for the back-office REST API behind the company website and
//! admin dashboard. Provides the session and request-authorization layer
//! that UI shells build on:
//!
//! - **Credential Store**: durable session state (identity + token pair),
//!   persisted across restarts through pluggable storage backends
//! - **Authorized Gateway**: bearer injection and transparent
//!   refresh-and-retry on token expiry, with at most one recovery cycle
//!   per request and a single shared in-flight refresh
//! - **Route Guard**: declarative redirect-to-login check for protected
//!   routes
//! - **Resource CRUD**: typed generic access to the business collections
//!   (partners, products, customers, projects, users) and the image
//!   uploader
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use backoffice_link::{BackofficeClient, FileSessionStorage, RouteDecision};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = BackofficeClient::builder()
//!         .base_url("https://api.example.com")
//!         .session_storage(FileSessionStorage::new())
//!         .build()?;
//!
//!     // A persisted session survives the restart; log in otherwise.
//!     if let RouteDecision::Redirect { .. } = client.guard().check() {
//!         client.login("admin@example.com", "secret").await?;
//!     }
//!
//!     // Authorized calls recover from token expiry transparently.
//!     let partners: Vec<serde_json::Value> =
//!         client.resources().list(backoffice_link::collections::PARTNERS).await?;
//!     println!("{} partners", partners.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Session lifecycle
//!
//! `Anonymous --login--> Authenticated --logout / refresh failure-->
//! Anonymous`. A 401 on an authorized call moves through an implicit
//! refreshing sub-state and back to `Authenticated` when the refresh
//! endpoint rotates the tokens; refresh failure is terminal and clears the
//! session, after which the route guard redirects to the login page.

pub mod client;
pub mod error;
pub mod gateway;
pub mod guard;
pub mod models;
pub mod resources;
pub mod session;
pub mod storage;
pub mod timeouts;

// Re-export main types for convenience
pub use client::{BackofficeClient, BackofficeClientBuilder};
pub use error::{BackofficeLinkError, Result};
pub use gateway::Gateway;
pub use guard::{RouteDecision, RouteGuard, DEFAULT_LOGIN_ROUTE};
pub use models::{
    ChangePasswordRequest, LoginRequest, LoginResponse, Role, UpdateProfileRequest, UploadResponse,
    User,
};
pub use resources::{collections, Resources};
pub use session::{SessionRuntime, SessionSnapshot, SessionStore};
pub use storage::{FileSessionStorage, MemorySessionStorage, SessionStorage};
pub use timeouts::{BackofficeTimeouts, BackofficeTimeoutsBuilder};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
