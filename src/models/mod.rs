//! Data models for the backoffice-link client library.
//!
//! Defines request and response structures for the auth endpoints and the
//! generic resource surface.

pub mod error_detail;
pub mod login_request;
pub mod login_response;
pub mod profile;
pub mod refresh_response;
pub mod upload_response;
pub mod user;

pub use error_detail::ErrorDetail;
pub use login_request::LoginRequest;
pub use login_response::LoginResponse;
pub use profile::{ChangePasswordRequest, ProfileResponse, UpdateProfileRequest};
pub use refresh_response::RefreshResponse;
pub use upload_response::UploadResponse;
pub use user::{Role, User};
