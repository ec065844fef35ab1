use serde::{Deserialize, Serialize};

use super::user::User;

/// Body for PATCH `/auth/profile`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    /// New display name
    pub name: String,
    /// New login email, left unchanged when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Body for PATCH `/auth/change-password`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    /// Current password, verified server-side
    pub current_password: String,
    /// Replacement password
    pub new_password: String,
}

/// Response from PATCH `/auth/profile`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    /// The updated identity record
    pub user: User,
}
