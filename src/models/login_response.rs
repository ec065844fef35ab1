use serde::{Deserialize, Serialize};

use super::user::User;

/// Login response from the server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Authenticated user information
    pub user: User,
    /// Short-lived bearer credential for subsequent API calls
    pub access_token: String,
    /// Longer-lived credential for obtaining new access tokens
    pub refresh_token: String,
}
