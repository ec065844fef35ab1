use serde::{Deserialize, Serialize};

/// Login request body for authentication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Login email
    pub email: String,
    /// Password for authentication
    pub password: String,
}
