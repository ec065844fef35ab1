use serde::{Deserialize, Serialize};

/// Response from the token refresh endpoint.
///
/// The server always issues a fresh access token and may rotate the
/// refresh token alongside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    /// Replacement access token
    pub access_token: String,
    /// Rotated refresh token, when the server rotates on refresh
    #[serde(default)]
    pub refresh_token: Option<String>,
}
