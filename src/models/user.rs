use serde::{Deserialize, Serialize};

/// Role assigned to a back-office account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Full access to the administrative area.
    Admin,
    /// Regular back-office account.
    User,
}

/// Identity record returned by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User ID
    pub id: String,
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
    /// Account role
    pub role: Role,
    /// Whether the account is enabled
    pub is_active: bool,
    /// True until the user completes their first login flow
    pub is_first_login: bool,
    /// Account creation time in RFC3339 format
    pub created_at: String,
    /// Account update time in RFC3339 format
    pub updated_at: String,
}
