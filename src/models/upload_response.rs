use serde::{Deserialize, Serialize};

/// Response from the image uploader endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Public URL of the stored file
    pub url: String,
    /// Server-assigned file name
    #[serde(default)]
    pub filename: Option<String>,
}
