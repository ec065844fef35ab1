use serde::Deserialize;

/// Error body returned by the back-office API.
///
/// The API reports failures as `{"message": …}` where `message` is either a
/// plain string or, for field-validation failures, an array of strings.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    message: Option<serde_json::Value>,
}

impl ErrorDetail {
    /// Extract a displayable message from a raw error response body.
    ///
    /// Falls back to the raw body text, and finally to a generic message,
    /// so callers always have something to show.
    pub fn extract(body: &str) -> String {
        if let Ok(detail) = serde_json::from_str::<ErrorDetail>(body) {
            match detail.message {
                Some(serde_json::Value::String(s)) if !s.is_empty() => return s,
                Some(serde_json::Value::Array(parts)) => {
                    let joined = parts
                        .iter()
                        .filter_map(|v| v.as_str())
                        .collect::<Vec<_>>()
                        .join("; ");
                    if !joined.is_empty() {
                        return joined;
                    }
                }
                _ => {}
            }
        }

        let trimmed = body.trim();
        if trimmed.is_empty() {
            "Something went wrong".to_string()
        } else {
            trimmed.to_string()
        }
    }
}
