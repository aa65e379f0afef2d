//! Error bodies returned by the Beanstalk API.

use serde::Deserialize;

use crate::Error;

/// Body of a failed request, e.g. `{"errors": ["Name has already been taken"]}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub errors: Vec<String>,
}

impl ErrorResponse {
    /// Build an [`Error::Api`] from a status code and the raw response body.
    pub fn into_error(status: u16, body: &str) -> Error {
        let message = match serde_json::from_str::<ErrorResponse>(body) {
            Ok(parsed) if !parsed.errors.is_empty() => parsed.errors.join("; "),
            _ if !body.trim().is_empty() => body.trim().to_string(),
            _ => reqwest::StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("unknown error")
                .to_string(),
        };
        Error::Api { status, message }
    }
}
