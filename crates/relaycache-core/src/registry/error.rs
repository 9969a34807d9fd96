use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Rate limited by registry")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl RegistryError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 | 403 => RegistryError::AccessDenied(truncated),
            429 => RegistryError::RateLimited,
            500..=599 => RegistryError::ServerError(truncated),
            _ => RegistryError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }
}
