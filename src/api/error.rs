use thiserror::Error;

use crate::models::Review;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Unauthorized - token may be expired")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("A review already exists for this place")]
    DuplicateReview { existing: Review, can_edit: bool },

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Raised when the client is offline and no cached value exists.
    /// Distinct so the UI can render an offline-specific message.
    #[error("Not available offline: {0}")]
    Offline(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data.
    /// The cut lands on a char boundary: the backend emits accented
    /// French messages, and slicing mid-character would panic.
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut cut = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        format!(
            "{}... (truncated, {} total bytes)",
            &body[..cut],
            body.len()
        )
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(truncated),
            404 => ApiError::NotFound(truncated),
            500..=599 => ApiError::ServerError(truncated),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }

    pub fn offline(what: impl Into<String>) -> Self {
        ApiError::Offline(what.into())
    }

    pub fn is_offline(&self) -> bool {
        matches!(self, ApiError::Offline(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_mapping() {
        assert!(matches!(
            ApiError::from_status(reqwest::StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(reqwest::StatusCode::NOT_FOUND, "gone"),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from_status(reqwest::StatusCode::BAD_GATEWAY, "boom"),
            ApiError::ServerError(_)
        ));
    }

    #[test]
    fn test_long_bodies_are_truncated() {
        let body = "x".repeat(2000);
        match ApiError::from_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR, &body) {
            ApiError::ServerError(msg) => {
                assert!(msg.len() < body.len());
                assert!(msg.contains("truncated"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_truncation_lands_on_char_boundary() {
        // 601 bytes; the 500-byte mark falls inside a two-byte "é"
        let body = format!("a{}", "é".repeat(300));
        match ApiError::from_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR, &body) {
            ApiError::ServerError(msg) => {
                assert!(msg.contains("601 total bytes"));
                assert!(msg.len() < body.len());
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_offline_is_distinguishable() {
        let err = ApiError::offline("places list");
        assert!(err.is_offline());
        assert!(!ApiError::Unauthorized.is_offline());
    }
}
