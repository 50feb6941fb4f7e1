use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Token rejected by auth service")]
    Unauthorized,

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Auth endpoint not found: {0}")]
    NotFound(String),

    #[error("Rate limited by auth service")]
    RateLimited,

    #[error("Auth service error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected auth response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies carried in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body so errors never drag whole payloads into logs
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        // The cut must land on a char boundary or the slice panics
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!(
            "{}... (truncated, {} total bytes)",
            &body[..end],
            body.len()
        )
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(truncated),
            404 => ApiError::NotFound(truncated),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(truncated),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let unauthorized = ApiError::from_status(reqwest::StatusCode::UNAUTHORIZED, "");
        assert!(matches!(unauthorized, ApiError::Unauthorized));

        let server = ApiError::from_status(reqwest::StatusCode::BAD_GATEWAY, "upstream down");
        assert!(matches!(server, ApiError::ServerError(_)));
    }

    #[test]
    fn test_long_bodies_are_truncated() {
        let body = "x".repeat(2000);
        match ApiError::from_status(reqwest::StatusCode::FORBIDDEN, &body) {
            ApiError::AccessDenied(msg) => assert!(msg.len() < body.len()),
            other => panic!("expected AccessDenied, got {:?}", other),
        }
    }

    #[test]
    fn test_multibyte_body_truncates_on_char_boundary() {
        // 200 euro signs = 600 bytes; byte 500 falls inside a character
        let body = "€".repeat(200);
        match ApiError::from_status(reqwest::StatusCode::FORBIDDEN, &body) {
            ApiError::AccessDenied(msg) => {
                assert!(msg.contains("truncated"));
                assert!(msg.len() < body.len());
            }
            other => panic!("expected AccessDenied, got {:?}", other),
        }
    }
}
