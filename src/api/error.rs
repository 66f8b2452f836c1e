//! Attio API error taxonomy.
//!
//! Every failure maps to a closed `ErrorKind` so callers can branch on the
//! kind instead of matching message text. Nothing here is retried.

use serde_json::Value;

use super::transport::{ApiResponse, TransportError};

/// Kind of an API failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No credential stored locally; no request was made.
    Unauthenticated,
    /// HTTP 401.
    InvalidCredential,
    /// HTTP 403.
    Forbidden,
    /// HTTP 429.
    RateLimited,
    /// HTTP 400.
    BadRequest,
    /// HTTP 404.
    NotFound,
    /// Any other non-2xx status.
    Http,
    /// The request never produced a response.
    Transport,
    /// A 2xx response whose body could not be decoded.
    Decode,
}

/// Error returned by Attio API calls.
#[derive(Debug, thiserror::Error)]
pub enum AttioApiError {
    #[error("Not authenticated. Please connect your Attio account.")]
    Unauthenticated,

    #[error("Invalid API key. Please check your credentials.")]
    InvalidCredential { body: Value },

    #[error("Access denied. Your API key may not have the required permissions.")]
    Forbidden { body: Value },

    #[error("Rate limit exceeded. Please try again in a moment.")]
    RateLimited { body: Value },

    #[error("Invalid request: {message}")]
    BadRequest { message: String, body: Value },

    /// Non-2xx answer to a record query.
    #[error("Search failed: {message}")]
    Search {
        status: u16,
        message: String,
        body: Value,
    },

    #[error("Attio API error: {status_text}")]
    Http {
        status: u16,
        status_text: String,
        body: Value,
    },

    #[error("Network error: {0}")]
    Transport(#[from] TransportError),

    #[error("Unexpected response from Attio: {0}")]
    Decode(String),

    /// The profile yields no attribute to write; nothing was sent.
    #[error("Could not find profile information to save.")]
    EmptyRecord,
}

impl AttioApiError {
    /// Classify a non-2xx response to a create, update or self call.
    pub fn from_response(response: &ApiResponse) -> Self {
        let body = response.json_body();

        match response.status {
            401 => AttioApiError::InvalidCredential { body },
            403 => AttioApiError::Forbidden { body },
            429 => AttioApiError::RateLimited { body },
            400 => AttioApiError::BadRequest {
                message: body_message(&body).unwrap_or_else(|| "Bad request".to_string()),
                body,
            },
            status => AttioApiError::Http {
                status,
                status_text: response.status_text.clone(),
                body,
            },
        }
    }

    /// Classify a non-2xx response to a record query.
    ///
    /// The message prefers the body's `message`, then `error`, then the
    /// status text, then `HTTP <status>`.
    pub fn search_failure(response: &ApiResponse) -> Self {
        let body = response.json_body();
        let message = body_message(&body)
            .or_else(|| body_field(&body, "error"))
            .or_else(|| Some(response.status_text.clone()).filter(|s| !s.is_empty()))
            .unwrap_or_else(|| format!("HTTP {}", response.status));

        AttioApiError::Search {
            status: response.status,
            message,
            body,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AttioApiError::Unauthenticated => ErrorKind::Unauthenticated,
            AttioApiError::InvalidCredential { .. } => ErrorKind::InvalidCredential,
            AttioApiError::Forbidden { .. } => ErrorKind::Forbidden,
            AttioApiError::RateLimited { .. } => ErrorKind::RateLimited,
            AttioApiError::BadRequest { .. } | AttioApiError::EmptyRecord => ErrorKind::BadRequest,
            AttioApiError::Search { status, .. } | AttioApiError::Http { status, .. } => {
                kind_for_status(*status)
            }
            AttioApiError::Transport(_) => ErrorKind::Transport,
            AttioApiError::Decode(_) => ErrorKind::Decode,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            AttioApiError::InvalidCredential { .. } => Some(401),
            AttioApiError::Forbidden { .. } => Some(403),
            AttioApiError::RateLimited { .. } => Some(429),
            AttioApiError::BadRequest { .. } => Some(400),
            AttioApiError::Search { status, .. } | AttioApiError::Http { status, .. } => {
                Some(*status)
            }
            AttioApiError::Unauthenticated
            | AttioApiError::Transport(_)
            | AttioApiError::Decode(_)
            | AttioApiError::EmptyRecord => None,
        }
    }

    /// Raw error body returned by the API, if any.
    pub fn body(&self) -> Option<&Value> {
        match self {
            AttioApiError::InvalidCredential { body }
            | AttioApiError::Forbidden { body }
            | AttioApiError::RateLimited { body }
            | AttioApiError::BadRequest { body, .. }
            | AttioApiError::Search { body, .. }
            | AttioApiError::Http { body, .. } => Some(body),
            _ => None,
        }
    }
}

fn kind_for_status(status: u16) -> ErrorKind {
    match status {
        400 => ErrorKind::BadRequest,
        401 => ErrorKind::InvalidCredential,
        403 => ErrorKind::Forbidden,
        404 => ErrorKind::NotFound,
        429 => ErrorKind::RateLimited,
        _ => ErrorKind::Http,
    }
}

fn body_message(body: &Value) -> Option<String> {
    body_field(body, "message")
}

fn body_field(body: &Value, field: &str) -> Option<String> {
    body.get(field)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(status: u16, status_text: &str, body: &str) -> ApiResponse {
        ApiResponse {
            status,
            status_text: status_text.to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_invalid_credential() {
        let err = AttioApiError::from_response(&response(401, "Unauthorized", "{}"));
        assert_eq!(err.kind(), ErrorKind::InvalidCredential);
        assert_eq!(err.status_code(), Some(401));
        assert!(err.to_string().contains("credentials"));
    }

    #[test]
    fn test_forbidden_and_rate_limited() {
        let forbidden = AttioApiError::from_response(&response(403, "Forbidden", ""));
        assert_eq!(forbidden.kind(), ErrorKind::Forbidden);
        assert!(forbidden.to_string().starts_with("Access denied"));

        let limited = AttioApiError::from_response(&response(429, "Too Many Requests", "{}"));
        assert_eq!(limited.kind(), ErrorKind::RateLimited);
        assert!(limited.to_string().starts_with("Rate limit exceeded"));
    }

    #[test]
    fn test_bad_request_uses_server_message() {
        let err = AttioApiError::from_response(&response(
            400,
            "Bad Request",
            r#"{"message": "name is required", "code": "validation_type"}"#,
        ));
        assert_eq!(err.to_string(), "Invalid request: name is required");
        assert_eq!(err.body().unwrap()["code"], json!("validation_type"));

        let bare = AttioApiError::from_response(&response(400, "Bad Request", "not json"));
        assert_eq!(bare.to_string(), "Invalid request: Bad request");
        assert_eq!(bare.body(), Some(&json!({})));
    }

    #[test]
    fn test_generic_failure_uses_status_text() {
        let err = AttioApiError::from_response(&response(502, "Bad Gateway", ""));
        assert_eq!(err.kind(), ErrorKind::Http);
        assert_eq!(err.status_code(), Some(502));
        assert_eq!(err.to_string(), "Attio API error: Bad Gateway");
    }

    #[test]
    fn test_search_failure_message_precedence() {
        let with_message = AttioApiError::search_failure(&response(
            400,
            "Bad Request",
            r#"{"message": "Unknown attribute", "error": "ignored"}"#,
        ));
        assert_eq!(with_message.to_string(), "Search failed: Unknown attribute");
        assert_eq!(with_message.kind(), ErrorKind::BadRequest);

        let with_error =
            AttioApiError::search_failure(&response(500, "Server Error", r#"{"error": "boom"}"#));
        assert_eq!(with_error.to_string(), "Search failed: boom");

        let status_text = AttioApiError::search_failure(&response(503, "Unavailable", ""));
        assert_eq!(status_text.to_string(), "Search failed: Unavailable");

        let bare = AttioApiError::search_failure(&response(520, "", ""));
        assert_eq!(bare.to_string(), "Search failed: HTTP 520");
    }

    #[test]
    fn test_search_kind_follows_status() {
        let not_found = AttioApiError::search_failure(&response(404, "Not Found", "{}"));
        assert_eq!(not_found.kind(), ErrorKind::NotFound);

        let unauthorized = AttioApiError::search_failure(&response(401, "Unauthorized", "{}"));
        assert_eq!(unauthorized.kind(), ErrorKind::InvalidCredential);
    }

    #[test]
    fn test_local_errors_have_no_status() {
        assert_eq!(AttioApiError::Unauthenticated.status_code(), None);
        assert_eq!(AttioApiError::Unauthenticated.kind(), ErrorKind::Unauthenticated);

        let transport = AttioApiError::from(TransportError::new("connection refused"));
        assert_eq!(transport.kind(), ErrorKind::Transport);
        assert_eq!(transport.to_string(), "Network error: connection refused");
    }
}
