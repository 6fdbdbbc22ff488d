use serde_json::Value;

/// Errors from calls to the remote API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Non-success HTTP status (4xx, 5xx).
    #[error("{message}")]
    Http {
        status: u16,
        /// One-line summary suitable for display.
        message: String,
        /// Human-readable message from the response body, when present.
        server_message: Option<String>,
    },
    /// Connection timeout or request timeout.
    #[error("Request timed out: {0}")]
    Timeout(String),
    /// Could not reach the server.
    #[error("Connection failed: {0}")]
    Connect(String),
    /// Response body did not match the expected shape.
    #[error("Failed to parse response: {0}")]
    Decode(String),
    /// Anything else reqwest reports (builder errors, redirects, ...).
    #[error("Request error: {0}")]
    Request(String),
}

impl ApiError {
    /// Creates an HTTP status error, pulling a cleaner message out of a JSON
    /// body shaped like `{"message": ...}` or `{"error": {"message": ...}}`.
    pub fn http_status(status: u16, body: &str) -> Self {
        let server_message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|json| extract_message(&json));

        let message = match &server_message {
            Some(msg) => format!("HTTP {status}: {msg}"),
            None => format!("HTTP {status}"),
        };

        ApiError::Http {
            status,
            message,
            server_message,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for 401: the server no longer accepts the bearer token.
    ///
    /// 403 is left out; it means the identity is valid but lacks the role.
    pub fn is_auth_rejection(&self) -> bool {
        self.status() == Some(401)
    }

    /// The server's own wording when it sent one, else the summary.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Http {
                server_message: Some(msg),
                ..
            } => msg.clone(),
            other => other.to_string(),
        }
    }

    /// Classifies a reqwest error.
    pub fn from_reqwest(e: &reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout(e.to_string())
        } else if e.is_connect() {
            ApiError::Connect(e.to_string())
        } else if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Request(e.to_string())
        }
    }
}

fn extract_message(json: &Value) -> Option<String> {
    let direct = json.get("message").and_then(Value::as_str);
    let nested = || {
        json.get("error").and_then(|err| {
            err.as_str()
                .or_else(|| err.get("message").and_then(Value::as_str))
        })
    };
    direct
        .or_else(nested)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_extracts_top_level_message() {
        let err = ApiError::http_status(400, r#"{"message":"Invalid credentials"}"#);
        assert_eq!(err.to_string(), "HTTP 400: Invalid credentials");
        assert_eq!(err.user_message(), "Invalid credentials");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_http_status_extracts_nested_message() {
        let err = ApiError::http_status(500, r#"{"error":{"message":"boom"}}"#);
        assert_eq!(err.to_string(), "HTTP 500: boom");

        let err = ApiError::http_status(403, r#"{"error":"Admin only"}"#);
        assert_eq!(err.user_message(), "Admin only");
        assert!(!err.is_auth_rejection());

        let err = ApiError::http_status(401, r#"{"message":"Invalid token"}"#);
        assert!(err.is_auth_rejection());
    }

    #[test]
    fn test_http_status_plain_body() {
        let err = ApiError::http_status(502, "Bad Gateway");
        assert_eq!(err.to_string(), "HTTP 502");
        assert_eq!(err.user_message(), "HTTP 502");
        assert!(!err.is_auth_rejection());
    }

    #[test]
    fn test_non_http_errors_have_no_status() {
        assert_eq!(ApiError::Timeout("slow".into()).status(), None);
        assert_eq!(
            ApiError::Decode("bad".into()).to_string(),
            "Failed to parse response: bad"
        );
    }
}
