use std::fmt;

use async_trait::async_trait;

use super::types::{
    AuthResponse, ErrorBody, LoginRequest, OAuthDemoRequest, Post, PostPayload, RegisterRequest,
};

/// Shown when a failed response carries no usable `detail`.
pub const DEFAULT_ERROR_MESSAGE: &str = "Bir hata oluştu";

/// Errors that can occur while talking to the blog backend.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Network-level failure (DNS, connection refused, body read).
    Network(String),
    /// Backend answered with a non-2xx status.
    Api { status: u16, message: String },
    /// Response body was not the JSON we expected.
    Parse(String),
}

impl ApiError {
    /// The single human-readable string a form shows for this failure.
    pub fn message(&self) -> &str {
        match self {
            ApiError::Network(msg) | ApiError::Parse(msg) => msg,
            ApiError::Api { message, .. } => message,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "network error: {msg}"),
            ApiError::Api { status, message } => write!(f, "API error (HTTP {status}): {message}"),
            ApiError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// The REST contract the client consumes.
///
/// Every call takes the bearer token currently held (if any); the client
/// itself keeps no session state.
#[async_trait]
pub trait BlogApi: Send + Sync {
    /// `GET /posts`
    async fn list_posts(&self, token: Option<&str>) -> Result<Vec<Post>, ApiError>;

    /// `GET /posts/:slug`
    async fn get_post(&self, slug: &str, token: Option<&str>) -> Result<Post, ApiError>;

    /// `POST /posts`
    async fn create_post(&self, payload: &PostPayload, token: Option<&str>)
    -> Result<Post, ApiError>;

    /// `PUT /posts/:slug`
    async fn update_post(
        &self,
        slug: &str,
        payload: &PostPayload,
        token: Option<&str>,
    ) -> Result<Post, ApiError>;

    /// `DELETE /posts/:slug` (204, no body)
    async fn delete_post(&self, slug: &str, token: Option<&str>) -> Result<(), ApiError>;

    /// `POST /auth/login`
    async fn login(
        &self,
        request: &LoginRequest,
        token: Option<&str>,
    ) -> Result<AuthResponse, ApiError>;

    /// `POST /auth/register`
    async fn register(
        &self,
        request: &RegisterRequest,
        token: Option<&str>,
    ) -> Result<AuthResponse, ApiError>;

    /// `POST /auth/oauth-demo`
    async fn oauth_demo(
        &self,
        request: &OAuthDemoRequest,
        token: Option<&str>,
    ) -> Result<AuthResponse, ApiError>;
}

/// Extracts the user-facing message from a failed response body.
///
/// `detail` may be a string or a list of validation errors; list items
/// contribute their `msg` (or `message`, or their raw JSON), joined by `, `.
pub fn error_message(body: &str) -> String {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail);

    match detail {
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.get("msg")
                    .or_else(|| item.get("message"))
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
                    .unwrap_or_else(|| item.to_string())
            })
            .collect::<Vec<_>>()
            .join(", "),
        Some(serde_json::Value::String(msg)) if !msg.is_empty() => msg,
        _ => DEFAULT_ERROR_MESSAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_detail() {
        assert_eq!(
            error_message(r#"{"detail": "Geçersiz e-posta veya şifre"}"#),
            "Geçersiz e-posta veya şifre"
        );
    }

    #[test]
    fn test_validation_array_joined() {
        let body = r#"{"detail": [
            {"loc": ["body", "title"], "msg": "too short"},
            {"message": "bad email"},
            {"code": 7}
        ]}"#;
        assert_eq!(error_message(body), r#"too short, bad email, {"code":7}"#);
    }

    #[test]
    fn test_fallback_for_non_json_and_empty_detail() {
        assert_eq!(error_message("<html>502</html>"), DEFAULT_ERROR_MESSAGE);
        assert_eq!(error_message(r#"{"detail": ""}"#), DEFAULT_ERROR_MESSAGE);
        assert_eq!(error_message("{}"), DEFAULT_ERROR_MESSAGE);
    }

    #[test]
    fn test_message_is_undecorated() {
        let err = ApiError::Api {
            status: 400,
            message: "Bir hata oluştu".into(),
        };
        assert_eq!(err.message(), "Bir hata oluştu");
        assert_eq!(err.to_string(), "API error (HTTP 400): Bir hata oluştu");
    }
}
