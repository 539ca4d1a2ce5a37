//! `BlogApi` over HTTP with reqwest.
//!
//! Path segments are appended to the configured base URL (e.g.
//! `http://localhost:8000/api` + `posts/<slug>`), each one percent-encoded.
//! A bearer token is attached whenever the caller holds one.

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Method, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::client::{ApiError, BlogApi, error_message};
use super::types::{
    AuthResponse, LoginRequest, OAuthDemoRequest, Post, PostPayload, RegisterRequest,
};

pub struct HttpApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let invalid = || ApiError::Network(format!("invalid base URL: {}", self.base_url));
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends one request. `Ok(None)` means the backend answered 204 or an
    /// empty body.
    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> Result<Option<T>, ApiError> {
        let url = self.url(segments)?;
        let endpoint = url.path().to_string();
        debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method.clone(), url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        debug!("{} {} -> {}", method, endpoint, status);

        let text = if status == StatusCode::NO_CONTENT {
            String::new()
        } else {
            response
                .text()
                .await
                .map_err(|e| ApiError::Network(e.to_string()))?
        };

        if !status.is_success() {
            let message = error_message(&text);
            warn!("{} {} failed: {} - {}", method, endpoint, status, message);
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        if text.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn call_required<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> Result<T, ApiError> {
        self.call(method, segments, token, body).await?.ok_or_else(|| {
            ApiError::Parse(format!("empty response body from /{}", segments.join("/")))
        })
    }
}

fn to_body<B: Serialize>(body: &B) -> Result<Option<serde_json::Value>, ApiError> {
    serde_json::to_value(body)
        .map(Some)
        .map_err(|e| ApiError::Parse(e.to_string()))
}

#[async_trait]
impl BlogApi for HttpApi {
    async fn list_posts(&self, token: Option<&str>) -> Result<Vec<Post>, ApiError> {
        self.call_required(Method::GET, &["posts"], token, None).await
    }

    async fn get_post(&self, slug: &str, token: Option<&str>) -> Result<Post, ApiError> {
        self.call_required(Method::GET, &["posts", slug], token, None)
            .await
    }

    async fn create_post(
        &self,
        payload: &PostPayload,
        token: Option<&str>,
    ) -> Result<Post, ApiError> {
        self.call_required(Method::POST, &["posts"], token, to_body(payload)?)
            .await
    }

    async fn update_post(
        &self,
        slug: &str,
        payload: &PostPayload,
        token: Option<&str>,
    ) -> Result<Post, ApiError> {
        self.call_required(Method::PUT, &["posts", slug], token, to_body(payload)?)
            .await
    }

    async fn delete_post(&self, slug: &str, token: Option<&str>) -> Result<(), ApiError> {
        self.call::<serde_json::Value>(Method::DELETE, &["posts", slug], token, None)
            .await
            .map(|_| ())
    }

    async fn login(
        &self,
        request: &LoginRequest,
        token: Option<&str>,
    ) -> Result<AuthResponse, ApiError> {
        self.call_required(Method::POST, &["auth", "login"], token, to_body(request)?)
            .await
    }

    async fn register(
        &self,
        request: &RegisterRequest,
        token: Option<&str>,
    ) -> Result<AuthResponse, ApiError> {
        self.call_required(Method::POST, &["auth", "register"], token, to_body(request)?)
            .await
    }

    async fn oauth_demo(
        &self,
        request: &OAuthDemoRequest,
        token: Option<&str>,
    ) -> Result<AuthResponse, ApiError> {
        self.call_required(Method::POST, &["auth", "oauth-demo"], token, to_body(request)?)
            .await
    }
}
