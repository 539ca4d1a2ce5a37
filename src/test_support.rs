//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use async_trait::async_trait;
use std::sync::Mutex;

use crate::api::{
    ApiError, AuthResponse, BlogApi, LoginRequest, OAuthDemoRequest, Post, PostPayload,
    RegisterRequest, Tag, User,
};

pub fn sample_user() -> User {
    User {
        id: 1,
        name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        avatar: None,
        provider: "email".to_string(),
        created_at: Some("2024-01-10T08:00:00".to_string()),
    }
}

/// A post by `sample_user()` with one tag.
pub fn sample_post(slug: &str) -> Post {
    Post {
        id: 1,
        slug: slug.to_string(),
        title: format!("Yazı {slug}"),
        excerpt: Some("Kısa özet".to_string()),
        content: "<p>Merhaba dünya</p>".to_string(),
        featured: false,
        read_time: "3 dk".to_string(),
        created_at: "2024-03-05T10:00:00".to_string(),
        updated_at: None,
        author: sample_user(),
        tags: vec![Tag {
            id: 1,
            name: "rust".to_string(),
        }],
    }
}

type Hook = Box<dyn FnMut() + Send>;

/// In-memory `BlogApi` that records every call.
///
/// `fail_with` makes every call fail with that error; `fail_call` only the
/// calls whose name starts with a prefix. `on_fetch` runs inside
/// `list_posts`/`get_post` before they return, standing in for whatever the
/// user does while a request is in flight.
#[derive(Default)]
pub struct FakeApi {
    posts: Mutex<Vec<Post>>,
    calls: Mutex<Vec<String>>,
    tokens: Mutex<Vec<Option<String>>>,
    failures: Mutex<Vec<(String, ApiError)>>,
    on_fetch: Mutex<Option<Hook>>,
}

impl FakeApi {
    pub fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            posts: Mutex::new(posts),
            ..Self::default()
        }
    }

    pub fn fail_with(&self, error: ApiError) {
        self.fail_call("", error);
    }

    pub fn fail_call(&self, prefix: &str, error: ApiError) {
        self.failures
            .lock()
            .unwrap()
            .push((prefix.to_string(), error));
    }

    pub fn on_fetch(&self, hook: impl FnMut() + Send + 'static) {
        *self.on_fetch.lock().unwrap() = Some(Box::new(hook));
    }

    /// Number of recorded calls whose name starts with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_token(&self) -> Option<String> {
        self.tokens.lock().unwrap().last().cloned().flatten()
    }

    pub fn posts(&self) -> Vec<Post> {
        self.posts.lock().unwrap().clone()
    }

    fn record(&self, call: String, token: Option<&str>) -> Result<(), ApiError> {
        let failure = self
            .failures
            .lock()
            .unwrap()
            .iter()
            .find(|(prefix, _)| call.starts_with(prefix.as_str()))
            .map(|(_, err)| err.clone());
        self.calls.lock().unwrap().push(call);
        self.tokens.lock().unwrap().push(token.map(str::to_string));
        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn run_fetch_hook(&self) {
        if let Some(hook) = self.on_fetch.lock().unwrap().as_mut() {
            hook();
        }
    }

    fn signed_in(name: &str, email: &str, provider: &str) -> AuthResponse {
        AuthResponse {
            access_token: format!("token-{email}"),
            token_type: Some("bearer".to_string()),
            user: User {
                name: name.to_string(),
                email: email.to_string(),
                provider: provider.to_string(),
                ..sample_user()
            },
        }
    }
}

fn not_found() -> ApiError {
    ApiError::Api {
        status: 404,
        message: "Yazı bulunamadı".to_string(),
    }
}

fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

#[async_trait]
impl BlogApi for FakeApi {
    async fn list_posts(&self, token: Option<&str>) -> Result<Vec<Post>, ApiError> {
        self.run_fetch_hook();
        self.record("list_posts".to_string(), token)?;
        Ok(self.posts())
    }

    async fn get_post(&self, slug: &str, token: Option<&str>) -> Result<Post, ApiError> {
        self.run_fetch_hook();
        self.record(format!("get_post:{slug}"), token)?;
        self.posts()
            .into_iter()
            .find(|p| p.slug == slug)
            .ok_or_else(not_found)
    }

    async fn create_post(
        &self,
        payload: &PostPayload,
        token: Option<&str>,
    ) -> Result<Post, ApiError> {
        self.record("create_post".to_string(), token)?;
        let mut posts = self.posts.lock().unwrap();
        let post = Post {
            id: posts.len() as i64 + 1,
            slug: slugify(&payload.title),
            title: payload.title.clone(),
            excerpt: payload.excerpt.clone(),
            content: payload.content.clone(),
            tags: payload
                .tags
                .iter()
                .map(|name| Tag {
                    id: 0,
                    name: name.clone(),
                })
                .collect(),
            ..sample_post("")
        };
        posts.push(post.clone());
        Ok(post)
    }

    async fn update_post(
        &self,
        slug: &str,
        payload: &PostPayload,
        token: Option<&str>,
    ) -> Result<Post, ApiError> {
        self.record(format!("update_post:{slug}"), token)?;
        let mut posts = self.posts.lock().unwrap();
        let post = posts
            .iter_mut()
            .find(|p| p.slug == slug)
            .ok_or_else(not_found)?;
        post.title = payload.title.clone();
        post.content = payload.content.clone();
        post.excerpt = payload.excerpt.clone();
        Ok(post.clone())
    }

    async fn delete_post(&self, slug: &str, token: Option<&str>) -> Result<(), ApiError> {
        self.record(format!("delete_post:{slug}"), token)?;
        self.posts.lock().unwrap().retain(|p| p.slug != slug);
        Ok(())
    }

    async fn login(
        &self,
        request: &LoginRequest,
        token: Option<&str>,
    ) -> Result<AuthResponse, ApiError> {
        self.record(format!("login:{}", request.email), token)?;
        Ok(Self::signed_in("Ada Lovelace", &request.email, "email"))
    }

    async fn register(
        &self,
        request: &RegisterRequest,
        token: Option<&str>,
    ) -> Result<AuthResponse, ApiError> {
        self.record(format!("register:{}", request.email), token)?;
        Ok(Self::signed_in(&request.name, &request.email, "email"))
    }

    async fn oauth_demo(
        &self,
        request: &OAuthDemoRequest,
        token: Option<&str>,
    ) -> Result<AuthResponse, ApiError> {
        self.record(format!("oauth_demo:{}", request.provider), token)?;
        Ok(Self::signed_in(
            &request.name,
            &request.email,
            &request.provider,
        ))
    }
}
