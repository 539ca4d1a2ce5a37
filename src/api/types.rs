use serde::{Deserialize, Serialize};

/// An account as the backend returns it. Also used as a post's author.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default, rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

fn default_provider() -> String {
    "email".to_string()
}

impl User {
    /// Up to two uppercase initials taken from the words of the name.
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Tag {
    #[serde(default)]
    pub id: i64,
    pub name: String,
}

/// A blog post. List responses omit `content`, so it defaults to empty.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Post {
    #[serde(default)]
    pub id: i64,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub read_time: String,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    pub author: User,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Post {
    pub fn tag_names(&self) -> Vec<String> {
        self.tags.iter().map(|t| t.name.clone()).collect()
    }
}

// ============================================================================
// Request / response bodies
// ============================================================================

#[derive(Serialize, Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct OAuthDemoRequest {
    pub provider: String,
    pub email: String,
    pub name: String,
}

/// Body of `POST /posts` and `PUT /posts/:slug`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PostPayload {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    pub user: User,
}

/// Error body shape: `{"detail": "..."}` or a list of validation errors.
#[derive(Deserialize, Debug)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}
