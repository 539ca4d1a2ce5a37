pub mod client;
pub mod http;
pub mod types;

pub use client::{ApiError, BlogApi, DEFAULT_ERROR_MESSAGE};
pub use http::HttpApi;
pub use types::{
    AuthResponse, LoginRequest, OAuthDemoRequest, Post, PostPayload, RegisterRequest, Tag, User,
};
