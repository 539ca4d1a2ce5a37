//! # Hash Router
//!
//! The URL fragment is the whole routing key. `Router` reads it and is the
//! only thing that writes it; the location turns each write into one change
//! notification, and the render loop runs one pass per notification.
//!
//! ```text
//! navigate("/blog") ──► Location::set_fragment ──► HashChange ──► render pass
//!                                  ▲
//!        back / forward ───────────┘
//! ```
//!
//! Route grammar: `/`, `/blog`, `/post/<slug>`, `/login`, `/register`,
//! `/write`, `/profile`. Anything else resolves to the home page.

pub mod location;

use std::sync::Arc;

use log::debug;

pub use location::{HashChange, Location, MemoryLocation};

pub const HOME: &str = "/";
pub const BLOG: &str = "/blog";
pub const LOGIN: &str = "/login";
pub const REGISTER: &str = "/register";
pub const WRITE: &str = "/write";
pub const PROFILE: &str = "/profile";
const POST_PREFIX: &str = "/post/";

/// A resolved route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Home,
    Blog,
    Post(String),
    Login,
    Register,
    Write,
    Profile,
}

impl Page {
    /// Resolves a route string. Unknown routes (and `/post/` with no slug)
    /// alias to `Home`.
    pub fn resolve(route: &str) -> Page {
        match route {
            HOME => Page::Home,
            BLOG => Page::Blog,
            LOGIN => Page::Login,
            REGISTER => Page::Register,
            WRITE => Page::Write,
            PROFILE => Page::Profile,
            _ => match route.strip_prefix(POST_PREFIX) {
                Some(slug) if !slug.is_empty() => Page::Post(slug.to_string()),
                _ => Page::Home,
            },
        }
    }

    pub fn path(&self) -> String {
        match self {
            Page::Home => HOME.to_string(),
            Page::Blog => BLOG.to_string(),
            Page::Post(slug) => post_path(slug),
            Page::Login => LOGIN.to_string(),
            Page::Register => REGISTER.to_string(),
            Page::Write => WRITE.to_string(),
            Page::Profile => PROFILE.to_string(),
        }
    }

    /// Pages that show the post list and need it loaded.
    pub fn needs_post_list(&self) -> bool {
        matches!(self, Page::Home | Page::Blog)
    }

    /// Pages that redirect to `/login` when nobody is signed in.
    pub fn requires_auth(&self) -> bool {
        matches!(self, Page::Write | Page::Profile)
    }
}

pub fn post_path(slug: &str) -> String {
    format!("{POST_PREFIX}{slug}")
}

/// Reads and writes the route through the host's location.
#[derive(Clone)]
pub struct Router {
    location: Arc<dyn Location>,
}

impl Router {
    pub fn new(location: Arc<dyn Location>) -> Self {
        Self { location }
    }

    /// The fragment after `#`, or `/` when empty.
    pub fn current_route(&self) -> String {
        let fragment = self.location.fragment();
        if fragment.is_empty() {
            HOME.to_string()
        } else {
            fragment
        }
    }

    pub fn current_page(&self) -> Page {
        Page::resolve(&self.current_route())
    }

    /// Sets the fragment. The location queues the change; the render
    /// happens when the loop picks it up.
    pub fn navigate(&self, path: &str) {
        debug!("navigate {}", path);
        self.location.set_fragment(path);
    }
}
