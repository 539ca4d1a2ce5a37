//! # Actions
//!
//! Everything a user can do on a page becomes an `Action`.
//! Clicking "Önizle"? That's `Action::TogglePreview`.
//! Submitting the login form? That's `Action::Login { .. }`.
//!
//! `update()` applies the synchronous part to the state and returns an
//! `Effect` telling the render loop what else has to happen. No I/O here;
//! network calls and storage writes happen in the loop.
//!
//! ```text
//! State + Action  →  update()  →  Effect  →  render loop
//! ```

use log::debug;

use crate::core::state::{AppState, Theme};
use crate::router::{self, post_path};

/// Shown after a successful profile update.
pub const PROFILE_UPDATED: &str = "Profil güncellendi!";

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Navigate(String),
    /// Re-render the current route.
    Render,
    Login {
        email: String,
        password: String,
    },
    Register {
        name: String,
        email: String,
        password: String,
    },
    OAuthDemo(OAuthProvider),
    Logout,
    SetTheme(Theme),
    CycleTheme,
    /// Start editing an existing post.
    EditPost(String),
    CancelEdit,
    TogglePreview,
    AddTag(String),
    RemoveTag(String),
    SetTitle(String),
    SetExcerpt(String),
    /// The editable content region reported new HTML.
    EditorInput(String),
    /// Publish a new post, or save the one being edited.
    SubmitPost,
    DeletePost(String),
    UpdateProfile {
        name: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthProvider {
    Google,
    Microsoft,
    X,
}

impl OAuthProvider {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "google" => Some(OAuthProvider::Google),
            "microsoft" => Some(OAuthProvider::Microsoft),
            "x" => Some(OAuthProvider::X),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OAuthProvider::Google => "google",
            OAuthProvider::Microsoft => "microsoft",
            OAuthProvider::X => "x",
        }
    }

    /// The demo identity (name, email) the backend is asked to sign in.
    pub fn demo_identity(self) -> (&'static str, &'static str) {
        match self {
            OAuthProvider::Google => ("Google Kullanıcı", "user@gmail.com"),
            OAuthProvider::Microsoft => ("Microsoft Kullanıcı", "user@outlook.com"),
            OAuthProvider::X => ("X Kullanıcı", "user@x.com"),
        }
    }
}

impl Action {
    /// Maps a `data-action` attribute from the rendered markup to an action.
    ///
    /// Triggers that read form fields (`login`, `register`, `tag`,
    /// `update-profile`) and the menu and modal toggles stay with the host
    /// and map to `None`.
    pub fn from_trigger(trigger: &str) -> Option<Action> {
        let (name, arg) = match trigger.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (trigger, None),
        };
        match (name, arg) {
            ("logout", None) => Some(Action::Logout),
            ("cycle-theme", None) => Some(Action::CycleTheme),
            ("set-theme", Some(theme)) => Theme::parse(theme).map(Action::SetTheme),
            ("oauth", Some(provider)) => OAuthProvider::parse(provider).map(Action::OAuthDemo),
            ("edit", Some(slug)) if !slug.is_empty() => Some(Action::EditPost(slug.to_string())),
            ("delete", Some(slug)) if !slug.is_empty() => Some(Action::DeletePost(slug.to_string())),
            ("untag", Some(tag)) => Some(Action::RemoveTag(tag.to_string())),
            ("cancel-edit", None) => Some(Action::CancelEdit),
            ("toggle-preview", None) => Some(Action::TogglePreview),
            ("create-post" | "update-post", None) => Some(Action::SubmitPost),
            _ => None,
        }
    }
}

/// Network-backed work the loop performs after `update()`.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Login {
        email: String,
        password: String,
    },
    Register {
        name: String,
        email: String,
        password: String,
    },
    OAuthDemo(OAuthProvider),
    CreatePost,
    UpdatePost { slug: String },
    DeletePost(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Render,
    Navigate(String),
    /// Refresh the word count without re-rendering.
    RefreshWordCount,
    Submit(Submission),
    Logout,
}

pub fn update(state: &mut AppState, action: Action) -> Effect {
    debug!("update: {:?}", action);
    match action {
        Action::Navigate(path) => Effect::Navigate(path),
        Action::Render => Effect::Render,
        Action::Login { email, password } => Effect::Submit(Submission::Login { email, password }),
        Action::Register {
            name,
            email,
            password,
        } => Effect::Submit(Submission::Register {
            name,
            email,
            password,
        }),
        Action::OAuthDemo(provider) => Effect::Submit(Submission::OAuthDemo(provider)),
        Action::Logout => Effect::Logout,
        Action::SetTheme(theme) => {
            state.theme = theme;
            Effect::Render
        }
        Action::CycleTheme => {
            state.theme = state.theme.next();
            Effect::Render
        }
        Action::EditPost(slug) => {
            state.clear_editor();
            state.editor.editing_slug = Some(slug);
            Effect::Navigate(router::WRITE.to_string())
        }
        Action::CancelEdit => {
            let back = match state.editor.editing_slug.as_deref() {
                Some(slug) => post_path(slug),
                None => router::HOME.to_string(),
            };
            state.clear_editor();
            Effect::Navigate(back)
        }
        Action::TogglePreview => {
            state.editor.preview = !state.editor.preview;
            Effect::Render
        }
        Action::AddTag(tag) => {
            if state.editor.add_tag(&tag) {
                Effect::Render
            } else {
                Effect::None
            }
        }
        Action::RemoveTag(tag) => {
            if state.editor.remove_tag(&tag) {
                Effect::Render
            } else {
                Effect::None
            }
        }
        Action::SetTitle(title) => {
            state.editor.draft.title = title;
            Effect::None
        }
        Action::SetExcerpt(excerpt) => {
            state.editor.draft.excerpt = excerpt;
            Effect::None
        }
        Action::EditorInput(html) => {
            state.editor.draft.content = html;
            Effect::RefreshWordCount
        }
        Action::SubmitPost => {
            if !state.editor.draft.is_complete() {
                state.errors.write = Some("Başlık ve içerik gereklidir".to_string());
                return Effect::Render;
            }
            match state.editor.editing_slug.clone() {
                Some(slug) => Effect::Submit(Submission::UpdatePost { slug }),
                None => Effect::Submit(Submission::CreatePost),
            }
        }
        Action::DeletePost(slug) => Effect::Submit(Submission::DeletePost(slug)),
        Action::UpdateProfile { name } => {
            let name = name.trim();
            if name.chars().count() < 2 || !state.rename_user(name.to_string()) {
                return Effect::None;
            }
            state.notice = Some(PROFILE_UPDATED.to_string());
            Effect::Render
        }
    }
}
