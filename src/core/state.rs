//! # Application State
//!
//! One record holding everything the render loop reads. It is owned by the
//! loop and handed to page functions by reference; nothing else keeps a copy.
//!
//! ```text
//! AppState
//! ├── user / token        // session, always set and cleared together
//! ├── theme               // active theme name
//! ├── posts               // list cache (empty = not loaded)
//! ├── current_post        // last post fetched for /post/:slug
//! ├── editor: EditorState // draft, tags, preview flag, edit target
//! ├── errors: FormErrors  // per-form messages, shown by the next commit
//! └── notice              // one-shot confirmation text
//! ```
//!
//! The session fields and the theme are the persisted subset. `persist()`
//! writes them to storage when they differ from what was last written.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::api::{Post, User};
use crate::core::storage::{Storage, StorageError, THEME_KEY, TOKEN_KEY, USER_KEY};

/// Maximum number of tags on a draft.
pub const MAX_TAGS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Rose,
    Ocean,
    Forest,
}

impl Theme {
    pub const ALL: [Theme; 5] = [
        Theme::Light,
        Theme::Dark,
        Theme::Rose,
        Theme::Ocean,
        Theme::Forest,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Rose => "rose",
            Theme::Ocean => "ocean",
            Theme::Forest => "forest",
        }
    }

    pub fn parse(name: &str) -> Option<Theme> {
        Theme::ALL.into_iter().find(|t| t.as_str() == name)
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::Light => "Aydınlık",
            Theme::Dark => "Karanlık",
            Theme::Rose => "Gül",
            Theme::Ocean => "Okyanus",
            Theme::Forest => "Orman",
        }
    }

    /// Dark-background themes show the moon icon.
    pub fn is_dark(self) -> bool {
        matches!(self, Theme::Dark | Theme::Ocean)
    }

    pub fn next(self) -> Theme {
        let idx = Theme::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Theme::ALL[(idx + 1) % Theme::ALL.len()]
    }
}

/// The write form's uncommitted inputs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    pub title: String,
    pub excerpt: String,
    pub content: String,
}

impl Draft {
    /// Title and content are required; an editor holding only `<br>` is empty.
    pub fn is_complete(&self) -> bool {
        let content = self.content.trim();
        !self.title.trim().is_empty() && !content.is_empty() && content != "<br>"
    }
}

#[derive(Debug, Clone, Default)]
pub struct EditorState {
    pub tags: Vec<String>,
    pub preview: bool,
    /// Slug of the post being edited (`None` = writing a new post).
    pub editing_slug: Option<String>,
    /// The edited post once hydrated.
    pub editing_post: Option<Post>,
    pub draft: Draft,
}

impl EditorState {
    pub fn is_editing(&self) -> bool {
        self.editing_slug.is_some()
    }

    /// Adds a trimmed tag. Returns false for blanks, duplicates, or a full list.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) || self.tags.len() >= MAX_TAGS {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        self.tags.len() != before
    }
}

/// Error text per form. Rendered by the next commit, then cleared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormErrors {
    pub login: Option<String>,
    pub register: Option<String>,
    pub write: Option<String>,
    pub post: Option<String>,
}

/// The slice of state that mirrors to storage.
#[derive(Debug, Clone, Default, PartialEq)]
struct Persisted {
    token: Option<String>,
    user: Option<User>,
    theme: Theme,
}

#[derive(Debug, Default)]
pub struct AppState {
    user: Option<User>,
    token: Option<String>,
    pub theme: Theme,
    pub posts: Vec<Post>,
    pub current_post: Option<Post>,
    pub editor: EditorState,
    pub errors: FormErrors,
    pub notice: Option<String>,
    /// What storage holds right now.
    persisted: Persisted,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the persisted slots. A token without a user (or a user without
    /// a token) is dropped, keeping the session invariant.
    pub fn restore(storage: &dyn Storage) -> Self {
        let token = storage.get(TOKEN_KEY).filter(|t| !t.is_empty());
        let user = storage
            .get(USER_KEY)
            .and_then(|json| match serde_json::from_str::<User>(&json) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!("Ignoring unreadable stored user: {}", e);
                    None
                }
            });
        let theme = storage
            .get(THEME_KEY)
            .and_then(|name| Theme::parse(&name))
            .unwrap_or_default();

        // `persisted` mirrors what storage actually holds, so a half-written
        // session differs from the cleared one and the first persist() wipes it.
        let persisted = Persisted {
            token: token.clone(),
            user: user.clone(),
            theme,
        };
        let (token, user) = match (token, user) {
            (Some(token), Some(user)) => (Some(token), Some(user)),
            (None, None) => (None, None),
            _ => {
                warn!("Stored session is half-written, starting signed out");
                (None, None)
            }
        };
        debug!(
            "Restored state: signed_in={}, theme={}",
            user.is_some(),
            theme.as_str()
        );

        Self {
            persisted,
            user,
            token,
            theme,
            ..Self::default()
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// Sets both session fields at once. An empty token signs out instead.
    pub fn set_auth(&mut self, token: String, user: User) {
        if token.is_empty() {
            warn!("Refusing empty token, clearing session");
            self.clear_auth();
            return;
        }
        self.token = Some(token);
        self.user = Some(user);
    }

    pub fn clear_auth(&mut self) {
        self.token = None;
        self.user = None;
    }

    /// Renames the signed-in user. No-op when signed out.
    pub fn rename_user(&mut self, name: String) -> bool {
        match self.user.as_mut() {
            Some(user) => {
                user.name = name;
                true
            }
            None => false,
        }
    }

    pub fn clear_editor(&mut self) {
        self.editor = EditorState::default();
    }

    /// Writes changed persisted slots to storage. Stops at the first failure;
    /// untouched slots are retried on the next call.
    pub fn persist(&mut self, storage: &dyn Storage) -> Result<(), StorageError> {
        if self.token != self.persisted.token || self.user != self.persisted.user {
            match (&self.token, &self.user) {
                (Some(token), Some(user)) => {
                    let json = serde_json::to_string(user).map_err(StorageError::Serialize)?;
                    storage.set(TOKEN_KEY, token)?;
                    storage.set(USER_KEY, &json)?;
                }
                _ => {
                    storage.remove(TOKEN_KEY)?;
                    storage.remove(USER_KEY)?;
                }
            }
            self.persisted.token = self.token.clone();
            self.persisted.user = self.user.clone();
            debug!("Persisted session (signed_in={})", self.user.is_some());
        }
        if self.theme != self.persisted.theme {
            storage.set(THEME_KEY, self.theme.as_str())?;
            self.persisted.theme = self.theme;
            debug!("Persisted theme {}", self.theme.as_str());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::storage::MemoryStorage;
    use crate::test_support::sample_user;

    #[test]
    fn test_theme_cycles_through_all() {
        let mut theme = Theme::Light;
        let mut seen = vec![];
        for _ in 0..Theme::ALL.len() {
            seen.push(theme);
            theme = theme.next();
        }
        assert_eq!(theme, Theme::Light);
        assert_eq!(seen, Theme::ALL.to_vec());
    }

    #[test]
    fn test_theme_parse_unknown() {
        assert_eq!(Theme::parse("ocean"), Some(Theme::Ocean));
        assert_eq!(Theme::parse("neon"), None);
    }

    #[test]
    fn test_set_auth_sets_both_fields() {
        let mut state = AppState::new();
        state.set_auth("tok".into(), sample_user());
        assert_eq!(state.token(), Some("tok"));
        assert!(state.user().is_some());

        state.clear_auth();
        assert!(state.token().is_none());
        assert!(state.user().is_none());
    }

    #[test]
    fn test_set_auth_with_empty_token_signs_out() {
        let mut state = AppState::new();
        state.set_auth("tok".into(), sample_user());
        state.set_auth(String::new(), sample_user());
        assert!(!state.is_signed_in());
        assert!(state.token().is_none());
    }

    #[test]
    fn test_persist_round_trip() {
        let storage = MemoryStorage::new();
        let mut state = AppState::new();
        state.set_auth("tok".into(), sample_user());
        state.theme = Theme::Forest;
        state.persist(&storage).unwrap();

        let restored = AppState::restore(&storage);
        assert_eq!(restored.token(), Some("tok"));
        assert_eq!(restored.user().map(|u| u.name.as_str()), Some("Ada Lovelace"));
        assert_eq!(restored.theme, Theme::Forest);
    }

    #[test]
    fn test_persist_clears_slots_on_sign_out() {
        let storage = MemoryStorage::new();
        let mut state = AppState::new();
        state.set_auth("tok".into(), sample_user());
        state.persist(&storage).unwrap();

        state.clear_auth();
        state.persist(&storage).unwrap();
        assert!(storage.get(TOKEN_KEY).is_none());
        assert!(storage.get(USER_KEY).is_none());
    }

    #[test]
    fn test_restore_drops_half_session() {
        let storage = MemoryStorage::with_slots([(TOKEN_KEY, "orphan")]);
        let mut state = AppState::restore(&storage);
        assert!(state.token().is_none());
        assert!(state.user().is_none());

        state.persist(&storage).unwrap();
        assert!(storage.get(TOKEN_KEY).is_none());
    }

    #[test]
    fn test_add_tag_rules() {
        let mut editor = EditorState::default();
        assert!(editor.add_tag("  rust "));
        assert!(!editor.add_tag("rust"));
        assert!(!editor.add_tag("   "));
        for t in ["a", "b", "c", "d"] {
            assert!(editor.add_tag(t));
        }
        assert!(!editor.add_tag("overflow"));
        assert_eq!(editor.tags.len(), MAX_TAGS);
        assert!(editor.remove_tag("rust"));
        assert!(!editor.remove_tag("rust"));
    }

    #[test]
    fn test_draft_completeness() {
        let mut draft = Draft {
            title: "Başlık".into(),
            content: "<br>".into(),
            ..Default::default()
        };
        assert!(!draft.is_complete());
        draft.content = "<p>merhaba</p>".into();
        assert!(draft.is_complete());
        draft.title = "  ".into();
        assert!(!draft.is_complete());
    }
}
