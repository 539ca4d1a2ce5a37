//! # Views
//!
//! Pure functions from state to markup. The render loop calls [`select`]
//! once per pass and commits what it returns; nothing in here touches the
//! document, the network, or storage.
//!
//! ## Modules
//!
//! - [`node`]: the `Node` tree and HTML serialization (escaping happens here)
//! - [`components`]: navbar, post cards, error regions, modals
//! - [`pages`]: one function per route
//! - [`markdown`]: post bodies, dates, word counts

pub mod components;
pub mod markdown;
pub mod node;
pub mod pages;

use crate::core::state::AppState;
use crate::router::{self, Page};

pub use node::Node;

/// Work that can only happen once the markup is in the document.
#[derive(Debug, Clone, PartialEq)]
pub enum PostRender {
    /// Fill the editable region with `content`, listen for input, and
    /// refresh the word count.
    Editor { content: String },
}

/// What a pass should do for the current route.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Page {
        markup: Node,
        hook: Option<PostRender>,
    },
    /// Go elsewhere without committing anything.
    Redirect(&'static str),
}

/// Picks the page for `page`. Auth-only pages redirect signed-out visitors
/// to the login page.
///
/// Pages see the resolved path, not the raw fragment, so an unknown route
/// renders exactly like `/`.
pub fn select(page: &Page, state: &AppState) -> View {
    if page.requires_auth() && !state.is_signed_in() {
        return View::Redirect(router::LOGIN);
    }

    let route = page.path();
    let route = route.as_str();

    let markup = match page {
        Page::Home => pages::home(state, route),
        Page::Blog => pages::blog(state, route),
        Page::Post(_) => pages::post(state, route),
        Page::Login => pages::login(state, route),
        Page::Register => pages::register(state, route),
        Page::Write | Page::Profile => {
            let Some(user) = state.user() else {
                return View::Redirect(router::LOGIN);
            };
            if *page == Page::Write {
                pages::write(state, route, user)
            } else {
                pages::profile(state, route, user)
            }
        }
    };

    let hook = (*page == Page::Write && !state.editor.preview).then(|| PostRender::Editor {
        content: state.editor.draft.content.clone(),
    });

    View::Page { markup, hook }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_post, sample_user};

    fn markup(view: View) -> String {
        match view {
            View::Page { markup, .. } => markup.render(),
            View::Redirect(to) => panic!("unexpected redirect to {to}"),
        }
    }

    #[test]
    fn test_unknown_route_renders_home() {
        let mut state = AppState::new();
        state.posts = vec![sample_post("a")];
        let home = markup(select(&Page::resolve("/"), &state));
        for route in ["/whatever", "/post/", "/blog/2"] {
            assert_eq!(markup(select(&Page::resolve(route), &state)), home);
        }
    }

    #[test]
    fn test_signed_out_write_and_profile_redirect() {
        let state = AppState::new();
        assert_eq!(select(&Page::Write, &state), View::Redirect("/login"));
        assert_eq!(select(&Page::Profile, &state), View::Redirect("/login"));
    }

    #[test]
    fn test_write_has_editor_hook_unless_previewing() {
        let mut state = AppState::new();
        state.set_auth("tok".into(), sample_user());
        state.editor.draft.content = "<p>taslak</p>".into();

        match select(&Page::Write, &state) {
            View::Page { hook, .. } => assert_eq!(
                hook,
                Some(PostRender::Editor {
                    content: "<p>taslak</p>".into()
                })
            ),
            View::Redirect(_) => panic!("signed in user was redirected"),
        }

        state.editor.preview = true;
        assert!(matches!(
            select(&Page::Write, &state),
            View::Page { hook: None, .. }
        ));
    }
}
