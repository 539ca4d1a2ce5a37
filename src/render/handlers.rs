//! Submissions: the actions that call the backend.
//!
//! Success signs in or reloads the list and navigates. Failure stores the
//! error on the form that caused it and re-renders the current route, so
//! the message shows in that form's error region. A failed submission never
//! navigates.

use log::{info, warn};

use crate::api::{
    ApiError, AuthResponse, LoginRequest, OAuthDemoRequest, PostPayload, RegisterRequest,
};
use crate::core::action::{OAuthProvider, Submission};
use crate::core::state::AppState;
use crate::document::Document;
use crate::router::{self, Page, post_path};

use super::RenderLoop;

pub const OAUTH_FAILED_PREFIX: &str = "Giriş başarısız: ";
pub const DELETE_FAILED_PREFIX: &str = "Silme hatası: ";

pub(super) async fn submit<D: Document>(render: &mut RenderLoop<D>, submission: Submission) {
    info!("Submitting {}", submission_name(&submission));
    match submission {
        Submission::Login { email, password } => {
            let request = LoginRequest { email, password };
            let result = render.api.login(&request, render.state.token()).await;
            finish_auth(render, result, |state, msg| state.errors.login = Some(msg)).await;
        }
        Submission::Register {
            name,
            email,
            password,
        } => {
            let request = RegisterRequest {
                name,
                email,
                password,
            };
            let result = render.api.register(&request, render.state.token()).await;
            finish_auth(render, result, |state, msg| state.errors.register = Some(msg)).await;
        }
        Submission::OAuthDemo(provider) => oauth_demo(render, provider).await,
        Submission::CreatePost => create_post(render).await,
        Submission::UpdatePost { slug } => update_post(render, slug).await,
        Submission::DeletePost(slug) => delete_post(render, slug).await,
    }
}

fn submission_name(submission: &Submission) -> &'static str {
    match submission {
        Submission::Login { .. } => "login",
        Submission::Register { .. } => "register",
        Submission::OAuthDemo(_) => "oauth-demo",
        Submission::CreatePost => "create-post",
        Submission::UpdatePost { .. } => "update-post",
        Submission::DeletePost(_) => "delete-post",
    }
}

/// Signs in and goes home, or records the message with `on_error`.
async fn finish_auth<D: Document>(
    render: &mut RenderLoop<D>,
    result: Result<AuthResponse, ApiError>,
    on_error: impl FnOnce(&mut AppState, String),
) {
    match result {
        Ok(auth) => {
            render.set_auth(auth.access_token, auth.user);
            render.navigate(router::HOME).await;
        }
        Err(e) => {
            warn!("Sign-in failed: {}", e);
            on_error(&mut render.state, e.message().to_string());
            render.render().await;
        }
    }
}

async fn oauth_demo<D: Document>(render: &mut RenderLoop<D>, provider: OAuthProvider) {
    let (name, email) = provider.demo_identity();
    let request = OAuthDemoRequest {
        provider: provider.as_str().to_string(),
        email: email.to_string(),
        name: name.to_string(),
    };
    let result = render.api.oauth_demo(&request, render.state.token()).await;

    // The buttons sit on both auth pages; report on whichever is showing.
    let on_register = render.router.current_page() == Page::Register;
    finish_auth(render, result, move |state, msg| {
        let msg = format!("{OAUTH_FAILED_PREFIX}{msg}");
        if on_register {
            state.errors.register = Some(msg);
        } else {
            state.errors.login = Some(msg);
        }
    })
    .await;
}

fn payload(state: &AppState) -> PostPayload {
    let draft = &state.editor.draft;
    let excerpt = draft.excerpt.trim();
    PostPayload {
        title: draft.title.trim().to_string(),
        content: draft.content.clone(),
        excerpt: (!excerpt.is_empty()).then(|| excerpt.to_string()),
        tags: state.editor.tags.clone(),
    }
}

async fn create_post<D: Document>(render: &mut RenderLoop<D>) {
    let payload = payload(&render.state);
    match render.api.create_post(&payload, render.state.token()).await {
        Ok(post) => {
            info!("Created post {}", post.slug);
            render.state.clear_editor();
            render.load_posts().await;
            render.navigate(router::BLOG).await;
        }
        Err(e) => write_failed(render, e).await,
    }
}

async fn update_post<D: Document>(render: &mut RenderLoop<D>, slug: String) {
    let payload = payload(&render.state);
    match render
        .api
        .update_post(&slug, &payload, render.state.token())
        .await
    {
        Ok(_) => {
            info!("Updated post {}", slug);
            render.state.clear_editor();
            render.load_posts().await;
            render.navigate(&post_path(&slug)).await;
        }
        Err(e) => write_failed(render, e).await,
    }
}

async fn write_failed<D: Document>(render: &mut RenderLoop<D>, error: ApiError) {
    warn!("Saving post failed: {}", error);
    render.state.errors.write = Some(error.message().to_string());
    render.render().await;
}

async fn delete_post<D: Document>(render: &mut RenderLoop<D>, slug: String) {
    match render.api.delete_post(&slug, render.state.token()).await {
        Ok(()) => {
            info!("Deleted post {}", slug);
            render.state.current_post = None;
            render.load_posts().await;
            render.navigate(router::BLOG).await;
        }
        Err(e) => {
            warn!("Deleting {} failed: {}", slug, e);
            render.state.errors.post = Some(format!("{DELETE_FAILED_PREFIX}{}", e.message()));
            render.render().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::Action;
    use crate::core::state::Draft;
    use crate::core::storage::{MemoryStorage, Storage, TOKEN_KEY};
    use crate::document::MemoryDocument;
    use crate::router::{Location, MemoryLocation, Router};
    use crate::test_support::{FakeApi, sample_post, sample_user};
    use std::sync::Arc;

    fn setup(route: &str, api: Arc<FakeApi>) -> (Arc<MemoryLocation>, RenderLoop<MemoryDocument>) {
        let (location, _changes) = MemoryLocation::new(route);
        let render = RenderLoop::new(
            api,
            Router::new(location.clone()),
            MemoryDocument::new(),
            Arc::new(MemoryStorage::new()),
        );
        (location, render)
    }

    fn draft() -> Draft {
        Draft {
            title: "Yeni Yazı".into(),
            excerpt: "  ".into(),
            content: "<p>İçerik</p>".into(),
        }
    }

    #[tokio::test]
    async fn test_login_signs_in_and_goes_home() {
        let api = Arc::new(FakeApi::default());
        let (location, mut render) = setup("/login", api.clone());
        render
            .dispatch(Action::Login {
                email: "ada@example.com".into(),
                password: "secret".into(),
            })
            .await;
        assert!(render.state().is_signed_in());
        assert_eq!(render.state().token(), Some("token-ada@example.com"));
        assert_eq!(location.fragment(), "/");
        assert_eq!(
            render.storage.get(TOKEN_KEY).as_deref(),
            Some("token-ada@example.com")
        );
    }

    #[tokio::test]
    async fn test_login_failure_shows_message_without_navigating() {
        let api = Arc::new(FakeApi::default());
        api.fail_with(ApiError::Api {
            status: 401,
            message: "Geçersiz e-posta veya şifre".into(),
        });
        let (location, mut render) = setup("/login", api);
        render
            .dispatch(Action::Login {
                email: "a@b.c".into(),
                password: "x".into(),
            })
            .await;
        assert_eq!(location.fragment(), "/login");
        assert!(!render.state().is_signed_in());
        assert!(render.document().root().contains("Geçersiz e-posta veya şifre"));
    }

    #[tokio::test]
    async fn test_oauth_failure_on_register_page_uses_prefix() {
        let api = Arc::new(FakeApi::default());
        api.fail_with(ApiError::Network("timeout".into()));
        let (_location, mut render) = setup("/register", api.clone());
        render.dispatch(Action::OAuthDemo(OAuthProvider::X)).await;
        assert_eq!(api.calls(), vec!["oauth_demo:x".to_string()]);
        assert!(render.document().root().contains("Giriş başarısız: timeout"));
    }

    #[tokio::test]
    async fn test_create_post_reloads_and_goes_to_blog() {
        let api = Arc::new(FakeApi::default());
        let (location, mut render) = setup("/write", api.clone());
        render.set_auth("tok".into(), sample_user());
        render.state_mut().editor.draft = draft();
        render.state_mut().editor.tags = vec!["rust".into()];

        render.dispatch(Action::SubmitPost).await;
        assert_eq!(api.calls(), vec!["create_post", "list_posts"]);
        assert_eq!(api.last_token().as_deref(), Some("tok"));
        assert_eq!(location.fragment(), "/blog");
        assert_eq!(render.state().posts.len(), 1);
        assert_eq!(render.state().posts[0].excerpt, None);
        assert!(render.state().editor.tags.is_empty());
    }

    #[tokio::test]
    async fn test_create_failure_keeps_draft_and_route() {
        let api = Arc::new(FakeApi::default());
        api.fail_with(ApiError::Api {
            status: 500,
            message: "Bir hata oluştu".into(),
        });
        let (location, mut render) = setup("/write", api);
        render.set_auth("tok".into(), sample_user());
        render.state_mut().editor.draft = draft();

        render.dispatch(Action::SubmitPost).await;
        assert_eq!(location.fragment(), "/write");
        assert_eq!(render.state().editor.draft.title, "Yeni Yazı");
        let root = render.document().root();
        assert!(root.contains(r#"id="write-error""#));
        assert!(root.contains(">Bir hata oluştu</div>"));
    }

    #[tokio::test]
    async fn test_update_post_returns_to_post() {
        let api = Arc::new(FakeApi::with_posts(vec![sample_post("eski")]));
        let (location, mut render) = setup("/write", api.clone());
        render.set_auth("tok".into(), sample_user());
        render.state_mut().editor.editing_slug = Some("eski".into());
        render.state_mut().editor.draft = draft();

        render.dispatch(Action::SubmitPost).await;
        assert_eq!(api.count("update_post:eski"), 1);
        assert_eq!(location.fragment(), "/post/eski");
        assert!(!render.state().editor.is_editing());
        assert_eq!(api.posts()[0].title, "Yeni Yazı");
    }

    #[tokio::test]
    async fn test_delete_failure_sets_post_error() {
        let api = Arc::new(FakeApi::with_posts(vec![sample_post("a")]));
        let (location, mut render) = setup("/post/a", api.clone());
        render.set_auth("tok".into(), sample_user());
        api.fail_call(
            "delete_post",
            ApiError::Api {
                status: 403,
                message: "Yetkiniz yok".into(),
            },
        );

        render.dispatch(Action::DeletePost("a".into())).await;
        assert_eq!(location.fragment(), "/post/a");
        assert!(render.document().root().contains("Silme hatası: Yetkiniz yok"));
    }

    #[tokio::test]
    async fn test_delete_success_goes_to_blog() {
        let api = Arc::new(FakeApi::with_posts(vec![sample_post("a"), sample_post("b")]));
        let (location, mut render) = setup("/post/a", api.clone());
        render.set_auth("tok".into(), sample_user());
        render.render().await;
        assert!(render.state().current_post.is_some());

        render.dispatch(Action::DeletePost("a".into())).await;
        assert!(render.state().current_post.is_none());
        assert_eq!(render.state().posts.len(), 1);
        assert_eq!(location.fragment(), "/blog");
    }
}
