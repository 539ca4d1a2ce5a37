//! # Render Loop
//!
//! Owns the application state and turns location changes and actions into
//! committed markup. One pass:
//!
//! ```text
//! Resolve ──► Hydrate ──► Select ──► Commit ──► Post-render hook
//!  route       fetches     view::     replace     after a yield:
//!  → Page      (await)     select()   the root    editor region
//! ```
//!
//! The loop handles one location change or one action at a time. A pass
//! only suspends while fetching, and other tasks may move the location in
//! the meantime; a pass whose route is no longer current when it reaches
//! Commit is dropped, since the newer change has a pass of its own.

mod handlers;

use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::api::{BlogApi, User};
use crate::core::action::{self, Action, Effect};
use crate::core::state::{AppState, Draft, FormErrors};
use crate::core::storage::Storage;
use crate::document::Document;
use crate::router::{self, HashChange, Page, Router};
use crate::view::markdown::word_count_label;
use crate::view::{self, PostRender, View};

/// Editable post body region.
pub const CONTENT_REGION: &str = "content";
/// Word and reading-time counter under the editor.
pub const WORD_COUNT_REGION: &str = "wordCount";

/// How a pass ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Committed { route: String },
    /// Sent elsewhere before anything was committed.
    Redirected { to: &'static str },
    /// The location moved on while this pass was fetching.
    Discarded { route: String, current: String },
}

pub struct RenderLoop<D: Document> {
    state: AppState,
    api: Arc<dyn BlogApi>,
    router: Router,
    document: D,
    storage: Arc<dyn Storage>,
}

impl<D: Document> RenderLoop<D> {
    /// Creates the loop with state restored from `storage`.
    pub fn new(
        api: Arc<dyn BlogApi>,
        router: Router,
        document: D,
        storage: Arc<dyn Storage>,
    ) -> Self {
        let state = AppState::restore(storage.as_ref());
        Self {
            state,
            api,
            router,
            document,
            storage,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Runs one pass for the current route.
    pub async fn render(&mut self) -> RenderOutcome {
        let route = self.router.current_route();
        let page = Page::resolve(&route);
        debug!("Render pass: {} -> {:?}", route, page);

        if page.requires_auth() && !self.state.is_signed_in() {
            info!("{} needs a signed-in user, redirecting", route);
            return self.redirect(router::LOGIN);
        }

        self.hydrate(&page).await;

        let current = self.router.current_route();
        if current != route {
            debug!("Discarding pass for {}: location is now {}", route, current);
            return RenderOutcome::Discarded { route, current };
        }

        match view::select(&page, &self.state) {
            View::Redirect(to) => self.redirect(to),
            View::Page { markup, hook } => {
                self.document.replace_root(markup.render());
                self.state.errors = FormErrors::default();
                self.state.notice = None;

                if let Some(hook) = hook {
                    tokio::task::yield_now().await;
                    self.run_hook(hook);
                }
                RenderOutcome::Committed { route }
            }
        }
    }

    fn redirect(&mut self, to: &'static str) -> RenderOutcome {
        self.router.navigate(to);
        RenderOutcome::Redirected { to }
    }

    async fn hydrate(&mut self, page: &Page) {
        match page {
            page if page.needs_post_list() && self.state.posts.is_empty() => {
                self.load_posts().await
            }
            Page::Post(slug) => {
                let result = self.api.get_post(slug, self.state.token()).await;
                self.state.current_post = match result {
                    Ok(post) => Some(post),
                    Err(e) => {
                        warn!("Failed to load post {}: {}", slug, e);
                        None
                    }
                };
            }
            Page::Write => self.load_editing_post().await,
            _ => {}
        }
    }

    /// Fetches the post being edited, once, and seeds the draft from it.
    async fn load_editing_post(&mut self) {
        let Some(slug) = self.state.editor.editing_slug.clone() else {
            return;
        };
        if self.state.editor.editing_post.is_some() {
            return;
        }

        match self.api.get_post(&slug, self.state.token()).await {
            Ok(post) => {
                let editor = &mut self.state.editor;
                editor.tags = post.tag_names();
                editor.draft = Draft {
                    title: post.title.clone(),
                    excerpt: post.excerpt.clone().unwrap_or_default(),
                    content: post.content.clone(),
                };
                editor.editing_post = Some(post);
            }
            Err(e) => warn!("Failed to load post {} for editing: {}", slug, e),
        }
    }

    /// Replaces the post list cache. Failures leave it empty.
    pub async fn load_posts(&mut self) {
        self.state.posts = match self.api.list_posts(self.state.token()).await {
            Ok(posts) => {
                debug!("Loaded {} posts", posts.len());
                posts
            }
            Err(e) => {
                warn!("Failed to load posts: {}", e);
                Vec::new()
            }
        };
    }

    fn run_hook(&mut self, hook: PostRender) {
        match hook {
            PostRender::Editor { content } => {
                if !self.document.set_region_html(CONTENT_REGION, &content) {
                    debug!("No #{} region after commit", CONTENT_REGION);
                    return;
                }
                self.document.watch_input(CONTENT_REGION);
                self.refresh_word_count();
            }
        }
    }

    fn refresh_word_count(&mut self) {
        let label = word_count_label(&self.state.editor.draft.content);
        self.document.set_region_text(WORD_COUNT_REGION, &label);
    }

    /// Applies an action and whatever effect it produces.
    pub async fn dispatch(&mut self, action: Action) {
        let effect = action::update(&mut self.state, action);
        self.save();
        self.apply(effect).await;
    }

    async fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::None => {}
            Effect::Render => {
                self.render().await;
            }
            Effect::Navigate(path) => self.navigate(&path).await,
            Effect::RefreshWordCount => self.refresh_word_count(),
            Effect::Submit(submission) => handlers::submit(self, submission).await,
            Effect::Logout => self.logout().await,
        }
    }

    /// Moves to `path`. The location queues the change and its pass runs
    /// when the loop picks it up; navigating to the current route renders
    /// right away since no change is queued.
    pub async fn navigate(&mut self, path: &str) {
        if self.router.current_route() == path {
            self.render().await;
        } else {
            self.router.navigate(path);
        }
    }

    /// Signs in. Token and user are stored together.
    pub fn set_auth(&mut self, token: String, user: User) {
        info!("Signed in as {}", user.email);
        self.state.set_auth(token, user);
        self.save();
    }

    /// Clears the session, goes home, and renders.
    pub async fn logout(&mut self) {
        info!("Signing out");
        self.state.clear_auth();
        self.save();
        self.router.navigate(router::HOME);
        self.render().await;
    }

    /// Writes changed slots to storage. Failures are logged, never fatal.
    fn save(&mut self) {
        if let Err(e) = self.state.persist(self.storage.as_ref()) {
            warn!("Failed to persist state: {}", e);
        }
    }

    /// Renders once, then serves location changes and actions until either
    /// channel closes.
    pub async fn run(
        mut self,
        mut changes: UnboundedReceiver<HashChange>,
        mut actions: UnboundedReceiver<Action>,
    ) -> Self {
        info!("Render loop starting at {}", self.router.current_route());
        self.render().await;

        loop {
            // A queued location change runs before the next action.
            tokio::select! {
                biased;
                change = changes.recv() => match change {
                    Some(change) => {
                        debug!("Location changed: {} -> {}", change.old, change.new);
                        self.render().await;
                    }
                    None => break,
                },
                action = actions.recv() => match action {
                    Some(action) => self.dispatch(action).await,
                    None => break,
                },
            }
        }

        info!("Render loop stopped");
        self
    }
}
