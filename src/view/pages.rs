//! One function per page: state in, markup out. No I/O, no mutation.

use crate::api::User;
use crate::core::state::{AppState, MAX_TAGS};
use crate::router::{self, post_path};

use super::components::{
    delete_modal, error_region, icon, oauth_buttons, oauth_modal, page, post_card, tag_list,
};
use super::markdown::{format_date, render_body};
use super::node::{Node, el, empty, fragment};

fn footer() -> Node {
    el("footer")
        .class("footer")
        .child(
            el("div")
                .class("container")
                .child(el("p").text("Minimalist tasarım ile oluşturuldu. © 2026")),
        )
        .into()
}

fn posts_grid(state: &AppState, featured_excluded: bool) -> Node {
    let cards = state
        .posts
        .iter()
        .filter(|p| !(featured_excluded && p.featured))
        .enumerate()
        .map(|(i, p)| post_card(p, i));
    el("div").class("posts-grid").children(cards).into()
}

fn empty_state(state: &AppState) -> Node {
    if state.posts.is_empty() {
        el("p").class("empty-state").text("Henüz yazı yok.").into()
    } else {
        empty()
    }
}

pub fn home(state: &AppState, route: &str) -> Node {
    let featured = state.posts.iter().find(|p| p.featured).map(|post| {
        el("section").class("section").child(
            el("div")
                .class("container")
                .child(
                    el("span")
                        .class("section-label animate-fade-in")
                        .text("Öne Çıkan"),
                )
                .child(post_card(post, 0)),
        )
    });

    let hero = el("section").class("hero").child(
        el("div")
            .class("hero-content")
            .child(
                el("span")
                    .class("hero-badge animate-fade-in")
                    .text("Minimalist Blog"),
            )
            .child(
                el("h1")
                    .class("hero-title animate-fade-in delay-1")
                    .text("Düşünceler, ")
                    .child(el("span").class("gradient-text").text("Kod"))
                    .text(" ve Tasarım"),
            )
            .child(
                el("p").class("hero-description animate-fade-in delay-2").text(
                    "Frontend geliştirme, UI/UX tasarım ve modern web teknolojileri üzerine derinlemesine yazılar.",
                ),
            ),
    );

    let main = el("main")
        .child(hero)
        .children(featured)
        .child(
            el("section").class("section").child(
                el("div")
                    .class("container")
                    .child(
                        el("span")
                            .class("section-label muted animate-fade-in")
                            .text("Tüm Yazılar"),
                    )
                    .child(empty_state(state))
                    .child(posts_grid(state, true)),
            ),
        );

    fragment([page(state, route, main), footer()])
}

pub fn blog(state: &AppState, route: &str) -> Node {
    let main = el("main").class("blog-page").child(
        el("section").class("section").child(
            el("div")
                .class("container")
                .child(
                    el("div")
                        .class("page-heading animate-fade-in")
                        .child(el("h1").text("Tüm Yazılar"))
                        .child(el("p").text("Frontend, tasarım ve teknoloji üzerine düşünceler")),
                )
                .child(empty_state(state))
                .child(posts_grid(state, false)),
        ),
    );
    fragment([page(state, route, main), footer()])
}

pub fn post(state: &AppState, route: &str) -> Node {
    let Some(post) = state.current_post.as_ref() else {
        let loading = el("main")
            .class("loading-page")
            .child(el("p").text("Yükleniyor..."));
        return page(state, route, loading);
    };

    let is_author = state.user().is_some_and(|u| u.id == post.author.id);
    let author_actions = is_author.then(|| {
        el("div")
            .class("post-actions")
            .child(
                el("button")
                    .attr("type", "button")
                    .attr("data-action", format!("edit:{}", post.slug))
                    .class("btn btn-ghost")
                    .child(icon("edit"))
                    .text(" Düzenle"),
            )
            .child(
                el("button")
                    .attr("type", "button")
                    .attr("data-action", format!("show-delete-modal:{}", post.slug))
                    .class("btn btn-ghost btn-danger")
                    .child(icon("trash"))
                    .text(" Sil"),
            )
    });

    let article = el("article").class("section").child(
        el("div")
            .class("container post-container")
            .child(
                el("div")
                    .class("post-header-actions")
                    .child(
                        el("a")
                            .attr("href", format!("#{}", router::BLOG))
                            .class("btn btn-ghost")
                            .child(icon("arrow-left"))
                            .text(" Geri"),
                    )
                    .children(author_actions),
            )
            .child(error_region("post-error", state.errors.post.as_deref()))
            .child(tag_list(post.tag_names()))
            .child(el("h1").class("post-title").text(post.title.clone()))
            .child(
                el("div")
                    .class("meta-info")
                    .child(
                        el("span")
                            .class("meta-item")
                            .child(icon("calendar"))
                            .text(format!(" {}", format_date(&post.created_at))),
                    )
                    .child(
                        el("span")
                            .class("meta-item")
                            .child(icon("clock"))
                            .text(format!(" {}", post.read_time)),
                    )
                    .child(
                        el("span")
                            .class("meta-item")
                            .child(icon("user"))
                            .text(format!(" {}", post.author.name)),
                    ),
            )
            .child(
                el("div")
                    .class("post-content")
                    .child(render_body(&post.content)),
            ),
    );

    let main = el("main").class("post-page").child(article);
    fragment([
        page(state, route, fragment([delete_modal(&post.slug), main.into()])),
        footer(),
    ])
}

fn input_group(label: &str, input_id: &'static str, kind: &str, icon_name: &str, placeholder: &str) -> Node {
    el("div")
        .class("form-group")
        .child(el("label").attr("for", input_id).text(label))
        .child(
            el("div")
                .class("input-wrapper")
                .child(icon(icon_name).class("input-icon"))
                .child(
                    el("input")
                        .attr("type", kind)
                        .id(input_id)
                        .attr("placeholder", placeholder)
                        .attr("required", "required"),
                ),
        )
        .into()
}

fn auth_page(
    state: &AppState,
    route: &str,
    heading: &str,
    subheading: &str,
    form: Node,
    footer_text: &str,
    footer_link: (&str, &str),
) -> Node {
    let card = el("div")
        .class("auth-card animate-fade-in")
        .child(
            el("div")
                .class("auth-header")
                .child(el("h1").text(heading))
                .child(el("p").text(subheading)),
        )
        .child(oauth_buttons())
        .child(
            el("div")
                .class("auth-divider")
                .child(el("span").text("veya email ile")),
        )
        .child(form)
        .child(
            el("p")
                .class("auth-footer")
                .text(format!("{footer_text} "))
                .child(
                    el("a")
                        .attr("href", format!("#{}", footer_link.0))
                        .text(footer_link.1),
                ),
        );

    let main = el("main")
        .class("auth-page")
        .child(oauth_modal())
        .child(card);
    page(state, route, main)
}

pub fn login(state: &AppState, route: &str) -> Node {
    let form = el("form")
        .class("auth-form")
        .attr("data-action", "login")
        .child(error_region("login-error", state.errors.login.as_deref()))
        .child(input_group("Email", "email", "email", "mail", "ornek@email.com"))
        .child(input_group("Şifre", "password", "password", "lock", "••••••••"))
        .child(
            el("button")
                .attr("type", "submit")
                .class("submit-btn")
                .text("Giriş Yap"),
        );
    auth_page(
        state,
        route,
        "Tekrar Hoş Geldin",
        "Hesabına giriş yap ve yazmaya devam et",
        form.into(),
        "Hesabın yok mu?",
        (router::REGISTER, "Kayıt ol"),
    )
}

pub fn register(state: &AppState, route: &str) -> Node {
    let form = el("form")
        .class("auth-form")
        .attr("data-action", "register")
        .child(error_region("register-error", state.errors.register.as_deref()))
        .child(input_group("Ad Soyad", "name", "text", "user", "Adınız"))
        .child(input_group("Email", "email", "email", "mail", "ornek@email.com"))
        .child(input_group("Şifre", "password", "password", "lock", "En az 6 karakter"))
        .child(
            el("button")
                .attr("type", "submit")
                .class("submit-btn")
                .text("Kayıt Ol"),
        );
    auth_page(
        state,
        route,
        "Hesap Oluştur",
        "Düşüncelerini paylaşmaya başla",
        form.into(),
        "Zaten hesabın var mı?",
        (router::LOGIN, "Giriş yap"),
    )
}

fn write_preview(state: &AppState, user: &User) -> Node {
    let draft = &state.editor.draft;
    let title = if draft.title.trim().is_empty() {
        "Başlık".to_string()
    } else {
        draft.title.clone()
    };
    el("div")
        .class("write-preview animate-fade-in")
        .child(tag_list(state.editor.tags.iter().cloned()))
        .child(el("h1").class("preview-title").text(title))
        .child(el("p").class("preview-excerpt").text(draft.excerpt.clone()))
        .child(
            el("div").class("preview-meta").child(
                el("span")
                    .class("meta-item")
                    .child(icon("user"))
                    .text(format!(" {}", user.name)),
            ),
        )
        .child(
            el("div")
                .class("preview-content")
                .child(render_body(&draft.content)),
        )
        .into()
}

fn write_form(state: &AppState) -> Node {
    let editor = &state.editor;
    let tags = editor.tags.iter().map(|t| {
        el("span").class("tag-item").text(t.clone()).child(
            el("button")
                .attr("type", "button")
                .attr("data-action", format!("untag:{t}"))
                .child(icon("close")),
        )
    });

    el("div")
        .class("write-form animate-fade-in")
        .child(
            el("input")
                .attr("type", "text")
                .id("title")
                .class("write-title-input")
                .attr("placeholder", "Başlık")
                .attr("value", editor.draft.title.clone())
                .attr("required", "required"),
        )
        .child(
            el("input")
                .attr("type", "text")
                .id("excerpt")
                .class("write-excerpt-input")
                .attr("placeholder", "Kısa özet (opsiyonel)")
                .attr("value", editor.draft.excerpt.clone()),
        )
        .child(
            el("div")
                .class("tags-section")
                .child(el("label").text("Etiketler"))
                .child(el("div").class("tags-list").id("tagsList").children(tags))
                .child(
                    el("div")
                        .class("tag-input-wrapper")
                        .child(
                            el("input")
                                .attr("type", "text")
                                .id("tagInput")
                                .attr("placeholder", "Etiket ekle")
                                .attr("data-action", "tag"),
                        )
                        .child(
                            el("button")
                                .attr("type", "button")
                                .class("btn-icon-sm")
                                .attr("data-action", "tag")
                                .child(icon("plus")),
                        ),
                )
                .child(
                    el("span")
                        .class("tag-hint")
                        .text(format!("{}/{} etiket", editor.tags.len(), MAX_TAGS)),
                ),
        )
        .child(
            el("div")
                .class("content-section")
                .child(el("label").text("İçerik"))
                .child(
                    el("div")
                        .id("content")
                        .class("editor-content")
                        .attr("contenteditable", "true")
                        .attr("data-placeholder", "Yazınızı buraya yazın..."),
                )
                .child(
                    el("span")
                        .class("content-hint")
                        .id("wordCount")
                        .text("0 kelime · ~1 dk okuma"),
                ),
        )
        .into()
}

/// The authoring page. Callers redirect signed-out visitors first.
pub fn write(state: &AppState, route: &str, user: &User) -> Node {
    let editor = &state.editor;
    let editing = editor.editing_slug.as_deref();

    let back = match editing {
        Some(slug) => post_path(slug),
        None => router::HOME.to_string(),
    };
    let (submit_action, submit_icon, submit_label) = if editing.is_some() {
        ("update-post", "save", "Kaydet")
    } else {
        ("create-post", "send", "Yayınla")
    };
    let (preview_icon, preview_label) = if editor.preview {
        ("edit", "Düzenle")
    } else {
        ("eye", "Önizle")
    };

    let header = el("div")
        .class("write-header")
        .child(
            el("a")
                .attr("href", format!("#{back}"))
                .class("back-link")
                .attr("data-action", "cancel-edit")
                .child(icon("arrow-left"))
                .text(if editing.is_some() { " İptal" } else { " Geri" }),
        )
        .child(
            el("div")
                .class("write-actions")
                .child(
                    el("button")
                        .attr("type", "button")
                        .class("btn btn-ghost")
                        .attr("data-action", "toggle-preview")
                        .child(icon(preview_icon))
                        .text(format!(" {preview_label}")),
                )
                .child(
                    el("button")
                        .attr("type", "button")
                        .class("btn btn-primary")
                        .attr("data-action", submit_action)
                        .child(icon(submit_icon))
                        .text(format!(" {submit_label}")),
                ),
        );

    let body = if editor.preview {
        write_preview(state, user)
    } else {
        write_form(state)
    };

    let main = el("main").class("write-page").child(
        el("div")
            .class("write-container")
            .child(header)
            .child(error_region("write-error", state.errors.write.as_deref()))
            .child(body),
    );
    page(state, route, main)
}

fn provider_label(provider: &str) -> &'static str {
    match provider {
        "google" => "Google",
        "microsoft" => "Microsoft",
        "x" => "X (Twitter)",
        _ => "E-posta",
    }
}

pub fn profile(state: &AppState, route: &str, user: &User) -> Node {
    let joined = user
        .created_at
        .as_deref()
        .map(format_date)
        .unwrap_or_else(|| "Bilinmiyor".to_string());

    let account_row = |icon_name: &str, label: &str, value: String| {
        el("div")
            .class("account-row")
            .child(
                el("span")
                    .class("account-label")
                    .child(icon(icon_name))
                    .text(format!(" {label}")),
            )
            .child(el("span").class("account-value").text(value))
    };

    let container = el("div")
        .class("profile-container animate-fade-in")
        .child(
            el("a")
                .attr("href", format!("#{}", router::HOME))
                .class("back-link")
                .child(icon("arrow-left"))
                .text(" Ana Sayfaya Dön"),
        )
        .child(
            el("div").class("profile-card").child(
                el("div")
                    .class("profile-header")
                    .child(el("div").class("profile-avatar").text(user.initials()))
                    .child(
                        el("div")
                            .class("profile-info")
                            .child(el("h1").text(user.name.clone()))
                            .child(el("p").text(user.email.clone())),
                    ),
            ),
        )
        .child(
            el("div")
                .class("profile-card")
                .child(el("h2").text("Profil Bilgileri"))
                .child(
                    el("div")
                        .class("profile-form")
                        .child(
                            el("div")
                                .class("form-group")
                                .child(el("label").attr("for", "profileName").text("Ad Soyad"))
                                .child(
                                    el("input")
                                        .attr("type", "text")
                                        .id("profileName")
                                        .attr("value", user.name.clone()),
                                ),
                        )
                        .child(
                            el("div")
                                .class("form-group")
                                .child(el("label").text("E-posta"))
                                .child(
                                    el("input")
                                        .attr("type", "email")
                                        .attr("value", user.email.clone())
                                        .attr("disabled", "disabled"),
                                )
                                .child(
                                    el("span")
                                        .class("form-hint")
                                        .text("E-posta adresi değiştirilemez"),
                                ),
                        )
                        .child(
                            el("button")
                                .attr("type", "button")
                                .class("btn btn-primary")
                                .attr("data-action", "update-profile")
                                .child(icon("save"))
                                .text(" Değişiklikleri Kaydet"),
                        ),
                ),
        )
        .child(
            el("div")
                .class("profile-card")
                .child(el("h2").text("Hesap Bilgileri"))
                .child(
                    el("div")
                        .class("account-info")
                        .child(account_row(
                            "shield",
                            "Giriş Yöntemi",
                            provider_label(&user.provider).to_string(),
                        ))
                        .child(account_row("calendar", "Katılım Tarihi", joined)),
                ),
        );

    page(state, route, el("main").class("profile-page").child(container))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_post, sample_user};

    #[test]
    fn test_home_separates_featured() {
        let mut state = AppState::new();
        let mut featured = sample_post("one");
        featured.featured = true;
        state.posts = vec![featured, sample_post("two")];

        let html = home(&state, "/").render();
        assert!(html.contains("Öne Çıkan"));
        assert_eq!(html.matches(r##"href="#/post/one""##).count(), 1);
        assert_eq!(html.matches(r##"href="#/post/two""##).count(), 1);
    }

    #[test]
    fn test_blog_empty_state() {
        let state = AppState::new();
        let html = blog(&state, "/blog").render();
        assert!(html.contains("Henüz yazı yok."));
    }

    #[test]
    fn test_post_loading_when_absent() {
        let state = AppState::new();
        let html = post(&state, "/post/x").render();
        assert!(html.contains("Yükleniyor..."));
    }

    #[test]
    fn test_post_author_actions_only_for_author() {
        let mut state = AppState::new();
        state.current_post = Some(sample_post("mine"));
        assert!(!post(&state, "/post/mine").render().contains("edit:mine"));

        state.set_auth("tok".into(), sample_user());
        let html = post(&state, "/post/mine").render();
        assert!(html.contains(r#"data-action="edit:mine""#));
        assert!(html.contains(r#"data-action="delete:mine""#));
    }

    #[test]
    fn test_write_form_for_new_post() {
        let mut state = AppState::new();
        let user = sample_user();
        state.editor.tags = vec!["rust".into()];
        let html = write(&state, "/write", &user).render();
        assert!(html.contains(r#"data-action="create-post""#));
        assert!(html.contains(r#"id="content""#));
        assert!(html.contains("1/5 etiket"));
        assert!(html.contains(r#"id="write-error" class="error-message" style="display:none""#));
    }

    #[test]
    fn test_write_preview_for_edit() {
        let mut state = AppState::new();
        let user = sample_user();
        state.editor.editing_slug = Some("mine".into());
        state.editor.preview = true;
        state.editor.draft.content = "**kalın**".into();
        let html = write(&state, "/write", &user).render();
        assert!(html.contains(r#"data-action="update-post""#));
        assert!(html.contains(r##"href="#/post/mine""##));
        assert!(html.contains("<strong>kalın</strong>"));
        assert!(html.contains(">Başlık</h1>"));
        assert!(!html.contains(r#"id="content""#));
    }

    #[test]
    fn test_profile_shows_provider_and_join_date() {
        let state = AppState::new();
        let mut user = sample_user();
        user.provider = "google".into();
        let html = profile(&state, "/profile", &user).render();
        assert!(html.contains("Google"));
        assert!(html.contains("10 Ocak 2024"));

        user.created_at = None;
        let html = profile(&state, "/profile", &user).render();
        assert!(html.contains("Bilinmiyor"));
    }
}
