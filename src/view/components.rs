//! Shared pieces of page markup.
//!
//! Interactive elements carry a `data-action` attribute naming the
//! `Action` the host should dispatch when they fire. Icons are empty spans
//! with an `icon-<name>` class; the stylesheet supplies the artwork.

use crate::api::{Post, User};
use crate::core::state::{AppState, Theme};
use crate::router::{self, post_path};

use super::markdown::format_date;
use super::node::{Element, Node, el, empty, fragment};

pub fn icon(name: &str) -> Element {
    el("span").class(format!("icon icon-{name}"))
}

fn link(href: impl Into<String>) -> Element {
    el("a").attr("href", format!("#{}", href.into()))
}

fn action_button(action: impl Into<String>) -> Element {
    el("button").attr("type", "button").attr("data-action", action)
}

pub fn navbar(state: &AppState, route: &str) -> Node {
    let account = match state.user() {
        Some(user) => user_menu(user),
        None => auth_buttons(),
    };

    el("header")
        .class("navbar")
        .child(
            el("nav")
                .class("nav-container")
                .child(
                    link(router::HOME)
                        .class("logo")
                        .child(el("div").class("logo-icon").text("B"))
                        .child(el("span").class("logo-text").text("Blog")),
                )
                .child(
                    el("div")
                        .class("nav-links")
                        .child(
                            link(router::HOME)
                                .class("nav-link")
                                .class_if(route == router::HOME, "active")
                                .text("Ana Sayfa"),
                        )
                        .child(
                            link(router::BLOG)
                                .class("nav-link")
                                .class_if(route == router::BLOG, "active")
                                .text("Yazılar"),
                        )
                        .child(theme_switcher(state.theme))
                        .child(account),
                ),
        )
        .into()
}

fn theme_icon(theme: Theme) -> &'static str {
    match theme {
        Theme::Light => "sun",
        Theme::Dark => "moon",
        _ => "palette",
    }
}

pub fn theme_switcher(current: Theme) -> Node {
    let options = Theme::ALL.iter().map(|&theme| {
        action_button(format!("set-theme:{}", theme.as_str()))
            .class("theme-option")
            .class_if(theme == current, "active")
            .child(icon(theme_icon(theme)))
            .child(el("span").text(theme.label()))
            .child(if theme == current {
                icon("check").into()
            } else {
                empty()
            })
    });

    el("div")
        .class("theme-switcher")
        .child(
            action_button("cycle-theme")
                .class("btn-icon")
                .attr("title", current.label())
                .child(icon(if current.is_dark() { "moon" } else { "sun" })),
        )
        .child(
            el("div")
                .class("theme-dropdown")
                .id("themeDropdown")
                .children(options),
        )
        .into()
}

pub fn auth_buttons() -> Node {
    el("div")
        .class("auth-buttons")
        .child(link(router::LOGIN).class("btn btn-ghost").text("Giriş"))
        .child(link(router::REGISTER).class("btn btn-primary").text("Kayıt Ol"))
        .into()
}

pub fn user_menu(user: &User) -> Node {
    el("div")
        .class("user-menu")
        .child(
            action_button("toggle-user-menu")
                .class("avatar")
                .text(user.initials()),
        )
        .child(
            el("div")
                .class("user-dropdown")
                .id("userDropdown")
                .attr("style", "display:none")
                .child(
                    el("div")
                        .class("user-info")
                        .child(el("strong").text(user.name.clone()))
                        .child(el("span").text(user.email.clone())),
                )
                .child(link(router::WRITE).child(icon("edit")).text(" Yazı Yaz"))
                .child(link(router::PROFILE).child(icon("user")).text(" Profil"))
                .child(
                    action_button("logout")
                        .class("logout")
                        .child(icon("logout"))
                        .text(" Çıkış Yap"),
                ),
        )
        .into()
}

pub fn tag_list(names: impl IntoIterator<Item = String>) -> Node {
    el("div")
        .class("tags")
        .children(names.into_iter().map(|n| el("span").class("tag").text(n)))
        .into()
}

pub fn post_card(post: &Post, index: usize) -> Node {
    link(post_path(&post.slug))
        .class(format!("card animate-fade-in delay-{}", index % 4 + 1))
        .child(
            el("div")
                .class("card-content")
                .child(tag_list(post.tag_names()))
                .child(el("h3").class("card-title").text(post.title.clone()))
                .child(
                    el("p")
                        .class("card-excerpt")
                        .text(post.excerpt.clone().unwrap_or_default()),
                )
                .child(
                    el("div").class("card-meta").child(
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
                            ),
                    ),
                ),
        )
        .into()
}

/// A form's error box. Hidden unless there is a message.
pub fn error_region(id: &'static str, message: Option<&str>) -> Node {
    let region = el("div").id(id).class("error-message");
    let region = match message {
        Some(msg) => region.attr("style", "display:block").text(msg),
        None => region.attr("style", "display:none"),
    };
    region.into()
}

pub fn notice(message: Option<&str>) -> Node {
    match message {
        Some(msg) => el("div")
            .id("notice")
            .class("notice")
            .attr("role", "status")
            .text(msg)
            .into(),
        None => empty(),
    }
}

pub fn delete_modal(slug: &str) -> Node {
    el("div")
        .id("deleteModal")
        .class("modal-overlay")
        .attr("style", "display:none")
        .child(
            el("div")
                .class("modal")
                .child(el("h3").text("Yazıyı Sil"))
                .child(el("p").text(
                    "Bu yazıyı silmek istediğinize emin misiniz? Bu işlem geri alınamaz.",
                ))
                .child(
                    el("div")
                        .class("modal-actions")
                        .child(
                            action_button("close-delete-modal")
                                .class("btn btn-ghost")
                                .text("İptal"),
                        )
                        .child(
                            action_button(format!("delete:{slug}"))
                                .class("btn btn-danger")
                                .child(icon("trash"))
                                .text(" Sil"),
                        ),
                ),
        )
        .into()
}

pub const OAUTH_PROVIDERS: [(&str, &str); 3] =
    [("google", "Google"), ("microsoft", "Microsoft"), ("x", "X")];

pub fn oauth_buttons() -> Node {
    el("div")
        .class("oauth-buttons")
        .children(OAUTH_PROVIDERS.iter().map(|(id, name)| {
            action_button(format!("oauth:{id}"))
                .class("btn btn-oauth")
                .child(icon(id))
                .text(format!(" {name} ile devam et"))
        }))
        .into()
}

pub fn oauth_modal() -> Node {
    el("div")
        .id("oauthModal")
        .class("modal-overlay")
        .attr("style", "display:none")
        .child(
            el("div")
                .class("modal")
                .child(icon("shield"))
                .child(
                    el("h3")
                        .child(el("span").id("providerName"))
                        .text(" ile giriş"),
                )
                .child(el("p").child(el("span").id("providerEmail")))
                .child(
                    el("div")
                        .class("modal-actions")
                        .child(
                            action_button("close-oauth-modal")
                                .class("btn btn-ghost")
                                .text("İptal"),
                        )
                        .child(
                            action_button("confirm-oauth")
                                .class("btn btn-primary")
                                .text("Devam Et"),
                        ),
                ),
        )
        .into()
}

pub fn page(state: &AppState, route: &str, main: impl Into<Node>) -> Node {
    fragment([
        navbar(state, route),
        notice(state.notice.as_deref()),
        main.into(),
    ])
}
