//! Post body and date formatting.
//!
//! Bodies written in the rich-text editor are stored as HTML and go out
//! untouched. Anything else is treated as markdown and rendered through
//! `pulldown_cmark`.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use pulldown_cmark::{Options, Parser, html};

use super::node::{Node, strip_tags};

const MONTHS_TR: [&str; 12] = [
    "Ocak", "Şubat", "Mart", "Nisan", "Mayıs", "Haziran", "Temmuz", "Ağustos", "Eylül", "Ekim",
    "Kasım", "Aralık",
];

/// Editor output starts with a tag or contains a closing one.
pub fn looks_like_html(content: &str) -> bool {
    content.starts_with('<') || content.contains("</")
}

/// Renders a post body to a raw node.
///
/// Note that the HTML branch (and HTML inside markdown) is emitted without
/// sanitizing; the body is whatever the author saved.
pub fn render_body(content: &str) -> Node {
    if looks_like_html(content) {
        return Node::Raw(content.to_string());
    }

    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TABLES);

    let mut out = String::with_capacity(content.len() * 3 / 2);
    html::push_html(&mut out, Parser::new_ext(content, opts));
    Node::Raw(out)
}

/// Word count and reading minutes (200 words a minute, at least one).
pub fn reading_stats(html: &str) -> (usize, usize) {
    let words = strip_tags(html).split_whitespace().count();
    let minutes = words.div_ceil(200).max(1);
    (words, minutes)
}

pub fn word_count_label(html: &str) -> String {
    let (words, minutes) = reading_stats(html);
    format!("{words} kelime · ~{minutes} dk okuma")
}

/// Long Turkish date (`5 Mart 2024`). Accepts RFC 3339 or the backend's
/// naive ISO timestamps; anything else is shown as given.
pub fn format_date(timestamp: &str) -> String {
    parse_date(timestamp)
        .map(|d| format!("{} {} {}", d.day(), MONTHS_TR[d.month0() as usize], d.year()))
        .unwrap_or_else(|| timestamp.to_string())
}

fn parse_date(timestamp: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(timestamp, "%Y-%m-%d").ok()
}
