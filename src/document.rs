//! The root container the render loop commits into.
//!
//! A commit replaces the whole root; nothing from the previous markup
//! survives (region fills, watched inputs). Post-render hooks then address
//! elements of the new markup by `id`.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::PathBuf;

use log::{debug, warn};

use crate::view::node::escape;

pub trait Document: Send {
    /// Replaces the root container's content.
    fn replace_root(&mut self, markup: String);

    /// Sets the inner HTML of the element with `id`. False if it doesn't exist.
    fn set_region_html(&mut self, id: &str, html: &str) -> bool;

    /// Sets the text of the element with `id`. False if it doesn't exist.
    fn set_region_text(&mut self, id: &str, text: &str) -> bool;

    /// Starts forwarding input events from the element with `id`.
    fn watch_input(&mut self, id: &str) -> bool;
}

/// Keeps the committed markup in memory. Region writes are recorded beside
/// the markup as inner HTML; [`MemoryDocument::rendered`] splices them in.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    root: String,
    commits: usize,
    regions: HashMap<String, String>,
    watched: HashSet<String>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Number of commits so far.
    pub fn commits(&self) -> usize {
        self.commits
    }

    pub fn region(&self, id: &str) -> Option<&str> {
        self.regions.get(id).map(String::as_str)
    }

    pub fn is_watching(&self, id: &str) -> bool {
        self.watched.contains(id)
    }

    pub fn has_element(&self, id: &str) -> bool {
        self.root.contains(&format!("id=\"{id}\""))
    }

    /// The committed markup with every region write in place.
    pub fn rendered(&self) -> String {
        self.regions
            .iter()
            .fold(self.root.clone(), |markup, (id, inner)| {
                splice_inner(&markup, id, inner).unwrap_or(markup)
            })
    }
}

/// Replaces the children of the element carrying `id`. `None` when the
/// element or its closing tag can't be found.
fn splice_inner(markup: &str, id: &str, inner: &str) -> Option<String> {
    let attr = markup.find(&format!(" id=\"{id}\""))?;
    let open_start = markup[..attr].rfind('<')?;
    let tag: String = markup[open_start + 1..]
        .chars()
        .take_while(char::is_ascii_alphanumeric)
        .collect();
    let open_end = attr + markup[attr..].find('>')? + 1;

    let opener = format!("<{tag}");
    let closer = format!("</{tag}>");
    let mut depth = 1;
    let mut at = open_end;
    while depth > 0 {
        let rest = &markup[at..];
        let close = rest.find(&closer)?;
        let nested = rest[..close]
            .match_indices(&opener)
            .find(|(i, _)| matches!(rest[i + opener.len()..].chars().next(), Some(' ' | '>')));
        match nested {
            Some((i, _)) => {
                depth += 1;
                at += i + opener.len();
            }
            None => {
                depth -= 1;
                at += close + if depth == 0 { 0 } else { closer.len() };
            }
        }
    }
    Some(format!("{}{}{}", &markup[..open_end], inner, &markup[at..]))
}

impl Document for MemoryDocument {
    fn replace_root(&mut self, markup: String) {
        self.root = markup;
        self.commits += 1;
        self.regions.clear();
        self.watched.clear();
    }

    fn set_region_html(&mut self, id: &str, html: &str) -> bool {
        if !self.has_element(id) {
            return false;
        }
        self.regions.insert(id.to_string(), html.to_string());
        true
    }

    fn set_region_text(&mut self, id: &str, text: &str) -> bool {
        self.set_region_html(id, &escape(text))
    }

    fn watch_input(&mut self, id: &str) -> bool {
        if !self.has_element(id) {
            return false;
        }
        self.watched.insert(id.to_string());
        true
    }
}

/// Writes every commit to an HTML file, for the command-line host.
pub struct HtmlFileDocument {
    path: PathBuf,
    inner: MemoryDocument,
}

impl HtmlFileDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            inner: MemoryDocument::new(),
        }
    }

    fn write(&self) {
        let tmp_path = self.path.with_extension("tmp");
        let page = format!(
            "<!DOCTYPE html>\n<html lang=\"tr\">\n<body>\n<div id=\"app\">{}</div>\n</body>\n</html>\n",
            self.inner.rendered()
        );
        let result = fs::write(&tmp_path, page).and_then(|_| fs::rename(&tmp_path, &self.path));
        match result {
            Ok(()) => debug!(
                "Wrote commit #{} to {}",
                self.inner.commits(),
                self.path.display()
            ),
            Err(e) => warn!("Failed to write {}: {}", self.path.display(), e),
        }
    }
}

impl Document for HtmlFileDocument {
    fn replace_root(&mut self, markup: String) {
        self.inner.replace_root(markup);
        self.write();
    }

    fn set_region_html(&mut self, id: &str, html: &str) -> bool {
        let found = self.inner.set_region_html(id, html);
        if found {
            self.write();
        }
        found
    }

    fn set_region_text(&mut self, id: &str, text: &str) -> bool {
        let found = self.inner.set_region_text(id, text);
        if found {
            self.write();
        }
        found
    }

    fn watch_input(&mut self, id: &str) -> bool {
        self.inner.watch_input(id)
    }
}
