//! Typed markup tree.
//!
//! Pages build `Node` values instead of formatting strings. Text and
//! attribute values are escaped when the tree is serialized, so user content
//! can't open tags. `Node::Raw` is the one way to emit HTML verbatim.

/// Elements that never have children or a closing tag.
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "meta", "link"];

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    /// Trusted HTML, emitted as-is.
    Raw(String),
    Fragment(Vec<Node>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: &'static str,
    pub attrs: Vec<(&'static str, String)>,
    pub children: Vec<Node>,
}

/// Starts an element.
pub fn el(tag: &'static str) -> Element {
    Element {
        tag,
        attrs: Vec::new(),
        children: Vec::new(),
    }
}

pub fn text(s: impl Into<String>) -> Node {
    Node::Text(s.into())
}

pub fn fragment(nodes: impl IntoIterator<Item = Node>) -> Node {
    Node::Fragment(nodes.into_iter().collect())
}

pub fn empty() -> Node {
    Node::Fragment(Vec::new())
}

impl Element {
    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    pub fn class(self, class: impl Into<String>) -> Self {
        self.attr("class", class)
    }

    /// Adds `class` only when `on` holds.
    pub fn class_if(self, on: bool, class: &'static str) -> Self {
        if on { self.class(class) } else { self }
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn text(self, s: impl Into<String>) -> Self {
        self.child(Node::Text(s.into()))
    }

    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    /// Repeated attributes (two `class` calls) are merged with a space.
    fn merged_attrs(&self) -> Vec<(&'static str, String)> {
        let mut merged: Vec<(&'static str, String)> = Vec::with_capacity(self.attrs.len());
        for (name, value) in &self.attrs {
            match merged.iter_mut().find(|(n, _)| n == name) {
                Some((_, existing)) => {
                    existing.push(' ');
                    existing.push_str(value);
                }
                None => merged.push((name, value.clone())),
            }
        }
        merged
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Text(s.to_string())
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::Text(s)
    }
}

impl Node {
    /// Serializes the tree to an HTML string.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }

    fn write_to(&self, out: &mut String) {
        match self {
            Node::Text(s) => out.push_str(&escape(s)),
            Node::Raw(html) => out.push_str(html),
            Node::Fragment(nodes) => nodes.iter().for_each(|n| n.write_to(out)),
            Node::Element(el) => {
                out.push('<');
                out.push_str(el.tag);
                for (name, value) in el.merged_attrs() {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape(&value));
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&el.tag) {
                    return;
                }
                el.children.iter().for_each(|n| n.write_to(out));
                out.push_str("</");
                out.push_str(el.tag);
                out.push('>');
            }
        }
    }
}

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Drops everything between `<` and `>` and turns non-breaking space
/// entities into spaces. Good enough for word counts.
pub fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => {
                in_tag = true;
                out.push(' ');
            }
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.replace("&nbsp;", " ").replace("&#160;", " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_escaped() {
        let node: Node = el("p").text("<script>alert('x')</script> & co").into();
        assert_eq!(
            node.render(),
            "<p>&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; co</p>"
        );
    }

    #[test]
    fn test_attrs_escaped_and_merged() {
        let node: Node = el("a")
            .class("nav-link")
            .class_if(true, "active")
            .class_if(false, "hidden")
            .attr("href", "#/post/\"x\"")
            .text("Yazılar")
            .into();
        assert_eq!(
            node.render(),
            r##"<a class="nav-link active" href="#/post/&quot;x&quot;">Yazılar</a>"##
        );
    }

    #[test]
    fn test_void_elements_have_no_close_tag() {
        let node: Node = el("input").attr("type", "text").id("title").into();
        assert_eq!(node.render(), r#"<input type="text" id="title">"#);
    }

    #[test]
    fn test_raw_passes_through() {
        let node = fragment([Node::Raw("<b>kalın</b>".into()), text(" metin")]);
        assert_eq!(node.render(), "<b>kalın</b> metin");
    }
}
