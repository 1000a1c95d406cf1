//! HTML normalization
//!
//! This module parses raw HTML leniently and reduces it to an owned
//! tree of element and text nodes with all non-visible material
//! stripped: comments, script/style machinery, and anything carrying a
//! static "hidden" disposition.

use crate::error::ExtractionError;
use scraper::{ElementRef, Html, Node};

/// Tags whose subtrees are never visible to a user.
///
/// `script` is special-cased: JSON-LD payloads (`type="application/ld+json"`)
/// are retained as opaque data carriers for the metadata stage. They emit
/// no visible text downstream because the content extractor never
/// classifies script elements.
const INVISIBLE_TAGS: &[&str] = &["script", "style", "noscript", "template", "iframe"];

/// A node in the normalized tree
#[derive(Debug, Clone)]
pub enum DomNode {
    /// An element with tag, attributes, and children
    Element(DomElement),
    /// A text node (raw, not yet whitespace-collapsed)
    Text(String),
}

/// An element in the normalized tree
#[derive(Debug, Clone)]
pub struct DomElement {
    /// Lowercased tag name
    pub tag: String,
    /// Attribute name/value pairs in source order
    pub attrs: Vec<(String, String)>,
    /// Child nodes in document order
    pub children: Vec<DomNode>,
}

impl DomElement {
    /// Look up an attribute value by (lowercase) name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Concatenated descendant text, whitespace-collapsed and trimmed
    pub fn flat_text(&self) -> String {
        let mut raw = String::new();
        self.collect_text(&mut raw);
        collapse_whitespace(&raw)
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                DomNode::Text(t) => {
                    out.push_str(t);
                    out.push(' ');
                }
                DomNode::Element(el) => el.collect_text(out),
            }
        }
    }

    /// Visit this element and all descendant elements in document order
    pub fn walk_elements<'a>(&'a self, f: &mut impl FnMut(&'a DomElement)) {
        f(self);
        for child in &self.children {
            if let DomNode::Element(el) = child {
                el.walk_elements(f);
            }
        }
    }
}

/// Collapse runs of whitespace to a single space and trim the ends
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse raw HTML into a normalized tree.
///
/// The parser (html5ever via `scraper`) is lenient and recovers from
/// malformed markup the way browsers do; a best-effort partial tree is
/// acceptable. Comments and non-visible nodes are discarded during
/// conversion.
pub fn normalize(html: &str) -> Result<DomElement, ExtractionError> {
    let doc = Html::parse_document(html);
    let root = doc
        .tree
        .root()
        .children()
        .find_map(ElementRef::wrap)
        .ok_or_else(|| ExtractionError::Unparseable("document has no root element".to_string()))?;

    match convert(root) {
        Some(DomNode::Element(el)) => Ok(el),
        _ => Err(ExtractionError::Unparseable(
            "document root is not visible content".to_string(),
        )),
    }
}

/// Whether an element is statically hidden.
///
/// Pure predicate over a single node: hidden attribute, aria-hidden,
/// `input type=hidden`, or an inline style that makes it invisible
/// (`display:none`, `visibility:hidden`, zero width/height, zero
/// opacity). Deliberately does not consider computed/cascaded styles
/// or layout.
fn is_hidden(el: ElementRef) -> bool {
    let v = el.value();

    if v.attr("hidden").is_some() {
        return true;
    }
    if v.attr("aria-hidden")
        .is_some_and(|a| a.eq_ignore_ascii_case("true"))
    {
        return true;
    }
    if v.name().eq_ignore_ascii_case("input")
        && v.attr("type").is_some_and(|t| t.eq_ignore_ascii_case("hidden"))
    {
        return true;
    }
    if let Some(style) = v.attr("style") {
        for decl in style.split(';') {
            let mut parts = decl.splitn(2, ':');
            let (Some(prop), Some(val)) = (parts.next(), parts.next()) else {
                continue;
            };
            let prop = prop.trim().to_ascii_lowercase();
            let val = val.trim().to_ascii_lowercase();
            if (prop == "display" && val == "none")
                || (prop == "visibility" && val == "hidden")
                || (matches!(prop.as_str(), "width" | "height" | "opacity") && is_css_zero(&val))
            {
                return true;
            }
        }
    }

    false
}

/// Whether an inline style value is numerically zero, with or without
/// a unit suffix ("0", "0px", "0.0em", "0%")
fn is_css_zero(val: &str) -> bool {
    let number = val.trim_end_matches(|c: char| c.is_ascii_alphabetic() || c == '%');
    !number.is_empty() && number.parse::<f32>().map_or(false, |n| n == 0.0)
}

/// Whether a script element carries a JSON-LD structured-data payload
fn is_json_ld(el: ElementRef) -> bool {
    el.value().name().eq_ignore_ascii_case("script")
        && el
            .value()
            .attr("type")
            .is_some_and(|t| t.trim().eq_ignore_ascii_case("application/ld+json"))
}

fn convert(el: ElementRef) -> Option<DomNode> {
    let tag = el.value().name().to_ascii_lowercase();

    if INVISIBLE_TAGS.contains(&tag.as_str()) && !is_json_ld(el) {
        return None;
    }
    if is_hidden(el) {
        return None;
    }

    let attrs = el
        .value()
        .attrs()
        .map(|(k, v)| (k.to_ascii_lowercase(), v.to_string()))
        .collect();

    let mut children = Vec::new();
    for child in el.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            if let Some(node) = convert(child_el) {
                children.push(node);
            }
        } else if let Node::Text(text) = child.value() {
            children.push(DomNode::Text(text.to_string()));
        }
        // Comments and processing instructions are discarded
    }

    Some(DomNode::Element(DomElement { tag, attrs, children }))
}

impl DomNode {
    /// The element inside this node, if it is one
    pub fn as_element(&self) -> Option<&DomElement> {
        match self {
            DomNode::Element(el) => Some(el),
            DomNode::Text(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(html: &str) -> DomElement {
        normalize(html).expect("lenient parse should succeed")
    }

    fn find<'a>(root: &'a DomElement, tag: &str) -> Option<&'a DomElement> {
        let mut found = None;
        root.walk_elements(&mut |el| {
            if found.is_none() && el.tag == tag {
                found = Some(el);
            }
        });
        found
    }

    #[test]
    fn test_scripts_and_styles_are_dropped() {
        let root = parse("<body><script>evil();</script><style>p{}</style><p>Keep</p></body>");
        assert!(find(&root, "script").is_none());
        assert!(find(&root, "style").is_none());
        assert_eq!(find(&root, "p").unwrap().flat_text(), "Keep");
    }

    #[test]
    fn test_json_ld_scripts_are_kept() {
        let root = parse(r#"<script type="application/ld+json">{"@type":"Thing"}</script>"#);
        let script = find(&root, "script").expect("json-ld script retained");
        assert!(script.flat_text().contains("@type"));
    }

    #[test]
    fn test_hidden_elements_are_dropped() {
        let html = r#"
            <p hidden>one</p>
            <p aria-hidden="true">two</p>
            <p style="display: none">three</p>
            <p style="visibility:hidden">four</p>
            <input type="hidden" value="five">
            <p>visible</p>
        "#;
        let root = parse(html);
        let text = root.flat_text();
        assert_eq!(text, "visible");
    }

    #[test]
    fn test_zero_size_and_zero_opacity_are_hidden() {
        let html = r#"
            <p style="width: 0">one</p>
            <p style="height:0px">two</p>
            <p style="opacity: 0.0">three</p>
            <p style="width: 0%; color: red">four</p>
            <p style="opacity: 0.5">visible</p>
        "#;
        let root = parse(html);
        assert_eq!(root.flat_text(), "visible");
    }

    #[test]
    fn test_nonzero_dimensions_are_kept() {
        let root = parse(r#"<p style="width: 10px; height: 2em">shown</p>"#);
        assert_eq!(root.flat_text(), "shown");
    }

    #[test]
    fn test_style_attribute_not_hiding_is_kept() {
        let root = parse(r#"<p style="display: block; color: red">shown</p>"#);
        assert_eq!(root.flat_text(), "shown");
    }

    #[test]
    fn test_comments_are_discarded() {
        let root = parse("<p>before<!-- comment -->after</p>");
        assert_eq!(root.flat_text(), "before after");
    }

    #[test]
    fn test_malformed_html_still_parses() {
        let root = parse("<p>unclosed <b>nested <p>second");
        assert!(root.flat_text().contains("unclosed"));
        assert!(root.flat_text().contains("second"));
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\t b  c  "), "a b c");
        assert_eq!(collapse_whitespace("   "), "");
    }

    #[test]
    fn test_attr_lookup() {
        let root = parse(r#"<a href="/about" title="About">x</a>"#);
        let a = find(&root, "a").unwrap();
        assert_eq!(a.attr("href"), Some("/about"));
        assert_eq!(a.attr("missing"), None);
    }
}
