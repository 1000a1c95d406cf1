//! Page metadata extraction
//!
//! Pulls the title, meta description, the full ordered meta-tag list,
//! and embedded JSON-LD structured-data payloads from a normalized
//! tree. Meta tags are raw pass-through; structured-data payloads are
//! captured verbatim and parsed on a best-effort basis.

use crate::extraction::dom::{DomElement, DomNode};
use serde::{Deserialize, Serialize};

/// A raw meta tag (name/property key and content value, no validation)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaTag {
    /// `name` attribute, if present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `property` attribute, if present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    /// `content` attribute, if present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// An embedded structured-data payload, captured verbatim.
///
/// The schema is not validated; `parsed` is populated only when the
/// payload is well-formed JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredDataRecord {
    /// The payload text exactly as it appeared in the page
    pub raw: String,
    /// Parsed JSON value, when the payload parses
    pub parsed: Option<serde_json::Value>,
}

/// Extracted page metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageMetadata {
    /// First `<title>` text, if any
    pub title: Option<String>,
    /// The description meta value, if any
    pub description: Option<String>,
    /// All meta tags in document order, duplicates kept as-is
    pub meta_tags: Vec<MetaTag>,
    /// All JSON-LD payloads in document order
    pub structured_data: Vec<StructuredDataRecord>,
}

/// Extract all metadata from a normalized tree.
///
/// Never fails: sparse pages simply yield empty collections.
pub fn extract_metadata(root: &DomElement) -> PageMetadata {
    let mut meta = PageMetadata::default();

    root.walk_elements(&mut |el| match el.tag.as_str() {
        "title" => {
            if meta.title.is_none() {
                let text = el.flat_text();
                if !text.is_empty() {
                    meta.title = Some(text);
                }
            }
        }
        "meta" => {
            let tag = MetaTag {
                name: el.attr("name").map(str::to_string),
                property: el.attr("property").map(str::to_string),
                content: el.attr("content").map(str::to_string),
            };
            if tag == MetaTag::default() {
                return;
            }
            if meta.description.is_none()
                && tag.name.as_deref().is_some_and(|n| n.eq_ignore_ascii_case("description"))
            {
                meta.description = tag.content.clone().filter(|c| !c.trim().is_empty());
            }
            meta.meta_tags.push(tag);
        }
        "script" => {
            // Only JSON-LD scripts survive normalization
            let raw = raw_text(el);
            let raw = raw.trim();
            if raw.is_empty() {
                return;
            }
            let parsed = serde_json::from_str(raw).ok();
            meta.structured_data.push(StructuredDataRecord {
                raw: raw.to_string(),
                parsed,
            });
        }
        _ => {}
    });

    meta
}

/// Verbatim text of an element's descendant text nodes
fn raw_text(el: &DomElement) -> String {
    let mut out = String::new();
    for child in &el.children {
        match child {
            DomNode::Text(t) => out.push_str(t),
            DomNode::Element(nested) => out.push_str(&raw_text(nested)),
        }
    }
    out
}
