//! Content block extraction
//!
//! This module walks the normalized tree in document order and
//! classifies visible text into typed blocks (headings, paragraphs,
//! list items). Block order is preserved end-to-end; it is what makes
//! the output readable.

use crate::extraction::dom::{collapse_whitespace, DomElement, DomNode};
use serde::{Deserialize, Serialize};

/// Tags that carry paragraph-like text when not inside a list
const PARAGRAPH_TAGS: &[&str] = &[
    "p",
    "blockquote",
    "pre",
    "td",
    "th",
    "dt",
    "dd",
    "figcaption",
    "caption",
    "summary",
];

/// The kind of a content block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum BlockKind {
    /// A heading with its level (1-6)
    Heading {
        /// Heading level, 1-6
        level: u8,
    },
    /// A paragraph of running text
    Paragraph,
    /// An item inside an ordered or unordered list
    ListItem,
}

/// One classified unit of visible text.
///
/// Invariant: `text` is non-empty and whitespace-normalized (no
/// leading/trailing whitespace, no internal runs of whitespace).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Block classification
    #[serde(flatten)]
    pub kind: BlockKind,
    /// Whitespace-normalized visible text
    pub text: String,
}

/// Extract classified content blocks from a normalized tree in
/// document order.
///
/// Text is attributed to its most specific qualifying ancestor: a
/// classified element takes the text of its own text nodes and of
/// unclassified descendants, while nested classified elements become
/// blocks of their own (a list item's paragraph children are emitted
/// as list items, never twice).
pub fn extract_blocks(root: &DomElement) -> Vec<ContentBlock> {
    let mut blocks = Vec::new();
    walk(root, false, &mut blocks);
    blocks
}

/// Render a block sequence as lightweight markdown: headings become
/// `#`-prefixed lines scaled by level, list items `-`-prefixed lines,
/// paragraphs plain lines, blocks joined by blank lines.
pub fn to_markdown(blocks: &[ContentBlock]) -> String {
    blocks
        .iter()
        .map(|block| match block.kind {
            BlockKind::Heading { level } => {
                format!("{} {}", "#".repeat(level as usize), block.text)
            }
            BlockKind::ListItem => format!("- {}", block.text),
            BlockKind::Paragraph => block.text.clone(),
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn heading_level(tag: &str) -> Option<u8> {
    match tag {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

fn is_list_container(tag: &str) -> bool {
    matches!(tag, "ul" | "ol" | "menu")
}

fn classify(el: &DomElement, in_list: bool) -> Option<BlockKind> {
    if let Some(level) = heading_level(&el.tag) {
        return Some(BlockKind::Heading { level });
    }
    if el.tag == "li" {
        return Some(BlockKind::ListItem);
    }
    if PARAGRAPH_TAGS.contains(&el.tag.as_str()) {
        return Some(if in_list {
            BlockKind::ListItem
        } else {
            BlockKind::Paragraph
        });
    }
    None
}

fn walk(el: &DomElement, in_list: bool, out: &mut Vec<ContentBlock>) {
    if let Some(kind) = classify(el, in_list) {
        let text = own_text(el, in_list);
        if !text.is_empty() {
            out.push(ContentBlock { kind, text });
        }
        // Nested classified elements still become blocks of their own
        for child in &el.children {
            if let DomNode::Element(child_el) = child {
                walk(child_el, in_list, out);
            }
        }
    } else {
        let next = in_list || is_list_container(&el.tag);
        for child in &el.children {
            if let DomNode::Element(child_el) = child {
                walk(child_el, next, out);
            }
        }
    }
}

/// Text of an element excluding any descendant that classifies as a
/// block of its own.
fn own_text(el: &DomElement, in_list: bool) -> String {
    let mut raw = String::new();
    gather(el, in_list, &mut raw);
    collapse_whitespace(&raw)
}

fn gather(el: &DomElement, in_list: bool, out: &mut String) {
    let next = in_list || is_list_container(&el.tag);
    for child in &el.children {
        match child {
            DomNode::Text(t) => {
                out.push_str(t);
                out.push(' ');
            }
            DomNode::Element(child_el) => {
                if classify(child_el, next).is_none() {
                    gather(child_el, next, out);
                }
            }
        }
    }
}
