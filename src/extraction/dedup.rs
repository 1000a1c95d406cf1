//! Content block deduplication
//!
//! Boilerplate (repeated nav labels, copyright lines) commonly recurs
//! verbatim across a page. Deduplication drops any block whose
//! normalized comparison key was already seen earlier in the same
//! document. First occurrence wins; matching is exact after
//! normalization, not fuzzy.

use crate::extraction::content::ContentBlock;
use std::collections::HashSet;

/// Comparison key: case-folded, whitespace-collapsed text
fn comparison_key(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Remove duplicate blocks, preserving the order of first occurrences.
///
/// Idempotent: applying this to its own output yields the same sequence.
pub fn dedup_blocks(blocks: Vec<ContentBlock>) -> Vec<ContentBlock> {
    let mut seen = HashSet::new();
    blocks
        .into_iter()
        .filter(|block| seen.insert(comparison_key(&block.text)))
        .collect()
}
