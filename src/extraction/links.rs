//! Link extraction
//!
//! Collects anchors from the normalized tree, resolves their
//! destinations against the page base URL, and classifies them as
//! internal or external.

use crate::extraction::dom::DomElement;
use serde::{Deserialize, Serialize};
use url::Url;

/// A resolved, classified outbound reference found on a page.
///
/// Invariant: `url` is always absolute after resolution against the
/// page's base URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Visible anchor text (may be empty)
    pub text: String,
    /// Resolved absolute URL
    pub url: String,
    /// Whether the destination host differs from the page host
    pub external: bool,
}

/// Extract links from a normalized tree.
///
/// Fragment-only and `javascript:` destinations are excluded (they are
/// not navigable page references), as are non-http(s) schemes such as
/// `mailto:` which have no host to classify. Links are deduplicated by
/// resolved URL; the first anchor text wins for a repeated URL. Host
/// comparison is case-insensitive and ignores scheme and port.
pub fn extract_links(root: &DomElement, base: &Url) -> Vec<Link> {
    let base_host = base.host_str().map(str::to_ascii_lowercase);

    let mut links = Vec::new();
    let mut seen = std::collections::HashSet::new();

    root.walk_elements(&mut |el| {
        if el.tag != "a" {
            return;
        }
        let Some(href) = el.attr("href") else {
            return;
        };
        let href = href.trim();
        if href.is_empty() || href.starts_with('#') {
            return;
        }
        if href
            .to_ascii_lowercase()
            .starts_with("javascript:")
        {
            return;
        }

        let Ok(resolved) = base.join(href) else {
            return;
        };
        if !matches!(resolved.scheme(), "http" | "https") {
            return;
        }

        if !seen.insert(resolved.to_string()) {
            return;
        }

        let host = resolved.host_str().map(str::to_ascii_lowercase);
        let external = host != base_host;

        links.push(Link {
            text: el.flat_text(),
            url: resolved.to_string(),
            external,
        });
    });

    links
}
