//! Content extraction pipeline
//!
//! Turns raw HTML into a clean, structured, deduplicated
//! representation: typed content blocks, classified links, and page
//! metadata. All stages are synchronous, pure transformations over
//! already-fetched data.

pub mod content;
pub mod dedup;
pub mod dom;
pub mod links;
pub mod metadata;

pub use content::{to_markdown, BlockKind, ContentBlock};
pub use dedup::dedup_blocks;
pub use dom::{normalize, DomElement, DomNode};
pub use links::{extract_links, Link};
pub use metadata::{extract_metadata, MetaTag, PageMetadata, StructuredDataRecord};

use crate::error::ExtractionError;
use url::Url;

/// Everything extracted from one page
#[derive(Debug, Clone)]
pub struct PageExtraction {
    /// Deduplicated content blocks in document order
    pub blocks: Vec<ContentBlock>,
    /// Classified links, deduplicated by resolved URL
    pub links: Vec<Link>,
    /// Title, description, meta tags, structured data
    pub metadata: PageMetadata,
}

/// Run the full extraction pipeline over raw HTML.
///
/// `base` is the final resolved URL of the page and anchors are
/// resolved against it. Empty results are valid outcomes for sparse
/// pages, not errors.
pub fn extract_page(html: &str, base: &Url) -> Result<PageExtraction, ExtractionError> {
    let root = normalize(html)?;

    let blocks = dedup_blocks(content::extract_blocks(&root));
    let links = extract_links(&root, base);
    let metadata = extract_metadata(&root);

    Ok(PageExtraction {
        blocks,
        links,
        metadata,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_pipeline() {
        let html = r#"
            <html>
              <head>
                <title>Demo</title>
                <meta name="description" content="demo page">
              </head>
              <body>
                <h1>Demo</h1>
                <p>Welcome to the demo.</p>
                <p>Welcome to the demo.</p>
                <a href="/next">Next</a>
              </body>
            </html>
        "#;
        let base = Url::parse("https://example.com/").unwrap();
        let page = extract_page(html, &base).unwrap();

        assert_eq!(page.metadata.title, Some("Demo".to_string()));
        // Duplicate paragraph removed, heading and one paragraph remain
        assert_eq!(page.blocks.len(), 2);
        assert_eq!(page.links.len(), 1);
        assert_eq!(page.links[0].url, "https://example.com/next");
    }
}
