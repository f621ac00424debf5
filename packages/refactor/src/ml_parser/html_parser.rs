//! HTML Parser
//!
//! Entry point wrapping the tree builder.

use super::parser::{ParseTreeResult, TreeBuilder};

/// HTML parser for Angular templates
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlParser;

impl HtmlParser {
    /// Create new HTML parser
    pub fn new() -> Self {
        HtmlParser
    }

    /// Parse HTML template source
    ///
    /// # Arguments
    /// * `source` - HTML template string
    /// * `url` - Source file URL/path (for error reporting)
    pub fn parse(&self, source: &str, url: &str) -> ParseTreeResult {
        TreeBuilder::new(source, url).build()
    }
}
