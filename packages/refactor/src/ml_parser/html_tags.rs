//! HTML tag definitions
//!
//! Only the properties the tree builder needs: which elements never have
//! content and which ones may not nest inside themselves.

use once_cell::sync::Lazy;
use std::collections::HashSet;

static VOID_ELEMENTS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
        "source", "track", "wbr",
    ]
    .into_iter()
    .collect()
});

/// Elements whose start tag implicitly closes an open sibling of the same name
static SELF_CLOSED_BY_SIBLING: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["li", "dt", "dd", "p", "tr", "td", "th", "option"]
        .into_iter()
        .collect()
});

pub fn is_void_element(tag_name: &str) -> bool {
    VOID_ELEMENTS.contains(tag_name.to_ascii_lowercase().as_str())
}

pub fn is_closed_by_sibling(tag_name: &str) -> bool {
    SELF_CLOSED_BY_SIBLING.contains(tag_name.to_ascii_lowercase().as_str())
}
