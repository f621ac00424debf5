//! Selection to fragment
//!
//! Maps a byte range selected in the template source to the run of sibling
//! markup nodes it covers.

use tracing::{debug, trace};

use crate::error::{ExtractError, Result};
use crate::template_ast::{NodeId, Template};

/// Sibling nodes covered by the selection `start..end`.
///
/// Surrounding whitespace is ignored. Each end of the selection is widened to
/// the outermost node starting (resp. ending) at the same offset, so selecting
/// from `<` of a tag to the `>` of its end tag yields the whole element.
pub fn select_fragment(template: &Template, start: usize, end: usize) -> Result<Vec<NodeId>> {
    let source = template.source();
    if end < start {
        return Err(ExtractError::InvalidPosition);
    }
    let end = end.min(source.len());
    if start > end {
        return Err(ExtractError::InvalidPosition);
    }
    if start == end {
        return Err(ExtractError::EmptySelection);
    }
    let selected = source.get(start..end).ok_or(ExtractError::InvalidPosition)?;
    let trimmed = selected.trim();
    if trimmed.is_empty() {
        return Err(ExtractError::EmptySelection);
    }
    let leading = selected.len() - selected.trim_start().len();
    let trailing = selected.len() - selected.trim_end().len();

    let first_offset = start + leading;
    // Offset of the last selected character
    let last_offset = end - trailing - 1;

    let first = template
        .innermost_at(first_offset, |kind| kind.is_markup())
        .map(|node| outermost_with_same_start(template, node))
        .ok_or(ExtractError::InvalidPosition)?;
    let last = template
        .innermost_at(last_offset, |kind| kind.is_markup())
        .map(|node| outermost_with_same_end(template, node))
        .ok_or(ExtractError::InvalidPosition)?;
    trace!(first = template.text(first), last = template.text(last), "selection endpoints");

    if template.span(first).start > last_offset {
        return Err(ExtractError::InvalidPosition);
    }
    let parent = template.parent(first).ok_or(ExtractError::InvalidPosition)?;
    if template.parent(last) != Some(parent) {
        debug!("selection endpoints are not siblings");
        return Err(ExtractError::InvalidPosition);
    }

    let siblings = template.children(parent);
    let position = |node: NodeId| siblings.iter().position(|&sibling| sibling == node);
    match (position(first), position(last)) {
        (Some(from), Some(to)) if from <= to => Ok(siblings[from..=to].to_vec()),
        _ => Err(ExtractError::InvalidPosition),
    }
}

fn outermost_with_same_start(template: &Template, node: NodeId) -> NodeId {
    let start = template.span(node).start;
    let mut current = node;
    while let Some(parent) = template.parent(current) {
        if !template.kind(parent).is_markup() || template.span(parent).start != start {
            break;
        }
        current = parent;
    }
    current
}

fn outermost_with_same_end(template: &Template, node: NodeId) -> NodeId {
    let end = template.span(node).end;
    let mut current = node;
    while let Some(parent) = template.parent(current) {
        if !template.kind(parent).is_markup() || template.span(parent).end != end {
            break;
        }
        current = parent;
    }
    current
}
