//! Top-level reference classification
//!
//! Decides which identifier references inside a bound expression denote
//! symbols of the enclosing component (and therefore have to become inputs of
//! an extracted component) and which are internal parts of a larger member or
//! call chain.

use tracing::trace;

use crate::template_ast::{NodeId, NodeKind, Template};

/// Top-level reference for `reference`, if it has one.
///
/// Member access and call chains collapse into one unit: every reference in
/// `a.b.c` maps to `a`. References inside a pipe name, or whose chain is
/// rooted in a call at the component level, have none.
pub fn find_top_level_reference(template: &Template, reference: NodeId) -> Option<NodeId> {
    if template.kind(reference).is_pipe_reference() {
        return None;
    }

    let mut chain_root = reference;
    while let Some(parent) = template.parent(chain_root) {
        let kind = template.kind(parent);
        if !kind.is_reference() && !kind.is_call() {
            break;
        }
        chain_root = parent;
    }

    let boundary = template.parent(reference);
    let mut current = template.leftmost_leaf(chain_root);
    while template.parent(current) != boundary {
        current = template.parent(current)?;
        let kind = template.kind(current);
        if kind.is_pipe_reference() || kind.is_call() {
            trace!(reference = template.text(reference), "chain rooted in call or pipe");
            return None;
        }
        if is_bindable_reference(template, current) {
            return Some(current);
        }
    }
    None
}

/// A reference that can be handed to the extracted component as an input.
///
/// Pipe arguments always qualify. The callee of a component-level call, and
/// the arguments passed to it, do not.
pub fn is_bindable_reference(template: &Template, node: NodeId) -> bool {
    if !template.kind(node).is_reference() {
        return false;
    }
    let Some(parent) = template.parent(node) else {
        return true;
    };
    if matches!(template.kind(parent), NodeKind::PipeArguments) {
        return true;
    }
    !is_component_expression_call(template, parent)
}

/// A call (or the argument list of one) that opens its nesting level, i.e.
/// has no preceding sibling. Such calls stay inside the extracted component.
pub fn is_component_expression_call(template: &Template, node: NodeId) -> bool {
    let call = match template.kind(node) {
        NodeKind::Call => node,
        NodeKind::ArgumentList => match template.parent(node) {
            Some(call) => call,
            None => return false,
        },
        _ => return false,
    };
    template.prev_sibling(call).is_none()
}

/// Calls extracted as a whole. For every call in the expression, climb from
/// its leftmost leaf to the first enclosing call; calls nested in argument
/// lists are skipped since their outer call is extracted.
pub fn find_top_level_calls(template: &Template, root: NodeId) -> Vec<NodeId> {
    let mut calls = Vec::new();
    for node in template.descendants(root) {
        if !template.kind(node).is_call() || is_inside_arguments(template, node, root) {
            continue;
        }
        let mut current = template.leftmost_leaf(node);
        while current != node && !template.kind(current).is_call() {
            match template.parent(current) {
                Some(parent) => current = parent,
                None => break,
            }
        }
        if template.kind(current).is_call() && !calls.contains(&current) {
            calls.push(current);
        }
    }
    calls
}

/// Top-level references of the expression under `root`, pipe names skipped
pub fn find_top_level_references(template: &Template, root: NodeId) -> Vec<NodeId> {
    let mut references = Vec::new();
    for node in template.descendants(root) {
        if !template.kind(node).is_reference() {
            continue;
        }
        if let Some(top) = find_top_level_reference(template, node) {
            if !references.contains(&top) {
                references.push(top);
            }
        }
    }
    references
}

fn is_inside_arguments(template: &Template, node: NodeId, root: NodeId) -> bool {
    template
        .ancestors(node)
        .take_while(|&ancestor| ancestor != root)
        .any(|ancestor| matches!(template.kind(ancestor), NodeKind::ArgumentList))
}
