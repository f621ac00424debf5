//! Shared helpers for the integration suites

#![allow(dead_code)]

use angular_refactor::ml_parser::{HtmlParser, ParseTreeResult};
use angular_refactor::template_ast::{NodeId, NodeKind, Template};

pub fn parse(html: &str) -> ParseTreeResult {
    HtmlParser::new().parse(html, "TestComp")
}

/// Parse `html`, failing the test on any parse error
pub fn parse_clean(html: &str) -> Template {
    let result = parse(html);
    assert!(result.errors.is_empty(), "unexpected errors: {:?}", result.errors);
    result.template
}

/// `[kind, text]` for every node below `root` in pre-order, tokens skipped
pub fn humanize_tree(template: &Template, root: NodeId) -> Vec<Vec<String>> {
    template
        .descendants(root)
        .into_iter()
        .filter(|&node| !template.kind(node).is_token())
        .map(|node| vec![template.kind(node).name().to_string(), template.text(node).to_string()])
        .collect()
}

pub fn find_all(template: &Template, accept: impl Fn(&NodeKind) -> bool) -> Vec<NodeId> {
    template
        .descendants(template.root())
        .into_iter()
        .filter(|&node| accept(template.kind(node)))
        .collect()
}

pub fn find_first(template: &Template, accept: impl Fn(&NodeKind) -> bool) -> NodeId {
    find_all(template, accept)
        .into_iter()
        .next()
        .expect("no node of the requested kind")
}

/// Template holding `expression` as a property binding, and the binding root
pub fn binding_expression(expression: &str) -> (Template, NodeId) {
    let template = parse_clean(&format!("<b [x]=\"{}\"></b>", expression));
    let root = find_first(&template, |kind| matches!(kind, NodeKind::Binding));
    (template, root)
}

/// Template holding `action` as an event handler, and the action root
pub fn action_expression(action: &str) -> (Template, NodeId) {
    let template = parse_clean(&format!("<b (x)=\"{}\"></b>", action));
    let root = find_first(&template, |kind| matches!(kind, NodeKind::Action));
    (template, root)
}

pub fn texts(template: &Template, nodes: &[NodeId]) -> Vec<String> {
    nodes.iter().map(|&node| template.text(node).to_string()).collect()
}

pub fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|cell| cell.to_string()).collect()
}
