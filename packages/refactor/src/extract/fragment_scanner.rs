//! Fragment Scanner
//!
//! Walks the selected sibling nodes and collects every binding and event the
//! extracted component has to take over.

use indexmap::IndexSet;
use tracing::debug;

use super::binding::Binding;
use super::event::Event;
use super::symbols::{FragmentScope, SymbolResolver};
use crate::template_ast::{NodeId, NodeKind, Template};

/// Callbacks for the node kinds that carry extractable expressions.
///
/// Markup-level constructs arrive through [`walk_markup`], expression-level
/// ones through [`walk_expressions`]. All other node kinds are skipped.
pub trait TemplateVisitor {
    fn visit_banana_box(&mut self, template: &Template, banana_box: NodeId);
    fn visit_property_binding(&mut self, template: &Template, property_binding: NodeId);
    fn visit_event(&mut self, template: &Template, event: NodeId);
    fn visit_interpolation(&mut self, template: &Template, interpolation: NodeId);
    fn visit_template_binding(&mut self, template: &Template, template_binding: NodeId);
}

/// Visit banana boxes, property bindings and events below `root`
pub fn walk_markup(template: &Template, root: NodeId, visitor: &mut dyn TemplateVisitor) {
    for node in template.descendants(root) {
        match template.kind(node) {
            NodeKind::BananaBox { .. } => visitor.visit_banana_box(template, node),
            NodeKind::PropertyBinding { .. } => visitor.visit_property_binding(template, node),
            NodeKind::Event { .. } => visitor.visit_event(template, node),
            _ => {}
        }
    }
}

/// Visit interpolations and microsyntax bindings below `root`
pub fn walk_expressions(template: &Template, root: NodeId, visitor: &mut dyn TemplateVisitor) {
    for node in template.descendants(root) {
        match template.kind(node) {
            NodeKind::Interpolation => visitor.visit_interpolation(template, node),
            NodeKind::TemplateBinding { .. } => visitor.visit_template_binding(template, node),
            _ => {}
        }
    }
}

/// Everything found in a fragment
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub bindings: IndexSet<Binding>,
    pub events: IndexSet<Event>,
}

impl ScanResult {
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty() && self.events.is_empty()
    }
}

pub struct FragmentScanner<'r> {
    scope: FragmentScope<'r>,
    result: ScanResult,
}

impl<'r> FragmentScanner<'r> {
    pub fn new(template: &Template, roots: &[NodeId], resolver: &'r dyn SymbolResolver) -> Self {
        FragmentScanner {
            scope: FragmentScope::new(template, roots, resolver),
            result: ScanResult::default(),
        }
    }

    /// Scan `roots` left to right, accumulating into one result
    pub fn scan(template: &Template, roots: &[NodeId], resolver: &'r dyn SymbolResolver) -> ScanResult {
        let mut scanner = FragmentScanner::new(template, roots, resolver);
        for &root in roots {
            walk_markup(template, root, &mut scanner);
            walk_expressions(template, root, &mut scanner);
        }
        debug!(
            bindings = scanner.result.bindings.len(),
            events = scanner.result.events.len(),
            locals = ?scanner.scope.locals(),
            "scanned fragment"
        );
        scanner.result
    }

    fn add_binding(&mut self, binding: Binding) {
        self.result.bindings.insert(binding);
    }

    /// The expression root attached to an attribute or interpolation
    fn expression_root(template: &Template, owner: NodeId, accept: fn(&NodeKind) -> bool) -> Option<NodeId> {
        template
            .children(owner)
            .iter()
            .copied()
            .find(|&child| accept(template.kind(child)))
    }
}

impl TemplateVisitor for FragmentScanner<'_> {
    fn visit_banana_box(&mut self, template: &Template, banana_box: NodeId) {
        if let Some(binding) = Binding::two_way(template, banana_box, &self.scope) {
            self.add_binding(binding);
        }
    }

    fn visit_property_binding(&mut self, template: &Template, property_binding: NodeId) {
        let root = Self::expression_root(template, property_binding, |kind| {
            matches!(kind, NodeKind::Binding)
        });
        if let Some(root) = root {
            let binding = Binding::new(template, root, &self.scope);
            self.add_binding(binding);
        }
    }

    fn visit_event(&mut self, template: &Template, event: NodeId) {
        let action = Self::expression_root(template, event, |kind| matches!(kind, NodeKind::Action));
        if let Some(action) = action {
            self.result.events.insert(Event::new(template, action));
        }
    }

    fn visit_interpolation(&mut self, template: &Template, interpolation: NodeId) {
        let binding = Binding::new(template, interpolation, &self.scope);
        self.add_binding(binding);
    }

    fn visit_template_binding(&mut self, template: &Template, template_binding: NodeId) {
        let binding = Binding::new(template, template_binding, &self.scope);
        self.add_binding(binding);
    }
}
