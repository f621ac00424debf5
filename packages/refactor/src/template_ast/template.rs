//! Template arena
//!
//! Owns the source text and every node parsed from it. Nodes are never
//! mutated once parsing finishes; refactorings produce text edits instead.

use super::node::{NodeId, NodeKind, Span};

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    span: Span,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Template {
    source: String,
    url: String,
    nodes: Vec<NodeData>,
}

impl Template {
    /// Create an empty template whose only node is the `Root` spanning `source`
    pub(crate) fn new(source: &str, url: &str) -> Self {
        let mut template = Template {
            source: source.to_string(),
            url: url.to_string(),
            nodes: Vec::new(),
        };
        template.alloc(NodeKind::Root, Span::new(0, source.len()));
        template
    }

    pub(crate) fn alloc(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            kind,
            span,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    pub(crate) fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(child);
    }

    pub(crate) fn set_span(&mut self, id: NodeId, span: Span) {
        self.nodes[id.index()].span = span;
    }

    /// Allocate a leaf token covering `span`
    pub(crate) fn token(&mut self, parent: NodeId, span: Span) -> NodeId {
        let id = self.alloc(NodeKind::Token, span);
        self.append_child(parent, id);
        id
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.nodes[id.index()].span
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    /// Verbatim source text of a node
    pub fn text(&self, id: NodeId) -> &str {
        let span = self.span(id);
        &self.source[span.start..span.end]
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let position = siblings.iter().position(|&sibling| sibling == id)?;
        position.checked_sub(1).map(|index| siblings[index])
    }

    /// Follow first children down to a leaf
    pub fn leftmost_leaf(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(child) = self.first_child(current) {
            current = child;
        }
        current
    }

    /// Strict ancestors, nearest first
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            template: self,
            next: self.parent(id),
        }
    }

    pub fn is_ancestor_of(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).any(|candidate| candidate == ancestor)
    }

    /// Strict descendants in pre-order
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            result.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        result
    }

    /// Innermost node satisfying `accept` whose span contains `offset`
    pub fn innermost_at(&self, offset: usize, accept: impl Fn(&NodeKind) -> bool) -> Option<NodeId> {
        let mut found = None;
        let mut current = self.root();
        'descend: loop {
            for &child in self.children(current) {
                if self.span(child).contains(offset) {
                    if accept(self.kind(child)) {
                        found = Some(child);
                    }
                    current = child;
                    continue 'descend;
                }
            }
            return found;
        }
    }

    /// Name of a `Reference` or `PipeReference` node
    pub fn reference_name(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Reference { name } | NodeKind::PipeReference { name } => Some(name),
            _ => None,
        }
    }

    /// Receiver of a qualified reference (`a` in `a.b`)
    pub fn qualifier(&self, id: NodeId) -> Option<NodeId> {
        if !self.kind(id).is_reference() {
            return None;
        }
        match self.children(id) {
            [qualifier, _, _] => Some(*qualifier),
            _ => None,
        }
    }

    pub fn callee(&self, call: NodeId) -> Option<NodeId> {
        if !self.kind(call).is_call() {
            return None;
        }
        self.first_child(call)
    }

    /// Argument expressions of a call, without the punctuation tokens
    pub fn arguments(&self, call: NodeId) -> Vec<NodeId> {
        self.children(call)
            .iter()
            .find(|&&child| matches!(self.kind(child), NodeKind::ArgumentList))
            .map(|&list| {
                self.children(list)
                    .iter()
                    .copied()
                    .filter(|&argument| !self.kind(argument).is_token())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Name a call is known by: the referenced identifier for `a.b(c)` (`b`).
    /// Calls of anything but a named reference (`items[i]()`, `(f)()`) have
    /// none.
    pub fn callee_name(&self, call: NodeId) -> Option<&str> {
        let callee = self.callee(call)?;
        self.reference_name(callee).filter(|name| !name.is_empty())
    }
}

pub struct Ancestors<'a> {
    template: &'a Template,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.template.parent(current);
        Some(current)
    }
}
