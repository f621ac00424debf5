//! Template AST nodes
//!
//! Markup and expression nodes live in one closed enumeration so that a
//! single traversal can see an element, its attributes and the expressions
//! bound inside them.

use serde::{Deserialize, Serialize};

/// Stable identity of a node inside its [`Template`](super::Template) arena.
///
/// Two ids compare equal only when they denote the same source occurrence;
/// syntactically identical expressions at different offsets stay distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Half-open byte range `[start, end)` into the template source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    pub fn contains_span(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    // Markup
    Root,
    Element { name: String },
    Text,
    Comment,
    /// Plain attribute, possibly carrying interpolations in its value
    Attribute { name: String },
    /// `[property]="binding"`
    PropertyBinding { property: String },
    /// `[(property)]="binding"`
    BananaBox { property: String },
    /// `(event)="action"`
    Event { name: String },
    /// `*directive="microsyntax"`
    TemplateBindings { directive: String },
    /// `#ref`, `ref-ref`, `let-item`
    LocalDeclaration { name: String },
    /// `{{ expression }}` inside text or an attribute value
    Interpolation,

    // Expression roots
    Binding,
    Action,
    TemplateBinding { key: String },
    TemplateVariable { name: String },

    // Expressions
    Reference { name: String },
    Call,
    ArgumentList,
    Indexed,
    Pipe,
    PipeReference { name: String },
    PipeArguments,
    Binary { operator: String },
    Prefix { operator: String },
    Conditional,
    Parenthesized,
    Literal,
    ArrayLiteral,
    ObjectLiteral,
    This,
    NonNull,
    Chain,

    /// Leaf holding an identifier, keyword, literal or punctuation
    Token,
}

impl NodeKind {
    /// Nodes that can be selected and moved as part of a fragment
    pub fn is_markup(&self) -> bool {
        matches!(self, NodeKind::Element { .. } | NodeKind::Text | NodeKind::Comment)
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, NodeKind::Reference { .. })
    }

    pub fn is_pipe_reference(&self) -> bool {
        matches!(self, NodeKind::PipeReference { .. })
    }

    pub fn is_call(&self) -> bool {
        matches!(self, NodeKind::Call)
    }

    pub fn is_token(&self) -> bool {
        matches!(self, NodeKind::Token)
    }

    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Root => "Root",
            NodeKind::Element { .. } => "Element",
            NodeKind::Text => "Text",
            NodeKind::Comment => "Comment",
            NodeKind::Attribute { .. } => "Attribute",
            NodeKind::PropertyBinding { .. } => "PropertyBinding",
            NodeKind::BananaBox { .. } => "BananaBox",
            NodeKind::Event { .. } => "Event",
            NodeKind::TemplateBindings { .. } => "TemplateBindings",
            NodeKind::LocalDeclaration { .. } => "LocalDeclaration",
            NodeKind::Interpolation => "Interpolation",
            NodeKind::Binding => "Binding",
            NodeKind::Action => "Action",
            NodeKind::TemplateBinding { .. } => "TemplateBinding",
            NodeKind::TemplateVariable { .. } => "TemplateVariable",
            NodeKind::Reference { .. } => "Reference",
            NodeKind::Call => "Call",
            NodeKind::ArgumentList => "ArgumentList",
            NodeKind::Indexed => "Indexed",
            NodeKind::Pipe => "Pipe",
            NodeKind::PipeReference { .. } => "PipeReference",
            NodeKind::PipeArguments => "PipeArguments",
            NodeKind::Binary { .. } => "Binary",
            NodeKind::Prefix { .. } => "Prefix",
            NodeKind::Conditional => "Conditional",
            NodeKind::Parenthesized => "Parenthesized",
            NodeKind::Literal => "Literal",
            NodeKind::ArrayLiteral => "ArrayLiteral",
            NodeKind::ObjectLiteral => "ObjectLiteral",
            NodeKind::This => "This",
            NodeKind::NonNull => "NonNull",
            NodeKind::Chain => "Chain",
            NodeKind::Token => "Token",
        }
    }
}
