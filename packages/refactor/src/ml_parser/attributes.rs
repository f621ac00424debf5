//! Attribute name classification
//!
//! Maps Angular binding syntax on attribute names to node kinds.

use crate::template_ast::NodeKind;

/// How the value of an attribute is parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeValue {
    /// A binding expression (`[x]`, `[(x)]`)
    Binding,
    /// An event handler (`(x)`)
    Action,
    /// Structural directive microsyntax (`*x`)
    Microsyntax,
    /// Literal text with optional `{{ }}` interpolations
    Interpolated,
    /// Ignored (`#ref`, `let-x`)
    Ignored,
}

/// Classify an attribute by its name
pub fn classify_attribute(name: &str) -> (NodeKind, AttributeValue) {
    if let Some(property) = strip_delimiters(name, "[(", ")]").or_else(|| name.strip_prefix("bindon-")) {
        return (
            NodeKind::BananaBox {
                property: property.to_string(),
            },
            AttributeValue::Binding,
        );
    }
    if let Some(property) = strip_delimiters(name, "[", "]").or_else(|| name.strip_prefix("bind-")) {
        return (
            NodeKind::PropertyBinding {
                property: property.to_string(),
            },
            AttributeValue::Binding,
        );
    }
    if let Some(event) = strip_delimiters(name, "(", ")").or_else(|| name.strip_prefix("on-")) {
        return (
            NodeKind::Event {
                name: event.to_string(),
            },
            AttributeValue::Action,
        );
    }
    if let Some(directive) = name.strip_prefix('*') {
        return (
            NodeKind::TemplateBindings {
                directive: directive.to_string(),
            },
            AttributeValue::Microsyntax,
        );
    }
    if let Some(local) = name
        .strip_prefix('#')
        .or_else(|| name.strip_prefix("ref-"))
        .or_else(|| name.strip_prefix("let-"))
    {
        return (
            NodeKind::LocalDeclaration {
                name: local.to_string(),
            },
            AttributeValue::Ignored,
        );
    }
    (
        NodeKind::Attribute {
            name: name.to_string(),
        },
        AttributeValue::Interpolated,
    )
}

fn strip_delimiters<'a>(name: &'a str, open: &str, close: &str) -> Option<&'a str> {
    name.strip_prefix(open)?
        .strip_suffix(close)
        .filter(|inner| !inner.is_empty())
}
