//! Extraction plan
//!
//! Everything an extraction produces, computed before anything is written.
//! The source template changes through a single [`TextEdit`].

use serde::Serialize;

use super::binding::InputField;
use crate::template_ast::Span;

/// Replacement of `span` in a source text; an empty span inserts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextEdit {
    pub span: Span,
    pub replacement: String,
}

impl TextEdit {
    pub fn replace(span: Span, replacement: impl Into<String>) -> Self {
        TextEdit {
            span,
            replacement: replacement.into(),
        }
    }

    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        TextEdit::replace(Span::new(offset, offset), text)
    }

    pub fn apply(&self, source: &str) -> String {
        let mut result = String::with_capacity(source.len() + self.replacement.len());
        result.push_str(&source[..self.span.start]);
        result.push_str(&self.replacement);
        result.push_str(&source[self.span.end..]);
        result
    }

    /// Text of `range` with every edit inside it applied.
    ///
    /// Edits are taken in source order; one overlapping an edit already taken
    /// is skipped.
    pub fn apply_all(source: &str, range: Span, edits: &[TextEdit]) -> String {
        let mut inside: Vec<&TextEdit> = edits
            .iter()
            .filter(|edit| range.contains_span(edit.span))
            .collect();
        inside.sort_by_key(|edit| (edit.span.start, edit.span.end));

        let mut result = String::with_capacity(range.len());
        let mut cursor = range.start;
        for edit in inside {
            if edit.span.start < cursor {
                continue;
            }
            result.push_str(&source[cursor..edit.span.start]);
            result.push_str(&edit.replacement);
            cursor = edit.span.end;
        }
        result.push_str(&source[cursor..range.end]);
        result
    }
}

/// Result of extracting a fragment into a new component
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionPlan {
    /// Capitalized name as entered, `NameLabel`
    pub component_name: String,
    /// `NameLabelComponent`
    pub class_name: String,
    /// `name-label`
    pub kebab_name: String,
    pub selector: String,
    pub class_file_name: String,
    pub template_file_name: String,
    /// Tag replacing the fragment in the source template
    pub invocation_text: String,
    pub class_text: String,
    pub template_text: String,
    /// Replaces the fragment with `invocation_text`
    pub edit: TextEdit,
    /// Inputs in rendering order
    pub inputs: Vec<InputField>,
    /// Names of the events the new component emits
    pub events: Vec<String>,
}

impl ExtractionPlan {
    /// The source template after extraction
    pub fn apply(&self, source: &str) -> String {
        self.edit.apply(source)
    }
}
