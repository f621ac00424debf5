//! Parse Utilities
//!
//! Source spans, locations and the error type collected by both parsers.

use serde::{Deserialize, Serialize};

use crate::chars;
use crate::template_ast::Span;

/// A 0-based line/column position inside a source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseLocation {
    pub offset: usize,
    pub line: usize,
    pub col: usize,
}

impl ParseLocation {
    pub fn new(offset: usize, line: usize, col: usize) -> Self {
        ParseLocation { offset, line, col }
    }

    /// Compute the line and column of a byte offset in `source`
    pub fn from_offset(source: &str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let mut line = 0;
        let mut col = 0;
        for ch in source[..offset].chars() {
            if ch == chars::NEWLINE {
                line += 1;
                col = 0;
            } else {
                col += 1;
            }
        }
        ParseLocation::new(offset, line, col)
    }
}

impl std::fmt::Display for ParseLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseErrorLevel {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseError {
    pub span: Span,
    pub msg: String,
    pub level: ParseErrorLevel,
}

impl ParseError {
    pub fn new(span: Span, msg: impl Into<String>) -> Self {
        ParseError {
            span,
            msg: msg.into(),
            level: ParseErrorLevel::Error,
        }
    }

    pub fn warning(span: Span, msg: impl Into<String>) -> Self {
        ParseError {
            span,
            msg: msg.into(),
            level: ParseErrorLevel::Warning,
        }
    }

    /// Message with up to `max_chars` of surrounding source on each side
    pub fn contextual_message(&self, source: &str, max_chars: usize) -> String {
        let start = self.span.start.min(source.len());
        let before_start = floor_char_boundary(source, start.saturating_sub(max_chars));
        let after_end = floor_char_boundary(source, (start + max_chars).min(source.len()));
        let level = match self.level {
            ParseErrorLevel::Warning => "WARNING",
            ParseErrorLevel::Error => "ERROR",
        };
        format!(
            "{} (\"{}[{} ->]{}\")",
            self.msg,
            &source[before_start..start],
            level,
            &source[start..after_end]
        )
    }

    pub fn location(&self, source: &str) -> ParseLocation {
        ParseLocation::from_offset(source, self.span.start)
    }
}

fn floor_char_boundary(source: &str, mut index: usize) -> usize {
    while index > 0 && !source.is_char_boundary(index) {
        index -= 1;
    }
    index
}
