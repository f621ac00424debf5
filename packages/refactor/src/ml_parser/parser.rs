//! ML Parser Tree Builder
//!
//! Single pass over the markup that builds elements, text, comments and
//! attributes into the template arena, delegating bound attribute values and
//! interpolations to the expression parser.

use tracing::trace;

use super::attributes::{classify_attribute, AttributeValue};
use super::html_tags::{is_closed_by_sibling, is_void_element};
use crate::chars;
use crate::expression_parser::{ExpressionMode, Parser};
use crate::parse_util::ParseError;
use crate::template_ast::{NodeId, NodeKind, Span, Template};

const INTERPOLATION_START: &str = "{{";
const INTERPOLATION_END: &str = "}}";

/// Result of parsing a template
#[derive(Debug, Clone)]
pub struct ParseTreeResult {
    pub template: Template,
    pub errors: Vec<ParseError>,
}

impl ParseTreeResult {
    /// Errors only, warnings excluded
    pub fn has_errors(&self) -> bool {
        self.errors
            .iter()
            .any(|error| error.level == crate::parse_util::ParseErrorLevel::Error)
    }
}

pub(crate) struct TreeBuilder<'a> {
    source: &'a str,
    index: usize,
    template: Template,
    expression_parser: Parser,
    /// Open elements, innermost last
    stack: Vec<NodeId>,
    errors: Vec<ParseError>,
}

impl<'a> TreeBuilder<'a> {
    pub(crate) fn new(source: &'a str, url: &str) -> Self {
        TreeBuilder {
            source,
            index: 0,
            template: Template::new(source, url),
            expression_parser: Parser::new(),
            stack: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub(crate) fn build(mut self) -> ParseTreeResult {
        while self.index < self.source.len() {
            let rest = &self.source[self.index..];
            if rest.starts_with("<!--") {
                self.consume_comment();
            } else if rest.starts_with("</") && starts_tag_name(&rest[2..]) {
                self.consume_element_end_tag();
            } else if rest.starts_with('<') && starts_tag_name(&rest[1..]) {
                self.consume_element_start_tag();
            } else {
                self.consume_text();
            }
        }

        let end = self.source.len();
        while let Some(element) = self.stack.pop() {
            let start = self.template.span(element).start;
            if let NodeKind::Element { name } = self.template.kind(element) {
                self.errors.push(ParseError::warning(
                    Span::new(start, start),
                    format!("Unclosed element \"{}\"", name),
                ));
            }
            self.template.set_span(element, Span::new(start, end));
        }

        ParseTreeResult {
            template: self.template,
            errors: self.errors,
        }
    }

    fn container(&self) -> NodeId {
        self.stack.last().copied().unwrap_or_else(|| self.template.root())
    }

    fn peek(&self) -> char {
        self.source[self.index..].chars().next().unwrap_or(chars::EOF)
    }

    fn advance(&mut self) {
        let ch = self.peek();
        if ch != chars::EOF {
            self.index += ch.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while chars::is_whitespace(self.peek()) {
            self.advance();
        }
    }

    fn consume_name(&mut self) -> Span {
        let start = self.index;
        while !chars::is_name_end(self.peek()) {
            self.advance();
        }
        Span::new(start, self.index)
    }

    fn consume_comment(&mut self) {
        let start = self.index;
        let end = match self.source[start + 4..].find("-->") {
            Some(position) => start + 4 + position + 3,
            None => {
                self.errors.push(ParseError::new(
                    Span::new(start, start + 4),
                    "Unexpected end of file, comment is not closed",
                ));
                self.source.len()
            }
        };
        self.index = end;
        let comment = self.template.alloc(NodeKind::Comment, Span::new(start, end));
        let parent = self.container();
        self.template.append_child(parent, comment);
    }

    fn consume_text(&mut self) {
        let start = self.index;
        loop {
            let rest = &self.source[self.index..];
            if rest.is_empty() || (self.index > start && starts_markup(rest)) {
                break;
            }
            if rest.starts_with(INTERPOLATION_START) {
                // `<` inside an interpolation does not start a tag
                match rest.find(INTERPOLATION_END) {
                    Some(position) => {
                        self.index += position + INTERPOLATION_END.len();
                        continue;
                    }
                    None => {
                        self.index += INTERPOLATION_START.len();
                        continue;
                    }
                }
            }
            self.advance();
        }

        let text = self.template.alloc(NodeKind::Text, Span::new(start, self.index));
        let parent = self.container();
        self.template.append_child(parent, text);
        self.parse_interpolations(text, Span::new(start, self.index));
    }

    fn consume_element_start_tag(&mut self) {
        let start = self.index;
        self.advance(); // <
        let name_span = self.consume_name();
        let name = self.source[name_span.start..name_span.end].to_string();

        if is_closed_by_sibling(&name) {
            if let Some(&open) = self.stack.last() {
                let same_name = matches!(
                    self.template.kind(open),
                    NodeKind::Element { name: open_name } if open_name.eq_ignore_ascii_case(&name)
                );
                if same_name {
                    self.stack.pop();
                    let open_start = self.template.span(open).start;
                    self.template.set_span(open, Span::new(open_start, start));
                }
            }
        }

        let element = self
            .template
            .alloc(NodeKind::Element { name: name.clone() }, Span::new(start, start));
        let parent = self.container();
        self.template.append_child(parent, element);

        let mut self_closing = false;
        loop {
            self.skip_whitespace();
            let rest = &self.source[self.index..];
            if rest.is_empty() {
                self.errors.push(ParseError::new(
                    Span::new(start, self.index),
                    format!("Unexpected end of file inside start tag \"{}\"", name),
                ));
                break;
            }
            if rest.starts_with("/>") {
                self.index += 2;
                self_closing = true;
                break;
            }
            if rest.starts_with('>') {
                self.index += 1;
                break;
            }
            if rest.starts_with('/') || rest.starts_with('<') {
                self.errors.push(ParseError::new(
                    Span::new(self.index, self.index + 1),
                    format!("Unexpected character in start tag \"{}\"", name),
                ));
                self.advance();
                continue;
            }
            self.consume_attribute(element);
        }

        self.template.set_span(element, Span::new(start, self.index));
        if !self_closing && !is_void_element(&name) {
            self.stack.push(element);
        }
        trace!(element = %name, start, "start tag");
    }

    fn consume_element_end_tag(&mut self) {
        let start = self.index;
        self.index += 2; // </
        let name_span = self.consume_name();
        let name = self.source[name_span.start..name_span.end].to_string();
        self.skip_whitespace();
        if self.peek() == chars::GT {
            self.advance();
        } else {
            self.errors.push(ParseError::new(
                Span::new(start, self.index),
                format!("Unterminated end tag \"{}\"", name),
            ));
        }
        let end = self.index;

        let position = self.stack.iter().rposition(|&open| {
            matches!(
                self.template.kind(open),
                NodeKind::Element { name: open_name } if open_name.eq_ignore_ascii_case(&name)
            )
        });

        match position {
            Some(position) => {
                // Elements left open inside are closed where this end tag starts
                let implicitly_closed: Vec<NodeId> = self.stack.drain(position + 1..).collect();
                for implicit in implicitly_closed {
                    let implicit_start = self.template.span(implicit).start;
                    self.template.set_span(implicit, Span::new(implicit_start, start));
                }
                if let Some(element) = self.stack.pop() {
                    let element_start = self.template.span(element).start;
                    self.template.set_span(element, Span::new(element_start, end));
                }
            }
            None => {
                let message = if is_void_element(&name) {
                    format!("Void elements do not have end tags \"{}\"", name)
                } else {
                    format!("Unexpected closing tag \"{}\"", name)
                };
                self.errors.push(ParseError::new(Span::new(start, end), message));
            }
        }
    }

    fn consume_attribute(&mut self, element: NodeId) {
        let name_span = self.consume_name();
        if name_span.is_empty() {
            // Stray quote or `=`; skip it so the loop makes progress
            self.advance();
            return;
        }
        let name = self.source[name_span.start..name_span.end].to_string();
        let (kind, value_kind) = classify_attribute(&name);

        let attribute = self.template.alloc(kind.clone(), name_span);
        self.template.append_child(element, attribute);
        self.template.token(attribute, name_span);

        let checkpoint = self.index;
        self.skip_whitespace();
        if self.peek() != chars::EQ {
            self.index = checkpoint;
            return;
        }
        let equals = self.index;
        self.advance();
        self.template.token(attribute, Span::new(equals, self.index));
        self.skip_whitespace();

        let quote = self.peek();
        let (value_span, attribute_end) = if quote == chars::DQ || quote == chars::SQ {
            self.advance();
            let value_start = self.index;
            match self.source[value_start..].find(quote) {
                Some(position) => {
                    self.index = value_start + position + 1;
                    (Span::new(value_start, value_start + position), self.index)
                }
                None => {
                    self.errors.push(ParseError::new(
                        Span::new(value_start - 1, value_start),
                        format!("Unterminated attribute value for \"{}\"", name),
                    ));
                    self.index = self.source.len();
                    (Span::new(value_start, self.index), self.index)
                }
            }
        } else {
            let value_start = self.index;
            while !chars::is_whitespace(self.peek()) && self.peek() != chars::GT && self.peek() != chars::EOF {
                if self.source[self.index..].starts_with("/>") {
                    break;
                }
                self.advance();
            }
            (Span::new(value_start, self.index), self.index)
        };

        self.template
            .set_span(attribute, Span::new(name_span.start, attribute_end));
        self.parse_attribute_value(attribute, &kind, value_kind, value_span);
    }

    fn parse_attribute_value(
        &mut self,
        attribute: NodeId,
        kind: &NodeKind,
        value_kind: AttributeValue,
        value_span: Span,
    ) {
        let source = self.source;
        let value = &source[value_span.start..value_span.end];
        let errors = match value_kind {
            AttributeValue::Binding | AttributeValue::Action => {
                let (root_kind, mode) = if value_kind == AttributeValue::Action {
                    (NodeKind::Action, ExpressionMode::Action)
                } else {
                    (NodeKind::Binding, ExpressionMode::Binding)
                };
                let root = self.template.alloc(root_kind, value_span);
                self.template.append_child(attribute, root);
                self.expression_parser.parse_expression(
                    &mut self.template,
                    root,
                    value,
                    value_span.start,
                    mode,
                )
            }
            AttributeValue::Microsyntax => {
                let directive = match kind {
                    NodeKind::TemplateBindings { directive } => directive.clone(),
                    _ => String::new(),
                };
                self.expression_parser.parse_template_bindings(
                    &mut self.template,
                    attribute,
                    &directive,
                    value,
                    value_span.start,
                )
            }
            AttributeValue::Interpolated => {
                self.parse_interpolations(attribute, value_span);
                Vec::new()
            }
            AttributeValue::Ignored => Vec::new(),
        };
        self.errors.extend(errors);
    }

    /// Attach an `Interpolation` node for every `{{ }}` inside `span`
    fn parse_interpolations(&mut self, owner: NodeId, span: Span) {
        let source = self.source;
        let mut cursor = span.start;
        while cursor < span.end {
            let text = &source[cursor..span.end];
            let Some(open) = text.find(INTERPOLATION_START) else {
                break;
            };
            let open = cursor + open;
            let expression_start = open + INTERPOLATION_START.len();
            let Some(close) = source[expression_start..span.end].find(INTERPOLATION_END) else {
                self.errors.push(ParseError::warning(
                    Span::new(open, span.end),
                    "Unterminated interpolation",
                ));
                break;
            };
            let expression_end = expression_start + close;
            let interpolation_end = expression_end + INTERPOLATION_END.len();

            let interpolation = self
                .template
                .alloc(NodeKind::Interpolation, Span::new(open, interpolation_end));
            self.template.append_child(owner, interpolation);
            let errors = self.expression_parser.parse_expression(
                &mut self.template,
                interpolation,
                &source[expression_start..expression_end],
                expression_start,
                ExpressionMode::Binding,
            );
            self.errors.extend(errors);
            cursor = interpolation_end;
        }
    }
}

fn starts_markup(text: &str) -> bool {
    text.starts_with("<!--")
        || (text.starts_with("</") && starts_tag_name(&text[2..]))
        || (text.starts_with('<') && starts_tag_name(&text[1..]))
}

fn starts_tag_name(text: &str) -> bool {
    text.starts_with(|ch: char| chars::is_ascii_letter(ch))
}
