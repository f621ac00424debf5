/**
 * Angular Expression Parser
 *
 * Recursive descent parser for Angular template expressions. Nodes are
 * written straight into the template arena with absolute spans, keeping
 * every punctuation token as a leaf so sibling relationships match the
 * source text.
 */
use super::lexer::{Lexer, Token, TokenType};
use crate::parse_util::ParseError;
use crate::template_ast::{NodeId, NodeKind, Span, Template};

/// How an expression is used by its attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpressionMode {
    /// Property bindings and interpolations: no chains, no assignments
    Binding,
    /// Event handlers: chains and assignments allowed, pipes rejected
    Action,
}

/// Parser for Angular expressions
#[derive(Debug, Default, Clone)]
pub struct Parser {
    lexer: Lexer,
}

impl Parser {
    pub fn new() -> Self {
        Parser {
            lexer: Lexer::new(),
        }
    }

    /// Parse `input`, located at `absolute_offset` in the template source,
    /// and attach the resulting expression to `owner`.
    ///
    /// Empty input leaves `owner` without children.
    pub fn parse_expression(
        &self,
        template: &mut Template,
        owner: NodeId,
        input: &str,
        absolute_offset: usize,
        mode: ExpressionMode,
    ) -> Vec<ParseError> {
        let tokens = self.lexer.tokenize(input);
        let mut parse_ast = ParseAst::new(template, tokens, absolute_offset, input.len(), mode);
        if let Some(expression) = parse_ast.parse_chain() {
            parse_ast.template.append_child(owner, expression);
        }
        if let Some(token) = parse_ast.current().cloned() {
            parse_ast.record_error_at(&token, format!("Unexpected token '{}'", token.str_value));
        }
        parse_ast.errors
    }

    /// Parse microsyntax (`let item of items; index as i`) for `*directive`,
    /// attaching `TemplateBinding` and `TemplateVariable` nodes to `owner`.
    pub fn parse_template_bindings(
        &self,
        template: &mut Template,
        owner: NodeId,
        directive: &str,
        input: &str,
        absolute_offset: usize,
    ) -> Vec<ParseError> {
        let tokens = self.lexer.tokenize(input);
        let mut parse_ast = ParseAst::new(
            template,
            tokens,
            absolute_offset,
            input.len(),
            ExpressionMode::Binding,
        );
        parse_ast.parse_template_bindings(owner, directive);
        parse_ast.errors
    }
}

/// Internal parser state
struct ParseAst<'t> {
    template: &'t mut Template,
    tokens: Vec<Token>,
    index: usize,
    absolute_offset: usize,
    input_length: usize,
    mode: ExpressionMode,
    errors: Vec<ParseError>,
}

const EQUALITY_OPERATORS: &[&str] = &["==", "!=", "===", "!=="];
const RELATIONAL_OPERATORS: &[&str] = &["<", ">", "<=", ">="];
const ADDITIVE_OPERATORS: &[&str] = &["+", "-"];
const MULTIPLICATIVE_OPERATORS: &[&str] = &["*", "/", "%"];
const ASSIGNMENT_OPERATORS: &[&str] = &["=", "+=", "-=", "*=", "/=", "%=", "&&=", "||=", "??="];

impl<'t> ParseAst<'t> {
    fn new(
        template: &'t mut Template,
        tokens: Vec<Token>,
        absolute_offset: usize,
        input_length: usize,
        mode: ExpressionMode,
    ) -> Self {
        ParseAst {
            template,
            tokens,
            index: 0,
            absolute_offset,
            input_length,
            mode,
            errors: Vec::new(),
        }
    }

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn peek(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.index + offset)
    }

    fn at_end(&self) -> bool {
        self.index >= self.tokens.len()
    }

    fn next_is_character(&self, code: char) -> bool {
        self.current().is_some_and(|token| token.is_character(code))
    }

    fn next_is_operator(&self, op: &str) -> bool {
        self.current().is_some_and(|token| token.is_operator(op))
    }

    fn next_is_one_of(&self, operators: &[&str]) -> bool {
        self.current()
            .is_some_and(|token| token.token_type == TokenType::Operator && operators.contains(&token.str_value.as_str()))
    }

    fn token_span(&self, token: &Token) -> Span {
        Span::new(
            self.absolute_offset + token.index,
            self.absolute_offset + token.end,
        )
    }

    /// Absolute offset where the next token starts (or the input ends)
    fn input_index(&self) -> usize {
        match self.current() {
            Some(token) => self.absolute_offset + token.index,
            None => self.absolute_offset + self.input_length,
        }
    }

    fn record_error_at(&mut self, token: &Token, message: String) {
        let span = self.token_span(token);
        self.errors.push(ParseError::new(span, message));
    }

    fn record_error(&mut self, message: String) {
        let at = self.input_index();
        self.errors.push(ParseError::new(Span::new(at, at), message));
    }

    /// Consume the current token as a leaf of `parent`
    fn consume_into(&mut self, parent: NodeId) -> Option<NodeId> {
        let token = self.current()?.clone();
        self.index += 1;
        let span = self.token_span(&token);
        Some(self.template.token(parent, span))
    }

    fn consume_optional_character(&mut self, parent: NodeId, code: char) -> bool {
        if self.next_is_character(code) {
            self.consume_into(parent);
            true
        } else {
            false
        }
    }

    fn expect_character(&mut self, parent: NodeId, code: char) {
        if !self.consume_optional_character(parent, code) {
            self.record_error(format!("Missing expected {}", code));
        }
    }

    /// Open a node whose first child is the already-parsed `first`
    fn wrap(&mut self, kind: NodeKind, first: NodeId) -> NodeId {
        let start = self.template.span(first).start;
        let node = self.template.alloc(kind, Span::new(start, start));
        self.template.append_child(node, first);
        node
    }

    /// Open a node starting at the current token
    fn open(&mut self, kind: NodeKind) -> NodeId {
        let start = self.input_index();
        self.template.alloc(kind, Span::new(start, start))
    }

    /// Extend a node's span to the end of its last child
    fn close(&mut self, node: NodeId) -> NodeId {
        let start = self.template.span(node).start;
        let end = self
            .template
            .children(node)
            .last()
            .map(|&child| self.template.span(child).end)
            .unwrap_or(start);
        self.template.set_span(node, Span::new(start, end.max(start)));
        node
    }

    /// Parse `;`-separated expressions
    fn parse_chain(&mut self) -> Option<NodeId> {
        if self.at_end() {
            return None;
        }
        let first = self.parse_pipe();
        if !self.next_is_character(';') {
            return Some(first);
        }

        if self.mode != ExpressionMode::Action {
            self.record_error("Binding expression cannot contain chained expression".to_string());
        }
        let chain = self.wrap(NodeKind::Chain, first);
        while self.consume_optional_character(chain, ';') {
            if self.at_end() {
                break;
            }
            let expression = self.parse_pipe();
            self.template.append_child(chain, expression);
        }
        Some(self.close(chain))
    }

    /// Parse pipe expression (e.g., `value | pipeName:arg`)
    fn parse_pipe(&mut self) -> NodeId {
        let mut result = self.parse_expression();

        while self.next_is_operator("|") {
            if self.mode == ExpressionMode::Action {
                self.record_error("Cannot have a pipe in an action expression".to_string());
            }
            let pipe = self.wrap(NodeKind::Pipe, result);
            self.consume_into(pipe);

            match self.current().cloned() {
                Some(token) if token.is_identifier() || token.is_keyword() => {
                    let span = self.token_span(&token);
                    let name = self.template.alloc(
                        NodeKind::PipeReference {
                            name: token.str_value.clone(),
                        },
                        span,
                    );
                    self.consume_into(name);
                    self.template.append_child(pipe, name);
                }
                _ => self.record_error("expected identifier or keyword".to_string()),
            }

            if self.next_is_character(':') {
                let arguments = self.open(NodeKind::PipeArguments);
                while self.consume_optional_character(arguments, ':') {
                    let argument = self.parse_expression();
                    self.template.append_child(arguments, argument);
                }
                self.close(arguments);
                self.template.append_child(pipe, arguments);
            }
            result = self.close(pipe);
        }

        result
    }

    fn parse_expression(&mut self) -> NodeId {
        self.parse_assignment()
    }

    /// Parse assignment (e.g., `a = b`)
    fn parse_assignment(&mut self) -> NodeId {
        let left = self.parse_conditional();
        if !self.next_is_one_of(ASSIGNMENT_OPERATORS) {
            return left;
        }

        if self.mode != ExpressionMode::Action {
            self.record_error("Bindings cannot contain assignments".to_string());
        } else if !matches!(
            self.template.kind(left),
            NodeKind::Reference { .. } | NodeKind::Indexed
        ) {
            self.record_error("Expression is not assignable".to_string());
        }
        let operator = self.current().map(|token| token.str_value.clone()).unwrap_or_default();
        let node = self.wrap(NodeKind::Binary { operator }, left);
        self.consume_into(node);
        let right = self.parse_assignment();
        self.template.append_child(node, right);
        self.close(node)
    }

    /// Parse conditional/ternary expression (e.g., `a ? b : c`)
    fn parse_conditional(&mut self) -> NodeId {
        let condition = self.parse_binary(0);
        if !self.next_is_operator("?") {
            return condition;
        }

        let node = self.wrap(NodeKind::Conditional, condition);
        self.consume_into(node);
        let true_exp = self.parse_pipe();
        self.template.append_child(node, true_exp);
        self.expect_character(node, ':');
        let false_exp = self.parse_pipe();
        self.template.append_child(node, false_exp);
        self.close(node)
    }

    /// Left-associative binary operators, lowest precedence first
    fn parse_binary(&mut self, level: usize) -> NodeId {
        const LEVELS: &[&[&str]] = &[
            &["||"],
            &["&&"],
            &["??"],
            EQUALITY_OPERATORS,
            RELATIONAL_OPERATORS,
            ADDITIVE_OPERATORS,
            MULTIPLICATIVE_OPERATORS,
        ];

        if level >= LEVELS.len() {
            return self.parse_exponentiation();
        }

        let mut result = self.parse_binary(level + 1);
        while self.next_is_one_of(LEVELS[level])
            || (LEVELS[level] == RELATIONAL_OPERATORS
                && self.current().is_some_and(|token| token.is_keyword_named("in")))
        {
            let operator = self.current().map(|token| token.str_value.clone()).unwrap_or_default();
            let node = self.wrap(NodeKind::Binary { operator }, result);
            self.consume_into(node);
            let right = self.parse_binary(level + 1);
            self.template.append_child(node, right);
            result = self.close(node);
        }
        result
    }

    /// Parse exponentiation (right-associative)
    fn parse_exponentiation(&mut self) -> NodeId {
        let base = self.parse_prefix();
        if !self.next_is_operator("**") {
            return base;
        }
        let node = self.wrap(
            NodeKind::Binary {
                operator: "**".to_string(),
            },
            base,
        );
        self.consume_into(node);
        let exponent = self.parse_exponentiation();
        self.template.append_child(node, exponent);
        self.close(node)
    }

    /// Parse prefix operators (`!a`, `-a`, `typeof a`)
    fn parse_prefix(&mut self) -> NodeId {
        let operator = match self.current() {
            Some(token)
                if token.token_type == TokenType::Operator
                    && matches!(token.str_value.as_str(), "!" | "-" | "+") =>
            {
                Some(token.str_value.clone())
            }
            Some(token) if token.is_keyword_named("typeof") || token.is_keyword_named("void") => {
                Some(token.str_value.clone())
            }
            _ => None,
        };

        match operator {
            Some(operator) => {
                let node = self.open(NodeKind::Prefix { operator });
                self.consume_into(node);
                let operand = self.parse_prefix();
                self.template.append_child(node, operand);
                self.close(node)
            }
            None => self.parse_call_chain(),
        }
    }

    /// Parse member access, keyed access, calls and non-null assertions
    fn parse_call_chain(&mut self) -> NodeId {
        let mut result = self.parse_primary();

        loop {
            if self.next_is_character('.') || self.next_is_operator("?.") {
                if self.next_is_operator("?.")
                    && self
                        .peek(1)
                        .is_some_and(|token| token.is_character('(') || token.is_character('['))
                {
                    // `a?.(x)` and `a?.[x]` keep the `?.` token inside the call or key access
                    let is_call = self.peek(1).is_some_and(|token| token.is_character('('));
                    result = if is_call {
                        self.parse_call(result, true)
                    } else {
                        self.parse_keyed(result, true)
                    };
                    continue;
                }
                result = self.parse_access_member(result);
            } else if self.next_is_character('[') {
                result = self.parse_keyed(result, false);
            } else if self.next_is_character('(') {
                result = self.parse_call(result, false);
            } else if self.next_is_operator("!") {
                let node = self.wrap(NodeKind::NonNull, result);
                self.consume_into(node);
                result = self.close(node);
            } else {
                return result;
            }
        }
    }

    fn parse_access_member(&mut self, receiver: NodeId) -> NodeId {
        let dot = self.current().cloned();
        self.index += 1;
        let name_token = match self.current() {
            Some(token) if token.is_identifier() || token.is_keyword() => Some(token.clone()),
            _ => None,
        };

        let Some(name_token) = name_token else {
            self.record_error("expected identifier for property access".to_string());
            let node = self.wrap(
                NodeKind::Reference {
                    name: String::new(),
                },
                receiver,
            );
            if let Some(dot) = dot {
                let span = self.token_span(&dot);
                self.template.token(node, span);
            }
            return self.close(node);
        };

        let node = self.wrap(
            NodeKind::Reference {
                name: name_token.str_value.clone(),
            },
            receiver,
        );
        if let Some(dot) = dot {
            let span = self.token_span(&dot);
            self.template.token(node, span);
        }
        self.consume_into(node);
        self.close(node)
    }

    fn parse_keyed(&mut self, receiver: NodeId, safe: bool) -> NodeId {
        let node = self.wrap(NodeKind::Indexed, receiver);
        if safe {
            self.consume_into(node);
        }
        self.consume_into(node); // [
        let key = self.parse_pipe();
        self.template.append_child(node, key);
        self.expect_character(node, ']');
        self.close(node)
    }

    fn parse_call(&mut self, callee: NodeId, safe: bool) -> NodeId {
        let node = self.wrap(NodeKind::Call, callee);
        if safe {
            self.consume_into(node);
        }
        let arguments = self.open(NodeKind::ArgumentList);
        self.consume_into(arguments); // (
        if !self.next_is_character(')') {
            loop {
                let argument = self.parse_pipe();
                self.template.append_child(arguments, argument);
                if !self.consume_optional_character(arguments, ',') {
                    break;
                }
            }
        }
        self.expect_character(arguments, ')');
        self.close(arguments);
        self.template.append_child(node, arguments);
        self.close(node)
    }

    fn parse_primary(&mut self) -> NodeId {
        let Some(token) = self.current().cloned() else {
            self.record_error("Unexpected end of expression".to_string());
            let at = self.input_index();
            return self.template.alloc(NodeKind::Token, Span::new(at, at));
        };

        if token.is_character('(') {
            let node = self.open(NodeKind::Parenthesized);
            self.consume_into(node);
            let inner = self.parse_pipe();
            self.template.append_child(node, inner);
            self.expect_character(node, ')');
            return self.close(node);
        }

        if token.is_literal() {
            let node = self.open(NodeKind::Literal);
            self.consume_into(node);
            return self.close(node);
        }

        if token.is_keyword_named("this") {
            let node = self.open(NodeKind::This);
            self.consume_into(node);
            return self.close(node);
        }

        if token.is_character('[') {
            let node = self.open(NodeKind::ArrayLiteral);
            self.consume_into(node);
            if !self.next_is_character(']') {
                loop {
                    let element = self.parse_pipe();
                    self.template.append_child(node, element);
                    if !self.consume_optional_character(node, ',') {
                        break;
                    }
                }
            }
            self.expect_character(node, ']');
            return self.close(node);
        }

        if token.is_character('{') {
            return self.parse_literal_map();
        }

        if token.is_identifier() || token.is_keyword() {
            let node = self.open(NodeKind::Reference {
                name: token.str_value.clone(),
            });
            self.consume_into(node);
            return self.close(node);
        }

        if token.is_error() {
            self.record_error_at(&token, token.str_value.clone());
        } else {
            self.record_error_at(&token, format!("Unexpected token {}", token.str_value));
        }
        let node = self.open(NodeKind::Token);
        self.index += 1;
        let span = self.token_span(&token);
        self.template.set_span(node, span);
        node
    }

    fn parse_literal_map(&mut self) -> NodeId {
        let node = self.open(NodeKind::ObjectLiteral);
        self.consume_into(node); // {
        if !self.next_is_character('}') {
            loop {
                let Some(key) = self.current().cloned() else {
                    break;
                };
                let shorthand = key.is_identifier()
                    && self
                        .peek(1)
                        .is_some_and(|next| next.is_character(',') || next.is_character('}'));
                if shorthand {
                    let reference = self.open(NodeKind::Reference {
                        name: key.str_value.clone(),
                    });
                    self.consume_into(reference);
                    self.close(reference);
                    self.template.append_child(node, reference);
                } else {
                    self.consume_into(node);
                    self.expect_character(node, ':');
                    let value = self.parse_pipe();
                    self.template.append_child(node, value);
                }
                if !self.consume_optional_character(node, ',') {
                    break;
                }
            }
        }
        self.expect_character(node, '}');
        self.close(node)
    }

    /// Parse the microsyntax of a structural directive
    fn parse_template_bindings(&mut self, owner: NodeId, directive: &str) {
        let mut first = true;
        while !self.at_end() {
            if self.consume_separator(owner) {
                continue;
            }

            let Some(token) = self.current().cloned() else {
                break;
            };
            let start_index = self.index;

            if token.is_keyword_named("let") {
                self.parse_let_binding(owner);
            } else if first {
                let binding = self.open(NodeKind::TemplateBinding {
                    key: directive.to_string(),
                });
                let value = self.parse_pipe();
                self.template.append_child(binding, value);
                self.close(binding);
                self.template.append_child(owner, binding);
                self.parse_as_binding(owner);
            } else if token.is_identifier() || token.is_keyword() {
                self.parse_keyed_binding(owner, directive, &token);
            } else {
                self.record_error_at(&token, format!("Unexpected token {}", token.str_value));
                self.index += 1;
            }

            first = false;
            if self.index == start_index {
                self.index += 1;
            }
        }
    }

    fn consume_separator(&mut self, owner: NodeId) -> bool {
        self.consume_optional_character(owner, ';') || self.consume_optional_character(owner, ',')
    }

    /// `let item` or `let i = index`
    fn parse_let_binding(&mut self, owner: NodeId) {
        let name = match self.peek(1) {
            Some(token) if token.is_identifier() || token.is_keyword() => token.str_value.clone(),
            _ => {
                self.index += 1;
                self.record_error("Expected identifier after 'let'".to_string());
                return;
            }
        };
        let variable = self.open(NodeKind::TemplateVariable { name });
        self.consume_into(variable); // let
        self.consume_into(variable); // name
        if self.next_is_operator("=") {
            self.consume_into(variable);
            match self.current() {
                Some(token) if token.is_identifier() || token.is_keyword() => {
                    self.consume_into(variable);
                }
                _ => self.record_error("Expected identifier after '='".to_string()),
            }
        }
        self.close(variable);
        self.template.append_child(owner, variable);
    }

    /// `key expression`, `key: expression` or `key as alias`
    fn parse_keyed_binding(&mut self, owner: NodeId, directive: &str, key: &Token) {
        if self.peek(1).is_some_and(|token| token.is_keyword_named("as")) {
            let alias = match self.peek(2) {
                Some(token) if token.is_identifier() => token.str_value.clone(),
                _ => {
                    self.index += 2;
                    self.record_error("Expected identifier after 'as'".to_string());
                    return;
                }
            };
            let variable = self.open(NodeKind::TemplateVariable { name: alias });
            self.consume_into(variable); // key
            self.consume_into(variable); // as
            self.consume_into(variable); // alias
            self.close(variable);
            self.template.append_child(owner, variable);
            return;
        }

        let binding = self.open(NodeKind::TemplateBinding {
            key: format!("{}{}", directive, capitalize(&key.str_value)),
        });
        self.consume_into(binding);
        self.consume_optional_character(binding, ':');
        if !self.at_end() && !self.next_is_character(';') && !self.next_is_character(',') {
            let value = self.parse_pipe();
            self.template.append_child(binding, value);
        }
        self.close(binding);
        self.template.append_child(owner, binding);
        self.parse_as_binding(owner);
    }

    /// Trailing `as alias` after an expression
    fn parse_as_binding(&mut self, owner: NodeId) {
        if !self.current().is_some_and(|token| token.is_keyword_named("as")) {
            return;
        }
        let alias = match self.peek(1) {
            Some(token) if token.is_identifier() => token.str_value.clone(),
            _ => {
                self.index += 1;
                self.record_error("Expected identifier after 'as'".to_string());
                return;
            }
        };
        let variable = self.open(NodeKind::TemplateVariable { name: alias });
        self.consume_into(variable); // as
        self.consume_into(variable); // alias
        self.close(variable);
        self.template.append_child(owner, variable);
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
