/**
 * Angular Expression Lexer
 *
 * Splits binding, action and microsyntax text into tokens. Offsets are
 * relative to the scanned text; the parser rebases them onto the template.
 */
use serde::{Deserialize, Serialize};

use crate::chars;

/// Token types in Angular expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum TokenType {
    Character = 0,
    Identifier = 1,
    Keyword = 2,
    String = 3,
    Operator = 4,
    Number = 5,
    Error = 6,
}

/// Token representation; `index..end` is relative to the tokenized input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub index: usize,
    pub end: usize,
    pub token_type: TokenType,
    pub str_value: String,
}

impl Token {
    pub fn new(index: usize, end: usize, token_type: TokenType, str_value: String) -> Self {
        Token {
            index,
            end,
            token_type,
            str_value,
        }
    }

    pub fn operator(index: usize, end: usize, str_value: &str) -> Self {
        Token::new(index, end, TokenType::Operator, str_value.to_string())
    }

    pub fn is_character(&self, code: char) -> bool {
        self.token_type == TokenType::Character && self.str_value.starts_with(code)
    }

    pub fn is_identifier(&self) -> bool {
        self.token_type == TokenType::Identifier
    }

    pub fn is_keyword(&self) -> bool {
        self.token_type == TokenType::Keyword
    }

    pub fn is_keyword_named(&self, keyword: &str) -> bool {
        self.token_type == TokenType::Keyword && self.str_value == keyword
    }

    pub fn is_operator(&self, operator: &str) -> bool {
        self.token_type == TokenType::Operator && self.str_value == operator
    }

    pub fn is_literal(&self) -> bool {
        matches!(self.token_type, TokenType::String | TokenType::Number)
            || matches!(
                self.str_value.as_str(),
                "null" | "undefined" | "true" | "false"
            ) && self.is_keyword()
    }

    pub fn is_error(&self) -> bool {
        self.token_type == TokenType::Error
    }
}

/// Angular expression lexer
#[derive(Debug, Default, Clone, Copy)]
pub struct Lexer;

impl Lexer {
    pub fn new() -> Self {
        Lexer
    }

    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        Scanner::new(text).scan()
    }
}

// Angular keywords
const KEYWORDS: &[&str] = &[
    "var", "let", "as", "null", "undefined", "true", "false", "if", "else", "this", "typeof",
    "void", "in",
];

// Longest first so that `===` wins over `==` and `=`
const OPERATORS: &[&str] = &[
    "===", "!==", "...", "&&=", "||=", "??=", "==", "!=", "<=", ">=", "&&", "||", "??", "?.",
    "+=", "-=", "*=", "/=", "%=", "**", "=>", "+", "-", "*", "/", "%", "<", ">", "!", "=", "?",
    "|", "&",
];

/// Scanner for tokenizing input
struct Scanner<'a> {
    input: &'a str,
    length: usize,
    index: usize,
    peek: char,
    tokens: Vec<Token>,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        let peek = input.chars().next().unwrap_or(chars::EOF);
        Scanner {
            input,
            length: input.len(),
            index: 0,
            peek,
            tokens: Vec::new(),
        }
    }

    fn scan(mut self) -> Vec<Token> {
        while let Some(token) = self.scan_token() {
            self.tokens.push(token);
        }
        self.tokens
    }

    fn advance(&mut self) {
        if self.index >= self.length {
            return;
        }
        self.index += self.peek.len_utf8();
        self.peek = self.input[self.index..].chars().next().unwrap_or(chars::EOF);
    }

    fn scan_token(&mut self) -> Option<Token> {
        while self.index < self.length && chars::is_whitespace(self.peek) {
            self.advance();
        }

        if self.index >= self.length {
            return None;
        }

        let start = self.index;
        let ch = self.peek;

        if chars::is_identifier_start(ch) {
            return Some(self.scan_identifier());
        }

        if chars::is_digit(ch) {
            return Some(self.scan_number(start));
        }

        match ch {
            chars::PERIOD => {
                if self.input[start + 1..].starts_with(|next: char| chars::is_digit(next)) {
                    return Some(self.scan_number(start));
                }
                if self.input[start..].starts_with("...") {
                    return Some(self.scan_operator(start, "..."));
                }
                Some(self.scan_character(start, ch))
            }
            chars::LPAREN
            | chars::RPAREN
            | chars::LBRACKET
            | chars::RBRACKET
            | chars::LBRACE
            | chars::RBRACE
            | chars::COMMA
            | chars::COLON
            | chars::SEMICOLON => Some(self.scan_character(start, ch)),
            chars::SQ | chars::DQ => Some(self.scan_string(ch)),
            _ => {
                let rest = &self.input[start..];
                // `?.` followed by a digit is a conditional, not safe navigation
                let operator = OPERATORS.iter().find(|op| {
                    rest.starts_with(*op)
                        && !(**op == "?."
                            && rest[2..].starts_with(|next: char| chars::is_digit(next)))
                });
                match operator {
                    Some(op) => Some(self.scan_operator(start, op)),
                    None => {
                        self.advance();
                        Some(Token::new(
                            start,
                            self.index,
                            TokenType::Error,
                            format!(
                                "Lexer Error: Unexpected character [{}] at column {} in expression [{}]",
                                ch, start, self.input
                            ),
                        ))
                    }
                }
            }
        }
    }

    fn scan_character(&mut self, start: usize, ch: char) -> Token {
        self.advance();
        Token::new(start, self.index, TokenType::Character, ch.to_string())
    }

    fn scan_operator(&mut self, start: usize, op: &str) -> Token {
        for _ in op.chars() {
            self.advance();
        }
        Token::operator(start, self.index, op)
    }

    fn scan_identifier(&mut self) -> Token {
        let start = self.index;
        self.advance();

        while self.index < self.length && chars::is_identifier_part(self.peek) {
            self.advance();
        }

        let str_value = self.input[start..self.index].to_string();
        let token_type = if KEYWORDS.contains(&str_value.as_str()) {
            TokenType::Keyword
        } else {
            TokenType::Identifier
        };

        Token::new(start, self.index, token_type, str_value)
    }

    fn scan_number(&mut self, start: usize) -> Token {
        let mut seen_exponent = false;
        loop {
            if chars::is_digit(self.peek) || self.peek == chars::PERIOD || self.peek == '_' {
                self.advance();
            } else if (self.peek == 'e' || self.peek == 'E') && !seen_exponent {
                seen_exponent = true;
                self.advance();
                if self.peek == chars::PLUS || self.peek == chars::MINUS {
                    self.advance();
                }
            } else {
                break;
            }
        }
        Token::new(
            start,
            self.index,
            TokenType::Number,
            self.input[start..self.index].to_string(),
        )
    }

    fn scan_string(&mut self, quote: char) -> Token {
        let start = self.index;
        self.advance(); // opening quote

        let mut value = String::new();
        while self.peek != quote {
            if self.index >= self.length {
                return Token::new(
                    start,
                    self.index,
                    TokenType::Error,
                    format!(
                        "Lexer Error: Unterminated quote at column {} in expression [{}]",
                        start, self.input
                    ),
                );
            }
            if self.peek == chars::BACKSLASH {
                self.advance();
                if self.index >= self.length {
                    continue;
                }
            }
            value.push(self.peek);
            self.advance();
        }
        self.advance(); // closing quote

        Token::new(start, self.index, TokenType::String, value)
    }
}
