/**
 * Expression Parser Module
 *
 * Tokenizes and parses binding, action and microsyntax expressions into the
 * template arena.
 */
pub mod lexer;
pub mod parser;

pub use lexer::{Lexer, Token, TokenType};
pub use parser::{ExpressionMode, Parser};
