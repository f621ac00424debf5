//! Character classes
//!
//! The markup tree builder and the expression scanner read the source one
//! `char` at a time; `EOF` is what they see past the end.

pub const EOF: char = '\0';
pub const NEWLINE: char = '\n';
pub const BACKSLASH: char = '\\';

// Quotes delimit attribute values and string literals
pub const SQ: char = '\'';
pub const DQ: char = '"';

// Markup
pub const LT: char = '<';
pub const GT: char = '>';
pub const EQ: char = '=';
pub const SLASH: char = '/';

// Expression punctuation
pub const LPAREN: char = '(';
pub const RPAREN: char = ')';
pub const LBRACKET: char = '[';
pub const RBRACKET: char = ']';
pub const LBRACE: char = '{';
pub const RBRACE: char = '}';
pub const COMMA: char = ',';
pub const COLON: char = ':';
pub const SEMICOLON: char = ';';
pub const PERIOD: char = '.';
pub const PLUS: char = '+';
pub const MINUS: char = '-';

const NBSP: char = '\u{00A0}';

/// Control characters, space and no-break space; never `EOF`
pub fn is_whitespace(ch: char) -> bool {
    (ch != EOF && ch <= ' ') || ch == NBSP
}

pub fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

pub fn is_ascii_letter(ch: char) -> bool {
    ch.is_ascii_alphabetic()
}

/// `[A-Za-z_$]`
pub fn is_identifier_start(ch: char) -> bool {
    matches!(ch, 'a'..='z' | 'A'..='Z' | '_' | '$')
}

/// `[A-Za-z0-9_$]`
pub fn is_identifier_part(ch: char) -> bool {
    is_identifier_start(ch) || is_digit(ch)
}

/// Character that ends a markup tag or attribute name. Brackets and
/// parentheses do not, so `[(ngModel)]` is one name.
pub fn is_name_end(ch: char) -> bool {
    is_whitespace(ch) || matches!(ch, EOF | LT | GT | SLASH | EQ | SQ | DQ)
}
