//! ML Parser Module
//!
//! Markup parser producing the template arena consumed by refactorings.

pub mod attributes;
pub mod html_parser;
pub mod html_tags;
pub mod parser;

pub use html_parser::HtmlParser;
pub use parser::ParseTreeResult;
