/**
 * Template AST Module
 *
 * Arena-backed concrete syntax tree shared by the markup parser, the
 * expression parser and the extraction engine.
 */
pub mod node;
pub mod template;

pub use node::{NodeId, NodeKind, Span};
pub use template::Template;
