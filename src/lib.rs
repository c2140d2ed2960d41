//! A multi-backend renderer for parsed Markdown document trees.
//!
//! rendown takes a tagged node tree (produced by a Markdown parser
//! upstream of this crate) and renders it into one of three concrete
//! output formats:
//!
//! * [`html`] — well-formed HTML, with unique header identifiers and
//!   optional standalone document framing;
//! * [`gemini`] — gemtext, with deferred link references and ASCII table
//!   layout;
//! * [`term`] — soft-wrapped, ANSI-styled terminal output.
//!
//! All three backends share the input model ([`nodes::AstNode`], arena
//! allocated), the output model ([`Buffer`]), and the metadata queue
//! ([`MetadataQueue`]).  A render either completes or returns the first
//! write failure; malformed payloads (unknown entities, bad dimension
//! strings) degrade to sensible defaults instead of failing.
//!
//! ```rust
//! use rendown::nodes::{Ast, AstNode, NodeValue};
//! use rendown::{Arena, Buffer, HtmlOptions};
//! use std::cell::RefCell;
//!
//! let arena = Arena::new();
//! let root: &AstNode = arena.alloc(AstNode::new(RefCell::new(Ast::new(NodeValue::Document))));
//! let para = arena.alloc(AstNode::new(RefCell::new(Ast::new(NodeValue::Paragraph))));
//! let text = arena.alloc(AstNode::new(RefCell::new(Ast::new(NodeValue::Text(
//!     "Hello".to_string(),
//! )))));
//! root.append(para);
//! para.append(text);
//!
//! let mut output = Buffer::new();
//! rendown::html::format_document(root, &HtmlOptions::default(), &mut output).unwrap();
//! assert_eq!(output.as_str(), "<p>Hello</p>\n");
//! ```

pub mod arena_tree;
mod buffer;
mod ctype;
pub mod entity;
pub mod escape;
pub mod gemini;
pub mod html;
mod metadata;
pub mod nodes;
mod options;
pub mod strings;
pub mod term;
mod width;

#[cfg(test)]
mod tests;

pub use buffer::Buffer;
pub use metadata::{Metadata, MetadataQueue};
pub use options::{GeminiOptions, HtmlOptions, TermOptions};
pub use typed_arena::Arena;
