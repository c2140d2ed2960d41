use std::cell::RefCell;

pub use crate::nodes::{Ast, AstNode, ChangeTracking, NodeValue};
pub use crate::{Arena, Buffer, GeminiOptions, HtmlOptions, MetadataQueue, TermOptions};

mod buffer;
mod escape;
mod gemini;

pub fn ast<'a>(arena: &'a Arena<AstNode<'a>>, value: NodeValue) -> &'a AstNode<'a> {
    arena.alloc(AstNode::new(RefCell::new(Ast::new(value))))
}

pub fn ast_changed<'a>(
    arena: &'a Arena<AstNode<'a>>,
    value: NodeValue,
    change: ChangeTracking,
) -> &'a AstNode<'a> {
    let n = ast(arena, value);
    n.data.borrow_mut().change = change;
    n
}

pub fn text<'a>(arena: &'a Arena<AstNode<'a>>, literal: &str) -> &'a AstNode<'a> {
    ast(arena, NodeValue::Text(literal.to_string()))
}

pub fn append_all<'a>(parent: &'a AstNode<'a>, children: &[&'a AstNode<'a>]) -> &'a AstNode<'a> {
    for child in children {
        parent.append(child);
    }
    parent
}

pub fn doc<'a>(arena: &'a Arena<AstNode<'a>>, children: &[&'a AstNode<'a>]) -> &'a AstNode<'a> {
    append_all(ast(arena, NodeValue::Document), children)
}

pub fn paragraph<'a>(
    arena: &'a Arena<AstNode<'a>>,
    children: &[&'a AstNode<'a>],
) -> &'a AstNode<'a> {
    append_all(ast(arena, NodeValue::Paragraph), children)
}

pub fn render_html<'a>(root: &'a AstNode<'a>, options: &HtmlOptions) -> String {
    let mut output = Buffer::new();
    crate::html::format_document(root, options, &mut output).unwrap();
    output.into_string()
}

pub fn render_html_with_metadata<'a>(
    root: &'a AstNode<'a>,
    options: &HtmlOptions,
    metadata: &mut MetadataQueue,
) -> String {
    let mut output = Buffer::new();
    crate::html::format_document_with_metadata(root, options, &mut output, metadata).unwrap();
    output.into_string()
}

pub fn render_gemini<'a>(root: &'a AstNode<'a>, options: &GeminiOptions) -> String {
    let mut output = Buffer::new();
    crate::gemini::format_document(root, options, &mut output).unwrap();
    output.into_string()
}

pub fn render_term<'a>(root: &'a AstNode<'a>, options: &TermOptions) -> String {
    let mut output = Buffer::new();
    crate::term::format_document(root, options, &mut output).unwrap();
    output.into_string()
}

/// Strip ANSI SGR sequences, for layout assertions.
pub fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for e in chars.by_ref() {
                if e == 'm' {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}
