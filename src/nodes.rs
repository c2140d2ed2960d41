//! The document AST consumed by the renderers.

use crate::arena_tree::Node;
use std::cell::RefCell;

/// The core AST node enum.
///
/// Variants that need more than their children carry a payload struct; all
/// text is UTF-8.
#[derive(Debug, Clone)]
pub enum NodeValue {
    /// The root of every document.  Contains **blocks**.
    Document,

    /// **Block**. A code block.  Contains raw text which is never
    /// interpreted, only escaped on output.
    CodeBlock(NodeCodeBlock),

    /// **Block**. A raw HTML block.  Contains raw text which is neither
    /// interpreted nor escaped by default.
    HtmlBlock(String),

    /// **Block**. A block quote.  Contains other **blocks**.
    BlockQuote,

    /// **Block**. A definition list.  Contains definition titles and data.
    Definition(NodeDefinition),

    /// **Block**. The term of a definition list entry.  Contains
    /// **inlines**.
    DefinitionTitle,

    /// **Block**. The data of a definition list entry.  Contains items.
    DefinitionData,

    /// **Block**. A heading.  `level` starts at 1.  Contains **inlines**.
    Heading(NodeHeading),

    /// **Block**. A horizontal rule.  Has no children.
    ThematicBreak,

    /// **Block**. An ordered or unordered list.  Contains items.
    List(NodeList),

    /// **Block**. A list (or definition-data) item.  Contains other
    /// **blocks**.
    Item(NodeItem),

    /// **Block**. A paragraph.  Contains **inlines**.
    Paragraph,

    /// **Block**. A table.  Contains a table head and optionally a table
    /// body.
    Table(NodeTable),

    /// **Block**. The header-row group of a table.  Contains rows.
    TableHead,

    /// **Block**. The body-row group of a table.  Contains rows.
    TableBody,

    /// **Block**. A table row.  Contains cells.
    TableRow,

    /// **Block**. A table cell.  Contains **inlines**.
    TableCell(NodeTableCell),

    /// **Block**. The container for all footnote definitions, at the end of
    /// the document.
    FootnotesBlock,

    /// **Block**. A single footnote definition.  Contains other **blocks**.
    FootnoteDefinition(NodeFootnoteDefinition),

    /// **Inline**. A reference to a footnote definition.
    FootnoteReference(NodeFootnoteReference),

    /// **Inline**. A link recognized without explicit syntax.
    Autolink(NodeAutolink),

    /// **Inline**. A code span.
    Code(String),

    /// **Inline**. Double-emphasised (strong) text.
    Strong,

    /// **Inline**. Triple-emphasised text.
    TripleEmph,

    /// **Inline**. Emphasised text.
    Emph,

    /// **Inline**. Highlighted text.
    Highlight,

    /// **Inline**. An image.
    Image(NodeImage),

    /// **Inline**. A hard line break.
    LineBreak,

    /// **Inline**. A link to some URL, with possible title.
    Link(NodeLink),

    /// **Inline**. Struck-through text.
    Strikethrough,

    /// **Inline**. Superscript text.
    Superscript,

    /// **Inline or block**. A math span; `display_math` marks the block
    /// form.
    Math(NodeMath),

    /// **Inline**. Raw HTML contained inline.
    HtmlInline(String),

    /// **Inline**. A named HTML entity, with the text still carrying the
    /// `&`-`;` wrapping.
    Entity(String),

    /// **Inline**. Literal text.
    Text(String),

    /// The document metadata container, preceding all content blocks.
    /// Contains meta entries.
    DocHeader,

    /// A single metadata entry; the children render into its value.
    Meta(NodeMeta),

    /// The end-of-document marker, following all content blocks.
    DocFooter,
}

/// Change-tracking tag attached to every node.
///
/// Renderers that support it overlay inserted/deleted markers or styles;
/// metadata from deleted entries is not collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChangeTracking {
    /// Not part of a tracked change.
    #[default]
    None,
    /// The node was inserted.
    Insert,
    /// The node was deleted.
    Delete,
}

/// Alignment of a single table column or cell.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum TableAlignment {
    /// Cell content is unaligned.
    #[default]
    None,
    /// Cell content is aligned left.
    Left,
    /// Cell content is centered.
    Center,
    /// Cell content is aligned right.
    Right,
}

/// The metadata of a code block.
#[derive(Debug, Clone, Default)]
pub struct NodeCodeBlock {
    /// The language of the block, from the fence info string, possibly
    /// empty.
    pub lang: String,
    /// The literal contents of the code block.
    pub literal: String,
}

/// The metadata of a definition list.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeDefinition {
    /// Whether entries are in block ("loose") mode, i.e. whether their
    /// contents are wrapped in paragraphs when formatted as HTML.
    pub block: bool,
}

/// The metadata of a heading.
#[derive(Debug, Clone, Copy)]
pub struct NodeHeading {
    /// The level of the heading, from 1 up.  HTML output clamps the
    /// effective level to 6.
    pub level: u32,
}

/// The metadata of a list.
#[derive(Debug, Clone, Default)]
pub struct NodeList {
    /// Whether the list is ordered.
    pub ordered: bool,
    /// Whether items are in block ("loose") mode.
    pub block: bool,
    /// For ordered lists, the ordinal the list starts at, as written in the
    /// source.  Empty means the default of 1.
    pub start: String,
}

/// The metadata of a list or definition-data item.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeItem {
    /// The item's ordinal within an ordered list.
    pub num: usize,
    /// Whether the containing list is ordered.
    pub ordered: bool,
    /// Whether this item belongs to a definition list, suppressing `<li>`
    /// wrappers.
    pub definition: bool,
}

/// The metadata of a table.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeTable {
    /// The number of columns across all rows.
    pub columns: usize,
}

/// The metadata of a table cell.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeTableCell {
    /// The zero-based column this cell belongs to.
    pub col: usize,
    /// Whether the cell is part of the header row.
    pub header: bool,
    /// The cell's alignment, from the column specification.
    pub alignment: TableAlignment,
}

/// The metadata of a footnote definition.
#[derive(Debug, Clone, Copy)]
pub struct NodeFootnoteDefinition {
    /// The footnote's number; monotonic over the document.
    pub num: usize,
}

/// The metadata of a footnote reference.
#[derive(Debug, Clone, Copy)]
pub struct NodeFootnoteReference {
    /// The referent definition's number.
    pub num: usize,
}

/// The kind of an autolink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutolinkKind {
    /// A bare URI.
    Uri,
    /// An e-mail address; HTML output links it through `mailto:`.
    Email,
}

/// The details of an autolink.
#[derive(Debug, Clone)]
pub struct NodeAutolink {
    /// The link destination, doubling as the visible text.
    pub url: String,
    /// What was detected.
    pub kind: AutolinkKind,
}

/// The details of a link destination.
#[derive(Debug, Clone, Default)]
pub struct NodeLink {
    /// The URL of the link destination.
    pub url: String,
    /// The title of the link, possibly empty.
    pub title: String,
}

/// The details of an image.
#[derive(Debug, Clone, Default)]
pub struct NodeImage {
    /// The image source URL.
    pub url: String,
    /// The title, possibly empty.
    pub title: String,
    /// The alternative text, possibly empty.
    pub alt: String,
    /// Legacy dimension string, `W` or `WxH`, possibly empty.
    pub dims: String,
    /// Extended-attribute width, possibly empty.
    pub attr_width: String,
    /// Extended-attribute height, possibly empty.
    pub attr_height: String,
}

/// The contents of a math span.
#[derive(Debug, Clone, Default)]
pub struct NodeMath {
    /// The literal contents, never interpreted.
    pub literal: String,
    /// Whether this is display (block) math rather than inline math.
    pub display_math: bool,
}

/// The key of a metadata entry.  The entry's value is rendered from its
/// children.
#[derive(Debug, Clone, Default)]
pub struct NodeMeta {
    /// The metadata key, as written.
    pub key: String,
}

impl NodeValue {
    /// Indicates whether this node is a block node or inline node.
    pub fn block(&self) -> bool {
        matches!(
            *self,
            NodeValue::Document
                | NodeValue::CodeBlock(..)
                | NodeValue::HtmlBlock(..)
                | NodeValue::BlockQuote
                | NodeValue::Definition(..)
                | NodeValue::DefinitionTitle
                | NodeValue::DefinitionData
                | NodeValue::Heading(..)
                | NodeValue::ThematicBreak
                | NodeValue::List(..)
                | NodeValue::Item(..)
                | NodeValue::Paragraph
                | NodeValue::Table(..)
                | NodeValue::TableHead
                | NodeValue::TableBody
                | NodeValue::TableRow
                | NodeValue::TableCell(..)
                | NodeValue::FootnotesBlock
                | NodeValue::FootnoteDefinition(..)
        )
    }

    /// Return a reference to the text of a `Text` inline, if this node is
    /// one.
    pub fn text(&self) -> Option<&String> {
        match *self {
            NodeValue::Text(ref t) => Some(t),
            _ => None,
        }
    }
}

/// A single node in the document AST: the node value plus the change tag.
#[derive(Debug, Clone)]
pub struct Ast {
    /// The node value itself.
    pub value: NodeValue,

    /// The change-tracking tag for this node.
    pub change: ChangeTracking,
}

impl Ast {
    /// Make an untracked node of the given value.
    pub fn new(value: NodeValue) -> Self {
        Ast {
            value,
            change: ChangeTracking::None,
        }
    }
}

impl From<NodeValue> for Ast {
    fn from(value: NodeValue) -> Self {
        Ast::new(value)
    }
}

/// The type of a node within the document.
///
/// It is bound by the lifetime `'a`, which corresponds to the `Arena` the
/// nodes are allocated in.  The `Ast` is wrapped in `RefCell` for interior
/// mutability while the tree is being built; renderers only read.
pub type AstNode<'a> = Node<'a, RefCell<Ast>>;

/// Convenience pattern test against a node's value.
#[macro_export]
macro_rules! node_matches {
    ($node:expr, $( $pat:pat_param )|+) => {{
        matches!($node.data.borrow().value, $( $pat )|+)
    }};
}
