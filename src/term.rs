//! ANSI terminal rendering for the document AST.
//!
//! Output is soft-wrapped to a column limit.  Every line starts with the
//! accumulated prefixes of the ancestor blocks (list markers, quote bars,
//! footnote numbers), each of which knows how many lines it has already
//! prefixed so markers appear only once.  Styles are recomputed from the
//! ancestor chain at every word or line boundary and closed with `SGR 0`
//! no later than end of line.

use std::fmt::{self, Write};

use smallvec::SmallVec;

use crate::buffer::Buffer;
use crate::ctype::isspace;
use crate::entity;
use crate::metadata::MetadataQueue;
use crate::node_matches;
use crate::nodes::{AstNode, ChangeTracking, NodeTableCell, NodeValue, TableAlignment};
use crate::options::TermOptions;
use crate::width::{char_width, display_width};

/// Formats an AST as styled terminal output, modified by the given
/// options.  An ephemeral metadata queue is used internally.
pub fn format_document<'a>(
    root: &'a AstNode<'a>,
    options: &TermOptions,
    output: &mut Buffer,
) -> fmt::Result {
    let mut metadata = MetadataQueue::new();
    format_document_with_metadata(root, options, output, &mut metadata)
}

/// Formats an AST as styled terminal output, collecting metadata entries
/// into `metadata` as they are encountered.
pub fn format_document_with_metadata<'a>(
    root: &'a AstNode<'a>,
    options: &TermOptions,
    output: &mut Buffer,
    metadata: &mut MetadataQueue,
) -> fmt::Result {
    let mut f = TermRenderer::new(options);
    f.rndr(output, metadata, root)
}

const CLEAR_UNDER: u8 = 0x01;
const CLEAR_BOLD: u8 = 0x02;

/// How to style a span of output on the screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Style {
    italic: bool,
    strike: bool,
    bold: bool,
    under: bool,
    /// SGR background parameter; 0 means unset.  Not inherited.
    bg: u8,
    /// SGR foreground parameter; 0 means unset.  Not inherited.
    fg: u8,
    clear_bold: bool,
    clear_under: bool,
}

impl Style {
    const NONE: Style = Style::new(false, false, false, false, 0, 0, 0);

    const fn new(
        italic: bool,
        strike: bool,
        bold: bool,
        under: bool,
        bg: u8,
        fg: u8,
        clears: u8,
    ) -> Style {
        Style {
            italic,
            strike,
            bold,
            under,
            bg,
            fg,
            clear_bold: clears & CLEAR_BOLD != 0,
            clear_under: clears & CLEAR_UNDER != 0,
        }
    }

    /// Whether the style sets any visible attribute.
    fn is_empty(&self) -> bool {
        !(self.italic || self.strike || self.bold || self.under || self.bg != 0 || self.fg != 0)
    }

    /// Accumulate `from` into this style.  Attributes add to what's
    /// already set unless the source clears them; colours override.
    fn apply(&mut self, from: &Style) {
        if from.italic {
            self.italic = true;
        }
        if from.strike {
            self.strike = true;
        }
        if from.bold {
            self.bold = true;
        } else if from.clear_bold {
            self.bold = false;
        }
        if from.under {
            self.under = true;
        } else if from.clear_under {
            self.under = false;
        }
        if from.bg != 0 {
            self.bg = from.bg;
        }
        if from.fg != 0 {
            self.fg = from.fg;
        }
    }
}

// Per-node styles.

static STY_IMAGE: Style = Style::new(false, false, true, false, 0, 92, CLEAR_UNDER);
static STY_FOOT_REF: Style = Style::new(false, false, true, false, 0, 92, CLEAR_UNDER);
static STY_CODESPAN: Style = Style::new(false, false, false, false, 47, 31, 0);
static STY_HRULE: Style = Style::new(false, false, false, false, 0, 37, 0);
static STY_BLOCKHTML: Style = Style::new(false, false, false, false, 0, 37, 0);
static STY_RAWHTML: Style = Style::new(false, false, false, false, 0, 37, 0);
static STY_STRIKE: Style = Style::new(false, true, false, false, 0, 0, 0);
static STY_EMPH: Style = Style::new(true, false, false, false, 0, 0, 0);
static STY_HIGHLIGHT: Style = Style::new(false, false, true, false, 0, 0, 0);
static STY_D_EMPH: Style = Style::new(false, false, true, false, 0, 0, 0);
static STY_T_EMPH: Style = Style::new(true, false, true, false, 0, 0, 0);
static STY_LINK: Style = Style::new(false, false, false, true, 0, 32, 0);
static STY_AUTOLINK: Style = Style::new(false, false, false, true, 0, 32, 0);
static STY_HEADER: Style = Style::new(false, false, true, false, 0, 0, 0);

// Special styles, invoked in key places below.

static STY_H1: Style = Style::new(false, false, false, false, 104, 37, 0);
static STY_HN: Style = Style::new(false, false, false, false, 0, 36, 0);
static STY_LINKALT: Style = Style::new(false, false, true, false, 0, 92, CLEAR_UNDER | CLEAR_BOLD);
static STY_IMGURL: Style = Style::new(false, false, false, true, 0, 32, CLEAR_BOLD);
static STY_IMGURLBOX: Style = Style::new(false, false, false, false, 0, 37, CLEAR_BOLD);
static STY_FOOTS_DIV: Style = Style::new(false, false, false, false, 0, 37, 0);
static STY_META_KEY: Style = Style::new(false, false, false, false, 0, 37, 0);
static STY_BAD_ENT: Style = Style::new(false, false, false, false, 0, 37, 0);
static STY_CHNG_INS: Style = Style::new(false, false, false, false, 47, 30, 0);
static STY_CHNG_DEL: Style = Style::new(false, false, false, false, 100, 0, 0);

// Prefix styles, applied to block-level prefix material.

static STY_DDATA_PFX: Style = Style::new(false, false, false, false, 0, 93, 0);
static STY_FDEF_PFX: Style = Style::new(false, false, false, false, 0, 92, CLEAR_UNDER);
static STY_BKQT_PFX: Style = Style::new(false, false, false, false, 0, 37, 0);
static STY_OLI_PFX: Style = Style::new(false, false, false, false, 0, 93, 0);
static STY_ULI_PFX: Style = Style::new(false, false, false, false, 0, 93, 0);

fn base_style(value: &NodeValue) -> Option<&'static Style> {
    match *value {
        NodeValue::Heading(..) => Some(&STY_HEADER),
        NodeValue::ThematicBreak => Some(&STY_HRULE),
        NodeValue::HtmlBlock(..) => Some(&STY_BLOCKHTML),
        NodeValue::Autolink(..) => Some(&STY_AUTOLINK),
        NodeValue::Code(..) => Some(&STY_CODESPAN),
        NodeValue::Strong => Some(&STY_D_EMPH),
        NodeValue::Emph => Some(&STY_EMPH),
        NodeValue::Highlight => Some(&STY_HIGHLIGHT),
        NodeValue::Image(..) => Some(&STY_IMAGE),
        NodeValue::Link(..) => Some(&STY_LINK),
        NodeValue::TripleEmph => Some(&STY_T_EMPH),
        NodeValue::Strikethrough => Some(&STY_STRIKE),
        NodeValue::FootnoteReference(..) => Some(&STY_FOOT_REF),
        NodeValue::HtmlInline(..) => Some(&STY_RAWHTML),
        _ => None,
    }
}

/// Augment `s` with the style for `n` alone, without ascending.
fn node_style(s: &mut Style, n: &AstNode) {
    let data = n.data.borrow();

    if let Some(base) = base_style(&data.value) {
        s.apply(base);
    }

    match data.value {
        NodeValue::Heading(ref nh) => {
            if nh.level <= 1 {
                s.apply(&STY_H1);
            } else {
                s.apply(&STY_HN);
            }
        }
        _ => {
            if n.parent()
                .map_or(false, |p| node_matches!(p, NodeValue::Link(..)))
            {
                s.apply(&STY_LINKALT);
            }
        }
    }

    if data.change == ChangeTracking::Insert {
        s.apply(&STY_CHNG_INS);
    }
    if data.change == ChangeTracking::Delete {
        s.apply(&STY_CHNG_DEL);
    }
}

/// Accumulate style from the root of the tree down to `n`.
fn accumulate_style(n: &AstNode, s: &mut Style) {
    if let Some(parent) = n.parent() {
        accumulate_style(parent, s);
    }
    node_style(s, n);
}

/// Whether `n` or any of its ancestors requires resetting the output line
/// mode.
fn node_resets_style<'a>(n: &'a AstNode<'a>) -> bool {
    n.ancestors().any(|nn| {
        let mut s = Style::NONE;
        node_style(&mut s, nn);
        !s.is_empty()
    })
}

/// Emit `s` as an ANSI escape; nothing if the style is empty.
fn write_style(out: &mut Buffer, s: &Style) -> fmt::Result {
    if s.is_empty() {
        return Ok(());
    }

    out.write_str("\x1b[")?;
    let mut has = false;
    if s.bold {
        out.write_str("1")?;
        has = true;
    }
    if s.under {
        if has {
            out.write_str(";")?;
        }
        out.write_str("4")?;
        has = true;
    }
    if s.italic {
        if has {
            out.write_str(";")?;
        }
        out.write_str("3")?;
        has = true;
    }
    if s.strike {
        if has {
            out.write_str(";")?;
        }
        out.write_str("9")?;
        has = true;
    }
    if s.bg != 0 {
        if has {
            out.write_str(";")?;
        }
        write!(out, "{}", s.bg)?;
        has = true;
    }
    if s.fg != 0 {
        if has {
            out.write_str(";")?;
        }
        write!(out, "{}", s.fg)?;
    }
    out.write_str("m")
}

/// Copy `s` into `ob` without control characters, returning the printed
/// display columns.
fn put_escaped(ob: &mut Buffer, s: &str) -> Result<usize, fmt::Error> {
    let mut cols = 0;
    for ch in s.chars() {
        if ch.is_ascii_control() {
            continue;
        }
        ob.write_char(ch)?;
        cols += char_width(ch);
    }
    Ok(cols)
}

struct StackEntry<'a> {
    node: &'a AstNode<'a>,
    /// Lines of this block already prefixed.
    lines: usize,
}

struct TermRenderer<'a, 'o> {
    options: &'o TermOptions,
    /// Soft wrap column.
    maxcol: usize,
    /// Output column, from zero.
    col: usize,
    /// Blank lines already emitted; `None` suppresses vertical space at
    /// the start of the document.
    last_blank: Option<usize>,
    /// The descent path, for per-block prefix bookkeeping.
    stack: SmallVec<[StackEntry<'a>; 16]>,
}

impl<'a, 'o> TermRenderer<'a, 'o> {
    fn new(options: &'o TermOptions) -> Self {
        TermRenderer {
            options,
            // 80 columns by default.
            maxcol: if options.cols == 0 { 80 } else { options.cols },
            col: 0,
            last_blank: Some(0),
            stack: SmallVec::new(),
        }
    }

    /// Bookkeep that `len` display columns went onto the current line.
    fn advance(&mut self, len: usize) {
        self.col += len;
        if self.col > 0 && self.last_blank != Some(0) {
            self.last_blank = Some(0);
        }
    }

    /// Find the current node's prefix entry and count one more line.
    fn bump_stack_lines(&mut self, n: &'a AstNode<'a>) -> usize {
        for entry in self.stack.iter_mut() {
            if std::ptr::eq(entry.node, n) {
                let emitted = entry.lines;
                entry.lines += 1;
                return emitted;
            }
        }
        0
    }

    /// Ensure at least `sz` blank lines have been emitted.
    fn vspace(&mut self, ob: &mut Buffer, sz: usize) -> fmt::Result {
        if let Some(blanks) = self.last_blank.as_mut() {
            while *blanks < sz {
                ob.write_char('\n')?;
                *blanks += 1;
            }
            self.col = 0;
        }
        Ok(())
    }

    /// Unset the current style context, if `n`'s chain or `osty` set one.
    fn endwords(
        &self,
        ob: &mut Buffer,
        n: &'a AstNode<'a>,
        osty: Option<&Style>,
    ) -> fmt::Result {
        if node_resets_style(n) || osty.map_or(false, |s| !s.is_empty()) {
            ob.write_str("\x1b[0m")?;
        }
        Ok(())
    }

    /// Like `endwords`, also terminating the line itself.
    fn endline(&mut self, ob: &mut Buffer, n: &'a AstNode<'a>, osty: Option<&Style>) -> fmt::Result {
        self.endwords(ob, n, osty)?;
        self.col = 0;
        self.last_blank = Some(1);
        ob.write_char('\n')
    }

    /// Emit the prefixes of `n`'s ancestor chain, root first, accumulating
    /// the block style into `s` as we descend.
    fn startline_prefixes(
        &mut self,
        s: &mut Style,
        n: &'a AstNode<'a>,
        ob: &mut Buffer,
    ) -> fmt::Result {
        if let Some(parent) = n.parent() {
            self.startline_prefixes(s, parent, ob)?;
        }

        node_style(s, n);

        // A temporary style mask applying only to this node's prefix;
        // `s` itself propagates to the rest of the line.
        let mut sinner = *s;
        let emitted = self.bump_stack_lines(n);
        let mut pstyle = false;

        match n.data.borrow().value {
            NodeValue::Table(..) | NodeValue::Paragraph => {
                // Collapse the leading indent inside margin-bearing
                // blocks.
                let contained = n.ancestors().skip(1).any(|np| {
                    node_matches!(
                        np,
                        NodeValue::Item(..)
                            | NodeValue::BlockQuote
                            | NodeValue::FootnoteDefinition(..)
                    )
                });
                if !contained {
                    ob.write_str("    ")?;
                    self.advance(4);
                }
            }
            NodeValue::CodeBlock(..) => {
                write_style(ob, &sinner)?;
                pstyle = true;
                ob.write_str("      ")?;
                self.advance(6);
            }
            NodeValue::Document => {
                write_style(ob, &sinner)?;
                pstyle = true;
                for _ in 0..self.options.hmargin {
                    ob.write_char(' ')?;
                }
            }
            NodeValue::BlockQuote => {
                sinner.apply(&STY_BKQT_PFX);
                write_style(ob, &sinner)?;
                pstyle = true;
                ob.write_str("  | ")?;
                self.advance(4);
            }
            NodeValue::DefinitionData => {
                sinner.apply(&STY_DDATA_PFX);
                write_style(ob, &sinner)?;
                pstyle = true;
                ob.write_str(if emitted == 0 { "  : " } else { "    " })?;
                self.advance(4);
            }
            NodeValue::FootnoteDefinition(ref nfd) => {
                sinner.apply(&STY_FDEF_PFX);
                write_style(ob, &sinner)?;
                pstyle = true;
                if emitted == 0 {
                    write!(ob, "{:2}. ", nfd.num)?;
                } else {
                    ob.write_str("    ")?;
                }
                self.advance(4);
            }
            NodeValue::Heading(ref nh) => {
                // The banner style of top-level headings needs no prefix.
                if nh.level > 1 {
                    write_style(ob, &sinner)?;
                    pstyle = true;
                    for _ in 0..nh.level {
                        ob.write_char('#')?;
                    }
                    ob.write_char(' ')?;
                    self.advance(nh.level as usize + 1);
                }
            }
            NodeValue::Item(ref ni) => {
                let in_definition = n
                    .parent()
                    .map_or(true, |p| node_matches!(p, NodeValue::DefinitionData));
                if !in_definition {
                    sinner.apply(if ni.ordered { &STY_OLI_PFX } else { &STY_ULI_PFX });
                    write_style(ob, &sinner)?;
                    pstyle = true;
                    if !ni.ordered {
                        ob.write_str(if emitted == 0 { "  - " } else { "    " })?;
                    } else if emitted == 0 {
                        write!(ob, "{:2}. ", ni.num)?;
                    } else {
                        ob.write_str("    ")?;
                    }
                    self.advance(4);
                }
            }
            _ => (),
        }

        if pstyle && !sinner.is_empty() {
            ob.write_str("\x1b[0m")?;
        }

        Ok(())
    }

    /// Start a line: emit all block prefixes, then the style of `n` plus
    /// the optional terminal style `osty`.
    fn startline(&mut self, ob: &mut Buffer, n: &'a AstNode<'a>, osty: Option<&Style>) -> fmt::Result {
        let mut s = Style::NONE;
        self.startline_prefixes(&mut s, n, ob)?;
        if let Some(osty) = osty {
            s.apply(osty);
        }
        write_style(ob, &s)
    }

    /// Emit the accumulated style at the start of one or more words within
    /// a line.
    fn startwords(&self, ob: &mut Buffer, n: &'a AstNode<'a>, osty: Option<&Style>) -> fmt::Result {
        let mut s = Style::NONE;
        accumulate_style(n, &mut s);
        if let Some(osty) = osty {
            s.apply(osty);
        }
        write_style(ob, &s)
    }

    /// Emit verbatim content: one prefixed line per input line, no
    /// wrapping.
    fn rndr_buf_literal(
        &mut self,
        ob: &mut Buffer,
        n: &'a AstNode<'a>,
        input: &str,
        osty: Option<&Style>,
    ) -> fmt::Result {
        let bytes = input.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            let start = i;
            while i < bytes.len() && bytes[i] != b'\n' {
                i += 1;
            }
            let line = &input[start..i];
            i += 1;

            self.startline(ob, n, osty)?;
            let cols = put_escaped(ob, line)?;
            self.advance(cols);
            self.endline(ob, n, osty)?;
        }
        Ok(())
    }

    /// Emit text into the current line, wrapping between words at the
    /// column limit.  `n` and its ancestry determine prefixes and style.
    fn rndr_buf(
        &mut self,
        ob: &mut Buffer,
        n: &'a AstNode<'a>,
        input: &str,
        osty: Option<&Style>,
    ) -> fmt::Result {
        for nn in n.ancestors() {
            if node_matches!(nn, NodeValue::CodeBlock(..) | NodeValue::HtmlBlock(..)) {
                return self.rndr_buf_literal(ob, n, input, osty);
            }
        }

        let bytes = input.as_bytes();
        let mut i = 0;
        let mut begin = true;
        let mut end = false;

        while i < bytes.len() {
            // Each word starts with its leading space, if any.
            let needspace = isspace(bytes[i]);
            while i < bytes.len() && isspace(bytes[i]) {
                i += 1;
            }
            let start = i;
            while i < bytes.len() && !isspace(bytes[i]) {
                i += 1;
            }
            let word = &input[start..i];
            let wlen = display_width(word);

            // Break the line when the word (and its separating space)
            // would cross the limit; without a preceding space, adjacent
            // text must not be torn apart.
            let after_space = needspace
                || ob
                    .as_str()
                    .as_bytes()
                    .last()
                    .map_or(false, |&b| isspace(b));
            if after_space && !word.is_empty() && self.col > 0 && self.col + wlen >= self.maxcol {
                self.endline(ob, n, osty)?;
                end = false;
            }

            if self.last_blank != Some(0) {
                if !word.is_empty() {
                    self.startline(ob, n, osty)?;
                    begin = false;
                    end = true;
                }
            } else {
                if begin && !word.is_empty() {
                    self.startwords(ob, n, osty)?;
                    begin = false;
                    end = true;
                }
                if needspace {
                    ob.write_char(' ')?;
                    self.advance(1);
                }
            }

            let cols = put_escaped(ob, word)?;
            self.advance(cols);
        }

        if end {
            self.endwords(ob, n, osty)?;
        }
        Ok(())
    }

    fn rndr_table(
        &mut self,
        ob: &mut Buffer,
        mq: &mut MetadataQueue,
        n: &'a AstNode<'a>,
        columns: usize,
    ) -> fmt::Result {
        let mut widths = vec![0usize; columns];

        // First pass: take the per-column maximum of the printable widths.
        // Cells render simulating mid-line state with an unbounded column
        // limit, so nothing wraps and the final column is the width.
        for top in n.children() {
            for row in top.children() {
                for cell in row.children() {
                    let info = cell_info(cell);
                    if info.col >= columns {
                        continue;
                    }
                    let mut celltmp = Buffer::with_capacity(128);
                    let measured = self.rndr_cell(&mut celltmp, mq, cell)?;
                    if widths[info.col] < measured {
                        widths[info.col] = measured;
                    }
                }
            }
        }

        // Second pass: print row by row.
        for top in n.children() {
            for row in top.children() {
                let mut rowtmp = Buffer::with_capacity(128);
                let mut cells = row.children().peekable();
                while let Some(cell) = cells.next() {
                    let info = cell_info(cell);
                    if info.col >= columns {
                        continue;
                    }
                    let mut celltmp = Buffer::with_capacity(128);
                    let measured = self.rndr_cell(&mut celltmp, mq, cell)?;
                    let pad = widths[info.col].saturating_sub(measured);
                    pad_cell(&mut rowtmp, &celltmp, info.alignment, pad)?;

                    if cells.peek().is_some() {
                        rowtmp.write_str(" | ")?;
                    }
                }

                // The cells were escaped as they rendered and carry their
                // own style escapes; print the row directly.
                self.startline(ob, n, None)?;
                ob.write_str(rowtmp.as_str())?;
                self.advance(1);
                self.endline(ob, n, None)?;
                self.vspace(ob, 1)?;
            }

            if node_matches!(top, NodeValue::TableHead) {
                self.startline(ob, n, None)?;
                for (i, w) in widths.iter().enumerate() {
                    for _ in 0..=*w {
                        ob.write_char('-')?;
                    }
                    if i + 1 < columns {
                        ob.write_char('|')?;
                    }
                }
                self.advance(1);
                self.endline(ob, n, None)?;
                self.vspace(ob, 1)?;
            }
        }

        Ok(())
    }

    /// Render one table cell into `out` and return its display width.
    fn rndr_cell(
        &mut self,
        out: &mut Buffer,
        mq: &mut MetadataQueue,
        cell: &'a AstNode<'a>,
    ) -> Result<usize, fmt::Error> {
        let saved_maxcol = self.maxcol;
        let saved_blank = self.last_blank;
        let saved_col = self.col;

        self.last_blank = Some(0);
        self.maxcol = usize::MAX;
        self.col = 1;
        self.rndr(out, mq, cell)?;
        let measured = self.col - 1;

        self.maxcol = saved_maxcol;
        self.last_blank = saved_blank;
        self.col = saved_col;
        Ok(measured)
    }

    fn rndr(&mut self, ob: &mut Buffer, mq: &mut MetadataQueue, n: &'a AstNode<'a>) -> fmt::Result {
        self.stack.push(StackEntry { node: n, lines: 0 });
        let result = self.rndr_inner(ob, mq, n);
        self.stack.pop();
        result
    }

    fn rndr_inner(
        &mut self,
        ob: &mut Buffer,
        mq: &mut MetadataQueue,
        n: &'a AstNode<'a>,
    ) -> fmt::Result {
        let prev = n.previous_sibling();
        let change = n.data.borrow().change;

        // Vertical space before content.
        match n.data.borrow().value {
            NodeValue::Document => {
                for _ in 0..self.options.vmargin {
                    ob.write_char('\n')?;
                }
                self.last_blank = None;
            }
            NodeValue::CodeBlock(..)
            | NodeValue::HtmlBlock(..)
            | NodeValue::BlockQuote
            | NodeValue::Definition(..)
            | NodeValue::FootnotesBlock
            | NodeValue::FootnoteDefinition(..)
            | NodeValue::Heading(..)
            | NodeValue::List(..)
            | NodeValue::Table(..)
            | NodeValue::Paragraph => {
                // Only one newline between a definition title and its
                // data, whatever the data's contents.
                if first_block_in_definition_data(n, prev) {
                    self.vspace(ob, 1)?;
                } else {
                    self.vspace(ob, 2)?;
                }
            }
            NodeValue::Math(ref nm) => {
                if nm.display_math {
                    self.vspace(ob, 1)?;
                }
            }
            NodeValue::DefinitionData => {
                if block_data_follows_data(n, prev) {
                    self.vspace(ob, 2)?;
                } else {
                    self.vspace(ob, 1)?;
                }
            }
            NodeValue::DefinitionTitle
            | NodeValue::ThematicBreak
            | NodeValue::LineBreak
            | NodeValue::Item(..)
            | NodeValue::Meta(..) => {
                self.vspace(ob, 1)?;
            }
            _ => (),
        }

        // Leading content.
        match n.data.borrow().value {
            NodeValue::FootnotesBlock => {
                self.rndr_buf(ob, n, "~~~~~~~~", Some(&STY_FOOTS_DIV))?;
            }
            NodeValue::Superscript => {
                self.rndr_buf(ob, n, "^", None)?;
            }
            NodeValue::Meta(ref nm) => {
                let key = nm.key.clone();
                self.rndr_buf(ob, n, &key, Some(&STY_META_KEY))?;
                self.rndr_buf(ob, n, ": ", Some(&STY_META_KEY))?;

                if change != ChangeTracking::Delete {
                    // Render the children again into a scratch buffer with
                    // document-start state; that is the queued value.
                    let saved_blank = self.last_blank;
                    let saved_col = self.col;
                    self.last_blank = None;
                    self.col = 0;

                    let mut metatmp = Buffer::with_capacity(128);
                    for child in n.children() {
                        self.rndr(&mut metatmp, mq, child)?;
                    }
                    mq.push(key, metatmp.into_string());

                    self.last_blank = saved_blank;
                    self.col = saved_col;
                }
            }
            _ => (),
        }

        // Descend into children.
        if node_matches!(n, NodeValue::Table(..)) {
            let columns = match n.data.borrow().value {
                NodeValue::Table(nt) => nt.columns,
                _ => 0,
            };
            self.rndr_table(ob, mq, n, columns)?;
        } else {
            for child in n.children() {
                self.rndr(ob, mq, child)?;
            }
        }

        // Output content.
        match n.data.borrow().value {
            NodeValue::ThematicBreak => {
                self.rndr_buf(ob, n, "~~~~~~~~", None)?;
            }
            NodeValue::FootnoteReference(ref nfr) => {
                let tmp = format!("[{}]", nfr.num);
                self.rndr_buf(ob, n, &tmp, None)?;
            }
            NodeValue::HtmlInline(ref text) => {
                self.rndr_buf(ob, n, text, None)?;
            }
            NodeValue::Math(ref nm) => {
                self.rndr_buf(ob, n, &nm.literal, None)?;
            }
            NodeValue::Entity(ref text) => {
                let cp = entity::find_iso(text);
                if cp > 0 {
                    let mut tmp = Buffer::new();
                    entity::write_utf8(&mut tmp, cp)?;
                    self.rndr_buf(ob, n, tmp.as_str(), None)?;
                } else {
                    self.rndr_buf(ob, n, text, Some(&STY_BAD_ENT))?;
                }
            }
            NodeValue::CodeBlock(ref ncb) => {
                self.rndr_buf(ob, n, &ncb.literal, None)?;
            }
            NodeValue::HtmlBlock(ref text) => {
                self.rndr_buf(ob, n, text, None)?;
            }
            NodeValue::Code(ref text) => {
                self.rndr_buf(ob, n, text, None)?;
            }
            NodeValue::Autolink(ref na) => {
                if self.options.shortlink {
                    let mut tmp = Buffer::new();
                    tmp.put_shortlink(&na.url)?;
                    self.rndr_buf(ob, n, tmp.as_str(), None)?;
                } else {
                    self.rndr_buf(ob, n, &na.url, None)?;
                }
            }
            NodeValue::Link(ref nl) => {
                if !self.options.nolink {
                    self.rndr_buf(ob, n, " ", None)?;
                    if self.options.shortlink {
                        let mut tmp = Buffer::new();
                        tmp.put_shortlink(&nl.url)?;
                        self.rndr_buf(ob, n, tmp.as_str(), None)?;
                    } else {
                        self.rndr_buf(ob, n, &nl.url, None)?;
                    }
                }
            }
            NodeValue::Image(ref ni) => {
                self.rndr_buf(ob, n, &ni.alt, None)?;
                if !ni.alt.is_empty() {
                    self.rndr_buf(ob, n, " ", None)?;
                }
                if self.options.nolink {
                    self.rndr_buf(ob, n, "[Image]", Some(&STY_IMGURLBOX))?;
                } else {
                    self.rndr_buf(ob, n, "[Image: ", Some(&STY_IMGURLBOX))?;
                    if self.options.shortlink {
                        let mut tmp = Buffer::new();
                        tmp.put_shortlink(&ni.url)?;
                        self.rndr_buf(ob, n, tmp.as_str(), Some(&STY_IMGURL))?;
                    } else {
                        self.rndr_buf(ob, n, &ni.url, Some(&STY_IMGURL))?;
                    }
                    self.rndr_buf(ob, n, "]", Some(&STY_IMGURLBOX))?;
                }
            }
            NodeValue::Text(ref text) => {
                self.rndr_buf(ob, n, text, None)?;
            }
            _ => (),
        }

        // Trailing block spaces.
        match n.data.borrow().value {
            NodeValue::CodeBlock(..)
            | NodeValue::HtmlBlock(..)
            | NodeValue::BlockQuote
            | NodeValue::Definition(..)
            | NodeValue::FootnotesBlock
            | NodeValue::FootnoteDefinition(..)
            | NodeValue::Heading(..)
            | NodeValue::List(..)
            | NodeValue::Paragraph
            | NodeValue::Table(..) => {
                self.vspace(ob, 2)?;
            }
            NodeValue::Math(ref nm) => {
                if nm.display_math {
                    self.vspace(ob, 1)?;
                }
            }
            NodeValue::DocHeader => {
                if n.first_child().is_some() {
                    self.vspace(ob, 2)?;
                }
            }
            NodeValue::DefinitionData
            | NodeValue::DefinitionTitle
            | NodeValue::ThematicBreak
            | NodeValue::Item(..)
            | NodeValue::Meta(..) => {
                self.vspace(ob, 1)?;
            }
            NodeValue::Document => {
                // Snip trailing newlines printed as vertical space, then
                // end with exactly one plus the margin.
                self.vspace(ob, 1)?;
                ob.trim_trailing_newlines();
                ob.write_char('\n')?;
                for _ in 0..self.options.vmargin {
                    ob.write_char('\n')?;
                }
            }
            _ => (),
        }

        Ok(())
    }
}

fn first_block_in_definition_data<'a>(n: &'a AstNode<'a>, prev: Option<&'a AstNode<'a>>) -> bool {
    prev.is_none()
        && n.parent().map_or(false, |p| {
            node_matches!(p, NodeValue::Item(..))
                && p.parent()
                    .map_or(false, |gp| node_matches!(gp, NodeValue::DefinitionData))
        })
}

fn block_data_follows_data<'a>(n: &'a AstNode<'a>, prev: Option<&'a AstNode<'a>>) -> bool {
    n.parent().map_or(false, |p| match p.data.borrow().value {
        NodeValue::Definition(nd) => nd.block,
        _ => false,
    }) && prev.map_or(false, |p| node_matches!(p, NodeValue::DefinitionData))
}

fn cell_info<'a>(cell: &'a AstNode<'a>) -> NodeTableCell {
    match cell.data.borrow().value {
        NodeValue::TableCell(ntc) => ntc,
        _ => NodeTableCell::default(),
    }
}

fn pad_cell(
    rowtmp: &mut Buffer,
    cell: &Buffer,
    alignment: TableAlignment,
    pad: usize,
) -> fmt::Result {
    // Right alignment pads before, left after; centring splits the
    // remainder, the odd column going after.
    let before = match alignment {
        TableAlignment::Right => pad,
        TableAlignment::Center => pad / 2,
        _ => 0,
    };
    for _ in 0..before {
        rowtmp.write_char(' ')?;
    }
    rowtmp.write_str(cell.as_str())?;
    let after = match alignment {
        TableAlignment::None | TableAlignment::Left => pad,
        TableAlignment::Center => pad - pad / 2,
        TableAlignment::Right => 0,
    };
    for _ in 0..after {
        rowtmp.write_char(' ')?;
    }
    Ok(())
}
