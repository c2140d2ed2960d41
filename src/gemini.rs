//! Gemini (gemtext) rendering for the document AST.
//!
//! Gemtext forbids inline links, so every link becomes its own `=> URL`
//! line.  Links referenced mid-text are queued and flushed after the
//! enclosing block (the default), at end of document, or emitted next to
//! their text, per [`GeminiOptions`].

use std::collections::VecDeque;
use std::fmt::{self, Write};

use crate::buffer::Buffer;
use crate::entity;
use crate::metadata::MetadataQueue;
use crate::node_matches;
use crate::nodes::{AstNode, ChangeTracking, NodeTableCell, NodeValue, TableAlignment};
use crate::options::GeminiOptions;
use crate::width::display_width;

/// Formats an AST as gemtext, modified by the given options.  An ephemeral
/// metadata queue is used internally.
pub fn format_document<'a>(
    root: &'a AstNode<'a>,
    options: &GeminiOptions,
    output: &mut Buffer,
) -> fmt::Result {
    let mut metadata = MetadataQueue::new();
    format_document_with_metadata(root, options, output, &mut metadata)
}

/// Formats an AST as gemtext, collecting metadata entries into `metadata`
/// as they are encountered.
pub fn format_document_with_metadata<'a>(
    root: &'a AstNode<'a>,
    options: &GeminiOptions,
    output: &mut Buffer,
    metadata: &mut MetadataQueue,
) -> fmt::Result {
    let mut f = GeminiRenderer::new(options);
    f.rndr(output, metadata, root)
}

/// A link queued for deferred display.
struct QueuedLink<'a> {
    node: &'a AstNode<'a>,
    id: usize,
}

struct GeminiRenderer<'a, 'o> {
    options: &'o GeminiOptions,
    /// Inline-link mode after conflict resolution; cleared for the
    /// duration of a table.
    link_inline: bool,
    /// Blank lines already emitted; `None` suppresses vertical space at
    /// the start of the document and right after line prefixes.
    last_blank: Option<usize>,
    linkq: VecDeque<QueuedLink<'a>>,
    linkq_count: usize,
}

impl<'a, 'o> GeminiRenderer<'a, 'o> {
    fn new(options: &'o GeminiOptions) -> Self {
        GeminiRenderer {
            options,
            // Only one kind of flagged output.
            link_inline: options.link_inline && !options.link_at_end,
            last_blank: Some(0),
            linkq: VecDeque::new(),
            linkq_count: 0,
        }
    }

    /// Ensure at least `sz` blank lines have been emitted.
    fn vspace(&mut self, ob: &mut Buffer, sz: usize) -> fmt::Result {
        if let Some(ref mut blanks) = self.last_blank {
            while *blanks < sz {
                ob.write_char('\n')?;
                *blanks += 1;
            }
        }
        Ok(())
    }

    /// Emit text into the current line.  Inside verbatim blocks the bytes
    /// pass through untouched; otherwise leading whitespace is suppressed
    /// at line starts and the text is escaped.
    fn rndr_buf(&mut self, ob: &mut Buffer, n: &'a AstNode<'a>, input: &str) -> fmt::Result {
        for nn in n.ancestors() {
            if node_matches!(nn, NodeValue::CodeBlock(..) | NodeValue::HtmlBlock(..)) {
                self.last_blank = Some(1);
                return ob.write_str(input);
            }
        }

        // If we last printed some space, suppress leading blanks.  This is
        // only likely to happen around links.
        let mut s = input;
        if self.last_blank != Some(0) {
            s = s.trim_start_matches(|c: char| c.is_ascii_whitespace());
        }

        gemini_escape(ob, s)?;
        if !input.is_empty() && self.last_blank != Some(0) {
            self.last_blank = Some(0);
        }
        Ok(())
    }

    fn rndr_link_ref(&self, out: &mut Buffer, id: usize, nl: bool) -> fmt::Result {
        if self.options.link_noref {
            if nl {
                out.write_char('\n')?;
            }
            return Ok(());
        }

        let label = link_ordinal(id, self.options.link_roman);
        write!(
            out,
            "{}[{}]{}",
            if nl { " " } else { "" },
            label,
            if nl { "\n" } else { "" }
        )
    }

    fn flush_linkq(&mut self, ob: &mut Buffer) -> fmt::Result {
        while let Some(l) = self.linkq.pop_front() {
            ob.write_str("=> ")?;
            match l.node.data.borrow().value {
                NodeValue::Link(ref nl) => ob.write_str(&nl.url)?,
                NodeValue::Autolink(ref na) => ob.write_str(&na.url)?,
                NodeValue::Image(ref ni) => ob.write_str(&ni.url)?,
                _ => (),
            }
            self.rndr_link_ref(ob, l.id, true)?;
            self.last_blank = Some(1);
        }
        Ok(())
    }

    /// Whether this link/image/autolink gets its own `=> ` line next to
    /// its text instead of a deferred reference.
    fn emits_link_line(&self, n: &'a AstNode<'a>, prev: Option<&'a AstNode<'a>>) -> bool {
        (is_standalone_link(n, prev) && !self.options.link_at_end) || self.link_inline
    }

    /// Queue a deferred reference for `n` and emit its back-reference
    /// token inline.
    fn queue_link_ref(
        &mut self,
        ob: &mut Buffer,
        n: &'a AstNode<'a>,
        prev: Option<&'a AstNode<'a>>,
    ) -> fmt::Result {
        if self.emits_link_line(n, prev) {
            return Ok(());
        }

        self.linkq_count += 1;
        let id = self.linkq_count;
        self.linkq.push_back(QueuedLink { node: n, id });

        let mut tmp = Buffer::new();
        self.rndr_link_ref(&mut tmp, id, false)?;
        self.rndr_buf(ob, n, tmp.as_str())
    }

    /// Render the children of a meta node with document-start state and
    /// store the result in the queue.
    fn rndr_meta(
        &mut self,
        mq: &mut MetadataQueue,
        n: &'a AstNode<'a>,
        key: String,
    ) -> fmt::Result {
        let saved_blank = self.last_blank;
        self.last_blank = None;

        let mut tmp = Buffer::with_capacity(128);
        for child in n.children() {
            self.rndr(&mut tmp, mq, child)?;
        }
        mq.push(key, tmp.into_string());

        self.last_blank = saved_blank;
        Ok(())
    }

    fn rndr_doc_header(&mut self, ob: &mut Buffer, mq: &MetadataQueue) -> fmt::Result {
        if !self.options.metadata {
            return Ok(());
        }
        for m in mq {
            gemini_escape(ob, &m.key)?;
            ob.write_str(": ")?;
            gemini_escape(ob, &m.value)?;
            self.last_blank = Some(0);
            self.vspace(ob, 1)?;
        }
        Ok(())
    }

    fn rndr_table(&mut self, ob: &mut Buffer, n: &'a AstNode<'a>, columns: usize) -> fmt::Result {
        // Tables and inline links don't work well together; queue
        // references for the duration instead.
        let saved_inline = self.link_inline;
        self.link_inline = false;

        let mut widths = vec![0usize; columns];
        let mut scratch_mq = MetadataQueue::new();

        // First pass: take the per-column maximum of the printable widths.
        // References queued while measuring are discarded afterwards; the
        // real render below queues them again.
        let queued_len = self.linkq.len();
        let queued_count = self.linkq_count;
        for top in n.children() {
            for row in top.children() {
                for cell in row.children() {
                    let info = cell_info(cell);
                    if info.col >= columns {
                        continue;
                    }
                    let mut celltmp = Buffer::with_capacity(128);
                    let saved_blank = self.last_blank;
                    self.last_blank = Some(0);
                    self.rndr(&mut celltmp, &mut scratch_mq, cell)?;
                    self.last_blank = saved_blank;

                    let w = display_width(celltmp.as_str());
                    if widths[info.col] < w {
                        widths[info.col] = w;
                    }
                }
            }
        }
        self.linkq.truncate(queued_len);
        self.linkq_count = queued_count;

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
                    let saved_blank = self.last_blank;
                    self.last_blank = Some(0);
                    self.rndr(&mut celltmp, &mut scratch_mq, cell)?;
                    self.last_blank = saved_blank;

                    let w = display_width(celltmp.as_str());
                    let pad = widths[info.col].saturating_sub(w);
                    pad_cell(&mut rowtmp, &celltmp, info.alignment, pad)?;

                    if cells.peek().is_some() {
                        rowtmp.write_str(" | ")?;
                    }
                }

                // Cell contents were escaped as they rendered, so the row
                // copies straight out.
                ob.write_str(rowtmp.as_str())?;
                self.last_blank = Some(0);
                self.vspace(ob, 1)?;
            }

            if node_matches!(top, NodeValue::TableHead) {
                for (i, w) in widths.iter().enumerate() {
                    for _ in 0..=*w {
                        ob.write_char('-')?;
                    }
                    if i + 1 < columns {
                        ob.write_char('|')?;
                    }
                }
                self.last_blank = Some(0);
                self.vspace(ob, 1)?;
            }
        }

        self.link_inline = saved_inline;
        Ok(())
    }

    fn rndr(&mut self, ob: &mut Buffer, mq: &mut MetadataQueue, n: &'a AstNode<'a>) -> fmt::Result {
        let prev = n.previous_sibling();

        // Vertical space before content.
        match n.data.borrow().value {
            NodeValue::Document => {
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
            | NodeValue::Paragraph
            | NodeValue::Table(..) => {
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
            NodeValue::Image(..) | NodeValue::Link(..) | NodeValue::Autolink(..) => {
                if self.link_inline {
                    self.vspace(ob, 1)?;
                }
            }
            _ => (),
        }

        // Leading content.
        match n.data.borrow().value {
            NodeValue::Table(..) | NodeValue::CodeBlock(..) | NodeValue::HtmlBlock(..) => {
                ob.write_str("```")?;
                self.last_blank = Some(0);
                self.vspace(ob, 1)?;
            }
            NodeValue::BlockQuote => {
                self.rndr_buf(ob, n, "> ")?;
                self.last_blank = None;
            }
            NodeValue::Heading(ref nh) => {
                let mut tmp = "#".repeat(nh.level.max(1) as usize);
                tmp.push(' ');
                self.rndr_buf(ob, n, &tmp)?;
                self.last_blank = None;
            }
            NodeValue::FootnotesBlock => {
                self.rndr_buf(ob, n, "~~~~~~~~")?;
            }
            NodeValue::FootnoteDefinition(ref nfd) => {
                let tmp = format!("[{}] ", nfd.num);
                self.rndr_buf(ob, n, &tmp)?;
                self.last_blank = None;
            }
            NodeValue::Image(..) | NodeValue::Link(..) | NodeValue::Autolink(..) => {
                if self.emits_link_line(n, prev) {
                    let tmp = format!("=> {} ", link_url(n));
                    self.rndr_buf(ob, n, &tmp)?;
                    self.last_blank = None;
                }
            }
            NodeValue::Item(ref ni) => {
                let tmp = if ni.ordered {
                    format!("{}. ", ni.num)
                } else {
                    "* ".to_string()
                };
                self.rndr_buf(ob, n, &tmp)?;
                self.last_blank = None;
            }
            NodeValue::Superscript => {
                self.rndr_buf(ob, n, "^")?;
            }
            _ => (),
        }

        // Descend into children.
        if node_matches!(n, NodeValue::Table(..)) {
            let columns = match n.data.borrow().value {
                NodeValue::Table(nt) => nt.columns,
                _ => 0,
            };
            self.rndr_table(ob, n, columns)?;
        } else if node_matches!(n, NodeValue::Meta(..)) {
            if n.data.borrow().change != ChangeTracking::Delete {
                let key = match n.data.borrow().value {
                    NodeValue::Meta(ref nm) => nm.key.clone(),
                    _ => unreachable!(),
                };
                self.rndr_meta(mq, n, key)?;
            }
        } else {
            for child in n.children() {
                self.rndr(ob, mq, child)?;
            }
        }

        // Non-child or trailing content.
        match n.data.borrow().value {
            NodeValue::ThematicBreak => {
                self.rndr_buf(ob, n, "~~~~~~~~")?;
            }
            NodeValue::FootnoteReference(ref nfr) => {
                let tmp = format!("[{}]", nfr.num);
                self.rndr_buf(ob, n, &tmp)?;
            }
            NodeValue::HtmlInline(ref text) => {
                self.rndr_buf(ob, n, text)?;
            }
            NodeValue::Math(ref nm) => {
                self.rndr_buf(ob, n, &nm.literal)?;
            }
            NodeValue::Entity(ref text) => {
                let cp = entity::find_iso(text);
                if cp > 0 {
                    let mut tmp = Buffer::new();
                    entity::write_utf8(&mut tmp, cp)?;
                    self.rndr_buf(ob, n, tmp.as_str())?;
                } else {
                    self.rndr_buf(ob, n, text)?;
                }
            }
            NodeValue::CodeBlock(ref ncb) => {
                self.rndr_buf(ob, n, &ncb.literal)?;
            }
            NodeValue::HtmlBlock(ref text) => {
                self.rndr_buf(ob, n, text)?;
            }
            NodeValue::Code(ref text) => {
                self.rndr_buf(ob, n, text)?;
            }
            NodeValue::Image(ref ni) => {
                let alt = ni.alt.clone();
                self.rndr_buf(ob, n, &alt)?;
                self.queue_link_ref(ob, n, prev)?;
            }
            NodeValue::Link(..) | NodeValue::Autolink(..) => {
                self.queue_link_ref(ob, n, prev)?;
            }
            NodeValue::Text(ref text) => {
                self.rndr_buf(ob, n, text)?;
            }
            NodeValue::Document => {
                if !self.linkq.is_empty() && self.options.link_at_end {
                    self.vspace(ob, 2)?;
                    self.flush_linkq(ob)?;
                }
            }
            NodeValue::DocHeader => {
                self.rndr_doc_header(ob, mq)?;
            }
            _ => (),
        }

        // Trailing block spaces.
        match n.data.borrow().value {
            NodeValue::Table(..) | NodeValue::CodeBlock(..) | NodeValue::HtmlBlock(..) => {
                if !ob.ends_with('\n') {
                    ob.write_char('\n')?;
                }
                ob.write_str("```")?;
                self.last_blank = Some(0);
                self.vspace(ob, 2)?;
            }
            NodeValue::DocHeader => {
                if self.options.standalone {
                    self.vspace(ob, 2)?;
                }
            }
            NodeValue::BlockQuote
            | NodeValue::Definition(..)
            | NodeValue::FootnotesBlock
            | NodeValue::FootnoteDefinition(..)
            | NodeValue::Heading(..)
            | NodeValue::List(..)
            | NodeValue::Paragraph => {
                self.vspace(ob, 2)?;
            }
            NodeValue::Math(ref nm) => {
                if nm.display_math {
                    self.vspace(ob, 1)?;
                }
            }
            NodeValue::DefinitionData
            | NodeValue::DefinitionTitle
            | NodeValue::ThematicBreak
            | NodeValue::Item(..)
            | NodeValue::Meta(..) => {
                self.vspace(ob, 1)?;
            }
            NodeValue::Image(..) | NodeValue::Link(..) | NodeValue::Autolink(..) => {
                if self.emits_link_line(n, prev) {
                    self.vspace(ob, 1)?;
                }
            }
            NodeValue::Document => {
                // Snip trailing newlines printed as vertical space, then
                // end with exactly one.
                self.vspace(ob, 1)?;
                ob.trim_trailing_newlines();
                ob.write_char('\n')?;
            }
            _ => (),
        }

        // Flush pending references once a block has finished.
        if matches!(self.last_blank, Some(blanks) if blanks > 1)
            && !self.linkq.is_empty()
            && !self.options.link_at_end
        {
            self.flush_linkq(ob)?;
            ob.write_char('\n')?;
            self.last_blank = Some(2);
        }

        Ok(())
    }
}

/// A standalone link is one that lives alone in a top-level paragraph.
fn is_standalone_link<'a>(n: &'a AstNode<'a>, prev: Option<&'a AstNode<'a>>) -> bool {
    prev.is_none()
        && n.next_sibling().is_none()
        && n.parent().map_or(false, |p| {
            node_matches!(p, NodeValue::Paragraph)
                && p.parent()
                    .map_or(false, |gp| node_matches!(gp, NodeValue::Document))
        })
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

fn link_url<'a>(n: &'a AstNode<'a>) -> String {
    match n.data.borrow().value {
        NodeValue::Link(ref nl) => nl.url.clone(),
        NodeValue::Autolink(ref na) => na.url.clone(),
        NodeValue::Image(ref ni) => ni.url.clone(),
        _ => String::new(),
    }
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

/// Convert newlines to spaces and elide control characters.  A newline
/// after a period becomes two spaces.
fn gemini_escape(out: &mut Buffer, s: &str) -> fmt::Result {
    for ch in s.chars() {
        if ch == '\n' {
            if out.ends_with('.') {
                out.write_char(' ')?;
            }
            out.write_char(' ')?;
        } else if !ch.is_ascii_control() {
            out.write_char(ch)?;
        }
    }
    Ok(())
}

/// Format a link ordinal as a lowercase letter sequence (`a`, `b`, …, `z`,
/// `aa`, …) or, with `roman`, greedy-subtractive lowercase Roman numerals.
pub(crate) fn link_ordinal(id: usize, roman: bool) -> String {
    if roman {
        const NUMERALS: [(usize, &str); 13] = [
            (1000, "m"),
            (900, "cm"),
            (500, "d"),
            (400, "cd"),
            (100, "c"),
            (90, "xc"),
            (50, "l"),
            (40, "xl"),
            (10, "x"),
            (9, "ix"),
            (5, "v"),
            (4, "iv"),
            (1, "i"),
        ];

        let mut out = String::new();
        let mut rest = id;
        for &(value, digits) in NUMERALS.iter() {
            while rest >= value {
                out.push_str(digits);
                rest -= value;
            }
        }
        out
    } else {
        let mut out = String::new();
        let mut rest = id;
        while rest > 0 {
            out.push((b'a' + ((rest - 1) % 26) as u8) as char);
            rest = (rest - 1) / 26;
        }
        out.chars().rev().collect()
    }
}
