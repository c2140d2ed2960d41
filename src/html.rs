//! HTML rendering for the document AST.
//!
//! The renderer walks the tree depth first.  Each node's children are
//! rendered into a per-node scratch buffer first, then the node's own
//! markup is emitted around that content into the caller's buffer; change
//! tracking wraps the whole node emission in `<ins>`/`<del>`.

use std::cmp::min;
use std::fmt::{self, Write};

use rustc_hash::FxHashMap;

use crate::buffer::Buffer;
use crate::ctype::isspace;
use crate::entity;
use crate::escape;
use crate::metadata::MetadataQueue;
use crate::nodes::{
    AstNode, AutolinkKind, ChangeTracking, NodeAutolink, NodeCodeBlock, NodeFootnoteDefinition,
    NodeFootnoteReference, NodeHeading, NodeImage, NodeItem, NodeLink, NodeList, NodeMath,
    NodeMeta, NodeTableCell, NodeValue, TableAlignment,
};
use crate::options::HtmlOptions;
use crate::strings;

/// Formats an AST as HTML, modified by the given options.  An ephemeral
/// metadata queue is used internally.
pub fn format_document<'a>(
    root: &'a AstNode<'a>,
    options: &HtmlOptions,
    output: &mut Buffer,
) -> fmt::Result {
    let mut metadata = MetadataQueue::new();
    format_document_with_metadata(root, options, output, &mut metadata)
}

/// Formats an AST as HTML, collecting metadata entries into `metadata` as
/// they are encountered.
pub fn format_document_with_metadata<'a>(
    root: &'a AstNode<'a>,
    options: &HtmlOptions,
    output: &mut Buffer,
    metadata: &mut MetadataQueue,
) -> fmt::Result {
    let mut f = HtmlRenderer::new(options);
    f.rndr(output, metadata, root)
}

struct HtmlRenderer<'o> {
    options: &'o HtmlOptions,
    headers_used: FxHashMap<String, usize>,
    base_header_level: u32,
}

impl<'o> HtmlRenderer<'o> {
    fn new(options: &'o HtmlOptions) -> Self {
        HtmlRenderer {
            options,
            headers_used: FxHashMap::default(),
            base_header_level: 1,
        }
    }

    fn rndr<'a>(
        &mut self,
        ob: &mut Buffer,
        mq: &mut MetadataQueue,
        n: &'a AstNode<'a>,
    ) -> fmt::Result {
        let mut tmp = Buffer::with_capacity(64);
        for child in n.children() {
            self.rndr(&mut tmp, mq, child)?;
        }

        let change = n.data.borrow().change;
        match change {
            ChangeTracking::Insert => ob.write_str("<ins>")?,
            ChangeTracking::Delete => ob.write_str("<del>")?,
            ChangeTracking::None => (),
        }

        match n.data.borrow().value {
            NodeValue::Document => self.rndr_root(ob, &tmp)?,
            NodeValue::CodeBlock(ref ncb) => self.rndr_blockcode(ob, ncb)?,
            NodeValue::HtmlBlock(ref literal) => self.rndr_blockhtml(ob, literal)?,
            NodeValue::BlockQuote => self.rndr_blockquote(ob, &tmp)?,
            NodeValue::Definition(..) => self.rndr_definition(ob, &tmp)?,
            NodeValue::DefinitionTitle => self.rndr_definition_title(ob, &tmp)?,
            NodeValue::DefinitionData => self.rndr_definition_data(ob, &tmp)?,
            NodeValue::Heading(ref nh) => self.rndr_header(ob, &tmp, nh)?,
            NodeValue::ThematicBreak => self.rndr_hrule(ob)?,
            NodeValue::List(ref nl) => self.rndr_list(ob, &tmp, nl)?,
            NodeValue::Item(ref ni) => self.rndr_listitem(ob, &tmp, n, ni)?,
            NodeValue::Paragraph => self.rndr_paragraph(ob, &tmp)?,
            NodeValue::Table(..) => self.rndr_table(ob, &tmp)?,
            NodeValue::TableHead => self.rndr_table_header(ob, &tmp)?,
            NodeValue::TableBody => self.rndr_table_body(ob, &tmp)?,
            NodeValue::TableRow => self.rndr_tablerow(ob, &tmp)?,
            NodeValue::TableCell(ref ntc) => self.rndr_tablecell(ob, &tmp, ntc)?,
            NodeValue::FootnotesBlock => self.rndr_footnotes(ob, &tmp)?,
            NodeValue::FootnoteDefinition(ref nfd) => self.rndr_footnote_def(ob, &tmp, nfd)?,
            NodeValue::FootnoteReference(ref nfr) => self.rndr_footnote_ref(ob, nfr)?,
            NodeValue::Autolink(ref na) => self.rndr_autolink(ob, na)?,
            NodeValue::Code(ref literal) => self.rndr_codespan(ob, literal)?,
            NodeValue::Strong => self.rndr_wrap(ob, &tmp, "<strong>", "</strong>")?,
            NodeValue::TripleEmph => {
                self.rndr_wrap(ob, &tmp, "<strong><em>", "</em></strong>")?
            }
            NodeValue::Emph => self.rndr_wrap(ob, &tmp, "<em>", "</em>")?,
            NodeValue::Highlight => self.rndr_wrap(ob, &tmp, "<mark>", "</mark>")?,
            NodeValue::Image(ref ni) => self.rndr_image(ob, ni)?,
            NodeValue::LineBreak => ob.write_str("<br/>\n")?,
            NodeValue::Link(ref nl) => self.rndr_link(ob, &tmp, nl)?,
            NodeValue::Strikethrough => self.rndr_wrap(ob, &tmp, "<del>", "</del>")?,
            NodeValue::Superscript => self.rndr_wrap(ob, &tmp, "<sup>", "</sup>")?,
            NodeValue::Math(ref nm) => self.rndr_math(ob, nm)?,
            NodeValue::HtmlInline(ref literal) => self.rndr_raw_html(ob, literal)?,
            NodeValue::Entity(ref text) => self.rndr_entity(ob, text)?,
            NodeValue::Text(ref literal) => self.escape_html(ob, literal)?,
            NodeValue::DocHeader => self.rndr_doc_header(ob, &tmp, mq)?,
            NodeValue::Meta(ref nm) => {
                if change != ChangeTracking::Delete {
                    self.rndr_meta(&tmp, mq, nm);
                }
            }
            NodeValue::DocFooter => self.rndr_doc_footer(ob)?,
        }

        match change {
            ChangeTracking::Insert => ob.write_str("</ins>")?,
            ChangeTracking::Delete => ob.write_str("</del>")?,
            ChangeTracking::None => (),
        }

        Ok(())
    }

    fn escape_html(&self, ob: &mut Buffer, s: &str) -> fmt::Result {
        escape::escape_html(
            ob,
            s,
            self.options.owasp,
            false,
            self.options.numeric_entities,
        )
    }

    fn escape_literal(&self, ob: &mut Buffer, s: &str) -> fmt::Result {
        escape::escape_html(ob, s, self.options.owasp, true, self.options.numeric_entities)
    }

    fn rndr_root(&self, ob: &mut Buffer, content: &Buffer) -> fmt::Result {
        if self.options.standalone {
            ob.write_str("<!DOCTYPE html>\n<html>\n")?;
        }
        ob.write_str(content.as_str())?;
        if self.options.standalone {
            ob.write_str("</html>\n")?;
        }
        Ok(())
    }

    fn rndr_blockcode(&self, ob: &mut Buffer, ncb: &NodeCodeBlock) -> fmt::Result {
        ob.cr()?;
        if ncb.lang.is_empty() {
            ob.write_str("<pre><code>")?;
        } else {
            ob.write_str("<pre><code class=\"language-")?;
            escape::escape_href(ob, &ncb.lang)?;
            ob.write_str("\">")?;
        }
        self.escape_literal(ob, &ncb.literal)?;
        ob.write_str("</code></pre>\n")
    }

    fn rndr_blockhtml(&self, ob: &mut Buffer, literal: &str) -> fmt::Result {
        if self.options.skip_html {
            return Ok(());
        }
        if self.options.escape {
            return self.escape_html(ob, literal);
        }

        let trimmed = literal.trim_matches('\n');
        if trimmed.is_empty() {
            return Ok(());
        }
        ob.cr()?;
        ob.write_str(trimmed)?;
        ob.write_char('\n')
    }

    fn rndr_blockquote(&self, ob: &mut Buffer, content: &Buffer) -> fmt::Result {
        ob.cr()?;
        ob.write_str("<blockquote>\n")?;
        ob.write_str(content.as_str())?;
        ob.write_str("</blockquote>\n")
    }

    fn rndr_definition(&self, ob: &mut Buffer, content: &Buffer) -> fmt::Result {
        ob.cr()?;
        ob.write_str("<dl>\n")?;
        ob.write_str(content.as_str())?;
        ob.write_str("</dl>\n")
    }

    fn rndr_definition_title(&self, ob: &mut Buffer, content: &Buffer) -> fmt::Result {
        ob.write_str("<dt>")?;
        ob.write_str(content.as_str().trim_end_matches('\n'))?;
        ob.write_str("</dt>\n")
    }

    fn rndr_definition_data(&self, ob: &mut Buffer, content: &Buffer) -> fmt::Result {
        ob.write_str("<dd>\n")?;
        ob.write_str(content.as_str())?;
        ob.write_str("\n</dd>\n")
    }

    fn rndr_header(&mut self, ob: &mut Buffer, content: &Buffer, nh: &NodeHeading) -> fmt::Result {
        // HTML doesn't allow greater than <h6>.
        let level = min(6, self.base_header_level + nh.level.saturating_sub(1));

        ob.cr()?;
        if !content.is_empty() && self.options.head_ids {
            write!(ob, "<h{} id=\"", level)?;
            self.rndr_header_id(ob, content.as_str())?;
            ob.write_str("\">")?;
        } else {
            write!(ob, "<h{}>", level)?;
        }
        ob.write_str(content.as_str())?;
        writeln!(ob, "</h{}>", level)
    }

    /// Fill `ob` with the identifier for a header with the rendered content
    /// `raw`, reference-counting repeats so identifiers stay unique.
    ///
    /// A literal `foo-2` header followed by two `foo` headers still
    /// collides; the disambiguation scheme is part of the output contract.
    fn rndr_header_id(&mut self, ob: &mut Buffer, raw: &str) -> fmt::Result {
        escape::escape_href(ob, raw)?;
        match self.headers_used.get_mut(raw) {
            Some(count) => {
                *count += 1;
                write!(ob, "-{}", *count)?;
            }
            None => {
                self.headers_used.insert(raw.to_string(), 1);
            }
        }
        Ok(())
    }

    fn rndr_hrule(&self, ob: &mut Buffer) -> fmt::Result {
        ob.cr()?;
        ob.write_str("<hr/>\n")
    }

    fn rndr_list(&self, ob: &mut Buffer, content: &Buffer, nl: &NodeList) -> fmt::Result {
        ob.cr()?;
        if nl.ordered {
            if nl.start.is_empty() {
                ob.write_str("<ol>\n")?;
            } else {
                write!(ob, "<ol start=\"{}\">\n", nl.start)?;
            }
        } else {
            ob.write_str("<ul>\n")?;
        }
        ob.write_str(content.as_str())?;
        if nl.ordered {
            ob.write_str("</ol>\n")
        } else {
            ob.write_str("</ul>\n")
        }
    }

    fn rndr_listitem<'a>(
        &self,
        ob: &mut Buffer,
        content: &Buffer,
        n: &'a AstNode<'a>,
        ni: &NodeItem,
    ) -> fmt::Result {
        // In block mode (which the parser can assign post factum), wrap
        // non-block content in an extra <p>.
        let block_mode = if ni.definition {
            n.parent()
                .and_then(|p| p.parent())
                .map_or(false, |gp| match gp.data.borrow().value {
                    NodeValue::Definition(nd) => nd.block,
                    _ => false,
                })
        } else {
            n.parent().map_or(false, |p| match p.data.borrow().value {
                NodeValue::List(ref nl) => nl.block,
                _ => false,
            })
        };

        static BLOCK_TAGS: [&str; 9] = [
            "<ul", "<ol", "<dl", "<div", "<table", "<blockquote", "<pre>", "<h", "<p>",
        ];
        let wrap = block_mode && !BLOCK_TAGS.iter().any(|t| content.starts_with(t));

        if !ni.definition {
            ob.write_str("<li>")?;
        }
        if wrap {
            ob.write_str("<p>")?;
        }
        ob.write_str(content.as_str().trim_end_matches('\n'))?;
        if wrap {
            ob.write_str("</p>")?;
        }
        if !ni.definition {
            ob.write_str("</li>\n")?;
        }
        Ok(())
    }

    fn rndr_paragraph(&self, ob: &mut Buffer, content: &Buffer) -> fmt::Result {
        let bytes = content.as_str().as_bytes();
        let mut i = 0;
        while i < bytes.len() && isspace(bytes[i]) {
            i += 1;
        }
        if i == bytes.len() {
            return Ok(());
        }

        ob.cr()?;
        ob.write_str("<p>")?;

        if self.options.hard_wrap {
            while i < bytes.len() {
                let org = i;
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
                if i > org {
                    ob.write_str(&content.as_str()[org..i])?;
                }

                // No line break when this newline ends the paragraph.
                if i >= bytes.len() - 1 {
                    break;
                }
                ob.write_str("<br/>\n")?;
                i += 1;
            }
        } else {
            ob.write_str(&content.as_str()[i..])?;
        }

        ob.write_str("</p>\n")
    }

    fn rndr_table(&self, ob: &mut Buffer, content: &Buffer) -> fmt::Result {
        ob.cr()?;
        ob.write_str("<table>\n")?;
        ob.write_str(content.as_str())?;
        ob.write_str("</table>\n")
    }

    fn rndr_table_header(&self, ob: &mut Buffer, content: &Buffer) -> fmt::Result {
        ob.cr()?;
        ob.write_str("<thead>\n")?;
        ob.write_str(content.as_str())?;
        ob.write_str("</thead>\n")
    }

    fn rndr_table_body(&self, ob: &mut Buffer, content: &Buffer) -> fmt::Result {
        ob.cr()?;
        ob.write_str("<tbody>\n")?;
        ob.write_str(content.as_str())?;
        ob.write_str("</tbody>\n")
    }

    fn rndr_tablerow(&self, ob: &mut Buffer, content: &Buffer) -> fmt::Result {
        ob.write_str("<tr>\n")?;
        ob.write_str(content.as_str())?;
        ob.write_str("</tr>\n")
    }

    fn rndr_tablecell(&self, ob: &mut Buffer, content: &Buffer, ntc: &NodeTableCell) -> fmt::Result {
        ob.write_str(if ntc.header { "<th" } else { "<td" })?;
        match ntc.alignment {
            TableAlignment::Center => ob.write_str(" style=\"text-align: center\">")?,
            TableAlignment::Left => ob.write_str(" style=\"text-align: left\">")?,
            TableAlignment::Right => ob.write_str(" style=\"text-align: right\">")?,
            TableAlignment::None => ob.write_str(">")?,
        }
        ob.write_str(content.as_str())?;
        ob.write_str(if ntc.header { "</th>\n" } else { "</td>\n" })
    }

    fn rndr_footnotes(&self, ob: &mut Buffer, content: &Buffer) -> fmt::Result {
        ob.cr()?;
        ob.write_str("<div class=\"footnotes\">\n<hr/>\n<ol>\n")?;
        ob.write_str(content.as_str())?;
        ob.cr()?;
        ob.write_str("</ol>\n</div>\n")
    }

    fn rndr_footnote_def(
        &self,
        ob: &mut Buffer,
        content: &Buffer,
        nfd: &NodeFootnoteDefinition,
    ) -> fmt::Result {
        ob.cr()?;
        write!(ob, "<li id=\"fn{}\">\n", nfd.num)?;

        // Splice the return-link anchor into the first paragraph; with no
        // paragraph to splice into, it trails the content.
        let s = content.as_str();
        match s.find("</p>").or_else(|| s.find("</P>")) {
            Some(i) => {
                ob.write_str(&s[..i])?;
                self.put_footnote_backref(ob, nfd.num)?;
                ob.write_str(&s[i..])?;
            }
            None => {
                ob.write_str(s)?;
                self.put_footnote_backref(ob, nfd.num)?;
            }
        }
        ob.write_str("</li>\n")
    }

    fn put_footnote_backref(&self, ob: &mut Buffer, num: usize) -> fmt::Result {
        write!(
            ob,
            "&#160;<a href=\"#fnref{}\" rev=\"footnote\">&#8617;</a>",
            num
        )
    }

    fn rndr_footnote_ref(&self, ob: &mut Buffer, nfr: &NodeFootnoteReference) -> fmt::Result {
        write!(
            ob,
            "<sup id=\"fnref{}\"><a href=\"#fn{}\" rel=\"footnote\">{}</a></sup>",
            nfr.num, nfr.num, nfr.num
        )
    }

    fn rndr_autolink(&self, ob: &mut Buffer, na: &NodeAutolink) -> fmt::Result {
        if na.url.is_empty() {
            return Ok(());
        }

        ob.write_str("<a href=\"")?;
        if na.kind == AutolinkKind::Email && !na.url.starts_with("mailto:") {
            ob.write_str("mailto:")?;
        }
        escape::escape_href(ob, &na.url)?;
        ob.write_str("\">")?;

        // Pretty printing: an e-mail address given as an actual URI, e.g.
        // `mailto:foo@bar.com`, shows without the `mailto:` prefix.
        let label = na.url.strip_prefix("mailto:").unwrap_or(&na.url);
        self.escape_html(ob, label)?;
        ob.write_str("</a>")
    }

    fn rndr_codespan(&self, ob: &mut Buffer, literal: &str) -> fmt::Result {
        ob.write_str("<code>")?;
        self.escape_html(ob, literal)?;
        ob.write_str("</code>")
    }

    fn rndr_wrap(&self, ob: &mut Buffer, content: &Buffer, open: &str, close: &str) -> fmt::Result {
        ob.write_str(open)?;
        ob.write_str(content.as_str())?;
        ob.write_str(close)
    }

    fn rndr_image(&self, ob: &mut Buffer, ni: &NodeImage) -> fmt::Result {
        // An "alt" is required, even if blank.
        ob.write_str("<img src=\"")?;
        escape::escape_href(ob, &ni.url)?;
        ob.write_str("\" alt=\"")?;
        escape::escape_attr(ob, &ni.alt)?;
        ob.write_str("\"")?;

        if !ni.attr_width.is_empty() || !ni.attr_height.is_empty() {
            ob.write_str(" style=\"")?;
            if !ni.attr_width.is_empty() {
                ob.write_str("width:")?;
                escape::escape_attr(ob, &ni.attr_width)?;
                ob.write_str(";")?;
            }
            if !ni.attr_height.is_empty() {
                ob.write_str("height:")?;
                escape::escape_attr(ob, &ni.attr_height)?;
                ob.write_str(";")?;
            }
            ob.write_str("\"")?;
        } else if !ni.dims.is_empty() {
            let (x, y) = parse_dims(&ni.dims);
            if let Some(x) = x {
                write!(ob, " width=\"{}\"", x)?;
                if let Some(y) = y {
                    write!(ob, " height=\"{}\"", y)?;
                }
            }
        }

        if !ni.title.is_empty() {
            ob.write_str(" title=\"")?;
            self.escape_html(ob, &ni.title)?;
            ob.write_str("\"")?;
        }

        ob.write_str(" />")
    }

    fn rndr_link(&self, ob: &mut Buffer, content: &Buffer, nl: &NodeLink) -> fmt::Result {
        ob.write_str("<a href=\"")?;
        escape::escape_href(ob, &nl.url)?;
        if !nl.title.is_empty() {
            ob.write_str("\" title=\"")?;
            escape::escape_attr(ob, &nl.title)?;
        }
        ob.write_str("\">")?;
        ob.write_str(content.as_str())?;
        ob.write_str("</a>")
    }

    fn rndr_math(&self, ob: &mut Buffer, nm: &NodeMath) -> fmt::Result {
        ob.write_str(if nm.display_math { "\\[" } else { "\\(" })?;
        self.escape_html(ob, &nm.literal)?;
        ob.write_str(if nm.display_math { "\\]" } else { "\\)" })
    }

    fn rndr_raw_html(&self, ob: &mut Buffer, literal: &str) -> fmt::Result {
        if self.options.skip_html {
            return Ok(());
        }
        if self.options.escape {
            self.escape_html(ob, literal)
        } else {
            ob.write_str(literal)
        }
    }

    fn rndr_entity(&self, ob: &mut Buffer, text: &str) -> fmt::Result {
        if !self.options.numeric_entities {
            return ob.write_str(text);
        }

        // Prefer numeric entities: the output may be processed as XML, and
        // it's not clear the processor knows the HTML named set.
        let ent = entity::find_iso(text);
        if ent > 0 {
            write!(ob, "&#{};", ent)
        } else {
            ob.write_str(text)
        }
    }

    fn rndr_meta(&mut self, content: &Buffer, mq: &mut MetadataQueue, nm: &NodeMeta) {
        let value = content.as_str().to_string();

        if nm.key.eq_ignore_ascii_case("baseheaderlevel") {
            self.base_header_level = value
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|l| (1..=1000).contains(l))
                .unwrap_or(1);
        }

        mq.push(nm.key.clone(), value);
    }

    fn rndr_doc_header(
        &self,
        ob: &mut Buffer,
        content: &Buffer,
        mq: &MetadataQueue,
    ) -> fmt::Result {
        if !self.options.standalone {
            return Ok(());
        }

        let mut author: Option<String> = None;
        let mut title: Option<String> = None;
        let mut affil: Option<String> = None;
        let mut date: Option<String> = None;
        let mut copy: Option<String> = None;
        let mut css: Option<String> = None;
        let mut script: Option<String> = None;
        let mut rcsauthor: Option<String> = None;
        let mut rcsdate: Option<String> = None;

        for m in mq {
            if m.key.eq_ignore_ascii_case("author") {
                author = Some(m.value.clone());
            } else if m.key.eq_ignore_ascii_case("copyright") {
                copy = Some(m.value.clone());
            } else if m.key.eq_ignore_ascii_case("affiliation") {
                affil = Some(m.value.clone());
            } else if m.key.eq_ignore_ascii_case("date") {
                date = Some(m.value.clone());
            } else if m.key.eq_ignore_ascii_case("rcsauthor") {
                rcsauthor = strings::rcsauthor2str(&m.value);
            } else if m.key.eq_ignore_ascii_case("rcsdate") {
                rcsdate = strings::rcsdate2str(&m.value);
            } else if m.key.eq_ignore_ascii_case("title") {
                title = Some(m.value.clone());
            } else if m.key.eq_ignore_ascii_case("css") {
                css = Some(m.value.clone());
            } else if m.key.eq_ignore_ascii_case("javascript") {
                script = Some(m.value.clone());
            }
        }

        ob.write_str(content.as_str())?;

        ob.write_str(
            "<head>\n\
             <meta charset=\"utf-8\" />\n\
             <meta name=\"viewport\" content=\"width=device-width,initial-scale=1\" />\n",
        )?;

        // RCS keyword values win over their plain counterparts.
        let title = title.unwrap_or_else(|| "Untitled article".to_string());
        if rcsdate.is_some() {
            date = rcsdate;
        }
        if rcsauthor.is_some() {
            author = rcsauthor;
        }

        if let Some(v) = affil {
            rndr_meta_multi(ob, &v, "<meta name=\"creator\" content=", " />")?;
        }
        if let Some(v) = author {
            rndr_meta_multi(ob, &v, "<meta name=\"author\" content=", " />")?;
        }
        if let Some(v) = copy {
            rndr_meta_multi(ob, &v, "<meta name=\"copyright\" content=", " />")?;
        }
        if let Some(v) = css {
            rndr_meta_multi(ob, &v, "<link rel=\"stylesheet\" href=", " />")?;
        }
        if let Some(v) = date {
            write!(ob, "<meta name=\"date\" scheme=\"YYYY-MM-DD\" content=\"{}\" />\n", v)?;
        }
        if let Some(v) = script {
            rndr_meta_multi(ob, &v, "<script src=", "></script>")?;
        }

        ob.write_str("<title>")?;
        ob.write_str(&title)?;
        ob.write_str("</title>\n")?;
        ob.write_str("</head>\n<body>\n")
    }

    fn rndr_doc_footer(&self, ob: &mut Buffer) -> fmt::Result {
        if self.options.standalone {
            ob.write_str("</body>\n")?;
        }
        Ok(())
    }
}

/// Split `value` into strings delimited by runs of two or more whitespace
/// characters, bracketing each with `starttag` and `endtag` and
/// double-quoting the value.
fn rndr_meta_multi(ob: &mut Buffer, value: &str, starttag: &str, endtag: &str) -> fmt::Result {
    let bytes = value.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        while i < bytes.len() && isspace(bytes[i]) {
            i += 1;
        }
        if i == bytes.len() {
            break;
        }
        let start = i;

        while i < bytes.len() {
            if i < bytes.len() - 1 && isspace(bytes[i]) && isspace(bytes[i + 1]) {
                break;
            }
            i += 1;
        }

        ob.write_str(starttag)?;
        ob.write_str("\"")?;
        ob.write_str(&value[start..i])?;
        ob.write_str("\"")?;
        ob.write_str(endtag)?;
        ob.write_str("\n")?;
    }

    Ok(())
}

fn parse_dims(dims: &str) -> (Option<u32>, Option<u32>) {
    let (w, h) = match dims.split_once('x') {
        Some((w, h)) => (w, h),
        None => (dims, ""),
    };

    match scan_u32(w) {
        None => (None, None),
        Some(w) => (Some(w), scan_u32(h)),
    }
}

fn scan_u32(s: &str) -> Option<u32> {
    let digits = &s[..s.bytes().take_while(|b| b.is_ascii_digit()).count()];
    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}
