use super::*;
use crate::gemini::link_ordinal;
use crate::nodes::{
    NodeAutolink, NodeCodeBlock, NodeFootnoteDefinition, NodeFootnoteReference, NodeHeading,
    NodeItem, NodeLink, NodeList, NodeMeta, NodeTable, NodeTableCell, TableAlignment,
};
use crate::nodes::AutolinkKind;
use pretty_assertions::assert_eq;

fn link<'a>(arena: &'a Arena<AstNode<'a>>, url: &str, label: &str) -> &'a AstNode<'a> {
    let l = ast(
        arena,
        NodeValue::Link(NodeLink {
            url: url.to_string(),
            title: String::new(),
        }),
    );
    l.append(text(arena, label));
    l
}

#[test]
fn paragraph() {
    let arena = Arena::new();
    let root = doc(&arena, &[super::paragraph(&arena, &[text(&arena, "Hello")])]);
    assert_eq!(render_gemini(root, &GeminiOptions::default()), "Hello\n");
}

#[test]
fn headings() {
    let arena = Arena::new();
    let h1 = ast(&arena, NodeValue::Heading(NodeHeading { level: 1 }));
    h1.append(text(&arena, "Intro"));
    let h2 = ast(&arena, NodeValue::Heading(NodeHeading { level: 2 }));
    h2.append(text(&arena, "Sub"));
    let root = doc(&arena, &[h1, h2]);
    assert_eq!(
        render_gemini(root, &GeminiOptions::default()),
        "# Intro\n\n## Sub\n"
    );
}

#[test]
fn blockquote() {
    let arena = Arena::new();
    let bq = ast(&arena, NodeValue::BlockQuote);
    bq.append(super::paragraph(&arena, &[text(&arena, "Q")]));
    let root = doc(&arena, &[bq]);
    assert_eq!(render_gemini(root, &GeminiOptions::default()), "> Q\n");
}

#[test]
fn lists() {
    let arena = Arena::new();
    let list = ast(&arena, NodeValue::List(NodeList::default()));
    for label in ["a", "b"] {
        let item = ast(&arena, NodeValue::Item(NodeItem::default()));
        item.append(text(&arena, label));
        list.append(item);
    }
    let root = doc(&arena, &[list]);
    assert_eq!(render_gemini(root, &GeminiOptions::default()), "* a\n* b\n");
}

#[test]
fn ordered_list() {
    let arena = Arena::new();
    let list = ast(
        &arena,
        NodeValue::List(NodeList {
            ordered: true,
            block: false,
            start: String::new(),
        }),
    );
    for (num, label) in [(1, "a"), (2, "b")] {
        let item = ast(
            &arena,
            NodeValue::Item(NodeItem {
                num,
                ordered: true,
                definition: false,
            }),
        );
        item.append(text(&arena, label));
        list.append(item);
    }
    let root = doc(&arena, &[list]);
    assert_eq!(render_gemini(root, &GeminiOptions::default()), "1. a\n2. b\n");
}

#[test]
fn code_block_fences() {
    let arena = Arena::new();
    let root = doc(
        &arena,
        &[ast(
            &arena,
            NodeValue::CodeBlock(NodeCodeBlock {
                lang: "c".to_string(),
                literal: "int x;\n".to_string(),
            }),
        )],
    );
    assert_eq!(
        render_gemini(root, &GeminiOptions::default()),
        "```\nint x;\n```\n"
    );
}

#[test]
fn no_link_lines_inside_fences() {
    let arena = Arena::new();
    let root = doc(
        &arena,
        &[ast(
            &arena,
            NodeValue::CodeBlock(NodeCodeBlock {
                lang: String::new(),
                literal: "see https://a/b\n".to_string(),
            }),
        )],
    );
    let out = render_gemini(root, &GeminiOptions::default());
    let mut fenced = false;
    for line in out.lines() {
        if line.starts_with("```") {
            fenced = !fenced;
            continue;
        }
        if fenced {
            assert!(!line.starts_with("=>"), "link line inside fence: {:?}", line);
        }
    }
}

#[test]
fn link_at_end_policy() {
    let arena = Arena::new();
    let root = doc(
        &arena,
        &[super::paragraph(&arena, &[link(&arena, "https://a/b", "x")])],
    );
    let options = GeminiOptions::builder().link_at_end(true).build();
    assert_eq!(
        render_gemini(root, &options),
        "x[a]\n\n=> https://a/b [a]\n"
    );
}

#[test]
fn link_section_policy_flushes_after_blocks() {
    let arena = Arena::new();
    let root = doc(
        &arena,
        &[
            super::paragraph(
                &arena,
                &[
                    text(&arena, "see "),
                    link(&arena, "https://one", "x"),
                    text(&arena, " end"),
                ],
            ),
            super::paragraph(&arena, &[text(&arena, "Next.")]),
        ],
    );
    assert_eq!(
        render_gemini(root, &GeminiOptions::default()),
        "see x[a] end\n\n=> https://one [a]\n\nNext.\n"
    );
}

#[test]
fn link_inline_policy() {
    let arena = Arena::new();
    let root = doc(
        &arena,
        &[super::paragraph(
            &arena,
            &[
                text(&arena, "see "),
                link(&arena, "https://one", "x"),
                text(&arena, " end"),
            ],
        )],
    );
    let options = GeminiOptions::builder().link_inline(true).build();
    assert_eq!(
        render_gemini(root, &options),
        "see \n=> https://one x\nend\n"
    );
}

#[test]
fn link_noref_suppresses_tokens() {
    let arena = Arena::new();
    let root = doc(
        &arena,
        &[super::paragraph(&arena, &[text(&arena, "x"), link(&arena, "https://one", "y")])],
    );
    let options = GeminiOptions::builder().link_noref(true).build();
    assert_eq!(render_gemini(root, &options), "xy\n\n=> https://one\n");
}

#[test]
fn standalone_link_gets_its_own_line() {
    let arena = Arena::new();
    let root = doc(
        &arena,
        &[super::paragraph(&arena, &[link(&arena, "https://a/b", "x")])],
    );
    assert_eq!(
        render_gemini(root, &GeminiOptions::default()),
        "=> https://a/b x\n"
    );
}

#[test]
fn link_ordinals_are_contiguous() {
    let arena = Arena::new();
    let para = super::paragraph(
        &arena,
        &[
            link(&arena, "https://one", "1"),
            link(&arena, "https://two", "2"),
            link(&arena, "https://three", "3"),
        ],
    );
    let root = doc(&arena, &[para]);
    assert_eq!(
        render_gemini(root, &GeminiOptions::default()),
        concat!(
            "1[a]2[b]3[c]\n",
            "\n",
            "=> https://one [a]\n",
            "=> https://two [b]\n",
            "=> https://three [c]\n"
        )
    );
}

#[test]
fn letter_ordinals() {
    assert_eq!(link_ordinal(1, false), "a");
    assert_eq!(link_ordinal(26, false), "z");
    assert_eq!(link_ordinal(27, false), "aa");
    assert_eq!(link_ordinal(28, false), "ab");
    assert_eq!(link_ordinal(52, false), "az");
    assert_eq!(link_ordinal(53, false), "ba");
    assert_eq!(link_ordinal(702, false), "zz");
    assert_eq!(link_ordinal(703, false), "aaa");
}

#[test]
fn roman_ordinals() {
    assert_eq!(link_ordinal(1, true), "i");
    assert_eq!(link_ordinal(4, true), "iv");
    assert_eq!(link_ordinal(9, true), "ix");
    assert_eq!(link_ordinal(14, true), "xiv");
    assert_eq!(link_ordinal(40, true), "xl");
    assert_eq!(link_ordinal(90, true), "xc");
    assert_eq!(link_ordinal(400, true), "cd");
    assert_eq!(link_ordinal(1987, true), "mcmlxxxvii");
    assert_eq!(link_ordinal(3999, true), "mmmcmxcix");
}

fn cell<'a>(
    arena: &'a Arena<AstNode<'a>>,
    col: usize,
    header: bool,
    literal: &str,
) -> &'a AstNode<'a> {
    let c = ast(
        arena,
        NodeValue::TableCell(NodeTableCell {
            col,
            header,
            alignment: TableAlignment::Center,
        }),
    );
    c.append(text(arena, literal));
    c
}

#[test]
fn table_layout() {
    let arena = Arena::new();
    let table = ast(&arena, NodeValue::Table(NodeTable { columns: 2 }));
    let head = ast(&arena, NodeValue::TableHead);
    let hrow = ast(&arena, NodeValue::TableRow);
    hrow.append(cell(&arena, 0, true, "H1"));
    hrow.append(cell(&arena, 1, true, "H2"));
    head.append(hrow);
    let body = ast(&arena, NodeValue::TableBody);
    let brow = ast(&arena, NodeValue::TableRow);
    brow.append(cell(&arena, 0, false, "a"));
    brow.append(cell(&arena, 1, false, "bb"));
    body.append(brow);
    table.append(head);
    table.append(body);
    let root = doc(&arena, &[table]);
    assert_eq!(
        render_gemini(root, &GeminiOptions::default()),
        "```\nH1 | H2\n---|---\na  | bb\n```\n"
    );
}

#[test]
fn empty_table_is_a_single_fence_pair() {
    let arena = Arena::new();
    let table = ast(&arena, NodeValue::Table(NodeTable { columns: 0 }));
    let root = doc(&arena, &[table]);
    assert_eq!(render_gemini(root, &GeminiOptions::default()), "```\n```\n");
}

#[test]
fn table_measurement_keeps_pending_links() {
    let arena = Arena::new();
    let para = super::paragraph(&arena, &[link(&arena, "https://pending", "x")]);
    // Not standalone: give the link a sibling.
    para.append(text(&arena, "!"));

    let table = ast(&arena, NodeValue::Table(NodeTable { columns: 1 }));
    let body = ast(&arena, NodeValue::TableBody);
    let row = ast(&arena, NodeValue::TableRow);
    row.append(cell(&arena, 0, false, "c"));
    body.append(row);
    table.append(body);

    let root = doc(&arena, &[para, table]);
    let options = GeminiOptions::builder().link_at_end(true).build();
    let out = render_gemini(root, &options);
    assert!(
        out.ends_with("=> https://pending [a]\n"),
        "pending link lost: {:?}",
        out
    );
    assert_eq!(out.matches("=> https://pending").count(), 1);
}

#[test]
fn autolink_renders_like_a_link() {
    let arena = Arena::new();
    let auto = ast(
        &arena,
        NodeValue::Autolink(NodeAutolink {
            url: "https://a/b".to_string(),
            kind: AutolinkKind::Uri,
        }),
    );
    let root = doc(&arena, &[super::paragraph(&arena, &[auto])]);
    assert_eq!(
        render_gemini(root, &GeminiOptions::default()),
        "=> https://a/b \n"
    );
}

#[test]
fn entity_emits_utf8() {
    let arena = Arena::new();
    let root = doc(
        &arena,
        &[super::paragraph(
            &arena,
            &[ast(&arena, NodeValue::Entity("&ouml;".to_string()))],
        )],
    );
    assert_eq!(render_gemini(root, &GeminiOptions::default()), "\u{f6}\n");
}

#[test]
fn unknown_entity_passes_through() {
    let arena = Arena::new();
    let root = doc(
        &arena,
        &[super::paragraph(
            &arena,
            &[ast(&arena, NodeValue::Entity("&bogus;".to_string()))],
        )],
    );
    assert_eq!(render_gemini(root, &GeminiOptions::default()), "&bogus;\n");
}

#[test]
fn newline_after_period_becomes_two_spaces() {
    let arena = Arena::new();
    let root = doc(
        &arena,
        &[super::paragraph(&arena, &[text(&arena, "End.\nNext")])],
    );
    assert_eq!(
        render_gemini(root, &GeminiOptions::default()),
        "End.  Next\n"
    );
}

#[test]
fn superscript() {
    let arena = Arena::new();
    let sup = ast(&arena, NodeValue::Superscript);
    sup.append(text(&arena, "2"));
    let root = doc(
        &arena,
        &[super::paragraph(&arena, &[text(&arena, "e=mc"), sup])],
    );
    assert_eq!(render_gemini(root, &GeminiOptions::default()), "e=mc^2\n");
}

#[test]
fn line_break() {
    let arena = Arena::new();
    let root = doc(
        &arena,
        &[super::paragraph(
            &arena,
            &[
                text(&arena, "a"),
                ast(&arena, NodeValue::LineBreak),
                text(&arena, "b"),
            ],
        )],
    );
    assert_eq!(render_gemini(root, &GeminiOptions::default()), "a\nb\n");
}

#[test]
fn footnotes() {
    let arena = Arena::new();
    let para = super::paragraph(
        &arena,
        &[
            text(&arena, "Hi"),
            ast(
                &arena,
                NodeValue::FootnoteReference(NodeFootnoteReference { num: 1 }),
            ),
        ],
    );
    let block = ast(&arena, NodeValue::FootnotesBlock);
    let def = ast(
        &arena,
        NodeValue::FootnoteDefinition(NodeFootnoteDefinition { num: 1 }),
    );
    def.append(super::paragraph(&arena, &[text(&arena, "A note.")]));
    block.append(def);
    let root = doc(&arena, &[para, block]);
    assert_eq!(
        render_gemini(root, &GeminiOptions::default()),
        "Hi[1]\n\n~~~~~~~~\n\n[1] A note.\n"
    );
}

fn meta<'a>(arena: &'a Arena<AstNode<'a>>, key: &str, value: &str) -> &'a AstNode<'a> {
    let m = ast(
        arena,
        NodeValue::Meta(NodeMeta {
            key: key.to_string(),
        }),
    );
    m.append(text(arena, value));
    m
}

#[test]
fn metadata_lines() {
    let arena = Arena::new();
    let header = ast(&arena, NodeValue::DocHeader);
    header.append(meta(&arena, "title", "My Title"));
    let root = doc(
        &arena,
        &[header, super::paragraph(&arena, &[text(&arena, "Body")])],
    );
    let options = GeminiOptions::builder().metadata(true).build();
    assert_eq!(render_gemini(root, &options), "title: My Title\n\nBody\n");
    // Without the flag the header is silent.
    assert_eq!(render_gemini(root, &GeminiOptions::default()), "Body\n");
}

#[test]
fn deleted_meta_not_collected() {
    let arena = Arena::new();
    let header = ast(&arena, NodeValue::DocHeader);
    let m = meta(&arena, "secret", "gone");
    m.data.borrow_mut().change = ChangeTracking::Delete;
    header.append(m);
    let root = doc(&arena, &[header]);

    let mut mq = MetadataQueue::new();
    let mut out = Buffer::new();
    crate::gemini::format_document_with_metadata(
        root,
        &GeminiOptions::default(),
        &mut out,
        &mut mq,
    )
    .unwrap();
    assert!(mq.is_empty());
}
