use crate::escape::{escape_attr, escape_href, escape_html};
use pretty_assertions::assert_eq;

fn html(input: &str, owasp: bool, literal: bool, numeric: bool) -> String {
    let mut out = String::new();
    escape_html(&mut out, input, owasp, literal, numeric).unwrap();
    out
}

fn href(input: &str) -> String {
    let mut out = String::new();
    escape_href(&mut out, input).unwrap();
    out
}

#[test]
fn body_escapes() {
    assert_eq!(
        html("a < b & c > \"d\" 'e'", false, false, false),
        "a &lt; b &amp; c &gt; &quot;d&quot; &#39;e&#39;"
    );
}

#[test]
fn slash_needs_owasp_or_literal_mode() {
    assert_eq!(html("a/b", false, false, false), "a/b");
    assert_eq!(html("a/b", true, false, false), "a&#47;b");
    assert_eq!(html("a/b", false, true, false), "a&#47;b");
}

#[test]
fn numeric_references() {
    assert_eq!(
        html("<&>\"", false, false, true),
        "&#60;&#38;&#62;&#34;"
    );
}

#[test]
fn attribute_escapes() {
    let mut out = String::new();
    escape_attr(&mut out, "a\"b'c&d").unwrap();
    assert_eq!(out, "a&quot;b&#39;c&amp;d");
}

#[test]
fn href_passes_safe_characters() {
    assert_eq!(href("https://a/b?x=1;y:2#z"), "https://a/b?x=1;y:2#z");
    assert_eq!(href("mailto:a@b"), "mailto:a@b");
}

#[test]
fn href_percent_encodes_the_rest() {
    assert_eq!(href("a b"), "a%20b");
    assert_eq!(href("a&b"), "a%26b");
    assert_eq!(href("a'b"), "a%27b");
    assert_eq!(href("caf\u{e9}"), "caf%C3%A9");
}

#[test]
fn href_is_idempotent() {
    for url in ["https://a/b c", "a&b'c", "caf\u{e9}", "x%20y"] {
        let once = href(url);
        assert_eq!(href(&once), once);
    }
}
