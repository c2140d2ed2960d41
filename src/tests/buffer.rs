use super::*;
use pretty_assertions::assert_eq;
use std::fmt::Write;

#[test]
fn truncate_clears_content() {
    let mut b = Buffer::new();
    b.write_str("hello").unwrap();
    assert_eq!(b.len(), 5);
    b.truncate();
    assert!(b.is_empty());
    b.write_str("again").unwrap();
    assert_eq!(b.as_str(), "again");
}

#[test]
fn prefix_and_suffix_tests() {
    let mut b = Buffer::new();
    b.write_str("<ul><li>").unwrap();
    assert!(b.starts_with("<ul"));
    assert!(!b.starts_with("<ol"));
    assert!(b.ends_with('>'));
    assert!(!b.ends_with('\n'));
}

#[test]
fn cr_appends_at_most_one_newline() {
    let mut b = Buffer::new();
    b.cr().unwrap();
    assert_eq!(b.as_str(), "");
    b.write_str("x").unwrap();
    b.cr().unwrap();
    b.cr().unwrap();
    assert_eq!(b.as_str(), "x\n");
}

#[test]
fn trim_trailing_newlines() {
    let mut b = Buffer::new();
    b.write_str("a\nb\n\n\n").unwrap();
    b.trim_trailing_newlines();
    assert_eq!(b.as_str(), "a\nb");
}

#[test]
fn equality() {
    let mut a = Buffer::new();
    let mut b = Buffer::new();
    a.write_str("same").unwrap();
    b.write_str("same").unwrap();
    assert_eq!(a, b);
    b.write_str("!").unwrap();
    assert_ne!(a, b);
}

#[test]
fn shortlink_copies_short_urls() {
    let mut b = Buffer::new();
    b.put_shortlink("https://a/b").unwrap();
    assert_eq!(b.as_str(), "https://a/b");
}

#[test]
fn shortlink_elides_deep_paths() {
    let mut b = Buffer::new();
    b.put_shortlink("https://example.com/a/b/c/deep/file.html")
        .unwrap();
    assert_eq!(b.as_str(), "https://example.com/.../file.html");
}

#[test]
fn shortlink_needs_a_path_to_elide() {
    let mut b = Buffer::new();
    b.put_shortlink("https://extremely-long-host-name.example.com")
        .unwrap();
    assert_eq!(b.as_str(), "https://extremely-long-host-name.example.com");

    let mut b = Buffer::new();
    b.put_shortlink("https://example.com/one-single-long-component")
        .unwrap();
    assert_eq!(b.as_str(), "https://example.com/one-single-long-component");
}
