use gadget_core::{parse_source, SourceKind};

#[test]
fn frame_source_is_classified() {
    let d = parse_source("frame:Title:http://x/y");
    assert_eq!(d.kind, SourceKind::Frame);
    assert_eq!(d.title.as_deref(), Some("Title"));
    assert_eq!(d.payload, "http://x/y");
}

#[test]
fn bare_url_with_colon_has_no_title() {
    let d = parse_source("http://a/b:c");
    assert_eq!(d.kind, SourceKind::Feed);
    assert_eq!(d.title, None);
    assert_eq!(d.payload, "http://a/b:c");
}

#[test]
fn titled_feed_is_split_once() {
    let d = parse_source("My Feed:http://a/b");
    assert_eq!(d.kind, SourceKind::Feed);
    assert_eq!(d.title.as_deref(), Some("My Feed"));
    assert_eq!(d.payload, "http://a/b");
}

#[test]
fn bare_url_is_a_feed() {
    let d = parse_source("http://example.com/feed.xml");
    assert_eq!(d.kind, SourceKind::Feed);
    assert_eq!(d.title, None);
    assert_eq!(d.payload, "http://example.com/feed.xml");
}

#[test]
fn featured_url_keeps_extra_colons() {
    let d = parse_source("featured:Top Stories:http://x:8080/f?q=a:b");
    assert_eq!(d.kind, SourceKind::Featured);
    assert_eq!(d.title.as_deref(), Some("Top Stories"));
    assert_eq!(d.payload, "http://x:8080/f?q=a:b");
}

#[test]
fn raw_and_escaped_are_matched_before_html() {
    let raw = parse_source("raw:Notes:http://x/notes.html");
    assert_eq!(raw.kind, SourceKind::Raw);
    assert_eq!(raw.payload, "http://x/notes.html");

    let escaped = parse_source("escaped:Code:http://x/a.txt");
    assert_eq!(escaped.kind, SourceKind::Escaped);
    assert_eq!(escaped.title.as_deref(), Some("Code"));
}

#[test]
fn html_body_keeps_colons() {
    let d = parse_source("html:Links:<a href=\"http://x\">x</a>");
    assert_eq!(d.kind, SourceKind::Html);
    assert_eq!(d.title.as_deref(), Some("Links"));
    assert_eq!(d.payload, "<a href=\"http://x\">x</a>");
}

#[test]
fn empty_title_is_none() {
    let d = parse_source("frame::http://x/y");
    assert_eq!(d.kind, SourceKind::Frame);
    assert_eq!(d.title, None);
}

#[test]
fn malformed_source_falls_through_to_feed() {
    let d = parse_source("not a url at all");
    assert_eq!(d.kind, SourceKind::Feed);
    assert_eq!(d.payload, "not a url at all");
}
