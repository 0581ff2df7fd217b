//! String-level helpers for the HTML fragments a gadget carries around.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use scraper::{ElementRef, Html};

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<.*?>").expect("valid tag regex"));
static ANCHOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<a\b([^>]*)>").expect("valid anchor regex"));
/// One attribute: name, then an optional double-quoted, single-quoted or bare value.
static ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([^\s=/>]+)(?:\s*=\s*("[^"]*"|'[^']*'|[^\s>]+))?"#).expect("valid attribute regex")
});

const SPACE_ESCAPE: &str = "%20";

/// Strips leading and trailing literal `%20` runs from a URL.
///
/// Some upstream feeds wrap their links in encoded spaces.
pub fn scrub_url(url: &str) -> String {
    let mut s = url;
    while let Some(rest) = s.strip_prefix(SPACE_ESCAPE) {
        s = rest;
    }
    while let Some(rest) = s.strip_suffix(SPACE_ESCAPE) {
        s = rest;
    }
    s.to_string()
}

/// Replaces every tag-like run with a single space.
pub fn strip_tags(html: &str) -> String {
    TAG_RE.replace_all(html, " ").into_owned()
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn frame_markup(url: &str) -> String {
    format!(
        r#"<iframe src="{}" frameborder="0" width="100%"></iframe>"#,
        escape_html(url)
    )
}

/// Rewrites anchors so links leave the gadget frame: scrubs each `href` and
/// forces `target="_top"`. Attributes are re-emitted separated by single
/// spaces; other attributes keep their values untouched.
pub fn retarget_anchors(html: &str) -> String {
    ANCHOR_RE
        .replace_all(html, |caps: &Captures| {
            let mut anchor = String::from("<a");
            for attr in ATTR_RE.captures_iter(&caps[1]) {
                let name = &attr[1];
                if name.eq_ignore_ascii_case("target") {
                    continue;
                }
                anchor.push(' ');
                anchor.push_str(name);
                if let Some(value) = attr.get(2) {
                    anchor.push('=');
                    if name.eq_ignore_ascii_case("href") {
                        anchor.push_str(&scrub_attribute_value(value.as_str()));
                    } else {
                        anchor.push_str(value.as_str());
                    }
                }
            }
            anchor.push_str(r#" target="_top">"#);
            anchor
        })
        .into_owned()
}

/// Scrubs an attribute value, keeping its quoting.
fn scrub_attribute_value(raw: &str) -> String {
    for quote in ['"', '\''] {
        if let Some(inner) = raw
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return format!("{quote}{}{quote}", scrub_url(inner));
        }
    }
    scrub_url(raw)
}

/// Inner HTML of the first element in a fragment, or the fragment itself
/// when it holds no elements.
pub fn first_element_inner_html(fragment: &str) -> String {
    let doc = Html::parse_fragment(fragment);
    doc.root_element()
        .children()
        .find_map(ElementRef::wrap)
        .map(|el| el.inner_html())
        .unwrap_or_else(|| fragment.to_string())
}
