//! Classification of configured source strings.
//!
//! The grammar is a small colon-delimited language:
//!
//! ```text
//! raw:<title>:<url>        fetched text, inserted as HTML
//! escaped:<title>:<url>    fetched text, HTML-escaped
//! html:<title>:<html>      inline HTML block
//! frame:<title>:<url>      iframe
//! featured:<title>:<url>   featured carousel feed
//! <title>:<url> | <url>    feed
//! ```
//!
//! Rules are tried in table order and the first match wins. Anything that no
//! prefixed rule claims is treated as a feed.

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum SourceKind {
    Raw,
    Escaped,
    Html,
    Frame,
    Featured,
    Feed,
}

impl SourceKind {
    /// Whether a section of this kind has content that must be fetched.
    pub fn is_fetched(self) -> bool {
        !matches!(self, SourceKind::Html | SourceKind::Frame)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
    pub kind: SourceKind,
    pub title: Option<String>,
    pub payload: String,
}

struct Rule {
    prefix: &'static str,
    kind: SourceKind,
}

const PREFIX_RULES: &[Rule] = &[
    Rule {
        prefix: "raw",
        kind: SourceKind::Raw,
    },
    Rule {
        prefix: "escaped",
        kind: SourceKind::Escaped,
    },
    Rule {
        prefix: "html",
        kind: SourceKind::Html,
    },
    Rule {
        prefix: "frame",
        kind: SourceKind::Frame,
    },
    Rule {
        prefix: "featured",
        kind: SourceKind::Featured,
    },
];

/// Classifies one configured source string. Never fails.
pub fn parse_source(raw: &str) -> SourceDescriptor {
    let raw = raw.trim();
    PREFIX_RULES
        .iter()
        .find_map(|rule| match_prefixed(rule, raw))
        .unwrap_or_else(|| parse_feed(raw))
}

/// `<prefix>:<title>:<rest>`; only the first two colons are significant.
fn match_prefixed(rule: &Rule, raw: &str) -> Option<SourceDescriptor> {
    let (prefix, rest) = raw.split_once(':')?;
    if !prefix.eq_ignore_ascii_case(rule.prefix) {
        return None;
    }
    let (title, payload) = rest.split_once(':')?;
    Some(SourceDescriptor {
        kind: rule.kind,
        title: non_empty(title),
        payload: payload.to_string(),
    })
}

fn parse_feed(raw: &str) -> SourceDescriptor {
    if let Some((title, rest)) = raw.split_once(':') {
        // `http://host/a:b` splits into a scheme and `//host/a:b`.
        if rest.contains(':') && !rest.starts_with("//") {
            return SourceDescriptor {
                kind: SourceKind::Feed,
                title: non_empty(title),
                payload: rest.to_string(),
            };
        }
    }
    SourceDescriptor {
        kind: SourceKind::Feed,
        title: None,
        payload: raw.to_string(),
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
