use feed_rs::model::{Entry, Link};

use crate::{FailureKind, FetchError};

/// Feed as handed to the gadget: plain strings, entries in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedFeed {
    pub title: Option<String>,
    pub link: Option<String>,
    /// The address the feed was requested from.
    pub url: String,
    pub entries: Vec<ParsedEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    /// Entry summary, else the content body.
    pub summary: Option<String>,
    /// RFC 3339 publication (or update) time.
    pub date: Option<String>,
}

/// Parses RSS or Atom bytes, keeping at most `max_entries` entries.
pub fn parse_feed(bytes: &[u8], url: &str, max_entries: Option<usize>) -> Result<ParsedFeed, FetchError> {
    let model = feed_rs::parser::parse(bytes)
        .map_err(|err| FetchError::new(FailureKind::Parse, err.to_string()))?;

    Ok(ParsedFeed {
        title: model.title.map(|t| t.content),
        link: home_link(&model.links),
        url: url.to_string(),
        entries: model
            .entries
            .iter()
            .take(max_entries.unwrap_or(usize::MAX))
            .map(convert_entry)
            .collect(),
    })
}

fn home_link(links: &[Link]) -> Option<String> {
    links
        .iter()
        .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
        .or_else(|| links.first())
        .map(|l| l.href.clone())
}

fn convert_entry(entry: &Entry) -> ParsedEntry {
    let summary = entry
        .summary
        .as_ref()
        .map(|s| s.content.clone())
        .or_else(|| entry.content.as_ref().and_then(|c| c.body.clone()));
    ParsedEntry {
        title: entry.title.as_ref().map(|t| t.content.clone()),
        link: home_link(&entry.links),
        summary,
        date: entry.published.or(entry.updated).map(|d| d.to_rfc3339()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
  <title>Team Blog</title>
  <link>http://blog.example/</link>
  <description>d</description>
  <item><title>First</title><link>http://blog.example/1</link>
    <description>One</description><pubDate>Wed, 05 Mar 2008 10:00:00 GMT</pubDate></item>
  <item><title>Second</title><link>http://blog.example/2</link><description>Two</description></item>
  <item><title>Third</title><description>Three</description></item>
</channel></rss>"#;

    #[test]
    fn parses_rss_channel_and_items() {
        let feed = parse_feed(RSS.as_bytes(), "http://blog.example/rss", None).unwrap();
        assert_eq!(feed.title.as_deref(), Some("Team Blog"));
        assert_eq!(feed.link.as_deref(), Some("http://blog.example/"));
        assert_eq!(feed.url, "http://blog.example/rss");
        assert_eq!(feed.entries.len(), 3);
        assert_eq!(feed.entries[0].title.as_deref(), Some("First"));
        assert_eq!(feed.entries[0].link.as_deref(), Some("http://blog.example/1"));
        assert_eq!(feed.entries[0].summary.as_deref(), Some("One"));
        assert!(feed.entries[0].date.as_deref().is_some_and(|d| d.starts_with("2008-03-05")));
        assert_eq!(feed.entries[1].date, None);
    }

    #[test]
    fn entry_cap_applies() {
        let feed = parse_feed(RSS.as_bytes(), "u", Some(2)).unwrap();
        assert_eq!(feed.entries.len(), 2);
    }

    #[test]
    fn garbage_is_a_parse_failure() {
        let err = parse_feed(b"not a feed", "u", None).unwrap_err();
        assert_eq!(err.kind, FailureKind::Parse);
    }
}
