//! Turns fetched feeds into renderable entries.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::feed::{Feed, FeedItem};
use crate::markup::strip_tags;
use crate::messages::MessageBundle;

pub const SNIPPET_LIMIT: usize = 120;
const ELLIPSIS: &str = "...";

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

static SHEET_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})-(.*?)-(\d+)").expect("valid sheet date regex"));

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FeedEntry {
    pub title_text: String,
    pub title_url: String,
    pub byline: String,
    pub snippet_html: String,
}

/// One rendered slot in a feed section.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub enum EntryView {
    Item(FeedEntry),
    /// Placeholder for a feed that could not be loaded.
    LoadError,
}

pub struct FeedAssembler<'a> {
    messages: &'a MessageBundle,
}

impl<'a> FeedAssembler<'a> {
    pub fn new(messages: &'a MessageBundle) -> Self {
        Self { messages }
    }

    /// Entries for `feed`, at most `max_entries` of them.
    ///
    /// A missing feed or an empty entry list yields exactly one
    /// [`EntryView::LoadError`].
    pub fn assemble(&self, feed: Option<&'a Feed>, max_entries: Option<usize>) -> Entries<'a> {
        let state = match feed {
            Some(feed) if !feed.entries.is_empty() => EntriesState::Items {
                items: feed.entries.iter().take(max_entries.unwrap_or(usize::MAX)),
                spreadsheet: feed.is_spreadsheet(),
            },
            _ => EntriesState::Error { emitted: false },
        };
        Entries {
            messages: self.messages,
            state,
        }
    }
}

/// Consume-once sequence of assembled entries.
pub struct Entries<'a> {
    messages: &'a MessageBundle,
    state: EntriesState<'a>,
}

enum EntriesState<'a> {
    Error {
        emitted: bool,
    },
    Items {
        items: std::iter::Take<std::slice::Iter<'a, FeedItem>>,
        spreadsheet: bool,
    },
}

impl Iterator for Entries<'_> {
    type Item = EntryView;

    fn next(&mut self) -> Option<EntryView> {
        match &mut self.state {
            EntriesState::Error { emitted } => {
                if *emitted {
                    None
                } else {
                    *emitted = true;
                    Some(EntryView::LoadError)
                }
            }
            EntriesState::Items { items, spreadsheet } => {
                let item = items.next()?;
                let entry = if *spreadsheet {
                    spreadsheet_entry(item, self.messages)
                } else {
                    standard_entry(item, self.messages)
                };
                Some(EntryView::Item(entry))
            }
        }
    }
}

fn standard_entry(item: &FeedItem, messages: &MessageBundle) -> FeedEntry {
    let byline = item
        .date
        .as_deref()
        .and_then(parse_entry_date)
        .map(|date| {
            format!(
                "{} {}, {}",
                messages.month(date.month0()),
                date.day(),
                full_year(date.year())
            )
        })
        .unwrap_or_default();

    FeedEntry {
        title_text: item.title.clone().unwrap_or_default(),
        title_url: item.link.clone().unwrap_or_default(),
        byline,
        snippet_html: snippet(item.summary.as_deref().unwrap_or("")),
    }
}

/// Spreadsheet-backed feeds pack their fields into the summary as
/// `key: value` pairs separated by commas.
fn spreadsheet_entry(item: &FeedItem, messages: &MessageBundle) -> FeedEntry {
    let fields = parse_sheet_fields(item.summary.as_deref().unwrap_or(""));
    let field = |key: &str| fields.get(key).cloned().unwrap_or_default();

    let byline = fields
        .get("date")
        .and_then(|date| sheet_byline(date, messages))
        .unwrap_or_default();

    FeedEntry {
        title_text: field("title"),
        title_url: field("link"),
        byline,
        snippet_html: snippet(&field("content")),
    }
}

fn parse_sheet_fields(summary: &str) -> HashMap<String, String> {
    summary
        .split(',')
        .map(|pair| match pair.split_once(':') {
            Some((key, value)) => (key.trim().to_string(), value.trim().to_string()),
            None => (pair.trim().to_string(), String::new()),
        })
        .collect()
}

/// `D-Mon-YYYY`, e.g. `5-Mar-2008`.
fn sheet_byline(date: &str, messages: &MessageBundle) -> Option<String> {
    let caps = SHEET_DATE_RE.captures(date)?;
    let month = caps[2].to_ascii_lowercase();
    let month0 = MONTH_ABBREVIATIONS.iter().position(|m| *m == month)?;
    Some(format!(
        "{} {}, {}",
        messages.month(month0 as u32),
        &caps[1],
        &caps[3]
    ))
}

fn parse_entry_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(secs) = raw.parse::<i64>() {
        return DateTime::<Utc>::from_timestamp(secs, 0).map(|dt| dt.date_naive());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Legacy feeds report years as an offset from 1900.
fn full_year(year: i32) -> i32 {
    if year < 1000 {
        year + 1900
    } else {
        year
    }
}

fn snippet(summary: &str) -> String {
    let text = strip_tags(summary);
    if text.chars().count() > SNIPPET_LIMIT {
        let mut truncated: String = text.chars().take(SNIPPET_LIMIT).collect();
        truncated.push_str(ELLIPSIS);
        truncated
    } else {
        text
    }
}
