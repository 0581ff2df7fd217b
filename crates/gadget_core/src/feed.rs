/// Structured feed as delivered by the fetch collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Feed {
    pub title: Option<String>,
    pub link: Option<String>,
    /// Origin URL of the feed document.
    pub url: Option<String>,
    pub entries: Vec<FeedItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub summary: Option<String>,
    /// Publication date as the fetcher saw it (RFC 3339, RFC 2822, unix
    /// seconds, or `YYYY-MM-DD`).
    pub date: Option<String>,
}

impl Feed {
    /// Link to the human-readable site, falling back to the feed URL.
    pub fn home_link(&self) -> String {
        self.link
            .as_deref()
            .or(self.url.as_deref())
            .unwrap_or("")
            .trim()
            .to_string()
    }

    pub(crate) fn is_spreadsheet(&self) -> bool {
        self.url
            .as_deref()
            .is_some_and(|url| url.contains("spreadsheets.google.com"))
    }
}
