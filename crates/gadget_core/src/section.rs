use serde::Serialize;

use crate::assemble::EntryView;
use crate::markup::{retarget_anchors, scrub_url};

pub type SectionId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SectionType {
    Raw,
    Feed,
    Featured,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FetchKind {
    Text,
    Feed { max_entries: Option<u32> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchRequest {
    pub url: String,
    pub kind: FetchKind,
}

/// Carousel state of a featured section.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Carousel {
    pub features: Vec<String>,
    pub current: usize,
    pub minimal: bool,
    /// Message shown instead of features when the feed failed to load.
    pub error: Option<String>,
}

impl Carousel {
    pub fn next(&mut self) {
        if !self.features.is_empty() {
            self.current = (self.current + 1) % self.features.len();
        }
    }

    pub fn previous(&mut self) {
        if !self.features.is_empty() {
            self.current = self
                .current
                .checked_sub(1)
                .unwrap_or(self.features.len() - 1);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SectionBody {
    /// Fetched text, optionally HTML-escaped before insertion.
    Raw { html: String, escape: bool },
    Feed { entries: Vec<EntryView> },
    Featured(Carousel),
    /// Inline content known at configuration time.
    Custom { html: String },
}

/// One collapsible panel of the gadget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    id: SectionId,
    title: String,
    subscribe_url: Option<String>,
    read_more_url: Option<String>,
    expanded: bool,
    loading: bool,
    subheader_visible: bool,
    deferred: Option<FetchRequest>,
    pending_reveal: bool,
    body: SectionBody,
}

impl Section {
    pub fn new(id: SectionId, title: impl Into<String>, body: SectionBody) -> Self {
        Self {
            id,
            title: title.into(),
            subscribe_url: None,
            read_more_url: None,
            expanded: false,
            loading: false,
            subheader_visible: true,
            deferred: None,
            pending_reveal: false,
            body,
        }
    }

    pub fn id(&self) -> SectionId {
        self.id
    }

    pub fn section_type(&self) -> SectionType {
        match self.body {
            SectionBody::Raw { .. } => SectionType::Raw,
            SectionBody::Feed { .. } => SectionType::Feed,
            SectionBody::Featured(_) => SectionType::Featured,
            SectionBody::Custom { .. } => SectionType::Custom,
        }
    }

    pub fn body(&self) -> &SectionBody {
        &self.body
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, value: impl Into<String>) {
        self.title = value.into();
    }

    /// HTML content of raw and custom sections.
    pub fn content(&self) -> Option<&str> {
        match &self.body {
            SectionBody::Raw { html, .. } | SectionBody::Custom { html } => Some(html),
            _ => None,
        }
    }

    /// Replaces the content of a raw or custom section. Raw sections escape
    /// the value first when configured to.
    pub fn set_content(&mut self, value: &str) {
        match &mut self.body {
            SectionBody::Raw { html, escape } => {
                *html = if *escape {
                    crate::markup::escape_html(value)
                } else {
                    value.to_string()
                };
            }
            SectionBody::Custom { html } => *html = value.to_string(),
            _ => {}
        }
    }

    pub fn entries(&self) -> &[EntryView] {
        match &self.body {
            SectionBody::Feed { entries } => entries,
            _ => &[],
        }
    }

    /// Appends entries after the existing ones.
    pub fn push_entries(&mut self, new_entries: impl IntoIterator<Item = EntryView>) {
        if let SectionBody::Feed { entries } = &mut self.body {
            entries.extend(new_entries);
        }
    }

    pub fn carousel(&self) -> Option<&Carousel> {
        match &self.body {
            SectionBody::Featured(carousel) => Some(carousel),
            _ => None,
        }
    }

    pub fn carousel_mut(&mut self) -> Option<&mut Carousel> {
        match &mut self.body {
            SectionBody::Featured(carousel) => Some(carousel),
            _ => None,
        }
    }

    pub fn subscribe(&self) -> Option<&str> {
        self.subscribe_url.as_deref()
    }

    /// Only feed-bearing sections carry a subscribe control; empty values
    /// leave the current link alone.
    pub fn set_subscribe(&mut self, url: &str) {
        if self.has_feed_chrome() && !url.is_empty() {
            self.subscribe_url = Some(scrub_url(url));
        }
    }

    pub fn read_more(&self) -> Option<&str> {
        self.read_more_url.as_deref()
    }

    pub fn set_read_more(&mut self, url: &str) {
        if self.has_feed_chrome() && !url.is_empty() {
            self.read_more_url = Some(scrub_url(url));
        }
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn subheader_visible(&self) -> bool {
        self.subheader_visible
    }

    pub fn has_deferred_load(&self) -> bool {
        self.deferred.is_some()
    }

    pub fn is_pending_reveal(&self) -> bool {
        self.pending_reveal
    }

    /// Makes links in loaded content leave the gadget frame.
    pub fn post_process(&mut self) {
        match &mut self.body {
            SectionBody::Raw { html, .. } => *html = retarget_anchors(html),
            SectionBody::Feed { entries } => {
                for entry in entries.iter_mut() {
                    if let EntryView::Item(item) = entry {
                        item.title_url = scrub_url(&item.title_url);
                    }
                }
            }
            SectionBody::Featured(carousel) => {
                for feature in carousel.features.iter_mut() {
                    *feature = retarget_anchors(feature);
                }
            }
            SectionBody::Custom { .. } => {}
        }
    }

    fn has_feed_chrome(&self) -> bool {
        matches!(
            self.body,
            SectionBody::Feed { .. } | SectionBody::Featured(_)
        )
    }

    pub(crate) fn set_expanded(&mut self, expanded: bool) {
        self.expanded = expanded;
    }

    pub(crate) fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub(crate) fn hide_subheader(&mut self) {
        self.subheader_visible = false;
    }

    pub(crate) fn set_deferred(&mut self, request: FetchRequest) {
        self.deferred = Some(request);
    }

    /// The deferred hook fires at most once.
    pub(crate) fn take_deferred(&mut self) -> Option<FetchRequest> {
        self.deferred.take()
    }

    pub(crate) fn set_pending_reveal(&mut self, pending: bool) {
        self.pending_reveal = pending;
    }
}
