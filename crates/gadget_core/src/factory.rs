use crate::config::GadgetConfig;
use crate::markup::frame_markup;
use crate::section::{Carousel, FetchKind, FetchRequest, Section, SectionBody, SectionId};
use crate::source::{SourceDescriptor, SourceKind};

/// How a freshly created section gets its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schedule {
    /// Fetch right away.
    Eager(FetchRequest),
    /// Fetch when the section is first opened; the request sits on the
    /// section as its deferred hook.
    Deferred,
    /// Content is already present; the source counts as finished.
    Static { url: String },
}

/// Builds one section per source descriptor.
pub struct SectionFactory<'a> {
    config: &'a GadgetConfig,
}

impl<'a> SectionFactory<'a> {
    pub fn new(config: &'a GadgetConfig) -> Self {
        Self { config }
    }

    pub fn create(&self, id: SectionId, descriptor: &SourceDescriptor) -> (Section, Schedule) {
        let title = descriptor.title.clone().unwrap_or_default();
        let payload = descriptor.payload.as_str();

        let (mut section, request) = match descriptor.kind {
            SourceKind::Raw | SourceKind::Escaped => (
                Section::new(
                    id,
                    title,
                    SectionBody::Raw {
                        html: String::new(),
                        escape: descriptor.kind == SourceKind::Escaped,
                    },
                ),
                FetchRequest {
                    url: payload.to_string(),
                    kind: FetchKind::Text,
                },
            ),
            SourceKind::Html => {
                let body = SectionBody::Custom {
                    html: payload.to_string(),
                };
                let section = self.finish(Section::new(id, title, body));
                return (
                    section,
                    Schedule::Static {
                        url: "n/a".to_string(),
                    },
                );
            }
            SourceKind::Frame => {
                let body = SectionBody::Custom {
                    html: frame_markup(payload),
                };
                let section = self.finish(Section::new(id, title, body));
                return (
                    section,
                    Schedule::Static {
                        url: payload.to_string(),
                    },
                );
            }
            SourceKind::Featured => {
                let url = feed_request_url(payload);
                let mut section = Section::new(
                    id,
                    title,
                    SectionBody::Featured(Carousel {
                        minimal: self.config.min_featured_chrome,
                        ..Carousel::default()
                    }),
                );
                section.set_subscribe(payload);
                (
                    section,
                    FetchRequest {
                        url,
                        kind: FetchKind::Feed {
                            max_entries: self.config.max_featured_feeds,
                        },
                    },
                )
            }
            SourceKind::Feed => {
                let mut section = Section::new(
                    id,
                    title,
                    SectionBody::Feed {
                        entries: Vec::new(),
                    },
                );
                section.set_subscribe(payload);
                (
                    section,
                    FetchRequest {
                        url: feed_request_url(payload),
                        kind: FetchKind::Feed {
                            max_entries: self.config.max_feeds,
                        },
                    },
                )
            }
        };

        section = self.finish(section);
        if self.config.defer {
            section.set_deferred(request);
            (section, Schedule::Deferred)
        } else {
            (section, Schedule::Eager(request))
        }
    }

    /// A lone section hands its subheader to the gadget header.
    fn finish(&self, mut section: Section) -> Section {
        if self.config.feeds.len() == 1 {
            section.hide_subheader();
        }
        section
    }
}

/// Feed URLs are configured with literal spaces at times.
fn feed_request_url(url: &str) -> String {
    url.trim().replace(' ', "+")
}
