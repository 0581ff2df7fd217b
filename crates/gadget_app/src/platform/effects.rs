use std::collections::HashMap;
use std::time::Duration;

use gadget_core::{Effect, Feed, FeedItem, FetchKind, Msg, SectionId};
use gadget_engine::{EngineEvent, EngineHandle, EngineStopped, FetchSettings, ParsedFeed, RequestId};
use gadget_logging::{gadget_debug, gadget_info, gadget_trace, gadget_warn};

/// Host-side signals observed while running effects.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostSignals {
    pub render_complete: bool,
    pub revealed: bool,
    pub height_adjustments: usize,
}

/// Executes core effects against the engine and turns engine events back
/// into messages.
pub struct EffectRunner {
    engine: EngineHandle,
    outstanding: HashMap<RequestId, SectionId>,
    next_request: RequestId,
    signals: HostSignals,
}

impl EffectRunner {
    pub fn new(settings: FetchSettings) -> Self {
        Self {
            engine: EngineHandle::new(settings),
            outstanding: HashMap::new(),
            next_request: 1,
            signals: HostSignals::default(),
        }
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Fetch { section, request } => {
                    let id = self.next_request;
                    self.next_request += 1;
                    self.outstanding.insert(id, section);
                    gadget_info!(
                        "Fetch request={} section={} url={}",
                        id,
                        section,
                        request.url
                    );
                    match request.kind {
                        FetchKind::Text => self.engine.fetch_text(id, request.url),
                        FetchKind::Feed { max_entries } => self.engine.fetch_feed(
                            id,
                            request.url,
                            max_entries.map(|n| n as usize),
                        ),
                    }
                }
                Effect::ShowSection { section, animate } => {
                    gadget_debug!("Show section {} (animate={})", section, animate);
                }
                Effect::HideSection { section, animate } => {
                    gadget_debug!("Hide section {} (animate={})", section, animate);
                }
                Effect::RenderComplete => {
                    self.signals.render_complete = true;
                    gadget_info!("Render complete");
                }
                Effect::RevealGadget => {
                    self.signals.revealed = true;
                    gadget_info!("All sources finished; gadget revealed");
                }
                Effect::AdjustHeight => {
                    self.signals.height_adjustments += 1;
                    gadget_trace!("Adjust height");
                }
            }
        }
    }

    pub fn is_idle(&self) -> bool {
        self.outstanding.is_empty()
    }

    pub fn signals(&self) -> HostSignals {
        self.signals
    }

    /// Waits up to `timeout` for the next fetch result. `Ok(None)` means
    /// nothing arrived in time.
    pub fn next_msg(&mut self, timeout: Duration) -> Result<Option<Msg>, EngineStopped> {
        let Some(event) = self.engine.recv_timeout(timeout)? else {
            return Ok(None);
        };
        let Some(section) = self.outstanding.remove(&event.request()) else {
            gadget_warn!("Dropping result for unknown request {}", event.request());
            return Ok(Some(Msg::NoOp));
        };
        Ok(Some(event_to_msg(section, event)))
    }

    pub fn shutdown(&self) {
        self.engine.shutdown();
    }
}

fn event_to_msg(section: SectionId, event: EngineEvent) -> Msg {
    match event {
        EngineEvent::TextFetched { url, result, .. } => {
            let text = match result {
                Ok(text) => Some(text),
                Err(err) => {
                    gadget_warn!("Text fetch of {} failed: {}", url, err);
                    None
                }
            };
            Msg::TextLoaded { section, url, text }
        }
        EngineEvent::FeedFetched { url, result, .. } => {
            let feed = match result {
                Ok(parsed) => Some(to_core_feed(parsed)),
                Err(err) => {
                    gadget_warn!("Feed fetch of {} failed: {}", url, err);
                    None
                }
            };
            Msg::FeedLoaded { section, url, feed }
        }
    }
}

fn to_core_feed(parsed: ParsedFeed) -> Feed {
    Feed {
        title: parsed.title,
        link: parsed.link,
        url: Some(parsed.url),
        entries: parsed
            .entries
            .into_iter()
            .map(|entry| FeedItem {
                title: entry.title,
                link: entry.link,
                summary: entry.summary,
                date: entry.date,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gadget_engine::{FailureKind, FetchError, ParsedEntry};

    #[test]
    fn failed_feed_becomes_missing_payload() {
        let msg = event_to_msg(
            3,
            EngineEvent::FeedFetched {
                request: 1,
                url: "http://x/rss".into(),
                result: Err(FetchError {
                    kind: FailureKind::HttpStatus(500),
                    message: "500".into(),
                }),
            },
        );
        assert_eq!(
            msg,
            Msg::FeedLoaded {
                section: 3,
                url: "http://x/rss".into(),
                feed: None
            }
        );
    }

    #[test]
    fn parsed_feed_keeps_request_url() {
        let feed = to_core_feed(ParsedFeed {
            title: Some("T".into()),
            link: None,
            url: "http://x/rss".into(),
            entries: vec![ParsedEntry {
                title: Some("E".into()),
                ..ParsedEntry::default()
            }],
        });
        assert_eq!(feed.url.as_deref(), Some("http://x/rss"));
        assert_eq!(feed.home_link(), "http://x/rss");
        assert_eq!(feed.entries[0].title.as_deref(), Some("E"));
    }
}
