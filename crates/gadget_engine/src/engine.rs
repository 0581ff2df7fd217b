use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use gadget_logging::{gadget_debug, gadget_error, gadget_warn};

use crate::decode::decode_text;
use crate::feed::parse_feed;
use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};
use crate::{ContentClass, EngineEvent, EngineStopped, FailureKind, FetchError, RequestId};

enum EngineCommand {
    FetchText {
        request: RequestId,
        url: String,
    },
    FetchFeed {
        request: RequestId,
        url: String,
        max_entries: Option<usize>,
    },
    Shutdown,
}

/// Runs fetches on a background tokio runtime; results come back as
/// [`EngineEvent`]s in completion order.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: FetchSettings) -> Self {
        Self::with_fetcher(Arc::new(ReqwestFetcher::new(settings)))
    }

    pub fn with_fetcher(fetcher: Arc<dyn Fetcher>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    gadget_error!("Failed to start fetch runtime: {}", err);
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                if matches!(command, EngineCommand::Shutdown) {
                    gadget_debug!("Fetch runtime shutting down");
                    break;
                }
                let fetcher = fetcher.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    if let Some(event) = handle_command(fetcher.as_ref(), command).await {
                        let _ = event_tx.send(event);
                    }
                });
            }
            // Dropping the runtime cancels unfinished fetches along with their
            // event senders.
        });

        Self { cmd_tx, event_rx }
    }

    pub fn fetch_text(&self, request: RequestId, url: impl Into<String>) {
        self.send(EngineCommand::FetchText {
            request,
            url: url.into(),
        });
    }

    pub fn fetch_feed(&self, request: RequestId, url: impl Into<String>, max_entries: Option<usize>) {
        self.send(EngineCommand::FetchFeed {
            request,
            url: url.into(),
            max_entries,
        });
    }

    /// Stops the runtime; outstanding fetches are abandoned.
    pub fn shutdown(&self) {
        self.send(EngineCommand::Shutdown);
    }

    /// Waits up to `timeout` for the next event. `Ok(None)` means nothing
    /// arrived in time.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<EngineEvent>, EngineStopped> {
        match self.event_rx.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(EngineStopped),
        }
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            gadget_warn!("Fetch runtime is gone; dropping command");
        }
    }
}

async fn handle_command(fetcher: &dyn Fetcher, command: EngineCommand) -> Option<EngineEvent> {
    let event = match command {
        EngineCommand::FetchText { request, url } => {
            let result = fetcher
                .fetch(&url, ContentClass::Text)
                .await
                .and_then(|output| {
                    decode_text(&output.bytes, output.metadata.content_type.as_deref())
                        .map(|decoded| decoded.text)
                        .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))
                });
            EngineEvent::TextFetched {
                request,
                url,
                result,
            }
        }
        EngineCommand::FetchFeed {
            request,
            url,
            max_entries,
        } => {
            let result = fetcher
                .fetch(&url, ContentClass::Feed)
                .await
                .and_then(|output| parse_feed(&output.bytes, &url, max_entries));
            EngineEvent::FeedFetched {
                request,
                url,
                result,
            }
        }
        EngineCommand::Shutdown => return None,
    };
    Some(event)
}
