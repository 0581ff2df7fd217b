use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;

use futures_util::StreamExt;
use gadget_logging::gadget_debug;
use reqwest::header::{ACCEPT, CONTENT_TYPE};

use crate::{ContentClass, FailureKind, FetchError, FetchMetadata, FetchOutput};

const FEED_TYPES: &[&str] = &[
    "application/rss+xml",
    "application/atom+xml",
    "application/rdf+xml",
    "application/xml",
    "text/xml",
];
const TEXT_TYPES: &[&str] = &["text/html", "text/plain", "application/xhtml+xml"];

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    /// Media types accepted for feed fetches. Empty accepts anything.
    pub feed_content_types: Vec<String>,
    /// Media types accepted for text fetches. Empty accepts anything.
    pub text_content_types: Vec<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 2 * 1024 * 1024,
            feed_content_types: FEED_TYPES.iter().map(|t| t.to_string()).collect(),
            text_content_types: TEXT_TYPES.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl FetchSettings {
    fn content_types(&self, class: ContentClass) -> &[String] {
        match class {
            ContentClass::Feed => &self.feed_content_types,
            ContentClass::Text => &self.text_content_types,
        }
    }
}

#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    /// Retrieves `url`, expecting a body of the given class.
    async fn fetch(&self, url: &str, class: ContentClass) -> Result<FetchOutput, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    fn client(&self, redirects: Arc<AtomicUsize>) -> Result<reqwest::Client, FetchError> {
        let limit = self.settings.redirect_limit;
        let policy = reqwest::redirect::Policy::custom(move |attempt| {
            let hops = attempt.previous().len();
            redirects.store(hops, Ordering::Relaxed);
            if hops >= limit {
                attempt.error("redirect limit exceeded")
            } else {
                attempt.follow()
            }
        });

        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .redirect(policy)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))
    }

    /// `Accept` header advertising the allowed types of a class.
    fn accept_header(&self, class: ContentClass) -> String {
        let types = self.settings.content_types(class);
        if types.is_empty() {
            "*/*".to_string()
        } else {
            format!("{}, */*;q=0.1", types.join(", "))
        }
    }

    /// A missing Content-Type header is accepted; servers omit it for static
    /// files often enough.
    fn check_content_type(&self, class: ContentClass, content_type: Option<&str>) -> Result<(), FetchError> {
        let allowed = self.settings.content_types(class);
        let Some(raw) = content_type else {
            return Ok(());
        };
        let media_type = raw.split(';').next().unwrap_or(raw).trim();
        if allowed.is_empty() || allowed.iter().any(|t| t.eq_ignore_ascii_case(media_type)) {
            return Ok(());
        }
        Err(FetchError::new(
            FailureKind::UnsupportedContentType {
                content_type: media_type.to_string(),
            },
            format!("{class:?} fetch got {raw}"),
        ))
    }

    fn too_large(&self, actual: u64) -> FetchError {
        FetchError::new(
            FailureKind::TooLarge {
                max_bytes: self.settings.max_bytes,
                actual: Some(actual),
            },
            "response too large",
        )
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str, class: ContentClass) -> Result<FetchOutput, FetchError> {
        let target = url::Url::parse(url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if !matches!(target.scheme(), "http" | "https") {
            return Err(FetchError::new(
                FailureKind::InvalidUrl,
                format!("unsupported scheme {}", target.scheme()),
            ));
        }

        let redirects = Arc::new(AtomicUsize::new(0));
        let response = self
            .client(redirects.clone())?
            .get(target)
            .header(ACCEPT, self.accept_header(class))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        if let Some(declared) = response.content_length().filter(|n| *n > self.settings.max_bytes) {
            return Err(self.too_large(declared));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        self.check_content_type(class, content_type.as_deref())?;
        let final_url = response.url().to_string();

        let mut bytes = Vec::new();
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let received = (bytes.len() + chunk.len()) as u64;
            if received > self.settings.max_bytes {
                return Err(self.too_large(received));
            }
            bytes.extend_from_slice(&chunk);
        }
        gadget_debug!("Fetched {} bytes of {:?} from {}", bytes.len(), class, final_url);

        Ok(FetchOutput {
            metadata: FetchMetadata {
                original_url: url.to_string(),
                final_url,
                redirect_count: redirects.load(Ordering::Relaxed),
                content_type,
                byte_len: bytes.len() as u64,
            },
            bytes,
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    let kind = if err.is_timeout() {
        FailureKind::Timeout
    } else if err.is_redirect() {
        FailureKind::RedirectLimitExceeded
    } else {
        FailureKind::Network
    };
    FetchError::new(kind, err.to_string())
}
