//! Gadget engine: HTTP retrieval, charset decoding and feed parsing on a
//! background runtime.
mod decode;
mod engine;
mod feed;
mod fetch;
mod types;

pub use decode::{decode_text, DecodeError, DecodedText};
pub use engine::EngineHandle;
pub use feed::{parse_feed, ParsedEntry, ParsedFeed};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use types::{
    ContentClass, EngineEvent, EngineStopped, FailureKind, FetchError, FetchMetadata, FetchOutput,
    RequestId,
};
