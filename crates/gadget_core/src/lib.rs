//! Feed gadget core: pure section lifecycle and content orchestration.
mod assemble;
mod completion;
mod config;
mod controller;
mod effect;
mod factory;
mod feed;
mod markup;
mod messages;
mod msg;
mod section;
mod source;
mod state;
mod update;
mod view_model;

pub use assemble::{Entries, EntryView, FeedAssembler, FeedEntry, SNIPPET_LIMIT};
pub use completion::{CompletionTracker, FinishedRecord};
pub use config::GadgetConfig;
pub use controller::SectionController;
pub use effect::Effect;
pub use factory::{Schedule, SectionFactory};
pub use feed::{Feed, FeedItem};
pub use markup::{escape_html, scrub_url};
pub use messages::MessageBundle;
pub use msg::Msg;
pub use section::{
    Carousel, FetchKind, FetchRequest, Section, SectionBody, SectionId, SectionType,
};
pub use source::{parse_source, SourceDescriptor, SourceKind};
pub use state::{GadgetHeader, GadgetState};
pub use update::update;
pub use view_model::{GadgetViewModel, SectionView};
