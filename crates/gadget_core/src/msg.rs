use crate::feed::Feed;
use crate::section::SectionId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Draw the chrome and create every section. `seed` drives the random
    /// initial section choice.
    Render { seed: u64 },
    /// User clicked a section subheader.
    SubheaderClicked { section: SectionId },
    OpenSection { section: SectionId },
    CloseSection { section: SectionId },
    /// Text fetch finished; `None` when the fetch failed.
    TextLoaded {
        section: SectionId,
        url: String,
        text: Option<String>,
    },
    /// Feed fetch finished; `None` when the fetch failed.
    FeedLoaded {
        section: SectionId,
        url: String,
        feed: Option<Feed>,
    },
    FeaturedNext { section: SectionId },
    FeaturedPrevious { section: SectionId },
    /// Fallback for placeholder wiring.
    NoOp,
}
