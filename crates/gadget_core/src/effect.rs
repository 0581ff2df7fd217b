use crate::section::{FetchRequest, SectionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Issue a fetch; the result comes back as `Msg::TextLoaded` or
    /// `Msg::FeedLoaded` for the same section.
    Fetch {
        section: SectionId,
        request: FetchRequest,
    },
    /// Visually open a section's content.
    ShowSection { section: SectionId, animate: bool },
    /// Visually close a section's content.
    HideSection { section: SectionId, animate: bool },
    /// Every section exists; fired once per render pass.
    RenderComplete,
    /// Completion policy satisfied; the gadget becomes visible. Fired once.
    RevealGadget,
    /// Ask the host to recalculate the gadget's height.
    AdjustHeight,
}
