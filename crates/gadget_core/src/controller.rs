//! Open/close/toggle transitions for the sections of one gadget.
//!
//! At most one section is expanded at a time. Opening a section that still
//! has its deferred load issues the fetch first; the section is revealed
//! once that fetch reports back through [`SectionController::complete_reveal`].

use gadget_logging::gadget_debug;

use crate::effect::Effect;
use crate::section::{Section, SectionId};

#[derive(Debug, Clone, Copy, Default)]
pub struct SectionController {
    pub animate: bool,
    /// Whether height adjustments reach the host at all.
    pub adjust_height: bool,
}

impl SectionController {
    pub fn open(&self, sections: &mut [Section], id: SectionId, effects: &mut Vec<Effect>) {
        let Some(section) = sections.get_mut(id) else {
            return;
        };
        if let Some(request) = section.take_deferred() {
            gadget_debug!("Section {} opening, deferred fetch of {}", id, request.url);
            section.set_loading(true);
            section.set_pending_reveal(true);
            effects.push(Effect::Fetch {
                section: id,
                request,
            });
        } else {
            self.reveal(section, effects);
        }
        self.adjust(effects);
    }

    pub fn close(&self, sections: &mut [Section], id: SectionId, effects: &mut Vec<Effect>) {
        let Some(section) = sections.get_mut(id) else {
            return;
        };
        section.set_pending_reveal(false);
        if section.is_expanded() {
            section.set_expanded(false);
            effects.push(Effect::HideSection {
                section: id,
                animate: self.animate,
            });
        }
        self.adjust(effects);
    }

    /// Flips one section, then closes every other open section.
    pub fn toggle(&self, sections: &mut [Section], id: SectionId, effects: &mut Vec<Effect>) {
        let Some(section) = sections.get(id) else {
            return;
        };
        if section.is_expanded() {
            self.close(sections, id, effects);
        } else {
            self.open(sections, id, effects);
        }
        self.close_others(sections, id, effects);
        self.adjust(effects);
    }

    /// Finishes an open that waited for its deferred fetch. A close in the
    /// meantime cancels the reveal.
    pub fn complete_reveal(&self, sections: &mut [Section], id: SectionId, effects: &mut Vec<Effect>) {
        let pending = sections.get(id).is_some_and(Section::is_pending_reveal);
        if !pending {
            return;
        }
        self.close_others(sections, id, effects);
        if let Some(section) = sections.get_mut(id) {
            self.reveal(section, effects);
        }
        self.adjust(effects);
    }

    fn close_others(&self, sections: &mut [Section], id: SectionId, effects: &mut Vec<Effect>) {
        let others: Vec<SectionId> = sections
            .iter()
            .filter(|s| s.id() != id && (s.is_expanded() || s.is_pending_reveal()))
            .map(Section::id)
            .collect();
        for other in others {
            self.close(sections, other, effects);
        }
    }

    fn reveal(&self, section: &mut Section, effects: &mut Vec<Effect>) {
        section.set_pending_reveal(false);
        if !section.is_expanded() {
            section.set_expanded(true);
            effects.push(Effect::ShowSection {
                section: section.id(),
                animate: self.animate,
            });
        }
    }

    fn adjust(&self, effects: &mut Vec<Effect>) {
        if self.adjust_height && effects.last() != Some(&Effect::AdjustHeight) {
            effects.push(Effect::AdjustHeight);
        }
    }
}
