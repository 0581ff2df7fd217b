use crate::completion::CompletionTracker;
use crate::config::GadgetConfig;
use crate::controller::SectionController;
use crate::effect::Effect;
use crate::messages::MessageBundle;
use crate::section::{Section, SectionId};
use crate::source::SourceDescriptor;
use crate::view_model::{GadgetViewModel, SectionView};

/// Gadget-level header; a lone section promotes its title and subscribe
/// link here.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GadgetHeader {
    pub title: String,
    pub subscribe_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GadgetState {
    config: GadgetConfig,
    messages: MessageBundle,
    sources: Vec<SourceDescriptor>,
    sections: Vec<Section>,
    tracker: CompletionTracker,
    header: GadgetHeader,
    rendered: bool,
    visible: bool,
    dirty: bool,
}

impl GadgetState {
    pub fn new(config: GadgetConfig) -> Self {
        let messages = MessageBundle::with_overrides(&config.messages);
        let tracker = CompletionTracker::new(config.defer, config.feeds.len());
        Self {
            config,
            messages,
            tracker,
            ..Self::default()
        }
    }

    pub fn view(&self) -> GadgetViewModel {
        GadgetViewModel {
            visible: self.visible,
            title: self.header.title.clone(),
            subscribe_url: self.header.subscribe_url.clone(),
            css_url: self.config.css_url.clone(),
            add_button_url: self.config.add_button_url(),
            sections: self.sections.iter().map(SectionView::from).collect(),
            finished: self.tracker.finished().len(),
            dirty: self.dirty,
        }
    }

    pub fn config(&self) -> &GadgetConfig {
        &self.config
    }

    pub fn messages(&self) -> &MessageBundle {
        &self.messages
    }

    pub fn sources(&self) -> &[SourceDescriptor] {
        &self.sources
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.get(id)
    }

    pub fn tracker(&self) -> &CompletionTracker {
        &self.tracker
    }

    pub fn header(&self) -> &GadgetHeader {
        &self.header
    }

    pub fn is_rendered(&self) -> bool {
        self.rendered
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn controller(&self) -> SectionController {
        SectionController {
            animate: self.config.animate,
            adjust_height: self.config.layout_relay.is_some(),
        }
    }

    pub(crate) fn sections_mut(&mut self) -> &mut [Section] {
        &mut self.sections
    }

    pub(crate) fn section_mut(&mut self, id: SectionId) -> Option<&mut Section> {
        self.sections.get_mut(id)
    }

    pub(crate) fn mark_rendered(&mut self) {
        self.rendered = true;
    }

    pub(crate) fn set_gadget_title(&mut self, value: &str) {
        self.header.title = self.messages.resolve(value);
    }

    /// Sources and sections are pushed together so their counts never drift.
    pub(crate) fn push_section(&mut self, source: SourceDescriptor, section: Section) {
        self.sources.push(source);
        self.sections.push(section);
    }

    /// Sets a section title, routing it to the gadget header when the
    /// section's own subheader is hidden.
    pub(crate) fn set_section_title(&mut self, id: SectionId, value: &str) {
        let resolved = self.messages.resolve(value);
        let Some(section) = self.sections.get_mut(id) else {
            return;
        };
        if !section.subheader_visible() {
            self.header.title = resolved.clone();
        }
        section.set_title(resolved);
    }

    pub(crate) fn set_section_subscribe(&mut self, id: SectionId, url: &str) {
        let Some(section) = self.sections.get_mut(id) else {
            return;
        };
        section.set_subscribe(url);
        if !section.subheader_visible() {
            if let Some(promoted) = section.subscribe() {
                self.header.subscribe_url = Some(promoted.to_string());
            }
        }
    }

    /// Records a finished source and reveals the gadget when that completes it.
    pub(crate) fn record_finished(&mut self, url: &str, id: SectionId, effects: &mut Vec<Effect>) {
        if self.tracker.record_finished(url, id) {
            self.reveal(effects);
        }
    }

    pub(crate) fn reveal_if_complete(&mut self, effects: &mut Vec<Effect>) {
        if self.tracker.take_completion() {
            self.reveal(effects);
        }
    }

    fn reveal(&mut self, effects: &mut Vec<Effect>) {
        self.visible = true;
        effects.push(Effect::RevealGadget);
        if self.config.layout_relay.is_some() {
            effects.push(Effect::AdjustHeight);
        }
    }
}
