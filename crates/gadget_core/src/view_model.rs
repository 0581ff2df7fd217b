use serde::Serialize;

use crate::section::{Section, SectionBody, SectionId, SectionType};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct GadgetViewModel {
    pub visible: bool,
    pub title: String,
    pub subscribe_url: Option<String>,
    pub css_url: Option<String>,
    pub add_button_url: Option<String>,
    pub sections: Vec<SectionView>,
    pub finished: usize,
    pub dirty: bool,
}

impl GadgetViewModel {
    pub fn expanded_sections(&self) -> Vec<SectionId> {
        self.sections
            .iter()
            .filter(|s| s.expanded)
            .map(|s| s.id)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionView {
    pub id: SectionId,
    pub section_type: SectionType,
    pub title: String,
    pub expanded: bool,
    pub loading: bool,
    pub subheader_visible: bool,
    pub subscribe_url: Option<String>,
    pub read_more_url: Option<String>,
    pub body: SectionBody,
}

impl From<&Section> for SectionView {
    fn from(section: &Section) -> Self {
        Self {
            id: section.id(),
            section_type: section.section_type(),
            title: section.title().to_string(),
            expanded: section.is_expanded(),
            loading: section.is_loading(),
            subheader_visible: section.subheader_visible(),
            subscribe_url: section.subscribe().map(str::to_string),
            read_more_url: section.read_more().map(str::to_string),
            body: section.body().clone(),
        }
    }
}
