use std::collections::BTreeMap;

use serde::Deserialize;

/// Everything the host page configures for one gadget instance.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct GadgetConfig {
    /// Ordered source strings, see [`crate::parse_source`].
    pub feeds: Vec<String>,
    /// Postpone each section's fetch until the section is first opened.
    pub defer: bool,
    /// Auto-open a random section instead of the first one.
    pub random: bool,
    /// Section to auto-open after the render pass.
    pub open_index: Option<usize>,
    /// Header title; `__MSG_<name>__` is resolved through the message bundle.
    pub gadget_title: String,
    pub css_url: Option<String>,
    /// Entry cap for standard feed sections.
    pub max_feeds: Option<u32>,
    /// Entry cap for featured sections.
    pub max_featured_feeds: Option<u32>,
    pub show_add_button: bool,
    /// Module URL used by the "add to your page" button.
    pub prod_gadget_url: String,
    /// `up_*` arguments forwarded by the add button.
    pub user_prefs: BTreeMap<String, String>,
    /// Slide instead of show/hide when sections change state.
    pub animate: bool,
    pub min_featured_chrome: bool,
    /// Cross-frame relay of the host page. Height adjustments are only
    /// requested when one is configured.
    pub layout_relay: Option<String>,
    /// Overrides for the built-in message bundle.
    pub messages: BTreeMap<String, String>,
}

impl GadgetConfig {
    pub fn with_feeds<I, S>(feeds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            feeds: feeds.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// URL of the "add this gadget to your page" button, if enabled.
    pub fn add_button_url(&self) -> Option<String> {
        if !self.show_add_button {
            return None;
        }
        let mut url = format!(
            "http://fusion.google.com/ig/add?synd=open&source=ggyp&moduleurl={}",
            self.prod_gadget_url
        );
        for (key, value) in self.user_prefs.iter().filter(|(k, _)| k.starts_with("up_")) {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(value);
        }
        Some(url)
    }
}

#[cfg(test)]
mod tests {
    use super::GadgetConfig;

    #[test]
    fn add_button_disabled_by_default() {
        assert_eq!(GadgetConfig::default().add_button_url(), None);
    }

    #[test]
    fn add_button_forwards_only_user_prefs() {
        let mut config = GadgetConfig {
            show_add_button: true,
            prod_gadget_url: "http://host/gadget.xml".to_string(),
            ..GadgetConfig::default()
        };
        config.user_prefs.insert("up_feeds".into(), "a".into());
        config.user_prefs.insert("lang".into(), "en".into());

        assert_eq!(
            config.add_button_url().as_deref(),
            Some(
                "http://fusion.google.com/ig/add?synd=open&source=ggyp\
                 &moduleurl=http://host/gadget.xml&up_feeds=a"
            )
        );
    }
}
