use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

static MSG_REF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"__MSG_(.*?)__").expect("valid message reference regex"));

const DEFAULT_MESSAGES: &[(&str, &str)] = &[
    ("blogs", "Blogs"),
    ("loading", "loading..."),
    ("subscribe", "Subscribe"),
    ("read.more", "Read more"),
    ("error.loading", "Error loading feed!"),
    ("previous", "Previous"),
    ("next", "Next"),
    ("add", "Add to your page"),
    ("month.0", "January"),
    ("month.1", "February"),
    ("month.2", "March"),
    ("month.3", "April"),
    ("month.4", "May"),
    ("month.5", "June"),
    ("month.6", "July"),
    ("month.7", "August"),
    ("month.8", "September"),
    ("month.9", "October"),
    ("month.10", "November"),
    ("month.11", "December"),
];

/// Localized message lookup. Unknown keys resolve to an empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBundle {
    messages: BTreeMap<String, String>,
}

impl Default for MessageBundle {
    fn default() -> Self {
        Self {
            messages: DEFAULT_MESSAGES
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl MessageBundle {
    /// Default bundle with the given overrides applied on top.
    pub fn with_overrides(overrides: &BTreeMap<String, String>) -> Self {
        let mut bundle = Self::default();
        for (key, value) in overrides {
            bundle.messages.insert(key.clone(), value.clone());
        }
        bundle
    }

    pub fn get(&self, key: &str) -> &str {
        self.messages.get(key).map(String::as_str).unwrap_or("")
    }

    /// Zero-based month name.
    pub fn month(&self, month0: u32) -> &str {
        self.get(&format!("month.{month0}"))
    }

    /// Resolves a `__MSG_<name>__` reference, otherwise returns the value.
    pub fn resolve(&self, value: &str) -> String {
        match MSG_REF_RE.captures(value) {
            Some(caps) => self.get(&caps[1]).to_string(),
            None => value.to_string(),
        }
    }
}
