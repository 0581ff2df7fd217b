use crate::section::SectionId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishedRecord {
    pub url: String,
    pub section: SectionId,
}

/// Tracks finished sources and decides when the gadget is complete.
///
/// With `defer` set a single record is enough, since deferred sections only
/// load when opened. Otherwise every source must have reported. The
/// completion signal is handed out exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompletionTracker {
    defer: bool,
    expected: usize,
    finished: Vec<FinishedRecord>,
    fired: bool,
}

impl CompletionTracker {
    pub fn new(defer: bool, expected: usize) -> Self {
        Self {
            defer,
            expected,
            finished: Vec::new(),
            fired: false,
        }
    }

    /// Appends a record. Returns true when this record completed the gadget.
    pub fn record_finished(&mut self, url: impl Into<String>, section: SectionId) -> bool {
        self.finished.push(FinishedRecord {
            url: url.into(),
            section,
        });
        self.take_completion()
    }

    pub fn is_complete(&self) -> bool {
        if self.expected == 0 {
            return true;
        }
        if self.defer {
            !self.finished.is_empty()
        } else {
            self.finished.len() >= self.expected
        }
    }

    /// Returns true once, on the first call that observes completion.
    pub fn take_completion(&mut self) -> bool {
        if self.fired || !self.is_complete() {
            return false;
        }
        self.fired = true;
        true
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    pub fn finished(&self) -> &[FinishedRecord] {
        &self.finished
    }
}
