use std::sync::Once;

use gadget_core::{update, Effect, Feed, FeedItem, GadgetConfig, GadgetState, Msg};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(gadget_logging::initialize_for_tests);
}

fn feed_loaded(state: GadgetState, section: usize, feed: Option<Feed>) -> (GadgetState, Vec<Effect>) {
    let url = format!("http://feeds/{section}");
    update(state, Msg::FeedLoaded { section, url, feed })
}

fn reveal_count(effects: &[Effect]) -> usize {
    effects.iter().filter(|e| **e == Effect::RevealGadget).count()
}

fn sample_feed() -> Feed {
    Feed {
        title: Some("Feed".to_string()),
        link: None,
        url: Some("http://feeds/x".to_string()),
        entries: vec![FeedItem {
            title: Some("Entry".to_string()),
            summary: Some("Body".to_string()),
            ..FeedItem::default()
        }],
    }
}

#[test]
fn eager_gadget_reveals_after_every_feed_reported() {
    init_logging();
    let config = GadgetConfig::with_feeds(["http://feeds/0", "http://feeds/1", "http://feeds/2"]);
    let (mut state, effects) = update(GadgetState::new(config), Msg::Render { seed: 0 });
    let mut reveals = reveal_count(&effects);

    // Completion order is arbitrary.
    for section in [2, 0, 1] {
        assert_eq!(reveals, 0, "revealed before all feeds reported");
        let (next, effects) = feed_loaded(state, section, Some(sample_feed()));
        state = next;
        reveals += reveal_count(&effects);
    }

    assert_eq!(reveals, 1);
    assert!(state.is_visible());
    assert_eq!(state.tracker().finished().len(), 3);
}

#[test]
fn failed_feeds_still_count_as_finished() {
    init_logging();
    let config = GadgetConfig::with_feeds(["http://feeds/0", "http://feeds/1"]);
    let (state, _effects) = update(GadgetState::new(config), Msg::Render { seed: 0 });
    let (state, effects) = feed_loaded(state, 0, None);
    assert_eq!(reveal_count(&effects), 0);
    let (state, effects) = feed_loaded(state, 1, None);
    assert_eq!(reveal_count(&effects), 1);
    assert!(state.is_visible());
}

#[test]
fn deferred_gadget_reveals_on_first_record_only() {
    init_logging();
    let config = GadgetConfig {
        defer: true,
        ..GadgetConfig::with_feeds(["http://feeds/0", "http://feeds/1", "http://feeds/2"])
    };
    let (state, effects) = update(GadgetState::new(config), Msg::Render { seed: 0 });
    // Only the auto-opened section fetches.
    let fetches: Vec<_> = effects
        .iter()
        .filter(|e| matches!(e, Effect::Fetch { .. }))
        .collect();
    assert_eq!(fetches.len(), 1);
    assert!(!state.is_visible());

    let (state, effects) = feed_loaded(state, 0, Some(sample_feed()));
    assert_eq!(reveal_count(&effects), 1);
    assert!(state.is_visible());

    let (state, effects) = update(state, Msg::SubheaderClicked { section: 1 });
    assert!(effects.iter().any(|e| matches!(e, Effect::Fetch { section: 1, .. })));
    let (state, effects) = feed_loaded(state, 1, Some(sample_feed()));
    assert_eq!(reveal_count(&effects), 0);
    assert_eq!(state.tracker().finished().len(), 2);
}

#[test]
fn duplicate_results_are_ignored() {
    init_logging();
    let config = GadgetConfig::with_feeds(["http://feeds/0", "http://feeds/1"]);
    let (state, _effects) = update(GadgetState::new(config), Msg::Render { seed: 0 });
    let (state, _effects) = feed_loaded(state, 0, Some(sample_feed()));
    let (state, effects) = feed_loaded(state, 0, Some(sample_feed()));

    assert!(effects.is_empty());
    assert_eq!(state.tracker().finished().len(), 1);
    assert_eq!(state.sections()[0].entries().len(), 1);
    assert!(!state.is_visible());
}

#[test]
fn results_for_unknown_sections_are_ignored() {
    init_logging();
    let config = GadgetConfig::with_feeds(["http://feeds/0"]);
    let (state, _effects) = update(GadgetState::new(config), Msg::Render { seed: 0 });
    let (state, effects) = feed_loaded(state, 9, Some(sample_feed()));
    assert!(effects.is_empty());
    assert!(state.tracker().finished().is_empty());
}
