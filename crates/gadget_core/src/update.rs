use gadget_logging::{gadget_debug, gadget_info, gadget_warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::assemble::FeedAssembler;
use crate::factory::{Schedule, SectionFactory};
use crate::feed::Feed;
use crate::markup::first_element_inner_html;
use crate::section::{SectionBody, SectionId, SectionType};
use crate::source::parse_source;
use crate::{Effect, GadgetState, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: GadgetState, msg: Msg) -> (GadgetState, Vec<Effect>) {
    let mut effects = Vec::new();
    match msg {
        Msg::Render { seed } => render(&mut state, seed, &mut effects),
        Msg::SubheaderClicked { section } => {
            let controller = state.controller();
            controller.toggle(state.sections_mut(), section, &mut effects);
            state.mark_dirty();
        }
        Msg::OpenSection { section } => {
            let controller = state.controller();
            controller.open(state.sections_mut(), section, &mut effects);
            state.mark_dirty();
        }
        Msg::CloseSection { section } => {
            let controller = state.controller();
            controller.close(state.sections_mut(), section, &mut effects);
            state.mark_dirty();
        }
        Msg::TextLoaded { section, url, text } => {
            if begin_load(&mut state, section, SectionType::Raw) {
                if let Some(target) = state.section_mut(section) {
                    target.set_content(text.as_deref().unwrap_or(""));
                }
                finish_load(&mut state, section, &url, &mut effects);
            }
        }
        Msg::FeedLoaded { section, url, feed } => {
            let Some(kind) = state.section(section).map(|s| s.section_type()) else {
                gadget_warn!("Feed result for unknown section {}", section);
                return (state, effects);
            };
            if begin_load(&mut state, section, kind) {
                match kind {
                    SectionType::Featured => apply_featured(&mut state, section, &url, feed.as_ref()),
                    _ => apply_feed(&mut state, section, feed.as_ref()),
                }
                finish_load(&mut state, section, &url, &mut effects);
            }
        }
        Msg::FeaturedNext { section } => {
            if let Some(carousel) = state.section_mut(section).and_then(|s| s.carousel_mut()) {
                carousel.next();
                state.mark_dirty();
            }
        }
        Msg::FeaturedPrevious { section } => {
            if let Some(carousel) = state.section_mut(section).and_then(|s| s.carousel_mut()) {
                carousel.previous();
                state.mark_dirty();
            }
        }
        Msg::NoOp => {}
    }

    (state, effects)
}

/// Draws the chrome and creates every section in configured order. Fetch
/// effects are only returned, so all sections exist before any fetch runs.
fn render(state: &mut GadgetState, seed: u64, effects: &mut Vec<Effect>) {
    if state.is_rendered() {
        gadget_warn!("Render requested twice; ignoring");
        return;
    }
    let pass = gadget_logging::begin_render_pass();
    state.mark_rendered();
    state.mark_dirty();

    let config = state.config().clone();
    state.set_gadget_title(&config.gadget_title);
    gadget_info!(
        "Render pass {} with {} sources (defer={})",
        pass,
        config.feeds.len(),
        config.defer
    );

    let factory = SectionFactory::new(&config);
    for (index, raw) in config.feeds.iter().enumerate() {
        let descriptor = parse_source(raw);
        gadget_debug!("Source {} classified as {:?}", index, descriptor.kind);
        let (section, schedule) = factory.create(index, &descriptor);
        let title = section.title().to_string();
        let subscribe = section.subscribe().map(str::to_string);
        state.push_section(descriptor, section);
        state.set_section_title(index, &title);
        if let Some(url) = subscribe {
            state.set_section_subscribe(index, &url);
        }

        match schedule {
            Schedule::Eager(request) => {
                if let Some(section) = state.section_mut(index) {
                    section.set_loading(true);
                }
                effects.push(Effect::Fetch {
                    section: index,
                    request,
                });
            }
            Schedule::Deferred => {}
            Schedule::Static { url } => state.record_finished(&url, index, effects),
        }
    }
    effects.push(Effect::RenderComplete);

    if let Some(open) = initial_section(state, seed) {
        let controller = state.controller();
        controller.open(state.sections_mut(), open, effects);
    }
    state.reveal_if_complete(effects);
}

/// `open_index` when in range, else a random section when asked for, else
/// the first one.
fn initial_section(state: &GadgetState, seed: u64) -> Option<SectionId> {
    let count = state.sections().len();
    if count == 0 {
        return None;
    }
    let config = state.config();
    if let Some(index) = config.open_index.filter(|i| *i < count) {
        return Some(index);
    }
    if config.random && count > 1 {
        return Some(StdRng::seed_from_u64(seed).gen_range(0..count));
    }
    Some(0)
}

/// Checks that a result is expected for this section and clears its
/// loading state.
fn begin_load(state: &mut GadgetState, id: SectionId, expected: SectionType) -> bool {
    let Some(section) = state.section_mut(id) else {
        gadget_warn!("Fetch result for unknown section {}", id);
        return false;
    };
    if !section.is_loading() || section.section_type() != expected {
        gadget_warn!("Unexpected fetch result for section {}", id);
        return false;
    }
    section.set_loading(false);
    true
}

fn apply_feed(state: &mut GadgetState, id: SectionId, feed: Option<&Feed>) {
    if let Some(feed) = feed {
        let untitled = state.section(id).is_some_and(|s| s.title().is_empty());
        if untitled {
            if let Some(title) = feed.title.as_deref() {
                state.set_section_title(id, title);
            }
        }
        let link = feed.home_link();
        state.set_section_subscribe(id, &link);
        if let Some(section) = state.section_mut(id) {
            section.set_read_more(&link);
        }
    } else {
        gadget_warn!("Feed for section {} failed to load", id);
    }

    let max_entries = max_entries_for(state, id);
    let entries: Vec<_> = FeedAssembler::new(state.messages())
        .assemble(feed, max_entries)
        .collect();
    if let Some(section) = state.section_mut(id) {
        section.push_entries(entries);
    }
}

fn apply_featured(state: &mut GadgetState, id: SectionId, url: &str, feed: Option<&Feed>) {
    let max_entries = max_entries_for(state, id);
    let error = state.messages().get("error.loading").to_string();
    state.set_section_subscribe(id, url);
    let Some(carousel) = state.section_mut(id).and_then(|s| s.carousel_mut()) else {
        return;
    };
    match feed {
        Some(feed) => {
            carousel.features = feed
                .entries
                .iter()
                .take(max_entries.unwrap_or(usize::MAX))
                .map(|entry| first_element_inner_html(entry.summary.as_deref().unwrap_or("")))
                .collect();
            carousel.current = 0;
        }
        None => {
            gadget_warn!("Featured feed for section {} failed to load", id);
            carousel.error = Some(error);
        }
    }
}

fn max_entries_for(state: &GadgetState, id: SectionId) -> Option<usize> {
    let config = state.config();
    let cap = match state.section(id).map(|s| s.body()) {
        Some(SectionBody::Featured(_)) => config.max_featured_feeds,
        _ => config.max_feeds,
    };
    cap.map(|n| n as usize)
}

/// Shared tail of every fetch completion: post-process, finish a pending
/// reveal, record completion.
fn finish_load(state: &mut GadgetState, id: SectionId, url: &str, effects: &mut Vec<Effect>) {
    if let Some(section) = state.section_mut(id) {
        section.post_process();
    }
    let controller = state.controller();
    controller.complete_reveal(state.sections_mut(), id, effects);
    state.record_finished(url, id, effects);
    state.mark_dirty();
    gadget_debug!(
        "Pass {}: section {} finished ({} of {} sources)",
        gadget_logging::render_pass(),
        id,
        state.tracker().finished().len(),
        state.sources().len()
    );
}

