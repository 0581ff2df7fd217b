use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use gadget_core::{update, GadgetState, Msg, SectionId};
use gadget_engine::FetchSettings;
use gadget_logging::{gadget_debug, gadget_error, gadget_info, gadget_warn};
use log::LevelFilter;

use super::config::load_config;
use super::effects::EffectRunner;
use super::logging::{self, LogDestination};
use super::render::render_page;

/// Renders a feed gadget to a static HTML page
#[derive(Parser, Debug)]
#[command(name = "feed-gadget")]
#[command(about = "Fetches the configured sources and renders the gadget as HTML", long_about = None)]
#[command(version)]
struct Args {
    /// Gadget configuration (RON)
    #[arg(short, long, value_name = "PATH", default_value = "gadget.ron")]
    config: PathBuf,

    /// Write the rendered page here instead of stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Seed for the random initial section (default: current time)
    #[arg(long)]
    seed: Option<u64>,

    /// Click a section's subheader once loading settles; repeatable
    #[arg(long = "open", value_name = "SECTION")]
    open: Vec<SectionId>,

    /// Advance a featured section's carousel by one; repeatable
    #[arg(long = "advance", value_name = "SECTION")]
    advance: Vec<SectionId>,

    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    log: LogDestination,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    /// Also write the final view model as JSON
    #[arg(long, value_name = "PATH")]
    dump_json: Option<PathBuf>,

    /// Give up on outstanding fetches after this many seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,
}

pub fn run_app() -> anyhow::Result<()> {
    let args = Args::parse();
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logging::initialize(args.log, level);

    let config = load_config(&args.config)?;
    let seed = args
        .seed
        .unwrap_or_else(|| Utc::now().timestamp_millis().unsigned_abs());
    let timeout = Duration::from_secs(args.timeout);
    let mut runner = EffectRunner::new(FetchSettings {
        request_timeout: timeout,
        ..FetchSettings::default()
    });

    let mut state = dispatch(GadgetState::new(config), Msg::Render { seed }, &mut runner);
    state = settle(state, &mut runner, timeout);
    for section in args.open {
        state = dispatch(state, Msg::SubheaderClicked { section }, &mut runner);
        state = settle(state, &mut runner, timeout);
    }
    for section in args.advance {
        state = dispatch(state, Msg::FeaturedNext { section }, &mut runner);
    }

    runner.shutdown();
    let signals = runner.signals();
    gadget_info!(
        "Done: render_complete={} revealed={} height_adjustments={}",
        signals.render_complete,
        signals.revealed,
        signals.height_adjustments
    );

    let view = state.view();
    let page = render_page(&view, state.messages(), Utc::now());
    match &args.output {
        Some(path) => {
            fs::write(path, page).with_context(|| format!("writing page to {}", path.display()))?
        }
        None => print!("{page}"),
    }
    if let Some(path) = &args.dump_json {
        let json = serde_json::to_string_pretty(&view).context("serializing view model")?;
        fs::write(path, json).with_context(|| format!("writing view model to {}", path.display()))?;
    }
    Ok(())
}

fn dispatch(state: GadgetState, msg: Msg, runner: &mut EffectRunner) -> GadgetState {
    let (mut state, effects) = update(state, msg);
    if state.consume_dirty() {
        gadget_debug!("View changed; {} effects", effects.len());
    }
    runner.enqueue(effects);
    state
}

/// Feeds fetch results back into the state until nothing is outstanding or
/// the deadline passes.
fn settle(mut state: GadgetState, runner: &mut EffectRunner, timeout: Duration) -> GadgetState {
    let deadline = Instant::now() + timeout;
    while !runner.is_idle() {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            gadget_warn!("Timed out waiting for fetches; rendering what arrived");
            break;
        }
        match runner.next_msg(remaining) {
            Ok(Some(msg)) => state = dispatch(state, msg, runner),
            Ok(None) => {}
            Err(err) => {
                gadget_error!("{}; rendering what arrived", err);
                break;
            }
        }
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use gadget_core::{Effect, FetchKind, FetchRequest, GadgetConfig};

    #[test]
    fn settle_returns_early_when_engine_stops() {
        let mut runner = EffectRunner::new(FetchSettings::default());
        runner.shutdown();
        runner.enqueue(vec![Effect::Fetch {
            section: 0,
            request: FetchRequest {
                url: "http://127.0.0.1:9/feed".to_string(),
                kind: FetchKind::Feed { max_entries: None },
            },
        }]);
        assert!(!runner.is_idle());

        let state = GadgetState::new(GadgetConfig::default());
        let started = Instant::now();
        let _state = settle(state, &mut runner, Duration::from_secs(30));
        assert!(started.elapsed() < Duration::from_secs(10));
        assert!(!runner.is_idle());
    }
}
