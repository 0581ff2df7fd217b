#![deny(missing_docs)]
//! Shared logging utilities for the feed gadget workspace.
//!
//! This crate provides the `gadget_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger.

use std::cell::Cell;

thread_local! {
    /// Render pass counter for the gadget driven on the current thread.
    static RENDER_PASS: Cell<u64> = const { Cell::new(0) };
}

/// Records that a new render pass started on the current thread.
/// Returns the new pass number.
pub fn begin_render_pass() -> u64 {
    RENDER_PASS.with(|v| {
        let next = v.get() + 1;
        v.set(next);
        next
    })
}

/// Retrieves the render pass number for the current thread.
/// Returns 0 if no render pass has started.
pub fn render_pass() -> u64 {
    RENDER_PASS.with(|v| v.get())
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! gadget_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! gadget_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! gadget_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! gadget_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! gadget_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Another test may already own the global logger.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

#[cfg(test)]
mod tests {
    use super::{begin_render_pass, render_pass};

    #[test]
    fn render_pass_counts_per_thread() {
        let before = render_pass();
        assert_eq!(begin_render_pass(), before + 1);
        assert_eq!(render_pass(), before + 1);
    }
}
