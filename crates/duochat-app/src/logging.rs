//! Tracing setup.
//!
//! The subscriber is installed before the config is read so the loader's
//! own log lines are kept; the filter is swapped once `[logging] level` is
//! known.

use std::io;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

/// Handle for replacing the active filter.
pub struct LogHandle {
    handle: reload::Handle<EnvFilter, Registry>,
}

impl LogHandle {
    /// Switch to `directive` on top of `RUST_LOG`.
    pub fn apply(&self, directive: &str) {
        let (filter, rejected) = filter_from(EnvFilter::from_default_env(), directive);
        if let Err(e) = self.handle.reload(filter) {
            tracing::warn!("Failed to update log filter: {e}");
            return;
        }
        if rejected {
            tracing::warn!("Invalid log level directive '{directive}', using warn");
        }
    }
}

/// Add `directive` to `base`. An unparsable directive falls back to `warn`;
/// the flag reports that it was rejected.
pub fn filter_from(base: EnvFilter, directive: &str) -> (EnvFilter, bool) {
    match directive.parse() {
        Ok(directive) => (base.add_directive(directive), false),
        Err(_) => (base.add_directive(LevelFilter::WARN.into()), true),
    }
}

/// Install the global subscriber writing to stderr.
pub fn init(directive: &str) -> LogHandle {
    let (filter, rejected) = filter_from(EnvFilter::from_default_env(), directive);
    let (filter, handle) = reload::Layer::new(filter);
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();
    if rejected {
        tracing::warn!("Invalid log level directive '{directive}', using warn");
    }
    LogHandle { handle }
}
