//! Tracing subscriber setup (M-LOG-STRUCTURED).
//!
//! Logs go to stderr so stdout carries only discovery output.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Build the filter: `RUST_LOG` when set, else the configured directive.
pub fn env_filter(cfg: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Later calls are ignored.
pub fn init(cfg: &LoggingConfig) {
    let base = fmt::layer().with_target(true).with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry().with(env_filter(cfg));

    let res = if cfg.json {
        registry.with(base.json()).try_init()
    } else {
        registry.with(base).try_init()
    };
    if let Err(e) = res {
        tracing::debug!("tracing already set: {e:?}");
    }
}
