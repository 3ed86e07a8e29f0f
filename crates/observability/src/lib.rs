//! Tracing setup for processes embedding the engine.

use tracing_subscriber::EnvFilter;

/// Filter applied when `RUST_LOG` is unset: the medledger crates at debug,
/// everything else at info.
const DEFAULT_FILTER: &str = "info,medledger_engine=debug,medledger_ledger=debug,\
                              medledger_orders=debug,medledger_store=debug";

/// Install the global JSON subscriber with the default filter.
///
/// Later calls are no-ops, so embedders and test harnesses can both call
/// this unconditionally.
pub fn init() {
    init_with_filter(DEFAULT_FILTER);
}

/// Install the global JSON subscriber, falling back to `default` when
/// `RUST_LOG` is unset.
pub fn init_with_filter(default: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_current_span(false)
        .with_target(true)
        .try_init();
}
