//! Tracing subscriber for the `osc` binary.
//!
//! Output goes to stderr as an indented span tree, so storyboard transitions
//! appear under the tick that caused them.

use std::sync::Once;

use tracing_subscriber::{prelude::*, EnvFilter};
use tracing_tree::HierarchicalLayer;

static TRACING_INIT: Once = Once::new();

/// Filter used by `--verbose` when `RUST_LOG` is unset.
const VERBOSE_FILTER: &str = "osc_eval=debug,oscr=info";

/// Install the subscriber if `RUST_LOG` is set or `verbose` is requested.
///
/// Safe to call more than once; only the first call has an effect.
pub fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if verbose {
            EnvFilter::new(VERBOSE_FILTER)
        } else {
            return;
        };
        tracing_subscriber::registry()
            .with(HierarchicalLayer::new(2).with_targets(true))
            .with(filter)
            .init();
    });
}
