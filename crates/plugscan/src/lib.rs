//! plugscan library - expose modules for testing
//!
//! The binary is a thin dispatcher over the command handlers defined here.

pub mod commands;
pub mod common;
pub mod errors;

pub use common::GlobalOpts;
pub use errors::CliError;
pub use plugscan_logger as logger;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the `tracing` subscriber used by the library crates
///
/// `RUST_LOG` wins over the filter derived from the CLI verbosity.
pub fn init_tracing(opts: &GlobalOpts) {
    let default_filter = if opts.quiet {
        "error".to_string()
    } else {
        logger::verbosity_to_filter()
    };
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .try_init();
}
