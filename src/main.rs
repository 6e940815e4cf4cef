//! # firehose-sync
//!
//! Entry point. Two phases, never interleaved:
//!
//! 1. **Validate** - load the service definition and check every firehose
//!    trigger names a delivery stream. No AWS calls.
//! 2. **Reconcile** - for each trigger, describe the stream and point its
//!    first destination's processor at the owning Lambda function.
//!
//! ## Error Handling
//!
//! Any failure exits non-zero with the full error chain. There are no
//! retries; a stale stream version is reported, not retried.
//!
//! ## Scheduling
//!
//! A current-thread runtime: all remote calls are issued concurrently as
//! futures on one task.

#![forbid(unsafe_code)]
#![forbid(clippy::unwrap_used)]
#![forbid(clippy::panic)]
#![deny(clippy::expect_used)]

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use firehose_sync::cli::Cli;
use firehose_sync::commands;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    commands::run(cli).await
}

/// Initialize tracing subscriber with environment filter.
///
/// Logs go to stderr so plan output on stdout stays machine-readable.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
