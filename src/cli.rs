//! CLI command definitions using clap.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// firehose-sync - attach Lambda processors to Firehose delivery streams
#[derive(Parser, Debug)]
#[command(name = "firehose-sync")]
#[command(version)]
#[command(about = "Attach Lambda processors to Kinesis Firehose delivery streams")]
#[command(
    long_about = "Reads a service definition, validates its firehose triggers, and points each delivery stream's processor at the owning Lambda function."
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Service definition file (YAML or JSON)
    #[arg(short, long, global = true, env = "FHSYNC_DEFINITION")]
    pub definition: Option<PathBuf>,

    /// Deployment stage
    #[arg(short, long, global = true, env = "FHSYNC_STAGE")]
    pub stage: Option<String>,

    /// AWS region
    #[arg(long, global = true, env = "FHSYNC_REGION")]
    pub region: Option<String>,

    /// AWS shared-config profile
    #[arg(long, global = true, env = "FHSYNC_PROFILE")]
    pub profile: Option<String>,

    /// Tool configuration file (TOML or JSON)
    #[arg(short, long, global = true, env = "FHSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Debug-level logging
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate firehose triggers without touching AWS
    Validate,

    /// Validate, then attach processors to every referenced stream
    Sync {
        /// Print the updates instead of submitting them
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },

    /// Run a deployment lifecycle hook by name
    Hook {
        /// Hook name, e.g. before:deploy:finalize
        name: String,

        /// Print the updates instead of submitting them
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },

    /// List the lifecycle hooks this tool answers to
    Hooks,
}
