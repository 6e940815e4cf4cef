#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

//! # firehose-sync
//!
//! Attach Lambda processors to the Kinesis Firehose delivery streams a
//! service definition declares.
//!
//! This library wires the workspace crates into lifecycle hooks and CLI
//! commands; the binary is a thin shell over it.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod hooks;

// Re-export workspace crates
pub use fhsync_core;
pub use fhsync_reconciler;

pub use config::SyncConfig;
pub use error::{Result, SyncError};
pub use hooks::{FirehosePlugin, HookOutcome, LifecycleHook};
