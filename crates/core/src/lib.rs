//! Service definition model, trigger scanner, and validation for firehose-sync.
//!
//! Everything in this crate is pure: loading parses an in-memory or on-disk
//! document, and [`validate`] checks every firehose trigger before any remote
//! reconciliation is allowed to start.

#![forbid(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![forbid(clippy::panic)]

pub mod definition;
pub mod error;
pub mod scanner;

pub use definition::{
    DEFAULT_STAGE, FIREHOSE_KIND, FirehoseTrigger, FunctionSpec, ServiceDefinition, Trigger,
    TuningKey,
};
pub use error::{ConfigurationError, Error, Result};
pub use scanner::{
    TriggeredFunction, ValidatedFunction, ValidatedTrigger, select_triggered_functions,
    trigger_count, validate,
};
