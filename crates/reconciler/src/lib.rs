//! Reconciliation of Firehose delivery stream processors.
//!
//! For each validated firehose trigger the reconciler:
//! 1. Looks up the owning function (once per function)
//! 2. Describes the target delivery stream
//! 3. Derives a destination update from that snapshot
//! 4. Submits it, echoing the stream's version id
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use fhsync_core::{ServiceDefinition, validate};
//! use fhsync_reconciler::{FirehoseControlPlane, LambdaDirectory, Reconciler, load_sdk_config};
//!
//! let definition = ServiceDefinition::from_path("serverless.yml".as_ref(), None)?;
//! let functions = validate(&definition)?;
//!
//! let config = load_sdk_config(None, None).await;
//! let reconciler = Reconciler::new(
//!     Arc::new(LambdaDirectory::new(&config)),
//!     Arc::new(FirehoseControlPlane::new(&config)),
//! );
//! reconciler.reconcile_all(&functions).await?;
//! ```

#![forbid(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![forbid(clippy::panic)]

pub mod api;
pub mod aws;
pub mod error;
pub mod memory;
pub mod reconciler;
pub mod types;

// Re-export main types
pub use api::{ComputeDirectory, StreamControlPlane};
pub use aws::{FirehoseControlPlane, LambdaDirectory, load_sdk_config};
pub use error::{RemoteOperationError, Result};
pub use memory::{InMemoryComputeDirectory, InMemoryStreamControlPlane};
pub use reconciler::{Reconciler, build_destination_update, processor_parameters};
pub use types::{
    AppliedUpdate, DestinationUpdate, ProcessingConfiguration, Processor, ProcessorParameter,
    ProcessorParameterName, ProcessorType, ReconcileMode, ReconcileResult, RemoteComputeResource,
    RemoteStream, StreamDestination,
};
