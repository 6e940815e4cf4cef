//! Seams to the remote control planes.
//!
//! The reconciler only ever talks to these traits. [`crate::aws`] backs them
//! with the AWS SDK; [`crate::memory`] backs them with recorded in-process
//! state for tests and dry runs against fixtures.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{DestinationUpdate, RemoteComputeResource, RemoteStream};

/// Directory of deployed compute functions.
#[async_trait]
pub trait ComputeDirectory: Send + Sync {
    /// Look up a deployed function by name.
    async fn get_function(&self, name: &str) -> Result<RemoteComputeResource>;
}

/// Delivery stream control plane.
#[async_trait]
pub trait StreamControlPlane: Send + Sync {
    /// Fetch the current version and destinations of a stream.
    async fn describe_stream(&self, name: &str) -> Result<RemoteStream>;

    /// Submit a destination update. Rejected if the version id is stale.
    async fn update_destination(&self, update: &DestinationUpdate) -> Result<()>;
}
