//! In-memory control planes.
//!
//! Both record every call so callers can assert on what was fetched and
//! submitted. The stream control plane enforces version ids the way
//! Firehose does: an update carrying a stale version is rejected, an
//! accepted update bumps the version.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::api::{ComputeDirectory, StreamControlPlane};
use crate::error::{RemoteOperationError, Result};
use crate::types::{DestinationUpdate, RemoteComputeResource, RemoteStream};

/// In-memory function directory.
#[derive(Debug, Default)]
pub struct InMemoryComputeDirectory {
    functions: RwLock<HashMap<String, RemoteComputeResource>>,
    lookups: RwLock<Vec<String>>,
}

impl InMemoryComputeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a deployed function.
    #[must_use]
    pub fn with_function(mut self, resource: RemoteComputeResource) -> Self {
        self.functions
            .get_mut()
            .insert(resource.name.clone(), resource);
        self
    }

    /// Names looked up so far, in call order.
    pub async fn lookups(&self) -> Vec<String> {
        self.lookups.read().await.clone()
    }
}

#[async_trait]
impl ComputeDirectory for InMemoryComputeDirectory {
    async fn get_function(&self, name: &str) -> Result<RemoteComputeResource> {
        self.lookups.write().await.push(name.to_owned());

        self.functions
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| RemoteOperationError::function_lookup_failed(name, "function not found"))
    }
}

/// In-memory delivery stream control plane.
#[derive(Debug, Default)]
pub struct InMemoryStreamControlPlane {
    streams: RwLock<HashMap<String, RemoteStream>>,
    describes: RwLock<Vec<String>>,
    updates: RwLock<Vec<DestinationUpdate>>,
    rejected: HashSet<String>,
}

impl InMemoryStreamControlPlane {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a delivery stream.
    #[must_use]
    pub fn with_stream(mut self, stream: RemoteStream) -> Self {
        self.streams.get_mut().insert(stream.name.clone(), stream);
        self
    }

    /// Make every update to `name` fail.
    #[must_use]
    pub fn reject_updates_for(mut self, name: impl Into<String>) -> Self {
        self.rejected.insert(name.into());
        self
    }

    /// Streams described so far, in call order.
    pub async fn describes(&self) -> Vec<String> {
        self.describes.read().await.clone()
    }

    /// Accepted updates, in submission order.
    pub async fn updates(&self) -> Vec<DestinationUpdate> {
        self.updates.read().await.clone()
    }

    /// Current snapshot of a stream.
    pub async fn stream(&self, name: &str) -> Option<RemoteStream> {
        self.streams.read().await.get(name).cloned()
    }
}

#[async_trait]
impl StreamControlPlane for InMemoryStreamControlPlane {
    async fn describe_stream(&self, name: &str) -> Result<RemoteStream> {
        self.describes.write().await.push(name.to_owned());

        self.streams
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| RemoteOperationError::stream_lookup_failed(name, "stream not found"))
    }

    async fn update_destination(&self, update: &DestinationUpdate) -> Result<()> {
        let name = update.delivery_stream_name.as_str();

        if self.rejected.contains(name) {
            return Err(RemoteOperationError::update_failed(name, "update rejected"));
        }

        {
            let mut streams = self.streams.write().await;
            let stream = streams
                .get_mut(name)
                .ok_or_else(|| RemoteOperationError::update_failed(name, "stream not found"))?;

            if stream.version_id != update.current_version_id {
                return Err(RemoteOperationError::update_failed(
                    name,
                    format!(
                        "version conflict: current {}, got {}",
                        stream.version_id, update.current_version_id
                    ),
                ));
            }

            if !stream
                .destinations
                .iter()
                .any(|d| d.destination_id == update.destination_id)
            {
                return Err(RemoteOperationError::update_failed(
                    name,
                    format!("unknown destination '{}'", update.destination_id),
                ));
            }

            stream.version_id = next_version(&stream.version_id);
        }

        self.updates.write().await.push(update.clone());
        Ok(())
    }
}

fn next_version(version: &str) -> String {
    version
        .parse::<u64>()
        .map_or_else(|_| format!("{version}.1"), |v| v.saturating_add(1).to_string())
}
