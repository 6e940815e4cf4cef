//! Core types for the reconciler.
//!
//! Remote snapshots ([`RemoteComputeResource`], [`RemoteStream`]) are what the
//! control plane reports; [`DestinationUpdate`] is what gets written back.
//! Serialized field names and nesting follow the Firehose `UpdateDestination`
//! request, so a dry-run plan reads like the request it stands in for.

use fhsync_core::TuningKey;
use serde::{Serialize, Serializer};

/// A deployed compute function, as reported by the function directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteComputeResource {
    pub name: String,
    pub arn: String,
}

impl RemoteComputeResource {
    pub fn new(name: impl Into<String>, arn: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arn: arn.into(),
        }
    }
}

/// One destination of a delivery stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamDestination {
    pub destination_id: String,
}

impl StreamDestination {
    pub fn new(destination_id: impl Into<String>) -> Self {
        Self {
            destination_id: destination_id.into(),
        }
    }
}

/// A delivery stream snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteStream {
    pub name: String,
    /// Optimistic-concurrency token; updates must echo it back.
    pub version_id: String,
    pub destinations: Vec<StreamDestination>,
}

impl RemoteStream {
    pub fn new(
        name: impl Into<String>,
        version_id: impl Into<String>,
        destinations: Vec<StreamDestination>,
    ) -> Self {
        Self {
            name: name.into(),
            version_id: version_id.into(),
            destinations,
        }
    }

    /// The destination every update targets. Only the first is managed.
    #[must_use]
    pub fn primary_destination(&self) -> Option<&StreamDestination> {
        self.destinations.first()
    }
}

/// Processor parameter names accepted by Firehose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ProcessorParameterName {
    LambdaArn,
    NumberOfRetries,
    BufferSizeInMBs,
    BufferIntervalInSeconds,
}

impl ProcessorParameterName {
    /// Name as sent on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LambdaArn => "LambdaArn",
            Self::NumberOfRetries => "NumberOfRetries",
            Self::BufferSizeInMBs => "BufferSizeInMBs",
            Self::BufferIntervalInSeconds => "BufferIntervalInSeconds",
        }
    }
}

impl From<TuningKey> for ProcessorParameterName {
    fn from(key: TuningKey) -> Self {
        match key {
            TuningKey::NumberOfRetries => Self::NumberOfRetries,
            TuningKey::BufferSizeInMBs => Self::BufferSizeInMBs,
            TuningKey::BufferIntervalInSeconds => Self::BufferIntervalInSeconds,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessorParameter {
    #[serde(rename = "ParameterName")]
    pub name: ProcessorParameterName,
    #[serde(rename = "ParameterValue")]
    pub value: String,
}

impl ProcessorParameter {
    pub fn new(name: ProcessorParameterName, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProcessorType {
    Lambda,
}

impl ProcessorType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lambda => "Lambda",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Processor {
    #[serde(rename = "Type")]
    pub kind: ProcessorType,
    pub parameters: Vec<ProcessorParameter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProcessingConfiguration {
    pub enabled: bool,
    pub processors: Vec<Processor>,
}

impl ProcessingConfiguration {
    /// Enabled configuration with a single Lambda processor.
    #[must_use]
    pub fn lambda(parameters: Vec<ProcessorParameter>) -> Self {
        Self {
            enabled: true,
            processors: vec![Processor {
                kind: ProcessorType::Lambda,
                parameters,
            }],
        }
    }
}

/// Write payload for a single delivery stream destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DestinationUpdate {
    pub delivery_stream_name: String,
    #[serde(rename = "CurrentDeliveryStreamVersionId")]
    pub current_version_id: String,
    pub destination_id: String,
    /// Sent nested as `ExtendedS3DestinationUpdate.ProcessingConfiguration`.
    #[serde(
        rename = "ExtendedS3DestinationUpdate",
        serialize_with = "extended_s3_destination_update"
    )]
    pub processing: ProcessingConfiguration,
}

fn extended_s3_destination_update<S: Serializer>(
    processing: &ProcessingConfiguration,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    struct ExtendedS3DestinationUpdate<'a> {
        processing_configuration: &'a ProcessingConfiguration,
    }

    ExtendedS3DestinationUpdate {
        processing_configuration: processing,
    }
    .serialize(serializer)
}

impl DestinationUpdate {
    /// Parameters of the (single) processor.
    #[must_use]
    pub fn parameters(&self) -> &[ProcessorParameter] {
        self.processing
            .processors
            .first()
            .map(|p| p.parameters.as_slice())
            .unwrap_or_default()
    }
}

/// Whether a pass writes to the control plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconcileMode {
    #[default]
    Apply,
    /// Fetch and derive, submit nothing.
    Plan,
}

/// One update derived (and, in apply mode, submitted) for a trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedUpdate {
    pub function: String,
    pub update: DestinationUpdate,
}

/// Outcome of a successful pass.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ReconcileResult {
    pub mode: ReconcileMode,
    pub updates: Vec<AppliedUpdate>,
}

impl ReconcileResult {
    #[must_use]
    pub fn len(&self) -> usize {
        self.updates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }
}
