//! AWS-backed control planes.
//!
//! `GetFunction` resolves the Lambda ARN; `DescribeDeliveryStream` and
//! `UpdateDestination` read and write the Firehose destination. Credentials
//! and region come from the SDK's default provider chain.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_firehose::types as firehose;
use tracing::debug;

use crate::api::{ComputeDirectory, StreamControlPlane};
use crate::error::{RemoteOperationError, Result};
use crate::types::{DestinationUpdate, Processor, RemoteComputeResource, RemoteStream, StreamDestination};

/// Load shared SDK configuration, optionally pinning region and profile.
pub async fn load_sdk_config(region: Option<String>, profile: Option<String>) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(region) = region {
        loader = loader.region(Region::new(region));
    }
    if let Some(profile) = profile {
        loader = loader.profile_name(profile);
    }

    let config = loader.load().await;
    debug!(region = ?config.region(), "Loaded AWS configuration");
    config
}

/// Lambda-backed function directory.
#[derive(Debug, Clone)]
pub struct LambdaDirectory {
    client: aws_sdk_lambda::Client,
}

impl LambdaDirectory {
    #[must_use]
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_lambda::Client::new(config),
        }
    }
}

#[async_trait]
impl ComputeDirectory for LambdaDirectory {
    async fn get_function(&self, name: &str) -> Result<RemoteComputeResource> {
        let output = self
            .client
            .get_function()
            .function_name(name)
            .send()
            .await
            .map_err(|e| {
                RemoteOperationError::function_lookup_failed(
                    name,
                    aws_sdk_lambda::error::DisplayErrorContext(&e).to_string(),
                )
            })?;

        let arn = output
            .configuration()
            .and_then(|c| c.function_arn())
            .ok_or_else(|| RemoteOperationError::missing_field(name, "Configuration.FunctionArn"))?;

        Ok(RemoteComputeResource::new(name, arn))
    }
}

/// Firehose-backed stream control plane.
#[derive(Debug, Clone)]
pub struct FirehoseControlPlane {
    client: aws_sdk_firehose::Client,
}

impl FirehoseControlPlane {
    #[must_use]
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_firehose::Client::new(config),
        }
    }
}

#[async_trait]
impl StreamControlPlane for FirehoseControlPlane {
    async fn describe_stream(&self, name: &str) -> Result<RemoteStream> {
        let output = self
            .client
            .describe_delivery_stream()
            .delivery_stream_name(name)
            .send()
            .await
            .map_err(|e| {
                RemoteOperationError::stream_lookup_failed(
                    name,
                    aws_sdk_firehose::error::DisplayErrorContext(&e).to_string(),
                )
            })?;

        let description = output
            .delivery_stream_description()
            .ok_or_else(|| RemoteOperationError::missing_field(name, "DeliveryStreamDescription"))?;

        let destinations = description
            .destinations()
            .iter()
            .map(|d| StreamDestination::new(d.destination_id()))
            .collect();

        Ok(RemoteStream::new(name, description.version_id(), destinations))
    }

    async fn update_destination(&self, update: &DestinationUpdate) -> Result<()> {
        let processors = update
            .processing
            .processors
            .iter()
            .map(to_sdk_processor)
            .collect::<Result<Vec<_>>>()?;

        let processing = firehose::ProcessingConfiguration::builder()
            .enabled(update.processing.enabled)
            .set_processors(Some(processors))
            .build();

        let destination = firehose::ExtendedS3DestinationUpdate::builder()
            .processing_configuration(processing)
            .build();

        self.client
            .update_destination()
            .delivery_stream_name(&update.delivery_stream_name)
            .current_delivery_stream_version_id(&update.current_version_id)
            .destination_id(&update.destination_id)
            .extended_s3_destination_update(destination)
            .send()
            .await
            .map_err(|e| {
                RemoteOperationError::update_failed(
                    &update.delivery_stream_name,
                    aws_sdk_firehose::error::DisplayErrorContext(&e).to_string(),
                )
            })?;

        Ok(())
    }
}

fn to_sdk_processor(processor: &Processor) -> Result<firehose::Processor> {
    let parameters = processor
        .parameters
        .iter()
        .map(|p| {
            firehose::ProcessorParameter::builder()
                .parameter_name(firehose::ProcessorParameterName::from(p.name.as_str()))
                .parameter_value(&p.value)
                .build()
                .map_err(|e| RemoteOperationError::invalid_request(e.to_string()))
        })
        .collect::<Result<Vec<_>>>()?;

    firehose::Processor::builder()
        .r#type(firehose::ProcessorType::from(processor.kind.as_str()))
        .set_parameters(Some(parameters))
        .build()
        .map_err(|e| RemoteOperationError::invalid_request(e.to_string()))
}
