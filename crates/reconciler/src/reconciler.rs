//! Reconciler implementation.
//!
//! One pass is a fan-out of independent fetch, derive, submit chains. Each
//! function's resource is fetched once and shared by its triggers; each
//! trigger describes its stream, derives the update from that snapshot only,
//! and submits it. Everything runs concurrently on the caller's task and the
//! first failure fails the pass.

use std::sync::Arc;

use fhsync_core::{FirehoseTrigger, ValidatedFunction, ValidatedTrigger, trigger_count};
use futures::future::try_join_all;
use itertools::Itertools;
use tracing::{debug, info, warn};

use crate::api::{ComputeDirectory, StreamControlPlane};
use crate::error::{RemoteOperationError, Result};
use crate::types::{
    AppliedUpdate, DestinationUpdate, ProcessingConfiguration, ProcessorParameter,
    ProcessorParameterName, ReconcileMode, ReconcileResult, RemoteComputeResource, RemoteStream,
};

/// Build the Lambda processor parameters for a trigger.
///
/// `LambdaArn` always comes first, followed by whichever tuning values the
/// trigger sets, in fixed key order. Values are forwarded verbatim.
#[must_use]
pub fn processor_parameters(
    resource: &RemoteComputeResource,
    trigger: &FirehoseTrigger,
) -> Vec<ProcessorParameter> {
    std::iter::once(ProcessorParameter::new(
        ProcessorParameterName::LambdaArn,
        resource.arn.as_str(),
    ))
    .chain(
        trigger
            .tuning()
            .map(|(key, value)| ProcessorParameter::new(key.into(), value)),
    )
    .collect()
}

/// Derive the update for a trigger from the freshly fetched stream.
///
/// The version id and destination id are copied from the snapshot, always
/// targeting the first destination.
///
/// # Errors
///
/// Returns [`RemoteOperationError::NoDestinations`] if the stream has no
/// destination to target.
pub fn build_destination_update(
    trigger: &ValidatedTrigger<'_>,
    stream: &RemoteStream,
    resource: &RemoteComputeResource,
) -> Result<DestinationUpdate> {
    let destination = stream
        .primary_destination()
        .ok_or_else(|| RemoteOperationError::no_destinations(trigger.delivery_stream_name))?;

    Ok(DestinationUpdate {
        delivery_stream_name: trigger.delivery_stream_name.to_owned(),
        current_version_id: stream.version_id.clone(),
        destination_id: destination.destination_id.clone(),
        processing: ProcessingConfiguration::lambda(processor_parameters(
            resource,
            trigger.trigger,
        )),
    })
}

/// Attaches Lambda processors to the delivery streams named by validated
/// firehose triggers.
pub struct Reconciler {
    directory: Arc<dyn ComputeDirectory>,
    control_plane: Arc<dyn StreamControlPlane>,
}

impl Reconciler {
    /// Create a new reconciler.
    pub fn new(
        directory: Arc<dyn ComputeDirectory>,
        control_plane: Arc<dyn StreamControlPlane>,
    ) -> Self {
        Self {
            directory,
            control_plane,
        }
    }

    /// Fetch, derive, and submit an update for every trigger.
    ///
    /// # Errors
    ///
    /// Returns the first remote failure. Other in-flight calls are not
    /// cancelled and there is no per-trigger status.
    pub async fn reconcile_all(&self, functions: &[ValidatedFunction<'_>]) -> Result<ReconcileResult> {
        self.run(functions, ReconcileMode::Apply).await
    }

    /// Fetch and derive every update without submitting any.
    ///
    /// # Errors
    ///
    /// Returns the first remote fetch failure.
    pub async fn plan(&self, functions: &[ValidatedFunction<'_>]) -> Result<ReconcileResult> {
        self.run(functions, ReconcileMode::Plan).await
    }

    async fn run(
        &self,
        functions: &[ValidatedFunction<'_>],
        mode: ReconcileMode,
    ) -> Result<ReconcileResult> {
        info!(
            functions = functions.len(),
            triggers = trigger_count(functions),
            ?mode,
            "Starting reconciliation"
        );

        let per_function = try_join_all(
            functions
                .iter()
                .map(|function| self.reconcile_function(function, mode)),
        )
        .await
        .inspect_err(|e| warn!(error = %e, "Reconciliation failed"))?;

        let updates = per_function.into_iter().flatten().collect_vec();

        info!(updates = updates.len(), ?mode, "Reconciliation complete");

        Ok(ReconcileResult { mode, updates })
    }

    async fn reconcile_function(
        &self,
        function: &ValidatedFunction<'_>,
        mode: ReconcileMode,
    ) -> Result<Vec<AppliedUpdate>> {
        let spec = function.function;

        debug!(function = %spec.identifier, resource = %spec.resource_name, "Fetching function");
        let resource = self.directory.get_function(&spec.resource_name).await?;

        try_join_all(
            function
                .triggers
                .iter()
                .map(|trigger| self.reconcile_trigger(&spec.identifier, trigger, &resource, mode)),
        )
        .await
    }

    async fn reconcile_trigger(
        &self,
        function: &str,
        trigger: &ValidatedTrigger<'_>,
        resource: &RemoteComputeResource,
        mode: ReconcileMode,
    ) -> Result<AppliedUpdate> {
        let stream_name = trigger.delivery_stream_name;

        debug!(function, stream = stream_name, "Describing delivery stream");
        let stream = self.control_plane.describe_stream(stream_name).await?;

        let update = build_destination_update(trigger, &stream, resource)?;

        match mode {
            ReconcileMode::Apply => {
                debug!(
                    function,
                    stream = stream_name,
                    version = %update.current_version_id,
                    destination = %update.destination_id,
                    "Updating destination"
                );
                self.control_plane.update_destination(&update).await?;
                info!(function, stream = stream_name, arn = %resource.arn, "Attached processor");
            }
            ReconcileMode::Plan => {
                debug!(function, stream = stream_name, "Planned destination update");
            }
        }

        Ok(AppliedUpdate {
            function: function.to_owned(),
            update,
        })
    }
}
