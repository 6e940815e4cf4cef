//! Deployment lifecycle hooks.
//!
//! The host deployment tool calls in at two points: validation before
//! packaging, and finalization after the stack is deployed. Validation is
//! pure; finalization re-validates and then reconciles every stream.

use std::fmt;
use std::str::FromStr;

use fhsync_core::{ConfigurationError, ServiceDefinition, ValidatedFunction, trigger_count, validate};
use fhsync_reconciler::{ReconcileMode, ReconcileResult, Reconciler};
use tracing::info;

use crate::error::{Result, SyncError};

/// A lifecycle point this tool is invoked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleHook {
    Validate,
    Finalize,
}

impl LifecycleHook {
    pub const ALL: [Self; 2] = [Self::Validate, Self::Finalize];

    /// Hook name as registered with the host tool.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Validate => "aws:common:validate:validate",
            Self::Finalize => "before:deploy:finalize",
        }
    }
}

impl fmt::Display for LifecycleHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LifecycleHook {
    type Err = SyncError;

    fn from_str(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|hook| hook.name() == name)
            .ok_or_else(|| SyncError::UnknownHook(name.to_owned()))
    }
}

/// What a hook did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOutcome {
    Validated { functions: usize, triggers: usize },
    Reconciled(ReconcileResult),
}

/// Binds a service definition to a reconciler.
pub struct FirehosePlugin {
    definition: ServiceDefinition,
    reconciler: Reconciler,
}

impl FirehosePlugin {
    pub const fn new(definition: ServiceDefinition, reconciler: Reconciler) -> Self {
        Self {
            definition,
            reconciler,
        }
    }

    #[must_use]
    pub const fn definition(&self) -> &ServiceDefinition {
        &self.definition
    }

    /// Check every firehose trigger.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigurationError`] in definition order.
    pub fn validate(&self) -> std::result::Result<Vec<ValidatedFunction<'_>>, ConfigurationError> {
        validate(&self.definition)
    }

    /// Validate, then reconcile (or plan) every trigger.
    ///
    /// No remote call is made unless validation passes for the whole
    /// definition.
    ///
    /// # Errors
    ///
    /// Returns a [`SyncError::Configuration`] from validation or the first
    /// [`SyncError::Remote`] from reconciliation.
    pub async fn finalize(&self, mode: ReconcileMode) -> Result<ReconcileResult> {
        let functions = self.validate()?;

        let result = match mode {
            ReconcileMode::Apply => self.reconciler.reconcile_all(&functions).await?,
            ReconcileMode::Plan => self.reconciler.plan(&functions).await?,
        };

        Ok(result)
    }

    /// Dispatch a lifecycle hook.
    ///
    /// # Errors
    ///
    /// Propagates the hook's failure unchanged.
    pub async fn run_hook(&self, hook: LifecycleHook, mode: ReconcileMode) -> Result<HookOutcome> {
        info!(%hook, service = self.definition.service(), stage = self.definition.stage(), "Running hook");

        match hook {
            LifecycleHook::Validate => {
                let functions = self.validate()?;
                Ok(HookOutcome::Validated {
                    functions: functions.len(),
                    triggers: trigger_count(&functions),
                })
            }
            LifecycleHook::Finalize => self.finalize(mode).await.map(HookOutcome::Reconciled),
        }
    }
}
