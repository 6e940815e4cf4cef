//! Command execution.

use std::sync::Arc;

use anyhow::{Context, Result};
use fhsync_core::ServiceDefinition;
use fhsync_reconciler::{
    FirehoseControlPlane, LambdaDirectory, ReconcileMode, ReconcileResult, Reconciler,
    load_sdk_config,
};
use tracing::info;

use crate::cli::{Cli, Commands};
use crate::config::SyncConfig;
use crate::hooks::{FirehosePlugin, HookOutcome, LifecycleHook};

/// Run the parsed command line.
///
/// # Errors
///
/// Returns any load, validation, or remote failure with context attached.
pub async fn run(cli: Cli) -> Result<()> {
    let config = SyncConfig::load(cli.global.config.as_deref())
        .context("Failed to load tool configuration")?
        .with_overrides(&cli.global);

    match cli.command {
        Commands::Validate => validate(&config),
        Commands::Sync { dry_run } => sync(&config.dry_run(dry_run)).await,
        Commands::Hook { name, dry_run } => hook(&config.dry_run(dry_run), &name).await,
        Commands::Hooks => {
            for hook in LifecycleHook::ALL {
                println!("{hook}");
            }
            Ok(())
        }
    }
}

fn load_definition(config: &SyncConfig) -> Result<ServiceDefinition> {
    ServiceDefinition::from_path(&config.definition, config.stage.as_deref()).with_context(|| {
        format!(
            "Failed to load service definition from {}",
            config.definition.display()
        )
    })
}

async fn build_plugin(config: &SyncConfig) -> Result<FirehosePlugin> {
    let definition = load_definition(config)?;

    let sdk_config = load_sdk_config(config.region.clone(), config.profile.clone()).await;
    let reconciler = Reconciler::new(
        Arc::new(LambdaDirectory::new(&sdk_config)),
        Arc::new(FirehoseControlPlane::new(&sdk_config)),
    );

    Ok(FirehosePlugin::new(definition, reconciler))
}

const fn mode(config: &SyncConfig) -> ReconcileMode {
    if config.dry_run {
        ReconcileMode::Plan
    } else {
        ReconcileMode::Apply
    }
}

fn validate(config: &SyncConfig) -> Result<()> {
    let definition = load_definition(config)?;
    let functions = fhsync_core::validate(&definition).context("Service definition is invalid")?;

    info!(
        functions = functions.len(),
        triggers = fhsync_core::trigger_count(&functions),
        "Service definition is valid"
    );
    Ok(())
}

async fn sync(config: &SyncConfig) -> Result<()> {
    let plugin = build_plugin(config).await?;

    let result = plugin
        .finalize(mode(config))
        .await
        .context("Failed to attach Lambda processors to delivery streams")?;

    report(&result)
}

async fn hook(config: &SyncConfig, name: &str) -> Result<()> {
    let hook: LifecycleHook = name.parse()?;

    // validation never needs AWS credentials
    if hook == LifecycleHook::Validate {
        return validate(config);
    }

    let plugin = build_plugin(config).await?;
    let outcome = plugin
        .run_hook(hook, mode(config))
        .await
        .with_context(|| format!("Hook '{hook}' failed"))?;

    match outcome {
        HookOutcome::Reconciled(result) => report(&result),
        HookOutcome::Validated { .. } => Ok(()),
    }
}

fn report(result: &ReconcileResult) -> Result<()> {
    match result.mode {
        ReconcileMode::Plan => {
            let json = serde_json::to_string_pretty(result).context("Failed to render plan")?;
            println!("{json}");
        }
        ReconcileMode::Apply => {
            for applied in &result.updates {
                println!(
                    "{} -> {} ({})",
                    applied.function, applied.update.delivery_stream_name, applied.update.destination_id
                );
            }
        }
    }

    info!(updates = result.len(), "Done");
    Ok(())
}
