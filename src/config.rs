//! Tool configuration.
//!
//! Layering, lowest to highest: defaults, config file (`--config`), then
//! command-line flags and their `FHSYNC_*` environment variables.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cli::GlobalArgs;
use crate::error::{Result, SyncError};

/// Default service definition path.
pub const DEFAULT_DEFINITION: &str = "serverless.yml";

/// Configuration for a firehose-sync run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Service definition to load.
    pub definition: PathBuf,

    /// Deployment stage; falls back to `provider.stage` in the definition.
    pub stage: Option<String>,

    /// AWS region; falls back to the SDK provider chain.
    pub region: Option<String>,

    /// AWS shared-config profile.
    pub profile: Option<String>,

    /// Derive updates without submitting them.
    pub dry_run: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            definition: PathBuf::from(DEFAULT_DEFINITION),
            stage: None,
            region: None,
            profile: None,
            dry_run: false,
        }
    }
}

impl SyncConfig {
    /// Load configuration from a file.
    ///
    /// `.json` files are parsed as JSON, everything else as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::ConfigReadFailed`] or [`SyncError::ConfigParseFailed`].
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SyncError::config_read_failed(path, e.to_string()))?;

        if path.extension().is_some_and(|e| e == "json") {
            serde_json::from_str(&content)
                .map_err(|e| SyncError::config_parse_failed(path, e.to_string()))
        } else {
            toml::from_str(&content)
                .map_err(|e| SyncError::config_parse_failed(path, e.to_string()))
        }
    }

    /// Load from `path` if given, otherwise start from defaults.
    ///
    /// # Errors
    ///
    /// Returns a read or parse error when a path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::from_file)
    }

    /// Apply command-line (and environment) overrides.
    #[must_use]
    pub fn with_overrides(mut self, args: &GlobalArgs) -> Self {
        if let Some(definition) = &args.definition {
            self.definition.clone_from(definition);
        }
        if args.stage.is_some() {
            self.stage.clone_from(&args.stage);
        }
        if args.region.is_some() {
            self.region.clone_from(&args.region);
        }
        if args.profile.is_some() {
            self.profile.clone_from(&args.profile);
        }
        self
    }

    /// Turn on dry-run mode.
    #[must_use]
    pub const fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = self.dry_run || enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn test_default_config() {
        let config = SyncConfig::default();
        assert_eq!(config.definition, PathBuf::from("serverless.yml"));
        assert_eq!(config.stage, None);
        assert!(!config.dry_run);
    }

    #[test]
    fn test_load_toml_file() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("fhsync.toml");
        std::fs::write(
            &path,
            "definition = \"deploy/serverless.yml\"\nstage = \"prod\"\nregion = \"eu-west-1\"\n",
        )?;

        let config = SyncConfig::load(Some(&path))?;

        assert_eq!(config.definition, PathBuf::from("deploy/serverless.yml"));
        assert_eq!(config.stage.as_deref(), Some("prod"));
        assert_eq!(config.region.as_deref(), Some("eu-west-1"));
        assert_eq!(config.profile, None);
        Ok(())
    }

    #[test]
    fn test_load_json_file() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("fhsync.json");
        std::fs::write(&path, r#"{"profile":"deploy","dry_run":true}"#)?;

        let config = SyncConfig::load(Some(&path))?;

        assert_eq!(config.profile.as_deref(), Some("deploy"));
        assert!(config.dry_run);
        assert_eq!(config.definition, PathBuf::from(DEFAULT_DEFINITION));
        Ok(())
    }

    #[test]
    fn test_invalid_toml() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("fhsync.toml");
        std::fs::write(&path, "stage = [")?;

        let result = SyncConfig::load(Some(&path));
        assert!(matches!(result, Err(SyncError::ConfigParseFailed { .. })));
        Ok(())
    }

    #[test]
    fn test_missing_config_file() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("absent.toml");

        let result = SyncConfig::load(Some(&path));
        assert!(matches!(result, Err(SyncError::ConfigReadFailed { .. })));
        Ok(())
    }

    #[test]
    fn test_overrides_win_over_file() {
        let base = SyncConfig {
            stage: Some("prod".to_owned()),
            region: Some("eu-west-1".to_owned()),
            ..SyncConfig::default()
        };
        let args = GlobalArgs {
            definition: Some(PathBuf::from("other.yml")),
            stage: Some("qa".to_owned()),
            region: None,
            profile: None,
            config: None,
            verbose: false,
        };

        let config = base.with_overrides(&args);

        assert_eq!(config.definition, PathBuf::from("other.yml"));
        assert_eq!(config.stage.as_deref(), Some("qa"));
        assert_eq!(config.region.as_deref(), Some("eu-west-1"));
    }

    #[test]
    fn test_dry_run_is_sticky() {
        let config = SyncConfig {
            dry_run: true,
            ..SyncConfig::default()
        };
        assert!(config.dry_run(false).dry_run);
        assert!(SyncConfig::default().dry_run(true).dry_run);
    }
}
