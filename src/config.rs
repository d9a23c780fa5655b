//! Publish-cycle configuration.
//!
//! An explicit value passed into the publisher at construction. Environment
//! lookup happens only in [`PublishConfig::from_env`], which the CLI calls;
//! library code never reads process state, so tests stay deterministic.

use std::path::PathBuf;

/// Environment variable naming the target bucket; absent means local-only.
pub const BUCKET_ENV_VAR: &str = "PUBLICAR_BUCKET";

/// Fixed key of the integer version record in the object store.
pub const DEFAULT_VERSION_KEY: &str = "model_version.txt";

/// Key prefix for uploaded model artifacts.
pub const DEFAULT_ARTIFACT_PREFIX: &str = "trained_models";

/// Fixed-name local model file written as a durability fallback.
pub const DEFAULT_LOCAL_MODEL_PATH: &str = "model.json";

/// Settings for one publish cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishConfig {
    /// Target bucket/container name; `None` selects local-only mode.
    pub bucket: Option<String>,
    /// Store key of the current-version record.
    pub version_key: String,
    /// Store key prefix for artifacts.
    pub artifact_prefix: String,
    /// Local fallback path, always written before any remote upload.
    pub local_model_path: PathBuf,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            bucket: None,
            version_key: DEFAULT_VERSION_KEY.to_string(),
            artifact_prefix: DEFAULT_ARTIFACT_PREFIX.to_string(),
            local_model_path: PathBuf::from(DEFAULT_LOCAL_MODEL_PATH),
        }
    }
}

impl PublishConfig {
    /// Configuration with no bucket (local-only mode).
    pub fn local_only() -> Self {
        Self::default()
    }

    /// Read the bucket name from `PUBLICAR_BUCKET`, defaulting the rest.
    pub fn from_env() -> Self {
        let bucket = std::env::var(BUCKET_ENV_VAR)
            .ok()
            .filter(|v| !v.is_empty());
        Self {
            bucket,
            ..Self::default()
        }
    }

    /// Set the target bucket.
    pub fn with_bucket(mut self, bucket: &str) -> Self {
        self.bucket = Some(bucket.to_string());
        self
    }

    /// Set the version-record key.
    pub fn with_version_key(mut self, key: &str) -> Self {
        self.version_key = key.to_string();
        self
    }

    /// Set the local fallback path.
    pub fn with_local_model_path(mut self, path: PathBuf) -> Self {
        self.local_model_path = path;
        self
    }

    /// Whether a remote bucket is configured.
    pub fn has_bucket(&self) -> bool {
        self.bucket.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_local_only() {
        let config = PublishConfig::default();
        assert!(!config.has_bucket());
        assert_eq!(config.version_key, "model_version.txt");
        assert_eq!(config.artifact_prefix, "trained_models");
        assert_eq!(config.local_model_path, PathBuf::from("model.json"));
    }

    #[test]
    fn test_builder_chain() {
        let config = PublishConfig::default()
            .with_bucket("models-prod")
            .with_version_key("current.txt")
            .with_local_model_path(PathBuf::from("/tmp/m.json"));
        assert_eq!(config.bucket.as_deref(), Some("models-prod"));
        assert_eq!(config.version_key, "current.txt");
        assert!(config.has_bucket());
    }
}
