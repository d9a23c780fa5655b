//! Versioned model publishing: version read, artifact upload, version commit.
//!
//! The publish cycle is fail-open around the object store: any store failure
//! is logged, converted into a degraded default, and the cycle runs to
//! completion. Data errors (serialization, local filesystem) are fatal and
//! propagate. The cycle order is fixed:
//!
//! 1. read the current version (absent or unreadable record counts as 0)
//! 2. `new_version = current + 1`
//! 3. upload the artifact under a version+timestamp key
//! 4. commit `new_version`, regardless of whether the upload succeeded
//!
//! Step 4 intentionally runs after a failed upload, so the version record
//! always advances even when it then points at an artifact that was never
//! written. Callers observe this through [`PublishOutcome::Degraded`] rather
//! than by scraping logs.

use crate::cli::{log, LogLevel};
use crate::config::PublishConfig;
use crate::storage::{ObjectStore, StoreError};
use crate::train::RandomForestClassifier;
use crate::{PublicarError, Result};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::sync::Arc;

/// Timestamp layout embedded in artifact keys.
const KEY_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Record of one successfully uploaded artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRecord {
    /// Version number the artifact was published as.
    pub version: u64,
    /// Object-store key the artifact was written to.
    pub key: String,
    /// SHA-256 digest of the serialized model.
    pub digest: String,
    /// Upload timestamp.
    pub created_at: DateTime<Utc>,
}

/// Observable result of a publish cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Upload and version commit both succeeded.
    Published { record: ArtifactRecord },
    /// No store configured; the model was written once to the local path.
    LocalOnly { path: PathBuf },
    /// Store configured but upload and/or commit failed; the version was
    /// still advanced per the fail-open policy.
    Degraded { version: u64, reason: String },
}

/// Orchestrates version lookup, artifact upload, and version commit.
pub struct Publisher {
    config: PublishConfig,
    store: Option<Arc<dyn ObjectStore>>,
    level: LogLevel,
}

impl Publisher {
    /// A publisher with no store: every cycle runs in local-only mode.
    pub fn new(config: PublishConfig) -> Self {
        Self {
            config,
            store: None,
            level: LogLevel::Normal,
        }
    }

    /// Attach an object store holding the version record and artifacts.
    pub fn with_store(mut self, store: Arc<dyn ObjectStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set output verbosity.
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Read the current version from the store.
    ///
    /// Absent record, unparseable payload, and store errors all degrade to
    /// 0 ("no prior publish") so the cycle can proceed.
    pub fn current_version(&self) -> u64 {
        let Some(store) = &self.store else {
            return 0;
        };
        match store.get(&self.config.version_key) {
            Ok(Some(bytes)) => match std::str::from_utf8(&bytes)
                .map_err(|e| e.to_string())
                .and_then(|s| s.trim().parse::<u64>().map_err(|e| e.to_string()))
            {
                Ok(version) => version,
                Err(e) => {
                    log(
                        self.level,
                        LogLevel::Normal,
                        &format!("Error getting model version: {e}"),
                    );
                    0
                }
            },
            Ok(None) => 0,
            Err(e) => {
                log(
                    self.level,
                    LogLevel::Normal,
                    &format!("Error getting model version: {e}"),
                );
                0
            }
        }
    }

    /// Write `new_version` as the new current version, overwriting any
    /// prior value. Store failure is returned for the caller to log.
    pub fn commit_version(&self, new_version: u64) -> std::result::Result<(), StoreError> {
        let store = self
            .store
            .as_ref()
            .ok_or_else(|| StoreError::Backend("no store configured".to_string()))?;
        store.put(&self.config.version_key, new_version.to_string().as_bytes())
    }

    /// Run one complete publish cycle for a trained model.
    pub fn run_publish_cycle(&self, model: &RandomForestClassifier) -> Result<PublishOutcome> {
        let payload = serde_json::to_vec_pretty(model)?;

        let Some(store) = &self.store else {
            log(
                self.level,
                LogLevel::Normal,
                "No bucket configured, saving locally only.",
            );
            let path = self.write_local(&payload)?;
            return Ok(PublishOutcome::LocalOnly { path });
        };

        let current = self.current_version();
        let new_version = current + 1;
        let mut failures: Vec<String> = Vec::new();

        // Local copy first: a transport failure must never lose the model.
        self.write_local(&payload)?;

        let created_at = Utc::now();
        let key = self.artifact_key(new_version, created_at);
        log(
            self.level,
            LogLevel::Normal,
            &format!("Saving model to {} store...", store.store_type()),
        );
        match store.put(&key, &payload) {
            Ok(()) => {
                let bucket = self.config.bucket.as_deref().unwrap_or("");
                log(
                    self.level,
                    LogLevel::Normal,
                    &format!("Model saved to {bucket}/{key}"),
                );
            }
            Err(e) => {
                log(
                    self.level,
                    LogLevel::Normal,
                    &format!("Failed to upload model: {e}"),
                );
                failures.push(format!("upload: {e}"));
            }
        }

        // Commit runs even after a failed upload: versions always advance.
        match self.commit_version(new_version) {
            Ok(()) => log(
                self.level,
                LogLevel::Normal,
                &format!("Model version updated to {new_version}"),
            ),
            Err(e) => {
                log(
                    self.level,
                    LogLevel::Normal,
                    &format!("Failed to update model version: {e}"),
                );
                failures.push(format!("version commit: {e}"));
            }
        }

        if failures.is_empty() {
            Ok(PublishOutcome::Published {
                record: ArtifactRecord {
                    version: new_version,
                    key,
                    digest: hex::encode(Sha256::digest(&payload)),
                    created_at,
                },
            })
        } else {
            Ok(PublishOutcome::Degraded {
                version: new_version,
                reason: failures.join("; "),
            })
        }
    }

    /// Artifact key: `{prefix}/model_v{version}_{YYYYMMDDHHMMSS}.json`.
    /// The timestamp keeps keys distinct even if a version is retried.
    fn artifact_key(&self, version: u64, at: DateTime<Utc>) -> String {
        format!(
            "{}/model_v{}_{}.json",
            self.config.artifact_prefix,
            version,
            at.format(KEY_TIMESTAMP_FORMAT)
        )
    }

    /// Write the fixed-name local fallback file. Local IO errors are fatal.
    fn write_local(&self, payload: &[u8]) -> Result<PathBuf> {
        let path = &self.config.local_model_path;
        std::fs::write(path, payload).map_err(|e| {
            PublicarError::io(format!("writing local model file {}", path.display()), e)
        })?;
        Ok(path.clone())
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_artifact_key_embeds_version(version in 0u64..1_000_000) {
            let publisher = Publisher::new(PublishConfig::default());
            let key = publisher.artifact_key(version, Utc::now());
            prop_assert!(key.starts_with("trained_models/model_v"));
            let expected_fragment = format!("model_v{}_", version);
            prop_assert!(key.contains(&expected_fragment));
            prop_assert!(key.ends_with(".json"));
        }
    }
}
