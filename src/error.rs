//! Error types with actionable diagnostics.
//!
//! Data errors (malformed datasets, bad split ratios, unfitted models) are
//! fatal and propagate to the caller. Store errors are handled at the call
//! site by the publisher and never appear here; see [`crate::storage`].

use thiserror::Error;

/// Result type alias for publicar operations.
pub type Result<T> = std::result::Result<T, PublicarError>;

/// Errors that can occur in the training and publishing pipeline.
#[derive(Error, Debug)]
pub enum PublicarError {
    /// Dataset has no rows.
    #[error("Dataset is empty\n  → Provide at least one labeled sample")]
    EmptyDataset,

    /// Feature matrix and label vector disagree on row count.
    #[error("Row count mismatch: {features} feature rows vs {labels} labels")]
    RowCountMismatch { features: usize, labels: usize },

    /// Split ratio must lie strictly between 0 and 1.
    #[error("Split ratio {ratio} is outside (0, 1)\n  → Use a fraction such as 0.2")]
    InvalidRatio { ratio: f64 },

    /// Prediction input width does not match the fitted model.
    #[error("Feature count mismatch: model was fitted on {expected} features, got {actual}")]
    FeatureCountMismatch { expected: usize, actual: usize },

    /// Training could not produce a usable model.
    #[error("Training failed: {0}")]
    Training(String),

    /// IO error with context.
    #[error("IO error: {context}\n  Cause: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Model serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Object-store setup error surfaced outside the fail-open publish path.
    #[error("Store error: {0}")]
    Store(#[from] crate::storage::StoreError),
}

impl PublicarError {
    /// Wrap an IO error with a human-readable context string.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for PublicarError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
