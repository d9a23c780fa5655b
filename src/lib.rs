//! publicar: versioned model training and publishing pipeline.
//!
//! Trains a random-forest classifier on a built-in toy dataset and publishes
//! the fitted model as a versioned artifact to an object store, falling back
//! to a local file when no store is configured.
//!
//! Pipeline: dataset → deterministic split → forest training → accuracy
//! evaluation → publish cycle (version read → artifact upload → version
//! commit). The publish cycle is fail-open around the store: failures are
//! logged and surfaced through [`publish::PublishOutcome`], never raised.
//!
//! # Example
//!
//! ```
//! use publicar::data::{train_test_split, Dataset};
//! use publicar::eval::evaluate;
//! use publicar::train::{ForestParams, RandomForestClassifier};
//!
//! let dataset = Dataset::iris();
//! let split = train_test_split(&dataset, 0.2, 42).unwrap();
//! let params = ForestParams::default().with_n_trees(10);
//! let model = RandomForestClassifier::fit(&split.train, &params).unwrap();
//! let evaluation = evaluate(&model, &split.eval).unwrap();
//! assert!(evaluation.accuracy >= 0.0 && evaluation.accuracy <= 1.0);
//! ```

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod eval;
pub mod publish;
pub mod storage;
pub mod train;

pub use config::PublishConfig;
pub use data::{train_test_split, Dataset, TrainTestSplit};
pub use error::{PublicarError, Result};
pub use eval::{accuracy, evaluate, Evaluation};
pub use publish::{ArtifactRecord, PublishOutcome, Publisher};
pub use storage::{InMemoryStore, LocalStore, ObjectStore, StoreError};
pub use train::{ForestParams, RandomForestClassifier};
