//! End-to-end pipeline scenarios: load, split, train, evaluate, publish.

use publicar::cli::LogLevel;
use publicar::data::{train_test_split, Dataset};
use publicar::eval::evaluate;
use publicar::publish::{PublishOutcome, Publisher};
use publicar::storage::{InMemoryStore, ObjectStore};
use publicar::train::{ForestParams, RandomForestClassifier};
use publicar::PublishConfig;
use ndarray::Array2;
use std::sync::Arc;
use tempfile::TempDir;

fn hundred_row_dataset() -> Dataset {
    // Two overlapping clusters, 100 labeled rows.
    let features = Array2::from_shape_fn((100, 4), |(i, j)| {
        let class = i / 50;
        (class * 3) as f64 + ((i * 7 + j * 13) % 10) as f64 * 0.2
    });
    let labels = (0..100).map(|i| i / 50).collect();
    Dataset::new(
        features,
        labels,
        vec!["f0".into(), "f1".into(), "f2".into(), "f3".into()],
    )
    .unwrap()
}

#[test]
fn local_only_run_writes_one_file_and_no_remote_calls() {
    let dataset = hundred_row_dataset();
    let split = train_test_split(&dataset, 0.2, 42).unwrap();
    assert_eq!(split.train.n_samples(), 80);
    assert_eq!(split.eval.n_samples(), 20);

    let params = ForestParams::default().with_n_trees(20);
    let model = RandomForestClassifier::fit(&split.train, &params).unwrap();
    let evaluation = evaluate(&model, &split.eval).unwrap();
    assert!((0.0..=1.0).contains(&evaluation.accuracy));

    let tmp = TempDir::new().unwrap();
    let model_path = tmp.path().join("model.json");
    let config = PublishConfig::local_only().with_local_model_path(model_path.clone());
    let publisher = Publisher::new(config).with_log_level(LogLevel::Quiet);

    let outcome = publisher.run_publish_cycle(&model).unwrap();
    assert_eq!(outcome, PublishOutcome::LocalOnly { path: model_path });

    // Exactly one file was written, nothing else.
    let entries: Vec<_> = std::fs::read_dir(tmp.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn published_artifact_round_trips_through_the_store() {
    let dataset = Dataset::iris();
    let split = train_test_split(&dataset, 0.2, 42).unwrap();
    let params = ForestParams::default().with_n_trees(10);
    let model = RandomForestClassifier::fit(&split.train, &params).unwrap();

    let tmp = TempDir::new().unwrap();
    let store = Arc::new(InMemoryStore::new());
    let config = PublishConfig::default()
        .with_bucket("it-bucket")
        .with_local_model_path(tmp.path().join("model.json"));
    let publisher = Publisher::new(config)
        .with_store(Arc::clone(&store) as Arc<dyn ObjectStore>)
        .with_log_level(LogLevel::Quiet);

    let record = match publisher.run_publish_cycle(&model).unwrap() {
        PublishOutcome::Published { record } => record,
        other => panic!("expected Published, got {other:?}"),
    };
    assert_eq!(record.version, 1);

    // The uploaded bytes deserialize back into an equivalent model.
    let bytes = store.get(&record.key).unwrap().unwrap();
    let restored: RandomForestClassifier = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(restored, model);
    assert_eq!(
        restored.predict(split.eval.features()).unwrap(),
        model.predict(split.eval.features()).unwrap()
    );
}

#[test]
fn repeated_cycles_advance_the_version_monotonically() {
    let dataset = Dataset::iris();
    let split = train_test_split(&dataset, 0.2, 42).unwrap();
    let params = ForestParams::default().with_n_trees(5);
    let model = RandomForestClassifier::fit(&split.train, &params).unwrap();

    let tmp = TempDir::new().unwrap();
    let store = Arc::new(InMemoryStore::new());
    let config = PublishConfig::default()
        .with_bucket("it-bucket")
        .with_local_model_path(tmp.path().join("model.json"));
    let publisher = Publisher::new(config)
        .with_store(Arc::clone(&store) as Arc<dyn ObjectStore>)
        .with_log_level(LogLevel::Quiet);

    for expected in 1..=3u64 {
        let outcome = publisher.run_publish_cycle(&model).unwrap();
        match outcome {
            PublishOutcome::Published { record } => assert_eq!(record.version, expected),
            other => panic!("expected Published, got {other:?}"),
        }
        assert_eq!(
            store.get("model_version.txt").unwrap(),
            Some(expected.to_string().into_bytes())
        );
    }
    // One artifact per cycle under the artifact prefix.
    assert_eq!(store.list("trained_models/").unwrap().len(), 3);
}

#[test]
fn identical_seeds_reproduce_the_whole_run() {
    let dataset = Dataset::iris();
    let run = || {
        let split = train_test_split(&dataset, 0.2, 42).unwrap();
        let params = ForestParams::default().with_n_trees(15).with_seed(42);
        let model = RandomForestClassifier::fit(&split.train, &params).unwrap();
        let evaluation = evaluate(&model, &split.eval).unwrap();
        (model, evaluation.accuracy)
    };
    let (model_a, acc_a) = run();
    let (model_b, acc_b) = run();
    assert_eq!(model_a, model_b);
    assert_eq!(acc_a, acc_b);
}
