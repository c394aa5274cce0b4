//! Integration test: Training, persisting and scoring models on processed splits

use draft_prep::cli::{cmd_predict, cmd_train};
use draft_prep::error::DraftError;
use draft_prep::inference::{default_models, make_predictions, ModelArtifact, ModelRegistry};
use draft_prep::runner::{run_pipeline, target_labels, PipelineConfig, PipelinePaths};
use draft_prep::table::Table;
use draft_prep::training::{fit_assess_classifier, labels_to_f64, roc_auc_score};
use draft_prep::utils::DataLoader;
use ndarray::{array, Array1, Array2};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_raw(dir: &Path) -> PipelinePaths {
    let mut train = String::from("team,pick,Rec_Rank,pts,reb,drafted\n");
    for i in 0..80 {
        let drafted = i % 5 == 0;
        let pts = (i % 13) as f64 + if drafted { 9.0 } else { 0.0 };
        let reb = ((i * 7) % 11) as f64 * 0.5;
        train.push_str(&format!(
            "{},{},{},{},{},{}\n",
            if i % 2 == 0 { "East" } else { "West" },
            if drafted { "12" } else { "" },
            i % 50,
            pts,
            reb,
            if drafted { 1 } else { 0 }
        ));
    }
    let mut test = String::from("team,pick,Rec_Rank,pts,reb\n");
    for i in 0..10 {
        test.push_str(&format!(
            "{},,{},{},{}\n",
            if i % 3 == 0 { "East" } else { "West" },
            i * 3,
            i as f64 * 1.7,
            (i % 4) as f64
        ));
    }

    let train_path = dir.join("train.csv");
    let test_path = dir.join("test.csv");
    fs::write(&train_path, train).unwrap();
    fs::write(&test_path, test).unwrap();
    PipelinePaths::new(train_path, test_path, dir.join("processed"))
}

fn load_split(dir: &Path, split: &str) -> (Table, Array2<f64>, Array1<f64>) {
    let loader = DataLoader::new();
    let x = loader.load_csv(dir.join(format!("X_{}.csv", split))).unwrap();
    let y = loader.load_csv(dir.join(format!("y_{}.csv", split))).unwrap();
    let matrix = x.to_feature_matrix().unwrap();
    let labels = labels_to_f64(&target_labels(&y.columns()[0]).unwrap());
    (x, matrix, labels)
}

#[test]
fn test_default_models_train_on_processed_splits() {
    let dir = TempDir::new().unwrap();
    let paths = write_raw(dir.path());
    run_pipeline(&PipelineConfig::default(), &paths).unwrap();

    let (_, x_train, y_train) = load_split(&paths.output_dir, "train");
    let (_, x_val, y_val) = load_split(&paths.output_dir, "val");

    for (spec, model) in default_models() {
        let (_, report) = fit_assess_classifier(model, &x_train, &y_train, &x_val, &y_val).unwrap();
        assert!(report.train > 0.5, "{} trained AUROC {}", spec.name, report.train);
        assert!((0.0..=1.0).contains(&report.validation));
    }
}

#[test]
fn test_registry_roundtrip_and_predictions() {
    let dir = TempDir::new().unwrap();
    let paths = write_raw(dir.path());
    run_pipeline(&PipelineConfig::default(), &paths).unwrap();

    let (x_table, x_train, y_train) = load_split(&paths.output_dir, "train");
    let feature_names: Vec<String> = x_table.column_names().iter().map(|s| s.to_string()).collect();
    let registry = ModelRegistry::new(dir.path().join("models"));

    for (spec, model) in default_models() {
        let (model, _) = fit_assess_classifier(model, &x_train, &y_train, &x_train, &y_train).unwrap();
        registry
            .save(&spec, &ModelArtifact::new(feature_names.clone(), model))
            .unwrap();
    }

    let models = registry.load_models().unwrap();
    let (x_test_table, _, y_test) = load_split(&paths.output_dir, "test");
    let predictions = make_predictions(&models, &x_test_table).unwrap();

    assert_eq!(predictions.column_names(), vec!["polynomial_2", "adaboost_default"]);
    assert_eq!(predictions.n_rows(), x_test_table.n_rows());
    for column in predictions.columns() {
        let scores = Array1::from_vec(column.to_dense().unwrap());
        assert!(scores.iter().all(|p| (0.0..=1.0).contains(p)));
        assert!(roc_auc_score(&y_test, &scores).is_ok());
    }
}

#[test]
fn test_predict_requires_trained_models() {
    let dir = TempDir::new().unwrap();
    let registry = ModelRegistry::new(dir.path());

    let err = registry.load_models().unwrap_err();
    assert!(matches!(err, DraftError::ModelNotFound { .. }));
    assert!(err.to_string().contains("Please train models first."));
}

#[test]
fn test_predict_with_missing_feature_column() {
    let x = array![[0.0, 1.0], [1.0, 0.0], [2.0, 1.0], [3.0, 0.0]];
    let y = array![0.0, 0.0, 1.0, 1.0];
    let mut artifacts = Vec::new();
    for (spec, model) in default_models() {
        let (model, _) = fit_assess_classifier(model, &x, &y, &x, &y).unwrap();
        artifacts.push((spec.name, ModelArtifact::new(vec!["a".into(), "b".into()], model)));
    }

    let features = Table::from_array2(&["a".to_string(), "c".to_string()], &x).unwrap();
    assert!(make_predictions(&artifacts, &features).is_err());
}

#[test]
fn test_cli_train_then_predict() {
    let dir = TempDir::new().unwrap();
    let paths = write_raw(dir.path());
    run_pipeline(&PipelineConfig::default().with_predict_features(true), &paths).unwrap();

    let models_dir = dir.path().join("models");
    cmd_train(&paths.output_dir, &models_dir).unwrap();
    assert!(models_dir.join("log_poly_2.json").is_file());
    assert!(models_dir.join("adaboost_default.json").is_file());

    let out = dir.path().join("predictions.csv");
    cmd_predict(&models_dir, &paths.output_dir.join("X_predict.csv"), Some(out.as_path())).unwrap();

    let predictions = DataLoader::new().load_csv(&out).unwrap();
    assert_eq!(predictions.n_rows(), 10);
    assert_eq!(predictions.n_cols(), 2);
}
