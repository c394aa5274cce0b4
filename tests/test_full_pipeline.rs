//! Integration test: Full feature build (load → clean → transform → balance → split → write)

use draft_prep::error::DraftError;
use draft_prep::preprocessing::{FitPolicy, PreprocessingConfig};
use draft_prep::runner::{run_pipeline, Dataset, PipelineConfig, PipelinePaths, Stage, OUTPUT_FILES};
use draft_prep::utils::DataLoader;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const TEAMS: [&str; 3] = ["Duke", "Kansas", "Gonzaga"];
const YEARS: [&str; 4] = ["Fr", "So", "Jr", "Sr"];

/// 66 players: 15 drafted, 51 not, and one undrafted row with a missing stat
fn train_csv(n_drafted: usize) -> String {
    let mut out = String::from("team,yr,pick,Rec_Rank,rimmade,pts,ast,drafted\n");
    for i in 0..66 {
        let drafted = i % 4 == 0 && i / 4 < n_drafted;
        let pick = if drafted { format!("{}", i / 4 + 1) } else { String::new() };
        let rimmade = if i % 6 == 0 { String::new() } else { format!("{}", i % 11) };
        let pts = if i == 65 { String::new() } else { format!("{:.1}", (i * 7 % 23) as f64 + 0.5) };
        let ast = (i % 9) as f64 * 1.5 + if drafted { 4.0 } else { 0.0 };
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            TEAMS[i % 3],
            YEARS[i % 4],
            pick,
            (i * 13) % 100,
            rimmade,
            pts,
            ast,
            if drafted { 1 } else { 0 }
        ));
    }
    out
}

fn test_csv() -> String {
    let mut out = String::from("team,yr,pick,Rec_Rank,rimmade,pts,ast\n");
    for i in 0..20 {
        let rimmade = if i % 5 == 0 { String::new() } else { format!("{}", i % 7) };
        out.push_str(&format!(
            "{},{},,{},{},{:.1},{}\n",
            TEAMS[(i + 1) % 3],
            YEARS[i % 4],
            (i * 17) % 100,
            rimmade,
            (i * 5 % 19) as f64 + 1.0,
            (i % 6) as f64
        ));
    }
    out
}

struct Fixture {
    dir: TempDir,
    paths: PipelinePaths,
}

fn fixture_with(train: &str, test: &str) -> Fixture {
    let dir = TempDir::new().unwrap();
    let train_path = dir.path().join("train.csv");
    let test_path = dir.path().join("test.csv");
    fs::write(&train_path, train).unwrap();
    fs::write(&test_path, test).unwrap();
    let paths = PipelinePaths::new(&train_path, &test_path, dir.path().join("processed"));
    Fixture { dir, paths }
}

fn fixture() -> Fixture {
    fixture_with(&train_csv(15), &test_csv())
}

fn label_counts(dir: &Path) -> BTreeMap<i64, usize> {
    let loader = DataLoader::new();
    let mut counts = BTreeMap::new();
    for name in ["y_train.csv", "y_val.csv", "y_test.csv"] {
        let table = loader.load_csv(dir.join(name)).unwrap();
        assert_eq!(table.column_names(), vec!["drafted"]);
        for v in table.columns()[0].to_dense().unwrap() {
            *counts.entry(v as i64).or_insert(0) += 1;
        }
    }
    counts
}

fn output_paths(dir: &Path) -> Vec<PathBuf> {
    OUTPUT_FILES.iter().map(|name| dir.join(name)).collect()
}

#[test]
fn test_pipeline_writes_six_balanced_splits() {
    let fx = fixture();
    let report = run_pipeline(&PipelineConfig::default(), &fx.paths).unwrap();

    assert_eq!(report.rows_loaded, (66, 20));
    assert_eq!(report.rows_after_filter, (65, 20));
    assert_eq!(report.class_counts_before, BTreeMap::from([(0, 50), (1, 15)]));
    assert_eq!(report.class_counts_after, BTreeMap::from([(0, 50), (1, 50)]));
    assert_eq!(
        (report.split_sizes.train, report.split_sizes.validation, report.split_sizes.test),
        (64, 16, 20)
    );
    assert_eq!(report.outputs, output_paths(&fx.paths.output_dir));
    for path in &report.outputs {
        assert!(path.is_file(), "missing {}", path.display());
    }

    let loader = DataLoader::new();
    let x_train = loader.load_csv(fx.paths.output_dir.join("X_train.csv")).unwrap();
    assert_eq!(x_train.column_names(), vec!["team", "yr", "rimmade", "pts", "ast"]);
    assert_eq!(x_train.n_rows(), 64);
    assert_eq!(x_train.null_count(), 0);

    assert_eq!(label_counts(&fx.paths.output_dir), BTreeMap::from([(0, 50), (1, 50)]));

    let y_train = fs::read_to_string(fx.paths.output_dir.join("y_train.csv")).unwrap();
    let mut lines = y_train.lines();
    assert_eq!(lines.next(), Some("drafted"));
    assert!(lines.all(|l| l == "0" || l == "1"));
}

#[test]
fn test_schema_excludes_target_and_dropped_columns() {
    let fx = fixture();
    let report = run_pipeline(&PipelineConfig::default(), &fx.paths).unwrap();

    assert_eq!(report.schema.categorical_columns(), vec!["team", "yr"]);
    assert_eq!(report.schema.numeric_columns(), vec!["rimmade", "pts", "ast"]);
    assert!(report.schema.kind_of("drafted").is_none());
    assert!(report.schema.kind_of("pick").is_none());
}

#[test]
fn test_pipeline_is_deterministic() {
    let fx = fixture();
    let second = fx.dir.path().join("again");
    let paths_again = PipelinePaths::new(&fx.paths.train, &fx.paths.test, &second);

    run_pipeline(&PipelineConfig::default(), &fx.paths).unwrap();
    run_pipeline(&PipelineConfig::default(), &paths_again).unwrap();

    for name in OUTPUT_FILES {
        let a = fs::read(fx.paths.output_dir.join(name)).unwrap();
        let b = fs::read(second.join(name)).unwrap();
        assert_eq!(a, b, "{} differs between runs", name);
    }
}

#[test]
fn test_different_seed_changes_split() {
    let fx = fixture();
    let other = fx.dir.path().join("seeded");
    let paths_other = PipelinePaths::new(&fx.paths.train, &fx.paths.test, &other);

    run_pipeline(&PipelineConfig::default(), &fx.paths).unwrap();
    run_pipeline(&PipelineConfig::default().with_seed(99), &paths_other).unwrap();

    let a = fs::read(fx.paths.output_dir.join("X_train.csv")).unwrap();
    let b = fs::read(other.join("X_train.csv")).unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_scaled_features_stay_in_range() {
    let fx = fixture();
    run_pipeline(&PipelineConfig::default(), &fx.paths).unwrap();

    // synthetic rows lie between scaled originals
    let x_train = DataLoader::new()
        .load_csv(fx.paths.output_dir.join("X_train.csv"))
        .unwrap();
    let pts = x_train.column("pts").unwrap().to_dense().unwrap();
    assert!(pts.iter().all(|v| v.abs() < 5.0));
}

#[test]
fn test_fit_on_train_policy_runs() {
    let fx = fixture();
    let config = PipelineConfig::default().with_preprocessing(
        PreprocessingConfig::default().with_fit_policy(FitPolicy::FitOnTrain),
    );
    let report = run_pipeline(&config, &fx.paths).unwrap();
    assert_eq!(report.class_counts_after, BTreeMap::from([(0, 50), (1, 50)]));
}

#[test]
fn test_predict_features_written_on_request() {
    let fx = fixture();
    let config = PipelineConfig::default().with_predict_features(true);
    let report = run_pipeline(&config, &fx.paths).unwrap();

    assert_eq!(report.outputs.len(), 7);
    let predict = DataLoader::new()
        .load_csv(fx.paths.output_dir.join("X_predict.csv"))
        .unwrap();
    assert_eq!(predict.column_names(), vec!["team", "yr", "rimmade", "pts", "ast"]);
    assert_eq!(predict.n_rows(), 20);
}

#[test]
fn test_missing_drop_column_fails_without_output() {
    let train = train_csv(15).replace("Rec_Rank", "recruit_rank");
    let fx = fixture_with(&train, &test_csv());

    let err = run_pipeline(&PipelineConfig::default(), &fx.paths).unwrap_err();
    match &err {
        DraftError::Stage { stage, dataset, .. } => {
            assert_eq!(*stage, Stage::DropColumns);
            assert_eq!(*dataset, Dataset::Train);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(matches!(err.root(), DraftError::Schema { column, .. } if column == "Rec_Rank"));
    for path in output_paths(&fx.paths.output_dir) {
        assert!(!path.exists());
    }
}

#[test]
fn test_lenient_drop_skips_missing_column() {
    let train = train_csv(15).replace("Rec_Rank", "recruit_rank");
    let fx = fixture_with(&train, &test_csv().replace("Rec_Rank", "recruit_rank"));

    let config = PipelineConfig::default()
        .with_preprocessing(PreprocessingConfig::default().with_lenient_drop());
    let report = run_pipeline(&config, &fx.paths).unwrap();
    assert!(report.schema.kind_of("recruit_rank").is_some());
}

#[test]
fn test_small_minority_class_is_insufficient() {
    let fx = fixture_with(&train_csv(4), &test_csv());

    let err = run_pipeline(&PipelineConfig::default(), &fx.paths).unwrap_err();
    assert!(matches!(err, DraftError::Stage { stage: Stage::Balance, .. }));
    match err.root() {
        DraftError::InsufficientData { class, found, required } => {
            assert_eq!((*class, *found, *required), (1, 4, 6));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!fx.paths.output_dir.join("X_train.csv").exists());
}

#[test]
fn test_missing_target_column() {
    let train = train_csv(15).replace("drafted", "selected");
    let fx = fixture_with(&train, &test_csv());

    let err = run_pipeline(&PipelineConfig::default(), &fx.paths).unwrap_err();
    assert!(matches!(err.root(), DraftError::Schema { column, .. } if column == "drafted"));
}

#[test]
fn test_missing_input_file() {
    let fx = fixture();
    let paths = PipelinePaths::new(
        fx.dir.path().join("nope.csv"),
        &fx.paths.test,
        &fx.paths.output_dir,
    );

    let err = run_pipeline(&PipelineConfig::default(), &paths).unwrap_err();
    assert!(matches!(err, DraftError::Stage { stage: Stage::Load, dataset: Dataset::Train, .. }));
    assert!(matches!(err.root(), DraftError::Io { .. }));
}

#[test]
fn test_failed_write_leaves_no_outputs() {
    let fx = fixture();
    // the features write fine, then the label file cannot be renamed into place
    fs::create_dir_all(fx.paths.output_dir.join("y_train.csv")).unwrap();

    let err = run_pipeline(&PipelineConfig::default(), &fx.paths).unwrap_err();
    assert!(matches!(err, DraftError::Stage { stage: Stage::Write, .. }));
    match err.root() {
        DraftError::Io { path, .. } => assert!(path.ends_with("y_train.csv")),
        other => panic!("unexpected error: {other}"),
    }

    let left: Vec<String> = fs::read_dir(&fx.paths.output_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(left, vec!["y_train.csv".to_string()]);
}

#[test]
fn test_short_row_in_input_is_rejected() {
    let mut train = train_csv(15);
    train.push_str("Duke,Fr,,5,1\n");
    let fx = fixture_with(&train, &test_csv());

    let err = run_pipeline(&PipelineConfig::default(), &fx.paths).unwrap_err();
    assert!(matches!(err, DraftError::Stage { stage: Stage::Load, dataset: Dataset::Train, .. }));
    assert!(matches!(err.root(), DraftError::Format { .. }));
}
