use std::fmt::Write as _;
use std::path::Path;

use heart_risk::input::PatientInput;
use heart_risk::io::{self, WriteFormat};
use heart_risk::{bundle, cleaning, pipeline, TrainConfig, FEATURES, TARGET};

/// Writes a synthetic heart dataset with a few duplicates and gaps.
fn write_dataset(path: &Path) {
    let mut text = FEATURES.join(",");
    text.push(',');
    text.push_str(TARGET);
    text.push('\n');

    for i in 0..120usize {
        let sick = i % 2 == 0;
        let wobble = (i % 7) as f64;
        let age = if sick { 58.0 } else { 44.0 } + wobble;
        let cp = if sick { 0 } else { 2 };
        let thalach = if sick { 130.0 } else { 165.0 } + wobble * 2.0;
        let exang = if sick && i % 3 != 0 { 1 } else { 0 };
        let oldpeak = if sick { 2.0 } else { 0.4 } + wobble / 10.0;
        let ca = if sick { (i % 3) as i32 + 1 } else { 0 };
        let chol = 200.0 + ((i * 37) % 90) as f64;
        let chol = if i % 17 == 5 { String::new() } else { chol.to_string() };
        writeln!(
            text,
            "{age},{},{cp},{},{chol},{},{},{thalach},{exang},{oldpeak},{},{ca},{},{}",
            i % 2,
            120 + (i * 13) % 40,
            (i % 5 == 0) as i32,
            i % 2,
            if sick { 1 } else { 2 },
            if sick { 3 } else { 2 },
            sick as i32,
        )
        .unwrap();
    }
    // exact duplicates of the first rows
    let lines: Vec<String> = text.lines().skip(1).take(5).map(String::from).collect();
    for line in lines {
        text.push_str(&line);
        text.push('\n');
    }

    std::fs::write(path, text).unwrap();
}

fn spec_patient() -> PatientInput {
    PatientInput {
        age: Some(25.0),
        sex: Some(0.0),
        cp: Some(0.0),
        trestbps: Some(120.0),
        chol: Some(200.0),
        fbs: Some(0.0),
        restecg: Some(0.0),
        thalach: Some(150.0),
        exang: Some(0.0),
        oldpeak: Some(1.0),
        slope: Some(0.0),
        ca: Some(0.0),
        thal: Some(0.0),
    }
}

#[test]
fn test_preprocess_writes_clean_and_scaled_files() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("heart.csv");
    write_dataset(&input);

    let raw = io::read_csv(&input).unwrap();
    assert_eq!(raw.height(), 125);
    let mut result = pipeline::preprocess(raw, true).unwrap();
    assert_eq!(result.cleaned.height(), 120);
    assert_eq!(cleaning::missing_count(&result.cleaned), 0);

    let cleaned_path = dir.path().join("heart_cleaned.csv");
    let scaled_path = dir.path().join("heart_scaled.csv");
    io::write_dataset(&cleaned_path, &mut result.cleaned, WriteFormat::Csv).unwrap();
    io::write_dataset(&scaled_path, &mut result.scaled, WriteFormat::Csv).unwrap();

    let scaled = io::read_csv(&scaled_path).unwrap();
    assert_eq!(scaled.shape(), (120, 14));
    let age_mean = scaled.column("age").unwrap().mean().unwrap();
    assert!(age_mean.abs() < 1e-6);
}

#[tokio::test]
async fn test_train_save_load_predict() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("heart.csv");
    let model_path = dir.path().join("model.json");
    write_dataset(&input);

    let outcome = pipeline::train(io::read_csv(&input).unwrap(), &TrainConfig::default()).unwrap();
    assert_eq!(outcome.report.rows, 120);
    assert_eq!(outcome.report.n_test, 24);
    assert!(outcome.report.accuracy > 0.8);
    bundle::save(&model_path, &outcome.bundle).await.unwrap();

    let record = spec_patient().validate().unwrap();
    let before = outcome.bundle.predict(&record).unwrap();

    let loaded = bundle::load(&model_path).await.unwrap();
    let after = loaded.predict(&record).unwrap();
    assert_eq!(before, after);

    assert!(after.label == 0 || after.label == 1);
    assert!((0.0..=1.0).contains(&after.probability));
    let negative = loaded
        .classifier
        .probability_of(
            &loaded
                .selector
                .transform_row(&loaded.scaler.transform_row(&record.to_vector()).unwrap())
                .unwrap(),
            0,
        )
        .unwrap();
    assert!((after.probability + negative - 1.0).abs() < 1e-12);
}

#[test]
fn test_training_twice_gives_same_accuracy() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("heart.csv");
    write_dataset(&input);

    let config = TrainConfig::default();
    let first = pipeline::train(io::read_csv(&input).unwrap(), &config).unwrap();
    let second = pipeline::train(io::read_csv(&input).unwrap(), &config).unwrap();
    assert_eq!(first.report.test_indices, second.report.test_indices);
    assert_eq!(first.report.accuracy, second.report.accuracy);
}
