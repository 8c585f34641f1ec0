use batwalk::{experiment, Config, ExperimentRecord};

fn small_config(extra: &str) -> Config {
    let base = r#"
        seed = 11

        [room]
        width = 30.0
        height = 20.0

        [walk]
        steps = 3000
    "#;
    Config::from_toml_str(&format!("{}\n{}", base, extra)).expect("valid test config")
}

#[test]
fn linear_run_produces_feature_per_cell() {
    let config = small_config("");
    let record = experiment::run(&config).unwrap();

    assert_eq!(record.sensor_angles, vec![0.0, 90.0]);
    assert_eq!(record.positions.len(), 3000);
    assert_eq!((record.grid_cols, record.grid_rows), (30, 20));
    assert_eq!(record.slow_features.len(), 600);
    assert_eq!(record.feature_count(), 2);
    assert_eq!(record.slowness.len(), 2);
    assert!(record.slowness[0] <= record.slowness[1] + 1e-9);
    assert!(record
        .slow_features
        .iter()
        .flatten()
        .all(|v| v.is_finite()));
}

#[test]
fn expanded_whitened_run() {
    let config = small_config(
        r#"
        [sensors]
        count = 5
        orthogonal = false

        [features]
        degree = 2
        whitening = true
        output_dim = 3
        "#,
    );
    let record = experiment::run(&config).unwrap();

    assert_eq!(record.sensor_angles.len(), 5);
    assert_eq!(record.feature_count(), 3);
    assert_eq!(record.slow_features.len(), 600);
}

#[test]
fn ica_run_keeps_dimension() {
    let config = small_config(
        r#"
        [features]
        ica = true
        "#,
    );
    let record = experiment::run(&config).unwrap();
    assert_eq!(record.feature_count(), 2);
}

#[test]
fn same_seed_same_record() {
    let config = small_config("");
    let a = experiment::run(&config).unwrap();
    let b = experiment::run(&config).unwrap();
    assert_eq!(a.positions, b.positions);
    assert_eq!(a.slow_features, b.slow_features);
}

#[test]
fn record_save_and_load() {
    let config = small_config("");
    let record = experiment::run(&config).unwrap();

    let path = std::env::temp_dir().join(format!("batwalk_record_{}.json", std::process::id()));
    record.save_to_file(&path).unwrap();
    let loaded = ExperimentRecord::load_from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded.grid_cols, record.grid_cols);
    assert_eq!(loaded.positions.len(), record.positions.len());
    assert_eq!(loaded.feature_at(4, 7, 1), record.feature_at(4, 7, 1));
    assert_eq!(loaded.feature_at(30, 0, 0), None);
}
