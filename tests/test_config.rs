// Training configuration loading and validation.

use chain_nn::{NetworkError, TrainConfig, TASK_SIZE};

fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("chain-nn-{}-{}", std::process::id(), name));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn defaults_cover_unspecified_fields() {
    let config = TrainConfig::default();
    assert_eq!(config.batch_size, 1);
    assert_eq!(config.epochs, 1);
    assert!(config.reset_weights);
    assert_eq!(config.thread_count, TASK_SIZE);
    assert_eq!(config.divergence_check_interval, 100);
    assert_eq!(config.hessian_sample_cap, 500);
}

#[test]
fn loads_partial_json() {
    let path = write_temp(
        "train.json",
        r#"{ "batch_size": 32, "epochs": 10, "reset_weights": false, "divergence_check_interval": 25 }"#,
    );
    let config = TrainConfig::load_json(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(
        config,
        TrainConfig {
            batch_size: 32,
            epochs: 10,
            reset_weights: false,
            divergence_check_interval: 25,
            ..TrainConfig::default()
        }
    );
}

#[test]
fn rejects_zero_threads() {
    let path = write_temp("zero-threads.json", r#"{ "thread_count": 0 }"#);
    let err = TrainConfig::load_json(&path).unwrap_err();
    std::fs::remove_file(&path).ok();
    assert!(matches!(err, NetworkError::InvalidConfig(_)));
}

#[test]
fn malformed_json_is_reported() {
    let path = write_temp("broken.json", r#"{ "batch_size": "many" }"#);
    let err = TrainConfig::load_json(&path).unwrap_err();
    std::fs::remove_file(&path).ok();
    assert!(matches!(err, NetworkError::Json(_)));
}
