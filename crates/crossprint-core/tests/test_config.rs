use std::io::Write;
use std::path::PathBuf;

use tempfile::NamedTempFile;

use crossprint_core::config::{EditorConfig, StoreConfig};
use crossprint_core::error::CrossPrintError;
use crossprint_core::history::ThresholdSource;

#[test]
fn test_defaults() {
    let config = EditorConfig::default();
    assert_eq!(config.threshold_source, ThresholdSource::Checkpoint);
    assert_eq!(config.default_threshold, 128);
    assert_eq!(config.export_dir, PathBuf::from("output"));
    assert_eq!(
        config.store,
        StoreConfig {
            preview_long_edge: 1600,
            full_cap_long_edge: 8000,
        }
    );
}

#[test]
fn test_partial_toml_keeps_other_defaults() {
    let config = EditorConfig::from_toml(
        r#"
default_threshold = 90
threshold_source = "working"

[store]
preview_long_edge = 1024
"#,
    )
    .unwrap();
    assert_eq!(config.default_threshold, 90);
    assert_eq!(config.threshold_source, ThresholdSource::Working);
    assert_eq!(config.store.preview_long_edge, 1024);
    assert_eq!(config.store.full_cap_long_edge, 8000);
    assert_eq!(config.export_dir, PathBuf::from("output"));
}

#[test]
fn test_toml_roundtrip() {
    let config = EditorConfig {
        default_threshold: 17,
        export_dir: PathBuf::from("/tmp/scans"),
        ..EditorConfig::default()
    };
    let text = config.to_toml().unwrap();
    assert_eq!(EditorConfig::from_toml(&text).unwrap(), config);
}

#[test]
fn test_invalid_toml_is_config_error() {
    let err = EditorConfig::from_toml("default_threshold = 999").unwrap_err();
    assert!(matches!(err, CrossPrintError::Config(_)));
}

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "export_dir = \"exports\"").unwrap();
    let config = EditorConfig::load(file.path()).unwrap();
    assert_eq!(config.export_dir, PathBuf::from("exports"));
}

#[test]
fn test_load_or_default_falls_back() {
    let missing = EditorConfig::load_or_default(std::path::Path::new("/nonexistent/crossprint.toml"));
    assert_eq!(missing, EditorConfig::default());

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "threshold_source = \"sideways\"").unwrap();
    assert_eq!(EditorConfig::load_or_default(file.path()), EditorConfig::default());
}
