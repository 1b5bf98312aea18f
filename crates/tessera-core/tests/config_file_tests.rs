//! Loading configuration files from disk

use std::path::PathBuf;
use tessera_core::config::TesseraConfig;
use tessera_core::TesseraError;

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("tessera-{}-{}", std::process::id(), name));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_load_from_file() {
    let path = temp_file(
        "valid.json",
        r#"{
            "renderer": { "backend": "opengl", "clear_color": [0.1, 0.2, 0.3, 1.0] },
            "windowing": { "max_frames": 300 }
        }"#,
    );

    let config = TesseraConfig::load(&path).unwrap();
    assert_eq!(config.renderer.backend, "opengl");
    assert_eq!(config.renderer.clear_color, [0.1, 0.2, 0.3, 1.0]);
    assert_eq!(config.windowing.max_frames, 300);
    assert_eq!(config.windowing.platform, "headless");

    std::fs::remove_file(path).ok();
}

#[test]
fn test_missing_file_is_io_error() {
    let err = TesseraConfig::load("/definitely/not/here/tessera.json").unwrap_err();
    assert!(matches!(err, TesseraError::Io(_)));
}

#[test]
fn test_malformed_file_reports_path() {
    let path = temp_file("broken.json", "{ \"renderer\": ");

    let err = TesseraConfig::load(&path).unwrap_err();
    assert!(matches!(err, TesseraError::Configuration { .. }));
    let ctx = err.context().expect("context attached");
    assert_eq!(ctx.metadata.get("path"), Some(&path.display().to_string()));

    std::fs::remove_file(path).ok();
}
