//! File logging setup. Installs the global subscriber, so it lives in its
//! own test binary.

use tempfile::TempDir;
use texgen::logging::init_logging;

#[test]
fn test_init_logging_writes_log_file() {
    let dir = TempDir::new().unwrap();
    let log_dir = dir.path().join("logs");

    let guard = init_logging(&log_dir, "pipeline.log").unwrap();
    tracing::error!(stage = "compile", "compile failed");
    drop(guard);

    let contents = std::fs::read_to_string(log_dir.join("pipeline.log")).unwrap();
    assert!(contents.contains("compile failed"));
    assert!(contents.contains("stage=\"compile\""));
}
