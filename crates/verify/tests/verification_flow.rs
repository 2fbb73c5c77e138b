//! Flow tests for the verification runner
//!
//! These cover the paths that do not need Playwright installed: the compile
//! gate must fail closed without ever launching a browser.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

use sprinkler_verify::{BrowserConfig, DevServerConfig, Verification, VerifyError};

fn stub_script(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("react-scripts");
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("write stub script");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod stub script");
    path
}

#[tokio::test]
async fn compile_failure_returns_false_and_writes_no_screenshot() {
    let dir = TempDir::new().expect("create temp dir");
    let screenshot = dir.path().join("verification.png");

    let server = DevServerConfig {
        script_path: stub_script(dir.path(), "echo 'Starting the development server...'\nsleep 30"),
        project_dir: dir.path().to_path_buf(),
        log_path: dir.path().join("npm_start.log"),
        compile_wait: Duration::from_millis(300),
        ..Default::default()
    };
    let browser = BrowserConfig {
        screenshot_path: screenshot.clone(),
        ..Default::default()
    };

    let outcome = Verification::with_config(server, browser)
        .run()
        .await
        .expect("graceful failure, not an error");

    assert!(!outcome, "missing compile marker must fail the run");
    assert!(
        !screenshot.exists(),
        "browser must never be launched when the compile gate fails"
    );
}

#[tokio::test]
async fn missing_server_script_is_a_spawn_error() {
    let dir = TempDir::new().expect("create temp dir");

    let server = DevServerConfig {
        script_path: dir.path().join("does-not-exist"),
        project_dir: dir.path().to_path_buf(),
        log_path: dir.path().join("npm_start.log"),
        compile_wait: Duration::from_millis(100),
        ..Default::default()
    };

    let err = Verification::with_config(server, BrowserConfig::default())
        .run()
        .await
        .expect_err("spawn failure must propagate");

    assert!(matches!(err, VerifyError::ServerSpawn(_)));
}
