//! Lifecycle tests for the dev-server handle using stub shell scripts

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

use sprinkler_verify::server::{DevServerConfig, DevServerHandle};

/// Write an executable stub script standing in for react-scripts
fn stub_script(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("react-scripts");
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("write stub script");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod stub script");
    path
}

fn config(dir: &TempDir, body: &str) -> DevServerConfig {
    DevServerConfig {
        script_path: stub_script(dir.path(), body),
        project_dir: dir.path().to_path_buf(),
        log_path: dir.path().join("npm_start.log"),
        compile_wait: Duration::from_millis(300),
        ..Default::default()
    }
}

#[tokio::test]
async fn compile_marker_present_gates_open() {
    let dir = TempDir::new().expect("create temp dir");
    let cfg = config(
        &dir,
        "echo 'Starting the development server...'\necho 'Compiled successfully!'\nsleep 30",
    );

    let mut server = DevServerHandle::spawn(&cfg).expect("spawn stub server");
    let compiled = server.wait_for_compiled().await.expect("read log");
    server.stop();

    assert!(compiled, "marker in log should gate open");
}

#[tokio::test]
async fn compile_marker_absent_gates_closed() {
    let dir = TempDir::new().expect("create temp dir");
    let cfg = config(&dir, "echo 'Starting the development server...'\nsleep 30");

    let mut server = DevServerHandle::spawn(&cfg).expect("spawn stub server");
    let compiled = server.wait_for_compiled().await.expect("read log");
    server.stop();

    assert!(!compiled, "missing marker must report failure");
}

#[tokio::test]
async fn stderr_is_captured_in_the_log() {
    let dir = TempDir::new().expect("create temp dir");
    let cfg = config(&dir, "echo 'Compiled successfully!' >&2\nsleep 30");

    let mut server = DevServerHandle::spawn(&cfg).expect("spawn stub server");
    let compiled = server.wait_for_compiled().await.expect("read log");
    server.stop();

    assert!(compiled, "stderr output must land in the same log file");
}

#[tokio::test]
async fn stop_terminates_child_and_is_idempotent() {
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    let dir = TempDir::new().expect("create temp dir");
    let cfg = config(&dir, "sleep 30");

    let mut server = DevServerHandle::spawn(&cfg).expect("spawn stub server");
    let pid = Pid::from_raw(server.id() as i32);

    // Child is alive before stop
    assert!(kill(pid, None).is_ok(), "child should be running");

    server.stop();
    assert!(
        kill(pid, None).is_err(),
        "child must be terminated and reaped after stop"
    );

    // Second stop (and the Drop that follows) must not signal again
    server.stop();
}

#[test]
fn spawn_missing_script_fails() {
    let dir = TempDir::new().expect("create temp dir");
    let cfg = DevServerConfig {
        script_path: dir.path().join("does-not-exist"),
        project_dir: dir.path().to_path_buf(),
        log_path: dir.path().join("npm_start.log"),
        ..Default::default()
    };

    assert!(DevServerHandle::spawn(&cfg).is_err());
}
