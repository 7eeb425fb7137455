use std::fs;
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn deck_command() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_reveal-deck"));
    cmd.env_remove("PORT").env_remove("HOST");
    cmd
}

fn run_command(args: &[&str]) -> Output {
    deck_command()
        .args(args)
        .output()
        .expect("Failed to execute command")
}

#[cfg(unix)]
fn write_fake_tool(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    // Renders a page on `build`, leaves a marker on `watch`
    let script = r#"#!/bin/sh
case "$1" in
  build) echo "<h1>Rendered deck</h1>" > index.html ;;
  watch) touch watch-started ;;
  *) exit 2 ;;
esac
"#;
    let path = dir.join("staticjinja");
    fs::write(&path, script).expect("Failed to write fake tool");
    let mut perms = fs::metadata(&path).expect("Failed to stat fake tool").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("Failed to chmod fake tool");
    path
}

fn free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .and_then(|l| l.local_addr())
        .map(|a| a.port())
        .expect("Failed to find a free port")
}

fn wait_for_ok(url: &str, timeout: Duration) -> Option<String> {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if let Ok(response) = reqwest::blocking::get(url) {
            if response.status().is_success() {
                return response.text().ok();
            }
        }
        thread::sleep(Duration::from_millis(100));
    }
    None
}

fn stop(mut child: Child) -> Output {
    let _ = child.kill();
    child.wait_with_output().expect("Failed to collect output")
}

#[test]
fn test_missing_tool_exits_non_zero() {
    let project = TempDir::new().expect("Failed to create temp dir");

    let output = run_command(&[
        "--dir",
        project.path().to_str().unwrap(),
        "--tool",
        "reveal-deck-definitely-missing-tool",
    ]);

    assert_eq!(output.status.code(), Some(1), "Command output: {:?}", output);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("reveal-deck-definitely-missing-tool is missing"),
        "Unexpected stderr: {}",
        stderr
    );
}

#[test]
fn test_invalid_port_env_exits_non_zero() {
    let output = deck_command()
        .env("PORT", "not-a-port")
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid port"), "Unexpected stderr: {}", stderr);
}

#[cfg(unix)]
#[test]
fn test_strict_submodule_exits_non_zero() {
    let project = TempDir::new().expect("Failed to create temp dir");
    fs::create_dir(project.path().join("slides")).unwrap();
    let tool = write_fake_tool(project.path());

    let output = run_command(&[
        "--dir",
        project.path().to_str().unwrap(),
        "--tool",
        tool.to_str().unwrap(),
        "--strict-submodule",
    ]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Could not find reveal.js"), "Unexpected stderr: {}", stderr);
}

#[cfg(unix)]
#[test]
fn test_builds_and_serves_without_submodule() {
    let project = TempDir::new().expect("Failed to create temp dir");
    fs::create_dir(project.path().join("slides")).unwrap();
    let tool = write_fake_tool(project.path());
    let port = free_port();

    let child = deck_command()
        .args([
            "--dir",
            project.path().to_str().unwrap(),
            "--tool",
            tool.to_str().unwrap(),
            "--host",
            "127.0.0.1",
            "--port",
            &port.to_string(),
        ])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start server");

    let body = wait_for_ok(
        &format!("http://127.0.0.1:{}/slides/index.html", port),
        Duration::from_secs(20),
    );
    let output = stop(child);

    assert_eq!(body.as_deref().map(str::trim), Some("<h1>Rendered deck</h1>"));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Building presentation for slides"), "stdout: {}", stdout);
    assert!(
        stdout.contains(&format!("serving at http://127.0.0.1:{}", port)),
        "stdout: {}",
        stdout
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Could not find reveal.js"), "stderr: {}", stderr);
}

#[cfg(unix)]
#[test]
fn test_watch_flag_starts_watcher() {
    let project = TempDir::new().expect("Failed to create temp dir");
    fs::create_dir(project.path().join("slides")).unwrap();
    fs::create_dir(project.path().join("reveal.js")).unwrap();
    fs::write(project.path().join("reveal.js/package.json"), "{}").unwrap();
    let tool = write_fake_tool(project.path());
    let port = free_port();

    let child = deck_command()
        .args([
            "--dir",
            project.path().to_str().unwrap(),
            "--tool",
            tool.to_str().unwrap(),
            "--host",
            "127.0.0.1",
            "--port",
            &port.to_string(),
            "--watch",
        ])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start server");

    let served = wait_for_ok(
        &format!("http://127.0.0.1:{}/reveal.js/package.json", port),
        Duration::from_secs(20),
    );
    let marker = project.path().join("slides/watch-started");
    let start = Instant::now();
    while !marker.exists() && start.elapsed() < Duration::from_secs(10) {
        thread::sleep(Duration::from_millis(50));
    }
    let output = stop(child);

    assert_eq!(served.as_deref(), Some("{}"));
    assert!(marker.exists(), "Watcher never ran");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Staticjinja watch for slides"), "stdout: {}", stdout);
}

#[cfg(unix)]
#[test]
fn test_port_flag_overrides_malformed_port_env() {
    let project = TempDir::new().expect("Failed to create temp dir");
    fs::create_dir(project.path().join("slides")).unwrap();
    let tool = write_fake_tool(project.path());
    let port = free_port();

    let child = deck_command()
        .env("PORT", "bad")
        .args([
            "--dir",
            project.path().to_str().unwrap(),
            "--tool",
            tool.to_str().unwrap(),
            "--host",
            "127.0.0.1",
            "--port",
            &port.to_string(),
        ])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start server");

    let body = wait_for_ok(
        &format!("http://127.0.0.1:{}/slides/index.html", port),
        Duration::from_secs(20),
    );
    let output = stop(child);

    assert_eq!(
        body.as_deref().map(str::trim),
        Some("<h1>Rendered deck</h1>"),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}
