//! Common test utilities for TUI tests.

use std::io::Write;
use std::process::{Command, Stdio};

/// Config path that never exists, so the user's config stays out of the tests.
pub const NO_CONFIG: &str = "/nonexistent/smart-complete/config.toml";

/// Runs smart-complete with the given arguments and no config file.
pub fn run_headless(args: &[&str]) -> (i32, String, String) {
    let mut full = vec!["--config", NO_CONFIG];
    full.extend_from_slice(args);
    run(&full, None)
}

/// Runs smart-complete with the given arguments, feeding `stdin` if set.
/// `cargo test` builds the binary before integration tests run.
pub fn run(args: &[&str], stdin: Option<&str>) -> (i32, String, String) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_smart-complete"))
        .args(args)
        .env("RUST_LOG", "warn")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute command");

    // Dropping the handle closes stdin
    if let Some(mut pipe) = child.stdin.take() {
        if let Some(input) = stdin {
            pipe.write_all(input.as_bytes())
                .expect("Failed to write stdin");
        }
    }

    let output = child.wait_with_output().expect("Failed to wait for command");
    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    (exit_code, stdout, stderr)
}
