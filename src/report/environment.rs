//! Build environment metadata attached to experiment reports.

use std::process::Command;

use chrono::Local;
use serde::{Deserialize, Serialize};

/// Toolchain and platform the experiment ran on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentInfo {
    pub node_version: String,
    pub emscripten_version: String,
    pub platform: String,
}

impl EnvironmentInfo {
    /// Asks the installed toolchain for its versions; tools that cannot be run report "unknown".
    pub fn detect() -> Self {
        Self {
            node_version: node_version(),
            emscripten_version: emscripten_version(),
            platform: platform_string(),
        }
    }
}

/// `"<os> <arch>"`, e.g. `"linux x86_64"`.
pub fn platform_string() -> String {
    format!("{} {}", std::env::consts::OS, std::env::consts::ARCH)
}

/// Format of report timestamps, local time with microseconds.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Current local time, e.g. `2026-10-18T09:30:00.123456`.
pub fn now_iso8601() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

fn node_version() -> String {
    read_stdout("node", &["--version"])
}

fn emscripten_version() -> String {
    let output = read_stdout("emcc", &["--version"]);
    output
        .lines()
        .find(|line| line.contains("emcc"))
        .map(|line| line.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn read_stdout(cmd: &str, args: &[&str]) -> String {
    Command::new(cmd)
        .args(args)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
