//! Generates the human-readable version string shown by `--version`.
//!
//! Uses `git describe --tags --always --dirty` when building inside a git
//! checkout, otherwise falls back to a pseudo-version built from the
//! Cargo.toml version and the build timestamp.

use std::process::Command;

use chrono::Utc;

fn main() {
    ["src", "build.rs", "Cargo.toml"]
        .iter()
        .for_each(|path| println!("cargo:rerun-if-changed={path}"));

    println!("cargo:rustc-env=BUILD_INFO_HUMAN={}", build_info());
}

fn git_command(args: &[&str]) -> Option<String> {
    Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn rustc_version() -> Option<String> {
    Command::new("rustc")
        .arg("--version")
        .output()
        .ok()
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
}

fn git_version() -> String {
    git_command(&["describe", "--tags", "--always", "--dirty"]).unwrap_or_else(|| {
        format!(
            "v{}-{}",
            env!("CARGO_PKG_VERSION"),
            Utc::now().format("%Y%m%d%H%M%S")
        )
    })
}

fn build_info() -> String {
    let components = [
        Some(env!("CARGO_PKG_VERSION").to_string()),
        Some(format!("({})", git_version())),
        rustc_version(),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>();

    components.join(" ")
}
