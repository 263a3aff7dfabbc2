//! Building testsuite examples for the emulated Cortex-M3.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};

/// Target triple of the lm3s6965evb board.
pub const TARGET: &str = "thumbv7m-none-eabi";

/// Get the workspace root directory.
pub fn project_root() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| std::env::current_dir().unwrap());

    // xtask lives one level below the root.
    if manifest_dir.ends_with("xtask") {
        manifest_dir.parent().unwrap().to_path_buf()
    } else {
        manifest_dir
    }
}

/// Build `example` with driver logging at trace level and return its ELF.
pub fn build_example(example: &str, release: bool) -> Result<PathBuf> {
    let root = project_root();

    let mut cmd = Command::new("cargo");
    cmd.current_dir(root.join("testsuite"))
        .env("DEFMT_LOG", "trace")
        .stderr(Stdio::inherit())
        .args(["build", "--example", example, "--target", TARGET]);
    if release {
        cmd.arg("--release");
    }

    let status = cmd.status().context("Failed to run cargo build")?;
    if !status.success() {
        bail!("building example '{example}' failed");
    }

    let profile = if release { "release" } else { "debug" };
    Ok(root
        .join("target")
        .join(TARGET)
        .join(profile)
        .join("examples")
        .join(example))
}

/// Names of all examples in `testsuite/examples`, sorted.
pub fn discover_examples() -> Result<Vec<String>> {
    let dir = project_root().join("testsuite").join("examples");

    let mut examples = Vec::new();
    for entry in fs::read_dir(&dir).with_context(|| format!("Failed to read {}", dir.display()))? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "rs") {
            if let Some(stem) = path.file_stem() {
                examples.push(stem.to_string_lossy().into_owned());
            }
        }
    }
    examples.sort();
    Ok(examples)
}
