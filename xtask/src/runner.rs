//! Runs one example and judges its console output.

use std::fs;
use std::path::Path;

use anyhow::Result;

use crate::build::{build_example, project_root};
use crate::defmt::{self, Severity};
use crate::qemu::run_qemu;

/// Options for running an example.
pub struct RunOptions {
    /// Print the console and the decoded driver log (for `qemu` command).
    pub verbose: bool,
    /// Update expected files instead of comparing (for `test --bless`).
    pub bless: bool,
    /// Build in release mode.
    pub release: bool,
}

/// How a comparison against the expected console output went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Pass,
    Fail,
    Missing,
    Blessed(&'static str),
}

/// Build and run `example`.
///
/// Returns `Ok(true)` if the test passed, `Ok(false)` if it failed.
pub fn run_example(example: &str, opts: &RunOptions) -> Result<bool> {
    println!("Building '{example}'...");
    let elf_path = build_example(example, opts.release)?;

    println!("Running in QEMU...");
    let output = run_qemu(&elf_path)?;
    let log = defmt::decode_log(&elf_path, &output.semihosting)?;
    let console = String::from_utf8_lossy(&output.console).into_owned();

    if opts.verbose {
        println!("--- console ---");
        print!("{}", console.escape_debug());
        println!();
        println!("--- driver log ---");
        defmt::print_log(&log, Severity::Print);
        println!("--- QEMU run end ---");
        return Ok(true);
    }

    let verdict = judge(example, &console, opts.bless)?;
    match verdict {
        Verdict::Pass => println!("  PASS"),
        Verdict::Blessed(status) => println!("  {example}.expected: {status}"),
        Verdict::Missing => {
            println!("  No expected output file, run with --bless to create");
            println!("--- console ---");
            println!("{}", console.escape_debug());
        }
        Verdict::Fail => {
            let expected = fs::read_to_string(expected_path(example))?;
            println!("  FAIL: console output differs from expected");
            println!("--- expected ---");
            println!("{}", expected.escape_debug());
            println!("--- console ---");
            println!("{}", console.escape_debug());
            // Stale-flush traces add little to a console mismatch.
            println!("--- driver log (debug and above) ---");
            defmt::print_log(&log, Severity::Debug);
        }
    }
    Ok(matches!(verdict, Verdict::Pass | Verdict::Blessed(_)))
}

fn expected_path(example: &str) -> std::path::PathBuf {
    project_root()
        .join("testsuite")
        .join("expected")
        .join(format!("{example}.expected"))
}

fn judge(example: &str, console: &str, bless: bool) -> Result<Verdict> {
    let path = expected_path(example);

    if bless {
        return bless_file(&path, console).map(Verdict::Blessed);
    }
    if !path.exists() {
        return Ok(Verdict::Missing);
    }
    let expected = fs::read_to_string(&path)?;
    Ok(if expected == console {
        Verdict::Pass
    } else {
        Verdict::Fail
    })
}

fn bless_file(path: &Path, console: &str) -> Result<&'static str> {
    if path.exists() {
        if fs::read_to_string(path)? == console {
            return Ok("No change");
        }
        fs::write(path, console)?;
        Ok("Updated")
    } else {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, console)?;
        Ok("Created")
    }
}
