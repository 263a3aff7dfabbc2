//! QEMU runner for the lm3s6965evb board.

use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};
use tempfile::NamedTempFile;

/// What a run left behind.
pub struct QemuOutput {
    /// defmt frames written through semihosting stdout.
    pub semihosting: Vec<u8>,
    /// Characters the emulated UART_DM put on the wire, captured from UART0.
    pub console: Vec<u8>,
}

/// Run an ELF in QEMU until it exits through semihosting.
pub fn run_qemu(elf_path: &Path) -> Result<QemuOutput> {
    let console_file = NamedTempFile::new().context("Failed to create temp file for UART0")?;
    let console_path = console_file.path();

    let output = Command::new("qemu-system-arm")
        .args(["-cpu", "cortex-m3", "-machine", "lm3s6965evb"])
        .args(["-nographic", "-monitor", "none"])
        .args(["-semihosting-config", "enable=on,target=native"])
        .arg("-serial")
        .arg(format!("file:{}", console_path.display()))
        .arg("-kernel")
        .arg(elf_path)
        .stdin(Stdio::null())
        .output()
        .context("Failed to run QEMU")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "QEMU exited with error: {:?}\n{}",
            output.status.code(),
            stderr
        );
    }

    Ok(QemuOutput {
        semihosting: output.stdout,
        console: fs::read(console_path).unwrap_or_default(),
    })
}
