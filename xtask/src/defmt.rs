//! Decoding of the driver's defmt log.

use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use defmt_decoder::{DecodeError, Frame, Locations, Table};

/// Severity of a decoded line, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// `defmt::println!` output, which carries no level.
    Print,
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Severity {
    fn of(frame: &Frame) -> Self {
        match frame.level().map(|l| l.as_str()) {
            Some("trace") => Severity::Trace,
            Some("debug") => Severity::Debug,
            Some("info") => Severity::Info,
            Some("warn") => Severity::Warn,
            Some("error") => Severity::Error,
            _ => Severity::Print,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Severity::Print => "PRINT",
            Severity::Trace => "TRACE",
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

/// One decoded log frame.
pub struct LogLine {
    pub severity: Severity,
    /// `file:line` of the log statement, if the ELF carries locations.
    pub location: Option<String>,
    pub message: String,
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(loc) = &self.location {
            write!(f, "{loc}: ")?;
        }
        write!(f, "[{:<5}] {}", self.severity.label(), self.message)
    }
}

/// Decode the defmt frames `elf_path` wrote over semihosting.
pub fn decode_log(elf_path: &Path, raw: &[u8]) -> Result<Vec<LogLine>> {
    let elf = fs::read(elf_path).context("Failed to read ELF file")?;
    let table = Table::parse(&elf)
        .context("Failed to parse defmt table from ELF")?
        .ok_or_else(|| anyhow::anyhow!("No defmt data found in ELF"))?;
    let locs = table.get_locations(&elf).ok();

    let mut decoder = table.new_stream_decoder();
    decoder.received(raw);

    let mut lines = Vec::new();
    loop {
        match decoder.decode() {
            Ok(frame) => lines.push(LogLine {
                severity: Severity::of(&frame),
                location: location(&frame, locs.as_ref()),
                message: frame.display_message().to_string(),
            }),
            Err(DecodeError::UnexpectedEof) => break,
            Err(DecodeError::Malformed) => bail!("Malformed defmt frame"),
        }
    }
    Ok(lines)
}

/// Print the lines at `min` severity or above.
pub fn print_log(lines: &[LogLine], min: Severity) {
    for line in lines.iter().filter(|l| l.severity >= min) {
        println!("{line}");
    }
}

fn location(frame: &Frame, locs: Option<&Locations>) -> Option<String> {
    let loc = locs?.get(&frame.index())?;
    let file = loc
        .file
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| loc.file.display().to_string());
    Some(format!("{file}:{}", loc.line))
}
