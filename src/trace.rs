//! Reading branch traces.
//!
//! A trace is plain text with one resolved conditional branch per line:
//! a hexadecimal program counter (with or without a `0x` prefix) followed
//! by `1` (taken) or `0` (not taken). Blank lines are ignored.

use std::fs::File;
use std::io::{ BufRead, BufReader };
use std::path::Path;
use crate::branch::*;
use crate::error::TraceError;

/// Parse a single line of a trace. Returns [None] for a blank line.
pub fn parse_line(line: usize, text: &str) -> Result<Option<BranchRecord>, TraceError> {
    let mut fields = text.split_whitespace();
    let (pc, outcome) = match (fields.next(), fields.next(), fields.next()) {
        (None, _, _) => return Ok(None),
        (Some(pc), Some(outcome), None) => (pc, outcome),
        _ => return Err(TraceError::Malformed { line, text: text.to_string() }),
    };

    let digits = pc.strip_prefix("0x")
        .or_else(|| pc.strip_prefix("0X"))
        .unwrap_or(pc);
    let pc = usize::from_str_radix(digits, 16).map_err(|_| {
        TraceError::InvalidPc { line, text: pc.to_string() }
    })?;

    let outcome = match outcome {
        "1" => Outcome::T,
        "0" => Outcome::N,
        _ => return Err(TraceError::InvalidOutcome {
            line, text: outcome.to_string()
        }),
    };
    Ok(Some(BranchRecord::new(pc, outcome)))
}

/// A trace of resolved conditional branches.
pub struct TextTrace {
    pub data: Vec<BranchRecord>,
    pub name: String,
}
impl TextTrace {
    /// Read a trace from some buffered reader.
    pub fn from_reader(reader: impl BufRead, name: &str) -> Result<Self, TraceError> {
        let mut data = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            if let Some(record) = parse_line(idx + 1, &line?)? {
                data.push(record);
            }
        }
        Ok(Self { data, name: name.to_string() })
    }

    /// Read a trace from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        let path = path.as_ref();
        let name = path.file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let f = File::open(path)?;
        Self::from_reader(BufReader::new(f), &name)
    }

    /// Return the number of records
    pub fn num_entries(&self) -> usize { self.data.len() }

    pub fn name(&self) -> &str { &self.name }

    /// Return a slice of records.
    pub fn as_slice(&self) -> &[BranchRecord] { &self.data }

    /// Return a truncated slice of records
    pub fn as_slice_trunc(&self, limit: usize) -> &[BranchRecord] {
        &self.data[..limit.min(self.data.len())]
    }
}
