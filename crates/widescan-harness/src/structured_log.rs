//! Structured logging contract for widescan verification workflows.
//!
//! Provides:
//! - [`LogEntry`]: canonical JSONL log record with required + optional fields.
//! - [`ArtifactIndex`]: links logs to fixture artifacts with SHA-256 integrity.
//! - [`LogEmitter`]: writes JSONL lines to a file or stdout.
//! - [`validate_log_line`]: validates a single JSONL line against the schema.
//! - [`validate_log_file`]: validates an entire JSONL file.

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

// ---------------------------------------------------------------------------
// Log entry
// ---------------------------------------------------------------------------

/// Severity level for log entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Test/verification outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
    Error,
}

/// Evidence stream / workflow domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    Unit,
    Conformance,
    Perf,
}

/// Canonical structured log entry.
///
/// Required fields: `timestamp`, `trace_id`, `level`, `event`.
/// Optional fields carry per-case context for verification workflows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    // Required
    pub timestamp: String,
    pub trace_id: String,
    pub level: LogLevel,
    pub event: String,

    // Optional
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<StreamKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl LogEntry {
    /// A minimal entry with the required fields set.
    pub fn new(
        timestamp: impl Into<String>,
        trace_id: impl Into<String>,
        level: LogLevel,
        event: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            trace_id: trace_id.into(),
            level,
            event: event.into(),
            stream: None,
            case: None,
            outcome: None,
            detail: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Artifact index
// ---------------------------------------------------------------------------

/// One fixture or report artifact pinned by content hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactEntry {
    pub path: String,
    pub sha256: String,
}

/// Links a verification run to the exact artifact bytes it used.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ArtifactIndex {
    pub trace_id: String,
    pub artifacts: Vec<ArtifactEntry>,
}

impl ArtifactIndex {
    pub fn push(&mut self, path: impl Into<String>, bytes: &[u8]) {
        self.artifacts.push(ArtifactEntry {
            path: path.into(),
            sha256: crate::fixtures::sha256_hex(bytes),
        });
    }
}

// ---------------------------------------------------------------------------
// Emission and validation
// ---------------------------------------------------------------------------

/// Writes JSONL entries to any sink.
pub struct LogEmitter<W: Write> {
    sink: W,
}

impl<W: Write> LogEmitter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    /// Serialize one entry as a JSONL line.
    pub fn emit(&mut self, entry: &LogEntry) -> Result<(), crate::HarnessError> {
        let line = serde_json::to_string(entry)?;
        writeln!(self.sink, "{line}")?;
        Ok(())
    }
}

/// Validate a single JSONL line: parses as a [`LogEntry`] and carries
/// non-empty required fields.
pub fn validate_log_line(line: &str) -> Result<LogEntry, String> {
    let entry: LogEntry =
        serde_json::from_str(line).map_err(|e| format!("not a log entry: {e}"))?;
    if entry.timestamp.is_empty() {
        return Err("empty timestamp".into());
    }
    if entry.trace_id.is_empty() {
        return Err("empty trace_id".into());
    }
    if entry.event.is_empty() {
        return Err("empty event".into());
    }
    Ok(entry)
}

/// Validate every line of a JSONL file. Returns the entries, or the
/// first offending line number and reason.
pub fn validate_log_file(path: &Path) -> Result<Vec<LogEntry>, String> {
    let content = std::fs::read_to_string(path).map_err(|e| format!("read {path:?}: {e}"))?;
    let mut entries = Vec::new();
    for (lineno, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let entry =
            validate_log_line(line).map_err(|reason| format!("line {}: {reason}", lineno + 1))?;
        entries.push(entry);
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_and_validate_round_trip() {
        let mut buf = Vec::new();
        {
            let mut emitter = LogEmitter::new(&mut buf);
            let mut entry = LogEntry::new("0", "t-1", LogLevel::Info, "case_result");
            entry.case = Some("two_ints".into());
            entry.outcome = Some(Outcome::Pass);
            emitter.emit(&entry).unwrap();
        }
        let line = String::from_utf8(buf).unwrap();
        let entry = validate_log_line(line.trim()).unwrap();
        assert_eq!(entry.event, "case_result");
        assert_eq!(entry.outcome, Some(Outcome::Pass));
    }

    #[test]
    fn test_validate_rejects_missing_fields() {
        assert!(validate_log_line("{}").is_err());
        assert!(
            validate_log_line(r#"{"timestamp":"","trace_id":"t","level":"info","event":"e"}"#)
                .is_err()
        );
        assert!(validate_log_line("not json").is_err());
    }

    #[test]
    fn test_artifact_index_hashes() {
        let mut index = ArtifactIndex {
            trace_id: "t-2".into(),
            ..Default::default()
        };
        index.push("fixtures/wscanf.json", b"abc");
        assert_eq!(
            index.artifacts[0].sha256,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
