//! CLI entrypoint for the widescan conformance harness.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, Subcommand};

use widescan_harness::fixtures::{FixtureSet, builtin_corpus};
use widescan_harness::structured_log::{
    ArtifactIndex, LogEmitter, LogEntry, LogLevel, Outcome, StreamKind,
};
use widescan_harness::{HarnessError, TestRunner};

/// Conformance tooling for widescan.
#[derive(Debug, Parser)]
#[command(name = "widescan-harness")]
#[command(about = "Conformance testing harness for widescan")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write the built-in fixture corpus (and its artifact index) to disk.
    Capture {
        /// Output directory for fixture JSON files.
        #[arg(long)]
        output: PathBuf,
    },
    /// Verify the engine against a fixture file or directory.
    Verify {
        /// Fixture JSON file, or a directory of them.
        #[arg(long)]
        fixture: PathBuf,
        /// Optional JSONL structured-log output path.
        #[arg(long)]
        log: Option<PathBuf>,
        /// Optional fixed timestamp string for deterministic logs.
        #[arg(long)]
        timestamp: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(clean) => {
            if clean {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("harness: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<bool, HarnessError> {
    match cli.command {
        Command::Capture { output } => {
            std::fs::create_dir_all(&output)?;
            let corpus = builtin_corpus();
            let json = corpus.to_json()?;
            let fixture_path = output.join(format!("{}.json", corpus.family));
            std::fs::write(&fixture_path, &json)?;

            let mut index = ArtifactIndex {
                trace_id: trace_id(),
                ..Default::default()
            };
            index.push(fixture_path.display().to_string(), json.as_bytes());
            let index_path = output.join("artifact_index.json");
            std::fs::write(&index_path, serde_json::to_string_pretty(&index)?)?;

            println!(
                "captured {} case(s) -> {}",
                corpus.cases.len(),
                fixture_path.display()
            );
            Ok(true)
        }
        Command::Verify {
            fixture,
            log,
            timestamp,
        } => {
            let sets = load_sets(&fixture)?;
            let runner = TestRunner::new("conformance");
            let trace = trace_id();
            let stamp = timestamp.unwrap_or_else(now_stamp);

            let mut entries = Vec::new();
            let mut total = 0usize;
            let mut failed = 0usize;
            for set in &sets {
                for result in runner.run(set) {
                    total += 1;
                    let mut entry =
                        LogEntry::new(stamp.clone(), trace.clone(), LogLevel::Info, "case_result");
                    entry.stream = Some(StreamKind::Conformance);
                    entry.case = Some(result.case_name.clone());
                    entry.outcome = Some(if result.passed {
                        Outcome::Pass
                    } else {
                        Outcome::Fail
                    });
                    if !result.passed {
                        failed += 1;
                        entry.level = LogLevel::Error;
                        entry.detail = result.diff.clone();
                        eprintln!("FAIL {} ({})", result.case_name, result.spec_section);
                        if let Some(diff) = &result.diff {
                            eprintln!("     {diff}");
                        }
                    }
                    entries.push(entry);
                }
            }

            if let Some(log_path) = log {
                let file = std::fs::File::create(&log_path)?;
                let mut emitter = LogEmitter::new(file);
                for entry in &entries {
                    emitter.emit(entry)?;
                }
            }

            println!("{} case(s), {} failure(s)", total, failed);
            Ok(failed == 0)
        }
    }
}

fn load_sets(path: &PathBuf) -> Result<Vec<FixtureSet>, HarnessError> {
    if path.is_dir() {
        let mut sets = Vec::new();
        let mut paths: Vec<_> = std::fs::read_dir(path)?
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| {
                p.extension().is_some_and(|ext| ext == "json")
                    && p.file_name().is_some_and(|n| n != "artifact_index.json")
            })
            .collect();
        paths.sort();
        for p in paths {
            sets.push(FixtureSet::from_file(&p)?);
        }
        if sets.is_empty() {
            return Err(HarnessError::Fixture(format!(
                "no fixture files under {}",
                path.display()
            )));
        }
        Ok(sets)
    } else {
        Ok(vec![FixtureSet::from_file(path)?])
    }
}

fn now_stamp() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("{secs}")
}

fn trace_id() -> String {
    format!("ws-{}", std::process::id())
}
