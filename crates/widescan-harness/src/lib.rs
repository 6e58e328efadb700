//! Conformance harness for the widescan engine.
//!
//! Fixture files pair `(input, format)` with the expected return value
//! and expected assigned values; the runner replays them against the
//! engine and reports divergence. Structured JSONL logging and a SHA-256
//! artifact index tie verification runs to the exact fixture bytes they
//! ran against.

pub mod fixtures;
pub mod runner;
pub mod structured_log;

pub use fixtures::{ExpectedValue, FixtureCase, FixtureSet};
pub use runner::{TestRunner, VerificationResult};

use thiserror::Error;

/// Harness-level failure.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("fixture: {0}")]
    Fixture(String),
}
