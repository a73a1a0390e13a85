//! CI job records and normalization
//!
//! The runner's result array holds loosely-shaped job records; this
//! module pins down the fields the report needs (`RawJob`) and derives
//! the flat [`NormalizedJob`] every downstream stage works with.
//!
//! There is no per-job error isolation: one misshapen record aborts the
//! whole run.

pub mod command;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use self::command::{derive_name, parse_command};

/// Job type string for compile jobs
pub const JOB_TYPE_COMPILE: &str = "compile";

/// Job type string for test-run jobs
pub const JOB_TYPE_RUN_TEST: &str = "run_test";

/// Normalization errors
#[derive(Debug, Error)]
pub enum JobError {
    #[error("malformed job record: {0}")]
    Shape(#[from] serde_json::Error),

    #[error("invalid runtime value {0:?}")]
    InvalidRuntime(String),
}

/// One element of the runner's result array (external input shape).
///
/// Extra fields are ignored; the listed ones are required.
#[derive(Debug, Clone, Deserialize)]
pub struct RawJob {
    pub result: RawResult,
}

/// The `result` payload of a raw job
#[derive(Debug, Clone, Deserialize)]
pub struct RawResult {
    pub status: RawStatus,
    pub worker: String,
    pub runtime: RawRuntime,
    pub output: String,
    pub body: RawBody,
}

/// The `result.body` payload of a raw job
#[derive(Debug, Clone, Deserialize)]
pub struct RawBody {
    pub command: String,
}

/// Pass/fail code as emitted by the runner: numeric or string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawStatus {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawStatus {
    /// Closed membership test: 0, `"0"` and `"pass"` are the only
    /// passing values. Everything else (1, `"fail"`, `"2"`, ...) is a
    /// failure, never an error.
    pub fn is_pass(&self) -> bool {
        match self {
            RawStatus::Int(n) => *n == 0,
            RawStatus::Float(x) => *x == 0.0,
            RawStatus::Text(s) => s == "0" || s == "pass",
        }
    }
}

/// Runtime seconds as emitted by the runner: a number or a numeric string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawRuntime {
    Num(f64),
    Text(String),
}

impl RawRuntime {
    /// Coerce to floating-point seconds. Unparseable strings are fatal.
    pub fn as_seconds(&self) -> Result<f64, JobError> {
        match self {
            RawRuntime::Num(x) => Ok(*x),
            RawRuntime::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| JobError::InvalidRuntime(s.clone())),
        }
    }
}

/// Flattened job record, immutable once built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedJob {
    /// True iff the raw status passed the closed membership test
    pub status: bool,

    /// Identifier of the executing worker
    pub worker: String,

    /// Runtime in seconds
    pub runtime: f64,

    /// Raw job log text (may be large)
    pub output: String,

    /// Path-like name derived from the command arguments
    pub name: String,

    /// Job type from the structured command pattern, or the derived
    /// name when the pattern did not match
    #[serde(rename = "type")]
    pub job_type: String,

    /// Application path (structured commands only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application: Option<String>,

    /// Target board (structured commands only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board: Option<String>,

    /// Toolchain (structured commands only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toolchain: Option<String>,
}

impl NormalizedJob {
    /// Normalize one raw job record.
    ///
    /// Fails if any required field is absent or of the wrong shape.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, JobError> {
        let raw: RawJob = serde_json::from_value(value.clone())?;
        let command = &raw.result.body.command;
        let name = derive_name(command);

        let (job_type, application, board, toolchain) = match parse_command(command) {
            Some(target) => (
                target.job_type,
                Some(target.application),
                Some(target.board),
                Some(target.toolchain),
            ),
            None => (name.clone(), None, None, None),
        };

        Ok(Self {
            status: raw.result.status.is_pass(),
            worker: raw.result.worker,
            runtime: raw.result.runtime.as_seconds()?,
            output: raw.result.output,
            name,
            job_type,
            application,
            board,
            toolchain,
        })
    }

    /// True for compile jobs with a known application
    pub fn is_build(&self) -> bool {
        self.job_type == JOB_TYPE_COMPILE && self.application.is_some()
    }

    /// True for test-run jobs with a known application
    pub fn is_test(&self) -> bool {
        self.job_type == JOB_TYPE_RUN_TEST && self.application.is_some()
    }
}
