//! Pipeline orchestration
//!
//! Single-pass, single-threaded run: load the result array, normalize
//! every job, aggregate, write report artifacts. Any stage error aborts
//! the run; there is no partial-success mode.

use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

use crate::aggregate::Aggregate;
use crate::job::{JobError, NormalizedJob};
use crate::loader::{load_jobs, LoadError};
use crate::report::{ReportConfig, ReportError, Reporter};

/// Pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("load error: {0}")]
    Load(#[from] LoadError),

    #[error("job error: {0}")]
    Job(#[from] JobError),

    #[error("report error: {0}")]
    Report(#[from] ReportError),
}

impl PipelineError {
    /// Get the stable exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::Load(_) => 2,
            PipelineError::Job(_) => 3,
            PipelineError::Report(_) => 4,
        }
    }
}

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Path to the runner's result array
    pub input_path: PathBuf,

    /// Reporter configuration
    pub report: ReportConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("result.json"),
            report: ReportConfig::default(),
        }
    }
}

/// Execute one full run.
///
/// Returns the aggregate so callers can inspect the run after the
/// artifacts are written.
pub fn run(config: &PipelineConfig) -> Result<Aggregate, PipelineError> {
    let raw_jobs = load_jobs(&config.input_path)?;
    info!(jobs = raw_jobs.len(), input = %config.input_path.display(), "loaded job records");

    let jobs = raw_jobs
        .iter()
        .map(NormalizedJob::from_value)
        .collect::<Result<Vec<_>, _>>()?;

    let aggregate = Aggregate::from_jobs(jobs);
    info!(
        builds = aggregate.builds_count,
        build_failures = aggregate.build_failures_count,
        tests = aggregate.tests_count,
        test_failures = aggregate.test_failures_count,
        total_time = %aggregate.total_time,
        "aggregated run"
    );

    Reporter::new(config.report.clone()).write_all(&aggregate)?;
    info!(report_dir = %config.report.report_dir.display(), "wrote report artifacts");

    Ok(aggregate)
}
