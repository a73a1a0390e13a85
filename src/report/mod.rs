//! Report artifact generation
//!
//! Turns one [`Aggregate`] into the set of JSON report files consumed
//! by the dashboard: top-level build/test summaries, flat failure
//! lists, worker statistics, and per-application detail trees. Every
//! artifact is overwritten unconditionally on each run.

pub mod stats;

use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::aggregate::{Aggregate, AppBuckets};
use crate::job::{NormalizedJob, JOB_TYPE_COMPILE, JOB_TYPE_RUN_TEST};

use self::stats::WorkerStats;

/// Subdirectory holding the per-application detail trees
pub const DETAIL_DIR: &str = "output";

/// Reporter errors
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report artifact: {0}")]
    Io(#[from] io::Error),

    #[error("failed to serialize report artifact: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Reporter configuration, fixed at construction time
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Directory the top-level artifacts are written to
    pub report_dir: PathBuf,

    /// Also persist each job's raw output text under the detail tree
    pub save_job_output: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            report_dir: PathBuf::from("."),
            save_job_output: false,
        }
    }
}

/// One `builds.json` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSummary {
    pub application: String,
    pub build_count: usize,
    pub build_success: usize,
    pub build_failures: usize,
}

/// One `tests.json` entry, with the raw failing jobs embedded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSummary {
    pub application: String,
    pub failures: Vec<NormalizedJob>,
    pub test_count: usize,
    pub test_success: usize,
    pub test_failures: usize,
}

/// One `build_failures.json` / `test_failures.json` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureEntry {
    pub application: String,
    pub board: String,
    pub toolchain: String,
    pub worker: String,
    pub runtime: f64,
}

impl FailureEntry {
    fn from_job(application: &str, job: &NormalizedJob) -> Self {
        Self {
            application: application.to_string(),
            // Bucketed jobs came from the structured command pattern,
            // which always sets board and toolchain
            board: job.board.clone().unwrap_or_default(),
            toolchain: job.toolchain.clone().unwrap_or_default(),
            worker: job.worker.clone(),
            runtime: job.runtime,
        }
    }
}

/// The `stats.json` artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub total_jobs: usize,
    pub total_builds: usize,
    pub total_tests: usize,
    pub total_time: String,
    pub workers: Vec<WorkerStats>,
}

/// Per-application `app.json` payload
#[derive(Serialize)]
struct AppDetail<'a> {
    jobs: &'a [NormalizedJob],
    failures: &'a [NormalizedJob],
}

/// Writes all report artifacts for one aggregate
pub struct Reporter {
    config: ReportConfig,
}

impl Reporter {
    /// Create a reporter with the given configuration
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Write every artifact, overwriting previous runs.
    pub fn write_all(&self, aggregate: &Aggregate) -> Result<(), ReportError> {
        fs::create_dir_all(&self.config.report_dir)?;

        self.write_json("builds.json", &Self::build_summaries(aggregate))?;
        self.write_json(
            "build_failures.json",
            &Self::failure_entries(&aggregate.build_failures),
        )?;
        self.write_json("tests.json", &Self::test_summaries(aggregate))?;
        self.write_json(
            "test_failures.json",
            &Self::failure_entries(&aggregate.test_failures),
        )?;
        self.write_json("stats.json", &Self::stats_summary(aggregate))?;
        self.write_application_details(aggregate)?;

        Ok(())
    }

    fn build_summaries(aggregate: &Aggregate) -> Vec<BuildSummary> {
        aggregate
            .builds
            .iter()
            .map(|(application, jobs)| BuildSummary {
                application: application.clone(),
                build_count: jobs.len(),
                build_success: bucket_len(&aggregate.build_success, application),
                build_failures: bucket_len(&aggregate.build_failures, application),
            })
            .collect()
    }

    fn test_summaries(aggregate: &Aggregate) -> Vec<TestSummary> {
        // Counts come from the current test application; the original
        // report generator reused a stale variable from the builds
        // loop here.
        aggregate
            .tests
            .iter()
            .map(|(application, jobs)| TestSummary {
                application: application.clone(),
                failures: aggregate
                    .test_failures
                    .get(application)
                    .cloned()
                    .unwrap_or_default(),
                test_count: jobs.len(),
                test_success: bucket_len(&aggregate.test_success, application),
                test_failures: bucket_len(&aggregate.test_failures, application),
            })
            .collect()
    }

    fn failure_entries(buckets: &AppBuckets) -> Vec<FailureEntry> {
        buckets
            .iter()
            .flat_map(|(application, jobs)| {
                jobs.iter()
                    .map(|job| FailureEntry::from_job(application, job))
            })
            .collect()
    }

    fn stats_summary(aggregate: &Aggregate) -> StatsSummary {
        StatsSummary {
            total_jobs: aggregate.jobs_count(),
            total_builds: aggregate.builds_count,
            total_tests: aggregate.tests_count,
            total_time: aggregate.total_time.clone(),
            workers: aggregate
                .worker_runtimes
                .iter()
                .filter_map(|(name, runtimes)| WorkerStats::from_runtimes(name, runtimes))
                .collect(),
        }
    }

    /// Write `output/<job_type>/<application>/app.json` for every
    /// application, plus one raw-output text file per job when
    /// configured.
    fn write_application_details(&self, aggregate: &Aggregate) -> Result<(), ReportError> {
        let groups = [
            (JOB_TYPE_COMPILE, &aggregate.builds, &aggregate.build_failures),
            (JOB_TYPE_RUN_TEST, &aggregate.tests, &aggregate.test_failures),
        ];

        for (job_type, jobs, failures) in groups {
            for (application, app_jobs) in jobs {
                let app_dir = self
                    .config
                    .report_dir
                    .join(DETAIL_DIR)
                    .join(job_type)
                    .join(application);
                fs::create_dir_all(&app_dir)?;

                let detail = AppDetail {
                    jobs: app_jobs,
                    failures: failures
                        .get(application)
                        .map(Vec::as_slice)
                        .unwrap_or_default(),
                };
                let json = serde_json::to_string_pretty(&detail)?;
                fs::write(app_dir.join("app.json"), json)?;
                debug!(job_type, %application, "wrote application detail");

                if self.config.save_job_output {
                    for job in app_jobs {
                        let board = job.board.as_deref().unwrap_or_default();
                        let toolchain = job.toolchain.as_deref().unwrap_or_default();
                        let name = format!("{board}:{toolchain}.txt");
                        fs::write(app_dir.join(name), &job.output)?;
                    }
                }
            }
        }

        Ok(())
    }

    fn write_json<T: Serialize>(&self, name: &str, value: &T) -> Result<(), ReportError> {
        let json = serde_json::to_string_pretty(value)?;
        fs::write(self.config.report_dir.join(name), json)?;
        debug!(artifact = name, "wrote report artifact");
        Ok(())
    }
}

fn bucket_len(buckets: &AppBuckets, application: &str) -> usize {
    buckets.get(application).map(Vec::len).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn job(
        job_type: &str,
        application: &str,
        board: &str,
        status: bool,
        worker: &str,
        runtime: f64,
    ) -> NormalizedJob {
        NormalizedJob {
            status,
            worker: worker.to_string(),
            runtime,
            output: format!("log for {application} on {board}\n"),
            name: format!("{job_type}/{application}/{board}:gnu"),
            job_type: job_type.to_string(),
            application: Some(application.to_string()),
            board: Some(board.to_string()),
            toolchain: Some("gnu".to_string()),
        }
    }

    fn sample_aggregate() -> Aggregate {
        Aggregate::from_jobs(vec![
            job("compile", "examples/foo", "nrf52dk", true, "w1", 1.0),
            job("compile", "examples/foo", "native", false, "w2", 2.0),
            job("compile", "examples/bar", "nrf52dk", true, "w1", 3.0),
            job("run_test", "tests/shell", "nrf52dk", false, "w1", 4.0),
            job("run_test", "tests/shell", "native", true, "w2", 5.0),
        ])
    }

    fn reporter(dir: &TempDir, save_job_output: bool) -> Reporter {
        Reporter::new(ReportConfig {
            report_dir: dir.path().to_path_buf(),
            save_job_output,
        })
    }

    #[test]
    fn test_builds_summary() {
        let dir = TempDir::new().unwrap();
        reporter(&dir, false).write_all(&sample_aggregate()).unwrap();

        let json = fs::read_to_string(dir.path().join("builds.json")).unwrap();
        let builds: Vec<BuildSummary> = serde_json::from_str(&json).unwrap();

        assert_eq!(builds.len(), 2);
        // BTreeMap iteration: applications in ascending order
        assert_eq!(builds[0].application, "examples/bar");
        assert_eq!(builds[0].build_count, 1);
        assert_eq!(builds[1].application, "examples/foo");
        assert_eq!(builds[1].build_count, 2);
        assert_eq!(builds[1].build_success, 1);
        assert_eq!(builds[1].build_failures, 1);
    }

    #[test]
    fn test_build_failures_list_is_flat() {
        let dir = TempDir::new().unwrap();
        reporter(&dir, false).write_all(&sample_aggregate()).unwrap();

        let json = fs::read_to_string(dir.path().join("build_failures.json")).unwrap();
        let failures: Vec<FailureEntry> = serde_json::from_str(&json).unwrap();

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].application, "examples/foo");
        assert_eq!(failures[0].board, "native");
        assert_eq!(failures[0].toolchain, "gnu");
        assert_eq!(failures[0].worker, "w2");
        assert_eq!(failures[0].runtime, 2.0);
    }

    #[test]
    fn test_tests_summary_counts_current_application() {
        // "tests/shell" never appears in the build buckets, so stale
        // build-loop state would misreport its counts.
        let dir = TempDir::new().unwrap();
        reporter(&dir, false).write_all(&sample_aggregate()).unwrap();

        let json = fs::read_to_string(dir.path().join("tests.json")).unwrap();
        let tests: Vec<TestSummary> = serde_json::from_str(&json).unwrap();

        assert_eq!(tests.len(), 1);
        assert_eq!(tests[0].application, "tests/shell");
        assert_eq!(tests[0].test_count, 2);
        assert_eq!(tests[0].test_success, 1);
        assert_eq!(tests[0].test_failures, 1);
        assert_eq!(tests[0].failures.len(), 1);
        assert!(!tests[0].failures[0].status);
    }

    #[test]
    fn test_stats_summary() {
        let dir = TempDir::new().unwrap();
        reporter(&dir, false).write_all(&sample_aggregate()).unwrap();

        let json = fs::read_to_string(dir.path().join("stats.json")).unwrap();
        let stats: StatsSummary = serde_json::from_str(&json).unwrap();

        assert_eq!(stats.total_jobs, 5);
        assert_eq!(stats.total_builds, 3);
        assert_eq!(stats.total_tests, 2);
        // Compile runtimes only: 1.0 + 2.0 + 3.0
        assert_eq!(stats.total_time, "0d 00h 00m 06s");
        assert_eq!(stats.workers.len(), 2);
        assert_eq!(stats.workers[0].name, "w1");
        assert_eq!(stats.workers[0].total_cpu_time, 4.0);
        assert_eq!(stats.workers[0].jobs_count, 2);
        assert_eq!(stats.workers[1].name, "w2");
        assert_eq!(stats.workers[1].runtime_avg, 2.0);
    }

    #[test]
    fn test_application_detail_tree() {
        let dir = TempDir::new().unwrap();
        reporter(&dir, false).write_all(&sample_aggregate()).unwrap();

        let app_json = dir
            .path()
            .join("output/compile/examples/foo/app.json");
        let detail: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(app_json).unwrap()).unwrap();

        assert_eq!(detail["jobs"].as_array().unwrap().len(), 2);
        assert_eq!(detail["failures"].as_array().unwrap().len(), 1);

        assert!(dir
            .path()
            .join("output/run_test/tests/shell/app.json")
            .exists());
        // Raw output files are off by default
        assert!(!dir
            .path()
            .join("output/compile/examples/foo/nrf52dk:gnu.txt")
            .exists());
    }

    #[test]
    fn test_job_output_persisted_when_configured() {
        let dir = TempDir::new().unwrap();
        reporter(&dir, true).write_all(&sample_aggregate()).unwrap();

        let text = fs::read_to_string(
            dir.path().join("output/compile/examples/foo/nrf52dk:gnu.txt"),
        )
        .unwrap();
        assert_eq!(text, "log for examples/foo on nrf52dk\n");
    }

    #[test]
    fn test_empty_aggregate_writes_empty_artifacts() {
        let dir = TempDir::new().unwrap();
        reporter(&dir, false)
            .write_all(&Aggregate::from_jobs(Vec::new()))
            .unwrap();

        for name in [
            "builds.json",
            "build_failures.json",
            "tests.json",
            "test_failures.json",
        ] {
            let json = fs::read_to_string(dir.path().join(name)).unwrap();
            let value: serde_json::Value = serde_json::from_str(&json).unwrap();
            assert_eq!(value.as_array().unwrap().len(), 0, "{name}");
        }

        let stats: StatsSummary = serde_json::from_str(
            &fs::read_to_string(dir.path().join("stats.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(stats.total_jobs, 0);
        assert!(stats.workers.is_empty());
    }

    #[test]
    fn test_artifacts_overwritten_on_rerun() {
        let dir = TempDir::new().unwrap();
        reporter(&dir, false).write_all(&sample_aggregate()).unwrap();
        reporter(&dir, false)
            .write_all(&Aggregate::from_jobs(Vec::new()))
            .unwrap();

        let json = fs::read_to_string(dir.path().join("builds.json")).unwrap();
        let builds: Vec<BuildSummary> = serde_json::from_str(&json).unwrap();
        assert!(builds.is_empty());
    }
}
