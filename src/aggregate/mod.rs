//! Per-application and per-worker aggregation
//!
//! Groups normalized jobs into build and test buckets keyed by
//! application, tallies success/failure counts, and collects per-worker
//! runtime lists for compile jobs.

pub mod duration;

use std::collections::{BTreeMap, BTreeSet};

use crate::job::NormalizedJob;

use self::duration::format_elapsed;

/// Per-application job lists keyed by application name
pub type AppBuckets = BTreeMap<String, Vec<NormalizedJob>>;

/// Aggregated view of one CI run, rebuilt from scratch every invocation
#[derive(Debug, Clone, Default)]
pub struct Aggregate {
    /// All compile jobs per application
    pub builds: AppBuckets,
    /// Passing compile jobs per application
    pub build_success: AppBuckets,
    /// Failing compile jobs per application
    pub build_failures: AppBuckets,

    /// All test-run jobs per application
    pub tests: AppBuckets,
    /// Passing test-run jobs per application
    pub test_success: AppBuckets,
    /// Failing test-run jobs per application
    pub test_failures: AppBuckets,

    /// Compile-job runtimes per worker. Test runtimes are deliberately
    /// excluded: total_time reports build parallelism only.
    pub worker_runtimes: BTreeMap<String, Vec<f64>>,

    pub builds_count: usize,
    pub build_success_count: usize,
    pub build_failures_count: usize,
    pub tests_count: usize,
    pub test_success_count: usize,
    pub test_failures_count: usize,

    /// Sum of all worker runtimes, formatted as `{d}d {hh}h {mm}m {ss}s`
    pub total_time: String,
}

impl Aggregate {
    /// Build the aggregate from the full job sequence.
    ///
    /// Jobs are processed in ascending derived-name order; every
    /// per-application list preserves that order. Jobs without an
    /// application (unstructured commands) are dropped entirely, and
    /// job types other than `compile`/`run_test` are ignored for
    /// counting.
    pub fn from_jobs(mut jobs: Vec<NormalizedJob>) -> Self {
        jobs.sort_by(|a, b| a.name.cmp(&b.name));

        let mut aggregate = Self::default();

        // First pass: distinct applications per job type, so that an
        // application with only failures still owns an empty success
        // bucket (and vice versa).
        let build_apps: BTreeSet<String> = jobs
            .iter()
            .filter(|job| job.is_build())
            .filter_map(|job| job.application.clone())
            .collect();
        let test_apps: BTreeSet<String> = jobs
            .iter()
            .filter(|job| job.is_test())
            .filter_map(|job| job.application.clone())
            .collect();

        for app in &build_apps {
            aggregate.builds.insert(app.clone(), Vec::new());
            aggregate.build_success.insert(app.clone(), Vec::new());
            aggregate.build_failures.insert(app.clone(), Vec::new());
        }
        for app in &test_apps {
            aggregate.tests.insert(app.clone(), Vec::new());
            aggregate.test_success.insert(app.clone(), Vec::new());
            aggregate.test_failures.insert(app.clone(), Vec::new());
        }

        // Second pass: tally.
        for job in jobs {
            let Some(application) = job.application.clone() else {
                continue;
            };

            if job.is_build() {
                aggregate.builds_count += 1;
                aggregate
                    .worker_runtimes
                    .entry(job.worker.clone())
                    .or_default()
                    .push(job.runtime);
                if job.status {
                    aggregate.build_success_count += 1;
                    push_bucket(&mut aggregate.build_success, &application, job.clone());
                } else {
                    aggregate.build_failures_count += 1;
                    push_bucket(&mut aggregate.build_failures, &application, job.clone());
                }
                push_bucket(&mut aggregate.builds, &application, job);
            } else if job.is_test() {
                aggregate.tests_count += 1;
                if job.status {
                    aggregate.test_success_count += 1;
                    push_bucket(&mut aggregate.test_success, &application, job.clone());
                } else {
                    aggregate.test_failures_count += 1;
                    push_bucket(&mut aggregate.test_failures, &application, job.clone());
                }
                push_bucket(&mut aggregate.tests, &application, job);
            }
        }

        let total_seconds: f64 = aggregate
            .worker_runtimes
            .values()
            .flat_map(|runtimes| runtimes.iter())
            .sum();
        aggregate.total_time = format_elapsed(total_seconds);

        aggregate
    }

    /// Counted jobs: builds plus tests
    pub fn jobs_count(&self) -> usize {
        self.builds_count + self.tests_count
    }
}

fn push_bucket(buckets: &mut AppBuckets, application: &str, job: NormalizedJob) {
    // Buckets were pre-seeded from the same job set
    buckets.entry(application.to_string()).or_default().push(job);
}
