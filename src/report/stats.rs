//! Per-worker runtime statistics

use serde::{Deserialize, Serialize};

/// Runtime statistics for one worker, computed over compile-job
/// runtimes only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerStats {
    /// Worker identifier
    pub name: String,
    /// Mean runtime in seconds
    pub runtime_avg: f64,
    /// Shortest runtime in seconds
    pub runtime_min: f64,
    /// Longest runtime in seconds
    pub runtime_max: f64,
    /// Sum of all runtimes in seconds
    pub total_cpu_time: f64,
    /// Number of jobs the worker executed
    pub jobs_count: usize,
}

impl WorkerStats {
    /// Compute statistics over a worker's runtime list.
    ///
    /// Returns `None` for an empty list; mean/min/max are undefined
    /// there and the worker is omitted from the stats artifact.
    pub fn from_runtimes(name: &str, runtimes: &[f64]) -> Option<Self> {
        if runtimes.is_empty() {
            return None;
        }

        let total: f64 = runtimes.iter().sum();
        let min = runtimes.iter().copied().fold(f64::INFINITY, f64::min);
        let max = runtimes.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            name: name.to_string(),
            runtime_avg: total / runtimes.len() as f64,
            runtime_min: min,
            runtime_max: max,
            total_cpu_time: total,
            jobs_count: runtimes.len(),
        })
    }
}
