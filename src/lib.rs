//! murdock-report - CI result post-processing
//!
//! This crate turns the job result array emitted by a murdock-style CI
//! runner into a set of derived JSON report artifacts: per-application
//! build/test summaries, flat failure lists, per-worker runtime
//! statistics, and per-application detail trees.

pub mod aggregate;
pub mod job;
pub mod loader;
pub mod pipeline;
pub mod report;

pub use aggregate::Aggregate;
pub use job::NormalizedJob;
pub use pipeline::{run, PipelineConfig, PipelineError};
pub use report::{ReportConfig, Reporter};
