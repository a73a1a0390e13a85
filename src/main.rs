//! murdock-report CLI
//!
//! Entry point for the `murdock-report` command-line tool.

use clap::Parser;
use murdock_report::{pipeline, PipelineConfig, ReportConfig};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "murdock-report")]
#[command(about = "Generate JSON report artifacts from a CI job result array", version)]
struct Cli {
    /// Path to the job result array produced by the CI runner
    #[arg(long, default_value = "result.json")]
    input: PathBuf,

    /// Directory the report artifacts are written to
    #[arg(long, default_value = ".")]
    report_dir: PathBuf,

    /// Also persist each job's raw output text under the detail tree
    #[arg(long)]
    save_job_output: bool,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "murdock_report=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // The runner's legacy environment toggle, read once at startup and
    // folded into the reporter configuration
    let save_job_output = cli.save_job_output || env_flag("SAVE_JOB_RESULTS");

    let config = PipelineConfig {
        input_path: cli.input,
        report: ReportConfig {
            report_dir: cli.report_dir,
            save_job_output,
        },
    };

    if let Err(e) = pipeline::run(&config) {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name).map(|value| value == "1").unwrap_or(false)
}
