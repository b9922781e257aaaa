use std::process::ExitCode;

use batch_adapters::JobCatalog;
use batch_core::BatchStatus;
use batchflow::{execution_json, launch, logging, Args, BatchConfig};
use clap::Parser;
use tracing::{error, info, warn};

fn main() -> ExitCode {
    let args = Args::parse();

    if args.list {
        for name in JobCatalog::JOB_NAMES {
            println!("{name}");
        }
        return ExitCode::SUCCESS;
    }

    let config = match BatchConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };

    let directives = args.log.clone().unwrap_or_else(|| config.log_filter.clone());
    if let Err(e) = logging::init_logging(&directives, config.log_format) {
        eprintln!("{e}");
        return ExitCode::from(2);
    }

    let execution = match launch(&args, &config) {
        Ok(execution) => execution,
        Err(error) => {
            error!(%error, "job was not launched");
            return ExitCode::from(2);
        }
    };

    info!(job = execution.job_name(),
          status = %execution.status(),
          written = execution.write_count(),
          "job finished");
    for step in execution.step_executions() {
        info!(step = step.step_name(),
              status = %step.status(),
              read = step.read_count(),
              written = step.write_count(),
              filtered = step.filter_count(),
              commits = step.commit_count(),
              "step summary");
    }
    if let Some(failure) = execution.failure() {
        warn!(kind = failure.kind(), %failure, "job failed");
    }

    if args.json {
        match execution_json(&execution) {
            Ok(json) => println!("{json}"),
            Err(error) => error!(%error, "cannot serialize execution"),
        }
    }

    if execution.status() == BatchStatus::Completed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
