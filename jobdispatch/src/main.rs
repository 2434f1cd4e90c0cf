// SPDX-License-Identifier: MIT
// jobdispatch: demo driver for the bounded job dispatcher
//
// - Starts a dispatcher, submits a batch of print jobs and stops it again.
// - Stop drains the queue first, so every job prints before the process exits.
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use std::time::Duration;

use clap::Parser;
use log::info;

use jobdispatch::config::{DispatcherConfig, DEFAULT_MAX_WORKERS, DEFAULT_QUEUE_SIZE};
use jobdispatch::jobs::print_job::PrintJob;
use jobdispatch::Dispatcher;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Number of worker threads [default: 10]
    #[arg(long)]
    workers: Option<usize>,

    /// Capacity of the job queue [default: 50]
    #[arg(long = "queue-size")]
    queue_size: Option<usize>,

    /// Dispatcher configuration (JSON encoded). Note that this excludes --workers and --queue-size.
    #[arg(long, value_name = "JSON")]
    config: Option<String>,

    /// Number of print jobs to submit
    #[arg(long, default_value_t = 100)]
    jobs: usize,

    /// Seconds to wait after submitting before stopping the dispatcher
    #[arg(long = "wait-secs", default_value_t = 0)]
    wait_secs: u64,
}

fn validate_args(args: &Args) -> Result<(), String> {
    match (&args.config, &args.workers, &args.queue_size) {
        (Some(_), None, None) | (None, _, _) => {}
        _ => {
            return Err("--config must not be used in combination with --workers or --queue-size".into());
        }
    }

    if args.workers == Some(0) {
        return Err("--workers must be greater than zero".into());
    }

    Ok(())
}

fn dispatcher_config(args: &Args) -> anyhow::Result<DispatcherConfig> {
    let config = match &args.config {
        Some(json) => DispatcherConfig::from_json(json)?,
        None => DispatcherConfig::new(
            args.workers.unwrap_or(DEFAULT_MAX_WORKERS),
            args.queue_size.unwrap_or(DEFAULT_QUEUE_SIZE),
        ),
    };
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if let Err(e) = validate_args(&args) {
        eprintln!("Error: {e}");
        std::process::exit(2);
    }

    let config = dispatcher_config(&args)?;
    let dispatcher = Dispatcher::from_config(&config)?;

    info!(
        "Starting dispatcher with {} workers and a queue of {}",
        config.max_workers, config.queue_size
    );
    dispatcher.start()?;

    for i in 1..=args.jobs {
        dispatcher.submit(PrintJob::new(format!("Processing job {i}")))?;
    }

    if args.wait_secs > 0 {
        std::thread::sleep(Duration::from_secs(args.wait_secs));
        info!(
            "Automatically stopping the dispatcher after {} seconds",
            args.wait_secs
        );
    } else {
        info!("Stopping the dispatcher");
    }
    dispatcher.stop()?;

    Ok(())
}
