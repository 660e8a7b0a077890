use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;
use dnswall::{check_addresses, run_exercise, setup_logging, Args, Command, ExerciseConfig};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    setup_logging(args.log_file.as_deref())?;

    match args.command {
        Command::Check { addresses } => {
            let all_allowed = check_addresses(&addresses, &mut std::io::stdout().lock())?;
            Ok(if all_allowed { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Command::Exercise {
            capacity,
            queries,
            workers,
            answered_percent,
            in_flight,
        } => {
            let config = ExerciseConfig {
                capacity: capacity as usize,
                queries,
                workers,
                answered_percent,
                in_flight: in_flight as usize,
            };
            tracing::info!(?config, "Running the query record pool exercise");

            let report = run_exercise(config).await.context("exercise failed")?;
            tracing::info!(
                answered = report.answered,
                stale = report.stale,
                unanswered = report.unanswered,
                evictions = report.pool.evictions,
                "Exercise finished"
            );
            println!("{:#?}", report);

            Ok(ExitCode::SUCCESS)
        }
    }
}
