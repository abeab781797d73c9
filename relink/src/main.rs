// relink/src/main.rs
use std::fs;
use std::process;

use clap::Parser;
use colored::Colorize;
use relink_common::config::Config;
use relink_common::error::Result as RelinkResult;
use relink_common::model::PassStatus;
use tracing::level_filters::LevelFilter;
use tracing::{debug, error};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::CliArgs;

/// Exit code when the pass finished but dependencies still need attention.
const EXIT_ISSUES_REMAIN: i32 = 1;
/// Exit code when the run could not complete (bad manifest, failed install, ...).
const EXIT_FAILURE: i32 = 2;

#[tokio::main]
async fn main() -> RelinkResult<()> {
    let cli_args = CliArgs::parse();

    let config = match Config::load(cli_args.project.clone()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            process::exit(EXIT_FAILURE);
        }
    };

    init_logging(&config, cli_args.verbose);

    match cli_args.command.run(&config).await {
        Ok(PassStatus::Clean) => {
            debug!("Command completed successfully.");
            Ok(())
        }
        Ok(PassStatus::IssuesRemain) => {
            debug!("Command completed; issues remain.");
            process::exit(EXIT_ISSUES_REMAIN);
        }
        Err(e) => {
            error!("Command failed: {:#}", e);
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            process::exit(EXIT_FAILURE);
        }
    }
}

fn init_logging(config: &Config, verbose: u8) {
    let level_filter = match verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let max_log_level = level_filter.into_level().unwrap_or(tracing::Level::INFO);

    let env_filter = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .with_env_var("RELINK_LOG")
        .from_env_lossy();

    if verbose == 0 {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .without_time()
            .try_init();
        return;
    }

    let log_dir = config.logs_dir();
    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!(
            "{} Failed to create log directory {}: {}",
            "Warning:".yellow(),
            log_dir.display(),
            e
        );
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .without_time()
            .try_init();
        return;
    }

    let file_appender = tracing_appender::rolling::daily(&log_dir, "relink.log");
    let (non_blocking_appender, guard) = tracing_appender::non_blocking(file_appender);

    let stderr_writer = std::io::stderr.with_max_level(max_log_level);
    let file_writer = non_blocking_appender.with_max_level(max_log_level);

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(stderr_writer.and(file_writer))
        .with_ansi(true)
        .without_time()
        .try_init();

    Box::leak(Box::new(guard)); // Keep guard alive

    debug!(
        "Verbose logging enabled. Writing logs to: {}/relink.log",
        log_dir.display()
    );
}
