//! rentprobe CLI
//!
//! ## Usage
//!
//! ```bash
//! rentprobe normalize "  queenstown "            # Resolve a location
//! rentprobe parse-date 2026-11-12                # Check a date
//! rentprobe search --pickup akl --from 2026-11-12 --to 2026-11-20
//! rentprobe demo --calendar-start 2026-10        # Run the form on the simulated site
//! rentprobe load --api-url http://localhost:3000/api --duration 1m
//! ```

use clap::Parser;
use rentprobe_cli::{handlers, Cli, CliConfig, CliResult, ColorChoice, Commands, Reporter, Verbosity};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);
    init_tracing(config.verbosity);

    let reporter = Reporter::new(config.color.should_color(), config.verbosity.is_quiet());

    match cli.command {
        Commands::Normalize(args) => handlers::execute_normalize(&args),
        Commands::ParseDate(args) => handlers::execute_parse_date(&args),
        Commands::Search(args) => handlers::execute_search(&config, &args),
        Commands::Demo(args) => runtime()?.block_on(handlers::execute_demo(&config, &args, &reporter)),
        Commands::Load(args) => runtime()?.block_on(handlers::execute_load(&config, &args, &reporter)),
        Commands::Config(args) => handlers::execute_config(&config, &args, &reporter),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let color: ColorChoice = cli.color.clone().into();
    CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose))
        .with_color(color)
        .with_suite_path(cli.config.clone())
}

fn init_tracing(verbosity: Verbosity) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter())),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn runtime() -> CliResult<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Runtime::new()?)
}
