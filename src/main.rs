use clap::Parser;
use console::style;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::Cli;

fn init_tracing(verbose: bool, config_level: Option<&str>) {
    let filter = if verbose {
        EnvFilter::new("churnctl=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config_level.unwrap_or("warn")))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli::load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            init_tracing(cli.verbose, None);
            eprintln!("{} {e:#}", style("error:").red().bold());
            return ExitCode::FAILURE;
        }
    };
    init_tracing(cli.verbose, config.log_level.as_deref());

    match cli::run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("{e:?}");
            eprintln!("{} {e}", style("error:").red().bold());
            ExitCode::FAILURE
        }
    }
}
