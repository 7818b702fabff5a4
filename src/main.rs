mod cli;
mod error;
mod export;
mod server;
mod sonar;
mod util;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{Cli, Command};

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let settings = util::load_settings().context("Failed to load settings")?;

    match command {
        Command::Export(args) => export::run(args, &settings).await,
        Command::Serve(args) => server::run(args, &settings).await,
        Command::Config => {
            println!(
                "{}",
                util::describe_settings(&settings, &util::settings_path()?)
            );
            Ok(())
        }
    }
}
