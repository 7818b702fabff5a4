use clap::{Parser, Subcommand};

use crate::export::ExportArgs;
use crate::server::ServeArgs;

#[derive(Parser)]
#[command(name = "sonar-export")]
#[command(about = "Export SonarQube issues to Excel", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Log progress to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch all issues of a project and write them to an .xlsx file
    Export(ExportArgs),

    /// Serve the export form and HTTP API
    Serve(ServeArgs),

    /// Show effective configuration
    Config,
}
