use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use bluegreen::config::resolve_config;
use bluegreen::observability::init_logging;
use bluegreen::Command;

#[derive(Parser)]
#[command(name = "bluegreen")]
#[command(about = "Blue/green backend swaps behind HAProxy", long_about = None)]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Config file (defaults to ./bluegreen.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
enum Commands {
    /// Start the load balancer if it is not running
    Start,
    /// Stop the load balancer and all backends
    Stop,
    /// Swap the running backend for a freshly started one
    Deploy,
}

impl From<Commands> for Command {
    fn from(command: Commands) -> Self {
        match command {
            Commands::Start => Command::Start,
            Commands::Stop => Command::Stop,
            Commands::Deploy => Command::Deploy,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let workdir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Error: cannot determine working directory: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let config = match resolve_config(cli.config.as_deref(), &workdir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config.observability);

    let command = Command::from(cli.command);
    tracing::info!(%command, backends = ?config.backends.names, "bluegreen v{} starting", env!("CARGO_PKG_VERSION"));

    match bluegreen::execute(command, &config, &workdir).await {
        Ok(()) => {
            tracing::info!(%command, "Done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(%command, error = %e, "Command failed");
            ExitCode::FAILURE
        }
    }
}
