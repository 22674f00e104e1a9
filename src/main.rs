//! Stencil CLI application
//!
//! Command-line entry point: parses arguments, initializes logging, and
//! dispatches to the command handlers. Any unrecoverable pipeline error
//! terminates the process with a non-zero status.

use std::process;

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use stencil::cli::{handle_check, handle_init, Cli, Commands};
use stencil::errors::{AppError, Result};

#[tokio::main]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        // Cancelled prompts already printed their own message
        if !matches!(e, AppError::Cancelled) {
            eprintln!("Error: {}", e);
        }
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize logging based on verbosity
    init_logging(&cli);

    info!("Stencil v{} starting", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Init(args) => {
            info!("Executing init command");
            handle_init(args).await
        }
        Commands::Check => {
            info!("Executing check command");
            handle_check()
        }
    }
}

/// Initialize logging based on CLI verbosity settings
fn init_logging(cli: &Cli) {
    let log_level = cli.log_level();

    let filter = EnvFilter::from_default_env()
        .add_directive(format!("stencil={}", log_level).parse().expect("valid directive"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(cli.global.very_verbose)
        .with_writer(std::io::stderr)
        .init();

    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
}
