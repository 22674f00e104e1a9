//! Command-line argument parsing for Stencil
//!
//! Defines the CLI structure using clap derive macros: global verbosity
//! flags plus the `init` and `check` subcommands.

use clap::{Args, Parser, Subcommand};

use crate::constants::{is_known_assistant, is_known_dialect};

/// Stencil - bootstrap projects from packaged release templates
#[derive(Parser, Debug)]
#[command(
    name = "stencil",
    version,
    about = "Bootstrap AI-assistant-ready projects from packaged release templates",
    long_about = "Fetches the latest packaged template for a chosen AI assistant and script \
dialect, unpacks it into a new or current directory, and optionally initializes a git repository."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scaffold a new project from the latest template release
    Init(InitArgs),

    /// Check that the cooperating tools are installed
    Check,
}

/// Arguments for the init command
#[derive(Args, Debug, Clone, Default)]
pub struct InitArgs {
    /// Name for the new project directory ('.' scaffolds into the
    /// current directory, like --here)
    pub project_name: Option<String>,

    /// AI assistant profile to scaffold for
    #[arg(long = "ai", value_name = "ASSISTANT")]
    pub assistant: Option<String>,

    /// Script dialect: sh or ps
    #[arg(long = "script", value_name = "DIALECT")]
    pub script: Option<String>,

    /// Skip checks for assistant CLI tools
    #[arg(long)]
    pub ignore_agent_tools: bool,

    /// Skip git repository initialization
    #[arg(long)]
    pub no_git: bool,

    /// Scaffold into the current directory instead of creating a new one
    #[arg(long)]
    pub here: bool,

    /// Skip the confirmation prompt when merging into a non-empty
    /// current directory
    #[arg(long)]
    pub force: bool,

    /// Skip TLS certificate verification (not recommended)
    #[arg(long)]
    pub skip_tls: bool,

    /// Include response bodies and environment details in failure output
    #[arg(long)]
    pub debug: bool,

    /// Auth token for the release feed (or set GH_TOKEN / GITHUB_TOKEN)
    #[arg(long, value_name = "TOKEN")]
    pub github_token: Option<String>,

    /// Custom template repository as 'owner/repo'
    #[arg(long, value_name = "OWNER/REPO")]
    pub repo: Option<String>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the logging level based on global arguments
    pub fn log_level(&self) -> tracing::Level {
        if self.global.quiet {
            tracing::Level::ERROR
        } else if self.global.very_verbose {
            tracing::Level::DEBUG
        } else if self.global.verbose {
            tracing::Level::INFO
        } else {
            tracing::Level::WARN
        }
    }
}

impl InitArgs {
    /// Fold the '.' shorthand into the --here flag
    pub fn normalized(mut self) -> Self {
        if self.project_name.as_deref() == Some(".") {
            self.here = true;
            self.project_name = None;
        }
        self
    }

    /// Validate flag combinations and choice keys
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.here && self.project_name.is_some() {
            return Err("Cannot specify both a project name and --here".to_string());
        }
        if !self.here && self.project_name.is_none() {
            return Err(
                "Must specify a project name, '.' for the current directory, or --here"
                    .to_string(),
            );
        }
        if let Some(assistant) = &self.assistant {
            if !is_known_assistant(assistant) {
                return Err(format!("Unknown AI assistant '{}'", assistant));
            }
        }
        if let Some(script) = &self.script {
            if !is_known_dialect(script) {
                return Err(format!("Unknown script type '{}' (expected sh or ps)", script));
            }
        }
        Ok(())
    }
}
