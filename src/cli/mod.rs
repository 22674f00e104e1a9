//! Command-line interface components
//!
//! This module contains CLI-specific code for Stencil: argument
//! parsing, the step tracker and its live rendering, interactive
//! selection, tool checks, and the command handlers.

pub mod args;
pub mod banner;
pub mod commands;
pub mod live;
pub mod reporter;
pub mod select;
pub mod startup;
pub mod tracker;

pub use args::{Cli, Commands, GlobalArgs, InitArgs};
pub use banner::show_banner;
pub use commands::{handle_check, handle_init};
pub use live::LiveTree;
pub use reporter::{PlainReporter, TrackedReporter};
pub use select::select_with_arrows;
pub use startup::{assistant_tool_available, check_tool_for_tracker, tool_on_path};
pub use tracker::{NullRefresh, RefreshPort, Step, StepStatus, StepTracker};
