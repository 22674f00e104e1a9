//! Command handlers for the Stencil CLI
//!
//! Coordinates between parsed arguments and the scaffolding pipeline:
//! target resolution, assistant/dialect selection, tool checks, the
//! live step tree, the git bootstrap and the final summary output.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use crossterm::style::Stylize;
use tracing::{info, warn};

use crate::app::client::ClientConfig;
use crate::app::{
    init_git_repo, is_git_repo, resolve_github_token, run_pipeline, PipelineOptions,
    ProjectTarget, Reporter,
};
use crate::cli::args::InitArgs;
use crate::cli::banner::show_banner;
use crate::cli::live::LiveTree;
use crate::cli::reporter::{PlainReporter, TrackedReporter};
use crate::cli::select::select_with_arrows;
use crate::cli::startup::{assistant_tool_available, check_tool_for_tracker, tool_on_path};
use crate::cli::tracker::StepTracker;
use crate::config::AppConfig;
use crate::constants::{assistant_display_name, assistants, default_dialect, github};
use crate::errors::{AppError, Result};

/// Handle the init command
///
/// Resolves the target directory, runs the download-extract pipeline
/// under a live step tree (or plain log lines without a terminal),
/// bootstraps git, and prints the final summary.
pub async fn handle_init(args: InitArgs) -> Result<()> {
    let args = args.normalized();

    show_banner();
    let version_line = format!("Stencil CLI version {}", env!("CARGO_PKG_VERSION"));
    println!("{}", version_line.as_str().dark_grey());
    println!();

    args.validate().map_err(AppError::generic)?;

    let interactive = atty::is(atty::Stream::Stdin);
    let target = match resolve_target(&args, interactive)? {
        Some(target) => target,
        None => {
            // User declined the merge; not an error
            println!("{}", "Operation cancelled".yellow());
            return Ok(());
        }
    };
    print_setup_summary(&target);

    let git_available = if args.no_git {
        false
    } else {
        let available = tool_on_path("git");
        if !available {
            println!(
                "{}",
                "Git not found - repository initialization will be skipped".yellow()
            );
        }
        available
    };

    let assistant = match &args.assistant {
        Some(assistant) => assistant.clone(),
        None if interactive => select_with_arrows(
            assistants::CATALOG,
            "Choose your AI assistant:",
            assistants::DEFAULT_ASSISTANT,
        )?,
        None => assistants::DEFAULT_ASSISTANT.to_string(),
    };

    if !args.ignore_agent_tools {
        check_agent_tool(&assistant)?;
    }

    let dialect = match &args.script {
        Some(script) => script.clone(),
        None if interactive => select_with_arrows(
            assistants::SCRIPT_DIALECTS,
            "Choose script type:",
            default_dialect(),
        )?,
        None => default_dialect().to_string(),
    };

    println!("{} {}", "Selected AI assistant:".cyan(), assistant);
    println!("{} {}", "Selected script type:".cyan(), dialect);

    let config = AppConfig::load(None)?;
    let repo = config.template_repo(args.repo.as_deref())?;
    if args.repo.is_some() {
        println!("{} {}", "Using custom repository:".cyan(), repo);
    }

    let client = ClientConfig::from_app_config(&config, args.skip_tls)
        .build_http_client()
        .map_err(AppError::Fetch)?;
    let token = resolve_github_token(args.github_token.as_deref());

    let tracker = Arc::new(Mutex::new(StepTracker::new("Initialize Stencil Project")));
    populate_tracker(&tracker, &assistant, &dialect);

    // Presentation is picked once: live tree on a terminal, immediate
    // log lines otherwise
    let live = Arc::new(LiveTree::new());
    let render_live = atty::is(atty::Stream::Stderr);
    let reporter: Box<dyn Reporter> = if render_live {
        if let Ok(mut t) = tracker.lock() {
            t.attach_port(Box::new(Arc::clone(&live)));
        }
        Box::new(TrackedReporter::new(Arc::clone(&tracker)))
    } else {
        Box::new(PlainReporter)
    };

    let options = PipelineOptions {
        assistant: assistant.clone(),
        dialect,
        api_base: github::API_BASE_URL.to_string(),
        repo,
        github_token: token,
        download_dir: std::env::current_dir()?,
        show_progress: !render_live,
    };

    let result = run_pipeline(&client, &target, &options, reporter.as_ref()).await;

    match &result {
        Ok(_) => {
            run_git_step(&args, &target, git_available, reporter.as_ref()).await;
            reporter.complete("final", "project ready");
        }
        Err(e) => reporter.error("final", &e.to_string()),
    }

    // Swap the live frame for a final static snapshot
    if render_live {
        live.clear();
        if let Ok(t) = tracker.lock() {
            println!("{}", t.render());
        }
    }

    match result {
        Ok(report) => {
            println!("{}", "Project ready.".green().bold());
            info!(
                "Scaffolded {} (release {})",
                report.archive_name, report.release_tag
            );
            print_agent_security_notice(&assistant);
            print_next_steps(&target);
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {}", "Initialization failed:".red().bold(), e);
            if args.debug {
                print_debug_environment();
            }
            Err(e)
        }
    }
}

/// Handle the check command: report which cooperating tools are present
pub fn handle_check() -> Result<()> {
    show_banner();
    println!("{}", "Checking for installed tools...".bold());
    println!();

    let mut tracker = StepTracker::new("Check Available Tools");
    tracker.add("git", "Git version control");
    for &(key, _) in assistants::TOOL_CHECKS {
        tracker.add(key, assistant_display_name(key).unwrap_or(key));
    }

    let git_ok = check_tool_for_tracker("git", &mut tracker);
    let mut any_assistant = false;
    for &(key, _) in assistants::TOOL_CHECKS {
        if check_tool_for_tracker(key, &mut tracker) {
            any_assistant = true;
        }
    }

    println!("{}", tracker.render());
    println!("{}", "Stencil CLI is ready to use!".green().bold());
    if !git_ok {
        println!(
            "{}",
            "Tip: install git for repository management".dark_grey()
        );
    }
    if !any_assistant {
        println!(
            "{}",
            "Tip: install an AI assistant CLI for the best experience".dark_grey()
        );
    }
    Ok(())
}

/// Resolve where the template lands; `None` means the user declined
fn resolve_target(args: &InitArgs, interactive: bool) -> Result<Option<ProjectTarget>> {
    if args.here {
        let current = std::env::current_dir()?;
        let existing = std::fs::read_dir(&current)?.count();
        if existing > 0 {
            println!(
                "{} Current directory is not empty ({} items)",
                "Warning:".yellow().bold(),
                existing
            );
            println!(
                "{}",
                "Template files will be merged with existing content and may overwrite existing files"
                    .yellow()
            );
            if args.force {
                println!(
                    "{}",
                    "--force supplied: skipping confirmation and proceeding with merge".cyan()
                );
            } else if interactive {
                if !confirm("Do you want to continue?")? {
                    return Ok(None);
                }
            } else {
                return Err(AppError::generic(
                    "Refusing to merge into a non-empty directory without --force",
                ));
            }
        }
        Ok(Some(ProjectTarget::merge(current)))
    } else {
        let name = args
            .project_name
            .clone()
            .ok_or_else(|| AppError::generic("Missing project name"))?;
        let path = std::env::current_dir()?.join(&name);
        if path.exists() {
            return Err(AppError::generic(format!(
                "Directory '{}' already exists. Choose a different project name or remove it.",
                name
            )));
        }
        Ok(Some(ProjectTarget::fresh(path)))
    }
}

/// Fail early when the chosen assistant's CLI tool is missing
fn check_agent_tool(assistant: &str) -> Result<()> {
    let Some((_, install_hint)) = assistants::TOOL_CHECKS
        .iter()
        .find(|(key, _)| *key == assistant)
    else {
        // IDE-hosted assistants have no standalone CLI to probe
        return Ok(());
    };
    if assistant_tool_available(assistant) {
        return Ok(());
    }
    let display = assistant_display_name(assistant).unwrap_or(assistant);
    eprintln!("{} {} not found", "Error:".red().bold(), display);
    eprintln!("  Install with: {}", install_hint.cyan());
    eprintln!(
        "  {}",
        "Tip: use --ignore-agent-tools to skip this check".dark_grey()
    );
    Err(AppError::generic(format!("{} CLI not found", display)))
}

async fn run_git_step(
    args: &InitArgs,
    target: &ProjectTarget,
    git_available: bool,
    reporter: &dyn Reporter,
) {
    if args.no_git {
        reporter.skip("git", "--no-git flag");
        return;
    }
    reporter.start("git", "");
    if is_git_repo(&target.path).await {
        reporter.complete("git", "existing repo detected");
    } else if git_available {
        match init_git_repo(&target.path).await {
            Ok(()) => reporter.complete("git", "initialized"),
            Err(e) => {
                // Soft failure: reported, never rolls back the extraction
                warn!("Git bootstrap failed: {}", e);
                reporter.error("git", "init failed");
            }
        }
    } else {
        reporter.skip("git", "git not available");
    }
}

fn populate_tracker(tracker: &Arc<Mutex<StepTracker>>, assistant: &str, dialect: &str) {
    let Ok(mut t) = tracker.lock() else { return };
    t.add("precheck", "Check required tools");
    t.complete("precheck", "ok");
    t.add("ai-select", "Select AI assistant");
    t.complete("ai-select", assistant);
    t.add("script-select", "Select script type");
    t.complete("script-select", dialect);
    for (key, label) in [
        ("fetch", "Fetch latest release"),
        ("download", "Download template"),
        ("extract", "Extract template"),
        ("zip-list", "Archive contents"),
        ("extracted-summary", "Extraction summary"),
        ("chmod", "Ensure scripts executable"),
        ("cleanup", "Cleanup"),
        ("git", "Initialize git repository"),
        ("final", "Finalize"),
    ] {
        t.add(key, label);
    }
}

fn print_setup_summary(target: &ProjectTarget) {
    let name = target
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| target.path.display().to_string());
    let path_line = target.path.display().to_string();

    println!("{}", "Stencil Project Setup".cyan().bold());
    println!("{:<15}{}", "Project", name.as_str().green());
    if target.merge_into_existing {
        println!("{:<15}{}", "Working Path", path_line.as_str().dark_grey());
    } else {
        println!("{:<15}{}", "Target Path", path_line.as_str().dark_grey());
    }
    println!();
}

fn print_agent_security_notice(assistant: &str) {
    let Some((_, folder)) = assistants::AGENT_FOLDERS
        .iter()
        .find(|(key, _)| *key == assistant)
    else {
        return;
    };
    println!();
    println!("{}", "Agent Folder Security".yellow().bold());
    println!(
        "Some agents may store credentials or auth tokens in the {} folder inside your project.",
        folder.cyan()
    );
    println!(
        "Consider adding {} (or parts of it) to {} to prevent accidental credential leakage.",
        folder.cyan(),
        ".gitignore".cyan()
    );
}

fn print_next_steps(target: &ProjectTarget) {
    println!();
    println!("{}", "Next steps".cyan().bold());
    let mut step = 1;
    if target.merge_into_existing {
        println!("{}. You're already in the project directory", step);
    } else {
        let name = target
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let cd = format!("cd {}", name);
        println!("{}. Go to the project folder: {}", step, cd.as_str().cyan());
    }
    step += 1;
    println!("{}. Review the scaffolded layout and template docs", step);
    println!(
        "{}. Start your AI assistant in the project directory",
        step + 1
    );
}

fn print_debug_environment() {
    eprintln!();
    eprintln!("{}", "Debug Environment".magenta().bold());
    eprintln!("  Version   {}", env!("CARGO_PKG_VERSION"));
    eprintln!("  Platform  {}", std::env::consts::OS);
    if let Ok(cwd) = std::env::current_dir() {
        eprintln!("  CWD       {}", cwd.display());
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(matches!(
        line.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}
