//! Tool presence checks
//!
//! Probes the PATH for the external tools the scaffolder cooperates
//! with: git for repository bootstrap and the per-assistant CLIs. These
//! are collaborators, not dependencies; a missing tool downgrades or
//! blocks a feature but is reported, never panicked over.

use std::env;
use std::path::{Path, PathBuf};

use crate::cli::tracker::StepTracker;

/// Whether `tool` resolves to an executable on the PATH
pub fn tool_on_path(tool: &str) -> bool {
    let Some(paths) = env::var_os("PATH") else {
        return false;
    };
    for dir in env::split_paths(&paths) {
        if is_executable(&dir.join(tool)) {
            return true;
        }
        #[cfg(windows)]
        for ext in ["exe", "cmd", "bat"] {
            if is_executable(&dir.join(format!("{}.{}", tool, ext))) {
                return true;
            }
        }
    }
    false
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.is_file()
        && std::fs::metadata(path)
            .map(|meta| meta.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Local claude install path used after its installer migration, which
/// removes the executable from PATH and leaves an alias here instead
pub fn claude_local_install() -> Option<PathBuf> {
    let candidate = dirs::home_dir()?.join(".claude").join("local").join("claude");
    candidate.is_file().then_some(candidate)
}

/// Whether the CLI tool backing `assistant` is available
pub fn assistant_tool_available(assistant: &str) -> bool {
    if assistant == "claude" && claude_local_install().is_some() {
        return true;
    }
    tool_on_path(assistant)
}

/// Probe one tool and record the result on its tracker step
pub fn check_tool_for_tracker(tool: &str, tracker: &mut StepTracker) -> bool {
    if assistant_tool_available(tool) {
        tracker.complete(tool, "available");
        true
    } else {
        tracker.error(tool, "not found");
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tracker::StepStatus;

    #[test]
    fn test_nonsense_tool_not_on_path() {
        assert!(!tool_on_path("definitely-not-a-real-tool-name-42"));
    }

    #[cfg(unix)]
    #[test]
    fn test_sh_is_on_path() {
        // Every POSIX environment ships sh
        assert!(tool_on_path("sh"));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_executable_file_is_not_a_tool() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pretender");
        std::fs::write(&path, "not a binary").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();
        assert!(!is_executable(&path));
    }

    #[test]
    fn test_check_tool_records_step() {
        let mut tracker = StepTracker::new("Check Available Tools");
        tracker.add("no-such-tool", "Imaginary tool");
        let found = check_tool_for_tracker("no-such-tool", &mut tracker);
        assert!(!found);
        assert_eq!(tracker.steps()[0].status, StepStatus::Error);
        assert_eq!(tracker.steps()[0].detail, "not found");
    }
}
