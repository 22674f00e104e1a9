//! Script executable-bit normalization
//!
//! Archives do not reliably carry execute permissions, so after
//! extraction every shell script under the known script directories is
//! checked: a regular file starting with the `#!` interpreter marker
//! and lacking all execute bits gains them, mirroring its read bits.
//! Per-file failures are collected and reported in aggregate rather
//! than aborting the run. No-op on platforms without an executable-bit
//! concept.

use std::io;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use crate::constants::files;

/// Result of a normalization pass over a project tree
#[derive(Debug, Default)]
pub struct NormalizeOutcome {
    /// Scripts inspected
    pub checked: usize,
    /// Scripts that gained execute bits
    pub updated: usize,
    /// Scripts that could not be updated, with the reason
    pub failures: Vec<ScriptFailure>,
}

/// A single script that could not be normalized
#[derive(Debug)]
pub struct ScriptFailure {
    pub path: PathBuf,
    pub error: io::Error,
}

impl NormalizeOutcome {
    /// Whether nothing was found to inspect
    pub fn is_noop(&self) -> bool {
        self.checked == 0
    }

    /// Short status line for the step tree
    pub fn summary(&self) -> String {
        if self.failures.is_empty() {
            format!("{} updated", self.updated)
        } else {
            format!("{} updated, {} failed", self.updated, self.failures.len())
        }
    }
}

/// Normalize execute bits on shell scripts under `project_path`
pub fn ensure_executable_scripts(project_path: &Path) -> NormalizeOutcome {
    #[cfg(unix)]
    {
        normalize_unix(project_path)
    }
    #[cfg(not(unix))]
    {
        let _ = project_path;
        NormalizeOutcome::default()
    }
}

#[cfg(unix)]
fn normalize_unix(project_path: &Path) -> NormalizeOutcome {
    let mut outcome = NormalizeOutcome::default();

    for dir in files::SCRIPT_DIRS {
        let root = project_path.join(dir);
        if !root.is_dir() {
            continue;
        }
        let mut scripts = Vec::new();
        collect_scripts(&root, &mut scripts);

        for script in scripts {
            outcome.checked += 1;
            match normalize_one(&script) {
                Ok(true) => outcome.updated += 1,
                Ok(false) => {}
                Err(error) => {
                    let path = script
                        .strip_prefix(project_path)
                        .map(Path::to_path_buf)
                        .unwrap_or(script);
                    outcome.failures.push(ScriptFailure { path, error });
                }
            }
        }
    }
    outcome
}

/// Recursively gather `*.sh` files; walk errors are skipped, not fatal
#[cfg(unix)]
fn collect_scripts(dir: &Path, scripts: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            collect_scripts(&path, scripts);
        } else if file_type.is_file()
            && path.extension().and_then(|e| e.to_str()) == Some(files::SCRIPT_EXTENSION)
        {
            scripts.push(path);
        }
    }
}

/// Apply the execute-bit rule to one script; returns whether it changed
#[cfg(unix)]
fn normalize_one(script: &Path) -> io::Result<bool> {
    use std::io::Read;
    use std::os::unix::fs::PermissionsExt;

    let meta = std::fs::symlink_metadata(script)?;
    if !meta.is_file() {
        // Symlinks and oddities are left alone
        return Ok(false);
    }

    let mut marker = [0u8; 2];
    let mut file = std::fs::File::open(script)?;
    match file.read_exact(&mut marker) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(false),
        Err(e) => return Err(e),
    }
    if &marker != b"#!" {
        return Ok(false);
    }

    let mode = meta.permissions().mode();
    if mode & 0o111 != 0 {
        return Ok(false);
    }

    // Mirror read bits into execute bits; owner can always execute
    let mut new_mode = mode;
    if mode & 0o400 != 0 {
        new_mode |= 0o100;
    }
    if mode & 0o040 != 0 {
        new_mode |= 0o010;
    }
    if mode & 0o004 != 0 {
        new_mode |= 0o001;
    }
    new_mode |= 0o100;

    std::fs::set_permissions(script, std::fs::Permissions::from_mode(new_mode))?;
    Ok(true)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::tempdir;

    fn write_with_mode(path: &Path, content: &[u8], mode: u32) {
        fs::write(path, content).unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
    }

    fn mode_of(path: &Path) -> u32 {
        fs::metadata(path).unwrap().permissions().mode() & 0o777
    }

    #[test]
    fn test_interpreter_script_gains_execute_bits() {
        let project = tempdir().unwrap();
        let scripts = project.path().join("scripts");
        fs::create_dir(&scripts).unwrap();
        let script = scripts.join("run.sh");
        write_with_mode(&script, b"#!/bin/sh\necho hi\n", 0o644);

        let outcome = ensure_executable_scripts(project.path());

        assert_eq!(outcome.checked, 1);
        assert_eq!(outcome.updated, 1);
        assert!(outcome.failures.is_empty());
        assert_eq!(mode_of(&script), 0o755);
    }

    #[test]
    fn test_owner_execute_guaranteed_even_without_read_bits() {
        let project = tempdir().unwrap();
        let scripts = project.path().join("scripts");
        fs::create_dir(&scripts).unwrap();
        let script = scripts.join("locked.sh");
        write_with_mode(&script, b"#!/bin/sh\n", 0o200);

        let outcome = ensure_executable_scripts(project.path());

        assert_eq!(outcome.updated, 1);
        assert_eq!(mode_of(&script) & 0o100, 0o100);
    }

    #[test]
    fn test_non_interpreter_file_left_unchanged() {
        let project = tempdir().unwrap();
        let scripts = project.path().join("scripts");
        fs::create_dir(&scripts).unwrap();
        let script = scripts.join("data.sh");
        write_with_mode(&script, b"plain data, no marker", 0o644);

        let outcome = ensure_executable_scripts(project.path());

        assert_eq!(outcome.checked, 1);
        assert_eq!(outcome.updated, 0);
        assert_eq!(mode_of(&script), 0o644);
    }

    #[test]
    fn test_already_executable_left_unchanged() {
        let project = tempdir().unwrap();
        let scripts = project.path().join("scripts");
        fs::create_dir(&scripts).unwrap();
        let script = scripts.join("ready.sh");
        write_with_mode(&script, b"#!/bin/sh\n", 0o700);

        let outcome = ensure_executable_scripts(project.path());

        assert_eq!(outcome.updated, 0);
        assert_eq!(mode_of(&script), 0o700);
    }

    #[test]
    fn test_nested_and_hidden_script_dirs_are_walked() {
        let project = tempdir().unwrap();
        let nested = project.path().join(".stencil/scripts/bash");
        fs::create_dir_all(&nested).unwrap();
        let script = nested.join("deep.sh");
        write_with_mode(&script, b"#!/usr/bin/env bash\n", 0o644);

        let outcome = ensure_executable_scripts(project.path());

        assert_eq!(outcome.updated, 1);
        assert_eq!(mode_of(&script), 0o755);
    }

    #[test]
    fn test_symlinks_are_skipped() {
        let project = tempdir().unwrap();
        let scripts = project.path().join("scripts");
        fs::create_dir(&scripts).unwrap();
        let real = scripts.join("real.sh");
        write_with_mode(&real, b"#!/bin/sh\n", 0o755);
        std::os::unix::fs::symlink(&real, scripts.join("link.sh")).unwrap();

        let outcome = ensure_executable_scripts(project.path());

        // Both paths inspected, neither modified
        assert_eq!(outcome.updated, 0);
        assert!(outcome.failures.is_empty());
    }

    #[test]
    fn test_no_script_dirs_is_a_noop() {
        let project = tempdir().unwrap();
        let outcome = ensure_executable_scripts(project.path());
        assert!(outcome.is_noop());
        assert_eq!(outcome.summary(), "0 updated");
    }

    #[test]
    fn test_empty_file_is_skipped() {
        let project = tempdir().unwrap();
        let scripts = project.path().join("scripts");
        fs::create_dir(&scripts).unwrap();
        let script = scripts.join("empty.sh");
        write_with_mode(&script, b"", 0o644);

        let outcome = ensure_executable_scripts(project.path());

        assert_eq!(outcome.updated, 0);
        assert_eq!(mode_of(&script), 0o644);
    }
}
