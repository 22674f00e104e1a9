//! Template archive extraction and merging
//!
//! Unpacks a downloaded archive into the project destination. Two modes
//! apply, selected once at entry:
//!
//! - **Fresh directory**: the destination does not exist yet. The
//!   archive is extracted directly into it, a single wrapping root is
//!   flattened away, and any failure removes the destination entirely
//!   so no partial project state is left on disk.
//! - **Merge**: the destination is the caller's pre-existing directory.
//!   The archive is unpacked into a private staging directory first, so
//!   a failure before the merge leaves the destination untouched. The
//!   merge itself is additive with overwrite: files already present but
//!   absent from the archive survive unchanged. The destination is
//!   never removed on failure; a partially merged state is surfaced to
//!   the user rather than silently recovered.
//!
//! Release archives commonly enclose all content in a single top-level
//! folder; both modes detect that shape and treat the wrapper's
//! contents as the effective template root.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use zip::ZipArchive;

use crate::app::report::Reporter;
use crate::errors::{ExtractError, ExtractResult};

/// Where the template lands, and which semantics apply
#[derive(Debug, Clone)]
pub struct ProjectTarget {
    pub path: PathBuf,
    /// True when scaffolding into the caller's current directory
    pub merge_into_existing: bool,
}

impl ProjectTarget {
    /// A directory the pipeline creates and exclusively owns
    pub fn fresh(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            merge_into_existing: false,
        }
    }

    /// A pre-existing directory the pipeline merges into
    pub fn merge(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            merge_into_existing: true,
        }
    }
}

/// Extract `archive_path` into the target, reporting sub-steps.
///
/// The archive file itself is left in place; the caller deletes it
/// unconditionally once extraction has been attempted.
///
/// # Errors
///
/// Returns `ExtractError` if the archive is unreadable or a filesystem
/// operation fails. In fresh mode the destination directory is removed
/// before the error surfaces.
pub fn extract_template(
    archive_path: &Path,
    target: &ProjectTarget,
    reporter: &dyn Reporter,
) -> ExtractResult<()> {
    reporter.start("extract", "");
    let result = if target.merge_into_existing {
        extract_merge(archive_path, &target.path, reporter)
    } else {
        extract_fresh(archive_path, &target.path, reporter)
    };
    match &result {
        Ok(()) => reporter.complete("extract", ""),
        Err(e) => reporter.error("extract", &e.to_string()),
    }
    result
}

/// Fresh-directory mode: create, extract direct, flatten, full rollback
fn extract_fresh(archive_path: &Path, dest: &Path, reporter: &dyn Reporter) -> ExtractResult<()> {
    if dest.exists() {
        return Err(ExtractError::DestinationExists {
            path: dest.to_path_buf(),
        });
    }
    fs::create_dir_all(dest)?;

    let result = unpack_and_flatten(archive_path, dest, reporter);
    if result.is_err() {
        // Fresh mode owns the destination: no partial project survives
        let _ = fs::remove_dir_all(dest);
    }
    result
}

fn unpack_and_flatten(
    archive_path: &Path,
    dest: &Path,
    reporter: &dyn Reporter,
) -> ExtractResult<()> {
    let file = fs::File::open(archive_path)?;
    let mut archive = ZipArchive::new(file)?;
    reporter.start("zip-list", "");
    reporter.complete("zip-list", &format!("{} entries", archive.len()));

    archive.extract(dest)?;

    let top_level = read_dir_entries(dest)?;
    reporter.start("extracted-summary", "");
    reporter.complete(
        "extracted-summary",
        &format!("{} top-level items", top_level.len()),
    );

    if let Some(wrapper) = single_wrapping_root(&top_level) {
        flatten_wrapping_root(dest, &wrapper)?;
        reporter.add("flatten", "Flatten nested directory");
        reporter.complete("flatten", "");
        debug!("Flattened wrapping root in {}", dest.display());
    }
    Ok(())
}

/// Merge mode: stage privately, flatten heuristically, copy over
fn extract_merge(archive_path: &Path, dest: &Path, reporter: &dyn Reporter) -> ExtractResult<()> {
    let file = fs::File::open(archive_path)?;
    let mut archive = ZipArchive::new(file)?;
    reporter.start("zip-list", "");
    reporter.complete("zip-list", &format!("{} entries", archive.len()));

    // Staging keeps the live destination untouched until the merge, and
    // is removed when it drops, success or failure
    let staging = tempfile::tempdir()?;
    archive.extract(staging.path())?;

    let top_level = read_dir_entries(staging.path())?;
    reporter.start("extracted-summary", "");
    reporter.complete(
        "extracted-summary",
        &format!("temp {} items", top_level.len()),
    );

    let source_root = match single_wrapping_root(&top_level) {
        Some(wrapper) => {
            reporter.add("flatten", "Flatten nested directory");
            reporter.complete("flatten", "");
            wrapper
        }
        None => staging.path().to_path_buf(),
    };

    for entry in fs::read_dir(&source_root)? {
        let entry = entry?;
        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            merge_tree(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// If the listing is exactly one directory, that directory wraps the
/// real content
fn single_wrapping_root(entries: &[PathBuf]) -> Option<PathBuf> {
    match entries {
        [only] if only.is_dir() => Some(only.clone()),
        _ => None,
    }
}

/// Move a wrapper's contents up one level, replacing `dest`.
///
/// Staged through a sibling path so the wrapper never collides with an
/// identically-named entry inside itself.
fn flatten_wrapping_root(dest: &Path, wrapper: &Path) -> ExtractResult<()> {
    let parent = dest.parent().unwrap_or_else(|| Path::new("."));
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project".to_string());
    let staging = parent.join(format!("{}.flatten", name));

    let result = (|| -> ExtractResult<()> {
        fs::rename(wrapper, &staging)?;
        fs::remove_dir(dest)?;
        fs::rename(&staging, dest)?;
        Ok(())
    })();

    if result.is_err() && staging.exists() {
        let _ = fs::remove_dir_all(&staging);
    }
    result
}

/// Recursively copy `src` over `dest`, creating missing directories and
/// overwriting same-path files; files unique to `dest` are untouched
fn merge_tree(src: &Path, dest: &Path) -> ExtractResult<()> {
    fs::create_dir_all(dest)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            merge_tree(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

fn read_dir_entries(dir: &Path) -> ExtractResult<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        entries.push(entry?.path());
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::report::NullReporter;
    use std::io::Write;
    use tempfile::tempdir;

    /// Build an in-memory zip; entries ending in '/' become directories
    fn build_zip(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let cursor = std::io::Cursor::new(&mut buf);
            let mut writer = zip::ZipWriter::new(cursor);
            let options = zip::write::FileOptions::default();
            for (name, content) in entries {
                if name.ends_with('/') {
                    writer
                        .add_directory(name.trim_end_matches('/'), options)
                        .unwrap();
                } else {
                    writer.start_file(*name, options).unwrap();
                    writer.write_all(content.as_bytes()).unwrap();
                }
            }
            writer.finish().unwrap();
        }
        buf
    }

    fn write_archive(dir: &Path, bytes: &[u8]) -> PathBuf {
        let path = dir.join("template.zip");
        fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_fresh_flattens_wrapping_root() {
        let work = tempdir().unwrap();
        let zip = build_zip(&[
            ("root/", ""),
            ("root/a.txt", "alpha"),
            ("root/sub/", ""),
            ("root/sub/b.txt", "beta"),
        ]);
        let archive = write_archive(work.path(), &zip);
        let dest = work.path().join("project");

        extract_template(&archive, &ProjectTarget::fresh(&dest), &NullReporter).unwrap();

        assert_eq!(fs::read_to_string(dest.join("a.txt")).unwrap(), "alpha");
        assert_eq!(fs::read_to_string(dest.join("sub/b.txt")).unwrap(), "beta");
        assert!(!dest.join("root").exists());
    }

    #[test]
    fn test_fresh_without_wrapper_extracts_in_place() {
        let work = tempdir().unwrap();
        let zip = build_zip(&[("a.txt", "alpha"), ("b.txt", "bravo")]);
        let archive = write_archive(work.path(), &zip);
        let dest = work.path().join("project");

        extract_template(&archive, &ProjectTarget::fresh(&dest), &NullReporter).unwrap();

        assert_eq!(fs::read_to_string(dest.join("a.txt")).unwrap(), "alpha");
        assert_eq!(fs::read_to_string(dest.join("b.txt")).unwrap(), "bravo");
    }

    #[test]
    fn test_fresh_single_file_is_not_a_wrapper() {
        let work = tempdir().unwrap();
        let zip = build_zip(&[("README.md", "hi")]);
        let archive = write_archive(work.path(), &zip);
        let dest = work.path().join("project");

        extract_template(&archive, &ProjectTarget::fresh(&dest), &NullReporter).unwrap();
        assert_eq!(fs::read_to_string(dest.join("README.md")).unwrap(), "hi");
    }

    #[test]
    fn test_fresh_rolls_back_on_corrupt_archive() {
        let work = tempdir().unwrap();
        let archive = write_archive(work.path(), b"this is not a zip");
        let dest = work.path().join("project");

        let result = extract_template(&archive, &ProjectTarget::fresh(&dest), &NullReporter);

        assert!(result.is_err());
        assert!(!dest.exists(), "destination must not survive a failure");
    }

    #[test]
    fn test_fresh_rejects_existing_destination() {
        let work = tempdir().unwrap();
        let zip = build_zip(&[("a.txt", "alpha")]);
        let archive = write_archive(work.path(), &zip);
        let dest = work.path().join("project");
        fs::create_dir(&dest).unwrap();
        fs::write(dest.join("precious.txt"), "keep me").unwrap();

        let result = extract_template(&archive, &ProjectTarget::fresh(&dest), &NullReporter);

        match result {
            Err(ExtractError::DestinationExists { .. }) => {}
            other => panic!("expected DestinationExists, got {:?}", other),
        }
        // A pre-existing directory is never rolled back
        assert_eq!(
            fs::read_to_string(dest.join("precious.txt")).unwrap(),
            "keep me"
        );
    }

    #[test]
    fn test_merge_preserves_untouched_and_overwrites_conflicts() {
        let work = tempdir().unwrap();
        let dest = work.path().join("existing");
        fs::create_dir(&dest).unwrap();
        fs::write(dest.join("keep.txt"), "original keep").unwrap();
        fs::write(dest.join("conflict.txt"), "old content").unwrap();

        let zip = build_zip(&[
            ("root/", ""),
            ("root/conflict.txt", "new content"),
            ("root/sub/", ""),
            ("root/sub/b.txt", "beta"),
        ]);
        let archive = write_archive(work.path(), &zip);

        extract_template(&archive, &ProjectTarget::merge(&dest), &NullReporter).unwrap();

        assert_eq!(
            fs::read_to_string(dest.join("keep.txt")).unwrap(),
            "original keep"
        );
        assert_eq!(
            fs::read_to_string(dest.join("conflict.txt")).unwrap(),
            "new content"
        );
        assert_eq!(fs::read_to_string(dest.join("sub/b.txt")).unwrap(), "beta");
    }

    #[test]
    fn test_merge_into_existing_subdirectory() {
        let work = tempdir().unwrap();
        let dest = work.path().join("existing");
        fs::create_dir_all(dest.join("sub")).unwrap();
        fs::write(dest.join("sub/existing.txt"), "mine").unwrap();

        let zip = build_zip(&[("root/", ""), ("root/sub/", ""), ("root/sub/new.txt", "theirs")]);
        let archive = write_archive(work.path(), &zip);

        extract_template(&archive, &ProjectTarget::merge(&dest), &NullReporter).unwrap();

        assert_eq!(
            fs::read_to_string(dest.join("sub/existing.txt")).unwrap(),
            "mine"
        );
        assert_eq!(
            fs::read_to_string(dest.join("sub/new.txt")).unwrap(),
            "theirs"
        );
    }

    #[test]
    fn test_merge_failure_before_copy_leaves_destination_untouched() {
        let work = tempdir().unwrap();
        let dest = work.path().join("existing");
        fs::create_dir(&dest).unwrap();
        fs::write(dest.join("keep.txt"), "untouched").unwrap();

        let archive = write_archive(work.path(), b"garbage, not an archive");

        let result = extract_template(&archive, &ProjectTarget::merge(&dest), &NullReporter);

        assert!(result.is_err());
        assert!(dest.exists(), "merge mode never removes the destination");
        assert_eq!(
            fs::read_to_string(dest.join("keep.txt")).unwrap(),
            "untouched"
        );
        assert_eq!(fs::read_dir(&dest).unwrap().count(), 1);
    }

    #[test]
    fn test_merge_without_wrapper_uses_staging_root() {
        let work = tempdir().unwrap();
        let dest = work.path().join("existing");
        fs::create_dir(&dest).unwrap();

        let zip = build_zip(&[("a.txt", "alpha"), ("b.txt", "bravo")]);
        let archive = write_archive(work.path(), &zip);

        extract_template(&archive, &ProjectTarget::merge(&dest), &NullReporter).unwrap();

        assert_eq!(fs::read_to_string(dest.join("a.txt")).unwrap(), "alpha");
        assert_eq!(fs::read_to_string(dest.join("b.txt")).unwrap(), "bravo");
    }
}
