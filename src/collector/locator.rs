//! Plan artifact discovery.

use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{CollectError, Result};

/// Returns every regular file under `root` whose file name equals `basename`.
///
/// `root` is made absolute against the current directory. Symbolic links are
/// not followed and never match. Entries come back in traversal order, sorted
/// by file name within each directory.
///
/// # Errors
///
/// Returns [`CollectError::RootResolution`] if `root` cannot be made absolute
/// and [`CollectError::Traversal`] on the first unreadable entry.
pub fn locate(root: impl AsRef<Path>, basename: &str) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    let root = std::path::absolute(root).map_err(|source| CollectError::RootResolution {
        path: root.to_path_buf(),
        source,
    })?;

    info!(root = %root.display(), basename, "Searching for plan files");

    let mut found = Vec::new();
    for entry in WalkDir::new(&root)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| CollectError::Traversal {
            root: root.clone(),
            source,
        })?;

        if entry.file_type().is_file() && entry.file_name() == basename {
            debug!(plan_file = %entry.path().display(), "Plan file found");
            found.push(entry.into_path());
        }
    }

    info!(count = found.len(), "Plan file search finished");
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReporterError;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        std::fs::write(path, "{}").expect("Failed to write file");
    }

    #[test]
    fn test_finds_matching_files_only() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        touch(&temp.path().join("a/plan.bin"));
        touch(&temp.path().join("a/b/c/plan.bin"));
        touch(&temp.path().join("a/plan.bin.bak"));
        touch(&temp.path().join("d/Plan.bin"));
        touch(&temp.path().join("d/other.bin"));

        let found = locate(temp.path(), "plan.bin").expect("locate should succeed");

        assert_eq!(
            found,
            vec![temp.path().join("a/b/c/plan.bin"), temp.path().join("a/plan.bin")]
        );
        assert!(found.iter().all(|p| p.file_name().is_some_and(|n| n == "plan.bin")));
    }

    #[test]
    fn test_directory_with_matching_name_is_skipped() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        std::fs::create_dir_all(temp.path().join("x/plan.bin")).expect("Failed to create dir");
        touch(&temp.path().join("x/plan.bin/inner.txt"));

        let found = locate(temp.path(), "plan.bin").expect("locate should succeed");
        assert!(found.is_empty());
    }

    #[test]
    fn test_empty_tree() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let found = locate(temp.path(), "plan.bin").expect("locate should succeed");
        assert!(found.is_empty());
    }

    #[test]
    fn test_results_are_absolute() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        touch(&temp.path().join("plan.bin"));

        let found = locate(temp.path(), "plan.bin").expect("locate should succeed");
        assert_eq!(found.len(), 1);
        assert!(found[0].is_absolute());
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let result = locate(temp.path().join("absent"), "plan.bin");
        assert!(matches!(
            result,
            Err(ReporterError::Collect(CollectError::Traversal { .. }))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_not_followed() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        touch(&temp.path().join("real/plan.bin"));
        std::os::unix::fs::symlink(temp.path().join("real"), temp.path().join("link"))
            .expect("Failed to create dir symlink");
        std::fs::create_dir_all(temp.path().join("other")).expect("Failed to create dir");
        std::os::unix::fs::symlink(
            temp.path().join("real/plan.bin"),
            temp.path().join("other/plan.bin"),
        )
        .expect("Failed to create file symlink");

        let found = locate(temp.path(), "plan.bin").expect("locate should succeed");
        assert_eq!(found, vec![temp.path().join("real/plan.bin")]);
    }
}
