//! Filesystem helpers shared by the database lister and the storage janitor

use chrono::{DateTime, Utc};
use jwalk::{Parallelism, WalkDir};
use std::fs::Metadata;
use std::path::Path;

/// Total size in bytes of every regular file below `root`.
///
/// Symlinks are not followed. A missing root counts as zero; unreadable
/// entries are skipped.
#[must_use]
pub fn dir_size(root: &Path) -> u64 {
    if !root.exists() {
        return 0;
    }
    if root.is_file() {
        return root.metadata().map(|m| m.len()).unwrap_or(0);
    }

    WalkDir::new(root)
        .skip_hidden(false)
        .follow_links(false)
        .parallelism(Parallelism::Serial)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.metadata().ok())
        .map(|metadata| metadata.len())
        .sum()
}

/// Modification time of `metadata` as UTC, falling back to the epoch
#[must_use]
pub fn modified_utc(metadata: &Metadata) -> DateTime<Utc> {
    metadata
        .modified()
        .map(DateTime::<Utc>::from)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Create `path` and its parents, restricting the leaf to the owner on unix
///
/// # Errors
///
/// Returns an IO error if the directory cannot be created or chmod'ed.
pub fn ensure_private_dir(path: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(path)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))?;
    }
    Ok(())
}

/// Check that `target` is inside `parent` once both are canonicalized.
///
/// Returns false when either path does not exist.
#[must_use]
pub fn path_is_contained(target: &Path, parent: &Path) -> bool {
    match (target.canonicalize(), parent.canonicalize()) {
        (Ok(target), Ok(parent)) => target.starts_with(parent),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn dir_size_sums_nested_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.csv"), vec![0u8; 100]).unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join(".hidden"), vec![0u8; 50]).unwrap();

        assert_eq!(dir_size(dir.path()), 150);
    }

    #[test]
    fn dir_size_of_missing_dir_is_zero() {
        let dir = TempDir::new().unwrap();
        assert_eq!(dir_size(&dir.path().join("missing")), 0);
    }

    #[cfg(unix)]
    #[test]
    fn private_dir_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let root = dir.path().join("a").join("exports");
        ensure_private_dir(&root).unwrap();
        let mode = std::fs::metadata(&root).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o700);
    }

    #[test]
    fn containment_rejects_traversal() {
        let dir = TempDir::new().unwrap();
        let inner = dir.path().join("exports");
        std::fs::create_dir(&inner).unwrap();
        std::fs::write(dir.path().join("secret.txt"), "x").unwrap();

        assert!(!path_is_contained(&inner.join("..").join("secret.txt"), &inner));
        std::fs::write(inner.join("ok.csv"), "x").unwrap();
        assert!(path_is_contained(&inner.join("ok.csv"), &inner));
    }
}
