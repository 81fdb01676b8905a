/// Target-path computation and safe relocation of files.
///
/// The placer turns (destination, category, bucket, filename) into a final
/// path, avoids name collisions by suffixing ` (n)` before the extension,
/// and performs (or, in dry-run, simulates) the move.
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors raised while relocating a single file.
#[derive(Debug)]
pub enum PlaceError {
    /// Failed to create the target's parent directories.
    DirectoryCreationFailed {
        path: PathBuf,
        source: io::Error,
    },
    /// Failed to move a file to its resolved target.
    FileMoveFailed {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}

impl std::fmt::Display for PlaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::FileMoveFailed { from, to, source } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    from.display(),
                    to.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for PlaceError {}

/// Computes the target path for a file under its category and bucket.
pub fn target_path(
    destination: &Path,
    category_dir: &str,
    bucket: &str,
    file_name: &OsStr,
) -> PathBuf {
    destination.join(category_dir).join(bucket).join(file_name)
}

/// Resolves a name collision at `target`.
///
/// Returns `target` unchanged when nothing exists there; otherwise the
/// first free of `name (1).ext`, `name (2).ext`, ...
///
/// Existence is always checked against the real filesystem, in dry-run
/// mode too. Since dry-run creates no files, repeated dry-run candidates
/// with the same name all resolve to the same suggested path; this is a
/// documented limitation of the preview, not corrected here.
pub fn safe_name(target: &Path) -> PathBuf {
    if !target.exists() {
        return target.to_path_buf();
    }

    let stem = target
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let extension = target.extension().map(|e| e.to_string_lossy().to_string());
    let parent = target.parent().unwrap_or_else(|| Path::new(""));

    let mut n = 1;
    loop {
        let candidate_name = match &extension {
            Some(ext) => format!("{} ({}).{}", stem, n, ext),
            None => format!("{} ({})", stem, n),
        };
        let candidate = parent.join(candidate_name);
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}

/// Moves `src` to the collision-resolved form of `dst`.
///
/// In real mode, creates missing parent directories and renames the file,
/// falling back to copy + remove when rename fails (e.g. across filesystem
/// boundaries). In dry-run mode, performs no filesystem mutation and
/// returns the resolved target as if it had moved.
pub fn move_file(src: &Path, dst: &Path, dry_run: bool) -> Result<PathBuf, PlaceError> {
    let resolved = safe_name(dst);
    if dry_run {
        return Ok(resolved);
    }

    if let Some(parent) = resolved.parent() {
        fs::create_dir_all(parent).map_err(|e| PlaceError::DirectoryCreationFailed {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    if fs::rename(src, &resolved).is_err() {
        // rename cannot cross filesystem boundaries
        fs::copy(src, &resolved)
            .and_then(|_| fs::remove_file(src))
            .map_err(|e| PlaceError::FileMoveFailed {
                from: src.to_path_buf(),
                to: resolved.clone(),
                source: e,
            })?;
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_target_path_layout() {
        let target = target_path(
            Path::new("/dest"),
            "images",
            "2024-03",
            OsStr::new("photo.png"),
        );
        assert_eq!(target, PathBuf::from("/dest/images/2024-03/photo.png"));
    }

    #[test]
    fn test_safe_name_free_path_unchanged() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let target = temp_dir.path().join("free.txt");
        assert_eq!(safe_name(&target), target);
    }

    #[test]
    fn test_safe_name_suffixes_increment() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let target = temp_dir.path().join("taken.txt");
        fs::write(&target, "x").expect("Failed to write file");

        let first = safe_name(&target);
        assert_eq!(first, temp_dir.path().join("taken (1).txt"));

        fs::write(&first, "y").expect("Failed to write file");
        let second = safe_name(&target);
        assert_eq!(second, temp_dir.path().join("taken (2).txt"));
    }

    #[test]
    fn test_safe_name_without_extension() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let target = temp_dir.path().join("README");
        fs::write(&target, "x").expect("Failed to write file");

        assert_eq!(safe_name(&target), temp_dir.path().join("README (1)"));
    }

    #[test]
    fn test_move_file_creates_parents() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let src = temp_dir.path().join("file.txt");
        fs::write(&src, "content").expect("Failed to write file");
        let dst = temp_dir.path().join("a").join("b").join("file.txt");

        let final_path = move_file(&src, &dst, false).expect("Failed to move file");
        assert_eq!(final_path, dst);
        assert!(!src.exists());
        assert_eq!(
            fs::read_to_string(&dst).expect("Failed to read file"),
            "content"
        );
    }

    #[test]
    fn test_move_file_resolves_collision() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dst_dir = temp_dir.path().join("docs");
        fs::create_dir(&dst_dir).expect("Failed to create dir");
        fs::write(dst_dir.join("report.txt"), "old").expect("Failed to write file");

        let src = temp_dir.path().join("report.txt");
        fs::write(&src, "new").expect("Failed to write file");

        let final_path =
            move_file(&src, &dst_dir.join("report.txt"), false).expect("Failed to move file");
        assert_eq!(final_path, dst_dir.join("report (1).txt"));
        assert_eq!(
            fs::read_to_string(dst_dir.join("report.txt")).expect("Failed to read file"),
            "old"
        );
        assert_eq!(
            fs::read_to_string(&final_path).expect("Failed to read file"),
            "new"
        );
    }

    #[test]
    fn test_move_file_dry_run_touches_nothing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let src = temp_dir.path().join("file.txt");
        fs::write(&src, "content").expect("Failed to write file");
        let dst = temp_dir.path().join("a").join("file.txt");

        let final_path = move_file(&src, &dst, true).expect("Dry-run move failed");
        assert_eq!(final_path, dst);
        assert!(src.exists());
        assert!(!dst.exists());
        assert!(!temp_dir.path().join("a").exists());
    }
}
