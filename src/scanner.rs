/// Candidate discovery under the source root.
///
/// A scan produces a point-in-time snapshot of the regular files eligible
/// for organization. Files created while a pass is running are not
/// guaranteed to be seen until the next pass; files that vanish after the
/// snapshot surface later as per-file errors, never as a crash.
use crate::config::CompiledFilters;
use crate::index::INDEX_FILENAME;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory names never descended into or organized, matched
/// case-insensitively against every path segment.
const IGNORED_DIRS: &[&str] = &[
    "$recycle.bin",
    "system volume information",
    ".git",
    "__pycache__",
    "node_modules",
    "target",
];

/// Enumerates candidate files under `source`.
///
/// Excluded from the snapshot: directories and symlinks; anything with a
/// reserved ignore segment in its path; the persisted index file; anything
/// inside the destination tree (checked against the canonicalized
/// destination, component-wise, so sibling folders with a common name
/// prefix are not falsely excluded); and anything rejected by the filter
/// rules.
pub fn scan(
    source: &Path,
    destination: &Path,
    recursive: bool,
    filters: &CompiledFilters,
) -> Vec<PathBuf> {
    let dest_resolved = destination
        .canonicalize()
        .unwrap_or_else(|_| destination.to_path_buf());

    let mut candidates = Vec::new();
    walk(source, &dest_resolved, recursive, filters, &mut candidates);
    candidates
}

fn walk(
    dir: &Path,
    dest_resolved: &Path,
    recursive: bool,
    filters: &CompiledFilters,
    out: &mut Vec<PathBuf>,
) {
    // Unreadable directories are skipped, not fatal.
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() {
            if recursive && !has_ignored_segment(&path) && !inside_destination(&path, dest_resolved)
            {
                walk(&path, dest_resolved, recursive, filters, out);
            }
            continue;
        }

        if file_type.is_file() && should_organize(&path, dest_resolved, filters) {
            out.push(path);
        }
    }
}

fn should_organize(path: &Path, dest_resolved: &Path, filters: &CompiledFilters) -> bool {
    if has_ignored_segment(path) {
        return false;
    }
    if path.file_name().is_some_and(|name| name == INDEX_FILENAME) {
        return false;
    }
    if inside_destination(path, dest_resolved) {
        return false;
    }
    filters.should_include(path)
}

fn has_ignored_segment(path: &Path) -> bool {
    path.components().any(|component| {
        let segment = component.as_os_str().to_string_lossy().to_lowercase();
        IGNORED_DIRS.contains(&segment.as_str())
    })
}

fn inside_destination(path: &Path, dest_resolved: &Path) -> bool {
    path.canonicalize()
        .unwrap_or_else(|_| path.to_path_buf())
        .starts_with(dest_resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilterConfig;
    use std::fs;
    use tempfile::TempDir;

    fn default_filters() -> CompiledFilters {
        FilterConfig::default()
            .compile()
            .expect("Failed to compile filters")
    }

    fn file_names(candidates: &[PathBuf]) -> Vec<String> {
        let mut names: Vec<String> = candidates
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_scan_finds_top_level_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = temp_dir.path();
        fs::write(source.join("a.txt"), "a").expect("Failed to write file");
        fs::write(source.join("b.png"), "b").expect("Failed to write file");

        let candidates = scan(source, &source.join("Organized"), true, &default_filters());
        assert_eq!(file_names(&candidates), vec!["a.txt", "b.png"]);
    }

    #[test]
    fn test_scan_recursive_descends() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = temp_dir.path();
        fs::create_dir(source.join("nested")).expect("Failed to create dir");
        fs::write(source.join("nested").join("deep.txt"), "x").expect("Failed to write file");

        let recursive = scan(source, &source.join("Organized"), true, &default_filters());
        assert_eq!(file_names(&recursive), vec!["deep.txt"]);

        let top_only = scan(source, &source.join("Organized"), false, &default_filters());
        assert!(top_only.is_empty());
    }

    #[test]
    fn test_scan_excludes_destination_tree() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = temp_dir.path();
        let destination = source.join("Organized");
        fs::create_dir_all(destination.join("images")).expect("Failed to create dir");
        fs::write(destination.join("images").join("done.png"), "x").expect("Failed to write file");
        fs::write(source.join("pending.png"), "y").expect("Failed to write file");

        let candidates = scan(source, &destination, true, &default_filters());
        assert_eq!(file_names(&candidates), vec!["pending.png"]);
    }

    #[test]
    fn test_scan_does_not_exclude_sibling_with_destination_prefix() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = temp_dir.path();
        let destination = source.join("Organized");
        fs::create_dir_all(&destination).expect("Failed to create dir");
        // Shares the name prefix but is a different directory.
        fs::create_dir(source.join("Organized_old")).expect("Failed to create dir");
        fs::write(source.join("Organized_old").join("keep.txt"), "x")
            .expect("Failed to write file");

        let candidates = scan(source, &destination, true, &default_filters());
        assert_eq!(file_names(&candidates), vec!["keep.txt"]);
    }

    #[test]
    fn test_scan_excludes_ignored_dirs() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = temp_dir.path();
        fs::create_dir(source.join(".git")).expect("Failed to create dir");
        fs::write(source.join(".git").join("HEAD"), "ref").expect("Failed to write file");
        fs::create_dir(source.join("__pycache__")).expect("Failed to create dir");
        fs::write(source.join("__pycache__").join("mod.pyc"), "x").expect("Failed to write file");
        fs::write(source.join("real.txt"), "y").expect("Failed to write file");

        let candidates = scan(source, &source.join("Organized"), true, &default_filters());
        assert_eq!(file_names(&candidates), vec!["real.txt"]);
    }

    #[test]
    fn test_scan_excludes_index_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = temp_dir.path();
        fs::write(source.join(INDEX_FILENAME), "{}").expect("Failed to write file");
        fs::write(source.join("real.txt"), "y").expect("Failed to write file");

        let candidates = scan(source, &source.join("Organized"), true, &default_filters());
        assert_eq!(file_names(&candidates), vec!["real.txt"]);
    }

    #[test]
    fn test_scan_applies_filter_rules() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = temp_dir.path();
        fs::write(source.join(".hidden"), "x").expect("Failed to write file");
        fs::write(source.join("visible.txt"), "y").expect("Failed to write file");

        let candidates = scan(source, &source.join("Organized"), true, &default_filters());
        assert_eq!(file_names(&candidates), vec!["visible.txt"]);
    }
}
