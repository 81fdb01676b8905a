/// Pass orchestration: dedup routing, moving, pruning, and the watch loop.
///
/// A pass is one full scan -> classify -> dedup -> move -> prune cycle. The
/// index is owned here and passed by reference into per-file processing;
/// each file yields an explicit [`FileOutcome`] so a single bad file never
/// aborts the pass.
use crate::bucket::{month_bucket, source_bucket};
use crate::config::{CompiledFilters, Config, SortMode};
use crate::file_category::CategoryMapper;
use crate::hasher::sha256_hex;
use crate::index::{HashIndex, INDEX_FILENAME};
use crate::output::OutputFormatter;
use crate::placer::{move_file, target_path, PlaceError};
use crate::scanner::scan;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

/// Destination sub-tree that receives repeated content.
pub const DUPLICATES_DIR: &str = "duplicates";

/// Errors that end a pass.
#[derive(Debug)]
pub enum OrganizeError {
    /// The destination root or a category/bucket directory could not be
    /// created. In watch mode the next cycle retries.
    DestinationUnwritable { path: PathBuf, source: io::Error },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DestinationUnwritable { path, source } => {
                write!(
                    f,
                    "Failed to create destination {}: {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for OrganizeError {}

/// Per-file processing result, consumed by the pass orchestrator.
#[derive(Debug, Clone)]
pub enum FileOutcome {
    /// New content, moved into its category bucket.
    Moved(PathBuf),
    /// Repeated content, routed to the duplicates bucket.
    Duplicate(PathBuf),
    /// Hashing or moving failed; the pass continues with the next file.
    Failed { path: PathBuf, reason: String },
}

/// Aggregate result of one pass.
#[derive(Debug, Default)]
pub struct PassReport {
    /// Files moved into their category buckets.
    pub moved: usize,
    /// Files routed to the duplicates bucket.
    pub duplicates: usize,
    /// Files that failed to process, with the failure reason.
    pub failed: Vec<(PathBuf, String)>,
    /// Whether the pass ran in dry-run mode.
    pub dry_run: bool,
}

impl PassReport {
    /// True if the pass moved or deduplicated anything.
    pub fn has_activity(&self) -> bool {
        self.moved > 0 || self.duplicates > 0
    }
}

/// Distinguishes failures that abort the pass from failures that only
/// affect the current file.
enum ProcessError {
    /// The destination tree cannot be extended; pass-fatal.
    Unwritable(PathBuf, io::Error),
    /// Recoverable for this file only.
    PerFile(String),
}

impl From<PlaceError> for ProcessError {
    fn from(error: PlaceError) -> Self {
        match error {
            PlaceError::DirectoryCreationFailed { path, source } => {
                ProcessError::Unwritable(path, source)
            }
            other => ProcessError::PerFile(other.to_string()),
        }
    }
}

/// Classifies, buckets, hashes, and relocates a single candidate.
///
/// The index decides routing: a fingerprint whose canonical file still
/// exists elsewhere marks this candidate as a duplicate, and the canonical
/// entry is left untouched. Otherwise the candidate is moved to its
/// category bucket and becomes canonical, overwriting any stale entry for
/// that fingerprint.
///
/// # Errors
///
/// Fails only when a destination directory cannot be created; hash and
/// move failures come back as [`FileOutcome::Failed`].
pub fn organize_file(
    path: &Path,
    config: &Config,
    mapper: &CategoryMapper,
    index: &mut HashIndex,
) -> Result<FileOutcome, OrganizeError> {
    match try_organize(path, config, mapper, index) {
        Ok(outcome) => Ok(outcome),
        Err(ProcessError::Unwritable(dir, source)) => {
            Err(OrganizeError::DestinationUnwritable { path: dir, source })
        }
        Err(ProcessError::PerFile(reason)) => Ok(FileOutcome::Failed {
            path: path.to_path_buf(),
            reason,
        }),
    }
}

fn try_organize(
    path: &Path,
    config: &Config,
    mapper: &CategoryMapper,
    index: &mut HashIndex,
) -> Result<FileOutcome, ProcessError> {
    let category = mapper.classify(path);
    let bucket = match config.sort_mode {
        SortMode::Date => month_bucket(path).map_err(|e| {
            ProcessError::PerFile(format!("could not read modification time: {}", e))
        })?,
        SortMode::Source => source_bucket(path),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| ProcessError::PerFile("file has no name component".to_string()))?
        .to_os_string();

    let fingerprint = sha256_hex(path)
        .map_err(|e| ProcessError::PerFile(format!("could not hash file: {}", e)))?;

    let known_duplicate = match index.canonical(&fingerprint) {
        Some(canonical) => {
            // In dry-run the simulated canonical target was never created;
            // treat entries recorded during this pass as live so a preview
            // reports the same counts as a real run.
            let live = canonical.exists() || (config.dry_run && index.is_fresh(&fingerprint));
            live && resolve_lenient(&canonical) != resolve_lenient(path)
        }
        None => false,
    };

    if known_duplicate {
        let duplicate_target =
            target_path(&config.destination, DUPLICATES_DIR, &bucket, &file_name);
        let final_path = move_file(path, &duplicate_target, config.dry_run)?;
        // The canonical entry stays; a duplicate never becomes authoritative.
        return Ok(FileOutcome::Duplicate(final_path));
    }

    let primary_target = target_path(
        &config.destination,
        category.dir_name(),
        &bucket,
        &file_name,
    );
    let final_path = move_file(path, &primary_target, config.dry_run)?;
    index.record(fingerprint, &final_path);
    Ok(FileOutcome::Moved(final_path))
}

fn resolve_lenient(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Runs one full organizing pass.
///
/// Per-file failures are folded into the report and never abort the pass.
/// The index is flushed once at pass end; a flush failure is reported as a
/// warning rather than discarding the pass result, since the index
/// regenerates on the next successful save.
///
/// # Errors
///
/// Fails only when the destination root cannot be created. In watch mode
/// the caller retries on the next cycle.
pub fn run_pass(config: &Config, filters: &CompiledFilters) -> Result<PassReport, OrganizeError> {
    if !config.dry_run {
        fs::create_dir_all(&config.destination).map_err(|e| {
            OrganizeError::DestinationUnwritable {
                path: config.destination.clone(),
                source: e,
            }
        })?;
    }

    let index_path = config.destination.join(INDEX_FILENAME);
    let mut index = HashIndex::load(&index_path);
    let mapper = CategoryMapper::default();

    let candidates = scan(&config.source, &config.destination, config.recursive, filters);
    let mut report = PassReport {
        dry_run: config.dry_run,
        ..Default::default()
    };

    let progress = OutputFormatter::create_progress_bar(candidates.len() as u64);
    for candidate in &candidates {
        match organize_file(candidate, config, &mapper, &mut index)? {
            FileOutcome::Moved(target) => {
                report.moved += 1;
                progress.println(OutputFormatter::moved_line(candidate, &target));
            }
            FileOutcome::Duplicate(target) => {
                report.duplicates += 1;
                progress.println(OutputFormatter::duplicate_line(candidate, &target));
            }
            FileOutcome::Failed { path, reason } => {
                progress.println(OutputFormatter::error_line(&path, &reason));
                report.failed.push((path, reason));
            }
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    if let Err(e) = index.save(&index_path, config.dry_run) {
        OutputFormatter::warning(&format!(
            "Could not save index {}: {}",
            index_path.display(),
            e
        ));
    }

    if !config.dry_run {
        prune_empty_dirs(&config.source, config.keep_empty);
    }

    Ok(report)
}

/// Removes directories left empty under `root`, deepest first.
///
/// Non-empty or unremovable directories are silently skipped; the root
/// itself is never removed. No-op when `keep_empty`.
pub fn prune_empty_dirs(root: &Path, keep_empty: bool) {
    if keep_empty {
        return;
    }

    let mut dirs = Vec::new();
    collect_dirs(root, &mut dirs);
    dirs.sort_by_key(|dir| std::cmp::Reverse(dir.components().count()));

    for dir in dirs {
        // remove_dir refuses non-empty directories, which is the filter.
        let _ = fs::remove_dir(&dir);
    }
}

fn collect_dirs(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            out.push(path.clone());
            collect_dirs(&path, out);
        }
    }
}

/// Repeats [`run_pass`] forever, sleeping `interval_secs` between cycles.
///
/// Only cycles with nonzero activity are reported. A failed pass is logged
/// and retried on the next cycle. Terminates only on external interruption.
pub fn watch(config: &Config, filters: &CompiledFilters, interval_secs: u64) {
    OutputFormatter::watch_banner(&config.source, interval_secs);
    loop {
        match run_pass(config, filters) {
            Ok(report) if report.has_activity() => OutputFormatter::cycle_summary(&report),
            Ok(_) => {}
            Err(e) => OutputFormatter::error(&format!("Pass failed: {}", e)),
        }
        thread::sleep(Duration::from_secs(interval_secs));
    }
}
