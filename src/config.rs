//! Runtime configuration and file filtering rules.
//!
//! Two layers live here. The runtime [`Config`] carries the options of a
//! single organizing run (source, destination, dry-run, sort mode, ...) and
//! validates the fatal preconditions before any scanning starts. The filter
//! layer loads optional TOML rules that exclude files from organization:
//!
//! ```toml
//! [filters]
//! enable_hidden_files = false
//!
//! [filters.exclude]
//! filenames = ["Thumbs.db"]
//! patterns = ["*.tmp"]
//! extensions = ["bak"]
//! regex = []
//!
//! [filters.include]
//! patterns = []
//! ```

use clap::ValueEnum;
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Selects how destination buckets are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortMode {
    /// Bucket by modification month (`YYYY-MM`).
    Date,
    /// Bucket by source/workflow heuristic (`whatsapp`, `screenshots`, ...).
    Source,
}

impl std::fmt::Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortMode::Date => write!(f, "date"),
            SortMode::Source => write!(f, "source"),
        }
    }
}

/// Options for a single organizing run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Folder to scan for candidates.
    pub source: PathBuf,
    /// Root folder organized files are moved under.
    pub destination: PathBuf,
    /// Simulate without mutating disk or index.
    pub dry_run: bool,
    /// Descend into subdirectories of the source.
    pub recursive: bool,
    /// Skip pruning of empty source directories.
    pub keep_empty: bool,
    /// Bucket derivation mode.
    pub sort_mode: SortMode,
}

impl Config {
    /// Validates the fatal preconditions of a run.
    ///
    /// # Errors
    ///
    /// Fails when the source is missing or not a directory, or when source
    /// and destination resolve to the same folder. Both abort the run
    /// before any filesystem mutation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.source.is_dir() {
            return Err(ConfigError::SourceMissing(self.source.clone()));
        }

        let source = resolve_lenient(&self.source);
        let destination = resolve_lenient(&self.destination);
        if source == destination {
            return Err(ConfigError::SourceEqualsDestination(self.source.clone()));
        }

        Ok(())
    }
}

/// Canonicalizes a path, falling back to the raw path when it does not
/// exist yet (the destination is created later).
fn resolve_lenient(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Errors raised while validating a run or loading filter rules.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Source folder does not exist or is not a directory.
    SourceMissing(PathBuf),
    /// Source and destination resolve to the same folder.
    SourceEqualsDestination(PathBuf),
    /// Filter configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// Invalid glob pattern provided.
    InvalidGlobPattern(String),
    /// Invalid regex pattern provided with the actual error reason.
    InvalidRegexPattern {
        /// The regex pattern that failed to compile.
        pattern: String,
        /// The reason why the pattern is invalid.
        reason: String,
    },
    /// IO error while reading configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::SourceMissing(path) => {
                write!(
                    f,
                    "Source folder does not exist or is not a directory: {}",
                    path.display()
                )
            }
            ConfigError::SourceEqualsDestination(_) => {
                write!(f, "Source and destination cannot be the same folder")
            }
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::InvalidGlobPattern(pattern) => {
                write!(f, "Invalid glob pattern '{}'", pattern)
            }
            ConfigError::InvalidRegexPattern { pattern, reason } => {
                write!(f, "Invalid regex pattern '{}': {}", pattern, reason)
            }
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Filter rules deserialized from a TOML configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    pub filters: FilterRules,
}

/// Root-level filter rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRules {
    /// Whether to organize hidden files (starting with "."). Defaults to false.
    #[serde(default = "default_enable_hidden_files")]
    pub enable_hidden_files: bool,

    /// Rules for excluding files.
    #[serde(default)]
    pub exclude: ExcludeRules,

    /// Rules for including files (whitelist, overrides exclude rules).
    #[serde(default)]
    pub include: IncludeRules,
}

fn default_enable_hidden_files() -> bool {
    false
}

/// Rules for excluding files from organization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact filenames to exclude (e.g., "Thumbs.db").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns to exclude (e.g., "*.tmp").
    #[serde(default)]
    pub patterns: Vec<String>,

    /// File extensions to exclude (e.g., "bak", "tmp").
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Regex patterns to exclude, matched against the filename.
    #[serde(default)]
    pub regex: Vec<String>,
}

/// Rules for including files, overriding exclude rules (whitelist).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncludeRules {
    /// Glob patterns that override exclude rules.
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl FilterConfig {
    /// Loads filter rules, with fallback to defaults.
    ///
    /// Lookup order:
    /// 1. `config_path`, when given
    /// 2. `.tidysweeprc.toml` in the current directory
    /// 3. `~/.config/tidysweep/config.toml`
    /// 4. default rules (hidden files excluded, nothing else)
    ///
    /// # Errors
    ///
    /// Fails when an explicitly provided configuration file cannot be read
    /// or parsed.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(".tidysweeprc.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("tidysweep")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Compiles the rules into matcher structures usable per file.
    ///
    /// # Errors
    ///
    /// Fails when any glob or regex pattern is invalid.
    pub fn compile(self) -> Result<CompiledFilters, ConfigError> {
        CompiledFilters::new(self.filters)
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            filters: FilterRules {
                enable_hidden_files: false,
                exclude: ExcludeRules::default(),
                include: IncludeRules::default(),
            },
        }
    }
}

/// Pre-compiled filter rules.
///
/// Glob and regex patterns are compiled once before the pass begins, so
/// per-file matching never reparses a pattern.
pub struct CompiledFilters {
    enable_hidden_files: bool,
    exclude_filenames: HashSet<String>,
    exclude_extensions: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
    include_patterns: Vec<Pattern>,
}

impl CompiledFilters {
    fn new(rules: FilterRules) -> Result<Self, ConfigError> {
        let exclude_patterns = compile_globs(&rules.exclude.patterns)?;
        let include_patterns = compile_globs(&rules.include.patterns)?;

        let exclude_regexes = rules
            .exclude
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            enable_hidden_files: rules.enable_hidden_files,
            exclude_filenames: rules.exclude.filenames.into_iter().collect(),
            exclude_extensions: rules
                .exclude
                .extensions
                .iter()
                .map(|ext| ext.to_lowercase())
                .collect(),
            exclude_patterns,
            exclude_regexes,
            include_patterns,
        })
    }

    /// Checks whether a file passes the filter rules.
    ///
    /// Checks run in this order, with early termination:
    /// 1. Include patterns (whitelist) - if matched, always include
    /// 2. Hidden file filter - if hidden and disabled, exclude
    /// 3. Exact filename match - if matched, exclude
    /// 4. File extension match - if matched, exclude
    /// 5. Glob pattern match - if matched, exclude
    /// 6. Regex pattern match - if matched, exclude
    /// 7. Default: include
    pub fn should_include(&self, file_path: &Path) -> bool {
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if self.matches_any(&self.include_patterns, file_path) {
            return true;
        }

        if !self.enable_hidden_files && file_name.starts_with('.') {
            return false;
        }

        if self.exclude_filenames.contains(file_name.as_ref()) {
            return false;
        }

        if let Some(ext) = file_path.extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            if self.exclude_extensions.contains(&ext_lower) {
                return false;
            }
        }

        if self.matches_any(&self.exclude_patterns, file_path) {
            return false;
        }

        if self
            .exclude_regexes
            .iter()
            .any(|regex| regex.is_match(&file_name))
        {
            return false;
        }

        true
    }

    fn matches_any(&self, patterns: &[Pattern], file_path: &Path) -> bool {
        patterns.iter().any(|pattern| pattern.matches_path(file_path))
    }
}

fn compile_globs(patterns: &[String]) -> Result<Vec<Pattern>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
        })
        .collect()
}
