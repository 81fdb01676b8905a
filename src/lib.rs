//! tidysweep - a file-organizing engine with duplicate detection
//!
//! This library scans a source folder, classifies each file into a category
//! (by extension) and a bucket (by modification month or source heuristic),
//! detects repeated content across runs with a persistent hash index, and
//! relocates files accordingly. Passes are safe to repeat and can run
//! continuously in watch mode.

pub mod bucket;
pub mod config;
pub mod file_category;
pub mod hasher;
pub mod index;
pub mod organizer;
pub mod output;
pub mod placer;
pub mod scanner;

pub use config::{CompiledFilters, Config, ConfigError, FilterConfig, SortMode};
pub use file_category::{Category, CategoryMapper};
pub use index::HashIndex;
pub use organizer::{FileOutcome, OrganizeError, PassReport, run_pass, watch};
