use clap::Parser;
use std::path::PathBuf;
use std::process;
use tidysweep::config::{Config, FilterConfig, SortMode};
use tidysweep::organizer::{run_pass, watch};
use tidysweep::output::OutputFormatter;

/// Organize files into category and date buckets with duplicate detection.
#[derive(Parser, Debug)]
#[command(name = "tidysweep", version, about)]
struct Cli {
    /// Folder to scan. Defaults to ~/Downloads.
    #[arg(long)]
    source: Option<PathBuf>,

    /// Folder for organized files. Defaults to <source>/Organized.
    #[arg(long)]
    destination: Option<PathBuf>,

    /// Run continuously, organizing on an interval.
    #[arg(long)]
    watch: bool,

    /// Watch interval in seconds.
    #[arg(long, default_value_t = 15)]
    interval: u64,

    /// Preview actions without moving files.
    #[arg(long)]
    dry_run: bool,

    /// Only process top-level files.
    #[arg(long)]
    non_recursive: bool,

    /// Do not remove empty folders from the source.
    #[arg(long)]
    keep_empty: bool,

    /// Sort into month buckets ("date") or source/workflow buckets ("source").
    #[arg(long, value_enum, default_value_t = SortMode::Date)]
    sort_mode: SortMode,

    /// Path to a filter configuration file (TOML).
    #[arg(long)]
    config: Option<PathBuf>,
}

fn default_source() -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home).join("Downloads"),
        Err(_) => PathBuf::from("."),
    }
}

fn main() {
    let cli = Cli::parse();

    let source = cli.source.unwrap_or_else(default_source);
    let destination = cli
        .destination
        .unwrap_or_else(|| source.join("Organized"));

    let config = Config {
        source,
        destination,
        dry_run: cli.dry_run,
        recursive: !cli.non_recursive,
        keep_empty: cli.keep_empty,
        sort_mode: cli.sort_mode,
    };

    if let Err(e) = config.validate() {
        OutputFormatter::error(&e.to_string());
        process::exit(1);
    }

    let filters = match FilterConfig::load(cli.config.as_deref()).and_then(FilterConfig::compile) {
        Ok(filters) => filters,
        Err(e) => {
            OutputFormatter::error(&e.to_string());
            process::exit(1);
        }
    };

    if cli.watch {
        watch(&config, &filters, cli.interval.max(1));
    } else {
        match run_pass(&config, &filters) {
            Ok(report) => OutputFormatter::pass_summary(&report),
            Err(e) => {
                OutputFormatter::error(&e.to_string());
                process::exit(1);
            }
        }
    }
}
