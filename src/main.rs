//! sifter - find duplicate files by content hash and delete them safely.
//!
//! Usage:
//!   sifter [PATH]               List a directory
//!   sifter scan [PATH]          Scan and show entries with hashes
//!   sifter duplicates [PATH]    Find duplicate files
//!   sifter empty [PATH]         List zero-byte files
//!   sifter check PATH...        Show the deletion safety status of paths
//!   sifter delete PATH          Delete a path after safety check and confirmation
//!   sifter --help               Show help

mod logging;
mod settings;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result, bail};
use serde::Serialize;

use sifter_analyze::{DuplicateFinder, DuplicateReport, find_empty_files};
use sifter_core::{Entry, ScanListing};
use sifter_ops::{
    DeletionGate, DeletionOutcome, DeletionRequest, SafetyClassifier, status_message,
};
use sifter_scan::DirectoryScanner;

use crate::settings::Settings;

#[derive(Parser)]
#[command(
    name = "sifter",
    version,
    about = "Find duplicate files by content hash and delete them safely",
    long_about = "sifter hashes files with FNV-1a, groups identical content and \
                  reports reclaimable space.\n\n\
                  Run `sifter [PATH]` for a directory listing, or use \
                  subcommands for duplicate detection and guarded deletion."
)]
struct Cli {
    /// Directory to list (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Settings file (defaults to <config dir>/sifter/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Scan a directory and show entries with their hashes
    Scan {
        /// Path to scan
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Descend into subdirectories
        #[arg(short, long)]
        recursive: bool,

        /// Include the parent directory entry
        #[arg(long)]
        parent: bool,

        /// Skip content hashing
        #[arg(long)]
        no_hash: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Find duplicate files
    Duplicates {
        /// Path to scan
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Descend into subdirectories
        #[arg(short, long)]
        recursive: bool,

        /// Maximum number of duplicate groups to show
        #[arg(short = 'n', long, default_value = "20")]
        top: usize,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// List zero-byte files
    Empty {
        /// Path to scan
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Descend into subdirectories
        #[arg(short, long)]
        recursive: bool,
    },

    /// Show whether paths may be deleted
    Check {
        /// Paths to classify
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Delete a file or directory after a safety check
    Delete {
        /// Path to delete
        path: PathBuf,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,

        /// Allow deleting non-empty directories
        #[arg(short, long)]
        recursive: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    logging::init(cli.verbose);
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Some(Command::Scan {
            path,
            recursive,
            parent,
            no_hash,
            format,
        }) => run_scan(&settings, &path, recursive, parent, !no_hash, format),
        Some(Command::Duplicates {
            path,
            recursive,
            top,
            format,
        }) => run_duplicates(&settings, &path, recursive, top, format),
        Some(Command::Empty { path, recursive }) => run_empty(&settings, &path, recursive),
        Some(Command::Check { paths }) => {
            run_check(&settings, &paths);
            Ok(())
        }
        Some(Command::Delete {
            path,
            yes,
            recursive,
        }) => run_delete(&settings, &path, yes, recursive),
        None => run_list(&settings, &cli.path),
    }
}

/// Scan with a stderr counter for long recursive runs.
fn scan(
    settings: &Settings,
    path: &Path,
    recursive: bool,
    include_parent: bool,
    hash: bool,
) -> ScanListing {
    let mut config = settings.scan_config(path, recursive);
    config.include_parent = include_parent;
    config.compute_hashes = hash;

    eprintln!("Scanning {}...", path.display());
    let listing = DirectoryScanner::new().scan_with_progress(&config, |count| {
        if recursive {
            eprint!("\r  {count} items");
        }
    });
    if recursive {
        eprintln!();
    }

    for warning in &listing.warnings {
        tracing::warn!(
            path = %warning.path.display(),
            kind = ?warning.kind,
            "{}",
            warning.message
        );
    }
    listing
}

/// Plain directory listing with the parent entry first.
fn run_list(settings: &Settings, path: &Path) -> Result<()> {
    let path = path.canonicalize().context("Invalid path")?;
    let listing = scan(settings, &path, false, true, true);

    println!();
    println!(" {}", path.display());
    println!("{}", "─".repeat(70));
    for entry in &listing.entries {
        print_entry(entry);
    }
    println!("{}", "─".repeat(70));
    println!(
        " {} files, {} directories, {}",
        listing.stats.total_files,
        listing.stats.total_dirs,
        format_size(listing.stats.total_size)
    );

    Ok(())
}

fn run_scan(
    settings: &Settings,
    path: &Path,
    recursive: bool,
    parent: bool,
    hash: bool,
    format: OutputFormat,
) -> Result<()> {
    let path = path.canonicalize().context("Invalid path")?;
    let listing = scan(settings, &path, recursive, parent, hash);

    match format {
        OutputFormat::Text => {
            println!();
            println!("{}", "─".repeat(70));
            println!(
                " {} - {}",
                path.display(),
                format_size(listing.stats.total_size)
            );
            println!(
                " {} files, {} directories, {} hashed",
                listing.stats.total_files, listing.stats.total_dirs, listing.stats.hashed_files
            );
            println!(" Scanned in {:.2}s", listing.scan_duration.as_secs_f64());
            println!("{}", "─".repeat(70));
            println!();

            for entry in &listing.entries {
                if recursive {
                    print_entry_path(entry);
                } else {
                    print_entry(entry);
                }
            }

            if listing.has_warnings() {
                println!();
                println!("{} warning(s) during scan", listing.warnings.len());
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct GroupView<'a> {
    hash: String,
    size: u64,
    wasted_space: u64,
    paths: Vec<&'a Path>,
}

#[derive(Serialize)]
struct ReportView<'a> {
    group_count: usize,
    files_with_duplicates: u64,
    total_wasted_space: u64,
    groups: Vec<GroupView<'a>>,
}

impl<'a> ReportView<'a> {
    fn new(report: &DuplicateReport, entries: &'a [Entry]) -> Self {
        Self {
            group_count: report.group_count,
            files_with_duplicates: report.files_with_duplicates,
            total_wasted_space: report.total_wasted_space,
            groups: report
                .groups
                .iter()
                .map(|g| GroupView {
                    hash: g.hash.to_hex(),
                    size: g.size,
                    wasted_space: g.wasted_space,
                    paths: g.paths(entries).collect(),
                })
                .collect(),
        }
    }
}

fn run_duplicates(
    settings: &Settings,
    path: &Path,
    recursive: bool,
    top_n: usize,
    format: OutputFormat,
) -> Result<()> {
    let path = path.canonicalize().context("Invalid path")?;
    let mut entries = scan(settings, &path, recursive, false, true).into_entries();

    eprintln!("Finding duplicates...");
    let mut report = DuplicateFinder::new().report(&mut entries);
    report.truncate(top_n);

    match format {
        OutputFormat::Text => {
            println!();
            println!("{}", "─".repeat(70));
            println!(" Duplicate File Report");
            println!("{}", "─".repeat(70));
            println!();

            if !report.has_duplicates() {
                println!(" No duplicate files found.");
            } else {
                println!(
                    " Found {} duplicate groups ({} files)",
                    report.group_count, report.files_with_duplicates
                );
                println!(
                    " Total wasted space: {}",
                    format_size(report.total_wasted_space)
                );
                println!();

                for (i, group) in report.groups.iter().enumerate() {
                    println!(
                        " Group {} [{}] ({} files, {} each, {} wasted)",
                        i + 1,
                        group.hash,
                        group.count(),
                        format_size(group.size),
                        format_size(group.wasted_space)
                    );
                    for member in group.paths(&entries) {
                        println!("   {}", member.display());
                    }
                    println!();
                }

                if report.groups.len() < report.group_count {
                    println!(
                        " ... and {} more groups",
                        report.group_count - report.groups.len()
                    );
                }
            }
        }
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&ReportView::new(&report, &entries))?
            );
        }
    }

    Ok(())
}

fn run_empty(settings: &Settings, path: &Path, recursive: bool) -> Result<()> {
    let path = path.canonicalize().context("Invalid path")?;
    let entries = scan(settings, &path, recursive, false, false).into_entries();
    let empty = find_empty_files(&entries);

    println!();
    for &index in &empty {
        println!(
            " Possibly defective (0 bytes): {}",
            entries[index].path().display()
        );
    }
    println!(" {} zero-byte file(s)", empty.len());

    Ok(())
}

fn run_check(settings: &Settings, paths: &[PathBuf]) {
    let classifier = SafetyClassifier::with_config(settings.safety.clone());
    for path in paths {
        let status = classifier.check_deletion(path);
        println!(
            "{:<28} {}",
            status.to_string(),
            status_message(status, path)
        );
    }
}

fn run_delete(settings: &Settings, path: &Path, yes: bool, recursive: bool) -> Result<()> {
    let classifier = SafetyClassifier::with_config(settings.safety.clone());

    let confirm = |request: &DeletionRequest| {
        if request.is_directory && request.item_count > 1 && !recursive {
            eprintln!(
                "{} is not empty ({} items); pass --recursive to delete it",
                request.path.display(),
                request.item_count - 1
            );
            return false;
        }
        if request.removable_warning {
            eprintln!("Warning: {}", status_message(request.status, &request.path));
        }
        if yes {
            return true;
        }
        prompt_yes_no(&request.prompt())
    };

    let mut gate = DeletionGate::new(classifier, confirm);
    let outcome = gate.delete_with_progress(path, |progress| {
        eprint!(
            "\r  {}/{} ({}%)",
            progress.deleted + progress.failed,
            progress.total,
            progress.percentage()
        );
    });

    match outcome {
        DeletionOutcome::Deleted(ref summary) => {
            if summary.deleted > 1 {
                eprintln!();
            }
            println!(
                "{}, freed {}",
                outcome.message(),
                format_size(summary.bytes_freed)
            );
            Ok(())
        }
        DeletionOutcome::Cancelled { .. } => {
            println!("{}", outcome.message());
            Ok(())
        }
        DeletionOutcome::Rejected { .. } | DeletionOutcome::Failed(_) => bail!(outcome.message()),
    }
}

/// Ask on stderr, read the answer from stdin. Anything but y/yes declines.
fn prompt_yes_no(question: &str) -> bool {
    eprint!("{question} [y/N] ");
    let _ = io::stderr().flush();

    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// One listing row: name, size, hash and markers.
fn print_entry(entry: &Entry) {
    println!(
        " {:<40} {:>10}  {:<16} {}",
        truncate(&entry.display_name(), 40),
        size_column(entry),
        entry.hash().map(|h| h.to_hex()).unwrap_or_default(),
        markers(entry)
    );
}

/// Recursive rows use the full path instead of the bare name.
fn print_entry_path(entry: &Entry) {
    let suffix = if entry.is_dir() { "/" } else { "" };
    println!(
        " {:<60} {:>10}  {:<16} {}",
        format!("{}{suffix}", entry.path().display()),
        size_column(entry),
        entry.hash().map(|h| h.to_hex()).unwrap_or_default(),
        markers(entry)
    );
}

fn size_column(entry: &Entry) -> String {
    if entry.is_dir() {
        String::new()
    } else {
        format_size(entry.size())
    }
}

fn markers(entry: &Entry) -> &'static str {
    if entry.is_duplicate() {
        "duplicate"
    } else if entry.is_empty_file() {
        "empty"
    } else {
        ""
    }
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// Truncate a string to a maximum number of characters.
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{head}…")
    }
}
