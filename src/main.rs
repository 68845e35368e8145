//! Main entry point for the unfpk CLI application.
//!
//! This binary lists and extracts members of FPK texture packs, either given
//! explicitly or located inside a Civilization V installation.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;

use unfpk::filter::resolve_clashes;
use unfpk::{Cli, FpkArchive, LocalFileReader, find_packs};

/// Application entry point.
///
/// Collects the archives to work on, then lists or extracts them. Extraction
/// to disk runs one blocking task per archive, each with its own file handle;
/// listing and pipe mode run in order so their output is not interleaved.
#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Arc::new(Cli::parse());
    let archives = collect_archives(&cli)?;
    let total = archives.len();

    let mut failures = 0usize;
    if cli.list || cli.verbose || cli.pipe {
        for path in &archives {
            if let Err(e) = process_archive(path, &cli) {
                report_failure(path, &e);
                failures += 1;
            }
        }
    } else {
        failures += extract_concurrently(archives, &cli).await?;
    }

    if failures > 0 {
        bail!("{} of {} archives could not be processed", failures, total);
    }
    Ok(())
}

/// Extract every archive to disk, one blocking task per archive.
///
/// Selections are made first, and each destination name is handed to a
/// single archive (the last one that has it) before any file is written, so
/// no two tasks touch the same output path. Returns the number of archives
/// that failed.
async fn extract_concurrently(archives: Vec<PathBuf>, cli: &Arc<Cli>) -> Result<usize> {
    let mut failures = 0usize;

    let mut tasks = JoinSet::new();
    for (i, path) in archives.into_iter().enumerate() {
        let cli = Arc::clone(cli);
        tasks.spawn_blocking(move || {
            let result = select_members(&path, &cli);
            (i, path, result)
        });
    }

    let mut planned = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let (i, path, result) = joined.context("selection task panicked")?;
        match result {
            Ok(selected) => planned.push((i, path, selected)),
            Err(e) => {
                report_failure(&path, &e);
                failures += 1;
            }
        }
    }
    planned.sort_by_key(|(i, _, _)| *i);

    let selections: Vec<Vec<String>> = planned.iter().map(|(_, _, s)| s.clone()).collect();
    let owned = resolve_clashes(&selections);

    let mut tasks = JoinSet::new();
    for ((_, path, selected), names) in planned.into_iter().zip(owned) {
        let shadowed = selected.len() - names.len();
        if shadowed > 0 {
            log::info!(
                "{}: {} members left to later archives with the same names",
                path.display(),
                shadowed
            );
        }

        let cli = Arc::clone(cli);
        tasks.spawn_blocking(move || {
            let result = extract_selected(&path, &names, &cli);
            (path, result)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        let (path, result) = joined.context("extraction task panicked")?;
        if let Err(e) = result {
            report_failure(&path, &e);
            failures += 1;
        }
    }
    Ok(failures)
}

/// Build the list of archives from positional arguments and pack discovery.
fn collect_archives(cli: &Cli) -> Result<Vec<PathBuf>> {
    let mut archives = cli.archives.clone();

    if let Some(resources_dir) = cli.resources_dir() {
        if !resources_dir.exists() {
            bail!(
                "the '{}' directory with the game files doesn't exist",
                resources_dir.display()
            );
        }

        let packs = find_packs(&resources_dir, &cli.suffix)
            .with_context(|| format!("failed to scan {}", resources_dir.display()))?;
        if packs.is_empty() {
            bail!(
                "no '*{}' packs found in the '{}' directory",
                cli.suffix,
                resources_dir.display()
            );
        }
        archives.extend(packs);
    } else if cli.steam {
        bail!("cannot locate the Steam installation: $HOME is not set");
    }

    if archives.is_empty() {
        bail!("no FPK archives given (pass archive paths, --game-dir or --steam)");
    }
    Ok(archives)
}

/// Process one archive based on CLI options.
///
/// - List mode (`-l` or `-v`): display archive contents
/// - Extract mode: extract members selected by the filters
fn process_archive(path: &Path, cli: &Cli) -> Result<()> {
    if cli.list || cli.verbose {
        let archive = FpkArchive::open_path(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        list_members(&archive, path, cli.verbose);
        return Ok(());
    }

    let selected = select_members(path, cli)?;
    extract_selected(path, &selected, cli)
}

/// Names of the members picked by the `-i`, `-x` and `--wallpapers` filters,
/// in directory order.
fn select_members(path: &Path, cli: &Cli) -> Result<Vec<String>> {
    let archive = FpkArchive::open_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let filter = cli.member_filter();
    let selected: Vec<String> = archive
        .members()
        .filter(|e| filter.matches(&e.name))
        .map(|e| e.name.clone())
        .collect();

    if selected.is_empty() {
        log::warn!("no matching members in {}", path.display());
    }
    Ok(selected)
}

/// Extract the named members of one archive.
///
/// The archive, and with it the file handle, is released on every return.
fn extract_selected(path: &Path, names: &[String], cli: &Cli) -> Result<()> {
    let mut archive = FpkArchive::open_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let show_filename = cli.pipe && names.len() > 1;
    let mut written = 0u64;
    for name in names {
        written += extract_member(&mut archive, name, cli, show_filename)
            .with_context(|| format!("failed to extract {} from {}", name, path.display()))?;
    }

    archive.close();

    if !cli.is_quiet() {
        println!(
            "{}: {} files, {}",
            path.display(),
            names.len(),
            format_size(written)
        );
    }
    Ok(())
}

/// List the members of an archive.
///
/// - Simple format (`-l`): just member names, one per line
/// - Verbose format (`-v`): index, size and offset, followed by totals
fn list_members(archive: &FpkArchive<LocalFileReader>, path: &Path, verbose: bool) {
    if !verbose {
        for name in archive.member_names() {
            println!("{}", name);
        }
        return;
    }

    println!("Archive:  {}", path.display());
    println!("{:>5}  {:>10}  {:>10}  Name", "Index", "Length", "Offset");
    println!("{}", "-".repeat(60));

    let mut total = 0u64;
    for entry in archive.members() {
        println!(
            "{:>5}  {:>10}  {:>10}  {}",
            entry.index, entry.size, entry.offset, entry.name
        );
        total += entry.size;
    }

    println!("{}", "-".repeat(60));
    println!("{:>5}  {:>10}  {:>10}  {} files", "", total, "", archive.len());
}

/// Extract a single member. Returns the number of bytes written.
///
/// - Pipe mode (`-p`): write to stdout instead of a file
/// - `-n`: keep existing files; otherwise they are overwritten
fn extract_member(
    archive: &mut FpkArchive<LocalFileReader>,
    name: &str,
    cli: &Cli,
    show_filename: bool,
) -> Result<u64> {
    if cli.pipe {
        let stdout = std::io::stdout();
        let mut stdout = stdout.lock();
        if show_filename {
            writeln!(stdout, "--- {} ---", name)?;
        }
        return Ok(archive.extract_to_writer(name, &mut stdout)?);
    }

    let dest = cli.output_dir();
    if cli.never_overwrite && dest.join(name).exists() {
        if !cli.is_very_quiet() {
            eprintln!("Skipping: {} (file exists)", name);
        }
        return Ok(0);
    }

    if !cli.is_quiet() {
        println!("  extracting: {}", name);
    }

    let size = archive.member(name).map_or(0, |e| e.size);
    archive.extract(name, &dest)?;
    Ok(size)
}

fn report_failure(path: &Path, error: &anyhow::Error) {
    log::debug!("{}: {:?}", path.display(), error);
    eprintln!("unfpk: {:#}", error);
}

/// Format a byte size into a human-readable string.
///
/// ```ignore
/// assert_eq!(format_size(500), "500 bytes");
/// assert_eq!(format_size(1536), "1.50 KB");
/// ```
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
