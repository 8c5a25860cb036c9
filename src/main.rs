use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use pairscan::prelude::*;

#[derive(Parser)]
#[command(name = "pairscan")]
#[command(about = "Scan dataset folders and pair input files with their ground truth", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Run in batch mode (no progress spinner)
    #[arg(long, global = true)]
    batch: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List files under a directory
    Scan {
        /// Directory to scan
        directory: PathBuf,

        /// Scan directories recursively
        #[arg(short, long)]
        recursive: bool,

        /// Print paths joined with the directory instead of relative to it
        #[arg(long)]
        full_path: bool,

        /// Only list paths ending with this suffix (repeatable)
        #[arg(short, long)]
        suffix: Vec<String>,

        /// Write the listing to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Pair files of an input folder with files of a ground-truth folder by name
    Pair {
        /// Input folder and ground-truth folder, in that order
        folders: Vec<PathBuf>,

        /// Input key and ground-truth key, comma separated [default: lq,gt]
        #[arg(short, long, value_delimiter = ',')]
        keys: Option<Vec<String>>,

        /// How ground-truth names are matched against the input listing
        #[arg(short, long, value_enum)]
        match_mode: Option<MatchMode>,

        /// Fail on size mismatch or unmatched ground-truth files
        #[arg(long)]
        strict: bool,

        /// Only pair paths ending with this suffix (repeatable)
        #[arg(short, long)]
        suffix: Vec<String>,

        /// JSON config file; command-line values take precedence
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Write the pairs to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logger_builder(cli.verbose, env_logger::Env::default()).init();

    match cli.command {
        Commands::Scan {
            directory,
            recursive,
            full_path,
            suffix,
            output,
        } => {
            let mut options = ScanOptions::new().recursive(recursive).full_path(full_path);
            if !suffix.is_empty() {
                options = options.suffix(SuffixFilter::new(suffix));
            }
            run_scan(&directory, &options, output.as_deref(), cli.batch)
        }
        Commands::Pair {
            folders,
            keys,
            match_mode,
            strict,
            suffix,
            config,
            format,
            output,
        } => {
            let mut job = match &config {
                Some(path) => PairConfig::load(path)?,
                None => PairConfig::default(),
            };
            if !folders.is_empty() {
                job.folders = folders;
            }
            if let Some(keys) = keys {
                job.keys = keys;
            } else if job.keys.is_empty() {
                job.keys = vec!["lq".to_string(), "gt".to_string()];
            }
            if let Some(mode) = match_mode {
                job.match_mode = mode;
            }
            if strict {
                job.policy = PairingPolicy::Strict;
            }

            let mut options = job.pair_options()?;
            if !suffix.is_empty() {
                options.suffix = Some(SuffixFilter::new(suffix));
            }
            run_pair(&job, &options, format, output.as_deref(), cli.batch)
        }
    }
}

fn run_scan(
    directory: &Path,
    options: &ScanOptions,
    output: Option<&Path>,
    batch: bool,
) -> Result<()> {
    let progress = spinner(batch, "{spinner:.green} [{elapsed_precise}] Scanning {pos} file(s)")?;

    let mut paths = Vec::new();
    for path in scandir(directory, options) {
        let path = path.with_context(|| format!("Failed to scan {}", directory.display()))?;
        progress.inc(1);
        paths.push(path);
    }
    progress.finish_and_clear();

    log::info!("Found {} file(s) in {}", paths.len(), directory.display());
    write_paths(open_output(output)?, &paths)
}

fn run_pair(
    job: &PairConfig,
    options: &PairOptions,
    format: OutputFormat,
    output: Option<&Path>,
    batch: bool,
) -> Result<()> {
    let progress = spinner(batch, "{spinner:.green} [{elapsed_precise}] Pairing folders")?;
    let result = paired_paths_from_folder(job.folders.as_slice(), job.keys.as_slice(), options);
    progress.finish_and_clear();
    let pairs = result.context("Failed to pair folders")?;

    log::info!("Paired {} file(s)", pairs.len());

    let out = open_output(output)?;
    match format {
        OutputFormat::Json => write_pairs_json(out, &pairs),
        OutputFormat::Text => {
            // Folder count was validated by the pairer
            let folders = [job.folders[0].as_path(), job.folders[1].as_path()];
            write_pairs_report(out, &folders, &pairs)
        }
    }
}

/// Logger honoring `RUST_LOG`, falling back to warn (or debug with `-v`)
fn logger_builder(verbose: bool, env: env_logger::Env) -> env_logger::Builder {
    let default_level = if verbose { "debug" } else { "warn" };
    let mut builder = env_logger::Builder::from_env(env.default_filter_or(default_level));
    builder.format_timestamp(None).format_target(false);
    builder
}

fn spinner(batch: bool, template: &str) -> Result<ProgressBar> {
    if batch {
        return Ok(ProgressBar::hidden());
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template(template)
            .context("Invalid progress template")?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}
