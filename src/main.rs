/// Card Matcher - find and validate bank card numbers
///
/// The main entry point for the card matcher application. It parses
/// command-line arguments, validates single numbers, scans text and files,
/// and falls back to an interactive menu when no input is given.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn, LevelFilter};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process;

use card_matcher::app::{self, FileScan};
use card_matcher::config::{load_config, Config};
use card_matcher::utils::output_formatter::{self, FormatOptions};
use card_matcher::{CardMatch, CardMatcher};

/// Command line argument structure
#[derive(Parser, Debug)]
#[command(
    name = "card_matcher",
    version,
    about = "Find and validate bank card numbers",
    long_about = "Validates card numbers with the Luhn algorithm and finds them in text and files.
With no input option, an interactive menu is shown."
)]
struct Args {
    /// Validate a single card number
    #[arg(short = 'i', long = "input")]
    input: Option<String>,

    /// Search for card numbers in file(s)
    #[arg(short = 'f', long = "file", action = ArgAction::Append)]
    files: Vec<PathBuf>,

    /// Search for card numbers in the given text
    #[arg(short = 't', long = "text")]
    text: Option<String>,

    /// Search every file in a directory (recursively)
    #[arg(long = "dir")]
    dir: Option<PathBuf>,

    /// Maximum file size to scan in MB for directory scans
    #[arg(long = "max-size")]
    max_size: Option<usize>,

    /// Maximum number of files to scan in a directory
    #[arg(long = "max-files")]
    max_files: Option<usize>,

    /// Output in markdown format (wrapped in triple backticks)
    #[arg(long = "md", action = ArgAction::SetTrue)]
    md: bool,

    /// Show only the first and last four digits of each number
    #[arg(long = "mask", action = ArgAction::SetTrue)]
    mask: bool,

    /// Export file scan results to JSON
    #[arg(long = "json")]
    json: Option<PathBuf>,

    /// Export file scan results to an HTML report
    #[arg(long = "html")]
    html: Option<PathBuf>,

    /// Export file scan results to CSV
    #[arg(long = "csv")]
    csv: Option<PathBuf>,

    /// Suppress terminal output
    #[arg(long = "quiet", action = ArgAction::SetTrue)]
    quiet: bool,

    /// Path to configuration file (JSON)
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Number of parallel workers for file scans (0=auto)
    #[arg(long = "parallel", default_value = "0")]
    parallel: usize,

    /// Set logging level (default: from config, else INFO)
    #[arg(long = "log-level")]
    log_level: Option<LevelFilter>,

    /// Log file path (default: from config, else card_matcher.log)
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

/// Main entry point function
fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;
    apply_overrides(&mut config, &args);

    setup_logging(&config, args.log_level);

    let options = FormatOptions {
        markdown: args.md,
        mask: config.mask_numbers,
    };

    if let Some(number) = &args.input {
        let result = CardMatcher::new(&config).validate_single(number);
        info!("Validated input: {}", result.reason.code());
        emit(&args, &output_formatter::format_validation(number, &result, &options));
        return Ok(());
    }

    if let Some(text) = &args.text {
        let matches = CardMatcher::new(&config).scan(text);
        emit(&args, &output_formatter::format_matches(&matches, &options));
        return Ok(());
    }

    if !args.files.is_empty() || args.dir.is_some() {
        let files = get_files_to_scan(&args, &config);
        if files.is_empty() {
            eprintln!("{}", "Error: No files specified or found for scanning".red());
            eprintln!("Run with --help for usage information");
            process::exit(1);
        }
        return run_file_scan(&files, &config, &args, &options);
    }

    run_interactive(&config, &options)
}

/// Fold command-line flags into the loaded configuration
fn apply_overrides(config: &mut Config, args: &Args) {
    if args.mask {
        config.mask_numbers = true;
    }
    if let Some(max_size) = args.max_size {
        config.max_file_size_mb = max_size;
    }
    if let Some(max_files) = args.max_files {
        config.max_files = max_files;
    }
    if let Some(log_file) = &args.log_file {
        config.log_file = log_file.to_string_lossy().to_string();
    }
}

/// Set up logging to the configured log file
fn setup_logging(config: &Config, level: Option<LevelFilter>) {
    let mut builder = env_logger::Builder::new();

    let level = level.unwrap_or_else(|| config.log_level.parse().unwrap_or(LevelFilter::Info));
    builder.filter_level(level);

    builder.format(|buf, record| {
        use chrono::Local;
        use std::io::Write;
        writeln!(
            buf,
            "{} - {} - {} - {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.target(),
            record.args()
        )
    });

    if let Ok(file) = File::create(&config.log_file) {
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
}

fn emit(args: &Args, output: &str) {
    if !args.quiet {
        print!("{}", output);
    }
}

/// Collect the files named on the command line plus those under `--dir`
fn get_files_to_scan(args: &Args, config: &Config) -> Vec<PathBuf> {
    // Explicitly named files are always passed through so that a missing one
    // is reported by the scan itself.
    let mut files = args.files.clone();

    if let Some(dir_path) = &args.dir {
        if !dir_path.is_dir() {
            error!("Directory not found: {}", dir_path.display());
            eprintln!("{} {}", "Directory not found:".red(), dir_path.display());
            return files;
        }

        let max_size_bytes = config.max_file_size_bytes();

        for entry in walkdir::WalkDir::new(dir_path)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            if files.len() >= config.max_files {
                warn!("Reached maximum file limit ({})", config.max_files);
                break;
            }

            match entry.metadata() {
                Ok(metadata) if metadata.len() > max_size_bytes => warn!(
                    "Skipping {}: exceeds maximum file size ({:.2} MB)",
                    entry.path().display(),
                    metadata.len() as f64 / 1024.0 / 1024.0
                ),
                Ok(_) => files.push(entry.into_path()),
                Err(e) => error!("Error reading metadata for {}: {}", entry.path().display(), e),
            }
        }
    }

    files
}

/// Scan files, print results, and write any requested exports
fn run_file_scan(files: &[PathBuf], config: &Config, args: &Args, options: &FormatOptions) -> Result<()> {
    let progress_bar = if !args.quiet && files.len() > 1 {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({eta})")
                .context("Invalid progress bar template")?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let scans = app::scan_files(files, config, args.parallel, progress_bar.as_ref())?;

    if let Some(pb) = progress_bar {
        pb.finish_and_clear();
    }

    let mut all_results: Vec<(String, Vec<CardMatch>)> = Vec::new();

    for FileScan { path, result } in scans {
        let label = path.to_string_lossy().to_string();
        match result {
            Ok(matches) => {
                emit(args, &format!("{} {}\n", "Searching for card numbers in file:".cyan(), label));
                emit(args, &output_formatter::format_matches(&matches, options));
                all_results.push((label, matches));
            }
            Err(e) => {
                error!("{}", e);
                eprintln!("{}", e.to_string().red());
            }
        }
    }

    if all_results.len() > 1 {
        emit(args, &format!("\n{}", output_formatter::create_summary(&all_results)));
    }

    export_all_results(&all_results, args, config.mask_numbers)
}

/// Export scan results in the formats requested on the command line
fn export_all_results(all_results: &[(String, Vec<CardMatch>)], args: &Args, mask: bool) -> Result<()> {
    if let Some(json_path) = &args.json {
        output_formatter::export_results_json(all_results, json_path, mask)?;
        info!("Wrote JSON report to {}", json_path.display());
    }

    if let Some(html_path) = &args.html {
        output_formatter::create_html_report(all_results, html_path, mask)?;
        info!("Wrote HTML report to {}", html_path.display());
    }

    if let Some(csv_path) = &args.csv {
        output_formatter::create_csv_report(all_results, csv_path, mask)?;
        info!("Wrote CSV report to {}", csv_path.display());
    }

    Ok(())
}

/// Interactive menu shown when no input option is given
fn run_interactive(config: &Config, options: &FormatOptions) -> Result<()> {
    let theme = ColorfulTheme::default();
    let matcher = CardMatcher::new(config);

    println!("{}\n", "Bank card number checker".bold());

    let choice = Select::with_theme(&theme)
        .with_prompt("Choose an option")
        .items(&["Validate a card number", "Search in text", "Search in a file"])
        .default(0)
        .interact()
        .context("Failed to read menu choice")?;

    match choice {
        0 => {
            let number: String = Input::with_theme(&theme)
                .with_prompt("Enter a card number")
                .interact_text()
                .context("Failed to read card number")?;
            let number = number.trim();
            let result = matcher.validate_single(number);
            print!("{}", output_formatter::format_validation(number, &result, options));
        }
        1 => {
            let text: String = Input::with_theme(&theme)
                .with_prompt("Enter text to search")
                .interact_text()
                .context("Failed to read text")?;
            let matches = matcher.scan(text.trim());
            print!("{}", output_formatter::format_matches(&matches, options));
        }
        2 => {
            let path: String = Input::with_theme(&theme)
                .with_prompt("Enter a file path")
                .interact_text()
                .context("Failed to read file path")?;
            let path = Path::new(path.trim());
            match matcher.try_scan_file(path) {
                Ok(matches) => print!("{}", output_formatter::format_matches(&matches, options)),
                Err(e) => {
                    error!("{}", e);
                    eprintln!("{}", e.to_string().red());
                }
            }
        }
        _ => println!("{}", "Invalid choice".red()),
    }

    Ok(())
}
