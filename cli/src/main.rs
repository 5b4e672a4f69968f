//! pdf-outline CLI - heading outline extraction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdf_outline::outline::is_valid_title;
use pdf_outline::{
    find_pdfs, process_batch_with_progress, render, BatchOptions, HeadingLevel, JsonFormat,
    LopdfBackend, OutlineExtractor, OutlineOptions,
};

#[derive(Parser, Debug)]
#[command(name = "pdf-outline")]
#[command(version)]
#[command(about = "Extract heading outlines from PDF files to JSON", long_about = None)]
struct Cli {
    /// Directory containing the PDF files to process
    #[arg(value_name = "INPUT_DIR")]
    input: Option<PathBuf>,

    /// Directory receiving one JSON file per PDF
    #[arg(value_name = "OUTPUT_DIR")]
    output: Option<PathBuf>,

    /// Number of documents processed concurrently
    #[arg(short, long, env = "PDF_OUTLINE_JOBS", default_value_t = 4)]
    jobs: usize,

    /// Reject sentence-like headings
    #[arg(long, global = true)]
    strict: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract the outline of a single PDF
    Outline {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,
    },

    /// List top-level sections, the input for summarization
    Sections {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Shallowest level to include
        #[arg(long, default_value_t = 1)]
        min: u8,

        /// Deepest level to include
        #[arg(long, default_value_t = 2)]
        max: u8,
    },

    /// Show document and outline statistics
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let options = if cli.strict {
        OutlineOptions::new().strict()
    } else {
        OutlineOptions::new()
    };

    let result = match cli.command {
        Some(Commands::Outline {
            input,
            output,
            compact,
            pages,
        }) => cmd_outline(&input, output.as_deref(), compact, pages.as_deref(), options),
        Some(Commands::Sections { input, min, max }) => cmd_sections(&input, min, max, options),
        Some(Commands::Info { input }) => cmd_info(&input, options),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            let input = cli.input.unwrap_or_else(|| PathBuf::from("input"));
            let output = cli.output.unwrap_or_else(|| PathBuf::from("output"));
            cmd_batch(&input, &output, cli.jobs, &options)
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_batch(input: &Path, output: &Path, jobs: usize, options: &OutlineOptions) -> CliResult {
    fs::create_dir_all(input)?;
    fs::create_dir_all(output)?;

    let pdfs = find_pdfs(input)?;
    if pdfs.is_empty() {
        let shown = input.canonicalize().unwrap_or_else(|_| input.to_path_buf());
        println!(
            "{} {}. Place files there.",
            "No PDFs in".yellow(),
            shown.display()
        );
        return Ok(());
    }

    let pb = ProgressBar::new(pdfs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let batch = BatchOptions::new().with_jobs(jobs);
    let outcomes = process_batch_with_progress(&pdfs, output, &batch, options, |outcome| {
        let name = outcome
            .input
            .file_name()
            .unwrap_or_default()
            .to_string_lossy();
        match &outcome.result {
            Ok(_) => pb.set_message(name.into_owned()),
            Err(e) => pb.println(format!("{} {}: {}", "Failed".red(), name, e)),
        }
        pb.inc(1);
    })?;
    pb.finish_with_message("Done!");

    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    println!("\n{}", "Output files:".green().bold());
    for (i, outcome) in outcomes.iter().filter(|o| o.is_ok()).enumerate() {
        let branch = if i + 1 == outcomes.len() - failed {
            "└─"
        } else {
            "├─"
        };
        let name = outcome
            .output
            .file_name()
            .unwrap_or_default()
            .to_string_lossy();
        println!("  {} {}", branch.dimmed(), name);
    }

    if failed > 0 {
        return Err(format!("{} of {} documents failed", failed, outcomes.len()).into());
    }
    Ok(())
}

fn cmd_outline(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    pages: Option<&str>,
    mut options: OutlineOptions,
) -> CliResult {
    if let Some(p) = pages {
        let selection = pdf_outline::PageSelection::parse(p)
            .map_err(|e| format!("Invalid page range: {}", e))?;
        options = options.with_pages(selection);
    }

    let result = OutlineExtractor::new().with_options(options).extract(input)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    if let Some(path) = output {
        render::write_json(path, &result.document, format)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", result.to_json(format)?);
    }

    Ok(())
}

fn cmd_sections(input: &Path, min: u8, max: u8, options: OutlineOptions) -> CliResult {
    let min = HeadingLevel::try_from(min)?;
    let max = HeadingLevel::try_from(max)?;
    if min > max {
        return Err(format!("--min {} is deeper than --max {}", min, max).into());
    }

    let result = OutlineExtractor::new().with_options(options).extract(input)?;
    let sections = result.sections(min, max);

    if sections.is_empty() {
        println!("{}", "No sections found".yellow());
        return Ok(());
    }
    for section in sections {
        println!("{} {}", format!("p.{:<4}", section.page).dimmed(), section.text);
    }

    Ok(())
}

fn cmd_info(input: &Path, options: OutlineOptions) -> CliResult {
    let backend = LopdfBackend::open(input)?;
    let result = OutlineExtractor::new()
        .with_options(options)
        .extract_source(&backend)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), backend.version());
    println!("{}: {}", "Pages".bold(), result.page_count);

    let title = result.title();
    if title.is_empty() {
        println!("{}: {}", "Title".bold(), "(none)".dimmed());
    } else {
        let validity = if is_valid_title(title) {
            "valid".green()
        } else {
            "suspicious".yellow()
        };
        println!("{}: {} ({})", "Title".bold(), title, validity);
    }

    println!();
    println!("{}", "Outline Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for level in [
        HeadingLevel::H1,
        HeadingLevel::H2,
        HeadingLevel::H3,
        HeadingLevel::H4,
    ] {
        println!("{}: {}", level.to_string().bold(), result.document.count_at(level));
    }
    println!("{}: {}", "Entries".bold(), result.document.outline.len());

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdf-outline".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF heading outline extraction tool");
    println!();
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_batch_invocation() {
        let cli = Cli::try_parse_from(["pdf-outline"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.input.is_none());
        assert!(!cli.strict);
    }

    #[test]
    fn test_batch_with_dirs_and_jobs() {
        let cli = Cli::try_parse_from(["pdf-outline", "pdfs", "json", "--jobs", "8"]).unwrap();
        assert_eq!(cli.input, Some(PathBuf::from("pdfs")));
        assert_eq!(cli.output, Some(PathBuf::from("json")));
        assert_eq!(cli.jobs, 8);
    }

    #[test]
    fn test_outline_subcommand() {
        let cli = Cli::try_parse_from([
            "pdf-outline",
            "outline",
            "report.pdf",
            "-o",
            "report.json",
            "--compact",
            "--strict",
        ])
        .unwrap();
        assert!(cli.strict);
        match cli.command {
            Some(Commands::Outline {
                input,
                output,
                compact,
                pages,
            }) => {
                assert_eq!(input, PathBuf::from("report.pdf"));
                assert_eq!(output, Some(PathBuf::from("report.json")));
                assert!(compact);
                assert!(pages.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_sections_defaults() {
        let cli = Cli::try_parse_from(["pdf-outline", "sections", "report.pdf"]).unwrap();
        match cli.command {
            Some(Commands::Sections { min, max, .. }) => {
                assert_eq!((min, max), (1, 2));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_outline_requires_file() {
        assert!(Cli::try_parse_from(["pdf-outline", "outline"]).is_err());
    }

    #[test]
    fn test_batch_on_empty_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        let output = dir.path().join("out");

        cmd_batch(&input, &output, 2, &OutlineOptions::default()).unwrap();
        assert!(input.is_dir());
        assert!(output.is_dir());
    }

    #[test]
    fn test_batch_reports_failures() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        fs::create_dir(&input).unwrap();
        fs::write(input.join("broken.pdf"), b"garbage").unwrap();

        let err = cmd_batch(&input, &dir.path().join("out"), 1, &OutlineOptions::default())
            .unwrap_err();
        assert!(err.to_string().contains("1 of 1"));
    }

    #[test]
    fn test_sections_rejects_bad_levels() {
        let err = cmd_sections(Path::new("unused.pdf"), 3, 1, OutlineOptions::default());
        assert!(err.is_err());
        assert!(cmd_sections(Path::new("unused.pdf"), 0, 2, OutlineOptions::default()).is_err());
    }
}
