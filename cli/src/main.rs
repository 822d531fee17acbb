//! contrex CLI - contract PDF structure extraction tool

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;

use contrex::{parse_file, parse_files, JsonFormat, SectionItem};

#[derive(Parser)]
#[command(name = "contrex")]
#[command(version)]
#[command(about = "Extract contract PDF structure to JSON", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output JSON file
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a contract PDF to JSON
    Json {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Extract plain text from a contract PDF
    Text {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show contract metadata and structure summary
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Convert many contract PDFs to JSON in parallel
    Batch {
        /// Input PDF files
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory (defaults to the current directory)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Json {
            input,
            output,
            compact,
        }) => cmd_json(&input, output.as_deref(), compact),
        Some(Commands::Text { input, output }) => cmd_text(&input, output.as_deref()),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Batch { inputs, output }) => cmd_batch(&inputs, output.as_deref()),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert to JSON if input is provided
            if let Some(input) = cli.input {
                cmd_json(&input, cli.output.as_deref(), false)
            } else {
                println!("{}", "Usage: contrex <FILE> [OUTPUT]".yellow());
                println!("       contrex --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let document = parse_file(input)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = contrex::render::to_json(&document, format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_text(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let document = parse_file(input)?;
    let text = document.plain_text();

    if let Some(path) = output {
        fs::write(path, &text)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", text);
    }

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let document = parse_file(input)?;

    println!("{}", "Contract Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!(
        "{}: {}",
        "Title".bold(),
        document.title.as_deref().unwrap_or("(none)")
    );
    println!(
        "{}: {}",
        "Type".bold(),
        document.contract_type.as_deref().unwrap_or("(none)")
    );
    println!(
        "{}: {}",
        "Effective date".bold(),
        document
            .effective_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "(none)".to_string())
    );
    println!("{}: {}", "Sections".bold(), document.section_count());
    println!("{}: {}", "Clauses".bold(), document.clause_count());
    println!("{}: {}", "Tables".bold(), document.table_count());

    if !document.sections.is_empty() {
        println!();
        println!("{}", "Sections".cyan().bold());
        println!("{}", "─".repeat(40).dimmed());
        for section in &document.sections {
            let label = match &section.number {
                Some(number) => format!("{} {}", number, section.heading),
                None if section.heading.is_empty() => "(untitled)".to_string(),
                None => section.heading.clone(),
            };
            let clauses = section
                .items
                .iter()
                .filter(|item| matches!(item, SectionItem::Clause(_)))
                .count();
            let tables = section.items.len() - clauses;
            print!("  {}", label.trim());
            if tables > 0 {
                println!(" {}", format!("({} clauses, {} tables)", clauses, tables).dimmed());
            } else {
                println!(" {}", format!("({} clauses)", clauses).dimmed());
            }
        }
    }

    Ok(())
}

fn cmd_batch(inputs: &[PathBuf], output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = output.map(|p| p.to_path_buf()).unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&output_dir)?;

    log::debug!("batch converting {} file(s)", inputs.len());
    let results = parse_files(inputs);
    let mut failures = 0usize;
    let mut used = HashSet::new();

    for (path, result) in results {
        match result {
            Ok(document) => {
                let stem = path.file_stem().unwrap_or_default().to_string_lossy();
                let out_path = batch_output_path(&output_dir, &stem, &mut used);
                let json = contrex::render::to_json(&document, JsonFormat::Pretty)?;
                fs::write(&out_path, &json)?;
                println!("{} {} -> {}", "ok".green(), path.display(), out_path.display());
            }
            Err(e) => {
                failures += 1;
                eprintln!("{} {}: {}", "failed".red(), path.display(), e);
            }
        }
    }

    if failures > 0 {
        return Err(format!("{} file(s) failed", failures).into());
    }
    Ok(())
}

/// Pick the output path for a batch input. Inputs from different directories
/// can share a file stem, so a taken name gets a numeric suffix instead of
/// overwriting an earlier result.
fn batch_output_path(dir: &Path, stem: &str, used: &mut HashSet<PathBuf>) -> PathBuf {
    let mut candidate = dir.join(format!("{}.json", stem));
    let mut n = 1;
    while !used.insert(candidate.clone()) {
        candidate = dir.join(format!("{}-{}.json", stem, n));
        n += 1;
    }
    candidate
}

fn cmd_version() {
    println!("{} {}", "contrex".cyan().bold(), env!("CARGO_PKG_VERSION"));
}
