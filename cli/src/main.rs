//! pdfsift CLI - PDF outlines and persona-driven section ranking

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfsift::{
    discover_documents, report, JsonFormat, OutlineOptions, OutlineReport, RankOptions,
    RankingConfig, RankingReport, Sift,
};

/// Output directory for outline batches when `-o` is not given.
const DEFAULT_OUTPUT_DIR: &str = "output";

#[derive(Parser)]
#[command(name = "pdfsift")]
#[command(version)]
#[command(
    about = "Extract PDF heading outlines and rank sections for a persona",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract title and H1-H3 outline as JSON
    Outline {
        /// Input PDF file or directory of PDFs
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file (stdout if not specified); output directory for a
        /// directory input
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Minimum font size for bold structural headings
        #[arg(long, default_value_t = pdfsift::options::DEFAULT_MIN_FONT_SIZE)]
        min_font_size: f32,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Skip unreadable PDFs in a directory instead of failing
        #[arg(long)]
        lenient: bool,
    },

    /// Rank text sections of a document batch against a persona and job
    Rank {
        /// Input PDF files or directories
        #[arg(value_name = "INPUT")]
        inputs: Vec<PathBuf>,

        /// Persona description
        #[arg(long, env = "PDFSIFT_PERSONA")]
        persona: Option<String>,

        /// Job to be done
        #[arg(long, env = "PDFSIFT_JOB")]
        job: Option<String>,

        /// JSON job file (persona, job_to_be_done, top_k, documents)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Number of sections to keep
        #[arg(short = 'k', long, env = "PDFSIFT_TOP_K")]
        top_k: Option<usize>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Skip unreadable PDFs instead of failing
        #[arg(long)]
        lenient: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Outline {
            input,
            output,
            min_font_size,
            compact,
            lenient,
        } => cmd_outline(&input, output.as_deref(), min_font_size, compact, lenient),
        Commands::Rank {
            inputs,
            persona,
            job,
            config,
            top_k,
            output,
            compact,
            lenient,
        } => cmd_rank(RankArgs {
            inputs,
            persona,
            job,
            config,
            top_k,
            output,
            compact,
            lenient,
        }),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

fn emit(json: &str, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }
    Ok(())
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}

fn cmd_outline(
    input: &Path,
    output: Option<&Path>,
    min_font_size: f32,
    compact: bool,
    lenient: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = OutlineOptions::new().with_min_font_size(min_font_size);
    let sift = Sift::new().with_outline_options(options);
    let format = json_format(compact);

    if !input.is_dir() {
        let outline = sift.outline(input)?;
        let json = report::to_json(&OutlineReport::from(outline), format)?;
        return emit(&json, output);
    }

    let documents = discover_documents(input)?;
    let output_dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
    fs::create_dir_all(&output_dir)?;

    let pb = progress_bar(documents.len());
    let mut written = Vec::new();
    for doc in &documents {
        let name = pdfsift::reader::document_id(doc);
        pb.set_message(name.clone());

        match sift.outline(doc) {
            Ok(outline) => {
                let target = output_dir.join(outline_file_name(doc));
                pdfsift::write_json(&OutlineReport::from(outline), &target, format)?;
                written.push(target);
            }
            Err(e) if lenient => {
                pb.println(format!("{} {}: {}", "Skipped".yellow(), name, e));
            }
            Err(e) => {
                pb.abandon();
                return Err(format!("{}: {}", name, e).into());
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("Done!");

    println!("\n{} {}", "Output files:".green().bold(), output_dir.display());
    for (i, path) in written.iter().enumerate() {
        let branch = if i + 1 == written.len() { "└─" } else { "├─" };
        let file = path.file_name().unwrap_or_default().to_string_lossy();
        println!("  {} {}", branch.dimmed(), file);
    }

    Ok(())
}

/// `<stem>.json` for an input document.
fn outline_file_name(doc: &Path) -> String {
    let stem = doc.file_stem().unwrap_or_default().to_string_lossy();
    format!("{}.json", stem)
}

struct RankArgs {
    inputs: Vec<PathBuf>,
    persona: Option<String>,
    job: Option<String>,
    config: Option<PathBuf>,
    top_k: Option<usize>,
    output: Option<PathBuf>,
    compact: bool,
    lenient: bool,
}

/// Merge flags (and their env fallbacks) over the config file.
fn resolve_config(args: &RankArgs) -> Result<RankingConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => RankingConfig::from_file(path)?,
        None => RankingConfig::default(),
    };

    if let Some(persona) = &args.persona {
        config.persona = persona.clone();
    }
    if let Some(job) = &args.job {
        config.job_to_be_done = job.clone();
    }
    if args.top_k.is_some() {
        config.top_k = args.top_k;
    }
    if !args.inputs.is_empty() {
        config.documents = args.inputs.clone();
    }
    Ok(config)
}

/// Expand directories into their PDFs, keeping the given order.
fn expand_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut documents = Vec::new();
    for input in inputs {
        if input.is_dir() {
            documents.extend(discover_documents(input)?);
        } else {
            documents.push(input.clone());
        }
    }
    Ok(documents)
}

/// Rank the configured batch. An empty batch yields an empty report.
fn rank_report(
    config: &RankingConfig,
    lenient: bool,
) -> Result<RankingReport, Box<dyn std::error::Error>> {
    let documents = expand_inputs(&config.documents)?;
    if documents.is_empty() {
        log::warn!("No PDF documents to rank");
    }

    let mut options = config.apply(RankOptions::default());
    if lenient {
        options = options.lenient();
    }
    log::debug!("Ranking {} documents, top {}", documents.len(), options.top_k);

    let pb = ProgressBar::new_spinner();
    pb.set_message(format!("Ranking {} documents...", documents.len()));
    let ranking = Sift::new()
        .with_rank_options(options)
        .rank(&documents, &config.query());
    pb.finish_and_clear();

    Ok(ranking?)
}

fn cmd_rank(args: RankArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = resolve_config(&args)?;
    let ranking = rank_report(&config, args.lenient)?;

    let json = report::to_json(&ranking, json_format(args.compact))?;
    emit(&json, args.output.as_deref())
}

fn cmd_version() {
    println!("{} {}", "pdfsift".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF heading outlines and persona-driven section ranking");
    println!();
    println!("License: MIT");
}
