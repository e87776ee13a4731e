//! pdfoutline CLI - heading outline extraction tool

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use pdfoutline::{
    fragments_from_json, ExtractionResult, JsonFormat, OutlineExtractor, OutlineOptions,
    OutlineSchema, SchemaValidator, ValidationReport,
};

#[derive(Parser)]
#[command(name = "pdfoutline")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract title and H1-H3 outlines from parsed PDF text fragments", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the outline of one fragments file
    Extract {
        /// Fragments JSON file (parser output)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        tuning: Tuning,
    },

    /// Extract outlines for every fragments file in a directory
    Batch {
        /// Directory with fragments JSON files
        #[arg(value_name = "INPUT_DIR")]
        input: PathBuf,

        /// Directory for outline JSON files
        #[arg(value_name = "OUTPUT_DIR")]
        output: PathBuf,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        tuning: Tuning,
    },

    /// Check outline JSON files against the outline schema
    Validate {
        /// Directory with outline JSON files
        #[arg(value_name = "DIR")]
        dir: PathBuf,
    },

    /// Show version information
    Version,
}

/// Options shared by the extracting commands.
#[derive(clap::Args, Debug, Default)]
struct Tuning {
    /// Options file (JSON, camelCase keys)
    #[arg(long, value_name = "FILE", env = "PDFOUTLINE_CONFIG")]
    config: Option<PathBuf>,

    /// Acceptance threshold for heading scores
    #[arg(long)]
    threshold: Option<f32>,

    /// Maximum words in a heading
    #[arg(long)]
    max_words: Option<usize>,

    /// Minimum gap between heading font sizes (points)
    #[arg(long)]
    min_gap: Option<f32>,
}

impl Tuning {
    fn options(&self) -> Result<OutlineOptions, Box<dyn std::error::Error>> {
        let mut options = match &self.config {
            Some(path) => OutlineOptions::from_json_file(path)?,
            None => OutlineOptions::default(),
        };

        if let Some(threshold) = self.threshold {
            options = options.with_acceptance_threshold(threshold);
        }
        if let Some(words) = self.max_words {
            options = options.with_max_heading_words(words);
        }
        if let Some(gap) = self.min_gap {
            options = options.with_min_heading_gap(gap);
        }

        Ok(options)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Extract {
            input,
            output,
            compact,
            tuning,
        }) => cmd_extract(&input, output.as_deref(), compact, &tuning),
        Some(Commands::Batch {
            input,
            output,
            compact,
            tuning,
        }) => cmd_batch(&input, &output, compact, &tuning),
        Some(Commands::Validate { dir }) => cmd_validate(&dir),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: pdfoutline <COMMAND>".yellow());
            println!("       pdfoutline --help for more information");
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

/// `*.json` files of a directory, sorted by name.
fn json_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        })
        .collect();
    files.sort();
    Ok(files)
}

fn extract_file(extractor: &OutlineExtractor, input: &Path) -> pdfoutline::Result<ExtractionResult> {
    let json = fs::read_to_string(input)?;
    let document = fragments_from_json(&json)?;
    Ok(extractor.extract_document(&document))
}

/// Extract one file and write `<stem>.json` into the output directory.
fn process_file(
    extractor: &OutlineExtractor,
    input: &Path,
    output_dir: &Path,
    format: JsonFormat,
) -> pdfoutline::Result<ExtractionResult> {
    let result = extract_file(extractor, input)?;
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let json = pdfoutline::render::to_json(&result.outline, format)?;
    fs::write(output_dir.join(format!("{}.json", stem)), json)?;
    Ok(result)
}

fn print_warnings(name: &str, warnings: &[String]) {
    if warnings.is_empty() {
        return;
    }
    for warning in warnings.iter().take(3) {
        eprintln!("{} {}: {}", "Warning".yellow().bold(), name, warning);
    }
    if warnings.len() > 3 {
        eprintln!(
            "{}",
            format!("  ... and {} more warning(s)", warnings.len() - 3).yellow()
        );
    }
}

fn cmd_extract(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    tuning: &Tuning,
) -> Result<(), Box<dyn std::error::Error>> {
    let extractor = OutlineExtractor::new(tuning.options()?)?;
    let result = extract_file(&extractor, input)?;

    print_warnings(&input.display().to_string(), &result.warnings);

    let json = pdfoutline::render::to_json(&result.outline, json_format(compact))?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!(
            "{} {} ({} headings)",
            "Saved to".green(),
            path.display(),
            result.outline.len()
        );
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_batch(
    input: &Path,
    output: &Path,
    compact: bool,
    tuning: &Tuning,
) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let extractor = OutlineExtractor::new(tuning.options()?)?;
    let parallel = extractor.options().parallel;
    let format = json_format(compact);

    let files = json_files(input)?;
    if files.is_empty() {
        println!(
            "{} {}",
            "No fragment files found in".yellow(),
            input.display()
        );
        return Ok(());
    }
    fs::create_dir_all(output)?;

    println!("{} {} file(s)", "Processing".cyan().bold(), files.len());

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let run = |path: &PathBuf| {
        let result = process_file(&extractor, path, output, format);
        pb.inc(1);
        result
    };
    let results: Vec<pdfoutline::Result<ExtractionResult>> = if parallel {
        files.par_iter().map(run).collect()
    } else {
        files.iter().map(run).collect()
    };

    pb.finish_and_clear();

    let mut processed = 0usize;
    for (path, result) in files.iter().zip(&results) {
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        match result {
            Ok(extraction) => {
                processed += 1;
                println!(
                    "  {} {} ({} headings)",
                    "✓".green(),
                    name,
                    extraction.outline.len()
                );
                print_warnings(&name, &extraction.warnings);
            }
            Err(e) => println!("  {} {}: {}", "✗".red(), name, e),
        }
    }

    let total = start.elapsed().as_secs_f64();
    println!("\n{}", "─".repeat(40).dimmed());
    println!("{}: {}/{}", "Files processed".bold(), processed, files.len());
    println!("{}: {:.2}s", "Total time".bold(), total);
    println!(
        "{}: {:.2}s",
        "Average per file".bold(),
        total / files.len() as f64
    );

    Ok(())
}

/// Schema report for one outline file, or why it could not be read.
fn validate_file(path: &Path) -> Result<ValidationReport, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&text)?;
    Ok(OutlineSchema.validate(&value))
}

fn cmd_validate(dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let files = json_files(dir)?;
    if files.is_empty() {
        println!("{} {}", "No JSON files found in".yellow(), dir.display());
        return Ok(());
    }

    println!(
        "{} (schema v{})",
        "Validating outlines".cyan().bold(),
        OutlineSchema::VERSION
    );

    let mut failed = 0usize;
    for path in &files {
        let name = path.file_name().unwrap_or_default().to_string_lossy();
        match validate_file(path) {
            Ok(report) if report.valid => println!("  {} {}", "✓".green(), name),
            Ok(report) => {
                failed += 1;
                println!("  {} {}", "✗".red(), name);
                for violation in &report.violations {
                    println!("      {}", violation.to_string().dimmed());
                }
            }
            Err(e) => {
                failed += 1;
                println!("  {} {}: {}", "✗".red(), name, e);
            }
        }
    }

    println!();
    if failed > 0 {
        return Err(format!("{} of {} file(s) failed validation", failed, files.len()).into());
    }
    println!("{} {} file(s) valid", "Done!".green().bold(), files.len());

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfoutline".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF heading outline extraction tool");
    println!();
    println!("Outline schema: v{}", OutlineSchema::VERSION);
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const FRAGMENTS: &str = r#"{
        "title": "Metadata Title",
        "fragments": [
            {"text": "Understanding AI", "page": 1, "fontSize": 24.0, "isBold": true},
            {"text": "Introduction", "page": 1, "fontSize": 18.0, "isBold": true},
            {"text": "What is AI?", "page": 2, "fontSize": 14.0, "isBold": true},
            {"text": "This is body text describing AI in detail.", "page": 2, "fontSize": 11.0},
            {"text": "History of AI", "page": 3, "fontSize": 14.0, "isBold": true}
        ]
    }"#;

    #[test]
    fn test_json_files_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.json"), "[]").unwrap();
        fs::write(dir.path().join("a.JSON"), "[]").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let files = json_files(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.JSON", "b.json"]);
    }

    #[test]
    fn test_process_file_writes_outline() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let path = input.path().join("report.json");
        fs::write(&path, FRAGMENTS).unwrap();

        let extractor = OutlineExtractor::default();
        let result = process_file(&extractor, &path, output.path(), JsonFormat::Compact).unwrap();
        assert_eq!(result.outline.title, "Understanding AI");

        let written = fs::read_to_string(output.path().join("report.json")).unwrap();
        let parsed = pdfoutline::render::from_json(&written).unwrap();
        assert_eq!(parsed, result.outline);
        assert!(validate_file(&output.path().join("report.json"))
            .unwrap()
            .valid);
    }

    #[test]
    fn test_process_file_reports_bad_input() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let path = input.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();

        let result = process_file(&OutlineExtractor::default(), &path, output.path(), JsonFormat::Pretty);
        assert!(matches!(result, Err(pdfoutline::Error::Serialization(_))));
        assert!(!output.path().join("broken.json").exists());
    }

    #[test]
    fn test_validate_file_reports_violations() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{"title": "x", "outline": [{"level": "H5", "text": "a", "page": 1}]}"#)
            .unwrap();

        let report = validate_file(&path).unwrap();
        assert!(!report.valid);
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].path, "outline[0].level");
    }

    #[test]
    fn test_tuning_overrides_config_file() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("options.json");
        fs::write(&config, r#"{"acceptanceThreshold": 4.0, "maxHeadingWords": 8}"#).unwrap();

        let tuning = Tuning {
            config: Some(config),
            threshold: Some(2.5),
            ..Tuning::default()
        };
        let options = tuning.options().unwrap();
        assert_eq!(options.acceptance_threshold, 2.5);
        assert_eq!(options.max_heading_words, 8);
    }
}
