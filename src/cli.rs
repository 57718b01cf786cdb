//! CLI interface for the ATS scorer

use crate::config::{Config, OutputFormat};
use crate::error::{AtsScorerError, Result as AppResult};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

pub const RESUME_EXTENSIONS: &[&str] = &["pdf", "docx", "txt", "md", "markdown"];
pub const JOB_EXTENSIONS: &[&str] = &["pdf", "docx", "txt", "md", "markdown"];

#[derive(Parser)]
#[command(name = "ats-scorer")]
#[command(about = "Score resumes against a job description the way an ATS would")]
#[command(long_about = "Weighted, lexicon-based scoring of skills, tools, education, experience, \
    soft skills, achievements, formatting and keyword coverage, with gap analysis and batch ranking")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score one resume against a job description
    Score {
        /// Path to resume file (PDF, DOCX, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Rank several resumes against one job description
    Rank {
        /// Resume files to rank
        #[arg(required = true, num_args = 1..)]
        resumes: Vec<PathBuf>,

        /// Only show the best N candidates
        #[arg(short, long)]
        top: Option<usize>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Args)]
pub struct CommonArgs {
    /// Path to job description file (PDF, DOCX, TXT, MD)
    #[arg(short, long)]
    pub job: PathBuf,

    /// Output format: console, json, markdown, csv, html, pdf
    #[arg(short, long)]
    pub output: Option<String>,

    /// Save output to file
    #[arg(short, long)]
    pub save: Option<PathBuf>,

    /// Output detailed analysis
    #[arg(short, long)]
    pub detailed: bool,

    /// Disable colored console output
    #[arg(long)]
    pub no_color: bool,

    /// Require lexicon phrases to match whole words
    #[arg(long)]
    pub word_boundary: bool,

    /// Role-specific lexicon file (TOML); lists it defines replace the configured ones
    #[arg(long)]
    pub lexicon: Option<PathBuf>,
}

impl CommonArgs {
    /// `--output` wins over the configured default format.
    pub fn output_format(&self, config: &Config) -> AppResult<OutputFormat> {
        match &self.output {
            Some(format) => parse_output_format(format).map_err(AtsScorerError::InvalidInput),
            None => Ok(config.output.format),
        }
    }
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file path
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" | "text" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        "csv" => Ok(OutputFormat::Csv),
        "html" => Ok(OutputFormat::Html),
        "pdf" => Ok(OutputFormat::Pdf),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown, csv, html, pdf",
            format
        )),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
