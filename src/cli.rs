//! CLI interface for resume-ats

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-ats")]
#[command(version)]
#[command(about = "ATS-style resume and job description compatibility analysis")]
#[command(long_about = "Compare a resume with a job description using a hosted LLM and get a match score, \
missing keywords, a short analysis and LinkedIn profile suggestions")]
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
    /// Analyze a resume against a job description
    Analyze {
        #[command(flatten)]
        inputs: InputArgs,

        /// Output format: console, json, markdown, html
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Model identifier (overrides config)
        #[arg(short, long)]
        model: Option<String>,

        /// Request timeout in seconds (overrides config)
        #[arg(long)]
        timeout: Option<u64>,

        /// Include sources and raw values in console output
        #[arg(short, long)]
        detailed: bool,

        /// Disable coloured output
        #[arg(long)]
        no_color: bool,
    },

    /// Interactive session: load texts, analyze, reset, repeat
    Interactive {
        /// Model identifier (overrides config)
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Print the text extracted from a .txt or .pdf file
    Extract {
        /// File to extract
        file: PathBuf,
    },

    /// Simulated LinkedIn profile consistency check (illustrative only)
    Consistency {
        /// File with your LinkedIn About or experience text
        #[arg(short, long)]
        profile: PathBuf,
    },

    /// Show or reset configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Path to resume file (PDF, TXT)
    #[arg(short, long, conflicts_with = "resume_text", required_unless_present = "resume_text")]
    pub resume: Option<PathBuf>,

    /// Resume text given inline
    #[arg(long)]
    pub resume_text: Option<String>,

    /// Path to job description file (PDF, TXT)
    #[arg(short, long, conflicts_with = "job_text", required_unless_present = "job_text")]
    pub job: Option<PathBuf>,

    /// Job description text given inline
    #[arg(long)]
    pub job_text: Option<String>,
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

impl Commands {
    /// Colour setting after applying `--no-color` to the configured default.
    pub fn use_colors(&self, configured: bool) -> bool {
        match self {
            Commands::Analyze { no_color, .. } => configured && !no_color,
            _ => configured,
        }
    }
}

/// A text source named by the user: a file or an inline string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSource {
    File(PathBuf),
    Inline(String),
}

impl TextSource {
    pub fn from_args(path: Option<PathBuf>, text: Option<String>) -> Option<Self> {
        match (path, text) {
            (Some(path), _) => Some(TextSource::File(path)),
            (None, Some(text)) => Some(TextSource::Inline(text)),
            (None, None) => None,
        }
    }

    /// Short description used in report metadata.
    pub fn describe(&self) -> String {
        match self {
            TextSource::File(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string()),
            TextSource::Inline(_) => "inline text".to_string(),
        }
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
