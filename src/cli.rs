//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// Ingrevo Survey - tabulate survey responses into reports
///
/// Aggregates exported survey responses per question (option counts,
/// rating averages, yes/no splits, text excerpts) and writes Markdown,
/// JSON or CSV reports.
///
/// Examples:
///   ingrevo-survey --survey survey.json --responses responses/
///   ingrevo-survey -s survey.json -r responses.json --role customer --format json
///   ingrevo-survey -s survey.json -r responses/ --export-responses responses.csv
///   ingrevo-survey --catalog surveys.json --status active --search feedback
///   ingrevo-survey --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Survey document (JSON) to report on
    #[arg(
        short,
        long,
        value_name = "FILE",
        required_unless_present_any = ["init_config", "catalog"],
        conflicts_with = "catalog"
    )]
    pub survey: Option<PathBuf>,

    /// Response documents: a JSON file or a directory of JSON files
    ///
    /// Without responses the report shows every question with an empty sample.
    #[arg(short, long, value_name = "PATH", env = "INGREVO_RESPONSES")]
    pub responses: Option<PathBuf>,

    /// Survey catalog (JSON array) to list instead of writing a report
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Output file path for the report
    ///
    /// Defaults to the configured output (survey_report.md).
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json, csv)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Also write the filtered raw responses as CSV
    #[arg(long, value_name = "FILE")]
    pub export_responses: Option<PathBuf>,

    /// Only include responses from this respondent role
    ///
    /// Values used by the intake surveys: customer, staff, health, volunteer
    #[arg(long, value_name = "ROLE")]
    pub role: Option<String>,

    /// Only include responses submitted on or after this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub from: Option<NaiveDate>,

    /// Only include responses submitted on or before this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub to: Option<NaiveDate>,

    /// Number of free-text answers quoted per question
    #[arg(long, value_name = "COUNT")]
    pub preview: Option<usize>,

    /// Catalog mode: only list surveys with this status
    #[arg(long, value_name = "STATUS", requires = "catalog")]
    pub status: Option<StatusFilter>,

    /// Catalog mode: only list surveys whose title or description contains this text
    #[arg(long, value_name = "TEXT", requires = "catalog")]
    pub search: Option<String>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .ingrevo.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Dry run: load and validate inputs without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .ingrevo.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
    /// One CSV row per statistic
    Csv,
}

/// Survey status for --status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StatusFilter {
    Active,
    Draft,
    Closed,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err(format!("--from ({}) is after --to ({})", from, to));
            }
        }

        for path in [&self.survey, &self.catalog, &self.config].into_iter().flatten() {
            if !path.is_file() {
                return Err(format!("File does not exist: {}", path.display()));
            }
        }

        if let Some(ref responses) = self.responses {
            if !responses.exists() {
                return Err(format!(
                    "Responses path does not exist: {}",
                    responses.display()
                ));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `verbose_by_default` comes from the config file; `--quiet` still wins.
    pub fn log_level(&self, verbose_by_default: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || verbose_by_default {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
