//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.ingrevo.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".ingrevo.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,

    /// Raw response export settings.
    #[serde(default)]
    pub export: ExportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "survey_report.md".to_string()
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Number of free-text answers quoted per question.
    #[serde(default = "default_text_preview")]
    pub text_preview: usize,

    /// Number of most recent days shown in the timeline.
    #[serde(default = "default_timeline_days")]
    pub timeline_days: usize,

    /// Include the daily response timeline.
    #[serde(default = "default_true")]
    pub include_timeline: bool,

    /// Include the per-role response breakdown.
    #[serde(default = "default_true")]
    pub include_roles: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            text_preview: default_text_preview(),
            timeline_days: default_timeline_days(),
            include_timeline: true,
            include_roles: true,
        }
    }
}

fn default_text_preview() -> usize {
    5
}

fn default_timeline_days() -> usize {
    30
}

fn default_true() -> bool {
    true
}

/// Raw response CSV export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Top-level response fields left out of the CSV.
    #[serde(default = "default_excluded_fields")]
    pub excluded_fields: Vec<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            excluded_fields: default_excluded_fields(),
        }
    }
}

fn default_excluded_fields() -> Vec<String> {
    vec!["device", "userAgent", "platform"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load configuration from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }

        if let Some(preview) = args.preview {
            self.report.text_preview = preview;
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.output, "survey_report.md");
        assert_eq!(config.report.text_preview, 5);
        assert_eq!(config.report.timeline_days, 30);
        assert!(config.export.excluded_fields.contains(&"userAgent".to_string()));
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
output = "results.md"
verbose = true

[report]
text_preview = 3
include_timeline = false

[export]
excluded_fields = ["device"]
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output, "results.md");
        assert!(config.general.verbose);
        assert_eq!(config.report.text_preview, 3);
        assert_eq!(config.report.timeline_days, 30);
        assert!(!config.report.include_timeline);
        assert!(config.report.include_roles);
        assert_eq!(config.export.excluded_fields, vec!["device"]);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[report]"));
        assert!(toml_str.contains("[export]"));

        let reparsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(reparsed.report.text_preview, 5);
    }

    #[test]
    fn test_load_from_dir() {
        let temp = TempDir::new().unwrap();
        assert!(Config::load_from_dir(temp.path()).unwrap().is_none());

        std::fs::write(temp.path().join(CONFIG_FILE_NAME), "[report]\ntimeline_days = 7\n").unwrap();
        let config = Config::load_from_dir(temp.path()).unwrap().unwrap();
        assert_eq!(config.report.timeline_days, 7);

        std::fs::write(temp.path().join(CONFIG_FILE_NAME), "[report\n").unwrap();
        assert!(Config::load_from_dir(temp.path()).is_err());
    }
}
