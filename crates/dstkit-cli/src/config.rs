//! # CLI Configuration
//!
//! Optional YAML file supplying defaults for the subcommands:
//!
//! ```yaml
//! transitions: data/oslo-2020.yaml
//! validate_calendar: true
//! output: json
//! ```
//!
//! A relative `transitions` path is taken relative to the config file's
//! directory. Command-line flags always override file values.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Output rendering for subcommand results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Output selection flags shared by every subcommand.
#[derive(clap::Args, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputArgs {
    /// Output format; overrides the config file.
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub output: Option<OutputFormat>,

    /// Shorthand for `--output json`.
    #[arg(long, conflicts_with = "output")]
    pub json: bool,
}

impl OutputArgs {
    /// JSON output via `--json`.
    pub fn json() -> Self {
        Self {
            output: None,
            json: true,
        }
    }
}

/// Settings loaded from `--config`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Default transition file for `resolve` and `inspect`.
    pub transitions: Option<PathBuf>,
    /// Reject calendar-invalid local times before resolving.
    pub validate_calendar: bool,
    /// Default output format.
    pub output: OutputFormat,
}

impl CliConfig {
    /// Load the config file, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let mut config: CliConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config YAML: {}", path.display()))?;

        let base = path.parent().unwrap_or(Path::new("."));
        config.transitions = config
            .transitions
            .map(|t| crate::resolve_path(&t, base));

        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    /// The effective output format: `--json`, then `--output`, then the file.
    pub fn output_for(&self, flags: &OutputArgs) -> OutputFormat {
        if flags.json {
            OutputFormat::Json
        } else {
            flags.output.unwrap_or(self.output)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_path_gives_defaults() {
        let config = CliConfig::load(None).unwrap();
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.output, OutputFormat::Text);
        assert!(!config.validate_calendar);
    }

    #[test]
    fn test_loads_yaml_and_resolves_relative_transitions() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("oslo.yaml"), "[]").unwrap();
        let path = dir.path().join("dstkit.yaml");
        std::fs::write(
            &path,
            "transitions: oslo.yaml\nvalidate_calendar: true\noutput: json\n",
        )
        .unwrap();

        let config = CliConfig::load(Some(&path)).unwrap();
        assert_eq!(config.transitions, Some(dir.path().join("oslo.yaml")));
        assert!(config.validate_calendar);
        assert_eq!(config.output, OutputFormat::Json);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dstkit.yaml");
        std::fs::write(&path, "validate_calendar: true\n").unwrap();
        let config = CliConfig::load(Some(&path)).unwrap();
        assert_eq!(config.transitions, None);
        assert_eq!(config.output, OutputFormat::Text);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dstkit.yaml");
        std::fs::write(&path, "timezone: Europe/Oslo\n").unwrap();
        assert!(CliConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn test_json_flag_overrides_config() {
        let config = CliConfig::default();
        assert_eq!(config.output_for(&OutputArgs::json()), OutputFormat::Json);
        assert_eq!(config.output_for(&OutputArgs::default()), OutputFormat::Text);
    }

    #[test]
    fn test_output_flag_overrides_config() {
        let config = CliConfig {
            output: OutputFormat::Json,
            ..Default::default()
        };
        let text = OutputArgs {
            output: Some(OutputFormat::Text),
            json: false,
        };
        assert_eq!(config.output_for(&text), OutputFormat::Text);
        assert_eq!(config.output_for(&OutputArgs::default()), OutputFormat::Json);
    }

    #[derive(clap::Parser, Debug)]
    struct Harness {
        #[command(flatten)]
        output: OutputArgs,
    }

    #[test]
    fn test_output_flag_parses_value_enum() {
        use clap::Parser;

        let parsed = Harness::try_parse_from(["dstkit", "--output", "json"]).unwrap();
        assert_eq!(parsed.output.output, Some(OutputFormat::Json));
        let parsed = Harness::try_parse_from(["dstkit", "--output", "text"]).unwrap();
        assert_eq!(parsed.output.output, Some(OutputFormat::Text));
        assert!(Harness::try_parse_from(["dstkit", "--output", "xml"]).is_err());
        assert!(Harness::try_parse_from(["dstkit", "--output", "text", "--json"]).is_err());
        let parsed = Harness::try_parse_from(["dstkit", "--json"]).unwrap();
        assert_eq!(parsed.output, OutputArgs::json());
    }
}
