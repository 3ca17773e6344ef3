//! # dstkit-cli: Command-Line Front End for dstkit
//!
//! Provides the `dstkit` binary over `dstkit-core`.
//!
//! ## Subcommands
//!
//! - `dstkit parse`: Parse ISO-8601 text and show the resulting instant.
//! - `dstkit resolve`: Resolve the UTC offset of a local time.
//! - `dstkit inspect`: List a DST data file's zones and transitions.
//!
//! ```bash
//! dstkit parse 2020-03-29T02:30:00 --json
//! dstkit resolve --transitions oslo-2020.yaml 2020-10-25T02:30:00
//! dstkit -v --config dstkit.yaml inspect --output json
//! ```
//!
//! ## Crate Policy
//!
//! - CLI construction (argument parsing) is separated from business logic.
//! - Handlers delegate to `dstkit-core`; no time arithmetic lives here.
//! - Handlers return an exit code; operational failures are `anyhow` errors.

pub mod config;
pub mod inspect;
pub mod parse;
pub mod resolve;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use dstkit_core::{DstEntry, OffsetResolver};

/// Resolve a path that may be relative to a base directory.
///
/// Absolute paths are returned as-is. Relative paths are joined onto
/// `base` when that file exists, and otherwise left relative to the
/// current directory.
pub fn resolve_path(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let based = base.join(path);
    if based.exists() {
        based
    } else {
        path.to_path_buf()
    }
}

/// Load a DST data file from JSON or YAML.
///
/// `.yaml` and `.yml` files are read as YAML; anything else as JSON. A
/// document that is a map is a full DST entry (`stdtimezone`,
/// `timechanges`, ...); a list is a bare transition list.
pub fn load_dst_entry(path: &Path) -> Result<DstEntry> {
    if !path.exists() {
        bail!("transition file not found: {}", path.display());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read transition file: {}", path.display()))?;

    let entry: DstEntry = match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => {
            let value: serde_yaml::Value = serde_yaml::from_str(&content)
                .with_context(|| format!("failed to parse transition YAML: {}", path.display()))?;
            let parsed = if value.is_mapping() {
                serde_yaml::from_value(value)
            } else {
                serde_yaml::from_value::<OffsetResolver>(value).map(DstEntry::from)
            };
            parsed.with_context(|| format!("failed to parse transition YAML: {}", path.display()))?
        }
        _ => {
            let value: serde_json::Value = serde_json::from_str(&content)
                .with_context(|| format!("failed to parse transition JSON: {}", path.display()))?;
            let parsed = if value.is_object() {
                serde_json::from_value(value)
            } else {
                serde_json::from_value::<OffsetResolver>(value).map(DstEntry::from)
            };
            parsed.with_context(|| format!("failed to parse transition JSON: {}", path.display()))?
        }
    };

    tracing::debug!(
        path = %path.display(),
        count = entry.time_changes.len(),
        year = ?entry.time_changes.year(),
        special = ?entry.special,
        "loaded transitions"
    );
    Ok(entry)
}

/// Load only the transition list from a DST data file.
pub fn load_transitions(path: &Path) -> Result<OffsetResolver> {
    load_dst_entry(path).map(|entry| entry.time_changes)
}

/// Pick the transition file from the flag or, failing that, the config.
pub fn transitions_path(flag: Option<&Path>, config: &config::CliConfig) -> Result<PathBuf> {
    match flag.or(config.transitions.as_deref()) {
        Some(path) => Ok(path.to_path_buf()),
        None => bail!("no transition file: pass --transitions or set `transitions` in the config file"),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_yaml_transitions() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixtures::write_oslo(dir.path());
        let resolver = load_transitions(&path).unwrap();
        assert_eq!(resolver.len(), 2);
        assert_eq!(resolver.year(), Some(2020));
    }

    #[test]
    fn test_load_json_transitions() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = load_transitions(&fixtures::write_oslo(dir.path())).unwrap();
        let path = dir.path().join("oslo.json");
        std::fs::write(&path, serde_json::to_string(&yaml).unwrap()).unwrap();
        assert_eq!(load_transitions(&path).unwrap(), yaml);
    }

    #[test]
    fn test_load_missing_or_malformed_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_transitions(&dir.path().join("absent.json")).is_err());
        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, r#"[{"utctime": "yesterday"}]"#).unwrap();
        let err = load_transitions(&bad).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse transition JSON"));
    }

    #[test]
    fn test_load_dst_entry_from_map_documents() {
        let dir = tempfile::tempdir().unwrap();
        let oslo = load_dst_entry(&fixtures::write_oslo_entry(dir.path())).unwrap();
        assert_eq!(oslo.standard_timezone.abbreviation, "CET");
        assert_eq!(oslo.dst_timezone.as_ref().map(|z| z.total_offset_seconds), Some(7200));
        assert_eq!(oslo.time_changes.len(), 2);
        assert_eq!(oslo.time_changes, load_transitions(&fixtures::write_oslo(dir.path())).unwrap());

        let kolkata = load_dst_entry(&fixtures::write_kolkata_entry(dir.path())).unwrap();
        assert_eq!(kolkata.special, Some(dstkit_core::DstSpecial::NoDaylightSavingTime));
        assert!(kolkata.time_changes.is_empty());
        assert!(load_transitions(&fixtures::write_kolkata_entry(dir.path())).unwrap().is_empty());
    }

    #[test]
    fn test_list_document_becomes_bare_entry() {
        let dir = tempfile::tempdir().unwrap();
        let entry = load_dst_entry(&fixtures::write_oslo(dir.path())).unwrap();
        assert_eq!(entry.time_changes.len(), 2);
        assert_eq!(entry.standard_timezone, dstkit_core::TimezoneInfo::default());
        assert_eq!(entry.special, None);

        let bad = dir.path().join("bad.yaml");
        std::fs::write(&bad, "stdtimezone: 5\n").unwrap();
        let err = load_dst_entry(&bad).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse transition YAML"));
    }

    #[test]
    fn test_resolve_path_prefers_existing_base_relative() {
        let dir = tempfile::tempdir().unwrap();
        fixtures::write_oslo(dir.path());
        let rel = Path::new("oslo-2020.yaml");
        assert_eq!(resolve_path(rel, dir.path()), dir.path().join(rel));
        assert_eq!(resolve_path(Path::new("nope.yaml"), dir.path()), PathBuf::from("nope.yaml"));
        let abs = dir.path().join("x");
        assert_eq!(resolve_path(&abs, Path::new("/elsewhere")), abs);
    }

    #[test]
    fn test_flag_overrides_config_transitions() {
        let config = config::CliConfig {
            transitions: Some(PathBuf::from("from-config.json")),
            ..Default::default()
        };
        assert_eq!(
            transitions_path(Some(Path::new("flag.json")), &config).unwrap(),
            PathBuf::from("flag.json")
        );
        assert_eq!(
            transitions_path(None, &config).unwrap(),
            PathBuf::from("from-config.json")
        );
        assert!(transitions_path(None, &config::CliConfig::default()).is_err());
    }
}
