use crate::inflammation::NlrPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Scoring behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Threshold policy applied when none is given explicitly
    #[serde(default = "default_nlr_policy")]
    pub nlr_policy: NlrPolicy,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            nlr_policy: default_nlr_policy(),
        }
    }
}

fn default_nlr_policy() -> NlrPolicy {
    NlrPolicy::ClinicalV1
}

/// Reference dataset configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TablesConfig {
    /// Custom reference dataset; the builtin one is used when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Submission quota configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaConfig {
    /// Submission limit applied to accounts created without one
    #[serde(default = "default_quota_limit")]
    pub default_limit: u32,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            default_limit: default_quota_limit(),
        }
    }
}

fn default_quota_limit() -> u32 {
    25
}

/// Report output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Format used when `--format` is not given (terminal, json, markdown)
    #[serde(default = "default_output_format")]
    pub default_format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_format: default_output_format(),
        }
    }
}

fn default_output_format() -> String {
    "terminal".to_string()
}

/// Root configuration loaded from .bioscore.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BioscoreConfig {
    #[serde(default)]
    pub scoring: Option<ScoringConfig>,
    #[serde(default)]
    pub tables: Option<TablesConfig>,
    #[serde(default)]
    pub quota: Option<QuotaConfig>,
    #[serde(default)]
    pub output: Option<OutputConfig>,
}

static CONFIG: OnceLock<BioscoreConfig> = OnceLock::new();

fn read_config_file(path: &Path) -> Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

#[cfg(test)]
pub(crate) fn parse_config(contents: &str) -> Result<BioscoreConfig, String> {
    parse_config_impl(contents)
}

fn parse_config_impl(contents: &str) -> Result<BioscoreConfig, String> {
    let mut config = toml::from_str::<BioscoreConfig>(contents)
        .map_err(|e| format!("Failed to parse .bioscore.toml: {}", e))?;

    // An unknown output format falls back to the default rather than
    // failing every later command
    if let Some(ref output) = config.output {
        if parse_format_name(&output.default_format).is_none() {
            eprintln!(
                "Warning: unknown output format '{}'. Using defaults.",
                output.default_format
            );
            config.output = Some(OutputConfig::default());
        }
    }

    Ok(config)
}

fn parse_format_name(name: &str) -> Option<&'static str> {
    match name {
        "terminal" => Some("terminal"),
        "json" => Some("json"),
        "markdown" => Some("markdown"),
        _ => None,
    }
}

fn try_load_config_from_path(config_path: &Path) -> Option<BioscoreConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_config_impl(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            eprintln!("Warning: {}. Using defaults.", e);
            None
        }
    }
}

fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // Only log actual errors, not "file not found"
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

#[cfg(test)]
pub(crate) fn directory_ancestors(
    start: PathBuf,
    max_depth: usize,
) -> impl Iterator<Item = PathBuf> {
    directory_ancestors_impl(start, max_depth)
}

fn directory_ancestors_impl(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Find and load .bioscore.toml from the current directory upward
pub fn load_config() -> BioscoreConfig {
    const MAX_TRAVERSAL_DEPTH: usize = 10;

    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            return BioscoreConfig::default();
        }
    };

    directory_ancestors_impl(current, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(".bioscore.toml"))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            BioscoreConfig::default()
        })
}

/// Get the cached configuration
pub fn get_config() -> &'static BioscoreConfig {
    CONFIG.get_or_init(load_config)
}

/// Threshold policy to apply when the caller does not name one
pub fn default_policy() -> NlrPolicy {
    get_config()
        .scoring
        .as_ref()
        .map(|s| s.nlr_policy)
        .unwrap_or_else(|| ScoringConfig::default().nlr_policy)
}

/// Configured reference dataset path, if any
pub fn configured_tables_path() -> Option<PathBuf> {
    get_config().tables.as_ref().and_then(|t| t.path.clone())
}

/// Submission limit for accounts created without an explicit one
pub fn default_submission_limit() -> u32 {
    get_config()
        .quota
        .as_ref()
        .map(|q| q.default_limit)
        .unwrap_or_else(default_quota_limit)
}

/// Configured default output format name
pub fn default_format_name() -> String {
    get_config()
        .output
        .as_ref()
        .map(|o| o.default_format.clone())
        .unwrap_or_else(default_output_format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert!(config.scoring.is_none());
        assert!(config.quota.is_none());
        assert_eq!(
            QuotaConfig::default().default_limit,
            default_quota_limit()
        );
    }

    #[test]
    fn test_full_config_roundtrip() {
        let config = parse_config(
            r#"
[scoring]
nlr_policy = "clinical-v2"

[tables]
path = "ranges.toml"

[quota]
default_limit = 5

[output]
default_format = "json"
"#,
        )
        .unwrap();

        assert_eq!(config.scoring.unwrap().nlr_policy, NlrPolicy::ClinicalV2);
        assert_eq!(
            config.tables.unwrap().path,
            Some(PathBuf::from("ranges.toml"))
        );
        assert_eq!(config.quota.unwrap().default_limit, 5);
        assert_eq!(config.output.unwrap().default_format, "json");
    }

    #[test]
    fn test_unknown_output_format_falls_back() {
        let config = parse_config(
            r#"
[output]
default_format = "csv"
"#,
        )
        .unwrap();
        assert_eq!(config.output.unwrap().default_format, "terminal");
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(parse_config("[scoring\nnlr_policy = ").is_err());
    }

    #[test]
    fn test_directory_ancestors_respects_depth() {
        let ancestors: Vec<_> =
            directory_ancestors(PathBuf::from("/a/b/c/d"), 3).collect();
        assert_eq!(ancestors.len(), 3);
        assert_eq!(ancestors[0], PathBuf::from("/a/b/c/d"));
        assert_eq!(ancestors[1], PathBuf::from("/a/b/c"));
    }

    #[test]
    fn test_directory_ancestors_stops_at_root() {
        let ancestors: Vec<_> = directory_ancestors(PathBuf::from("/a"), 10).collect();
        assert!(ancestors.len() <= 2);
    }
}
