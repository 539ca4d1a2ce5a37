//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.folio/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::storage::default_storage_path;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct FolioConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StorageConfig {
    pub path: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub start_route: Option<String>,
    pub output: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api";
pub const DEFAULT_START_ROUTE: &str = "/";
pub const DEFAULT_OUTPUT: &str = "folio.html";
const FALLBACK_STORAGE_FILE: &str = "folio-storage.json";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub api_base: String,
    pub storage_path: PathBuf,
    pub start_route: String,
    pub output: PathBuf,
}

/// Values given on the command line. `None` means "not specified".
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub api_base: Option<String>,
    pub storage: Option<PathBuf>,
    pub route: Option<String>,
    pub out: Option<PathBuf>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.folio/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".folio").join("config.toml"))
}

/// Load config from `~/.folio/config.toml`.
pub fn load_config() -> Result<FolioConfig, ConfigError> {
    let Some(path) = config_path() else {
        warn!("Could not determine home directory, using default config");
        return Ok(FolioConfig::default());
    };
    load_config_from(&path)
}

/// Load config from `path`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `FolioConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config_from(path: &Path) -> Result<FolioConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(FolioConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: FolioConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

fn generate_default_config(path: &Path) {
    let default_content = r#"# Folio Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [api]
# base_url = "http://localhost:8000/api"   # Or set FOLIO_API_BASE

# [storage]
# path = "~/.folio/storage.json"           # Or set FOLIO_STORAGE_PATH

# [general]
# start_route = "/"
# output = "folio.html"                    # Where the rendered page is written
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &FolioConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

fn resolve_with_env(
    config: &FolioConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // API base: CLI → env → config → default
    let api_base = cli
        .api_base
        .clone()
        .or_else(|| env("FOLIO_API_BASE"))
        .or_else(|| config.api.base_url.clone())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

    // Storage: CLI → env → config → ~/.folio/storage.json
    let storage_path = cli
        .storage
        .clone()
        .or_else(|| env("FOLIO_STORAGE_PATH").map(PathBuf::from))
        .or_else(|| config.storage.path.as_deref().map(expand_home))
        .or_else(default_storage_path)
        .unwrap_or_else(|| PathBuf::from(FALLBACK_STORAGE_FILE));

    let start_route = cli
        .route
        .clone()
        .or_else(|| config.general.start_route.clone())
        .unwrap_or_else(|| DEFAULT_START_ROUTE.to_string());

    let output = cli
        .out
        .clone()
        .or_else(|| config.general.output.as_deref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    ResolvedConfig {
        api_base,
        storage_path,
        start_route,
        output,
    }
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve_with_env(&FolioConfig::default(), &CliOverrides::default(), no_env);
        assert_eq!(resolved.api_base, DEFAULT_API_BASE);
        assert_eq!(resolved.start_route, "/");
        assert_eq!(resolved.output, PathBuf::from(DEFAULT_OUTPUT));
    }

    #[test]
    fn test_env_beats_config_and_cli_beats_env() {
        let config: FolioConfig = toml::from_str(
            r#"
[api]
base_url = "http://config:1/api"
"#,
        )
        .unwrap();
        let env = |key: &str| (key == "FOLIO_API_BASE").then(|| "http://env:2/api".to_string());

        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env);
        assert_eq!(resolved.api_base, "http://config:1/api");

        let resolved = resolve_with_env(&config, &CliOverrides::default(), env);
        assert_eq!(resolved.api_base, "http://env:2/api");

        let cli = CliOverrides {
            api_base: Some("http://cli:3/api".into()),
            ..Default::default()
        };
        let resolved = resolve_with_env(&config, &cli, env);
        assert_eq!(resolved.api_base, "http://cli:3/api");
    }

    #[test]
    fn test_storage_path_from_env() {
        let env = |key: &str| (key == "FOLIO_STORAGE_PATH").then(|| "/tmp/s.json".to_string());
        let resolved = resolve_with_env(&FolioConfig::default(), &CliOverrides::default(), env);
        assert_eq!(resolved.storage_path, PathBuf::from("/tmp/s.json"));
    }

    #[test]
    fn test_sparse_toml_parses() {
        let config: FolioConfig = toml::from_str(
            r#"
[general]
start_route = "/blog"
"#,
        )
        .unwrap();
        assert_eq!(config.general.start_route.as_deref(), Some("/blog"));
        assert!(config.api.base_url.is_none());
        assert!(config.storage.path.is_none());
    }

    #[test]
    fn test_missing_file_generates_commented_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = load_config_from(&path).unwrap();
        assert!(config.api.base_url.is_none());

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# Folio Configuration"));
        // Everything is commented out, so it parses back to defaults.
        let reparsed = load_config_from(&path).unwrap();
        assert!(reparsed.general.output.is_none());
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[api\nbase_url = ").unwrap();
        assert!(matches!(load_config_from(&path), Err(ConfigError::Parse(_))));
    }
}
