// Configuration loading and validation (config/gridline.toml).
//
// Every key is optional; a missing file means built-in defaults. Missing files
// under config/ are seeded from defaults/ the first time the app starts.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up under `config/` (and the platform config dir).
pub const CONFIG_FILE: &str = "gridline.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub search: SearchConfig,
    pub display: DisplayConfig,
}

/// Remote endpoints and HTTP behaviour.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub search_url: String,
    /// League root; `/athletes/<id>/statistics` is appended per player.
    pub stats_base_url: String,
    /// Substring of a search uid that marks an NFL athlete.
    pub league_tag: String,
    /// `limit` sent to the search endpoint.
    pub search_limit: u32,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            search_url: "https://site.web.api.espn.com/apis/search/v2".to_string(),
            stats_base_url: "https://sports.core.api.espn.com/v2/sports/football/leagues/nfl"
                .to_string(),
            league_tag: "l:28".to_string(),
            search_limit: 30,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Input quiet period before a typed query is searched.
    pub debounce_ms: u64,
    /// Shorter (trimmed) queries clear the results without a request.
    pub min_query_len: usize,
    /// Maximum number of results shown.
    pub display_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            debounce_ms: 300,
            min_query_len: 2,
            display_limit: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Cell text for a stat a player does not have.
    pub no_data: String,
    /// Records listed in the player detail line.
    pub top_stats: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            no_data: crate::compare::NO_DATA.to_string(),
            top_stats: crate::stats::DEFAULT_TOP_STATS,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load `config/gridline.toml` under `base_dir`, falling back to defaults when
/// the file does not exist. The result is validated either way.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    if path.exists() {
        load_config_file(&path)
    } else {
        let config = Config::default();
        validate(&config)?;
        Ok(config)
    }
}

/// Parse and validate a single config file.
pub fn load_config_file(path: &Path) -> Result<Config, ConfigError> {
    let text = read_file(path)?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    validate(&config)?;
    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    // Nothing to seed from; built-in defaults apply.
    if !defaults_dir.is_dir() {
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Load configuration for the running binary.
///
/// Lookup order: `./config/gridline.toml` (seeded from `./defaults/` when
/// present), then `<platform config dir>/gridline.toml`, then built-in
/// defaults.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;

    if cwd.join("config").join(CONFIG_FILE).exists() {
        return load_config_from(&cwd);
    }

    if let Some(path) = platform_config_path() {
        if path.exists() {
            return load_config_file(&path);
        }
    }

    load_config_from(&cwd)
}

/// `~/.config/gridline/gridline.toml` or the platform equivalent.
pub fn platform_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "gridline")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let url_fields: &[(&str, &str)] = &[
        ("api.search_url", config.api.search_url.as_str()),
        ("api.stats_base_url", config.api.stats_base_url.as_str()),
    ];
    for (name, value) in url_fields {
        if let Err(e) = reqwest::Url::parse(value) {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: format!("must be an absolute URL, got {value:?} ({e})"),
            });
        }
    }

    if config.api.league_tag.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "api.league_tag".into(),
            message: "must not be empty".into(),
        });
    }

    let positive_fields: &[(&str, u64)] = &[
        ("api.search_limit", u64::from(config.api.search_limit)),
        ("api.timeout_secs", config.api.timeout_secs),
        ("search.debounce_ms", config.search.debounce_ms),
        ("search.min_query_len", config.search.min_query_len as u64),
        ("search.display_limit", config.search.display_limit as u64),
        ("display.top_stats", config.display.top_stats as u64),
    ];
    for (name, val) in positive_fields {
        if *val == 0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must be > 0".into(),
            });
        }
    }

    if config.display.no_data.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "display.no_data".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
