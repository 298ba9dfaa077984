use std::path::Path;

use serde::Deserialize;

use crate::sort::SortDir;

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// An I/O or YAML parsing error occurred while loading a config file.
    Load(String),
    /// A value could not be converted to the expected type.
    TypeMismatch { key: String, expected: &'static str },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Load(msg) => write!(f, "Config load error: {msg}"),
            ConfigError::TypeMismatch { key, expected } => {
                write!(f, "Config type mismatch for '{key}': expected {expected}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

pub const ENV_DEFAULT_SORT: &str = "TRACKSIDE_PAGING_DEFAULT_SORT";
pub const ENV_DEFAULT_DIRECTION: &str = "TRACKSIDE_PAGING_DEFAULT_DIRECTION";
pub const ENV_MAX_SIZE: &str = "TRACKSIDE_PAGING_MAX_SIZE";

/// Defaults applied by the pager when a request leaves them out.
///
/// Read from the `paging:` section of a YAML file:
///
/// ```yaml
/// paging:
///   default_sort: updatedAt
///   default_direction: DESC
///   max_size: 500
/// ```
///
/// Resolution order (lowest to highest priority): built-in defaults, the
/// YAML file, `.env` (never overwrites the process environment), then the
/// `TRACKSIDE_PAGING_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PagingConfig {
    /// Sort key used when a request names none.
    pub default_sort: String,
    /// Direction used when a request carries no `srdir`.
    pub default_direction: SortDir,
    /// Upper bound on page size. `None` leaves size unbounded.
    pub max_size: Option<u64>,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            default_sort: "updatedAt".to_string(),
            default_direction: SortDir::Desc,
            max_size: None,
        }
    }
}

#[derive(Deserialize)]
struct ConfigFile {
    #[serde(default)]
    paging: PagingConfig,
}

impl PagingConfig {
    /// Parse the `paging:` section of a YAML document. A missing section
    /// yields the defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let file: ConfigFile =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::Load(e.to_string()))?;
        Ok(file.paging)
    }

    /// Load from a YAML file (if it exists), then `.env`, then environment
    /// variables.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = if path.exists() {
            let content =
                std::fs::read_to_string(path).map_err(|e| ConfigError::Load(e.to_string()))?;
            Self::from_yaml_str(&content)?
        } else {
            Self::default()
        };

        let _ = dotenvy::dotenv();
        let config = config.overlay(|key| std::env::var(key).ok())?;
        tracing::debug!(
            default_sort = %config.default_sort,
            default_direction = %config.default_direction,
            max_size = ?config.max_size,
            "Paging configuration loaded"
        );
        Ok(config)
    }

    /// Overlay values from `lookup`, keyed by the `TRACKSIDE_PAGING_*` names.
    pub fn overlay(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(sort) = lookup(ENV_DEFAULT_SORT) {
            self.default_sort = sort;
        }
        if let Some(dir) = lookup(ENV_DEFAULT_DIRECTION) {
            self.default_direction = match dir.trim().to_ascii_uppercase().as_str() {
                "ASC" => SortDir::Asc,
                "DESC" => SortDir::Desc,
                _ => {
                    return Err(ConfigError::TypeMismatch {
                        key: ENV_DEFAULT_DIRECTION.to_string(),
                        expected: "ASC or DESC",
                    })
                }
            };
        }
        if let Some(max) = lookup(ENV_MAX_SIZE) {
            let max = max.trim().parse::<u64>().map_err(|_| ConfigError::TypeMismatch {
                key: ENV_MAX_SIZE.to_string(),
                expected: "unsigned integer",
            })?;
            self.max_size = Some(max);
        }
        Ok(self)
    }
}
