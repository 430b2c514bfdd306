use std::path::PathBuf;

use crate::error::CatalogError;

pub const ENV_URL: &str = "POSTER_BORDER_URL";
pub const ENV_TOKEN: &str = "POSTER_BORDER_TOKEN";
pub const ENV_TOKEN_HEADER: &str = "POSTER_BORDER_TOKEN_HEADER";
pub const ENV_TIMEOUT: &str = "POSTER_BORDER_TIMEOUT";

pub const DEFAULT_TOKEN_HEADER: &str = "X-Plex-Token";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the media catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Server base URL without trailing slash (e.g. `http://127.0.0.1:32400`)
    pub base_url: String,
    pub token: String,
    /// Request header that carries the access token
    pub token_header: String,
    pub timeout_secs: u64,
}

/// Where a config field's value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Loaded from an environment variable.
    EnvVar(&'static str),
    /// Loaded from the config file.
    ConfigFile,
    /// Built-in default value.
    Default,
    /// Not set anywhere.
    Missing,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EnvVar(var) => write!(f, "env ${}", var),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
            Self::Missing => write!(f, "not set"),
        }
    }
}

/// Provenance of each config field.
#[derive(Debug)]
pub struct ConfigSources {
    pub base_url: ConfigSource,
    pub token: ConfigSource,
    pub token_header: ConfigSource,
    pub timeout_secs: ConfigSource,
}

/// TOML config file format.
#[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
struct ConfigFile {
    catalog: Option<CatalogFileConfig>,
}

/// The `[catalog]` table of the config file.
#[derive(Debug, Default, Clone, serde::Deserialize, serde::Serialize)]
pub struct CatalogFileConfig {
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub token_header: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl CatalogConfig {
    /// Load settings from environment variables and the config file.
    ///
    /// Priority: env vars > config file > defaults.
    /// Required: base_url, token.
    pub fn load() -> Result<Self, CatalogError> {
        let file = load_config_file();
        Self::resolve(|key| std::env::var(key).ok(), file.as_ref())
    }

    /// Resolve settings from an environment lookup and optional file values.
    pub fn resolve(
        env: impl Fn(&str) -> Option<String>,
        file: Option<&CatalogFileConfig>,
    ) -> Result<Self, CatalogError> {
        let var = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let base_url = var(ENV_URL)
            .or_else(|| file.and_then(|c| c.base_url.clone()))
            .ok_or_else(|| {
                CatalogError::Config(format!(
                    "Missing base_url. Set {ENV_URL} env var or add to config file"
                ))
            })?;
        let base_url = normalize_base_url(&base_url)?;

        let token = var(ENV_TOKEN)
            .or_else(|| file.and_then(|c| c.token.clone()))
            .ok_or_else(|| {
                CatalogError::Config(format!(
                    "Missing token. Set {ENV_TOKEN} env var or add to config file"
                ))
            })?;

        let token_header = var(ENV_TOKEN_HEADER)
            .or_else(|| file.and_then(|c| c.token_header.clone()))
            .unwrap_or_else(|| DEFAULT_TOKEN_HEADER.to_string());

        let timeout_secs = match var(ENV_TIMEOUT) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                CatalogError::Config(format!(
                    "{ENV_TIMEOUT} must be a whole number of seconds, got \"{raw}\""
                ))
            })?,
            None => file
                .and_then(|c| c.timeout_secs)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        };
        if timeout_secs == 0 {
            return Err(CatalogError::Config(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            base_url,
            token: token.trim().to_string(),
            token_header,
            timeout_secs,
        })
    }
}

/// Check the URL scheme and strip trailing slashes so paths can be appended.
pub(crate) fn normalize_base_url(raw: &str) -> Result<String, CatalogError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(CatalogError::Config(format!(
            "base_url must start with http:// or https://, got \"{raw}\""
        )));
    }
    Ok(trimmed.to_string())
}

/// Return the path to the config file.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("poster-border").join("config.toml"))
}

/// Save settings to the config file, creating parent directories as needed.
///
/// Fields equal to their defaults are left out of the file.
/// Returns the path the file was written to.
pub fn save_to_file(config: &CatalogConfig) -> Result<PathBuf, CatalogError> {
    let path = config_path().ok_or_else(|| {
        CatalogError::Config("Could not determine config directory".to_string())
    })?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(&path, to_toml(config)?)?;
    Ok(path)
}

pub(crate) fn to_toml(config: &CatalogConfig) -> Result<String, CatalogError> {
    let file = ConfigFile {
        catalog: Some(CatalogFileConfig {
            base_url: Some(config.base_url.clone()),
            token: Some(config.token.clone()),
            token_header: if config.token_header == DEFAULT_TOKEN_HEADER {
                None
            } else {
                Some(config.token_header.clone())
            },
            timeout_secs: if config.timeout_secs == DEFAULT_TIMEOUT_SECS {
                None
            } else {
                Some(config.timeout_secs)
            },
        }),
    };

    toml::to_string_pretty(&file)
        .map_err(|e| CatalogError::Config(format!("Failed to serialize config: {}", e)))
}

pub(crate) fn parse_toml(content: &str) -> Result<Option<CatalogFileConfig>, CatalogError> {
    let file: ConfigFile = toml::from_str(content)
        .map_err(|e| CatalogError::Config(format!("Invalid config file: {}", e)))?;
    Ok(file.catalog)
}

/// Determine where each config field is coming from.
pub fn config_sources() -> ConfigSources {
    let file = load_config_file();
    sources_from(|key| std::env::var(key).ok(), file.as_ref())
}

pub(crate) fn sources_from(
    env: impl Fn(&str) -> Option<String>,
    file: Option<&CatalogFileConfig>,
) -> ConfigSources {
    let from_env = |var: &'static str| env(var).filter(|v| !v.trim().is_empty()).is_some();

    let pick = |var: &'static str, in_file: bool, has_default: bool| {
        if from_env(var) {
            ConfigSource::EnvVar(var)
        } else if in_file {
            ConfigSource::ConfigFile
        } else if has_default {
            ConfigSource::Default
        } else {
            ConfigSource::Missing
        }
    };

    ConfigSources {
        base_url: pick(ENV_URL, file.and_then(|c| c.base_url.as_ref()).is_some(), false),
        token: pick(ENV_TOKEN, file.and_then(|c| c.token.as_ref()).is_some(), false),
        token_header: pick(
            ENV_TOKEN_HEADER,
            file.and_then(|c| c.token_header.as_ref()).is_some(),
            true,
        ),
        timeout_secs: pick(ENV_TIMEOUT, file.and_then(|c| c.timeout_secs).is_some(), true),
    }
}

/// Read the `[catalog]` table of the config file, if there is one.
pub fn file_config() -> Option<CatalogFileConfig> {
    load_config_file()
}

fn load_config_file() -> Option<CatalogFileConfig> {
    let path = config_path()?;
    let content = std::fs::read_to_string(&path).ok()?;
    match parse_toml(&content) {
        Ok(catalog) => catalog,
        Err(e) => {
            log::warn!("Ignoring {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
