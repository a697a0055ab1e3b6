use crate::types::Preference;
use anyhow::{Context, Result, bail};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Defaults compiled into the binary for targets that ship without a `.env`.
pub const BUNDLED_DEFAULTS: &str = include_str!("../assets/config.env");

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Base URL of the query service, without a trailing slash.
    pub api_base: String,
    pub data_dir: PathBuf,
    /// Ambient theme reported when the platform offers no signal of its own.
    pub system_theme: Preference,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            data_dir: default_data_dir(),
            system_theme: Preference::default(),
        }
    }
}

impl Config {
    /// Build configuration from `COURSECHAT_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any `COURSECHAT_*` source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(base) = lookup("COURSECHAT_API_BASE") {
            config.api_base = normalize_api_base(&base)?;
        }
        if let Some(dir) = lookup("COURSECHAT_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(theme) = lookup("COURSECHAT_SYSTEM_THEME") {
            config.system_theme = theme
                .parse()
                .with_context(|| "invalid COURSECHAT_SYSTEM_THEME")?;
        }

        Ok(config)
    }
}

/// Populate the process environment before [`Config::from_env`] runs.
///
/// A `.env` file is read first where there is a filesystem, then
/// [`BUNDLED_DEFAULTS`] fills whatever is still unset. Variables that are
/// already set are never overridden.
pub fn load_env_files() -> Result<()> {
    load_dotenv_file()?;
    dotenvy::from_read(BUNDLED_DEFAULTS.as_bytes()).context("invalid bundled config.env")
}

#[cfg(not(target_arch = "wasm32"))]
fn load_dotenv_file() -> Result<()> {
    match dotenvy::dotenv() {
        Ok(_) => Ok(()),
        Err(err) if err.not_found() => Ok(()),
        Err(err) => Err(err).context("failed to read .env"),
    }
}

#[cfg(target_arch = "wasm32")]
fn load_dotenv_file() -> Result<()> {
    Ok(())
}

/// The `KEY=value` pairs of [`BUNDLED_DEFAULTS`], in file order.
pub fn bundled_defaults() -> Result<Vec<(String, String)>> {
    dotenvy::from_read_iter(BUNDLED_DEFAULTS.as_bytes())
        .map(|item| item.context("invalid bundled config.env"))
        .collect()
}

pub fn normalize_api_base(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = reqwest::Url::parse(trimmed)
        .with_context(|| format!("invalid COURSECHAT_API_BASE: {trimmed}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("COURSECHAT_API_BASE must be an http(s) URL, got {}", url.scheme());
    }
    Ok(trimmed.to_string())
}

fn default_data_dir() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        return data_dir.join("coursechat");
    }

    PathBuf::from("cache")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_base_loses_trailing_slash() {
        assert_eq!(
            normalize_api_base("https://example.com/app/").unwrap(),
            "https://example.com/app"
        );
    }

    #[test]
    fn api_base_rejects_non_http_schemes() {
        assert!(normalize_api_base("ftp://example.com").is_err());
        assert!(normalize_api_base("not a url").is_err());
    }

    #[test]
    fn bundled_defaults_are_a_valid_config() {
        let defaults = bundled_defaults().unwrap();
        assert!(defaults.iter().all(|(key, _)| key.starts_with("COURSECHAT_")));

        let config = Config::from_lookup(|key| {
            defaults
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        })
        .unwrap();
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.system_theme, Preference::Dark);
    }

    #[test]
    fn lookup_values_override_defaults() {
        let config = Config::from_lookup(|key| match key {
            "COURSECHAT_API_BASE" => Some("https://courses.example.com/".to_string()),
            "COURSECHAT_SYSTEM_THEME" => Some("Light".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.api_base, "https://courses.example.com");
        assert_eq!(config.system_theme, Preference::Light);
    }

    #[test]
    fn lookup_rejects_unknown_theme() {
        let result = Config::from_lookup(|key| {
            (key == "COURSECHAT_SYSTEM_THEME").then(|| "sepia".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn default_points_at_local_service() {
        let config = Config::default();
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.system_theme, Preference::Dark);
    }
}
