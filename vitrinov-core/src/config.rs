//! Configuration management
//!
//! Settings live in `settings.json` inside the data directory:
//! ```json
//! {
//!   "apiBaseUrl": "https://apivitrinovapp.clobitech.com",
//!   "tokenCheckPath": "/auth/check-token",
//!   "requestTimeoutSecs": 30,
//!   "searchDebounceMs": 320,
//!   "cacheDir": "/home/me/.vitrinov/cache"
//! }
//! ```
//! Keys this crate does not manage are preserved on save.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::services::token_guard::DEFAULT_TOKEN_CHECK_PATH;

pub const DEFAULT_API_BASE_URL: &str = "https://apivitrinovapp.clobitech.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_DEBOUNCE_MS: u64 = 320;

const SETTINGS_FILE: &str = "settings.json";

/// Data directory: `$VITRINOV_DIR`, else `~/.vitrinov`
pub fn data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("VITRINOV_DIR") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    dirs::home_dir()
        .map(|home| home.join(".vitrinov"))
        .context("Could not find home directory")
}

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token_check_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    request_timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    search_debounce_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cache_dir: Option<PathBuf>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Vitrinov configuration (resolved view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub api_base_url: String,
    pub token_check_path: String,
    pub request_timeout: Duration,
    pub search_debounce: Duration,
    pub cache_dir: PathBuf,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Config {
    /// Defaults rooted at `data_dir`
    pub fn defaults(data_dir: &Path) -> Self {
        Self::resolve(data_dir, SettingsFile::default())
    }

    /// Load config from the data directory
    ///
    /// A missing or corrupt settings file yields the defaults. The API base
    /// URL can be overridden with `VITRINOV_API_URL` (tests, staging); an
    /// invalid override is an error.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let mut config = Self::load_file(data_dir)?;

        if let Ok(url) = std::env::var("VITRINOV_API_URL") {
            let url = url.trim().trim_end_matches('/');
            if !url.is_empty() {
                validate_base_url(url)
                    .with_context(|| format!("Invalid VITRINOV_API_URL: {}", url))?;
                config.api_base_url = url.to_string();
            }
        }

        Ok(config)
    }

    /// Settings file only, ignoring environment overrides
    pub fn load_file(data_dir: &Path) -> Result<Self> {
        Ok(Self::resolve(data_dir, read_settings(data_dir)?))
    }

    fn resolve(data_dir: &Path, raw: SettingsFile) -> Self {
        // A stored URL that does not parse as http(s) reads as unset
        let api_base_url = raw
            .api_base_url
            .as_deref()
            .map(|u| u.trim().trim_end_matches('/'))
            .filter(|u| validate_base_url(u).is_ok())
            .unwrap_or(DEFAULT_API_BASE_URL)
            .to_string();

        let token_check_path = raw
            .token_check_path
            .clone()
            .filter(|p| p.starts_with('/'))
            .unwrap_or_else(|| DEFAULT_TOKEN_CHECK_PATH.to_string());

        let timeout_secs = raw
            .request_timeout_secs
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            data_dir: data_dir.to_path_buf(),
            api_base_url,
            token_check_path,
            request_timeout: Duration::from_secs(timeout_secs),
            search_debounce: Duration::from_millis(
                raw.search_debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS),
            ),
            cache_dir: raw
                .cache_dir
                .clone()
                .unwrap_or_else(|| data_dir.join("cache")),
            _raw_settings: raw,
        }
    }

    /// Save config to the data directory
    /// Preserves other settings that the CLI doesn't manage
    pub fn save(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        let mut settings = read_settings(&self.data_dir)?;

        settings.api_base_url = Some(self.api_base_url.clone());
        settings.token_check_path = Some(self.token_check_path.clone());
        settings.request_timeout_secs = Some(self.request_timeout.as_secs());
        settings.search_debounce_ms = Some(self.search_debounce.as_millis() as u64);
        settings.cache_dir = Some(self.cache_dir.clone());

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(self.data_dir.join(SETTINGS_FILE), content)?;
        Ok(())
    }

    /// Point the client at another API server
    pub fn set_api_base_url(&mut self, url: &str) -> Result<()> {
        let url = url.trim().trim_end_matches('/');
        validate_base_url(url)?;
        self.api_base_url = url.to_string();
        Ok(())
    }
}

fn read_settings(data_dir: &Path) -> Result<SettingsFile> {
    let settings_path = data_dir.join(SETTINGS_FILE);
    if !settings_path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(&settings_path)?;
    Ok(serde_json::from_str(&content).unwrap_or_default())
}

fn validate_base_url(value: &str) -> Result<()> {
    let parsed = url::Url::parse(value)
        .with_context(|| format!("Invalid API base URL: {}", value))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!("API base URL must use http or https: {}", value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_when_missing() {
        let dir = TempDir::new().unwrap();
        let config = Config::defaults(dir.path());
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.token_check_path, DEFAULT_TOKEN_CHECK_PATH);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.search_debounce, Duration::from_millis(320));
        assert_eq!(config.cache_dir, dir.path().join("cache"));
    }

    #[test]
    fn test_corrupt_settings_fall_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "{not json").unwrap();
        let raw = read_settings(dir.path()).unwrap();
        let config = Config::resolve(dir.path(), raw);
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_invalid_stored_url_falls_back_to_default() {
        let dir = TempDir::new().unwrap();
        for stored in ["localhost:3000", "not a url", "ftp://files.example.com", "  "] {
            std::fs::write(
                dir.path().join(SETTINGS_FILE),
                serde_json::json!({ "apiBaseUrl": stored, "searchDebounceMs": 150 }).to_string(),
            )
            .unwrap();

            let config = Config::load_file(dir.path()).unwrap();
            assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL, "stored {:?}", stored);
            assert_eq!(config.search_debounce, Duration::from_millis(150));
        }
    }

    #[test]
    fn test_set_url_repairs_invalid_stored_url() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{"apiBaseUrl": "localhost:3000", "theme": "dark"}"#,
        )
        .unwrap();

        let mut config = Config::load_file(dir.path()).unwrap();
        config.set_api_base_url("http://localhost:3000").unwrap();
        config.save().unwrap();

        let reloaded = Config::load_file(dir.path()).unwrap();
        assert_eq!(reloaded.api_base_url, "http://localhost:3000");
        assert_eq!(reloaded._raw_settings.other["theme"], "dark");
    }

    #[test]
    fn test_reads_camel_case_and_trims_slash() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{"apiBaseUrl": "http://localhost:4000/", "requestTimeoutSecs": 5, "searchDebounceMs": 100}"#,
        )
        .unwrap();
        let config = Config::resolve(dir.path(), read_settings(dir.path()).unwrap());
        assert_eq!(config.api_base_url, "http://localhost:4000");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.search_debounce, Duration::from_millis(100));
    }

    #[test]
    fn test_save_preserves_unknown_keys() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{"theme": "dark", "searchDebounceMs": 200}"#,
        )
        .unwrap();

        let mut config = Config::resolve(dir.path(), read_settings(dir.path()).unwrap());
        config.set_api_base_url("https://staging.example.com/").unwrap();
        config.save().unwrap();

        let saved: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join(SETTINGS_FILE)).unwrap(),
        )
        .unwrap();
        assert_eq!(saved["theme"], "dark");
        assert_eq!(saved["apiBaseUrl"], "https://staging.example.com");
        assert_eq!(saved["searchDebounceMs"], 200);
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::defaults(dir.path());
        assert!(config.set_api_base_url("not a url").is_err());
        assert!(config.set_api_base_url("ftp://files.example.com").is_err());
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }
}
