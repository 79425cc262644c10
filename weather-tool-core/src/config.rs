use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

pub const API_KEY_VAR: &str = "OPENWEATHERMAP_API_KEY";
pub const PORT_VAR: &str = "PORT";

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const OPENWEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
const OPENMETEO_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Top-level configuration, stored on disk and overridable from the environment.
///
/// Example TOML:
/// ```toml
/// openweathermap_api_key = "..."
/// port = 3000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Presence of a non-blank key switches lookups from fallback to live mode.
    pub openweathermap_api_key: Option<String>,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub openweather_url: String,
    pub openmeteo_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openweathermap_api_key: None,
            port: DEFAULT_PORT,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            openweather_url: OPENWEATHER_URL.to_string(),
            openmeteo_url: OPENMETEO_URL.to_string(),
        }
    }
}

impl Config {
    /// Load config from disk (or defaults on first run), then apply
    /// `OPENWEATHERMAP_API_KEY` from the process environment.
    ///
    /// `PORT` is only read by [`Config::serve_port`], so a bad value cannot
    /// break commands that never bind a socket.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Ok(Self::load_from(&path)?.with_env_overrides(|name| std::env::var(name).ok()))
    }

    /// Load config from `path`, returning defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Apply the API key override from an environment lookup.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_VAR) {
            self.openweathermap_api_key = Some(key);
        }

        self
    }

    /// Port to listen on: `PORT` from the lookup if set, else the configured port.
    pub fn serve_port<F>(&self, lookup: F) -> Result<u16>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(PORT_VAR) {
            Some(port) => port
                .trim()
                .parse()
                .with_context(|| format!("Invalid {PORT_VAR} value '{port}'")),
            None => Ok(self.port),
        }
    }

    /// Save config to the platform config file.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-tool", "weather-tool")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// The credential, if configured and not blank.
    pub fn api_key(&self) -> Option<&str> {
        self.openweathermap_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.openweathermap_api_key = Some(api_key);
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_have_no_api_key() {
        let cfg = Config::default();
        assert!(cfg.api_key().is_none());
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let mut cfg = Config::default();
        cfg.set_api_key("   ".into());
        assert!(cfg.api_key().is_none());

        cfg.set_api_key(" KEY ".into());
        assert_eq!(cfg.api_key(), Some("KEY"));
    }

    #[test]
    fn env_overrides_key() {
        let cfg = Config::default().with_env_overrides(env(&[(API_KEY_VAR, "ENV_KEY")]));

        assert_eq!(cfg.api_key(), Some("ENV_KEY"));
    }

    #[test]
    fn env_without_vars_keeps_file_values() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());

        let cfg = cfg.with_env_overrides(env(&[]));
        assert_eq!(cfg.api_key(), Some("FILE_KEY"));
        assert_eq!(cfg.serve_port(env(&[])).unwrap(), 3000);
    }

    #[test]
    fn serve_port_reads_env() {
        let cfg = Config::default();
        assert_eq!(cfg.serve_port(env(&[(PORT_VAR, " 8080 ")])).unwrap(), 8080);
    }

    #[test]
    fn invalid_port_only_fails_serve_port() {
        let vars = [(API_KEY_VAR, "KEY"), (PORT_VAR, "eighty")];
        let cfg = Config::default().with_env_overrides(env(&vars));
        assert_eq!(cfg.api_key(), Some("KEY"));

        let err = cfg.serve_port(env(&vars)).unwrap_err();
        assert!(err.to_string().contains("Invalid PORT value"));
    }

    #[test]
    fn save_and_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_api_key("SAVED".into());
        cfg.port = 4000;
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "port = 5000\n").unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.port, 5000);
        assert_eq!(loaded.openweather_url, OPENWEATHER_URL);
        assert!(loaded.api_key().is_none());
    }
}
