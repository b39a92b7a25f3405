use std::path::{Path, PathBuf};
use std::time::Duration;

use arrbridge_api::{BackendConfig, EndpointConfig};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::BridgeError;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub radarr: EndpointConfig,
    pub sonarr: EndpointConfig,
    /// Accepted for compatibility; no operation calls TVDB directly.
    pub tvdb_api_key: Option<String>,
    pub quality_profile_id: u32,
    pub request_timeout_secs: u64,
    pub log_filter: String,
}

impl AppConfig {
    /// Load config: built-in defaults, then the user file (explicit path or
    /// the platform config dir), then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, BridgeError> {
        let mut table = parse_table(DEFAULT_CONFIG)?;

        let user_path = match path {
            Some(p) if !p.exists() => {
                return Err(BridgeError::Config(format!(
                    "config file not found: {}",
                    p.display()
                )));
            }
            Some(p) => Some(p.to_path_buf()),
            None => Some(Self::config_path()).filter(|p| p.exists()),
        };

        if let Some(user_path) = user_path {
            tracing::debug!(path = %user_path.display(), "Loading user config");
            let user = parse_table(&std::fs::read_to_string(&user_path)?)?;
            merge(&mut table, user);
        }

        let mut config: AppConfig = toml::Value::Table(table)
            .try_into()
            .map_err(|e: toml::de::Error| BridgeError::Config(e.to_string()))?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `RADARR_*` / `SONARR_*` style overrides from `lookup`.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), BridgeError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(url) = non_empty("RADARR_URL") {
            self.radarr.url = url;
        }
        if let Some(key) = lookup("RADARR_API_KEY") {
            self.radarr.api_key = key;
        }
        if let Some(folder) = lookup("RADARR_ROOT_FOLDER") {
            self.radarr.root_folder = Some(folder).filter(|f| !f.is_empty());
        }
        if let Some(url) = non_empty("SONARR_URL") {
            self.sonarr.url = url;
        }
        if let Some(key) = lookup("SONARR_API_KEY") {
            self.sonarr.api_key = key;
        }
        if let Some(folder) = lookup("SONARR_ROOT_FOLDER") {
            self.sonarr.root_folder = Some(folder).filter(|f| !f.is_empty());
        }
        if let Some(key) = lookup("TVDB_API_KEY") {
            self.tvdb_api_key = Some(key).filter(|k| !k.is_empty());
        }
        if let Some(id) = non_empty("QUALITY_PROFILE_ID") {
            self.quality_profile_id = id
                .parse()
                .map_err(|_| BridgeError::Config(format!("invalid QUALITY_PROFILE_ID: {id}")))?;
        }
        if let Some(secs) = non_empty("ARRBRIDGE_TIMEOUT_SECS") {
            self.request_timeout_secs = secs.parse().map_err(|_| {
                BridgeError::Config(format!("invalid ARRBRIDGE_TIMEOUT_SECS: {secs}"))
            })?;
        }
        Ok(())
    }

    /// The immutable backend settings handed to the client.
    pub fn backend_config(&self) -> BackendConfig {
        BackendConfig {
            movie: self.radarr.clone(),
            series: self.sonarr.clone(),
            quality_profile_id: self.quality_profile_id,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", "arrbridge")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}

fn parse_table(s: &str) -> Result<toml::Table, BridgeError> {
    s.parse::<toml::Table>()
        .map_err(|e| BridgeError::Config(e.to_string()))
}

/// Recursively overlay `over` onto `base`; nested tables merge key by key.
fn merge(base: &mut toml::Table, over: toml::Table) {
    for (key, value) in over {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config_parses() {
        let config = AppConfig::default();
        assert_eq!(config.radarr.url, "http://localhost:7878");
        assert_eq!(config.sonarr.url, "http://localhost:8989");
        assert!(config.radarr.api_key.is_empty());
        assert_eq!(config.quality_profile_id, 1);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.radarr.root_folder.is_none());
        assert!(config.tvdb_api_key.is_none());
    }

    #[test]
    fn test_user_table_merges_over_defaults() {
        let mut table = parse_table(DEFAULT_CONFIG).unwrap();
        let user = parse_table(
            r#"
            quality_profile_id = 4

            [radarr]
            api_key = "abc"
            root_folder = "/storage/movies"
            "#,
        )
        .unwrap();
        merge(&mut table, user);

        let config: AppConfig = toml::Value::Table(table).try_into().unwrap();
        assert_eq!(config.quality_profile_id, 4);
        assert_eq!(config.radarr.api_key, "abc");
        assert_eq!(config.radarr.url, "http://localhost:7878");
        assert_eq!(config.radarr.root_folder.as_deref(), Some("/storage/movies"));
        assert_eq!(config.sonarr.url, "http://localhost:8989");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config
            .apply_env(env(&[
                ("RADARR_URL", "http://nas:7878"),
                ("RADARR_API_KEY", "r-key"),
                ("SONARR_API_KEY", "s-key"),
                ("SONARR_ROOT_FOLDER", "/storage/anime"),
                ("TVDB_API_KEY", "tvdb"),
                ("QUALITY_PROFILE_ID", "6"),
            ]))
            .unwrap();

        assert_eq!(config.radarr.url, "http://nas:7878");
        assert_eq!(config.radarr.api_key, "r-key");
        assert_eq!(config.sonarr.api_key, "s-key");
        assert_eq!(config.sonarr.root_folder.as_deref(), Some("/storage/anime"));
        assert_eq!(config.tvdb_api_key.as_deref(), Some("tvdb"));

        let backends = config.backend_config();
        assert_eq!(backends.quality_profile_id, 6);
        assert_eq!(backends.movie.url, "http://nas:7878");
        assert_eq!(backends.series.api_key, "s-key");
    }

    #[test]
    fn test_empty_env_values_clear_optional_fields() {
        let mut config = AppConfig::default();
        config.radarr.root_folder = Some("/movies".into());
        config
            .apply_env(env(&[("RADARR_ROOT_FOLDER", ""), ("RADARR_URL", "")]))
            .unwrap();
        assert!(config.radarr.root_folder.is_none());
        assert_eq!(config.radarr.url, "http://localhost:7878");
    }

    #[test]
    fn test_invalid_quality_profile_is_config_error() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env(env(&[("QUALITY_PROFILE_ID", "hd")]))
            .unwrap_err();
        assert!(matches!(err, BridgeError::Config(_)));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/arrbridge.toml"))).unwrap_err();
        assert!(matches!(err, BridgeError::Config(_)));
    }
}
