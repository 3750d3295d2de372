use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Configuration for the mallctl admin service
///
/// Resolution order (highest wins): CLI flags, environment variables,
/// `~/.mallctl/config.toml`, built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MallConfig {
    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub database: DatabaseSection,

    #[serde(default)]
    pub share: ShareSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,

    /// Allow any CORS origin instead of localhost only
    #[serde(default)]
    pub cors_permissive: bool,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            cors_permissive: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSection {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShareSection {
    /// Base URL share images are served from; unset disables share URLs
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

fn default_max_connections() -> u32 {
    5
}

impl MallConfig {
    /// Load config from ~/.mallctl/config.toml, falling back to defaults
    /// when the file does not exist, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        let mut config = if config_path.exists() {
            Self::load_from(&config_path)?
        } else {
            debug!("No config at {}, using defaults", config_path.display());
            Self::default()
        };

        config.apply_env()?;
        Ok(config)
    }

    /// Load config from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_toml(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file (invalid TOML)")
    }

    /// Get config directory: ~/.mallctl
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".mallctl")
    }

    /// Get config file path: ~/.mallctl/config.toml
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Apply `DATABASE_URL`, `MALLCTL_BIND` and `MALLCTL_SHARE_BASE_URL`.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable source.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.is_empty()) {
            self.database.url = Some(url);
        }

        if let Some(bind) = lookup("MALLCTL_BIND").filter(|v| !v.is_empty()) {
            self.server.bind = bind
                .parse()
                .context(format!("MALLCTL_BIND is not a socket address: {}", bind))?;
        }

        if let Some(base) = lookup("MALLCTL_SHARE_BASE_URL").filter(|v| !v.is_empty()) {
            self.share.base_url = Some(base);
        }

        Ok(())
    }

    /// Render as TOML (for `mallctl config show`).
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

/// Load environment variables from .env files
///
/// Priority order (highest to lowest):
/// 1. Variables already set in the environment
/// 2. Current directory .env
/// 3. ~/.mallctl/.env
///
/// Called before tracing is installed, so it returns the files it read for
/// the caller to log.
pub fn load_dotenv() -> Vec<PathBuf> {
    let mut loaded_from = Vec::new();

    if let Ok(path) = dotenvy::dotenv() {
        loaded_from.push(path);
    }

    let env_file = MallConfig::config_dir().join(".env");
    // dotenvy doesn't overwrite existing vars
    if env_file.exists() && dotenvy::from_path(&env_file).is_ok() {
        loaded_from.push(env_file);
    }

    loaded_from
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn empty_file_gives_defaults() {
        let config = MallConfig::from_toml("").unwrap();
        assert_eq!(config, MallConfig::default());
        assert_eq!(config.server.bind.port(), 8080);
        assert_eq!(config.database.max_connections, 5);
        assert!(config.share.base_url.is_none());
    }

    #[test]
    fn parses_all_sections() {
        let config = MallConfig::from_toml(
            r#"
            [server]
            bind = "0.0.0.0:9000"
            cors_permissive = true

            [database]
            url = "postgres://localhost/mall"
            max_connections = 12

            [share]
            base_url = "https://cdn.example.com/share"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.bind.port(), 9000);
        assert!(config.server.cors_permissive);
        assert_eq!(config.database.url.as_deref(), Some("postgres://localhost/mall"));
        assert_eq!(config.database.max_connections, 12);
        assert_eq!(
            config.share.base_url.as_deref(),
            Some("https://cdn.example.com/share")
        );
    }

    #[test]
    fn rejects_invalid_toml() {
        assert!(MallConfig::from_toml("[server\nbind=").is_err());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[database]\nmax_connections = 2").unwrap();

        let config = MallConfig::load_from(file.path()).unwrap();
        assert_eq!(config.database.max_connections, 2);
    }

    #[test]
    fn load_from_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(MallConfig::load_from(&dir.path().join("nope.toml")).is_err());
    }

    #[test]
    fn overrides_win_over_file() {
        let vars: HashMap<&str, &str> = [
            ("DATABASE_URL", "postgres://db/override"),
            ("MALLCTL_BIND", "127.0.0.1:4000"),
            ("MALLCTL_SHARE_BASE_URL", ""),
        ]
        .into_iter()
        .collect();

        let mut config = MallConfig::from_toml("[share]\nbase_url = \"https://keep\"").unwrap();
        config
            .apply_overrides(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.database.url.as_deref(), Some("postgres://db/override"));
        assert_eq!(config.server.bind.port(), 4000);
        // empty variables do not clear file values
        assert_eq!(config.share.base_url.as_deref(), Some("https://keep"));
    }

    #[test]
    fn bad_bind_override_is_an_error() {
        let mut config = MallConfig::default();
        let result = config.apply_overrides(|k| {
            (k == "MALLCTL_BIND").then(|| "not-an-address".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn round_trips_through_toml() {
        let mut config = MallConfig::default();
        config.database.url = Some("postgres://x".into());
        let rendered = config.to_toml().unwrap();
        assert_eq!(MallConfig::from_toml(&rendered).unwrap(), config);
    }
}
