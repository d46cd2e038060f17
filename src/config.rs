use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Browser engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the source registry document (default: "files/repo.json")
    #[serde(default = "default_registry_path")]
    pub registry_path: PathBuf,
    /// Base URL of the CORS proxy relay (default: allorigins)
    #[serde(default = "default_proxy_base")]
    pub proxy_base: String,
    /// Per-attempt request timeout in seconds (default: 15)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Base address of the install confirmation page (default: "install.html")
    #[serde(default = "default_install_page")]
    pub install_page: String,
}

fn default_registry_path() -> PathBuf {
    PathBuf::from("files/repo.json")
}

fn default_proxy_base() -> String {
    "https://api.allorigins.win/get".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_install_page() -> String {
    "install.html".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry_path: default_registry_path(),
            proxy_base: default_proxy_base(),
            timeout_secs: default_timeout_secs(),
            install_page: default_install_page(),
        }
    }
}

impl Config {
    /// Load configuration from file, environment, and CLI arguments
    pub fn load(
        config_path: Option<&PathBuf>,
        cli_registry_path: Option<&PathBuf>,
        cli_proxy_base: Option<&str>,
        cli_timeout_secs: Option<u64>,
    ) -> anyhow::Result<Self> {
        // Start with default config
        let mut config = if let Some(path) = config_path {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)?
        } else {
            // Try default config file
            if let Ok(content) = std::fs::read_to_string("shopfront.toml") {
                toml::from_str(&content)?
            } else {
                Config::default()
            }
        };

        // Override with environment variables
        if let Ok(path) = std::env::var("SHOPFRONT_REGISTRY_PATH") {
            config.registry_path = PathBuf::from(path);
        }
        if let Ok(base) = std::env::var("SHOPFRONT_PROXY_BASE") {
            config.proxy_base = base;
        }
        if let Ok(secs) = std::env::var("SHOPFRONT_TIMEOUT_SECS") {
            if let Ok(s) = secs.parse() {
                config.timeout_secs = s;
            }
        }

        // Override with CLI arguments
        if let Some(path) = cli_registry_path {
            config.registry_path = path.clone();
        }
        if let Some(base) = cli_proxy_base {
            config.proxy_base = base.to_string();
        }
        if let Some(secs) = cli_timeout_secs {
            config.timeout_secs = secs;
        }

        Ok(config)
    }

    /// Bounded per-attempt timeout for every network strategy.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_complete() {
        let config = Config::default();
        assert_eq!(config.registry_path, PathBuf::from("files/repo.json"));
        assert!(config.proxy_base.starts_with("https://"));
        assert_eq!(config.timeout(), Duration::from_secs(15));
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: Config = toml::from_str(r#"proxy_base = "https://relay.example/get""#).unwrap();
        assert_eq!(config.proxy_base, "https://relay.example/get");
        assert_eq!(config.timeout_secs, 15);
        assert_eq!(config.install_page, "install.html");
    }

    #[test]
    fn explicit_config_file_is_honored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shopfront.toml");
        std::fs::write(&path, "registry_path = \"custom/repo.json\"\ntimeout_secs = 5\n").unwrap();

        let config = Config::load(Some(&path), None, None, None).unwrap();
        assert_eq!(config.registry_path, PathBuf::from("custom/repo.json"));
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn cli_arguments_override_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shopfront.toml");
        std::fs::write(&path, "timeout_secs = 5\n").unwrap();

        let registry = PathBuf::from("cli/repo.json");
        let config =
            Config::load(Some(&path), Some(&registry), Some("https://cli.example/get"), Some(30))
                .unwrap();
        assert_eq!(config.registry_path, registry);
        assert_eq!(config.proxy_base, "https://cli.example/get");
        assert_eq!(config.timeout_secs, 30);
    }
}
