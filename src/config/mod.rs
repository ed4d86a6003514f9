use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use url::Url;

use crate::captions::LanguagePreference;
use crate::fetch::DEFAULT_RELAY_PREFIX;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Intermediary transcript service
    pub server: ServerConfig,

    /// Cross-origin relay used by the direct parser
    pub relay: RelayConfig,

    /// Caption language preference
    pub languages: LanguagePreference,

    /// HTTP client settings
    pub http: HttpConfig,

    /// Settings for `transcript serve`
    pub serve: ServeConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL under which `/transcript` is mounted
    pub base_url: String,

    /// Try the intermediary before parsing the page directly
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Prefix the url-encoded target is appended to
    pub url_prefix: String,

    /// Disable to fetch the platform directly
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// User agent sent with every request
    pub user_agent: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServeConfig {
    /// Listen address
    pub bind: SocketAddr,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                base_url: "http://127.0.0.1:8888".to_string(),
                enabled: true,
            },
            relay: RelayConfig {
                url_prefix: DEFAULT_RELAY_PREFIX.to_string(),
                enabled: true,
            },
            languages: LanguagePreference::default(),
            http: HttpConfig {
                timeout_secs: 30,
                user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36".to_string(),
            },
            serve: ServeConfig {
                bind: SocketAddr::from(([127, 0, 0, 1], 8888)),
            },
        }
    }
}

impl Config {
    /// Load configuration from file or create default
    pub async fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    /// Read and validate a specific config file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs_err::read_to_string(path).context("Failed to read config file")?;

        let config: Config =
            serde_yaml::from_str(&content).context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub async fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;

        fs_err::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Get configuration file path
    pub fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir().context("Could not determine config directory")?;

        Ok(config_dir.join("transcript-cascade").join("config.yaml"))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.server.base_url)
            .with_context(|| format!("Invalid server base URL: {}", self.server.base_url))?;

        if self.relay.enabled {
            Url::parse(&self.relay.url_prefix)
                .with_context(|| format!("Invalid relay prefix: {}", self.relay.url_prefix))?;
        }

        if self.languages.primary.trim().is_empty() || self.languages.secondary.trim().is_empty() {
            anyhow::bail!("Both primary and secondary languages must be configured");
        }

        if self.http.timeout_secs == 0 {
            anyhow::bail!("HTTP timeout must be at least one second");
        }

        Ok(())
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Server: {} ({})", self.server.base_url, enabled(self.server.enabled));
        println!("  Relay: {} ({})", self.relay.url_prefix, enabled(self.relay.enabled));
        println!(
            "  Languages: {} -> {} -> auto",
            self.languages.primary, self.languages.secondary
        );
        println!("  HTTP Timeout: {}s", self.http.timeout_secs);
        println!("  Serve Address: {}", self.serve.bind);
    }
}

fn enabled(flag: bool) -> &'static str {
    if flag {
        "enabled"
    } else {
        "disabled"
    }
}
