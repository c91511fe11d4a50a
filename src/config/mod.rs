use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub media: MediaConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteConfig {
    /// Public base URL of the running server, used by `taxa doctor` to
    /// probe media reachability.
    pub url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub path: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MediaConfig {
    pub upload_dir: String,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&raw)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.site.url.starts_with("http://") && !self.site.url.starts_with("https://") {
            anyhow::bail!("site.url must start with http:// or https://");
        }
        if self.database.path.trim().is_empty() {
            anyhow::bail!("database.path must not be empty");
        }
        if self.database.pool_size == 0 {
            anyhow::bail!("database.pool_size must be at least 1");
        }
        if self.media.upload_dir.trim().is_empty() {
            anyhow::bail!("media.upload_dir must not be empty");
        }
        Ok(())
    }

    /// Base URL with any trailing slash removed, for joining paths.
    pub fn base_url(&self) -> &str {
        self.site.url.trim_end_matches('/')
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site: SiteConfig {
                url: "http://127.0.0.1:3000".to_string(),
            },
            server: ServerConfig::default(),
            database: DatabaseConfig {
                path: "data/taxa.db".to_string(),
                pool_size: default_pool_size(),
            },
            media: MediaConfig {
                upload_dir: "data/media".to_string(),
            },
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_pool_size() -> u32 {
    10
}
