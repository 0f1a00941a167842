//! Configuration for little-story

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};

/// Configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub hearts: HeartsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP API binds to
    #[serde(default = "default_bind_addr")]
    pub bind_addr: IpAddr,

    /// HTTP API port
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding user.json, progress.json and (by default) stories/
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Story content directory, if it lives outside the data directory
    #[serde(default)]
    pub stories_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartsConfig {
    /// Hearts a fresh profile starts with, and the regeneration cap
    #[serde(default = "default_max_hearts")]
    pub max_hearts: u32,

    /// Seconds it takes to regenerate one heart
    #[serde(default = "default_regen_period")]
    pub regen_period_secs: u64,
}

fn default_bind_addr() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_http_port() -> u16 {
    8000
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_max_hearts() -> u32 {
    3
}

fn default_regen_period() -> u64 {
    4 * 3600
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            http_port: default_http_port(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            stories_dir: None,
        }
    }
}

impl Default for HeartsConfig {
    fn default() -> Self {
        Self {
            max_hearts: default_max_hearts(),
            regen_period_secs: default_regen_period(),
        }
    }
}

impl Config {
    /// Default configuration rooted at `data_dir`
    pub fn with_data_dir<P: Into<PathBuf>>(data_dir: P) -> Self {
        let mut config = Self::default();
        config.storage.data_dir = data_dir.into();
        config
    }

    /// Load config from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the heart arithmetic cannot work with
    pub fn validate(&self) -> Result<(), std::io::Error> {
        if self.hearts.regen_period_secs == 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "hearts.regen_period_secs must be greater than 0",
            ));
        }
        Ok(())
    }

    /// Save config to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), std::io::Error> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Get persisted profile path
    pub fn user_file(&self) -> PathBuf {
        self.storage.data_dir.join("user.json")
    }

    /// Get persisted progress path
    pub fn progress_file(&self) -> PathBuf {
        self.storage.data_dir.join("progress.json")
    }

    /// Get story content directory
    pub fn stories_dir(&self) -> PathBuf {
        self.storage
            .stories_dir
            .clone()
            .unwrap_or_else(|| self.storage.data_dir.join("stories"))
    }

    /// Regeneration period in seconds, as used by the heart arithmetic
    pub fn regen_period(&self) -> f64 {
        self.hearts.regen_period_secs as f64
    }
}
