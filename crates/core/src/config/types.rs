use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::inventory::{RankOptions, DEFAULT_LOCALE};
use crate::seating::DEFAULT_MAX_CHAIN_SIZE;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub selection: SelectionConfig,
    #[serde(default)]
    pub exclusion: ExclusionConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
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

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Database configuration (holds the exclusion store)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("seatscout.db")
}

/// How a chain is turned into the seats to submit.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Longest qualifying chain, capped to `max_chain_size`.
    #[default]
    Biggest,
    /// Random slice of a random chain.
    Random,
}

impl SelectionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionPolicy::Biggest => "biggest",
            SelectionPolicy::Random => "random",
        }
    }
}

/// Ranking and chain selection settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SelectionConfig {
    /// Count resale availability when ranking.
    #[serde(default)]
    pub consider_resale: bool,
    /// Locale of category and area names.
    #[serde(default = "default_locale")]
    pub locale: String,
    /// Most seats taken from one chain by the `biggest` policy.
    #[serde(default = "default_max_chain_size")]
    pub max_chain_size: usize,
    #[serde(default)]
    pub policy: SelectionPolicy,
    /// Seed for reproducible random picks. Entropy-seeded when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            consider_resale: false,
            locale: default_locale(),
            max_chain_size: default_max_chain_size(),
            policy: SelectionPolicy::default(),
            seed: None,
        }
    }
}

impl SelectionConfig {
    /// Ranking options derived from these settings.
    pub fn rank_options(&self) -> RankOptions {
        RankOptions::default()
            .with_resale(self.consider_resale)
            .with_locale(self.locale.clone())
    }
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

fn default_max_chain_size() -> usize {
    DEFAULT_MAX_CHAIN_SIZE
}

/// Exclusion set settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExclusionConfig {
    /// Seconds an attempted seat stays excluded.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for ExclusionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl ExclusionConfig {
    pub fn ttl(&self) -> chrono::Duration {
        let secs = i64::try_from(self.ttl_secs)
            .unwrap_or(i64::MAX)
            .min(i64::MAX / 1000);
        chrono::Duration::seconds(secs)
    }
}

fn default_ttl_secs() -> u64 {
    600
}

/// Config as served over the API (filesystem layout left out)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub selection: SelectionConfig,
    pub exclusion: ExclusionConfig,
    pub database_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            selection: config.selection.clone(),
            exclusion: config.exclusion.clone(),
            database_configured: !config.database.path.as_os_str().is_empty(),
        }
    }
}
