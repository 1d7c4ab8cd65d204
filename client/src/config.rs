//! Client configuration

use anyhow::{Context, Result};
use credfeed_common::ids;
use serde::{Deserialize, Serialize};
use solana_sdk::{pubkey, pubkey::Pubkey};
use std::fmt;
use std::str::FromStr;

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "CREDFEED_CONFIG";

/// Config file used when `CREDFEED_CONFIG` is unset
pub const DEFAULT_CONFIG_PATH: &str = "credfeed.toml";

/// Umbra/USDC pull feed on devnet
pub const UMBRA_DEVNET_FEED: Pubkey = pubkey!("9n3z7h9FsrdN9FQgBWayeEMsZiGy4kewinoMvBACzRfh");

/// Cluster name as the simulation service and crossbar spell it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cluster {
    Mainnet,
    Devnet,
}

impl Cluster {
    /// Spelling expected by `/api/simulate`
    pub fn simulate_name(&self) -> &'static str {
        match self {
            Cluster::Mainnet => "Mainnet",
            Cluster::Devnet => "Devnet",
        }
    }

    /// Spelling expected by crossbar routes
    pub fn network_name(&self) -> &'static str {
        match self {
            Cluster::Mainnet => "mainnet",
            Cluster::Devnet => "devnet",
        }
    }

    pub fn switchboard_program(&self) -> Pubkey {
        match self {
            Cluster::Mainnet => ids::SWITCHBOARD_MAINNET_PROGRAM_ID,
            Cluster::Devnet => ids::SWITCHBOARD_DEVNET_PROGRAM_ID,
        }
    }

    pub fn default_queue(&self) -> Pubkey {
        match self {
            Cluster::Mainnet => ids::SWITCHBOARD_MAINNET_QUEUE,
            Cluster::Devnet => ids::SWITCHBOARD_DEVNET_QUEUE,
        }
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.network_name())
    }
}

impl FromStr for Cluster {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "mainnet-beta" => Ok(Cluster::Mainnet),
            "devnet" => Ok(Cluster::Devnet),
            other => Err(format!("unknown cluster: {}", other)),
        }
    }
}

/// Parameters of a newly created pull feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedSettings {
    /// Feed name (max 32 bytes)
    pub name: String,

    /// Maximum variance allowed between oracle results
    pub max_variance: f64,

    /// Minimum number of job responses for a valid oracle result
    pub min_responses: u32,

    /// Minimum number of samples required to set the feed value
    pub min_sample_size: u8,

    /// Slots after which a sample is considered stale
    pub max_staleness: u32,

    /// Let the feed authority write values directly
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permit_write_by_authority: Option<bool>,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            name: "Umbra price feed".to_string(),
            max_variance: 1.0,
            min_responses: 1,
            min_sample_size: 1,
            max_staleness: 60,
            permit_write_by_authority: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// RPC URL for Solana cluster
    pub rpc_url: String,

    /// Cluster used for oracle simulation and feed routes
    pub cluster: Cluster,

    /// Payer keypair path
    pub keypair_path: String,

    /// Credit-score agent program ID
    #[serde(with = "pubkey_string")]
    pub agent_program: Pubkey,

    /// LLM oracle program ID
    #[serde(with = "pubkey_string")]
    pub oracle_program: Pubkey,

    /// Feed consumer program ID
    #[serde(with = "pubkey_string")]
    pub feed_program: Pubkey,

    /// Switchboard on-demand program ID
    #[serde(with = "pubkey_string")]
    pub switchboard_program: Pubkey,

    /// Oracle queue new feeds bind to
    #[serde(with = "pubkey_string")]
    pub queue: Pubkey,

    /// Crossbar base URL
    pub crossbar_url: String,

    /// Job simulation base URL
    pub simulate_url: String,

    /// Polling interval in seconds
    pub poll_interval_secs: u64,

    /// Feeds watched by `watch-feeds` when none are given
    #[serde(default, with = "pubkey_list")]
    pub watch_feeds: Vec<Pubkey>,

    /// Priority fee in micro-lamports per compute unit
    pub compute_unit_price: u64,

    /// Headroom applied to simulated compute units
    pub compute_unit_limit_multiple: f64,

    #[serde(default)]
    pub feed: FeedSettings,
}

impl Config {
    /// Load configuration from TOML file
    pub fn load() -> Result<Self> {
        let config_path =
            std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &str) -> Result<Self> {
        let config_str = std::fs::read_to_string(config_path)
            .context(format!("Failed to read config file: {}", config_path))?;

        Self::from_toml(&config_str)
    }

    pub fn from_toml(config_str: &str) -> Result<Self> {
        toml::from_str(config_str).context("Failed to parse config TOML")
    }

    /// Create default configuration
    pub fn default_devnet() -> Self {
        let cluster = Cluster::Devnet;
        Self {
            rpc_url: "https://api.devnet.solana.com".to_string(),
            cluster,
            keypair_path: "~/.config/solana/id.json".to_string(),
            agent_program: ids::AGENT_PROGRAM_ID,
            oracle_program: ids::LLM_ORACLE_PROGRAM_ID,
            feed_program: ids::FEED_CONSUMER_PROGRAM_ID,
            switchboard_program: cluster.switchboard_program(),
            queue: cluster.default_queue(),
            crossbar_url: "https://crossbar.switchboard.xyz".to_string(),
            simulate_url: "https://api.switchboard.xyz".to_string(),
            poll_interval_secs: 10,
            watch_feeds: vec![UMBRA_DEVNET_FEED],
            compute_unit_price: 75_000,
            compute_unit_limit_multiple: 1.3,
            feed: FeedSettings::default(),
        }
    }

    /// Write default config to file
    pub fn write_default(path: &str) -> Result<()> {
        let config = Self::default_devnet();
        let toml_str = toml::to_string_pretty(&config).context("Failed to serialize config")?;

        std::fs::write(path, toml_str).context(format!("Failed to write config to {}", path))?;

        log::info!("Created default config at {}", path);
        Ok(())
    }
}

/// Pubkeys are written base58 rather than as byte arrays
mod pubkey_string {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use solana_sdk::pubkey::Pubkey;
    use std::str::FromStr;

    pub fn serialize<S: Serializer>(key: &Pubkey, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(key)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Pubkey, D::Error> {
        let s = String::deserialize(d)?;
        Pubkey::from_str(&s).map_err(D::Error::custom)
    }
}

mod pubkey_list {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use solana_sdk::pubkey::Pubkey;
    use std::str::FromStr;

    pub fn serialize<S: Serializer>(keys: &[Pubkey], s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(keys.iter().map(|k| k.to_string()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Pubkey>, D::Error> {
        Vec::<String>::deserialize(d)?
            .iter()
            .map(|s| Pubkey::from_str(s).map_err(D::Error::custom))
            .collect()
    }
}
