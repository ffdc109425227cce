//! Layered configuration loading for the bridge binary.
//!
//! A CLI flag (`--config <path>`, also settable via the `CONFIG` environment
//! variable) names a JSON file;
//! fields absent from the file fall back to environment variables (through
//! [`LiteralOrEnv`]) or to hard-coded defaults. The resulting `Config` is
//! immutable for the process lifetime and the only source chain clients,
//! stores, and the token map are built from. Any problem loading it is a
//! `ConfigurationError` — the single fatal path in this process, and it is
//! reported before any loop starts.

use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use bridge_chain_a::EvmChainConfig;
use bridge_chain_b::ChainBConfig;
use bridge_types::config::LiteralOrEnv;
use bridge_types::model::TokenMapEntry;

#[derive(Parser, Debug)]
#[command(name = "bridge")]
#[command(about = "Cross-chain bridge signer/leader process")]
struct CliArgs {
    /// Path to the JSON configuration file.
    #[arg(long, short, env = "CONFIG", default_value = "config.json")]
    config: PathBuf,
}

/// Process configuration, loaded once at startup.
///
/// A single process may run only signer loops, or signer and leader loops
/// together when `is_leader` is set — there is no separate leader binary,
/// mirroring the source's single entrypoint gated by a config flag.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Identity of this process among the signer set: tags signature
    /// records and keys this process's checkpoints. Must be stable across
    /// restarts of the same logical signer.
    pub signer_identity: String,
    /// Whether this process also runs the leader loops.
    #[serde(default)]
    pub is_leader: bool,
    /// Number of signer approvals (M of N) required before a B→A release
    /// may be broadcast.
    pub signatures_threshold: usize,
    /// Genesis block for chain-A catch-up the first time this signer ever
    /// runs (no checkpoint yet). Ignored once a checkpoint exists.
    #[serde(default)]
    pub eth_start_block: u64,
    /// How long a loop sleeps when it finds no new work.
    #[serde(default = "config_defaults::default_sleep_interval_secs")]
    pub sleep_interval_secs: u64,
    /// Age after which a below-threshold B→A swap is surfaced as a
    /// `QuorumUnreachable` warning.
    #[serde(default = "config_defaults::default_quorum_timeout_secs")]
    pub quorum_timeout_secs: u64,
    pub chain_a: EvmChainConfig,
    pub chain_b: ChainBConfig,
    /// Token bijection entries, loaded once and never mutated afterward.
    pub token_map: Vec<TokenMapEntry>,
    /// MongoDB connection string.
    pub mongo_uri: LiteralOrEnv<String>,
    /// Database name within the MongoDB deployment.
    pub db_name: String,
    /// Directory for the per-signer checkpoint-file fallback used when the
    /// store is unreachable.
    #[serde(default = "config_defaults::default_checkpoint_dir")]
    pub checkpoint_dir: PathBuf,
}

mod config_defaults {
    use std::path::PathBuf;

    pub fn default_sleep_interval_secs() -> u64 {
        10
    }

    pub fn default_quorum_timeout_secs() -> u64 {
        3600
    }

    pub fn default_checkpoint_dir() -> PathBuf {
        PathBuf::from("./checkpoints")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file at {0}: {1}")]
    FileRead(PathBuf, std::io::Error),
    #[error("failed to parse config file: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl Config {
    /// Loads configuration from CLI arguments and a JSON file.
    ///
    /// The config file path is determined by `--config <path>` (or `CONFIG`),
    /// defaulting to `./config.json`. Values absent from the file fall back
    /// to environment variables or defaults during deserialization.
    pub fn load() -> Result<Self, ConfigError> {
        let cli_args = CliArgs::parse();
        let config_path = Path::new(&cli_args.config)
            .canonicalize()
            .map_err(|e| ConfigError::FileRead(cli_args.config, e))?;
        Self::load_from_path(config_path)
    }

    fn load_from_path(path: PathBuf) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(&path).map_err(|e| ConfigError::FileRead(path, e))?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }
}
