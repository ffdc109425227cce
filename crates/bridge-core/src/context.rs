//! Explicit process context.
//!
//! Chain clients, stores, and the token map are built once at startup from
//! [`crate::config::Config`] and threaded down to every signer/leader loop,
//! rather than reached for through module-level globals — see the redesign
//! note in `DESIGN.md` on lifting global module state into an explicit
//! context value.

use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bridge_chain_a::EvmChainClient;
use bridge_chain_b::{ChainBClient, CliTool};
use bridge_store::{CheckpointFile, CheckpointStore, SignatureStore, SwapStore};
use bridge_types::chain::FromConfig;
use bridge_types::model::TokenMap;
use mongodb::Client as MongoClient;

use crate::config::Config;
use crate::error::CoreError;

/// Everything a signer or leader loop needs, built once per process and
/// cheaply cloned (every field is either a cheap handle or an `Arc`).
#[derive(Clone)]
pub struct Context {
    pub config: Arc<Config>,
    pub chain_a: Arc<EvmChainClient>,
    pub chain_b: Arc<ChainBClient>,
    pub cli_tool: Arc<CliTool>,
    pub swaps: SwapStore,
    pub signatures: SignatureStore,
    pub checkpoints: CheckpointStore,
    pub checkpoint_file_a: CheckpointFile,
    pub checkpoint_file_b: CheckpointFile,
    pub token_map: Arc<TokenMap>,
    /// Stable hash of `signer_identity`, used as the checkpoint store's key.
    pub signer_identity_hash: u64,
    /// Flipped once SignerA has replayed its backlog up to the chain-A safe
    /// head at least once. Consulted by `supervisor`'s readiness watcher.
    pub catch_up_complete_a: Arc<AtomicBool>,
    /// Same as `catch_up_complete_a` for SignerB's burn-nonce backlog.
    pub catch_up_complete_b: Arc<AtomicBool>,
}

impl Context {
    pub async fn build(config: Config) -> Result<Self, CoreError> {
        let chain_a = EvmChainClient::from_config(&config.chain_a)
            .await
            .map_err(|e| CoreError::ConfigurationError(format!("chain-a client: {e}")))?;
        let chain_b = ChainBClient::new(&config.chain_b);
        let cli_tool = CliTool::new(&config.chain_b);

        let mongo_client = MongoClient::with_uri_str(config.mongo_uri.inner())
            .await
            .map_err(|e| CoreError::ConfigurationError(format!("mongo connect: {e}")))?;
        let database = mongo_client.database(&config.db_name);

        let swaps = SwapStore::new(&database);
        swaps.ensure_indexes().await?;
        let signatures = SignatureStore::new(&database);
        signatures.ensure_indexes().await?;
        let checkpoints = CheckpointStore::new(&database);
        checkpoints.ensure_indexes().await?;

        std::fs::create_dir_all(&config.checkpoint_dir)
            .map_err(|e| CoreError::ConfigurationError(format!("checkpoint dir: {e}")))?;
        let checkpoint_file_a = CheckpointFile::new(config.checkpoint_dir.join("chain_a.cursor"));
        let checkpoint_file_b = CheckpointFile::new(config.checkpoint_dir.join("chain_b.cursor"));

        let token_map = TokenMap::new(config.token_map.clone());
        let signer_identity_hash = hash_identity(&config.signer_identity);

        Ok(Self {
            config: Arc::new(config),
            chain_a: Arc::new(chain_a),
            chain_b: Arc::new(chain_b),
            cli_tool: Arc::new(cli_tool),
            swaps,
            signatures,
            checkpoints,
            checkpoint_file_a,
            checkpoint_file_b,
            token_map: Arc::new(token_map),
            signer_identity_hash,
            catch_up_complete_a: Arc::new(AtomicBool::new(false)),
            catch_up_complete_b: Arc::new(AtomicBool::new(false)),
        })
    }

    /// True once both signer loops have replayed their backlog at least
    /// once. A health check or readiness probe can consult this instead of
    /// inferring catch-up from log output.
    pub fn fully_caught_up(&self) -> bool {
        self.catch_up_complete_a.load(Ordering::Relaxed) && self.catch_up_complete_b.load(Ordering::Relaxed)
    }
}

fn hash_identity(identity: &str) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    identity.hash(&mut hasher);
    hasher.finish()
}
