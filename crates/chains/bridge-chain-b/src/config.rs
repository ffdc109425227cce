use bridge_types::config::LiteralOrEnv;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// Configuration for the chain-B (confidential contract) client.
///
/// Chain B is never signed for in-process: reads go over JSON-RPC, writes are
/// handed to an external CLI binary (`cli_path`) that knows how to sign,
/// assemble a multisig submission, and broadcast it. See [`crate::cli_tool`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainBConfig {
    /// JSON-RPC endpoint of a chain-B full node.
    pub rpc: Url,
    /// Address of the deployed swap/token contract.
    pub swap_contract_address: String,
    /// Viewing key used to decrypt query responses against the swap contract.
    pub viewing_key: LiteralOrEnv<String>,
    /// Address of this process's chain-B account (must be one of the multisig owners
    /// for leader/signer processes that submit or confirm transactions).
    pub signer_account: String,
    /// Path to the external CLI binary used to sign, assemble, and broadcast.
    pub cli_path: PathBuf,
    /// How long to wait for a CLI subprocess invocation before giving up.
    #[serde(default = "chain_b_config::default_cli_timeout_secs")]
    pub cli_timeout_secs: u64,
}

mod chain_b_config {
    pub fn default_cli_timeout_secs() -> u64 {
        30
    }
}
