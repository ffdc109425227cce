//! Wire types for chain-B JSON-RPC query responses.

use serde::{Deserialize, Serialize};

/// Result of querying the swap contract for a given `(nonce, token)` pair on the
/// A→B pipeline: what the contract recorded as the minted destination and amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapQueryResult {
    /// Base64-encoded chain-A destination address, as recorded by the contract.
    pub destination: String,
    /// Minted amount, as a decimal string (chain-B amounts may exceed u64).
    pub amount: String,
    pub nonce: u64,
    pub token: String,
}

/// A single burn event observed on the B→A pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurnRecord {
    pub nonce: u64,
    pub token: String,
    pub amount: String,
    /// Base64-encoded chain-A destination address the burn requested funds be sent to.
    pub destination: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ChainBQueryError {
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("contract query failed: {0}")]
    QueryFailed(String),
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ChainBQueryError {
    pub fn is_retriable(&self) -> bool {
        matches!(self, ChainBQueryError::Transport(_))
    }

    pub fn is_fatal(&self) -> bool {
        !self.is_retriable()
    }
}
