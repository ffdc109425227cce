use alloy_primitives::B256;
use bridge_types::config::{LiteralOrEnv, RpcConfig};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Configuration for the chain-A (EVM) client.
///
/// Each bridge signer/leader process holds exactly one chain-A key: the one
/// identifying it among the multisig wallet's owners.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvmChainConfig {
    /// Numeric EVM chain ID (e.g. `1` for Ethereum mainnet, `8453` for Base).
    pub chain_id: u64,
    /// Whether the chain supports EIP-1559 gas pricing.
    #[serde(default = "evm_chain_config::default_eip1559")]
    pub eip1559: bool,
    /// This process's signer key, as a literal hex string or an env var reference.
    pub signer: LiteralOrEnv<EvmPrivateKey>,
    /// The deployed multisig wallet contract address.
    pub multisig_address: String,
    /// RPC endpoints to dial, with optional fallback/rate-limiting.
    pub rpc: Vec<RpcConfig>,
    /// How long to wait for a transaction receipt before giving up.
    #[serde(default = "evm_chain_config::default_receipt_timeout_secs")]
    pub receipt_timeout_secs: u64,
    /// Number of block confirmations required before an A→B lock event is acted on.
    #[serde(default = "evm_chain_config::default_confirmations")]
    pub confirmations: u64,
}

mod evm_chain_config {
    pub fn default_eip1559() -> bool {
        true
    }
    pub fn default_receipt_timeout_secs() -> u64 {
        30
    }
    pub fn default_confirmations() -> u64 {
        12
    }
}

/// A validated EVM private key (32 bytes).
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct EvmPrivateKey(B256);

impl EvmPrivateKey {
    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_ref()
    }
}

impl PartialEq for EvmPrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl FromStr for EvmPrivateKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        B256::from_str(s)
            .map(Self)
            .map_err(|e| format!("invalid evm private key: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn private_key_parses_hex() {
        let key: EvmPrivateKey =
            "0xcafe000000000000000000000000000000000000000000000000000000000001"
                .parse()
                .unwrap();
        assert_eq!(key.as_bytes().len(), 32);
    }

    #[test]
    fn private_key_rejects_garbage() {
        assert!("not-a-key".parse::<EvmPrivateKey>().is_err());
    }
}
