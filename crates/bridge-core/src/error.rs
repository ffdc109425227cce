//! Core error taxonomy, one closed `thiserror` enum for the crate boundary,
//! carrying enough context (swap id, nonce, chain) to log without re-deriving
//! it at the call site. `is_retriable`/`is_fatal` drive the generic
//! worker-loop retry wrapper in [`crate::loop_util::run_loop`].

use bridge_types::model::SwapId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("transient RPC error on {chain}: {source}")]
    TransientRpc {
        chain: &'static str,
        /// Classification of `source`, captured by `crate::loop_util::rpc_err`
        /// at the point the chain-client error crossed into this enum.
        retriable: bool,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("transient database error: {0}")]
    TransientDb(#[from] bridge_store::StoreError),
    #[error("validation mismatch for swap {swap_id}: {reason}")]
    ValidationMismatch { swap_id: SwapId, reason: String },
    #[error("configuration error: {0}")]
    ConfigurationError(String),
    #[error("quorum unreachable for swap {swap_id}: {signatures}/{threshold} after {age_secs}s")]
    QuorumUnreachable {
        swap_id: SwapId,
        signatures: usize,
        threshold: usize,
        age_secs: u64,
    },
    #[error("duplicate {0}, treated as success")]
    Duplicate(String),
}

impl CoreError {
    /// A bounded-backoff retry of the same operation stands a reasonable
    /// chance of succeeding. Delegates to the wrapped error's own
    /// classification rather than treating every RPC/DB error alike.
    pub fn is_retriable(&self) -> bool {
        match self {
            CoreError::TransientRpc { retriable, .. } => *retriable,
            CoreError::TransientDb(e) => e.is_retriable(),
            _ => false,
        }
    }

    /// Fatal errors stop the loop that produced them instead of being
    /// retried forever; the supervisor logs the loop as exited. Startup
    /// configuration failures are always fatal; a wrapped RPC or store error
    /// is fatal when its own classification says retrying cannot help.
    pub fn is_fatal(&self) -> bool {
        match self {
            CoreError::ConfigurationError(_) => true,
            CoreError::TransientRpc { retriable, .. } => !retriable,
            CoreError::TransientDb(e) => e.is_fatal(),
            _ => false,
        }
    }

    pub fn is_duplicate(&self) -> bool {
        match self {
            CoreError::Duplicate(_) => true,
            CoreError::TransientDb(e) => e.is_duplicate(),
            _ => false,
        }
    }
}
