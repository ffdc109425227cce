//! Confirmation-aware tail of chain A's `Submission` event log.
//!
//! Given a starting block and a required confirmation depth `k`, yields
//! events at block `b` only once the head `h` satisfies `h - b >= k`; it
//! never skips forward past unconfirmed blocks. Resuming from a checkpoint
//! `s` re-scans from `s` inclusive, so every consumer must be idempotent
//! (handled here via `SwapStore::create_if_absent`).

use alloy_rpc_types_eth::Log;
use bridge_chain_a::EvmChainClient;

use crate::error::CoreError;

pub struct EventStream<'a> {
    chain: &'a EvmChainClient,
    confirmations: u64,
}

impl<'a> EventStream<'a> {
    pub fn new(chain: &'a EvmChainClient, confirmations: u64) -> Self {
        Self {
            chain,
            confirmations,
        }
    }

    /// Returns a confirmed batch of logs from `from_block` up to the
    /// current safe head, plus that safe head to checkpoint against.
    /// `Ok(None)` means the head hasn't advanced far enough yet and the
    /// caller should sleep and retry.
    pub async fn poll(&self, from_block: u64) -> Result<Option<(Vec<Log>, u64)>, CoreError> {
        let head = self.chain.latest_block().await.map_err(|e| CoreError::TransientRpc {
            chain: "chain-a",
            retriable: e.is_retriable(),
            source: Box::new(e),
        })?;
        if head < self.confirmations {
            return Ok(None);
        }
        let safe_head = head - self.confirmations;
        if safe_head < from_block {
            return Ok(None);
        }
        let logs = self
            .chain
            .fetch_submissions(from_block, safe_head)
            .await
            .map_err(|e| CoreError::TransientRpc {
                chain: "chain-a",
                retriable: e.is_retriable(),
                source: Box::new(e),
            })?;
        Ok(Some((logs, safe_head)))
    }
}
