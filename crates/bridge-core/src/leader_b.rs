//! LeaderB: broadcasts a B→A release once enough signers have signed it.
//!
//! Chain A's multisig contract has no facility for verifying off-chain
//! signatures collected outside the contract itself, so the M-of-N quorum
//! here is an application-layer check: the leader collects every
//! `SignatureRecord` gathered for a swap, recovers each one's signer address
//! over the swap's `unsigned_tx`, and requires at least `signatures_threshold`
//! distinct recovered addresses before it broadcasts `submitTransaction`
//! itself, using its own chain-A key. This mirrors the source leader's own
//! behavior: it submits releases with its own key and never assembles a
//! multi-signature transaction on the contract's behalf.
//!
//! A swap that sits below threshold past `quorum_timeout_secs` is surfaced as
//! a [`CoreError::QuorumUnreachable`] warning — logged, not propagated, since
//! it is not this process's place to fail a swap that other signers may yet
//! still sign.

use std::collections::HashSet;

use tokio_util::sync::CancellationToken;

use bridge_chain_a::EvmChainClient;
use bridge_store::StoreError;
use bridge_types::model::{Direction, Swap, SwapStatus};

use crate::context::Context;
use crate::error::CoreError;
use crate::loop_util::{now_secs, rpc_err, run_loop};

pub async fn run(ctx: Context, cancel: CancellationToken) -> Result<(), CoreError> {
    run_loop(&cancel, ctx.config.sleep_interval_secs, || scan_once(&ctx)).await
}

async fn scan_once(ctx: &Context) -> Result<bool, CoreError> {
    let observed = ctx.swaps.list_by_status(SwapStatus::Observed).await?;
    let mut progressed = false;
    for swap in observed.into_iter().filter(|s| s.direction == Direction::BToA) {
        match try_release(ctx, &swap).await {
            Ok(true) => progressed = true,
            Ok(false) => warn_if_quorum_unreachable(ctx, &swap).await?,
            Err(e) => {
                tracing::warn!(swap_id = %swap.id, error = %e, "leader-b: release attempt failed, will retry");
            }
        }
    }
    Ok(progressed)
}

/// Returns `Ok(true)` once the release has been broadcast (or was already
/// broadcast by a concurrent leader), `Ok(false)` if the swap is still below
/// the signature threshold.
async fn try_release(ctx: &Context, swap: &Swap) -> Result<bool, CoreError> {
    let distinct_signers = distinct_recovered_signers(ctx, swap).await?;
    if distinct_signers.len() < ctx.config.signatures_threshold {
        return Ok(false);
    }

    let payload = alloy_primitives::Bytes::copy_from_slice(&swap.unsigned_tx);
    let (destination, value, data) = EvmChainClient::decode_release_payload(&payload)
        .map_err(|e| rpc_err("chain-a", e.is_retriable(), e))?;
    let receipt = ctx
        .chain_a
        .submit_release(destination, value, data)
        .await
        .map_err(|e| rpc_err("chain-a", e.is_retriable(), e))?;

    match ctx
        .swaps
        .set_status(&swap.id, SwapStatus::Observed, SwapStatus::Submitted, now_secs())
        .await
    {
        Ok(()) => {}
        Err(StoreError::InvalidTransition { .. }) => {
            tracing::info!(swap_id = %swap.id, "leader-b: status already advanced, treating release as a duplicate");
            return Ok(true);
        }
        Err(e) => return Err(e.into()),
    }
    crate::util::metrics::record_status_transition(Some(SwapStatus::Observed), SwapStatus::Submitted);
    crate::util::metrics::record_signatures_per_swap(distinct_signers.len() as u64);

    tracing::info!(swap_id = %swap.id, tx_hash = %receipt.transaction_hash, "leader-b: broadcast chain-a release");
    Ok(true)
}

async fn distinct_recovered_signers(
    ctx: &Context,
    swap: &Swap,
) -> Result<HashSet<alloy_primitives::Address>, CoreError> {
    let records = ctx.signatures.list(&swap.id).await?;
    let payload = alloy_primitives::Bytes::copy_from_slice(&swap.unsigned_tx);
    let mut signers = HashSet::new();
    for record in &records {
        let signature = alloy_primitives::Bytes::copy_from_slice(&record.signed_payload);
        match EvmChainClient::recover_payload_signer(&payload, &signature) {
            Ok(address) => {
                signers.insert(address);
            }
            Err(e) => {
                tracing::warn!(
                    swap_id = %swap.id,
                    signer_identity = %record.signer_identity,
                    error = %e,
                    "leader-b: signature failed to recover a signer, ignoring"
                );
            }
        }
    }
    Ok(signers)
}

async fn warn_if_quorum_unreachable(ctx: &Context, swap: &Swap) -> Result<(), CoreError> {
    let age_secs = (now_secs() - swap.created_at).max(0) as u64;
    if age_secs < ctx.config.quorum_timeout_secs {
        return Ok(());
    }
    let signatures = ctx.signatures.count(&swap.id).await? as usize;
    let warning = CoreError::QuorumUnreachable {
        swap_id: swap.id.clone(),
        signatures,
        threshold: ctx.config.signatures_threshold,
        age_secs,
    };
    tracing::warn!(swap_id = %swap.id, %warning, "leader-b: quorum unreachable");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, Bytes, U256, address};

    #[tokio::test]
    async fn recovers_signer_over_release_payload() {
        use alloy_signer::Signer;
        use alloy_signer_local::PrivateKeySigner;

        let signer = PrivateKeySigner::random();
        let destination: Address = address!("000000000000000000000000000000000000dd");
        let payload = EvmChainClient::encode_release_payload(destination, U256::ZERO, &Bytes::new());
        let hash = alloy_primitives::keccak256(&payload);
        let signature = signer.sign_hash(&hash).await.unwrap();
        let sig_bytes = Bytes::from(signature.as_bytes().to_vec());
        let recovered = EvmChainClient::recover_payload_signer(&payload, &sig_bytes).unwrap();
        assert_eq!(recovered, signer.address());
    }
}
