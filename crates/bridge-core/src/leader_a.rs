//! LeaderA: mints the B-side counterpart of a confirmed A→B lock.
//!
//! Unlike the B→A pipeline, chain A's own multisig contract already enforces
//! the M-of-N confirmation quorum on-chain — there is nothing for this
//! process to aggregate. LeaderA only has to notice that a submission it
//! already recorded as `OBSERVED` has reached quorum (`isConfirmed`), then
//! drive chain B's `execute` entrypoint for the mint. Only the leader process
//! does this; every other signer's job ended once it called
//! `confirmTransaction`.
//!
//! De-duplication against a replayed or re-scanned event falls out of
//! `SwapStore::set_status`'s compare-and-set semantics: a swap already moved
//! to `SUBMITTED` by a previous tick (or a concurrently running leader, during
//! a handoff) fails the `OBSERVED -> SUBMITTED` transition and is treated as
//! already-handled rather than retried.

use alloy_primitives::U256;
use tokio_util::sync::CancellationToken;

use bridge_store::StoreError;
use bridge_types::model::{Direction, Swap, SwapStatus};

use crate::context::Context;
use crate::error::CoreError;
use crate::loop_util::{now_secs, rpc_err, run_loop};

pub async fn run(ctx: Context, cancel: CancellationToken) -> Result<(), CoreError> {
    run_loop(&cancel, ctx.config.sleep_interval_secs, || scan_once(&ctx)).await
}

/// One sweep over every `OBSERVED` A→B swap. Returns whether anything was
/// broadcast, purely so the caller can skip its idle sleep when there was
/// real work this tick.
async fn scan_once(ctx: &Context) -> Result<bool, CoreError> {
    let observed = ctx.swaps.list_by_status(SwapStatus::Observed).await?;
    let mut progressed = false;
    for swap in observed.into_iter().filter(|s| s.direction == Direction::AToB) {
        match try_mint(ctx, &swap).await {
            Ok(minted) => progressed |= minted,
            Err(e) => {
                tracing::warn!(swap_id = %swap.id, error = %e, "leader-a: mint attempt failed, will retry");
            }
        }
    }
    Ok(progressed)
}

async fn try_mint(ctx: &Context, swap: &Swap) -> Result<bool, CoreError> {
    let transaction_id = U256::from(swap.nonce);
    let confirmed = ctx
        .chain_a
        .is_confirmed(transaction_id)
        .await
        .map_err(|e| rpc_err("chain-a", e.is_retriable(), e))?;
    if !confirmed {
        return Ok(false);
    }

    let receipt = ctx
        .cli_tool
        .execute_mint(swap.nonce, &swap.destination, swap.amount, &swap.token)
        .await
        .map_err(|e| rpc_err("chain-b", e.is_retriable(), e))?;

    match ctx
        .swaps
        .set_status(&swap.id, SwapStatus::Observed, SwapStatus::Submitted, now_secs())
        .await
    {
        Ok(()) => {}
        Err(StoreError::InvalidTransition { .. }) => {
            tracing::info!(swap_id = %swap.id, "leader-a: status already advanced, treating mint as a duplicate");
            return Ok(true);
        }
        Err(e) => return Err(e.into()),
    }
    crate::util::metrics::record_status_transition(Some(SwapStatus::Observed), SwapStatus::Submitted);

    tracing::info!(
        swap_id = %swap.id,
        chain_b_tx = %String::from_utf8_lossy(&receipt),
        "leader-a: broadcast chain-b mint"
    );
    Ok(true)
}
