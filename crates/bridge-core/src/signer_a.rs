//! SignerA: validates A→B submissions and confirms them on chain A.
//!
//! For each `Submission` event observed (through [`crate::event_stream::EventStream`]):
//! decode the submitted payload, distinguishing a native-coin lock
//! (`value > 0 ∧ data = ∅`) from a token lock (`value == 0 ∧ data` decodes as
//! an ERC-20 `transfer`); resolve the chain-B counterpart token; query chain
//! B's swap record at the same nonce; and, on an exact match of amount,
//! destination, and token, call `confirmTransaction` with this process's own
//! chain-A key. A mismatch is logged and never confirmed — the validation
//! firewall that makes byzantine signers safe to tolerate.
//!
//! The multisig wallet's `transactions(id)` tuple has no native notion of a
//! chain-B destination, so this bridge repurposes its fields: for a native
//! lock, `destination` (a 20-byte address) carries the raw destination bytes
//! to compare against chain B's base64-decoded destination; for a token
//! lock, `destination` is the ERC-20 contract address and the `transfer`
//! call's `recipient` argument carries the destination bytes instead.

use alloy_primitives::{Address, Bytes, U256};
use alloy_rpc_types_eth::Log;
use alloy_sol_types::SolEvent;
use tokio_util::sync::CancellationToken;

use bridge_chain_a::erc20::IMultiSigWallet;
use bridge_types::model::{ChainAToken, ChainBToken, Direction, Swap, SwapId, SwapStatus};

use crate::context::Context;
use crate::error::CoreError;
use crate::event_stream::EventStream;
use crate::loop_util::{base64_decode, base64_encode, now_secs, rpc_err, run_loop};

/// Runs the SignerA loop until `cancel` fires. Catch-up and live-tail are
/// the same code path: both replay from the last checkpoint (or the
/// configured genesis block on first run) up to `head - confirmations`.
pub async fn run(ctx: Context, cancel: CancellationToken) -> Result<(), CoreError> {
    let mut cursor = load_checkpoint(&ctx).await?;
    run_loop(&cancel, ctx.config.sleep_interval_secs, || tick(&ctx, &mut cursor)).await
}

/// One iteration: polls up to the current safe head and processes whatever
/// batch comes back. `Ok(true)` means the batch was fully processed and the
/// caller should poll again immediately (there may be more backlog); `Ok(false)`
/// means the stream is caught up to the safe head and the caller should sleep.
async fn tick(ctx: &Context, cursor: &mut u64) -> Result<bool, CoreError> {
    let stream = EventStream::new(&ctx.chain_a, ctx.config.chain_a.confirmations);
    match stream.poll(*cursor).await? {
        Some((logs, safe_head)) => {
            process_batch(ctx, &logs).await?;
            *cursor = safe_head + 1;
            advance_checkpoint(ctx, *cursor).await;
            mark_caught_up(ctx, *cursor);
            Ok(true)
        }
        None => {
            mark_caught_up(ctx, *cursor);
            Ok(false)
        }
    }
}

/// Marks the A→B pipeline as having reached the chain tip at least once,
/// gating the readiness signal `crate::supervisor` watches for. Logs only on
/// the first transition so steady-state idle ticks stay quiet.
fn mark_caught_up(ctx: &Context, cursor: u64) {
    if !ctx
        .catch_up_complete_a
        .swap(true, std::sync::atomic::Ordering::Relaxed)
    {
        tracing::info!(cursor, "signer-a: catch-up complete");
    }
}

async fn load_checkpoint(ctx: &Context) -> Result<u64, CoreError> {
    match ctx.checkpoints.get(ctx.signer_identity_hash, Direction::AToB).await {
        Ok(Some(cursor)) => return Ok(cursor),
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(error = %e, "signer-a: checkpoint store unavailable, falling back to checkpoint file");
        }
    }
    if let Ok(Some(cursor)) = ctx.checkpoint_file_a.read().await {
        return Ok(cursor);
    }
    Ok(ctx.config.eth_start_block)
}

async fn advance_checkpoint(ctx: &Context, cursor: u64) {
    if let Err(e) = ctx
        .checkpoints
        .advance(ctx.signer_identity_hash, Direction::AToB, cursor)
        .await
    {
        tracing::warn!(error = %e, "signer-a: failed to advance db checkpoint, relying on file fallback");
    }
    if let Err(e) = ctx.checkpoint_file_a.write(cursor).await {
        tracing::warn!(error = %e, "signer-a: failed to write checkpoint file");
    }
    crate::util::metrics::record_last_block_a(cursor.saturating_sub(1));
}

/// Processes one confirmed batch. A genuinely malformed log (can't even be
/// decoded) propagates an error so the caller does not advance past it —
/// the batch is retried wholesale next tick, standing in for the operator
/// acknowledgement the source spec calls for. A business-level validation
/// mismatch is logged and treated as resolved: it is not retried.
async fn process_batch(ctx: &Context, logs: &[Log]) -> Result<(), CoreError> {
    for log in logs {
        process_submission(ctx, log).await?;
    }
    Ok(())
}

async fn process_submission(ctx: &Context, log: &Log) -> Result<(), CoreError> {
    let transaction_id = decode_submission_id(log)?;
    let nonce = u64::try_from(transaction_id).map_err(|_| CoreError::ValidationMismatch {
        swap_id: SwapId::new(Direction::AToB, 0),
        reason: format!("submission id {transaction_id} does not fit in a u64 nonce"),
    })?;
    let swap_id = SwapId::new(Direction::AToB, nonce);

    let (destination, value, data, executed) = ctx
        .chain_a
        .get_transaction(transaction_id)
        .await
        .map_err(|e| rpc_err("chain-a", e.is_retriable(), e))?;

    let (chain_a_token, amount, destination_bytes) =
        match classify_submission(destination, value, &data) {
            Ok(v) => v,
            Err(reason) => {
                tracing::error!(swap_id = %swap_id, %reason, "signer-a: unrecognized submission payload, refusing to confirm");
                return Ok(());
            }
        };

    let chain_b_token = match ctx.token_map.resolve_a_to_b(&chain_a_token) {
        Some(t) => t.clone(),
        None => {
            tracing::error!(swap_id = %swap_id, ?chain_a_token, "signer-a: no chain-b token mapped, refusing to confirm");
            return Ok(());
        }
    };

    record_observed_swap(ctx, &swap_id, nonce, log, amount, &destination_bytes, &chain_b_token)
        .await?;

    if executed {
        return Ok(());
    }
    if ctx
        .chain_a
        .has_confirmed(transaction_id, ctx.chain_a.address())
        .await
        .map_err(|e| rpc_err("chain-a", e.is_retriable(), e))?
    {
        return Ok(());
    }

    let query = match ctx.chain_b.query_swap(nonce, &chain_b_token.0).await {
        Ok(q) => q,
        Err(e) if e.is_retriable() => return Err(rpc_err("chain-b", true, e)),
        Err(e) => {
            tracing::error!(swap_id = %swap_id, error = %e, "signer-a: chain-b swap query failed, refusing to confirm");
            return Ok(());
        }
    };

    let expected_destination = base64_decode(&query.destination).map_err(|reason| {
        CoreError::ValidationMismatch { swap_id: swap_id.clone(), reason }
    })?;
    let expected_amount: u128 = query.amount.parse().map_err(|_| CoreError::ValidationMismatch {
        swap_id: swap_id.clone(),
        reason: format!("chain-b amount {:?} is not a valid integer", query.amount),
    })?;

    if expected_destination != destination_bytes
        || expected_amount != amount
        || query.token != chain_b_token.0
    {
        tracing::error!(
            swap_id = %swap_id,
            "signer-a: validation mismatch between chain-a submission and chain-b swap record"
        );
        return Ok(());
    }

    ctx.chain_a
        .confirm_release(transaction_id)
        .await
        .map_err(|e| rpc_err("chain-a", e.is_retriable(), e))?;
    tracing::info!(swap_id = %swap_id, "signer-a: confirmed submission on chain A");
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn record_observed_swap(
    ctx: &Context,
    swap_id: &SwapId,
    nonce: u64,
    log: &Log,
    amount: u128,
    destination_bytes: &[u8],
    chain_b_token: &ChainBToken,
) -> Result<(), CoreError> {
    let now = now_secs();
    let swap = Swap {
        id: swap_id.clone(),
        direction: Direction::AToB,
        nonce,
        source_tx: log
            .transaction_hash
            .map(|h| h.to_string())
            .unwrap_or_default(),
        amount,
        destination: base64_encode(destination_bytes),
        token: chain_b_token.0.clone(),
        unsigned_tx: Vec::new(),
        status: SwapStatus::Observed,
        created_at: now,
        updated_at: now,
    };
    let (_, outcome) = ctx.swaps.create_if_absent(swap).await?;
    if outcome == bridge_store::CreateOutcome::Created {
        crate::util::metrics::record_status_transition(None, SwapStatus::Observed);
    }
    Ok(())
}

/// Classifies a multisig submission's payload. `Ok` carries the resolved
/// chain-A token, the integer amount, and the raw destination bytes; `Err`
/// carries a human-readable reason the payload could not be classified.
fn classify_submission(
    destination: Address,
    value: U256,
    data: &Bytes,
) -> Result<(ChainAToken, u128, Vec<u8>), String> {
    if data.is_empty() && value > U256::ZERO {
        let amount = u128::try_from(value).map_err(|_| format!("native amount {value} overflows u128"))?;
        return Ok((ChainAToken::Native, amount, destination.as_slice().to_vec()));
    }
    if value == U256::ZERO {
        if let Some((recipient, amount)) = bridge_chain_a::EvmChainClient::decode_erc20_transfer(data) {
            let amount = u128::try_from(amount).map_err(|_| format!("token amount {amount} overflows u128"))?;
            let token = format!("{destination:#x}");
            return Ok((ChainAToken::Erc20(token), amount, recipient.as_slice().to_vec()));
        }
    }
    Err("submission data is neither a native lock nor a recognized ERC-20 transfer".to_string())
}

fn decode_submission_id(log: &Log) -> Result<U256, CoreError> {
    let decoded = IMultiSigWallet::Submission::decode_log(&log.inner).map_err(|e| {
        CoreError::ValidationMismatch {
            swap_id: SwapId::new(Direction::AToB, 0),
            reason: format!("malformed Submission log: {e}"),
        }
    })?;
    Ok(decoded.data.transactionId)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn classifies_native_lock() {
        let destination = address!("000000000000000000000000000000000000dd");
        let (token, amount, bytes) =
            classify_submission(destination, U256::from(1_000_000u64), &Bytes::new()).unwrap();
        assert_eq!(token, ChainAToken::Native);
        assert_eq!(amount, 1_000_000u128);
        assert_eq!(bytes, destination.as_slice());
    }

    #[test]
    fn classifies_erc20_transfer() {
        let token_contract = address!("00000000000000000000000000000000abcdef");
        let recipient = address!("000000000000000000000000000000000000dd");
        let data = bridge_chain_a::EvmChainClient::encode_release_payload(recipient, U256::ZERO, &Bytes::new());
        // `encode_release_payload` wraps submitTransaction, not transfer; build a raw
        // transfer call instead to exercise the ERC-20 branch in isolation.
        let call = bridge_chain_a::erc20::IERC20::transferCall {
            recipient,
            amount: U256::from(500u64),
        };
        let _ = data;
        use alloy_sol_types::SolCall;
        let transfer_data = Bytes::from(call.abi_encode());
        let (token, amount, bytes) =
            classify_submission(token_contract, U256::ZERO, &transfer_data).unwrap();
        assert_eq!(token, ChainAToken::Erc20(format!("{token_contract:#x}")));
        assert_eq!(amount, 500u128);
        assert_eq!(bytes, recipient.as_slice());
    }

    #[test]
    fn rejects_unrecognized_payload() {
        let destination = address!("000000000000000000000000000000000000dd");
        let garbage = Bytes::from(vec![0xde, 0xad, 0xbe, 0xef]);
        assert!(classify_submission(destination, U256::ZERO, &garbage).is_err());
    }
}
