//! SignerB: signs B→A releases.
//!
//! Polls chain B's swap contract by monotonically increasing burn nonce,
//! starting at checkpoint+1. On finding a burn, resolves the A-side token
//! via the token map, builds the corresponding `submitTransaction(dest,
//! amount, data)` payload (an ERC-20 `transfer` for token bridges, empty
//! data for native), signs it off-chain with this process's chain-A key,
//! and persists both a `Swap` (status `OBSERVED`) and a `SignatureRecord`.
//! The checkpoint only advances once the signature is durably stored; a
//! not-found query at the next nonce is the normal idle condition and never
//! advances it.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;
use std::str::FromStr;
use tokio_util::sync::CancellationToken;

use bridge_chain_a::EvmChainClient;
use bridge_chain_a::erc20::IERC20;
use bridge_types::model::{ChainAToken, ChainBToken, Direction, SignatureRecord, Swap, SwapId, SwapStatus};

use crate::context::Context;
use crate::error::CoreError;
use crate::loop_util::{base64_decode, now_secs, rpc_err, run_loop};

pub async fn run(ctx: Context, cancel: CancellationToken) -> Result<(), CoreError> {
    let mut cursor = load_checkpoint(&ctx).await?;
    run_loop(&cancel, ctx.config.sleep_interval_secs, || tick(&ctx, &mut cursor)).await
}

/// One iteration: attempts to process the burn at `cursor + 1`. `Ok(true)`
/// means a burn was found and signed there, so the caller should advance and
/// try the next nonce immediately; `Ok(false)` means chain B has nothing at
/// that nonce yet, the ordinary idle condition once caught up to the tip.
async fn tick(ctx: &Context, cursor: &mut u64) -> Result<bool, CoreError> {
    let next_nonce = *cursor + 1;
    if process_nonce(ctx, next_nonce).await? {
        *cursor = next_nonce;
        advance_checkpoint(ctx, *cursor).await;
        Ok(true)
    } else {
        mark_caught_up(ctx);
        Ok(false)
    }
}

/// Marks the B→A pipeline as having reached the chain tip at least once. See
/// `signer_a::mark_caught_up` for the A-side equivalent.
fn mark_caught_up(ctx: &Context) {
    if !ctx
        .catch_up_complete_b
        .swap(true, std::sync::atomic::Ordering::Relaxed)
    {
        tracing::info!("signer-b: catch-up complete");
    }
}

async fn load_checkpoint(ctx: &Context) -> Result<u64, CoreError> {
    match ctx.checkpoints.get(ctx.signer_identity_hash, Direction::BToA).await {
        Ok(Some(cursor)) => return Ok(cursor),
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(error = %e, "signer-b: checkpoint store unavailable, falling back to checkpoint file");
        }
    }
    if let Ok(Some(cursor)) = ctx.checkpoint_file_b.read().await {
        return Ok(cursor);
    }
    Ok(0)
}

async fn advance_checkpoint(ctx: &Context, cursor: u64) {
    if let Err(e) = ctx
        .checkpoints
        .advance(ctx.signer_identity_hash, Direction::BToA, cursor)
        .await
    {
        tracing::warn!(error = %e, "signer-b: failed to advance db checkpoint, relying on file fallback");
    }
    if let Err(e) = ctx.checkpoint_file_b.write(cursor).await {
        tracing::warn!(error = %e, "signer-b: failed to write checkpoint file");
    }
    crate::util::metrics::record_last_nonce_b(cursor);
}

/// Returns `Ok(true)` when nonce `nonce` held a burn and was fully
/// processed (checkpoint should advance), `Ok(false)` when there is no burn
/// there yet (the ordinary idle condition).
async fn process_nonce(ctx: &Context, nonce: u64) -> Result<bool, CoreError> {
    let burns = ctx
        .chain_b
        .query_burns(nonce, nonce)
        .await
        .map_err(|e| rpc_err("chain-b", e.is_retriable(), e))?;
    let Some(burn) = burns.into_iter().find(|b| b.nonce == nonce) else {
        return Ok(false);
    };

    let swap_id = SwapId::new(Direction::BToA, nonce);
    let chain_b_token = ChainBToken(burn.token.clone());
    let chain_a_token = match ctx.token_map.resolve_b_to_a(&chain_b_token) {
        Some(t) => t.clone(),
        None => {
            tracing::error!(swap_id = %swap_id, token = %burn.token, "signer-b: no chain-a token mapped, skipping burn");
            return Ok(true);
        }
    };

    let destination_bytes = base64_decode(&burn.destination).map_err(|reason| {
        CoreError::ValidationMismatch { swap_id: swap_id.clone(), reason }
    })?;
    if destination_bytes.len() != 20 {
        tracing::error!(swap_id = %swap_id, "signer-b: destination is not a 20-byte chain-a address, skipping burn");
        return Ok(true);
    }
    let destination = Address::from_slice(&destination_bytes);

    let amount: u128 = burn.amount.parse().map_err(|_| CoreError::ValidationMismatch {
        swap_id: swap_id.clone(),
        reason: format!("chain-b amount {:?} is not a valid integer", burn.amount),
    })?;
    let amount_u256 = U256::from(amount);

    let (release_destination, value, data, token_field) = match &chain_a_token {
        ChainAToken::Native => (destination, amount_u256, Bytes::new(), "native".to_string()),
        ChainAToken::Erc20(addr) => {
            let token_contract = Address::from_str(addr).map_err(|e| CoreError::ValidationMismatch {
                swap_id: swap_id.clone(),
                reason: format!("mapped chain-a token address {addr:?} is invalid: {e}"),
            })?;
            let call = IERC20::transferCall {
                recipient: destination,
                amount: amount_u256,
            };
            (token_contract, U256::ZERO, Bytes::from(call.abi_encode()), addr.clone())
        }
    };

    let payload = EvmChainClient::encode_release_payload(release_destination, value, &data);
    let signature = ctx
        .chain_a
        .sign_payload(&payload)
        .await
        .map_err(|e| rpc_err("chain-a", e.is_retriable(), e))?;

    let now = now_secs();
    let swap = Swap {
        id: swap_id.clone(),
        direction: Direction::BToA,
        nonce,
        source_tx: format!("burn:{nonce}"),
        amount,
        destination: burn.destination.clone(),
        token: token_field,
        unsigned_tx: payload.to_vec(),
        status: SwapStatus::Observed,
        created_at: now,
        updated_at: now,
    };
    let (swap, outcome) = ctx.swaps.create_if_absent(swap).await?;
    if outcome == bridge_store::CreateOutcome::Created {
        crate::util::metrics::record_status_transition(None, SwapStatus::Observed);
    }

    let record = SignatureRecord {
        swap_id: swap_id.clone(),
        signer_identity: ctx.config.signer_identity.clone(),
        signed_payload: signature.to_vec(),
    };
    ctx.signatures.add(record, swap.status).await?;

    tracing::info!(swap_id = %swap_id, "signer-b: signed release payload");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn erc20_release_payload_encodes_transfer_call() {
        let recipient = alloy_primitives::address!("000000000000000000000000000000000000dd");
        let token_contract = alloy_primitives::address!("00000000000000000000000000000000abcdef");
        let call = IERC20::transferCall {
            recipient,
            amount: U256::from(500u64),
        };
        let data = Bytes::from(call.abi_encode());
        let payload = EvmChainClient::encode_release_payload(token_contract, U256::ZERO, &data);
        let (destination, value, decoded_data) =
            EvmChainClient::decode_release_payload(&payload).unwrap();
        assert_eq!(destination, token_contract);
        assert_eq!(value, U256::ZERO);
        assert_eq!(decoded_data, data);
    }
}
