//! Bridge-level metrics: last-processed cursor per pipeline, pending-swap
//! counts by status, and signatures collected per released swap. Recorded at
//! checkpoint-advance and status-transition points in the signer/leader
//! loops. Every function is a no-op when built without the `telemetry`
//! feature, so call sites never need their own `cfg` gate.

#[cfg(feature = "telemetry")]
use opentelemetry::{KeyValue, global};

use bridge_types::model::SwapStatus;

#[cfg(feature = "telemetry")]
fn meter() -> opentelemetry::metrics::Meter {
    global::meter("bridge")
}

#[cfg(feature = "telemetry")]
fn status_label(status: SwapStatus) -> &'static str {
    match status {
        SwapStatus::Observed => "observed",
        SwapStatus::Signed => "signed",
        SwapStatus::Submitted => "submitted",
        SwapStatus::Confirmed => "confirmed",
        SwapStatus::Failed => "failed",
    }
}

/// Last chain-A block SignerA has checkpointed past.
pub fn record_last_block_a(block: u64) {
    #[cfg(feature = "telemetry")]
    meter().u64_gauge("bridge_last_processed_block_a").build().record(block, &[]);
    #[cfg(not(feature = "telemetry"))]
    let _ = block;
}

/// Last chain-B burn nonce SignerB has checkpointed past.
pub fn record_last_nonce_b(nonce: u64) {
    #[cfg(feature = "telemetry")]
    meter().u64_gauge("bridge_last_processed_nonce_b").build().record(nonce, &[]);
    #[cfg(not(feature = "telemetry"))]
    let _ = nonce;
}

/// A swap moved from `from` (`None` on first creation) to `to`. Adjusts the
/// per-status pending count so it always reflects the current distribution
/// of in-flight swaps.
pub fn record_status_transition(from: Option<SwapStatus>, to: SwapStatus) {
    #[cfg(feature = "telemetry")]
    {
        let counter = meter().i64_up_down_counter("bridge_pending_swaps").build();
        if let Some(from) = from {
            counter.add(-1, &[KeyValue::new("status", status_label(from))]);
        }
        counter.add(1, &[KeyValue::new("status", status_label(to))]);
    }
    #[cfg(not(feature = "telemetry"))]
    {
        let _ = (from, to);
    }
}

/// Distinct signatures collected for a swap at the moment its release
/// broadcasts, i.e. how far past the threshold quorum landed.
pub fn record_signatures_per_swap(count: u64) {
    #[cfg(feature = "telemetry")]
    meter().u64_histogram("bridge_signatures_per_swap").build().record(count, &[]);
    #[cfg(not(feature = "telemetry"))]
    let _ = count;
}
