//! Shared plumbing for the four worker loops: a cancellation-aware sleep,
//! the generic retry wrapper every loop's `run` hands its per-tick body to,
//! the `TransientRpc` wrapper, base64 destination encoding, and a wall-clock
//! timestamp helper, so each loop module reads as pure business logic.

use tokio_util::sync::CancellationToken;

use crate::error::CoreError;

/// Sleeps for `secs`, waking early if `cancel` fires. Returns `true` if the
/// sleep ran to completion, `false` if cancellation cut it short.
pub async fn sleep_or_cancel(cancel: &CancellationToken, secs: u64) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(std::time::Duration::from_secs(secs)) => true,
        _ = cancel.cancelled() => false,
    }
}

/// Generic retry wrapper shared by every signer/leader loop's `run` function.
/// `tick` is called repeatedly until `cancel` fires: `Ok(true)` means it made
/// progress and should be called again immediately, `Ok(false)` means there
/// was nothing to do and the loop sleeps `idle_secs`, and `Err` is logged
/// (using [`CoreError::is_retriable`] only to annotate the log line) and
/// followed by the same sleep — unless [`CoreError::is_fatal`] says so, in
/// which case it propagates out so the supervisor can log the loop as exited.
pub async fn run_loop<F, Fut>(
    cancel: &CancellationToken,
    idle_secs: u64,
    mut tick: F,
) -> Result<(), CoreError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<bool, CoreError>>,
{
    while !cancel.is_cancelled() {
        match tick().await {
            Ok(true) => {}
            Ok(false) => {
                sleep_or_cancel(cancel, idle_secs).await;
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                tracing::warn!(error = %e, retriable = e.is_retriable(), "worker loop iteration failed, retrying");
                sleep_or_cancel(cancel, idle_secs).await;
            }
        }
    }
    Ok(())
}

/// Wraps a chain-client error as a `TransientRpc` for propagation up through
/// a worker loop's retry handling. `retriable` should come from the source
/// error's own classification (e.g. `EvmClientError::is_retriable`), computed
/// by the caller before the error is boxed away.
pub fn rpc_err(
    chain: &'static str,
    retriable: bool,
    e: impl std::error::Error + Send + Sync + 'static,
) -> CoreError {
    CoreError::TransientRpc {
        chain,
        retriable,
        source: Box::new(e),
    }
}

pub fn now_secs() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

pub fn base64_encode(bytes: &[u8]) -> String {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

pub fn base64_decode(s: &str) -> Result<Vec<u8>, String> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD
        .decode(s)
        .map_err(|e| format!("invalid base64 destination {s:?}: {e}"))
}
