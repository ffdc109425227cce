//! Process lifecycle: spawns the worker loops this process is configured to
//! run and waits for all of them to wind down after a shutdown signal.
//!
//! Every process runs [`signer_a::run`] and [`signer_b::run`]; only the one
//! process designated `is_leader` in [`crate::config::Config`] also runs
//! [`leader_a::run`] and [`leader_b::run`] — there is no separate leader
//! binary, mirroring the source's single entrypoint gated by a config flag.
//! Each loop is its own `tokio` task so a panic or a stuck RPC call in one
//! cannot wedge the others; [`tokio_util::task::TaskTracker`] tracks all four
//! the same way [`crate::util::sig_down::SigDown`] tracks its own
//! signal-handling task, just scaled up.

use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::context::Context;
use crate::error::CoreError;
use crate::loop_util::sleep_or_cancel;
use crate::{leader_a, leader_b, signer_a, signer_b};

/// Spawns every worker loop this process is configured to run, and waits for
/// all of them to exit after `cancel` fires.
pub async fn run(ctx: Context, cancel: CancellationToken) -> Result<(), CoreError> {
    let tracker = TaskTracker::new();

    spawn_loop(&tracker, "signer-a", ctx.clone(), cancel.clone(), signer_a::run);
    spawn_loop(&tracker, "signer-b", ctx.clone(), cancel.clone(), signer_b::run);
    if ctx.config.is_leader {
        spawn_loop(&tracker, "leader-a", ctx.clone(), cancel.clone(), leader_a::run);
        spawn_loop(&tracker, "leader-b", ctx.clone(), cancel.clone(), leader_b::run);
    } else {
        tracing::info!("supervisor: is_leader is false, leader loops will not run on this process");
    }
    spawn_catch_up_watcher(&tracker, ctx.clone(), cancel.clone());

    tracker.close();
    tracker.wait().await;
    Ok(())
}

/// Polls `ctx.fully_caught_up()` until both signer loops have replayed their
/// backlog at least once, then logs and exits; a health check can watch for
/// this log line, or consult `Context::fully_caught_up` directly in-process.
fn spawn_catch_up_watcher(tracker: &TaskTracker, ctx: Context, cancel: CancellationToken) {
    tracker.spawn(async move {
        while !cancel.is_cancelled() {
            if ctx.fully_caught_up() {
                tracing::info!("supervisor: both signer loops have caught up");
                return;
            }
            sleep_or_cancel(&cancel, 2).await;
        }
    });
}

fn spawn_loop<F, Fut>(
    tracker: &TaskTracker,
    name: &'static str,
    ctx: Context,
    cancel: CancellationToken,
    f: F,
) where
    F: FnOnce(Context, CancellationToken) -> Fut + Send + 'static,
    Fut: std::future::Future<Output = Result<(), CoreError>> + Send + 'static,
{
    tracker.spawn(async move {
        tracing::info!(loop_name = name, "supervisor: starting loop");
        match f(ctx, cancel).await {
            Ok(()) => tracing::info!(loop_name = name, "supervisor: loop exited cleanly"),
            Err(e) => tracing::error!(loop_name = name, error = %e, "supervisor: loop exited with a fatal error"),
        }
    });
}
