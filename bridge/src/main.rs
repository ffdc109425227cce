//! Cross-chain bridge process entrypoint.
//!
//! Every process runs the A→B and B→A signer loops; the process configured
//! `is_leader: true` also runs the two leader loops that broadcast once
//! their respective quorum is reached. There is no separate leader binary —
//! see [`bridge_core::supervisor`].

mod run;

use std::process;

use bridge_core::util::Telemetry;

use crate::run::run;

#[tokio::main]
async fn main() {
    let _telemetry = Telemetry::new();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "bridge: fatal startup error");
        process::exit(1)
    }
}
