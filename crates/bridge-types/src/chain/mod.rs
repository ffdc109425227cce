//! Shared chain-construction plumbing.
//!
//! This bridge talks to exactly two fixed chains (A and B), so there is no chain
//! registry here — each chain crate exposes a single concrete client type. What is
//! shared is the convention for building that client from configuration.

/// Asynchronously constructs an instance of `Self` from a configuration type.
///
/// Used by both chain clients (`bridge-chain-a`, `bridge-chain-b`) to build themselves
/// from their respective config structs, keeping construction (RPC dialing, signer
/// loading) out of `main` and in one place per client.
#[async_trait::async_trait]
pub trait FromConfig<TConfig>
where
    Self: Sized,
{
    type Error: std::error::Error;

    async fn from_config(config: &TConfig) -> Result<Self, Self::Error>;
}
