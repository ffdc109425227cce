#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Bridge signer/leader business logic: event tailing, cross-chain
//! validation, signature collection, and broadcast, built on the chain
//! clients in `bridge-chain-a`/`bridge-chain-b` and the durable queue in
//! `bridge-store`.
//!
//! Every component here is constructed from an explicit [`context::Context`]
//! built once at process startup — there is no module-level global state.

pub mod config;
pub mod context;
pub mod error;
pub mod event_stream;
pub mod leader_a;
pub mod leader_b;
pub mod loop_util;
pub mod signer_a;
pub mod signer_b;
pub mod supervisor;
pub mod util;

pub use context::Context;
pub use error::CoreError;
