#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Persistence layer for the cross-chain bridge: a document-store-backed
//! swap queue, signature collection, and per-signer checkpoint, plus a
//! file-based checkpoint fallback for when the store is unreachable.

mod mongo_util;

pub mod checkpoint_file;
pub mod checkpoint_store;
pub mod error;
pub mod signature_store;
pub mod swap_store;

pub use checkpoint_file::CheckpointFile;
pub use checkpoint_store::CheckpointStore;
pub use error::StoreError;
pub use signature_store::{AddOutcome, SignatureStore};
pub use swap_store::{CreateOutcome, SwapStore};
