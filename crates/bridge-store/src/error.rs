//! Error taxonomy for the persistence layer.
//!
//! One closed enum for the store crate boundary, following the convention of
//! one `thiserror` enum per module rather than a single workspace-wide type.
//! `is_retriable`/`is_fatal`/`is_duplicate` are consulted by `bridge-core`'s
//! `TransientDb` conversion and by this crate's own stores (see
//! `SwapStore::create_if_absent` and `SignatureStore::add`), so callers never
//! match variants by hand.

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("transient database error: {0}")]
    TransientDb(#[from] mongodb::error::Error),
    #[error("duplicate insert for {0}, treated as success")]
    Duplicate(String),
    #[error("no record found for {0}")]
    NotFound(String),
    #[error("status transition {from:?} -> {to:?} is not permitted for {id}")]
    InvalidTransition {
        id: String,
        from: bridge_types::model::SwapStatus,
        to: bridge_types::model::SwapStatus,
    },
    #[error("signature rejected for {id}: swap status is {status:?}, not observed or signed")]
    InvalidSignatureTarget {
        id: String,
        status: bridge_types::model::SwapStatus,
    },
    #[error("checkpoint file error: {0}")]
    CheckpointFile(#[from] std::io::Error),
}

impl StoreError {
    pub fn is_retriable(&self) -> bool {
        matches!(self, StoreError::TransientDb(_) | StoreError::CheckpointFile(_))
    }

    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            StoreError::InvalidTransition { .. } | StoreError::InvalidSignatureTarget { .. }
        )
    }

    /// Duplicate inserts are benign: the caller should treat them as success.
    /// A `TransientDb` wrapping a duplicate-key write error counts too, so
    /// callers can convert the raw driver error with `.into()` and classify
    /// it without reaching into `mongo_util` themselves.
    pub fn is_duplicate(&self) -> bool {
        match self {
            StoreError::Duplicate(_) => true,
            StoreError::TransientDb(e) => crate::mongo_util::is_duplicate_key_error(e),
            _ => false,
        }
    }
}
