//! Collected per-swap signatures, backed by a `signature` document collection
//! uniquely indexed on `(swap_id, signer_identity)`.

use bridge_types::model::{SignatureRecord, SwapId, SwapStatus};
use mongodb::bson::{doc, to_bson};
use mongodb::options::IndexOptions;
use mongodb::{Collection, Database, IndexModel};

use crate::error::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    Duplicate,
}

#[derive(Clone)]
pub struct SignatureStore {
    collection: Collection<SignatureRecord>,
}

impl SignatureStore {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection("signature"),
        }
    }

    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let unique_pair = IndexModel::builder()
            .keys(doc! { "swap_id": 1, "signer_identity": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_indexes(vec![unique_pair]).await?;
        Ok(())
    }

    /// Inserts a partial signature for a swap currently in `swap_status`. A
    /// signature may only be accepted while the swap is `Observed` or
    /// `Signed`; past that point quorum has already been acted on (or the
    /// swap failed) and a new signature can no longer change the outcome.
    /// A duplicate `(swap_id, signer)` is benign: it is reported, not raised
    /// as an error.
    pub async fn add(
        &self,
        record: SignatureRecord,
        swap_status: SwapStatus,
    ) -> Result<AddOutcome, StoreError> {
        if !matches!(swap_status, SwapStatus::Observed | SwapStatus::Signed) {
            return Err(StoreError::InvalidSignatureTarget {
                id: record.swap_id.to_string(),
                status: swap_status,
            });
        }
        match self.collection.insert_one(&record).await {
            Ok(_) => Ok(AddOutcome::Added),
            Err(e) => {
                let err: StoreError = e.into();
                if err.is_duplicate() {
                    Ok(AddOutcome::Duplicate)
                } else {
                    Err(err)
                }
            }
        }
    }

    pub async fn count(&self, swap_id: &SwapId) -> Result<u64, StoreError> {
        let filter = doc! { "swap_id": to_bson(swap_id).map_err(mongodb::error::Error::from)? };
        Ok(self.collection.count_documents(filter).await?)
    }

    pub async fn list(&self, swap_id: &SwapId) -> Result<Vec<SignatureRecord>, StoreError> {
        use futures_util::TryStreamExt;
        let filter = doc! { "swap_id": to_bson(swap_id).map_err(mongodb::error::Error::from)? };
        let cursor = self.collection.find(filter).await?;
        Ok(cursor.try_collect().await?)
    }
}
