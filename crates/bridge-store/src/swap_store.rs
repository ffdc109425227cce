//! Durable queue of in-flight swaps, backed by a `swap` document collection
//! indexed uniquely on `(direction, nonce)` and on `id`, and non-uniquely on
//! `status`.

use bridge_types::model::{Direction, Swap, SwapId, SwapStatus};
use mongodb::bson::{doc, to_bson};
use mongodb::options::{FindOptions, IndexOptions};
use mongodb::{Collection, Database, IndexModel};

use crate::error::StoreError;

/// Outcome of an idempotent insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
}

#[derive(Clone)]
pub struct SwapStore {
    collection: Collection<Swap>,
}

impl SwapStore {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection("swap"),
        }
    }

    /// Creates the unique indexes this store relies on. Idempotent: safe to call
    /// on every process startup.
    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let direction_nonce = IndexModel::builder()
            .keys(doc! { "direction": 1, "nonce": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        let id_unique = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        let status_index = IndexModel::builder().keys(doc! { "status": 1 }).build();
        self.collection
            .create_indexes(vec![direction_nonce, id_unique, status_index])
            .await?;
        Ok(())
    }

    /// Atomic insert keyed by `(direction, nonce)`. On a duplicate key, fetches
    /// and returns the existing record instead of erroring — the caller treats
    /// re-observation of an already-known event as a no-op.
    pub async fn create_if_absent(&self, record: Swap) -> Result<(Swap, CreateOutcome), StoreError> {
        match self.collection.insert_one(&record).await {
            Ok(_) => Ok((record, CreateOutcome::Created)),
            Err(e) => {
                let err: StoreError = e.into();
                if err.is_duplicate() {
                    let existing = self
                        .get_by_direction_nonce(record.direction, record.nonce)
                        .await?
                        .ok_or_else(|| StoreError::NotFound(record.id.to_string()))?;
                    Ok((existing, CreateOutcome::AlreadyExists))
                } else {
                    Err(err)
                }
            }
        }
    }

    /// Compare-and-set the status field. Fails closed: if `from` does not match
    /// the persisted status (another writer already moved it, or it never was
    /// `from`), no write happens and `InvalidTransition` is returned.
    pub async fn set_status(
        &self,
        id: &SwapId,
        from: SwapStatus,
        to: SwapStatus,
        now: i64,
    ) -> Result<(), StoreError> {
        if !from.can_transition_to(to) {
            return Err(StoreError::InvalidTransition {
                id: id.to_string(),
                from,
                to,
            });
        }
        let filter = doc! {
            "id": to_bson(id).map_err(mongodb::error::Error::from)?,
            "status": to_bson(&from).map_err(mongodb::error::Error::from)?,
        };
        let update = doc! { "$set": { "status": to_bson(&to).map_err(mongodb::error::Error::from)?, "updated_at": now } };
        let result = self.collection.update_one(filter, update).await?;
        if result.matched_count == 0 {
            return Err(StoreError::InvalidTransition {
                id: id.to_string(),
                from,
                to,
            });
        }
        Ok(())
    }

    /// Records in ascending `(direction, nonce)` order.
    pub async fn list_by_status(&self, status: SwapStatus) -> Result<Vec<Swap>, StoreError> {
        use futures_util::TryStreamExt;
        let filter = doc! { "status": to_bson(&status).map_err(mongodb::error::Error::from)? };
        let options = FindOptions::builder()
            .sort(doc! { "direction": 1, "nonce": 1 })
            .build();
        let cursor = self.collection.find(filter).with_options(options).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn get(&self, id: &SwapId) -> Result<Option<Swap>, StoreError> {
        let filter = doc! { "id": to_bson(id).map_err(mongodb::error::Error::from)? };
        Ok(self.collection.find_one(filter).await?)
    }

    async fn get_by_direction_nonce(
        &self,
        direction: Direction,
        nonce: u64,
    ) -> Result<Option<Swap>, StoreError> {
        let filter = doc! {
            "direction": to_bson(&direction).map_err(mongodb::error::Error::from)?,
            "nonce": nonce as i64,
        };
        Ok(self.collection.find_one(filter).await?)
    }
}
