//! Per-signer, per-direction durable cursor: last fully-processed A block
//! (A→B) or B burn nonce (B→A). Backed by a `checkpoint` document collection,
//! one document per `(signer_identity_hash, direction)`.

use bridge_types::model::{Checkpoint, Direction};
use mongodb::bson::doc;
use mongodb::options::{IndexOptions, ReplaceOptions};
use mongodb::{Collection, Database, IndexModel};

use crate::error::StoreError;

#[derive(Clone)]
pub struct CheckpointStore {
    collection: Collection<Checkpoint>,
}

impl CheckpointStore {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection("checkpoint"),
        }
    }

    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let unique_pair = IndexModel::builder()
            .keys(doc! { "signer_identity_hash": 1, "direction": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_indexes(vec![unique_pair]).await?;
        Ok(())
    }

    pub async fn get(
        &self,
        signer_identity_hash: u64,
        direction: Direction,
    ) -> Result<Option<u64>, StoreError> {
        let filter = doc! {
            "signer_identity_hash": signer_identity_hash as i64,
            "direction": direction_str(direction),
        };
        Ok(self.collection.find_one(filter).await?.map(|c| c.cursor))
    }

    /// Advances the checkpoint. Callers must only ever pass a `cursor` that is
    /// greater than or equal to the previously stored value — this store does
    /// not itself enforce monotonicity, since the caller always computes the
    /// next cursor from the current one.
    pub async fn advance(
        &self,
        signer_identity_hash: u64,
        direction: Direction,
        cursor: u64,
    ) -> Result<(), StoreError> {
        let filter = doc! {
            "signer_identity_hash": signer_identity_hash as i64,
            "direction": direction_str(direction),
        };
        let replacement = Checkpoint {
            signer_identity_hash,
            direction,
            cursor,
        };
        self.collection
            .replace_one(filter, replacement)
            .with_options(ReplaceOptions::builder().upsert(true).build())
            .await?;
        Ok(())
    }
}

fn direction_str(direction: Direction) -> &'static str {
    match direction {
        Direction::AToB => "AToB",
        Direction::BToA => "BToA",
    }
}
