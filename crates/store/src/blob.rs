use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, NotSet, QueryOrder, Set};
use tracing::debug;

use models::blob_record;

use crate::codec::{maps_equal, JsonCodec, ValueCodec};
use crate::errors::StoreError;

/// In-memory view of a blob record. `id` is 0 until the first save assigns
/// the surrogate key; `created_at` is fixed at construction.
#[derive(Debug, Clone)]
pub struct BlobEntry {
    pub id: i32,
    pub created_at: sea_orm::prelude::DateTimeWithTimeZone,
    pub values: HashMap<String, String>,
    // Snapshot of the last persisted state, used for change tracking.
    persisted: Option<HashMap<String, String>>,
}

/// Store persisting a whole key/value map as one serialized column.
///
/// Reads are all-or-nothing: there is no way to project a subset of the map
/// at the storage layer, the entire blob is always decoded.
#[derive(Debug, Clone, Default)]
pub struct BlobStore<C: ValueCodec = JsonCodec> {
    codec: C,
}

impl BlobStore<JsonCodec> {
    pub fn new() -> Self {
        Self { codec: JsonCodec }
    }
}

impl<C: ValueCodec> BlobStore<C> {
    pub fn with_codec(codec: C) -> Self {
        Self { codec }
    }

    /// Construct an unsaved entry holding a copy of `initial`.
    pub fn create(&self, initial: &HashMap<String, String>) -> BlobEntry {
        BlobEntry {
            id: 0,
            created_at: Utc::now().into(),
            values: initial.clone(),
            persisted: None,
        }
    }

    /// Persist the entry, encoding the map at the storage boundary. The first
    /// save inserts and assigns the id; later saves update the column, and are
    /// skipped entirely when the map is unchanged.
    pub async fn save(&self, db: &DatabaseConnection, entry: &mut BlobEntry) -> Result<(), StoreError> {
        if let Some(prev) = &entry.persisted {
            if maps_equal(prev, &entry.values) {
                debug!(id = entry.id, "blob unchanged, skipping write");
                return Ok(());
            }
        }
        let encoded = self.codec.encode(&entry.values)?;
        if entry.id == 0 {
            let am = blob_record::ActiveModel {
                id: NotSet,
                created_at: Set(entry.created_at),
                values: Set(encoded),
            };
            let model = am.insert(db).await.map_err(|e| StoreError::Persistence(e.to_string()))?;
            entry.id = model.id;
            debug!(id = entry.id, "blob inserted");
        } else {
            // created_at stays untouched on update
            let am = blob_record::ActiveModel {
                id: Set(entry.id),
                created_at: NotSet,
                values: Set(encoded),
            };
            am.update(db).await.map_err(|e| StoreError::Persistence(e.to_string()))?;
            debug!(id = entry.id, "blob updated");
        }
        entry.persisted = Some(entry.values.clone());
        Ok(())
    }

    /// Fetch the record with the maximal `created_at` (ties break by id) and
    /// decode its column. Fails with `NotFound` on an empty table, or with a
    /// `Deserialization` error bubbled from the codec.
    pub async fn load_latest(&self, db: &DatabaseConnection) -> Result<BlobEntry, StoreError> {
        let model = blob_record::Entity::find()
            .order_by_desc(blob_record::Column::CreatedAt)
            .order_by_desc(blob_record::Column::Id)
            .one(db)
            .await
            .map_err(|e| StoreError::Persistence(e.to_string()))?
            .ok_or_else(|| StoreError::not_found("blob record"))?;
        let values = self.codec.decode(&model.values)?;
        Ok(BlobEntry {
            id: model.id,
            created_at: model.created_at,
            persisted: Some(values.clone()),
            values,
        })
    }
}
