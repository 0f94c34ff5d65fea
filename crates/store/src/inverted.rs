use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, NotSet,
    QueryFilter, QueryOrder, Set,
};
use tracing::debug;

use models::{value_row, value_set};

use crate::errors::StoreError;

/// One key/value pair of a set. Ids are 0 until the owning set is saved.
#[derive(Debug, Clone)]
pub struct ValueRowEntry {
    pub id: i32,
    pub set_id: i32,
    pub name: String,
    pub value: String,
    // Persisted row whose value was mutated in memory and needs an UPDATE.
    dirty: bool,
}

/// In-memory view of a parent row plus its owned key/value rows.
#[derive(Debug, Clone)]
pub struct ValueSetEntry {
    pub id: i32,
    pub created_at: sea_orm::prelude::DateTimeWithTimeZone,
    pub values: Vec<ValueRowEntry>,
}

impl Default for ValueSetEntry {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueSetEntry {
    pub fn new() -> Self {
        Self {
            id: 0,
            created_at: Utc::now().into(),
            values: Vec::new(),
        }
    }

    /// In-memory upsert by name, matched case-insensitively (ASCII). An
    /// existing row keeps its stored name casing and has its value replaced;
    /// otherwise a new row is appended. Returns `self` for chaining.
    ///
    /// Caller obligation: this only deduplicates against rows currently in
    /// memory. If `values` holds a subset of the persisted rows, saving can
    /// create duplicate names in storage. Load the full set first, or use
    /// [`InvertedStore::upsert_value`] to check storage before upserting.
    pub fn add_value(&mut self, name: &str, value: &str) -> &mut Self {
        match self.values.iter_mut().find(|r| r.name.eq_ignore_ascii_case(name)) {
            Some(row) => {
                row.value = value.to_string();
                if row.id != 0 {
                    row.dirty = true;
                }
            }
            None => self.values.push(ValueRowEntry {
                id: 0,
                set_id: self.id,
                name: name.to_string(),
                value: value.to_string(),
                dirty: false,
            }),
        }
        self
    }
}

/// Store persisting key/value pairs as individual child rows joined to a
/// parent set. Child rows are removed by the schema's FK cascade when the
/// parent is deleted.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvertedStore;

impl InvertedStore {
    pub fn new() -> Self {
        Self
    }

    /// Construct an unsaved set with no rows.
    pub fn create(&self) -> ValueSetEntry {
        ValueSetEntry::new()
    }

    /// Persist the parent (first save only) and its rows: new rows are
    /// inserted with the parent's id, mutated rows are updated in place.
    pub async fn save(&self, db: &DatabaseConnection, entry: &mut ValueSetEntry) -> Result<(), StoreError> {
        if entry.id == 0 {
            let am = value_set::ActiveModel {
                id: NotSet,
                created_at: Set(entry.created_at),
            };
            let model = am.insert(db).await.map_err(|e| StoreError::Persistence(e.to_string()))?;
            entry.id = model.id;
            debug!(id = entry.id, "value set inserted");
        }
        for row in &mut entry.values {
            if row.id == 0 {
                let am = value_row::ActiveModel {
                    id: NotSet,
                    set_id: Set(entry.id),
                    name: Set(row.name.clone()),
                    value: Set(row.value.clone()),
                };
                let model = am.insert(db).await.map_err(|e| StoreError::Persistence(e.to_string()))?;
                row.id = model.id;
                row.set_id = entry.id;
            } else if row.dirty {
                let am = value_row::ActiveModel {
                    id: Set(row.id),
                    set_id: NotSet,
                    name: NotSet,
                    value: Set(row.value.clone()),
                };
                am.update(db).await.map_err(|e| StoreError::Persistence(e.to_string()))?;
                row.dirty = false;
            }
        }
        Ok(())
    }

    /// Fetch the parent with the maximal `created_at` (ties break by id) and
    /// eagerly load its rows, optionally restricted to an exact name.
    /// Fails with `NotFound` when no parent rows exist.
    ///
    /// A name filter yields a partially loaded entry; see the
    /// [`ValueSetEntry::add_value`] caller obligation before upserting into
    /// one.
    pub async fn load_latest_with_values(
        &self,
        db: &DatabaseConnection,
        name_filter: Option<&str>,
    ) -> Result<ValueSetEntry, StoreError> {
        let parent = value_set::Entity::find()
            .order_by_desc(value_set::Column::CreatedAt)
            .order_by_desc(value_set::Column::Id)
            .one(db)
            .await
            .map_err(|e| StoreError::Persistence(e.to_string()))?
            .ok_or_else(|| StoreError::not_found("value set"))?;

        let mut query = parent.find_related(value_row::Entity);
        if let Some(name) = name_filter {
            query = query.filter(value_row::Column::Name.eq(name));
        }
        let rows = query
            .order_by_asc(value_row::Column::Id)
            .all(db)
            .await
            .map_err(|e| StoreError::Persistence(e.to_string()))?;

        Ok(ValueSetEntry {
            id: parent.id,
            created_at: parent.created_at,
            values: rows.into_iter().map(row_entry).collect(),
        })
    }

    /// Storage-checked upsert: merges any persisted rows missing from the
    /// in-memory entry before delegating to [`ValueSetEntry::add_value`],
    /// trading one round-trip for duplicate safety under partial loads.
    /// The caller still saves afterwards.
    pub async fn upsert_value(
        &self,
        db: &DatabaseConnection,
        entry: &mut ValueSetEntry,
        name: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        if entry.id != 0 {
            let rows = value_row::Entity::find()
                .filter(value_row::Column::SetId.eq(entry.id))
                .order_by_asc(value_row::Column::Id)
                .all(db)
                .await
                .map_err(|e| StoreError::Persistence(e.to_string()))?;
            for model in rows {
                if !entry.values.iter().any(|r| r.id == model.id) {
                    entry.values.push(row_entry(model));
                }
            }
        }
        entry.add_value(name, value);
        Ok(())
    }

    /// Delete the parent row; child rows disappear via the FK cascade.
    pub async fn delete(&self, db: &DatabaseConnection, entry: ValueSetEntry) -> Result<(), StoreError> {
        value_set::Entity::delete_by_id(entry.id)
            .exec(db)
            .await
            .map_err(|e| StoreError::Persistence(e.to_string()))?;
        debug!(id = entry.id, "value set deleted");
        Ok(())
    }
}

fn row_entry(model: value_row::Model) -> ValueRowEntry {
    ValueRowEntry {
        id: model.id,
        set_id: model.set_id,
        name: model.name,
        value: model.value,
        dirty: false,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use sea_orm::PaginatorTrait;

    use super::*;
    use crate::test_support::get_db;

    #[test]
    fn add_value_upsert_is_case_insensitive_and_last_wins() {
        let mut entry = ValueSetEntry::new();
        entry.add_value("Name", "first").add_value("NAME", "second");
        assert_eq!(entry.values.len(), 1);
        // Stored casing comes from the first insert; the value from the last.
        assert_eq!(entry.values[0].name, "Name");
        assert_eq!(entry.values[0].value, "second");
    }

    #[test]
    fn add_value_appends_new_names_without_touching_others() {
        let mut entry = ValueSetEntry::new();
        entry.add_value("Name", "Khalid");
        entry.add_value("Status", "Awesome");
        assert_eq!(entry.values.len(), 2);
        assert_eq!(entry.values[0].value, "Khalid");
        assert_eq!(entry.values[1].name, "Status");
    }

    #[tokio::test]
    async fn save_then_load_latest_with_values() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let store = InvertedStore::new();

        let mut entry = store.create();
        entry
            .add_value("Name", "Khalid")
            .add_value("Status", "Awesome... Again!");
        store.save(&db, &mut entry).await?;
        assert!(entry.id > 0);
        assert!(entry.values.iter().all(|r| r.id > 0 && r.set_id == entry.id));

        let loaded = store.load_latest_with_values(&db, None).await?;
        assert_eq!(loaded.id, entry.id);
        assert_eq!(loaded.values.len(), 2);
        assert_eq!(loaded.values[0].name, "Name");
        assert_eq!(loaded.values[0].value, "Khalid");
        assert_eq!(loaded.values[1].name, "Status");
        assert_eq!(loaded.values[1].value, "Awesome... Again!");
        Ok(())
    }

    #[tokio::test]
    async fn load_latest_on_empty_table_is_not_found() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let err = InvertedStore::new()
            .load_latest_with_values(&db, None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        Ok(())
    }

    #[tokio::test]
    async fn load_latest_returns_the_newest_set() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let store = InvertedStore::new();

        let mut first = store.create();
        first.add_value("which", "first");
        store.save(&db, &mut first).await?;
        tokio::time::sleep(Duration::from_millis(5)).await;
        let mut second = store.create();
        second.add_value("which", "second");
        store.save(&db, &mut second).await?;

        let latest = store.load_latest_with_values(&db, None).await?;
        assert_eq!(latest.id, second.id);
        assert_eq!(latest.values[0].value, "second");
        Ok(())
    }

    #[tokio::test]
    async fn name_filter_restricts_the_eager_load() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let store = InvertedStore::new();

        let mut entry = store.create();
        entry.add_value("Name", "Khalid").add_value("Status", "Awesome");
        store.save(&db, &mut entry).await?;

        let loaded = store.load_latest_with_values(&db, Some("Status")).await?;
        assert_eq!(loaded.values.len(), 1);
        assert_eq!(loaded.values[0].name, "Status");
        Ok(())
    }

    #[tokio::test]
    async fn updating_a_loaded_row_persists_the_new_value() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let store = InvertedStore::new();

        let mut entry = store.create();
        entry.add_value("Status", "Awesome");
        store.save(&db, &mut entry).await?;

        let mut loaded = store.load_latest_with_values(&db, None).await?;
        loaded.add_value("status", "Awesome... Again!");
        assert_eq!(loaded.values.len(), 1);
        store.save(&db, &mut loaded).await?;

        let reread = store.load_latest_with_values(&db, None).await?;
        assert_eq!(reread.values.len(), 1);
        assert_eq!(reread.values[0].name, "Status");
        assert_eq!(reread.values[0].value, "Awesome... Again!");
        Ok(())
    }

    #[tokio::test]
    async fn deleting_a_set_cascades_to_its_rows() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let store = InvertedStore::new();

        let mut entry = store.create();
        entry.add_value("Name", "Khalid").add_value("Status", "Awesome");
        store.save(&db, &mut entry).await?;
        assert_eq!(value_row::Entity::find().count(&db).await?, 2);

        store.delete(&db, entry).await?;
        assert_eq!(value_set::Entity::find().count(&db).await?, 0);
        assert_eq!(value_row::Entity::find().count(&db).await?, 0);
        Ok(())
    }

    // The documented partial-load foot-gun: upserting into an entry holding a
    // subset of the persisted rows creates a duplicate name. Expected, not a
    // failure.
    #[tokio::test]
    async fn partial_load_can_create_duplicate_names() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let store = InvertedStore::new();

        let mut entry = store.create();
        entry.add_value("Name", "Khalid").add_value("Status", "Awesome");
        store.save(&db, &mut entry).await?;

        // Only the "Name" row is in memory; "Status" is missing.
        let mut partial = store.load_latest_with_values(&db, Some("Name")).await?;
        partial.add_value("Status", "duplicate");
        store.save(&db, &mut partial).await?;

        let status_rows = value_row::Entity::find()
            .filter(value_row::Column::SetId.eq(partial.id))
            .filter(value_row::Column::Name.eq("Status"))
            .count(&db)
            .await?;
        assert_eq!(status_rows, 2);
        Ok(())
    }

    #[tokio::test]
    async fn storage_checked_upsert_avoids_the_duplicate() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let store = InvertedStore::new();

        let mut entry = store.create();
        entry.add_value("Name", "Khalid").add_value("Status", "Awesome");
        store.save(&db, &mut entry).await?;

        let mut partial = store.load_latest_with_values(&db, Some("Name")).await?;
        store.upsert_value(&db, &mut partial, "Status", "updated").await?;
        store.save(&db, &mut partial).await?;

        let status_rows = value_row::Entity::find()
            .filter(value_row::Column::SetId.eq(partial.id))
            .filter(value_row::Column::Name.eq("Status"))
            .all(&db)
            .await?;
        assert_eq!(status_rows.len(), 1);
        assert_eq!(status_rows[0].value, "updated");
        Ok(())
    }
}
