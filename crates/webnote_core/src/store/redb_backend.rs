//! redb-backed namespaces.

use super::tables::{NOTES, SHARE};
use super::{KvEntry, KvNamespace};
use crate::error::AppError;
use redb::{ReadableDatabase, ReadableTable, TableDefinition};
use std::path::Path;
use std::sync::Arc;

type Table = TableDefinition<'static, &'static str, &'static [u8]>;

/// One redb database file holding both namespaces.
#[derive(Clone)]
pub struct RedbStore {
    db: Arc<redb::Database>,
}

impl RedbStore {
    /// Open (or create) the database at `path` and initialize both tables.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or tables cannot be created.
    pub fn open(path: &str) -> Result<Self, AppError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|err| {
                    AppError::StorageMessage(format!(
                        "Failed to create database directory '{}': {}",
                        parent.display(),
                        err
                    ))
                })?;
            }
        }
        let db = redb::Database::create(path)?;
        let write_txn = db.begin_write()?;
        write_txn.open_table(NOTES)?;
        write_txn.open_table(SHARE)?;
        write_txn.commit()?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Handle for the `NOTES` namespace.
    pub fn notes(&self) -> RedbNamespace {
        RedbNamespace {
            db: self.db.clone(),
            table: NOTES,
        }
    }

    /// Handle for the `SHARE` namespace.
    pub fn share(&self) -> RedbNamespace {
        RedbNamespace {
            db: self.db.clone(),
            table: SHARE,
        }
    }
}

/// A single table of a [`RedbStore`].
#[derive(Clone)]
pub struct RedbNamespace {
    db: Arc<redb::Database>,
    table: Table,
}

impl RedbNamespace {
    async fn blocking<T, F>(&self, op: F) -> Result<T, AppError>
    where
        T: Send + 'static,
        F: FnOnce(&redb::Database, Table) -> Result<T, AppError> + Send + 'static,
    {
        let db = self.db.clone();
        let table = self.table;
        tokio::task::spawn_blocking(move || op(&db, table))
            .await
            .map_err(|err| AppError::StorageMessage(format!("Store task failed: {}", err)))?
    }
}

fn read_entry(db: &redb::Database, table: Table, key: &str) -> Result<Option<KvEntry>, AppError> {
    let read_txn = db.begin_read()?;
    let rows = read_txn.open_table(table)?;
    match rows.get(key)? {
        Some(value) => Ok(Some(bincode::deserialize(value.value())?)),
        None => Ok(None),
    }
}

fn write_entry(
    db: &redb::Database,
    table: Table,
    key: &str,
    entry: &KvEntry,
) -> Result<(), AppError> {
    let encoded = bincode::serialize(entry)?;
    let write_txn = db.begin_write()?;
    {
        let mut rows = write_txn.open_table(table)?;
        rows.insert(key, encoded.as_slice())?;
    }
    write_txn.commit()?;
    Ok(())
}

fn remove_entry(db: &redb::Database, table: Table, key: &str) -> Result<(), AppError> {
    let write_txn = db.begin_write()?;
    {
        let mut rows = write_txn.open_table(table)?;
        rows.remove(key)?;
    }
    write_txn.commit()?;
    Ok(())
}

fn list_keys(db: &redb::Database, table: Table, prefix: &str) -> Result<Vec<String>, AppError> {
    let read_txn = db.begin_read()?;
    let rows = read_txn.open_table(table)?;
    let mut keys = Vec::new();
    for item in rows.iter()? {
        let (key, _) = item?;
        let key = key.value();
        if key.starts_with(prefix) {
            keys.push(key.to_string());
        }
    }
    Ok(keys)
}

#[async_trait::async_trait]
impl KvNamespace for RedbNamespace {
    async fn get(&self, key: &str) -> Result<Option<KvEntry>, AppError> {
        let key = key.to_string();
        self.blocking(move |db, table| read_entry(db, table, &key))
            .await
    }

    async fn put(&self, key: &str, value: &str, metadata: Option<&[u8]>) -> Result<(), AppError> {
        let key = key.to_string();
        let entry = KvEntry {
            value: value.to_string(),
            metadata: metadata.map(<[u8]>::to_vec),
        };
        self.blocking(move |db, table| write_entry(db, table, &key, &entry))
            .await
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        let key = key.to_string();
        self.blocking(move |db, table| remove_entry(db, table, &key))
            .await
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, AppError> {
        let prefix = prefix.to_string();
        self.blocking(move |db, table| list_keys(db, table, &prefix))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::RedbStore;
    use crate::store::KvNamespace;
    use tempfile::TempDir;

    #[tokio::test]
    async fn namespaces_are_isolated_and_persist_metadata() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("nested").join("notes.redb");
        let store = RedbStore::open(path.to_str().expect("path")).expect("open");
        let notes = store.notes();
        let share = store.share();

        notes
            .put("alpha", "hello", Some(br#"{"share":true}"#))
            .await
            .expect("put");
        share.put("tok", "alpha", None).await.expect("put share");

        let entry = notes.get("alpha").await.expect("get").expect("entry");
        assert_eq!(entry.value, "hello");
        assert_eq!(entry.metadata.as_deref(), Some(&br#"{"share":true}"#[..]));
        assert!(notes.get("tok").await.expect("get").is_none());
        assert_eq!(share.list("").await.expect("list"), vec!["tok".to_string()]);
    }

    #[tokio::test]
    async fn list_filters_by_prefix_and_delete_is_idempotent() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("notes.redb");
        let notes = RedbStore::open(path.to_str().expect("path"))
            .expect("open")
            .notes();
        for key in ["ab", "abc", "b"] {
            notes.put(key, "x", None).await.expect("put");
        }

        assert_eq!(
            notes.list("ab").await.expect("list"),
            vec!["ab".to_string(), "abc".to_string()]
        );

        notes.delete("ab").await.expect("delete");
        notes.delete("ab").await.expect("delete missing");
        assert!(notes.get("ab").await.expect("get").is_none());
    }

    #[tokio::test]
    async fn reopening_keeps_previous_rows() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("notes.redb");
        let path = path.to_str().expect("path").to_string();
        {
            let store = RedbStore::open(&path).expect("open");
            store.notes().put("keep", "me", None).await.expect("put");
        }
        let reopened = RedbStore::open(&path).expect("reopen");
        let entry = reopened.notes().get("keep").await.expect("get");
        assert_eq!(entry.map(|e| e.value).as_deref(), Some("me"));
    }
}
