use std::path::Path;

use chunk_model::{ArticleMeta, IndexedRecord};
use rusqlite::{params, Connection, TransactionBehavior};

use crate::{MetaFilter, StoreError};

/// One persisted article row.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredArticle {
    pub record_id: String,
    pub document: String,
    pub meta: ArticleMeta,
    pub vector: Vec<f32>,
}

/// SQLite-backed primary store for article collections.
pub struct SqliteRepo {
    conn: Connection,
}

impl SqliteRepo {
    /// Open an in-memory repository and initialize schema.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let repo = Self { conn };
        repo.init()?;
        Ok(repo)
    }

    /// Open a file-backed repository at `path` and initialize schema if absent.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| StoreError::Backend(e.to_string()))?;
            }
        }
        let conn = Connection::open(path)?;
        let repo = Self { conn };
        repo.init()?;
        Ok(repo)
    }

    fn init(&self) -> rusqlite::Result<()> {
        self.conn.pragma_update(None, "journal_mode", "WAL")?;
        self.conn.pragma_update(None, "synchronous", "FULL")?;

        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS articles (
                rowid INTEGER PRIMARY KEY,
                collection TEXT NOT NULL,
                record_id TEXT NOT NULL,
                document TEXT NOT NULL,
                meta_json TEXT NOT NULL,
                vector BLOB NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE UNIQUE INDEX IF NOT EXISTS idx_articles_record ON articles(collection, record_id);
            "#,
        )?;
        Ok(())
    }

    /// Delete every row of `collection` and insert `records`, in one immediate transaction.
    pub fn replace_collection(&mut self, collection: &str, records: &[IndexedRecord]) -> Result<usize, StoreError> {
        let tx = self.conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute("DELETE FROM articles WHERE collection = ?1", params![collection])?;
        let n = insert_rows(&tx, collection, records)?;
        tx.commit()?;
        Ok(n)
    }

    pub fn delete_collection(&mut self, collection: &str) -> Result<usize, StoreError> {
        let n = self.conn.execute("DELETE FROM articles WHERE collection = ?1", params![collection])?;
        Ok(n)
    }

    pub fn upsert_records(&mut self, collection: &str, records: &[IndexedRecord]) -> Result<usize, StoreError> {
        if records.is_empty() {
            return Ok(0);
        }
        let tx = self.conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let n = insert_rows(&tx, collection, records)?;
        tx.commit()?;
        Ok(n)
    }

    pub fn count(&self, collection: &str) -> Result<usize, StoreError> {
        let n: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM articles WHERE collection = ?1",
            params![collection],
            |row| row.get(0),
        )?;
        Ok(n as usize)
    }

    /// All rows of a collection in insertion order.
    pub fn load_collection(&self, collection: &str) -> Result<Vec<StoredArticle>, StoreError> {
        self.select(collection, None)
    }

    /// Rows whose metadata satisfies every equality in `filter`, in insertion order.
    pub fn list_by_filter(&self, collection: &str, filter: &MetaFilter) -> Result<Vec<StoredArticle>, StoreError> {
        self.select(collection, Some(filter))
    }

    fn select(&self, collection: &str, filter: Option<&MetaFilter>) -> Result<Vec<StoredArticle>, StoreError> {
        let mut where_sql = String::from("WHERE collection = ?");
        let mut params: Vec<rusqlite::types::Value> = vec![collection.to_string().into()];
        if let Some(f) = filter {
            // Meta equality via JSON1
            for (key, value) in &f.equals {
                where_sql.push_str(" AND json_extract(meta_json, ?) = ?");
                let path = format!("$.\"{}\"", key.replace('"', ""));
                params.push(path.into());
                params.push(value.clone().into());
            }
        }
        let sql = format!("SELECT record_id, document, meta_json, vector FROM articles {where_sql} ORDER BY rowid");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(params.iter()), |row| {
            let record_id: String = row.get(0)?;
            let document: String = row.get(1)?;
            let meta_json: String = row.get(2)?;
            let blob: Vec<u8> = row.get(3)?;
            Ok(StoredArticle {
                record_id,
                document,
                meta: ArticleMeta::from_json(&meta_json),
                vector: blob_to_vector(&blob),
            })
        })?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }
}

fn insert_rows(tx: &rusqlite::Transaction<'_>, collection: &str, records: &[IndexedRecord]) -> Result<usize, StoreError> {
    let created_at = chrono::Utc::now().to_rfc3339();
    let mut stmt = tx.prepare(
        r#"
        INSERT INTO articles (collection, record_id, document, meta_json, vector, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        ON CONFLICT(collection, record_id) DO UPDATE SET
            document=excluded.document,
            meta_json=excluded.meta_json,
            vector=excluded.vector,
            created_at=excluded.created_at
        ;
        "#,
    )?;
    for rec in records {
        let blob: &[u8] = bytemuck::cast_slice(&rec.embedding[..]);
        stmt.execute(params![collection, rec.id, rec.document, rec.meta.to_json(), blob, created_at])?;
    }
    Ok(records.len())
}

fn blob_to_vector(blob: &[u8]) -> Vec<f32> {
    // BLOBs come back unaligned; copy through pod_collect_to_vec rather than cast_slice
    bytemuck::pod_collect_to_vec::<u8, f32>(blob)
}
