// tinsel-core/src/inventory/sqlite.rs

use rusqlite::{params, Connection, OptionalExtension};
use std::fs;
use std::path::Path;
use uuid::Uuid;

use super::ToyStore;
use crate::errors::StoreError;
use crate::models::toy::ToyRecord;

/// Fixed database filename inside the data directory.
pub const TOYS_DB_NAME: &str = "toys.db";

/// Embedded-store backend over a single SQLite table. Opening the store is
/// the one unrecoverable startup path: a failure here propagates to the
/// caller rather than degrading.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens the database file, creating parent directories and the table if
    /// needed.
    pub fn open(db_path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(db_path)?;
        Self::with_connection(conn)
    }

    /// In-memory database. Nothing survives the instance; used by tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS toys (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                amount INTEGER NOT NULL,
                category TEXT
            )",
            [],
        )?;
        Ok(SqliteStore { conn })
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<ToyRecord> {
    let id: String = row.get(0)?;
    let id = Uuid::parse_str(&id).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(ToyRecord {
        id,
        name: row.get(1)?,
        amount: row.get(2)?,
        category: row.get(3)?,
    })
}

impl ToyStore for SqliteStore {
    fn create(&mut self, name: &str, amount: u32) -> Result<ToyRecord, StoreError> {
        let record = ToyRecord::new(name, amount);
        self.conn.execute(
            "INSERT INTO toys (id, name, amount, category) VALUES (?1, ?2, ?3, ?4)",
            params![record.id.to_string(), record.name, record.amount, record.category],
        )?;
        Ok(record)
    }

    fn update_quantity(
        &mut self,
        name: &str,
        amount: u32,
    ) -> Result<Option<ToyRecord>, StoreError> {
        // First matching row in insertion order, same as the file backend.
        let changed = self.conn.execute(
            "UPDATE toys SET amount = ?1
             WHERE rowid = (SELECT MIN(rowid) FROM toys WHERE name = ?2)",
            params![amount, name],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        let record = self
            .conn
            .query_row(
                "SELECT id, name, amount, category FROM toys
                 WHERE rowid = (SELECT MIN(rowid) FROM toys WHERE name = ?1)",
                params![name],
                row_to_record,
            )
            .optional()?;
        Ok(record)
    }

    fn add_category(&mut self, category: &str) -> Result<usize, StoreError> {
        let touched = self
            .conn
            .execute("UPDATE toys SET category = ?1", params![category])?;
        Ok(touched)
    }

    fn list(&self) -> Result<Vec<ToyRecord>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, amount, category FROM toys ORDER BY rowid")?;
        let rows = stmt.query_map([], row_to_record)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_create_and_list_in_order() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.create("Drone", 5).unwrap();
        store.create("Sled", 2).unwrap();

        let records = store.list().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Drone");
        assert_eq!(records[1].name, "Sled");
        assert_eq!(records[0].category, None);
    }

    #[test]
    fn test_create_no_dedup_by_name() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let first = store.create("Drone", 5).unwrap();
        let second = store.create("Drone", 2).unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(store.list().unwrap().len(), 2);
    }

    #[test]
    fn test_update_quantity_first_match_only() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.create("Drone", 5).unwrap();
        store.create("Drone", 2).unwrap();

        let updated = store.update_quantity("Drone", 7).unwrap().unwrap();
        assert_eq!(updated.amount, 7);

        let records = store.list().unwrap();
        assert_eq!(records[0].amount, 7);
        assert_eq!(records[1].amount, 2);
    }

    #[test]
    fn test_update_quantity_absent_name_is_noop() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.create("Sled", 3).unwrap();

        let before = store.list().unwrap();
        assert!(store.update_quantity("Drone", 9).unwrap().is_none());
        assert_eq!(store.list().unwrap(), before);
    }

    #[test]
    fn test_add_category_touches_every_record() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.create("Drone", 5).unwrap();
        store.create("Sled", 2).unwrap();
        store.create("Puzzle", 11).unwrap();

        assert_eq!(store.add_category("Holiday").unwrap(), 3);
        let records = store.list().unwrap();
        assert!(records
            .iter()
            .all(|r| r.category.as_deref() == Some("Holiday")));
        assert_eq!(records[1].amount, 2);
    }

    #[test]
    fn test_records_survive_reopen() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join(TOYS_DB_NAME);
        let written = {
            let mut store = SqliteStore::open(&db_path).unwrap();
            store.create("Drone", 5).unwrap();
            store.create("Sled", 2).unwrap();
            store.list().unwrap()
        };
        let store = SqliteStore::open(&db_path).unwrap();
        assert_eq!(store.list().unwrap(), written);
    }
}
