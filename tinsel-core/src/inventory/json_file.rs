// tinsel-core/src/inventory/json_file.rs

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::PathBuf,
};
use tracing::debug;

use super::ToyStore;
use crate::errors::StoreError;
use crate::models::toy::ToyRecord;

/// Fixed filename inside the data directory.
pub const TOYS_FILE_NAME: &str = "toys.json";

/// Flat-file backend: the whole collection lives in one JSON array and is
/// re-encoded and rewritten on every mutation. A missing file reads as an
/// empty collection.
pub struct JsonFileStore {
    file_path: PathBuf,
}

impl JsonFileStore {
    pub fn open(file_path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let file_path = file_path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(JsonFileStore { file_path })
    }

    fn load(&self) -> Result<Vec<ToyRecord>, StoreError> {
        if !self.file_path.exists() {
            debug!(path = %self.file_path.display(), "No toy file yet; starting empty.");
            return Ok(Vec::new());
        }
        let file = File::open(&self.file_path)?;
        let reader = BufReader::new(file);
        let records = serde_json::from_reader(reader)?;
        Ok(records)
    }

    fn save(&self, records: &[ToyRecord]) -> Result<(), StoreError> {
        let file = File::create(&self.file_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, records)?;
        writer.flush()?;
        Ok(())
    }
}

impl ToyStore for JsonFileStore {
    fn create(&mut self, name: &str, amount: u32) -> Result<ToyRecord, StoreError> {
        let mut records = self.load()?;
        let record = ToyRecord::new(name, amount);
        records.push(record.clone());
        self.save(&records)?;
        Ok(record)
    }

    fn update_quantity(
        &mut self,
        name: &str,
        amount: u32,
    ) -> Result<Option<ToyRecord>, StoreError> {
        let mut records = self.load()?;
        match records.iter_mut().find(|record| record.name == name) {
            Some(record) => {
                record.amount = amount;
                let updated = record.clone();
                self.save(&records)?;
                Ok(Some(updated))
            }
            None => Ok(None),
        }
    }

    fn add_category(&mut self, category: &str) -> Result<usize, StoreError> {
        let mut records = self.load()?;
        for record in &mut records {
            record.category = Some(category.to_string());
        }
        let touched = records.len();
        self.save(&records)?;
        Ok(touched)
    }

    fn list(&self) -> Result<Vec<ToyRecord>, StoreError> {
        self.load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn open_store(dir: &std::path::Path) -> JsonFileStore {
        JsonFileStore::open(dir.join(TOYS_FILE_NAME)).unwrap()
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = tempdir().unwrap();
        let store = open_store(dir.path());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_create_no_dedup_by_name() {
        let dir = tempdir().unwrap();
        let mut store = open_store(dir.path());
        let first = store.create("Drone", 5).unwrap();
        let second = store.create("Drone", 2).unwrap();
        assert_ne!(first.id, second.id);

        let records = store.list().unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.name == "Drone"));
        assert_eq!(records[0].amount, 5);
        assert_eq!(records[1].amount, 2);
    }

    #[test]
    fn test_update_quantity_first_match_only() {
        let dir = tempdir().unwrap();
        let mut store = open_store(dir.path());
        store.create("Drone", 5).unwrap();
        store.create("Drone", 2).unwrap();

        let updated = store.update_quantity("Drone", 7).unwrap().unwrap();
        assert_eq!(updated.amount, 7);

        let records = store.list().unwrap();
        assert_eq!(records[0].amount, 7);
        assert_eq!(records[1].amount, 2);
    }

    #[test]
    fn test_update_quantity_absent_name_leaves_file_unchanged() {
        let dir = tempdir().unwrap();
        let mut store = open_store(dir.path());
        store.create("Sled", 3).unwrap();

        let before = store.list().unwrap();
        assert!(store.update_quantity("Drone", 9).unwrap().is_none());
        assert_eq!(store.list().unwrap(), before);
    }

    #[test]
    fn test_add_category_touches_every_record() {
        let dir = tempdir().unwrap();
        let mut store = open_store(dir.path());
        store.create("Drone", 5).unwrap();
        store.create("Sled", 2).unwrap();
        store.create("Puzzle", 11).unwrap();

        let touched = store.add_category("Holiday").unwrap();
        assert_eq!(touched, 3);

        let records = store.list().unwrap();
        assert!(records
            .iter()
            .all(|r| r.category.as_deref() == Some("Holiday")));
        assert_eq!(records[0].amount, 5);
        assert_eq!(records[1].name, "Sled");
        assert_eq!(records[2].amount, 11);
    }

    #[test]
    fn test_round_trip_reproduces_records() {
        let dir = tempdir().unwrap();
        let written = {
            let mut store = open_store(dir.path());
            store.create("Drone", 5).unwrap();
            store.create("Sled", 2).unwrap();
            store.add_category("Holiday").unwrap();
            store.list().unwrap()
        };
        let reopened = open_store(dir.path());
        assert_eq!(reopened.list().unwrap(), written);
    }
}
