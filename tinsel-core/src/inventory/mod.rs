// tinsel-core/src/inventory/mod.rs

//! The toy record store: one storage interface, two interchangeable backends,
//! and the [`Inventory`] manager the presentation layer talks to.

use tracing::debug;

use crate::errors::StoreError;
use crate::models::toy::ToyRecord;

pub mod json_file;
pub mod sqlite;

/// The storage interface both backends implement.
///
/// Lookups for `update_quantity` are by exact name match against the first
/// record in insertion order, not by id. `create` never deduplicates; two
/// records may share a name.
pub trait ToyStore: Send {
    /// Appends a new record with no category and returns it.
    fn create(&mut self, name: &str, amount: u32) -> Result<ToyRecord, StoreError>;

    /// Replaces the amount on the first record whose name matches exactly.
    /// `Ok(None)` when no record matches; the collection is left unchanged.
    fn update_quantity(&mut self, name: &str, amount: u32)
        -> Result<Option<ToyRecord>, StoreError>;

    /// Sets the category on every record unconditionally. Returns the number
    /// of records touched.
    fn add_category(&mut self, category: &str) -> Result<usize, StoreError>;

    /// Full snapshot of the collection in insertion order.
    fn list(&self) -> Result<Vec<ToyRecord>, StoreError>;
}

type Subscriber = Box<dyn Fn(&[ToyRecord]) + Send>;

/// Owns a backend plus an in-memory snapshot of the collection.
///
/// Every mutation goes through the backend, then the snapshot is reloaded in
/// full and subscribers are notified with it. Single-writer discipline: one
/// `Inventory` per store, no interior locking.
pub struct Inventory {
    store: Box<dyn ToyStore>,
    records: Vec<ToyRecord>,
    subscribers: Vec<Subscriber>,
}

impl Inventory {
    /// Wraps a backend and loads the collection from it.
    pub fn new(store: Box<dyn ToyStore>) -> Result<Self, StoreError> {
        let records = store.list()?;
        debug!(count = records.len(), "Loaded toy records from store.");
        Ok(Inventory {
            store,
            records,
            subscribers: Vec::new(),
        })
    }

    /// The current snapshot. Refreshed after every mutation.
    pub fn records(&self) -> &[ToyRecord] {
        &self.records
    }

    /// Registers a callback invoked with the refreshed snapshot after each
    /// mutation. There is no initial delivery; read [`Inventory::records`]
    /// for the starting state.
    pub fn subscribe<F>(&mut self, subscriber: F)
    where
        F: Fn(&[ToyRecord]) + Send + 'static,
    {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn create(&mut self, name: &str, amount: u32) -> Result<ToyRecord, StoreError> {
        let record = self.store.create(name, amount)?;
        debug!(name = %record.name, amount = record.amount, "Created toy record.");
        self.refresh()?;
        Ok(record)
    }

    pub fn update_quantity(
        &mut self,
        name: &str,
        amount: u32,
    ) -> Result<Option<ToyRecord>, StoreError> {
        let updated = self.store.update_quantity(name, amount)?;
        match &updated {
            Some(record) => {
                debug!(name = %record.name, amount = record.amount, "Updated toy quantity.");
                self.refresh()?;
            }
            None => debug!(name = %name, "No toy record with that name; quantity unchanged."),
        }
        Ok(updated)
    }

    pub fn add_category(&mut self, category: &str) -> Result<usize, StoreError> {
        let touched = self.store.add_category(category)?;
        debug!(category = %category, touched, "Applied category to all toy records.");
        self.refresh()?;
        Ok(touched)
    }

    fn refresh(&mut self) -> Result<(), StoreError> {
        self.records = self.store.list()?;
        for subscriber in &self.subscribers {
            subscriber(&self.records);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::json_file::JsonFileStore;
    use super::*;
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;

    fn open_inventory(dir: &std::path::Path) -> Inventory {
        let store = JsonFileStore::open(dir.join("toys.json")).unwrap();
        Inventory::new(Box::new(store)).unwrap()
    }

    #[test]
    fn test_create_refreshes_snapshot() {
        let dir = tempdir().unwrap();
        let mut inventory = open_inventory(dir.path());
        assert!(inventory.records().is_empty());

        inventory.create("Drone", 5).unwrap();
        assert_eq!(inventory.records().len(), 1);
        assert_eq!(inventory.records()[0].name, "Drone");
        assert_eq!(inventory.records()[0].amount, 5);
        assert_eq!(inventory.records()[0].category, None);
    }

    #[test]
    fn test_update_quantity_missing_name_is_noop() {
        let dir = tempdir().unwrap();
        let mut inventory = open_inventory(dir.path());
        inventory.create("Sled", 3).unwrap();

        let before = inventory.records().to_vec();
        let updated = inventory.update_quantity("Rocking Horse", 9).unwrap();
        assert!(updated.is_none());
        assert_eq!(inventory.records(), &before[..]);
    }

    #[test]
    fn test_subscribers_see_refreshed_snapshot() {
        let dir = tempdir().unwrap();
        let mut inventory = open_inventory(dir.path());

        let seen: Arc<Mutex<Vec<Vec<String>>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        inventory.subscribe(move |records| {
            sink.lock()
                .unwrap()
                .push(records.iter().map(|r| r.name.clone()).collect());
        });

        inventory.create("Drone", 5).unwrap();
        inventory.create("Sled", 2).unwrap();
        inventory.add_category("Holiday").unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0], vec!["Drone"]);
        assert_eq!(seen[1], vec!["Drone", "Sled"]);
        assert_eq!(seen[2], vec!["Drone", "Sled"]);
    }

    #[test]
    fn test_startup_load_reads_existing_records() {
        let dir = tempdir().unwrap();
        {
            let mut inventory = open_inventory(dir.path());
            inventory.create("Drone", 5).unwrap();
            inventory.create("Sled", 2).unwrap();
        }
        let inventory = open_inventory(dir.path());
        assert_eq!(inventory.records().len(), 2);
    }
}
