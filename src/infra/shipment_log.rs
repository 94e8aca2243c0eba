//! Append-only log of saved shipments.
//!
//! The durable value under [`SHIPMENTS_KEY`] is the only source of truth. The
//! in-memory copy is a read-through view: it is filled from the store on
//! demand and replaced only with what was just written successfully, so a
//! failed write never leaves the two disagreeing.

use std::cell::RefCell;

use thiserror::Error;
use time::OffsetDateTime;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::{ShipmentRecord, StoredShipment};
use crate::util::persistence::{KeyValueStore, StorageError, SHIPMENTS_KEY};

#[derive(Debug, Error)]
pub enum ShipmentLogError {
    #[error("shipment not found at position {index} (log holds {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("shipment {0} not found")]
    UnknownId(String),
    #[error("stored shipments are unreadable: {0}")]
    Corrupt(#[source] serde_json::Error),
    #[error("could not encode shipments: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("shipment field {0} is not a finite number")]
    NonFinite(&'static str),
    #[error("could not save: {0}")]
    Storage(#[from] StorageError),
}

impl ShipmentLogError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ShipmentLogError::IndexOutOfRange { .. } | ShipmentLogError::UnknownId(_)
        )
    }
}

pub struct ShipmentLog<S: KeyValueStore> {
    store: S,
    cache: RefCell<Option<Vec<StoredShipment>>>,
}

impl<S: KeyValueStore> ShipmentLog<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            cache: RefCell::new(None),
        }
    }

    /// Stamps `record` with a fresh id and the current time and appends it.
    pub fn create(&self, record: &ShipmentRecord) -> Result<StoredShipment, ShipmentLogError> {
        self.create_at(record, OffsetDateTime::now_utc())
    }

    pub fn create_at(
        &self,
        record: &ShipmentRecord,
        created_at: OffsetDateTime,
    ) -> Result<StoredShipment, ShipmentLogError> {
        // serde_json writes NaN and infinity as null, which would not load back.
        if let Some(field) = record.non_finite_field() {
            warn!(field, "refusing to store shipment with a non-finite number");
            return Err(ShipmentLogError::NonFinite(field));
        }
        let stored = StoredShipment {
            id: Uuid::new_v4().to_string(),
            created_at,
            record: record.clone(),
        };

        let mut entries = self.load()?;
        entries.push(stored.clone());
        self.commit(entries)?;

        info!(id = %stored.id, "appended shipment to log");
        Ok(stored)
    }

    /// Current contents in insertion order.
    pub fn list(&self) -> Result<Vec<StoredShipment>, ShipmentLogError> {
        if let Some(cached) = self.cache.borrow().as_ref() {
            return Ok(cached.clone());
        }
        let entries = self.load()?;
        *self.cache.borrow_mut() = Some(entries.clone());
        Ok(entries)
    }

    pub fn get(&self, id: &str) -> Result<StoredShipment, ShipmentLogError> {
        self.list()?
            .into_iter()
            .find(|entry| entry.id == id)
            .ok_or_else(|| ShipmentLogError::UnknownId(id.to_string()))
    }

    /// Removes the entry at `index`. Out-of-range positions leave the log as
    /// it was and report an error.
    pub fn delete_at(&self, index: usize) -> Result<StoredShipment, ShipmentLogError> {
        let mut entries = self.load()?;
        if index >= entries.len() {
            warn!(index, len = entries.len(), "delete requested outside log bounds");
            return Err(ShipmentLogError::IndexOutOfRange {
                index,
                len: entries.len(),
            });
        }
        let removed = entries.remove(index);
        self.commit(entries)?;
        info!(id = %removed.id, index, "deleted shipment");
        Ok(removed)
    }

    pub fn delete(&self, id: &str) -> Result<StoredShipment, ShipmentLogError> {
        let entries = self.load()?;
        let index = entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or_else(|| ShipmentLogError::UnknownId(id.to_string()))?;
        self.delete_at(index)
    }

    pub fn clear(&self) -> Result<(), ShipmentLogError> {
        self.store.remove(SHIPMENTS_KEY)?;
        *self.cache.borrow_mut() = None;
        info!("cleared shipment log");
        Ok(())
    }

    /// Drops the cached view so the next read goes to the store.
    pub fn invalidate(&self) {
        *self.cache.borrow_mut() = None;
    }

    fn load(&self) -> Result<Vec<StoredShipment>, ShipmentLogError> {
        match self.store.get(SHIPMENTS_KEY)? {
            Some(raw) if !raw.trim().is_empty() => {
                serde_json::from_str(&raw).map_err(ShipmentLogError::Corrupt)
            }
            _ => Ok(Vec::new()),
        }
    }

    fn commit(&self, entries: Vec<StoredShipment>) -> Result<(), ShipmentLogError> {
        // Any cached view is stale from here on, whether or not the write lands.
        *self.cache.borrow_mut() = None;
        let json = serde_json::to_string(&entries).map_err(ShipmentLogError::Encode)?;
        self.store.set(SHIPMENTS_KEY, &json)?;
        debug!(count = entries.len(), "shipment log persisted");
        *self.cache.borrow_mut() = Some(entries);
        Ok(())
    }
}
