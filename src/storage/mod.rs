//! Durable snapshots of the three wardrobe collections.
//!
//! A [`KeyValueBackend`] stores opaque strings under fixed keys. [`Persistence`]
//! sits on top of it and turns each collection into a JSON array snapshot:
//! `load` never fails (missing, unreadable or corrupt data is an empty
//! collection) and `save` always overwrites the whole snapshot.

mod json_file;
mod memory;

pub use json_file::JsonFileBackend;
pub use memory::{MemoryBackend, UnavailableBackend};

use std::{fmt, sync::Arc};

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{de::DeserializeOwned, Serialize};

/// The three top-level records the application persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Outfits,
    Schedules,
    Tags,
}

impl Collection {
    /// Storage key, shared with earlier builds of the app.
    pub fn key(&self) -> &'static str {
        match self {
            Collection::Outfits => "closely_outfits",
            Collection::Schedules => "closely_schedules",
            Collection::Tags => "closely_tags",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A durable string-keyed store.
pub trait KeyValueBackend: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replaces whatever was stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Serializes whole collections to and from a [`KeyValueBackend`].
#[derive(Clone)]
pub struct Persistence {
    backend: Arc<dyn KeyValueBackend>,
}

impl Persistence {
    pub fn new(backend: impl KeyValueBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Returns the persisted snapshot, or an empty one when nothing usable is stored.
    pub fn load<T: DeserializeOwned>(&self, collection: Collection) -> Vec<T> {
        let raw = match self.backend.get(collection.key()) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No snapshot stored for {collection}; starting empty");
                return Vec::new();
            }
            Err(err) => {
                warn!(
                    "Storage backend '{}' unavailable while loading {collection}: {err:#}",
                    self.backend.name()
                );
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(records) => records,
            Err(err) => {
                warn!("Discarding corrupt snapshot for {collection}: {err}");
                Vec::new()
            }
        }
    }

    /// Overwrites the snapshot for `collection` with `records`.
    pub fn save<T: Serialize>(&self, collection: Collection, records: &[T]) -> Result<()> {
        let serialized = serde_json::to_string(records)
            .with_context(|| format!("failed to serialize {collection}"))?;
        self.backend
            .set(collection.key(), &serialized)
            .with_context(|| format!("failed to persist {collection}"))?;
        debug!(
            "Persisted {} record(s) to {collection} via {}",
            records.len(),
            self.backend.name()
        );
        Ok(())
    }
}

impl fmt::Debug for Persistence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Persistence")
            .field("backend", &self.backend.name())
            .finish()
    }
}
