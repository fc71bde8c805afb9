pub mod config;
pub mod db;
pub mod forms;
pub mod models;
pub mod storage;
pub mod store;
pub mod utils;

use anyhow::{Context, Result};
use log::info;

pub use config::{AppConfig, StorageKind};
pub use db::Database;
pub use forms::{submit_outfit, submit_schedule, OutfitDraft, ScheduleDraft};
pub use models::{NewOutfit, NewSchedule, Outfit, Schedule, TimeSlot};
pub use storage::{
    Collection, JsonFileBackend, KeyValueBackend, MemoryBackend, Persistence, UnavailableBackend,
};
pub use store::{StoreEvent, StoreSnapshot, WardrobeStore};
pub use utils::logging::init_logging;

/// Opens the configured backend and hydrates a store from it.
pub fn open_persistence(config: &AppConfig) -> Result<Persistence> {
    let persistence = match config.storage {
        StorageKind::Sqlite => {
            let db_path = config.data_dir.join(db::DATABASE_FILE);
            Persistence::new(Database::new(db_path).context("failed to open wardrobe database")?)
        }
        StorageKind::Json => Persistence::new(JsonFileBackend::new(config.data_dir.clone())?),
        StorageKind::Memory => Persistence::new(MemoryBackend::new()),
        StorageKind::None => Persistence::new(UnavailableBackend),
    };
    Ok(persistence)
}

/// Application entry: logging, backend, hydrated store.
pub fn bootstrap(config: &AppConfig) -> Result<WardrobeStore> {
    init_logging(config.debug);
    info!(
        "Closely starting with {} storage in {}",
        config.storage.as_str(),
        config.data_dir.display()
    );

    let persistence = open_persistence(config)?;
    Ok(WardrobeStore::open(persistence))
}
