use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, RwLock,
    },
};

use anyhow::{anyhow, bail, Result};

use super::KeyValueBackend;
use crate::log_debug;

const ENABLE_LOGS: bool = true;

/// Process-local backend. Clones share the same map, so a test can reopen a
/// store against what a previous instance wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: Arc<RwLock<HashMap<String, String>>>,
    read_only: Arc<AtomicBool>,
    failing_keys: Arc<RwLock<HashSet<String>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// When set, every `set` fails. Used to exercise write-failure paths.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    /// Makes writes to `key` alone fail, leaving other keys writable.
    pub fn fail_writes_to(&self, key: &str) {
        if let Ok(mut keys) = self.failing_keys.write() {
            keys.insert(key.to_string());
        }
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }
}

impl KeyValueBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| anyhow!("memory backend lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.read_only.load(Ordering::SeqCst) {
            bail!("memory backend is read-only");
        }
        let key_fails = self
            .failing_keys
            .read()
            .map_err(|_| anyhow!("memory backend lock poisoned"))?
            .contains(key);
        if key_fails {
            bail!("writes to {key} are disabled");
        }
        let mut entries = self
            .entries
            .write()
            .map_err(|_| anyhow!("memory backend lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Stands in for an environment with no durable storage at all: reads find
/// nothing and writes are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableBackend;

impl KeyValueBackend for UnavailableBackend {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn set(&self, key: &str, _value: &str) -> Result<()> {
        log_debug!("No storage available; dropping write to {key}");
        Ok(())
    }
}
