use std::{collections::HashSet, sync::Arc};

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use log::{debug, info, warn};
use tokio::sync::{broadcast, watch};

use crate::{
    models::{NewOutfit, NewSchedule, Outfit, Schedule},
    storage::{Collection, Persistence},
    utils::ids::new_id,
};

use super::{StoreEvent, StoreSnapshot};

const EVENT_CAPACITY: usize = 64;

/// Sole owner and mutator of the outfit, schedule and tag collections.
///
/// Every mutation writes the affected collection(s) through [`Persistence`]
/// first and only then commits the new state in memory and notifies
/// subscribers. A failed write leaves the in-memory state untouched.
pub struct WardrobeStore {
    persistence: Persistence,
    current: Arc<StoreSnapshot>,
    snapshot_tx: watch::Sender<Arc<StoreSnapshot>>,
    event_tx: broadcast::Sender<StoreEvent>,
}

impl WardrobeStore {
    /// Loads all three collections and returns a ready store.
    pub fn open(persistence: Persistence) -> Self {
        let outfits: Vec<Outfit> = persistence.load(Collection::Outfits);
        let schedules: Vec<Schedule> = persistence.load(Collection::Schedules);
        let tags = dedupe_tags(persistence.load(Collection::Tags));

        info!(
            "Wardrobe store ready via {} backend: {} outfit(s), {} schedule(s), {} tag(s)",
            persistence.backend_name(),
            outfits.len(),
            schedules.len(),
            tags.len()
        );

        let current = Arc::new(StoreSnapshot::hydrated(outfits, schedules, tags));
        let (snapshot_tx, _) = watch::channel(Arc::clone(&current));
        let (event_tx, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            persistence,
            current,
            snapshot_tx,
            event_tx,
        }
    }

    pub fn snapshot(&self) -> Arc<StoreSnapshot> {
        Arc::clone(&self.current)
    }

    /// Latest state, republished after each change.
    pub fn subscribe(&self) -> watch::Receiver<Arc<StoreSnapshot>> {
        self.snapshot_tx.subscribe()
    }

    pub fn events(&self) -> broadcast::Receiver<StoreEvent> {
        self.event_tx.subscribe()
    }

    pub fn outfits(&self) -> &[Outfit] {
        self.current.outfits()
    }

    pub fn schedules(&self) -> &[Schedule] {
        self.current.schedules()
    }

    pub fn tags(&self) -> &[String] {
        self.current.tags()
    }

    pub fn schedules_on(&self, date: NaiveDate) -> Vec<&Schedule> {
        self.current.schedules_on(date)
    }

    pub fn outfit_by_id(&self, id: &str) -> Option<&Outfit> {
        self.current.outfit_by_id(id)
    }

    pub fn search_outfits(&self, query: &str) -> Vec<&Outfit> {
        self.current.search_outfits(query)
    }

    pub fn create_outfit(&mut self, input: NewOutfit) -> Result<Outfit> {
        let id = self.unused_id(|id| self.current.outfit_by_id(id).is_some());
        let outfit = input.into_outfit(id, Utc::now());

        let mut outfits = self.current.outfits().to_vec();
        outfits.push(outfit.clone());
        self.persistence.save(Collection::Outfits, &outfits)?;

        self.commit(
            |next| next.outfits = Arc::new(outfits),
            StoreEvent::OutfitCreated {
                outfit_id: outfit.id.clone(),
            },
        );
        debug!("Created outfit {} ({})", outfit.id, outfit.title);
        Ok(outfit)
    }

    /// Removes the outfit and every schedule that references it. Unknown ids
    /// are not an error.
    pub fn delete_outfit(&mut self, id: &str) -> Result<()> {
        let outfits: Vec<Outfit> = self
            .current
            .outfits()
            .iter()
            .filter(|o| o.id != id)
            .cloned()
            .collect();
        let (removed, schedules): (Vec<Schedule>, Vec<Schedule>) = self
            .current
            .schedules()
            .iter()
            .cloned()
            .partition(|s| s.outfit_id == id);

        let outfit_removed = outfits.len() != self.current.outfits().len();
        if !outfit_removed && removed.is_empty() {
            debug!("delete_outfit: no outfit or schedules for {id}");
            return Ok(());
        }

        let removed_schedules: Vec<String> = removed.into_iter().map(|s| s.id).collect();

        if outfit_removed {
            self.persistence.save(Collection::Outfits, &outfits)?;
        }
        let schedules_changed = schedules.len() != self.current.schedules().len();
        let schedule_write = if schedules_changed {
            self.persistence.save(Collection::Schedules, &schedules)
        } else {
            Ok(())
        };

        match schedule_write {
            Ok(()) => {
                self.commit(
                    |next| {
                        next.outfits = Arc::new(outfits);
                        next.schedules = Arc::new(schedules);
                    },
                    StoreEvent::OutfitDeleted {
                        outfit_id: id.to_string(),
                        removed_schedules,
                    },
                );
                Ok(())
            }
            Err(err) => {
                // Outfits are already durable without the outfit; keep memory in step.
                warn!("Outfit {id} deleted but its schedules could not be persisted: {err:#}");
                // The schedules are still stored, so the event reports none removed.
                if outfit_removed {
                    self.commit(
                        |next| next.outfits = Arc::new(outfits),
                        StoreEvent::OutfitDeleted {
                            outfit_id: id.to_string(),
                            removed_schedules: Vec::new(),
                        },
                    );
                }
                Err(err).context("failed to remove schedules for deleted outfit")
            }
        }
    }

    /// Schedules `outfit_id` on a date. The outfit is not required to exist.
    pub fn create_schedule(&mut self, input: NewSchedule) -> Result<Schedule> {
        if self.current.outfit_by_id(&input.outfit_id).is_none() {
            debug!(
                "Scheduling unknown outfit {} on {}",
                input.outfit_id, input.date
            );
        }

        let id = self.unused_id(|id| self.current.schedule_by_id(id).is_some());
        let schedule = input.into_schedule(id);

        let mut schedules = self.current.schedules().to_vec();
        schedules.push(schedule.clone());
        self.persistence.save(Collection::Schedules, &schedules)?;

        self.commit(
            |next| next.schedules = Arc::new(schedules),
            StoreEvent::ScheduleCreated {
                schedule_id: schedule.id.clone(),
                outfit_id: schedule.outfit_id.clone(),
                date: schedule.date,
            },
        );
        Ok(schedule)
    }

    pub fn delete_schedule(&mut self, id: &str) -> Result<()> {
        let schedules: Vec<Schedule> = self
            .current
            .schedules()
            .iter()
            .filter(|s| s.id != id)
            .cloned()
            .collect();
        if schedules.len() == self.current.schedules().len() {
            debug!("delete_schedule: no schedule {id}");
            return Ok(());
        }

        self.persistence.save(Collection::Schedules, &schedules)?;
        self.commit(
            |next| next.schedules = Arc::new(schedules),
            StoreEvent::ScheduleDeleted {
                schedule_id: id.to_string(),
            },
        );
        Ok(())
    }

    /// Adds `tag` to the registry unless it is already there.
    /// Returns whether the registry changed.
    pub fn add_tag(&mut self, tag: &str) -> Result<bool> {
        if self.current.has_tag(tag) {
            return Ok(false);
        }

        let mut tags = self.current.tags().to_vec();
        tags.push(tag.to_string());
        self.persistence.save(Collection::Tags, &tags)?;

        self.commit(
            |next| next.tags = Arc::new(tags),
            StoreEvent::TagAdded {
                tag: tag.to_string(),
            },
        );
        Ok(true)
    }

    /// Shuts the store down. Subscribers see their channels close.
    pub fn close(self) {
        info!(
            "Closing wardrobe store at revision {} ({} backend)",
            self.current.revision,
            self.persistence.backend_name()
        );
    }

    fn commit(&mut self, apply: impl FnOnce(&mut StoreSnapshot), event: StoreEvent) {
        let mut next = StoreSnapshot::clone(&self.current);
        apply(&mut next);
        next.revision += 1;

        self.current = Arc::new(next);
        self.snapshot_tx.send_replace(Arc::clone(&self.current));
        // No receivers is fine.
        let _ = self.event_tx.send(event);
    }

    fn unused_id(&self, taken: impl Fn(&str) -> bool) -> String {
        loop {
            let id = new_id();
            if !taken(&id) {
                return id;
            }
        }
    }
}

fn dedupe_tags(tags: Vec<String>) -> Vec<String> {
    let total = tags.len();
    let mut seen = HashSet::with_capacity(total);
    let unique: Vec<String> = tags.into_iter().filter(|t| seen.insert(t.clone())).collect();
    if unique.len() != total {
        warn!(
            "Dropped {} duplicate tag(s) from stored registry",
            total - unique.len()
        );
    }
    unique
}
