use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Outfit, Schedule};

/// Immutable view of the store after some mutation.
///
/// Collections are shared behind `Arc`s, so handing a snapshot to every
/// subscriber does not copy image payloads.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    /// Bumped on every published change; 0 right after hydration.
    pub revision: u64,
    pub(crate) outfits: Arc<Vec<Outfit>>,
    pub(crate) schedules: Arc<Vec<Schedule>>,
    pub(crate) tags: Arc<Vec<String>>,
}

impl StoreSnapshot {
    pub(crate) fn hydrated(outfits: Vec<Outfit>, schedules: Vec<Schedule>, tags: Vec<String>) -> Self {
        Self {
            revision: 0,
            outfits: Arc::new(outfits),
            schedules: Arc::new(schedules),
            tags: Arc::new(tags),
        }
    }

    pub fn outfits(&self) -> &[Outfit] {
        &self.outfits
    }

    pub fn schedules(&self) -> &[Schedule] {
        &self.schedules
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Schedules on `date`, in insertion order.
    pub fn schedules_on(&self, date: NaiveDate) -> Vec<&Schedule> {
        self.schedules.iter().filter(|s| s.date == date).collect()
    }

    pub fn outfit_by_id(&self, id: &str) -> Option<&Outfit> {
        self.outfits.iter().find(|o| o.id == id)
    }

    pub fn schedule_by_id(&self, id: &str) -> Option<&Schedule> {
        self.schedules.iter().find(|s| s.id == id)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Outfits whose title or any tag contains `query`, ignoring case.
    /// A blank query matches everything.
    pub fn search_outfits(&self, query: &str) -> Vec<&Outfit> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.outfits.iter().collect();
        }
        self.outfits
            .iter()
            .filter(|outfit| outfit.matches_lowercase(&needle))
            .collect()
    }
}
