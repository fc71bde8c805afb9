//! Caller-side input handling for the create-outfit and schedule dialogs.
//!
//! The store accepts whatever it is given; these drafts hold the checks the
//! screens apply before calling it.

use anyhow::{bail, Result};
use chrono::NaiveDate;
use log::info;

use crate::{
    models::{NewOutfit, NewSchedule, Outfit, Schedule, TimeSlot},
    store::WardrobeStore,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutfitDraft {
    pub title: String,
    pub image: String,
    pub notes: String,
    tags: Vec<String>,
}

impl OutfitDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Adds a trimmed tag. Blank input and tags already on the draft are ignored.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    pub fn remove_tag_at(&mut self, index: usize) -> Option<String> {
        (index < self.tags.len()).then(|| self.tags.remove(index))
    }

    pub fn clear_image(&mut self) {
        self.image.clear();
    }

    pub fn validate(&self) -> Result<()> {
        if self.image.is_empty() {
            bail!("an outfit needs an image");
        }
        if self.title.trim().is_empty() {
            bail!("an outfit needs a title");
        }
        Ok(())
    }

    fn into_new_outfit(self) -> NewOutfit {
        NewOutfit {
            title: self.title,
            image: self.image,
            tags: self.tags,
            notes: self.notes,
        }
    }
}

/// Registers the draft's tags, then creates the outfit.
pub fn submit_outfit(store: &mut WardrobeStore, draft: OutfitDraft) -> Result<Outfit> {
    draft.validate()?;
    for tag in draft.tags() {
        store.add_tag(tag)?;
    }
    let outfit = store.create_outfit(draft.into_new_outfit())?;
    info!("Saved outfit '{}' with {} tag(s)", outfit.title, outfit.tags.len());
    Ok(outfit)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleDraft {
    pub date: NaiveDate,
    pub outfit_id: Option<String>,
    pub time_slot: Option<TimeSlot>,
}

impl ScheduleDraft {
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            date,
            outfit_id: None,
            time_slot: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self.outfit_id.as_deref() {
            Some(id) if !id.is_empty() => Ok(()),
            _ => bail!("choose an outfit to schedule on {}", self.date),
        }
    }
}

pub fn submit_schedule(store: &mut WardrobeStore, draft: ScheduleDraft) -> Result<Schedule> {
    draft.validate()?;
    let ScheduleDraft {
        date,
        outfit_id,
        time_slot,
    } = draft;
    let outfit_id = outfit_id.unwrap_or_default();
    store.create_schedule(NewSchedule::new(outfit_id, date, time_slot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryBackend, Persistence};

    fn store() -> WardrobeStore {
        WardrobeStore::open(Persistence::new(MemoryBackend::new()))
    }

    fn filled_draft() -> OutfitDraft {
        let mut draft = OutfitDraft::new();
        draft.title = "Blue Suit".into();
        draft.image = "data:image/png;base64,AAAA".into();
        draft
    }

    #[test]
    fn draft_tags_are_trimmed_and_unique() {
        let mut draft = OutfitDraft::new();
        assert!(draft.add_tag(" work "));
        assert!(!draft.add_tag("work"));
        assert!(!draft.add_tag("   "));
        assert!(draft.add_tag("formal"));

        assert_eq!(draft.tags(), ["work", "formal"]);
        assert_eq!(draft.remove_tag_at(0).as_deref(), Some("work"));
        assert_eq!(draft.remove_tag_at(5), None);
        assert_eq!(draft.tags(), ["formal"]);
    }

    #[test]
    fn rejects_missing_title_or_image() {
        let mut draft = filled_draft();
        draft.title = "  ".into();
        assert!(draft.validate().is_err());

        let mut draft = filled_draft();
        draft.clear_image();
        assert!(draft.validate().is_err());

        assert!(filled_draft().validate().is_ok());
    }

    #[test]
    fn submit_registers_tags_before_creating_outfit() {
        let mut store = store();
        let mut draft = filled_draft();
        draft.add_tag("work");
        draft.add_tag("formal");

        let outfit = submit_outfit(&mut store, draft).unwrap();

        assert_eq!(store.tags(), ["work", "formal"]);
        assert_eq!(outfit.tags, vec!["work", "formal"]);
        assert_eq!(store.outfits().len(), 1);
    }

    #[test]
    fn invalid_draft_leaves_store_untouched() {
        let mut store = store();
        let mut draft = OutfitDraft::new();
        draft.add_tag("work");

        assert!(submit_outfit(&mut store, draft).is_err());
        assert!(store.tags().is_empty());
        assert!(store.outfits().is_empty());
    }

    #[test]
    fn schedule_draft_requires_an_outfit() {
        let mut store = store();
        let date = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();

        assert!(submit_schedule(&mut store, ScheduleDraft::for_date(date)).is_err());

        let draft = ScheduleDraft {
            outfit_id: Some("o-1".into()),
            time_slot: Some(TimeSlot::Morning),
            ..ScheduleDraft::for_date(date)
        };
        let schedule = submit_schedule(&mut store, draft).unwrap();
        assert_eq!(schedule.outfit_id, "o-1");
        assert_eq!(store.schedules_on(date).len(), 1);
    }
}
