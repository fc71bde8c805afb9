use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TimeSlot {
    Morning,
    Afternoon,
    Evening,
}

impl TimeSlot {
    pub const ALL: [TimeSlot; 3] = [TimeSlot::Morning, TimeSlot::Afternoon, TimeSlot::Evening];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeSlot::Morning => "morning",
            TimeSlot::Afternoon => "afternoon",
            TimeSlot::Evening => "evening",
        }
    }
}

impl FromStr for TimeSlot {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "morning" => Ok(TimeSlot::Morning),
            "afternoon" => Ok(TimeSlot::Afternoon),
            "evening" => Ok(TimeSlot::Evening),
            other => Err(anyhow!("unknown time slot '{other}'")),
        }
    }
}

/// Assignment of one outfit to a calendar date.
///
/// `outfit_id` is not a checked foreign key; resolving it may find nothing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: String,
    pub outfit_id: String,
    /// Serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub time_slot: Option<TimeSlot>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewSchedule {
    pub outfit_id: String,
    pub date: NaiveDate,
    pub time_slot: Option<TimeSlot>,
}

impl NewSchedule {
    pub fn new(outfit_id: impl Into<String>, date: NaiveDate, time_slot: Option<TimeSlot>) -> Self {
        Self {
            outfit_id: outfit_id.into(),
            date,
            time_slot,
        }
    }

    pub(crate) fn into_schedule(self, id: String) -> Schedule {
        Schedule {
            id,
            outfit_id: self.outfit_id,
            date: self.date,
            time_slot: self.time_slot,
        }
    }
}
