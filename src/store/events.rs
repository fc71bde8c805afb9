use chrono::NaiveDate;
use serde::Serialize;

/// Discrete change notifications, published after the change is durable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StoreEvent {
    #[serde(rename_all = "camelCase")]
    OutfitCreated { outfit_id: String },
    /// Also covers schedules that pointed at an outfit already gone.
    #[serde(rename_all = "camelCase")]
    OutfitDeleted {
        outfit_id: String,
        removed_schedules: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    ScheduleCreated {
        schedule_id: String,
        outfit_id: String,
        date: NaiveDate,
    },
    #[serde(rename_all = "camelCase")]
    ScheduleDeleted { schedule_id: String },
    TagAdded { tag: String },
}
