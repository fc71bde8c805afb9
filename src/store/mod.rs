mod controller;
mod events;
mod state;
pub mod views;

pub use controller::WardrobeStore;
pub use events::StoreEvent;
pub use state::StoreSnapshot;
pub use views::{
    AgendaDay, CalendarDay, CalendarMonth, Dashboard, MonthCursor, ScheduledOutfit,
    WardrobeStats,
};
