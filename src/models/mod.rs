mod outfit;
mod schedule;

pub use outfit::{NewOutfit, Outfit};
pub use schedule::{NewSchedule, Schedule, TimeSlot};
