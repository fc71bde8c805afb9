//! Read models derived from a [`StoreSnapshot`] for the dashboard and the
//! calendar screens.

use anyhow::{anyhow, Result};
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::{
    models::{Outfit, Schedule},
    utils::dates::{days_in_month, first_weekday_of_month, month_name},
};

use super::StoreSnapshot;

pub const AGENDA_DAYS: usize = 7;
pub const AGENDA_PREVIEW_LIMIT: usize = 3;
pub const CALENDAR_PREVIEW_LIMIT: usize = 2;

/// A schedule together with the outfit it points at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScheduledOutfit<'a> {
    pub schedule: &'a Schedule,
    pub outfit: &'a Outfit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WardrobeStats {
    pub outfits: usize,
    pub schedules: usize,
    pub tags: usize,
    pub scheduled_today: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaDay<'a> {
    pub date: NaiveDate,
    pub label: String,
    pub schedule_count: usize,
    pub previews: Vec<ScheduledOutfit<'a>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard<'a> {
    pub today: NaiveDate,
    pub todays_outfits: Vec<ScheduledOutfit<'a>>,
    pub upcoming: Vec<AgendaDay<'a>>,
    pub stats: WardrobeStats,
}

/// Year and 1-based month being displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthCursor {
    pub year: i32,
    pub month: u32,
}

impl MonthCursor {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(anyhow!("month {month} is out of range 1-12"));
        }
        Ok(Self { year, month })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn previous(self) -> Self {
        if self.month == 1 {
            Self { year: self.year - 1, month: 12 }
        } else {
            Self { month: self.month - 1, ..self }
        }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { month: self.month + 1, ..self }
        }
    }

    pub fn title(self) -> String {
        format!("{} {}", month_name(self.month).unwrap_or("?"), self.year)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay<'a> {
    pub date: NaiveDate,
    pub schedules: Vec<&'a Schedule>,
    /// Resolved outfits for the first few schedules; missing outfits are skipped.
    pub previews: Vec<&'a Outfit>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarMonth<'a> {
    pub cursor: MonthCursor,
    pub title: String,
    /// Empty cells before the 1st in a Sunday-first grid.
    pub leading_blanks: u32,
    pub days: Vec<CalendarDay<'a>>,
}

impl StoreSnapshot {
    /// Schedules on `date` paired with their outfits. Schedules whose outfit
    /// no longer exists are left out.
    pub fn scheduled_outfits_on(&self, date: NaiveDate) -> Vec<ScheduledOutfit<'_>> {
        self.schedules_on(date)
            .into_iter()
            .filter_map(|schedule| {
                self.outfit_by_id(&schedule.outfit_id)
                    .map(|outfit| ScheduledOutfit { schedule, outfit })
            })
            .collect()
    }

    pub fn stats(&self, today: NaiveDate) -> WardrobeStats {
        WardrobeStats {
            outfits: self.outfits.len(),
            schedules: self.schedules.len(),
            tags: self.tags.len(),
            scheduled_today: self.schedules_on(today).len(),
        }
    }

    pub fn dashboard(&self, today: NaiveDate) -> Dashboard<'_> {
        let upcoming = (0..AGENDA_DAYS)
            .filter_map(|offset| {
                let date = today.checked_add_signed(Duration::days(offset as i64))?;
                let schedules = self.schedules_on(date);
                let previews = schedules
                    .iter()
                    .copied()
                    .take(AGENDA_PREVIEW_LIMIT)
                    .filter_map(|schedule| {
                        self.outfit_by_id(&schedule.outfit_id)
                            .map(|outfit| ScheduledOutfit { schedule, outfit })
                    })
                    .collect();
                Some(AgendaDay {
                    date,
                    label: agenda_label(offset, date),
                    schedule_count: schedules.len(),
                    previews,
                })
            })
            .collect();

        Dashboard {
            today,
            todays_outfits: self.scheduled_outfits_on(today),
            upcoming,
            stats: self.stats(today),
        }
    }

    pub fn calendar_month(&self, cursor: MonthCursor) -> Result<CalendarMonth<'_>> {
        let MonthCursor { year, month } = cursor;
        let day_count = days_in_month(year, month)
            .ok_or_else(|| anyhow!("no calendar for {year}-{month:02}"))?;
        let leading_blanks = first_weekday_of_month(year, month)
            .ok_or_else(|| anyhow!("no calendar for {year}-{month:02}"))?;

        let days = (1..=day_count)
            .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day))
            .map(|date| {
                let schedules = self.schedules_on(date);
                let previews = schedules
                    .iter()
                    .take(CALENDAR_PREVIEW_LIMIT)
                    .filter_map(|s| self.outfit_by_id(&s.outfit_id))
                    .collect();
                CalendarDay {
                    date,
                    schedules,
                    previews,
                }
            })
            .collect();

        Ok(CalendarMonth {
            cursor,
            title: cursor.title(),
            leading_blanks,
            days,
        })
    }
}

fn agenda_label(offset: usize, date: NaiveDate) -> String {
    match offset {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => date.format("%a, %b %-d").to_string(),
    }
}
