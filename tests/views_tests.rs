// Dashboard, calendar and library search read models.

use chrono::NaiveDate;
use closely_lib::{
    store::{MonthCursor, views::AGENDA_DAYS},
    MemoryBackend, NewOutfit, NewSchedule, Persistence, TimeSlot, WardrobeStore,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn store() -> WardrobeStore {
    WardrobeStore::open(Persistence::new(MemoryBackend::new()))
}

#[test]
fn search_matches_title_or_tag_case_insensitively() {
    let mut store = store();
    let suit = store
        .create_outfit(NewOutfit::new("Blue Suit", "img").with_tags(["Work", "formal"]))
        .unwrap();
    let beach = store
        .create_outfit(NewOutfit::new("Beach Day", "img").with_tags(["summer"]))
        .unwrap();

    let titles = |query: &str| -> Vec<String> {
        store
            .search_outfits(query)
            .into_iter()
            .map(|o| o.id.clone())
            .collect()
    };

    assert_eq!(titles("suit"), vec![suit.id.clone()]);
    assert_eq!(titles(" suit "), vec![suit.id.clone()]);
    assert_eq!(titles("WORK"), vec![suit.id.clone()]);
    assert_eq!(titles("sum"), vec![beach.id.clone()]);
    assert_eq!(titles("  "), vec![suit.id.clone(), beach.id.clone()]);
    assert!(titles("gala").is_empty());
}

#[test]
fn dashboard_counts_and_resolves_today() {
    let mut store = store();
    let today = date(2024, 7, 1);
    let suit = store.create_outfit(NewOutfit::new("Blue Suit", "img")).unwrap();
    store.add_tag("work").unwrap();
    store
        .create_schedule(NewSchedule::new(&suit.id, today, Some(TimeSlot::Morning)))
        .unwrap();
    store
        .create_schedule(NewSchedule::new("deleted-outfit", today, None))
        .unwrap();
    store
        .create_schedule(NewSchedule::new(&suit.id, date(2024, 7, 3), None))
        .unwrap();

    let snapshot = store.snapshot();
    let dashboard = snapshot.dashboard(today);

    assert_eq!(dashboard.stats.outfits, 1);
    assert_eq!(dashboard.stats.schedules, 3);
    assert_eq!(dashboard.stats.tags, 1);
    assert_eq!(dashboard.stats.scheduled_today, 2);
    // The dangling schedule resolves to nothing.
    assert_eq!(dashboard.todays_outfits.len(), 1);
    assert_eq!(dashboard.todays_outfits[0].outfit.id, suit.id);
}

#[test]
fn agenda_covers_a_week_with_friendly_labels() {
    let mut store = store();
    let today = date(2024, 6, 29);
    let suit = store.create_outfit(NewOutfit::new("Blue Suit", "img")).unwrap();
    for _ in 0..5 {
        store
            .create_schedule(NewSchedule::new(&suit.id, date(2024, 7, 1), None))
            .unwrap();
    }

    let snapshot = store.snapshot();
    let agenda = snapshot.dashboard(today).upcoming;

    assert_eq!(agenda.len(), AGENDA_DAYS);
    assert_eq!(agenda[0].label, "Today");
    assert_eq!(agenda[1].label, "Tomorrow");
    assert_eq!(agenda[2].date, date(2024, 7, 1));
    assert_eq!(agenda[2].label, "Mon, Jul 1");
    assert_eq!(agenda[2].schedule_count, 5);
    assert_eq!(agenda[2].previews.len(), 3);
    assert_eq!(agenda[6].date, date(2024, 7, 5));
}

#[test]
fn calendar_month_lays_out_a_sunday_first_grid() {
    let mut store = store();
    let suit = store.create_outfit(NewOutfit::new("Blue Suit", "img")).unwrap();
    let beach = store.create_outfit(NewOutfit::new("Beach", "img")).unwrap();
    for id in [&suit.id, &beach.id, &suit.id] {
        store
            .create_schedule(NewSchedule::new(id, date(2024, 7, 4), None))
            .unwrap();
    }

    let snapshot = store.snapshot();
    let month = snapshot
        .calendar_month(MonthCursor::new(2024, 7).unwrap())
        .unwrap();

    assert_eq!(month.title, "July 2024");
    assert_eq!(month.leading_blanks, 1);
    assert_eq!(month.days.len(), 31);

    let fourth = &month.days[3];
    assert_eq!(fourth.date, date(2024, 7, 4));
    assert_eq!(fourth.schedules.len(), 3);
    let previews: Vec<&str> = fourth.previews.iter().map(|o| o.title.as_str()).collect();
    assert_eq!(previews, vec!["Blue Suit", "Beach"]);
    assert!(month.days[0].schedules.is_empty());
}

#[test]
fn month_cursor_wraps_years() {
    let january = MonthCursor::new(2024, 1).unwrap();
    assert_eq!(january.previous(), MonthCursor::new(2023, 12).unwrap());
    assert_eq!(january.previous().next(), january);
    assert_eq!(
        MonthCursor::containing(date(2024, 12, 25)).next(),
        MonthCursor::new(2025, 1).unwrap()
    );
    assert!(MonthCursor::new(2024, 0).is_err());
    assert!(MonthCursor::new(2024, 13).is_err());
}
