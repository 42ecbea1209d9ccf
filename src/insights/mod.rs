//! Derived views over the tracker logs: XP, streaks and the Ramadhan heatmap.
//!
//! Everything here is recomputed from rows on demand; nothing is authoritative.

pub mod heatmap;
pub mod streak;
pub mod xp;

use anyhow::Result;
use chrono::{Duration, NaiveDate};
use rusqlite::Connection;
use std::collections::BTreeMap;

use crate::db::repository::{CharityRepo, DailyLogRepo, PrayerLogRepo, QuranLogRepo};
use crate::models::{DailySummary, FastingStatus, PrayerName, PrayerStatus};
use crate::utils::dates;

pub use heatmap::{heatmap, Ramadhan};
pub use streak::{compute_streaks, refresh_streaks};
pub use xp::{compute_xp, total_xp};

/// Everything logged on one date.
#[derive(Debug, Clone, PartialEq)]
pub struct DayLogs {
    pub date: String,
    pub prayers: Vec<(PrayerName, PrayerStatus)>,
    pub fasting: FastingStatus,
    pub pages_read: u32,
    pub charity_amount: i64,
}

impl DayLogs {
    pub fn empty(date: &str) -> Self {
        Self {
            date: date.to_string(),
            prayers: Vec::new(),
            fasting: FastingStatus::Unset,
            pages_read: 0,
            charity_amount: 0,
        }
    }

    pub fn status_of(&self, prayer: PrayerName) -> PrayerStatus {
        self.prayers
            .iter()
            .find(|(name, _)| *name == prayer)
            .map(|(_, status)| *status)
            .unwrap_or(PrayerStatus::Unset)
    }

    /// Fard prayers performed, on time or made up.
    pub fn fard_done(&self) -> u32 {
        self.prayers
            .iter()
            .filter(|(name, status)| name.is_fard() && status.is_done())
            .count() as u32
    }

    pub fn summary(&self) -> DailySummary {
        DailySummary {
            date: self.date.clone(),
            prayers_done: self.fard_done(),
            fasting: self.fasting == FastingStatus::Full,
            pages_read: self.pages_read,
            charity_amount: self.charity_amount,
            xp_earned: compute_xp(self),
        }
    }
}

/// Load one `DayLogs` per date in `start..=end`, including days with no rows.
pub fn load_range(conn: &Connection, start: NaiveDate, end: NaiveDate) -> Result<Vec<DayLogs>> {
    let (s, e) = (dates::iso(start), dates::iso(end));

    let mut days: BTreeMap<String, DayLogs> = BTreeMap::new();
    let mut date = start;
    while date <= end {
        let iso = dates::iso(date);
        days.insert(iso.clone(), DayLogs::empty(&iso));
        date += Duration::days(1);
    }

    for log in PrayerLogRepo::get_date_range(conn, &s, &e)? {
        if let Some(day) = days.get_mut(&log.date) {
            day.prayers.push((log.prayer_name, log.status));
        }
    }
    for log in DailyLogRepo::get_date_range(conn, &s, &e)? {
        if let Some(day) = days.get_mut(&log.date) {
            day.fasting = log.fasting_status;
        }
    }
    for log in QuranLogRepo::get_date_range(conn, &s, &e)? {
        if let Some(day) = days.get_mut(&log.date) {
            day.pages_read = log.pages_read;
        }
    }
    for log in CharityRepo::get_date_range(conn, &s, &e)? {
        if let Some(day) = days.get_mut(&log.date) {
            day.charity_amount += log.amount;
        }
    }

    Ok(days.into_values().collect())
}

/// Logs for the seven days ending at `today`.
pub fn load_week(conn: &Connection, today: NaiveDate) -> Result<Vec<DayLogs>> {
    load_range(conn, today - Duration::days(6), today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    #[test]
    fn load_range_fills_empty_days() {
        let conn = conn();
        let days = load_range(&conn, d(17), d(19)).unwrap();
        assert_eq!(days.len(), 3);
        assert_eq!(days[0].date, "2026-03-17");
        assert_eq!(days[2].date, "2026-03-19");
        assert!(days.iter().all(|day| day.prayers.is_empty()));
    }

    #[test]
    fn load_range_merges_every_table() {
        let conn = conn();
        PrayerLogRepo::set_status(&conn, "2026-03-18", PrayerName::Fajr, PrayerStatus::OnTime).unwrap();
        PrayerLogRepo::set_status(&conn, "2026-03-18", PrayerName::Isha, PrayerStatus::Qadha).unwrap();
        PrayerLogRepo::set_status(&conn, "2026-03-18", PrayerName::Witir, PrayerStatus::OnTime).unwrap();
        DailyLogRepo::upsert(&conn, "2026-03-18", FastingStatus::Full, None).unwrap();
        QuranLogRepo::set_pages(&conn, "2026-03-18", 12, None).unwrap();
        CharityRepo::add(&conn, "2026-03-18", 20_000, "masjid", None).unwrap();
        CharityRepo::add(&conn, "2026-03-18", 5_000, "online", None).unwrap();
        CharityRepo::add(&conn, "2026-03-25", 5_000, "online", None).unwrap();

        let days = load_range(&conn, d(17), d(19)).unwrap();
        let day = &days[1];
        assert_eq!(day.fard_done(), 2);
        assert_eq!(day.status_of(PrayerName::Isha), PrayerStatus::Qadha);
        assert_eq!(day.status_of(PrayerName::Asr), PrayerStatus::Unset);
        assert_eq!(day.fasting, FastingStatus::Full);
        assert_eq!(day.pages_read, 12);
        assert_eq!(day.charity_amount, 25_000);

        let summary = day.summary();
        assert!(summary.fasting);
        // 30 + 10 + 15 prayers, 50 fasting, 60 pages, 30 charity
        assert_eq!(summary.xp_earned, 195);
    }

    #[test]
    fn week_is_seven_days_ending_today() {
        let conn = conn();
        let week = load_week(&conn, d(23)).unwrap();
        assert_eq!(week.len(), 7);
        assert_eq!(week[0].date, "2026-03-17");
        assert_eq!(week[6].date, "2026-03-23");
    }
}
