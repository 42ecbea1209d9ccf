use anyhow::Result;
use chrono::{Duration, NaiveDate};
use log::debug;
use rusqlite::Connection;
use std::collections::BTreeSet;

use crate::db::repository::{MetaRepo, StreakRepo};
use crate::insights::{load_range, DayLogs};
use crate::models::{FastingStatus, HabitStreak, Streak};
use crate::utils::dates;

pub const HABIT_KEYS: [&str; 3] = ["daily", "fasting", "quran"];

fn qualifies(habit: &str, day: &DayLogs) -> bool {
    match habit {
        "daily" => day.fard_done() >= 5,
        "fasting" => day.fasting == FastingStatus::Full,
        "quran" => day.pages_read > 0,
        _ => false,
    }
}

/// Current run ends today, or yesterday while today is still open.
pub fn streak_from(days: &BTreeSet<NaiveDate>, today: NaiveDate) -> Streak {
    let mut cursor = if days.contains(&today) {
        today
    } else {
        today - Duration::days(1)
    };
    let mut current = 0;
    while days.contains(&cursor) {
        current += 1;
        cursor -= Duration::days(1);
    }

    let mut best = 0;
    let mut run = 0;
    let mut prev: Option<NaiveDate> = None;
    for &date in days.iter().filter(|d| **d <= today) {
        run = match prev {
            Some(p) if date - p == Duration::days(1) => run + 1,
            _ => 1,
        };
        best = best.max(run);
        prev = Some(date);
    }

    Streak {
        current,
        best: best.max(current),
    }
}

pub fn compute_streaks(days: &[DayLogs], today: NaiveDate) -> Vec<HabitStreak> {
    HABIT_KEYS
        .iter()
        .map(|habit| {
            let hits: BTreeSet<NaiveDate> = days
                .iter()
                .filter(|d| qualifies(habit, d))
                .filter_map(|d| dates::parse_iso(&d.date).ok())
                .collect();
            let streak = streak_from(&hits, today);
            HabitStreak {
                habit_key: habit.to_string(),
                current_streak: streak.current,
                best_streak: streak.best,
                last_logged_date: hits.iter().filter(|d| **d <= today).next_back().map(|d| dates::iso(*d)),
            }
        })
        .collect()
}

/// Recompute every habit from the full history and persist the counters.
pub fn refresh_streaks(conn: &Connection, today: NaiveDate) -> Result<Vec<HabitStreak>> {
    let start = match MetaRepo::earliest_log_date(conn)? {
        Some(first) => dates::parse_iso(&first)?.min(today),
        None => today,
    };
    let days = load_range(conn, start, today)?;
    let streaks = compute_streaks(&days, today);
    for streak in &streaks {
        StreakRepo::upsert(conn, streak)?;
    }
    debug!("refreshed {} streaks over {} days", streaks.len(), days.len());
    // Stored rows, ordered by habit key.
    StreakRepo::get_all(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::db::repository::{DailyLogRepo, PrayerLogRepo, QuranLogRepo};
    use crate::models::{PrayerName, PrayerStatus};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    fn set(days: &[u32]) -> BTreeSet<NaiveDate> {
        days.iter().map(|n| d(*n)).collect()
    }

    #[test]
    fn empty_history_has_no_streak() {
        assert_eq!(streak_from(&BTreeSet::new(), d(20)), Streak::default());
    }

    #[test]
    fn current_run_includes_today() {
        let s = streak_from(&set(&[17, 18, 19, 20]), d(20));
        assert_eq!(s, Streak { current: 4, best: 4 });
    }

    #[test]
    fn open_today_keeps_yesterdays_run() {
        let s = streak_from(&set(&[18, 19]), d(20));
        assert_eq!(s.current, 2);
    }

    #[test]
    fn gap_breaks_the_run_but_best_remembers() {
        let s = streak_from(&set(&[10, 11, 12, 13, 17, 18]), d(20));
        assert_eq!(s, Streak { current: 0, best: 4 });
        let s = streak_from(&set(&[10, 11, 12, 13, 19, 20]), d(20));
        assert_eq!(s, Streak { current: 2, best: 4 });
    }

    #[test]
    fn compute_streaks_per_habit() {
        let mut full = DayLogs::empty("2026-03-19");
        full.prayers = PrayerName::FARD
            .iter()
            .map(|p| (*p, PrayerStatus::OnTime))
            .collect();
        full.fasting = FastingStatus::Full;
        let mut partial = DayLogs::empty("2026-03-20");
        partial.pages_read = 3;
        partial.fasting = FastingStatus::Full;

        let streaks = compute_streaks(&[full, partial], d(20));
        let by_key = |k: &str| streaks.iter().find(|s| s.habit_key == k).unwrap().clone();

        let daily = by_key("daily");
        assert_eq!(daily.current_streak, 1);
        assert_eq!(daily.last_logged_date.as_deref(), Some("2026-03-19"));
        assert_eq!(by_key("fasting").current_streak, 2);
        let quran = by_key("quran");
        assert_eq!(quran.current_streak, 1);
        assert_eq!(quran.best_streak, 1);
    }

    #[test]
    fn refresh_persists_counters() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        for day in ["2026-03-17", "2026-03-18", "2026-03-19"] {
            DailyLogRepo::upsert(&conn, day, FastingStatus::Full, None).unwrap();
        }
        QuranLogRepo::set_pages(&conn, "2026-03-19", 5, None).unwrap();
        PrayerLogRepo::set_status(&conn, "2026-03-19", PrayerName::Fajr, PrayerStatus::OnTime)
            .unwrap();

        let streaks = refresh_streaks(&conn, d(19)).unwrap();
        assert_eq!(streaks, StreakRepo::get_all(&conn).unwrap());

        let find = |key: &str| streaks.iter().find(|s| s.habit_key == key).unwrap().clone();
        let fasting = find("fasting");
        assert_eq!(fasting.current_streak, 3);
        assert_eq!(fasting.best_streak, 3);
        let daily = find("daily");
        assert_eq!(daily.current_streak, 0);
        assert_eq!(daily.last_logged_date, None);
    }

    #[test]
    fn refresh_with_no_history() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let streaks = refresh_streaks(&conn, d(19)).unwrap();
        assert!(streaks.iter().all(|s| s.current_streak == 0));
        assert_eq!(StreakRepo::get_all(&conn).unwrap().len(), 3);
    }
}
