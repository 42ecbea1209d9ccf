use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::str::FromStr;

use crate::models::{
    CharityLog, DailyLog, FastingStatus, HabitStreak, MonthSchedule, PrayerLog, PrayerName,
    PrayerStatus, QuranLog,
};

// ─── Month schedule cache ───────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct CachedMonth {
    pub schedule: MonthSchedule,
    pub fetched_at: DateTime<Utc>,
}

pub struct CacheRepo;

impl CacheRepo {
    pub fn get_month(conn: &Connection, key: &str) -> Result<Option<CachedMonth>> {
        let row = conn
            .query_row(
                "SELECT payload, fetched_at FROM schedule_cache WHERE cache_key = ?1",
                params![key],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        match row {
            None => Ok(None),
            Some((payload, fetched_at)) => {
                let schedule: MonthSchedule = serde_json::from_str(&payload)
                    .with_context(|| format!("Decoding cached schedule '{}'", key))?;
                let fetched_at = DateTime::parse_from_rfc3339(&fetched_at)
                    .with_context(|| format!("Bad fetched_at '{}'", fetched_at))?
                    .with_timezone(&Utc);
                Ok(Some(CachedMonth {
                    schedule,
                    fetched_at,
                }))
            }
        }
    }

    /// Replaces any previous entry for the key wholesale.
    pub fn store_month(
        conn: &Connection,
        key: &str,
        schedule: &MonthSchedule,
        fetched_at: DateTime<Utc>,
    ) -> Result<()> {
        let payload = serde_json::to_string(schedule).context("Encoding schedule")?;
        conn.execute(
            "INSERT OR REPLACE INTO schedule_cache (cache_key, payload, fetched_at)
             VALUES (?1, ?2, ?3)",
            params![key, payload, fetched_at.to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn clear_all(conn: &Connection) -> Result<()> {
        conn.execute("DELETE FROM schedule_cache", [])?;
        Ok(())
    }
}

// ─── Prayer logs ─────────────────────────────────────────────────────────────

const PRAYER_ORDER: &str = "CASE prayer_name
    WHEN 'fajr' THEN 1 WHEN 'dhuhr' THEN 2 WHEN 'asr' THEN 3
    WHEN 'maghrib' THEN 4 WHEN 'isha' THEN 5 WHEN 'tarawih' THEN 6
    WHEN 'witir' THEN 7 WHEN 'dhuha' THEN 8 WHEN 'qiyam' THEN 9 END";

pub struct PrayerLogRepo;

impl PrayerLogRepo {
    /// One row per (date, prayer). `Unset` removes the row.
    pub fn set_status(
        conn: &Connection,
        date: &str,
        prayer: PrayerName,
        status: PrayerStatus,
    ) -> Result<()> {
        if status == PrayerStatus::Unset {
            conn.execute(
                "DELETE FROM prayer_logs WHERE date = ?1 AND prayer_name = ?2",
                params![date, prayer.as_str()],
            )?;
            return Ok(());
        }
        conn.execute(
            "INSERT INTO prayer_logs (date, prayer_name, status) VALUES (?1, ?2, ?3)
             ON CONFLICT(date, prayer_name) DO UPDATE SET status = ?3",
            params![date, prayer.as_str(), status.as_str()],
        )?;
        Ok(())
    }

    pub fn get_by_date(conn: &Connection, date: &str) -> Result<Vec<PrayerLog>> {
        Self::get_date_range(conn, date, date)
    }

    pub fn get_date_range(conn: &Connection, start: &str, end: &str) -> Result<Vec<PrayerLog>> {
        let sql = format!(
            "SELECT id, date, prayer_name, status FROM prayer_logs
             WHERE date >= ?1 AND date <= ?2
             ORDER BY date, {}",
            PRAYER_ORDER
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![start, end], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut result = Vec::new();
        for r in rows {
            let (id, date, prayer_name, status) = r?;
            result.push(PrayerLog {
                id: Some(id),
                date,
                prayer_name: PrayerName::from_str(&prayer_name)?,
                status: PrayerStatus::from_str(&status)?,
            });
        }
        Ok(result)
    }
}

// ─── Daily (fasting) logs ────────────────────────────────────────────────────

fn fasting_from_db(value: Option<String>) -> Result<FastingStatus> {
    match value {
        None => Ok(FastingStatus::Unset),
        Some(s) => FastingStatus::from_str(&s),
    }
}

pub struct DailyLogRepo;

impl DailyLogRepo {
    /// One row per date. `Unset` removes the row, note included.
    pub fn upsert(
        conn: &Connection,
        date: &str,
        status: FastingStatus,
        note: Option<&str>,
    ) -> Result<()> {
        if status == FastingStatus::Unset {
            conn.execute("DELETE FROM daily_logs WHERE date = ?1", params![date])?;
            return Ok(());
        }
        conn.execute(
            "INSERT INTO daily_logs (date, fasting_status, note) VALUES (?1, ?2, ?3)
             ON CONFLICT(date) DO UPDATE SET fasting_status = ?2, note = COALESCE(?3, note)",
            params![date, status.as_str(), note],
        )?;
        Ok(())
    }

    pub fn get(conn: &Connection, date: &str) -> Result<Option<DailyLog>> {
        Ok(Self::get_date_range(conn, date, date)?.into_iter().next())
    }

    pub fn get_date_range(conn: &Connection, start: &str, end: &str) -> Result<Vec<DailyLog>> {
        let mut stmt = conn.prepare(
            "SELECT date, fasting_status, note FROM daily_logs
             WHERE date >= ?1 AND date <= ?2 ORDER BY date",
        )?;
        let rows = stmt.query_map(params![start, end], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, Option<String>>(2)?,
            ))
        })?;

        let mut result = Vec::new();
        for r in rows {
            let (date, status, note) = r?;
            result.push(DailyLog {
                date,
                fasting_status: fasting_from_db(status)?,
                note,
            });
        }
        Ok(result)
    }
}

// ─── Quran reading logs ──────────────────────────────────────────────────────

pub struct QuranLogRepo;

impl QuranLogRepo {
    /// Set the day's total.
    pub fn set_pages(
        conn: &Connection,
        date: &str,
        pages: u32,
        last_position: Option<&str>,
    ) -> Result<()> {
        conn.execute(
            "INSERT INTO quran_logs (date, pages_read, last_position) VALUES (?1, ?2, ?3)
             ON CONFLICT(date) DO UPDATE SET pages_read = ?2,
                 last_position = COALESCE(?3, last_position)",
            params![date, pages, last_position],
        )?;
        Ok(())
    }

    /// Add to the day's total, capped at `u32::MAX`.
    pub fn add_pages(
        conn: &Connection,
        date: &str,
        pages: u32,
        last_position: Option<&str>,
    ) -> Result<()> {
        conn.execute(
            "INSERT INTO quran_logs (date, pages_read, last_position) VALUES (?1, ?2, ?3)
             ON CONFLICT(date) DO UPDATE SET pages_read = MIN(pages_read + ?2, 4294967295),
                 last_position = COALESCE(?3, last_position)",
            params![date, pages, last_position],
        )?;
        Ok(())
    }

    pub fn get(conn: &Connection, date: &str) -> Result<Option<QuranLog>> {
        Ok(Self::get_date_range(conn, date, date)?.into_iter().next())
    }

    pub fn get_date_range(conn: &Connection, start: &str, end: &str) -> Result<Vec<QuranLog>> {
        let mut stmt = conn.prepare(
            "SELECT date, pages_read, last_position FROM quran_logs
             WHERE date >= ?1 AND date <= ?2 ORDER BY date",
        )?;
        let rows = stmt.query_map(params![start, end], |row| {
            Ok(QuranLog {
                date: row.get(0)?,
                pages_read: row.get(1)?,
                last_position: row.get(2)?,
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(anyhow::Error::from)
    }

    /// Most recent non-empty position marker, for "continue reading".
    pub fn last_position(conn: &Connection) -> Result<Option<String>> {
        conn.query_row(
            "SELECT last_position FROM quran_logs
             WHERE last_position IS NOT NULL AND last_position != ''
             ORDER BY date DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()
        .map_err(anyhow::Error::from)
    }
}

// ─── Charity logs ────────────────────────────────────────────────────────────

pub struct CharityRepo;

impl CharityRepo {
    pub fn add(
        conn: &Connection,
        date: &str,
        amount: i64,
        channel: &str,
        note: Option<&str>,
    ) -> Result<()> {
        conn.execute(
            "INSERT INTO charity_logs (date, amount, channel, note) VALUES (?1, ?2, ?3, ?4)",
            params![date, amount, channel, note],
        )?;
        Ok(())
    }

    pub fn get_date_range(conn: &Connection, start: &str, end: &str) -> Result<Vec<CharityLog>> {
        let mut stmt = conn.prepare(
            "SELECT id, date, amount, channel, note FROM charity_logs
             WHERE date >= ?1 AND date <= ?2 ORDER BY date, id",
        )?;
        let rows = stmt.query_map(params![start, end], |row| {
            Ok(CharityLog {
                id: Some(row.get(0)?),
                date: row.get(1)?,
                amount: row.get(2)?,
                channel: row.get(3)?,
                note: row.get(4)?,
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(anyhow::Error::from)
    }

    pub fn total(conn: &Connection) -> Result<i64> {
        conn.query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM charity_logs",
            [],
            |row| row.get(0),
        )
        .map_err(anyhow::Error::from)
    }
}

// ─── Habit streaks ───────────────────────────────────────────────────────────

pub struct StreakRepo;

impl StreakRepo {
    pub fn get_all(conn: &Connection) -> Result<Vec<HabitStreak>> {
        let mut stmt = conn.prepare(
            "SELECT habit_key, current_streak, best_streak, last_logged_date
             FROM habit_streaks ORDER BY habit_key",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(HabitStreak {
                habit_key: row.get(0)?,
                current_streak: row.get(1)?,
                best_streak: row.get(2)?,
                last_logged_date: row.get(3)?,
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(anyhow::Error::from)
    }

    pub fn upsert(conn: &Connection, streak: &HabitStreak) -> Result<()> {
        conn.execute(
            "INSERT INTO habit_streaks (habit_key, current_streak, best_streak, last_logged_date)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(habit_key) DO UPDATE SET
                 current_streak = ?2, best_streak = ?3, last_logged_date = ?4",
            params![
                streak.habit_key,
                streak.current_streak,
                streak.best_streak,
                streak.last_logged_date
            ],
        )?;
        Ok(())
    }
}

// ─── App meta ────────────────────────────────────────────────────────────────

pub struct MetaRepo;

impl MetaRepo {
    pub fn get(conn: &Connection, key: &str) -> Result<Option<String>> {
        conn.query_row(
            "SELECT value FROM app_meta WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(anyhow::Error::from)
    }

    pub fn set(conn: &Connection, key: &str, value: &str) -> Result<()> {
        conn.execute(
            "INSERT INTO app_meta (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }

    /// Oldest date present in any tracker table.
    pub fn earliest_log_date(conn: &Connection) -> Result<Option<String>> {
        conn.query_row(
            "SELECT MIN(date) FROM (
                 SELECT date FROM prayer_logs
                 UNION ALL SELECT date FROM daily_logs
                 UNION ALL SELECT date FROM quran_logs
                 UNION ALL SELECT date FROM charity_logs
             )",
            [],
            |row| row.get(0),
        )
        .map_err(anyhow::Error::from)
    }
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

    #[test]
    fn prayer_status_upserts_one_row_per_day() {
        let conn = conn();
        PrayerLogRepo::set_status(&conn, "2026-03-17", PrayerName::Fajr, PrayerStatus::Qadha).unwrap();
        PrayerLogRepo::set_status(&conn, "2026-03-17", PrayerName::Fajr, PrayerStatus::OnTime).unwrap();
        let logs = PrayerLogRepo::get_by_date(&conn, "2026-03-17").unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].status, PrayerStatus::OnTime);
    }

    #[test]
    fn unset_removes_prayer_row() {
        let conn = conn();
        PrayerLogRepo::set_status(&conn, "2026-03-17", PrayerName::Asr, PrayerStatus::OnTime).unwrap();
        PrayerLogRepo::set_status(&conn, "2026-03-17", PrayerName::Asr, PrayerStatus::Unset).unwrap();
        assert!(PrayerLogRepo::get_by_date(&conn, "2026-03-17").unwrap().is_empty());
    }

    #[test]
    fn prayers_come_back_in_day_order() {
        let conn = conn();
        for p in [PrayerName::Isha, PrayerName::Tarawih, PrayerName::Fajr] {
            PrayerLogRepo::set_status(&conn, "2026-03-18", p, PrayerStatus::OnTime).unwrap();
        }
        let names: Vec<PrayerName> = PrayerLogRepo::get_by_date(&conn, "2026-03-18")
            .unwrap()
            .into_iter()
            .map(|l| l.prayer_name)
            .collect();
        assert_eq!(names, vec![PrayerName::Fajr, PrayerName::Isha, PrayerName::Tarawih]);
    }

    #[test]
    fn fasting_upsert_keeps_note_when_not_given() {
        let conn = conn();
        DailyLogRepo::upsert(&conn, "2026-03-17", FastingStatus::Partial, Some("sakit")).unwrap();
        DailyLogRepo::upsert(&conn, "2026-03-17", FastingStatus::Full, None).unwrap();
        let log = DailyLogRepo::get(&conn, "2026-03-17").unwrap().unwrap();
        assert_eq!(log.fasting_status, FastingStatus::Full);
        assert_eq!(log.note.as_deref(), Some("sakit"));

    }

    #[test]
    fn unset_fasting_deletes_the_row() {
        let conn = conn();
        DailyLogRepo::upsert(&conn, "2026-03-17", FastingStatus::Full, Some("lancar")).unwrap();
        DailyLogRepo::upsert(&conn, "2026-03-17", FastingStatus::Unset, None).unwrap();

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM daily_logs WHERE date = '2026-03-17'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(rows, 0);
        assert!(DailyLogRepo::get(&conn, "2026-03-17").unwrap().is_none());
    }

    #[test]
    fn added_pages_cap_at_u32_max() {
        let conn = conn();
        for _ in 0..5 {
            QuranLogRepo::add_pages(&conn, "2026-03-17", 1_000_000_000, None).unwrap();
        }
        let log = QuranLogRepo::get(&conn, "2026-03-17").unwrap().unwrap();
        assert_eq!(log.pages_read, u32::MAX);
    }

    #[test]
    fn quran_pages_set_and_add() {
        let conn = conn();
        QuranLogRepo::add_pages(&conn, "2026-03-17", 4, None).unwrap();
        QuranLogRepo::add_pages(&conn, "2026-03-17", 6, Some("Al-Baqarah 40")).unwrap();
        assert_eq!(QuranLogRepo::get(&conn, "2026-03-17").unwrap().unwrap().pages_read, 10);

        QuranLogRepo::set_pages(&conn, "2026-03-17", 3, None).unwrap();
        let log = QuranLogRepo::get(&conn, "2026-03-17").unwrap().unwrap();
        assert_eq!(log.pages_read, 3);
        assert_eq!(log.last_position.as_deref(), Some("Al-Baqarah 40"));
        assert_eq!(
            QuranLogRepo::last_position(&conn).unwrap().as_deref(),
            Some("Al-Baqarah 40")
        );
    }

    #[test]
    fn charity_appends_and_totals() {
        let conn = conn();
        CharityRepo::add(&conn, "2026-03-17", 50_000, "masjid", None).unwrap();
        CharityRepo::add(&conn, "2026-03-17", 25_000, "online", Some("zakat")).unwrap();
        assert_eq!(CharityRepo::get_date_range(&conn, "2026-03-17", "2026-03-17").unwrap().len(), 2);
        assert_eq!(CharityRepo::total(&conn).unwrap(), 75_000);
    }

    #[test]
    fn schedule_cache_replaces_wholesale() {
        let conn = conn();
        let now = Utc::now();
        CacheRepo::store_month(&conn, "k", &MonthSchedule::default(), now).unwrap();
        let cached = CacheRepo::get_month(&conn, "k").unwrap().unwrap();
        assert!(cached.schedule.is_empty());
        assert_eq!(cached.fetched_at.timestamp(), now.timestamp());
        assert!(CacheRepo::get_month(&conn, "missing").unwrap().is_none());

        CacheRepo::clear_all(&conn).unwrap();
        assert!(CacheRepo::get_month(&conn, "k").unwrap().is_none());
    }

    #[test]
    fn streak_upsert_round_trips() {
        let conn = conn();
        let streak = HabitStreak {
            habit_key: "daily".to_string(),
            current_streak: 3,
            best_streak: 7,
            last_logged_date: Some("2026-03-19".to_string()),
        };
        StreakRepo::upsert(&conn, &streak).unwrap();
        assert_eq!(StreakRepo::get_all(&conn).unwrap(), vec![streak]);
    }

    #[test]
    fn meta_set_overwrites() {
        let conn = conn();
        MetaRepo::set(&conn, "setup_done", "0").unwrap();
        MetaRepo::set(&conn, "setup_done", "1").unwrap();
        assert_eq!(MetaRepo::get(&conn, "setup_done").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn earliest_date_spans_all_tables() {
        let conn = conn();
        assert_eq!(MetaRepo::earliest_log_date(&conn).unwrap(), None);
        QuranLogRepo::set_pages(&conn, "2026-03-20", 4, None).unwrap();
        CharityRepo::add(&conn, "2026-03-18", 10_000, "masjid", None).unwrap();
        assert_eq!(
            MetaRepo::earliest_log_date(&conn).unwrap().as_deref(),
            Some("2026-03-18")
        );
    }
}
