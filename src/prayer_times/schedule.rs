use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use log::{debug, info, warn};
use rusqlite::Connection;

use crate::db::repository::CacheRepo;
use crate::error::ScheduleFetchError;
use crate::models::{CacheKey, Coordinates, DailyTimings, MonthSchedule};
use crate::prayer_times::aladhan::{normalize_day, CalendarSource};
use crate::utils::dates;

/// Upstream data for a coordinate+month does not change, so a long window is fine.
pub const CACHE_TTL_HOURS: i64 = 6;

/// Derives month schedules from a calendar source and keeps them in the
/// `schedule_cache` table keyed by (rounded coordinates, year, month).
pub struct ScheduleService<S: CalendarSource> {
    source: S,
    ttl: Duration,
}

impl<S: CalendarSource> ScheduleService<S> {
    pub fn new(source: S) -> Self {
        Self::with_ttl(source, Duration::hours(CACHE_TTL_HOURS))
    }

    pub fn with_ttl(source: S, ttl: Duration) -> Self {
        Self { source, ttl }
    }

    #[cfg(test)]
    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn month_schedule(
        &self,
        conn: &Connection,
        coords: &Coordinates,
        year: i32,
        month: u32,
    ) -> Result<MonthSchedule, ScheduleFetchError> {
        self.month_schedule_at(conn, coords, year, month, Utc::now())
    }

    /// Cached value when younger than the TTL at `now`, otherwise a fresh fetch
    /// that replaces the cache entry. A broken cache never fails the call.
    pub fn month_schedule_at(
        &self,
        conn: &Connection,
        coords: &Coordinates,
        year: i32,
        month: u32,
        now: DateTime<Utc>,
    ) -> Result<MonthSchedule, ScheduleFetchError> {
        let key = CacheKey::new(coords, year, month);

        match CacheRepo::get_month(conn, key.as_str()) {
            Ok(Some(cached)) if now - cached.fetched_at < self.ttl => {
                debug!("schedule cache hit for {}", key.as_str());
                return Ok(cached.schedule);
            }
            Ok(Some(_)) => debug!("schedule cache expired for {}", key.as_str()),
            Ok(None) => debug!("schedule cache miss for {}", key.as_str()),
            Err(e) => warn!("schedule cache unreadable for {}: {:#}", key.as_str(), e),
        }

        self.fetch_and_store(conn, coords, year, month, now)
    }

    /// Skip the cache and replace whatever it holds.
    pub fn refresh(
        &self,
        conn: &Connection,
        coords: &Coordinates,
        year: i32,
        month: u32,
    ) -> Result<MonthSchedule, ScheduleFetchError> {
        self.fetch_and_store(conn, coords, year, month, Utc::now())
    }

    /// Timings for one date, from the month that contains it.
    pub fn day(
        &self,
        conn: &Connection,
        coords: &Coordinates,
        date: NaiveDate,
    ) -> Result<Option<DailyTimings>, ScheduleFetchError> {
        let schedule = self.month_schedule(conn, coords, date.year(), date.month())?;
        Ok(schedule.day(&dates::iso(date)).cloned())
    }

    /// Upstream day count is passed through without checking it against the calendar.
    pub fn fetch(
        &self,
        coords: &Coordinates,
        year: i32,
        month: u32,
    ) -> Result<MonthSchedule, ScheduleFetchError> {
        let raw = self.source.fetch_month(coords, year, month)?;
        let days = raw
            .iter()
            .map(normalize_day)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(MonthSchedule::new(days))
    }

    fn fetch_and_store(
        &self,
        conn: &Connection,
        coords: &Coordinates,
        year: i32,
        month: u32,
        now: DateTime<Utc>,
    ) -> Result<MonthSchedule, ScheduleFetchError> {
        let key = CacheKey::new(coords, year, month);
        let schedule = self.fetch(coords, year, month)?;
        info!(
            "fetched {} days for {} ({})",
            schedule.len(),
            key.as_str(),
            coords.label
        );
        if let Err(e) = CacheRepo::store_month(conn, key.as_str(), &schedule, now) {
            warn!("could not cache schedule {}: {:#}", key.as_str(), e);
        }
        Ok(schedule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::prayer_times::aladhan::{fixtures, CalendarDay};
    use std::cell::Cell;

    struct CountingSource {
        calls: Cell<u32>,
        days: Vec<CalendarDay>,
        fail: bool,
    }

    impl CountingSource {
        fn new(days: Vec<CalendarDay>) -> Self {
            Self {
                calls: Cell::new(0),
                days,
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                calls: Cell::new(0),
                days: Vec::new(),
                fail: true,
            }
        }
    }

    impl CalendarSource for CountingSource {
        fn fetch_month(
            &self,
            _coords: &Coordinates,
            _year: i32,
            _month: u32,
        ) -> Result<Vec<CalendarDay>, ScheduleFetchError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(ScheduleFetchError::Status(503));
            }
            Ok(self.days.clone())
        }
    }

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn jakarta() -> Coordinates {
        Coordinates::new(-6.2088, 106.8456, "Jakarta")
    }

    fn march() -> Vec<CalendarDay> {
        vec![
            fixtures::day("17-03-2026", "28", "Ramadan"),
            fixtures::day("18-03-2026", "29", "Ramadan"),
        ]
    }

    #[test]
    fn second_call_within_window_uses_cache() {
        let conn = conn();
        let service = ScheduleService::new(CountingSource::new(march()));
        let t0 = Utc::now();

        let first = service
            .month_schedule_at(&conn, &jakarta(), 2026, 3, t0)
            .unwrap();
        let second = service
            .month_schedule_at(&conn, &jakarta(), 2026, 3, t0 + Duration::hours(2))
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(service.source().calls.get(), 1);
    }

    #[test]
    fn expired_entry_is_refetched() {
        let conn = conn();
        let service = ScheduleService::new(CountingSource::new(march()));
        let t0 = Utc::now();

        service
            .month_schedule_at(&conn, &jakarta(), 2026, 3, t0)
            .unwrap();
        service
            .month_schedule_at(&conn, &jakarta(), 2026, 3, t0 + Duration::hours(7))
            .unwrap();

        assert_eq!(service.source().calls.get(), 2);
    }

    #[test]
    fn different_month_is_a_separate_entry() {
        let conn = conn();
        let service = ScheduleService::new(CountingSource::new(march()));
        let t0 = Utc::now();

        service.month_schedule_at(&conn, &jakarta(), 2026, 3, t0).unwrap();
        service.month_schedule_at(&conn, &jakarta(), 2026, 4, t0).unwrap();

        assert_eq!(service.source().calls.get(), 2);
    }

    #[test]
    fn refresh_bypasses_cache() {
        let conn = conn();
        let service = ScheduleService::new(CountingSource::new(march()));
        service.month_schedule(&conn, &jakarta(), 2026, 3).unwrap();
        service.refresh(&conn, &jakarta(), 2026, 3).unwrap();
        assert_eq!(service.source().calls.get(), 2);
    }

    #[test]
    fn upstream_failure_surfaces_and_is_not_cached() {
        let conn = conn();
        let service = ScheduleService::new(CountingSource::failing());
        let err = service
            .month_schedule(&conn, &jakarta(), 2026, 3)
            .unwrap_err();
        assert!(matches!(err, ScheduleFetchError::Status(503)));

        let key = CacheKey::new(&jakarta(), 2026, 3);
        assert!(CacheRepo::get_month(&conn, key.as_str()).unwrap().is_none());
    }

    #[test]
    fn short_month_is_passed_through() {
        let conn = conn();
        let service = ScheduleService::new(CountingSource::new(march()));
        let schedule = service.month_schedule(&conn, &jakarta(), 2026, 3).unwrap();
        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule.days[0].iso_date, "2026-03-17");
        assert_eq!(schedule.days[1].iso_date, "2026-03-18");
    }

    #[test]
    fn day_lookup_finds_date_in_month() {
        let conn = conn();
        let service = ScheduleService::new(CountingSource::new(march()));
        let date = NaiveDate::from_ymd_opt(2026, 3, 18).unwrap();
        let day = service.day(&conn, &jakarta(), date).unwrap().unwrap();
        assert_eq!(day.hijri_label, "29 Ramadhan 1447");

        let missing = NaiveDate::from_ymd_opt(2026, 3, 20).unwrap();
        assert!(service.day(&conn, &jakarta(), missing).unwrap().is_none());
    }
}
