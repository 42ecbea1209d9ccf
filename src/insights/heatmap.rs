use anyhow::Result;
use chrono::{Duration, NaiveDate};
use std::collections::HashMap;

use crate::config::RamadhanConfig;
use crate::insights::DayLogs;
use crate::models::{FastingStatus, HeatDay, HeatLevel};
use crate::utils::dates;

/// The month being tracked: a start date and a day count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ramadhan {
    pub start: NaiveDate,
    pub days: u32,
}

impl Ramadhan {
    pub fn starting(start: NaiveDate, days: u32) -> Self {
        Self { start, days }
    }

    pub fn from_config(config: &RamadhanConfig) -> Result<Self> {
        Ok(Self::starting(dates::parse_iso(&config.start)?, config.days))
    }

    pub fn end(&self) -> NaiveDate {
        self.start + Duration::days(i64::from(self.days.saturating_sub(1)))
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        (0..self.days)
            .map(|i| self.start + Duration::days(i64::from(i)))
            .collect()
    }

    /// 1-based day number when `today` falls inside the month, else 0.
    pub fn day_of_ramadhan(&self, today: NaiveDate) -> u32 {
        if today < self.start || today > self.end() {
            return 0;
        }
        (today - self.start).num_days() as u32 + 1
    }
}

pub fn level_for(prayers: u32, fasting: bool) -> HeatLevel {
    if prayers >= 5 && fasting {
        HeatLevel::Perfect
    } else if prayers >= 4 {
        HeatLevel::Good
    } else if prayers >= 2 {
        HeatLevel::Mid
    } else if prayers >= 1 {
        HeatLevel::Low
    } else {
        HeatLevel::None
    }
}

/// One cell per day of the month. Days after `today` are flagged and stay at level 0.
pub fn heatmap(month: &Ramadhan, logs: &[DayLogs], today: NaiveDate) -> Vec<HeatDay> {
    let by_date: HashMap<&str, &DayLogs> = logs.iter().map(|d| (d.date.as_str(), d)).collect();

    month
        .dates()
        .into_iter()
        .enumerate()
        .map(|(i, date)| {
            let iso = dates::iso(date);
            let is_future = date > today;
            let (prayers, fasting) = by_date
                .get(iso.as_str())
                .map(|d| (d.fard_done(), d.fasting == FastingStatus::Full))
                .unwrap_or((0, false));
            let level = if is_future {
                HeatLevel::None
            } else {
                level_for(prayers, fasting)
            };
            HeatDay {
                date: iso,
                day: i as u32 + 1,
                level,
                prayers,
                fasting,
                is_future,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PrayerName, PrayerStatus};

    fn d(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, month, day).unwrap()
    }

    fn ramadhan() -> Ramadhan {
        Ramadhan::starting(d(3, 17), 30)
    }

    fn day_with(date: &str, done: usize, fasting: FastingStatus) -> DayLogs {
        let mut day = DayLogs::empty(date);
        day.prayers = PrayerName::FARD
            .iter()
            .take(done)
            .map(|p| (*p, PrayerStatus::OnTime))
            .collect();
        day.fasting = fasting;
        day
    }

    #[test]
    fn month_spans_thirty_days() {
        let month = ramadhan();
        assert_eq!(month.end(), d(4, 15));
        assert_eq!(month.dates().len(), 30);
    }

    #[test]
    fn default_config_is_ramadhan_1447() {
        let month = Ramadhan::from_config(&RamadhanConfig::default()).unwrap();
        assert_eq!(month, ramadhan());
        let bad = RamadhanConfig {
            start: "17-03-2026".to_string(),
            days: 30,
        };
        assert!(Ramadhan::from_config(&bad).is_err());
    }

    #[test]
    fn day_of_ramadhan() {
        let month = ramadhan();
        assert_eq!(month.day_of_ramadhan(d(3, 16)), 0);
        assert_eq!(month.day_of_ramadhan(d(3, 17)), 1);
        assert_eq!(month.day_of_ramadhan(d(4, 15)), 30);
        assert_eq!(month.day_of_ramadhan(d(4, 16)), 0);
    }

    #[test]
    fn levels_follow_prayers_and_fasting() {
        assert_eq!(level_for(5, true), HeatLevel::Perfect);
        assert_eq!(level_for(5, false), HeatLevel::Good);
        assert_eq!(level_for(4, true), HeatLevel::Good);
        assert_eq!(level_for(3, false), HeatLevel::Mid);
        assert_eq!(level_for(1, true), HeatLevel::Low);
        assert_eq!(level_for(0, true), HeatLevel::None);
    }

    #[test]
    fn builds_cells_and_marks_future() {
        let logs = vec![
            day_with("2026-03-17", 5, FastingStatus::Full),
            day_with("2026-03-18", 2, FastingStatus::Partial),
            day_with("2026-03-20", 5, FastingStatus::Full),
        ];
        let cells = heatmap(&ramadhan(), &logs, d(3, 19));
        assert_eq!(cells.len(), 30);
        assert_eq!(cells[0].level, HeatLevel::Perfect);
        assert_eq!(cells[0].day, 1);
        assert_eq!(cells[1].level, HeatLevel::Mid);
        assert!(!cells[1].fasting);
        assert_eq!(cells[2].level, HeatLevel::None);
        assert!(!cells[2].is_future);
        assert!(cells[3].is_future);
        assert_eq!(cells[3].level, HeatLevel::None);
        assert_eq!(cells[3].prayers, 5);
    }
}
