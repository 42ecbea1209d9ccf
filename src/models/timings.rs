use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// A resolved position. Held in memory for the session; never persisted
/// unless the user saves it into the config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
    pub label: String,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64, label: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            label: label.into(),
        }
    }
}

/// Named moments of a day's schedule, in chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Moment {
    Imsak,
    Fajr,
    Sunrise,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl Moment {
    pub const ALL: [Moment; 7] = [
        Moment::Imsak,
        Moment::Fajr,
        Moment::Sunrise,
        Moment::Dhuhr,
        Moment::Asr,
        Moment::Maghrib,
        Moment::Isha,
    ];

    /// Moments considered for the next-prayer countdown. Sunrise is not one.
    pub const COUNTDOWN: [Moment; 6] = [
        Moment::Imsak,
        Moment::Fajr,
        Moment::Dhuhr,
        Moment::Asr,
        Moment::Maghrib,
        Moment::Isha,
    ];

    /// Key used by the upstream calendar service.
    pub fn key(&self) -> &'static str {
        match self {
            Moment::Imsak => "Imsak",
            Moment::Fajr => "Fajr",
            Moment::Sunrise => "Sunrise",
            Moment::Dhuhr => "Dhuhr",
            Moment::Asr => "Asr",
            Moment::Maghrib => "Maghrib",
            Moment::Isha => "Isha",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Moment::Imsak => "Imsak",
            Moment::Fajr => "Subuh",
            Moment::Sunrise => "Terbit",
            Moment::Dhuhr => "Dzuhur",
            Moment::Asr => "Ashar",
            Moment::Maghrib => "Maghrib (Iftar)",
            Moment::Isha => "Isya'",
        }
    }
}

impl std::fmt::Display for Moment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Bare "HH:MM" strings for each moment of one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Times {
    pub imsak: String,
    pub fajr: String,
    pub sunrise: String,
    pub dhuhr: String,
    pub asr: String,
    pub maghrib: String,
    pub isha: String,
}

impl Times {
    pub fn get(&self, moment: Moment) -> &str {
        match moment {
            Moment::Imsak => &self.imsak,
            Moment::Fajr => &self.fajr,
            Moment::Sunrise => &self.sunrise,
            Moment::Dhuhr => &self.dhuhr,
            Moment::Asr => &self.asr,
            Moment::Maghrib => &self.maghrib,
            Moment::Isha => &self.isha,
        }
    }

    pub fn parsed(&self, moment: Moment) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(self.get(moment), "%H:%M").ok()
    }

    /// (moment, "HH:MM") pairs in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = (Moment, &str)> + '_ {
        Moment::ALL.iter().map(move |m| (*m, self.get(*m)))
    }

    /// Imsak <= Fajr <= Sunrise <= Dhuhr <= Asr <= Maghrib <= Isha.
    /// False when any moment fails to parse.
    pub fn is_monotonic(&self) -> bool {
        let parsed: Option<Vec<NaiveTime>> = Moment::ALL.iter().map(|m| self.parsed(*m)).collect();
        match parsed {
            Some(times) => times.windows(2).all(|w| w[0] <= w[1]),
            None => false,
        }
    }
}

/// One calendar day's schedule, already normalised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTimings {
    /// YYYY-MM-DD
    pub iso_date: String,
    /// e.g. "1 Ramadhan 1447"
    pub hijri_label: String,
    /// e.g. "Selasa, 17 Maret 2026"
    pub readable_date: String,
    pub weekday: String,
    pub times: Times,
}

/// One month of daily schedules in upstream (chronological) order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MonthSchedule {
    pub days: Vec<DailyTimings>,
}

impl MonthSchedule {
    pub fn new(days: Vec<DailyTimings>) -> Self {
        Self { days }
    }

    pub fn day(&self, iso_date: &str) -> Option<&DailyTimings> {
        self.days.iter().find(|d| d.iso_date == iso_date)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Cache identity for a month schedule. Coordinates are rounded so tiny
/// GPS jitter maps to the same entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(coords: &Coordinates, year: i32, month: u32) -> Self {
        CacheKey(format!(
            "{:.4},{:.4}:{:04}-{:02}",
            coords.latitude, coords.longitude, year, month
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Derived on demand from one day's times and a reference instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextPrayer {
    pub moment: Moment,
    pub label: String,
    /// "HH:MM"
    pub time: String,
    pub minutes_remaining: i64,
    /// Set for the after-Isha sentinel, which reuses today's Imsak.
    pub is_next_day: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_times() -> Times {
        Times {
            imsak: "04:30".to_string(),
            fajr: "04:40".to_string(),
            sunrise: "05:55".to_string(),
            dhuhr: "12:00".to_string(),
            asr: "15:20".to_string(),
            maghrib: "18:05".to_string(),
            isha: "19:20".to_string(),
        }
    }

    #[test]
    fn sample_day_is_monotonic() {
        assert!(sample_times().is_monotonic());
    }

    #[test]
    fn out_of_order_day_is_not_monotonic() {
        let mut times = sample_times();
        times.asr = "11:00".to_string();
        assert!(!times.is_monotonic());
    }

    #[test]
    fn unparsable_time_is_not_monotonic() {
        let mut times = sample_times();
        times.fajr = "04:40 (WIB)".to_string();
        assert!(!times.is_monotonic());
    }

    #[test]
    fn iter_follows_fixed_order() {
        let order: Vec<Moment> = sample_times().iter().map(|(m, _)| m).collect();
        assert_eq!(order, Moment::ALL.to_vec());
    }

    #[test]
    fn countdown_excludes_sunrise() {
        assert!(!Moment::COUNTDOWN.contains(&Moment::Sunrise));
        assert_eq!(Moment::COUNTDOWN.len(), 6);
    }

    #[test]
    fn cache_key_rounds_coordinates() {
        let a = Coordinates::new(-6.208_81, 106.845_62, "a");
        let b = Coordinates::new(-6.208_84, 106.845_58, "b");
        assert_eq!(CacheKey::new(&a, 2026, 3), CacheKey::new(&b, 2026, 3));
        assert_ne!(CacheKey::new(&a, 2026, 3), CacheKey::new(&a, 2026, 4));
        assert_eq!(CacheKey::new(&a, 2026, 3).as_str(), "-6.2088,106.8456:2026-03");
    }
}
