pub mod logs;
pub mod prayer;
pub mod quran;
pub mod stats;
pub mod timings;

pub use logs::{CharityLog, DailyLog, FastingStatus, QuranLog};
pub use prayer::{PrayerLog, PrayerName, PrayerStatus};
pub use quran::{Ayah, Surah, SurahDetail, SURAH_COUNT};
pub use stats::{DailySummary, HabitStreak, HeatDay, HeatLevel, Streak};
pub use timings::{CacheKey, Coordinates, DailyTimings, Moment, MonthSchedule, NextPrayer, Times};
