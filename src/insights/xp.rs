use crate::insights::DayLogs;
use crate::models::{FastingStatus, PrayerName, PrayerStatus};

/// Anything that earns XP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Prayer(PrayerName),
    FastingFull,
    FastingPartial,
    QuranPage,
    Charity,
    Journal,
    Other,
}

impl Activity {
    pub fn xp(&self) -> u32 {
        match self {
            Activity::Prayer(PrayerName::Fajr) => 30,
            Activity::Prayer(PrayerName::Dhuhr)
            | Activity::Prayer(PrayerName::Asr)
            | Activity::Prayer(PrayerName::Maghrib)
            | Activity::Prayer(PrayerName::Isha) => 20,
            Activity::Prayer(PrayerName::Tarawih) => 25,
            Activity::Prayer(PrayerName::Witir) => 15,
            Activity::Prayer(PrayerName::Dhuha) => 20,
            Activity::Prayer(PrayerName::Qiyam) => 35,
            Activity::FastingFull => 50,
            Activity::FastingPartial => 20,
            Activity::QuranPage => 5,
            Activity::Charity => 30,
            Activity::Journal => 15,
            Activity::Other => 10,
        }
    }

    /// Lookup by activity key ("fajr", "fasting_full", "quran_page", ...).
    /// Unknown keys score as `Other`.
    pub fn from_key(key: &str) -> Self {
        match key {
            "fasting_full" => Activity::FastingFull,
            "fasting_partial" => Activity::FastingPartial,
            "quran_page" => Activity::QuranPage,
            "charity" => Activity::Charity,
            "journal" => Activity::Journal,
            other => other
                .parse::<PrayerName>()
                .map(Activity::Prayer)
                .unwrap_or(Activity::Other),
        }
    }
}

pub fn xp_for(key: &str) -> u32 {
    Activity::from_key(key).xp()
}

/// XP for a prayer in a given status: full for on time, half (rounded down)
/// for qadha, nothing otherwise.
pub fn prayer_xp(prayer: PrayerName, status: PrayerStatus) -> u32 {
    let weight = Activity::Prayer(prayer).xp();
    match status {
        PrayerStatus::OnTime => weight,
        PrayerStatus::Qadha => weight / 2,
        PrayerStatus::Skipped | PrayerStatus::Unset => 0,
    }
}

pub fn fasting_xp(status: FastingStatus) -> u32 {
    match status {
        FastingStatus::Full => Activity::FastingFull.xp(),
        FastingStatus::Partial => Activity::FastingPartial.xp(),
        FastingStatus::Skip | FastingStatus::Unset => 0,
    }
}

/// The one scoring rule used by every view.
pub fn compute_xp(day: &DayLogs) -> u32 {
    let prayers: u32 = day
        .prayers
        .iter()
        .map(|(name, status)| prayer_xp(*name, *status))
        .sum();
    let charity = if day.charity_amount > 0 {
        Activity::Charity.xp()
    } else {
        0
    };
    // Page counts are user input and unbounded, so the sum saturates.
    prayers
        .saturating_add(fasting_xp(day.fasting))
        .saturating_add(day.pages_read.saturating_mul(Activity::QuranPage.xp()))
        .saturating_add(charity)
}

pub fn total_xp<'a>(days: impl IntoIterator<Item = &'a DayLogs>) -> u32 {
    days.into_iter()
        .map(compute_xp)
        .fold(0, u32::saturating_add)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> DayLogs {
        DayLogs::empty("2026-03-17")
    }

    #[test]
    fn empty_day_is_zero() {
        assert_eq!(compute_xp(&day()), 0);
    }

    #[test]
    fn qadha_earns_half_rounded_down() {
        assert_eq!(prayer_xp(PrayerName::Fajr, PrayerStatus::Qadha), 15);
        assert_eq!(prayer_xp(PrayerName::Witir, PrayerStatus::Qadha), 7);
        assert_eq!(prayer_xp(PrayerName::Asr, PrayerStatus::Skipped), 0);
    }

    #[test]
    fn full_day_adds_every_activity() {
        let mut d = day();
        d.prayers = vec![
            (PrayerName::Fajr, PrayerStatus::OnTime),
            (PrayerName::Dhuhr, PrayerStatus::OnTime),
            (PrayerName::Asr, PrayerStatus::Qadha),
            (PrayerName::Maghrib, PrayerStatus::OnTime),
            (PrayerName::Isha, PrayerStatus::Skipped),
            (PrayerName::Tarawih, PrayerStatus::OnTime),
        ];
        d.fasting = FastingStatus::Full;
        d.pages_read = 4;
        d.charity_amount = 10_000;
        // 30 + 20 + 10 + 20 + 0 + 25 = 105 prayers, 50 fasting, 20 pages, 30 charity
        assert_eq!(compute_xp(&d), 205);
    }

    #[test]
    fn partial_fast_and_totals() {
        let mut a = day();
        a.fasting = FastingStatus::Partial;
        let mut b = DayLogs::empty("2026-03-18");
        b.pages_read = 2;
        assert_eq!(total_xp([&a, &b]), 30);
    }

    #[test]
    fn huge_page_counts_saturate() {
        let mut a = day();
        a.pages_read = 1_000_000_000;
        a.fasting = FastingStatus::Full;
        assert_eq!(compute_xp(&a), u32::MAX);

        let b = a.clone();
        assert_eq!(total_xp([&a, &b]), u32::MAX);
    }

    #[test]
    fn lookup_by_key() {
        assert_eq!(xp_for("fajr"), 30);
        assert_eq!(xp_for("qiyam"), 35);
        assert_eq!(xp_for("fasting_partial"), 20);
        assert_eq!(xp_for("journal"), 15);
        assert_eq!(xp_for("sedekah_subuh"), 10);
    }
}
