use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Prayers that can be logged in the tracker. The first five are fard,
/// the rest are the sunnah prayers tracked during Ramadhan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrayerName {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
    Tarawih,
    Witir,
    Dhuha,
    Qiyam,
}

impl PrayerName {
    pub const FARD: [PrayerName; 5] = [
        PrayerName::Fajr,
        PrayerName::Dhuhr,
        PrayerName::Asr,
        PrayerName::Maghrib,
        PrayerName::Isha,
    ];

    pub const SUNNAH: [PrayerName; 4] = [
        PrayerName::Tarawih,
        PrayerName::Witir,
        PrayerName::Dhuha,
        PrayerName::Qiyam,
    ];

    pub fn all() -> Vec<PrayerName> {
        Self::FARD.iter().chain(Self::SUNNAH.iter()).copied().collect()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "fajr",
            PrayerName::Dhuhr => "dhuhr",
            PrayerName::Asr => "asr",
            PrayerName::Maghrib => "maghrib",
            PrayerName::Isha => "isha",
            PrayerName::Tarawih => "tarawih",
            PrayerName::Witir => "witir",
            PrayerName::Dhuha => "dhuha",
            PrayerName::Qiyam => "qiyam",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "Subuh",
            PrayerName::Dhuhr => "Dzuhur",
            PrayerName::Asr => "Ashar",
            PrayerName::Maghrib => "Maghrib",
            PrayerName::Isha => "Isya'",
            PrayerName::Tarawih => "Tarawih",
            PrayerName::Witir => "Witir",
            PrayerName::Dhuha => "Dhuha",
            PrayerName::Qiyam => "Qiyamul Lail",
        }
    }

    pub fn is_fard(&self) -> bool {
        Self::FARD.contains(self)
    }
}

impl std::fmt::Display for PrayerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for PrayerName {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fajr" | "subuh" => Ok(PrayerName::Fajr),
            "dhuhr" | "zuhr" | "dzuhur" => Ok(PrayerName::Dhuhr),
            "asr" | "ashar" => Ok(PrayerName::Asr),
            "maghrib" => Ok(PrayerName::Maghrib),
            "isha" | "isya" => Ok(PrayerName::Isha),
            "tarawih" => Ok(PrayerName::Tarawih),
            "witir" | "witr" => Ok(PrayerName::Witir),
            "dhuha" => Ok(PrayerName::Dhuha),
            "qiyam" => Ok(PrayerName::Qiyam),
            _ => Err(anyhow::anyhow!("Unknown prayer: {}", s)),
        }
    }
}

/// How a prayer was performed. `Unset` is never stored; it means no row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrayerStatus {
    OnTime,
    Qadha,
    Skipped,
    Unset,
}

impl PrayerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrayerStatus::OnTime => "ontime",
            PrayerStatus::Qadha => "qadha",
            PrayerStatus::Skipped => "skipped",
            PrayerStatus::Unset => "unset",
        }
    }

    /// On time or made up late both count as performed.
    pub fn is_done(&self) -> bool {
        matches!(self, PrayerStatus::OnTime | PrayerStatus::Qadha)
    }
}

impl FromStr for PrayerStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ontime" => Ok(PrayerStatus::OnTime),
            "qadha" => Ok(PrayerStatus::Qadha),
            "skipped" => Ok(PrayerStatus::Skipped),
            "unset" => Ok(PrayerStatus::Unset),
            _ => Err(anyhow::anyhow!("Unknown prayer status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrayerLog {
    pub id: Option<i64>,
    pub date: String,
    pub prayer_name: PrayerName,
    pub status: PrayerStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_local_and_english_names() {
        assert_eq!(PrayerName::from_str("Subuh").unwrap(), PrayerName::Fajr);
        assert_eq!(PrayerName::from_str("zuhr").unwrap(), PrayerName::Dhuhr);
        assert_eq!(PrayerName::from_str("ISYA").unwrap(), PrayerName::Isha);
        assert!(PrayerName::from_str("sunrise").is_err());
    }

    #[test]
    fn fard_and_sunnah_partition_all() {
        let all = PrayerName::all();
        assert_eq!(all.len(), 9);
        assert_eq!(all.iter().filter(|p| p.is_fard()).count(), 5);
    }

    #[test]
    fn qadha_counts_as_done() {
        assert!(PrayerStatus::OnTime.is_done());
        assert!(PrayerStatus::Qadha.is_done());
        assert!(!PrayerStatus::Skipped.is_done());
        assert!(!PrayerStatus::Unset.is_done());
    }
}
