use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FastingStatus {
    Full,
    Partial,
    Skip,
    Unset,
}

impl FastingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FastingStatus::Full => "full",
            FastingStatus::Partial => "partial",
            FastingStatus::Skip => "skip",
            FastingStatus::Unset => "unset",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FastingStatus::Full => "Puasa Penuh",
            FastingStatus::Partial => "Batal / Sebagian",
            FastingStatus::Skip => "Tidak Berpuasa",
            FastingStatus::Unset => "Belum diisi",
        }
    }
}

impl FromStr for FastingStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(FastingStatus::Full),
            "partial" => Ok(FastingStatus::Partial),
            "skip" | "skipped" => Ok(FastingStatus::Skip),
            "unset" | "none" => Ok(FastingStatus::Unset),
            _ => Err(anyhow::anyhow!("Unknown fasting status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyLog {
    pub date: String,
    pub fasting_status: FastingStatus,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuranLog {
    pub date: String,
    pub pages_read: u32,
    /// Free-text position marker, e.g. "Al-Baqarah 142"
    pub last_position: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharityLog {
    pub id: Option<i64>,
    pub date: String,
    pub amount: i64,
    pub channel: String,
    pub note: Option<String>,
}
