use anyhow::{anyhow, Result};
use chrono::{Datelike, NaiveDate, Weekday};

const MONTHS_ID: [&str; 12] = [
    "Januari", "Februari", "Maret", "April", "Mei", "Juni", "Juli", "Agustus", "September",
    "Oktober", "November", "Desember",
];

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Senin",
        Weekday::Tue => "Selasa",
        Weekday::Wed => "Rabu",
        Weekday::Thu => "Kamis",
        Weekday::Fri => "Jumat",
        Weekday::Sat => "Sabtu",
        Weekday::Sun => "Minggu",
    }
}

pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| MONTHS_ID.get(i as usize))
        .copied()
        .unwrap_or("")
}

/// "Selasa, 17 Maret 2026"
pub fn readable_date(date: NaiveDate) -> String {
    format!(
        "{}, {} {} {}",
        weekday_name(date.weekday()),
        date.day(),
        month_name(date.month()),
        date.year()
    )
}

/// "17-03-2026" (day-month-year) → 2026-03-17
fn parse_dmy(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%d-%m-%Y").map_err(|e| anyhow!("Bad date '{}': {}", s, e))
}

/// "17-03-2026" → "2026-03-17"
pub fn dmy_to_iso(s: &str) -> Result<String> {
    Ok(parse_dmy(s)?.format("%Y-%m-%d").to_string())
}

pub fn parse_iso(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|e| anyhow!("Bad date '{}': {}", s, e))
}

pub fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
