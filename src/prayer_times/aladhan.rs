//! Adapter for the Aladhan monthly calendar endpoint.
//!
//! The transport returns raw upstream days; `normalize_day` turns each one
//! into a `DailyTimings` with ISO dates, bare "HH:MM" times and local labels.

use chrono::Datelike;
use log::{debug, warn};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::collections::HashMap;

use crate::error::ScheduleFetchError;
use crate::models::{Coordinates, DailyTimings, Moment, Times};
use crate::utils::{dates, hijri};

pub const BASE_URL: &str = "https://api.aladhan.com/v1";

/// Moonsighting Committee Worldwide.
pub const CALC_METHOD: u8 = 11;

/// Asr by shadow factor 2.
pub const SCHOOL: u8 = 1;

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarResponse {
    pub data: Vec<CalendarDay>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarDay {
    pub timings: HashMap<String, String>,
    pub date: CalendarDate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarDate {
    pub gregorian: GregorianDate,
    pub hijri: HijriDate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GregorianDate {
    /// DD-MM-YYYY
    pub date: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HijriDate {
    pub day: String,
    pub month: HijriMonth,
    pub year: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HijriMonth {
    pub en: String,
}

/// Source of raw monthly calendar data.
pub trait CalendarSource {
    fn fetch_month(
        &self,
        coords: &Coordinates,
        year: i32,
        month: u32,
    ) -> Result<Vec<CalendarDay>, ScheduleFetchError>;
}

pub struct AladhanClient {
    client: Client,
    base_url: String,
}

impl AladhanClient {
    pub fn new() -> Result<Self, ScheduleFetchError> {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, ScheduleFetchError> {
        let client = Client::builder()
            .user_agent(concat!("imsakiyah/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl CalendarSource for AladhanClient {
    fn fetch_month(
        &self,
        coords: &Coordinates,
        year: i32,
        month: u32,
    ) -> Result<Vec<CalendarDay>, ScheduleFetchError> {
        let url = format!("{}/calendar/{}/{}", self.base_url, year, month);
        debug!("GET {} ({}, {})", url, coords.latitude, coords.longitude);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", coords.latitude.to_string()),
                ("longitude", coords.longitude.to_string()),
                ("method", CALC_METHOD.to_string()),
                ("school", SCHOOL.to_string()),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScheduleFetchError::Status(status.as_u16()));
        }

        let body: CalendarResponse = response
            .json()
            .map_err(|e| ScheduleFetchError::Decode(e.to_string()))?;
        Ok(body.data)
    }
}

/// "04:30 (WIB)" → "04:30". Strings without a suffix come back trimmed.
pub fn strip_zone(time: &str) -> String {
    match (time.find('('), time.rfind(')')) {
        (Some(open), Some(close)) if close > open => {
            format!("{}{}", &time[..open], &time[close + 1..]).trim().to_string()
        }
        _ => time.trim().to_string(),
    }
}

fn timing(day: &CalendarDay, moment: Moment) -> Result<String, ScheduleFetchError> {
    day.timings
        .get(moment.key())
        .map(|t| strip_zone(t))
        .ok_or_else(|| ScheduleFetchError::Decode(format!("missing {} timing", moment.key())))
}

/// Normalise one upstream day.
pub fn normalize_day(day: &CalendarDay) -> Result<DailyTimings, ScheduleFetchError> {
    let iso_date = dates::dmy_to_iso(&day.date.gregorian.date)
        .map_err(|e| ScheduleFetchError::Decode(e.to_string()))?;
    let date = dates::parse_iso(&iso_date).map_err(|e| ScheduleFetchError::Decode(e.to_string()))?;

    let h = &day.date.hijri;
    let times = Times {
        imsak: timing(day, Moment::Imsak)?,
        fajr: timing(day, Moment::Fajr)?,
        sunrise: timing(day, Moment::Sunrise)?,
        dhuhr: timing(day, Moment::Dhuhr)?,
        asr: timing(day, Moment::Asr)?,
        maghrib: timing(day, Moment::Maghrib)?,
        isha: timing(day, Moment::Isha)?,
    };
    if !times.is_monotonic() {
        warn!("timings for {} are out of order", day.date.gregorian.date);
    }

    Ok(DailyTimings {
        iso_date,
        hijri_label: hijri::hijri_label(&h.day, &h.month.en, &h.year),
        readable_date: dates::readable_date(date),
        weekday: dates::weekday_name(date.weekday()).to_string(),
        times,
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Builds an upstream day the way the calendar service shapes it.
    pub fn day(dmy: &str, hijri_day: &str, hijri_month: &str) -> CalendarDay {
        let json = serde_json::json!({
            "timings": {
                "Fajr": "04:40 (WIB)",
                "Sunrise": "05:55 (WIB)",
                "Dhuhr": "12:00 (WIB)",
                "Asr": "15:20 (WIB)",
                "Sunset": "18:02 (WIB)",
                "Maghrib": "18:05 (WIB)",
                "Isha": "19:20 (WIB)",
                "Imsak": "04:30 (WIB)",
                "Midnight": "00:01 (WIB)"
            },
            "date": {
                "readable": "17 Mar 2026",
                "gregorian": { "date": dmy, "format": "DD-MM-YYYY" },
                "hijri": {
                    "day": hijri_day,
                    "month": { "number": 9, "en": hijri_month, "ar": "رَمَضان" },
                    "year": "1447"
                }
            },
            "meta": { "method": { "id": 11 } }
        });
        serde_json::from_value(json).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_timezone_suffix() {
        assert_eq!(strip_zone("04:30 (WIB)"), "04:30");
        assert_eq!(strip_zone("04:30"), "04:30");
        assert_eq!(strip_zone("18:05 (+07)"), "18:05");
        assert_eq!(strip_zone(" 12:00 "), "12:00");
    }

    #[test]
    fn normalizes_upstream_day() {
        let day = fixtures::day("17-03-2026", "28", "Ramadan");
        let timings = normalize_day(&day).unwrap();
        assert_eq!(timings.iso_date, "2026-03-17");
        assert_eq!(timings.hijri_label, "28 Ramadhan 1447");
        assert_eq!(timings.readable_date, "Selasa, 17 Maret 2026");
        assert_eq!(timings.weekday, "Selasa");
        assert_eq!(timings.times.imsak, "04:30");
        assert_eq!(timings.times.isha, "19:20");
        assert!(timings.times.is_monotonic());
    }

    #[test]
    fn unknown_hijri_month_is_kept_verbatim() {
        let day = fixtures::day("17-03-2026", "28", "Ramaḍān al-Mubārak");
        let timings = normalize_day(&day).unwrap();
        assert_eq!(timings.hijri_label, "28 Ramaḍān al-Mubārak 1447");
    }

    #[test]
    fn missing_timing_is_a_decode_error() {
        let mut day = fixtures::day("17-03-2026", "28", "Ramadan");
        day.timings.remove("Imsak");
        assert!(matches!(normalize_day(&day), Err(ScheduleFetchError::Decode(_))));
    }

    #[test]
    fn bad_gregorian_date_is_a_decode_error() {
        let day = fixtures::day("2026-03-17", "28", "Ramadan");
        assert!(matches!(normalize_day(&day), Err(ScheduleFetchError::Decode(_))));
    }

    #[test]
    fn decodes_calendar_envelope() {
        let json = serde_json::json!({
            "code": 200,
            "status": "OK",
            "data": []
        });
        let body: CalendarResponse = serde_json::from_value(json).unwrap();
        assert!(body.data.is_empty());
    }
}
