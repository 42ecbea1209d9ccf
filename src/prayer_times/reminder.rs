use chrono::NaiveDateTime;

use crate::config::settings::NotificationConfig;
use crate::models::{Moment, Times};

/// An enabled Imsak or Iftar moment that is close enough to announce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub moment: Moment,
    pub time: String,
    pub minutes_remaining: i64,
}

impl Reminder {
    pub fn message(&self) -> String {
        let what = match self.moment {
            Moment::Maghrib => "Waktu berbuka",
            _ => "Imsak",
        };
        if self.minutes_remaining <= 0 {
            format!("{} sekarang ({})", what, self.time)
        } else {
            format!("{} dalam {} menit ({})", what, self.minutes_remaining, self.time)
        }
    }
}

pub fn upcoming_reminder(
    times: &Times,
    now: NaiveDateTime,
    config: &NotificationConfig,
) -> Option<Reminder> {
    if !config.enabled {
        return None;
    }

    let watched = [(Moment::Imsak, config.imsak), (Moment::Maghrib, config.iftar)];
    watched
        .into_iter()
        .filter(|(_, on)| *on)
        .find_map(|(moment, _)| {
            let at = now.date().and_time(times.parsed(moment)?);
            let remaining = (at - now).num_minutes();
            (at > now && remaining <= config.reminder_minutes).then(|| Reminder {
                moment,
                time: times.get(moment).to_string(),
                minutes_remaining: remaining,
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn times() -> Times {
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

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 17)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn enabled() -> NotificationConfig {
        NotificationConfig {
            enabled: true,
            ..NotificationConfig::default()
        }
    }

    #[test]
    fn disabled_never_reminds() {
        let config = NotificationConfig::default();
        assert_eq!(upcoming_reminder(&times(), at(4, 25), &config), None);
    }

    #[test]
    fn imsak_inside_window() {
        let r = upcoming_reminder(&times(), at(4, 25), &enabled()).unwrap();
        assert_eq!(r.moment, Moment::Imsak);
        assert_eq!(r.minutes_remaining, 5);
        assert_eq!(r.message(), "Imsak dalam 5 menit (04:30)");
    }

    #[test]
    fn iftar_respects_its_toggle() {
        assert_eq!(
            upcoming_reminder(&times(), at(17, 55), &enabled()).map(|r| r.moment),
            Some(Moment::Maghrib)
        );
        let config = NotificationConfig {
            iftar: false,
            ..enabled()
        };
        assert_eq!(upcoming_reminder(&times(), at(17, 55), &config), None);
    }

    #[test]
    fn outside_window_or_past() {
        assert_eq!(upcoming_reminder(&times(), at(17, 0), &enabled()), None);
        assert_eq!(upcoming_reminder(&times(), at(18, 6), &enabled()), None);
    }
}
