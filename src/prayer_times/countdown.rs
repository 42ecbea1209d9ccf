use chrono::{Duration, NaiveDateTime};

use crate::models::{Moment, NextPrayer, Times};

pub const NEXT_DAY_IMSAK_LABEL: &str = "Imsak Besok";

/// Seconds between countdown re-evaluations.
pub const TICK_SECS: i64 = 60;

/// First countdown moment strictly after `reference` on the reference date.
///
/// After Isha there is nothing left today; the result is then an Imsak
/// sentinel that reuses today's Imsak time with zero minutes remaining.
/// It does not look at tomorrow's schedule.
pub fn next_prayer(times: &Times, reference: NaiveDateTime) -> NextPrayer {
    let date = reference.date();

    for moment in Moment::COUNTDOWN {
        let Some(at) = times.parsed(moment) else {
            continue;
        };
        let instant = date.and_time(at);
        if instant > reference {
            return NextPrayer {
                moment,
                label: moment.label().to_string(),
                time: times.get(moment).to_string(),
                minutes_remaining: (instant - reference).num_minutes(),
                is_next_day: false,
            };
        }
    }

    NextPrayer {
        moment: Moment::Imsak,
        label: NEXT_DAY_IMSAK_LABEL.to_string(),
        time: times.imsak.clone(),
        minutes_remaining: 0,
        is_next_day: true,
    }
}

/// Gate for periodic re-evaluation. Holds only the last evaluation instant;
/// dropping it is the cancellation.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    last: Option<NaiveDateTime>,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn every_minute() -> Self {
        Self::new(Duration::seconds(TICK_SECS))
    }

    /// True (and re-armed) once the interval has elapsed since the last
    /// evaluation. A clock that went backwards also counts as due.
    pub fn due(&mut self, now: NaiveDateTime) -> bool {
        let due = match self.last {
            None => true,
            Some(last) => now < last || now - last >= self.interval,
        };
        if due {
            self.last = Some(now);
        }
        due
    }

    /// Force the next `due` call to fire, e.g. after the day's timings changed.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
