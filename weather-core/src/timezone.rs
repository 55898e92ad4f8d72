//! City-local and reference-zone (IST) time projections.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use chrono_tz::Asia::Kolkata;

/// Country whose cities don't get the alternate-time toggle.
pub const REFERENCE_COUNTRY: &str = "IN";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeInfo {
    /// 24-hour "HH:MM".
    pub time_of_day: String,
    /// ISO "YYYY-MM-DD".
    pub date: String,
    /// Full weekday name, e.g. "Monday".
    pub day_name: String,
}

impl TimeInfo {
    fn from_naive(dt: NaiveDateTime) -> Self {
        Self {
            time_of_day: dt.format("%H:%M").to_string(),
            date: dt.format("%Y-%m-%d").to_string(),
            day_name: dt.format("%A").to_string(),
        }
    }
}

/// `now` shifted by the provider's UTC offset.
pub fn local_time(utc_offset_secs: i32, now: DateTime<Utc>) -> TimeInfo {
    let shifted = now.naive_utc() + Duration::seconds(i64::from(utc_offset_secs));
    TimeInfo::from_naive(shifted)
}

/// `now` in Asia/Kolkata, independent of any city.
pub fn alternate_time(now: DateTime<Utc>) -> TimeInfo {
    TimeInfo::from_naive(now.with_timezone(&Kolkata).naive_local())
}

/// Whether the alternate-time toggle is offered for a city in `country`.
pub fn offers_alternate(country: &str) -> bool {
    !country.is_empty() && !country.eq_ignore_ascii_case(REFERENCE_COUNTRY)
}

/// Which projection is currently on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeZoneView {
    showing_alternate: bool,
}

impl TimeZoneView {
    pub fn showing_alternate(&self) -> bool {
        self.showing_alternate
    }

    pub fn toggle(&mut self) {
        self.showing_alternate = !self.showing_alternate;
    }

    pub fn reset(&mut self) {
        self.showing_alternate = false;
    }

    /// Projection for a city with the given offset and country. Cities in the
    /// reference country always show local time.
    pub fn project(&self, utc_offset_secs: i32, country: &str, now: DateTime<Utc>) -> TimeInfo {
        if self.showing_alternate && offers_alternate(country) {
            alternate_time(now)
        } else {
            local_time(utc_offset_secs, now)
        }
    }
}
