use std::fmt;

use chrono::Weekday;
use serde::{Deserialize, Deserializer, Serializer};

/// Displayed column order of the week.
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// A time of day as minutes since 00:00, always in `0..=1439`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self(hour * 60 + minute))
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Parses strict `HH:MM`. Anything else, including `9:30` or `09:30:00`, is rejected.
pub fn parse_time(text: &str) -> Option<TimeOfDay> {
    let bytes = text.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return None;
    }

    let digit = |b: u8| b.is_ascii_digit().then(|| u16::from(b - b'0'));
    let hour = digit(bytes[0])? * 10 + digit(bytes[1])?;
    let minute = digit(bytes[3])? * 10 + digit(bytes[4])?;

    TimeOfDay::from_hm(hour, minute)
}

/// Parses one of the seven short day codes (`Mon` .. `Sun`), exact match.
pub fn parse_day(text: &str) -> Option<Weekday> {
    WEEK.into_iter().find(|day| day_code(*day) == text)
}

pub fn day_code(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

// Stored blobs keep absent values as "" and anything unreadable is treated as absent,
// so one bad field never costs the whole list.

pub(crate) fn serialize_day<S: Serializer>(
    day: &Option<Weekday>,
    s: S,
) -> Result<S::Ok, S::Error> {
    s.serialize_str(day.map(day_code).unwrap_or(""))
}

pub(crate) fn deserialize_day<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<Weekday>, D::Error> {
    let raw = Option::<String>::deserialize(d)?;
    Ok(raw.as_deref().and_then(|s| parse_day(s.trim())))
}

pub(crate) fn serialize_time<S: Serializer>(
    time: &Option<TimeOfDay>,
    s: S,
) -> Result<S::Ok, S::Error> {
    match time {
        Some(t) => s.collect_str(t),
        None => s.serialize_str(""),
    }
}

pub(crate) fn deserialize_time<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<TimeOfDay>, D::Error> {
    let raw = Option::<String>::deserialize(d)?;
    Ok(raw.as_deref().and_then(|s| parse_time(s.trim())))
}
