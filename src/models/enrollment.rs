use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use super::time::{self, TimeOfDay, parse_day, parse_time};

/// A stored enrollment: who, plus an optional weekly class block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub major: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub course_code: String,
    #[serde(default)]
    pub course_name: String,
    #[serde(
        default,
        serialize_with = "time::serialize_day",
        deserialize_with = "time::deserialize_day"
    )]
    pub day: Option<Weekday>,
    #[serde(
        default,
        serialize_with = "time::serialize_time",
        deserialize_with = "time::deserialize_time"
    )]
    pub start: Option<TimeOfDay>,
    #[serde(
        default,
        serialize_with = "time::serialize_time",
        deserialize_with = "time::deserialize_time"
    )]
    pub end: Option<TimeOfDay>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

/// Raw form input for a new or edited enrollment. Every field is text as typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EnrollmentDraft {
    pub name: String,
    pub email: String,
    pub major: String,
    pub year: String,
    pub notes: String,
    pub course_code: String,
    pub course_name: String,
    pub day: String,
    pub start: String,
    pub end: String,
    pub location: String,
}

/// A fully resolved weekly time block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub day: Weekday,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl Slot {
    /// A block exists only when it ends after it starts.
    pub fn new(day: Weekday, start: TimeOfDay, end: TimeOfDay) -> Option<Self> {
        (start < end).then_some(Self { day, start, end })
    }

    /// Half-open overlap: blocks that merely touch do not overlap.
    pub fn overlaps(&self, other: &Slot) -> bool {
        self.day == other.day && self.start < other.end && self.end > other.start
    }
}

/// Anything that may carry a weekly time block.
pub trait Scheduled {
    fn slot(&self) -> Option<Slot>;
}

impl Scheduled for Enrollment {
    fn slot(&self) -> Option<Slot> {
        Slot::new(self.day?, self.start?, self.end?)
    }
}

impl Scheduled for EnrollmentDraft {
    fn slot(&self) -> Option<Slot> {
        Slot::new(
            parse_day(self.day.trim())?,
            parse_time(self.start.trim())?,
            parse_time(self.end.trim())?,
        )
    }
}

impl Scheduled for Slot {
    fn slot(&self) -> Option<Slot> {
        Slot::new(self.day, self.start, self.end)
    }
}

impl Enrollment {
    /// Builds a record from a draft that already passed validation.
    pub fn from_draft(id: String, draft: &EnrollmentDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name.trim().to_string(),
            email: draft.email.trim().to_string(),
            major: draft.major.trim().to_string(),
            year: draft.year.trim().to_string(),
            notes: draft.notes.trim().to_string(),
            course_code: draft.course_code.trim().to_string(),
            course_name: draft.course_name.trim().to_string(),
            day: parse_day(draft.day.trim()),
            start: parse_time(draft.start.trim()),
            end: parse_time(draft.end.trim()),
            location: draft.location.trim().to_string(),
            created_at,
        }
    }

    /// Short label for messages: course code, else course name, else the person.
    pub fn label(&self) -> &str {
        [&self.course_code, &self.course_name, &self.name]
            .into_iter()
            .find(|s| !s.is_empty())
            .map(String::as_str)
            .unwrap_or("another class")
    }

    /// Reverse of `from_draft`, used to prefill an edit.
    pub fn to_draft(&self) -> EnrollmentDraft {
        EnrollmentDraft {
            name: self.name.clone(),
            email: self.email.clone(),
            major: self.major.clone(),
            year: self.year.clone(),
            notes: self.notes.clone(),
            course_code: self.course_code.clone(),
            course_name: self.course_name.clone(),
            day: self.day.map(time::day_code).unwrap_or_default().to_string(),
            start: self.start.map(|t| t.to_string()).unwrap_or_default(),
            end: self.end.map(|t| t.to_string()).unwrap_or_default(),
            location: self.location.clone(),
        }
    }
}

impl EnrollmentDraft {
    /// Whether any of the six class-group fields was filled in.
    pub fn has_class_fields(&self) -> bool {
        [
            &self.course_code,
            &self.course_name,
            &self.day,
            &self.start,
            &self.end,
            &self.location,
        ]
        .into_iter()
        .any(|s| !s.trim().is_empty())
    }
}
