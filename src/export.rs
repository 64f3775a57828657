use std::cmp::Ordering;

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::AppError;
use crate::models::{Enrollment, day_code};

pub const CSV_HEADER: [&str; 11] = [
    "Name",
    "Email",
    "Major",
    "Year",
    "Notes",
    "Course Code",
    "Course Name",
    "Day",
    "Start",
    "End",
    "Location",
];

/// Display order: by weekday (person-only records last), then start time, then name.
/// Stable, so ties keep insertion order.
pub fn presentation_order(records: &[Enrollment]) -> Vec<&Enrollment> {
    let mut sorted: Vec<&Enrollment> = records.iter().collect();
    sorted.sort_by(|a, b| compare(a, b));
    sorted
}

fn compare(a: &Enrollment, b: &Enrollment) -> Ordering {
    let day = |r: &Enrollment| r.day.map(|d| d.num_days_from_monday()).unwrap_or(u32::MAX);
    let start = |r: &Enrollment| r.start.map(|t| t.minutes()).unwrap_or(u16::MAX);

    day(a)
        .cmp(&day(b))
        .then_with(|| start(a).cmp(&start(b)))
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
}

/// Renders the records as CSV, rows joined by `\n` with no trailing newline.
/// Fields holding a comma, quote or newline are quoted with inner quotes doubled.
pub fn to_csv(records: &[Enrollment]) -> Result<String, AppError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for record in presentation_order(records) {
        writer.write_record(row(record))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Io(e.into_error()))?;
    let mut text = String::from_utf8(bytes)
        .map_err(|e| AppError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

fn row(r: &Enrollment) -> [String; 11] {
    [
        r.name.clone(),
        r.email.clone(),
        r.major.clone(),
        r.year.clone(),
        r.notes.clone(),
        r.course_code.clone(),
        r.course_name.clone(),
        r.day.map(day_code).unwrap_or_default().to_string(),
        r.start.map(|t| t.to_string()).unwrap_or_default(),
        r.end.map(|t| t.to_string()).unwrap_or_default(),
        r.location.clone(),
    ]
}
