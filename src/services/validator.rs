use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::models::{Enrollment, EnrollmentDraft, TimeOfDay, day_code, parse_day, parse_time};
use crate::services::conflict;

/// Form fields that can carry a blocking error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Name,
    Email,
    Major,
    Year,
    Day,
    Start,
    End,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Major => "major",
            Field::Year => "year",
            Field::Day => "day",
            Field::Start => "start",
            Field::End => "end",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub field_errors: BTreeMap<Field, String>,
    pub conflict_warning: Option<String>,
}

impl ValidationReport {
    /// Field errors block a commit; a conflict warning alone never does.
    pub fn is_blocking(&self) -> bool {
        !self.field_errors.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.field_errors {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        if let Some(warning) = &self.conflict_warning {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "warning: {warning}")?;
        }
        Ok(())
    }
}

/// Fixed rules a candidate is checked against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRules {
    /// Institutional suffix every email must end with, e.g. `@university.edu`.
    pub email_domain: String,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            email_domain: "@university.edu".to_string(),
        }
    }
}

impl ValidationRules {
    fn email_matches(&self, email: &str) -> bool {
        let email = email.to_lowercase();
        let domain = self.email_domain.trim().to_lowercase();
        let domain = if domain.starts_with('@') { domain } else { format!("@{domain}") };
        let Some(local) = email.strip_suffix(domain.as_str()) else {
            return false;
        };
        !local.is_empty() && !local.contains('@') && !local.chars().any(char::is_whitespace)
    }
}

/// Runs every rule against the candidate and collects all failures at once.
pub fn validate(
    candidate: &EnrollmentDraft,
    records: &[Enrollment],
    exclude_id: Option<&str>,
    rules: &ValidationRules,
) -> ValidationReport {
    let mut errors = BTreeMap::new();

    for (field, value, label) in [
        (Field::Name, &candidate.name, "Name"),
        (Field::Major, &candidate.major, "Major"),
        (Field::Year, &candidate.year, "Year"),
    ] {
        if value.trim().is_empty() {
            errors.insert(field, format!("{label} is required."));
        }
    }

    let email = candidate.email.trim();
    if email.is_empty() {
        errors.insert(Field::Email, "Email is required.".to_string());
    } else if !rules.email_matches(email) {
        errors.insert(
            Field::Email,
            format!("Email must be an address ending in {}.", rules.email_domain),
        );
    }

    let mut conflict_warning = None;

    if candidate.has_class_fields() {
        let day = candidate.day.trim();
        if day.is_empty() {
            errors.insert(Field::Day, "Day is required when adding a class.".to_string());
        } else if parse_day(day).is_none() {
            errors.insert(Field::Day, "Day must be one of Mon-Sun.".to_string());
        }

        let start = check_time(&mut errors, Field::Start, "Start time", &candidate.start);
        let end = check_time(&mut errors, Field::End, "End time", &candidate.end);
        if let (Some(start), Some(end)) = (start, end)
            && end <= start
        {
            errors.insert(Field::End, "End time must be after start time.".to_string());
        }

        let time_ok = [Field::Day, Field::Start, Field::End]
            .iter()
            .all(|f| !errors.contains_key(f));
        if time_ok {
            conflict_warning = conflict::find_conflicts(candidate, records, exclude_id)
                .first()
                .map(|other| conflict_message(other));
        }
    }

    ValidationReport {
        field_errors: errors,
        conflict_warning,
    }
}

fn check_time(
    errors: &mut BTreeMap<Field, String>,
    field: Field,
    label: &str,
    raw: &str,
) -> Option<TimeOfDay> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.insert(field, format!("{label} is required when adding a class."));
        return None;
    }
    let parsed = parse_time(raw);
    if parsed.is_none() {
        errors.insert(field, format!("{label} must be a valid time (HH:MM)."));
    }
    parsed
}

fn conflict_message(other: &Enrollment) -> String {
    match (other.day, other.start, other.end) {
        (Some(day), Some(start), Some(end)) => format!(
            "Time conflict with {} on {} {}-{}.",
            other.label(),
            day_code(day),
            start,
            end
        ),
        _ => format!("Time conflict with {}.", other.label()),
    }
}
