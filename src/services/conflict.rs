use std::collections::HashSet;

use crate::models::{Enrollment, Scheduled};

/// Records on the candidate's day whose time block overlaps it.
///
/// A candidate without a complete block never clashes, and stored records
/// without one are skipped. `exclude_id` lets a record under edit ignore itself.
pub fn find_conflicts<'a>(
    candidate: &impl Scheduled,
    records: &'a [Enrollment],
    exclude_id: Option<&str>,
) -> Vec<&'a Enrollment> {
    let Some(slot) = candidate.slot() else {
        return Vec::new();
    };

    records
        .iter()
        .filter(|r| exclude_id != Some(r.id.as_str()))
        .filter(|r| r.slot().is_some_and(|other| slot.overlaps(&other)))
        .collect()
}

pub fn conflicts(
    candidate: &impl Scheduled,
    records: &[Enrollment],
    exclude_id: Option<&str>,
) -> bool {
    !find_conflicts(candidate, records, exclude_id).is_empty()
}

/// Ids of every stored record that clashes with at least one other record.
pub fn conflicting_ids(records: &[Enrollment]) -> HashSet<String> {
    records
        .iter()
        .filter(|r| conflicts(*r, records, Some(r.id.as_str())))
        .map(|r| r.id.clone())
        .collect()
}
