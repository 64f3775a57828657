use std::ops::RangeInclusive;

use chrono::Weekday;
use serde::Serialize;

use crate::models::{Enrollment, Scheduled, day_code};
use crate::services::conflict;

/// The displayed slice of the week: hours `start_hour..end_hour`,
/// `hour_height` units per hour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutWindow {
    pub start_hour: u32,
    pub end_hour: u32,
    pub hour_height: f64,
}

impl Default for LayoutWindow {
    fn default() -> Self {
        Self {
            start_hour: 8,
            end_hour: 22,
            hour_height: 60.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    #[serde(serialize_with = "serialize_column")]
    pub column: Weekday,
    pub top: f64,
    pub height: f64,
}

/// One drawable record in the week grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub id: String,
    pub label: String,
    pub placement: Placement,
    pub conflicted: bool,
}

/// Everything a renderer needs to draw the week grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekView {
    pub blocks: Vec<Block>,
    /// Hours to draw gridlines at.
    pub hour_marks: Vec<u32>,
    pub grid_height: f64,
}

fn serialize_column<S: serde::Serializer>(day: &Weekday, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(day_code(*day))
}

impl LayoutWindow {
    /// Column and vertical extent of a record, or `None` when it has no usable time block.
    ///
    /// Nothing is clipped: a block outside the window yields a negative `top` or
    /// a bottom past the window's end, and the renderer decides what to do with it.
    /// Overlapping blocks on one day share the same column.
    pub fn layout(&self, record: &impl Scheduled) -> Option<Placement> {
        let slot = record.slot()?;
        let start = f64::from(slot.start.minutes());
        let end = f64::from(slot.end.minutes());

        Some(Placement {
            column: slot.day,
            top: (start / 60.0 - f64::from(self.start_hour)) * self.hour_height,
            height: ((end - start) / 60.0) * self.hour_height,
        })
    }

    /// Total height of the grid body.
    pub fn grid_height(&self) -> f64 {
        f64::from(self.end_hour.saturating_sub(self.start_hour)) * self.hour_height
    }

    /// Hour gridlines, both window edges included.
    pub fn hour_marks(&self) -> RangeInclusive<u32> {
        self.start_hour..=self.end_hour
    }

    /// Places every drawable record, flagging the ones that clash with another.
    pub fn week_view(&self, records: &[Enrollment]) -> WeekView {
        let clashing = conflict::conflicting_ids(records);

        let blocks = records
            .iter()
            .filter_map(|r| {
                self.layout(r).map(|placement| Block {
                    id: r.id.clone(),
                    label: r.label().to_string(),
                    placement,
                    conflicted: clashing.contains(&r.id),
                })
            })
            .collect();

        WeekView {
            blocks,
            hour_marks: self.hour_marks().collect(),
            grid_height: self.grid_height(),
        }
    }
}
