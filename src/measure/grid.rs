use std::collections::BTreeMap;

use artwork_model::ArtworkRecord;
use serde_json::Value;
use tracing::warn;

use crate::config::{BreakpointOptions, GridOptions};
use crate::measure::breakpoints::{ScrollAxis, axis_for};

/// Number of grid columns for a viewport width.
pub fn columns_for(viewport_width: f64, grid: &GridOptions, breakpoints: &BreakpointOptions) -> u32 {
    match axis_for(viewport_width, breakpoints) {
        ScrollAxis::Horizontal => grid.columns_desktop.max(1),
        ScrollAxis::Vertical => grid.columns_mobile.max(1),
    }
}

/// Edge length of one square grid cell when `columns` cells and their gutters
/// share `available_width`.
pub fn cell_size(available_width: f64, columns: u32, gap: u32) -> u32 {
    let columns = columns.max(1);
    let gutters = f64::from(gap) * f64::from(columns - 1);
    let width = if available_width.is_finite() {
        available_width
    } else {
        0.0
    };
    ((width - gutters) / f64::from(columns)).floor().max(0.0) as u32
}

/// Buckets artworks by calendar year for the grid's year headings.
pub fn group_records_by_year(records: &[ArtworkRecord]) -> BTreeMap<i32, Vec<&ArtworkRecord>> {
    let mut groups: BTreeMap<i32, Vec<&ArtworkRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.year()).or_default().push(record);
    }
    groups
}

/// Like [`group_records_by_year`], but for an unvalidated JSON payload.
///
/// Anything other than an array is logged and produces no groups; array
/// entries that are not artworks are skipped.
pub fn group_by_year(payload: &Value) -> BTreeMap<i32, Vec<ArtworkRecord>> {
    let Some(items) = payload.as_array() else {
        warn!(kind = value_kind(payload), "group_by_year expects an array of artworks");
        return BTreeMap::new();
    };
    let mut groups: BTreeMap<i32, Vec<ArtworkRecord>> = BTreeMap::new();
    for (index, item) in items.iter().enumerate() {
        match serde_json::from_value::<ArtworkRecord>(item.clone()) {
            Ok(record) => groups.entry(record.year()).or_default().push(record),
            Err(err) => warn!(index, %err, "skipping malformed artwork"),
        }
    }
    groups
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
