use std::collections::BTreeSet;

use artwork_model::ArtworkRecord;
use serde_json::json;

use crate::timeline::SortMode;

/// An artwork passes when it belongs to any selected series (or none are
/// selected) and its title contains the search text, ignoring case.
pub fn matches(record: &ArtworkRecord, filters: &BTreeSet<String>, search: &str) -> bool {
    let in_series =
        filters.is_empty() || record.fields.series.iter().any(|series| filters.contains(series));
    if !in_series {
        return false;
    }
    let needle = search.trim();
    needle.is_empty()
        || record
            .title
            .to_lowercase()
            .contains(&needle.to_lowercase())
}

pub fn apply(records: &[ArtworkRecord], filters: &BTreeSet<String>, search: &str) -> Vec<ArtworkRecord> {
    records
        .iter()
        .filter(|record| matches(record, filters, search))
        .cloned()
        .collect()
}

/// Stable string identifying a filter/search/sort combination.
pub fn signature(filters: &BTreeSet<String>, search: &str, sorting: SortMode) -> String {
    json!({
        "filters": filters,
        "search": search.trim(),
        "sorting": sorting,
    })
    .to_string()
}
