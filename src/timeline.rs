//! Timeline layout engine.
//!
//! Turns an unordered artwork collection plus container/viewport measurements
//! into a fully positioned timeline: one slot per artwork with the gap to its
//! successor, year markers along the primary axis, and the scroll offsets that
//! center each slot.
//!
//! Layout is a pure function of its input and is always recomputed in full.
//! The only non-determinism is the `random` sort when no shuffle seed is given.
//!
//! Geometry along the horizontal axis:
//!
//! ```text
//! |<- side ->|<- c/2 ->|<- margin ->|<- c/2 ->| ... |<- side ->|
//!            ^ center 0                       ^ center 1
//! ```
//!
//! Slot `i` is centered at `side + Σ(c + margin_j)` over the preceding slots,
//! so with `side = viewport / 2` both the first and the last artwork can be
//! scrolled to the middle of the viewport.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use anyhow::{Error, bail};
use artwork_model::ArtworkRecord;
use chrono::{DateTime, TimeDelta, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::LayoutOptions;

const MS_PER_DAY: f64 = 86_400_000.0;
/// Average Gregorian month.
const DAYS_PER_MONTH: f64 = 30.44;
const DAYS_PER_YEAR: f64 = 365.25;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Newest first.
    #[default]
    Latest,
    /// Oldest first.
    Oldest,
    /// Shuffled, evenly spaced.
    Random,
}

impl SortMode {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Latest => "latest",
            Self::Oldest => "oldest",
            Self::Random => "random",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latest" => Ok(Self::Latest),
            "oldest" => Ok(Self::Oldest),
            "random" => Ok(Self::Random),
            other => bail!("unknown sort mode {other:?} (expected latest, oldest or random)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerKind {
    ArtworkYear,
    MissingYear,
}

/// A year label positioned along the primary scroll axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineMarker {
    pub id: String,
    pub year: i32,
    #[serde(rename = "type")]
    pub kind: MarkerKind,
    /// Offset along the horizontal track, in the same coordinates as
    /// `horizontal_scroll_point`. Markers are laid out for the desktop rail
    /// on every viewport; with no side padding (mobile) the origin is the
    /// leading edge of the first container, not the vertical slot centers.
    pub distance_from_start: f64,
    pub is_visible: bool,
}

/// An artwork placed on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineArtworkSlot {
    #[serde(flatten)]
    pub artwork: ArtworkRecord,
    /// Position in the unsorted input; diagnostic only.
    pub original_index: usize,
    /// Gap after this slot on the horizontal (desktop) axis.
    pub margin_right: f64,
    /// Gap after this slot on the vertical (mobile) axis.
    pub margin_bottom: f64,
    pub horizontal_scroll_point: f64,
    pub vertical_scroll_point: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSpan {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub elapsed_ms: i64,
    pub elapsed_years: f64,
}

impl TimeSpan {
    fn of(slots: &[TimelineArtworkSlot]) -> Option<Self> {
        let start = slots.iter().map(|s| s.artwork.date).min()?;
        let end = slots.iter().map(|s| s.artwork.date).max()?;
        let elapsed_ms = (end - start).num_milliseconds();
        Some(Self {
            start,
            end,
            elapsed_ms,
            elapsed_years: elapsed_ms as f64 / (MS_PER_DAY * DAYS_PER_YEAR),
        })
    }

    pub fn elapsed(&self) -> TimeDelta {
        TimeDelta::milliseconds(self.elapsed_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineResult {
    /// Slots in display/scroll order.
    pub artworks: Vec<TimelineArtworkSlot>,
    pub markers: Vec<TimelineMarker>,
    pub total_timeline_width: f64,
    pub total_timeline_height: f64,
    pub time_span: Option<TimeSpan>,
}

impl TimelineResult {
    pub fn len(&self) -> usize {
        self.artworks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artworks.is_empty()
    }
}

/// Everything the engine needs for one layout pass.
#[derive(Debug, Clone, Copy)]
pub struct TimelineInput<'a> {
    pub artworks: &'a [ArtworkRecord],
    pub sorting: SortMode,
    pub artwork_container_width: f64,
    pub artwork_container_height: f64,
    pub desktop_side_width: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub layout: LayoutOptions,
    /// Seed for the `random` order; `None` reshuffles on every call.
    pub shuffle_seed: Option<u64>,
}

/// Lays out `input.artworks` along the timeline.
pub fn generate_timeline(input: &TimelineInput<'_>) -> TimelineResult {
    if input.artworks.is_empty() {
        return TimelineResult::default();
    }

    let ordered = order_artworks(input.artworks, input.sorting, input.shuffle_seed);
    let (mut slots, markers) = match input.sorting {
        SortMode::Random => place_evenly(&ordered, input),
        SortMode::Latest | SortMode::Oldest => place_chronologically(&ordered, input),
    };
    assign_scroll_points(&mut slots, input);
    let (total_timeline_width, total_timeline_height) = total_extents(&slots, input);
    let time_span = TimeSpan::of(&slots);

    debug!(
        sorting = %input.sorting,
        slots = slots.len(),
        markers = markers.len(),
        total_timeline_width,
        total_timeline_height,
        "timeline generated"
    );

    TimelineResult {
        artworks: slots,
        markers,
        total_timeline_width,
        total_timeline_height,
        time_span,
    }
}

fn order_artworks(
    artworks: &[ArtworkRecord],
    sorting: SortMode,
    seed: Option<u64>,
) -> Vec<(usize, &ArtworkRecord)> {
    let mut ordered: Vec<(usize, &ArtworkRecord)> = artworks.iter().enumerate().collect();
    match sorting {
        SortMode::Latest => ordered.sort_by(|a, b| b.1.date.cmp(&a.1.date)),
        SortMode::Oldest => ordered.sort_by(|a, b| a.1.date.cmp(&b.1.date)),
        SortMode::Random => match seed {
            Some(seed) => ordered.shuffle(&mut StdRng::seed_from_u64(seed)),
            None => ordered.shuffle(&mut rand::rng()),
        },
    }
    ordered
}

fn slot(original_index: usize, record: &ArtworkRecord, margin: f64) -> TimelineArtworkSlot {
    TimelineArtworkSlot {
        artwork: record.clone(),
        original_index,
        margin_right: margin,
        margin_bottom: margin,
        horizontal_scroll_point: 0.0,
        vertical_scroll_point: 0.0,
    }
}

fn place_evenly(
    ordered: &[(usize, &ArtworkRecord)],
    input: &TimelineInput<'_>,
) -> (Vec<TimelineArtworkSlot>, Vec<TimelineMarker>) {
    let mut slots = Vec::with_capacity(ordered.len());
    let mut markers = Vec::with_capacity(ordered.len());
    let mut center = input.desktop_side_width;
    for &(original_index, record) in ordered {
        markers.push(TimelineMarker {
            id: record.id.clone(),
            year: record.year(),
            kind: MarkerKind::ArtworkYear,
            distance_from_start: center,
            is_visible: true,
        });
        slots.push(slot(original_index, record, 0.0));
        center += input.artwork_container_width;
    }
    (slots, markers)
}

fn place_chronologically(
    ordered: &[(usize, &ArtworkRecord)],
    input: &TimelineInput<'_>,
) -> (Vec<TimelineArtworkSlot>, Vec<TimelineMarker>) {
    let half = input.artwork_container_width / 2.0;
    let last = ordered.len() - 1;
    let mut slots = Vec::with_capacity(ordered.len());
    let mut markers = Vec::with_capacity(ordered.len());
    let mut seen_years = HashSet::new();
    let mut cursor = input.desktop_side_width;

    for (position, &(original_index, record)) in ordered.iter().enumerate() {
        let year = record.year();
        let first_of_year = seen_years.insert(year);
        markers.push(TimelineMarker {
            id: record.id.clone(),
            year,
            kind: MarkerKind::ArtworkYear,
            distance_from_start: cursor,
            is_visible: first_of_year || position == last,
        });

        let next = ordered.get(position + 1).map(|&(_, next)| next);
        let margin = next.map_or(0.0, |next| margin_between(record, next, &input.layout));

        if let Some(next) = next {
            let trailing_edge = cursor + half;
            for (step, missing) in missing_years(year, next.year()).into_iter().enumerate() {
                markers.push(TimelineMarker {
                    id: format!("missing-year-{missing}"),
                    year: missing,
                    kind: MarkerKind::MissingYear,
                    distance_from_start: trailing_edge
                        + (step + 1) as f64 * input.layout.pixels_per_year,
                    is_visible: true,
                });
            }
        }

        trace!(id = %record.id, year, margin, cursor, "placed artwork");
        slots.push(slot(original_index, record, margin));
        cursor += half + margin + half;
    }
    (slots, markers)
}

/// Gap between two consecutive artworks, proportional to the months between them.
fn margin_between(current: &ArtworkRecord, next: &ArtworkRecord, layout: &LayoutOptions) -> f64 {
    let elapsed_ms = (next.date - current.date).num_milliseconds().unsigned_abs() as f64;
    let months = elapsed_ms / (MS_PER_DAY * DAYS_PER_MONTH);
    let margin = (months * layout.pixels_per_month).round();
    let margin = match layout.max_margin_px {
        Some(max) => margin.min(max),
        None => margin,
    };
    margin.max(0.0)
}

/// Years strictly between `from` and `to`, in walk order.
fn missing_years(from: i32, to: i32) -> Vec<i32> {
    if (to - from).abs() <= 1 {
        return Vec::new();
    }
    if to > from {
        (from + 1..to).collect()
    } else {
        (to + 1..from).rev().collect()
    }
}

fn assign_scroll_points(slots: &mut [TimelineArtworkSlot], input: &TimelineInput<'_>) {
    let mut center_x = input.desktop_side_width;
    let mut center_y = input.artwork_container_height / 2.0;
    for slot in slots {
        slot.horizontal_scroll_point = (center_x - input.viewport_width / 2.0).max(0.0);
        slot.vertical_scroll_point = (center_y - input.viewport_height / 2.0).max(0.0);
        center_x += input.artwork_container_width + slot.margin_right;
        center_y += input.artwork_container_height + slot.margin_bottom;
    }
}

fn total_extents(slots: &[TimelineArtworkSlot], input: &TimelineInput<'_>) -> (f64, f64) {
    let Some(last) = slots.last() else {
        return (0.0, 0.0);
    };
    let cw = input.artwork_container_width;
    let ch = input.artwork_container_height;
    let run_x: f64 = slots.iter().map(|s| cw + s.margin_right).sum::<f64>() - last.margin_right;
    let run_y: f64 = slots.iter().map(|s| ch + s.margin_bottom).sum::<f64>() - last.margin_bottom;
    let width = run_x + 2.0 * input.desktop_side_width - cw;
    (width.max(cw), run_y.max(ch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use artwork_model::ArtworkFields;

    fn art(id: &str, date: &str) -> ArtworkRecord {
        ArtworkRecord {
            id: id.into(),
            title: id.into(),
            date: artwork_model::parse_date(date).unwrap(),
            fields: ArtworkFields::default(),
        }
    }

    fn input(artworks: &[ArtworkRecord], sorting: SortMode) -> TimelineInput<'_> {
        TimelineInput {
            artworks,
            sorting,
            artwork_container_width: 500.0,
            artwork_container_height: 500.0,
            desktop_side_width: 600.0,
            viewport_width: 1200.0,
            viewport_height: 625.0,
            layout: LayoutOptions::default(),
            shuffle_seed: None,
        }
    }

    #[test]
    fn missing_years_follow_walk_direction() {
        assert_eq!(missing_years(2018, 2021), vec![2019, 2020]);
        assert_eq!(missing_years(2021, 2018), vec![2020, 2019]);
        assert!(missing_years(2018, 2019).is_empty());
        assert!(missing_years(2018, 2018).is_empty());
    }

    #[test]
    fn margin_is_ten_pixels_per_average_month() {
        let a = art("a", "2020-01-01");
        let b = art("b", "2020-03-01");
        // 60 days / 30.44 = 1.971 months -> 19.71 -> 20
        assert_eq!(margin_between(&a, &b, &LayoutOptions::default()), 20.0);
        assert_eq!(margin_between(&b, &a, &LayoutOptions::default()), 20.0);
    }

    #[test]
    fn margin_respects_configured_cap() {
        let a = art("a", "2000-01-01");
        let b = art("b", "2020-01-01");
        let layout = LayoutOptions {
            max_margin_px: Some(300.0),
            ..LayoutOptions::default()
        };
        assert_eq!(margin_between(&a, &b, &layout), 300.0);
    }

    #[test]
    fn slot_centers_advance_by_container_plus_margin() {
        let artworks = [art("a", "2020-01-01"), art("b", "2020-03-01"), art("c", "2020-03-01")];
        let result = generate_timeline(&input(&artworks, SortMode::Oldest));
        let centers: Vec<f64> = result.markers.iter().map(|m| m.distance_from_start).collect();
        assert_eq!(centers, vec![600.0, 1120.0, 1620.0]);
        // second scroll point: 1120 - 600
        assert_eq!(result.artworks[1].horizontal_scroll_point, 520.0);
        // vertical: 250 + 520 - 312.5
        assert_eq!(result.artworks[1].vertical_scroll_point, 457.5);
    }

    #[test]
    fn markers_use_horizontal_coordinates_without_side_padding() {
        let artworks = [art("a", "2019-01-01"), art("b", "2019-07-01"), art("c", "2020-02-01")];
        let mobile = TimelineInput {
            artwork_container_width: 350.0,
            artwork_container_height: 350.0,
            desktop_side_width: 0.0,
            viewport_width: 400.0,
            viewport_height: 800.0,
            ..input(&artworks, SortMode::Oldest)
        };
        let result = generate_timeline(&mobile);
        let year_markers: Vec<f64> = result
            .markers
            .iter()
            .filter(|m| m.kind == MarkerKind::ArtworkYear)
            .map(|m| m.distance_from_start)
            .collect();
        let mut center_x = 0.0;
        let mut expected = Vec::new();
        for slot in &result.artworks {
            expected.push(center_x);
            center_x += 350.0 + slot.margin_right;
        }
        assert_eq!(year_markers, expected);
    }

    #[test]
    fn totals_exclude_trailing_margin_and_add_side_padding() {
        let artworks = [art("a", "2020-01-01"), art("b", "2020-03-01")];
        let result = generate_timeline(&input(&artworks, SortMode::Latest));
        assert_eq!(result.artworks[1].margin_right, 0.0);
        // 2 * 500 + 20 + 2 * 600 - 500
        assert_eq!(result.total_timeline_width, 1720.0);
        assert_eq!(result.total_timeline_height, 1020.0);
    }

    #[test]
    fn time_span_uses_final_slots() {
        let artworks = [art("a", "2019-01-01"), art("b", "2021-01-01")];
        let result = generate_timeline(&input(&artworks, SortMode::Latest));
        let span = result.time_span.unwrap();
        assert_eq!(span.start, artworks[0].date);
        assert_eq!(span.end, artworks[1].date);
        assert_eq!(span.elapsed().num_days(), 731);
        assert!((span.elapsed_years - 2.0).abs() < 0.01);
    }

    #[test]
    fn seeded_random_order_is_stable() {
        let artworks: Vec<ArtworkRecord> = (0..12)
            .map(|i| art(&format!("a{i}"), &format!("20{:02}-01-01", i + 5)))
            .collect();
        let mut seeded = input(&artworks, SortMode::Random);
        seeded.shuffle_seed = Some(42);
        let first = generate_timeline(&seeded);
        let second = generate_timeline(&seeded);
        assert_eq!(first, second);
    }

    #[test]
    fn sort_mode_parses() {
        assert_eq!("Oldest".parse::<SortMode>().unwrap(), SortMode::Oldest);
        assert!("sideways".parse::<SortMode>().is_err());
        assert_eq!(SortMode::default(), SortMode::Latest);
    }
}
