use artwork_timeline::config::LayoutOptions;
use artwork_timeline::model::{ArtworkFields, ArtworkRecord, parse_date};
use artwork_timeline::timeline::{
    MarkerKind, SortMode, TimelineInput, TimelineResult, generate_timeline,
};

fn art(id: &str, date: &str) -> ArtworkRecord {
    ArtworkRecord {
        id: id.into(),
        title: format!("Untitled {id}"),
        date: parse_date(date).unwrap(),
        fields: ArtworkFields::default(),
    }
}

fn layout(artworks: &[ArtworkRecord], sorting: SortMode) -> TimelineResult {
    generate_timeline(&TimelineInput {
        artworks,
        sorting,
        artwork_container_width: 775.0,
        artwork_container_height: 775.0,
        desktop_side_width: 720.0,
        viewport_width: 1440.0,
        viewport_height: 900.0,
        layout: LayoutOptions::default(),
        shuffle_seed: None,
    })
}

fn ids(result: &TimelineResult) -> Vec<&str> {
    result.artworks.iter().map(|s| s.artwork.id.as_str()).collect()
}

fn collection() -> Vec<ArtworkRecord> {
    vec![
        art("b", "2019-06-01"),
        art("d", "2023-02-14"),
        art("a", "2019-01-15"),
        art("c", "2020-11-30"),
        art("e", "2023-09-01"),
    ]
}

#[test]
fn empty_collection_yields_zeroed_result() {
    let result = layout(&[], SortMode::Latest);
    assert_eq!(result, TimelineResult::default());
    assert!(result.time_span.is_none());
}

#[test]
fn latest_and_oldest_order_by_date() {
    let artworks = collection();
    assert_eq!(ids(&layout(&artworks, SortMode::Latest)), vec!["e", "d", "c", "b", "a"]);
    assert_eq!(ids(&layout(&artworks, SortMode::Oldest)), vec!["a", "b", "c", "d", "e"]);
    let original: Vec<usize> = layout(&artworks, SortMode::Oldest)
        .artworks
        .iter()
        .map(|s| s.original_index)
        .collect();
    assert_eq!(original, vec![2, 0, 3, 1, 4]);
}

#[test]
fn year_labels_visible_on_first_occurrence_and_last_slot() {
    for sorting in [SortMode::Latest, SortMode::Oldest] {
        let result = layout(&collection(), sorting);
        let artwork_markers: Vec<_> = result
            .markers
            .iter()
            .filter(|m| m.kind == MarkerKind::ArtworkYear)
            .collect();
        assert_eq!(artwork_markers.len(), result.artworks.len());

        let mut seen = std::collections::HashSet::new();
        let last = artwork_markers.len() - 1;
        for (i, marker) in artwork_markers.iter().enumerate() {
            let expected = seen.insert(marker.year) || i == last;
            assert_eq!(marker.is_visible, expected, "{sorting}: marker {i}");
        }
    }
}

#[test]
fn missing_years_between_sparse_dates() {
    let artworks = vec![art("x", "2018-03-01"), art("y", "2020-03-01"), art("z", "2022-03-01")];
    let result = layout(&artworks, SortMode::Oldest);
    let missing: Vec<_> = result
        .markers
        .iter()
        .filter(|m| m.kind == MarkerKind::MissingYear)
        .collect();
    assert_eq!(missing.iter().map(|m| m.year).collect::<Vec<_>>(), vec![2019, 2021]);
    assert!(missing.iter().all(|m| m.is_visible));

    // Each sits one pixels-per-year step past its predecessor slot's trailing edge.
    let centers: Vec<f64> = result
        .markers
        .iter()
        .filter(|m| m.kind == MarkerKind::ArtworkYear)
        .map(|m| m.distance_from_start)
        .collect();
    assert_eq!(missing[0].distance_from_start, centers[0] + 775.0 / 2.0 + 120.0);
    assert_eq!(missing[1].distance_from_start, centers[1] + 775.0 / 2.0 + 120.0);
}

#[test]
fn missing_years_in_descending_walk() {
    let artworks = vec![art("x", "2015-01-01"), art("y", "2019-01-01")];
    let result = layout(&artworks, SortMode::Latest);
    let missing: Vec<(i32, f64)> = result
        .markers
        .iter()
        .filter(|m| m.kind == MarkerKind::MissingYear)
        .map(|m| (m.year, m.distance_from_start))
        .collect();
    let edge = 720.0 + 775.0 / 2.0;
    assert_eq!(
        missing,
        vec![
            (2018, edge + 120.0),
            (2017, edge + 240.0),
            (2016, edge + 360.0)
        ]
    );
}

#[test]
fn single_year_has_no_missing_markers() {
    let artworks = vec![art("x", "2021-01-05"), art("y", "2021-12-20"), art("z", "2021-06-01")];
    let result = layout(&artworks, SortMode::Latest);
    assert!(result.markers.iter().all(|m| m.kind == MarkerKind::ArtworkYear));
    assert_eq!(
        result.markers.iter().filter(|m| m.is_visible).count(),
        2,
        "first 2021 label and the final slot"
    );
}

#[test]
fn single_artwork_is_centered_without_margins() {
    let artworks = vec![art("solo", "2010-05-05")];
    let result = layout(&artworks, SortMode::Oldest);
    assert_eq!(result.artworks.len(), 1);
    assert_eq!(result.markers.len(), 1);
    let slot = &result.artworks[0];
    assert_eq!(slot.margin_right, 0.0);
    assert_eq!(slot.margin_bottom, 0.0);
    assert_eq!(slot.horizontal_scroll_point, 0.0);
    assert_eq!(slot.vertical_scroll_point, 0.0);
    assert_eq!(result.total_timeline_width, 1440.0);
    assert_eq!(result.total_timeline_height, 775.0);
}

#[test]
fn margins_are_rounded_per_gap() {
    let artworks = collection();
    let result = layout(&artworks, SortMode::Oldest);
    let margins: Vec<f64> = result.artworks.iter().map(|s| s.margin_right).collect();
    // a->b 137 days, b->c 548 days, c->d 806 days, d->e 199 days
    assert_eq!(margins, vec![45.0, 180.0, 265.0, 65.0, 0.0]);
    assert!(result.artworks.iter().all(|s| s.margin_bottom == s.margin_right));
    let width: f64 = 5.0 * 775.0 + margins.iter().sum::<f64>() + 2.0 * 720.0 - 775.0;
    assert_eq!(result.total_timeline_width, width);
}

#[test]
fn last_scroll_point_reaches_end_of_track() {
    let result = layout(&collection(), SortMode::Latest);
    let last = result.artworks.last().unwrap();
    assert_eq!(
        last.horizontal_scroll_point,
        result.total_timeline_width - 1440.0
    );
}

#[test]
fn totals_cover_at_least_one_container() {
    for sorting in [SortMode::Latest, SortMode::Oldest, SortMode::Random] {
        for n in 1..6 {
            let artworks: Vec<ArtworkRecord> = collection().into_iter().take(n).collect();
            let result = generate_timeline(&TimelineInput {
                artworks: &artworks,
                sorting,
                artwork_container_width: 300.0,
                artwork_container_height: 300.0,
                desktop_side_width: 0.0,
                viewport_width: 350.0,
                viewport_height: 700.0,
                layout: LayoutOptions::default(),
                shuffle_seed: None,
            });
            assert!(result.total_timeline_width >= 300.0);
            assert!(result.total_timeline_height >= 300.0);
        }
    }
}

#[test]
fn random_mode_spaces_evenly_without_margins() {
    let artworks = collection();
    let result = layout(&artworks, SortMode::Random);
    assert_eq!(result.artworks.len(), artworks.len());
    assert!(result.artworks.iter().all(|s| s.margin_right == 0.0 && s.margin_bottom == 0.0));
    assert!(result.markers.iter().all(|m| m.is_visible && m.kind == MarkerKind::ArtworkYear));
    for pair in result.markers.windows(2) {
        assert_eq!(pair[1].distance_from_start - pair[0].distance_from_start, 775.0);
    }
    let mut shuffled: Vec<&str> = ids(&result);
    shuffled.sort();
    assert_eq!(shuffled, vec!["a", "b", "c", "d", "e"]);
}

#[test]
fn regeneration_is_idempotent_for_sorted_modes() {
    let artworks = collection();
    for sorting in [SortMode::Latest, SortMode::Oldest] {
        let first = serde_json::to_string(&layout(&artworks, sorting)).unwrap();
        let second = serde_json::to_string(&layout(&artworks, sorting)).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn time_span_covers_final_slots() {
    let result = layout(&collection(), SortMode::Random);
    let span = result.time_span.unwrap();
    assert_eq!(span.start, parse_date("2019-01-15").unwrap());
    assert_eq!(span.end, parse_date("2023-09-01").unwrap());
}

#[test]
fn serialized_shape_uses_camel_case() {
    let result = layout(&[art("x", "2018-03-01"), art("y", "2020-03-01")], SortMode::Oldest);
    let json = serde_json::to_value(&result).unwrap();
    assert!(json["totalTimelineWidth"].is_number());
    assert_eq!(json["artworks"][0]["id"], "x");
    assert!(json["artworks"][0]["marginRight"].is_number());
    assert_eq!(json["markers"][1]["type"], "missing-year");
}
