//! Shared view state.
//!
//! [`Store`] owns the one mutable [`ViewState`] of a session. Every change goes
//! through [`Store::update`], after which derived fields (filtered collection,
//! timeline, index resets) are recomputed from the new inputs. Nested
//! collections are `Arc`-shared and replaced, never edited, so a cloned state
//! stays consistent for as long as a reader holds it.

use std::collections::BTreeSet;
use std::sync::Arc;

use artwork_model::ArtworkRecord;
use tracing::debug;

use crate::config::{BreakpointOptions, Configuration, LayoutOptions};
use crate::filter;
use crate::measure::breakpoints::{self, Viewport};
use crate::timeline::{SortMode, TimelineInput, TimelineResult, generate_timeline};

#[derive(Debug, Clone)]
pub struct ViewState {
    pub original_artworks: Arc<[ArtworkRecord]>,
    pub filtered_artworks: Arc<[ArtworkRecord]>,
    /// `None` until every measurement is known.
    pub timeline: Option<Arc<TimelineResult>>,
    pub current_artwork_index: usize,
    /// Index to restore when returning to the timeline with unchanged filters.
    pub remembered_index: usize,
    pub sorting: SortMode,
    pub filters: BTreeSet<String>,
    pub search: String,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub artwork_container_width: f64,
    pub artwork_container_height: f64,
    pub desktop_side_width: f64,
    /// Set while the current index was last changed by navigation controls
    /// rather than by the user scrolling.
    pub index_changed_programmatically: bool,
    pub filter_signature: String,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            original_artworks: Arc::from(Vec::new()),
            filtered_artworks: Arc::from(Vec::new()),
            timeline: None,
            current_artwork_index: 0,
            remembered_index: 0,
            sorting: SortMode::default(),
            filters: BTreeSet::new(),
            search: String::new(),
            viewport_width: 0.0,
            viewport_height: 0.0,
            artwork_container_width: 0.0,
            artwork_container_height: 0.0,
            desktop_side_width: 0.0,
            index_changed_programmatically: false,
            filter_signature: String::new(),
        }
    }
}

impl ViewState {
    fn measurements(&self) -> [f64; 5] {
        [
            self.viewport_width,
            self.viewport_height,
            self.artwork_container_width,
            self.artwork_container_height,
            self.desktop_side_width,
        ]
    }

    fn has_measurements(&self) -> bool {
        [
            self.viewport_width,
            self.viewport_height,
            self.artwork_container_width,
            self.artwork_container_height,
        ]
        .iter()
        .all(|v| v.is_finite() && *v > 0.0)
    }

    pub fn timeline_len(&self) -> usize {
        self.timeline.as_ref().map_or(0, |t| t.len())
    }
}

/// A state transition: either a whole new state or a function of the latest one.
pub enum StateUpdate {
    Replace(ViewState),
    Apply(Box<dyn FnOnce(&ViewState) -> ViewState>),
}

impl StateUpdate {
    pub fn apply(f: impl FnOnce(&ViewState) -> ViewState + 'static) -> Self {
        Self::Apply(Box::new(f))
    }
}

impl From<ViewState> for StateUpdate {
    fn from(state: ViewState) -> Self {
        Self::Replace(state)
    }
}

// Inputs the derived fields were last computed from, and what they produced.
#[derive(Debug, Clone)]
struct Derivation {
    artworks: Arc<[ArtworkRecord]>,
    signature: String,
    measurements: [f64; 5],
    filtered: Arc<[ArtworkRecord]>,
    timeline: Option<Arc<TimelineResult>>,
}

pub struct Store {
    state: ViewState,
    layout: LayoutOptions,
    breakpoints: BreakpointOptions,
    shuffle_seed: u64,
    derived_from: Option<Derivation>,
}

impl Store {
    pub fn new(artworks: Vec<ArtworkRecord>, cfg: &Configuration) -> Self {
        let shuffle_seed = cfg.shuffle_seed.unwrap_or_else(rand::random);
        let mut store = Self {
            state: ViewState {
                original_artworks: Arc::from(artworks),
                ..ViewState::default()
            },
            layout: cfg.layout,
            breakpoints: cfg.breakpoints,
            shuffle_seed,
            derived_from: None,
        };
        store.derive();
        store
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn breakpoints(&self) -> &BreakpointOptions {
        &self.breakpoints
    }

    pub fn timeline(&self) -> Option<&TimelineResult> {
        self.state.timeline.as_deref()
    }

    /// Applies `update`, then overwrites every derived field from the new
    /// inputs. Derived values supplied by the caller are never kept.
    pub fn update(&mut self, update: impl Into<StateUpdate>) {
        let next = match update.into() {
            StateUpdate::Replace(state) => state,
            StateUpdate::Apply(f) => f(&self.state),
        };
        self.state = next;
        self.derive();
    }

    /// Applies a viewport measurement through the layout breakpoints.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        let m = breakpoints::measure(viewport, &self.breakpoints);
        self.update(StateUpdate::apply(move |s| ViewState {
            viewport_width: m.viewport.width,
            viewport_height: m.viewport.height,
            artwork_container_width: m.container_width,
            artwork_container_height: m.container_height,
            desktop_side_width: m.desktop_side_width,
            ..s.clone()
        }));
    }

    /// Swaps in a freshly fetched collection.
    pub fn replace_collection(&mut self, artworks: Vec<ArtworkRecord>) {
        let artworks: Arc<[ArtworkRecord]> = Arc::from(artworks);
        self.update(StateUpdate::apply(move |s| ViewState {
            original_artworks: artworks,
            ..s.clone()
        }));
    }

    pub fn set_sorting(&mut self, sorting: SortMode) {
        self.update(StateUpdate::apply(move |s| ViewState {
            sorting,
            ..s.clone()
        }));
    }

    pub fn set_filters(&mut self, filters: BTreeSet<String>) {
        self.update(StateUpdate::apply(move |s| ViewState {
            filters,
            ..s.clone()
        }));
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        let search = search.into();
        self.update(StateUpdate::apply(move |s| ViewState {
            search,
            ..s.clone()
        }));
    }

    /// Saves the current index before leaving the timeline (for example to
    /// open an artwork's detail page).
    pub fn remember_position(&mut self) {
        self.update(StateUpdate::apply(|s| ViewState {
            remembered_index: s.current_artwork_index,
            ..s.clone()
        }));
    }

    /// Makes the remembered index current again on returning to the timeline.
    /// A filter, search or sort change since [`Store::remember_position`] has
    /// already reset it to 0.
    pub fn restore_position(&mut self) -> usize {
        self.update(StateUpdate::apply(|s| ViewState {
            current_artwork_index: s.remembered_index,
            index_changed_programmatically: true,
            ..s.clone()
        }));
        self.state.current_artwork_index
    }

    fn derive(&mut self) {
        let signature =
            filter::signature(&self.state.filters, &self.state.search, self.state.sorting);
        let signature_changed = self
            .derived_from
            .as_ref()
            .is_none_or(|prev| prev.signature != signature);
        if signature_changed {
            debug!(%signature, "filters changed; resetting position");
            self.state.current_artwork_index = 0;
            self.state.remembered_index = 0;
        }

        let measurements = self.state.measurements();
        let reusable = self.derived_from.take().filter(|prev| {
            Arc::ptr_eq(&prev.artworks, &self.state.original_artworks)
                && prev.signature == signature
        });
        let derivation = match reusable {
            Some(prev) if prev.measurements == measurements => prev,
            Some(prev) => Derivation {
                timeline: self.regenerate(&prev.filtered),
                measurements,
                ..prev
            },
            None => {
                let filtered: Arc<[ArtworkRecord]> = Arc::from(filter::apply(
                    &self.state.original_artworks,
                    &self.state.filters,
                    &self.state.search,
                ));
                Derivation {
                    artworks: Arc::clone(&self.state.original_artworks),
                    signature,
                    measurements,
                    timeline: self.regenerate(&filtered),
                    filtered,
                }
            }
        };

        self.state.filter_signature = derivation.signature.clone();
        self.state.filtered_artworks = Arc::clone(&derivation.filtered);
        self.state.timeline = derivation.timeline.clone();

        let last = derivation.filtered.len().saturating_sub(1);
        self.state.current_artwork_index = self.state.current_artwork_index.min(last);
        self.state.remembered_index = self.state.remembered_index.min(last);
        self.derived_from = Some(derivation);
    }

    fn regenerate(&self, filtered: &[ArtworkRecord]) -> Option<Arc<TimelineResult>> {
        if !self.state.has_measurements() {
            debug!("timeline deferred until measurements are known");
            return None;
        }
        let timeline = generate_timeline(&TimelineInput {
            artworks: filtered,
            sorting: self.state.sorting,
            artwork_container_width: self.state.artwork_container_width,
            artwork_container_height: self.state.artwork_container_height,
            desktop_side_width: self.state.desktop_side_width,
            viewport_width: self.state.viewport_width,
            viewport_height: self.state.viewport_height,
            layout: self.layout,
            shuffle_seed: Some(self.shuffle_seed),
        });
        Some(Arc::new(timeline))
    }
}
