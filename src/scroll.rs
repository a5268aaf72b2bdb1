//! Keeps the scroll container and the shared current index in agreement.
//!
//! Two directions feed each other: the user scrolls and the nearest slot
//! becomes current, or navigation picks an index and the container is scrolled
//! to it. While a programmatic scroll is settling, scroll events are ignored so
//! the controller never "corrects" its own animation.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::ScrollOptions;
use crate::measure::breakpoints::{ScrollAxis, axis_for};
use crate::store::{StateUpdate, Store, ViewState};
use crate::timeline::TimelineResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
    Auto,
}

/// The native scrollable element, once mounted.
pub trait ScrollContainer {
    fn scroll_to(&mut self, axis: ScrollAxis, offset: f64, behavior: ScrollBehavior);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollPhase {
    Idle,
    Programmatic { target: usize, deadline: Instant },
}

pub struct ScrollController {
    phase: ScrollPhase,
    settle_delay: Duration,
}

impl ScrollController {
    pub fn new(opts: &ScrollOptions) -> Self {
        Self {
            phase: ScrollPhase::Idle,
            settle_delay: opts.settle_delay,
        }
    }

    pub fn phase(&self) -> ScrollPhase {
        self.phase
    }

    /// Ends a programmatic scroll whose settle delay has elapsed. Returns the
    /// index that was being scrolled to.
    pub fn on_tick(&mut self, store: &mut Store, now: Instant) -> Option<usize> {
        let ScrollPhase::Programmatic { target, deadline } = self.phase else {
            return None;
        };
        if now < deadline {
            return None;
        }
        self.phase = ScrollPhase::Idle;
        if store.state().index_changed_programmatically {
            store.update(StateUpdate::apply(|s| ViewState {
                index_changed_programmatically: false,
                ..s.clone()
            }));
        }
        debug!(target, "programmatic scroll settled");
        Some(target)
    }

    /// Whether a programmatic scroll is still pending as of the last
    /// [`ScrollController::on_tick`]. The phase only expires when ticked, so
    /// callers holding a clock should prefer
    /// [`ScrollController::is_scrolling_programmatically_at`].
    pub fn is_scrolling_programmatically(&self) -> bool {
        matches!(self.phase, ScrollPhase::Programmatic { .. })
    }

    /// Whether a programmatic scroll is still settling at `now`, regardless
    /// of when the controller was last ticked.
    pub fn is_scrolling_programmatically_at(&self, now: Instant) -> bool {
        matches!(self.phase, ScrollPhase::Programmatic { deadline, .. } if now < deadline)
    }

    /// Makes `index` current and scrolls the container to center it.
    ///
    /// Out-of-range indices are ignored. A newer request replaces the settle
    /// deadline of any pending one. Returns whether the request was accepted.
    pub fn scroll_to_index(
        &mut self,
        store: &mut Store,
        container: Option<&mut dyn ScrollContainer>,
        index: usize,
        now: Instant,
    ) -> bool {
        let Some(timeline) = store.state().timeline.clone() else {
            debug!(index, "scroll request before layout; ignoring");
            return false;
        };
        let Some(slot) = timeline.artworks.get(index) else {
            debug!(index, len = timeline.len(), "scroll index out of range; ignoring");
            return false;
        };

        self.phase = ScrollPhase::Programmatic {
            target: index,
            deadline: now + self.settle_delay,
        };

        let state = store.state();
        if state.current_artwork_index != index || !state.index_changed_programmatically {
            store.update(StateUpdate::apply(move |s| ViewState {
                current_artwork_index: index,
                index_changed_programmatically: true,
                ..s.clone()
            }));
        }

        let axis = axis_for(store.state().viewport_width, store.breakpoints());
        let offset = match axis {
            ScrollAxis::Horizontal => slot.horizontal_scroll_point,
            ScrollAxis::Vertical => slot.vertical_scroll_point,
        };
        match container {
            Some(container) => container.scroll_to(axis, offset, ScrollBehavior::Smooth),
            None => debug!(index, "scroll container not mounted"),
        }
        debug!(index, ?axis, offset, "programmatic scroll");
        true
    }

    /// Handles a native scroll tick at `scroll_offset` along the primary axis.
    /// Returns the new current index when it changed.
    pub fn on_scroll(&mut self, store: &mut Store, scroll_offset: f64, now: Instant) -> Option<usize> {
        self.on_tick(store, now);
        if self.is_scrolling_programmatically() {
            return None;
        }
        let state = store.state();
        let timeline = state.timeline.as_ref()?;
        let axis = axis_for(state.viewport_width, store.breakpoints());
        let nearest = nearest_slot(timeline, state, axis, scroll_offset)?;
        if nearest == state.current_artwork_index {
            return None;
        }
        store.update(StateUpdate::apply(move |s| ViewState {
            current_artwork_index: nearest,
            index_changed_programmatically: false,
            ..s.clone()
        }));
        Some(nearest)
    }

    /// Scrolls to the following artwork, wrapping to the first.
    pub fn next(
        &mut self,
        store: &mut Store,
        container: Option<&mut dyn ScrollContainer>,
        now: Instant,
    ) -> bool {
        self.step(store, container, now, |current, len| (current + 1) % len)
    }

    /// Scrolls to the preceding artwork, wrapping to the last.
    pub fn previous(
        &mut self,
        store: &mut Store,
        container: Option<&mut dyn ScrollContainer>,
        now: Instant,
    ) -> bool {
        self.step(store, container, now, |current, len| (current + len - 1) % len)
    }

    fn step(
        &mut self,
        store: &mut Store,
        container: Option<&mut dyn ScrollContainer>,
        now: Instant,
        advance: impl FnOnce(usize, usize) -> usize,
    ) -> bool {
        self.on_tick(store, now);
        if self.is_scrolling_programmatically() {
            return false;
        }
        let len = store.state().timeline_len();
        if len == 0 {
            return false;
        }
        let target = advance(store.state().current_artwork_index.min(len - 1), len);
        self.scroll_to_index(store, container, target, now)
    }
}

/// Index of the slot whose center is closest to the viewport center.
fn nearest_slot(
    timeline: &TimelineResult,
    state: &ViewState,
    axis: ScrollAxis,
    scroll_offset: f64,
) -> Option<usize> {
    let (viewport, mut position, container) = match axis {
        ScrollAxis::Horizontal => (
            state.viewport_width,
            state.desktop_side_width,
            state.artwork_container_width,
        ),
        ScrollAxis::Vertical => (
            state.viewport_height,
            state.artwork_container_height / 2.0,
            state.artwork_container_height,
        ),
    };
    let center = scroll_offset + viewport / 2.0;

    let mut best: Option<(usize, f64)> = None;
    for (index, slot) in timeline.artworks.iter().enumerate() {
        let distance = (position - center).abs();
        if best.is_none_or(|(_, closest)| distance < closest) {
            best = Some((index, distance));
        }
        position += container
            + match axis {
                ScrollAxis::Horizontal => slot.margin_right,
                ScrollAxis::Vertical => slot.margin_bottom,
            };
    }
    best.map(|(index, _)| index)
}
