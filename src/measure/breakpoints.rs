use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Error, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::config::BreakpointOptions;

/// Visible area of the browser window, in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Parses `"1440x900"`.
impl FromStr for Viewport {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .with_context(|| format!("viewport {s:?} must look like WIDTHxHEIGHT"))?;
        let width: f64 = w.trim().parse().context("parsing viewport width")?;
        let height: f64 = h.trim().parse().context("parsing viewport height")?;
        ensure!(
            width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0,
            "viewport dimensions must be positive"
        );
        Ok(Self { width, height })
    }
}

/// Primary scroll direction of the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollAxis {
    Horizontal,
    Vertical,
}

pub fn axis_for(viewport_width: f64, opts: &BreakpointOptions) -> ScrollAxis {
    if viewport_width <= f64::from(opts.mobile_max_width) {
        ScrollAxis::Vertical
    } else {
        ScrollAxis::Horizontal
    }
}

/// Container and padding sizes derived from a viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurements {
    pub viewport: Viewport,
    pub container_width: f64,
    pub container_height: f64,
    pub desktop_side_width: f64,
    pub axis: ScrollAxis,
}

/// Desktop slots are squares as tall as the viewport minus page chrome, padded
/// by half a viewport on each side; mobile slots are squares as wide as the
/// viewport minus its margin.
pub fn measure(viewport: Viewport, opts: &BreakpointOptions) -> Measurements {
    let axis = axis_for(viewport.width, opts);
    let (container, side) = match axis {
        ScrollAxis::Horizontal => (
            (viewport.height - f64::from(opts.chrome_height)).max(0.0),
            (viewport.width / 2.0).max(0.0),
        ),
        ScrollAxis::Vertical => ((viewport.width - f64::from(opts.mobile_margin)).max(0.0), 0.0),
    };
    Measurements {
        viewport,
        container_width: container,
        container_height: container,
        desktop_side_width: side,
        axis,
    }
}
