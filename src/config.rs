use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Configuration {
    /// JSON file holding the artwork collection.
    pub collection_path: PathBuf,
    /// Spacing rules for the timeline engine.
    pub layout: LayoutOptions,
    /// Viewport breakpoints used to derive container measurements.
    pub breakpoints: BreakpointOptions,
    /// Programmatic scroll behaviour.
    pub scroll: ScrollOptions,
    /// Grid view cell sizing.
    pub grid: GridOptions,
    /// Bounded polling for external readiness flags.
    pub readiness: ReadinessOptions,
    /// Optional deterministic seed for the `random` sort order.
    pub shuffle_seed: Option<u64>,
}

impl Configuration {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Ok(serde_yaml::from_str(&s)?)
    }

    /// Validate runtime invariants that cannot be expressed via serde defaults alone.
    pub fn validated(self) -> Result<Self> {
        self.layout.validate()?;
        self.breakpoints.validate()?;
        self.grid.validate()?;
        ensure!(
            self.readiness.max_attempts > 0,
            "readiness.max-attempts must be greater than zero"
        );
        ensure!(
            self.readiness.poll_interval > Duration::ZERO,
            "readiness.poll-interval must be positive"
        );
        Ok(self)
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            collection_path: PathBuf::from("artworks.json"),
            layout: LayoutOptions::default(),
            breakpoints: BreakpointOptions::default(),
            scroll: ScrollOptions::default(),
            grid: GridOptions::default(),
            readiness: ReadinessOptions::default(),
            shuffle_seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LayoutOptions {
    /// Gap added between consecutive artworks per elapsed month.
    pub pixels_per_month: f64,
    /// Spacing between synthesized missing-year markers.
    pub pixels_per_year: f64,
    /// Upper bound on any single inter-artwork margin; `None` leaves it uncapped.
    pub max_margin_px: Option<f64>,
}

impl LayoutOptions {
    pub const DEFAULT_PIXELS_PER_MONTH: f64 = 10.0;
    pub const DEFAULT_PIXELS_PER_YEAR: f64 = 120.0;

    fn validate(&self) -> Result<()> {
        ensure!(
            self.pixels_per_month.is_finite() && self.pixels_per_month >= 0.0,
            "layout.pixels-per-month must be non-negative"
        );
        ensure!(
            self.pixels_per_year.is_finite() && self.pixels_per_year > 0.0,
            "layout.pixels-per-year must be positive"
        );
        if let Some(max) = self.max_margin_px {
            ensure!(
                max.is_finite() && max >= 0.0,
                "layout.max-margin-px must be non-negative"
            );
        }
        Ok(())
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            pixels_per_month: Self::DEFAULT_PIXELS_PER_MONTH,
            pixels_per_year: Self::DEFAULT_PIXELS_PER_YEAR,
            max_margin_px: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BreakpointOptions {
    /// Widest viewport still laid out as mobile (vertical scrolling).
    pub mobile_max_width: u32,
    /// Fixed header/footer height subtracted from the desktop viewport.
    pub chrome_height: u32,
    /// Horizontal margin subtracted from the mobile viewport.
    pub mobile_margin: u32,
}

impl BreakpointOptions {
    fn validate(&self) -> Result<()> {
        ensure!(
            self.mobile_max_width > 0,
            "breakpoints.mobile-max-width must be greater than zero"
        );
        Ok(())
    }
}

impl Default for BreakpointOptions {
    fn default() -> Self {
        Self {
            mobile_max_width: 767,
            chrome_height: 125,
            mobile_margin: 50,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ScrollOptions {
    /// How long user scroll events are ignored after a programmatic scroll.
    #[serde(with = "humantime_serde")]
    pub settle_delay: Duration,
}

impl Default for ScrollOptions {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct GridOptions {
    pub columns_desktop: u32,
    pub columns_mobile: u32,
    /// Gutter between grid cells, in pixels.
    pub gap: u32,
}

impl GridOptions {
    fn validate(&self) -> Result<()> {
        ensure!(
            self.columns_desktop > 0 && self.columns_mobile > 0,
            "grid columns must be greater than zero"
        );
        Ok(())
    }
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            columns_desktop: 3,
            columns_mobile: 1,
            gap: 24,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ReadinessOptions {
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,
    pub max_attempts: u32,
}

impl Default for ReadinessOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(250),
            max_attempts: 20,
        }
    }
}
