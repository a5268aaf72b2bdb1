//! Conversions between the size representations shown next to an artwork.
//!
//! Sizes arrive as free-form strings from the content source, tagged with the
//! unit they were entered in. Nothing here fails: unusable input produces a
//! [`DisplaySize`] with `is_valid == false` and a message for the UI.

use serde::{Deserialize, Serialize};
use tracing::debug;

pub const CM_PER_INCH: f64 = 2.54;

/// Denominators tried when expressing the fractional part of an inch value.
const FRACTION_DENOMINATORS: [u32; 3] = [2, 4, 8];

/// Largest length (in either unit) still shown. Past this an `f64` can no
/// longer tell eighths of an inch apart.
pub const MAX_DISPLAY_LENGTH: f64 = 1e15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementUnit {
    Pixels,
    Metric,
    Imperial,
}

impl MeasurementUnit {
    pub fn from_tag(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pixels" => Some(Self::Pixels),
            "metric" => Some(Self::Metric),
            "imperial" => Some(Self::Imperial),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    Centimeters,
    Inches,
}

/// Converts a length between centimeters and inches.
pub fn convert_units(value: f64, from: LengthUnit, to: LengthUnit) -> f64 {
    match (from, to) {
        (LengthUnit::Centimeters, LengthUnit::Inches) => value / CM_PER_INCH,
        (LengthUnit::Inches, LengthUnit::Centimeters) => value * CM_PER_INCH,
        _ => value,
    }
}

/// Whole inches plus a simplified fraction of at most eighths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImperialParts {
    pub whole: u64,
    pub fraction: Option<String>,
}

/// Splits a decimal inch value into whole inches and the closest half, quarter
/// or eighth. A fraction that rounds up to a full inch carries into `whole`.
pub fn split_inches(inches: f64) -> ImperialParts {
    let inches = if inches.is_finite() { inches.max(0.0) } else { 0.0 };
    let mut whole = inches.trunc() as u64;
    let decimal = inches - inches.trunc();

    let (mut numerator, mut denominator) = (0_u32, 1_u32);
    let mut best_error = f64::INFINITY;
    for candidate in FRACTION_DENOMINATORS {
        let n = (decimal * f64::from(candidate)).round() as u32;
        let error = (decimal - f64::from(n) / f64::from(candidate)).abs();
        if error < best_error {
            best_error = error;
            numerator = n;
            denominator = candidate;
        }
    }

    if numerator == denominator {
        whole = whole.saturating_add(1);
        numerator = 0;
    }

    let fraction = (numerator > 0).then(|| {
        let divisor = gcd(numerator, denominator);
        format!("{}/{}", numerator / divisor, denominator / divisor)
    });
    ImperialParts { whole, fraction }
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a.max(1)
}

/// Parses `"11.5"`, `"5/8"` or `"11 5/8"` into decimal inches.
pub fn parse_imperial(raw: &str) -> Option<f64> {
    let parts: Vec<&str> = raw.split_whitespace().collect();
    let value = match parts.as_slice() {
        [single] if single.contains('/') => parse_fraction(single)?,
        [single] => single.parse::<f64>().ok()?,
        [whole, fraction] => whole.parse::<f64>().ok()? + parse_fraction(fraction)?,
        _ => return None,
    };
    value.is_finite().then_some(value)
}

fn parse_fraction(raw: &str) -> Option<f64> {
    let (num, den) = raw.split_once('/')?;
    let num = num.trim().parse::<f64>().ok()?;
    let den = den.trim().parse::<f64>().ok()?;
    if den == 0.0 {
        return None;
    }
    Some(num / den)
}

fn parse_positive(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

fn within_display_range(value: f64) -> bool {
    value <= MAX_DISPLAY_LENGTH
}

const TOO_LARGE: &str = "Width and height are too large to display";

/// Every representation of an artwork's physical size the UI may show.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplaySize {
    pub width_metric: Option<String>,
    pub height_metric: Option<String>,
    pub width_imperial_inches: Option<String>,
    pub width_imperial_fraction: Option<String>,
    pub height_imperial_inches: Option<String>,
    pub height_imperial_fraction: Option<String>,
    pub width_pixels: Option<String>,
    pub height_pixels: Option<String>,
    pub is_valid: bool,
    pub error: Option<String>,
}

impl DisplaySize {
    fn invalid(message: &str) -> Self {
        Self {
            error: Some(message.to_owned()),
            ..Self::default()
        }
    }

    fn from_lengths(width_cm: f64, height_cm: f64, width_in: f64, height_in: f64) -> Self {
        let width_parts = split_inches(width_in);
        let height_parts = split_inches(height_in);
        Self {
            width_metric: Some(format_centimeters(width_cm)),
            height_metric: Some(format_centimeters(height_cm)),
            width_imperial_inches: Some(width_parts.whole.to_string()),
            width_imperial_fraction: width_parts.fraction,
            height_imperial_inches: Some(height_parts.whole.to_string()),
            height_imperial_fraction: height_parts.fraction,
            is_valid: true,
            ..Self::default()
        }
    }
}

/// Builds the display strings for a width/height pair entered in `unit`
/// (`"pixels"`, `"metric"` or `"imperial"`).
pub fn convert_size_for_display(width: &str, height: &str, unit: &str) -> DisplaySize {
    let Some(unit) = MeasurementUnit::from_tag(unit) else {
        debug!(unit, "unknown measurement unit");
        return DisplaySize::invalid("Unknown measurement unit");
    };

    match unit {
        MeasurementUnit::Pixels => {
            let w = parse_positive(width);
            let h = parse_positive(height);
            DisplaySize {
                width_pixels: w.map(format_pixels),
                height_pixels: h.map(format_pixels),
                is_valid: w.is_some() && h.is_some(),
                error: (w.is_none() || h.is_none())
                    .then(|| "Pixel dimensions must be positive numbers".to_owned()),
                ..DisplaySize::default()
            }
        }
        MeasurementUnit::Metric => {
            let (Some(w_cm), Some(h_cm)) = (parse_positive(width), parse_positive(height)) else {
                return DisplaySize::invalid("Width and height must be positive numbers");
            };
            if !within_display_range(w_cm) || !within_display_range(h_cm) {
                return DisplaySize::invalid(TOO_LARGE);
            }
            DisplaySize::from_lengths(
                w_cm,
                h_cm,
                convert_units(w_cm, LengthUnit::Centimeters, LengthUnit::Inches),
                convert_units(h_cm, LengthUnit::Centimeters, LengthUnit::Inches),
            )
        }
        MeasurementUnit::Imperial => {
            let w_in = parse_imperial(width).filter(|v| *v > 0.0);
            let h_in = parse_imperial(height).filter(|v| *v > 0.0);
            let (Some(w_in), Some(h_in)) = (w_in, h_in) else {
                return DisplaySize::invalid(
                    "Width and height must be decimals, fractions or mixed numbers",
                );
            };
            if !within_display_range(w_in) || !within_display_range(h_in) {
                return DisplaySize::invalid(TOO_LARGE);
            }
            DisplaySize::from_lengths(
                convert_units(w_in, LengthUnit::Inches, LengthUnit::Centimeters),
                convert_units(h_in, LengthUnit::Inches, LengthUnit::Centimeters),
                w_in,
                h_in,
            )
        }
    }
}

fn format_centimeters(cm: f64) -> String {
    let rounded = (cm * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{}cm", rounded as i64)
    } else {
        format!("{rounded:.1}cm")
    }
}

fn format_pixels(px: f64) -> String {
    let rounded = px.round();
    format!("{}px", rounded as i64)
}
