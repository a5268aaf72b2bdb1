use std::fmt;

use anyhow::{Result, anyhow};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// A single artwork as delivered by the content source.
///
/// Records are never mutated once loaded; the layout engine only wraps them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtworkRecord {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(deserialize_with = "deserialize_date")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub fields: ArtworkFields,
}

impl ArtworkRecord {
    pub fn year(&self) -> i32 {
        self.date.year()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtworkFields {
    #[serde(default)]
    pub media: Option<MediaDimensions>,
    #[serde(default)]
    pub aspect_ratio: Option<f64>,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub size: SizeClass,
    #[serde(default, deserialize_with = "one_or_many")]
    pub series: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub section: Vec<String>,
}

impl ArtworkFields {
    /// Width over height, preferring measured media dimensions, then the
    /// fallback proportion, then square.
    pub fn aspect_ratio(&self) -> f64 {
        if let Some(media) = self.media {
            if media.width > 0 && media.height > 0 {
                return f64::from(media.width) / f64::from(media.height);
            }
        }
        self.aspect_ratio
            .filter(|ratio| ratio.is_finite() && *ratio > 0.0)
            .unwrap_or(1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaDimensions {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
    #[default]
    Square,
}

impl Orientation {
    /// Unknown tags map to [`Orientation::Square`].
    pub fn from_tag(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "portrait" => Self::Portrait,
            "landscape" => Self::Landscape,
            _ => Self::Square,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Portrait => "portrait",
            Self::Landscape => "landscape",
            Self::Square => "square",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Orientation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Self::from_tag).unwrap_or_default())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    Xl,
    #[default]
    Lg,
    Md,
    Sm,
}

impl SizeClass {
    /// Unknown tags map to [`SizeClass::Lg`].
    pub fn from_tag(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "xl" => Self::Xl,
            "md" => Self::Md,
            "sm" => Self::Sm,
            _ => Self::Lg,
        }
    }
}

impl<'de> Deserialize<'de> for SizeClass {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Self::from_tag).unwrap_or_default())
    }
}

/// Parses RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM:SS` timestamps (taken as
/// UTC) and bare `YYYY-MM-DD` dates.
pub fn parse_date(raw: &str) -> Result<DateTime<Utc>> {
    let trimmed = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    Err(anyhow!("unrecognized artwork date {trimmed:?}"))
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDate {
        EpochMillis(i64),
        Text(String),
    }

    match RawDate::deserialize(deserializer)? {
        RawDate::EpochMillis(ms) => DateTime::from_timestamp_millis(ms)
            .ok_or_else(|| de::Error::custom(format!("epoch millis {ms} out of range"))),
        RawDate::Text(text) => parse_date(&text).map_err(de::Error::custom),
    }
}

// Taxonomy fields arrive either as a single string or as a list.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(tag)) if tag.trim().is_empty() => Vec::new(),
        Some(OneOrMany::One(tag)) => vec![tag],
        Some(OneOrMany::Many(tags)) => tags,
    })
}
