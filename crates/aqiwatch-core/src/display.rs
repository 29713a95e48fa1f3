//! Renderer-neutral presentation model.
//!
//! Builds the pieces every dashboard front end draws (colored reading
//! tiles, band-colored trend segments, the gauge fill) without committing to a
//! drawing library. Values stay integers all the way to [`Tile::text`].

use std::num::ParseIntError;

use serde::Serialize;

use crate::band::{BandColor, Classification, classify};
use crate::history::{AQI_MAX, HistoryWindow, Sample, clamp_aqi};

/// Readings per tile row.
pub const TILES_PER_ROW: usize = 4;

/// One colored reading tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tile {
    pub aqi: i32,
    pub color: BandColor,
    /// Text drawn on the tile.
    pub text: String,
    /// Tooltip shown when the reading is hovered or selected.
    pub hover: String,
}

impl Tile {
    pub fn new(aqi: i32) -> Self {
        Self {
            aqi,
            color: classify(aqi).color,
            text: aqi.to_string(),
            hover: hover_text(aqi),
        }
    }
}

/// One tile per sample, oldest first.
pub fn tiles(window: &HistoryWindow) -> Vec<Tile> {
    window.iter().map(|s| Tile::new(s.aqi)).collect()
}

/// Tiles grouped into rows of `per_row` (the last row may be shorter).
pub fn tile_rows(window: &HistoryWindow, per_row: usize) -> Vec<Vec<Tile>> {
    tiles(window)
        .chunks(per_row.max(1))
        .map(|row| row.to_vec())
        .collect()
}

/// Read the AQI values back from displayed tile text.
pub fn decode_tiles(tiles: &[Tile]) -> Result<Vec<i32>, ParseIntError> {
    tiles.iter().map(|t| t.text.parse()).collect()
}

/// Line segment between two consecutive samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendSegment {
    pub from: Sample,
    pub to: Sample,
    /// Band color of the segment's starting sample.
    pub color: BandColor,
}

pub fn trend_segments(window: &HistoryWindow) -> Vec<TrendSegment> {
    window
        .samples()
        .windows(2)
        .map(|pair| TrendSegment {
            from: pair[0],
            to: pair[1],
            color: classify(pair[0].aqi).color,
        })
        .collect()
}

/// Fraction of the AQI scale filled by `aqi`, in `[0, 1]`.
pub fn gauge_ratio(aqi: i32) -> f64 {
    f64::from(clamp_aqi(aqi)) / f64::from(AQI_MAX)
}

/// Tooltip-style description of a reading.
pub fn hover_text(aqi: i32) -> String {
    let c = classify(aqi);
    format!("AQI: {aqi} | Status: {} | Suggestion: {}", c.label, c.advisory)
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub location: String,
    pub current: Sample,
    pub classification: Classification,
    pub max: i32,
    pub min: i32,
    pub samples: Vec<Sample>,
    pub tiles: Vec<Tile>,
    pub segments: Vec<TrendSegment>,
    pub gauge: f64,
    /// Refreshes applied since session start.
    pub tick: u64,
    pub live: bool,
}

impl DashboardView {
    /// Build the view for a window. Returns `None` for an empty window.
    pub fn build(location: &str, window: &HistoryWindow, tick: u64, live: bool) -> Option<Self> {
        let current = window.latest()?;
        Some(Self {
            location: location.to_string(),
            current,
            classification: classify(current.aqi),
            max: window.max_aqi()?,
            min: window.min_aqi()?,
            samples: window.samples().to_vec(),
            tiles: tiles(window),
            segments: trend_segments(window),
            gauge: gauge_ratio(current.aqi),
            tick,
            live,
        })
    }

    /// Title line, e.g. `"Current AQI - Delhi 😐"`.
    pub fn headline(&self) -> String {
        format!(
            "Current AQI - {} {}",
            self.location, self.classification.emoji
        )
    }
}
