//! # aqiwatch-core
//!
//! **A single-location air quality dashboard, minus the dashboard.**
//!
//! `aqiwatch-core` holds the logic behind the aqiwatch renderers: classifying
//! an AQI value into one of six EPA-style severity bands, and maintaining a
//! bounded rolling history fed by a simulated random-walk sensor.
//!
//! ## Quick Start
//!
//! ```
//! use aqiwatch_core::{HistoryStore, RngSource, SeverityBand, classify};
//!
//! let mut store = HistoryStore::new(RngSource::seeded(7));
//! let window = store.seed(120, 20).unwrap();
//! let window = store.advance(&window, 8).unwrap();
//! assert_eq!(window.len(), 8);
//!
//! let latest = window.latest().unwrap();
//! let class = classify(latest.aqi);
//! println!("{} {} {}", latest.aqi, class.emoji, class.label);
//! assert_eq!(classify(42).band, SeverityBand::Good);
//! ```
//!
//! ## Architecture
//!
//! Trigger → [`DashboardSession::refresh`] → [`HistoryStore::advance`] →
//! [`HistoryWindow`] → [`display`] model → renderer
//!
//! The core never owns a timer. Whatever drives the dashboard (a TUI event
//! loop, an HTTP request, a test) calls `refresh` when it wants a new sample.
//! Randomness comes in through the [`RandomSource`] trait so that every walk
//! can be replayed deterministically.

pub mod band;
pub mod config;
pub mod display;
pub mod error;
pub mod history;
pub mod random;
pub mod session;

pub use band::{BANDS, BandColor, BandInfo, Classification, SeverityBand, classify};
pub use config::DashboardConfig;
pub use display::{
    DashboardView, TILES_PER_ROW, Tile, TrendSegment, decode_tiles, gauge_ratio, hover_text,
    tile_rows, tiles, trend_segments,
};
pub use error::{AqiError, Result};
pub use history::{AQI_MAX, AQI_MIN, HistoryStore, HistoryWindow, Sample, WALK_STEP, clamp_aqi};
pub use random::{RandomSource, RngSource, ScriptedSource, StdRngSource};
pub use session::DashboardSession;

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
