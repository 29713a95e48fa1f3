//! Rolling AQI history driven by a bounded random walk.
//!
//! A [`HistoryWindow`] is an ordered, time-ascending run of [`Sample`]s.
//! [`HistoryStore`] produces windows: [`seed`](HistoryStore::seed) builds the
//! initial history, [`advance`](HistoryStore::advance) derives the next window
//! from the previous one by appending one walked sample and trimming the
//! oldest samples off the front.

use serde::{Deserialize, Serialize};

use crate::error::{AqiError, Result};
use crate::random::RandomSource;

/// Lowest AQI a simulated reading may take.
pub const AQI_MIN: i32 = 0;

/// Highest AQI a simulated reading may take.
pub const AQI_MAX: i32 = 300;

/// Largest step the walk takes per sample, in either direction.
pub const WALK_STEP: i32 = 5;

/// Clamp a value into `[AQI_MIN, AQI_MAX]`.
pub fn clamp_aqi(v: i32) -> i32 {
    v.clamp(AQI_MIN, AQI_MAX)
}

/// One timestamped reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// Sequence index; starts at 0 and increases by 1 per sample.
    pub time: u64,
    /// Reading in `[AQI_MIN, AQI_MAX]`.
    pub aqi: i32,
}

/// Time-ordered run of the most recent samples.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HistoryWindow {
    samples: Vec<Sample>,
}

impl HistoryWindow {
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Most recent sample.
    pub fn latest(&self) -> Option<Sample> {
        self.samples.last().copied()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    pub fn aqi_values(&self) -> Vec<i32> {
        self.samples.iter().map(|s| s.aqi).collect()
    }

    pub fn times(&self) -> Vec<u64> {
        self.samples.iter().map(|s| s.time).collect()
    }

    pub fn max_aqi(&self) -> Option<i32> {
        self.samples.iter().map(|s| s.aqi).max()
    }

    pub fn min_aqi(&self) -> Option<i32> {
        self.samples.iter().map(|s| s.aqi).min()
    }
}

impl<'a> IntoIterator for &'a HistoryWindow {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// Produces seeded and advanced history windows.
///
/// The store holds only the random source; windows are values owned by the
/// caller, so each session keeps its own.
#[derive(Debug, Clone)]
pub struct HistoryStore<R> {
    rng: R,
}

impl<R: RandomSource> HistoryStore<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    fn step(&mut self, from: i32) -> i32 {
        let delta = self.rng.next_in_range(-WALK_STEP, WALK_STEP);
        clamp_aqi(from.saturating_add(delta))
    }

    /// Build a `length`-sample history at times `0..length`, starting from
    /// `clamp_aqi(initial)` and walking from there.
    pub fn seed(&mut self, initial: i32, length: usize) -> Result<HistoryWindow> {
        if length < 1 {
            return Err(AqiError::InvalidArgument(
                "seed length must be at least 1".into(),
            ));
        }

        let mut samples = Vec::with_capacity(length);
        let mut aqi = clamp_aqi(initial);
        samples.push(Sample { time: 0, aqi });
        for time in 1..length as u64 {
            aqi = self.step(aqi);
            samples.push(Sample { time, aqi });
        }

        log::debug!("seeded history: {length} samples ending at aqi {aqi}");
        Ok(HistoryWindow { samples })
    }

    /// Append one walked sample after the latest and keep at most `max_len`
    /// of the newest samples. The input window is left untouched.
    pub fn advance(&mut self, window: &HistoryWindow, max_len: usize) -> Result<HistoryWindow> {
        if max_len < 1 {
            return Err(AqiError::InvalidArgument(
                "max_len must be at least 1".into(),
            ));
        }
        let last = window.latest().ok_or_else(|| {
            AqiError::InvalidState("cannot advance an empty window; seed it first".into())
        })?;

        let next = Sample {
            time: last.time + 1,
            aqi: self.step(last.aqi),
        };

        let keep = window.len().min(max_len - 1);
        let skip = window.len() - keep;
        let mut samples = Vec::with_capacity(keep + 1);
        samples.extend_from_slice(&window.samples[skip..]);
        samples.push(next);

        if skip > 0 {
            log::debug!("trimmed {skip} samples to window of {max_len}");
        }
        log::debug!("advanced to t={} aqi={}", next.time, next.aqi);
        Ok(HistoryWindow { samples })
    }
}
