//! Random integer sources for the simulated sensor walk.
//!
//! [`HistoryStore`](crate::HistoryStore) never touches a global RNG. It asks a
//! [`RandomSource`] for each delta, so production code can use the thread RNG
//! and tests can script the exact walk they want.

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

/// Source of uniformly distributed integers in a closed range.
pub trait RandomSource {
    /// Integer in `lo..=hi`. Callers guarantee `lo <= hi`.
    fn next_in_range(&mut self, lo: i32, hi: i32) -> i32;
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn next_in_range(&mut self, lo: i32, hi: i32) -> i32 {
        (**self).next_in_range(lo, hi)
    }
}

impl<T: RandomSource + ?Sized> RandomSource for Box<T> {
    fn next_in_range(&mut self, lo: i32, hi: i32) -> i32 {
        (**self).next_in_range(lo, hi)
    }
}

/// `Send` source backed by `StdRng`, for sessions held across threads.
pub type StdRngSource = RngSource<StdRng>;

/// Adapter from any [`rand::Rng`] to [`RandomSource`].
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<ThreadRng> {
    /// Thread-local RNG. Not `Send`; use [`RngSource::from_os`] across threads.
    pub fn thread() -> Self {
        Self::new(rand::rng())
    }
}

impl RngSource<StdRng> {
    /// Deterministic generator: the same seed replays the same walk.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// `StdRng` seeded from OS entropy.
    pub fn from_os() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_in_range(&mut self, lo: i32, hi: i32) -> i32 {
        self.rng.random_range(lo..=hi)
    }
}

/// Replays a fixed script of values, cycling when it runs out.
///
/// Each value is clamped into the requested range, so a script of `[+9]`
/// asked for `-5..=5` yields `5`. An empty script always yields `lo`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    values: Vec<i32>,
    pos: usize,
}

impl ScriptedSource {
    pub fn new(values: impl Into<Vec<i32>>) -> Self {
        Self {
            values: values.into(),
            pos: 0,
        }
    }

    /// Always returns `value`.
    pub fn constant(value: i32) -> Self {
        Self::new(vec![value])
    }

    /// Number of values handed out so far.
    pub fn draws(&self) -> usize {
        self.pos
    }
}

impl RandomSource for ScriptedSource {
    fn next_in_range(&mut self, lo: i32, hi: i32) -> i32 {
        let raw = if self.values.is_empty() {
            lo
        } else {
            self.values[self.pos % self.values.len()]
        };
        self.pos += 1;
        raw.clamp(lo, hi)
    }
}
