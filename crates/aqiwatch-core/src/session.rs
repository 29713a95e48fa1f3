//! Per-session dashboard state.
//!
//! A [`DashboardSession`] is created when a viewer opens the dashboard and
//! dropped when they leave. It owns that viewer's window outright; two
//! sessions never share history.

use crate::config::DashboardConfig;
use crate::display::DashboardView;
use crate::error::{AqiError, Result};
use crate::history::{HistoryStore, HistoryWindow};
use crate::random::RandomSource;

pub struct DashboardSession<R> {
    config: DashboardConfig,
    store: HistoryStore<R>,
    window: HistoryWindow,
    ticks: u64,
    live: bool,
}

impl<R: RandomSource> DashboardSession<R> {
    /// Validate `config`, seed the history, and apply the first refresh so
    /// the window is already at its steady-state size.
    pub fn start(config: DashboardConfig, rng: R) -> Result<Self> {
        config.validate()?;
        let mut store = HistoryStore::new(rng);
        let seeded = store.seed(config.seed_aqi, config.seed_len)?;
        let window = store.advance(&seeded, config.window)?;
        log::info!(
            "session started for {} (seed {} x{}, window {})",
            config.location,
            config.seed_aqi,
            config.seed_len,
            config.window
        );
        Ok(Self {
            live: config.live,
            config,
            store,
            window,
            ticks: 1,
        })
    }

    /// Advance the window by one sample, regardless of the live flag.
    pub fn refresh(&mut self) -> Result<&HistoryWindow> {
        self.window = self.store.advance(&self.window, self.config.window)?;
        self.ticks += 1;
        Ok(&self.window)
    }

    /// Timer entry point: refreshes only while live. Returns whether a new
    /// sample was taken.
    pub fn tick(&mut self) -> Result<bool> {
        if !self.live {
            return Ok(false);
        }
        self.refresh()?;
        Ok(true)
    }

    pub fn window(&self) -> &HistoryWindow {
        &self.window
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Refreshes applied so far, including the one made by `start`.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn set_live(&mut self, live: bool) {
        self.live = live;
    }

    pub fn toggle_live(&mut self) -> bool {
        self.live = !self.live;
        self.live
    }

    pub fn view(&self) -> Result<DashboardView> {
        DashboardView::build(&self.config.location, &self.window, self.ticks, self.live)
            .ok_or_else(|| AqiError::InvalidState("session window is empty".into()))
    }
}
