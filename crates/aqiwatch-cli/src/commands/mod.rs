pub mod bands;
pub mod monitor;
pub mod server;
pub mod snapshot;
pub mod watch;

use aqiwatch_core::{AqiError, DashboardConfig, DashboardSession, RandomSource, RngSource};

/// Session flags shared by every command that runs a dashboard.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct SessionArgs {
    /// Location label shown in titles (display only)
    #[arg(long)]
    pub location: Option<String>,

    /// Seconds between automatic refreshes
    #[arg(long)]
    pub refresh: Option<f64>,

    /// Number of readings kept in the rolling window
    #[arg(long)]
    pub window: Option<usize>,

    /// AQI the seeded history starts from
    #[arg(long)]
    pub seed_aqi: Option<i32>,

    /// Length of the seeded history before the first trim
    #[arg(long)]
    pub seed_len: Option<usize>,

    /// Fixed RNG seed for a reproducible walk
    #[arg(long)]
    pub rng_seed: Option<u64>,

    /// Start with automatic refresh paused
    #[arg(long)]
    pub paused: bool,
}

/// Merge the config file (or defaults) with command-line overrides.
pub fn resolve_config(
    config_path: Option<&str>,
    args: &SessionArgs,
) -> Result<DashboardConfig, AqiError> {
    let mut config = match config_path {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };
    if let Some(location) = &args.location {
        config.location = location.clone();
    }
    if let Some(refresh) = args.refresh {
        config.refresh_secs = refresh;
    }
    if let Some(window) = args.window {
        config.window = window;
    }
    if let Some(seed_aqi) = args.seed_aqi {
        config.seed_aqi = seed_aqi;
    }
    if let Some(seed_len) = args.seed_len {
        config.seed_len = seed_len;
    }
    if args.paused {
        config.live = false;
    }
    config.validate()?;
    Ok(config)
}

/// Random source for a CLI session: seeded when asked, the thread RNG otherwise.
pub fn make_rng(args: &SessionArgs) -> Box<dyn RandomSource> {
    match args.rng_seed {
        Some(seed) => Box::new(RngSource::seeded(seed)),
        None => Box::new(RngSource::thread()),
    }
}

/// Resolve config and start a session, exiting with a message on failure.
pub fn start_session(
    config_path: Option<&str>,
    args: &SessionArgs,
) -> DashboardSession<Box<dyn RandomSource>> {
    let result = resolve_config(config_path, args)
        .and_then(|config| DashboardSession::start(config, make_rng(args)));
    match result {
        Ok(session) => session,
        Err(e) => fail(e),
    }
}

/// Print an error and exit 1.
pub fn fail(e: impl std::fmt::Display) -> ! {
    eprintln!("error: {e}");
    std::process::exit(1);
}
