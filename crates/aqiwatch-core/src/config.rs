//! Dashboard configuration.
//!
//! Every field has a default, so a config file only needs to name the values
//! it changes:
//!
//! ```json
//! { "location": "Lahore", "window": 12 }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AqiError, Result};

/// Settings for one dashboard session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Free-text location shown in titles. Display only.
    pub location: String,
    /// First value of the seeded history.
    pub seed_aqi: i32,
    /// Number of samples in the seeded history, before the first trim.
    pub seed_len: usize,
    /// Steady-state window size.
    pub window: usize,
    /// Seconds between automatic refreshes.
    pub refresh_secs: f64,
    /// Whether automatic refreshes start enabled.
    pub live: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            location: "Delhi".to_string(),
            seed_aqi: 120,
            seed_len: 20,
            window: 8,
            refresh_secs: 10.0,
            live: true,
        }
    }
}

impl DashboardConfig {
    /// Load a JSON config file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| AqiError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| AqiError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.seed_len < 1 {
            return Err(AqiError::InvalidArgument(
                "seed_len must be at least 1".into(),
            ));
        }
        if self.window < 1 {
            return Err(AqiError::InvalidArgument("window must be at least 1".into()));
        }
        if !(self.refresh_secs.is_finite() && self.refresh_secs > 0.0) {
            return Err(AqiError::InvalidArgument(format!(
                "refresh_secs must be a positive number, got {}",
                self.refresh_secs
            )));
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs_f64(self.refresh_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_original_dashboard() {
        let c = DashboardConfig::default();
        assert_eq!(c.location, "Delhi");
        assert_eq!(c.seed_aqi, 120);
        assert_eq!(c.seed_len, 20);
        assert_eq!(c.window, 8);
        assert_eq!(c.refresh_interval(), Duration::from_secs(10));
        assert!(c.live);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let zero_window = DashboardConfig {
            window: 0,
            ..Default::default()
        };
        assert!(matches!(
            zero_window.validate(),
            Err(AqiError::InvalidArgument(_))
        ));

        let zero_seed = DashboardConfig {
            seed_len: 0,
            ..Default::default()
        };
        assert!(zero_seed.validate().is_err());

        for refresh_secs in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let c = DashboardConfig {
                refresh_secs,
                ..Default::default()
            };
            assert!(c.validate().is_err(), "accepted refresh {refresh_secs}");
        }
    }

    #[test]
    fn load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"location": "Lahore", "window": 12}}"#).unwrap();

        let c = DashboardConfig::load(file.path()).unwrap();
        assert_eq!(c.location, "Lahore");
        assert_eq!(c.window, 12);
        assert_eq!(c.seed_len, 20);
    }

    #[test]
    fn load_reports_parse_and_read_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            DashboardConfig::load(file.path()),
            Err(AqiError::ConfigParse { .. })
        ));

        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json");
        assert!(matches!(
            DashboardConfig::load(&missing),
            Err(AqiError::ConfigRead { .. })
        ));
    }

    #[test]
    fn load_validates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"window": 0}}"#).unwrap();
        assert!(matches!(
            DashboardConfig::load(file.path()),
            Err(AqiError::InvalidArgument(_))
        ));
    }
}
