//! AQI severity bands and classification.
//!
//! Every per-band attribute lives in the single [`BANDS`] table. Colors,
//! advisories, emoji and legend ranges are all read from it, so there is only
//! one place where the band boundaries are written down.

use serde::Serialize;

/// EPA-style AQI severity band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityBand {
    /// 0-50.
    Good,
    /// 51-100.
    Moderate,
    /// 101-150.
    UnhealthyForSensitive,
    /// 151-200.
    Unhealthy,
    /// 201-300.
    VeryUnhealthy,
    /// Above 300.
    Hazardous,
}

impl SeverityBand {
    /// All bands in increasing severity.
    pub const ALL: [SeverityBand; 6] = [
        Self::Good,
        Self::Moderate,
        Self::UnhealthyForSensitive,
        Self::Unhealthy,
        Self::VeryUnhealthy,
        Self::Hazardous,
    ];

    /// Table row for this band.
    pub fn info(self) -> &'static BandInfo {
        // BANDS is ordered like ALL, so the discriminant is the row index.
        &BANDS[self as usize]
    }

    pub fn label(self) -> &'static str {
        self.info().label
    }

    /// Inclusive lower bound of the band. `Good` reports 0 even though
    /// negative inputs also classify as `Good`.
    pub fn lower_bound(self) -> i32 {
        match self as usize {
            0 => 0,
            i => BANDS[i - 1].upper.map_or(0, |u| u + 1),
        }
    }

    /// Legend range such as `"51-100"` or `"300+"`.
    pub fn range_label(self) -> String {
        let info = self.info();
        match info.upper {
            Some(upper) => format!("{}-{}", self.lower_bound(), upper),
            None => format!("{}+", self.lower_bound() - 1),
        }
    }
}

impl std::fmt::Display for SeverityBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Display color token for a band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BandColor {
    Green,
    Yellow,
    Orange,
    Red,
    Purple,
    Maroon,
}

impl BandColor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Orange => "orange",
            Self::Red => "red",
            Self::Purple => "purple",
            Self::Maroon => "maroon",
        }
    }

    /// Whether text drawn on this color should be dark for contrast.
    pub fn wants_dark_text(self) -> bool {
        matches!(self, Self::Yellow)
    }
}

impl std::fmt::Display for BandColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the band table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandInfo {
    /// Inclusive upper bound, `None` for the open-ended last band.
    pub upper: Option<i32>,
    pub band: SeverityBand,
    /// Human-readable name.
    pub label: &'static str,
    pub color: BandColor,
    /// Health advice shown next to the current reading.
    pub advisory: &'static str,
    /// Face shown beside the current reading.
    pub emoji: &'static str,
    /// Colored dot used in the categories list.
    pub marker: &'static str,
}

/// Band table, ordered by upper bound. Lookup is first match in order.
pub static BANDS: [BandInfo; 6] = [
    BandInfo {
        upper: Some(50),
        band: SeverityBand::Good,
        label: "Good",
        color: BandColor::Green,
        advisory: "Air quality is good. Enjoy outdoor activities!",
        emoji: "🌞",
        marker: "🟢",
    },
    BandInfo {
        upper: Some(100),
        band: SeverityBand::Moderate,
        label: "Moderate",
        color: BandColor::Yellow,
        advisory: "Air quality is moderate. Sensitive people may reduce prolonged outdoor exertion.",
        emoji: "😊",
        marker: "🟡",
    },
    BandInfo {
        upper: Some(150),
        band: SeverityBand::UnhealthyForSensitive,
        label: "Unhealthy for Sensitive Groups",
        color: BandColor::Orange,
        advisory: "Sensitive groups should limit outdoor activities.",
        emoji: "😐",
        marker: "🟠",
    },
    BandInfo {
        upper: Some(200),
        band: SeverityBand::Unhealthy,
        label: "Unhealthy",
        color: BandColor::Red,
        advisory: "Air quality is unhealthy. Wear a mask if going outside.",
        emoji: "😷",
        marker: "🔴",
    },
    BandInfo {
        upper: Some(300),
        band: SeverityBand::VeryUnhealthy,
        label: "Very Unhealthy",
        color: BandColor::Purple,
        advisory: "Avoid outdoor activities. Wear a proper mask if necessary.",
        emoji: "🤢",
        marker: "🟣",
    },
    BandInfo {
        upper: None,
        band: SeverityBand::Hazardous,
        label: "Hazardous",
        color: BandColor::Maroon,
        advisory: "Stay indoors! Air quality is hazardous.",
        emoji: "☠️",
        marker: "🟤",
    },
];

/// Result of classifying one AQI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub band: SeverityBand,
    pub label: &'static str,
    pub color: BandColor,
    pub advisory: &'static str,
    pub emoji: &'static str,
}

impl From<&BandInfo> for Classification {
    fn from(info: &BandInfo) -> Self {
        Self {
            band: info.band,
            label: info.label,
            color: info.color,
            advisory: info.advisory,
            emoji: info.emoji,
        }
    }
}

/// Classify an AQI value. Total over all integers; values are not clamped.
pub fn classify(aqi: i32) -> Classification {
    let info = BANDS
        .iter()
        .find(|b| b.upper.is_none_or(|upper| aqi <= upper))
        .unwrap_or(&BANDS[BANDS.len() - 1]);
    Classification::from(info)
}
