use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const VOLUME_SUFFIXES: [&str; 6] = ["", "K", "M", "G", "T", "P"];

/// Formats a value the way value tags and legend suffixes show it.
#[must_use]
pub fn format_value(value: f64) -> String {
    format!("{value:.2}")
}

/// Volume axis labels scaled by the magnitude of the largest volume.
///
/// With a maximum of `2_500_000` every label is expressed in millions
/// (`"1M"`, `"2M"`); values above `1.2 * max` print nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeFormatter {
    max_volume: f64,
    magnitude: usize,
}

impl VolumeFormatter {
    #[must_use]
    pub fn new(max_volume: f64) -> Self {
        let mut magnitude = 0;
        let mut scaled = max_volume;
        while scaled.is_finite() && scaled.abs() >= 1000.0 && magnitude + 1 < VOLUME_SUFFIXES.len()
        {
            magnitude += 1;
            scaled /= 1000.0;
        }
        Self {
            max_volume,
            magnitude,
        }
    }

    #[must_use]
    pub fn max_volume(self) -> f64 {
        self.max_volume
    }

    #[must_use]
    pub fn suffix(self) -> &'static str {
        VOLUME_SUFFIXES[self.magnitude]
    }

    #[must_use]
    pub fn divisor(self) -> f64 {
        1000f64.powi(self.magnitude as i32)
    }

    #[must_use]
    pub fn format(self, value: f64) -> String {
        if !value.is_finite() || value > self.max_volume * 1.2 {
            return String::new();
        }
        let scaled = (value / self.divisor()).trunc() as i64;
        format!("{scaled}{}", self.suffix())
    }
}

/// Maps bar-index coordinates back to real timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDateFormatter {
    timestamps: Vec<DateTime<Utc>>,
    pattern: String,
}

impl IndexDateFormatter {
    pub const DEFAULT_PATTERN: &'static str = "%Y-%m-%d";

    #[must_use]
    pub fn new(timestamps: Vec<DateTime<Utc>>, pattern: impl Into<String>) -> Self {
        Self {
            timestamps,
            pattern: pattern.into(),
        }
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub fn format(&self, x: f64) -> String {
        if !x.is_finite() {
            return String::new();
        }
        let index = x.round();
        if index < 0.0 || index >= self.timestamps.len() as f64 {
            return String::new();
        }
        self.timestamps[index as usize]
            .format(&self.pattern)
            .to_string()
    }
}
