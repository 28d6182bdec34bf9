use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::LookupError;

/// How many forecast periods are shown to the user. The full period count is
/// still reported via [`ForecastMeta::period_count`].
pub const DISPLAY_PERIODS: usize = 7;

/// A validated latitude/longitude pair in decimal degrees.
///
/// Construction is the validation gate: once a `Coordinate` exists, every
/// consumer may assume both components are finite and in range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Validate a raw pair. Latitude must lie in [-90, 90] and longitude in
    /// [-180, 180]; NaN and infinities are rejected.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, LookupError> {
        let lat_ok = latitude.is_finite() && (-90.0..=90.0).contains(&latitude);
        let lng_ok = longitude.is_finite() && (-180.0..=180.0).contains(&longitude);

        if lat_ok && lng_ok {
            Ok(Self { latitude, longitude })
        } else {
            Err(LookupError::InvalidCoordinate { latitude, longitude })
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Round both components to `decimals` places. Map adapters round click
    /// positions this way before reporting them.
    pub fn rounded(&self, decimals: u32) -> Self {
        let factor = 10f64.powi(decimals as i32);
        Self {
            latitude: (self.latitude * factor).round() / factor,
            longitude: (self.longitude * factor).round() / factor,
        }
    }
}

impl fmt::Display for Coordinate {
    /// `lat,lng`, the form the points endpoint expects in its path.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// A forecast office grid cell, resolved from a coordinate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridReference {
    /// Forecast office identifier, e.g. "LOT".
    pub office: String,
    pub grid_x: u32,
    pub grid_y: u32,
    /// "City, ST" for the nearest named place, when the service provides one.
    pub relative_location: Option<String>,
}

/// One named span of the forecast, as served by the gridpoint endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPeriod {
    pub number: i32,
    pub name: String,
    pub temperature: f64,
    pub temperature_unit: String,
    pub wind_speed: String,
    pub wind_direction: String,
    pub short_forecast: String,

    #[serde(default)]
    pub start_time: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub end_time: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub is_daytime: Option<bool>,
    #[serde(default)]
    pub detailed_forecast: Option<String>,
}

/// Summary of a completed lookup: which grid cell answered and how many
/// periods the full response carried. Display truncation never touches this
/// count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastMeta {
    pub office: String,
    pub grid_x: u32,
    pub grid_y: u32,
    pub period_count: usize,
    pub relative_location: Option<String>,
}

impl ForecastMeta {
    pub fn new(grid: &GridReference, period_count: usize) -> Self {
        Self {
            office: grid.office.clone(),
            grid_x: grid.grid_x,
            grid_y: grid.grid_y,
            period_count,
            relative_location: grid.relative_location.clone(),
        }
    }
}
