use async_trait::async_trait;
use std::time::Duration;

use crate::{error::GeolocateError, model::Coordinate};

/// Initial map view before any lookup has run.
pub const DEFAULT_CENTER_LATITUDE: f64 = 41.8781;
pub const DEFAULT_CENTER_LONGITUDE: f64 = -87.6298;
pub const DEFAULT_ZOOM: u8 = 6;

/// Decimal places a map adapter keeps when reporting a click position.
pub const CLICK_DECIMALS: u32 = 6;

/// Outbound surface of a map view.
///
/// The workflow only ever drives the view. Click events travel the other way,
/// from the adapter to whoever owns it, rounded via [`Coordinate::rounded`]
/// with [`CLICK_DECIMALS`] before they are handed over.
pub trait MapPort: Send + Sync {
    fn set_center(&self, position: Coordinate);
    fn set_marker(&self, position: Coordinate);
}

/// Options for a single geolocation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeolocateOptions {
    /// Ask the provider for its most precise fix. Advisory only.
    pub high_accuracy: bool,
    /// Hard budget for the attempt; exceeding it is a
    /// [`GeolocateError::TimedOut`].
    pub timeout: Duration,
    /// Oldest cached fix the caller will accept. Zero means a fresh reading.
    pub max_age: Duration,
}

impl Default for GeolocateOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            max_age: Duration::ZERO,
        }
    }
}

/// A device-position source. One call, one outcome.
#[async_trait]
pub trait GeolocationPort: Send + Sync {
    async fn locate(&self, options: &GeolocateOptions) -> Result<Coordinate, GeolocateError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_demand_a_fresh_precise_fix() {
        let options = GeolocateOptions::default();

        assert!(options.high_accuracy);
        assert_eq!(options.timeout, Duration::from_secs(10));
        assert_eq!(options.max_age, Duration::ZERO);
    }

    #[test]
    fn initial_view_centers_on_the_default_city() {
        let center = Coordinate::new(DEFAULT_CENTER_LATITUDE, DEFAULT_CENTER_LONGITUDE)
            .expect("default center must be a valid coordinate");

        assert_eq!(center.latitude(), 41.8781);
        assert_eq!(center.longitude(), -87.6298);
        assert_eq!(DEFAULT_ZOOM, 6);
    }
}
