//! Core library for the `gridcast` CLI.
//!
//! This crate covers the full path from a raw coordinate pair to a forecast:
//! - Coordinate validation and the shared domain models
//! - Grid resolution and forecast retrieval against the NWS API
//! - The lookup workflow state machine (loading, success, error)
//! - Ports for map views and geolocation, plus an IP-based locator
//! - Configuration stored on disk
//!
//! It is used by `gridcast-cli`, but can also be reused by other binaries or
//! services.

pub mod config;
pub mod error;
pub mod geolocate;
pub mod model;
pub mod port;
pub mod source;
pub mod symbol;
pub mod workflow;

pub use config::Config;
pub use error::{ErrorKind, GeolocateError, LookupError};
pub use geolocate::IpLocator;
pub use model::{Coordinate, DISPLAY_PERIODS, ForecastMeta, ForecastPeriod, GridReference};
pub use port::{GeolocateOptions, GeolocationPort, MapPort};
pub use source::{ForecastSource, NwsClient};
pub use symbol::WeatherSymbol;
pub use workflow::{ForecastWorkflow, Phase, WorkflowError, WorkflowEvent, WorkflowState};
