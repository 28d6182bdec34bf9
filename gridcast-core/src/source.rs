use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::LookupError,
    model::{Coordinate, ForecastPeriod, GridReference},
};

pub mod nws;

pub use nws::NwsClient;

/// The two-step lookup every forecast backend provides.
///
/// Step one resolves a coordinate to a forecast office grid cell; step two
/// fetches the period list for that cell. The steps stay separate so each
/// failure point keeps its own error.
#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    async fn resolve_grid(&self, position: Coordinate) -> Result<GridReference, LookupError>;

    async fn fetch_forecast(
        &self,
        grid: &GridReference,
    ) -> Result<Vec<ForecastPeriod>, LookupError>;
}
