use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::{
    error::GeolocateError,
    model::Coordinate,
    port::{GeolocateOptions, GeolocationPort},
};

/// Free IP-geolocation endpoint; coarse but keyless.
pub const DEFAULT_ENDPOINT: &str = "http://ip-api.com/json";

/// Resolves the device position from its public IP address.
///
/// Accuracy is city-level at best, so `high_accuracy` is advisory only here.
/// Nothing is ever cached; every call queries the service again, which
/// satisfies any `max_age`.
#[derive(Debug, Clone)]
pub struct IpLocator {
    http: Client,
    endpoint: String,
}

impl IpLocator {
    pub fn new() -> Result<Self, GeolocateError> {
        let http =
            Client::builder().build().map_err(|e| GeolocateError::Unavailable(e.to_string()))?;

        Ok(Self { http, endpoint: DEFAULT_ENDPOINT.to_string() })
    }

    /// Query a different endpoint, e.g. a test server.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
    message: Option<String>,
}

#[async_trait]
impl GeolocationPort for IpLocator {
    async fn locate(&self, options: &GeolocateOptions) -> Result<Coordinate, GeolocateError> {
        debug!(endpoint = %self.endpoint, "requesting IP position");

        let res = self
            .http
            .get(&self.endpoint)
            .timeout(options.timeout)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = res.status();
        if status == StatusCode::FORBIDDEN || status == StatusCode::UNAUTHORIZED {
            return Err(GeolocateError::PermissionDenied);
        }
        if !status.is_success() {
            return Err(GeolocateError::Unavailable(format!(
                "service answered with status {status}"
            )));
        }

        let body: IpApiResponse =
            res.json().await.map_err(|e| GeolocateError::Unavailable(e.to_string()))?;

        if body.status != "success" {
            let reason = body.message.unwrap_or_else(|| "unknown position".to_string());
            return Err(GeolocateError::Unavailable(reason));
        }

        let (Some(lat), Some(lon)) = (body.lat, body.lon) else {
            return Err(GeolocateError::Unavailable("response carried no coordinates".to_string()));
        };

        Coordinate::new(lat, lon).map_err(|_| {
            GeolocateError::Unavailable("service returned an out-of-range position".to_string())
        })
    }
}

fn classify_transport(error: reqwest::Error) -> GeolocateError {
    if error.is_timeout() {
        GeolocateError::TimedOut
    } else {
        GeolocateError::Unavailable(error.to_string())
    }
}
