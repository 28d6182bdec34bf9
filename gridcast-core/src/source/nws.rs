use async_trait::async_trait;
use reqwest::{Client, header};
use serde::Deserialize;
use tracing::debug;

use crate::{
    config::Config,
    error::LookupError,
    model::{Coordinate, ForecastPeriod, GridReference},
};

use super::ForecastSource;

/// Public API root of the National Weather Service.
pub const DEFAULT_BASE_URL: &str = "https://api.weather.gov";

const GEO_JSON: &str = "application/geo+json";

/// Client for the National Weather Service forecast API.
///
/// The service is keyless but expects a User-Agent that identifies the
/// calling application and a way to contact its operator.
#[derive(Debug, Clone)]
pub struct NwsClient {
    http: Client,
    base_url: String,
    user_agent: String,
}

impl NwsClient {
    pub fn new(user_agent: impl Into<String>) -> Result<Self, LookupError> {
        Ok(Self {
            http: Client::builder().build()?,
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: user_agent.into(),
        })
    }

    /// Point the client at a different API root, e.g. a test server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let raw: String = base_url.into();
        self.base_url = raw.trim_end_matches('/').to_string();
        self
    }

    /// Build from stored configuration: contact string plus an optional base
    /// URL override.
    pub fn from_config(config: &Config) -> Result<Self, LookupError> {
        let client = Self::new(config.user_agent())?;

        match &config.base_url {
            Some(url) => Ok(client.with_base_url(url.clone())),
            None => Ok(client),
        }
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.http
            .get(url)
            .header(header::USER_AGENT, &self.user_agent)
            .header(header::ACCEPT, GEO_JSON)
    }
}

#[derive(Debug, Deserialize)]
struct PointsResponse {
    properties: Option<PointsProperties>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PointsProperties {
    cwa: Option<String>,
    grid_x: Option<u32>,
    grid_y: Option<u32>,
    relative_location: Option<RelativeLocation>,
}

#[derive(Debug, Deserialize)]
struct RelativeLocation {
    properties: Option<RelativePlace>,
}

#[derive(Debug, Deserialize)]
struct RelativePlace {
    city: Option<String>,
    state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    properties: Option<ForecastProperties>,
}

#[derive(Debug, Deserialize)]
struct ForecastProperties {
    periods: Option<Vec<ForecastPeriod>>,
}

#[async_trait]
impl ForecastSource for NwsClient {
    async fn resolve_grid(&self, position: Coordinate) -> Result<GridReference, LookupError> {
        let url = format!("{}/points/{}", self.base_url, position);
        debug!(%url, "resolving grid cell");

        let res = self.get(&url).send().await?;

        let status = res.status();
        if !status.is_success() {
            return Err(LookupError::GridStatus { status: status.as_u16() });
        }

        let body = res.text().await?;
        let parsed: PointsResponse = serde_json::from_str(&body).map_err(|e| {
            LookupError::MalformedResponse { context: "points", message: e.to_string() }
        })?;

        let props = parsed.properties.ok_or(LookupError::MissingGridData)?;
        let (Some(office), Some(grid_x), Some(grid_y)) = (props.cwa, props.grid_x, props.grid_y)
        else {
            return Err(LookupError::MissingGridData);
        };

        let relative_location = props.relative_location.and_then(|rel| {
            let place = rel.properties?;
            match (place.city, place.state) {
                (Some(city), Some(state)) => Some(format!("{city}, {state}")),
                (Some(city), None) => Some(city),
                _ => None,
            }
        });

        debug!(office = %office, grid_x, grid_y, "grid cell resolved");

        Ok(GridReference { office, grid_x, grid_y, relative_location })
    }

    async fn fetch_forecast(
        &self,
        grid: &GridReference,
    ) -> Result<Vec<ForecastPeriod>, LookupError> {
        let url = format!(
            "{}/gridpoints/{}/{},{}/forecast",
            self.base_url, grid.office, grid.grid_x, grid.grid_y
        );
        debug!(%url, "fetching gridpoint forecast");

        let res = self.get(&url).send().await?;

        let status = res.status();
        if !status.is_success() {
            return Err(LookupError::ForecastStatus { status: status.as_u16() });
        }

        let body = res.text().await?;
        let parsed: ForecastResponse = serde_json::from_str(&body).map_err(|e| {
            LookupError::MalformedResponse { context: "forecast", message: e.to_string() }
        })?;

        let periods = parsed.properties.and_then(|p| p.periods).unwrap_or_default();
        if periods.is_empty() {
            return Err(LookupError::NoForecastData);
        }

        debug!(count = periods.len(), "forecast periods received");

        Ok(periods)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> NwsClient {
        NwsClient::new("(gridcast test, test@example.com)")
            .expect("client must build")
            .with_base_url(server.uri())
    }

    fn chicago() -> Coordinate {
        Coordinate::new(41.8781, -87.6298).expect("valid pair")
    }

    fn lot_grid() -> GridReference {
        GridReference {
            office: "LOT".to_string(),
            grid_x: 75,
            grid_y: 73,
            relative_location: Some("Chicago, IL".to_string()),
        }
    }

    fn points_body() -> serde_json::Value {
        json!({
            "properties": {
                "cwa": "LOT",
                "gridX": 75,
                "gridY": 73,
                "relativeLocation": {
                    "properties": { "city": "Chicago", "state": "IL" }
                }
            }
        })
    }

    fn forecast_body(count: i32) -> serde_json::Value {
        let periods: Vec<_> = (1..=count)
            .map(|n| {
                json!({
                    "number": n,
                    "name": format!("Period {n}"),
                    "temperature": 75,
                    "temperatureUnit": "F",
                    "windSpeed": "10 mph",
                    "windDirection": "NW",
                    "shortForecast": "Sunny"
                })
            })
            .collect();

        json!({ "properties": { "periods": periods } })
    }

    #[tokio::test]
    async fn resolves_grid_from_points_endpoint() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/points/41.8781,-87.6298"))
            .and(header("accept", "application/geo+json"))
            .and(header("user-agent", "(gridcast test, test@example.com)"))
            .respond_with(ResponseTemplate::new(200).set_body_json(points_body()))
            .mount(&server)
            .await;

        let grid = client_for(&server).resolve_grid(chicago()).await.expect("grid must resolve");

        assert_eq!(grid.office, "LOT");
        assert_eq!(grid.grid_x, 75);
        assert_eq!(grid.grid_y, 73);
        assert_eq!(grid.relative_location.as_deref(), Some("Chicago, IL"));
    }

    #[tokio::test]
    async fn grid_error_carries_the_status_code() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&server)
            .await;

        let err = client_for(&server).resolve_grid(chicago()).await.unwrap_err();

        assert!(matches!(err, LookupError::GridStatus { status: 404 }));
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn missing_grid_fields_are_reported_as_missing_data() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "properties": {} })))
            .mount(&server)
            .await;

        let err = client_for(&server).resolve_grid(chicago()).await.unwrap_err();

        assert!(matches!(err, LookupError::MissingGridData));
    }

    #[tokio::test]
    async fn unparseable_points_payload_is_malformed() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("surprise html"))
            .mount(&server)
            .await;

        let err = client_for(&server).resolve_grid(chicago()).await.unwrap_err();

        assert!(matches!(err, LookupError::MalformedResponse { context: "points", .. }));
    }

    #[tokio::test]
    async fn unreachable_host_surfaces_as_a_transport_error() {
        // Nothing listens on port 1, so the request fails before any HTTP exchange.
        let client = NwsClient::new("(gridcast test, test@example.com)")
            .expect("client must build")
            .with_base_url("http://127.0.0.1:1");

        let err = client.resolve_grid(chicago()).await.unwrap_err();

        assert!(matches!(err, LookupError::Transport(_)));
        assert_eq!(err.kind(), ErrorKind::Network);
    }

    #[tokio::test]
    async fn grid_without_relative_location_still_resolves() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "properties": { "cwa": "LOT", "gridX": 75, "gridY": 73 }
            })))
            .mount(&server)
            .await;

        let grid = client_for(&server).resolve_grid(chicago()).await.expect("grid must resolve");

        assert!(grid.relative_location.is_none());
    }

    #[tokio::test]
    async fn fetches_forecast_periods_in_order() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/gridpoints/LOT/75,73/forecast"))
            .and(header("accept", "application/geo+json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(14)))
            .mount(&server)
            .await;

        let periods =
            client_for(&server).fetch_forecast(&lot_grid()).await.expect("forecast must fetch");

        assert_eq!(periods.len(), 14);
        assert_eq!(periods[0].number, 1);
        assert_eq!(periods[13].number, 14);
    }

    #[tokio::test]
    async fn empty_period_list_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(0)))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_forecast(&lot_grid()).await.unwrap_err();

        assert!(matches!(err, LookupError::NoForecastData));
    }

    #[tokio::test]
    async fn absent_period_list_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "properties": {} })))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_forecast(&lot_grid()).await.unwrap_err();

        assert!(matches!(err, LookupError::NoForecastData));
    }

    #[tokio::test]
    async fn forecast_error_carries_the_status_code() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream sad"))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_forecast(&lot_grid()).await.unwrap_err();

        assert!(matches!(err, LookupError::ForecastStatus { status: 503 }));
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn from_config_applies_contact_and_base_url() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(header("user-agent", "(gridcast, ops@example.com)"))
            .respond_with(ResponseTemplate::new(200).set_body_json(points_body()))
            .mount(&server)
            .await;

        let config = Config {
            contact: Some("ops@example.com".to_string()),
            base_url: Some(server.uri()),
            ..Config::default()
        };

        let client = NwsClient::from_config(&config).expect("client must build");
        let grid = client.resolve_grid(chicago()).await.expect("grid must resolve");

        assert_eq!(grid.office, "LOT");
    }
}
