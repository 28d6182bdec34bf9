use thiserror::Error;

/// Coarse error classification surfaced to users.
///
/// Internal errors stay granular; this is the bucket a renderer keys its
/// styling and wording on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Network,
    Permission,
    Timeout,
    Geolocation,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Network => "network",
            ErrorKind::Permission => "permission",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Geolocation => "geolocation",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a geolocation attempt, classified the way position providers
/// report it.
#[derive(Debug, Error)]
pub enum GeolocateError {
    #[error("Location access was denied.")]
    PermissionDenied,

    #[error("Could not determine your location: {0}")]
    Unavailable(String),

    #[error("The location request timed out.")]
    TimedOut,
}

impl GeolocateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GeolocateError::PermissionDenied => ErrorKind::Permission,
            GeolocateError::Unavailable(_) => ErrorKind::Geolocation,
            GeolocateError::TimedOut => ErrorKind::Timeout,
        }
    }
}

/// Anything that can go wrong between a raw coordinate pair and a forecast.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error(
        "Invalid coordinates ({latitude}, {longitude}): latitude must be between -90 and 90, longitude between -180 and 180."
    )]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[error("Grid lookup failed with status {status}.")]
    GridStatus { status: u16 },

    #[error("Forecast request failed with status {status}.")]
    ForecastStatus { status: u16 },

    #[error("No grid data is available for this location.")]
    MissingGridData,

    #[error("No forecast periods were returned for this grid cell.")]
    NoForecastData,

    #[error("Failed to parse the {context} response: {message}")]
    MalformedResponse { context: &'static str, message: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error(transparent)]
    Geolocate(#[from] GeolocateError),
}

impl LookupError {
    /// Collapse to the coarse user-facing kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LookupError::InvalidCoordinate { .. } => ErrorKind::Validation,
            LookupError::GridStatus { .. }
            | LookupError::ForecastStatus { .. }
            | LookupError::MissingGridData
            | LookupError::NoForecastData
            | LookupError::MalformedResponse { .. }
            | LookupError::Transport(_) => ErrorKind::Network,
            LookupError::Geolocate(inner) => inner.kind(),
        }
    }
}
