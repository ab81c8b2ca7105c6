use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

use crate::model::{CurrentConditions, GeoResult};

pub mod open_meteo;

pub use open_meteo::OpenMeteoProvider;

/// Which outbound service a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Geocoding,
    Forecast,
}

impl Service {
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Geocoding => "geocoding",
            Service::Forecast => "forecast",
        }
    }
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{service} request failed with status {status}: {body}")]
    Status {
        service: Service,
        status: u16,
        body: String,
    },

    #[error("{service} request could not be completed: {source}")]
    Transport {
        service: Service,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} response is not valid JSON: {source}")]
    Decode {
        service: Service,
        #[source]
        source: serde_json::Error,
    },

    #[error("{service} response is missing field '{field}'")]
    MissingField {
        service: Service,
        field: &'static str,
    },
}

impl ProviderError {
    /// True when the upstream answered with a non-2xx status.
    pub fn is_upstream_status(&self) -> bool {
        matches!(self, ProviderError::Status { .. })
    }

    pub fn service(&self) -> Service {
        match self {
            ProviderError::Status { service, .. }
            | ProviderError::Transport { service, .. }
            | ProviderError::Decode { service, .. }
            | ProviderError::MissingField { service, .. } => *service,
        }
    }

    /// Short label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::Status { .. } => "status",
            ProviderError::Transport { .. } => "transport",
            ProviderError::Decode { .. } => "decode",
            ProviderError::MissingField { .. } => "missing_field",
        }
    }
}

/// The two outbound lookups the relay composes. The handler only sees this
/// trait, so tests can swap in a stub.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// First match for `city`, or `None` when the provider knows no such place.
    async fn geocode(&self, city: &str) -> Result<Option<GeoResult>, ProviderError>;

    async fn current_conditions(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CurrentConditions, ProviderError>;
}
