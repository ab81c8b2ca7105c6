//! The lookup pipeline: validate, geocode, fetch current conditions, translate.
//!
//! Every step is terminal on failure and nothing is retried. [`respond`]
//! collapses all outcomes, including failures, into a status code and a
//! [`WeatherResponse`] body so nothing reaches the transport as a bare error.

use thiserror::Error;

use crate::{
    codes,
    model::{WeatherQuery, WeatherResponse, round_one_decimal},
    provider::{ProviderError, WeatherProvider},
};

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("City and state are required.")]
    MissingParameters,

    #[error("City not found. Please check the city and state names.")]
    CityNotFound,

    /// An upstream answered with a non-2xx status.
    #[error("An API error occurred: {0}")]
    Upstream(#[source] ProviderError),

    /// Transport faults, malformed payloads, missing fields.
    #[error("An unexpected error occurred: {0}")]
    Unexpected(#[source] ProviderError),
}

impl From<ProviderError> for LookupError {
    fn from(err: ProviderError) -> Self {
        if err.is_upstream_status() {
            LookupError::Upstream(err)
        } else {
            LookupError::Unexpected(err)
        }
    }
}

impl LookupError {
    pub fn status_code(&self) -> u16 {
        match self {
            LookupError::MissingParameters => 400,
            LookupError::CityNotFound => 404,
            LookupError::Upstream(_) | LookupError::Unexpected(_) => 500,
        }
    }

    pub fn to_response(&self) -> WeatherResponse {
        let message = self.to_string();
        match self {
            LookupError::CityNotFound => WeatherResponse::Failed { message },
            _ => WeatherResponse::Error { message },
        }
    }

    fn log(&self) {
        match self {
            LookupError::MissingParameters => {
                tracing::debug!("rejected lookup without city/state");
            }
            LookupError::CityNotFound => {
                tracing::info!("geocoding returned no match");
            }
            LookupError::Upstream(err) => {
                tracing::warn!(
                    service = %err.service(),
                    kind = err.kind(),
                    error = %err,
                    "upstream returned an error status"
                );
            }
            LookupError::Unexpected(err) => {
                tracing::error!(
                    service = %err.service(),
                    kind = err.kind(),
                    error = %err,
                    "lookup failed unexpectedly"
                );
            }
        }
    }
}

/// Status code plus the JSON body to send back.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status_code: u16,
    pub body: WeatherResponse,
}

pub async fn lookup(
    provider: &dyn WeatherProvider,
    query: &WeatherQuery,
) -> Result<WeatherResponse, LookupError> {
    let (city, state) = query.validated()?;

    let geo = provider
        .geocode(city)
        .await?
        .ok_or(LookupError::CityNotFound)?;

    tracing::debug!(
        city,
        resolved = %geo.resolved_name,
        latitude = geo.latitude,
        longitude = geo.longitude,
        "city resolved"
    );

    let current = provider
        .current_conditions(geo.latitude, geo.longitude)
        .await?;

    Ok(WeatherResponse::Success {
        city: geo.resolved_name,
        state: state.to_string(),
        temperature: round_one_decimal(current.temperature_f),
        weather_type: codes::describe(current.weather_code).to_string(),
    })
}

pub async fn respond(provider: &dyn WeatherProvider, query: &WeatherQuery) -> Reply {
    match lookup(provider, query).await {
        Ok(body) => Reply {
            status_code: 200,
            body,
        },
        Err(err) => {
            err.log();
            Reply {
                status_code: err.status_code(),
                body: err.to_response(),
            }
        }
    }
}
