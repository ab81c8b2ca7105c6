use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    config::UpstreamConfig,
    model::{CurrentConditions, GeoResult},
};

use super::{ProviderError, Service, WeatherProvider};

/// Open-Meteo geocoding + forecast APIs. Neither needs an API key.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    geocoding_url: String,
    forecast_url: String,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to build HTTP client for Open-Meteo")?;

        Ok(Self {
            geocoding_url: config.geocoding_url.clone(),
            forecast_url: config.forecast_url.clone(),
            http,
        })
    }

    async fn get_body(
        &self,
        service: Service,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<String, ProviderError> {
        let transport = |source| ProviderError::Transport { service, source };

        let res = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(transport)?;

        let status = res.status();
        let body = res.text().await.map_err(transport)?;

        if !status.is_success() {
            return Err(ProviderError::Status {
                service,
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        Ok(body)
    }
}

#[derive(Debug, Deserialize)]
struct OmGeoEntry {
    latitude: Option<f64>,
    longitude: Option<f64>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmGeoResponse {
    // Omitted entirely by the API when nothing matches.
    results: Option<Vec<OmGeoEntry>>,
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    temperature_2m: Option<f64>,
    weather_code: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    current: Option<OmCurrent>,
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn geocode(&self, city: &str) -> Result<Option<GeoResult>, ProviderError> {
        const SERVICE: Service = Service::Geocoding;
        tracing::debug!(city, "geocoding lookup");

        let body = self
            .get_body(
                SERVICE,
                &self.geocoding_url,
                &[
                    ("name", city),
                    ("count", "1"),
                    ("language", "en"),
                    ("format", "json"),
                ],
            )
            .await?;

        let parsed: OmGeoResponse = serde_json::from_str(&body)
            .map_err(|source| ProviderError::Decode { service: SERVICE, source })?;

        let Some(first) = parsed.results.and_then(|r| r.into_iter().next()) else {
            return Ok(None);
        };

        let missing = |field| ProviderError::MissingField { service: SERVICE, field };

        Ok(Some(GeoResult {
            latitude: first.latitude.ok_or_else(|| missing("results[0].latitude"))?,
            longitude: first.longitude.ok_or_else(|| missing("results[0].longitude"))?,
            resolved_name: first.name.ok_or_else(|| missing("results[0].name"))?,
        }))
    }

    async fn current_conditions(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CurrentConditions, ProviderError> {
        const SERVICE: Service = Service::Forecast;
        tracing::debug!(latitude, longitude, "current conditions lookup");

        let latitude = latitude.to_string();
        let longitude = longitude.to_string();

        let body = self
            .get_body(
                SERVICE,
                &self.forecast_url,
                &[
                    ("latitude", latitude.as_str()),
                    ("longitude", longitude.as_str()),
                    ("current", "temperature_2m,weather_code"),
                    ("temperature_unit", "fahrenheit"),
                    ("timezone", "auto"),
                ],
            )
            .await?;

        let parsed: OmForecastResponse = serde_json::from_str(&body)
            .map_err(|source| ProviderError::Decode { service: SERVICE, source })?;

        let missing = |field| ProviderError::MissingField { service: SERVICE, field };

        let current = parsed.current.ok_or_else(|| missing("current"))?;

        Ok(CurrentConditions {
            temperature_f: current
                .temperature_2m
                .ok_or_else(|| missing("current.temperature_2m"))?,
            weather_code: current
                .weather_code
                .ok_or_else(|| missing("current.weather_code"))?,
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
