//! Core library for the `weather-relay` service.
//!
//! This crate defines:
//! - Configuration for the listener and the upstream providers
//! - Abstraction over the geocoding/forecast provider, plus the Open-Meteo implementation
//! - The WMO weather-code table
//! - The lookup pipeline that turns a city/state query into a JSON-ready reply
//!
//! It is used by `weather-relay`, but the handler only depends on the
//! [`WeatherProvider`] trait and can be driven from anything.

pub mod codes;
pub mod config;
pub mod handler;
pub mod model;
pub mod provider;

pub use config::{Config, ServerConfig, UpstreamConfig};
pub use handler::{LookupError, Reply, lookup, respond};
pub use model::{CurrentConditions, GeoResult, WeatherQuery, WeatherResponse};
pub use provider::{OpenMeteoProvider, ProviderError, Service, WeatherProvider};
