use crate::{Config, provider::openweather::OpenWeatherClient};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;
use thiserror::Error;

pub mod openweather;

/// Failures talking to the upstream API. API-level errors reported through
/// `cod` are not represented here.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("failed to send request to OpenWeather ({endpoint})")]
    Request {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read OpenWeather {endpoint} response body")]
    Body {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("OpenWeather {endpoint} response (status {status}) is not JSON: {body}")]
    Decode {
        endpoint: &'static str,
        status: u16,
        body: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Where weather bodies come from.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    /// Current conditions for a city name.
    async fn fetch_current(&self, city: &str) -> Result<Value, FetchError>;

    /// Multi-day forecast for a coordinate pair.
    async fn fetch_forecast(&self, lat: f64, lon: f64) -> Result<Value, FetchError>;
}

/// Construct the upstream client from config.
pub fn source_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherSource>> {
    let api_key = config.weather_api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No weather API key configured.\n\
                 Hint: run `weather configure` or set WEATHER_API_KEY."
        )
    })?;

    let client =
        OpenWeatherClient::with_options(api_key.to_owned(), config.base_url(), config.timeout())?;

    Ok(Box::new(client))
}
