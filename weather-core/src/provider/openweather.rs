use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument};

use super::{FetchError, WeatherSource};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the OpenWeather 2.5 API.
///
/// Bodies are handed back as decoded JSON, whatever the HTTP status; the
/// caller inspects `cod`.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Result<Self, FetchError> {
        Self::with_options(api_key, DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }

    pub fn with_options(
        api_key: String,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let http = Client::builder().timeout(timeout).build().map_err(FetchError::Client)?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json(
        &self,
        endpoint: &'static str,
        query: &[(&str, &str)],
    ) -> Result<Value, FetchError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let res = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|source| FetchError::Request { endpoint, source })?;

        let status = res.status();
        debug!(%status, endpoint, "OpenWeather responded");

        let body = res.text().await.map_err(|source| FetchError::Body { endpoint, source })?;

        serde_json::from_str(&body).map_err(|source| FetchError::Decode {
            endpoint,
            status: status.as_u16(),
            body: truncate_body(&body),
            source,
        })
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    #[instrument(skip(self))]
    async fn fetch_current(&self, city: &str) -> Result<Value, FetchError> {
        self.get_json("weather", &[("appid", self.api_key.as_str()), ("q", city)]).await
    }

    #[instrument(skip(self))]
    async fn fetch_forecast(&self, lat: f64, lon: f64) -> Result<Value, FetchError> {
        let lat = lat.to_string();
        let lon = lon.to_string();

        self.get_json(
            "forecast",
            &[("lat", lat.as_str()), ("lon", lon.as_str()), ("appid", self.api_key.as_str())],
        )
        .await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_body_keeps_short_bodies() {
        assert_eq!(truncate_body("oops"), "oops");
    }

    #[test]
    fn truncate_body_cuts_on_char_boundary() {
        let body = "é".repeat(150);
        let cut = truncate_body(&body);

        assert!(cut.ends_with("..."));
        assert!(cut.len() <= 203);
    }

    #[test]
    fn base_url_drops_trailing_slash() {
        let client =
            OpenWeatherClient::with_options("KEY".into(), "http://localhost:1234/", DEFAULT_TIMEOUT)
                .expect("client builds");
        assert_eq!(client.base_url(), "http://localhost:1234");
    }
}
