//! Per-session view model driving the fetch cycle.
//!
//! A [`Session`] holds the city input and the "weather requested" flag. Each
//! [`Session::refresh`] runs at most two sequential upstream calls: current
//! conditions, then the forecast for the coordinates they report.

use std::fmt::Display;

use chrono::TimeZone;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    config::DEFAULT_CITY,
    forecast::render_week,
    icon::icon_for,
    model::{
        ForecastColumn, SnapshotError, UpstreamStatus, WeatherSnapshot, capitalize,
        format_celsius, title_case,
    },
    provider::{FetchError, WeatherSource},
};

pub const CITY_NOT_FOUND: &str = "City not found. Please try another location.";
pub const FORECAST_ERROR_PREFIX: &str = "Error in displaying weekly forecast: ";

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error("OpenWeather reported error {code}: {message}")]
    Upstream { code: u16, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Fetching,
    Displayed,
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metrics {
    pub temperature: String,
    pub humidity: String,
    pub wind_speed: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Banner {
    pub icon: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdvancedDetails {
    pub pressure: String,
    pub visibility: String,
    pub cloud_cover: String,
    pub feels_like: String,
}

/// What the forecast strip shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum ForecastPanel {
    Columns(Vec<ForecastColumn>),
    /// Rendering failed; the message is user-facing.
    Error(String),
    /// The forecast endpoint reported 404.
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardView {
    pub title: String,
    pub metrics: Metrics,
    pub banner: Banner,
    pub forecast: ForecastPanel,
    pub details: AdvancedDetails,
}

impl DashboardView {
    pub fn build(city: &str, snap: &WeatherSnapshot, forecast: ForecastPanel) -> Self {
        Self {
            title: format!("Weather in {}", title_case(city)),
            metrics: Metrics {
                temperature: format_celsius(snap.temperature_k),
                humidity: format!("{}%", snap.humidity_pct),
                wind_speed: format!("{} m/s", snap.wind_speed_mps),
            },
            banner: Banner {
                icon: icon_for(&snap.description).to_string(),
                description: capitalize(&snap.description),
            },
            forecast,
            details: AdvancedDetails {
                pressure: format!("{} hPa", snap.pressure_hpa),
                visibility: snap
                    .visibility_m
                    .map_or_else(|| "N/A".to_string(), |v| format!("{v}m")),
                cloud_cover: format!("{}%", snap.cloud_cover_pct),
                feels_like: format_celsius(snap.feels_like_k),
            },
        }
    }
}

/// Result of one completed fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum Outcome {
    Displayed(DashboardView),
    NotFound { message: String },
}

#[derive(Debug, Clone)]
pub struct Session {
    city: String,
    weather_requested: bool,
    state: SessionState,
    last_outcome: Option<Outcome>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_CITY)
    }
}

impl Session {
    pub fn new(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            weather_requested: false,
            state: SessionState::Idle,
            last_outcome: None,
        }
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn set_city(&mut self, city: impl Into<String>) {
        self.city = city.into();
    }

    pub fn weather_requested(&self) -> bool {
        self.weather_requested
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn last_outcome(&self) -> Option<&Outcome> {
        self.last_outcome.as_ref()
    }

    /// The "Get Weather" press. The flag stays set for the rest of the session.
    pub fn request_weather(&mut self) {
        self.weather_requested = true;
        self.transition(SessionState::Fetching);
    }

    /// Runs a fetch cycle if weather has been requested, else returns `None`.
    ///
    /// On error the session goes back to `Idle` and keeps its previous outcome.
    pub async fn refresh<S, Tz>(
        &mut self,
        source: &S,
        tz: &Tz,
    ) -> Result<Option<&Outcome>, DashboardError>
    where
        S: WeatherSource + ?Sized,
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        if !self.weather_requested {
            return Ok(None);
        }

        self.transition(SessionState::Fetching);

        match self.run_cycle(source, tz).await {
            Ok(outcome) => {
                let next = match outcome {
                    Outcome::Displayed(_) => SessionState::Displayed,
                    Outcome::NotFound { .. } => SessionState::NotFound,
                };
                self.transition(next);
                self.last_outcome = Some(outcome);
                Ok(self.last_outcome.as_ref())
            }
            Err(err) => {
                self.transition(SessionState::Idle);
                Err(err)
            }
        }
    }

    async fn run_cycle<S, Tz>(&self, source: &S, tz: &Tz) -> Result<Outcome, DashboardError>
    where
        S: WeatherSource + ?Sized,
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let current = source.fetch_current(&self.city).await?;
        let status = UpstreamStatus::from_body(&current);

        if status.is_not_found() {
            warn!(city = %self.city, "OpenWeather does not know this city");
            return Ok(Outcome::NotFound { message: CITY_NOT_FOUND.to_string() });
        }
        if let Some(code) = status.code().filter(|_| !status.is_success()) {
            return Err(DashboardError::Upstream { code, message: upstream_message(&current) });
        }

        let snapshot = WeatherSnapshot::from_json(&current)?;

        let forecast = source.fetch_forecast(snapshot.latitude, snapshot.longitude).await?;
        let panel = forecast_panel(&forecast, tz);

        Ok(Outcome::Displayed(DashboardView::build(&self.city, &snapshot, panel)))
    }

    fn transition(&mut self, next: SessionState) {
        if self.state != next {
            info!(from = ?self.state, to = ?next, "session state changed");
        }
        self.state = next;
    }
}

fn forecast_panel<Tz>(forecast: &Value, tz: &Tz) -> ForecastPanel
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let status = UpstreamStatus::from_body(forecast);
    if status.is_not_found() {
        warn!("forecast request reported 404");
        return ForecastPanel::Unavailable;
    }
    if let Some(code) = status.code().filter(|_| !status.is_success()) {
        let message = upstream_message(forecast);
        warn!(code, %message, "forecast request reported a failure");
        return ForecastPanel::Error(format!(
            "{FORECAST_ERROR_PREFIX}OpenWeather reported error {code}: {message}"
        ));
    }

    match render_week(forecast, tz) {
        Ok(columns) => ForecastPanel::Columns(columns),
        Err(err) => {
            warn!(error = %err, "could not render forecast");
            ForecastPanel::Error(format!("{FORECAST_ERROR_PREFIX}{err}"))
        }
    }
}

fn upstream_message(body: &Value) -> String {
    body.get("message")
        .and_then(Value::as_str)
        .unwrap_or("no message")
        .to_string()
}
