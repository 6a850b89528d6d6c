//! Core library for the SkySync weather dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather fetcher behind the [`WeatherSource`] trait
//! - Icon lookup and the weekly forecast strip
//! - The per-session dashboard view model
//!
//! It is used by `weather-cli`, but can also be reused by other front ends.

pub mod config;
pub mod dashboard;
pub mod forecast;
pub mod icon;
pub mod model;
pub mod provider;

pub use config::Config;
pub use dashboard::{DashboardError, DashboardView, ForecastPanel, Outcome, Session, SessionState};
pub use forecast::{ForecastError, render_week};
pub use icon::icon_for;
pub use model::{ForecastColumn, ForecastEntry, UpstreamStatus, WeatherSnapshot};
pub use provider::{FetchError, WeatherSource, openweather::OpenWeatherClient};
