use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Offset between the Kelvin and Celsius scales.
pub const KELVIN_OFFSET: f64 = 273.15;

pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

/// Kelvin rendered as Celsius with one decimal, e.g. `293.15` -> `"20.0°C"`.
pub fn format_celsius(kelvin: f64) -> String {
    format!("{:.1}°C", kelvin_to_celsius(kelvin))
}

/// Upper-cases the first character and lower-cases the rest.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Upper-cases the first letter of every alphabetic run, lower-cases the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;

    for ch in text.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }

    out
}

/// The `cod` field OpenWeather puts in every body.
///
/// It arrives as a number (`200`) on success and often as a string (`"404"`)
/// on failure. A missing or unreadable `cod` counts as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpstreamStatus(Option<u16>);

impl UpstreamStatus {
    pub fn from_body(body: &Value) -> Self {
        let code = match body.get("cod") {
            Some(Value::Number(n)) => n.as_u64().and_then(|c| u16::try_from(c).ok()),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        };
        Self(code)
    }

    pub fn code(&self) -> Option<u16> {
        self.0
    }

    pub fn is_success(&self) -> bool {
        self.0.is_none_or(|c| (200..300).contains(&c))
    }

    pub fn is_not_found(&self) -> bool {
        self.0 == Some(404)
    }
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("malformed current weather response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("current weather response has no condition entry")]
    MissingCondition,
}

/// Current conditions as reported upstream. Temperatures stay in Kelvin.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub temperature_k: f64,
    pub feels_like_k: f64,
    pub humidity_pct: f64,
    pub pressure_hpa: f64,
    pub wind_speed_mps: f64,
    pub visibility_m: Option<f64>,
    pub cloud_cover_pct: f64,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl WeatherSnapshot {
    pub fn from_json(body: &Value) -> Result<Self, SnapshotError> {
        let parsed = OwCurrentResponse::deserialize(body)?;

        let description = parsed
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .ok_or(SnapshotError::MissingCondition)?;

        Ok(Self {
            temperature_k: parsed.main.temp,
            feels_like_k: parsed.main.feels_like,
            humidity_pct: parsed.main.humidity,
            pressure_hpa: parsed.main.pressure,
            wind_speed_mps: parsed.wind.speed,
            visibility_m: parsed.visibility,
            cloud_cover_pct: parsed.clouds.all,
            description,
            latitude: parsed.coord.lat,
            longitude: parsed.coord.lon,
        })
    }
}

/// One forecast slot, typically three hours apart.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastEntry {
    pub timestamp: i64,
    pub temperature_k: f64,
    pub description: String,
}

/// A single day in the forecast strip, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForecastColumn {
    pub weekday: String,
    pub icon: String,
    pub temperature: String,
    pub caption: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: f64,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwWeather {
    pub(crate) description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwClouds {
    all: f64,
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    clouds: OwClouds,
    coord: OwCoord,
    visibility: Option<f64>,
}
