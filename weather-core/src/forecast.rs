//! Weekly forecast strip: one column per distinct weekday, capped at seven.

use std::fmt::Display;

use chrono::TimeZone;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::{
    icon::icon_for,
    model::{ForecastColumn, ForecastEntry, OwWeather, capitalize, format_celsius},
};

/// Maximum number of day columns in the strip.
pub const MAX_DAYS: usize = 7;

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("forecast response has no 'list' array")]
    MissingList,

    #[error("forecast entry {index} is malformed: {source}")]
    Entry {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("forecast entry {index} has no weather description")]
    MissingCondition { index: usize },

    #[error("forecast entry {index} has an invalid timestamp {dt}")]
    Timestamp { index: usize, dt: i64 },
}

#[derive(Debug, Deserialize)]
struct OwStamp {
    dt: i64,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwForecastMain,
    weather: Vec<OwWeather>,
}

impl ForecastEntry {
    fn from_json(index: usize, raw: &Value) -> Result<Self, ForecastError> {
        let parsed = OwForecastEntry::deserialize(raw)
            .map_err(|source| ForecastError::Entry { index, source })?;

        let description = parsed
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .ok_or(ForecastError::MissingCondition { index })?;

        Ok(Self {
            timestamp: parsed.dt,
            temperature_k: parsed.main.temp,
            description,
        })
    }
}

impl ForecastColumn {
    pub fn from_entry(weekday: String, entry: &ForecastEntry) -> Self {
        Self {
            weekday,
            icon: icon_for(&entry.description).to_string(),
            temperature: format_celsius(entry.temperature_k),
            caption: capitalize(&entry.description),
        }
    }
}

/// Builds the forecast strip from a raw forecast body.
///
/// Entries are visited in order and weekday names are computed in `tz`. Only
/// entries that open a new column are fully decoded; every entry still needs
/// a readable `dt`.
pub fn render_week<Tz>(forecast: &Value, tz: &Tz) -> Result<Vec<ForecastColumn>, ForecastError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let list = forecast
        .get("list")
        .and_then(Value::as_array)
        .ok_or(ForecastError::MissingList)?;

    let mut columns: Vec<ForecastColumn> = Vec::with_capacity(MAX_DAYS);

    for (index, raw) in list.iter().enumerate() {
        let stamp =
            OwStamp::deserialize(raw).map_err(|source| ForecastError::Entry { index, source })?;
        let weekday = weekday_name(stamp.dt, tz)
            .ok_or(ForecastError::Timestamp { index, dt: stamp.dt })?;

        if columns.len() >= MAX_DAYS || columns.iter().any(|c| c.weekday == weekday) {
            continue;
        }

        let entry = ForecastEntry::from_json(index, raw)?;
        columns.push(ForecastColumn::from_entry(weekday, &entry));
    }

    tracing::debug!(entries = list.len(), columns = columns.len(), "rendered forecast strip");

    Ok(columns)
}

fn weekday_name<Tz>(ts: i64, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    tz.timestamp_opt(ts, 0).single().map(|dt| dt.format("%A").to_string())
}
