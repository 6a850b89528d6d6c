//! Plain-text layout of a dashboard outcome.

use weather_core::{
    DashboardView, ForecastPanel, Outcome,
    dashboard::{AdvancedDetails, Metrics},
};

const METRIC_WIDTH: usize = 18;

pub fn render_outcome(outcome: &Outcome, show_details: bool) -> String {
    match outcome {
        Outcome::Displayed(view) => render_view(view, show_details),
        Outcome::NotFound { message } => format!("error: {message}\n"),
    }
}

pub fn render_view(view: &DashboardView, show_details: bool) -> String {
    let mut out = heading(&view.title, '=');
    out.push_str(&metrics(&view.metrics));
    out.push('\n');

    let banner = format!("{} {}", view.banner.icon, view.banner.description);
    let rule = "─".repeat(banner.chars().count() + 2);
    out.push_str(&format!("┌{rule}┐\n│ {banner} │\n└{rule}┘\n\n"));

    match &view.forecast {
        ForecastPanel::Columns(cols) => {
            out.push_str(&heading("7-Day Forecast", '-'));
            let day_width = cols.iter().map(|c| c.weekday.chars().count()).max().unwrap_or(0);
            for col in cols {
                out.push_str(&format!(
                    "{:<day_width$}  {}  {:>7}  {}\n",
                    col.weekday, col.icon, col.temperature, col.caption
                ));
            }
            out.push('\n');
        }
        ForecastPanel::Error(msg) => {
            out.push_str(&heading("7-Day Forecast", '-'));
            out.push_str(&format!("error: {msg}\n\n"));
        }
        ForecastPanel::Unavailable => {}
    }

    if show_details {
        out.push_str(&details(&view.details));
    } else {
        out.push_str("▸ Advanced Details\n");
    }

    out
}

fn heading(title: &str, underline: char) -> String {
    let rule = underline.to_string().repeat(title.chars().count());
    format!("{title}\n{rule}\n")
}

fn metrics(m: &Metrics) -> String {
    let labels = format!(
        "{:<METRIC_WIDTH$}{:<METRIC_WIDTH$}{}",
        "Temperature 🌡️", "Humidity 💧", "Wind Speed 🌬️"
    );
    let values = format!(
        "{:<METRIC_WIDTH$}{:<METRIC_WIDTH$}{}",
        m.temperature, m.humidity, m.wind_speed
    );
    format!("{labels}\n{values}\n")
}

fn details(d: &AdvancedDetails) -> String {
    let row = |left: &str, left_value: &str, right: &str, right_value: &str| {
        format!("  {left:<12}{left_value:<14}{right:<12}{right_value}\n")
    };

    let mut out = String::from("▾ Advanced Details\n");
    out.push_str(&row("Pressure", &d.pressure, "Visibility", &d.visibility));
    out.push_str(&row("Cloud Cover", &d.cloud_cover, "Feels Like", &d.feels_like));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use weather_core::{
        ForecastColumn,
        dashboard::{Banner, CITY_NOT_FOUND},
    };

    fn view(forecast: ForecastPanel) -> DashboardView {
        DashboardView {
            title: "Weather in London".into(),
            metrics: Metrics {
                temperature: "20.0°C".into(),
                humidity: "60%".into(),
                wind_speed: "3.5 m/s".into(),
            },
            banner: Banner { icon: "☁️".into(), description: "Overcast clouds".into() },
            forecast,
            details: AdvancedDetails {
                pressure: "1012 hPa".into(),
                visibility: "N/A".into(),
                cloud_cover: "90%".into(),
                feels_like: "19.4°C".into(),
            },
        }
    }

    fn monday() -> ForecastColumn {
        ForecastColumn {
            weekday: "Monday".into(),
            icon: "🌧️".into(),
            temperature: "7.0°C".into(),
            caption: "Light rain".into(),
        }
    }

    #[test]
    fn renders_metrics_banner_and_forecast() {
        let out = render_view(&view(ForecastPanel::Columns(vec![monday()])), false);

        assert!(out.starts_with("Weather in London\n"));
        assert!(out.contains("20.0°C"));
        assert!(out.contains("60%"));
        assert!(out.contains("3.5 m/s"));
        assert!(out.contains("☁️ Overcast clouds"));
        assert!(out.contains("7-Day Forecast"));
        assert!(out.contains("Light rain"));
        assert!(out.contains("▸ Advanced Details"));
        assert!(!out.contains("Pressure"));
    }

    #[test]
    fn details_are_expanded_on_request() {
        let out = render_view(&view(ForecastPanel::Unavailable), true);

        assert!(out.contains("▾ Advanced Details"));
        assert!(out.contains("1012 hPa"));
        assert!(out.contains("N/A"));
        assert!(out.contains("19.4°C"));
        assert!(!out.contains("7-Day Forecast"));
    }

    #[test]
    fn details_rows_are_aligned() {
        let out = details(&view(ForecastPanel::Unavailable).details);

        assert_eq!(
            out,
            "▾ Advanced Details\n  \
             Pressure    1012 hPa      Visibility  N/A\n  \
             Cloud Cover 90%           Feels Like  19.4°C\n"
        );
    }

    #[test]
    fn forecast_error_is_shown_inline() {
        let panel = ForecastPanel::Error("Error in displaying weekly forecast: boom".into());
        let out = render_view(&view(panel), false);

        assert!(out.contains("error: Error in displaying weekly forecast: boom"));
        assert!(out.contains("20.0°C"));
    }

    #[test]
    fn not_found_renders_message_only() {
        let outcome = Outcome::NotFound { message: CITY_NOT_FOUND.into() };
        assert_eq!(render_outcome(&outcome, true), format!("error: {CITY_NOT_FOUND}\n"));
    }
}
