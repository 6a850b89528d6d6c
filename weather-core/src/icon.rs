//! Emoji glyphs for weather descriptions.

/// Keyword table, searched in order. The first keyword contained in the
/// description wins, so "mist and haze" resolves to the `mist` row.
pub const WEATHER_ICONS: &[(&str, &str)] = &[
    ("clear", "☀️"),
    ("clouds", "☁️"),
    ("rain", "🌧️"),
    ("thunderstorm", "⛈️"),
    ("snow", "❄️"),
    ("mist", "🌫️"),
    ("haze", "🌫️"),
    ("drizzle", "🌦️"),
];

/// Glyph used when no keyword matches.
pub const DEFAULT_ICON: &str = "🌤️";

pub fn icon_for(description: &str) -> &'static str {
    let lower = description.to_lowercase();

    WEATHER_ICONS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, icon)| *icon)
        .unwrap_or(DEFAULT_ICON)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rain_descriptions_get_the_rain_glyph() {
        for desc in ["light rain", "moderate rain", "heavy intensity rain", "freezing rain"] {
            assert_eq!(icon_for(desc), "🌧️", "{desc}");
        }
    }

    #[test]
    fn unmatched_description_falls_back_to_default() {
        assert_eq!(icon_for("tornado"), DEFAULT_ICON);
        assert_eq!(icon_for(""), DEFAULT_ICON);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(icon_for("Clear Sky"), "☀️");
        assert_eq!(icon_for("SNOW"), "❄️");
    }

    #[test]
    fn table_order_breaks_ties() {
        assert_eq!(icon_for("haze over mist"), "🌫️");
        // "thunderstorm with light rain" contains "rain", which sits earlier.
        assert_eq!(icon_for("thunderstorm with light rain"), "🌧️");
        assert_eq!(icon_for("thunderstorm"), "⛈️");
        // "light intensity drizzle rain" hits "rain" before "drizzle".
        assert_eq!(icon_for("light intensity drizzle rain"), "🌧️");
        assert_eq!(icon_for("light intensity drizzle"), "🌦️");
    }

    #[test]
    fn scattered_clouds_are_clouds() {
        assert_eq!(icon_for("scattered clouds"), "☁️");
        assert_eq!(icon_for("few clouds"), "☁️");
    }
}
