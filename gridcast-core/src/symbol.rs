use std::fmt;

/// Glyph class for a short forecast description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherSymbol {
    Sun,
    Cloud,
    Rain,
    Thunder,
    Snow,
    Fog,
    Wind,
    Rainbow,
}

impl WeatherSymbol {
    /// Classify a short forecast like "Chance Rain Showers" into a symbol.
    ///
    /// Matching is a case-insensitive substring test and the first matching
    /// group below wins. Anything unrecognized, including an empty string,
    /// falls through to [`WeatherSymbol::Rainbow`].
    pub fn classify(short_forecast: &str) -> Self {
        let text = short_forecast.to_lowercase();

        if text.contains("sun") {
            WeatherSymbol::Sun
        } else if text.contains("cloud") {
            WeatherSymbol::Cloud
        } else if text.contains("rain") || text.contains("shower") || text.contains("drizzle") {
            WeatherSymbol::Rain
        } else if text.contains("thunder") {
            WeatherSymbol::Thunder
        } else if text.contains("snow") || text.contains("blizzard") {
            WeatherSymbol::Snow
        } else if text.contains("fog") || text.contains("haze") || text.contains("mist") {
            WeatherSymbol::Fog
        } else if text.contains("wind") {
            WeatherSymbol::Wind
        } else {
            WeatherSymbol::Rainbow
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            WeatherSymbol::Sun => "☀️",
            WeatherSymbol::Cloud => "☁️",
            WeatherSymbol::Rain => "🌧️",
            WeatherSymbol::Thunder => "⛈️",
            WeatherSymbol::Snow => "❄️",
            WeatherSymbol::Fog => "🌫️",
            WeatherSymbol::Wind => "🌬️",
            WeatherSymbol::Rainbow => "🌈",
        }
    }
}

impl fmt::Display for WeatherSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.emoji())
    }
}
