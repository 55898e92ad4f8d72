use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::capitalize;

/// Unit system passed to the provider's `units` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    pub fn as_query(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }

    pub fn wind_suffix(&self) -> &'static str {
        match self {
            Units::Metric => "m/s",
            Units::Imperial => "mph",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Units::Metric => Units::Imperial,
            Units::Imperial => Units::Metric,
        }
    }
}

impl TryFrom<&str> for Units {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "metric" | "c" | "celsius" => Ok(Units::Metric),
            "imperial" | "f" | "fahrenheit" => Ok(Units::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported: metric, imperial."
            )),
        }
    }
}

/// UI and translation language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "hi")]
    Hindi,
    #[serde(rename = "mr")]
    Marathi,
}

impl Language {
    pub const fn all() -> &'static [Language] {
        &[Language::English, Language::Hindi, Language::Marathi]
    }

    /// ISO 639-1 code used by the translation provider.
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Marathi => "mr",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
            Language::Marathi => "Marathi",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Language::English => Language::Hindi,
            Language::Hindi => Language::Marathi,
            Language::Marathi => Language::English,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl TryFrom<&str> for Language {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();
        Language::all()
            .iter()
            .copied()
            .find(|l| l.code() == lower || l.display_name().to_lowercase() == lower)
            .ok_or_else(|| anyhow::anyhow!("Unknown language '{value}'. Supported: en, hi, mr."))
    }
}

/// One successful current-weather observation. Replaced wholesale by the next fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub city_query: String,
    pub temperature: f64,
    pub units: Units,
    pub description: String,
    /// Provider condition group, e.g. "Rain" or "Clear".
    pub condition: String,
    pub icon_code: String,
    pub humidity_pct: u8,
    pub wind_speed: f64,
    pub utc_offset_secs: i32,
    pub country_code: String,
}

impl WeatherReading {
    /// "15.2°C"
    pub fn temperature_label(&self) -> String {
        format!("{:.1}{}", self.temperature, self.units.suffix())
    }

    pub fn description_label(&self) -> String {
        capitalize(&self.description)
    }

    pub fn wind_label(&self) -> String {
        format!("{} {}", self.wind_speed, self.units.wind_suffix())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parses "#rrggbb" (the leading '#' is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let h = hex.strip_prefix('#').unwrap_or(hex);
        if h.len() != 6 || !h.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&h[i..i + 2], 16).ok();
        Some(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    pub fn channels(&self) -> [u8; 3] {
        [self.0, self.1, self.2]
    }
}
