use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, instrument};

use crate::{WeatherError, model::{Units, WeatherReading}};

use super::WeatherProvider;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);
const FALLBACK_MESSAGE: &str = "Error fetching weather.";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, base_url: &str) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| WeatherError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    #[serde(default)]
    timezone: i32,
    sys: OwSys,
}

#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: Option<String>,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self), level = "info")]
    async fn fetch(&self, city: &str, units: Units) -> Result<WeatherReading, WeatherError> {
        let url = format!("{}/weather", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", units.as_query()),
            ])
            .send()
            .await
            // The request URL carries the API key.
            .map_err(|e| WeatherError::provider(format!("Failed to reach OpenWeather: {}", e.without_url())))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| {
                WeatherError::provider(format!("Failed to read OpenWeather response: {}", e.without_url()))
            })?;

        if !status.is_success() {
            let message = serde_json::from_str::<OwErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());
            info!(%status, %message, "OpenWeather returned an error");
            return Err(WeatherError::Provider { message });
        }

        let reading = parse_current(city, units, &body)?;
        info!(condition = %reading.condition, temp = reading.temperature, "weather fetched");
        Ok(reading)
    }
}

fn parse_current(city: &str, units: Units, body: &str) -> Result<WeatherReading, WeatherError> {
    let parsed: OwCurrentResponse = serde_json::from_str(body)
        .map_err(|e| WeatherError::provider(format!("Failed to parse OpenWeather response: {e}")))?;

    let weather = parsed
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| WeatherError::provider("OpenWeather response contained no conditions"))?;

    Ok(WeatherReading {
        city_query: city.to_string(),
        temperature: parsed.main.temp,
        units,
        description: weather.description,
        condition: weather.main,
        icon_code: weather.icon,
        humidity_pct: parsed.main.humidity,
        wind_speed: parsed.wind.speed,
        utc_offset_secs: parsed.timezone,
        country_code: parsed.sys.country,
    })
}
