use crate::{
    Config, WeatherError, WeatherReading,
    model::Units,
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// One current-weather lookup. `city` is already trimmed and non-empty.
    async fn fetch(&self, city: &str, units: Units) -> Result<WeatherReading, WeatherError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let api_key = config.require_api_key()?;
    let provider = OpenWeatherProvider::new(api_key.to_owned(), &config.endpoints.weather)?;
    Ok(Arc::new(provider))
}
