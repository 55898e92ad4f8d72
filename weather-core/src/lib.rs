//! Core library for the `weather` terminal app.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Abstractions over the weather, translation and speech services
//! - Shared domain models (readings, units, languages, colours)
//! - The search/display controller that the UI drives
//!
//! It is used by `weather-cli`, but has no terminal dependencies of its own.

pub mod animation;
pub mod config;
pub mod controller;
pub mod error;
pub mod history;
pub mod icon;
pub mod model;
pub mod provider;
pub mod strings;
pub mod style;
pub mod timezone;
pub mod translate;
pub mod voice;

pub use config::Config;
pub use controller::{AppController, AppEvent, AppState, Notice, Phase, Services};
pub use error::{Severity, WeatherError};
pub use model::{Language, Rgb, Units, WeatherReading};
pub use provider::WeatherProvider;
