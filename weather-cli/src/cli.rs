use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select};
use weather_core::{Config, Language, Services, Units};

use crate::app::App;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Animated terminal weather app")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// City to search for on startup.
    #[arg(long)]
    pub city: Option<String>,

    /// Unit system: metric or imperial. Overrides the config file.
    #[arg(long, value_parser = parse_units)]
    pub units: Option<Units>,

    /// UI language: en, hi or mr. Overrides the config file.
    #[arg(long, value_parser = parse_language)]
    pub lang: Option<Language>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store API keys and default preferences.
    Configure,
}

fn parse_units(value: &str) -> Result<Units, String> {
    Units::try_from(value).map_err(|e| e.to_string())
}

fn parse_language(value: &str) -> Result<Language, String> {
    Language::try_from(value).map_err(|e| e.to_string())
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Command::Configure) => configure(),
            None => {
                let mut config = Config::load()?;
                config.apply_env();
                config.require_api_key()?;

                if let Some(units) = self.units {
                    config.units = units;
                }
                if let Some(lang) = self.lang {
                    config.language = lang;
                }

                let log_path = crate::init_logging()?;
                eprintln!("weather log: {}", log_path.display());
                tracing::info!(units = config.units.as_query(), language = config.language.code(), "weather starting");

                let services = Services::from_config(&config)?;
                App::new(services, config.units, config.language).run(self.city).await
            }
        }
    }
}

/// Interactive prompts; empty answers keep the stored value.
fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("leave empty to keep the current key")
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.api_key = Some(api_key.trim().to_string());
    }

    let speech_key = Password::new("Google Speech-to-Text API key (optional):")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("used for voice search; leave empty to skip")
        .prompt()
        .context("Failed to read speech API key")?;
    if !speech_key.trim().is_empty() {
        config.speech_api_key = Some(speech_key.trim().to_string());
    }

    let units = Select::new("Default units:", vec!["metric", "imperial"])
        .with_starting_cursor(usize::from(config.units == Units::Imperial))
        .prompt()
        .context("Failed to read units")?;
    config.units = Units::try_from(units)?;

    let languages: Vec<Language> = Language::all().to_vec();
    let current = languages.iter().position(|l| *l == config.language).unwrap_or(0);
    config.language = Select::new("UI language:", languages)
        .with_starting_cursor(current)
        .prompt()
        .context("Failed to read language")?;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_startup_flags() {
        let cli = Cli::try_parse_from(["weather", "--city", "Pune", "--units", "imperial", "--lang", "mr"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.city.as_deref(), Some("Pune"));
        assert_eq!(cli.units, Some(Units::Imperial));
        assert_eq!(cli.lang, Some(Language::Marathi));
    }

    #[test]
    fn rejects_unknown_units() {
        assert!(Cli::try_parse_from(["weather", "--units", "kelvin"]).is_err());
    }

    #[test]
    fn configure_subcommand() {
        let cli = Cli::try_parse_from(["weather", "configure"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Configure)));
    }
}
