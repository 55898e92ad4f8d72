use thiserror::Error;

/// How loudly a failure should be reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Error)]
pub enum WeatherError {
    /// Empty or whitespace-only city; rejected before any network call.
    #[error("Please enter a city name.")]
    InvalidInput,

    #[error("{message}")]
    Provider { message: String },

    #[error("Icon unavailable")]
    IconUnavailable,

    #[error("Could not translate: {0}")]
    TranslationFailed(String),

    #[error("Listening timed out. Please try again.")]
    VoiceTimeout,

    #[error("Could not understand audio. Please try again.")]
    VoiceUnrecognized,

    #[error("Could not request results from the speech recognition service: {0}")]
    VoiceService(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl WeatherError {
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider { message: message.into() }
    }

    /// Text shown to the user; provider messages get their first letter capitalised.
    pub fn user_message(&self) -> String {
        match self {
            Self::Provider { message } => capitalize(message),
            other => other.to_string(),
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::InvalidInput => Severity::Info,
            Self::TranslationFailed(_) | Self::IconUnavailable => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// Uppercases the first character and lowercases the rest.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_message_is_capitalized() {
        let err = WeatherError::provider("city not found");
        assert_eq!(err.user_message(), "City not found");
    }

    #[test]
    fn capitalize_lowercases_tail() {
        assert_eq!(capitalize("clear SKY"), "Clear sky");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn invalid_input_is_informational() {
        assert_eq!(WeatherError::InvalidInput.severity(), Severity::Info);
        assert_eq!(WeatherError::TranslationFailed("x".into()).severity(), Severity::Warning);
        assert_eq!(WeatherError::VoiceTimeout.severity(), Severity::Error);
    }

    #[test]
    fn voice_errors_have_distinct_messages() {
        let msgs = [
            WeatherError::VoiceTimeout.user_message(),
            WeatherError::VoiceUnrecognized.user_message(),
            WeatherError::VoiceService("offline".into()).user_message(),
        ];
        assert_ne!(msgs[0], msgs[1]);
        assert_ne!(msgs[1], msgs[2]);
        assert!(msgs[2].contains("offline"));
    }
}
