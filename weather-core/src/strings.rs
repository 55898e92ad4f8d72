//! Localised UI literals.

use crate::model::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringKey {
    AppTitle,
    Search,
    Mic,
    Unit,
    History,
    WeatherInfo,
    Humidity,
    Wind,
    Loading,
    Listening,
    Recognizing,
    ShowIst,
    ShowLocal,
    EnterCity,
    ForecastSoon,
}

/// Looks up `key` for `lang`. Every pair has an entry; keys without a
/// translation fall back to English.
pub fn text(lang: Language, key: StringKey) -> &'static str {
    let localized = match lang {
        Language::English => None,
        Language::Hindi => hindi(key),
        Language::Marathi => marathi(key),
    };
    localized.unwrap_or_else(|| english(key))
}

fn english(key: StringKey) -> &'static str {
    use StringKey::*;
    match key {
        AppTitle => "Weather App",
        Search => "Search",
        Mic => "🎤",
        Unit => "°C",
        History => "History",
        WeatherInfo => "Weather info will appear here.",
        Humidity => "Humidity",
        Wind => "Wind",
        Loading => "Loading ⏳",
        Listening => "Listening... 🎤",
        Recognizing => "Recognizing...",
        ShowIst => "Show in IST",
        ShowLocal => "Show Local Time",
        EnterCity => "Enter a city name",
        ForecastSoon => "(Forecast coming soon)",
    }
}

fn hindi(key: StringKey) -> Option<&'static str> {
    use StringKey::*;
    Some(match key {
        AppTitle => "मौसम ऐप",
        Search => "खोजें",
        Unit => "°से",
        History => "इतिहास",
        WeatherInfo => "यहाँ मौसम जानकारी दिखेगी।",
        Humidity => "नमी",
        Wind => "हवा",
        _ => return None,
    })
}

fn marathi(key: StringKey) -> Option<&'static str> {
    use StringKey::*;
    Some(match key {
        AppTitle => "हवामान ॲप",
        Search => "शोधा",
        Unit => "°से",
        History => "इतिहास",
        WeatherInfo => "येथे हवामान माहिती दिसेल.",
        Humidity => "आर्द्रता",
        Wind => "वारा",
        _ => return None,
    })
}
