//! Condition group → display colour and glyph.

use crate::model::Rgb;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionStyle {
    pub color: Rgb,
    pub glyph: &'static str,
}

pub const DEFAULT_STYLE: ConditionStyle = ConditionStyle { color: Rgb(0xff, 0xe0, 0x66), glyph: "❓" };

const STYLES: &[(&str, ConditionStyle)] = &[
    ("Clear", ConditionStyle { color: Rgb(0xff, 0xe0, 0x66), glyph: "☀️" }),
    ("Clouds", ConditionStyle { color: Rgb(0xd0, 0xd3, 0xd4), glyph: "☁️" }),
    ("Rain", ConditionStyle { color: Rgb(0x5d, 0xad, 0xe2), glyph: "🌧️" }),
    ("Drizzle", ConditionStyle { color: Rgb(0xae, 0xd6, 0xf1), glyph: "🌦️" }),
    ("Thunderstorm", ConditionStyle { color: Rgb(0x85, 0x92, 0x9e), glyph: "⛈️" }),
    ("Snow", ConditionStyle { color: Rgb(0xf4, 0xf6, 0xf7), glyph: "❄️" }),
    ("Mist", ConditionStyle { color: Rgb(0xd5, 0xdb, 0xdb), glyph: "🌫️" }),
    ("Fog", ConditionStyle { color: Rgb(0xd5, 0xdb, 0xdb), glyph: "🌫️" }),
    ("Haze", ConditionStyle { color: Rgb(0xf9, 0xe7, 0x9f), glyph: "🌫️" }),
    ("Smoke", ConditionStyle { color: Rgb(0xca, 0xcf, 0xd2), glyph: "🌫️" }),
    ("Dust", ConditionStyle { color: Rgb(0xf5, 0xcb, 0xa7), glyph: "🌫️" }),
    ("Sand", ConditionStyle { color: Rgb(0xf5, 0xcb, 0xa7), glyph: "🌫️" }),
    ("Ash", ConditionStyle { color: Rgb(0xae, 0xb6, 0xbf), glyph: "🌋" }),
    ("Squall", ConditionStyle { color: Rgb(0x85, 0x92, 0x9e), glyph: "💨" }),
    ("Tornado", ConditionStyle { color: Rgb(0x85, 0x92, 0x9e), glyph: "🌪️" }),
];

/// Looks up the provider's condition group (exact, case-sensitive as the
/// provider sends it). Unknown groups get [`DEFAULT_STYLE`].
pub fn style_for(condition: &str) -> ConditionStyle {
    STYLES
        .iter()
        .find(|(name, _)| *name == condition)
        .map(|(_, style)| *style)
        .unwrap_or(DEFAULT_STYLE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_is_yellow_sun() {
        let style = style_for("Clear");
        assert_eq!(style.color.to_hex(), "#ffe066");
        assert_eq!(style.glyph, "☀️");
    }

    #[test]
    fn rain_has_its_own_colour() {
        assert_eq!(style_for("Rain").color.to_hex(), "#5dade2");
    }

    #[test]
    fn unknown_condition_falls_back() {
        assert_eq!(style_for("Volcano"), DEFAULT_STYLE);
        assert_eq!(style_for(""), DEFAULT_STYLE);
    }
}
