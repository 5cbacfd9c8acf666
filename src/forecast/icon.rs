//! Icon classification for provider condition codes
//!
//! OpenWeather issues icon codes such as `10d` or `50n`. The first two
//! characters name the condition group; the trailing day/night marker is
//! ignored. See <https://openweathermap.org/weather-conditions>.

use serde::{Deserialize, Serialize};

/// Directory holding the bitmap icons, relative to the widget's working directory
pub const ICON_DIR: &str = "weather_icons";

/// Internal icon category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconCategory {
    Sunny,
    Cloudy,
    CloudyRain,
    Rain,
    Thunder,
    Snow,
    Mist,
}

/// Category used for condition groups missing from the table
pub const DEFAULT_CATEGORY: IconCategory = IconCategory::Cloudy;

/// Condition group prefix to category
const PREFIX_TABLE: &[(&str, IconCategory)] = &[
    ("01", IconCategory::Sunny),
    ("02", IconCategory::Cloudy),
    ("03", IconCategory::Cloudy),
    ("04", IconCategory::Cloudy),
    ("09", IconCategory::CloudyRain),
    ("10", IconCategory::Rain),
    ("11", IconCategory::Thunder),
    ("13", IconCategory::Snow),
    ("50", IconCategory::Mist),
];

/// Classify a provider icon code by its two-character condition group
pub fn classify(code: &str) -> IconCategory {
    let prefix = code.trim().get(..2).unwrap_or_default();

    PREFIX_TABLE
        .iter()
        .find(|(p, _)| *p == prefix)
        .map(|(_, category)| *category)
        .unwrap_or(DEFAULT_CATEGORY)
}

impl IconCategory {
    /// All categories, in asset order
    pub const ALL: [IconCategory; 7] = [
        IconCategory::Sunny,
        IconCategory::Cloudy,
        IconCategory::CloudyRain,
        IconCategory::Rain,
        IconCategory::Thunder,
        IconCategory::Snow,
        IconCategory::Mist,
    ];

    /// Bitmap asset file name
    pub fn asset_name(self) -> &'static str {
        match self {
            Self::Sunny => "01_sunny.png",
            Self::Cloudy => "02_cloudy.png",
            Self::CloudyRain => "03_cloudy_rain.png",
            Self::Rain => "04_rain.png",
            Self::Thunder => "05_thunder.png",
            Self::Snow => "06_snow.png",
            Self::Mist => "07_mist.png",
        }
    }

    /// Asset path relative to the widget's working directory
    pub fn asset_path(self) -> String {
        format!("{}/{}", ICON_DIR, self.asset_name())
    }

    /// Nerd Font weather glyph
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Sunny => "\u{e30d}",
            Self::Cloudy => "\u{e312}",
            Self::CloudyRain => "\u{e319}",
            Self::Rain => "\u{e318}",
            Self::Thunder => "\u{e31d}",
            Self::Snow => "\u{e31a}",
            Self::Mist => "\u{e313}",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sunny => "sunny",
            Self::Cloudy => "cloudy",
            Self::CloudyRain => "cloudy_rain",
            Self::Rain => "rain",
            Self::Thunder => "thunder",
            Self::Snow => "snow",
            Self::Mist => "mist",
        }
    }
}

impl std::fmt::Display for IconCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
