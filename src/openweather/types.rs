use serde::de::IgnoredAny;
use serde::Deserialize;

/// Forecast document exactly as the provider sent it
///
/// Only constructed from text that parses as JSON, so every cached or fetched
/// payload is at least syntactically valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPayload(String);

impl RawPayload {
    /// Wrap `text` after checking it is a JSON document
    pub fn from_json(text: impl Into<String>) -> Result<Self, serde_json::Error> {
        let text = text.into();
        serde_json::from_str::<IgnoredAny>(&text)?;
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Deserialize into the One Call wire model
    pub fn parse(&self) -> Result<OneCallResponse, serde_json::Error> {
        serde_json::from_str(&self.0)
    }
}

/// One Call API response
#[derive(Debug, Clone, Deserialize)]
pub struct OneCallResponse {
    /// Seconds east of UTC for the forecast location
    pub timezone_offset: Option<i32>,
    pub current: OwCurrent,
    pub hourly: Vec<OwHourly>,
    #[serde(default)]
    pub daily: Vec<OwDaily>,
}

/// Weather condition entry
#[derive(Debug, Clone, Deserialize)]
pub struct OwCondition {
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwCurrent {
    pub dt: i64,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
    pub temp: f64,
    pub feels_like: f64,
    pub weather: Vec<OwCondition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwHourly {
    pub dt: i64,
    pub temp: f64,
    pub feels_like: f64,
    /// Probability of precipitation, 0.0 to 1.0
    #[serde(default)]
    pub pop: f64,
    pub weather: Vec<OwCondition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwDailyTemp {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwDailyFeelsLike {
    pub day: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwDaily {
    pub dt: i64,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
    pub temp: OwDailyTemp,
    pub feels_like: OwDailyFeelsLike,
    #[serde(default)]
    pub pop: f64,
    pub weather: Vec<OwCondition>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(RawPayload::from_json("").is_err());
        assert!(RawPayload::from_json("{\"current\":").is_err());
        assert!(RawPayload::from_json("<html>502</html>").is_err());
    }

    #[test]
    fn test_from_json_keeps_text_verbatim() {
        let text = "{ \"a\" : [1, 2] }";
        let payload = RawPayload::from_json(text).unwrap();
        assert_eq!(payload.as_str(), text);
        assert_eq!(payload.len(), text.len());
    }

    #[test]
    fn test_parse_minimal_document() {
        let payload = RawPayload::from_json(
            r#"{"current":{"dt":1,"temp":1.5,"feels_like":0.5,
                "weather":[{"id":800,"description":"clear sky","icon":"01d"}]},
                "hourly":[]}"#,
        )
        .unwrap();

        let parsed = payload.parse().unwrap();
        assert!(parsed.timezone_offset.is_none());
        assert!(parsed.current.sunrise.is_none());
        assert!(parsed.daily.is_empty());
        assert_eq!(parsed.current.weather[0].icon, "01d");
    }

    #[test]
    fn test_parse_condition_without_id() {
        let payload = RawPayload::from_json(
            r#"{"current":{"dt":1,"temp":1.5,"feels_like":0.5,
                "weather":[{"description":"mist","icon":"50n"}]},
                "hourly":[]}"#,
        )
        .unwrap();

        assert_eq!(payload.parse().unwrap().current.weather[0].icon, "50n");
    }

    #[test]
    fn test_parse_requires_hourly() {
        let payload = RawPayload::from_json(
            r#"{"current":{"dt":1,"temp":1.5,"feels_like":0.5,"weather":[]}}"#,
        )
        .unwrap();
        assert!(payload.parse().is_err());
    }
}
