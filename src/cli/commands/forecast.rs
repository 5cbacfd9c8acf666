//! Default command: acquire a forecast and render the selected view

use tracing::info;

use crate::acquire::Acquirer;
use crate::cli::args::{OutputFormat, View};
use crate::config::{Config, Paths};
use crate::error::Result;
use crate::forecast::{extract_current, extract_daily, extract_hourly, ForecastSnapshot, ForecastWindow};
use crate::openweather::RawPayload;
use crate::output;

/// Acquire the forecast (cache or provider) and format `view`
pub fn forecast(
    config: &Config,
    paths: &Paths,
    api_key: Option<&str>,
    force_poll: bool,
    view: View,
    format: OutputFormat,
) -> Result<String> {
    let acquirer = Acquirer::from_config(config, paths, config.api_key(api_key), force_poll)?;
    let acquisition = acquirer.acquire()?;
    info!(origin = ?acquisition.origin, bytes = acquisition.payload.len(), "Forecast acquired");

    render(&acquisition.payload, view, format, config.temperature_unit())
}

/// Decode `payload` and format one view of it
pub fn render(payload: &RawPayload, view: View, format: OutputFormat, unit: &str) -> Result<String> {
    let snapshot = ForecastSnapshot::decode(payload)?;

    match view {
        View::Current => output::format_current(&extract_current(&snapshot), unit, format),
        View::Today => {
            let hours = extract_hourly(&snapshot, ForecastWindow::RestOfToday)?;
            output::format_hourly("Today", &hours, unit, format)
        }
        View::Tomorrow => {
            let hours = extract_hourly(&snapshot, ForecastWindow::Tomorrow)?;
            output::format_hourly("Tomorrow", &hours, unit, format)
        }
        View::Week => output::format_daily(&extract_daily(&snapshot)?, unit, format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WeatherError;
    use crate::test_support::{one_call_json_with, sample_payload, MIDNIGHT_UTC};

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_render_current_line() {
        plain();
        let text = render(&sample_payload(), View::Current, OutputFormat::Pretty, "°C").unwrap();
        assert!(text.ends_with(" 10°C"));
    }

    #[test]
    fn test_render_today_rows() {
        plain();
        let text = render(&sample_payload(), View::Today, OutputFormat::Pretty, "°C").unwrap();
        assert!(text.starts_with("Today"));
        assert!(text.contains("23:00"));
        assert!(!text.contains("00:00"));
    }

    #[test]
    fn test_render_tomorrow_json() {
        let text = render(&sample_payload(), View::Tomorrow, OutputFormat::Json, "°C").unwrap();
        let rows: Vec<serde_json::Value> = serde_json::from_str(&text).unwrap();
        assert_eq!(rows.len(), 24);
    }

    #[test]
    fn test_render_week_json() {
        let text = render(&sample_payload(), View::Week, OutputFormat::Json, "°C").unwrap();
        let rows: Vec<serde_json::Value> = serde_json::from_str(&text).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["icon"], "snow");
    }

    #[test]
    fn test_render_without_midnight_fails() {
        // 10 hours starting at 01:00: no boundary in range
        let payload = RawPayload::from_json(one_call_json_with(10, MIDNIGHT_UTC + 3600)).unwrap();
        let err = render(&payload, View::Tomorrow, OutputFormat::Pretty, "°C").unwrap_err();
        assert!(matches!(err, WeatherError::InsufficientHorizon(_)));
    }

    #[test]
    fn test_render_current_ignores_horizon() {
        plain();
        let payload = RawPayload::from_json(one_call_json_with(10, MIDNIGHT_UTC + 3600)).unwrap();
        assert!(render(&payload, View::Current, OutputFormat::Pretty, "°C").is_ok());
    }
}
