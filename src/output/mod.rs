pub mod json;
pub mod pretty;

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::forecast::{CurrentConditions, DailyForecast, HourlyForecast};

/// Format current conditions based on output format
pub fn format_current(current: &CurrentConditions, unit: &str, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Pretty => Ok(pretty::format_current(current, unit)),
        OutputFormat::Json => json::format_json(current),
    }
}

/// Format an hourly window based on output format
pub fn format_hourly(
    title: &str,
    hours: &[HourlyForecast],
    unit: &str,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Pretty => Ok(pretty::format_hourly(title, hours, unit)),
        OutputFormat::Json => json::format_json(&hours),
    }
}

/// Format the daily view based on output format
pub fn format_daily(days: &[DailyForecast], unit: &str, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Pretty => Ok(pretty::format_daily(days, unit)),
        OutputFormat::Json => json::format_json(&days),
    }
}

/// Format a command acknowledgement
pub fn format_ack<T: Serialize>(message: &str, value: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Pretty => Ok(pretty::format_ack(message)),
        OutputFormat::Json => json::format_json(value),
    }
}
