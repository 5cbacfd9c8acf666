//! Typed view records extracted from a raw forecast payload

use chrono::{DateTime, FixedOffset, Local, NaiveDate, Offset, TimeZone, Timelike};
use serde::Serialize;

use super::icon::{classify, IconCategory};
use crate::error::{Result, WeatherError};
use crate::openweather::types::{OwCondition, OwCurrent, OwDaily, OwHourly};
use crate::openweather::RawPayload;

/// Entries in the "tomorrow" window
pub const HOURS_PER_DAY: usize = 24;

/// Hourly window selectable by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastWindow {
    /// From now up to, excluding, the next local midnight
    RestOfToday,
    /// The 24 hours starting at the next local midnight
    Tomorrow,
}

/// Current conditions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentConditions {
    pub time: DateTime<FixedOffset>,
    pub sunrise: Option<DateTime<FixedOffset>>,
    pub sunset: Option<DateTime<FixedOffset>>,
    pub temperature: f64,
    pub feels_like: f64,
    pub description: String,
    pub icon_code: String,
    pub icon: IconCategory,
}

/// Forecast for a single hour
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyForecast {
    pub time: DateTime<FixedOffset>,
    pub temperature: f64,
    pub feels_like: f64,
    pub description: String,
    pub icon_code: String,
    pub icon: IconCategory,
    /// 0.0 to 1.0
    pub precipitation_probability: f64,
}

/// Forecast for a single day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub sunrise: Option<DateTime<FixedOffset>>,
    pub sunset: Option<DateTime<FixedOffset>>,
    pub temp_min: f64,
    pub temp_max: f64,
    pub feels_like: f64,
    pub description: String,
    pub icon_code: String,
    pub icon: IconCategory,
    pub precipitation_probability: f64,
}

/// Decoded forecast payload
///
/// Derived on every invocation and never persisted; the payload it was decoded
/// from is the only cached state.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSnapshot {
    /// Offset of the forecast location's local clock
    pub offset: FixedOffset,
    pub current: CurrentConditions,
    /// Strictly increasing by time
    pub hourly: Vec<HourlyForecast>,
    pub daily: Vec<DailyForecast>,
}

impl ForecastSnapshot {
    /// Decode a raw payload into typed records
    ///
    /// Without a `timezone_offset` in the payload the machine's current local
    /// offset is used for clock times.
    pub fn decode(payload: &RawPayload) -> Result<Self> {
        let response = payload
            .parse()
            .map_err(|e| WeatherError::malformed(e.to_string()))?;

        let offset = match response.timezone_offset {
            Some(secs) => FixedOffset::east_opt(secs).ok_or_else(|| {
                WeatherError::malformed(format!("timezone_offset out of range: {secs}"))
            })?,
            None => Local::now().offset().fix(),
        };

        let current = decode_current(&response.current, offset)?;

        let hourly = response
            .hourly
            .iter()
            .enumerate()
            .map(|(i, h)| decode_hourly(h, i, offset))
            .collect::<Result<Vec<_>>>()?;

        if let Some(pos) = hourly.windows(2).position(|w| w[0].time >= w[1].time) {
            return Err(WeatherError::malformed(format!(
                "hourly entries out of order at index {}",
                pos + 1
            )));
        }

        let daily = response
            .daily
            .iter()
            .enumerate()
            .map(|(i, d)| decode_daily(d, i, offset))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            offset,
            current,
            hourly,
            daily,
        })
    }
}

/// Current conditions from a decoded snapshot
pub fn extract_current(snapshot: &ForecastSnapshot) -> CurrentConditions {
    snapshot.current.clone()
}

/// Hourly entries for `window`
///
/// The day boundary is the first entry whose local clock reads 00:00. The scan
/// covers only the entries present; a payload without a boundary, or without
/// 24 entries after it for [`ForecastWindow::Tomorrow`], is an
/// [`WeatherError::InsufficientHorizon`].
pub fn extract_hourly(
    snapshot: &ForecastSnapshot,
    window: ForecastWindow,
) -> Result<Vec<HourlyForecast>> {
    let hourly = &snapshot.hourly;
    let boundary = hourly
        .iter()
        .position(|h| h.time.hour() == 0 && h.time.minute() == 0)
        .ok_or_else(|| {
            WeatherError::InsufficientHorizon(format!(
                "no 00:00 entry within {} hourly entries",
                hourly.len()
            ))
        })?;

    match window {
        ForecastWindow::RestOfToday => Ok(hourly[..boundary].to_vec()),
        ForecastWindow::Tomorrow => hourly
            .get(boundary..boundary + HOURS_PER_DAY)
            .map(<[HourlyForecast]>::to_vec)
            .ok_or_else(|| {
                WeatherError::InsufficientHorizon(format!(
                    "tomorrow needs {} entries after index {}, payload has {}",
                    HOURS_PER_DAY,
                    boundary,
                    hourly.len() - boundary
                ))
            }),
    }
}

/// Daily entries for the week view
pub fn extract_daily(snapshot: &ForecastSnapshot) -> Result<Vec<DailyForecast>> {
    if snapshot.daily.is_empty() {
        return Err(WeatherError::InsufficientHorizon(
            "payload contains no daily entries".to_string(),
        ));
    }
    Ok(snapshot.daily.clone())
}

fn decode_current(current: &OwCurrent, offset: FixedOffset) -> Result<CurrentConditions> {
    let condition = first_condition(&current.weather, "current")?;
    Ok(CurrentConditions {
        time: local_time(current.dt, offset, "current.dt")?,
        sunrise: optional_time(current.sunrise, offset, "current.sunrise")?,
        sunset: optional_time(current.sunset, offset, "current.sunset")?,
        temperature: current.temp,
        feels_like: current.feels_like,
        description: condition.description.clone(),
        icon_code: condition.icon.clone(),
        icon: classify(&condition.icon),
    })
}

fn decode_hourly(hour: &OwHourly, index: usize, offset: FixedOffset) -> Result<HourlyForecast> {
    let context = format!("hourly[{index}]");
    let condition = first_condition(&hour.weather, &context)?;
    Ok(HourlyForecast {
        time: local_time(hour.dt, offset, &context)?,
        temperature: hour.temp,
        feels_like: hour.feels_like,
        description: condition.description.clone(),
        icon_code: condition.icon.clone(),
        icon: classify(&condition.icon),
        precipitation_probability: hour.pop,
    })
}

fn decode_daily(day: &OwDaily, index: usize, offset: FixedOffset) -> Result<DailyForecast> {
    let context = format!("daily[{index}]");
    let condition = first_condition(&day.weather, &context)?;
    Ok(DailyForecast {
        date: local_time(day.dt, offset, &context)?.date_naive(),
        sunrise: optional_time(day.sunrise, offset, &context)?,
        sunset: optional_time(day.sunset, offset, &context)?,
        temp_min: day.temp.min,
        temp_max: day.temp.max,
        feels_like: day.feels_like.day,
        description: condition.description.clone(),
        icon_code: condition.icon.clone(),
        icon: classify(&condition.icon),
        precipitation_probability: day.pop,
    })
}

fn first_condition<'a>(weather: &'a [OwCondition], context: &str) -> Result<&'a OwCondition> {
    weather
        .first()
        .ok_or_else(|| WeatherError::malformed(format!("{context}: empty weather list")))
}

fn local_time(ts: i64, offset: FixedOffset, field: &str) -> Result<DateTime<FixedOffset>> {
    offset
        .timestamp_opt(ts, 0)
        .single()
        .ok_or_else(|| WeatherError::malformed(format!("{field}: invalid timestamp {ts}")))
}

fn optional_time(
    ts: Option<i64>,
    offset: FixedOffset,
    field: &str,
) -> Result<Option<DateTime<FixedOffset>>> {
    ts.map(|t| local_time(t, offset, field)).transpose()
}
