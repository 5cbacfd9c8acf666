//! Forecast view records and icon classification
//!
//! Everything here is derived from a [`RawPayload`](crate::openweather::RawPayload)
//! on each invocation; nothing is persisted.

mod extract;
pub mod icon;

pub use extract::{
    extract_current, extract_daily, extract_hourly, CurrentConditions, DailyForecast,
    ForecastSnapshot, ForecastWindow, HourlyForecast, HOURS_PER_DAY,
};
pub use icon::{classify, IconCategory};
