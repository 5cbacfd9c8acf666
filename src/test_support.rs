//! Shared fixtures for unit tests

use serde_json::json;

use crate::openweather::RawPayload;

/// 2023-11-14 00:00:00 UTC
pub const MIDNIGHT_UTC: i64 = 1_699_920_000;

/// One Call document with `hours` hourly entries, the local midnight falling
/// on index `boundary`. Offset is zero so UTC and local clock agree.
pub fn one_call_json(hours: usize, boundary: usize) -> String {
    one_call_json_with(hours, MIDNIGHT_UTC - (boundary as i64) * 3600)
}

/// One Call document whose first hourly entry and current time are `start`
pub fn one_call_json_with(hours: usize, start: i64) -> String {
    let hourly: Vec<_> = (0..hours)
        .map(|i| {
            let icon = if i % 2 == 0 { "10n" } else { "01d" };
            json!({
                "dt": start + (i as i64) * 3600,
                "temp": 10.0 + i as f64 * 0.5,
                "feels_like": 9.0 + i as f64 * 0.5,
                "pop": 0.25,
                "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": icon}]
            })
        })
        .collect();

    json!({
        "lat": 52.52,
        "lon": 13.405,
        "timezone": "UTC",
        "timezone_offset": 0,
        "current": {
            "dt": start,
            "sunrise": start + 7 * 3600,
            "sunset": start + 16 * 3600,
            "temp": 11.2,
            "feels_like": 9.8,
            "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"}]
        },
        "hourly": hourly,
        "daily": [
            {
                "dt": start + 12 * 3600,
                "sunrise": start + 7 * 3600,
                "sunset": start + 16 * 3600,
                "temp": {"min": 4.0, "max": 12.5, "day": 11.0},
                "feels_like": {"day": 10.1},
                "pop": 0.6,
                "weather": [{"id": 211, "main": "Thunderstorm", "description": "thunderstorm", "icon": "11d"}]
            },
            {
                "dt": start + 36 * 3600,
                "temp": {"min": -2.0, "max": 1.0, "day": 0.0},
                "feels_like": {"day": -4.0},
                "weather": [{"id": 601, "main": "Snow", "description": "snow", "icon": "13d"}]
            }
        ]
    })
    .to_string()
}

pub fn sample_payload() -> RawPayload {
    RawPayload::from_json(one_call_json(30, 5)).unwrap()
}
