use colored::{ColoredString, Colorize};

use crate::cache::CacheStatus;
use crate::forecast::{CurrentConditions, DailyForecast, HourlyForecast};

/// Single status-bar line: glyph and perceived temperature
pub fn format_current(current: &CurrentConditions, unit: &str) -> String {
    format!("{} {:.0}{}", current.icon.glyph(), current.feels_like, unit)
}

/// Hourly table under `title`
pub fn format_hourly(title: &str, hours: &[HourlyForecast], unit: &str) -> String {
    if hours.is_empty() {
        return format!("{}\nNo hours left today.", title.bold());
    }

    let mut output = String::new();
    output.push_str(&format!("{}\n", title.bold()));
    output.push_str(&"─".repeat(50));
    output.push('\n');

    for hour in hours {
        output.push_str(&format!(
            "{}  {}  {:>7}  {:>4}  {}\n",
            hour.time.format("%H:%M").to_string().dimmed(),
            hour.icon.glyph(),
            temperature(hour.feels_like, unit),
            precipitation(hour.precipitation_probability),
            hour.description
        ));
    }

    output
}

/// Daily table for the week view
pub fn format_daily(days: &[DailyForecast], unit: &str) -> String {
    let mut output = String::new();
    output.push_str(&format!("{}\n", "This week".bold()));
    output.push_str(&"─".repeat(50));
    output.push('\n');

    for day in days {
        output.push_str(&format!(
            "{}  {}  {:>6} / {:<6}  {:>4}  {}\n",
            day.date.format("%a %d").to_string().dimmed(),
            day.icon.glyph(),
            format!("{:.0}{}", day.temp_min, unit),
            format!("{:.0}{}", day.temp_max, unit),
            precipitation(day.precipitation_probability),
            day.description
        ));
    }

    output
}

/// Cache status block
pub fn format_cache_status(status: &CacheStatus, ttl_secs: u64) -> String {
    let mut output = String::new();
    output.push_str(&format!("{}\n", "Cache Status".bold()));
    output.push_str(&format!("Location: {}\n", status.path.display()));
    output.push_str(&format!("TTL: {}\n", format_age(ttl_secs)));

    if !status.exists {
        output.push_str(&format!("{}", "Not cached".dimmed()));
        return output;
    }

    if let Some(size) = status.size_bytes {
        output.push_str(&format!("Size: {} bytes\n", size));
    }
    if let Some(age) = status.age_secs {
        let state = if status.fresh {
            "(fresh)".green()
        } else {
            "(stale)".yellow()
        };
        output.push_str(&format!("Age: {} {}\n", format_age(age), state));
    }

    output.trim_end().to_string()
}

fn temperature(value: f64, unit: &str) -> ColoredString {
    let text = format!("{:.0}{}", value, unit);
    if unit == "°C" && value <= 0.0 {
        text.blue()
    } else if unit == "°C" && value >= 30.0 {
        text.red()
    } else {
        text.normal()
    }
}

fn precipitation(probability: f64) -> ColoredString {
    let text = format!("{:.0}%", (probability * 100.0).clamp(0.0, 100.0));
    if probability >= 0.5 {
        text.blue().bold()
    } else {
        text.dimmed()
    }
}

/// Check-marked confirmation line
pub fn format_ack(message: &str) -> String {
    format!("{} {}", "✓".green(), message)
}

/// Format age in human-readable form
pub fn format_age(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}
