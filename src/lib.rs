//! Cached, location-aware weather for status bars
//!
//! One invocation checks connectivity, serves the cached One Call document
//! while it is fresh, and otherwise resolves the machine's location, polls
//! OpenWeather and commits the reply before rendering a view of it.

pub mod acquire;
pub mod cache;
pub mod cli;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod forecast;
pub mod location;
pub mod logging;
pub mod openweather;
pub mod output;

#[cfg(test)]
mod test_support;
