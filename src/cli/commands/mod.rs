pub mod cache;
mod config;
mod forecast;

pub use self::config::config;
pub use self::forecast::{forecast, render};
