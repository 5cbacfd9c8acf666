use std::io;
use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

/// Cached, location-aware weather for status bars
#[derive(Parser)]
#[command(name = "weatherbar")]
#[command(version, propagate_version = true)]
#[command(about = "Cached, location-aware weather for status bars and terminal widgets")]
pub struct Cli {
    /// Output format for command results
    #[arg(short, long, value_enum, default_value = "pretty", global = true)]
    pub output: OutputFormat,

    /// Log progress to stderr (or the log file)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Append log events to this file instead of stderr
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// OpenWeather API key (overrides the config file)
    #[arg(long, env = "OPENWEATHER", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Ignore the cache age and poll the provider
    #[arg(short, long)]
    pub force: bool,

    #[command(flatten)]
    pub view: ViewArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Write a completion script for `shell` to stdout
    pub fn print_completions(shell: Shell) {
        let mut cmd = Self::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
    }
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Colored, human-readable output
    #[default]
    Pretty,
    /// JSON output for scripting
    Json,
}

/// Forecast view selection, at most one
#[derive(Args, Debug, Default)]
#[group(multiple = false)]
pub struct ViewArgs {
    /// Hourly forecast for the rest of today
    #[arg(short, long)]
    pub day: bool,

    /// Hourly forecast for tomorrow
    #[arg(short, long)]
    pub tomorrow: bool,

    /// Daily forecast for the coming week
    #[arg(short, long)]
    pub week: bool,
}

/// What the forecast command prints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Current,
    Today,
    Tomorrow,
    Week,
}

impl ViewArgs {
    pub fn view(&self) -> View {
        if self.day {
            View::Today
        } else if self.tomorrow {
            View::Tomorrow
        } else if self.week {
            View::Week
        } else {
            View::Current
        }
    }
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Manage configuration
    Config(ConfigArgs),

    /// Inspect or clear the forecast cache
    Cache(CacheArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the config command
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Config subcommands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (e.g., cache.ttl_secs)
        key: String,
        /// Value to set
        value: String,
    },
    /// Show configuration file path
    Path,
    /// Initialize configuration interactively
    Init,
}

/// Arguments for the cache command
#[derive(Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommands,
}

/// Cache subcommands
#[derive(Subcommand)]
pub enum CacheCommands {
    /// Show cache file location, age and freshness
    Status,
    /// Delete the cached forecast
    Clear,
}

/// Arguments for the completions command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}
