use colored::Colorize;

use crate::cli::args::{ConfigArgs, ConfigCommands, OutputFormat};
use crate::config::{Config, Paths};
use crate::error::{Result, WeatherError};
use crate::output;

/// Handle the config command
pub fn config(
    config: &mut Config,
    paths: &Paths,
    args: &ConfigArgs,
    format: OutputFormat,
) -> Result<String> {
    match &args.command {
        ConfigCommands::Show => config_show(config, format),
        ConfigCommands::Set { key, value } => config_set(config, paths, key, value, format),
        ConfigCommands::Path => config_path(paths, format),
        ConfigCommands::Init => config_init(config, paths, format),
    }
}

/// Show only the ends of a secret
fn mask(key: &str) -> String {
    if key.len() > 8 && key.is_ascii() {
        format!("{}...{}", &key[..4], &key[key.len() - 4..])
    } else {
        "****".to_string()
    }
}

/// Show current configuration
fn config_show(config: &Config, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Pretty => {
            let not_set = || "(not set)".dimmed().to_string();
            let mut output = String::new();
            output.push_str(&format!("{}\n", "Configuration".bold()));
            output.push_str(&"─".repeat(40));
            output.push('\n');

            output.push_str(&format!("\n{}\n", "[api]".cyan()));
            let key_display = config.api.key.as_deref().map(mask).unwrap_or_else(not_set);
            output.push_str(&format!("  key = {}\n", key_display));

            output.push_str(&format!("\n{}\n", "[cache]".cyan()));
            let dir_display = config
                .cache
                .dir
                .as_ref()
                .map(|d| d.display().to_string())
                .unwrap_or_else(not_set);
            output.push_str(&format!("  dir = {}\n", dir_display));
            output.push_str(&format!("  filename = {}\n", config.cache.filename));
            output.push_str(&format!("  ttl_secs = {}\n", config.cache.ttl_secs));

            output.push_str(&format!("\n{}\n", "[network]".cyan()));
            output.push_str(&format!("  probe_url = {}\n", config.network.probe_url));
            output.push_str(&format!("  max_attempts = {}\n", config.network.max_attempts));
            output.push_str(&format!("  backoff_secs = {}\n", config.network.backoff_secs));
            output.push_str(&format!("  timeout_secs = {}\n", config.network.timeout_secs));

            output.push_str(&format!("\n{}\n", "[provider]".cyan()));
            output.push_str(&format!("  base_url = {}\n", config.provider.base_url));
            output.push_str(&format!("  units = {}\n", config.provider.units));
            output.push_str(&format!("  exclude = {}\n", config.provider.exclude));

            output.push_str(&format!("\n{}\n", "[log]".cyan()));
            let file_display = config
                .log
                .file
                .as_ref()
                .map(|f| f.display().to_string())
                .unwrap_or_else(not_set);
            output.push_str(&format!("  file = {}\n", file_display));

            Ok(output)
        }
        OutputFormat::Json => {
            let mut safe_config = config.clone();
            safe_config.api.key = safe_config.api.key.as_deref().map(mask);
            Ok(serde_json::to_string_pretty(&safe_config)?)
        }
    }
}

/// Set a configuration value
fn config_set(
    config: &mut Config,
    paths: &Paths,
    key: &str,
    value: &str,
    format: OutputFormat,
) -> Result<String> {
    config.set_value(key, value)?;
    config.save_to(paths)?;

    let shown = if key == "api.key" { mask(value) } else { value.to_string() };
    output::format_ack(
        &format!("Set {} = {}", key, shown),
        &serde_json::json!({
            "success": true,
            "key": key,
            "value": shown,
        }),
        format,
    )
}

/// Show configuration file path
fn config_path(paths: &Paths, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Pretty => {
            let mut output = String::new();
            output.push_str(&format!("Config file: {}\n", paths.config_file.display()));
            output.push_str(&format!(
                "Exists: {}\n",
                if paths.config_exists() {
                    "yes".green()
                } else {
                    "no".yellow()
                }
            ));
            Ok(output)
        }
        OutputFormat::Json => {
            let result = serde_json::json!({
                "path": paths.config_file.display().to_string(),
                "exists": paths.config_exists()
            });
            Ok(serde_json::to_string_pretty(&result)?)
        }
    }
}

/// Initialize configuration interactively
fn config_init(config: &mut Config, paths: &Paths, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return Err(WeatherError::InvalidArgument(
            "config init requires interactive mode (--output pretty)".to_string(),
        ));
    }

    println!("{}", "Weatherbar Configuration".bold());
    println!("{}", "─".repeat(40));
    println!();

    let key = rpassword::prompt_password("Enter your OpenWeather API key: ")?;
    let key = key.trim().to_string();

    if key.is_empty() {
        return Err(WeatherError::InvalidArgument(
            "API key cannot be empty".to_string(),
        ));
    }

    config.set_api_key(key);
    config.save_to(paths)?;

    Ok(format!(
        "\n{} Configuration saved to: {}\n\nRun '{}' to see the current weather.",
        "✓".green(),
        paths.config_file.display(),
        "weatherbar".cyan()
    ))
}
