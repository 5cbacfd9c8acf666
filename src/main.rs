use clap::Parser;
use colored::{control::set_override, Colorize};
use is_terminal::IsTerminal;
use tracing::{debug, info};

use weatherbar::cli::args::{Cli, Commands, CompletionsArgs};
use weatherbar::cli::commands;
use weatherbar::config::{Config, Paths};
use weatherbar::error::WeatherError;
use weatherbar::logging;

fn main() {
    // Respect NO_COLOR environment variable (https://no-color.org/)
    // Also disable colors when stdout is not a terminal (for piping)
    if std::env::var("NO_COLOR").is_ok() || !std::io::stdout().is_terminal() {
        set_override(false);
    }

    if let Err(e) = run() {
        if e.is_silent() {
            info!(error = %e, "Nothing to show");
        } else {
            eprintln!("{}: {}", "error".red().bold(), e);
        }
        std::process::exit(e.exit_code());
    }
}

fn run() -> Result<(), WeatherError> {
    let cli = Cli::parse();
    let format = cli.output;

    // Handle completions command early (no config needed)
    if let Some(Commands::Completions(CompletionsArgs { shell })) = &cli.command {
        Cli::print_completions(*shell);
        return Ok(());
    }

    let paths = Paths::new()?;
    let mut config = Config::load_from(&paths)?;

    let log_file = cli.log_file.as_deref().or(config.log.file.as_deref());
    logging::init(cli.verbose, log_file)?;
    debug!(config = %paths.config_file.display(), "Configuration loaded");

    let output = match &cli.command {
        None => commands::forecast(
            &config,
            &paths,
            cli.api_key.as_deref(),
            cli.force,
            cli.view.view(),
            format,
        )?,
        Some(Commands::Config(args)) => commands::config(&mut config, &paths, args, format)?,
        Some(Commands::Cache(args)) => commands::cache::handle(&config, &paths, args, format)?,
        Some(Commands::Completions(_)) => unreachable!(), // Handled above
    };

    if !output.is_empty() {
        println!("{output}");
    }

    Ok(())
}
