use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use std::path::PathBuf;
use tracing::{debug, info};
use weatherapp_core::{
    AppContext, Config, DisplaySurface, FileSurface, HtmlBuffer, Key, Presenter, SearchController,
    SearchOutcome, UiEvent, provider::provider_from_config,
};

use crate::output::StdoutSurface;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weatherapp",
    version,
    about = "Current weather and a 5-day forecast for any city"
)]
pub struct Cli {
    /// OpenWeather API key; takes precedence over the configured one.
    #[arg(long, global = true, env = "WEATHERAPP_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store an OpenWeather API key.
    Configure,

    /// Look up one city and print the resulting HTML.
    Search {
        /// City name.
        city: String,

        /// Write the HTML to this file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Prompt for cities until cancelled with Esc or Ctrl-C.
    Interactive {
        /// Keep this HTML file updated with the current view instead of printing it.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Search { city, out } => {
                let controller = build_controller(self.api_key)?;
                match out {
                    Some(path) => {
                        search_once(&controller, &mut FileSurface::new(path), &city).await
                    }
                    None => {
                        let mut buffer = HtmlBuffer::new();
                        let result = search_once(&controller, &mut buffer, &city).await;
                        println!("{}", buffer.content().trim());
                        result
                    }
                }
            }
            Command::Interactive { out } => {
                let controller = build_controller(self.api_key)?;
                match out {
                    Some(path) => {
                        println!("Writing weather to {}", path.display());
                        interactive(&controller, FileSurface::new(path)).await
                    }
                    None => interactive(&controller, StdoutSurface).await,
                }
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim();
    if api_key.is_empty() {
        return Err(anyhow!("API key must not be empty"));
    }

    config.set_api_key(api_key.to_string());
    config.save()?;

    println!("Saved API key to {}", Config::config_file_path()?.display());
    Ok(())
}

fn build_controller(api_key: Option<String>) -> anyhow::Result<SearchController> {
    let mut config = Config::load()?;
    if let Some(key) = api_key {
        debug!("using API key from command line or environment");
        config.set_api_key(key);
    }

    let provider = provider_from_config(&config)?;
    let presenter =
        Presenter::from_config(&config).context("Failed to prepare display templates")?;

    Ok(SearchController::new(provider, presenter))
}

/// Run a single search cycle; a failed search or an undelivered view becomes
/// an error exit.
async fn search_once<S: DisplaySurface>(
    controller: &SearchController,
    surface: &mut S,
    city: &str,
) -> anyhow::Result<()> {
    let mut ctx = AppContext::new(surface);
    let outcome = controller.submit_search(&mut ctx, city).await;

    if let Some(err) = ctx.take_write_error() {
        return Err(err).context("Failed to write weather output");
    }

    match outcome {
        SearchOutcome::Failure(err) => Err(anyhow!(err.user_message())),
        SearchOutcome::Success | SearchOutcome::Ignored => Ok(()),
    }
}

async fn interactive<S: DisplaySurface>(
    controller: &SearchController,
    surface: S,
) -> anyhow::Result<()> {
    let mut ctx = AppContext::new(surface);
    controller.show_welcome(&mut ctx);

    loop {
        let input = Text::new("City:")
            .with_help_message("Enter to search, Esc to quit")
            .prompt();

        let value = match input {
            Ok(value) => value,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read city"),
        };

        controller.dispatch(&mut ctx, UiEvent::Input(value)).await;
        let outcome = controller
            .dispatch(&mut ctx, UiEvent::KeyPress(Key::Enter))
            .await;
        info!(?outcome, "search finished");
    }

    Ok(())
}
