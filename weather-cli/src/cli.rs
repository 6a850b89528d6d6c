use anyhow::Context;
use chrono::Local;
use clap::{ArgAction, Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select, Text};
use weather_core::{Config, Session, WeatherSource, provider::source_from_config};

use crate::render::render_outcome;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "SkySync weather dashboard")]
pub struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store API keys in the config file.
    Configure,

    /// Fetch and print the dashboard for a city once.
    Show {
        /// City name; defaults to the configured city, else London.
        city: Option<String>,

        /// Expand the advanced details panel.
        #[arg(long)]
        details: bool,

        /// Print the dashboard as JSON instead of text.
        #[arg(long, conflicts_with = "details")]
        json: bool,
    },

    /// Interactive session: pick a city and press "Get Weather".
    Dashboard,
}

const GET_WEATHER: &str = "Get Weather";
const CHANGE_CITY: &str = "Change city";
const TOGGLE_DETAILS: &str = "Toggle advanced details";
const QUIT: &str = "Quit";

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        tracing::debug!(command = ?self.command, "running command");

        match self.command {
            Command::Configure => configure(),
            Command::Show { city, details, json } => {
                let config = Config::load()?;
                let source = source_from_config(&config)?;
                let city = city.unwrap_or_else(|| config.default_city().to_string());
                show(source.as_ref(), city, details, json).await
            }
            Command::Dashboard => {
                let config = Config::load()?;
                let source = source_from_config(&config)?;
                dashboard(source.as_ref(), config.default_city()).await
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    // Read the file alone so environment overrides are not written back.
    let path = Config::config_file_path()?;
    let mut config = Config::load_from(&path)?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.set_weather_api_key(api_key.trim().to_string());

    let ai_key = Password::new("AI API key (optional, press Enter to skip):")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read AI API key")?;
    if !ai_key.trim().is_empty() {
        config.openai_api_key = Some(ai_key.trim().to_string());
    }

    let city = Text::new("Default city:")
        .with_default(config.default_city())
        .prompt()
        .context("Failed to read default city")?;
    config.default_city = Some(city);

    config.save_to(&path)?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

async fn show(
    source: &dyn WeatherSource,
    city: String,
    details: bool,
    json: bool,
) -> anyhow::Result<()> {
    let mut session = Session::new(city);
    session.request_weather();

    let Some(outcome) = session.refresh(source, &Local).await? else {
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
    } else {
        print!("{}", render_outcome(outcome, details));
    }

    Ok(())
}

async fn dashboard(source: &dyn WeatherSource, default_city: &str) -> anyhow::Result<()> {
    let city = Text::new("Enter City name").with_default(default_city).prompt()?;
    let mut session = Session::new(city);
    let mut show_details = false;

    loop {
        let prompt = format!("City: {}", session.city());
        let choice = Select::new(&prompt, vec![GET_WEATHER, CHANGE_CITY, TOGGLE_DETAILS, QUIT])
            .prompt()?;

        match choice {
            GET_WEATHER => {
                session.request_weather();
                refresh_and_print(&mut session, source, show_details).await;
            }
            CHANGE_CITY => {
                let city = Text::new("Enter City name").with_default(session.city()).prompt()?;
                session.set_city(city);
                refresh_and_print(&mut session, source, show_details).await;
            }
            TOGGLE_DETAILS => {
                show_details = !show_details;
                if let Some(outcome) = session.last_outcome() {
                    print!("{}", render_outcome(outcome, show_details));
                }
            }
            _ => return Ok(()),
        }
    }
}

/// Errors are printed, not returned, so the session survives a failed fetch.
async fn refresh_and_print(session: &mut Session, source: &dyn WeatherSource, show_details: bool) {
    match session.refresh(source, &Local).await {
        Ok(Some(outcome)) => print!("{}", render_outcome(outcome, show_details)),
        Ok(None) => {}
        Err(err) => eprintln!("error: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_show_with_flags() {
        let cli = Cli::try_parse_from(["weather", "-vv", "show", "Paris", "--details"])
            .expect("valid args");

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Show { city, details, json } => {
                assert_eq!(city.as_deref(), Some("Paris"));
                assert!(details);
                assert!(!json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn show_city_is_optional() {
        let cli = Cli::try_parse_from(["weather", "show"]).expect("valid args");
        assert!(matches!(cli.command, Command::Show { city: None, .. }));
    }

    #[test]
    fn json_conflicts_with_details() {
        assert!(Cli::try_parse_from(["weather", "show", "--json", "--details"]).is_err());
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
