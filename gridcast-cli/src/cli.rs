use anyhow::Context;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::debug;

use gridcast_core::{
    Config, ForecastWorkflow, GeolocateOptions, GeolocationPort, IpLocator, NwsClient, Phase,
    WorkflowState,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "gridcast", version, about = "Gridpoint forecast lookup for US coordinates")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the forecast for a coordinate pair.
    Forecast {
        /// Latitude in decimal degrees, -90 to 90.
        #[arg(requires = "longitude", allow_negative_numbers = true)]
        latitude: Option<f64>,

        /// Longitude in decimal degrees, -180 to 180.
        #[arg(allow_negative_numbers = true)]
        longitude: Option<f64>,
    },

    /// Detect your location and show its forecast.
    Locate,

    /// Store the contact string sent with every forecast request.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Forecast { latitude, longitude } => forecast(latitude, longitude).await,
            Command::Locate => locate().await,
            Command::Configure => configure(),
        }
    }
}

async fn forecast(latitude: Option<f64>, longitude: Option<f64>) -> anyhow::Result<()> {
    let config = Config::load()?;

    // Absent arguments fall back to the configured home position.
    let latitude = latitude.unwrap_or(config.default_latitude);
    let longitude = longitude.unwrap_or(config.default_longitude);
    debug!(latitude, longitude, "starting forecast lookup");

    let workflow = build_workflow(&config)?;

    println!("{}", render::heading(latitude, longitude));
    let state = workflow.run(latitude, longitude).await;
    emit(&state);

    Ok(())
}

async fn locate() -> anyhow::Result<()> {
    let config = Config::load()?;
    let locator = IpLocator::new()?;

    println!("Detecting your location...");
    let state = match locator.locate(&GeolocateOptions::default()).await {
        Ok(position) => {
            let workflow = build_workflow(&config)?;
            println!("{}", render::heading(position.latitude(), position.longitude()));
            workflow.run(position.latitude(), position.longitude()).await
        }
        Err(error) => WorkflowState::from_geolocate_error(&error),
    };
    emit(&state);

    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let contact = inquire::Text::new("Contact e-mail or URL for the service User-Agent:")
        .with_help_message("The forecast service asks every client to identify its operator")
        .prompt()
        .context("Failed to read contact")?;

    let trimmed = contact.trim();
    if trimmed.is_empty() {
        anyhow::bail!(
            "Contact must not be empty.\n\
             Hint: run `gridcast configure` again and enter an e-mail address or URL."
        );
    }

    config.contact = Some(trimmed.to_string());
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn build_workflow(config: &Config) -> anyhow::Result<ForecastWorkflow> {
    let source = NwsClient::from_config(config)?;
    Ok(ForecastWorkflow::new(Arc::new(source)))
}

// Error banners go to stderr; forecasts and progress stay on stdout.
fn emit(state: &WorkflowState) {
    let text = render::state(state);
    if uses_stderr(state) {
        eprint!("{text}");
    } else {
        print!("{text}");
    }
}

fn uses_stderr(state: &WorkflowState) -> bool {
    state.phase() == Phase::Error
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridcast_core::{ErrorKind, ForecastMeta, WorkflowError, WorkflowEvent};

    #[test]
    fn error_banners_route_to_stderr() {
        let failed = WorkflowState::default().apply(&WorkflowEvent::Failed(WorkflowError {
            kind: ErrorKind::Network,
            message: "Grid lookup failed with status 404.".to_string(),
        }));

        assert!(uses_stderr(&failed));
    }

    #[test]
    fn non_error_snapshots_stay_on_stdout() {
        let idle = WorkflowState::default();
        assert!(!uses_stderr(&idle));

        let loading = idle.apply(&WorkflowEvent::Started);
        assert!(!uses_stderr(&loading));

        let done = loading.apply(&WorkflowEvent::Succeeded {
            meta: ForecastMeta {
                office: "LOT".to_string(),
                grid_x: 75,
                grid_y: 73,
                period_count: 0,
                relative_location: None,
            },
            periods: Vec::new(),
        });
        assert!(!uses_stderr(&done));
    }
}
