use anyhow::Context;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;
use weather_tool_core::{
    Config, CoordinateQuery, CurrentConditions, LocationQuery, ToolRegistry, WeatherLookup,
    WeatherResult, provider::OpenMeteoClient, tool::weather,
};

use crate::service;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-tool", version, about = "Weather tool service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Host the registered tools over HTTP.
    Serve {
        /// Port to listen on; overrides PORT and the config file.
        #[arg(long)]
        port: Option<u16>,
    },

    /// Store an OpenWeatherMap API key in the config file.
    Configure,

    /// Look up current weather for a city once and print it.
    Lookup {
        #[arg(long)]
        city: String,

        /// State or region code, e.g. "KY" or "NSW".
        #[arg(long)]
        state: Option<String>,

        /// Country code, e.g. "US" or "FR".
        #[arg(long)]
        country: String,

        /// "imperial", "metric", or empty for Kelvin.
        #[arg(long, default_value = "")]
        units: String,
    },

    /// Print current conditions for a coordinate from Open-Meteo.
    Current {
        #[arg(long, default_value_t = 60.93, allow_negative_numbers = true)]
        latitude: f64,

        #[arg(long, default_value_t = 10.69, allow_negative_numbers = true)]
        longitude: f64,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Serve { port } => {
                let config = Config::load()?;
                let port = match port {
                    Some(port) => port,
                    None => config.serve_port(|name| std::env::var(name).ok())?,
                };
                let lookup = WeatherLookup::new(&config)?;
                info!(mode = ?lookup.mode(), "weather lookup configured");

                let mut registry = ToolRegistry::new();
                registry.register(weather::registration(Arc::new(lookup)))?;

                service::serve(port, registry).await?;
            }
            Command::Configure => {
                let mut config = Config::load()?;
                let key = inquire::Password::new("OpenWeatherMap API key:")
                    .without_confirmation()
                    .with_help_message("Leave empty to use fallback data")
                    .prompt()
                    .context("Failed to read API key")?;

                config.set_api_key(key.trim().to_string());
                let path = config.save()?;
                println!("Saved configuration to {}", path.display());
            }
            Command::Lookup {
                city,
                state,
                country,
                units,
            } => {
                let config = Config::load()?;
                let lookup = WeatherLookup::new(&config)?;
                let query = LocationQuery {
                    city,
                    state,
                    country,
                    units,
                };

                let result = lookup.lookup(&query).await?;
                print_weather(&result);
            }
            Command::Current {
                latitude,
                longitude,
            } => {
                let config = Config::load()?;
                let client = OpenMeteoClient::from_config(&config)?;
                let current = client
                    .fetch_current(&CoordinateQuery {
                        latitude,
                        longitude,
                    })
                    .await?;
                print_current(&current);
            }
        }

        Ok(())
    }
}

fn print_weather(result: &WeatherResult) {
    println!("Location:    {}", result.location);
    println!("Temperature: {}", result.temperature);
    println!("Condition:   {}", result.condition);
}

fn print_current(current: &CurrentConditions) {
    println!("Coordinates: {}°N {}°E", current.latitude, current.longitude);
    println!("Elevation: {}m asl", current.elevation);
    println!("Timezone difference to GMT+0: {}s", current.utc_offset_seconds);
    println!();
    println!("Current time: {}", current.time);
    println!("Current temperature_2m: {}", current.temperature_2m);
    println!("Current rain: {}", current.rain);
    println!("Current snowfall: {}", current.snowfall);
    println!("Current wind_speed_10m: {}", current.wind_speed_10m);
}
