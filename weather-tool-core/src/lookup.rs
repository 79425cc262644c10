//! The weather lookup adapter: validate, then answer from fallback data or
//! from one live upstream call.

use anyhow::Result;
use tracing::{debug, warn};

use crate::{
    config::Config,
    error::{LookupError, WeatherError},
    model::{LocationQuery, WeatherResult},
    provider::{OpenWeatherClient, http_client},
};

const FALLBACK_TEMPERATURE: f64 = 22.0;
const FALLBACK_TEMPERATURE_IMPERIAL: f64 = 72.0;
const FALLBACK_CONDITION: &str = "sunny";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupMode {
    Fallback,
    Live,
}

#[derive(Debug, Clone)]
pub struct WeatherLookup {
    live: Option<OpenWeatherClient>,
}

impl WeatherLookup {
    /// Build the adapter; live mode is selected when `config` carries a non-blank API key.
    pub fn new(config: &Config) -> Result<Self> {
        let live = match config.api_key() {
            Some(key) => Some(OpenWeatherClient::new(
                key.to_string(),
                config.openweather_url.clone(),
                http_client(config)?,
            )),
            None => None,
        };

        Ok(Self { live })
    }

    pub fn mode(&self) -> LookupMode {
        if self.live.is_some() {
            LookupMode::Live
        } else {
            LookupMode::Fallback
        }
    }

    pub async fn lookup(&self, query: &LocationQuery) -> Result<WeatherResult, WeatherError> {
        self.resolve(query).await.map_err(|source| {
            warn!(city = %query.city, error = %source, "weather lookup failed");
            WeatherError {
                city: query.city.clone(),
                source,
            }
        })
    }

    async fn resolve(&self, query: &LocationQuery) -> Result<WeatherResult, LookupError> {
        validate(query)?;

        match &self.live {
            Some(client) => {
                debug!(location = %query.location_term(), "live weather lookup");
                client.fetch_current(query).await
            }
            None => {
                debug!(location = %query.location_term(), "fallback weather lookup");
                Ok(fallback(query))
            }
        }
    }
}

fn validate(query: &LocationQuery) -> Result<(), LookupError> {
    let missing_city = query.city.trim().is_empty();
    let missing_country = query.country.trim().is_empty();

    let message = match (missing_city, missing_country) {
        (false, false) => return Ok(()),
        (true, true) => "City and Country are required and cannot be empty",
        (true, false) => "City is required and cannot be empty",
        (false, true) => "Country is required and cannot be empty",
    };

    Err(LookupError::Validation(message.to_string()))
}

fn fallback(query: &LocationQuery) -> WeatherResult {
    let temperature = if query.prefers_imperial() {
        FALLBACK_TEMPERATURE_IMPERIAL
    } else {
        FALLBACK_TEMPERATURE
    };

    WeatherResult {
        temperature,
        condition: FALLBACK_CONDITION.to_string(),
        location: query.display_location(),
    }
}
