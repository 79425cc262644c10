use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, FixedOffset};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{
    config::Config,
    model::{CoordinateQuery, CurrentConditions},
};

use super::{http_client, truncate_body};

/// Variables requested from the `current` block, in this order.
const CURRENT_VARIABLES: &str = "temperature_2m,rain,snowfall,wind_speed_10m";

/// Client for the key-less Open-Meteo forecast endpoint.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    url: String,
    http: Client,
}

impl OpenMeteoClient {
    pub fn new(url: String, http: Client) -> Self {
        Self { url, http }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.openmeteo_url.clone(), http_client(config)?))
    }

    pub async fn fetch_current(&self, query: &CoordinateQuery) -> Result<CurrentConditions> {
        let latitude = query.latitude.to_string();
        let longitude = query.longitude.to_string();

        debug!(url = %self.url, %latitude, %longitude, "requesting current conditions");

        let res = self
            .http
            .get(&self.url)
            .query(&[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("current", CURRENT_VARIABLES),
                ("timezone", "auto"),
                ("timeformat", "unixtime"),
            ])
            .send()
            .await
            .context("Failed to send request to Open-Meteo (current conditions)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read Open-Meteo response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Open-Meteo request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: OmResponse =
            serde_json::from_str(&body).context("Failed to parse Open-Meteo JSON")?;

        parsed.into_conditions()
    }
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    time: i64,
    temperature_2m: f64,
    rain: f64,
    snowfall: f64,
    wind_speed_10m: f64,
}

#[derive(Debug, Deserialize)]
struct OmResponse {
    latitude: f64,
    longitude: f64,
    elevation: f64,
    utc_offset_seconds: i32,
    current: OmCurrent,
}

impl OmResponse {
    fn into_conditions(self) -> Result<CurrentConditions> {
        let offset = FixedOffset::east_opt(self.utc_offset_seconds)
            .ok_or_else(|| anyhow!("Invalid UTC offset {}s", self.utc_offset_seconds))?;
        let time = DateTime::from_timestamp(self.current.time, 0)
            .ok_or_else(|| anyhow!("Invalid observation timestamp {}", self.current.time))?
            .with_timezone(&offset);

        Ok(CurrentConditions {
            latitude: self.latitude,
            longitude: self.longitude,
            elevation: self.elevation,
            utc_offset_seconds: self.utc_offset_seconds,
            time,
            temperature_2m: self.current.temperature_2m,
            rain: self.current.rain,
            snowfall: self.current.snowfall,
            wind_speed_10m: self.current.wind_speed_10m,
        })
    }
}
