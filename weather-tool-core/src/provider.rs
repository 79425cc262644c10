//! HTTP clients for the upstream weather services.

pub mod openmeteo;
pub mod openweather;

pub use openmeteo::OpenMeteoClient;
pub use openweather::OpenWeatherClient;

use anyhow::{Context, Result};
use reqwest::Client;

use crate::config::Config;

/// HTTP client shared by the upstream clients, with the configured timeout applied.
pub fn http_client(config: &Config) -> Result<Client> {
    Client::builder()
        .timeout(config.request_timeout())
        .build()
        .context("Failed to build HTTP client")
}

/// Shorten an upstream body for inclusion in an error message.
fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
