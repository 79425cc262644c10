//! Core library for the weather tool service.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weather lookup adapter (validation, fallback data, live upstream call)
//! - HTTP clients for OpenWeatherMap and Open-Meteo
//! - Tool registration records that a host can publish and invoke
//!
//! It is used by `weather-tool-server`, but can also be embedded in other hosts.

pub mod config;
pub mod error;
pub mod lookup;
pub mod model;
pub mod provider;
pub mod tool;

pub use config::Config;
pub use error::{ErrorKind, LookupError, WeatherError};
pub use lookup::{LookupMode, WeatherLookup};
pub use model::{CoordinateQuery, CurrentConditions, LocationQuery, WeatherResult};
pub use tool::{ToolDefinition, ToolError, ToolHandler, ToolRegistration, ToolRegistry};
