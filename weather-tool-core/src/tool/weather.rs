use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::{
    error::ErrorKind,
    lookup::WeatherLookup,
    model::LocationQuery,
};

use super::{ParameterSpec, ToolDefinition, ToolError, ToolHandler, ToolRegistration};

pub const TOOL_NAME: &str = "get_weather";

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: TOOL_NAME.to_string(),
        description: "Gets current weather for a location based on City name, State or Region \
                      code, and Country code. Set preferred Units."
            .to_string(),
        parameters: vec![
            ParameterSpec::string("city", "The name of the city.", true),
            ParameterSpec::string(
                "state",
                "The code for the state. E.g. 'KY' for Kentucky or 'NSW' for New South Wales.",
                false,
            ),
            ParameterSpec::string(
                "country",
                "The country code. E.g. 'US' for United States or 'FR' for France.",
                true,
            ),
            ParameterSpec::string(
                "units",
                "Options are Imperial for Fahrenheit, Metric for Celsius. If left blank, \
                 this will return temperature in Kelvin.",
                true,
            ),
        ],
    }
}

/// The `get_weather` record, ready to hand to a host.
pub fn registration(lookup: Arc<WeatherLookup>) -> ToolRegistration {
    ToolRegistration {
        definition: definition(),
        handler: Arc::new(WeatherHandler { lookup }),
    }
}

struct WeatherHandler {
    lookup: Arc<WeatherLookup>,
}

#[async_trait]
impl ToolHandler for WeatherHandler {
    async fn call(&self, parameters: Value) -> Result<Value, ToolError> {
        let query: LocationQuery = serde_json::from_value(parameters)
            .map_err(|err| ToolError::InvalidInput(format!("Invalid parameters: {err}")))?;

        let result = self.lookup.lookup(&query).await.map_err(|err| match err.kind() {
            ErrorKind::Validation => ToolError::InvalidInput(err.to_string()),
            ErrorKind::Upstream => ToolError::Execution(err.to_string()),
        })?;

        serde_json::to_value(result)
            .map_err(|err| ToolError::Execution(format!("Failed to encode result: {err}")))
    }
}
