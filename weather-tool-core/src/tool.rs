//! Explicit tool registration records: a name, a parameter schema and a
//! handler, collected in a [`ToolRegistry`] that a host can publish and invoke.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::{fmt, sync::Arc};
use thiserror::Error;

pub mod weather;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    String,
    Number,
    Integer,
    Boolean,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ParameterType,
    pub description: String,
    pub required: bool,
}

impl ParameterSpec {
    pub fn string(name: &str, description: &str, required: bool) -> Self {
        Self {
            name: name.to_string(),
            kind: ParameterType::String,
            description: description.to_string(),
            required,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParameterSpec>,
}

#[derive(Debug, Error)]
pub enum ToolError {
    /// The caller sent parameters the tool cannot work with.
    #[error("{0}")]
    InvalidInput(String),

    /// The tool accepted the input but could not complete.
    #[error("{0}")]
    Execution(String),

    #[error("Unknown tool '{0}'")]
    UnknownTool(String),

    #[error("Tool '{0}' is already registered")]
    Duplicate(String),
}

/// Execution side of a registered tool.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, parameters: Value) -> Result<Value, ToolError>;
}

#[derive(Clone)]
pub struct ToolRegistration {
    pub definition: ToolDefinition,
    pub handler: Arc<dyn ToolHandler>,
}

impl fmt::Debug for ToolRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistration")
            .field("definition", &self.definition)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<ToolRegistration>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, registration: ToolRegistration) -> Result<(), ToolError> {
        let name = &registration.definition.name;
        if self.get(name).is_some() {
            return Err(ToolError::Duplicate(name.clone()));
        }

        self.tools.push(registration);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ToolRegistration> {
        self.tools.iter().find(|t| t.definition.name == name)
    }

    /// Definitions in registration order.
    pub fn definitions(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.iter().map(|t| &t.definition)
    }

    pub async fn call(&self, name: &str, parameters: Value) -> Result<Value, ToolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        tool.handler.call(parameters).await
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
