use reqwest::StatusCode;
use thiserror::Error;

/// Why a lookup could not produce a result.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Required input was missing; nothing was sent upstream.
    #[error("{0}")]
    Validation(String),

    /// The single upstream call failed, returned an error status, or
    /// answered with a body of the wrong shape.
    #[error("{message}")]
    Upstream {
        status: Option<StatusCode>,
        message: String,
    },
}

impl LookupError {
    pub(crate) fn upstream(message: impl Into<String>) -> Self {
        LookupError::Upstream {
            status: None,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Upstream,
}

/// The one failure shape returned by a lookup, naming the city that was asked for.
#[derive(Debug, Error)]
#[error("Failed to get weather for {city}: {source}")]
pub struct WeatherError {
    pub city: String,
    #[source]
    pub source: LookupError,
}

impl WeatherError {
    pub fn kind(&self) -> ErrorKind {
        match self.source {
            LookupError::Validation(_) => ErrorKind::Validation,
            LookupError::Upstream { .. } => ErrorKind::Upstream,
        }
    }

    /// Upstream HTTP status, when the failure was a non-success response.
    pub fn status(&self) -> Option<StatusCode> {
        match &self.source {
            LookupError::Upstream { status, .. } => *status,
            LookupError::Validation(_) => None,
        }
    }
}
