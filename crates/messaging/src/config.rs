//! Endpoint configuration for outbound envelopes.
//!
//! Resolved once at startup and passed in; library code never reads the environment.

use crate::{MessagingError, MessagingResult};

pub const DEFAULT_SOURCE_ENDPOINT: &str = "http://mydomain.com/mypath";
pub const DEFAULT_DESTINATION_ENDPOINT: &str = "http://nchs.cdc.gov/vrdr_submission";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessagingConfig {
    source_endpoint: String,
    destination_endpoint: String,
}

impl MessagingConfig {
    /// # Errors
    ///
    /// Returns [`MessagingError::InvalidInput`] if either endpoint is blank.
    pub fn new(
        source_endpoint: impl Into<String>,
        destination_endpoint: impl Into<String>,
    ) -> MessagingResult<Self> {
        let source_endpoint = source_endpoint.into();
        let destination_endpoint = destination_endpoint.into();
        if source_endpoint.trim().is_empty() {
            return Err(MessagingError::InvalidInput(
                "source endpoint cannot be empty".into(),
            ));
        }
        if destination_endpoint.trim().is_empty() {
            return Err(MessagingError::InvalidInput(
                "destination endpoint cannot be empty".into(),
            ));
        }

        Ok(Self {
            source_endpoint,
            destination_endpoint,
        })
    }

    /// Builds a config from optional raw environment values; blank or missing values fall back
    /// to the defaults.
    pub fn from_env_values(source: Option<String>, destination: Option<String>) -> Self {
        let pick = |value: Option<String>, default: &str| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        Self {
            source_endpoint: pick(source, DEFAULT_SOURCE_ENDPOINT),
            destination_endpoint: pick(destination, DEFAULT_DESTINATION_ENDPOINT),
        }
    }

    pub fn source_endpoint(&self) -> &str {
        &self.source_endpoint
    }

    pub fn destination_endpoint(&self) -> &str {
        &self.destination_endpoint
    }
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self::from_env_values(None, None)
    }
}
