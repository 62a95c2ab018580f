//! Configuration loading via `ortho-config`.

use std::ffi::OsString;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::block_storage::WaitPolicy;
use crate::models::Location;

/// Credentials, endpoint and polling policy derived from environment
/// variables, configuration files, and defaults.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(
    prefix = "E2E",
    discovery(
        app_name = "e2e-provider",
        env_var = "E2E_CONFIG_PATH",
        config_file_name = "e2e-provider.toml",
        dotfile_name = ".e2e-provider.toml",
        project_file_name = "e2e-provider.toml"
    )
)]
pub struct E2eConfig {
    /// API key sent as the `apikey` query parameter. This value is required.
    pub api_key: String,
    /// Bearer token sent in the `Authorization` header. This value is
    /// required.
    pub auth_token: String,
    /// Base URL of the control-plane API.
    #[ortho_config(default = "https://api.e2enetworks.com/myaccount/api/v1/".to_owned())]
    pub api_endpoint: String,
    /// Location used when a command does not name one.
    #[ortho_config(default = "Delhi".to_owned())]
    pub default_location: String,
    /// Seconds between status polls while waiting for a detach.
    #[ortho_config(default = 2)]
    pub poll_interval_secs: u64,
    /// Upper bound in seconds on a single status wait.
    #[ortho_config(default = 600)]
    pub wait_timeout_secs: u64,
    /// Per-request HTTP timeout in seconds.
    #[ortho_config(default = 30)]
    pub request_timeout_secs: u64,
}

/// Metadata for a configuration field, used to generate actionable error messages.
struct FieldMetadata {
    description: &'static str,
    env_var: &'static str,
    toml_key: &'static str,
}

impl FieldMetadata {
    const fn new(description: &'static str, env_var: &'static str, toml_key: &'static str) -> Self {
        Self {
            description,
            env_var,
            toml_key,
        }
    }
}

impl E2eConfig {
    fn require_field(value: &str, metadata: &FieldMetadata) -> Result<(), ConfigError> {
        if value.trim().is_empty() {
            return Err(ConfigError::MissingField(format!(
                "missing {}: set {} or add {} to e2e-provider.toml",
                metadata.description, metadata.env_var, metadata.toml_key
            )));
        }
        Ok(())
    }

    /// Loads configuration without attempting to parse CLI arguments. Values
    /// merge defaults, configuration files, and environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the merge fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([OsString::from("e2e-provider")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Parses [`E2eConfig::default_location`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the value is not a supported
    /// location.
    pub fn location(&self) -> Result<Location, ConfigError> {
        self.default_location
            .parse()
            .map_err(|err: crate::models::UnknownLocation| ConfigError::Invalid(err.to_string()))
    }

    /// Polling policy for status waits.
    #[must_use]
    pub const fn wait_policy(&self) -> WaitPolicy {
        WaitPolicy {
            interval: Duration::from_secs(self.poll_interval_secs),
            timeout: Duration::from_secs(self.wait_timeout_secs),
        }
    }

    /// Performs semantic validation. Error messages include guidance on how
    /// to provide missing values via environment variables or configuration
    /// files.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when a required field is empty
    /// and [`ConfigError::Invalid`] when a value is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::require_field(
            &self.api_key,
            &FieldMetadata::new("E2E API key", "E2E_API_KEY", "api_key"),
        )?;
        Self::require_field(
            &self.auth_token,
            &FieldMetadata::new("E2E auth token", "E2E_AUTH_TOKEN", "auth_token"),
        )?;
        Self::require_field(
            &self.api_endpoint,
            &FieldMetadata::new("API endpoint", "E2E_API_ENDPOINT", "api_endpoint"),
        )?;

        let endpoint = self.api_endpoint.trim();
        if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
            return Err(ConfigError::Invalid(format!(
                "api_endpoint must be an absolute http(s) URL, got '{endpoint}'"
            )));
        }
        self.location()?;
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::Invalid(String::from(
                "poll_interval_secs must be greater than zero",
            )));
        }
        if self.wait_timeout_secs < self.poll_interval_secs {
            return Err(ConfigError::Invalid(String::from(
                "wait_timeout_secs must not be shorter than poll_interval_secs",
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(String::from(
                "request_timeout_secs must be greater than zero",
            )));
        }
        Ok(())
    }
}

/// Errors raised during configuration loading and validation.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Indicates a required configuration field is empty or missing.
    #[error("missing configuration field: {0}")]
    MissingField(String),
    /// Indicates a configuration value is present but unusable.
    #[error("invalid configuration: {0}")]
    Invalid(String),
    /// Surfaces errors from the `ortho-config` loader.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
}

impl From<ortho_config::OrthoError> for ConfigError {
    fn from(value: ortho_config::OrthoError) -> Self {
        Self::Parse(value.to_string())
    }
}
