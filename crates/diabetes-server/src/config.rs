//! Environment-driven server configuration.

use std::env;
use std::num::ParseIntError;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_LR_MODEL_PATH: &str = "models/lr_pipeline.onnx";
const DEFAULT_DT_MODEL_PATH: &str = "models/dt_pipeline.onnx";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid PORT '{value}': {source}")]
    InvalidPort {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("Unknown STARTUP_POLICY '{0}' (expected 'fail_fast' or 'degraded')")]
    UnknownPolicy(String),
}

/// What to do when the model artifacts cannot be loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartupPolicy {
    /// Exit with an error.
    #[default]
    FailFast,
    /// Keep serving; `/predict` answers 503 until restarted with valid models.
    Degraded,
}

impl FromStr for StartupPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail_fast" | "fail-fast" => Ok(StartupPolicy::FailFast),
            "degraded" => Ok(StartupPolicy::Degraded),
            _ => Err(ConfigError::UnknownPolicy(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub lr_model_path: PathBuf,
    pub dt_model_path: PathBuf,
    pub startup_policy: StartupPolicy,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|source| ConfigError::InvalidPort { value, source })?,
            None => DEFAULT_PORT,
        };

        let startup_policy = lookup("STARTUP_POLICY")
            .map(|v| v.parse::<StartupPolicy>())
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.into()),
            port,
            lr_model_path: lookup("LR_MODEL_PATH")
                .unwrap_or_else(|| DEFAULT_LR_MODEL_PATH.into())
                .into(),
            dt_model_path: lookup("DT_MODEL_PATH")
                .unwrap_or_else(|| DEFAULT_DT_MODEL_PATH.into())
                .into(),
            startup_policy,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
