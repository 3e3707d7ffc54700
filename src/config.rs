//! Runtime configuration
//!
//! Everything is read from the environment; there is no config file.

use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/api/plan";
pub const DEFAULT_HISTORY_VIEW: usize = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
    #[error("TRIP_PLANNER_URL must not be empty")]
    EmptyEndpoint,
}

/// Configuration for the planner front end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerConfig {
    /// Planning endpoint that receives `POST {"request": ...}`
    pub endpoint: String,
    /// Transport-level timeout. The controllers never enforce one themselves.
    pub request_timeout: Option<Duration>,
    /// How many history entries the UI shows by default
    pub history_view: usize,
    pub log_json: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout: None,
            history_view: DEFAULT_HISTORY_VIEW,
            log_json: false,
        }
    }
}

impl PlannerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (the environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let endpoint = match lookup("TRIP_PLANNER_URL") {
            Some(url) if url.trim().is_empty() => return Err(ConfigError::EmptyEndpoint),
            Some(url) => url.trim().to_string(),
            None => DEFAULT_ENDPOINT.to_string(),
        };

        let request_timeout = lookup("TRIP_PLANNER_TIMEOUT_SECS")
            .map(|v| parse_positive("TRIP_PLANNER_TIMEOUT_SECS", &v))
            .transpose()?
            .map(Duration::from_secs);

        let history_view = lookup("TRIP_PLANNER_HISTORY_VIEW")
            .map(|v| parse_positive("TRIP_PLANNER_HISTORY_VIEW", &v))
            .transpose()?
            .map_or(DEFAULT_HISTORY_VIEW, |n| usize::try_from(n).unwrap_or(usize::MAX));

        let log_json = lookup("TRIP_PLANNER_LOG_JSON")
            .is_some_and(|v| matches!(v.trim(), "1" | "true" | "yes"));

        Ok(Self {
            endpoint,
            request_timeout,
            history_view,
            log_json,
        })
    }
}

fn parse_positive(var: &'static str, value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidNumber {
            var,
            value: value.to_string(),
        }),
    }
}
