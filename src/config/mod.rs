#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::TomlConfig;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_range, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const MAX_TIMEOUT_SECONDS: u64 = 600;
pub const DEFAULT_DATABASE_PATH: &str = "topic-matcher.db";

/// Resolved settings for one matching engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverConfig {
    pub solver_endpoint: Option<String>,
    pub timeout_seconds: u64,
    pub database_path: String,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            solver_endpoint: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            database_path: DEFAULT_DATABASE_PATH.to_string(),
        }
    }
}

impl SolverConfig {
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            solver_endpoint: Some(endpoint.into()),
            ..Self::default()
        }
    }
}

impl ConfigProvider for SolverConfig {
    fn solver_endpoint(&self) -> Option<&str> {
        self.solver_endpoint.as_deref()
    }

    fn solver_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn database_path(&self) -> &str {
        &self.database_path
    }
}

impl Validate for SolverConfig {
    fn validate(&self) -> Result<()> {
        // A missing endpoint is reported when a round tries to reach the solver.
        if let Some(endpoint) = &self.solver_endpoint {
            validate_url("solver.endpoint", endpoint)?;
        }
        validate_range("solver.timeout_seconds", self.timeout_seconds, 1, MAX_TIMEOUT_SECONDS)?;
        validate_path("store.database_path", &self.database_path)?;
        Ok(())
    }
}
