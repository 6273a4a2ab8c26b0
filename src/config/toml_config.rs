use crate::config::{SolverConfig, DEFAULT_DATABASE_PATH, DEFAULT_TIMEOUT_SECONDS};
use crate::core::ConfigProvider;
use crate::utils::error::{MatchError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub solver: SolverSection,
    #[serde(default)]
    pub store: StoreSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolverSection {
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSection {
    pub database_path: Option<String>,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"))
}

impl TomlConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        let mut config: TomlConfig =
            toml::from_str(&processed_content).map_err(|e| MatchError::ConfigError {
                message: format!("TOML parsing error: {}", e),
            })?;

        // An endpoint left as an unresolved ${VAR} counts as not configured.
        if config
            .solver
            .endpoint
            .as_deref()
            .is_some_and(|e| env_var_pattern().is_match(e))
        {
            tracing::warn!("Solver endpoint references an unset environment variable");
            config.solver.endpoint = None;
        }

        Ok(config)
    }

    /// Expand `${VAR}` references from the environment, leaving unset ones as-is.
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn to_solver_config(&self) -> SolverConfig {
        SolverConfig {
            solver_endpoint: self.solver.endpoint.clone(),
            timeout_seconds: self.solver.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS),
            database_path: self
                .store
                .database_path
                .clone()
                .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string()),
        }
    }
}

impl ConfigProvider for TomlConfig {
    fn solver_endpoint(&self) -> Option<&str> {
        self.solver.endpoint.as_deref()
    }

    fn solver_timeout(&self) -> Duration {
        Duration::from_secs(self.solver.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }

    fn database_path(&self) -> &str {
        self.store
            .database_path
            .as_deref()
            .unwrap_or(DEFAULT_DATABASE_PATH)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.to_solver_config().validate()
    }
}
