use crate::config::{SolverConfig, TomlConfig};
use crate::utils::error::Result;
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "topic-matcher")]
#[command(about = "Assign students to topics through an external matching solver")]
pub struct CliConfig {
    /// Solver endpoint receiving the matching request
    #[arg(long, env = "SOLVER_ENDPOINT")]
    pub solver_endpoint: Option<String>,

    /// SQLite database holding students, topics and instructors
    #[arg(long)]
    pub database: Option<String>,

    /// Seconds to wait for the solver before giving up
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// TOML configuration file; command line flags override it
    #[arg(short, long)]
    pub config: Option<String>,

    /// JSON snapshot loaded into the database before the round
    #[arg(long)]
    pub seed: Option<String>,

    /// Print the solver request without calling the solver or writing
    #[arg(long)]
    pub dry_run: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl CliConfig {
    /// Merge the optional TOML file with command line overrides.
    pub fn resolve(&self) -> Result<SolverConfig> {
        let base = match &self.config {
            Some(path) => {
                tracing::info!("Loading configuration from: {}", path);
                TomlConfig::from_file(path)?.to_solver_config()
            }
            None => SolverConfig::default(),
        };

        Ok(SolverConfig {
            solver_endpoint: self.solver_endpoint.clone().or(base.solver_endpoint),
            timeout_seconds: self.timeout_seconds.unwrap_or(base.timeout_seconds),
            database_path: self.database.clone().unwrap_or(base.database_path),
        })
    }
}
