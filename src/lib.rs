pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{SolverConfig, TomlConfig};

pub use adapters::{InMemoryStore, SeedData, SqliteStore};
pub use app::handler::{handle_solve, SolveResponse};
pub use self::core::{engine::MatchingEngine, pipeline::SolverPipeline};
pub use utils::error::{MatchError, Result};
