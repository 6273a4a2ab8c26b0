pub mod engine;
pub mod pipeline;
pub mod round;
pub mod solver_client;

pub use crate::domain::model::{CommitPlan, Snapshot, SolverInput, SolverResult};
pub use crate::domain::ports::{ConfigProvider, DataStore, MatchingPipeline};
pub use crate::utils::error::Result;
