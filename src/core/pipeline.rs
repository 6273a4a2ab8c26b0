use crate::core::solver_client::SolverClient;
use crate::core::{ConfigProvider, DataStore, MatchingPipeline};
use crate::domain::model::{CommitPlan, SolverInput, SolverResult, Snapshot};
use crate::utils::error::Result;
use reqwest::Client;

/// Matching pipeline backed by a data store and the HTTP solver.
pub struct SolverPipeline<S: DataStore, C: ConfigProvider> {
    store: S,
    config: C,
    client: Client,
}

impl<S: DataStore, C: ConfigProvider> SolverPipeline<S, C> {
    pub fn new(store: S, config: C) -> Self {
        Self {
            store,
            config,
            client: Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl<S: DataStore, C: ConfigProvider> MatchingPipeline for SolverPipeline<S, C> {
    async fn read(&self) -> Result<Snapshot> {
        self.store.load_snapshot().await
    }

    async fn solve(&self, input: &SolverInput) -> Result<SolverResult> {
        let solver = SolverClient::from_config(self.client.clone(), &self.config)?;
        solver.solve(input).await
    }

    async fn commit(&self, plan: CommitPlan) -> Result<usize> {
        let applied = self.store.commit_assignments(&plan).await?;
        tracing::debug!("Store applied {} matchings", applied);
        Ok(applied)
    }
}
