use crate::core::round::{PreparedRound, RoundStats};
use crate::core::MatchingPipeline;
use crate::domain::model::SolverResult;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Serialize)]
pub struct RoundOutcome {
    pub result: SolverResult,
    pub stats: RoundStats,
    pub applied: usize,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
}

/// Runs one matching round: read, prepare, solve, check, commit.
pub struct MatchingEngine<P: MatchingPipeline> {
    pipeline: P,
}

impl<P: MatchingPipeline> MatchingEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<RoundOutcome> {
        let started_at = Utc::now();
        let timer = Instant::now();
        tracing::info!("Starting matching round");

        let round = self.preview().await?;

        let result = self.pipeline.solve(&round.input).await?;
        let plan = round.commit_plan(&result)?;

        tracing::info!(
            "Committing {} matchings, {} protected assignments seen at read time",
            plan.matchings.len(),
            round.stats.locked
        );
        let applied = self.pipeline.commit(plan).await?;

        let elapsed = timer.elapsed();
        tracing::info!("Matching round finished in {:?}", elapsed);

        Ok(RoundOutcome {
            result,
            stats: round.stats,
            applied,
            started_at,
            elapsed,
        })
    }

    /// Read and prepare a round without contacting the solver or writing.
    pub async fn preview(&self) -> Result<PreparedRound> {
        let snapshot = self.pipeline.read().await?;
        tracing::info!(
            "Read {} students, {} topics, {} instructors",
            snapshot.students.len(),
            snapshot.topics.len(),
            snapshot.instructors.len()
        );

        let round = PreparedRound::from_snapshot(&snapshot);
        tracing::info!(
            "Prepared round: {} locked, {} eligible, {} instructors offered ({} dropped)",
            round.stats.locked,
            round.stats.eligible,
            round.stats.instructors,
            round.stats.instructors_dropped
        );

        Ok(round)
    }
}
