use crate::core::engine::MatchingEngine;
use crate::core::MatchingPipeline;
use crate::domain::model::SolverResult;
use serde::Serialize;

/// What a caller of the solve entry point gets back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SolveResponse {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_body: Option<SolverResult>,
}

impl SolveResponse {
    pub fn ok(result: SolverResult) -> Self {
        Self {
            status: 200,
            json_body: Some(result),
        }
    }

    pub fn server_error() -> Self {
        Self {
            status: 500,
            json_body: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Run one matching round. Every failure collapses into a bare 500; the
/// detail only goes to the log.
pub async fn handle_solve<P: MatchingPipeline>(engine: &MatchingEngine<P>) -> SolveResponse {
    match engine.run().await {
        Ok(outcome) => {
            tracing::info!(
                applied = outcome.applied,
                locked = outcome.stats.locked,
                eligible = outcome.stats.eligible,
                "Matching round committed"
            );
            SolveResponse::ok(outcome.result)
        }
        Err(e) => {
            tracing::error!(category = ?e.category(), error = %e, "Matching round failed");
            SolveResponse::server_error()
        }
    }
}
