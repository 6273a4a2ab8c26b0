use crate::domain::model::{SolverInput, SolverResult};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{MatchError, Result};
use reqwest::Client;
use std::time::Duration;

/// One-shot HTTP client for the external solver.
#[derive(Debug, Clone)]
pub struct SolverClient {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl SolverClient {
    pub fn new(client: Client, endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        }
    }

    /// Fails with a configuration error when no endpoint is configured, so
    /// the caller never attempts the request.
    pub fn from_config<C: ConfigProvider>(client: Client, config: &C) -> Result<Self> {
        let endpoint = config
            .solver_endpoint()
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| MatchError::MissingConfigError {
                field: "solver_endpoint".to_string(),
            })?;

        Ok(Self::new(client, endpoint, config.solver_timeout()))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn solve(&self, input: &SolverInput) -> Result<SolverResult> {
        tracing::debug!(
            "Sending {} students, {} topics, {} instructors to solver at {}",
            input.students.len(),
            input.topics.len(),
            input.instructors.len(),
            self.endpoint
        );

        let response = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(input)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        tracing::debug!("Solver response status: {}", status);

        if !status.is_success() {
            let payload = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), payload = %payload, "Solver reported an error");
            return Err(MatchError::SolverFailure {
                status: status.as_u16(),
                payload,
            });
        }

        let body = response.bytes().await.map_err(|e| self.transport_error(e))?;
        let result = parse_solver_result(&body).inspect_err(|e| {
            tracing::error!(error = %e, "Solver response rejected");
        })?;

        tracing::info!("Solver returned {} matchings", result.matchings.len());
        Ok(result)
    }

    fn transport_error(&self, error: reqwest::Error) -> MatchError {
        if error.is_timeout() {
            MatchError::SolverTimeout {
                timeout: self.timeout,
            }
        } else {
            MatchError::HttpError(error)
        }
    }
}

/// Check a raw solver body against the response contract.
pub fn parse_solver_result(body: &[u8]) -> Result<SolverResult> {
    serde_json::from_slice(body).map_err(|e| MatchError::SchemaValidation {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverConfig;

    #[test]
    fn test_parse_valid_body() {
        let body = br#"{"status": 200, "matchings": [{"student_id": "S2", "topic_id": "T1"}]}"#;
        let result = parse_solver_result(body).unwrap();
        assert_eq!(result.status, 200);
        assert_eq!(result.matchings.len(), 1);
    }

    #[test]
    fn test_parse_rejects_missing_matchings() {
        let err = parse_solver_result(br#"{"status": 200}"#).unwrap_err();
        assert!(matches!(err, MatchError::SchemaValidation { ref message } if message.contains("matchings")));
    }

    #[test]
    fn test_parse_rejects_numeric_student_id() {
        let body = br#"{"status": 200, "matchings": [{"student_id": 7, "topic_id": "T1"}]}"#;
        assert!(matches!(
            parse_solver_result(body),
            Err(MatchError::SchemaValidation { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_non_json() {
        assert!(matches!(
            parse_solver_result(b"<html>bad gateway</html>"),
            Err(MatchError::SchemaValidation { .. })
        ));
    }

    #[test]
    fn test_from_config_requires_endpoint() {
        let config = SolverConfig::default();
        let err = SolverClient::from_config(Client::new(), &config).unwrap_err();
        assert!(matches!(err, MatchError::MissingConfigError { ref field } if field == "solver_endpoint"));

        let blank = SolverConfig {
            solver_endpoint: Some("   ".to_string()),
            ..SolverConfig::default()
        };
        assert!(SolverClient::from_config(Client::new(), &blank).is_err());
    }

    #[test]
    fn test_from_config_uses_endpoint_and_timeout() {
        let config = SolverConfig {
            solver_endpoint: Some("http://solver.local/solve".to_string()),
            timeout_seconds: 7,
            ..SolverConfig::default()
        };
        let client = SolverClient::from_config(Client::new(), &config).unwrap();
        assert_eq!(client.endpoint(), "http://solver.local/solve");
        assert_eq!(client.timeout, Duration::from_secs(7));
    }
}
