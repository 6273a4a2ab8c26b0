use crate::domain::model::{SolverInput, SolverResult};
use crate::utils::error::{MatchError, Result};
use std::collections::HashSet;

/// Reject solver results that reach outside the round they answer: unknown
/// or locked students, topics that were not offered, or a student matched
/// more than once.
pub fn check_matchings(input: &SolverInput, result: &SolverResult) -> Result<()> {
    let students: HashSet<&str> = input.students.iter().map(|s| s.id.as_str()).collect();
    let topics: HashSet<&str> = input.topics.iter().map(|t| t.id.as_str()).collect();
    let mut seen: HashSet<&str> = HashSet::with_capacity(result.matchings.len());

    for matching in &result.matchings {
        if !students.contains(matching.student_id.as_str()) {
            return Err(MatchError::InvalidMatching {
                message: format!(
                    "student {} was not part of the solver input",
                    matching.student_id
                ),
            });
        }
        if !topics.contains(matching.topic_id.as_str()) {
            return Err(MatchError::InvalidMatching {
                message: format!("topic {} was not part of the solver input", matching.topic_id),
            });
        }
        if !seen.insert(matching.student_id.as_str()) {
            return Err(MatchError::InvalidMatching {
                message: format!("student {} is matched more than once", matching.student_id),
            });
        }
    }

    Ok(())
}
