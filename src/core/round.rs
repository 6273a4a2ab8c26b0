use crate::domain::model::{CommitPlan, SolverInput, SolverResult, Snapshot, StudentId};
use crate::domain::services::{
    build_solver_input, check_matchings, correct_capacities, offered_topics, partition_students,
};
use crate::utils::error::Result;
use serde::Serialize;

/// Counters describing how a snapshot was turned into solver input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoundStats {
    pub students: usize,
    pub locked: usize,
    pub eligible: usize,
    pub topics_offered: usize,
    pub instructors: usize,
    pub instructors_dropped: usize,
}

/// A round ready to be sent to the solver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRound {
    pub input: SolverInput,
    pub locked: Vec<StudentId>,
    pub stats: RoundStats,
}

impl PreparedRound {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let partition = partition_students(&snapshot.students);
        let instructors = correct_capacities(&snapshot.instructors, &partition.locked);
        let topics = offered_topics(&snapshot.topics);
        let input = build_solver_input(&partition.eligible, &topics, &instructors);

        let stats = RoundStats {
            students: snapshot.students.len(),
            locked: partition.locked.len(),
            eligible: partition.eligible.len(),
            topics_offered: input.topics.len(),
            instructors: input.instructors.len(),
            instructors_dropped: snapshot.instructors.len() - input.instructors.len(),
        };

        Self {
            input,
            locked: partition.locked_ids(),
            stats,
        }
    }

    /// Validate `result` against this round and turn it into a commit plan.
    pub fn commit_plan(&self, result: &SolverResult) -> Result<CommitPlan> {
        check_matchings(&self.input, result)?;
        Ok(CommitPlan {
            matchings: result.matchings.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{AssignedTopic, Instructor, Matching, Student, Topic, TopicType};

    fn snapshot() -> Snapshot {
        let mut s1 = Student::new("S1");
        s1.assigned_topic = Some(AssignedTopic {
            id: "T0".to_string(),
            topic_type: TopicType::Tdk,
            instructor_id: "I1".to_string(),
        });
        let topic = |id: &str, kind, capacity| Topic {
            id: id.to_string(),
            topic_type: kind,
            capacity,
            course_preferences: vec![],
            instructor_id: "I1".to_string(),
        };

        Snapshot {
            students: vec![s1, Student::new("S2"), Student::new("S3")],
            topics: vec![
                topic("T0", TopicType::Tdk, 1),
                topic("T1", TopicType::Normal, 2),
                topic("T2", TopicType::Normal, 1),
            ],
            instructors: vec![
                Instructor {
                    id: "I1".to_string(),
                    min: 0,
                    max: 2,
                },
                Instructor {
                    id: "I2".to_string(),
                    min: 0,
                    max: 0,
                },
            ],
        }
    }

    #[test]
    fn test_prepares_round_from_snapshot() {
        let round = PreparedRound::from_snapshot(&snapshot());

        assert_eq!(round.locked, vec!["S1"]);
        let students: Vec<&str> = round.input.students.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(students, vec!["S2", "S3"]);
        let topics: Vec<&str> = round.input.topics.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(topics, vec!["T1", "T2"]);
        assert_eq!(round.input.instructors.len(), 1);
        assert_eq!(round.input.instructors[0].capacity, 1);
        assert_eq!(
            round.stats,
            RoundStats {
                students: 3,
                locked: 1,
                eligible: 2,
                topics_offered: 2,
                instructors: 1,
                instructors_dropped: 1,
            }
        );
    }

    #[test]
    fn test_commit_plan_carries_solver_matchings() {
        let round = PreparedRound::from_snapshot(&snapshot());
        let result = SolverResult {
            status: 200,
            matchings: vec![Matching::new("S2", "T1")],
        };

        let plan = round.commit_plan(&result).unwrap();

        assert_eq!(plan.matchings, result.matchings);
    }

    #[test]
    fn test_commit_plan_rejects_locked_student_matching() {
        let round = PreparedRound::from_snapshot(&snapshot());
        let result = SolverResult {
            status: 200,
            matchings: vec![Matching::new("S1", "T1")],
        };

        assert!(round.commit_plan(&result).is_err());
    }

    #[test]
    fn test_preparation_is_repeatable() {
        let snapshot = snapshot();
        assert_eq!(
            PreparedRound::from_snapshot(&snapshot),
            PreparedRound::from_snapshot(&snapshot)
        );
    }
}
