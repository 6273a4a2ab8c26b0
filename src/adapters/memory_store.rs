use crate::core::DataStore;
use crate::domain::model::{CommitPlan, Instructor, Snapshot, Student, Topic};
use crate::utils::error::{MatchError, Result};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Process-local store. Commits are staged on a copy of the students and
/// swapped in only when every update succeeded.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<Snapshot>>,
}

impl InMemoryStore {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            state: Arc::new(Mutex::new(snapshot)),
        }
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.state.lock().await.clone()
    }
}

impl DataStore for InMemoryStore {
    async fn load_students(&self) -> Result<Vec<Student>> {
        Ok(self.state.lock().await.students.clone())
    }

    async fn load_topics(&self) -> Result<Vec<Topic>> {
        Ok(self.state.lock().await.topics.clone())
    }

    async fn load_instructors(&self) -> Result<Vec<Instructor>> {
        Ok(self.state.lock().await.instructors.clone())
    }

    async fn load_snapshot(&self) -> Result<Snapshot> {
        Ok(self.snapshot().await)
    }

    async fn commit_assignments(&self, plan: &CommitPlan) -> Result<usize> {
        let mut state = self.state.lock().await;

        let mut staged = state.students.clone();
        let mut cleared = 0;
        for student in staged.iter_mut().filter(|s| !s.is_locked()) {
            if student.assigned_topic.take().is_some() {
                cleared += 1;
            }
        }
        tracing::debug!("Cleared assignments of {} students", cleared);

        for matching in &plan.matchings {
            let topic = state
                .topics
                .iter()
                .find(|t| t.id == matching.topic_id)
                .ok_or_else(|| MatchError::store(format!("unknown topic {}", matching.topic_id)))?;
            let student = staged
                .iter_mut()
                .find(|s| s.id == matching.student_id)
                .ok_or_else(|| {
                    MatchError::store(format!("unknown student {}", matching.student_id))
                })?;
            if student.is_locked() {
                return Err(MatchError::store(format!(
                    "student {} holds a protected topic",
                    matching.student_id
                )));
            }
            student.assigned_topic = Some(topic.into());
        }

        state.students = staged;
        Ok(plan.matchings.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::round::PreparedRound;
    use crate::domain::model::{AssignedTopic, Matching, TopicType};

    fn topic(id: &str, kind: TopicType) -> Topic {
        Topic {
            id: id.to_string(),
            topic_type: kind,
            capacity: 2,
            course_preferences: vec![],
            instructor_id: "I1".to_string(),
        }
    }

    fn assigned(s: &Student) -> Option<&str> {
        s.assigned_topic.as_ref().map(|t| t.id.as_str())
    }

    fn store() -> InMemoryStore {
        let t0 = topic("T0", TopicType::Research);
        let t1 = topic("T1", TopicType::Normal);
        let mut s1 = Student::new("S1");
        s1.assigned_topic = Some(AssignedTopic::from(&t0));
        let mut s2 = Student::new("S2");
        s2.assigned_topic = Some(AssignedTopic::from(&t1));

        InMemoryStore::new(Snapshot {
            students: vec![s1, s2, Student::new("S3")],
            topics: vec![t0, t1],
            instructors: vec![],
        })
    }

    #[tokio::test]
    async fn test_commit_clears_all_but_protected() {
        let store = store();
        let plan = CommitPlan {
            matchings: vec![Matching::new("S3", "T1")],
        };

        let applied = store.commit_assignments(&plan).await.unwrap();

        assert_eq!(applied, 1);
        let snapshot = store.snapshot().await;
        assert_eq!(assigned(snapshot.student("S1").unwrap()), Some("T0"));
        assert_eq!(assigned(snapshot.student("S2").unwrap()), None);
        assert_eq!(assigned(snapshot.student("S3").unwrap()), Some("T1"));
    }

    #[tokio::test]
    async fn test_failed_update_leaves_store_untouched() {
        let store = store();
        let before = store.snapshot().await;
        let plan = CommitPlan {
            matchings: vec![Matching::new("S3", "T1"), Matching::new("S404", "T1")],
        };

        let err = store.commit_assignments(&plan).await.unwrap_err();

        assert!(matches!(err, MatchError::StoreError { .. }));
        assert_eq!(store.snapshot().await, before);
    }

    #[tokio::test]
    async fn test_unknown_topic_leaves_store_untouched() {
        let store = store();
        let before = store.snapshot().await;
        let plan = CommitPlan {
            matchings: vec![Matching::new("S3", "T404")],
        };

        assert!(store.commit_assignments(&plan).await.is_err());
        assert_eq!(store.snapshot().await, before);
    }

    async fn lock_student(store: &InMemoryStore, student_id: &str, topic_id: &str) {
        let mut state = store.state.lock().await;
        let topic = AssignedTopic::from(state.topic(topic_id).unwrap());
        state
            .students
            .iter_mut()
            .find(|s| s.id == student_id)
            .unwrap()
            .assigned_topic = Some(topic);
    }

    #[tokio::test]
    async fn test_assignment_locked_after_read_survives_commit() {
        let store = store();
        let round = PreparedRound::from_snapshot(&store.load_snapshot().await.unwrap());
        assert_eq!(round.locked, vec!["S1"]);

        lock_student(&store, "S2", "T0").await;
        let plan = CommitPlan {
            matchings: vec![Matching::new("S3", "T1")],
        };
        store.commit_assignments(&plan).await.unwrap();

        let snapshot = store.snapshot().await;
        assert_eq!(assigned(snapshot.student("S1").unwrap()), Some("T0"));
        assert_eq!(assigned(snapshot.student("S2").unwrap()), Some("T0"));
        assert_eq!(assigned(snapshot.student("S3").unwrap()), Some("T1"));
    }

    #[tokio::test]
    async fn test_matching_for_student_locked_at_commit_fails() {
        let store = store();
        lock_student(&store, "S3", "T0").await;
        let before = store.snapshot().await;
        let plan = CommitPlan {
            matchings: vec![Matching::new("S2", "T1"), Matching::new("S3", "T1")],
        };

        let err = store.commit_assignments(&plan).await.unwrap_err();

        assert!(matches!(err, MatchError::StoreError { ref message } if message.contains("S3")));
        assert_eq!(store.snapshot().await, before);
    }
}
