use crate::domain::model::{
    AssignedTopic, CourseCompletion, Instructor, Snapshot, Student, StudentId, Topic, TopicId, TopicPreference,
};
use crate::utils::error::{MatchError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Student row as stored: the assignment is a bare topic reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentRecord {
    pub id: StudentId,
    #[serde(default)]
    pub topic_preferences: Vec<TopicPreference>,
    #[serde(default)]
    pub course_completions: Vec<CourseCompletion>,
    #[serde(default)]
    pub assigned_topic_id: Option<TopicId>,
}

/// On-disk fixture format used to populate a store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub instructors: Vec<Instructor>,
    #[serde(default)]
    pub topics: Vec<Topic>,
    #[serde(default)]
    pub students: Vec<StudentRecord>,
}

impl SeedData {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Resolve assignment references against the seeded topics.
    pub fn into_snapshot(self) -> Result<Snapshot> {
        let mut students = Vec::with_capacity(self.students.len());
        for record in self.students {
            let assigned_topic: Option<AssignedTopic> = match &record.assigned_topic_id {
                Some(topic_id) => {
                    let topic = self
                        .topics
                        .iter()
                        .find(|t| &t.id == topic_id)
                        .ok_or_else(|| {
                            MatchError::store(format!(
                                "student {} is assigned to unknown topic {}",
                                record.id, topic_id
                            ))
                        })?;
                    Some(topic.into())
                }
                None => None,
            };

            students.push(Student {
                id: record.id,
                topic_preferences: record.topic_preferences,
                course_completions: record.course_completions,
                assigned_topic,
            });
        }

        Ok(Snapshot {
            students,
            topics: self.topics,
            instructors: self.instructors,
        })
    }
}
