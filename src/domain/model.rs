use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type StudentId = String;
pub type TopicId = String;
pub type InstructorId = String;
pub type CourseId = String;

/// Kind of a topic. Special-track kinds are handed out outside the solver and
/// their holders keep them across matching rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicType {
    Normal,
    Tdk,
    Research,
    Internship,
}

impl TopicType {
    pub const PROTECTED: [TopicType; 3] = [TopicType::Tdk, TopicType::Research, TopicType::Internship];

    pub fn is_protected(self) -> bool {
        Self::PROTECTED.contains(&self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TopicType::Normal => "normal",
            TopicType::Tdk => "tdk",
            TopicType::Research => "research",
            TopicType::Internship => "internship",
        }
    }
}

impl fmt::Display for TopicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TopicType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "normal" => Ok(TopicType::Normal),
            "tdk" => Ok(TopicType::Tdk),
            "research" => Ok(TopicType::Research),
            "internship" => Ok(TopicType::Internship),
            other => Err(format!("unknown topic type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicPreference {
    pub topic_id: TopicId,
    pub rank: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseCompletion {
    pub course_id: CourseId,
    pub grade: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoursePreference {
    pub course_id: CourseId,
    pub weight: i32,
}

/// The topic a student currently holds, as read together with the student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedTopic {
    pub id: TopicId,
    pub topic_type: TopicType,
    pub instructor_id: InstructorId,
}

impl From<&Topic> for AssignedTopic {
    fn from(topic: &Topic) -> Self {
        Self {
            id: topic.id.clone(),
            topic_type: topic.topic_type,
            instructor_id: topic.instructor_id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    #[serde(default)]
    pub topic_preferences: Vec<TopicPreference>,
    #[serde(default)]
    pub course_completions: Vec<CourseCompletion>,
    #[serde(default)]
    pub assigned_topic: Option<AssignedTopic>,
}

impl Student {
    pub fn new(id: impl Into<StudentId>) -> Self {
        Self {
            id: id.into(),
            topic_preferences: Vec::new(),
            course_completions: Vec::new(),
            assigned_topic: None,
        }
    }

    /// Holds a special-track topic and must not be re-matched.
    pub fn is_locked(&self) -> bool {
        self.assigned_topic
            .as_ref()
            .is_some_and(|topic| topic.topic_type.is_protected())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: TopicId,
    #[serde(rename = "type")]
    pub topic_type: TopicType,
    pub capacity: u32,
    #[serde(default)]
    pub course_preferences: Vec<CoursePreference>,
    pub instructor_id: InstructorId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instructor {
    pub id: InstructorId,
    pub min: u32,
    pub max: u32,
}

/// An instructor as offered to the solver for one round. `capacity` is the
/// maximum load left after protected assignments are accounted for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectedInstructor {
    pub id: InstructorId,
    pub min: u32,
    pub max: u32,
    pub capacity: i64,
}

/// Point-in-time view of everything a round reads from the data store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub students: Vec<Student>,
    pub topics: Vec<Topic>,
    pub instructors: Vec<Instructor>,
}

impl Snapshot {
    pub fn student(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    pub fn topic(&self, id: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverStudent {
    pub id: StudentId,
    pub topic_preferences: Vec<TopicPreference>,
    pub course_completions: Vec<CourseCompletion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverTopic {
    pub id: TopicId,
    #[serde(rename = "type")]
    pub topic_type: TopicType,
    pub capacity: u32,
    pub course_preferences: Vec<CoursePreference>,
    pub instructor_id: InstructorId,
}

/// Request body sent to the solver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverInput {
    pub students: Vec<SolverStudent>,
    pub topics: Vec<SolverTopic>,
    pub instructors: Vec<CorrectedInstructor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Matching {
    pub student_id: StudentId,
    pub topic_id: TopicId,
}

impl Matching {
    pub fn new(student_id: impl Into<StudentId>, topic_id: impl Into<TopicId>) -> Self {
        Self {
            student_id: student_id.into(),
            topic_id: topic_id.into(),
        }
    }
}

/// Solver response body. Unknown fields are ignored; missing or mistyped
/// `status`/`matchings` fail deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverResult {
    pub status: i64,
    pub matchings: Vec<Matching>,
}

/// Everything the store needs to make a round's result authoritative.
///
/// Which assignments survive the clear is decided by the store from the
/// topic types it holds at commit time, never from an earlier read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitPlan {
    pub matchings: Vec<Matching>,
}
