use crate::domain::model::{
    CorrectedInstructor, SolverInput, SolverStudent, SolverTopic, Student, Topic,
};

/// Reshape one round's participants into the solver request body.
pub fn build_solver_input(
    eligible: &[Student],
    topics: &[Topic],
    instructors: &[CorrectedInstructor],
) -> SolverInput {
    debug_assert!(
        instructors.iter().all(|i| i.capacity > 0),
        "instructors must be capacity-corrected before building solver input"
    );

    let students = eligible
        .iter()
        .map(|student| {
            let mut topic_preferences = student.topic_preferences.clone();
            topic_preferences.sort_by_key(|p| p.rank);
            SolverStudent {
                id: student.id.clone(),
                topic_preferences,
                course_completions: student.course_completions.clone(),
            }
        })
        .collect();

    let topics = topics
        .iter()
        .map(|topic| SolverTopic {
            id: topic.id.clone(),
            topic_type: topic.topic_type,
            capacity: topic.capacity,
            course_preferences: topic.course_preferences.clone(),
            instructor_id: topic.instructor_id.clone(),
        })
        .collect();

    SolverInput {
        students,
        topics,
        instructors: instructors.to_vec(),
    }
}

/// Topics the solver may hand out. Special-track topics are assigned outside
/// the solver and are never offered.
pub fn offered_topics(topics: &[Topic]) -> Vec<Topic> {
    topics
        .iter()
        .filter(|t| !t.topic_type.is_protected())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{CourseCompletion, CoursePreference, TopicPreference, TopicType};

    fn topic(id: &str, kind: TopicType, capacity: u32) -> Topic {
        Topic {
            id: id.to_string(),
            topic_type: kind,
            capacity,
            course_preferences: vec![CoursePreference {
                course_id: "C1".to_string(),
                weight: 2,
            }],
            instructor_id: "I1".to_string(),
        }
    }

    #[test]
    fn test_builds_request_shape() {
        let mut student = Student::new("S2");
        student.topic_preferences = vec![
            TopicPreference {
                topic_id: "T2".to_string(),
                rank: 2,
            },
            TopicPreference {
                topic_id: "T1".to_string(),
                rank: 1,
            },
        ];
        student.course_completions = vec![CourseCompletion {
            course_id: "C1".to_string(),
            grade: 5,
        }];
        let instructors = vec![CorrectedInstructor {
            id: "I1".to_string(),
            min: 1,
            max: 3,
            capacity: 2,
        }];

        let input = build_solver_input(&[student], &[topic("T1", TopicType::Normal, 2)], &instructors);

        let body = serde_json::to_value(&input).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "students": [{
                    "id": "S2",
                    "topic_preferences": [
                        {"topic_id": "T1", "rank": 1},
                        {"topic_id": "T2", "rank": 2}
                    ],
                    "course_completions": [{"course_id": "C1", "grade": 5}]
                }],
                "topics": [{
                    "id": "T1",
                    "type": "normal",
                    "capacity": 2,
                    "course_preferences": [{"course_id": "C1", "weight": 2}],
                    "instructor_id": "I1"
                }],
                "instructors": [{"id": "I1", "min": 1, "max": 3, "capacity": 2}]
            })
        );
    }

    #[test]
    fn test_topics_are_not_filtered_by_instructor() {
        let mut orphan = topic("T9", TopicType::Normal, 1);
        orphan.instructor_id = "I-dropped".to_string();

        let input = build_solver_input(&[], &[orphan], &[]);

        assert_eq!(input.topics.len(), 1);
        assert!(input.instructors.is_empty());
    }

    #[test]
    fn test_offered_topics_skip_special_tracks() {
        let topics = vec![
            topic("T0", TopicType::Tdk, 1),
            topic("T1", TopicType::Normal, 2),
            topic("T5", TopicType::Internship, 1),
        ];

        let offered: Vec<String> = offered_topics(&topics).into_iter().map(|t| t.id).collect();
        assert_eq!(offered, vec!["T1"]);
    }
}
