//! Property-based checks for the pure stages of a matching round.

use proptest::prelude::*;
use std::collections::HashMap;
use topic_matcher::domain::model::{AssignedTopic, Instructor, Student, TopicType};
use topic_matcher::domain::services::{correct_capacities, partition_students};

const KINDS: [TopicType; 4] = [
    TopicType::Normal,
    TopicType::Tdk,
    TopicType::Research,
    TopicType::Internship,
];

/// Students with unique ids; each one optionally assigned to a topic of a
/// random kind owned by one of three instructors.
fn arb_students() -> impl Strategy<Value = Vec<Student>> {
    prop::collection::vec(prop::option::of((0usize..4, 0usize..3)), 0..40).prop_map(|slots| {
        slots
            .into_iter()
            .enumerate()
            .map(|(i, slot)| {
                let mut student = Student::new(format!("S{}", i));
                student.assigned_topic = slot.map(|(kind, instructor)| AssignedTopic {
                    id: format!("T{}-{}", instructor, kind),
                    topic_type: KINDS[kind],
                    instructor_id: format!("I{}", instructor),
                });
                student
            })
            .collect()
    })
}

fn arb_instructors() -> impl Strategy<Value = Vec<Instructor>> {
    prop::collection::vec(0u32..8, 3).prop_map(|maxes| {
        maxes
            .into_iter()
            .enumerate()
            .map(|(i, max)| Instructor {
                id: format!("I{}", i),
                min: 0,
                max,
            })
            .collect()
    })
}

fn ids(students: &[Student]) -> Vec<&str> {
    students.iter().map(|s| s.id.as_str()).collect()
}

proptest! {
    /// Every student lands in exactly one partition, in input order.
    #[test]
    fn partition_covers_input_exactly_once(students in arb_students()) {
        let partition = partition_students(&students);

        prop_assert_eq!(partition.locked.len() + partition.eligible.len(), students.len());

        let expected_locked: Vec<&str> = students
            .iter()
            .filter(|s| s.assigned_topic.as_ref().is_some_and(|t| t.topic_type.is_protected()))
            .map(|s| s.id.as_str())
            .collect();
        let expected_eligible: Vec<&str> = students
            .iter()
            .filter(|s| !expected_locked.contains(&s.id.as_str()))
            .map(|s| s.id.as_str())
            .collect();

        prop_assert_eq!(ids(&partition.locked), expected_locked);
        prop_assert_eq!(ids(&partition.eligible), expected_eligible);
    }

    /// Running the pure stages twice on one snapshot gives the same answer.
    #[test]
    fn pure_stages_are_repeatable(students in arb_students(), instructors in arb_instructors()) {
        let first = partition_students(&students);
        let second = partition_students(&students);
        prop_assert_eq!(&first, &second);

        prop_assert_eq!(
            correct_capacities(&instructors, &first.locked),
            correct_capacities(&instructors, &second.locked)
        );
    }

    /// Offered instructors have positive capacity equal to max minus their
    /// locked students; everyone else is dropped.
    #[test]
    fn corrected_capacity_matches_locked_load(students in arb_students(), instructors in arb_instructors()) {
        let partition = partition_students(&students);
        let corrected = correct_capacities(&instructors, &partition.locked);

        let mut load: HashMap<String, i64> = HashMap::new();
        for student in &partition.locked {
            if let Some(topic) = &student.assigned_topic {
                *load.entry(topic.instructor_id.clone()).or_insert(0) += 1;
            }
        }

        for instructor in &instructors {
            let expected = i64::from(instructor.max) - load.get(&instructor.id).copied().unwrap_or(0);
            let offered = corrected.iter().find(|c| c.id == instructor.id);
            if expected > 0 {
                prop_assert_eq!(offered.map(|c| c.capacity), Some(expected));
            } else {
                prop_assert!(offered.is_none());
            }
        }
        prop_assert!(corrected.iter().all(|c| c.capacity > 0));
    }
}
