use crate::domain::model::{CorrectedInstructor, Instructor, Student};
use std::collections::HashMap;

/// Effective capacity for each instructor: `max` minus the locked students
/// already sitting on one of their topics. Instructors left with nothing are
/// dropped. A negative remainder means the instructor is already over-booked,
/// which is not an error.
pub fn correct_capacities(instructors: &[Instructor], locked: &[Student]) -> Vec<CorrectedInstructor> {
    let mut consumed: HashMap<&str, i64> = HashMap::new();
    for student in locked {
        if let Some(topic) = &student.assigned_topic {
            *consumed.entry(topic.instructor_id.as_str()).or_insert(0) += 1;
        }
    }

    instructors
        .iter()
        .filter_map(|instructor| {
            let used = consumed.get(instructor.id.as_str()).copied().unwrap_or(0);
            let capacity = i64::from(instructor.max) - used;

            if capacity <= 0 {
                tracing::debug!(
                    "Dropping instructor {}: max {} with {} locked students",
                    instructor.id,
                    instructor.max,
                    used
                );
                return None;
            }

            Some(CorrectedInstructor {
                id: instructor.id.clone(),
                min: instructor.min,
                max: instructor.max,
                capacity,
            })
        })
        .collect()
}
