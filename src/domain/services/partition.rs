use crate::domain::model::{Student, StudentId};
use std::collections::HashSet;

/// Students split by whether they keep a protected assignment this round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub locked: Vec<Student>,
    pub eligible: Vec<Student>,
}

impl Partition {
    pub fn locked_ids(&self) -> Vec<StudentId> {
        self.locked.iter().map(|s| s.id.clone()).collect()
    }
}

/// Stable partition of `students` into locked and eligible.
///
/// Membership is decided once per id, so two students with identical records
/// but different ids never get mixed up, and a repeated id lands on the same
/// side every time it appears.
pub fn partition_students(students: &[Student]) -> Partition {
    let locked_ids: HashSet<&str> = students
        .iter()
        .filter(|s| s.is_locked())
        .map(|s| s.id.as_str())
        .collect();

    let (locked, eligible): (Vec<Student>, Vec<Student>) = students
        .iter()
        .cloned()
        .partition(|s| locked_ids.contains(s.id.as_str()));

    tracing::debug!(
        "Partitioned {} students: {} locked, {} eligible",
        students.len(),
        locked.len(),
        eligible.len()
    );

    Partition { locked, eligible }
}
