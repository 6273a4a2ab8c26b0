use crate::core::DataStore;
use crate::domain::model::{
    AssignedTopic, CommitPlan, CourseCompletion, CoursePreference, Instructor, Snapshot, Student,
    Topic, TopicPreference, TopicType,
};
use crate::utils::error::{MatchError, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS instructor (
    id  TEXT PRIMARY KEY,
    min INTEGER NOT NULL DEFAULT 0,
    max INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS topic (
    id            TEXT PRIMARY KEY,
    type          TEXT NOT NULL,
    capacity      INTEGER NOT NULL,
    instructor_id TEXT NOT NULL REFERENCES instructor(id)
);

CREATE TABLE IF NOT EXISTS student (
    id                TEXT PRIMARY KEY,
    assigned_topic_id TEXT REFERENCES topic(id)
);

CREATE TABLE IF NOT EXISTS student_topic_preference (
    student_id TEXT NOT NULL REFERENCES student(id),
    topic_id   TEXT NOT NULL REFERENCES topic(id),
    rank       INTEGER NOT NULL,
    PRIMARY KEY (student_id, topic_id)
);

CREATE TABLE IF NOT EXISTS student_course_completion (
    student_id TEXT NOT NULL REFERENCES student(id),
    course_id  TEXT NOT NULL,
    grade      INTEGER NOT NULL,
    PRIMARY KEY (student_id, course_id)
);

CREATE TABLE IF NOT EXISTS topic_course_preference (
    topic_id  TEXT NOT NULL REFERENCES topic(id),
    course_id TEXT NOT NULL,
    weight    INTEGER NOT NULL,
    PRIMARY KEY (topic_id, course_id)
);
"#;

/// SQLite-backed store. All assignment writes of a round happen in one
/// transaction.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| MatchError::store(format!("connection lock poisoned: {}", e)))
    }

    /// Insert a snapshot into an empty database.
    pub fn seed(&self, snapshot: &Snapshot) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        for instructor in &snapshot.instructors {
            tx.execute(
                "INSERT INTO instructor (id, min, max) VALUES (?1, ?2, ?3)",
                params![instructor.id, instructor.min, instructor.max],
            )?;
        }

        for topic in &snapshot.topics {
            tx.execute(
                "INSERT INTO topic (id, type, capacity, instructor_id) VALUES (?1, ?2, ?3, ?4)",
                params![topic.id, topic.topic_type.as_str(), topic.capacity, topic.instructor_id],
            )?;
            for pref in &topic.course_preferences {
                tx.execute(
                    "INSERT INTO topic_course_preference (topic_id, course_id, weight) VALUES (?1, ?2, ?3)",
                    params![topic.id, pref.course_id, pref.weight],
                )?;
            }
        }

        for student in &snapshot.students {
            tx.execute(
                "INSERT INTO student (id, assigned_topic_id) VALUES (?1, ?2)",
                params![student.id, student.assigned_topic.as_ref().map(|t| &t.id)],
            )?;
            for pref in &student.topic_preferences {
                tx.execute(
                    "INSERT INTO student_topic_preference (student_id, topic_id, rank) VALUES (?1, ?2, ?3)",
                    params![student.id, pref.topic_id, pref.rank],
                )?;
            }
            for completion in &student.course_completions {
                tx.execute(
                    "INSERT INTO student_course_completion (student_id, course_id, grade) VALUES (?1, ?2, ?3)",
                    params![student.id, completion.course_id, completion.grade],
                )?;
            }
        }

        tx.commit()?;
        tracing::info!(
            "Seeded {} instructors, {} topics, {} students",
            snapshot.instructors.len(),
            snapshot.topics.len(),
            snapshot.students.len()
        );
        Ok(())
    }

    fn read_students(conn: &Connection) -> Result<Vec<Student>> {
        let mut preferences: HashMap<String, Vec<TopicPreference>> = HashMap::new();
        let mut stmt = conn.prepare(
            "SELECT student_id, topic_id, rank FROM student_topic_preference ORDER BY student_id, rank",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                TopicPreference {
                    topic_id: row.get(1)?,
                    rank: row.get(2)?,
                },
            ))
        })?;
        for row in rows {
            let (student_id, pref) = row?;
            preferences.entry(student_id).or_default().push(pref);
        }

        let mut completions: HashMap<String, Vec<CourseCompletion>> = HashMap::new();
        let mut stmt = conn.prepare(
            "SELECT student_id, course_id, grade FROM student_course_completion ORDER BY student_id, course_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                CourseCompletion {
                    course_id: row.get(1)?,
                    grade: row.get(2)?,
                },
            ))
        })?;
        for row in rows {
            let (student_id, completion) = row?;
            completions.entry(student_id).or_default().push(completion);
        }

        let mut stmt = conn.prepare(
            r#"
            SELECT s.id, t.id, t.type, t.instructor_id
            FROM student s
            LEFT JOIN topic t ON t.id = s.assigned_topic_id
            ORDER BY s.rowid
            "#,
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(id, topic_id, topic_type, instructor_id)| -> Result<Student> {
                let assigned_topic = match (topic_id, topic_type, instructor_id) {
                    (Some(topic_id), Some(topic_type), Some(instructor_id)) => Some(AssignedTopic {
                        id: topic_id,
                        topic_type: parse_topic_type(&topic_type)?,
                        instructor_id,
                    }),
                    _ => None,
                };
                Ok(Student {
                    topic_preferences: preferences.remove(&id).unwrap_or_default(),
                    course_completions: completions.remove(&id).unwrap_or_default(),
                    id,
                    assigned_topic,
                })
            })
            .collect()
    }

    fn read_topics(conn: &Connection) -> Result<Vec<Topic>> {
        let mut course_preferences: HashMap<String, Vec<CoursePreference>> = HashMap::new();
        let mut stmt = conn.prepare(
            "SELECT topic_id, course_id, weight FROM topic_course_preference ORDER BY topic_id, course_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                CoursePreference {
                    course_id: row.get(1)?,
                    weight: row.get(2)?,
                },
            ))
        })?;
        for row in rows {
            let (topic_id, pref) = row?;
            course_preferences.entry(topic_id).or_default().push(pref);
        }

        let mut stmt =
            conn.prepare("SELECT id, type, capacity, instructor_id FROM topic ORDER BY rowid")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, u32>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(id, topic_type, capacity, instructor_id)| -> Result<Topic> {
                Ok(Topic {
                    topic_type: parse_topic_type(&topic_type)?,
                    course_preferences: course_preferences.remove(&id).unwrap_or_default(),
                    id,
                    capacity,
                    instructor_id,
                })
            })
            .collect()
    }

    fn read_instructors(conn: &Connection) -> Result<Vec<Instructor>> {
        let mut stmt = conn.prepare("SELECT id, min, max FROM instructor ORDER BY rowid")?;
        let instructors = stmt
            .query_map([], |row| {
                Ok(Instructor {
                    id: row.get(0)?,
                    min: row.get(1)?,
                    max: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(instructors)
    }
}

fn parse_topic_type(raw: &str) -> Result<TopicType> {
    raw.parse().map_err(MatchError::store)
}

/// `'tdk', 'research', 'internship'` for use in an `IN (...)` clause.
fn protected_types_sql() -> String {
    TopicType::PROTECTED
        .iter()
        .map(|kind| format!("'{}'", kind.as_str()))
        .collect::<Vec<_>>()
        .join(", ")
}

impl DataStore for SqliteStore {
    async fn load_students(&self) -> Result<Vec<Student>> {
        let conn = self.conn()?;
        Self::read_students(&conn)
    }

    async fn load_topics(&self) -> Result<Vec<Topic>> {
        let conn = self.conn()?;
        Self::read_topics(&conn)
    }

    async fn load_instructors(&self) -> Result<Vec<Instructor>> {
        let conn = self.conn()?;
        Self::read_instructors(&conn)
    }

    async fn load_snapshot(&self) -> Result<Snapshot> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let snapshot = Snapshot {
            students: Self::read_students(&tx)?,
            topics: Self::read_topics(&tx)?,
            instructors: Self::read_instructors(&tx)?,
        };

        tx.commit()?;
        Ok(snapshot)
    }

    async fn commit_assignments(&self, plan: &CommitPlan) -> Result<usize> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let cleared = tx.execute(
            &format!(
                r#"
                UPDATE student SET assigned_topic_id = NULL
                WHERE assigned_topic_id IS NOT NULL
                  AND assigned_topic_id NOT IN (SELECT id FROM topic WHERE type IN ({}))
                "#,
                protected_types_sql()
            ),
            [],
        )?;
        tracing::debug!("Cleared assignments of {} students", cleared);

        {
            let mut current = tx.prepare(
                r#"
                SELECT t.type
                FROM student s
                LEFT JOIN topic t ON t.id = s.assigned_topic_id
                WHERE s.id = ?1
                "#,
            )?;
            let mut update =
                tx.prepare("UPDATE student SET assigned_topic_id = ?1 WHERE id = ?2")?;

            // Returning early drops `tx` without commit, which rolls the clear back too.
            for matching in &plan.matchings {
                let held: Option<Option<String>> = current
                    .query_row(params![matching.student_id], |row| row.get(0))
                    .optional()?;
                match held {
                    None => {
                        return Err(MatchError::store(format!(
                            "unknown student {}",
                            matching.student_id
                        )));
                    }
                    Some(Some(kind)) if parse_topic_type(&kind)?.is_protected() => {
                        return Err(MatchError::store(format!(
                            "student {} holds a protected topic",
                            matching.student_id
                        )));
                    }
                    Some(_) => {}
                }
                update.execute(params![matching.topic_id, matching.student_id])?;
            }
        }

        tx.commit()?;
        Ok(plan.matchings.len())
    }
}
