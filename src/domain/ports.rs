use crate::domain::model::{CommitPlan, Instructor, SolverInput, SolverResult, Snapshot, Student, Topic};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Persistence seen by the matcher: read everything, write assignments back.
pub trait DataStore: Send + Sync {
    fn load_students(&self) -> impl std::future::Future<Output = Result<Vec<Student>>> + Send;
    fn load_topics(&self) -> impl std::future::Future<Output = Result<Vec<Topic>>> + Send;
    fn load_instructors(&self) -> impl std::future::Future<Output = Result<Vec<Instructor>>> + Send;

    /// Reads everything a round needs. Stores that can offer a single
    /// point-in-time view override this.
    fn load_snapshot(&self) -> impl std::future::Future<Output = Result<Snapshot>> + Send {
        async move {
            Ok(Snapshot {
                students: self.load_students().await?,
                topics: self.load_topics().await?,
                instructors: self.load_instructors().await?,
            })
        }
    }

    /// Clears every assignment that is not on a protected topic *as stored
    /// right now*, then applies `plan.matchings`, all inside one
    /// transaction. A matching for a student who holds a protected topic at
    /// commit time fails the whole commit. Returns the number of matchings
    /// applied. On error nothing is persisted.
    fn commit_assignments(
        &self,
        plan: &CommitPlan,
    ) -> impl std::future::Future<Output = Result<usize>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn solver_endpoint(&self) -> Option<&str>;
    fn solver_timeout(&self) -> Duration;
    fn database_path(&self) -> &str;
}

/// The I/O stages of a matching round. Preparation between `read` and
/// `solve` is pure and lives in the engine.
#[async_trait]
pub trait MatchingPipeline: Send + Sync {
    async fn read(&self) -> Result<Snapshot>;
    async fn solve(&self, input: &SolverInput) -> Result<SolverResult>;
    async fn commit(&self, plan: CommitPlan) -> Result<usize>;
}
