//! Storage seams. Every store is a trait so the service layer runs unchanged
//! against PostgreSQL or the in-process memory backend.

pub mod memory;
pub mod pool;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    candidate::{Candidate, CandidateChanges, CandidateFilter, CandidateStatus, NewCandidate},
    church::{Church, NewChurch},
    interest::{InterestExpression, InterestSide},
    job::{Job, JobChanges, JobStatus},
    user::{Role, User},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `Conflict` when the email is taken.
    async fn insert_user(&self, user: User) -> Result<User>;
    async fn find_user(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn update_password(
        &self,
        id: Uuid,
        password_hash: String,
        needs_password_change: bool,
    ) -> Result<User>;
    async fn list_users(&self, role: Option<Role>) -> Result<Vec<User>>;
    async fn set_user_active(&self, id: Uuid, is_active: bool) -> Result<User>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CandidateStore: Send + Sync {
    async fn insert_candidate(&self, candidate: NewCandidate) -> Result<Candidate>;
    async fn get_candidate(&self, id: Uuid) -> Result<Option<Candidate>>;
    async fn update_candidate(&self, id: Uuid, changes: CandidateChanges) -> Result<Candidate>;
    /// Compare-and-set on status. `Conflict` if the stored status is no longer `from`.
    async fn set_candidate_status(
        &self,
        id: Uuid,
        from: CandidateStatus,
        to: CandidateStatus,
    ) -> Result<Candidate>;
    /// Matching candidates in insertion order.
    async fn search_candidates(&self, filter: &CandidateFilter) -> Result<Vec<Candidate>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChurchStore: Send + Sync {
    async fn insert_church(&self, church: NewChurch) -> Result<Church>;
    async fn get_church(&self, id: Uuid) -> Result<Option<Church>>;
    async fn list_churches(&self) -> Result<Vec<Church>>;
    async fn set_church_active(&self, id: Uuid, is_active: bool) -> Result<Church>;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobFilter {
    pub church_id: Option<Uuid>,
    pub status: Option<JobStatus>,
}

impl JobFilter {
    pub fn matches(&self, job: &Job) -> bool {
        self.church_id.map_or(true, |id| job.church_id == id)
            && self.status.map_or(true, |status| job.status == status)
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn insert_job(&self, job: Job) -> Result<Job>;
    async fn get_job(&self, id: Uuid) -> Result<Option<Job>>;
    async fn update_job(&self, id: Uuid, changes: JobChanges) -> Result<Job>;
    /// Compare-and-set on status. `Conflict` if the stored status is no longer `from`.
    async fn set_job_status(&self, id: Uuid, from: JobStatus, to: JobStatus) -> Result<Job>;
    /// Newest first.
    async fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>>;
}

/// One-sided interest flags keyed by (church, candidate).
///
/// Writes to one record are applied atomically in arrival order. A write that
/// leaves the flag unchanged keeps its timestamp, and withdrawing on a pair
/// with no record stores nothing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InterestStore: Send + Sync {
    async fn get_interest(
        &self,
        church_id: Uuid,
        candidate_id: Uuid,
    ) -> Result<Option<InterestExpression>>;
    async fn set_interest(
        &self,
        side: InterestSide,
        church_id: Uuid,
        candidate_id: Uuid,
        interested: bool,
        at: DateTime<Utc>,
    ) -> Result<InterestExpression>;
    /// Ordered by candidate id.
    async fn list_interests_for_church(&self, church_id: Uuid) -> Result<Vec<InterestExpression>>;
    /// Ordered by church id.
    async fn list_interests_for_candidate(
        &self,
        candidate_id: Uuid,
    ) -> Result<Vec<InterestExpression>>;
}

/// The set of stores the services are built from.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub candidates: Arc<dyn CandidateStore>,
    pub churches: Arc<dyn ChurchStore>,
    pub jobs: Arc<dyn JobStore>,
    pub interests: Arc<dyn InterestStore>,
}

impl Stores {
    pub fn from_backend<B>(backend: B) -> Self
    where
        B: UserStore + CandidateStore + ChurchStore + JobStore + InterestStore + 'static,
    {
        let backend = Arc::new(backend);
        Self {
            users: backend.clone(),
            candidates: backend.clone(),
            churches: backend.clone(),
            jobs: backend.clone(),
            interests: backend,
        }
    }

    pub fn in_memory() -> Self {
        Self::from_backend(memory::MemoryStore::default())
    }

    pub fn postgres(pool: sqlx::PgPool) -> Self {
        Self::from_backend(postgres::PgStore::new(pool))
    }
}
