use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CandidateStore, ChurchStore, InterestStore, JobFilter, JobStore, UserStore};
use crate::error::{Error, Result};
use crate::models::{
    candidate::{Candidate, CandidateChanges, CandidateFilter, CandidateStatus, NewCandidate},
    church::{Church, NewChurch},
    interest::{InterestExpression, InterestSide},
    job::{Job, JobChanges, JobStatus},
    user::{Role, User},
};

/// In-process backend. Collections are vectors so iteration follows insertion
/// order; interest records sit in a map keyed by (church, candidate).
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    candidates: RwLock<Vec<Candidate>>,
    churches: RwLock<Vec<Church>>,
    jobs: RwLock<Vec<Job>>,
    interests: RwLock<BTreeMap<(Uuid, Uuid), InterestExpression>>,
}

fn not_found(entity: &str, id: Uuid) -> Error {
    Error::NotFound(format!("{} {} not found", entity, id))
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: User) -> Result<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(Error::Conflict(format!("Email {} is already registered", user.email)));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.read().await.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn update_password(
        &self,
        id: Uuid,
        password_hash: String,
        needs_password_change: bool,
    ) -> Result<User> {
        let mut users = self.users.write().await;
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| not_found("User", id))?;
        user.password_hash = password_hash;
        user.needs_password_change = needs_password_change;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn list_users(&self, role: Option<Role>) -> Result<Vec<User>> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .filter(|u| role.map_or(true, |r| u.role == r))
            .cloned()
            .collect())
    }

    async fn set_user_active(&self, id: Uuid, is_active: bool) -> Result<User> {
        let mut users = self.users.write().await;
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| not_found("User", id))?;
        user.is_active = is_active;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }
}

#[async_trait]
impl CandidateStore for MemoryStore {
    async fn insert_candidate(&self, candidate: NewCandidate) -> Result<Candidate> {
        let mut candidates = self.candidates.write().await;
        if candidates.iter().any(|c| c.email == candidate.email) {
            return Err(Error::Conflict(format!(
                "A candidate with email {} already exists",
                candidate.email
            )));
        }
        let now = Utc::now();
        let created = Candidate {
            id: candidate.id,
            name: candidate.name,
            email: candidate.email,
            phone: None,
            street_address: None,
            city: None,
            state: None,
            zip_code: None,
            event: None,
            resume_url: None,
            video_url: None,
            picture_url: None,
            status: CandidateStatus::Draft,
            created_at: now,
            updated_at: now,
        };
        candidates.push(created.clone());
        Ok(created)
    }

    async fn get_candidate(&self, id: Uuid) -> Result<Option<Candidate>> {
        Ok(self
            .candidates
            .read()
            .await
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn update_candidate(&self, id: Uuid, changes: CandidateChanges) -> Result<Candidate> {
        let mut candidates = self.candidates.write().await;
        let candidate = candidates
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| not_found("Candidate", id))?;
        changes.apply(candidate);
        candidate.updated_at = Utc::now();
        Ok(candidate.clone())
    }

    async fn set_candidate_status(
        &self,
        id: Uuid,
        from: CandidateStatus,
        to: CandidateStatus,
    ) -> Result<Candidate> {
        let mut candidates = self.candidates.write().await;
        let candidate = candidates
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| not_found("Candidate", id))?;
        if candidate.status != from {
            return Err(Error::Conflict(format!(
                "Candidate {} status changed concurrently",
                id
            )));
        }
        candidate.status = to;
        candidate.updated_at = Utc::now();
        Ok(candidate.clone())
    }

    async fn search_candidates(&self, filter: &CandidateFilter) -> Result<Vec<Candidate>> {
        Ok(self
            .candidates
            .read()
            .await
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ChurchStore for MemoryStore {
    async fn insert_church(&self, church: NewChurch) -> Result<Church> {
        let mut churches = self.churches.write().await;
        if churches.iter().any(|c| c.email == church.email) {
            return Err(Error::Conflict(format!(
                "A church with email {} already exists",
                church.email
            )));
        }
        let now = Utc::now();
        let created = Church {
            id: church.id,
            name: church.name,
            email: church.email,
            phone: church.phone,
            street_address: church.street_address,
            city: church.city,
            state: church.state,
            zip_code: church.zip_code,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        churches.push(created.clone());
        Ok(created)
    }

    async fn get_church(&self, id: Uuid) -> Result<Option<Church>> {
        Ok(self
            .churches
            .read()
            .await
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn list_churches(&self) -> Result<Vec<Church>> {
        let mut churches = self.churches.read().await.clone();
        churches.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(churches)
    }

    async fn set_church_active(&self, id: Uuid, is_active: bool) -> Result<Church> {
        let mut churches = self.churches.write().await;
        let church = churches
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| not_found("Church", id))?;
        church.is_active = is_active;
        church.updated_at = Utc::now();
        Ok(church.clone())
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn insert_job(&self, job: Job) -> Result<Job> {
        self.jobs.write().await.push(job.clone());
        Ok(job)
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<Job>> {
        Ok(self.jobs.read().await.iter().find(|j| j.id == id).cloned())
    }

    async fn update_job(&self, id: Uuid, changes: JobChanges) -> Result<Job> {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .iter_mut()
            .find(|j| j.id == id)
            .ok_or_else(|| not_found("Job", id))?;
        changes.apply(job);
        job.updated_at = Utc::now();
        Ok(job.clone())
    }

    async fn set_job_status(&self, id: Uuid, from: JobStatus, to: JobStatus) -> Result<Job> {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .iter_mut()
            .find(|j| j.id == id)
            .ok_or_else(|| not_found("Job", id))?;
        if job.status != from {
            return Err(Error::Conflict(format!("Job {} status changed concurrently", id)));
        }
        job.status = to;
        job.updated_at = Utc::now();
        Ok(job.clone())
    }

    async fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>> {
        // Newest first; reversing insertion order keeps ties deterministic.
        Ok(self
            .jobs
            .read()
            .await
            .iter()
            .rev()
            .filter(|j| filter.matches(j))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl InterestStore for MemoryStore {
    async fn get_interest(
        &self,
        church_id: Uuid,
        candidate_id: Uuid,
    ) -> Result<Option<InterestExpression>> {
        Ok(self
            .interests
            .read()
            .await
            .get(&(church_id, candidate_id))
            .cloned())
    }

    async fn set_interest(
        &self,
        side: InterestSide,
        church_id: Uuid,
        candidate_id: Uuid,
        interested: bool,
        at: DateTime<Utc>,
    ) -> Result<InterestExpression> {
        let mut interests = self.interests.write().await;
        let key = (church_id, candidate_id);
        match interests.get_mut(&key) {
            Some(existing) => {
                existing.set_flag(side, interested, at);
                Ok(existing.clone())
            }
            None if !interested => Ok(InterestExpression::empty(church_id, candidate_id)),
            None => {
                let mut created = InterestExpression::empty(church_id, candidate_id);
                created.set_flag(side, interested, at);
                interests.insert(key, created.clone());
                Ok(created)
            }
        }
    }

    async fn list_interests_for_church(&self, church_id: Uuid) -> Result<Vec<InterestExpression>> {
        Ok(self
            .interests
            .read()
            .await
            .range((church_id, Uuid::nil())..=(church_id, Uuid::from_u128(u128::MAX)))
            .map(|(_, expr)| expr.clone())
            .collect())
    }

    async fn list_interests_for_candidate(
        &self,
        candidate_id: Uuid,
    ) -> Result<Vec<InterestExpression>> {
        // Keys are (church, candidate), so church order falls out of the scan.
        Ok(self
            .interests
            .read()
            .await
            .values()
            .filter(|expr| expr.candidate_id == candidate_id)
            .cloned()
            .collect())
    }
}
