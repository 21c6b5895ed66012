use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use crate::database::{CandidateStore, JobFilter, JobStore};
use crate::dto::job_dto::{CreateJobPayload, UpdateJobPayload};
use crate::error::{Error, Result};
use crate::models::{
    candidate::CandidateStatus,
    job::{Job, JobChanges, JobStatus},
    session::Session,
};
use crate::utils::{time::now, validation::non_blank};

#[derive(Clone)]
pub struct JobService {
    jobs: Arc<dyn JobStore>,
    candidates: Arc<dyn CandidateStore>,
}

fn check_salary_range(from: Option<Decimal>, to: Option<Decimal>) -> Result<()> {
    match (from, to) {
        (Some(from), Some(to)) if from > to => Err(Error::BadRequest(
            "salary_from must not exceed salary_to".into(),
        )),
        _ => Ok(()),
    }
}

impl JobService {
    pub fn new(jobs: Arc<dyn JobStore>, candidates: Arc<dyn CandidateStore>) -> Self {
        Self { jobs, candidates }
    }

    async fn load(&self, id: Uuid) -> Result<Job> {
        self.jobs
            .get_job(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Job {} not found", id)))
    }

    /// Loads a job the calling church owns.
    async fn load_owned(&self, session: &Session, id: Uuid) -> Result<Job> {
        let church_id = session.church_id()?;
        let job = self.load(id).await?;
        if job.church_id != church_id {
            return Err(Error::Forbidden("Job belongs to another church".into()));
        }
        Ok(job)
    }

    pub async fn create(&self, session: &Session, payload: CreateJobPayload) -> Result<Job> {
        let church_id = session.church_id()?;
        check_salary_range(payload.salary_from, payload.salary_to)?;
        let now = now();
        let job = self
            .jobs
            .insert_job(Job {
                id: Uuid::new_v4(),
                church_id,
                title: payload.title.trim().to_string(),
                description: non_blank(payload.description),
                location: non_blank(payload.location),
                employment_type: non_blank(payload.employment_type),
                salary_from: payload.salary_from,
                salary_to: payload.salary_to,
                status: JobStatus::Pending,
                created_at: now,
                updated_at: now,
            })
            .await?;
        info!(job_id = %job.id, %church_id, "job posted");
        Ok(job)
    }

    pub async fn update(
        &self,
        session: &Session,
        id: Uuid,
        payload: UpdateJobPayload,
    ) -> Result<Job> {
        let job = self.load_owned(session, id).await?;
        if job.status == JobStatus::Closed {
            return Err(Error::InvalidState(format!("Job {} is closed", id)));
        }
        let changes: JobChanges = payload.into();
        check_salary_range(
            changes.salary_from.or(job.salary_from),
            changes.salary_to.or(job.salary_to),
        )?;
        if !changes.alters(&job) {
            return Ok(job);
        }
        let updated = self.jobs.update_job(id, changes).await?;
        match job.status {
            JobStatus::Approved | JobStatus::Rejected => {
                // Reviewed content changed, so the posting goes back to the queue.
                let pending = self
                    .jobs
                    .set_job_status(id, job.status, JobStatus::Pending)
                    .await?;
                info!(job_id = %id, previous = %job.status, "edited job returned to review");
                Ok(pending)
            }
            JobStatus::Pending | JobStatus::Closed => Ok(updated),
        }
    }

    pub async fn close(&self, session: &Session, id: Uuid) -> Result<Job> {
        let job = self.load_owned(session, id).await?;
        if job.status == JobStatus::Closed {
            return Err(Error::InvalidState(format!("Job {} is already closed", id)));
        }
        let closed = self
            .jobs
            .set_job_status(id, job.status, JobStatus::Closed)
            .await?;
        info!(job_id = %id, "job closed");
        Ok(closed)
    }

    pub async fn list_own(&self, session: &Session) -> Result<Vec<Job>> {
        let church_id = session.church_id()?;
        self.jobs
            .list_jobs(&JobFilter {
                church_id: Some(church_id),
                status: None,
            })
            .await
    }

    /// Approved postings, for approved candidates only.
    pub async fn list_open(&self, session: &Session) -> Result<Vec<Job>> {
        let candidate_id = session.candidate_id()?;
        let candidate = self
            .candidates
            .get_candidate(candidate_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Candidate {} not found", candidate_id)))?;
        if candidate.status != CandidateStatus::Approved {
            return Err(Error::InvalidState(
                "Job listings open once your profile is approved".into(),
            ));
        }
        self.jobs
            .list_jobs(&JobFilter {
                church_id: None,
                status: Some(JobStatus::Approved),
            })
            .await
    }

    pub async fn list_all(&self, session: &Session, status: Option<JobStatus>) -> Result<Vec<Job>> {
        session.require_admin()?;
        self.jobs
            .list_jobs(&JobFilter {
                church_id: None,
                status,
            })
            .await
    }

    pub async fn set_status(&self, session: &Session, id: Uuid, status: JobStatus) -> Result<Job> {
        session.require_admin()?;
        let job = self.load(id).await?;
        if !job.status.can_review_to(status) {
            return Err(Error::InvalidState(format!(
                "Job {} cannot move from {} to {}",
                id, job.status, status
            )));
        }
        let job = self.jobs.set_job_status(id, job.status, status).await?;
        info!(job_id = %id, status = %status, reviewer = %session.user_id, "job reviewed");
        Ok(job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use crate::database::MockJobStore;
    use crate::models::{candidate::NewCandidate, user::Role};
    use rust_decimal::Decimal;

    fn service() -> (Arc<MemoryStore>, JobService) {
        let store = Arc::new(MemoryStore::default());
        (store.clone(), JobService::new(store.clone(), store))
    }

    fn church(id: Uuid) -> Session {
        Session {
            user_id: Uuid::new_v4(),
            role: Role::Church,
            party_id: Some(id),
        }
    }

    fn admin() -> Session {
        Session {
            user_id: Uuid::new_v4(),
            role: Role::Admin,
            party_id: None,
        }
    }

    fn posting(title: &str) -> CreateJobPayload {
        CreateJobPayload {
            title: title.into(),
            description: Some("Lead Sunday worship".into()),
            location: Some("Austin, TX".into()),
            employment_type: Some("full_time".into()),
            salary_from: Some(Decimal::new(40_000, 0)),
            salary_to: Some(Decimal::new(55_000, 0)),
        }
    }

    #[tokio::test]
    async fn only_owner_edits_and_closed_jobs_are_frozen() {
        let (_, jobs) = service();
        let owner = church(Uuid::new_v4());
        let job = jobs.create(&owner, posting("Worship Pastor")).await.unwrap();
        assert_eq!(job.status, JobStatus::Pending);

        let other = church(Uuid::new_v4());
        assert!(matches!(
            jobs.update(&other, job.id, UpdateJobPayload::default()).await,
            Err(Error::Forbidden(_))
        ));
        assert!(matches!(
            jobs.close(&other, job.id).await,
            Err(Error::Forbidden(_))
        ));

        let renamed = jobs
            .update(
                &owner,
                job.id,
                UpdateJobPayload {
                    title: Some("Senior Worship Pastor".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.title, "Senior Worship Pastor");

        jobs.close(&owner, job.id).await.unwrap();
        assert!(matches!(
            jobs.update(&owner, job.id, UpdateJobPayload::default()).await,
            Err(Error::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn editing_a_reviewed_job_sends_it_back_to_review() {
        let (_, jobs) = service();
        let owner = church(Uuid::new_v4());
        let job = jobs.create(&owner, posting("Worship Pastor")).await.unwrap();
        jobs.set_status(&admin(), job.id, JobStatus::Approved)
            .await
            .unwrap();

        let same_title = jobs
            .update(
                &owner,
                job.id,
                UpdateJobPayload {
                    title: Some("Worship Pastor".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(same_title.status, JobStatus::Approved);

        let edited = jobs
            .update(
                &owner,
                job.id,
                UpdateJobPayload {
                    salary_to: Some(Decimal::new(60_000, 0)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(edited.status, JobStatus::Pending);
        assert_eq!(edited.salary_to, Some(Decimal::new(60_000, 0)));
        assert!(jobs
            .list_all(&admin(), Some(JobStatus::Approved))
            .await
            .unwrap()
            .is_empty());

        jobs.set_status(&admin(), job.id, JobStatus::Rejected)
            .await
            .unwrap();
        let resubmitted = jobs
            .update(
                &owner,
                job.id,
                UpdateJobPayload {
                    location: Some("Round Rock, TX".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(resubmitted.status, JobStatus::Pending);
    }

    #[tokio::test]
    async fn inverted_salary_range_is_rejected() {
        let (_, jobs) = service();
        let owner = church(Uuid::new_v4());
        let mut bad = posting("Youth Pastor");
        bad.salary_from = Some(Decimal::new(90_000, 0));
        assert!(matches!(
            jobs.create(&owner, bad).await,
            Err(Error::BadRequest(_))
        ));

        let job = jobs.create(&owner, posting("Youth Pastor")).await.unwrap();
        let update = jobs
            .update(
                &owner,
                job.id,
                UpdateJobPayload {
                    salary_to: Some(Decimal::new(10_000, 0)),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(update, Err(Error::BadRequest(_))));
    }

    #[tokio::test]
    async fn open_listing_requires_approved_candidate() {
        let (store, jobs) = service();
        let owner = church(Uuid::new_v4());
        let approved = jobs.create(&owner, posting("Worship Pastor")).await.unwrap();
        jobs.create(&owner, posting("Children's Director")).await.unwrap();
        jobs.set_status(&admin(), approved.id, JobStatus::Approved)
            .await
            .unwrap();

        let candidate_id = Uuid::new_v4();
        store
            .insert_candidate(NewCandidate {
                id: candidate_id,
                name: "Jane".into(),
                email: "jane@example.com".into(),
            })
            .await
            .unwrap();
        let me = Session {
            user_id: Uuid::new_v4(),
            role: Role::Candidate,
            party_id: Some(candidate_id),
        };
        assert!(matches!(
            jobs.list_open(&me).await,
            Err(Error::InvalidState(_))
        ));

        store
            .set_candidate_status(candidate_id, CandidateStatus::Draft, CandidateStatus::Pending)
            .await
            .unwrap();
        store
            .set_candidate_status(candidate_id, CandidateStatus::Pending, CandidateStatus::Approved)
            .await
            .unwrap();
        let open = jobs.list_open(&me).await.unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].id, approved.id);
    }

    #[tokio::test]
    async fn review_follows_transition_table() {
        let (_, jobs) = service();
        let owner = church(Uuid::new_v4());
        let job = jobs.create(&owner, posting("Worship Pastor")).await.unwrap();
        jobs.close(&owner, job.id).await.unwrap();
        assert!(matches!(
            jobs.set_status(&admin(), job.id, JobStatus::Approved).await,
            Err(Error::InvalidState(_))
        ));
        assert!(matches!(
            jobs.set_status(&owner, job.id, JobStatus::Approved).await,
            Err(Error::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn missing_job_is_not_found() {
        let mut store = MockJobStore::new();
        store.expect_get_job().returning(|_| Ok(None));
        store.expect_set_job_status().never();
        let jobs = JobService::new(Arc::new(store), Arc::new(MemoryStore::default()));
        assert!(matches!(
            jobs.set_status(&admin(), Uuid::new_v4(), JobStatus::Approved)
                .await,
            Err(Error::NotFound(_))
        ));
    }
}
