use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::database::CandidateStore;
use crate::dto::candidate_dto::{CandidateSearchQuery, CandidateSort, UpdateProfilePayload};
use crate::error::{Error, Result};
use crate::models::{
    candidate::{Candidate, CandidateFilter, CandidateStatus},
    session::Session,
    user::Role,
};

#[derive(Clone)]
pub struct CandidateService {
    candidates: Arc<dyn CandidateStore>,
}

impl CandidateService {
    pub fn new(candidates: Arc<dyn CandidateStore>) -> Self {
        Self { candidates }
    }

    async fn load(&self, id: Uuid) -> Result<Candidate> {
        self.candidates
            .get_candidate(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Candidate {} not found", id)))
    }

    pub async fn get_own_profile(&self, session: &Session) -> Result<Candidate> {
        self.load(session.candidate_id()?).await
    }

    pub async fn update_profile(
        &self,
        session: &Session,
        payload: UpdateProfilePayload,
    ) -> Result<Candidate> {
        let id = session.candidate_id()?;
        let candidate = self.candidates.update_candidate(id, payload.into()).await?;
        info!(candidate_id = %id, "profile updated");
        Ok(candidate)
    }

    /// Sends a draft or rejected profile to the review queue.
    pub async fn submit_profile(&self, session: &Session) -> Result<Candidate> {
        let id = session.candidate_id()?;
        self.transition(id, CandidateStatus::Pending).await
    }

    pub async fn withdraw_submission(&self, session: &Session) -> Result<Candidate> {
        let id = session.candidate_id()?;
        self.transition(id, CandidateStatus::Draft).await
    }

    /// Admins see anyone. Churches see approved candidates only; anything
    /// else reads as missing. Candidates see themselves.
    pub async fn get_candidate(&self, session: &Session, id: Uuid) -> Result<Candidate> {
        match session.role {
            Role::Admin | Role::SuperAdmin => self.load(id).await,
            Role::Church => match self.load(id).await? {
                candidate if candidate.status == CandidateStatus::Approved => Ok(candidate),
                _ => Err(Error::NotFound(format!("Candidate {} not found", id))),
            },
            Role::Candidate => {
                if session.party_id != Some(id) {
                    return Err(Error::Forbidden(
                        "Candidates may only view their own profile".into(),
                    ));
                }
                self.load(id).await
            }
        }
    }

    pub async fn search(
        &self,
        session: &Session,
        query: CandidateSearchQuery,
    ) -> Result<Vec<Candidate>> {
        let status = match session.role {
            Role::Church => Some(CandidateStatus::Approved),
            Role::Admin | Role::SuperAdmin => query.status,
            Role::Candidate => {
                return Err(Error::Forbidden(
                    "Candidates cannot search the directory".into(),
                ))
            }
        };
        let filter = CandidateFilter {
            status,
            text: query.query,
        };
        let mut candidates = self.candidates.search_candidates(&filter).await?;
        match query.sort {
            Some(CandidateSort::Name) => {
                candidates.sort_by_cached_key(|c| c.name.to_lowercase());
            }
            Some(CandidateSort::CreatedAt) => candidates.sort_by_key(|c| c.created_at),
            None => {}
        }
        Ok(candidates)
    }

    pub async fn list_for_review(
        &self,
        session: &Session,
        status: Option<CandidateStatus>,
    ) -> Result<Vec<Candidate>> {
        session.require_admin()?;
        let filter = CandidateFilter {
            status: Some(status.unwrap_or(CandidateStatus::Pending)),
            text: None,
        };
        self.candidates.search_candidates(&filter).await
    }

    pub async fn set_status(
        &self,
        session: &Session,
        id: Uuid,
        status: CandidateStatus,
    ) -> Result<Candidate> {
        session.require_admin()?;
        let candidate = self.transition(id, status).await?;
        info!(candidate_id = %id, reviewer = %session.user_id, status = %status, "candidate reviewed");
        Ok(candidate)
    }

    async fn transition(&self, id: Uuid, next: CandidateStatus) -> Result<Candidate> {
        let current = self.load(id).await?;
        if !current.status.can_transition_to(next) {
            return Err(Error::InvalidState(format!(
                "Candidate {} cannot move from {} to {}",
                id, current.status, next
            )));
        }
        self.candidates
            .set_candidate_status(id, current.status, next)
            .await
    }
}
