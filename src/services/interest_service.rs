use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::database::{CandidateStore, ChurchStore, InterestStore};
use crate::dto::interest_dto::{InterestCommand, SetInterestPayload};
use crate::error::{Error, Result};
use crate::models::{
    candidate::CandidateStatus,
    interest::{InterestExpression, InterestSide},
    session::Session,
};
use crate::services::matching_service::MatchingService;
use crate::utils::time::now;

/// Result of an interest write, with mutual status re-derived after the write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterestOutcome {
    pub interest: InterestExpression,
    pub mutual: bool,
}

#[derive(Clone)]
pub struct InterestService {
    interests: Arc<dyn InterestStore>,
    candidates: Arc<dyn CandidateStore>,
    churches: Arc<dyn ChurchStore>,
    matching: MatchingService,
}

impl InterestService {
    pub fn new(
        interests: Arc<dyn InterestStore>,
        candidates: Arc<dyn CandidateStore>,
        churches: Arc<dyn ChurchStore>,
        matching: MatchingService,
    ) -> Self {
        Self {
            interests,
            candidates,
            churches,
            matching,
        }
    }

    /// Fills in the flag side and the caller's own id from the session.
    pub fn resolve(&self, session: &Session, payload: SetInterestPayload) -> Result<InterestCommand> {
        let side = match payload.side.or_else(|| session.interest_side()) {
            Some(side) => side,
            None => {
                return Err(Error::Forbidden(
                    "Only churches and candidates can express interest".into(),
                ))
            }
        };
        let own_id = session.party_id;
        let (church_id, candidate_id) = match side {
            InterestSide::Church => (payload.church_id.or(own_id), payload.candidate_id),
            InterestSide::Candidate => (payload.church_id, payload.candidate_id.or(own_id)),
        };
        match (church_id, candidate_id) {
            (Some(church_id), Some(candidate_id)) => Ok(InterestCommand {
                side,
                church_id,
                candidate_id,
                interested: payload.interested,
            }),
            (None, _) => Err(Error::BadRequest("church_id is required".into())),
            (_, None) => Err(Error::BadRequest("candidate_id is required".into())),
        }
    }

    /// Sets the caller's flag for a (church, candidate) pair.
    ///
    /// Checks run in order: ownership (`Forbidden`), existence (`NotFound`),
    /// then, when raising a flag, status (`InvalidState`). Nothing is written
    /// unless all pass.
    pub async fn set_interest(
        &self,
        session: &Session,
        command: InterestCommand,
    ) -> Result<InterestOutcome> {
        let InterestCommand {
            side,
            church_id,
            candidate_id,
            interested,
        } = command;

        if !session.owns(side, church_id, candidate_id) {
            return Err(Error::Forbidden(format!(
                "{} may not set the {} interest flag for this pair",
                session.role, side
            )));
        }

        let church = self
            .churches
            .get_church(church_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Church {} not found", church_id)))?;
        let candidate = self
            .candidates
            .get_candidate(candidate_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Candidate {} not found", candidate_id)))?;

        // Withdrawal stays open after approval is revoked or the church is
        // deactivated, so a stale match can always be cleared.
        if interested {
            if candidate.status != CandidateStatus::Approved {
                return Err(Error::InvalidState(format!(
                    "Candidate {} is {}; only approved profiles take part in matching",
                    candidate_id, candidate.status
                )));
            }
            if !church.is_active {
                return Err(Error::InvalidState(format!(
                    "Church {} is not active",
                    church_id
                )));
            }
        }

        let interest = self
            .interests
            .set_interest(side, church_id, candidate_id, interested, now())
            .await?;
        let mutual = self.matching.is_mutual(church_id, candidate_id).await?;

        info!(
            %church_id,
            %candidate_id,
            side = %side,
            interested,
            mutual,
            "interest updated"
        );

        Ok(InterestOutcome { interest, mutual })
    }

    /// The pair's record, visible to its two parties and to administrators.
    /// An absent record reads as both flags unset.
    pub async fn get_interest(
        &self,
        session: &Session,
        church_id: Uuid,
        candidate_id: Uuid,
    ) -> Result<InterestExpression> {
        let allowed = session.role.is_admin()
            || session.owns(InterestSide::Church, church_id, candidate_id)
            || session.owns(InterestSide::Candidate, church_id, candidate_id);
        if !allowed {
            return Err(Error::Forbidden("Not a party to this interest".into()));
        }
        Ok(self
            .interests
            .get_interest(church_id, candidate_id)
            .await?
            .unwrap_or_else(|| InterestExpression::empty(church_id, candidate_id)))
    }

    /// Every record the caller is a party to.
    pub async fn list_own(&self, session: &Session) -> Result<Vec<InterestExpression>> {
        match session.interest_side() {
            Some(InterestSide::Church) => {
                self.interests
                    .list_interests_for_church(session.church_id()?)
                    .await
            }
            Some(InterestSide::Candidate) => {
                self.interests
                    .list_interests_for_candidate(session.candidate_id()?)
                    .await
            }
            None => Err(Error::Forbidden(
                "Only churches and candidates have interests".into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use crate::database::{MockCandidateStore, MockChurchStore, MockInterestStore};
    use crate::models::{
        candidate::NewCandidate,
        church::NewChurch,
        user::Role,
    };
    use tokio_test::{assert_err, assert_ok};

    struct Fixture {
        store: Arc<MemoryStore>,
        service: InterestService,
        matching: MatchingService,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::default());
        let matching = MatchingService::new(store.clone());
        let service =
            InterestService::new(store.clone(), store.clone(), store.clone(), matching.clone());
        Fixture {
            store,
            service,
            matching,
        }
    }

    async fn seed_church(store: &MemoryStore, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        store
            .insert_church(NewChurch {
                id,
                name: name.into(),
                email: format!("{}@church.example", id),
                phone: None,
                street_address: None,
                city: None,
                state: None,
                zip_code: None,
            })
            .await
            .unwrap();
        id
    }

    async fn seed_candidate(store: &MemoryStore, status: CandidateStatus) -> Uuid {
        let id = Uuid::new_v4();
        store
            .insert_candidate(NewCandidate {
                id,
                name: "Jane Doe".into(),
                email: format!("{}@example.com", id),
            })
            .await
            .unwrap();
        let path: &[CandidateStatus] = match status {
            CandidateStatus::Draft => &[],
            CandidateStatus::Pending => &[CandidateStatus::Pending],
            CandidateStatus::Approved => &[CandidateStatus::Pending, CandidateStatus::Approved],
            CandidateStatus::Rejected => &[CandidateStatus::Pending, CandidateStatus::Rejected],
        };
        let mut current = CandidateStatus::Draft;
        for next in path {
            store.set_candidate_status(id, current, *next).await.unwrap();
            current = *next;
        }
        id
    }

    fn church_session(church_id: Uuid) -> Session {
        Session {
            user_id: Uuid::new_v4(),
            role: Role::Church,
            party_id: Some(church_id),
        }
    }

    fn candidate_session(candidate_id: Uuid) -> Session {
        Session {
            user_id: Uuid::new_v4(),
            role: Role::Candidate,
            party_id: Some(candidate_id),
        }
    }

    fn command(side: InterestSide, church_id: Uuid, candidate_id: Uuid, interested: bool) -> InterestCommand {
        InterestCommand {
            side,
            church_id,
            candidate_id,
            interested,
        }
    }

    #[tokio::test]
    async fn mutual_match_lifecycle() {
        let f = fixture();
        let church = seed_church(&f.store, "Grace").await;
        let candidate = seed_candidate(&f.store, CandidateStatus::Approved).await;

        let first = assert_ok!(
            f.service
                .set_interest(
                    &church_session(church),
                    command(InterestSide::Church, church, candidate, true)
                )
                .await
        );
        assert!(!first.mutual);

        let second = assert_ok!(
            f.service
                .set_interest(
                    &candidate_session(candidate),
                    command(InterestSide::Candidate, church, candidate, true)
                )
                .await
        );
        assert!(second.mutual);
        assert_eq!(
            f.matching
                .list_mutual_matches(InterestSide::Church, church)
                .await
                .unwrap()[0]
                .counterparty_id,
            candidate
        );
        assert_eq!(
            f.matching
                .list_mutual_matches(InterestSide::Candidate, candidate)
                .await
                .unwrap()[0]
                .counterparty_id,
            church
        );

        let withdrawn = assert_ok!(
            f.service
                .set_interest(
                    &church_session(church),
                    command(InterestSide::Church, church, candidate, false)
                )
                .await
        );
        assert!(!withdrawn.mutual);
        assert!(withdrawn.interest.candidate_interested);
        assert!(f
            .matching
            .list_mutual_matches(InterestSide::Church, church)
            .await
            .unwrap()
            .is_empty());
        assert!(f
            .matching
            .list_mutual_matches(InterestSide::Candidate, candidate)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn repeating_a_write_changes_nothing() {
        let f = fixture();
        let church = seed_church(&f.store, "Grace").await;
        let candidate = seed_candidate(&f.store, CandidateStatus::Approved).await;
        let session = church_session(church);

        let once = f
            .service
            .set_interest(&session, command(InterestSide::Church, church, candidate, true))
            .await
            .unwrap();
        let twice = f
            .service
            .set_interest(&session, command(InterestSide::Church, church, candidate, true))
            .await
            .unwrap();
        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn church_cannot_set_candidate_flag() {
        let f = fixture();
        let church = seed_church(&f.store, "Grace").await;
        let candidate = seed_candidate(&f.store, CandidateStatus::Approved).await;

        let result = f
            .service
            .set_interest(
                &church_session(church),
                command(InterestSide::Candidate, church, candidate, true),
            )
            .await;
        assert!(matches!(result, Err(Error::Forbidden(_))));
    }

    #[tokio::test]
    async fn church_cannot_act_for_another_church() {
        let f = fixture();
        let church = seed_church(&f.store, "Grace").await;
        let other = seed_church(&f.store, "Hope").await;
        let candidate = seed_candidate(&f.store, CandidateStatus::Approved).await;

        let result = f
            .service
            .set_interest(
                &church_session(other),
                command(InterestSide::Church, church, candidate, true),
            )
            .await;
        assert!(matches!(result, Err(Error::Forbidden(_))));
    }

    #[tokio::test]
    async fn pending_candidate_is_gated_until_approved() {
        let f = fixture();
        let church = seed_church(&f.store, "Grace").await;
        let candidate = seed_candidate(&f.store, CandidateStatus::Pending).await;
        let session = church_session(church);

        let gated = f
            .service
            .set_interest(&session, command(InterestSide::Church, church, candidate, true))
            .await;
        assert!(matches!(gated, Err(Error::InvalidState(_))));

        f.store
            .set_candidate_status(candidate, CandidateStatus::Pending, CandidateStatus::Approved)
            .await
            .unwrap();
        assert_ok!(
            f.service
                .set_interest(&session, command(InterestSide::Church, church, candidate, true))
                .await
        );
    }

    #[tokio::test]
    async fn revoked_candidate_match_can_still_be_withdrawn() {
        let f = fixture();
        let church = seed_church(&f.store, "Grace").await;
        let candidate = seed_candidate(&f.store, CandidateStatus::Approved).await;
        f.service
            .set_interest(
                &church_session(church),
                command(InterestSide::Church, church, candidate, true),
            )
            .await
            .unwrap();
        let matched = f
            .service
            .set_interest(
                &candidate_session(candidate),
                command(InterestSide::Candidate, church, candidate, true),
            )
            .await
            .unwrap();
        assert!(matched.mutual);

        f.store
            .set_candidate_status(candidate, CandidateStatus::Approved, CandidateStatus::Rejected)
            .await
            .unwrap();

        let raised = f
            .service
            .set_interest(
                &church_session(church),
                command(InterestSide::Church, church, candidate, true),
            )
            .await;
        assert!(matches!(raised, Err(Error::InvalidState(_))));

        let church_side = assert_ok!(
            f.service
                .set_interest(
                    &church_session(church),
                    command(InterestSide::Church, church, candidate, false)
                )
                .await
        );
        assert!(!church_side.mutual);
        let candidate_side = assert_ok!(
            f.service
                .set_interest(
                    &candidate_session(candidate),
                    command(InterestSide::Candidate, church, candidate, false)
                )
                .await
        );
        assert!(!candidate_side.interest.church_interested);
        assert!(!candidate_side.interest.candidate_interested);

        assert!(f
            .matching
            .list_mutual_matches(InterestSide::Church, church)
            .await
            .unwrap()
            .is_empty());
        assert!(f
            .matching
            .list_mutual_matches(InterestSide::Candidate, candidate)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn inactive_church_cannot_raise_interest_but_can_withdraw() {
        let f = fixture();
        let church = seed_church(&f.store, "Grace").await;
        let candidate = seed_candidate(&f.store, CandidateStatus::Approved).await;
        let session = church_session(church);
        f.service
            .set_interest(&session, command(InterestSide::Church, church, candidate, true))
            .await
            .unwrap();

        f.store.set_church_active(church, false).await.unwrap();

        let from_church = f
            .service
            .set_interest(&session, command(InterestSide::Church, church, candidate, true))
            .await;
        assert!(matches!(from_church, Err(Error::InvalidState(_))));
        let from_candidate = f
            .service
            .set_interest(
                &candidate_session(candidate),
                command(InterestSide::Candidate, church, candidate, true),
            )
            .await;
        assert!(matches!(from_candidate, Err(Error::InvalidState(_))));
        assert!(!f
            .store
            .get_interest(church, candidate)
            .await
            .unwrap()
            .unwrap()
            .candidate_interested);

        let withdrawn = assert_ok!(
            f.service
                .set_interest(&session, command(InterestSide::Church, church, candidate, false))
                .await
        );
        assert!(!withdrawn.interest.church_interested);
    }

    #[tokio::test]
    async fn draft_candidate_leaves_no_record() {
        let f = fixture();
        let church = seed_church(&f.store, "Grace").await;
        let candidate = seed_candidate(&f.store, CandidateStatus::Draft).await;

        let result = f
            .service
            .set_interest(
                &church_session(church),
                command(InterestSide::Church, church, candidate, true),
            )
            .await;
        assert!(matches!(result, Err(Error::InvalidState(_))));
        assert!(f
            .store
            .get_interest(church, candidate)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn missing_candidate_is_not_found() {
        let f = fixture();
        let church = seed_church(&f.store, "Grace").await;
        let result = f
            .service
            .set_interest(
                &church_session(church),
                command(InterestSide::Church, church, Uuid::new_v4(), true),
            )
            .await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn admin_cannot_express_interest() {
        let f = fixture();
        let admin = Session {
            user_id: Uuid::new_v4(),
            role: Role::Admin,
            party_id: None,
        };
        let payload = SetInterestPayload {
            church_id: Some(Uuid::new_v4()),
            candidate_id: Some(Uuid::new_v4()),
            interested: true,
            side: None,
        };
        assert!(matches!(
            f.service.resolve(&admin, payload),
            Err(Error::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn resolve_fills_own_id_from_session() {
        let f = fixture();
        let church = Uuid::new_v4();
        let candidate = Uuid::new_v4();
        let resolved = f
            .service
            .resolve(
                &church_session(church),
                SetInterestPayload {
                    candidate_id: Some(candidate),
                    interested: true,
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(
            resolved,
            command(InterestSide::Church, church, candidate, true)
        );

        let missing = f.service.resolve(
            &candidate_session(candidate),
            SetInterestPayload {
                interested: true,
                ..Default::default()
            },
        );
        assert!(matches!(missing, Err(Error::BadRequest(_))));
    }

    #[tokio::test]
    async fn storage_failure_propagates_without_writing() {
        let church_id = Uuid::new_v4();
        let candidate_id = Uuid::new_v4();

        let mut churches = MockChurchStore::new();
        churches.expect_get_church().returning(|id| {
            Ok(Some(crate::models::church::Church {
                id,
                name: "Grace".into(),
                email: "grace@church.example".into(),
                phone: None,
                street_address: None,
                city: None,
                state: None,
                zip_code: None,
                is_active: true,
                created_at: chrono::Utc::now(),
                updated_at: chrono::Utc::now(),
            }))
        });
        let mut candidates = MockCandidateStore::new();
        candidates
            .expect_get_candidate()
            .returning(|_| Err(Error::Internal("directory unavailable".into())));
        let mut interests = MockInterestStore::new();
        interests.expect_set_interest().never();
        let interests: Arc<dyn InterestStore> = Arc::new(interests);

        let service = InterestService::new(
            interests.clone(),
            Arc::new(candidates),
            Arc::new(churches),
            MatchingService::new(interests),
        );
        let result = service
            .set_interest(
                &church_session(church_id),
                command(InterestSide::Church, church_id, candidate_id, true),
            )
            .await;
        assert_err!(result);
    }

    #[tokio::test]
    async fn outsiders_cannot_read_a_pair() {
        let f = fixture();
        let church = seed_church(&f.store, "Grace").await;
        let candidate = seed_candidate(&f.store, CandidateStatus::Approved).await;
        let stranger = candidate_session(Uuid::new_v4());
        assert!(matches!(
            f.service.get_interest(&stranger, church, candidate).await,
            Err(Error::Forbidden(_))
        ));
        let empty = f
            .service
            .get_interest(&candidate_session(candidate), church, candidate)
            .await
            .unwrap();
        assert_eq!(empty, InterestExpression::empty(church, candidate));
    }
}
