use std::sync::Arc;

use uuid::Uuid;

use crate::database::InterestStore;
use crate::error::Result;
use crate::models::interest::{InterestSide, MutualMatch};

/// Derives mutual-match state from the interest store. Holds no state of its
/// own: every answer comes from a fresh read.
#[derive(Clone)]
pub struct MatchingService {
    interests: Arc<dyn InterestStore>,
}

impl MatchingService {
    pub fn new(interests: Arc<dyn InterestStore>) -> Self {
        Self { interests }
    }

    pub async fn is_mutual(&self, church_id: Uuid, candidate_id: Uuid) -> Result<bool> {
        Ok(self
            .interests
            .get_interest(church_id, candidate_id)
            .await?
            .map_or(false, |expr| expr.is_mutual()))
    }

    /// Most recent match first; ties broken by counterparty id.
    pub async fn list_mutual_matches(
        &self,
        side: InterestSide,
        party_id: Uuid,
    ) -> Result<Vec<MutualMatch>> {
        let records = match side {
            InterestSide::Church => self.interests.list_interests_for_church(party_id).await?,
            InterestSide::Candidate => {
                self.interests.list_interests_for_candidate(party_id).await?
            }
        };

        let mut matches: Vec<MutualMatch> = records
            .into_iter()
            .filter_map(|expr| {
                expr.matched_at().map(|matched_at| MutualMatch {
                    counterparty_id: expr.counterparty(side),
                    matched_at,
                })
            })
            .collect();
        matches.sort_by(|a, b| {
            b.matched_at
                .cmp(&a.matched_at)
                .then_with(|| a.counterparty_id.cmp(&b.counterparty_id))
        });
        Ok(matches)
    }
}
